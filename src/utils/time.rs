//! Duration parsing and formatting utilities

use crate::error::{DiscRipperError, DiscRipperResult};

/// Parser for the duration spellings used by disc tools and fixtures
#[derive(Debug, Default, Clone, Copy)]
pub struct TimeParser;

impl TimeParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse `SS(.fff)`, `MM:SS(.fff)` or `HH:MM:SS(.fff)` into seconds
    pub fn parse_time(&self, time_str: &str) -> DiscRipperResult<f64> {
        let time_str = time_str.trim();
        let invalid = || DiscRipperError::InvalidTimeFormat {
            time: time_str.to_string(),
        };

        let parts = time_str
            .split(':')
            .map(|part| part.trim().parse::<f64>().map_err(|_| invalid()))
            .collect::<DiscRipperResult<Vec<f64>>>()?;

        let seconds = match parts.as_slice() {
            [seconds] => *seconds,
            [minutes, seconds] => minutes * 60.0 + seconds,
            [hours, minutes, seconds] => hours * 3600.0 + minutes * 60.0 + seconds,
            _ => return Err(invalid()),
        };

        if !seconds.is_finite() || seconds < 0.0 {
            return Err(invalid());
        }
        Ok(seconds)
    }

    /// Format seconds as `HH:MM:SS`
    pub fn format_time(&self, seconds: f64) -> String {
        let total = seconds.max(0.0).round() as u64;
        format!(
            "{:02}:{:02}:{:02}",
            total / 3600,
            (total % 3600) / 60,
            total % 60
        )
    }
}

/// Parse a duration string with the default parser
pub fn parse_duration(text: &str) -> DiscRipperResult<f64> {
    TimeParser::new().parse_time(text)
}

/// Format seconds as `HH:MM:SS`
pub fn format_duration(seconds: f64) -> String {
    TimeParser::new().format_time(seconds)
}
