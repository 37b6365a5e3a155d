//! DVD inspection through `lsdvd`

use regex::Regex;
use tracing::debug;

use crate::domain::model::{DiscInfo, TitleInfo};
use crate::error::{DiscRipperError, DiscRipperResult};
use crate::ports::{CommandRunner, DiscInspector};
use crate::probe::{ToolAvailability, UNKNOWN_DISC_LABEL};
use crate::utils::time::parse_duration;

/// Parser for the human-readable `lsdvd -c` report
pub struct LsdvdParser {
    disc_title: Regex,
    title: Regex,
    chapter: Regex,
}

impl LsdvdParser {
    pub fn new() -> DiscRipperResult<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| DiscRipperError::InspectionFailed {
                tool: "lsdvd".to_string(),
                message: e.to_string(),
            })
        };

        Ok(Self {
            disc_title: compile(r"^\s*Disc Title:\s*(.*?)\s*$")?,
            title: compile(r"^\s*Title:\s*(\d+),\s*Length:\s*([0-9:.]+)")?,
            chapter: compile(r"^\s*Chapter:\s*(\d+),\s*Length:\s*([0-9:.]+)")?,
        })
    }

    /// Turn an `lsdvd -c` report into a disc description
    pub fn parse(&self, output: &str) -> DiscRipperResult<DiscInfo> {
        let mut label = String::new();
        let mut titles: Vec<TitleInfo> = Vec::new();

        for line in output.lines() {
            if let Some(caps) = self.disc_title.captures(line) {
                label = caps[1].to_string();
            } else if let Some(caps) = self.chapter.captures(line) {
                // Chapter rows belong to the most recent title row
                if let Some(current) = titles.last_mut() {
                    current.chapter_durations.push(parse_duration(&caps[2])?);
                }
            } else if let Some(caps) = self.title.captures(line) {
                let index = caps[1].parse::<u32>().map_err(|e| self.malformed(e))?;
                titles.push(TitleInfo::new(index, parse_duration(&caps[2])?));
            }
        }

        if titles.is_empty() {
            return Err(DiscRipperError::InspectionFailed {
                tool: "lsdvd".to_string(),
                message: "output did not list any titles".to_string(),
            });
        }

        titles.sort_by_key(|title| title.index);
        if label.trim().is_empty() {
            label = UNKNOWN_DISC_LABEL.to_string();
        }

        Ok(DiscInfo::new(label, titles))
    }

    fn malformed(&self, error: impl std::fmt::Display) -> DiscRipperError {
        DiscRipperError::InspectionFailed {
            tool: "lsdvd".to_string(),
            message: format!("malformed title row: {}", error),
        }
    }
}

/// Inspector running `lsdvd` against a device
pub struct LsdvdInspector<'a> {
    tool: ToolAvailability,
    runner: &'a dyn CommandRunner,
}

impl<'a> LsdvdInspector<'a> {
    pub fn new(tool: ToolAvailability, runner: &'a dyn CommandRunner) -> Self {
        Self { tool, runner }
    }
}

impl DiscInspector for LsdvdInspector<'_> {
    fn name(&self) -> &str {
        "lsdvd"
    }

    fn inspect(&self, device: &str) -> DiscRipperResult<DiscInfo> {
        let program = self.tool.path.to_string_lossy();
        let args = vec!["-c".to_string(), device.to_string()];
        debug!(tool = %program, device, "Running lsdvd");

        let output = self
            .runner
            .run(&program, &args)
            .map_err(|e| DiscRipperError::InspectionFailed {
                tool: self.tool.command.clone(),
                message: e.to_string(),
            })?;
        if !output.success {
            return Err(DiscRipperError::InspectionFailed {
                tool: self.tool.command.clone(),
                message: output
                    .first_line()
                    .unwrap_or("exited unsuccessfully")
                    .to_string(),
            });
        }

        LsdvdParser::new()?.parse(&output.stdout)
    }
}
