//! Fallback inspection and media probing through `ffprobe`

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::domain::model::{DiscInfo, TitleInfo};
use crate::error::{DiscRipperError, DiscRipperResult};
use crate::ports::{CommandRunner, DiscInspector};
use crate::probe::{ToolAvailability, UNKNOWN_DISC_LABEL};

/// Subset of the `ffprobe -of json` document we read
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FfprobeReport {
    #[serde(default)]
    pub format: Option<FfprobeFormat>,
    #[serde(default)]
    pub streams: Vec<FfprobeStream>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FfprobeFormat {
    pub format_name: Option<String>,
    pub duration: Option<String>,
    pub bit_rate: Option<String>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl FfprobeFormat {
    pub fn duration_seconds(&self) -> Option<f64> {
        self.duration.as_deref().and_then(|d| d.trim().parse().ok())
    }

    pub fn bit_rate(&self) -> Option<u64> {
        self.bit_rate.as_deref().and_then(|b| b.trim().parse().ok())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FfprobeStream {
    pub index: Option<u32>,
    pub codec_type: Option<String>,
    pub codec_name: Option<String>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl FfprobeStream {
    pub fn language(&self) -> Option<&str> {
        self.tags
            .get("language")
            .map(|language| language.trim())
            .filter(|language| !language.is_empty())
    }
}

/// Build a single-title disc from an `ffprobe` format report
pub fn disc_from_report(output: &str) -> DiscRipperResult<DiscInfo> {
    let report: FfprobeReport =
        serde_json::from_str(output).map_err(|e| DiscRipperError::InspectionFailed {
            tool: "ffprobe".to_string(),
            message: format!("unexpected output: {}", e),
        })?;

    let format = report.format.unwrap_or_default();
    let label = format
        .tags
        .get("title")
        .map(|title| title.trim())
        .filter(|title| !title.is_empty())
        .map(str::to_string);
    let duration = format.duration_seconds().unwrap_or(0.0).max(0.0);

    let mut title = TitleInfo::new(1, duration);
    if let Some(label) = &label {
        title = title.with_label(label.clone());
    }

    Ok(DiscInfo::new(
        label.unwrap_or_else(|| UNKNOWN_DISC_LABEL.to_string()),
        vec![title],
    ))
}

/// Inspector running `ffprobe` when `lsdvd` is unavailable
pub struct FfprobeInspector<'a> {
    tool: ToolAvailability,
    runner: &'a dyn CommandRunner,
}

impl<'a> FfprobeInspector<'a> {
    pub fn new(tool: ToolAvailability, runner: &'a dyn CommandRunner) -> Self {
        Self { tool, runner }
    }
}

impl DiscInspector for FfprobeInspector<'_> {
    fn name(&self) -> &str {
        "ffprobe"
    }

    fn inspect(&self, device: &str) -> DiscRipperResult<DiscInfo> {
        let program = self.tool.path.to_string_lossy();
        let args: Vec<String> = [
            "-v",
            "error",
            "-show_entries",
            "format=duration:format_tags=title",
            "-of",
            "json",
            device,
        ]
        .iter()
        .map(|arg| arg.to_string())
        .collect();
        debug!(tool = %program, device, "Running ffprobe");

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

        disc_from_report(&output.stdout)
    }
}

/// Probe a produced media file; `None` when ffprobe fails or prints garbage
pub fn probe_media(
    runner: &dyn CommandRunner,
    ffprobe: &Path,
    media: &Path,
) -> Option<FfprobeReport> {
    let args: Vec<String> = vec![
        "-v".into(),
        "error".into(),
        "-print_format".into(),
        "json".into(),
        "-show_streams".into(),
        "-show_format".into(),
        media.to_string_lossy().into_owned(),
    ];

    let output = runner.run(&ffprobe.to_string_lossy(), &args).ok()?;
    if !output.success {
        debug!(media = %media.display(), "ffprobe could not read output file");
        return None;
    }
    serde_json::from_str(&output.stdout).ok()
}
