//! External command lines for ripping and compression

use std::fmt;
use std::path::{Path, PathBuf};

use crate::planner::{Backend, RipPlanItem};

/// HandBrake preset used for the optional compression pass
pub const HANDBRAKE_PRESET: &str = "Fast 1080p30";

/// Program plus arguments, ready to hand to a [`crate::ports::CommandRunner`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ToolCommand {
    fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for ToolCommand {
    /// Shell-style rendering with quoting where needed
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&shell_quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", shell_quote(arg))?;
        }
        Ok(())
    }
}

fn shell_quote(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "@%+=:,./-_".contains(c));
    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r#"'"'"'"#))
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Command copying `item` off `device` with `backend`
pub fn rip_command(backend: Backend, device: &str, item: &RipPlanItem) -> ToolCommand {
    let destination = &item.destination_path;
    let title = item.title_index.to_string();

    let args: Vec<String> = match backend {
        Backend::Dvdbackup => {
            let parent = destination
                .parent()
                .map(path_arg)
                .unwrap_or_else(|| ".".to_string());
            let stem = destination
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| format!("title_{}", title));
            vec![
                "-i".into(),
                device.into(),
                "-o".into(),
                parent,
                "-t".into(),
                title,
                "-n".into(),
                stem,
            ]
        }
        Backend::Ffmpeg => vec![
            "-hide_banner".into(),
            "-loglevel".into(),
            "error".into(),
            "-f".into(),
            "dvdvideo".into(),
            "-title".into(),
            title,
            "-i".into(),
            device.into(),
            path_arg(destination),
        ],
    };

    ToolCommand::new(backend.command(), args)
}

/// `<stem>-compressed.<ext>` next to `source`
pub fn compression_output_path(source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match source.extension() {
        Some(ext) => format!("{}-compressed.{}", stem, ext.to_string_lossy()),
        None => format!("{}-compressed", stem),
    };
    source.with_file_name(file_name)
}

/// HandBrake invocation compressing `source`
pub fn compression_command(source: &Path) -> ToolCommand {
    ToolCommand::new(
        "HandBrakeCLI",
        [
            "-i".to_string(),
            path_arg(source),
            "-o".to_string(),
            path_arg(&compression_output_path(source)),
            "--preset".to_string(),
            HANDBRAKE_PRESET.to_string(),
        ],
    )
}
