//! Disc inspection module
//!
//! Discovers the inspection tools on the host and turns a device (or a JSON
//! fixture) into a [`DiscInfo`].

use std::path::PathBuf;

use tracing::{debug, info};

use crate::domain::model::DiscInfo;
use crate::error::{DiscRipperError, DiscRipperResult};
use crate::ports::{CommandRunner, DiscInspector, ToolDiscovery};

pub mod ffprobe;
pub mod fixture;
pub mod lsdvd;

pub use ffprobe::FfprobeInspector;
pub use fixture::FixtureInspector;
pub use lsdvd::LsdvdInspector;

/// Label used when a disc reports none
pub const UNKNOWN_DISC_LABEL: &str = "Unknown Disc";

/// Commands that could inspect a Blu-ray disc
pub const BLURAY_INSPECTOR_CANDIDATES: [&str; 2] = ["makemkvcon", "bd_info"];

/// A located external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolAvailability {
    pub command: String,
    pub path: PathBuf,
}

impl ToolAvailability {
    fn discover(discovery: &dyn ToolDiscovery, command: &str) -> Option<Self> {
        discovery.locate(command).map(|path| Self {
            command: command.to_string(),
            path,
        })
    }
}

/// Inspection tools present on the host
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InspectionTools {
    pub dvd: Option<ToolAvailability>,
    pub fallback: Option<ToolAvailability>,
    pub blu_ray: Option<ToolAvailability>,
}

impl InspectionTools {
    /// Look up `lsdvd`, `ffprobe` and the first Blu-ray candidate
    pub fn discover(discovery: &dyn ToolDiscovery) -> Self {
        let tools = Self {
            dvd: ToolAvailability::discover(discovery, "lsdvd"),
            fallback: ToolAvailability::discover(discovery, "ffprobe"),
            blu_ray: BLURAY_INSPECTOR_CANDIDATES
                .iter()
                .find_map(|command| ToolAvailability::discover(discovery, command)),
        };
        debug!(?tools, "Discovered inspection tools");
        tools
    }

    /// Inspector for DVDs: `lsdvd` first, `ffprobe` as fallback
    pub fn dvd_inspector<'a>(
        &self,
        runner: &'a dyn CommandRunner,
    ) -> Option<Box<dyn DiscInspector + 'a>> {
        if let Some(tool) = &self.dvd {
            return Some(Box::new(LsdvdInspector::new(tool.clone(), runner)));
        }
        self.fallback
            .as_ref()
            .map(|tool| {
                Box::new(FfprobeInspector::new(tool.clone(), runner)) as Box<dyn DiscInspector + 'a>
            })
    }
}

/// Inspect `device` with the best available tool.
///
/// When only a Blu-ray tool is installed the Blu-ray stub is consulted, which
/// always refuses.
pub fn inspect_device(
    device: &str,
    tools: &InspectionTools,
    runner: &dyn CommandRunner,
) -> DiscRipperResult<DiscInfo> {
    match tools.dvd_inspector(runner) {
        Some(inspector) => {
            info!(device, inspector = inspector.name(), "Inspecting disc");
            inspector.inspect(device)
        }
        None if tools.blu_ray.is_some() => inspect_blu_ray(device, tools.blu_ray.as_ref()),
        None => Err(DiscRipperError::NoInspectionTool),
    }
}

/// Blu-ray inspection is not implemented
pub fn inspect_blu_ray(
    device: &str,
    tool: Option<&ToolAvailability>,
) -> DiscRipperResult<DiscInfo> {
    let tool = match tool {
        Some(tool) => format!("detected '{}' at {:?}", tool.command, tool.path),
        None => "no Blu-ray inspection tool detected".to_string(),
    };
    Err(DiscRipperError::BluRayNotSupported {
        device: device.to_string(),
        tool,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::CommandOutput;
    use std::path::Path;

    struct Installed(&'static [&'static str]);

    impl ToolDiscovery for Installed {
        fn locate(&self, command: &str) -> Option<PathBuf> {
            self.0
                .iter()
                .any(|installed| *installed == command)
                .then(|| Path::new("/usr/bin").join(command))
        }
    }

    struct FfprobeOnly;

    impl CommandRunner for FfprobeOnly {
        fn run(&self, program: &str, _args: &[String]) -> std::io::Result<CommandOutput> {
            assert_eq!(program, "/usr/bin/ffprobe");
            Ok(CommandOutput {
                success: true,
                code: Some(0),
                stdout: r#"{"format": {"duration": "5700"}}"#.to_string(),
                stderr: String::new(),
            })
        }
    }

    #[test]
    fn test_discover_picks_first_bluray_candidate() {
        let tools = InspectionTools::discover(&Installed(&["bd_info", "ffprobe"]));
        assert!(tools.dvd.is_none());
        assert_eq!(tools.fallback.as_ref().map(|t| t.command.as_str()), Some("ffprobe"));
        assert_eq!(tools.blu_ray.map(|t| t.command), Some("bd_info".to_string()));
    }

    #[test]
    fn test_inspect_falls_back_to_ffprobe() {
        let tools = InspectionTools::discover(&Installed(&["ffprobe"]));
        let disc = inspect_device("/dev/sr0", &tools, &FfprobeOnly).unwrap();
        assert_eq!(disc.titles[0].duration_seconds, 5700.0);
    }

    #[test]
    fn test_inspect_without_tools() {
        let tools = InspectionTools::discover(&Installed(&[]));
        let err = inspect_device("/dev/sr0", &tools, &FfprobeOnly).unwrap_err();
        assert!(matches!(err, DiscRipperError::NoInspectionTool));
    }

    #[test]
    fn test_bluray_stub_refuses() {
        let tools = InspectionTools::discover(&Installed(&["makemkvcon"]));
        let err = inspect_device("/dev/sr0", &tools, &FfprobeOnly).unwrap_err();
        assert!(err.to_string().contains("makemkvcon"));
        assert_eq!(err.exit_code(), crate::error::EXIT_DISC_NOT_DETECTED);

        let err = inspect_blu_ray("/dev/sr1", None).unwrap_err();
        assert!(err.to_string().contains("no Blu-ray inspection tool detected"));
    }
}
