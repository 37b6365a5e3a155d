// Inspect interactor - Shows what a rip would do without doing it

use std::io::Write;
use std::path::PathBuf;

use crate::app::pipeline::{DiscPipeline, DiscSource, LoadedDisc};
use crate::domain::model::ClassificationResult;
use crate::error::DiscRipperResult;
use crate::output::MetadataBuilder;
use crate::planner::RipPlan;
use crate::utils::time::format_duration;

/// Input for one inspection
#[derive(Debug, Clone, PartialEq)]
pub struct InspectRequest {
    pub device: String,
    pub simulate: Option<PathBuf>,
    /// Print the metadata document shape instead of text
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InspectResponse {
    pub loaded: LoadedDisc,
    pub classification: ClassificationResult,
    pub plan: RipPlan,
}

/// Interactor for the inspect use case; never runs a backend
pub struct InspectInteractor<'a> {
    pipeline: DiscPipeline<'a>,
}

impl<'a> InspectInteractor<'a> {
    pub fn new(pipeline: DiscPipeline<'a>) -> Self {
        Self { pipeline }
    }

    pub fn execute(&self, request: &InspectRequest, out: &mut dyn Write) -> DiscRipperResult<InspectResponse> {
        let source = match &request.simulate {
            Some(fixture) => DiscSource::Fixture(fixture),
            None => DiscSource::Device(&request.device),
        };
        let loaded = self.pipeline.load_disc(source)?;
        let classification = self.pipeline.classify(&loaded.disc)?;
        let plan = self.pipeline.plan(&classification, &loaded.disc, true)?;

        if request.json {
            let document = MetadataBuilder::new(self.pipeline.discovery(), self.pipeline.runner())
                .build(&loaded.disc, &plan, self.pipeline.config().title.as_deref());
            serde_json::to_writer_pretty(&mut *out, &document)?;
            writeln!(out)?;
        } else {
            write_summary(out, &loaded, &classification, &plan)?;
        }

        Ok(InspectResponse {
            loaded,
            classification,
            plan,
        })
    }
}

fn write_summary(
    out: &mut dyn Write,
    loaded: &LoadedDisc,
    classification: &ClassificationResult,
    plan: &RipPlan,
) -> DiscRipperResult<()> {
    writeln!(out, "Disc: {} ({})", loaded.disc.disc_label, loaded.device)?;
    write!(
        out,
        "Classification: {} ({} item{})",
        classification.kind,
        classification.episode_count(),
        if classification.episode_count() == 1 { "" } else { "s" }
    )?;
    if classification.ambiguous {
        write!(out, " [ambiguous]")?;
    }
    writeln!(out)?;

    writeln!(out, "Titles:")?;
    for title in &loaded.disc.titles {
        writeln!(
            out,
            "  {:02}  {}  {} chapter(s)  {}",
            title.index,
            format_duration(title.duration_seconds),
            title.chapter_durations.len(),
            title.display_label().unwrap_or("-")
        )?;
    }

    writeln!(out, "Plan:")?;
    for item in &plan.items {
        writeln!(
            out,
            "  {:02}  {:<7} {}  [{}]",
            item.title_index,
            item.episode_code.as_deref().unwrap_or("movie"),
            item.destination_path.display(),
            item.tool
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::NullMetadataProvider;
    use crate::config::AppConfig;
    use crate::domain::model::DiscKind;
    use crate::ports::{CommandOutput, CommandRunner, ToolDiscovery};
    use std::fs;
    use tempfile::TempDir;

    struct NoTools;

    impl ToolDiscovery for NoTools {
        fn locate(&self, _command: &str) -> Option<PathBuf> {
            None
        }
    }

    struct NeverRuns;

    impl CommandRunner for NeverRuns {
        fn run(&self, program: &str, _args: &[String]) -> std::io::Result<CommandOutput> {
            panic!("inspect must not run {}", program);
        }
    }

    fn request(dir: &TempDir, body: &str, json: bool) -> InspectRequest {
        let path = dir.path().join("movie.json");
        fs::write(&path, body).unwrap();
        InspectRequest {
            device: "/dev/sr0".to_string(),
            simulate: Some(path),
            json,
        }
    }

    #[test]
    fn test_text_summary() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig {
            output_directory: dir.path().join("out"),
            ..AppConfig::default()
        };
        let pipeline = DiscPipeline::new(&NoTools, &NeverRuns, &NullMetadataProvider, &config);

        let mut out: Vec<u8> = Vec::new();
        let response = InspectInteractor::new(pipeline)
            .execute(
                &request(&dir, r#"{"label": "ODD", "titles": [{"duration": 1500}, {"duration": 3000}]}"#, false),
                &mut out,
            )
            .unwrap();

        assert_eq!(response.classification.kind, DiscKind::Movie);
        assert!(response.classification.ambiguous);
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Disc: ODD (simulate:movie.json)\n"));
        assert!(text.contains("Classification: movie (1 item) [ambiguous]"));
        assert!(text.contains("  02  00:50:00  0 chapter(s)  -"));
        assert!(text.contains("[no backend available]"));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_json_output_is_metadata_shape() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig {
            output_directory: dir.path().join("out"),
            ..AppConfig::default()
        };
        let pipeline = DiscPipeline::new(&NoTools, &NeverRuns, &NullMetadataProvider, &config);

        let mut out: Vec<u8> = Vec::new();
        InspectInteractor::new(pipeline)
            .execute(
                &request(&dir, r#"{"label": "Heat", "titles": [{"duration": "01:35:00"}]}"#, true),
                &mut out,
            )
            .unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["classification"]["type"], "movie");
        assert_eq!(value["tracks"][0]["planned_duration_seconds"], 5700.0);
        assert!(value["output_root"].is_null());
        assert_eq!(
            value["tracks"][0]["output"]["path"],
            dir.path().join("out").join("Heat.mp4").to_string_lossy().into_owned()
        );
    }
}
