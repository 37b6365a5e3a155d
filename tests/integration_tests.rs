use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use discripper::adapters::NullMetadataProvider;
use discripper::app::{DiscPipeline, RipInteractor, RipRequest};
use discripper::ports::{CommandOutput, CommandRunner, ToolDiscovery};
use discripper::probe::FixtureInspector;
use discripper::*;

/// Shared test doubles and fixture helpers
mod test_utils {
    use super::*;

    pub fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(name)
    }

    pub fn load(name: &str) -> DiscInfo {
        FixtureInspector::new()
            .load(&fixture(name))
            .expect("fixture should load")
    }

    /// Tool discovery answering from a fixed list
    pub struct FixedTools(pub &'static [&'static str]);

    impl ToolDiscovery for FixedTools {
        fn locate(&self, command: &str) -> Option<PathBuf> {
            self.0
                .iter()
                .any(|tool| *tool == command)
                .then(|| Path::new("/usr/bin").join(command))
        }
    }

    /// Records invocations and creates the file a backend would write
    #[derive(Default)]
    pub struct FakeBackend {
        pub invocations: RefCell<Vec<Vec<String>>>,
    }

    impl CommandRunner for FakeBackend {
        fn run(&self, program: &str, args: &[String]) -> std::io::Result<CommandOutput> {
            let mut argv = vec![program.to_string()];
            argv.extend(args.iter().cloned());
            self.invocations.borrow_mut().push(argv);

            if program == "ffmpeg" && args.len() > 2 {
                if let Some(destination) = args.last() {
                    fs::write(destination, vec![0u8; 128])?;
                }
            }
            Ok(CommandOutput {
                success: true,
                code: Some(0),
                stdout: format!("{} version 6.1", program),
                stderr: String::new(),
            })
        }
    }
}

use test_utils::*;

#[test]
fn test_movie_fixture_plans_single_dry_run_item() {
    let disc = load("movie.json");
    let classification = classify(&disc, &ClassificationThresholds::default()).unwrap();
    assert_eq!(classification.kind, DiscKind::Movie);
    assert!(!classification.ambiguous);

    let naming = NamingConfig::new("/srv/rips");
    let plan = build_plan(&classification, &disc, &naming, &FixedTools(&["ffmpeg"]), true).unwrap();

    assert_eq!(plan.len(), 1);
    let item = &plan.items[0];
    assert_eq!(item.title_index, 1);
    assert_eq!(item.destination_path, PathBuf::from("/srv/rips/Blade_Runner.mp4"));
    assert!(item.episode_code.is_none());
    assert!(item.dry_run);
    assert_eq!(item.tool, ToolSelection::Selected(Backend::Ffmpeg));
}

#[test]
fn test_series_fixture_orders_episodes() {
    let disc = load("series.json");
    let classification = classify(&disc, &ClassificationThresholds::default()).unwrap();
    assert_eq!(classification.kind, DiscKind::Series);

    let naming = NamingConfig::new("/media/out").with_lowercase(true);
    let plan = build_plan(&classification, &disc, &naming, &FixedTools(&[]), true).unwrap();

    let codes: Vec<&str> = plan
        .items
        .iter()
        .filter_map(|item| item.episode_code.as_deref())
        .collect();
    assert_eq!(codes, vec!["s01e01", "s01e02", "s01e03", "s01e04"]);
    assert_eq!(
        plan.items[0].destination_path,
        PathBuf::from("/media/out/firefly/firefly-s01e01_serenity.mp4")
    );
    assert_eq!(
        plan.items[1].destination_path,
        PathBuf::from("/media/out/firefly/firefly-s01e02_the_train_job.mp4")
    );
    assert!(plan
        .items
        .iter()
        .all(|item| item.tool == ToolSelection::NoBackendAvailable));
}

#[test]
fn test_ambiguous_fixture_falls_back_to_longest_title() {
    let disc = load("ambiguous.json");
    let classification = classify(&disc, &ClassificationThresholds::default()).unwrap();

    assert_eq!(classification.kind, DiscKind::Movie);
    assert!(classification.ambiguous);
    assert_eq!(classification.episodes.len(), 1);
    assert_eq!(classification.episodes[0].title_index, 2);
}

#[test]
fn test_simulated_rip_prints_every_item() {
    let dir = TempDir::new().unwrap();
    let config = AppConfig {
        output_directory: dir.path().to_path_buf(),
        ..AppConfig::default()
    };
    let backend = FakeBackend::default();
    let tools = FixedTools(&["dvdbackup", "ffmpeg"]);
    let pipeline = DiscPipeline::new(&tools, &backend, &NullMetadataProvider, &config);

    let mut out: Vec<u8> = Vec::new();
    let response = RipInteractor::new(pipeline)
        .execute(&RipRequest::simulated(fixture("series")), &mut out)
        .unwrap();

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines
        .iter()
        .all(|line| line.starts_with("[dry-run] Would execute: dvdbackup -i simulate:series.json")));
    assert!(lines[3].ends_with("Firefly-s01e04_Shindig.mp4"));
    assert_eq!(response.report.simulated(), 4);
    assert!(backend.invocations.borrow().is_empty());
}

#[test]
fn test_real_rip_records_metadata() {
    let dir = TempDir::new().unwrap();
    let device = dir.path().join("sr0");
    fs::write(&device, b"").unwrap();

    // Without lsdvd or ffprobe the device cannot be inspected
    let config = AppConfig {
        output_directory: dir.path().join("rips"),
        ..AppConfig::default()
    };
    let backend = FakeBackend::default();
    let tools = FixedTools(&["ffmpeg"]);
    let pipeline = DiscPipeline::new(&tools, &backend, &NullMetadataProvider, &config);
    let err = RipInteractor::new(pipeline)
        .execute(&RipRequest::device(device.to_string_lossy()), &mut std::io::sink())
        .unwrap_err();
    assert!(matches!(err, DiscRipperError::NoInspectionTool));
    assert_eq!(err.exit_code(), 1);

    // A real run driven from a fixture-backed plan goes through the executor
    let disc = load("series.json");
    let classification = classify(&disc, &ClassificationThresholds::default()).unwrap();
    let naming = config.to_naming_config().unwrap();
    let plan = build_plan(&classification, &disc, &naming, &FixedTools(&["ffmpeg"]), false).unwrap();

    let report = discripper::engine::RipExecutor::new(&backend, device.to_string_lossy())
        .execute(&plan, &mut std::io::sink())
        .unwrap();
    assert_eq!(report.ripped(), 4);

    let root = plan.output_root().unwrap();
    assert_eq!(root, dir.path().join("rips").join("Firefly"));
    let document = discripper::output::MetadataBuilder::new(&FixedTools(&["ffmpeg"]), &backend)
        .build(&disc, &plan, None);
    let written = discripper::output::write_metadata_document(&document, root).unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(written).unwrap()).unwrap();
    assert_eq!(value["classification"]["type"], "series");
    assert_eq!(value["classification"]["episode_count"], 4);
    assert_eq!(value["tools"]["ffmpeg"], "ffmpeg version 6.1");
    assert_eq!(value["tracks"][0]["chapters"]["count"], 3);
    assert_eq!(value["tracks"][3]["output"]["size_bytes"], 128);
    assert_eq!(
        value["tracks"][2]["output"]["path"],
        plan.items[2].destination_path.to_string_lossy().into_owned()
    );
}

#[test]
fn test_rerun_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    let disc = load("movie.json");
    let classification = classify(&disc, &ClassificationThresholds::default()).unwrap();
    let naming = NamingConfig::new(dir.path());
    let plan = build_plan(&classification, &disc, &naming, &FixedTools(&["ffmpeg"]), false).unwrap();
    let backend = FakeBackend::default();
    let executor = discripper::engine::RipExecutor::new(&backend, "/dev/sr0");

    executor.execute(&plan, &mut std::io::sink()).unwrap();
    let err = executor.execute(&plan, &mut std::io::sink()).unwrap_err();

    assert!(matches!(err, DiscRipperError::DestinationExists { .. }));
    assert_eq!(err.exit_code(), 2);
    assert_eq!(backend.invocations.borrow().len(), 1);
}
