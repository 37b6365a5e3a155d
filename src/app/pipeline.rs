// Pipeline steps shared by the rip and inspect use cases

use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::domain::model::{ClassificationResult, DiscInfo};
use crate::domain::rules::classify;
use crate::error::DiscRipperResult;
use crate::planner::{RipPlan, RipPlanner};
use crate::ports::{CommandRunner, MetadataProvider, ToolDiscovery};
use crate::probe::fixture::resolve_fixture_path;
use crate::probe::{inspect_device, FixtureInspector, InspectionTools};
use crate::utils::path::ensure_readable_device;

/// Device string used for commands when a fixture stands in for a disc
pub const SIMULATED_DEVICE_PREFIX: &str = "simulate:";

/// Where the disc layout comes from
#[derive(Debug, Clone, PartialEq)]
pub enum DiscSource<'r> {
    Device(&'r str),
    Fixture(&'r Path),
}

/// A disc layout together with the device its commands should name
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDisc {
    pub disc: DiscInfo,
    pub device: String,
    pub simulated: bool,
}

/// Inspect, classify and plan against injected ports
pub struct DiscPipeline<'a> {
    discovery: &'a dyn ToolDiscovery,
    runner: &'a dyn CommandRunner,
    metadata: &'a dyn MetadataProvider,
    config: &'a AppConfig,
}

impl<'a> DiscPipeline<'a> {
    pub fn new(
        discovery: &'a dyn ToolDiscovery,
        runner: &'a dyn CommandRunner,
        metadata: &'a dyn MetadataProvider,
        config: &'a AppConfig,
    ) -> Self {
        Self {
            discovery,
            runner,
            metadata,
            config,
        }
    }

    pub fn discovery(&self) -> &'a dyn ToolDiscovery {
        self.discovery
    }

    pub fn runner(&self) -> &'a dyn CommandRunner {
        self.runner
    }

    pub fn config(&self) -> &'a AppConfig {
        self.config
    }

    /// Read the disc layout from a device or a simulation fixture
    pub fn load_disc(&self, source: DiscSource<'_>) -> DiscRipperResult<LoadedDisc> {
        let loaded = match source {
            DiscSource::Fixture(fixture) => {
                let disc = FixtureInspector::new().load(fixture)?;
                let resolved = resolve_fixture_path(fixture, None);
                let name = resolved
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| fixture.display().to_string());
                LoadedDisc {
                    disc,
                    device: format!("{}{}", SIMULATED_DEVICE_PREFIX, name),
                    simulated: true,
                }
            }
            DiscSource::Device(device) => {
                ensure_readable_device(device)?;
                let tools = InspectionTools::discover(self.discovery);
                LoadedDisc {
                    disc: inspect_device(device, &tools, self.runner)?,
                    device: device.to_string(),
                    simulated: false,
                }
            }
        };

        info!(
            event = "inspected",
            device = %loaded.device,
            label = %loaded.disc.disc_label,
            titles = loaded.disc.titles.len(),
            "Disc inspected"
        );
        Ok(loaded)
    }

    /// Classify the disc, warning when the movie fallback was used
    pub fn classify(&self, disc: &DiscInfo) -> DiscRipperResult<ClassificationResult> {
        let result = classify(disc, &self.config.classification)?;

        info!(
            event = "classified",
            kind = %result.kind,
            episodes = result.episode_count(),
            label = %disc.disc_label,
            ambiguous = result.ambiguous,
            "Disc classified"
        );
        if result.ambiguous {
            warn!(
                label = %disc.disc_label,
                "Classification was ambiguous; treating the longest title as a movie"
            );
        }
        Ok(result)
    }

    /// Ask the metadata provider about the disc; the answer is only logged
    pub fn lookup_metadata(&self, disc: &DiscInfo) {
        let lookup = self.metadata.lookup_disc(disc);
        debug!(
            provider = %lookup.provider,
            found = lookup.found(),
            message = lookup.message.as_deref().unwrap_or(""),
            "Metadata lookup"
        );
    }

    pub fn plan(
        &self,
        classification: &ClassificationResult,
        disc: &DiscInfo,
        dry_run: bool,
    ) -> DiscRipperResult<RipPlan> {
        let naming = self.config.to_naming_config()?;
        let plan = RipPlanner::new(self.discovery)
            .with_title(self.config.title.clone())
            .build_plan(classification, disc, &naming, dry_run)?;
        Ok(plan)
    }
}
