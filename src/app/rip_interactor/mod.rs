// Rip interactor - Orchestrates the inspect, classify, plan and rip use case

use std::io::Write;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::app::pipeline::{DiscPipeline, DiscSource};
use crate::domain::model::ClassificationResult;
use crate::engine::{ExecutionReport, RipExecutor};
use crate::error::DiscRipperResult;
use crate::output::{write_metadata_document, MetadataBuilder};
use crate::planner::RipPlan;

/// Input for one rip run
#[derive(Debug, Clone, PartialEq)]
pub struct RipRequest {
    pub device: String,
    /// JSON fixture used in place of the device
    pub simulate: Option<PathBuf>,
}

impl RipRequest {
    pub fn device(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            simulate: None,
        }
    }

    pub fn simulated(fixture: impl Into<PathBuf>) -> Self {
        Self {
            device: String::new(),
            simulate: Some(fixture.into()),
        }
    }
}

/// Everything a rip run produced
#[derive(Debug, Clone, PartialEq)]
pub struct RipResponse {
    pub classification: ClassificationResult,
    pub plan: RipPlan,
    pub report: ExecutionReport,
    /// Written only after a real run
    pub metadata_path: Option<PathBuf>,
}

/// Interactor for the rip use case
pub struct RipInteractor<'a> {
    pipeline: DiscPipeline<'a>,
}

impl<'a> RipInteractor<'a> {
    pub fn new(pipeline: DiscPipeline<'a>) -> Self {
        Self { pipeline }
    }

    /// Run the whole pipeline; dry-run lines are written to `out`.
    ///
    /// Simulation always implies a dry run.
    pub fn execute(&self, request: &RipRequest, out: &mut dyn Write) -> DiscRipperResult<RipResponse> {
        let source = match &request.simulate {
            Some(fixture) => DiscSource::Fixture(fixture),
            None => DiscSource::Device(&request.device),
        };
        let loaded = self.pipeline.load_disc(source)?;
        let config = self.pipeline.config();
        let dry_run = config.dry_run || loaded.simulated;

        let classification = self.pipeline.classify(&loaded.disc)?;
        self.pipeline.lookup_metadata(&loaded.disc);
        let plan = self.pipeline.plan(&classification, &loaded.disc, dry_run)?;

        let report = RipExecutor::new(self.pipeline.runner(), loaded.device.as_str())
            .with_compression(config.compression)
            .execute(&plan, out)?;

        let metadata_path = match plan.output_root() {
            Some(root) if !dry_run => {
                let document = MetadataBuilder::new(self.pipeline.discovery(), self.pipeline.runner())
                    .build(&loaded.disc, &plan, config.title.as_deref());
                Some(write_metadata_document(&document, root)?)
            }
            Some(_) => None,
            None => {
                warn!("Rip plan was empty; nothing to record");
                None
            }
        };

        info!(
            ripped = report.ripped(),
            simulated = report.simulated(),
            dry_run,
            "Rip run finished"
        );

        Ok(RipResponse {
            classification,
            plan,
            report,
            metadata_path,
        })
    }
}
