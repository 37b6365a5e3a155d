//! Command implementations

use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::info;

use crate::app::{AppContainer, InspectRequest, RipRequest};
use crate::cli::args::{InspectArgs, RipArgs};
use crate::config::AppConfig;

/// Execute the rip command
pub fn rip(args: &RipArgs, config: &AppConfig, container: &dyn AppContainer) -> Result<()> {
    let request = RipRequest {
        device: args.device.clone(),
        simulate: args.simulate.clone(),
    };
    info!(device = %request.device, simulate = ?request.simulate, "Starting rip");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let response = container
        .rip_interactor(config)
        .execute(&request, &mut out)
        .context("Rip failed")?;
    out.flush()?;

    if let Some(path) = &response.metadata_path {
        info!(path = %path.display(), "Metadata recorded");
    }
    info!(
        kind = %response.classification.kind,
        items = response.plan.len(),
        ripped = response.report.ripped(),
        "Rip command completed"
    );
    Ok(())
}

/// Execute the inspect command
pub fn inspect(args: &InspectArgs, config: &AppConfig, container: &dyn AppContainer) -> Result<()> {
    let request = InspectRequest {
        device: args.device.clone(),
        simulate: args.simulate.clone(),
        json: args.json,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    container
        .inspect_interactor(config)
        .execute(&request, &mut out)
        .context("Inspection failed")?;
    out.flush()?;
    Ok(())
}
