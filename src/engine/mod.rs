//! Rip execution engine
//!
//! Walks a [`RipPlan`] in order and either prints what would run or runs the
//! selected backend for each item.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use tracing::{error, info};

use crate::error::{DiscRipperError, DiscRipperResult};
use crate::planner::{RipPlan, RipPlanItem, ToolSelection};
use crate::ports::CommandRunner;

pub mod command;

pub use command::{compression_command, compression_output_path, rip_command, ToolCommand};

/// What happened to a single plan item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStatus {
    /// Dry run: the command was only printed
    Simulated,
    Ripped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemOutcome {
    pub title_index: u32,
    pub destination_path: PathBuf,
    pub status: ItemStatus,
}

/// Outcome of a whole plan
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionReport {
    pub outcomes: Vec<ItemOutcome>,
}

impl ExecutionReport {
    /// Number of items actually ripped
    pub fn ripped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.status == ItemStatus::Ripped)
            .count()
    }

    pub fn simulated(&self) -> usize {
        self.outcomes.len() - self.ripped()
    }
}

/// Executes rip plans against one device
pub struct RipExecutor<'a> {
    runner: &'a dyn CommandRunner,
    device: String,
    compression: bool,
}

impl<'a> RipExecutor<'a> {
    pub fn new(runner: &'a dyn CommandRunner, device: impl Into<String>) -> Self {
        Self {
            runner,
            device: device.into(),
            compression: false,
        }
    }

    /// Log a HandBrake plan after each item
    pub fn with_compression(mut self, compression: bool) -> Self {
        self.compression = compression;
        self
    }

    /// Text printed for a dry-run item
    pub fn dry_run_line(&self, item: &RipPlanItem) -> String {
        let action = match item.tool {
            ToolSelection::Selected(backend) => {
                rip_command(backend, &self.device, item).to_string()
            }
            ToolSelection::NoBackendAvailable => item.tool.to_string(),
        };
        format!(
            "[dry-run] Would execute: {} -> {}",
            action,
            item.destination_path.display()
        )
    }

    /// Run every item in order, stopping at the first failure.
    ///
    /// Dry-run lines go to `out`; nothing else is written there.
    pub fn execute(&self, plan: &RipPlan, out: &mut dyn Write) -> DiscRipperResult<ExecutionReport> {
        let mut report = ExecutionReport::default();

        for item in &plan.items {
            let status = if item.dry_run {
                writeln!(out, "{}", self.dry_run_line(item))?;
                ItemStatus::Simulated
            } else {
                self.rip(item).map_err(|e| {
                    error!(title = item.title_index, error = %e, "Rip failed");
                    e
                })?;
                ItemStatus::Ripped
            };

            if self.compression {
                self.log_compression_plan(item, status);
            }

            report.outcomes.push(ItemOutcome {
                title_index: item.title_index,
                destination_path: item.destination_path.clone(),
                status,
            });
        }

        Ok(report)
    }

    fn rip(&self, item: &RipPlanItem) -> DiscRipperResult<()> {
        let backend = item
            .tool
            .backend()
            .ok_or(DiscRipperError::NoBackendAvailable {
                title_index: item.title_index,
            })?;

        let destination = &item.destination_path;
        if destination.exists() {
            return Err(DiscRipperError::DestinationExists {
                path: destination.clone(),
            });
        }

        let failed = |message: String| DiscRipperError::RipFailed {
            tool: backend.to_string(),
            title_index: item.title_index,
            message,
        };

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| failed(format!("cannot create {}: {}", parent.display(), e)))?;
        }

        let command = rip_command(backend, &self.device, item);
        info!(
            event = "rip_started",
            title = item.title_index,
            tool = %backend,
            destination = %destination.display(),
            "Ripping title"
        );

        let output = self
            .runner
            .run(&command.program, &command.args)
            .map_err(|e| failed(e.to_string()))?;
        if !output.success {
            let detail = output.first_line().unwrap_or("no output").to_string();
            return Err(failed(match output.code {
                Some(code) => format!("exit status {}: {}", code, detail),
                None => format!("terminated by signal: {}", detail),
            }));
        }

        info!(
            event = "rip_finished",
            title = item.title_index,
            tool = %backend,
            destination = %destination.display(),
            "Title ripped"
        );
        Ok(())
    }

    fn log_compression_plan(&self, item: &RipPlanItem, status: ItemStatus) {
        let command = compression_command(&item.destination_path);
        let status = match status {
            ItemStatus::Ripped => "ready",
            ItemStatus::Simulated => "dry-run",
        };
        info!(
            event = "compress_plan",
            status,
            source = %item.destination_path.display(),
            output = %compression_output_path(&item.destination_path).display(),
            command = %command,
            "Compression plan"
        );
    }
}
