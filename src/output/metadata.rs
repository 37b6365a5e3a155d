//! `metadata.json` document model and builder

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::domain::model::{DiscInfo, DiscKind, TitleInfo};
use crate::planner::{RipPlan, RipPlanItem};
use crate::ports::{CommandRunner, ToolDiscovery};
use crate::probe::ffprobe::{probe_media, FfprobeReport};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataDocument {
    pub generated_at: DateTime<Utc>,
    pub disc: DiscSection,
    pub classification: ClassificationSection,
    pub ambiguous: bool,
    /// Name override from configuration, if any
    pub title: Option<String>,
    pub output_root: Option<PathBuf>,
    /// Tool name to first line of its version banner
    pub tools: BTreeMap<String, Option<String>>,
    pub tracks: Vec<TrackDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscSection {
    pub label: String,
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationSection {
    #[serde(rename = "type")]
    pub kind: DiscKind,
    pub episode_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackDocument {
    /// 1-based position within the plan
    pub index: usize,
    pub title: String,
    pub episode_code: Option<String>,
    pub planned_duration_seconds: f64,
    pub chapters: ChapterSection,
    pub output: OutputSection,
    pub format: Option<FormatSection>,
    pub streams: Vec<StreamSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChapterSection {
    pub count: usize,
    pub map: Vec<ChapterEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChapterEntry {
    pub index: usize,
    pub duration_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputSection {
    pub path: PathBuf,
    pub container: Option<String>,
    pub exists: bool,
    pub size_bytes: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormatSection {
    pub container: Option<String>,
    pub duration_seconds: Option<f64>,
    pub bit_rate: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamSection {
    #[serde(rename = "type")]
    pub kind: String,
    pub index: Option<u32>,
    pub codec: Option<String>,
    pub language: Option<String>,
}

/// Assembles a [`MetadataDocument`] from a plan and the host's tools
pub struct MetadataBuilder<'a> {
    discovery: &'a dyn ToolDiscovery,
    runner: &'a dyn CommandRunner,
    generated_at: DateTime<Utc>,
}

impl<'a> MetadataBuilder<'a> {
    pub fn new(discovery: &'a dyn ToolDiscovery, runner: &'a dyn CommandRunner) -> Self {
        Self {
            discovery,
            runner,
            generated_at: Utc::now(),
        }
    }

    /// Pin the generation timestamp
    pub fn at(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }

    pub fn build(&self, disc: &DiscInfo, plan: &RipPlan, title: Option<&str>) -> MetadataDocument {
        let ffprobe = self.discovery.locate("ffprobe");

        let tracks = plan
            .items
            .iter()
            .enumerate()
            .map(|(position, item)| {
                self.track(position + 1, item, disc.title(item.title_index), ffprobe.as_deref())
            })
            .collect();

        // Only executed plans have produced anything on disk
        let output_root = plan
            .items
            .iter()
            .any(|item| !item.dry_run)
            .then(|| plan.output_root().map(Path::to_path_buf))
            .flatten();

        MetadataDocument {
            generated_at: self.generated_at,
            disc: DiscSection {
                label: disc.disc_label.clone(),
                id: None,
            },
            classification: ClassificationSection {
                kind: plan.kind,
                episode_count: plan.len(),
            },
            ambiguous: plan.ambiguous,
            title: title.map(str::to_string),
            output_root,
            tools: self.tool_versions(plan, ffprobe.is_some()),
            tracks,
        }
    }

    fn track(
        &self,
        index: usize,
        item: &RipPlanItem,
        title: Option<&TitleInfo>,
        ffprobe: Option<&Path>,
    ) -> TrackDocument {
        let path = &item.destination_path;
        let metadata = path.metadata().ok().filter(|meta| meta.is_file());
        let exists = metadata.is_some();

        let report = match ffprobe {
            Some(ffprobe) if exists => probe_media(self.runner, ffprobe, path),
            _ => None,
        };

        let chapters: Vec<ChapterEntry> = title
            .map(|title| title.chapter_durations.as_slice())
            .unwrap_or_default()
            .iter()
            .zip(1usize..)
            .map(|(duration, index)| ChapterEntry {
                index,
                duration_seconds: *duration,
            })
            .collect();

        TrackDocument {
            index,
            title: title
                .and_then(TitleInfo::display_label)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Title {:02}", item.title_index)),
            episode_code: item.episode_code.clone(),
            planned_duration_seconds: title.map(|t| t.duration_seconds).unwrap_or(0.0),
            chapters: ChapterSection {
                count: chapters.len(),
                map: chapters,
            },
            output: OutputSection {
                path: path.clone(),
                container: path
                    .extension()
                    .map(|ext| ext.to_string_lossy().into_owned()),
                exists,
                size_bytes: metadata.map(|meta| meta.len()),
            },
            format: report.as_ref().and_then(format_section),
            streams: report.as_ref().map(stream_sections).unwrap_or_default(),
        }
    }

    fn tool_versions(&self, plan: &RipPlan, with_ffprobe: bool) -> BTreeMap<String, Option<String>> {
        let mut tools: BTreeSet<&str> = plan
            .items
            .iter()
            .filter_map(|item| item.tool.backend())
            .map(|backend| backend.command())
            .collect();
        if with_ffprobe {
            tools.insert("ffprobe");
        }

        tools
            .into_iter()
            .map(|tool| (tool.to_string(), self.probe_version(tool)))
            .collect()
    }

    fn probe_version(&self, tool: &str) -> Option<String> {
        ["--version", "-version"].iter().find_map(|flag| {
            let output = self.runner.run(tool, &[flag.to_string()]).ok()?;
            if !output.success {
                debug!(tool, flag, "Version probe failed");
                return None;
            }
            output.first_line().map(str::to_string)
        })
    }
}

fn format_section(report: &FfprobeReport) -> Option<FormatSection> {
    report.format.as_ref().map(|format| FormatSection {
        container: format.format_name.clone(),
        duration_seconds: format.duration_seconds(),
        bit_rate: format.bit_rate(),
    })
}

fn stream_sections(report: &FfprobeReport) -> Vec<StreamSection> {
    report
        .streams
        .iter()
        .filter_map(|stream| {
            let kind = stream.codec_type.clone()?;
            Some(StreamSection {
                kind,
                index: stream.index,
                codec: stream.codec_name.clone(),
                language: stream.language().map(str::to_string),
            })
        })
        .collect()
}
