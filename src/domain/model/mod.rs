// Domain models - Disc layout and classification output

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Season used for every inferred episode code
pub const DEFAULT_SEASON: u32 = 1;

/// One selectable title on a disc
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleInfo {
    /// 1-based index as reported by the disc
    pub index: u32,
    pub duration_seconds: f64,
    pub chapter_durations: Vec<f64>,
    pub label: Option<String>,
}

impl TitleInfo {
    /// Create a title without chapters or label
    pub fn new(index: u32, duration_seconds: f64) -> Self {
        Self {
            index,
            duration_seconds,
            chapter_durations: Vec::new(),
            label: None,
        }
    }

    /// Attach a human-readable label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Attach chapter durations in disc order
    pub fn with_chapters(mut self, chapters: Vec<f64>) -> Self {
        self.chapter_durations = chapters;
        self
    }

    /// Label with surrounding whitespace removed, if anything remains
    pub fn display_label(&self) -> Option<&str> {
        self.label
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty())
    }
}

/// Snapshot of a whole disc as produced by an inspector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscInfo {
    pub disc_label: String,
    pub titles: Vec<TitleInfo>,
}

impl DiscInfo {
    /// Create a disc snapshot
    pub fn new(disc_label: impl Into<String>, titles: Vec<TitleInfo>) -> Self {
        Self {
            disc_label: disc_label.into(),
            titles,
        }
    }

    /// Look up a title by its disc index
    pub fn title(&self, index: u32) -> Option<&TitleInfo> {
        self.titles.iter().find(|title| title.index == index)
    }

    /// Sum of all title durations in seconds
    pub fn total_runtime_seconds(&self) -> f64 {
        self.titles.iter().map(|title| title.duration_seconds).sum()
    }

    /// Reject discs the classifier cannot reason about
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.titles.is_empty() {
            return Err(DomainError::validation(
                "disc has no titles",
                format!("{:?}", self.disc_label),
            ));
        }

        let mut seen = HashSet::with_capacity(self.titles.len());
        for title in &self.titles {
            if title.index == 0 {
                return Err(DomainError::validation("title index must be 1-based", 0));
            }
            if !seen.insert(title.index) {
                return Err(DomainError::validation(
                    "duplicate title index",
                    title.index,
                ));
            }
            if !title.duration_seconds.is_finite() || title.duration_seconds < 0.0 {
                return Err(DomainError::validation(
                    format!("title {} has an invalid duration", title.index),
                    title.duration_seconds,
                ));
            }
        }

        Ok(())
    }
}

/// Movie or series decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscKind {
    Movie,
    Series,
}

impl DiscKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscKind::Movie => "movie",
            DiscKind::Series => "series",
        }
    }
}

impl fmt::Display for DiscKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format an `sNNeNN` episode code
pub fn episode_code(season: u32, episode: u32) -> String {
    format!("s{:02}e{:02}", season, episode)
}

/// Mapping of one disc title to one output file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeAssignment {
    pub title_index: u32,
    /// Sequential episode number within the season; absent for movies
    pub episode_number: Option<u32>,
    pub episode_code: Option<String>,
    pub title_hint: Option<String>,
}

impl EpisodeAssignment {
    /// Assignment for the main title of a movie
    pub fn movie(title: &TitleInfo) -> Self {
        Self {
            title_index: title.index,
            episode_number: None,
            episode_code: None,
            title_hint: title.display_label().map(str::to_string),
        }
    }

    /// Assignment for the `episode`-th episode of season one
    ///
    /// Unlabelled titles get no hint; title strategies supply the placeholder.
    pub fn episode(title: &TitleInfo, episode: u32) -> Self {
        Self {
            title_index: title.index,
            episode_number: Some(episode),
            episode_code: Some(episode_code(DEFAULT_SEASON, episode)),
            title_hint: title.display_label().map(str::to_string),
        }
    }
}

/// Output of the classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub kind: DiscKind,
    pub episodes: Vec<EpisodeAssignment>,
    /// Set when neither heuristic matched and the longest title was chosen
    pub ambiguous: bool,
}

impl ClassificationResult {
    /// Number of planned output files
    pub fn episode_count(&self) -> usize {
        self.episodes.len()
    }
}
