//! Naming engine
//!
//! Builds filesystem-safe, collision-free destination paths from
//! classification output. Nothing here touches the filesystem.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::domain::errors::DomainError;
use crate::domain::model::EpisodeAssignment;

pub mod strategy;

pub use strategy::EpisodeTitleStrategy;

/// Name used when sanitization leaves nothing behind
pub const FALLBACK_NAME: &str = "untitled";
/// Separator used when the configured one is unusable
pub const DEFAULT_SEPARATOR: char = '_';
/// Container extension for every planned output
pub const OUTPUT_EXTENSION: &str = "mp4";

/// Resolved naming preferences
#[derive(Debug, Clone, PartialEq)]
pub struct NamingConfig {
    pub output_directory: PathBuf,
    pub separator: char,
    pub lowercase: bool,
    pub episode_title_strategy: EpisodeTitleStrategy,
}

impl NamingConfig {
    /// Naming preferences with default separator, case and strategy
    pub fn new(output_directory: impl Into<PathBuf>) -> Self {
        Self {
            output_directory: output_directory.into(),
            separator: DEFAULT_SEPARATOR,
            lowercase: false,
            episode_title_strategy: EpisodeTitleStrategy::default(),
        }
    }

    pub fn with_separator(mut self, separator: &str) -> Self {
        self.separator = normalize_separator(separator);
        self
    }

    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    pub fn with_strategy(mut self, strategy: EpisodeTitleStrategy) -> Self {
        self.episode_title_strategy = strategy;
        self
    }

    /// Sanitize `text` with this configuration's separator and case
    pub fn sanitize(&self, text: &str) -> String {
        sanitize_component(text, self.separator, self.lowercase)
    }

    fn segment(&self, text: &str) -> Result<String, DomainError> {
        let slug = self.sanitize(text);
        if slug.is_empty() || slug.chars().all(|c| c == self.separator) {
            return Err(DomainError::Naming {
                input: text.to_string(),
            });
        }
        Ok(slug)
    }
}

/// Pick a separator that survives sanitization unchanged.
///
/// Only `-` and `_` qualify; anything else falls back to `_`.
pub fn normalize_separator(separator: &str) -> char {
    separator
        .chars()
        .find(|c| matches!(c, '-' | '_'))
        .unwrap_or(DEFAULT_SEPARATOR)
}

/// Reduce `text` to ASCII letters and digits joined by `separator`.
///
/// Text is NFKD-decomposed and combining marks dropped, so accented letters
/// keep their base letter. Every other character becomes the separator, runs
/// collapse to one, and leading/trailing separators are trimmed. Lowercasing
/// happens last. Empty results become [`FALLBACK_NAME`].
pub fn sanitize_component(text: &str, separator: char, lowercase: bool) -> String {
    let separator = if matches!(separator, '-' | '_') {
        separator
    } else {
        DEFAULT_SEPARATOR
    };

    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;
    for c in text.nfkd().filter(|c| !is_combining_mark(*c)) {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push(separator);
            }
            pending_separator = false;
            slug.push(c);
        } else {
            pending_separator = true;
        }
    }

    if slug.is_empty() {
        return FALLBACK_NAME.to_string();
    }
    if lowercase {
        slug.make_ascii_lowercase();
    }
    slug
}

/// `<output_directory>/<slug(title)>.mp4`
pub fn movie_output_path(config: &NamingConfig, title: &str) -> Result<PathBuf, DomainError> {
    let slug = config.segment(title)?;
    Ok(config
        .output_directory
        .join(format!("{}.{}", slug, OUTPUT_EXTENSION)))
}

/// `<output_directory>/<series>/<series>-<code>_<title>.mp4`
pub fn series_output_path(
    config: &NamingConfig,
    series_name: &str,
    episode: &EpisodeAssignment,
) -> Result<PathBuf, DomainError> {
    let code = episode
        .episode_code
        .as_deref()
        .ok_or_else(|| DomainError::Naming {
            input: format!("title {} has no episode code", episode.title_index),
        })?;

    let series_slug = config.segment(series_name)?;
    let title_slug = config.segment(&config.episode_title_strategy.resolve(episode))?;

    Ok(config.output_directory.join(&series_slug).join(format!(
        "{}-{}_{}.{}",
        series_slug, code, title_slug, OUTPUT_EXTENSION
    )))
}

/// Return `candidate`, or the first `_1`, `_2`, ... variant not in `existing`
pub fn ensure_unique_path(candidate: &Path, existing: &HashSet<PathBuf>) -> PathBuf {
    unique_path_by(candidate, |path| existing.contains(path))
}

/// Same as [`ensure_unique_path`] with a caller-supplied "taken" predicate
pub fn unique_path_by<F>(candidate: &Path, is_taken: F) -> PathBuf
where
    F: Fn(&Path) -> bool,
{
    if !is_taken(candidate) {
        return candidate.to_path_buf();
    }

    let stem = candidate
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = candidate
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned());

    (1u32..)
        .map(|counter| {
            let file_name = match &extension {
                Some(ext) => format!("{}_{}.{}", stem, counter, ext),
                None => format!("{}_{}", stem, counter),
            };
            candidate.with_file_name(file_name)
        })
        .find(|path| !is_taken(path))
        .unwrap_or_else(|| candidate.to_path_buf())
}
