// Domain rules - Movie/series classification heuristics

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Tunable thresholds steering the classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassificationThresholds {
    /// Minimum duration for a movie main title
    pub movie_main_title_minutes: f64,
    /// Ceiling on total disc runtime to still call it a movie
    pub movie_total_runtime_minutes: f64,
    pub series_min_duration_minutes: f64,
    pub series_max_duration_minutes: f64,
    /// Maximum relative deviation between an episode and the candidate mean
    pub series_gap_limit: f64,
}

impl Default for ClassificationThresholds {
    fn default() -> Self {
        Self {
            movie_main_title_minutes: 60.0,
            movie_total_runtime_minutes: 180.0,
            series_min_duration_minutes: 20.0,
            series_max_duration_minutes: 60.0,
            series_gap_limit: 0.2,
        }
    }
}

impl ClassificationThresholds {
    /// Reject non-positive limits, inverted episode windows and negative gaps
    pub fn validate(&self) -> Result<(), DomainError> {
        let positive = [
            ("movie_main_title_minutes", self.movie_main_title_minutes),
            ("movie_total_runtime_minutes", self.movie_total_runtime_minutes),
            ("series_min_duration_minutes", self.series_min_duration_minutes),
            ("series_max_duration_minutes", self.series_max_duration_minutes),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(DomainError::validation(
                    format!("{} must be positive", name),
                    value.to_string(),
                ));
            }
        }

        if self.series_min_duration_minutes > self.series_max_duration_minutes {
            return Err(DomainError::validation(
                "series_min_duration_minutes exceeds series_max_duration_minutes",
                format!(
                    "{} > {}",
                    self.series_min_duration_minutes, self.series_max_duration_minutes
                ),
            ));
        }

        if !self.series_gap_limit.is_finite() || self.series_gap_limit < 0.0 {
            return Err(DomainError::validation(
                "series_gap_limit must not be negative",
                self.series_gap_limit.to_string(),
            ));
        }
        Ok(())
    }
}

/// Business rules for deciding what kind of content a disc holds
pub struct DiscClassifier;

impl DiscClassifier {
    /// Classify a disc as a movie or a series.
    ///
    /// The movie test runs first, then the series test; when neither matches
    /// the longest title is returned as a movie with `ambiguous` set.
    pub fn classify(
        disc: &DiscInfo,
        thresholds: &ClassificationThresholds,
    ) -> Result<ClassificationResult, DomainError> {
        disc.validate()?;

        let longest = Self::longest_title(&disc.titles)
            .ok_or_else(|| DomainError::validation("disc has no titles", &disc.disc_label))?;
        let total_runtime = disc.total_runtime_seconds();

        if Self::is_movie(longest, total_runtime, thresholds) {
            debug!(
                title = longest.index,
                total_runtime, "Longest title satisfies the movie thresholds"
            );
            return Ok(Self::movie(longest, false));
        }

        if let Some(candidates) = Self::series_candidates(&disc.titles, thresholds) {
            debug!(episodes = candidates.len(), "Titles form a consistent series");
            let episodes = candidates
                .iter()
                .zip(1u32..)
                .map(|(title, number)| EpisodeAssignment::episode(title, number))
                .collect();

            return Ok(ClassificationResult {
                kind: DiscKind::Series,
                episodes,
                ambiguous: false,
            });
        }

        debug!(
            title = longest.index,
            "No heuristic matched, falling back to the longest title"
        );
        Ok(Self::movie(longest, true))
    }

    fn movie(title: &TitleInfo, ambiguous: bool) -> ClassificationResult {
        ClassificationResult {
            kind: DiscKind::Movie,
            episodes: vec![EpisodeAssignment::movie(title)],
            ambiguous,
        }
    }

    /// Longest title; ties resolve to the lowest title index
    pub fn longest_title(titles: &[TitleInfo]) -> Option<&TitleInfo> {
        titles.iter().fold(None, |best: Option<&TitleInfo>, title| match best {
            Some(current)
                if current.duration_seconds > title.duration_seconds
                    || (current.duration_seconds == title.duration_seconds
                        && current.index < title.index) =>
            {
                Some(current)
            }
            _ => Some(title),
        })
    }

    fn is_movie(
        longest: &TitleInfo,
        total_runtime: f64,
        thresholds: &ClassificationThresholds,
    ) -> bool {
        longest.duration_seconds >= thresholds.movie_main_title_minutes * 60.0
            && total_runtime <= thresholds.movie_total_runtime_minutes * 60.0
    }

    /// Titles inside the episode window, in index order, if they are uniform enough
    fn series_candidates<'a>(
        titles: &'a [TitleInfo],
        thresholds: &ClassificationThresholds,
    ) -> Option<Vec<&'a TitleInfo>> {
        let min = thresholds.series_min_duration_minutes * 60.0;
        let max = thresholds.series_max_duration_minutes * 60.0;

        let mut candidates: Vec<&TitleInfo> = titles
            .iter()
            .filter(|title| title.duration_seconds >= min && title.duration_seconds <= max)
            .collect();

        if candidates.len() < 2 {
            return None;
        }

        let mean = candidates.iter().map(|t| t.duration_seconds).sum::<f64>()
            / candidates.len() as f64;
        if mean <= 0.0 {
            return None;
        }

        let uniform = candidates
            .iter()
            .all(|title| relative_deviation(title.duration_seconds, mean) <= thresholds.series_gap_limit);
        if !uniform {
            return None;
        }

        candidates.sort_by_key(|title| title.index);
        Some(candidates)
    }
}

/// Fractional deviation `|d - mean| / mean`; infinite for a non-positive mean
pub fn relative_deviation(duration: f64, mean: f64) -> f64 {
    if mean <= 0.0 {
        return f64::INFINITY;
    }
    (duration - mean).abs() / mean
}

/// Convenience wrapper around [`DiscClassifier::classify`]
pub fn classify(
    disc: &DiscInfo,
    thresholds: &ClassificationThresholds,
) -> Result<ClassificationResult, DomainError> {
    DiscClassifier::classify(disc, thresholds)
}
