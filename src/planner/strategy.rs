//! Rip plan construction

use std::collections::HashSet;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::domain::errors::DomainError;
use crate::domain::model::*;
use crate::naming::{
    ensure_unique_path, movie_output_path, series_output_path, NamingConfig, FALLBACK_NAME,
};
use crate::planner::{RipPlan, RipPlanItem, ToolSelection};
use crate::ports::ToolDiscovery;

/// Planner turning a classification into ordered rip actions
pub struct RipPlanner<'a> {
    discovery: &'a dyn ToolDiscovery,
    title_override: Option<String>,
}

impl<'a> RipPlanner<'a> {
    /// Create a planner backed by `discovery`
    pub fn new(discovery: &'a dyn ToolDiscovery) -> Self {
        Self {
            discovery,
            title_override: None,
        }
    }

    /// Use `title` as the movie or series name instead of disc labels
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title_override = title
            .map(|title| title.trim().to_string())
            .filter(|title| !title.is_empty());
        self
    }

    /// Build the plan.
    ///
    /// Items follow the classifier's episode order. Destinations are made
    /// unique within the plan; the filesystem is never consulted. A missing
    /// backend is recorded on each item, not returned as an error.
    ///
    /// # Errors
    ///
    /// Only invariant violations: [`DomainError::UnknownTitle`] when an
    /// episode names a title absent from `disc`, and [`DomainError::Naming`]
    /// when a path segment sanitizes to nothing. A classification produced
    /// by [`classify`](crate::domain::rules::classify) for the same disc
    /// never triggers either.
    pub fn build_plan(
        &self,
        classification: &ClassificationResult,
        disc: &DiscInfo,
        naming: &NamingConfig,
        dry_run: bool,
    ) -> Result<RipPlan, DomainError> {
        let tool = ToolSelection::from_available(&self.discovery.available_backends());
        debug!(%tool, "Selected ripping backend");

        let mut taken: HashSet<PathBuf> = HashSet::with_capacity(classification.episodes.len());
        let mut items = Vec::with_capacity(classification.episodes.len());

        for episode in &classification.episodes {
            let title = disc
                .title(episode.title_index)
                .ok_or(DomainError::UnknownTitle {
                    index: episode.title_index,
                })?;

            let candidate = match classification.kind {
                DiscKind::Movie => movie_output_path(naming, &self.movie_name(title, disc))?,
                DiscKind::Series => {
                    series_output_path(naming, &self.series_name(disc), episode)?
                }
            };

            let destination_path = ensure_unique_path(&candidate, &taken);
            if destination_path != candidate {
                debug!(
                    title = title.index,
                    candidate = %candidate.display(),
                    resolved = %destination_path.display(),
                    "Destination collided with an earlier item"
                );
            }
            taken.insert(destination_path.clone());

            items.push(RipPlanItem {
                title_index: title.index,
                destination_path,
                episode_code: episode.episode_code.clone(),
                tool,
                dry_run,
            });
        }

        info!(
            event = "planned",
            kind = %classification.kind,
            items = items.len(),
            %tool,
            dry_run,
            "Rip plan ready"
        );

        Ok(RipPlan {
            kind: classification.kind,
            ambiguous: classification.ambiguous,
            items,
        })
    }

    fn movie_name(&self, title: &TitleInfo, disc: &DiscInfo) -> String {
        self.title_override
            .as_deref()
            .or_else(|| title.display_label())
            .or_else(|| non_blank(&disc.disc_label))
            .unwrap_or(FALLBACK_NAME)
            .to_string()
    }

    fn series_name(&self, disc: &DiscInfo) -> String {
        self.title_override
            .as_deref()
            .or_else(|| non_blank(&disc.disc_label))
            .unwrap_or(FALLBACK_NAME)
            .to_string()
    }
}

fn non_blank(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Build a rip plan without a title override
///
/// Errors only on invariant violations; see [`RipPlanner::build_plan`].
pub fn build_plan(
    classification: &ClassificationResult,
    disc: &DiscInfo,
    naming: &NamingConfig,
    discovery: &dyn ToolDiscovery,
    dry_run: bool,
) -> Result<RipPlan, DomainError> {
    RipPlanner::new(discovery).build_plan(classification, disc, naming, dry_run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rules::{classify, ClassificationThresholds};
    use crate::planner::Backend;
    use std::path::Path;

    struct FixedTools(Vec<&'static str>);

    impl ToolDiscovery for FixedTools {
        fn locate(&self, command: &str) -> Option<PathBuf> {
            self.0
                .iter()
                .find(|name| **name == command)
                .map(|name| Path::new("/usr/bin").join(name))
        }
    }

    fn naming() -> NamingConfig {
        NamingConfig::new("/srv/rips").with_lowercase(true)
    }

    fn series_disc() -> DiscInfo {
        DiscInfo::new(
            "Firefly",
            [42.0, 44.0, 41.0, 43.0]
                .iter()
                .enumerate()
                .map(|(i, m)| TitleInfo::new(i as u32 + 1, m * 60.0))
                .collect(),
        )
    }

    #[test]
    fn test_dry_run_movie_plan() {
        let disc = DiscInfo::new("BLADE_RUNNER", vec![TitleInfo::new(1, 95.0 * 60.0)]);
        let classification = classify(&disc, &ClassificationThresholds::default()).unwrap();
        let tools = FixedTools(vec!["ffmpeg"]);

        let plan = build_plan(&classification, &disc, &naming(), &tools, true).unwrap();
        assert_eq!(plan.len(), 1);
        let item = &plan.items[0];
        assert_eq!(item.destination_path, PathBuf::from("/srv/rips/blade_runner.mp4"));
        assert!(item.dry_run);
        assert!(item.episode_code.is_none());
        assert_eq!(item.tool, ToolSelection::Selected(Backend::Ffmpeg));
        assert_eq!(plan.output_root(), Some(Path::new("/srv/rips")));
    }

    #[test]
    fn test_series_plan_keeps_episode_order() {
        let disc = series_disc();
        let classification = classify(&disc, &ClassificationThresholds::default()).unwrap();
        let tools = FixedTools(vec!["dvdbackup"]);

        let plan = build_plan(&classification, &disc, &naming(), &tools, false).unwrap();
        let codes: Vec<_> = plan
            .items
            .iter()
            .map(|item| item.episode_code.clone().unwrap_or_default())
            .collect();
        assert_eq!(codes, vec!["s01e01", "s01e02", "s01e03", "s01e04"]);
        assert_eq!(
            plan.items[0].destination_path,
            PathBuf::from("/srv/rips/firefly/firefly-s01e01_episode_01.mp4")
        );
        assert_eq!(plan.output_root(), Some(Path::new("/srv/rips/firefly")));
        assert!(!plan.is_dry_run());
    }

    #[test]
    fn test_destinations_are_unique_within_plan() {
        let disc = DiscInfo::new(
            "Show",
            vec![
                TitleInfo::new(1, 1500.0).with_label("Pilot"),
                TitleInfo::new(2, 1500.0).with_label("Pilot"),
            ],
        );
        let classification = ClassificationResult {
            kind: DiscKind::Series,
            episodes: vec![
                EpisodeAssignment::episode(&disc.titles[0], 1),
                EpisodeAssignment::episode(&disc.titles[1], 1),
            ],
            ambiguous: false,
        };

        let plan = build_plan(&classification, &disc, &naming(), &FixedTools(vec![]), true).unwrap();
        assert_eq!(
            plan.items[1].destination_path,
            PathBuf::from("/srv/rips/show/show-s01e01_pilot_1.mp4")
        );
        assert_ne!(plan.items[0].destination_path, plan.items[1].destination_path);
    }

    #[test]
    fn test_missing_backend_is_recorded_not_raised() {
        let disc = series_disc();
        let classification = classify(&disc, &ClassificationThresholds::default()).unwrap();

        let plan = build_plan(&classification, &disc, &naming(), &FixedTools(vec![]), false).unwrap();
        assert!(plan
            .items
            .iter()
            .all(|item| item.tool == ToolSelection::NoBackendAvailable));
    }

    #[test]
    fn test_dvdbackup_preferred_over_ffmpeg() {
        let tools = FixedTools(vec!["ffmpeg", "dvdbackup"]);
        assert_eq!(
            ToolSelection::from_available(&tools.available_backends()),
            ToolSelection::Selected(Backend::Dvdbackup)
        );
    }

    #[test]
    fn test_unknown_title_is_invariant_violation() {
        let disc = DiscInfo::new("X", vec![TitleInfo::new(1, 6000.0)]);
        let classification = ClassificationResult {
            kind: DiscKind::Movie,
            episodes: vec![EpisodeAssignment::movie(&TitleInfo::new(9, 6000.0))],
            ambiguous: false,
        };

        let result = build_plan(&classification, &disc, &naming(), &FixedTools(vec![]), true);
        assert_eq!(result, Err(DomainError::UnknownTitle { index: 9 }));
    }

    #[test]
    fn test_title_override_names_movie() {
        let disc = DiscInfo::new("DISC_LABEL", vec![TitleInfo::new(1, 6000.0).with_label("Main")]);
        let classification = classify(&disc, &ClassificationThresholds::default()).unwrap();
        let tools = FixedTools(vec![]);

        let plan = RipPlanner::new(&tools)
            .with_title(Some("The Thing".to_string()))
            .build_plan(&classification, &disc, &naming(), true)
            .unwrap();
        assert_eq!(plan.items[0].destination_path, PathBuf::from("/srv/rips/the_thing.mp4"));

        let plan = build_plan(&classification, &disc, &naming(), &tools, true).unwrap();
        assert_eq!(plan.items[0].destination_path, PathBuf::from("/srv/rips/main.mp4"));
    }
}
