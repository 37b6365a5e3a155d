//! Episode title strategies
//!
//! A strategy turns an [`EpisodeAssignment`] into the free-text part of an
//! episode file name. The result is sanitized by the naming engine afterwards.

use std::fmt;

use crate::domain::errors::DomainError;
use crate::domain::model::EpisodeAssignment;

/// Signature of a registered custom title function
pub type CustomTitleFn = fn(&EpisodeAssignment) -> String;

/// Named entry in the custom strategy registry
#[derive(Clone, Copy)]
pub struct CustomTitleStrategy {
    pub name: &'static str,
    pub resolve: CustomTitleFn,
}

impl fmt::Debug for CustomTitleStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomTitleStrategy")
            .field("name", &self.name)
            .finish()
    }
}

impl PartialEq for CustomTitleStrategy {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// Statically registered custom strategies, selected as `custom:<name>`
pub const CUSTOM_TITLE_STRATEGIES: &[CustomTitleStrategy] = &[
    CustomTitleStrategy {
        name: "title-index",
        resolve: title_index_name,
    },
    CustomTitleStrategy {
        name: "episode-code",
        resolve: episode_code_name,
    },
];

fn title_index_name(episode: &EpisodeAssignment) -> String {
    format!("Title {:02}", episode.title_index)
}

fn episode_code_name(episode: &EpisodeAssignment) -> String {
    episode
        .episode_code
        .clone()
        .unwrap_or_else(|| title_index_name(episode))
}

/// Look up a custom strategy by name
pub fn find_custom_strategy(name: &str) -> Option<CustomTitleStrategy> {
    CUSTOM_TITLE_STRATEGIES
        .iter()
        .find(|strategy| strategy.name == name)
        .copied()
}

/// How the title part of an episode file name is chosen
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EpisodeTitleStrategy {
    /// Title hint when present, else `Episode NN`
    #[default]
    Label,
    /// Always `Episode NN`
    EpisodeNumber,
    Custom(CustomTitleStrategy),
}

impl EpisodeTitleStrategy {
    /// Parse the configuration spelling: `label`, `episode-number` or `custom:<name>`
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let value = value.trim();
        match value {
            "label" => Ok(Self::Label),
            "episode-number" | "episode_number" => Ok(Self::EpisodeNumber),
            _ => {
                let name = value.strip_prefix("custom:").ok_or_else(|| {
                    DomainError::validation("unknown episode title strategy", value)
                })?;
                find_custom_strategy(name.trim())
                    .map(Self::Custom)
                    .ok_or_else(|| {
                        DomainError::validation("no custom title strategy registered as", name)
                    })
            }
        }
    }

    /// Produce the unsanitized title text for `episode`
    pub fn resolve(&self, episode: &EpisodeAssignment) -> String {
        match self {
            Self::Label => episode
                .title_hint
                .as_deref()
                .map(str::trim)
                .filter(|hint| !hint.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| episode_number_name(episode)),
            Self::EpisodeNumber => episode_number_name(episode),
            Self::Custom(custom) => (custom.resolve)(episode),
        }
    }
}

impl fmt::Display for EpisodeTitleStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label => f.write_str("label"),
            Self::EpisodeNumber => f.write_str("episode-number"),
            Self::Custom(custom) => write!(f, "custom:{}", custom.name),
        }
    }
}

fn episode_number_name(episode: &EpisodeAssignment) -> String {
    let number = episode.episode_number.unwrap_or(episode.title_index);
    format!("Episode {:02}", number)
}
