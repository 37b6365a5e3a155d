//! JSON fixture inspector used for simulation runs

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::model::{DiscInfo, TitleInfo};
use crate::error::{DiscRipperError, DiscRipperResult};
use crate::ports::DiscInspector;
use crate::probe::UNKNOWN_DISC_LABEL;
use crate::utils::time::parse_duration;

#[derive(Debug, Deserialize)]
struct FixtureDisc {
    label: Option<String>,
    #[serde(default)]
    titles: Option<OneOrMany<FixtureTitle>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

#[derive(Debug, Deserialize)]
struct FixtureTitle {
    label: Option<String>,
    duration: Option<FixtureDuration>,
    #[serde(default)]
    chapters: Vec<FixtureDuration>,
}

/// Seconds as a number or a `HH:MM:SS(.fff)` string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FixtureDuration {
    Seconds(f64),
    Text(String),
}

impl FixtureDuration {
    fn seconds(&self) -> DiscRipperResult<f64> {
        match self {
            FixtureDuration::Seconds(seconds) => Ok(seconds.max(0.0)),
            FixtureDuration::Text(text) if text.trim().is_empty() => Ok(0.0),
            FixtureDuration::Text(text) => parse_duration(text),
        }
    }
}

/// Resolve a fixture reference: `.json` is appended when no extension is
/// given and relative paths are taken from `base_dir` when set.
pub fn resolve_fixture_path(fixture: &Path, base_dir: Option<&Path>) -> PathBuf {
    let mut path = fixture.to_path_buf();
    if path.extension().is_none() {
        path.set_extension("json");
    }
    match base_dir {
        Some(base) if path.is_relative() => base.join(path),
        _ => path,
    }
}

/// Parse a fixture document
pub fn disc_from_json(json: &str, source: &Path) -> DiscRipperResult<DiscInfo> {
    let fixture_error = |message: String| DiscRipperError::Fixture {
        path: source.to_path_buf(),
        message,
    };

    let payload: FixtureDisc = serde_json::from_str(json)
        .map_err(|e| fixture_error(format!("not a valid disc description: {}", e)))?;

    let titles = match payload.titles {
        Some(OneOrMany::Many(titles)) => titles,
        Some(OneOrMany::One(title)) => vec![title],
        None => Vec::new(),
    };

    let titles = titles
        .into_iter()
        .zip(1u32..)
        .map(|(title, index)| -> DiscRipperResult<TitleInfo> {
            let duration = match &title.duration {
                Some(duration) => duration.seconds()?,
                None => 0.0,
            };
            let chapters = title
                .chapters
                .iter()
                .map(FixtureDuration::seconds)
                .collect::<DiscRipperResult<Vec<f64>>>()?;

            let mut info = TitleInfo::new(index, duration).with_chapters(chapters);
            if let Some(label) = title.label.filter(|label| !label.trim().is_empty()) {
                info = info.with_label(label.trim());
            }
            Ok(info)
        })
        .collect::<DiscRipperResult<Vec<TitleInfo>>>()?;

    let label = payload
        .label
        .filter(|label| !label.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_DISC_LABEL.to_string());

    Ok(DiscInfo::new(label, titles))
}

/// Inspector reading a disc description from a JSON file
#[derive(Debug, Default, Clone)]
pub struct FixtureInspector {
    base_dir: Option<PathBuf>,
}

impl FixtureInspector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative fixture names against `base_dir`
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    /// Load the fixture at `fixture`
    pub fn load(&self, fixture: &Path) -> DiscRipperResult<DiscInfo> {
        let path = resolve_fixture_path(fixture, self.base_dir.as_deref());
        let json = fs::read_to_string(&path).map_err(|e| DiscRipperError::Fixture {
            path: path.clone(),
            message: e.to_string(),
        })?;
        disc_from_json(&json, &path)
    }
}

impl DiscInspector for FixtureInspector {
    fn name(&self) -> &str {
        "fixture"
    }

    fn inspect(&self, device: &str) -> DiscRipperResult<DiscInfo> {
        self.load(Path::new(device))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_mixed_duration_spellings() {
        let disc = disc_from_json(
            r#"{
                "label": "FIREFLY",
                "titles": [
                    {"label": "Serenity", "duration": "00:42:00", "chapters": [600, "00:32:00"]},
                    {"duration": 2640}
                ]
            }"#,
            Path::new("firefly.json"),
        )
        .unwrap();

        assert_eq!(disc.disc_label, "FIREFLY");
        assert_eq!(disc.titles[0].index, 1);
        assert_eq!(disc.titles[0].duration_seconds, 2520.0);
        assert_eq!(disc.titles[0].chapter_durations, vec![600.0, 1920.0]);
        assert_eq!(disc.titles[0].label.as_deref(), Some("Serenity"));
        assert_eq!(disc.titles[1].index, 2);
        assert!(disc.titles[1].label.is_none());
    }

    #[test]
    fn test_single_title_object_and_missing_label() {
        let disc = disc_from_json(
            r#"{"titles": {"duration": "1:35:00"}}"#,
            Path::new("movie.json"),
        )
        .unwrap();
        assert_eq!(disc.disc_label, UNKNOWN_DISC_LABEL);
        assert_eq!(disc.titles.len(), 1);
        assert_eq!(disc.titles[0].duration_seconds, 5700.0);
    }

    #[test]
    fn test_invalid_documents_are_fixture_errors() {
        let err = disc_from_json("[1, 2]", Path::new("bad.json")).unwrap_err();
        assert!(matches!(err, DiscRipperError::Fixture { .. }));

        let err = disc_from_json(
            r#"{"titles": [{"duration": "soon"}]}"#,
            Path::new("bad.json"),
        )
        .unwrap_err();
        assert!(matches!(err, DiscRipperError::InvalidTimeFormat { .. }));
    }

    #[test]
    fn test_resolve_fixture_path_adds_extension() {
        assert_eq!(
            resolve_fixture_path(Path::new("movie"), Some(Path::new("/fixtures"))),
            PathBuf::from("/fixtures/movie.json")
        );
        assert_eq!(
            resolve_fixture_path(Path::new("/abs/series.json"), Some(Path::new("/fixtures"))),
            PathBuf::from("/abs/series.json")
        );
    }

    #[test]
    fn test_load_from_base_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("sample.json"),
            r#"{"label": "SAMPLE", "titles": [{"duration": 5700}]}"#,
        )
        .unwrap();

        let inspector = FixtureInspector::with_base_dir(dir.path());
        let disc = inspector.inspect("sample").unwrap();
        assert_eq!(disc.disc_label, "SAMPLE");

        let missing = inspector.inspect("absent").unwrap_err();
        assert_eq!(missing.exit_code(), crate::error::EXIT_DISC_NOT_DETECTED);
    }
}
