//! Engine configuration.
//!
//! # Responsibility
//! - Hold tunables for radar validation and persistence naming.
//! - Load configuration from an optional JSON file.
//!
//! # Invariants
//! - A missing config file yields `RadarConfig::default()`.
//! - A present but malformed file is an error, never silently defaulted.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Default persisted document name.
pub const DEFAULT_DOCUMENT_KEY: &str = "onsRadarSkeleton.json";
/// Default upper bound on entries accepted in one submission.
pub const DEFAULT_MAX_ENTRIES_PER_SUBMISSION: usize = 5000;
/// Ring ids of the review workflow, accepted unless a config clears them.
pub const DEFAULT_PSEUDO_RING_IDS: [&str; 2] = ["ignore", "review"];
/// Default persisted banner document name.
pub const DEFAULT_BANNER_DOCUMENT_KEY: &str = "messages.json";

/// Radar engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarConfig {
    /// Ring ids accepted in timelines without a declared ring. Entries
    /// parked in the review workflow sit in `review` or `ignore`; an empty
    /// list in a config file turns this off.
    pub pseudo_ring_ids: Vec<String>,
    /// Name of the persisted radar document.
    pub document_key: String,
    /// Name of the persisted site-banner document.
    pub banner_document_key: String,
    pub max_entries_per_submission: usize,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            pseudo_ring_ids: DEFAULT_PSEUDO_RING_IDS.map(String::from).to_vec(),
            document_key: DEFAULT_DOCUMENT_KEY.to_string(),
            banner_document_key: DEFAULT_BANNER_DOCUMENT_KEY.to_string(),
            max_entries_per_submission: DEFAULT_MAX_ENTRIES_PER_SUBMISSION,
        }
    }
}

impl RadarConfig {
    /// Default config without pseudo rings: every timeline ring must be
    /// declared.
    pub fn strict() -> Self {
        Self {
            pseudo_ring_ids: Vec::new(),
            ..Self::default()
        }
    }

    /// Adds pseudo ring ids, skipping blanks and duplicates.
    pub fn with_pseudo_rings<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for id in ids {
            let id = id.into().trim().to_string();
            if !id.is_empty() && !self.pseudo_ring_ids.contains(&id) {
                self.pseudo_ring_ids.push(id);
            }
        }
        self
    }
}

/// Configuration load failure.
#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
    Invalid(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "invalid config `{}`: {source}", path.display())
            }
            Self::Invalid(details) => write!(f, "invalid config: {details}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Invalid(_) => None,
        }
    }
}

/// Loads configuration from `path`, falling back to defaults when absent.
pub fn load_radar_config(path: impl AsRef<Path>) -> Result<RadarConfig, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(RadarConfig::default());
    }

    let bytes = std::fs::read(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: RadarConfig =
        serde_json::from_slice(&bytes).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    if config.document_key.trim().is_empty() {
        return Err(ConfigError::Invalid("document_key must not be empty"));
    }
    if config.banner_document_key.trim().is_empty() {
        return Err(ConfigError::Invalid("banner_document_key must not be empty"));
    }
    if config.banner_document_key == config.document_key {
        return Err(ConfigError::Invalid(
            "banner_document_key must differ from document_key",
        ));
    }
    if config.max_entries_per_submission == 0 {
        return Err(ConfigError::Invalid(
            "max_entries_per_submission must be positive",
        ));
    }

    let pseudo = config.pseudo_ring_ids.clone();
    Ok(RadarConfig {
        pseudo_ring_ids: Vec::new(),
        ..config
    }
    .with_pseudo_rings(pseudo))
}

#[cfg(test)]
mod tests {
    use super::{
        load_radar_config, ConfigError, RadarConfig, DEFAULT_BANNER_DOCUMENT_KEY,
        DEFAULT_DOCUMENT_KEY,
    };

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_radar_config(dir.path().join("absent.json")).unwrap();
        assert_eq!(config, RadarConfig::default());
        assert_eq!(config.document_key, DEFAULT_DOCUMENT_KEY);
        assert_eq!(config.banner_document_key, DEFAULT_BANNER_DOCUMENT_KEY);
        assert_eq!(config.pseudo_ring_ids, vec!["ignore", "review"]);
    }

    #[test]
    fn empty_pseudo_ring_list_opts_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("radar.json");
        std::fs::write(&path, r#"{"pseudo_ring_ids": []}"#).unwrap();

        let config = load_radar_config(&path).unwrap();
        assert_eq!(config, RadarConfig::strict());
        assert!(config.pseudo_ring_ids.is_empty());
    }

    #[test]
    fn partial_file_keeps_defaults_and_normalizes_pseudo_rings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("radar.json");
        std::fs::write(&path, r#"{"pseudo_ring_ids": ["review", " ", "review", "ignore"]}"#)
            .unwrap();

        let config = load_radar_config(&path).unwrap();
        assert_eq!(config.pseudo_ring_ids, vec!["review", "ignore"]);
        assert_eq!(config.document_key, DEFAULT_DOCUMENT_KEY);
    }

    #[test]
    fn malformed_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("radar.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            load_radar_config(&path).unwrap_err(),
            ConfigError::Parse { .. }
        ));

        std::fs::write(&path, r#"{"max_entries_per_submission": 0}"#).unwrap();
        assert!(matches!(
            load_radar_config(&path).unwrap_err(),
            ConfigError::Invalid(_)
        ));

        std::fs::write(&path, r#"{"banner_document_key": "onsRadarSkeleton.json"}"#).unwrap();
        assert!(matches!(
            load_radar_config(&path).unwrap_err(),
            ConfigError::Invalid(_)
        ));
    }
}
