//! Ledger configuration.
//!
//! Values come from an optional JSON file; command-line flags override
//! them, and anything left unset falls back to [`Config::default`].

use std::path::{Path, PathBuf};

use serde::Deserialize;

use contact_ledger_common::export::ExportFormat;
use contact_ledger_common::handoff::HandoffConfig;
use contact_ledger_common::retention::RetentionPolicy;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid config {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the storage scope.
    pub data_dir: PathBuf,

    pub retention: RetentionPolicy,

    pub export_format: ExportFormat,

    /// Where hand-offs point.
    pub handoff: HandoffConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            retention: RetentionPolicy::Unbounded,
            export_format: ExportFormat::Escaped,
            handoff: HandoffConfig::default(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("contact-ledger")
}

impl Config {
    /// Load `path` if given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if config.retention == RetentionPolicy::MaxCount(0) {
            return Err(ConfigError::Invalid {
                path: path.to_path_buf(),
                reason: "retention max_count must be at least 1".to_string(),
            });
        }
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("ledger.json");
        std::fs::write(
            &path,
            r#"{
                "data_dir": "/var/lib/ledger",
                "retention": {"kind": "max_age_days", "limit": 90},
                "handoff": {"telegram_handle": "studio"}
            }"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/ledger"));
        assert_eq!(config.retention, RetentionPolicy::MaxAgeDays(90));
        assert_eq!(config.export_format, ExportFormat::Escaped);
        assert_eq!(config.handoff.telegram_handle, "studio");
        assert_eq!(config.handoff.email, HandoffConfig::default().email);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = Config::load(Some(Path::new("/nonexistent/ledger.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_zero_max_count_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("ledger.json");
        std::fs::write(&path, r#"{"retention": {"kind": "max_count", "limit": 0}}"#).unwrap();
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));

        std::fs::write(&path, r#"{"retention": {"kind": "max_count", "limit": 1}}"#).unwrap();
        assert_eq!(
            Config::load(Some(&path)).unwrap().retention,
            RetentionPolicy::MaxCount(1)
        );
    }

    #[test]
    fn test_no_file_means_defaults() {
        assert_eq!(Config::load(None).unwrap(), Config::default());
    }
}
