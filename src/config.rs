use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::analysis::autocorr::DEFAULT_MAX_LAG;
use crate::analysis::psd::{MAX_SMOOTHING_LEVEL, MIN_SMOOTHING_LEVEL};
use crate::data::loader::IngestOptions;

// ---------------------------------------------------------------------------
// Analysis configuration
// ---------------------------------------------------------------------------

/// Host-side analysis settings. Every field has a default, so a JSON file
/// only needs the keys it changes:
///
/// ```json
/// {
///   "smoothing_level": 4,
///   "max_lag": 2000,
///   "ingest": { "comment": "#" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Welch smoothing, 1 (finest resolution) to 10 (smoothest).
    pub smoothing_level: u8,
    /// Maximum number of correlogram lags.
    pub max_lag: usize,
    /// Channels are truncated to this many samples before autocorrelation.
    pub max_autocorr_samples: usize,
    pub ingest: IngestOptions,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            smoothing_level: MIN_SMOOTHING_LEVEL,
            max_lag: DEFAULT_MAX_LAG,
            max_autocorr_samples: DEFAULT_MAX_LAG,
            ingest: IngestOptions::default(),
        }
    }
}

impl AnalysisConfig {
    /// Read and validate a JSON config file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: AnalysisConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the estimators and the reader cannot honour.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_SMOOTHING_LEVEL..=MAX_SMOOTHING_LEVEL).contains(&self.smoothing_level) {
            bail!(
                "smoothing_level must be in {MIN_SMOOTHING_LEVEL}..={MAX_SMOOTHING_LEVEL}, got {}",
                self.smoothing_level
            );
        }
        if self.max_lag == 0 {
            bail!("max_lag must be at least 1");
        }
        if self.max_autocorr_samples == 0 {
            bail!("max_autocorr_samples must be at least 1");
        }
        if !self.ingest.delimiter.is_ascii() {
            bail!("delimiter must be ASCII, got {:?}", self.ingest.delimiter);
        }
        if !self.ingest.comment.is_ascii() {
            bail!("comment marker must be ASCII, got {:?}", self.ingest.comment);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.smoothing_level, 1);
        assert_eq!(config.max_lag, 10_000);
        assert_eq!(config.ingest.delimiter, ',');
        assert_eq!(config.ingest.comment, '%');
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{ "smoothing_level": 7, "ingest": { "delimiter": ";" } }"#)
                .unwrap();
        assert_eq!(config.smoothing_level, 7);
        assert_eq!(config.max_lag, 10_000);
        assert_eq!(config.ingest.delimiter, ';');
        assert_eq!(config.ingest.metadata_markers, "%#;[");
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let config = AnalysisConfig {
            smoothing_level: 11,
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());

        let config = AnalysisConfig {
            max_lag: 0,
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prism.json");
        std::fs::write(&path, r#"{ "max_lag": 250 }"#).unwrap();
        let config = AnalysisConfig::from_json_file(&path).unwrap();
        assert_eq!(config.max_lag, 250);

        std::fs::write(&path, r#"{ "smoothing_level": 0 }"#).unwrap();
        assert!(AnalysisConfig::from_json_file(&path).is_err());
    }
}
