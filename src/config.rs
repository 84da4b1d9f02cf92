//! Configuration for phishing-detector

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::vectorizer::VectorizerParams;

/// Environment variable consulted when no config path is passed on the command line
pub const CONFIG_ENV_VAR: &str = "PHISHING_DETECTOR_CONFIG";

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub dataset: DatasetConfig,
    pub training: TrainingConfig,
    pub vectorizer: VectorizerParams,
    pub artifacts: ArtifactConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address (e.g., "127.0.0.1:5000")
    pub listen_addr: String,
}

/// Where the labeled CSV lives and how to read it
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub path: PathBuf,
    /// Header of the column holding the email body
    pub text_column: String,
    /// Header of the column holding the category string
    pub label_column: String,
    /// Category string mapped to [`crate::Label::Legitimate`]
    pub legitimate_label: String,
    /// Category string mapped to [`crate::Label::Phishing`]
    pub phishing_label: String,
}

/// How the inference context is obtained at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingMode {
    /// Train from the CSV on every start
    #[default]
    Always,
    /// Train only when artifacts are missing or older than the CSV
    IfStale,
    /// Load persisted artifacts only
    Never,
}

/// Training pipeline configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub mode: TrainingMode,
    /// Seed for class balancing and the train/test split
    pub seed: u64,
    /// Fraction of the balanced dataset held out for evaluation
    pub test_ratio: f64,
    /// Rows densified per incremental fit step
    pub batch_size: usize,
}

/// Artifact locations
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ArtifactConfig {
    pub dir: PathBuf,
    pub model_file: String,
    pub vectorizer_file: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:5000".to_string(),
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("Phishing_Email.csv"),
            text_column: "Email Text".to_string(),
            label_column: "Email Type".to_string(),
            legitimate_label: "Safe Email".to_string(),
            phishing_label: "Phishing Email".to_string(),
        }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            mode: TrainingMode::Always,
            seed: 42,
            test_ratio: 0.3,
            batch_size: 256,
        }
    }
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("model"),
            model_file: "phishing_model.msgpack".to_string(),
            vectorizer_file: "vectorizer.msgpack".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file {:?}: {}", path, e)))?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text; absent fields take their defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.listen_addr.trim().is_empty() {
            return Err(Error::Config("server.listen_addr is empty".to_string()));
        }

        let ratio = self.training.test_ratio;
        if !(ratio > 0.0 && ratio < 1.0) {
            return Err(Error::Config(format!(
                "training.test_ratio must be in (0, 1), got {}",
                ratio
            )));
        }

        if self.training.batch_size == 0 {
            return Err(Error::Config("training.batch_size must be positive".to_string()));
        }

        if self.dataset.legitimate_label == self.dataset.phishing_label {
            return Err(Error::Config(
                "dataset.legitimate_label and dataset.phishing_label must differ".to_string(),
            ));
        }

        self.vectorizer.validate()
    }
}
