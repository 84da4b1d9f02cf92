//! Error types for phishing-detector

use std::path::PathBuf;
use thiserror::Error;

use crate::Label;

/// Result type alias for training and inference operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while preparing data, fitting, persisting or loading artifacts
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required dataset column is absent from the CSV header
    #[error("Column '{0}' not found in dataset header")]
    MissingColumn(String),

    /// One label class has no rows left after cleaning
    #[error(
        "No samples found for {label} emails after cleaning \
         (phishing: {phishing}, legitimate: {legitimate}); check label values and data loading"
    )]
    EmptyClass {
        label: Label,
        phishing: usize,
        legitimate: usize,
    },

    /// Vectorizer parameters are inconsistent
    #[error("Invalid vectorizer parameters: {0}")]
    InvalidParams(String),

    /// Document-frequency pruning removed every term
    #[error("After pruning, no terms remain; try a lower min_df or a higher max_df")]
    EmptyVocabulary,

    /// Training input is malformed
    #[error("Invalid training input: {0}")]
    InvalidInput(String),

    /// Naive Bayes fitting failed
    #[error("Training failed: {0}")]
    Training(#[from] linfa_bayes::NaiveBayesError),

    /// Artifact serialization failed
    #[error("Failed to serialize artifact {path:?}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: rmp_serde::encode::Error,
    },

    /// Artifact is present but cannot be decoded
    #[error("Failed to deserialize artifact {path:?}: {source}")]
    Deserialize {
        path: PathBuf,
        #[source]
        source: rmp_serde::decode::Error,
    },

    /// Artifact file does not exist
    #[error("Artifact not found: {0:?}")]
    ArtifactNotFound(PathBuf),

    /// Vectorizer and classifier disagree on the feature space
    #[error("Vectorizer produces {vocabulary} features but classifier expects {classifier}")]
    ArtifactMismatch { vocabulary: usize, classifier: usize },

    /// Artifact decoded but its tables disagree with each other
    #[error("Inconsistent {artifact}: {detail}")]
    InconsistentArtifact {
        artifact: &'static str,
        detail: String,
    },
}
