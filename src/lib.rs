//! # phishing-detector 🎣🛡️
//!
//! Classify emails as phishing or legitimate using TF-IDF features and a
//! Multinomial Naive Bayes classifier, served over HTTP.
//!
//! The training pipeline reads a labeled CSV, drops unusable rows, balances the
//! two classes, fits a [`TfidfVectorizer`] on the training split, trains a
//! [`linfa-bayes`](https://crates.io/crates/linfa-bayes) model and reports
//! precision/recall/F1 on the held-out split. Both fitted artifacts are written
//! to disk and kept in memory as an immutable [`InferenceContext`] for the
//! `POST /predict` endpoint.
//!
//! ## Features
//! - Word unigram + bigram TF-IDF with English stop-word removal and `min_df`/`max_df` pruning
//! - Multinomial Naive Bayes fitted in bounded dense batches
//! - Per-class classification report and most informative features
//! - Artifact persistence with `rmp-serde` (MessagePack)
//! - Retrain only when the CSV is newer than the artifacts (`if_stale` mode)
//!
//! ## Example
//! ```no_run
//! use phishing_detector::{AppConfig, pipeline};
//!
//! let config = AppConfig::default();
//! let outcome = pipeline::train(&config).unwrap();
//! let label = outcome.context.classify("Free money now, click here!!!");
//! println!("{label}\n{}", outcome.report);
//! ```

pub mod artifacts;
pub mod classifier;
pub mod config;
pub mod dataset;
pub mod error;
pub mod inference;
pub mod metrics;
pub mod pipeline;
pub mod server;
mod stop_words;
pub mod vectorizer;

pub use artifacts::ArtifactPaths;
pub use classifier::PhishingClassifier;
pub use config::{AppConfig, TrainingMode};
pub use dataset::{EmailRecord, Label, train_test_split};
pub use error::{Error, Result};
pub use inference::InferenceContext;
pub use metrics::ClassificationReport;
pub use vectorizer::{FeatureVector, TfidfVectorizer, VectorizerParams};
