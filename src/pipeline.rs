//! Training pipeline and startup-mode selection.

use tracing::info;

use crate::artifacts::ArtifactPaths;
use crate::classifier::PhishingClassifier;
use crate::config::{AppConfig, TrainingMode};
use crate::dataset::{self, EmailRecord, Label};
use crate::error::Result;
use crate::inference::InferenceContext;
use crate::metrics::ClassificationReport;

/// Number of informative features logged after training.
const TOP_FEATURES: usize = 10;

/// In-memory result of a training run.
pub struct TrainingOutcome {
    pub context: InferenceContext,
    pub report: ClassificationReport,
    pub train_size: usize,
    pub test_size: usize,
}

/// Trains from the configured CSV and persists both artifacts.
pub fn train(config: &AppConfig) -> Result<TrainingOutcome> {
    let prepared = dataset::load_csv(&config.dataset.path, &config.dataset)?;
    train_records(prepared.records, config)
}

/// Balances, splits, fits, evaluates and saves. Nothing is written if any step before saving fails.
pub fn train_records(records: Vec<EmailRecord>, config: &AppConfig) -> Result<TrainingOutcome> {
    config.validate()?;
    let seed = config.training.seed;

    let balanced = dataset::balance(records, seed)?;
    let split = dataset::train_test_split(&balanced, config.training.test_ratio, seed);
    info!(
        "✂️  Split {} samples into {} train / {} test",
        balanced.len(),
        split.train.len(),
        split.test.len()
    );

    let train_texts: Vec<&str> = split.train.iter().map(|r| r.content.as_str()).collect();
    let test_texts: Vec<&str> = split.test.iter().map(|r| r.content.as_str()).collect();
    let train_labels: Vec<Label> = split.train.iter().map(|r| r.label).collect();
    let test_labels: Vec<Label> = split.test.iter().map(|r| r.label).collect();

    let vectorizer = config.vectorizer.fit(&train_texts)?;
    let x_train = vectorizer.transform_batch(&train_texts);
    let x_test = vectorizer.transform_batch(&test_texts);

    info!("🧠 Training Multinomial Naive Bayes on {} emails...", x_train.len());
    let classifier = PhishingClassifier::train(
        &x_train,
        &train_labels,
        vectorizer.vocabulary_size(),
        config.training.batch_size,
    )?;

    let predictions = classifier.predict_batch(&x_test);
    let report = ClassificationReport::from_predictions(&test_labels, &predictions)?;
    info!("📊 Evaluation on {} held-out emails:\n{}", test_labels.len(), report);

    info!("Most informative phishing features (weight ratio):");
    for feature in classifier.top_features(&vectorizer, TOP_FEATURES) {
        info!(
            "{:>25} | phishing: {:>8.2}, legitimate: {:>8.2}, ratio(p/l): {:.2}",
            feature.term, feature.phishing_weight, feature.legitimate_weight, feature.ratio
        );
    }

    let context = InferenceContext::new(vectorizer, classifier)?;
    context.save(&ArtifactPaths::new(&config.artifacts))?;

    Ok(TrainingOutcome {
        context,
        report,
        train_size: split.train.len(),
        test_size: split.test.len(),
    })
}

/// Builds the inference context according to `training.mode`.
pub fn prepare_context(config: &AppConfig) -> Result<InferenceContext> {
    config.validate()?;
    let paths = ArtifactPaths::new(&config.artifacts);

    match config.training.mode {
        TrainingMode::Always => {
            info!("🧠 Training model from {:?}", config.dataset.path);
            train(config).map(|outcome| outcome.context)
        }
        TrainingMode::IfStale if paths.is_stale(&config.dataset.path) => {
            info!("🧠 Training model (CSV is newer or artifacts missing)...");
            train(config).map(|outcome| outcome.context)
        }
        TrainingMode::IfStale | TrainingMode::Never => {
            info!("📦 Loading persisted artifacts from {:?}", config.artifacts.dir);
            InferenceContext::load(&paths)
        }
    }
}
