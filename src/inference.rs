//! Immutable inference context shared by the HTTP handler.

use crate::artifacts::ArtifactPaths;
use crate::classifier::PhishingClassifier;
use crate::dataset::Label;
use crate::error::{Error, Result};
use crate::vectorizer::TfidfVectorizer;

/// Fitted vectorizer and classifier over the same feature space.
pub struct InferenceContext {
    vectorizer: TfidfVectorizer,
    classifier: PhishingClassifier,
}

impl InferenceContext {
    /// Rejects a pair whose tables disagree, so `classify` never indexes out of range.
    pub fn new(vectorizer: TfidfVectorizer, classifier: PhishingClassifier) -> Result<Self> {
        vectorizer.check_consistency()?;
        classifier.check_consistency()?;
        if vectorizer.vocabulary_size() != classifier.n_features() {
            return Err(Error::ArtifactMismatch {
                vocabulary: vectorizer.vocabulary_size(),
                classifier: classifier.n_features(),
            });
        }
        Ok(Self {
            vectorizer,
            classifier,
        })
    }

    /// Loads both persisted artifacts.
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        let (vectorizer, classifier) = paths.load()?;
        Self::new(vectorizer, classifier)
    }

    pub fn save(&self, paths: &ArtifactPaths) -> Result<()> {
        paths.save(&self.vectorizer, &self.classifier)
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn classifier(&self) -> &PhishingClassifier {
        &self.classifier
    }

    /// Vectorizes `email` with the fitted vectorizer and predicts its label.
    pub fn classify(&self, email: &str) -> Label {
        let features = self.vectorizer.transform(email);
        self.classifier.predict(&features)
    }
}
