//! Multinomial Naive Bayes phishing classifier over TF-IDF features.

use linfa::prelude::*;
use linfa::ParamGuard;
use linfa::traits::FitWith;
use linfa_bayes::MultinomialNb;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::dataset::Label;
use crate::error::{Error, Result};
use crate::vectorizer::{FeatureVector, TfidfVectorizer, densify};

/// Rows densified at once when predicting many vectors.
const PREDICT_BATCH: usize = 256;

/// Trained classifier and the per-class feature weights it saw.
#[derive(Serialize, Deserialize)]
pub struct PhishingClassifier {
    model: MultinomialNb<f64, usize>,
    n_features: usize,
    weights_phishing: Vec<f64>,
    weights_legitimate: Vec<f64>,
}

/// A term with its accumulated weight in each class.
#[derive(Debug, Clone, PartialEq)]
pub struct InformativeFeature {
    pub term: String,
    pub phishing_weight: f64,
    pub legitimate_weight: f64,
    /// Smoothed phishing / legitimate weight ratio
    pub ratio: f64,
}

impl PhishingClassifier {
    /// Fits the model incrementally, densifying at most `batch_size` rows at a time.
    pub fn train(
        features: &[FeatureVector],
        labels: &[Label],
        n_features: usize,
        batch_size: usize,
    ) -> Result<Self> {
        if features.len() != labels.len() {
            return Err(Error::InvalidInput(format!(
                "{} feature rows but {} labels",
                features.len(),
                labels.len()
            )));
        }
        if features.is_empty() {
            return Err(Error::InvalidInput("no training rows".to_string()));
        }
        if batch_size == 0 || n_features == 0 {
            return Err(Error::InvalidInput(
                "batch size and feature count must be positive".to_string(),
            ));
        }

        let mut weights_phishing = vec![0.0; n_features];
        let mut weights_legitimate = vec![0.0; n_features];
        for (row, label) in features.iter().zip(labels) {
            let weights = match label {
                Label::Phishing => &mut weights_phishing,
                Label::Legitimate => &mut weights_legitimate,
            };
            for &(idx, w) in row.entries() {
                if idx >= n_features {
                    return Err(Error::InvalidInput(format!(
                        "feature index {} outside feature space of {}",
                        idx, n_features
                    )));
                }
                weights[idx] += w;
            }
        }

        let params = MultinomialNb::<f64, usize>::params().check()?;
        let mut model = None;
        for (rows, targets) in features.chunks(batch_size).zip(labels.chunks(batch_size)) {
            let x = densify(rows, n_features);
            let y: Array1<usize> = targets.iter().map(|l| l.index()).collect();
            let batch = Dataset::new(x, y);
            model = params.fit_with(model, &batch)?;
        }
        let model = model.ok_or_else(|| Error::InvalidInput("no training batches".to_string()))?;

        Ok(PhishingClassifier {
            model,
            n_features,
            weights_phishing,
            weights_legitimate,
        })
    }

    /// Width of the feature space the model was trained on.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Both per-class weight tables must span the feature space.
    pub fn check_consistency(&self) -> Result<()> {
        for (class, weights) in [
            (Label::Phishing, &self.weights_phishing),
            (Label::Legitimate, &self.weights_legitimate),
        ] {
            if weights.len() != self.n_features {
                return Err(Error::InconsistentArtifact {
                    artifact: "classifier",
                    detail: format!(
                        "{} weights for {} but {} features",
                        weights.len(),
                        class,
                        self.n_features
                    ),
                });
            }
        }
        Ok(())
    }

    pub fn predict(&self, features: &FeatureVector) -> Label {
        let x = densify(std::slice::from_ref(features), self.n_features);
        let predicted: Array1<usize> = self.model.predict(&x);
        predicted
            .iter()
            .next()
            .map(|&class| Label::from_index(class))
            .unwrap_or(Label::Legitimate)
    }

    pub fn predict_batch(&self, features: &[FeatureVector]) -> Vec<Label> {
        let mut labels = Vec::with_capacity(features.len());
        for rows in features.chunks(PREDICT_BATCH) {
            let x = densify(rows, self.n_features);
            let predicted: Array1<usize> = self.model.predict(&x);
            labels.extend(predicted.iter().map(|&class| Label::from_index(class)));
        }
        labels
    }

    /// Terms most indicative of phishing, ranked by smoothed weight ratio.
    pub fn top_features(&self, vectorizer: &TfidfVectorizer, n: usize) -> Vec<InformativeFeature> {
        let mut features: Vec<_> = vectorizer
            .vocabulary()
            .iter()
            .filter(|&(_, &idx)| idx < self.n_features)
            .map(|(term, &idx)| {
                let phishing_weight = self.weights_phishing[idx];
                let legitimate_weight = self.weights_legitimate[idx];
                InformativeFeature {
                    term: term.clone(),
                    phishing_weight,
                    legitimate_weight,
                    ratio: (phishing_weight + 1.0) / (legitimate_weight + 1.0),
                }
            })
            .collect();

        features.sort_by(|a, b| b.ratio.total_cmp(&a.ratio));
        features.truncate(n);
        features
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::{DfThreshold, VectorizerParams};

    const PHISHING: &[&str] = &[
        "urgent verify your account password immediately",
        "your account is suspended verify password now",
        "claim your prize click the link to verify",
        "urgent wire transfer needed click link",
    ];
    const LEGITIMATE: &[&str] = &[
        "meeting agenda for tuesday attached",
        "lunch schedule for the team meeting",
        "quarterly report and meeting notes",
        "agenda updated please review the schedule",
    ];

    fn fitted() -> (TfidfVectorizer, PhishingClassifier) {
        let docs: Vec<&str> = PHISHING.iter().chain(LEGITIMATE).copied().collect();
        let labels: Vec<Label> = PHISHING
            .iter()
            .map(|_| Label::Phishing)
            .chain(LEGITIMATE.iter().map(|_| Label::Legitimate))
            .collect();

        let params = VectorizerParams {
            min_df: DfThreshold::Count(1),
            ..VectorizerParams::default()
        };
        let vectorizer = params.fit(&docs).unwrap();
        let features = vectorizer.transform_batch(&docs);
        let classifier =
            PhishingClassifier::train(&features, &labels, vectorizer.vocabulary_size(), 3)
                .unwrap();
        (vectorizer, classifier)
    }

    #[test]
    fn test_predicts_training_vocabulary() {
        let (vectorizer, classifier) = fitted();

        let phish = vectorizer.transform("Please verify your password, urgent!");
        assert_eq!(classifier.predict(&phish), Label::Phishing);

        let legit = vectorizer.transform("Agenda for the team meeting");
        assert_eq!(classifier.predict(&legit), Label::Legitimate);
    }

    #[test]
    fn test_predict_batch_matches_single() {
        let (vectorizer, classifier) = fitted();
        let texts = ["verify account", "meeting notes", "", "unseen words only"];
        let rows = vectorizer.transform_batch(&texts);

        let batch = classifier.predict_batch(&rows);
        let single: Vec<Label> = rows.iter().map(|r| classifier.predict(r)).collect();
        assert_eq!(batch, single);
        assert!(batch.iter().all(|l| l.index() <= 1));
    }

    #[test]
    fn test_top_features_favor_phishing_terms() {
        let (vectorizer, classifier) = fitted();
        let top = classifier.top_features(&vectorizer, 5);

        assert_eq!(top.len(), 5);
        assert!(top.windows(2).all(|w| w[0].ratio >= w[1].ratio));
        assert!(top[0].phishing_weight > top[0].legitimate_weight);
    }

    #[test]
    fn test_context_rejects_truncated_weights() {
        use crate::inference::InferenceContext;

        let (vectorizer, mut classifier) = fitted();
        assert!(classifier.check_consistency().is_ok());

        classifier.weights_phishing.pop();
        let result = InferenceContext::new(vectorizer, classifier);
        assert!(matches!(
            result,
            Err(Error::InconsistentArtifact { artifact: "classifier", .. })
        ));

        let (vectorizer, mut classifier) = fitted();
        classifier.weights_legitimate.clear();
        assert!(InferenceContext::new(vectorizer, classifier).is_err());
    }

    #[test]
    fn test_train_rejects_mismatched_inputs() {
        let rows = vec![FeatureVector::default(); 2];
        let result = PhishingClassifier::train(&rows, &[Label::Phishing], 4, 8);
        assert!(matches!(result, Err(Error::InvalidInput(_))));

        let result = PhishingClassifier::train(&[], &[], 4, 8);
        assert!(matches!(result, Err(Error::InvalidInput(_))));

        let result = PhishingClassifier::train(&rows, &[Label::Phishing, Label::Legitimate], 4, 0);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }
}
