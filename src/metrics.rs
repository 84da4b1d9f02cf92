//! Held-out evaluation metrics.
//!
//! Computes per-class precision, recall and F1 from predicted and ground-truth labels.

use std::fmt;

use crate::dataset::Label;
use crate::error::{Error, Result};

/// Metrics for one class, treating it as the positive class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

impl ClassMetrics {
    fn from_counts(tp: usize, fp: usize, fn_count: usize) -> Self {
        let precision = if tp + fp > 0 {
            tp as f64 / (tp + fp) as f64
        } else {
            0.0
        };

        let recall = if tp + fn_count > 0 {
            tp as f64 / (tp + fn_count) as f64
        } else {
            0.0
        };

        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        ClassMetrics {
            precision,
            recall,
            f1,
            support: tp + fn_count,
        }
    }
}

/// Per-class report with accuracy and averaged scores.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationReport {
    pub legitimate: ClassMetrics,
    pub phishing: ClassMetrics,
    pub accuracy: f64,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
}

impl ClassificationReport {
    pub fn from_predictions(truth: &[Label], predicted: &[Label]) -> Result<Self> {
        if truth.len() != predicted.len() {
            return Err(Error::InvalidInput(format!(
                "{} labels but {} predictions",
                truth.len(),
                predicted.len()
            )));
        }

        let mut tp = 0;
        let mut fp = 0;
        let mut tn = 0;
        let mut fn_count = 0;

        for (&actual, &pred) in truth.iter().zip(predicted) {
            match (pred, actual) {
                (Label::Phishing, Label::Phishing) => tp += 1,
                (Label::Phishing, Label::Legitimate) => fp += 1,
                (Label::Legitimate, Label::Legitimate) => tn += 1,
                (Label::Legitimate, Label::Phishing) => fn_count += 1,
            }
        }

        let phishing = ClassMetrics::from_counts(tp, fp, fn_count);
        let legitimate = ClassMetrics::from_counts(tn, fn_count, fp);

        let total = truth.len();
        let accuracy = if total > 0 {
            (tp + tn) as f64 / total as f64
        } else {
            0.0
        };

        let macro_avg = ClassMetrics {
            precision: (legitimate.precision + phishing.precision) / 2.0,
            recall: (legitimate.recall + phishing.recall) / 2.0,
            f1: (legitimate.f1 + phishing.f1) / 2.0,
            support: total,
        };

        let weighted = |pick: fn(&ClassMetrics) -> f64| {
            if total == 0 {
                return 0.0;
            }
            (pick(&legitimate) * legitimate.support as f64
                + pick(&phishing) * phishing.support as f64)
                / total as f64
        };
        let weighted_avg = ClassMetrics {
            precision: weighted(|m| m.precision),
            recall: weighted(|m| m.recall),
            f1: weighted(|m| m.f1),
            support: total,
        };

        Ok(ClassificationReport {
            legitimate,
            phishing,
            accuracy,
            macro_avg,
            weighted_avg,
        })
    }

    pub fn class(&self, label: Label) -> &ClassMetrics {
        match label {
            Label::Legitimate => &self.legitimate,
            Label::Phishing => &self.phishing,
        }
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>12} {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        for label in [Label::Legitimate, Label::Phishing] {
            let m = self.class(label);
            writeln!(
                f,
                "{:>12} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                label.as_str(),
                m.precision,
                m.recall,
                m.f1,
                m.support
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>12} {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy", "", "", self.accuracy, self.macro_avg.support
        )?;
        for (name, m) in [("macro avg", &self.macro_avg), ("weighted avg", &self.weighted_avg)] {
            writeln!(
                f,
                "{:>12} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                name, m.precision, m.recall, m.f1, m.support
            )?;
        }
        Ok(())
    }
}
