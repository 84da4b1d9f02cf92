//! TF-IDF text vectorizer with word n-grams, stop-word removal and document-frequency pruning.

use ndarray::Array2;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;
use tracing::info;

use crate::error::{Error, Result};
use crate::stop_words::is_english_stop_word;

/// Tokens are runs of at least two word characters.
static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern is a valid regex"));

/// Document-frequency bound: an absolute document count or a proportion of the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DfThreshold {
    Count(usize),
    Proportion(f64),
}

impl DfThreshold {
    fn doc_count(self, n_documents: usize) -> f64 {
        match self {
            DfThreshold::Count(count) => count as f64,
            DfThreshold::Proportion(p) => p * n_documents as f64,
        }
    }

    fn validate(self, name: &str) -> Result<()> {
        match self {
            DfThreshold::Proportion(p) if !(0.0..=1.0).contains(&p) => Err(Error::InvalidParams(
                format!("{} proportion must be in [0, 1], got {}", name, p),
            )),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopWords {
    English,
    None,
}

/// Analyzer and pruning parameters. Fitting consumes these to produce a [`TfidfVectorizer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizerParams {
    /// Inclusive (min_n, max_n) word n-gram lengths
    pub ngram_range: (usize, usize),
    pub stop_words: StopWords,
    /// Terms in fewer documents than this are dropped
    pub min_df: DfThreshold,
    /// Terms in more documents than this are dropped
    pub max_df: DfThreshold,
    pub lowercase: bool,
}

impl Default for VectorizerParams {
    fn default() -> Self {
        Self {
            ngram_range: (1, 2),
            stop_words: StopWords::English,
            min_df: DfThreshold::Count(5),
            max_df: DfThreshold::Proportion(0.95),
            lowercase: true,
        }
    }
}

impl VectorizerParams {
    pub fn validate(&self) -> Result<()> {
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(Error::InvalidParams(format!(
                "invalid ngram_range ({}, {})",
                min_n, max_n
            )));
        }
        self.min_df.validate("min_df")?;
        self.max_df.validate("max_df")
    }

    /// Splits `text` into the terms (n-grams) this analyzer counts.
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        let tokens: Vec<&str> = TOKEN_PATTERN
            .find_iter(&text)
            .map(|m| m.as_str())
            .filter(|t| match self.stop_words {
                StopWords::English => !is_english_stop_word(t),
                StopWords::None => true,
            })
            .collect();

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n > tokens.len() {
                break;
            }
            terms.extend(tokens.windows(n).map(|window| window.join(" ")));
        }
        terms
    }

    /// Learns the vocabulary and IDF weights from the training documents.
    pub fn fit<S: AsRef<str>>(&self, documents: &[S]) -> Result<TfidfVectorizer> {
        self.validate()?;

        let n_documents = documents.len();
        if n_documents == 0 {
            return Err(Error::InvalidInput(
                "cannot fit vectorizer on zero documents".to_string(),
            ));
        }

        let mut document_frequency: HashMap<String, usize> = HashMap::new();
        for doc in documents {
            let unique: HashSet<String> = self.analyze(doc.as_ref()).into_iter().collect();
            for term in unique {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        let max_count = self.max_df.doc_count(n_documents);
        let min_count = self.min_df.doc_count(n_documents);
        if max_count < min_count {
            return Err(Error::InvalidParams(
                "max_df corresponds to fewer documents than min_df".to_string(),
            ));
        }

        let total_terms = document_frequency.len();
        let kept: BTreeMap<String, usize> = document_frequency
            .into_iter()
            .filter(|(_, df)| {
                let df = *df as f64;
                df >= min_count && df <= max_count
            })
            .collect();

        if kept.is_empty() {
            return Err(Error::EmptyVocabulary);
        }

        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(kept.len());
        for (idx, (term, df)) in kept.into_iter().enumerate() {
            idf.push(((n_documents as f64 + 1.0) / (df as f64 + 1.0)).ln() + 1.0);
            vocabulary.insert(term, idx);
        }

        info!(
            "🔤 Vectorizer fitted on {} documents: {} terms kept of {}",
            n_documents,
            vocabulary.len(),
            total_terms
        );

        Ok(TfidfVectorizer {
            params: self.clone(),
            vocabulary,
            idf,
        })
    }
}

/// Sparse, L2-normalized TF-IDF row: `(column, weight)` pairs sorted by column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureVector {
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    /// True when the text contained no vocabulary term.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Fitted TF-IDF transform. Only obtainable through [`VectorizerParams::fit`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    params: VectorizerParams,
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    pub fn params(&self) -> &VectorizerParams {
        &self.params
    }

    /// Term to column index, iterated in column order.
    pub fn vocabulary(&self) -> &BTreeMap<String, usize> {
        &self.vocabulary
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    /// Every vocabulary column must have an IDF weight.
    pub fn check_consistency(&self) -> Result<()> {
        let inconsistent = |detail: String| Error::InconsistentArtifact {
            artifact: "vectorizer",
            detail,
        };
        if self.idf.len() != self.vocabulary.len() {
            return Err(inconsistent(format!(
                "{} vocabulary terms but {} idf weights",
                self.vocabulary.len(),
                self.idf.len()
            )));
        }
        if let Some((term, &idx)) = self
            .vocabulary
            .iter()
            .find(|&(_, &idx)| idx >= self.idf.len())
        {
            return Err(inconsistent(format!(
                "term {:?} maps to column {} of {}",
                term,
                idx,
                self.idf.len()
            )));
        }
        Ok(())
    }

    /// Maps text into the fitted feature space. Terms outside the vocabulary are ignored.
    pub fn transform(&self, text: &str) -> FeatureVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in self.params.analyze(text) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(idx, tf)| (idx, tf * self.idf[idx]))
            .collect();

        let norm = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut entries {
                *w /= norm;
            }
        }

        FeatureVector { entries }
    }

    pub fn transform_batch<S: AsRef<str>>(&self, texts: &[S]) -> Vec<FeatureVector> {
        texts.iter().map(|t| self.transform(t.as_ref())).collect()
    }
}

/// Expands sparse rows into a dense `rows × n_features` matrix.
pub fn densify(rows: &[FeatureVector], n_features: usize) -> Array2<f64> {
    let mut x = Array2::zeros((rows.len(), n_features));
    for (i, row) in rows.iter().enumerate() {
        for &(j, weight) in row.entries() {
            x[[i, j]] = weight;
        }
    }
    x
}
