//! Dataset loading, cleaning, class balancing and train/test splitting.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::config::DatasetConfig;
use crate::error::{Error, Result};

/// Binary email label. The discriminant is the class index fed to the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    Legitimate = 0,
    Phishing = 1,
}

impl Label {
    /// Class index used as the classifier target.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Maps a predicted class index back to a label; anything but 1 is legitimate.
    pub fn from_index(index: usize) -> Self {
        if index == Label::Phishing.index() {
            Label::Phishing
        } else {
            Label::Legitimate
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Label::Legitimate => "Legitimate",
            Label::Phishing => "Phishing",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cleaned email and its label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailRecord {
    pub content: String,
    pub label: Label,
}

/// A row as read from the CSV before cleaning. `None` means the field was empty or absent.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    pub text: Option<String>,
    pub label: Option<String>,
}

/// Row counts observed while cleaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleaningStats {
    pub rows_read: usize,
    pub missing_text: usize,
    pub blank_text: usize,
    pub unknown_label: usize,
    pub phishing: usize,
    pub legitimate: usize,
}

impl CleaningStats {
    pub fn kept(&self) -> usize {
        self.phishing + self.legitimate
    }
}

/// Cleaned records with the statistics of how they were obtained.
#[derive(Debug, Clone)]
pub struct PreparedData {
    pub records: Vec<EmailRecord>,
    pub stats: CleaningStats,
}

/// A helper type for holding train/test splits.
#[derive(Debug)]
pub struct DatasetSplit {
    pub train: Vec<EmailRecord>,
    pub test: Vec<EmailRecord>,
}

/// Loads and cleans the labeled CSV at `path`.
pub fn load_csv(path: &Path, config: &DatasetConfig) -> Result<PreparedData> {
    info!("📂 Loading dataset from {:?}", path);
    let file = File::open(path)?;
    read_records(file, config)
}

/// Reads CSV rows from any reader, picking the configured text and label columns by header.
pub fn read_records<R: Read>(reader: R, config: &DatasetConfig) -> Result<PreparedData> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    debug!("Dataset columns: {:?}", headers);

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    };
    let text_idx = column(&config.text_column)?;
    let label_idx = column(&config.label_column)?;

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let field = |idx: usize| {
            record
                .get(idx)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };
        rows.push(RawRow {
            text: field(text_idx),
            label: field(label_idx),
        });
    }

    Ok(clean(rows, config))
}

/// Drops rows with missing or blank text and rows whose label is not one of the two markers.
pub fn clean<I>(rows: I, config: &DatasetConfig) -> PreparedData
where
    I: IntoIterator<Item = RawRow>,
{
    let mut stats = CleaningStats::default();
    let mut records = Vec::new();

    for row in rows {
        stats.rows_read += 1;

        let Some(content) = row.text else {
            stats.missing_text += 1;
            continue;
        };
        if content.trim().is_empty() {
            stats.blank_text += 1;
            continue;
        }

        let label = match row.label.as_deref() {
            Some(l) if l == config.phishing_label => Label::Phishing,
            Some(l) if l == config.legitimate_label => Label::Legitimate,
            _ => {
                stats.unknown_label += 1;
                continue;
            }
        };

        match label {
            Label::Phishing => stats.phishing += 1,
            Label::Legitimate => stats.legitimate += 1,
        }
        records.push(EmailRecord { content, label });
    }

    info!(
        "🧹 Cleaned dataset: {} rows read, {} kept (missing text: {}, blank text: {}, unknown label: {})",
        stats.rows_read,
        stats.kept(),
        stats.missing_text,
        stats.blank_text,
        stats.unknown_label
    );

    PreparedData { records, stats }
}

/// Downsamples the majority class to the minority size and shuffles the result.
///
/// Fails with [`Error::EmptyClass`] when either class has no rows, so a
/// single-class dataset never reaches the split or the classifier.
pub fn balance(records: Vec<EmailRecord>, seed: u64) -> Result<Vec<EmailRecord>> {
    let (mut phishing, mut legitimate): (Vec<_>, Vec<_>) = records
        .into_iter()
        .partition(|r| r.label == Label::Phishing);

    info!("Number of phishing samples: {}", phishing.len());
    info!("Number of legitimate samples: {}", legitimate.len());

    if phishing.is_empty() || legitimate.is_empty() {
        let label = if phishing.is_empty() {
            Label::Phishing
        } else {
            Label::Legitimate
        };
        return Err(Error::EmptyClass {
            label,
            phishing: phishing.len(),
            legitimate: legitimate.len(),
        });
    }

    let per_class = phishing.len().min(legitimate.len());
    let mut rng = StdRng::seed_from_u64(seed);

    phishing.shuffle(&mut rng);
    phishing.truncate(per_class);
    legitimate.shuffle(&mut rng);
    legitimate.truncate(per_class);

    let mut balanced = phishing;
    balanced.append(&mut legitimate);
    balanced.shuffle(&mut rng);

    info!("⚖️  Balanced dataset: {} samples per class", per_class);
    Ok(balanced)
}

/// Shuffles with a fixed seed and holds out `ceil(n * test_ratio)` records for testing.
pub fn train_test_split(data: &[EmailRecord], test_ratio: f64, seed: u64) -> DatasetSplit {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = data.to_vec();
    data.shuffle(&mut rng);

    let test_size = ((data.len() as f64) * test_ratio).ceil() as usize;
    let test_size = test_size.min(data.len());
    let train = data.split_off(test_size);

    DatasetSplit { train, test: data }
}
