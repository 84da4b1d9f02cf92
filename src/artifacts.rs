//! MessagePack persistence for the fitted vectorizer and classifier.

use rmp_serde::{decode::from_read, encode::write_named};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::info;

use crate::classifier::PhishingClassifier;
use crate::config::ArtifactConfig;
use crate::error::{Error, Result};
use crate::vectorizer::TfidfVectorizer;

/// Saves an artifact, creating the parent directory and overwriting any existing file.
pub fn save<T: Serialize>(artifact: &T, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_named(&mut writer, artifact).map_err(|source| Error::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush()?;
    Ok(())
}

/// Loads an artifact written by [`save`].
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::ArtifactNotFound(path.to_path_buf()),
        _ => Error::Io(e),
    })?;
    let reader = BufReader::new(file);
    from_read(reader).map_err(|source| Error::Deserialize {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolved locations of the two artifact files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub vectorizer: PathBuf,
}

impl ArtifactPaths {
    pub fn new(config: &ArtifactConfig) -> Self {
        Self {
            model: config.dir.join(&config.model_file),
            vectorizer: config.dir.join(&config.vectorizer_file),
        }
    }

    pub fn exist(&self) -> bool {
        self.model.exists() && self.vectorizer.exists()
    }

    /// True when an artifact is missing or the dataset was modified after either artifact.
    pub fn is_stale(&self, dataset: &Path) -> bool {
        if !self.exist() {
            return true;
        }

        let mtime = |path: &Path| {
            path.metadata()
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH)
        };

        let csv_mtime = mtime(dataset);
        csv_mtime > mtime(&self.model) || csv_mtime > mtime(&self.vectorizer)
    }

    pub fn save(&self, vectorizer: &TfidfVectorizer, classifier: &PhishingClassifier) -> Result<()> {
        save(classifier, &self.model)?;
        save(vectorizer, &self.vectorizer)?;
        info!("💾 Saved model to {:?} and vectorizer to {:?}", self.model, self.vectorizer);
        Ok(())
    }

    pub fn load(&self) -> Result<(TfidfVectorizer, PhishingClassifier)> {
        let classifier = load(&self.model)?;
        let vectorizer = load(&self.vectorizer)?;
        info!("📦 Loaded model from {:?} and vectorizer from {:?}", self.model, self.vectorizer);
        Ok((vectorizer, classifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::{DfThreshold, VectorizerParams};

    fn small_vectorizer() -> TfidfVectorizer {
        VectorizerParams {
            min_df: DfThreshold::Count(1),
            ..VectorizerParams::default()
        }
        .fit(&["reset your password", "team lunch friday"])
        .unwrap()
    }

    #[test]
    fn test_save_creates_directory_and_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("vectorizer.msgpack");
        let vectorizer = small_vectorizer();

        save(&vectorizer, &path).unwrap();
        let loaded: TfidfVectorizer = load(&path).unwrap();

        assert_eq!(loaded.vocabulary(), vectorizer.vocabulary());
        assert_eq!(loaded.idf(), vectorizer.idf());
        assert_eq!(
            loaded.transform("reset password"),
            vectorizer.transform("reset password")
        );
    }

    #[test]
    fn test_load_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let result = load::<TfidfVectorizer>(&tmp.path().join("absent.msgpack"));
        assert!(matches!(result, Err(Error::ArtifactNotFound(_))));
    }

    #[test]
    fn test_load_corrupt_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("corrupt.msgpack");
        std::fs::write(&path, b"not messagepack at all").unwrap();

        let result = load::<TfidfVectorizer>(&path);
        assert!(matches!(result, Err(Error::Deserialize { .. })));
    }

    #[test]
    fn test_artifact_paths_staleness() {
        let tmp = tempfile::tempdir().unwrap();
        let config = ArtifactConfig {
            dir: tmp.path().join("model"),
            ..ArtifactConfig::default()
        };
        let paths = ArtifactPaths::new(&config);
        let csv = tmp.path().join("data.csv");
        std::fs::write(&csv, "Email Text,Email Type\n").unwrap();

        assert!(!paths.exist());
        assert!(paths.is_stale(&csv));

        let vectorizer = small_vectorizer();
        save(&vectorizer, &paths.vectorizer).unwrap();
        save(&vectorizer, &paths.model).unwrap();
        assert!(paths.exist());
        assert!(!paths.is_stale(&csv));
    }
}
