//! YAML configuration loading with modification-time caching.
//!
//! A loader owns one file path. Every `load` stats the file; as long as the
//! modification time matches the generation held in memory the cached
//! documents are handed out again, otherwise the whole stream is re-read,
//! validated and swapped in.

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::model::{merge_suppliers, Section, SupplierDirectory};
use super::validation::Validator;
use super::ConfigError;

pub type ArticleLoader = YamlLoader<Section>;
pub type SupplierLoader = YamlLoader<SupplierDirectory>;

struct Generation<D> {
    mtime: SystemTime,
    documents: Arc<Vec<D>>,
}

pub struct YamlLoader<D> {
    path: PathBuf,
    cached: RwLock<Option<Generation<D>>>,
}

impl<D> YamlLoader<D>
where
    D: DeserializeOwned + Validator,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the validated documents of the file, re-reading it only when
    /// its modification time differs from the cached generation.
    pub fn load(&self) -> Result<Arc<Vec<D>>, ConfigError> {
        let mtime = fs::metadata(&self.path)
            .and_then(|meta| meta.modified())
            .map_err(|source| ConfigError::Io {
                path: self.path.clone(),
                source,
            })?;

        if let Some(generation) = self.cached.read().as_ref() {
            if generation.mtime == mtime {
                log::debug!("Using cached {}", self.path.display());
                return Ok(generation.documents.clone());
            }
        }

        let content = fs::read_to_string(&self.path).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })?;
        let documents = Arc::new(parse_documents::<D>(&content, &self.path)?);
        log::info!(
            "Loaded {} document(s) from {}",
            documents.len(),
            self.path.display()
        );

        // Concurrent reloads may race here; the last one to finish wins.
        *self.cached.write() = Some(Generation {
            mtime,
            documents: documents.clone(),
        });
        Ok(documents)
    }
}

impl SupplierLoader {
    /// Load all directory documents and fold them into one directory.
    pub fn load_directory(&self) -> Result<SupplierDirectory, ConfigError> {
        let documents = self.load()?;
        Ok(merge_suppliers(documents.iter()))
    }
}

/// Parse and validate every document of a YAML stream.
///
/// Empty documents, including ones holding only comments, are skipped.
pub fn parse_documents<D>(content: &str, path: &Path) -> Result<Vec<D>, ConfigError>
where
    D: DeserializeOwned + Validator,
{
    let parse_error = |document, source| ConfigError::Parse {
        path: path.to_path_buf(),
        document,
        source,
    };

    let mut documents = Vec::new();
    for (index, document) in serde_yaml::Deserializer::from_str(content).enumerate() {
        let value = Value::deserialize(document).map_err(|source| parse_error(index, source))?;
        if value.is_null() {
            log::debug!("Skipping empty document {} of {}", index, path.display());
            continue;
        }
        D::validate(&value).map_err(|errors| ConfigError::Validation {
            path: path.to_path_buf(),
            document: index,
            errors,
        })?;
        let parsed = serde_yaml::from_value(value).map_err(|source| parse_error(index, source))?;
        documents.push(parsed);
    }

    Ok(documents)
}
