//! Catalog module - article catalog and supplier directory configuration.
//!
//! - `model` - Articles, catalog sections and supplier contact records
//! - `validation` - Record checks run on every (re)load
//! - `loader` - YAML stream loading cached by file modification time

pub mod loader;
pub mod model;
pub mod validation;

pub use loader::{ArticleLoader, SupplierLoader, YamlLoader};
pub use model::{Article, ArticleChoice, Scalar, Section, SupplierDirectory, SupplierInfo};
pub use validation::{ValidationError, ValidationErrors, Validator};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that make a configuration file unavailable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse document {document} of {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        document: usize,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("document {document} of {} is invalid: {errors}", .path.display())]
    Validation {
        path: PathBuf,
        document: usize,
        errors: ValidationErrors,
    },
}
