//! Document module - order documents typeset to PDF by an external LaTeX tool.
//!
//! - `common` - LaTeX escaping, package size alignment, file name helpers
//! - `template` - LaTeX source of the order document
//! - `engine` - Scratch directory, typesetter supervision, PDF hand-off

pub mod common;
pub mod engine;
pub mod template;

pub use common::{escape_latex, format_size};
pub use engine::{LatexRenderEngine, OrderPdf, TypesetterConfig};

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while rendering an order document.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create temporary directory: {0}")]
    TempDir(#[source] std::io::Error),
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to use typesetter log {}: {source}", .path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to wait for typesetter: {0}")]
    Wait(#[source] std::io::Error),
    #[error("typesetter did not finish within {0:?}")]
    Timeout(Duration),
    /// The typesetter exited unsuccessfully; `log` holds its raw output.
    #[error("typesetter exited with status {code:?}:\n{}", String::from_utf8_lossy(.log))]
    Failed { code: Option<i32>, log: Vec<u8> },
    #[error("failed to open generated PDF: {0}")]
    OpenPdf(#[source] std::io::Error),
}
