//! HTML module - the catalog order form and its stylesheet.

pub mod handlers;
pub mod page;

pub use page::{default_delivery_date, supplier_colors, CatalogPage};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("failed to load page template {}: {source}", .path.display())]
    TemplateIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid page template: {0}")]
    Template(#[source] Box<handlebars::TemplateError>),
    #[error("failed to render page: {0}")]
    Render(#[source] Box<handlebars::RenderError>),
}
