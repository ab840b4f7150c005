use std::path::{Path, PathBuf};

use crate::catalog::{ArticleLoader, SupplierLoader};
use crate::document::{LatexRenderEngine, TypesetterConfig};
use crate::html::{CatalogPage, PageError};

/// Shared by every worker; configuration is re-read through the loaders.
pub struct AppState {
    pub articles: ArticleLoader,
    pub suppliers: SupplierLoader,
    pub engine: LatexRenderEngine,
    pub catalog_page: CatalogPage,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(
        articles: impl Into<PathBuf>,
        suppliers: impl Into<PathBuf>,
        typesetter: TypesetterConfig,
        static_dir: &Path,
    ) -> Result<Self, PageError> {
        let catalog_page = CatalogPage::new(static_dir)?;
        Ok(AppState {
            articles: ArticleLoader::new(articles),
            suppliers: SupplierLoader::new(suppliers),
            engine: LatexRenderEngine::new(typesetter),
            catalog_page,
            static_dir: static_dir.to_path_buf(),
        })
    }
}

/// The `static` directory shipped with the package.
pub fn default_static_dir() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/static"))
}
