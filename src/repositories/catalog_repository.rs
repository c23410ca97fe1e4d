use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::models::catalog::{Catalog, CatalogError, CatalogItem};

#[derive(Error, Debug)]
pub enum CatalogRepositoryError {
    #[error("Failed to read catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse catalog file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid catalog: {0}")]
    Invalid(#[from] CatalogError),
}

/// Source of the catalog, read once at startup
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn load(&self) -> Result<Catalog, CatalogRepositoryError>;
    fn describe(&self) -> String;
}

/// The house menu compiled into the binary
#[derive(Debug, Default)]
pub struct BuiltinCatalogRepository;

impl BuiltinCatalogRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CatalogRepository for BuiltinCatalogRepository {
    async fn load(&self) -> Result<Catalog, CatalogRepositoryError> {
        Ok(Catalog::builtin())
    }

    fn describe(&self) -> String {
        "built-in menu".to_string()
    }
}

/// JSON array of catalog items on disk
#[derive(Debug)]
pub struct JsonCatalogRepository {
    path: PathBuf,
}

impl JsonCatalogRepository {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl CatalogRepository for JsonCatalogRepository {
    async fn load(&self) -> Result<Catalog, CatalogRepositoryError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| CatalogRepositoryError::Io {
                path: self.path.clone(),
                source,
            })?;

        let items: Vec<CatalogItem> =
            serde_json::from_str(&raw).map_err(|source| CatalogRepositoryError::Parse {
                path: self.path.clone(),
                source,
            })?;

        Ok(Catalog::new(items)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
