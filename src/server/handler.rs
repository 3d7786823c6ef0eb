//! Request context for the catalog endpoints
//!
//! `WebContext` holds what every request needs to reach the catalog store.
//! Each query opens its own store session on the blocking pool. The session
//! is dropped when the query finishes, whether it succeeded or not.

use tracing::debug;

use crate::config::MetaservConfig;
use crate::database::CatalogDatabase;
use crate::lens::catalog::{CatalogError, CatalogLens, CatalogQuery, Document};
use crate::server::protocol::{ApiError, ErrorData};

// =============================================================================
// Context
// =============================================================================

/// Web context providing access to shared resources
///
/// This context is shared by all handlers and provides access to:
/// - Configuration settings
/// - The catalog store location
#[derive(Debug, Clone)]
pub struct WebContext {
    /// Metaserv configuration
    pub config: MetaservConfig,

    /// Path of the SQLite catalog store
    pub catalog_path: String,
}

impl WebContext {
    /// Create a new web context from MetaservConfig
    pub fn from_config(config: MetaservConfig) -> Self {
        let catalog_path = config.sqlite_path();
        Self {
            config,
            catalog_path,
        }
    }

    /// Create a context serving a specific catalog file
    pub fn with_catalog_path(mut self, path: impl Into<String>) -> Self {
        self.catalog_path = path.into();
        self
    }

    /// Get the data directory path
    pub fn data_dir(&self) -> &str {
        &self.config.data_dir
    }

    /// Run a catalog query in a request-scoped store session
    ///
    /// Malformed tokens are rejected here, before a session is opened.
    pub async fn execute(&self, query: CatalogQuery) -> Result<Document, ApiError> {
        query.validate()?;
        debug!("executing {:?}", query);

        let path = self.catalog_path.clone();
        let result = tokio::task::spawn_blocking(move || -> Result<Document, CatalogError> {
            let session = CatalogDatabase::open_session(&path)?;
            CatalogLens::new(&session).query(&query)
        })
        .await
        .map_err(|e| ApiError::from(ErrorData::internal(format!("catalog task failed: {}", e))))?;

        Ok(result?)
    }
}

impl Default for WebContext {
    fn default() -> Self {
        Self::from_config(MetaservConfig::default())
    }
}
