//! Lens module
//!
//! This module provides high-level "lens" abstractions that combine business logic
//! with output formatting. Lenses are designed to be reusable across different
//! interfaces (CLI and REST API).
//!
//! # Architecture
//!
//! The catalog lens exports:
//! - A **Lens struct** (`CatalogLens`) - the main entry point for all operations
//! - **Args types** (`CatalogQuery`, `CatalogShowArgs`) - input arguments
//! - **Output types** (`Document` and its parts) - response documents
//!
//! Resolution and navigation are exposed as free functions as well, since the
//! HTTP layer validates path tokens before it opens a store session.
//!
//! # Usage
//!
//! ```rust,ignore
//! use metaserv::database::CatalogDatabase;
//! use metaserv::lens::catalog::{CatalogLens, CatalogQuery};
//!
//! let session = CatalogDatabase::open_session(&config.sqlite_path())?;
//! let lens = CatalogLens::new(&session);
//! let doc = lens.query(&CatalogQuery::Table {
//!     database: "S12_sdss".to_string(),
//!     schema: None,
//!     table: "Object".to_string(),
//! })?;
//! ```

// =============================================================================
// Utility module
// =============================================================================
pub mod utils;

// =============================================================================
// Catalog lens
// =============================================================================

// CatalogLens - id-or-name resolution, navigation and projection
pub mod catalog;
