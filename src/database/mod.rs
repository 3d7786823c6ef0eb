//! Database module
//!
//! This module provides all storage functionality for metaserv, organized into:
//!
//! - **core**: Core database infrastructure (SQLite connections, schema management)
//! - **catalog**: The metadata catalog (databases, schemas, tables, columns)
//!
//! # Architecture
//!
//! ```text
//! database/
//! ├── core/           # Foundation
//! │   ├── connection  # SQLite DatabaseConn wrapper
//! │   └── schema      # SQLite schema definitions and management
//! │
//! └── catalog/        # Persistent catalog
//!     ├── databases   # Logical databases and their default schema
//!     ├── schemas     # Schemas scoped to a database
//!     ├── tables      # Tables and columns scoped to a schema
//!     ├── predicate   # Id-or-name lookup predicates
//!     └── loader      # JSON catalog descriptions
//! ```
//!
//! # Usage
//!
//! Operator commands open the catalog for writing:
//!
//! ```rust,ignore
//! use metaserv::database::{CatalogDatabase, CatalogDescription};
//!
//! let db = CatalogDatabase::open_in_dir("~/.metaserv")?;
//! let description = CatalogDescription::from_json(&std::fs::read_to_string("catalog.json")?)?;
//! db.loader().load(&description)?;
//! ```
//!
//! Request handling opens a query-only session per request:
//!
//! ```rust,ignore
//! use metaserv::database::{CatalogDatabase, CatalogStore};
//!
//! let session = CatalogDatabase::open_session("~/.metaserv/metaserv-catalog.sqlite3")?;
//! let databases = CatalogStore::databases(&session)?;
//! ```

pub mod catalog;
pub mod core;

// =============================================================================
// SQLite Types
// =============================================================================

pub use core::{DatabaseConn, SchemaDefinitions, SchemaManager, SchemaStatus, SCHEMA_VERSION};

// =============================================================================
// Catalog Types
// =============================================================================

pub use catalog::{
    catalog_path, CatalogDatabase, CatalogDescription, CatalogLoader, CatalogStore, ColumnRecord,
    DatabaseRecord, DatabaseRepository, LoadSummary, Predicate, SchemaRecord, SchemaRepository,
    TableRecord, TableRepository, CATALOG_FILE_NAME,
};

// =============================================================================
// Helper function
// =============================================================================

/// Ensure the data directory exists
pub fn ensure_data_dir(data_dir: &str) -> anyhow::Result<()> {
    std::fs::create_dir_all(data_dir)
        .map_err(|e| anyhow::anyhow!("Failed to create data directory '{}': {}", data_dir, e))
}
