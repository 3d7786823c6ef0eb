#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! Metaserv - A read-only metadata catalog service
//!
//! Metaserv describes the data a site publishes: logical databases, the schemas
//! inside them, the tables inside each schema and the columns of every table
//! (datatype, unit, UCD and description). It can be used as a command-line
//! application, as an HTTP service, and as a library.
//!
//! # Feature Flags
//!
//! | Feature | Description | Key Dependencies |
//! |---------|-------------|------------------|
//! | (none) | Catalog store, resolution and projection | `rusqlite`, `regex` |
//! | `display` | Table formatting with `tabled` | `tabled` |
//! | `server` | HTTP API with content negotiation | `axum`, `tower-http` |
//! | `cli` | Full CLI binary with server support | All above + `clap` |
//!
//! ```toml
//! # Library only
//! metaserv = { version = "0.1", default-features = false }
//!
//! # Default (CLI binary)
//! metaserv = "0.1"
//! ```
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - **[`database`]**: The SQLite catalog store
//!   - `core`: Connection management and schema definitions
//!   - `catalog`: Repositories for databases, schemas, tables and columns, and the JSON loader
//!
//! - **[`lens`]**: Catalog queries
//!   - `catalog`: Identifier resolution, hierarchy navigation and result documents
//!
//! - **[`config`]**: Configuration management
//!
//! - **`server`**: The HTTP API (requires `server`)
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use metaserv::database::CatalogDatabase;
//! use metaserv::lens::catalog::CatalogLens;
//!
//! let db = CatalogDatabase::open_in_dir("~/.metaserv")?;
//! let lens = CatalogLens::new(&db);
//!
//! // Both the name and the surrogate id resolve the same table
//! let by_name = lens.table("S12_sdss", None, "Object")?;
//! let by_id = lens.table("1", None, "100")?;
//! assert_eq!(by_name, by_id);
//!
//! println!("{}", serde_json::to_string_pretty(&by_name)?);
//! ```

pub mod config;
pub mod database;
pub mod lens;

// Server module - requires the server feature
#[cfg(feature = "server")]
pub mod server;

// =============================================================================
// Configuration (always available)
// =============================================================================

pub use config::MetaservConfig;

// Shared store info types (used by the config command)
pub use config::{format_size, get_catalog_info, CatalogStoreInfo};

// =============================================================================
// Database Module - Re-export commonly used types
// =============================================================================

// Core database types
pub use database::{DatabaseConn, SchemaDefinitions, SchemaManager, SchemaStatus, SCHEMA_VERSION};

// Catalog store
pub use database::{
    CatalogDatabase, CatalogDescription, CatalogLoader, CatalogStore, ColumnRecord,
    DatabaseRecord, LoadSummary, Predicate, SchemaRecord, TableRecord,
};

// =============================================================================
// Lens Module
// =============================================================================

pub use lens::catalog::{CatalogError, CatalogLens, CatalogQuery, Document, EntityKind};
pub use lens::utils::OutputFormat;

// =============================================================================
// Server Module (HTTP API) - requires "server" feature
// =============================================================================

#[cfg(feature = "server")]
pub use server::{create_axum_router, start_server, ServerConfig, ServerState, WebContext};
