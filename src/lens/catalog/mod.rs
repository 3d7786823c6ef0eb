//! Catalog lens
//!
//! This module provides the catalog lens: identifier resolution, hierarchy
//! navigation and projection of catalog entities into response documents.
//! It is written against the [`CatalogStore`] trait and never writes to the
//! store.

pub mod args;
#[cfg(feature = "display")]
mod display;
pub mod error;
pub mod navigator;
pub mod projection;
pub mod resolver;

pub use args::{CatalogQuery, CatalogShowArgs};
pub use error::{CatalogError, EntityKind};
pub use navigator::{locate_database, navigate, Chain};
pub use projection::{
    ColumnDescriptor, DatabaseDetail, DatabaseEntry, DatabaseSummary, Document, SchemaSummary,
    SchemaTables, Scope, TableDetail, TableSummary, Verbosity,
};
pub use resolver::{is_safe_name, parse_surrogate_id, resolve};

use crate::database::CatalogStore;
use crate::lens::utils::OutputFormat;

/// Catalog lens for browsing databases, schemas, tables and columns
///
/// This lens provides high-level operations for:
/// - Listing databases, with names only or full summaries
/// - Showing a database with its schemas
/// - Listing the tables of an explicit or default schema
/// - Showing a table with its columns in ordinal order
pub struct CatalogLens<'a, S: CatalogStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: CatalogStore + ?Sized> CatalogLens<'a, S> {
    /// Create a new catalog lens over a store session
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Run a query and build its document
    ///
    /// Tokens are validated before the first store query.
    pub fn query(&self, query: &CatalogQuery) -> Result<Document, CatalogError> {
        query.validate()?;
        match query {
            CatalogQuery::Databases { verbosity } => self.databases(*verbosity),
            CatalogQuery::Database { database } => self.database(database),
            CatalogQuery::Tables { database, schema } => {
                self.tables(database, schema.as_deref())
            }
            CatalogQuery::Table {
                database,
                schema,
                table,
            } => self.table(database, schema.as_deref(), table),
        }
    }

    /// All databases ordered by name
    pub fn databases(&self, verbosity: Verbosity) -> Result<Document, CatalogError> {
        let records = self.store.databases()?;
        Ok(projection::databases_document(records, verbosity))
    }

    /// A database with its schemas
    pub fn database(&self, db_token: &str) -> Result<Document, CatalogError> {
        let database = locate_database(self.store, db_token)?;
        let schemas = self.store.schemas(database.id)?;
        Ok(projection::database_document(database, schemas))
    }

    /// The tables of a schema, the default one when `schema_token` is `None`
    pub fn tables(
        &self,
        db_token: &str,
        schema_token: Option<&str>,
    ) -> Result<Document, CatalogError> {
        let chain = navigate(self.store, db_token, schema_token, None)?;
        let tables = self.store.tables(chain.schema.id)?;
        Ok(projection::tables_document(chain.schema, tables))
    }

    /// A table with its columns
    pub fn table(
        &self,
        db_token: &str,
        schema_token: Option<&str>,
        table_token: &str,
    ) -> Result<Document, CatalogError> {
        let chain = navigate(self.store, db_token, schema_token, Some(table_token))?;
        let table = chain
            .table
            .ok_or_else(|| CatalogError::not_found(EntityKind::Table, table_token))?;
        let columns = self.store.columns(table.id)?;
        Ok(projection::table_document(table, columns))
    }

    /// Format a document for terminal output
    pub fn format_document(&self, document: &Document, format: &OutputFormat) -> String {
        match format {
            OutputFormat::Json => serde_json::to_string(document).unwrap_or_default(),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(document).unwrap_or_default(),
            #[cfg(feature = "display")]
            OutputFormat::Table | OutputFormat::Markdown => {
                display::render(document, format == &OutputFormat::Markdown)
            }
            #[cfg(not(feature = "display"))]
            OutputFormat::Table | OutputFormat::Markdown => {
                serde_json::to_string_pretty(document).unwrap_or_default()
            }
        }
    }
}
