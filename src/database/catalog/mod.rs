//! Catalog store
//!
//! This module provides the persistent metadata catalog: logical databases,
//! their schemas, the tables of each schema and the columns of each table.
//!
//! `CatalogDatabase` is the facade over the repositories. It also implements
//! [`CatalogStore`], the read-only query surface the catalog lens is written
//! against, so tests can substitute their own store.

mod databases;
mod loader;
mod predicate;
mod schemas;
mod tables;

pub use databases::{DatabaseRecord, DatabaseRepository};
pub use loader::{
    CatalogDescription, CatalogLoader, ColumnDescription, DatabaseDescription, LoadSummary,
    SchemaDescription, TableDescription,
};
pub use predicate::Predicate;
pub use schemas::{SchemaRecord, SchemaRepository};
pub use tables::{ColumnRecord, TableRecord, TableRepository};

use crate::database::core::{DatabaseConn, SchemaManager, SchemaStatus};
use anyhow::{anyhow, Result};
use tracing::info;

/// File name of the catalog store inside the data directory
pub const CATALOG_FILE_NAME: &str = "metaserv-catalog.sqlite3";

/// Read-only query surface of the catalog
///
/// Every lookup that takes a parent id is scoped to that parent: a schema id
/// belonging to another database never matches.
pub trait CatalogStore {
    /// All databases, ordered by name
    fn databases(&self) -> Result<Vec<DatabaseRecord>>;

    fn find_database(&self, predicate: &Predicate) -> Result<Option<DatabaseRecord>>;

    /// Schemas of a database, ordered by name
    fn schemas(&self, db_id: i64) -> Result<Vec<SchemaRecord>>;

    fn find_schema(&self, db_id: i64, predicate: &Predicate) -> Result<Option<SchemaRecord>>;

    /// The schema flagged as default for a database
    fn default_schema(&self, db_id: i64) -> Result<Option<SchemaRecord>>;

    /// Tables of a schema, ordered by name
    fn tables(&self, schema_id: i64) -> Result<Vec<TableRecord>>;

    fn find_table(&self, schema_id: i64, predicate: &Predicate) -> Result<Option<TableRecord>>;

    /// Columns of a table, in ordinal order
    fn columns(&self, table_id: i64) -> Result<Vec<ColumnRecord>>;
}

/// Catalog database (SQLite backend)
///
/// `CatalogDatabase` handles:
/// - Schema initialization and migrations for operator commands
/// - Query-only sessions for request handling
/// - Access to the catalog repositories
pub struct CatalogDatabase {
    db: DatabaseConn,
}

impl CatalogDatabase {
    /// Open the catalog at the specified path for writing
    ///
    /// If the store doesn't exist, it will be created and initialized.
    /// If the schema is outdated or corrupted, it will be reset and the
    /// catalog will need to be loaded again.
    pub fn open(path: &str) -> Result<Self> {
        let db = DatabaseConn::open_path(path)?;
        let schema = SchemaManager::new(&db.conn);

        match schema.check_status()? {
            SchemaStatus::Current => {
                info!("Catalog schema is current");
            }
            SchemaStatus::NotInitialized => {
                info!("Initializing catalog schema");
                schema.initialize()?;
            }
            SchemaStatus::NeedsMigration { from, to } => {
                info!("Catalog needs migration from v{} to v{}, resetting", from, to);
                schema.reset()?;
                schema.initialize()?;
            }
            SchemaStatus::Incompatible {
                database_version,
                required_version,
            } => {
                info!(
                    "Catalog schema incompatible (db: v{}, required: v{}), resetting",
                    database_version, required_version
                );
                schema.reset()?;
                schema.initialize()?;
            }
            SchemaStatus::Corrupted => {
                info!("Catalog schema corrupted, resetting");
                schema.reset()?;
                schema.initialize()?;
            }
        }

        Ok(Self { db })
    }

    /// Open the catalog from a data directory
    ///
    /// Uses the standard file path: `{data_dir}/metaserv-catalog.sqlite3`
    pub fn open_in_dir(data_dir: &str) -> Result<Self> {
        Self::open(&catalog_path(data_dir))
    }

    /// Create an in-memory catalog (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let db = DatabaseConn::open_in_memory()?;
        let schema = SchemaManager::new(&db.conn);
        schema.initialize()?;
        Ok(Self { db })
    }

    /// Open a query-only session on an existing catalog
    ///
    /// Unlike [`CatalogDatabase::open`], a session never creates, resets or
    /// migrates the store. Anything other than a current schema is an error.
    pub fn open_session(path: &str) -> Result<Self> {
        let db = DatabaseConn::open_read_only(path)?;
        let status = SchemaManager::new(&db.conn).check_status()?;
        if status != SchemaStatus::Current {
            return Err(anyhow!(
                "Catalog at '{}' is not ready ({:?}), run `metaserv init` or `metaserv load`",
                path,
                status
            ));
        }
        Ok(Self { db })
    }

    pub fn databases(&self) -> DatabaseRepository<'_> {
        DatabaseRepository::new(&self.db.conn)
    }

    pub fn schemas(&self) -> SchemaRepository<'_> {
        SchemaRepository::new(&self.db.conn)
    }

    pub fn tables(&self) -> TableRepository<'_> {
        TableRepository::new(&self.db.conn)
    }

    /// Get a loader writing into this catalog
    pub fn loader(&self) -> CatalogLoader<'_> {
        CatalogLoader::new(&self.db.conn)
    }

    /// Get the underlying database connection (for advanced queries)
    pub fn connection(&self) -> &rusqlite::Connection {
        &self.db.conn
    }

    /// Get metadata value from the store
    pub fn get_meta(&self, key: &str) -> Result<Option<String>> {
        SchemaManager::new(&self.db.conn).get_meta(key)
    }

    /// Set metadata value in the store
    pub fn set_meta(&self, key: &str, value: &str) -> Result<()> {
        SchemaManager::new(&self.db.conn).set_meta(key, value)
    }
}

impl CatalogStore for CatalogDatabase {
    fn databases(&self) -> Result<Vec<DatabaseRecord>> {
        self.databases().list()
    }

    fn find_database(&self, predicate: &Predicate) -> Result<Option<DatabaseRecord>> {
        self.databases().find(predicate)
    }

    fn schemas(&self, db_id: i64) -> Result<Vec<SchemaRecord>> {
        self.schemas().list_for_database(db_id)
    }

    fn find_schema(&self, db_id: i64, predicate: &Predicate) -> Result<Option<SchemaRecord>> {
        self.schemas().find_in_database(db_id, predicate)
    }

    fn default_schema(&self, db_id: i64) -> Result<Option<SchemaRecord>> {
        self.schemas().default_for_database(db_id)
    }

    fn tables(&self, schema_id: i64) -> Result<Vec<TableRecord>> {
        self.tables().list_for_schema(schema_id)
    }

    fn find_table(&self, schema_id: i64, predicate: &Predicate) -> Result<Option<TableRecord>> {
        self.tables().find_in_schema(schema_id, predicate)
    }

    fn columns(&self, table_id: i64) -> Result<Vec<ColumnRecord>> {
        self.tables().columns(table_id)
    }
}

/// Standard catalog file path inside a data directory
pub fn catalog_path(data_dir: &str) -> String {
    format!("{}/{}", data_dir, CATALOG_FILE_NAME)
}
