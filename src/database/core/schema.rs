//! Database schema management
//!
//! This module provides schema definitions and management for the catalog store.
//! All catalog tables are defined here so that repositories and the loader
//! agree on column names and constraints.

use anyhow::{anyhow, Result};
use rusqlite::Connection;

/// Current schema version
/// Increment this when making breaking schema changes
///
/// v2: `ms_database.port` is constrained to the TCP port range
pub const SCHEMA_VERSION: u32 = 2;

/// Schema definitions for all tables in the catalog database
pub struct SchemaDefinitions;

impl SchemaDefinitions {
    /// SQL for creating the meta table (tracks schema version and global metadata)
    pub const META_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS metaserv_meta (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );
    "#;

    /// Logical databases (catalogs) known to the service
    pub const DATABASE_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS ms_database (
            db_id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            host TEXT,
            port INTEGER CHECK (port IS NULL OR port BETWEEN 0 AND 65535)
        );
    "#;

    /// Schemas owned by a database; at most one per database is the default
    pub const SCHEMA_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS ms_schema (
            schema_id INTEGER PRIMARY KEY,
            db_id INTEGER NOT NULL REFERENCES ms_database(db_id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            description TEXT,
            is_default INTEGER NOT NULL DEFAULT 0 CHECK (is_default IN (0, 1)),
            UNIQUE (db_id, name)
        );
    "#;

    /// Tables and views owned by a schema
    pub const TABLE_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS ms_table (
            table_id INTEGER PRIMARY KEY,
            schema_id INTEGER NOT NULL REFERENCES ms_schema(schema_id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            table_type TEXT NOT NULL DEFAULT 'table' CHECK (table_type IN ('table', 'view')),
            description TEXT,
            UNIQUE (schema_id, name)
        );
    "#;

    /// Columns owned by a table, ordered by `ordinal`
    pub const COLUMN_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS ms_column (
            column_id INTEGER PRIMARY KEY,
            table_id INTEGER NOT NULL REFERENCES ms_table(table_id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            description TEXT,
            datatype TEXT NOT NULL,
            ucd TEXT,
            unit TEXT,
            ordinal INTEGER NOT NULL,
            UNIQUE (table_id, name)
        );
    "#;

    /// SQL for creating catalog indexes
    pub const CATALOG_INDEXES: &'static [&'static str] = &[
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_ms_schema_default ON ms_schema(db_id) WHERE is_default = 1",
        "CREATE INDEX IF NOT EXISTS idx_ms_table_schema ON ms_table(schema_id)",
        "CREATE INDEX IF NOT EXISTS idx_ms_column_table_ordinal ON ms_column(table_id, ordinal)",
    ];
}

/// Schema status enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaStatus {
    /// Schema is current and valid
    Current,
    /// Schema needs to be initialized (new database)
    NotInitialized,
    /// Schema exists but needs migration
    NeedsMigration { from: u32, to: u32 },
    /// Schema is from a newer version (incompatible)
    Incompatible {
        database_version: u32,
        required_version: u32,
    },
    /// Schema is corrupted or has missing tables
    Corrupted,
}

/// Schema manager for the catalog database
///
/// Handles schema initialization, version checking, and resets.
pub struct SchemaManager<'a> {
    conn: &'a Connection,
}

impl<'a> SchemaManager<'a> {
    /// Create a new schema manager for the given connection
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Initialize the database schema
    ///
    /// Creates all tables and indexes if they don't exist.
    /// Sets the schema version in the meta table.
    pub fn initialize(&self) -> Result<()> {
        self.conn
            .execute(SchemaDefinitions::META_TABLE, [])
            .map_err(|e| anyhow!("Failed to create meta table: {}", e))?;

        self.set_meta("schema_version", &SCHEMA_VERSION.to_string())?;

        let tables = [
            ("ms_database", SchemaDefinitions::DATABASE_TABLE),
            ("ms_schema", SchemaDefinitions::SCHEMA_TABLE),
            ("ms_table", SchemaDefinitions::TABLE_TABLE),
            ("ms_column", SchemaDefinitions::COLUMN_TABLE),
        ];
        for (name, sql) in tables {
            self.conn
                .execute(sql, [])
                .map_err(|e| anyhow!("Failed to create {} table: {}", name, e))?;
        }

        for index_sql in SchemaDefinitions::CATALOG_INDEXES {
            self.conn
                .execute(index_sql, [])
                .map_err(|e| anyhow!("Failed to create catalog index: {}", e))?;
        }

        Ok(())
    }

    /// Check the current schema status
    pub fn check_status(&self) -> Result<SchemaStatus> {
        if !self.table_exists("metaserv_meta") {
            return Ok(SchemaStatus::NotInitialized);
        }

        let current_version = self.get_schema_version()?;

        if current_version == SCHEMA_VERSION {
            if self.verify_integrity()? {
                Ok(SchemaStatus::Current)
            } else {
                Ok(SchemaStatus::Corrupted)
            }
        } else if current_version < SCHEMA_VERSION {
            Ok(SchemaStatus::NeedsMigration {
                from: current_version,
                to: SCHEMA_VERSION,
            })
        } else {
            Ok(SchemaStatus::Incompatible {
                database_version: current_version,
                required_version: SCHEMA_VERSION,
            })
        }
    }

    /// Get the current schema version from the database
    fn get_schema_version(&self) -> Result<u32> {
        let version: String = self
            .conn
            .query_row(
                "SELECT value FROM metaserv_meta WHERE key = 'schema_version'",
                [],
                |row| row.get(0),
            )
            .unwrap_or_else(|_| "0".to_string());

        version
            .parse()
            .map_err(|e| anyhow!("Invalid schema version: {}", e))
    }

    /// Verify schema integrity by checking required tables exist
    fn verify_integrity(&self) -> Result<bool> {
        let required_tables = [
            "metaserv_meta",
            "ms_database",
            "ms_schema",
            "ms_table",
            "ms_column",
        ];

        for table in required_tables {
            if !self.table_exists(table) {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn table_exists(&self, table_name: &str) -> bool {
        self.conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                [table_name],
                |row| row.get::<_, i32>(0),
            )
            .map(|count| count > 0)
            .unwrap_or(false)
    }

    /// Set a metadata value
    pub fn set_meta(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO metaserv_meta (key, value, updated_at) VALUES (?1, ?2, strftime('%s', 'now'))",
                [key, value],
            )
            .map_err(|e| anyhow!("Failed to set meta value: {}", e))?;
        Ok(())
    }

    /// Get a metadata value
    pub fn get_meta(&self, key: &str) -> Result<Option<String>> {
        let result: Result<String, _> = self.conn.query_row(
            "SELECT value FROM metaserv_meta WHERE key = ?1",
            [key],
            |row| row.get(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(anyhow!("Failed to get meta value: {}", e)),
        }
    }

    /// Reset the database by dropping all tables
    ///
    /// Children are dropped before their owners.
    pub fn reset(&self) -> Result<()> {
        self.conn.execute("DROP TABLE IF EXISTS ms_column", [])?;
        self.conn.execute("DROP TABLE IF EXISTS ms_table", [])?;
        self.conn.execute("DROP TABLE IF EXISTS ms_schema", [])?;
        self.conn.execute("DROP TABLE IF EXISTS ms_database", [])?;
        self.conn.execute("DROP TABLE IF EXISTS metaserv_meta", [])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_db() -> Connection {
        Connection::open_in_memory().unwrap()
    }

    #[test]
    fn test_initialize_schema() {
        let conn = create_test_db();
        let manager = SchemaManager::new(&conn);

        manager.initialize().unwrap();
        assert_eq!(manager.check_status().unwrap(), SchemaStatus::Current);
    }

    #[test]
    fn test_not_initialized() {
        let conn = create_test_db();
        let manager = SchemaManager::new(&conn);

        assert_eq!(
            manager.check_status().unwrap(),
            SchemaStatus::NotInitialized
        );
    }

    #[test]
    fn test_meta_operations() {
        let conn = create_test_db();
        let manager = SchemaManager::new(&conn);
        manager.initialize().unwrap();

        manager.set_meta("loaded_from", "catalog.json").unwrap();
        assert_eq!(
            manager.get_meta("loaded_from").unwrap(),
            Some("catalog.json".to_string())
        );
        assert_eq!(manager.get_meta("missing").unwrap(), None);
    }

    #[test]
    fn test_incompatible_version() {
        let conn = create_test_db();
        let manager = SchemaManager::new(&conn);
        manager.initialize().unwrap();
        manager
            .set_meta("schema_version", &(SCHEMA_VERSION + 1).to_string())
            .unwrap();

        assert_eq!(
            manager.check_status().unwrap(),
            SchemaStatus::Incompatible {
                database_version: SCHEMA_VERSION + 1,
                required_version: SCHEMA_VERSION,
            }
        );
    }

    #[test]
    fn test_corrupted_when_table_missing() {
        let conn = create_test_db();
        let manager = SchemaManager::new(&conn);
        manager.initialize().unwrap();
        conn.execute("DROP TABLE ms_column", []).unwrap();

        assert_eq!(manager.check_status().unwrap(), SchemaStatus::Corrupted);
    }

    #[test]
    fn test_reset() {
        let conn = create_test_db();
        let manager = SchemaManager::new(&conn);
        manager.initialize().unwrap();

        manager.reset().unwrap();
        assert_eq!(
            manager.check_status().unwrap(),
            SchemaStatus::NotInitialized
        );
    }

    #[test]
    fn test_single_default_schema_per_database() {
        let conn = create_test_db();
        let manager = SchemaManager::new(&conn);
        manager.initialize().unwrap();

        conn.execute("INSERT INTO ms_database (db_id, name) VALUES (1, 'db')", [])
            .unwrap();
        conn.execute(
            "INSERT INTO ms_schema (schema_id, db_id, name, is_default) VALUES (10, 1, 'a', 1)",
            [],
        )
        .unwrap();
        let second = conn.execute(
            "INSERT INTO ms_schema (schema_id, db_id, name, is_default) VALUES (11, 1, 'b', 1)",
            [],
        );
        assert!(second.is_err());
    }

    #[test]
    fn test_port_outside_tcp_range_rejected() {
        let conn = create_test_db();
        let manager = SchemaManager::new(&conn);
        manager.initialize().unwrap();

        conn.execute(
            "INSERT INTO ms_database (db_id, name, port) VALUES (1, 'good', 3360), (2, 'bare', NULL)",
            [],
        )
        .unwrap();

        for port in [70000, 65536, -1] {
            let result = conn.execute(
                "INSERT INTO ms_database (db_id, name, port) VALUES (3, 'bad', ?1)",
                [port],
            );
            assert!(result.is_err(), "port {} was accepted", port);
        }
    }

    #[test]
    fn test_older_store_needs_migration() {
        let conn = create_test_db();
        let manager = SchemaManager::new(&conn);
        manager.initialize().unwrap();
        manager.set_meta("schema_version", "1").unwrap();

        assert_eq!(
            manager.check_status().unwrap(),
            SchemaStatus::NeedsMigration {
                from: 1,
                to: SCHEMA_VERSION,
            }
        );
    }
}
