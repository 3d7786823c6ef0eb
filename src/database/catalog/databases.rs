//! Database repository for the catalog store
//!
//! Logical databases are the root of the catalog hierarchy. Each record also
//! carries the name of its default schema, so listings need no extra query.

use anyhow::{anyhow, Result};
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};

use super::predicate::Predicate;

/// A logical database known to the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseRecord {
    pub id: i64,
    pub name: String,
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Name of the schema flagged as default, if any
    pub default_schema: Option<String>,
}

const SELECT_DATABASE: &str = "SELECT d.db_id, d.name, d.host, d.port, s.name
     FROM ms_database AS d
     LEFT JOIN ms_schema AS s ON s.db_id = d.db_id AND s.is_default = 1";

/// Repository for database records
pub struct DatabaseRepository<'a> {
    conn: &'a Connection,
}

impl<'a> DatabaseRepository<'a> {
    /// Create a new database repository
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Get the number of databases
    pub fn count(&self) -> Result<u64> {
        let count: u64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM ms_database", [], |row| row.get(0))
            .map_err(|e| anyhow!("Failed to get database count: {}", e))?;
        Ok(count)
    }

    /// List all databases ordered by name
    pub fn list(&self) -> Result<Vec<DatabaseRecord>> {
        let query = format!("{} ORDER BY d.name", SELECT_DATABASE);
        let mut stmt = self.conn.prepare(&query)?;
        let rows = stmt
            .query_map([], Self::map_row)
            .map_err(|e| anyhow!("Failed to list databases: {}", e))?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| anyhow!("Failed to read database row: {}", e))
    }

    /// Find the database matching the predicate
    pub fn find(&self, predicate: &Predicate) -> Result<Option<DatabaseRecord>> {
        let query = format!(
            "{} WHERE {} ORDER BY d.db_id LIMIT 1",
            SELECT_DATABASE,
            predicate.to_sql("d.name", "d.db_id", 1)
        );

        self.conn
            .query_row(&query, params_from_iter(predicate.params()), Self::map_row)
            .optional()
            .map_err(|e| anyhow!("Failed to look up database '{}': {}", predicate.name(), e))
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<DatabaseRecord> {
        Ok(DatabaseRecord {
            id: row.get(0)?,
            name: row.get(1)?,
            host: row.get(2)?,
            port: row.get(3)?,
            default_schema: row.get(4)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::core::{DatabaseConn, SchemaManager};

    fn setup_test_db() -> DatabaseConn {
        let db = DatabaseConn::open_in_memory().unwrap();
        SchemaManager::new(&db.conn).initialize().unwrap();
        db.execute(
            "INSERT INTO ms_database (db_id, name, host, port) VALUES
                (1, 'S12_sdss', 'lsst-qserv-dax01', 3360),
                (2, 'qa_l2', NULL, NULL)",
        )
        .unwrap();
        db.execute(
            "INSERT INTO ms_schema (schema_id, db_id, name, is_default) VALUES
                (10, 1, 'sdss_stripe82_00', 1),
                (11, 1, 'sdss_stripe82_01', 0)",
        )
        .unwrap();
        db
    }

    #[test]
    fn test_list_ordered_with_default_schema() {
        let db = setup_test_db();
        let repo = DatabaseRepository::new(&db.conn);

        let list = repo.list().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].name, "S12_sdss");
        assert_eq!(list[0].port, Some(3360));
        assert_eq!(list[0].default_schema.as_deref(), Some("sdss_stripe82_00"));
        assert_eq!(list[1].name, "qa_l2");
        assert_eq!(list[1].default_schema, None);
        assert_eq!(repo.count().unwrap(), 2);
    }

    #[test]
    fn test_find_by_name_and_id() {
        let db = setup_test_db();
        let repo = DatabaseRepository::new(&db.conn);

        let by_name = repo.find(&Predicate::by_name("qa_l2")).unwrap().unwrap();
        assert_eq!(by_name.id, 2);

        let by_id = repo
            .find(&Predicate::by_name_or_id("1", 1))
            .unwrap()
            .unwrap();
        assert_eq!(by_id.name, "S12_sdss");

        assert!(repo.find(&Predicate::by_name("missing")).unwrap().is_none());
        assert!(repo
            .find(&Predicate::by_name_or_id("99", 99))
            .unwrap()
            .is_none());
    }
}
