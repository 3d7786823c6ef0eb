//! Schema repository for the catalog store
//!
//! Every lookup is scoped to the owning database.

use anyhow::{anyhow, Result};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};

use super::predicate::Predicate;

/// A schema within a logical database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRecord {
    pub id: i64,
    pub db_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_default: bool,
}

const SELECT_SCHEMA: &str =
    "SELECT schema_id, db_id, name, description, is_default FROM ms_schema";

/// Repository for schema records
pub struct SchemaRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SchemaRepository<'a> {
    /// Create a new schema repository
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// List the schemas of a database ordered by name
    pub fn list_for_database(&self, db_id: i64) -> Result<Vec<SchemaRecord>> {
        let query = format!("{} WHERE db_id = ?1 ORDER BY name", SELECT_SCHEMA);
        let mut stmt = self.conn.prepare(&query)?;
        let rows = stmt
            .query_map([db_id], Self::map_row)
            .map_err(|e| anyhow!("Failed to list schemas: {}", e))?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| anyhow!("Failed to read schema row: {}", e))
    }

    /// Find the schema matching the predicate within a database
    pub fn find_in_database(
        &self,
        db_id: i64,
        predicate: &Predicate,
    ) -> Result<Option<SchemaRecord>> {
        let query = format!(
            "{} WHERE db_id = ?1 AND {} ORDER BY schema_id LIMIT 1",
            SELECT_SCHEMA,
            predicate.to_sql("name", "schema_id", 2)
        );
        let mut params = vec![Value::Integer(db_id)];
        params.extend(predicate.params());

        self.conn
            .query_row(&query, params_from_iter(params), Self::map_row)
            .optional()
            .map_err(|e| anyhow!("Failed to look up schema '{}': {}", predicate.name(), e))
    }

    /// Get the schema a database designates as its default
    pub fn default_for_database(&self, db_id: i64) -> Result<Option<SchemaRecord>> {
        let query = format!("{} WHERE db_id = ?1 AND is_default = 1", SELECT_SCHEMA);

        self.conn
            .query_row(&query, [db_id], Self::map_row)
            .optional()
            .map_err(|e| anyhow!("Failed to look up default schema: {}", e))
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<SchemaRecord> {
        Ok(SchemaRecord {
            id: row.get(0)?,
            db_id: row.get(1)?,
            name: row.get(2)?,
            description: row.get(3)?,
            is_default: row.get(4)?,
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
        db.execute("INSERT INTO ms_database (db_id, name) VALUES (1, 'a'), (2, 'b')")
            .unwrap();
        db.execute(
            "INSERT INTO ms_schema (schema_id, db_id, name, is_default) VALUES
                (10, 1, 'main', 1),
                (11, 1, 'extra', 0),
                (20, 2, 'main', 0)",
        )
        .unwrap();
        db
    }

    #[test]
    fn test_list_scoped_to_database() {
        let db = setup_test_db();
        let repo = SchemaRepository::new(&db.conn);

        let names: Vec<String> = repo
            .list_for_database(1)
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["extra", "main"]);
    }

    #[test]
    fn test_find_is_scoped() {
        let db = setup_test_db();
        let repo = SchemaRepository::new(&db.conn);

        let found = repo
            .find_in_database(2, &Predicate::by_name("main"))
            .unwrap()
            .unwrap();
        assert_eq!(found.id, 20);

        // schema 10 belongs to database 1, not 2
        assert!(repo
            .find_in_database(2, &Predicate::by_name_or_id("10", 10))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_default_schema() {
        let db = setup_test_db();
        let repo = SchemaRepository::new(&db.conn);

        let default = repo.default_for_database(1).unwrap().unwrap();
        assert_eq!(default.name, "main");
        assert!(default.is_default);

        assert!(repo.default_for_database(2).unwrap().is_none());
    }
}
