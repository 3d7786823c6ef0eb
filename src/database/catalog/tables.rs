//! Table and column repository for the catalog store

use anyhow::{anyhow, Result};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};

use super::predicate::Predicate;

/// A table or view within a schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRecord {
    pub id: i64,
    pub schema_id: i64,
    pub name: String,
    /// `table` or `view`
    pub table_type: String,
    pub description: Option<String>,
}

/// A column of a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRecord {
    pub id: i64,
    pub table_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub datatype: String,
    pub ucd: Option<String>,
    pub unit: Option<String>,
    pub ordinal: i64,
}

const SELECT_TABLE: &str =
    "SELECT table_id, schema_id, name, table_type, description FROM ms_table";

/// Repository for table and column records
pub struct TableRepository<'a> {
    conn: &'a Connection,
}

impl<'a> TableRepository<'a> {
    /// Create a new table repository
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// List the tables of a schema ordered by name
    pub fn list_for_schema(&self, schema_id: i64) -> Result<Vec<TableRecord>> {
        let query = format!("{} WHERE schema_id = ?1 ORDER BY name", SELECT_TABLE);
        let mut stmt = self.conn.prepare(&query)?;
        let rows = stmt
            .query_map([schema_id], Self::map_table)
            .map_err(|e| anyhow!("Failed to list tables: {}", e))?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| anyhow!("Failed to read table row: {}", e))
    }

    /// Find the table matching the predicate within a schema
    pub fn find_in_schema(
        &self,
        schema_id: i64,
        predicate: &Predicate,
    ) -> Result<Option<TableRecord>> {
        let query = format!(
            "{} WHERE schema_id = ?1 AND {} ORDER BY table_id LIMIT 1",
            SELECT_TABLE,
            predicate.to_sql("name", "table_id", 2)
        );
        let mut params = vec![Value::Integer(schema_id)];
        params.extend(predicate.params());

        self.conn
            .query_row(&query, params_from_iter(params), Self::map_table)
            .optional()
            .map_err(|e| anyhow!("Failed to look up table '{}': {}", predicate.name(), e))
    }

    /// List the columns of a table in ordinal order
    pub fn columns(&self, table_id: i64) -> Result<Vec<ColumnRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT column_id, table_id, name, description, datatype, ucd, unit, ordinal
             FROM ms_column WHERE table_id = ?1
             ORDER BY ordinal, column_id",
        )?;
        let rows = stmt
            .query_map([table_id], Self::map_column)
            .map_err(|e| anyhow!("Failed to list columns: {}", e))?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| anyhow!("Failed to read column row: {}", e))
    }

    /// Get the total number of tables in the catalog
    pub fn count(&self) -> Result<u64> {
        let count: u64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM ms_table", [], |row| row.get(0))
            .map_err(|e| anyhow!("Failed to get table count: {}", e))?;
        Ok(count)
    }

    fn map_table(row: &Row<'_>) -> rusqlite::Result<TableRecord> {
        Ok(TableRecord {
            id: row.get(0)?,
            schema_id: row.get(1)?,
            name: row.get(2)?,
            table_type: row.get(3)?,
            description: row.get(4)?,
        })
    }

    fn map_column(row: &Row<'_>) -> rusqlite::Result<ColumnRecord> {
        Ok(ColumnRecord {
            id: row.get(0)?,
            table_id: row.get(1)?,
            name: row.get(2)?,
            description: row.get(3)?,
            datatype: row.get(4)?,
            ucd: row.get(5)?,
            unit: row.get(6)?,
            ordinal: row.get(7)?,
        })
    }
}
