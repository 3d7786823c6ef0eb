//! Catalog loader
//!
//! Loads a JSON description of databases, schemas, tables and columns into
//! the catalog store. This is operator tooling: the HTTP service itself never
//! writes to the store.
//!
//! # Format
//!
//! ```json
//! {
//!   "databases": [{
//!     "id": 1, "name": "S12_sdss", "host": "lsst-qserv-dax01", "port": 3360,
//!     "schemas": [{
//!       "id": 10, "name": "sdss_stripe82_00", "default": true,
//!       "tables": [{
//!         "id": 100, "name": "Object", "table_type": "table",
//!         "columns": [
//!           {"name": "objectId", "datatype": "long", "ucd": "meta.id;src"},
//!           {"name": "ra", "datatype": "double", "unit": "deg"}
//!         ]
//!       }]
//!     }]
//!   }]
//! }
//! ```
//!
//! Ids are optional and assigned by the store when omitted. A column without
//! an explicit `ordinal` takes its position in the list. A database whose
//! schemas carry no `default` flag gets its first listed schema as default.

use anyhow::{anyhow, bail, Result};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::lens::catalog::is_safe_name;

/// Root of a catalog description document
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CatalogDescription {
    #[serde(default)]
    pub databases: Vec<DatabaseDescription>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseDescription {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub schemas: Vec<SchemaDescription>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchemaDescription {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub tables: Vec<TableDescription>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TableDescription {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default = "default_table_type")]
    pub table_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub columns: Vec<ColumnDescription>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ColumnDescription {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub datatype: String,
    #[serde(default)]
    pub ucd: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub ordinal: Option<i64>,
}

fn default_table_type() -> String {
    "table".to_string()
}

/// Counts of records written by a load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub databases: usize,
    pub schemas: usize,
    pub tables: usize,
    pub columns: usize,
}

impl CatalogDescription {
    /// Parse a description from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| anyhow!("Invalid catalog description: {}", e))
    }

    /// Check names and default-schema flags before anything is written
    pub fn validate(&self) -> Result<()> {
        for db in &self.databases {
            check_name("database", &db.name)?;

            let defaults = db.schemas.iter().filter(|s| s.default).count();
            if defaults > 1 {
                bail!(
                    "database '{}' flags {} schemas as default, expected at most one",
                    db.name,
                    defaults
                );
            }

            for schema in &db.schemas {
                check_name("schema", &schema.name)?;
                for table in &schema.tables {
                    check_name("table", &table.name)?;
                    if table.table_type != "table" && table.table_type != "view" {
                        bail!(
                            "table '{}' has type '{}', expected 'table' or 'view'",
                            table.name,
                            table.table_type
                        );
                    }
                }
            }
        }
        Ok(())
    }
}

fn check_name(kind: &str, name: &str) -> Result<()> {
    if is_safe_name(name) {
        Ok(())
    } else {
        Err(anyhow!("{} name '{}' is not a valid identifier", kind, name))
    }
}

/// Writes catalog descriptions into the store
pub struct CatalogLoader<'a> {
    conn: &'a Connection,
}

impl<'a> CatalogLoader<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Load a description in a single transaction
    ///
    /// Existing databases with the same name are replaced, together with
    /// everything they own.
    pub fn load(&self, description: &CatalogDescription) -> Result<LoadSummary> {
        description.validate()?;

        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|e| anyhow!("Failed to begin transaction: {}", e))?;

        let mut summary = LoadSummary::default();
        {
            let mut delete_db = tx.prepare("DELETE FROM ms_database WHERE name = ?1")?;
            let mut insert_db = tx.prepare(
                "INSERT INTO ms_database (db_id, name, host, port) VALUES (?1, ?2, ?3, ?4)",
            )?;
            let mut insert_schema = tx.prepare(
                "INSERT INTO ms_schema (schema_id, db_id, name, description, is_default)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            let mut insert_table = tx.prepare(
                "INSERT INTO ms_table (table_id, schema_id, name, table_type, description)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            let mut insert_column = tx.prepare(
                "INSERT INTO ms_column (table_id, name, description, datatype, ucd, unit, ordinal)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;

            for db in &description.databases {
                delete_db.execute([db.name.as_str()])?;
                insert_db
                    .execute((db.id, db.name.as_str(), db.host.as_deref(), db.port))
                    .map_err(|e| anyhow!("Failed to insert database '{}': {}", db.name, e))?;
                let db_id = tx.last_insert_rowid();
                summary.databases += 1;

                let has_flagged_default = db.schemas.iter().any(|s| s.default);
                for (schema_idx, schema) in db.schemas.iter().enumerate() {
                    let is_default = schema.default || (!has_flagged_default && schema_idx == 0);
                    insert_schema
                        .execute((
                            schema.id,
                            db_id,
                            schema.name.as_str(),
                            schema.description.as_deref(),
                            is_default,
                        ))
                        .map_err(|e| {
                            anyhow!("Failed to insert schema '{}': {}", schema.name, e)
                        })?;
                    let schema_id = tx.last_insert_rowid();
                    summary.schemas += 1;

                    for table in &schema.tables {
                        insert_table
                            .execute((
                                table.id,
                                schema_id,
                                table.name.as_str(),
                                table.table_type.as_str(),
                                table.description.as_deref(),
                            ))
                            .map_err(|e| {
                                anyhow!("Failed to insert table '{}': {}", table.name, e)
                            })?;
                        let table_id = tx.last_insert_rowid();
                        summary.tables += 1;

                        for (position, column) in table.columns.iter().enumerate() {
                            let ordinal = column.ordinal.unwrap_or(position as i64);
                            insert_column
                                .execute((
                                    table_id,
                                    column.name.as_str(),
                                    column.description.as_deref(),
                                    column.datatype.as_str(),
                                    column.ucd.as_deref(),
                                    column.unit.as_deref(),
                                    ordinal,
                                ))
                                .map_err(|e| {
                                    anyhow!("Failed to insert column '{}': {}", column.name, e)
                                })?;
                            summary.columns += 1;
                        }
                    }
                }
            }
        }

        tx.commit()
            .map_err(|e| anyhow!("Failed to commit transaction: {}", e))?;

        info!(
            "Catalog load finished: {} databases, {} schemas, {} tables, {} columns",
            summary.databases, summary.schemas, summary.tables, summary.columns
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::catalog::CatalogDatabase;

    const SAMPLE: &str = r#"{
        "databases": [{
            "name": "S12_sdss",
            "schemas": [
                {"name": "first"},
                {"name": "second", "tables": [
                    {"name": "Object", "columns": [
                        {"name": "objectId", "datatype": "long"},
                        {"name": "ra", "datatype": "double", "unit": "deg"}
                    ]}
                ]}
            ]
        }]
    }"#;

    #[test]
    fn test_load_assigns_ids_and_first_default() {
        let db = CatalogDatabase::open_in_memory().unwrap();
        let description = CatalogDescription::from_json(SAMPLE).unwrap();

        let summary = db.loader().load(&description).unwrap();
        assert_eq!(
            summary,
            LoadSummary {
                databases: 1,
                schemas: 2,
                tables: 1,
                columns: 2
            }
        );

        let record = db.databases().list().unwrap().remove(0);
        assert_eq!(record.default_schema.as_deref(), Some("first"));
    }

    #[test]
    fn test_reload_replaces_database() {
        let db = CatalogDatabase::open_in_memory().unwrap();
        let description = CatalogDescription::from_json(SAMPLE).unwrap();

        db.loader().load(&description).unwrap();
        db.loader().load(&description).unwrap();

        assert_eq!(db.databases().count().unwrap(), 1);
        assert_eq!(db.tables().count().unwrap(), 1);
    }

    #[test]
    fn test_rejects_invalid_names() {
        let description = CatalogDescription::from_json(
            r#"{"databases": [{"name": "1bad", "schemas": []}]}"#,
        )
        .unwrap();
        assert!(description.validate().is_err());

        let db = CatalogDatabase::open_in_memory().unwrap();
        assert!(db.loader().load(&description).is_err());
        assert_eq!(db.databases().count().unwrap(), 0);
    }

    #[test]
    fn test_rejects_two_defaults() {
        let description = CatalogDescription::from_json(
            r#"{"databases": [{"name": "db", "schemas": [
                {"name": "a", "default": true},
                {"name": "b", "default": true}
            ]}]}"#,
        )
        .unwrap();
        assert!(description.validate().is_err());
    }

    #[test]
    fn test_rejects_unknown_table_type() {
        let description = CatalogDescription::from_json(
            r#"{"databases": [{"name": "db", "schemas": [
                {"name": "a", "tables": [{"name": "t", "table_type": "index"}]}
            ]}]}"#,
        )
        .unwrap();
        assert!(description.validate().is_err());
    }
}
