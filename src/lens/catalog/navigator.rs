//! Hierarchy navigation
//!
//! Walks database → schema → table against a [`CatalogStore`]. Every token is
//! validated before the first store query, and the walk stops at the first
//! level that does not resolve.

use tracing::debug;

use super::error::{CatalogError, EntityKind};
use super::resolver::resolve;
use crate::database::{CatalogStore, DatabaseRecord, SchemaRecord, TableRecord};

/// A resolved path through the catalog hierarchy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub database: DatabaseRecord,
    pub schema: SchemaRecord,
    pub table: Option<TableRecord>,
}

/// Resolve a database token
pub fn locate_database<S: CatalogStore + ?Sized>(
    store: &S,
    db_token: &str,
) -> Result<DatabaseRecord, CatalogError> {
    let predicate = resolve(db_token, EntityKind::Database)?;
    store
        .find_database(&predicate)?
        .ok_or_else(|| CatalogError::not_found(EntityKind::Database, db_token))
}

/// Resolve a full chain
///
/// Without a schema token the database's default schema is used. A database
/// without a default schema is a schema miss, never an empty schema.
pub fn navigate<S: CatalogStore + ?Sized>(
    store: &S,
    db_token: &str,
    schema_token: Option<&str>,
    table_token: Option<&str>,
) -> Result<Chain, CatalogError> {
    let db_predicate = resolve(db_token, EntityKind::Database)?;
    let schema_predicate = schema_token
        .map(|token| resolve(token, EntityKind::Schema))
        .transpose()?;
    let table_predicate = table_token
        .map(|token| resolve(token, EntityKind::Table))
        .transpose()?;

    let database = store
        .find_database(&db_predicate)?
        .ok_or_else(|| CatalogError::not_found(EntityKind::Database, db_token))?;
    debug!("resolved database '{}' to id {}", db_token, database.id);

    let schema = match &schema_predicate {
        Some(predicate) => store
            .find_schema(database.id, predicate)?
            .ok_or_else(|| CatalogError::not_found(EntityKind::Schema, predicate.name()))?,
        None => store
            .default_schema(database.id)?
            .ok_or_else(|| CatalogError::NoDefaultSchema {
                database: database.name.clone(),
            })?,
    };
    debug!("resolved schema '{}' (id {})", schema.name, schema.id);

    let table = match &table_predicate {
        Some(predicate) => {
            let table = store
                .find_table(schema.id, predicate)?
                .ok_or_else(|| CatalogError::not_found(EntityKind::Table, predicate.name()))?;
            debug!("resolved table '{}' (id {})", table.name, table.id);
            Some(table)
        }
        None => None,
    };

    Ok(Chain {
        database,
        schema,
        table,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{CatalogDatabase, CatalogDescription};

    fn setup() -> CatalogDatabase {
        let db = CatalogDatabase::open_in_memory().unwrap();
        let description = CatalogDescription::from_json(
            r#"{"databases": [
                {"id": 1, "name": "S12_sdss", "schemas": [
                    {"id": 10, "name": "sdss_stripe82_00", "default": true, "tables": [
                        {"id": 100, "name": "Object", "columns": [
                            {"name": "objectId", "datatype": "int"}
                        ]}
                    ]},
                    {"id": 11, "name": "sdss_stripe82_01", "tables": [
                        {"id": 110, "name": "Source"}
                    ]}
                ]}
            ]}"#,
        )
        .unwrap();
        db.loader().load(&description).unwrap();
        db.connection()
            .execute("INSERT INTO ms_database (db_id, name) VALUES (2, 'empty')", [])
            .unwrap();
        db
    }

    #[test]
    fn test_default_schema_fallback() {
        let db = setup();
        let chain = navigate(&db, "S12_sdss", None, Some("Object")).unwrap();
        assert_eq!(chain.schema.id, 10);
        assert_eq!(chain.table.unwrap().id, 100);
    }

    #[test]
    fn test_explicit_schema_by_id() {
        let db = setup();
        let chain = navigate(&db, "1", Some("11"), Some("Source")).unwrap();
        assert_eq!(chain.database.name, "S12_sdss");
        assert_eq!(chain.schema.name, "sdss_stripe82_01");
        assert_eq!(chain.table.unwrap().name, "Source");
    }

    #[test]
    fn test_missing_default_schema() {
        let db = setup();
        let err = navigate(&db, "empty", None, None).unwrap_err();
        assert!(matches!(err, CatalogError::NoDefaultSchema { .. }));
        assert_eq!(err.kind(), Some(EntityKind::Schema));
    }

    #[test]
    fn test_first_miss_wins() {
        let db = setup();

        let err = navigate(&db, "nonexistent", Some("nothere"), Some("Object")).unwrap_err();
        assert_eq!(err.kind(), Some(EntityKind::Database));

        let err = navigate(&db, "S12_sdss", Some("nothere"), Some("Object")).unwrap_err();
        assert_eq!(err.kind(), Some(EntityKind::Schema));

        // Source lives in schema 11, not the default
        let err = navigate(&db, "S12_sdss", None, Some("Source")).unwrap_err();
        assert_eq!(err.kind(), Some(EntityKind::Table));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_locate_database() {
        let db = setup();
        assert_eq!(locate_database(&db, "2").unwrap().name, "empty");
        assert!(locate_database(&db, "3").unwrap_err().is_not_found());
    }
}
