//! Response documents
//!
//! Each scope has one document shape. Field order follows struct definition
//! order, primary-entity fields first, and nested collections last.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::database::{ColumnRecord, DatabaseRecord, SchemaRecord, TableRecord};

/// What a catalog query asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// `/db/`
    Databases,
    /// `/db/{db}/`
    Database,
    /// `/db/{db}[/{schema}]/tables/`
    Tables,
    /// `/db/{db}[/{schema}]/tables/{table}/`
    Table,
}

/// How much of each database the databases list carries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Names only
    #[default]
    Names,
    /// Full database summaries
    Described,
}

impl Verbosity {
    pub fn from_flag(described: bool) -> Self {
        if described {
            Self::Described
        } else {
            Self::Names
        }
    }
}

// =============================================================================
// Summaries
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseSummary {
    pub name: String,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub default_schema: Option<String>,
}

impl From<DatabaseRecord> for DatabaseSummary {
    fn from(record: DatabaseRecord) -> Self {
        Self {
            name: record.name,
            host: record.host,
            port: record.port,
            default_schema: record.default_schema,
        }
    }
}

/// One entry of the databases list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DatabaseEntry {
    Name(String),
    Summary(DatabaseSummary),
}

impl DatabaseEntry {
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) => name,
            Self::Summary(summary) => &summary.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaSummary {
    pub name: String,
    pub description: Option<String>,
    pub is_default: bool,
}

impl From<SchemaRecord> for SchemaSummary {
    fn from(record: SchemaRecord) -> Self {
        Self {
            name: record.name,
            description: record.description,
            is_default: record.is_default,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    pub name: String,
    pub table_type: String,
    pub description: Option<String>,
}

impl From<TableRecord> for TableSummary {
    fn from(record: TableRecord) -> Self {
        Self {
            name: record.name,
            table_type: record.table_type,
            description: record.description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub description: Option<String>,
    pub datatype: String,
    pub ucd: Option<String>,
    pub unit: Option<String>,
}

impl From<ColumnRecord> for ColumnDescriptor {
    fn from(record: ColumnRecord) -> Self {
        Self {
            name: record.name,
            description: record.description,
            datatype: record.datatype,
            ucd: record.ucd,
            unit: record.unit,
        }
    }
}

// =============================================================================
// Detail documents
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseDetail {
    #[serde(flatten)]
    pub database: DatabaseSummary,
    pub schemas: Vec<SchemaSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaTables {
    #[serde(flatten)]
    pub schema: SchemaSummary,
    pub tables: Vec<TableSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableDetail {
    #[serde(flatten)]
    pub table: TableSummary,
    pub columns: Vec<ColumnDescriptor>,
}

/// A complete response document
///
/// Collections serialize as `{"results": [...]}`, single entities as
/// `{"result": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document {
    Databases(Vec<DatabaseEntry>),
    Database(DatabaseDetail),
    Tables(SchemaTables),
    Table(TableDetail),
}

impl Document {
    pub fn scope(&self) -> Scope {
        match self {
            Self::Databases(_) => Scope::Databases,
            Self::Database(_) => Scope::Database,
            Self::Tables(_) => Scope::Tables,
            Self::Table(_) => Scope::Table,
        }
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Self::Databases(entries) => map.serialize_entry("results", entries)?,
            Self::Database(detail) => map.serialize_entry("result", detail)?,
            Self::Tables(tables) => map.serialize_entry("result", tables)?,
            Self::Table(detail) => map.serialize_entry("result", detail)?,
        }
        map.end()
    }
}

// =============================================================================
// Builders
// =============================================================================

pub fn databases_document(records: Vec<DatabaseRecord>, verbosity: Verbosity) -> Document {
    let entries = records
        .into_iter()
        .map(|record| match verbosity {
            Verbosity::Names => DatabaseEntry::Name(record.name),
            Verbosity::Described => DatabaseEntry::Summary(record.into()),
        })
        .collect();
    Document::Databases(entries)
}

pub fn database_document(database: DatabaseRecord, schemas: Vec<SchemaRecord>) -> Document {
    Document::Database(DatabaseDetail {
        database: database.into(),
        schemas: schemas.into_iter().map(Into::into).collect(),
    })
}

pub fn tables_document(schema: SchemaRecord, tables: Vec<TableRecord>) -> Document {
    Document::Tables(SchemaTables {
        schema: schema.into(),
        tables: tables.into_iter().map(Into::into).collect(),
    })
}

pub fn table_document(table: TableRecord, columns: Vec<ColumnRecord>) -> Document {
    Document::Table(TableDetail {
        table: table.into(),
        columns: columns.into_iter().map(Into::into).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn database_record() -> DatabaseRecord {
        DatabaseRecord {
            id: 1,
            name: "S12_sdss".to_string(),
            host: Some("lsst-qserv-dax01".to_string()),
            port: Some(3360),
            default_schema: Some("sdss_stripe82_00".to_string()),
        }
    }

    #[test]
    fn test_databases_envelope() {
        let names = databases_document(vec![database_record()], Verbosity::Names);
        assert_eq!(
            serde_json::to_value(&names).unwrap(),
            json!({"results": ["S12_sdss"]})
        );

        let described = databases_document(vec![database_record()], Verbosity::Described);
        assert_eq!(
            serde_json::to_string(&described).unwrap(),
            r#"{"results":[{"name":"S12_sdss","host":"lsst-qserv-dax01","port":3360,"default_schema":"sdss_stripe82_00"}]}"#
        );
    }

    #[test]
    fn test_database_detail_field_order() {
        let schema = SchemaRecord {
            id: 10,
            db_id: 1,
            name: "sdss_stripe82_00".to_string(),
            description: None,
            is_default: true,
        };
        let doc = database_document(database_record(), vec![schema]);
        assert_eq!(doc.scope(), Scope::Database);
        assert_eq!(
            serde_json::to_string(&doc).unwrap(),
            r#"{"result":{"name":"S12_sdss","host":"lsst-qserv-dax01","port":3360,"default_schema":"sdss_stripe82_00","schemas":[{"name":"sdss_stripe82_00","description":null,"is_default":true}]}}"#
        );
    }

    #[test]
    fn test_table_detail_shape() {
        let table = TableRecord {
            id: 100,
            schema_id: 10,
            name: "Object".to_string(),
            table_type: "table".to_string(),
            description: None,
        };
        let column = ColumnRecord {
            id: 1,
            table_id: 100,
            name: "ra".to_string(),
            description: None,
            datatype: "double".to_string(),
            ucd: Some("pos.eq.ra".to_string()),
            unit: Some("deg".to_string()),
            ordinal: 1,
        };
        let value = serde_json::to_value(table_document(table, vec![column])).unwrap();
        assert_eq!(value["result"]["name"], "Object");
        assert_eq!(value["result"]["columns"][0]["datatype"], "double");
        assert_eq!(value["result"]["columns"][0]["unit"], "deg");
    }
}
