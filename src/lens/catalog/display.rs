//! Table rendering of catalog documents

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::projection::{DatabaseEntry, Document};
use crate::lens::utils::{shorten_description, DEFAULT_DESCRIPTION_MAX_LEN};

#[derive(Tabled)]
struct DatabaseRow {
    name: String,
    host: String,
    port: String,
    default_schema: String,
}

#[derive(Tabled)]
struct SchemaRow {
    name: String,
    default: String,
    description: String,
}

#[derive(Tabled)]
struct TableRow {
    name: String,
    #[tabled(rename = "type")]
    table_type: String,
    description: String,
}

#[derive(Tabled)]
struct ColumnRow {
    name: String,
    datatype: String,
    unit: String,
    ucd: String,
    description: String,
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn description(value: &Option<String>) -> String {
    value
        .as_deref()
        .map(|d| shorten_description(d, DEFAULT_DESCRIPTION_MAX_LEN))
        .unwrap_or_default()
}

fn styled<T: Tabled>(rows: Vec<T>, markdown: bool) -> String {
    let mut table = Table::new(rows);
    if markdown {
        table.with(Style::markdown());
    } else {
        table.with(Style::rounded());
    }
    table.to_string()
}

pub(super) fn render(document: &Document, markdown: bool) -> String {
    match document {
        Document::Databases(entries) => {
            let rows: Vec<DatabaseRow> = entries
                .iter()
                .map(|entry| match entry {
                    DatabaseEntry::Name(name) => DatabaseRow {
                        name: name.clone(),
                        host: String::new(),
                        port: String::new(),
                        default_schema: String::new(),
                    },
                    DatabaseEntry::Summary(summary) => DatabaseRow {
                        name: summary.name.clone(),
                        host: text(&summary.host),
                        port: summary.port.map(|p| p.to_string()).unwrap_or_default(),
                        default_schema: text(&summary.default_schema),
                    },
                })
                .collect();
            styled(rows, markdown)
        }
        Document::Database(detail) => {
            let rows: Vec<SchemaRow> = detail
                .schemas
                .iter()
                .map(|schema| SchemaRow {
                    name: schema.name.clone(),
                    default: if schema.is_default { "yes" } else { "" }.to_string(),
                    description: description(&schema.description),
                })
                .collect();
            let location = match (&detail.database.host, detail.database.port) {
                (Some(host), Some(port)) => format!(" ({}:{})", host, port),
                (Some(host), None) => format!(" ({})", host),
                _ => String::new(),
            };
            format!(
                "Database: {}{}\n{}",
                detail.database.name,
                location,
                styled(rows, markdown)
            )
        }
        Document::Tables(tables) => {
            let rows: Vec<TableRow> = tables
                .tables
                .iter()
                .map(|table| TableRow {
                    name: table.name.clone(),
                    table_type: table.table_type.clone(),
                    description: description(&table.description),
                })
                .collect();
            format!("Schema: {}\n{}", tables.schema.name, styled(rows, markdown))
        }
        Document::Table(detail) => {
            let rows: Vec<ColumnRow> = detail
                .columns
                .iter()
                .map(|column| ColumnRow {
                    name: column.name.clone(),
                    datatype: column.datatype.clone(),
                    unit: text(&column.unit),
                    ucd: text(&column.ucd),
                    description: description(&column.description),
                })
                .collect();
            format!(
                "Table: {} ({})\n{}",
                detail.table.name,
                detail.table.table_type,
                styled(rows, markdown)
            )
        }
    }
}
