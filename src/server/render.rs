//! HTML rendering of catalog documents
//!
//! Pages are plain HTML built from the same documents the JSON API returns.
//! Every catalog value is escaped before it is written.

use std::fmt::Write;

use crate::lens::catalog::{DatabaseEntry, Document};

const STYLE: &str = "body{font-family:sans-serif;margin:2rem;color:#222}\
table{border-collapse:collapse}\
th,td{border:1px solid #ccc;padding:0.3rem 0.6rem;text-align:left}\
th{background:#f3f3f3}";

/// Escape text for use in HTML element content and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn opt(value: &Option<String>) -> String {
    value.as_deref().map(escape).unwrap_or_default()
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}</body>\n</html>\n",
        title = escape(title),
    )
}

/// Landing page of the service
pub fn render_index() -> String {
    page(
        "Metadata v1",
        "<h1>Metadata v1</h1>\n<p>Browse the catalog: <a href=\"/db/\">/db/</a></p>\n",
    )
}

/// Render a document as a page
///
/// `base_path` is the request path. Links to child entities are built under it.
pub fn render_document(document: &Document, base_path: &str) -> String {
    let base = if base_path.ends_with('/') {
        base_path.to_string()
    } else {
        format!("{}/", base_path)
    };
    let base = escape(&base);

    let mut body = String::new();
    let title = match document {
        Document::Databases(entries) => {
            body.push_str("<h1>Databases</h1>\n<table>\n<tr><th>name</th><th>host</th><th>port</th><th>default schema</th></tr>\n");
            for entry in entries {
                let name = escape(entry.name());
                let (host, port, default_schema) = match entry {
                    DatabaseEntry::Name(_) => (String::new(), String::new(), String::new()),
                    DatabaseEntry::Summary(s) => (
                        opt(&s.host),
                        s.port.map(|p| p.to_string()).unwrap_or_default(),
                        opt(&s.default_schema),
                    ),
                };
                let _ = writeln!(
                    body,
                    "<tr><td><a href=\"{base}{name}/\">{name}</a></td><td>{host}</td><td>{port}</td><td>{default_schema}</td></tr>"
                );
            }
            body.push_str("</table>\n");
            "Databases".to_string()
        }
        Document::Database(detail) => {
            let db = &detail.database;
            let _ = writeln!(body, "<h1>Database {}</h1>", escape(&db.name));
            let _ = writeln!(
                body,
                "<p>host: {} port: {} default schema: {}</p>",
                opt(&db.host),
                db.port.map(|p| p.to_string()).unwrap_or_default(),
                opt(&db.default_schema)
            );
            body.push_str("<table>\n<tr><th>schema</th><th>default</th><th>description</th></tr>\n");
            for schema in &detail.schemas {
                let name = escape(&schema.name);
                let _ = writeln!(
                    body,
                    "<tr><td><a href=\"{base}{name}/tables/\">{name}</a></td><td>{}</td><td>{}</td></tr>",
                    if schema.is_default { "yes" } else { "" },
                    opt(&schema.description)
                );
            }
            body.push_str("</table>\n");
            format!("Database {}", db.name)
        }
        Document::Tables(tables) => {
            let schema = &tables.schema;
            let _ = writeln!(body, "<h1>Schema {}</h1>", escape(&schema.name));
            if let Some(description) = &schema.description {
                let _ = writeln!(body, "<p>{}</p>", escape(description));
            }
            body.push_str("<table>\n<tr><th>table</th><th>type</th><th>description</th></tr>\n");
            for table in &tables.tables {
                let name = escape(&table.name);
                let _ = writeln!(
                    body,
                    "<tr><td><a href=\"{base}{name}/\">{name}</a></td><td>{}</td><td>{}</td></tr>",
                    escape(&table.table_type),
                    opt(&table.description)
                );
            }
            body.push_str("</table>\n");
            format!("Schema {}", schema.name)
        }
        Document::Table(detail) => {
            let table = &detail.table;
            let _ = writeln!(
                body,
                "<h1>{} {}</h1>",
                escape(&table.table_type),
                escape(&table.name)
            );
            if let Some(description) = &table.description {
                let _ = writeln!(body, "<p>{}</p>", escape(description));
            }
            body.push_str("<table>\n<tr><th>column</th><th>datatype</th><th>unit</th><th>ucd</th><th>description</th></tr>\n");
            for column in &detail.columns {
                let _ = writeln!(
                    body,
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                    escape(&column.name),
                    escape(&column.datatype),
                    opt(&column.unit),
                    opt(&column.ucd),
                    opt(&column.description)
                );
            }
            body.push_str("</table>\n");
            format!("Table {}", table.name)
        }
    };

    page(&title, &body)
}

/// Render an error as a page
pub fn render_error(status: u16, message: &str) -> String {
    page(
        &format!("Error {}", status),
        &format!("<h1>Error {}</h1>\n<p>{}</p>\n", status, escape(message)),
    )
}
