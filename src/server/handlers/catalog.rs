//! Catalog browsing handlers
//!
//! Paths mirror the catalog hierarchy:
//!
//! - `/db/` lists databases
//! - `/db/{db}/` describes a database and its schemas
//! - `/db/{db}/tables/` and `/db/{db}/{schema}/tables/` list tables
//! - `/db/{db}/tables/{table}/` and `/db/{db}/{schema}/tables/{table}/` describe a table
//!
//! Without an explicit schema the database's default schema is used. Every
//! `{db}`, `{schema}` and `{table}` token may be a name or a numeric id.

use axum::extract::{Query, State};
use axum::http::{HeaderMap, Uri};
use axum::response::Response;
use serde::Deserialize;

use crate::lens::catalog::{CatalogQuery, Verbosity};
use crate::server::extract::CatalogPath;
use crate::server::handlers::respond;
use crate::server::negotiate::Representation;
use crate::server::ServerState;

/// Query string of `GET /db/`
#[derive(Debug, Default, Deserialize)]
pub struct DatabasesParams {
    /// Any value other than `false` or `0` asks for database summaries
    pub description: Option<String>,
}

impl DatabasesParams {
    pub fn verbosity(&self) -> Verbosity {
        let described = self
            .description
            .as_deref()
            .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "false" | "0"))
            .unwrap_or(false);
        Verbosity::from_flag(described)
    }
}

async fn run(state: &ServerState, headers: &HeaderMap, uri: &Uri, query: CatalogQuery) -> Response {
    let representation = Representation::from_headers(headers);
    let result = state.context.execute(query).await;
    respond(representation, uri.path(), result)
}

/// `GET /db/`
pub async fn list_databases(
    State(state): State<ServerState>,
    Query(params): Query<DatabasesParams>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let query = CatalogQuery::Databases {
        verbosity: params.verbosity(),
    };
    run(&state, &headers, &uri, query).await
}

/// `GET /db/{db}/`
pub async fn show_database(
    State(state): State<ServerState>,
    CatalogPath(database): CatalogPath<String>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    run(&state, &headers, &uri, CatalogQuery::Database { database }).await
}

/// `GET /db/{db}/tables/`
pub async fn list_tables(
    State(state): State<ServerState>,
    CatalogPath(database): CatalogPath<String>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let query = CatalogQuery::Tables {
        database,
        schema: None,
    };
    run(&state, &headers, &uri, query).await
}

/// `GET /db/{db}/{schema}/tables/`
pub async fn list_schema_tables(
    State(state): State<ServerState>,
    CatalogPath((database, schema)): CatalogPath<(String, String)>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let query = CatalogQuery::Tables {
        database,
        schema: Some(schema),
    };
    run(&state, &headers, &uri, query).await
}

/// `GET /db/{db}/tables/{table}/`
pub async fn show_table(
    State(state): State<ServerState>,
    CatalogPath((database, table)): CatalogPath<(String, String)>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let query = CatalogQuery::Table {
        database,
        schema: None,
        table,
    };
    run(&state, &headers, &uri, query).await
}

/// `GET /db/{db}/{schema}/tables/{table}/`
pub async fn show_schema_table(
    State(state): State<ServerState>,
    CatalogPath((database, schema, table)): CatalogPath<(String, String, String)>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let query = CatalogQuery::Table {
        database,
        schema: Some(schema),
        table,
    };
    run(&state, &headers, &uri, query).await
}
