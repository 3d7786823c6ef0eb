//! HTTP handlers
//!
//! Handlers are organized by resource:
//!
//! - `root` - Service index and health check
//! - `catalog` - Database, schema, table and column browsing under `/db/`
//!
//! Every handler negotiates its representation from the `Accept` header and
//! produces either the JSON document or the rendered page.

pub mod catalog;
pub mod root;

pub use catalog::{
    list_databases, list_schema_tables, list_tables, show_database, show_schema_table, show_table,
};
pub use root::{health, index};

use axum::response::{Html, IntoResponse, Response};
use axum::Json;

use crate::lens::catalog::Document;
use crate::server::negotiate::Representation;
use crate::server::protocol::ApiError;
use crate::server::render::{render_document, render_error};

/// Turn a query outcome into a response in the negotiated representation
pub(crate) fn respond(
    representation: Representation,
    base_path: &str,
    result: Result<Document, ApiError>,
) -> Response {
    match (representation, result) {
        (Representation::Json, Ok(document)) => Json(document).into_response(),
        (Representation::Html, Ok(document)) => {
            Html(render_document(&document, base_path)).into_response()
        }
        (Representation::Json, Err(err)) => err.into_response(),
        (Representation::Html, Err(err)) => {
            let status = err.status();
            (
                status,
                Html(render_error(status.as_u16(), &err.data().message)),
            )
                .into_response()
        }
    }
}
