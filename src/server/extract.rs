//! Request extractors
//!
//! `CatalogPath` wraps axum's `Path` so that undecodable path segments are
//! reported in the same error envelope as malformed identifiers.

use axum::async_trait;
use axum::extract::path::ErrorKind;
use axum::extract::rejection::PathRejection;
use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::lens::catalog::EntityKind;
use crate::server::protocol::{ApiError, ErrorCode, ErrorData};

/// Path parameters of a catalog route
#[derive(Debug)]
pub struct CatalogPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for CatalogPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(value)| CatalogPath(value))
            .map_err(path_error)
    }
}

/// Entity named by a route parameter
fn param_kind(key: &str) -> Option<EntityKind> {
    match key {
        "db" => Some(EntityKind::Database),
        "schema" => Some(EntityKind::Schema),
        "table" => Some(EntityKind::Table),
        _ => None,
    }
}

fn path_error(rejection: PathRejection) -> ApiError {
    let PathRejection::FailedToDeserializePathParams(err) = rejection else {
        return ErrorData::internal(rejection.body_text()).into();
    };

    let key = match err.kind() {
        ErrorKind::InvalidUtf8InPathParam { key } => Some(key.as_str()),
        ErrorKind::ParseErrorAtKey { key, .. } => Some(key.as_str()),
        _ => None,
    };
    let message = err.body_text();
    match key.and_then(param_kind) {
        Some(kind) => ErrorData::with_details(
            ErrorCode::InvalidIdentifier,
            format!("malformed {} identifier: {}", kind, message),
            json!({ "kind": kind }),
        )
        .into(),
        None => ErrorData::new(ErrorCode::InvalidIdentifier, message).into(),
    }
}
