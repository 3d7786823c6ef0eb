//! Bearer token audit logging
//!
//! The catalog performs no authorization. When a request carries an
//! `Authorization: Bearer <JWT>` header, the `uid` claim of the token payload
//! is logged for auditing. The signature is not verified. Malformed tokens are
//! logged and otherwise ignored: they never change the response.

use axum::extract::Request;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde_json::Value;
use thiserror::Error;
use tracing::info;

/// URL-safe base64 accepting payloads with or without padding
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Reasons a credential could not be introspected
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("authorization header has no credential")]
    MissingCredential,

    #[error("token has no payload segment")]
    MissingPayload,

    #[error("payload is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("payload is not a JSON object")]
    NotAnObject,
}

/// Extract the `uid` claim from an `Authorization` header value
///
/// Returns `Ok(None)` when the payload decodes but carries no string `uid`.
pub fn introspect(header: &str) -> Result<Option<String>, TokenError> {
    let token = header
        .split(' ')
        .nth(1)
        .filter(|t| !t.is_empty())
        .ok_or(TokenError::MissingCredential)?;
    let payload = token.split('.').nth(1).ok_or(TokenError::MissingPayload)?;

    let decoded = URL_SAFE_LENIENT.decode(payload)?;
    let claims: Value = serde_json::from_slice(&decoded)?;
    let claims = claims.as_object().ok_or(TokenError::NotAnObject)?;

    Ok(claims
        .get("uid")
        .and_then(Value::as_str)
        .map(ToString::to_string))
}

/// Middleware logging the user behind a bearer token
pub async fn audit_token(request: Request, next: Next) -> Response {
    if let Some(header) = request.headers().get(AUTHORIZATION) {
        match header.to_str().map_err(|_| TokenError::MissingCredential) {
            Ok(value) => match introspect(value) {
                Ok(Some(uid)) => info!("JWT received for user: {}", uid),
                Ok(None) => info!("JWT received without uid claim"),
                Err(e) => info!("unexpected error in JWT: {}", e),
            },
            Err(e) => info!("unexpected error in JWT: {}", e),
        }
    }
    next.run(request).await
}
