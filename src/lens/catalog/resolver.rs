//! Identifier resolution
//!
//! Path tokens are loosely typed: `S12_sdss` and `1` may both name the same
//! database. A token is always tried as a name, and also as a surrogate id
//! when it is a decimal literal that fits the store's id type.

use regex::Regex;
use std::sync::LazyLock;

use super::error::{CatalogError, EntityKind};
use crate::database::Predicate;

#[allow(clippy::expect_used)]
static SAFE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("safe name pattern is valid")
});

#[allow(clippy::expect_used)]
static SURROGATE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("surrogate id pattern is valid"));

/// Whether `token` is an acceptable entity name
///
/// Names start with a letter, underscore or dollar sign, followed by
/// letters, digits, underscores or dollar signs.
pub fn is_safe_name(token: &str) -> bool {
    SAFE_NAME.is_match(token)
}

/// Parse `token` as a surrogate id
///
/// Only plain decimal literals qualify; signs, whitespace and values
/// outside the `i64` range do not.
pub fn parse_surrogate_id(token: &str) -> Option<i64> {
    if SURROGATE_ID.is_match(token) {
        token.parse::<i64>().ok()
    } else {
        None
    }
}

/// Check a token without building a predicate
pub fn validate(token: &str, kind: EntityKind) -> Result<(), CatalogError> {
    resolve(token, kind).map(|_| ())
}

/// Turn a path token into a lookup predicate
///
/// The name branch is unconditional. The id branch is added only when the
/// token parses as a surrogate id. Tokens that are neither are rejected.
pub fn resolve(token: &str, kind: EntityKind) -> Result<Predicate, CatalogError> {
    match parse_surrogate_id(token) {
        Some(id) => Ok(Predicate::by_name_or_id(token, id)),
        None if is_safe_name(token) => Ok(Predicate::by_name(token)),
        None => Err(CatalogError::MalformedIdentifier {
            kind,
            token: token.to_string(),
        }),
    }
}
