//! Catalog lens errors

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The level of the catalog hierarchy an identifier refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Database,
    Schema,
    Table,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Database => write!(f, "database"),
            Self::Schema => write!(f, "schema"),
            Self::Table => write!(f, "table"),
        }
    }
}

/// Errors raised while resolving and projecting catalog entities
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The token is neither a safe name nor a surrogate id
    #[error("malformed {kind} identifier '{token}'")]
    MalformedIdentifier { kind: EntityKind, token: String },

    /// No entity of this kind matched the token
    #[error("{kind} '{ident}' not found")]
    NotFound { kind: EntityKind, ident: String },

    /// The database designates no default schema and none was requested
    #[error("database '{database}' has no default schema")]
    NoDefaultSchema { database: String },

    /// The store could not be opened or queried
    #[error("catalog store unavailable: {0}")]
    StoreUnavailable(#[from] anyhow::Error),
}

impl CatalogError {
    pub fn not_found(kind: EntityKind, ident: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            ident: ident.into(),
        }
    }

    /// Whether this error is a resolution miss at some hierarchy level
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::NoDefaultSchema { .. })
    }

    /// The hierarchy level the error refers to, if any
    pub fn kind(&self) -> Option<EntityKind> {
        match self {
            Self::MalformedIdentifier { kind, .. } | Self::NotFound { kind, .. } => Some(*kind),
            Self::NoDefaultSchema { .. } => Some(EntityKind::Schema),
            Self::StoreUnavailable(_) => None,
        }
    }
}
