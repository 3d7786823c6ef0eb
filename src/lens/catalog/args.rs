//! Catalog lens arguments
//!
//! A [`CatalogQuery`] names one scope of the catalog plus the path tokens it
//! needs. The HTTP handlers build queries from path segments, the CLI builds
//! them from [`CatalogShowArgs`].

use serde::{Deserialize, Serialize};

use super::error::{CatalogError, EntityKind};
use super::projection::{Scope, Verbosity};
use super::resolver;

/// A request against the catalog hierarchy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogQuery {
    Databases {
        verbosity: Verbosity,
    },
    Database {
        database: String,
    },
    Tables {
        database: String,
        schema: Option<String>,
    },
    Table {
        database: String,
        schema: Option<String>,
        table: String,
    },
}

impl CatalogQuery {
    pub fn scope(&self) -> Scope {
        match self {
            Self::Databases { .. } => Scope::Databases,
            Self::Database { .. } => Scope::Database,
            Self::Tables { .. } => Scope::Tables,
            Self::Table { .. } => Scope::Table,
        }
    }

    /// Reject malformed tokens without touching the store
    pub fn validate(&self) -> Result<(), CatalogError> {
        match self {
            Self::Databases { .. } => Ok(()),
            Self::Database { database } => resolver::validate(database, EntityKind::Database),
            Self::Tables { database, schema } => {
                resolver::validate(database, EntityKind::Database)?;
                if let Some(schema) = schema {
                    resolver::validate(schema, EntityKind::Schema)?;
                }
                Ok(())
            }
            Self::Table {
                database,
                schema,
                table,
            } => {
                resolver::validate(database, EntityKind::Database)?;
                if let Some(schema) = schema {
                    resolver::validate(schema, EntityKind::Schema)?;
                }
                resolver::validate(table, EntityKind::Table)
            }
        }
    }
}

/// Arguments for browsing the catalog from the command line
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct CatalogShowArgs {
    /// Database name or id; lists all databases when omitted
    #[cfg_attr(feature = "cli", clap(value_name = "DATABASE"))]
    pub database: Option<String>,

    /// Schema name or id (defaults to the database's default schema)
    #[cfg_attr(feature = "cli", clap(short, long))]
    #[serde(default)]
    pub schema: Option<String>,

    /// Table name or id to show columns for
    #[cfg_attr(feature = "cli", clap(short, long))]
    #[serde(default)]
    pub table: Option<String>,

    /// List the tables of the schema instead of the database detail
    #[cfg_attr(feature = "cli", clap(long))]
    #[serde(default)]
    pub tables: bool,

    /// Include host, port and default schema in the databases list
    #[cfg_attr(feature = "cli", clap(short, long))]
    #[serde(default)]
    pub description: bool,
}

impl CatalogShowArgs {
    /// Map the arguments onto a catalog query
    pub fn to_query(&self) -> Result<CatalogQuery, String> {
        let Some(database) = self.database.clone() else {
            if self.schema.is_some() || self.table.is_some() || self.tables {
                return Err("--schema, --table and --tables need a DATABASE".to_string());
            }
            return Ok(CatalogQuery::Databases {
                verbosity: Verbosity::from_flag(self.description),
            });
        };

        let query = match (&self.table, self.tables || self.schema.is_some()) {
            (Some(table), _) => CatalogQuery::Table {
                database,
                schema: self.schema.clone(),
                table: table.clone(),
            },
            (None, true) => CatalogQuery::Tables {
                database,
                schema: self.schema.clone(),
            },
            (None, false) => CatalogQuery::Database { database },
        };
        Ok(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_checks_every_token() {
        let ok = CatalogQuery::Table {
            database: "1".to_string(),
            schema: Some("sdss_stripe82_00".to_string()),
            table: "Object".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad = CatalogQuery::Table {
            database: "S12_sdss".to_string(),
            schema: None,
            table: "has space".to_string(),
        };
        match bad.validate() {
            Err(CatalogError::MalformedIdentifier { kind, .. }) => {
                assert_eq!(kind, EntityKind::Table)
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_show_args_to_query() {
        let args = CatalogShowArgs::default();
        assert_eq!(args.to_query().unwrap().scope(), Scope::Databases);

        let args = CatalogShowArgs {
            database: Some("S12_sdss".to_string()),
            ..Default::default()
        };
        assert_eq!(args.to_query().unwrap().scope(), Scope::Database);

        let args = CatalogShowArgs {
            database: Some("S12_sdss".to_string()),
            tables: true,
            ..Default::default()
        };
        assert_eq!(args.to_query().unwrap().scope(), Scope::Tables);

        let args = CatalogShowArgs {
            database: Some("S12_sdss".to_string()),
            table: Some("Object".to_string()),
            ..Default::default()
        };
        assert_eq!(args.to_query().unwrap().scope(), Scope::Table);

        let args = CatalogShowArgs {
            table: Some("Object".to_string()),
            ..Default::default()
        };
        assert!(args.to_query().is_err());
    }
}
