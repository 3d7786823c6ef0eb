//! HTTP server module for Metaserv
//!
//! This module serves the catalog over a read-only HTTP API. Every resource is
//! available as JSON and as an HTML page, picked by content negotiation.
//!
//! # Architecture
//!
//! The server is organized into several submodules:
//!
//! - `protocol` - Error codes, error bodies and the catalog error mapping
//! - `negotiate` - `Accept` header negotiation between JSON and HTML
//! - `render` - HTML pages for catalog documents
//! - `auth` - Bearer token audit logging middleware
//! - `extract` - Path extractor reporting bad segments as JSON errors
//! - `handler` - Shared context running catalog queries per request
//! - `handlers` - Individual route handlers
//!
//! # Routes
//!
//! | Path | Result |
//! |------|--------|
//! | `/` | service index |
//! | `/db/` | databases |
//! | `/db/{db}/` | database with its schemas |
//! | `/db/{db}/tables/` | tables of the default schema |
//! | `/db/{db}/{schema}/tables/` | tables of a schema |
//! | `/db/{db}/tables/{table}/` | table of the default schema with its columns |
//! | `/db/{db}/{schema}/tables/{table}/` | table with its columns |
//!
//! Each path is also served without its trailing slash.
//!
//! # Usage
//!
//! ```rust,ignore
//! use metaserv::server::{start_server, ServerConfig, WebContext};
//!
//! let config = MetaservConfig::new(&None)?;
//! let context = WebContext::from_config(config.clone());
//! start_server(context, ServerConfig::from_config(&config)).await?;
//! ```

pub mod auth;
pub mod extract;
pub mod handler;
pub mod handlers;
pub mod negotiate;
pub mod protocol;
pub mod render;

// Re-export commonly used types
pub use handler::WebContext;
pub use negotiate::Representation;
pub use protocol::{ApiError, ErrorBody, ErrorCode, ErrorData};

use std::sync::Arc;

use axum::extract::Request;
use axum::routing::get;
use axum::Router as AxumRouter;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info_span;

use crate::config::{MetaservConfig, DEFAULT_LISTEN_ADDRESS, DEFAULT_LISTEN_PORT};

// =============================================================================
// Server Configuration
// =============================================================================

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub address: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_LISTEN_ADDRESS.to_string(),
            port: DEFAULT_LISTEN_PORT,
        }
    }
}

impl ServerConfig {
    /// Create a new server configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the listen address from the application configuration
    pub fn from_config(config: &MetaservConfig) -> Self {
        Self {
            address: config.listen_address.clone(),
            port: config.listen_port,
        }
    }

    /// Set the address
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Set the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Get the full bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

// =============================================================================
// Server State
// =============================================================================

/// Shared server state
#[derive(Clone)]
pub struct ServerState {
    /// Context for running catalog queries
    pub context: Arc<WebContext>,

    /// Server configuration
    pub config: Arc<ServerConfig>,
}

impl ServerState {
    pub fn new(context: WebContext, config: ServerConfig) -> Self {
        Self {
            context: Arc::new(context),
            config: Arc::new(config),
        }
    }
}

// =============================================================================
// Axum Router Creation
// =============================================================================

/// Create the Axum router serving the catalog
pub fn create_axum_router(state: ServerState) -> AxumRouter {
    use handlers::*;

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request| {
        info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %uuid::Uuid::new_v4(),
        )
    });

    AxumRouter::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/db", get(list_databases))
        .route("/db/", get(list_databases))
        .route("/db/:db", get(show_database))
        .route("/db/:db/", get(show_database))
        .route("/db/:db/tables", get(list_tables))
        .route("/db/:db/tables/", get(list_tables))
        .route("/db/:db/tables/:table", get(show_table))
        .route("/db/:db/tables/:table/", get(show_table))
        .route("/db/:db/:schema/tables", get(list_schema_tables))
        .route("/db/:db/:schema/tables/", get(list_schema_tables))
        .route("/db/:db/:schema/tables/:table", get(show_schema_table))
        .route("/db/:db/:schema/tables/:table/", get(show_schema_table))
        .layer(axum::middleware::from_fn(auth::audit_token))
        .layer(trace)
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Server Startup
// =============================================================================

/// Start the HTTP server
pub async fn start_server(context: WebContext, config: ServerConfig) -> anyhow::Result<()> {
    let bind_address = config.bind_address();
    let state = ServerState::new(context, config);
    let app = create_axum_router(state);

    tracing::info!("Starting metadata server on {}", bind_address);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.address, "127.0.0.1");
        assert_eq!(config.port, 5000);
    }

    #[test]
    fn test_server_config_builder() {
        let config = ServerConfig::new().with_address("0.0.0.0").with_port(9000);

        assert_eq!(config.address, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
    }

    #[test]
    fn test_server_config_from_config() {
        let config = MetaservConfig {
            listen_address: "0.0.0.0".to_string(),
            listen_port: 8081,
            ..Default::default()
        };
        assert_eq!(ServerConfig::from_config(&config).bind_address(), "0.0.0.0:8081");
    }

    #[tokio::test]
    async fn test_health_route() {
        let state = ServerState::new(WebContext::default(), ServerConfig::default());
        let server = axum_test::TestServer::new(create_axum_router(state)).unwrap();

        let response = server.get("/health").await;
        response.assert_status_ok();
        response.assert_text("OK");
    }
}
