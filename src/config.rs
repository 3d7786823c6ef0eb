use anyhow::{anyhow, Result};
use config::Config;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

/// Default address the HTTP service binds to
pub const DEFAULT_LISTEN_ADDRESS: &str = "127.0.0.1";

/// Default port the HTTP service listens on
pub const DEFAULT_LISTEN_PORT: u16 = 5000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetaservConfig {
    /// Path to the directory holding the catalog store
    pub data_dir: String,

    /// Address the HTTP service binds to
    pub listen_address: String,

    /// Port the HTTP service listens on
    pub listen_port: u16,
}

const EMPTY_CONFIG: &str = r#"### metaserv configuration file

### directory holding the catalog store (metaserv-catalog.sqlite3)
# data_dir = "~/.metaserv"

### HTTP service
# listen_address = "127.0.0.1"
# listen_port = 5000
"#;

impl Default for MetaservConfig {
    fn default() -> Self {
        let home_dir = dirs::home_dir()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|| ".".to_string());

        Self {
            data_dir: format!("{}/.metaserv", home_dir),
            listen_address: DEFAULT_LISTEN_ADDRESS.to_string(),
            listen_port: DEFAULT_LISTEN_PORT,
        }
    }
}

impl MetaservConfig {
    /// Function to create and initialize a new configuration
    pub fn new(path: &Option<String>) -> Result<MetaservConfig> {
        let mut builder = Config::builder();

        // Add in toml configuration file
        match path {
            Some(p) => {
                let path = Path::new(p.as_str());
                if path.exists() {
                    let path_str = path
                        .to_str()
                        .ok_or_else(|| anyhow!("Could not convert path to string"))?;
                    builder = builder.add_source(config::File::with_name(path_str));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG)
                        .map_err(|e| anyhow!("Unable to create config file: {}", e))?;
                }
            }
            None => {
                // By default use $HOME/.metaserv/metaserv.toml as the configuration file path
                let metaserv_dir = Self::config_dir()?;
                std::fs::create_dir_all(metaserv_dir.as_str())
                    .map_err(|e| anyhow!("Unable to create metaserv directory: {}", e))?;
                let p = format!("{}/metaserv.toml", metaserv_dir.as_str());
                if Path::new(p.as_str()).exists() {
                    builder = builder.add_source(config::File::with_name(p.as_str()));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG).map_err(|e| {
                        anyhow!("Unable to create config file {}: {}", p.as_str(), e)
                    })?;
                }
            }
        }

        // Add in settings from the environment (with a prefix of METASERV)
        // E.g., `METASERV_LISTEN_PORT=8080 ./metaserv serve` would set the port
        builder = builder.add_source(config::Environment::with_prefix("METASERV"));

        let settings = builder
            .build()
            .map_err(|e| anyhow!("Failed to build configuration: {}", e))?;

        let config = settings
            .try_deserialize::<HashMap<String, String>>()
            .map_err(|e| anyhow!("Failed to deserialize configuration: {}", e))?;

        Self::from_map(&config)
    }

    /// Build a configuration from flattened key/value settings
    fn from_map(config: &HashMap<String, String>) -> Result<MetaservConfig> {
        let defaults = MetaservConfig::default();

        let data_dir = match config.get("data_dir") {
            Some(p) => expand_home(p),
            None => defaults.data_dir,
        };

        let listen_address = config
            .get("listen_address")
            .cloned()
            .unwrap_or(defaults.listen_address);

        let listen_port = match config.get("listen_port") {
            Some(p) => p
                .parse::<u16>()
                .map_err(|e| anyhow!("Invalid listen_port '{}': {}", p, e))?,
            None => defaults.listen_port,
        };

        Ok(MetaservConfig {
            data_dir,
            listen_address,
            listen_port,
        })
    }

    fn config_dir() -> Result<String> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| anyhow!("Could not find home directory"))?
            .to_str()
            .ok_or_else(|| anyhow!("Could not convert home directory path to string"))?
            .to_owned();
        Ok(format!("{}/.metaserv", home_dir))
    }

    /// Get the path to the SQLite catalog file
    pub fn sqlite_path(&self) -> String {
        crate::database::catalog_path(self.data_dir.trim_end_matches('/'))
    }

    /// Display configuration summary
    pub fn summary(&self) -> String {
        [
            format!("Data Directory:     {}", self.data_dir),
            format!("SQLite Path:        {}", self.sqlite_path()),
            format!("Listen Address:     {}", self.listen_address),
            format!("Listen Port:        {}", self.listen_port),
        ]
        .join("\n")
    }

    /// Get the config file path
    pub fn config_file_path() -> String {
        let home_dir = dirs::home_dir()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|| "~".to_string());
        format!("{}/.metaserv/metaserv.toml", home_dir)
    }
}

/// Replace a leading `~` with the home directory
fn expand_home(path: &str) -> String {
    match (path.strip_prefix('~'), dirs::home_dir()) {
        (Some(rest), Some(home)) if rest.is_empty() || rest.starts_with('/') => {
            format!("{}{}", home.to_string_lossy(), rest)
        }
        _ => path.to_string(),
    }
}

// =============================================================================
// Catalog Store Info (used by the config command)
// =============================================================================

/// Information about the SQLite catalog store
#[derive(Debug, Serialize, Clone)]
pub struct CatalogStoreInfo {
    pub path: String,
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    pub schema_initialized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loaded_from: Option<String>,
}

/// Get catalog store information without modifying the store
pub fn get_catalog_info(config: &MetaservConfig) -> CatalogStoreInfo {
    use crate::database::{
        DatabaseConn, DatabaseRepository, SchemaManager, SchemaStatus, TableRepository,
        SCHEMA_VERSION,
    };

    let sqlite_path = config.sqlite_path();
    let sqlite_exists = Path::new(&sqlite_path).exists();
    let sqlite_size = if sqlite_exists {
        std::fs::metadata(&sqlite_path).ok().map(|m| m.len())
    } else {
        None
    };

    let mut info = CatalogStoreInfo {
        path: sqlite_path.clone(),
        exists: sqlite_exists,
        size_bytes: sqlite_size,
        schema_initialized: false,
        schema_version: None,
        database_count: None,
        table_count: None,
        loaded_from: None,
    };

    if !sqlite_exists {
        return info;
    }

    let Ok(db) = DatabaseConn::open_read_only(&sqlite_path) else {
        return info;
    };
    let manager = SchemaManager::new(&db.conn);
    let (initialized, version) = match manager.check_status() {
        Ok(status) => match status {
            SchemaStatus::Current => (true, Some(SCHEMA_VERSION)),
            SchemaStatus::NeedsMigration { from, to: _ } => (true, Some(from)),
            SchemaStatus::NotInitialized => (false, None),
            SchemaStatus::Incompatible {
                database_version,
                required_version: _,
            } => (true, Some(database_version)),
            SchemaStatus::Corrupted => (false, None),
        },
        Err(_) => (false, None),
    };
    info.schema_initialized = initialized;
    info.schema_version = version;

    if version == Some(SCHEMA_VERSION) {
        info.database_count = DatabaseRepository::new(&db.conn).count().ok();
        info.table_count = TableRepository::new(&db.conn).count().ok();
        info.loaded_from = manager.get_meta("loaded_from").ok().flatten();
    }

    info
}

/// Format bytes as human-readable size
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
