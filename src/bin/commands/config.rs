use clap::Args;
use metaserv::lens::utils::OutputFormat;
use metaserv::{format_size, get_catalog_info, CatalogStoreInfo, MetaservConfig};
use serde::Serialize;

use super::print_json;

/// Arguments for the Config command
#[derive(Args)]
pub struct ConfigArgs {
    /// Also list the files in the data directory
    #[clap(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Serialize)]
struct ConfigInfo {
    config_file: String,
    data_dir: String,
    listen: String,
    catalog: CatalogStoreInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    files: Option<Vec<FileInfo>>,
}

#[derive(Debug, Serialize)]
struct FileInfo {
    name: String,
    size_bytes: u64,
}

pub fn run(config: &MetaservConfig, args: ConfigArgs, output_format: OutputFormat) {
    let ConfigArgs { verbose } = args;

    let files = if verbose {
        let mut file_list = Vec::new();
        if let Ok(entries) = std::fs::read_dir(&config.data_dir) {
            for entry in entries.flatten() {
                if let Ok(metadata) = entry.metadata() {
                    if metadata.is_file() {
                        file_list.push(FileInfo {
                            name: entry.file_name().to_string_lossy().to_string(),
                            size_bytes: metadata.len(),
                        });
                    }
                }
            }
        }
        file_list.sort_by(|a, b| a.name.cmp(&b.name));
        Some(file_list)
    } else {
        None
    };

    let config_info = ConfigInfo {
        config_file: MetaservConfig::config_file_path(),
        data_dir: config.data_dir.clone(),
        listen: format!("{}:{}", config.listen_address, config.listen_port),
        catalog: get_catalog_info(config),
        files,
    };

    if output_format.is_json() {
        print_json(&config_info, output_format == OutputFormat::JsonPretty);
    } else {
        print_config_table(config, &config_info);
    }
}

fn print_config_table(config: &MetaservConfig, info: &ConfigInfo) {
    println!("Metaserv Configuration");
    println!("======================\n");

    println!("General:");
    println!("  Config file:    {}", info.config_file);
    println!("{}", config.summary());
    println!();

    let catalog = &info.catalog;
    println!("Catalog Store:");
    println!("  Path:           {}", catalog.path);
    println!(
        "  Status:         {}",
        if catalog.exists {
            "exists"
        } else {
            "not created"
        }
    );
    if let Some(size) = catalog.size_bytes {
        println!("  Size:           {}", format_size(size));
    }
    println!(
        "  Schema:         {}",
        if catalog.schema_initialized {
            "initialized"
        } else {
            "not initialized"
        }
    );
    if let Some(version) = catalog.schema_version {
        println!("  Version:        {}", version);
    }
    if let Some(count) = catalog.database_count {
        println!("  Databases:      {}", count);
    }
    if let Some(count) = catalog.table_count {
        println!("  Tables:         {}", count);
    }
    if let Some(source) = &catalog.loaded_from {
        println!("  Loaded from:    {}", source);
    }

    if let Some(files) = &info.files {
        println!();
        println!("Files:");
        for file in files {
            println!("  {:<32} {}", file.name, format_size(file.size_bytes));
        }
    }

    if !catalog.exists {
        println!();
        println!("Run `metaserv init` or `metaserv load <FILE>` to create the catalog.");
    }
}
