use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Args;
use metaserv::database::{ensure_data_dir, CatalogDatabase, CatalogDescription};
use metaserv::lens::utils::OutputFormat;
use metaserv::MetaservConfig;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::print_json;

/// Arguments for the Load command
#[derive(Args)]
pub struct LoadArgs {
    /// JSON catalog description to load
    #[clap(name = "FILE")]
    pub file_path: PathBuf,

    /// Validate the description without writing to the store
    #[clap(long)]
    pub dry_run: bool,
}

#[derive(Tabled)]
struct SummaryRow {
    databases: usize,
    schemas: usize,
    tables: usize,
    columns: usize,
}

pub fn run(config: &MetaservConfig, args: LoadArgs, output_format: OutputFormat) -> Result<()> {
    let LoadArgs { file_path, dry_run } = args;

    let content = std::fs::read_to_string(&file_path)
        .map_err(|e| anyhow!("Unable to read {}: {}", file_path.display(), e))?;
    let description = CatalogDescription::from_json(&content)?;

    if dry_run {
        description.validate()?;
        println!(
            "{} is a valid catalog description ({} databases)",
            file_path.display(),
            description.databases.len()
        );
        return Ok(());
    }

    ensure_data_dir(&config.data_dir)?;
    let db = CatalogDatabase::open(&config.sqlite_path())?;
    let summary = db.loader().load(&description)?;
    db.set_meta("loaded_from", &file_path.to_string_lossy())?;

    if output_format.is_table() {
        let row = SummaryRow {
            databases: summary.databases,
            schemas: summary.schemas,
            tables: summary.tables,
            columns: summary.columns,
        };
        let mut table = Table::new(vec![row]);
        if output_format == OutputFormat::Markdown {
            table.with(Style::markdown());
        } else {
            table.with(Style::rounded());
        }
        println!("{}", table);
    } else {
        print_json(&summary, output_format == OutputFormat::JsonPretty);
    }

    Ok(())
}
