use anyhow::Result;
use clap::Args;
use metaserv::database::{ensure_data_dir, CatalogDatabase, SchemaManager};
use metaserv::MetaservConfig;
use tracing::info;

/// Arguments for the Init command
#[derive(Args)]
pub struct InitArgs {
    /// Drop every catalog entry and recreate the schema
    #[clap(long)]
    pub reset: bool,
}

pub fn run(config: &MetaservConfig, args: InitArgs) -> Result<()> {
    ensure_data_dir(&config.data_dir)?;

    let path = config.sqlite_path();
    let db = CatalogDatabase::open(&path)?;

    if args.reset {
        info!("Resetting catalog at {}", path);
        let schema = SchemaManager::new(db.connection());
        schema.reset()?;
        schema.initialize()?;
    }

    println!("Catalog store ready at {}", path);
    Ok(())
}
