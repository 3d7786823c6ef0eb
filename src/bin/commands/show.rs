use anyhow::{anyhow, Result};
use metaserv::database::CatalogDatabase;
use metaserv::lens::catalog::{CatalogLens, CatalogShowArgs};
use metaserv::lens::utils::OutputFormat;
use metaserv::MetaservConfig;

pub fn run(config: &MetaservConfig, args: CatalogShowArgs, output_format: OutputFormat) -> Result<()> {
    let query = args.to_query().map_err(|e| anyhow!(e))?;

    let db = CatalogDatabase::open_session(&config.sqlite_path())?;
    let lens = CatalogLens::new(&db);
    let document = lens.query(&query)?;

    println!("{}", lens.format_document(&document, &output_format));
    Ok(())
}
