use clap::{Parser, Subcommand};
use metaserv::lens::catalog::CatalogShowArgs;
use metaserv::lens::utils::OutputFormat;
use metaserv::MetaservConfig;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::config::ConfigArgs;
use commands::init::InitArgs;
use commands::load::LoadArgs;
use commands::serve::ServeArgs;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// configuration file path, by default $HOME/.metaserv/metaserv.toml is used
    #[clap(short, long)]
    config: Option<String>,

    /// Print debug information
    #[clap(long)]
    debug: bool,

    /// Output format: table, markdown, json, json-pretty
    #[clap(short, long, global = true, default_value = "table")]
    format: OutputFormat,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP catalog service.
    Serve(ServeArgs),

    /// Create the catalog store, or reset it.
    Init(InitArgs),

    /// Load a JSON catalog description into the store.
    Load(LoadArgs),

    /// Browse the catalog: databases, schemas, tables and columns.
    Show(CatalogShowArgs),

    /// Show configuration and catalog store status.
    Config(ConfigArgs),
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match MetaservConfig::new(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let output_format = cli.format;

    let result = match cli.command {
        Commands::Serve(args) => commands::serve::run(&config, args),
        Commands::Init(args) => commands::init::run(&config, args),
        Commands::Load(args) => commands::load::run(&config, args, output_format),
        Commands::Show(args) => commands::show::run(&config, args, output_format),
        Commands::Config(args) => {
            commands::config::run(&config, args, output_format);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("ERROR: {}", e);
        std::process::exit(1);
    }
}
