use anyhow::Result;
use clap::Args;
use metaserv::server::{start_server, ServerConfig, WebContext};
use metaserv::MetaservConfig;

/// Arguments for the Serve command
#[derive(Args)]
pub struct ServeArgs {
    /// Address to bind to (overrides `listen_address`)
    #[clap(short, long)]
    pub address: Option<String>,

    /// Port to listen on (overrides `listen_port`)
    #[clap(short, long)]
    pub port: Option<u16>,
}

pub fn run(config: &MetaservConfig, args: ServeArgs) -> Result<()> {
    let ServeArgs { address, port } = args;

    let mut server_config = ServerConfig::from_config(config);
    if let Some(address) = address {
        server_config = server_config.with_address(address);
    }
    if let Some(port) = port {
        server_config = server_config.with_port(port);
    }

    let context = WebContext::from_config(config.clone());
    tracing::info!("Serving catalog {}", context.catalog_path);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(start_server(context, server_config))
}
