//! Registro server entrypoint
//!
//! Startup order: configuration, logging, store connection, listener.
//! Any failure before the listener is bound exits with status 1; the
//! process never serves traffic without a store handle.

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;
use registro_server::{build_app, connect_store, logging, serve, ServerConfig};
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "registro-server")]
#[command(about = "Updates user records by national id")]
struct Args {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Listen address, overrides config and REGISTRO_LISTEN_ADDR
    #[arg(long)]
    listen: Option<String>,
    /// Serve from an in-process store instead of MongoDB
    #[arg(long)]
    in_memory: bool,
    /// JSON array of records to load into the in-memory store
    #[arg(long, value_name = "PATH")]
    seed: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("FATAL: {:#}", e);
            eprintln!("Server cannot start without valid configuration");
            process::exit(1);
        }
    };

    if let Err(e) = logging::init_logging(&config.logging) {
        eprintln!("FATAL: failed to initialize logging: {:#}", e);
        process::exit(1);
    }

    if let Err(e) = run(config).await {
        error!(target: "registro::server", error = %format!("{:#}", e), "Server stopped");
        process::exit(1);
    }
}

fn load_config(args: &Args) -> anyhow::Result<ServerConfig> {
    let mut config = ServerConfig::load(args.config.as_deref())?;
    if let Some(listen) = &args.listen {
        config.listen_addr = listen.clone();
    }
    if args.in_memory {
        config.in_memory = true;
    }
    if let Some(seed) = &args.seed {
        config.seed_file = Some(seed.clone());
    }
    config.validate()?;
    Ok(config)
}

async fn run(config: ServerConfig) -> anyhow::Result<()> {
    info!(
        target: "registro::server",
        version = env!("CARGO_PKG_VERSION"),
        listen = %config.listen_addr,
        in_memory = config.in_memory,
        "Starting registro"
    );

    let records = connect_store(&config)
        .await
        .context("document store unavailable")?;
    let app = build_app(records, &config.store);

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    serve(listener, app).await?;
    Ok(())
}
