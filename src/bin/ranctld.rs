//! RAN control server binary.
//!
//! Serves the context-tree API and the AMF direct-connect API over the
//! stub node backends.

use clap::Parser;
use ranctl::config::ServerConfig;
use ranctl::logging::init_logging;
use ranctl::nodes::ApiSet;
use ranctl::server;
use std::path::PathBuf;
use std::process;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "ranctld", version, about = "RAN emulator control server")]
struct Args {
    /// Host to bind both listeners to
    #[arg(long)]
    host: Option<String>,

    /// Port for the context-tree API
    #[arg(long)]
    port: Option<u16>,

    /// Port for the AMF direct-connect API
    #[arg(long = "amf-port")]
    amf_port: Option<u16>,

    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match ServerConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load configuration: {e}");
                process::exit(1);
            }
        },
        None => ServerConfig::default(),
    };
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(amf_port) = args.amf_port {
        config.amf_port = amf_port;
    }
    if args.debug {
        config.logging.level = "debug".to_string();
    }

    if let Err(e) = init_logging(Some(&config.logging)) {
        eprintln!("Failed to initialize logging: {e}");
        process::exit(1);
    }

    info!(version = env!("CARGO_PKG_VERSION"), "ranctld starting");

    if let Err(e) = server::serve(&config, ApiSet::stub()).await {
        error!("Server failed: {e}");
        process::exit(1);
    }
}
