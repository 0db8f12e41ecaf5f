mod analyze_cmd;
mod mime;
mod status_cmd;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tagforge_config::{load_and_prepare, redacted_config, resolve_config_path, TagForgeConfig};
use tagforge_gateway::{start_server, AppState};
use tagforge_logging::init_logger;
use tagforge_understanding::{select_adapter, Analyzer};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "tagforge")]
#[command(about = "TagForge: image tagging over HTTP via pluggable vision providers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
        /// Path to a YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Tag a local image file and print the result
    Analyze {
        file: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the effective configuration with secrets redacted
    Config {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Check whether a server is running
    Status {
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, config } => {
            let mut config = load_config(config.as_deref()).await?;
            if let Some(port) = port {
                config.server.port = port;
            }
            run_server(config).await?;
        }
        Commands::Analyze { file, config } => {
            let config = load_config(config.as_deref()).await?;
            analyze_cmd::run(&config, &file).await?;
        }
        Commands::Config { config } => {
            let config = load_config(config.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&redacted_config(&config))?);
        }
        Commands::Status { port } => {
            let port = match port {
                Some(port) => port,
                None => load_config(None).await?.server.port,
            };
            status_cmd::run(port).await?;
        }
    }

    Ok(())
}

/// Load config, start logging, then emit the warnings found while loading.
async fn load_config(explicit: Option<&Path>) -> Result<TagForgeConfig> {
    let path = resolve_config_path(explicit);
    let prepared = load_and_prepare(&path).await?;
    let logging = &prepared.config.logging;
    init_logger(&logging.level, logging.dir.as_deref().map(Path::new), logging.json);

    info!(path = %path.display(), "Configuration loaded");
    prepared.log_warnings();
    Ok(prepared.config)
}

async fn run_server(config: TagForgeConfig) -> Result<()> {
    info!(
        port = config.server.port,
        bind = %config.server.bind,
        provider = %config.provider.kind(),
        timeout_secs = config.provider.timeout_secs,
        "Starting TagForge"
    );

    let analyzer = Analyzer::new(select_adapter(&config.provider), config.provider.timeout());
    let state = AppState::new(analyzer, config.server.max_upload_bytes);

    let shutdown = state.shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received");
                shutdown.cancel();
            }
            Err(e) => error!(error = %e, "Failed to listen for shutdown signal"),
        }
    });

    start_server(&config.server, state).await
}
