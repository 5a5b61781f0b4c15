use std::path::PathBuf;

use chatter_common::ChatterError;
use chatter_config::{toml_loader, ChatterConfig, ConfigSource};
use chatter_realtime::{serve, ConnectionLimits, Realtime};
use clap::Parser;
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(name = "chatter-realtime", about = "Realtime presence and messaging hub")]
struct Args {
    /// Path to a TOML config file. Defaults to the platform config dir.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind, overriding the config file.
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on, overriding the config file.
    #[arg(short, long)]
    port: Option<u16>,

    /// Write a commented default config to PATH and exit.
    #[arg(long, value_name = "PATH")]
    init_config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Some(path) = &args.init_config {
        if let Err(e) = toml_loader::create_default_config(path) {
            eprintln!("chatter-realtime: {e}");
            std::process::exit(1);
        }
        println!("wrote default config to {}", path.display());
        return;
    }

    let (config, source) = match load(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("chatter-realtime: {e}");
            std::process::exit(1);
        }
    };

    init_tracing(&config);
    tracing::info!(source = %source, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server stopped");
        std::process::exit(1);
    }
}

/// Load the file, apply flag overrides, then validate once.
fn load(args: &Args) -> Result<(ChatterConfig, ConfigSource), ChatterError> {
    let (mut config, source) = chatter_config::load(args.config.as_deref())?;
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    chatter_config::validation::validate(&config)?;
    Ok((config, source))
}

fn init_tracing(config: &ChatterConfig) {
    let level = config.logging.level.as_directive();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("chatter_realtime={level},chatter_presence={level}")
                    .into()
            }),
        )
        .init();
}

async fn run(config: ChatterConfig) -> Result<(), ChatterError> {
    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("chatter-realtime listening on {}", addr);

    let realtime = Realtime::default();
    let limits = ConnectionLimits::from(&config.realtime);

    tokio::select! {
        _ = serve(listener, realtime.clone(), limits) => {}
        signal = tokio::signal::ctrl_c() => {
            signal?;
            tracing::info!(
                online = realtime.presence().len().await,
                "Shutting down"
            );
        }
    }

    Ok(())
}
