//! cloud-recoil
//!
//! Entry point for the recoil compensation binary.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cloud_recoil::app::App;
use cloud_recoil::backend::SyntheticInputBackend;
use cloud_recoil::config::Config;
use cloud_recoil::input::DeviceQuerySampler;

/// Command-line arguments for cloud-recoil
#[derive(Parser, Debug)]
#[command(name = "cloud-recoil")]
#[command(version, about = "Recoil compensation utility", long_about = None)]
pub struct Args {
    /// Configuration file path (defaults to the user config directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Scan for supported serial hardware at startup
    #[arg(long)]
    pub connect: bool,

    /// Verbose logging (can be specified multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log format (json|pretty|compact)
    #[arg(long, default_value = "pretty")]
    pub log_format: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args);

    info!("cloud-recoil v{}", env!("CARGO_PKG_VERSION"));

    let config_path = args.config.clone().unwrap_or_else(Config::default_path);
    let config = match Config::load(&config_path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::default()
        }
    };
    tracing::debug!("Config: {:?}", config);

    let sampler = Box::new(DeviceQuerySampler::new());
    let synthetic =
        Box::new(SyntheticInputBackend::new().context("failed to open synthetic input backend")?);

    let app = App::new(config, config_path).connect_on_start(args.connect);
    app.run(sampler, synthetic).await?;

    info!("cloud-recoil shut down");
    Ok(())
}

fn init_logging(args: &Args) {
    let log_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "cloud_recoil={level},warn",
            level = log_level
        ))
    });

    match args.log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        "compact" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().compact())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
