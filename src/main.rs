use anyhow::Result;
use clap::Parser;

mod api;
mod cli;
mod client;
mod config;
mod error;
mod models;
mod session;
mod validate;

use cli::Cli;
use error::ApiError;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before clap reads the environment
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::Config::from_args(&cli.connection)?;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("API base: {}", config.api_base);
    let client = client::ApiClient::new(config)?;

    let result = cli::run(cli.command, &client).await;
    if let Err(e) = &result {
        // Backend rejections get a clean one-liner; everything else keeps
        // the full anyhow chain.
        if let Some(api_error) = e.downcast_ref::<ApiError>() {
            eprintln!("❌ {}", api_error.message());
            std::process::exit(1);
        }
    }
    result
}
