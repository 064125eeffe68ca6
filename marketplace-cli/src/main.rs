use anyhow::Result;
use clap::Parser;
use log::debug;

use marketplace_cli::cli::commands::{
    handle_fallback_command, handle_list_command, handle_set_command,
};
use marketplace_cli::cli::{Cli, Commands};
use marketplace_cli::config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load()?;
    if let Some(url) = cli.api_url.clone() {
        config.api.base_url = url;
    }

    let default_level = config.monitoring.log_level.to_filter().to_string().to_lowercase();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }
    debug!("Loaded configuration for {}", config.api.base_url);

    match cli.command {
        Commands::List(args) => handle_list_command(args, &config).await,
        Commands::Set(args) => handle_set_command(args, &config).await,
        Commands::Fallback(args) => handle_fallback_command(args),
    }
}
