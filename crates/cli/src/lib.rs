pub mod commands;
pub mod logging;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use shopassist_core::config::{AppConfig, BackendMode, ConfigOverrides, LoadOptions, LogFormat};

use crate::commands::search::SearchArgs;
use crate::commands::CommandResult;

#[derive(Debug, Parser)]
#[command(
    name = "shopassist",
    about = "ShopAssist product comparison CLI",
    long_about = "Search the catalog, compare retailer offers and print the best value, fastest delivery and best quality picks.",
    after_help = "Examples:\n  shopassist search \"Samsung TV\" --zip 90210\n  shopassist search drill --preset fastest --json\n  shopassist search \"LG OLED\" --value 0.7 --quality 0.3\n  shopassist presets\n  shopassist config"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a shopassist.toml config file")]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, help = "Backend to query (mock|http)")]
    pub backend: Option<BackendMode>,
    #[arg(long, global = true, help = "Base URL of the ShopAssist API in http mode")]
    pub base_url: Option<String>,
    #[arg(long, global = true, help = "Log level (trace|debug|info|warn|error)")]
    pub log_level: Option<String>,
    #[arg(long, global = true, help = "Log format (compact|pretty|json)")]
    pub log_format: Option<LogFormat>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(about = "Search for a product and print three retailer recommendations")]
    Search(SearchArgs),
    #[command(about = "List the preference presets and their weights")]
    Presets {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Search(_) => "search",
            Self::Presets { .. } => "presets",
            Self::Config => "config",
        }
    }
}

impl Cli {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            require_file: self.config.is_some(),
            overrides: ConfigOverrides {
                backend_mode: self.backend,
                base_url: self.base_url.clone(),
                api_token: None,
                default_preset: None,
                log_level: self.log_level.clone(),
                log_format: self.log_format,
            },
        }
    }
}

pub async fn run(cli: Cli) -> CommandResult {
    let options = cli.load_options();

    match cli.command {
        Command::Config => commands::config::run(&options),
        Command::Presets { json } => commands::presets::run(json),
        Command::Search(args) => {
            let config = match AppConfig::load(options) {
                Ok(config) => config,
                Err(error) => {
                    return CommandResult::failure(
                        "search",
                        "config_validation",
                        error.to_string(),
                        2,
                    )
                }
            };
            logging::init(&config.logging);
            commands::search::run(&config, &args).await
        }
    }
}
