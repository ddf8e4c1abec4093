//! Config command - show and change client settings

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use myflix_core::adapters::http::MYFLIX_API_URL_ENV;
use myflix_core::config::Config;
use myflix_core::services::LogEvent;

use super::{get_logger, get_myflix_dir, log_event};
use crate::output;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set the API base URL
    SetUrl {
        /// API URL, or "default" for the production API
        url: String,
    },
}

pub fn run(command: ConfigCommands) -> Result<()> {
    let myflix_dir = get_myflix_dir();
    let logger = get_logger();

    match command {
        ConfigCommands::Show { json } => {
            log_event(
                logger.as_ref(),
                LogEvent::new("command_executed").with_command("config show"),
            );
            let config = Config::load(&myflix_dir)?;

            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "api_url": config.api_url,
                        "api_url_from_env": config.api_url_from_env,
                        "request_timeout_secs": config.request_timeout_secs,
                        "myflix_dir": myflix_dir.to_string_lossy(),
                    })
                );
                return Ok(());
            }

            println!("{}", "MyFlix Configuration".bold());
            let mut table = output::create_table();
            let source = if config.api_url_from_env {
                format!("{} (from {})", config.api_url, MYFLIX_API_URL_ENV)
            } else {
                config.api_url.clone()
            };
            let timeout = config
                .request_timeout_secs
                .map(|s| format!("{}s", s))
                .unwrap_or_else(|| "none".to_string());
            table.add_row(vec!["API URL", source.as_str()]);
            table.add_row(vec!["Request timeout", timeout.as_str()]);
            table.add_row(vec!["Directory", &myflix_dir.display().to_string()]);
            println!("{}", table);
        }
        ConfigCommands::SetUrl { url } => {
            log_event(
                logger.as_ref(),
                LogEvent::new("command_executed").with_command("config set-url"),
            );
            let mut config = Config::load(&myflix_dir)?;
            let url = url.trim();
            if url.eq_ignore_ascii_case("default") {
                config.set_api_url(None);
            } else {
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    anyhow::bail!("API URL must start with http:// or https://");
                }
                config.set_api_url(Some(url));
            }
            config.save(&myflix_dir)?;

            output::success(&format!("API URL set to {}", config.api_url));
            if config.api_url_from_env {
                output::warning(&format!(
                    "{} is set and overrides this setting",
                    MYFLIX_API_URL_ENV
                ));
            }
        }
    }

    Ok(())
}
