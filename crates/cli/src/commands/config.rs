//! Configuration commands
//!
//! Stores the API host and key so other commands can run without flags.

use clap::Subcommand;
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::Formatter;
use sct_core::{Config, ConfigManager};

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Save the API host and key
    Set(SetArgs),

    /// Show the saved configuration
    Show,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// API base URL, stored as given (e.g. `https://swift-cloud-tools.example.com`)
    pub host: String,

    /// API key sent as X-Auth-Token
    pub api_key: String,
}

/// JSON output for config operations
#[derive(Serialize)]
struct ConfigOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    host: Option<String>,
    /// Masked
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
    path: String,
}

/// Execute a config subcommand
pub fn execute(cmd: ConfigCommands, formatter: &Formatter) -> ExitCode {
    let manager = match ConfigManager::new() {
        Ok(m) => m,
        Err(e) => {
            formatter.error(&format!("Failed to locate config: {e}"));
            return ExitCode::GeneralError;
        }
    };

    match cmd {
        ConfigCommands::Set(args) => execute_set(args, &manager, formatter),
        ConfigCommands::Show => execute_show(&manager, formatter),
    }
}

/// Keep the first four characters of a key visible
fn mask_key(key: &str) -> String {
    let prefix: String = key.chars().take(4).collect();
    if prefix.chars().count() == key.chars().count() {
        "****".to_string()
    } else {
        format!("{prefix}****")
    }
}

fn execute_set(args: SetArgs, manager: &ConfigManager, formatter: &Formatter) -> ExitCode {
    if let Err(e) = url::Url::parse(&args.host) {
        formatter.error(&format!("Invalid host URL '{}': {e}", args.host));
        return ExitCode::UsageError;
    }

    if args.api_key.is_empty() {
        formatter.error("API key cannot be empty");
        return ExitCode::UsageError;
    }

    if manager.path().exists() {
        formatter.warning(&format!(
            "Overwriting existing configuration at {}",
            manager.path().display()
        ));
    }

    let config = Config {
        host: Some(args.host.clone()),
        api_key: Some(args.api_key.clone()),
    };

    if let Err(e) = manager.save(&config) {
        formatter.error(&format!("Failed to save config: {e}"));
        return ExitCode::GeneralError;
    }

    if formatter.is_json() {
        formatter.json(&ConfigOutput {
            host: config.host,
            api_key: Some(mask_key(&args.api_key)),
            path: manager.path().display().to_string(),
        });
    } else {
        formatter.success(&format!(
            "Configuration saved for {}.",
            formatter.style_url(&args.host)
        ));
    }
    ExitCode::Success
}

fn execute_show(manager: &ConfigManager, formatter: &Formatter) -> ExitCode {
    let config = match manager.load() {
        Ok(c) => c,
        Err(e) => {
            formatter.error(&format!("Failed to load config: {e}"));
            return ExitCode::GeneralError;
        }
    };

    let output = ConfigOutput {
        host: config.host,
        api_key: config.api_key.as_deref().map(mask_key),
        path: manager.path().display().to_string(),
    };

    if formatter.is_json() {
        formatter.json(&output);
    } else {
        let host = output
            .host
            .as_deref()
            .map(|h| formatter.style_url(h))
            .unwrap_or_else(|| "(not set)".to_string());
        let key = output.api_key.unwrap_or_else(|| "(not set)".to_string());
        formatter.println(&format!("{} {host}", formatter.style_key("Host:   ")));
        formatter.println(&format!("{} {key}", formatter.style_key("API key:")));
        formatter.println(&format!("{} {}", formatter.style_key("File:   "), output.path));
    }
    ExitCode::Success
}
