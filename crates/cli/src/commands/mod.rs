//! Command implementations
//!
//! API commands share the same tail: resolve the host and key, send one
//! request, print whatever came back and turn the status code into an exit
//! code.

pub mod config;
pub mod expirer;
pub mod transfer;

use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::Formatter;
use sct_client::SctClient;
use sct_core::{ApiResponse, Config, ConfigManager};

/// Connection flags shared by API commands
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// API base URL (overrides the config file)
    #[arg(long, env = "SCT_HOST", global = true)]
    pub host: Option<String>,

    /// API key sent as X-Auth-Token (overrides the config file)
    #[arg(long, env = "SCT_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,
}

/// Build a client from flags, environment and config file
pub fn get_client(conn: &ConnectionArgs, formatter: &Formatter) -> Result<SctClient, ExitCode> {
    let (host, api_key) = resolve_connection(conn, || load_config(formatter), formatter)?;

    match SctClient::new(host, api_key) {
        Ok(client) => Ok(client),
        Err(e) => {
            formatter.error(&format!("Failed to create client: {e}"));
            Err(ExitCode::GeneralError)
        }
    }
}

/// Saved config, or an empty one when it cannot be read
fn load_config(formatter: &Formatter) -> Config {
    match ConfigManager::new().and_then(|m| m.load()) {
        Ok(config) => config,
        Err(e) => {
            formatter.warning(&format!("Ignoring config file: {e}"));
            Config::default()
        }
    }
}

/// Pick host and key; the config file is only consulted for missing values
fn resolve_connection(
    conn: &ConnectionArgs,
    load: impl FnOnce() -> Config,
    formatter: &Formatter,
) -> Result<(String, String), ExitCode> {
    let config = match (&conn.host, &conn.api_key) {
        (Some(_), Some(_)) => Config::default(),
        _ => load(),
    };

    config
        .resolve(conn.host.clone(), conn.api_key.clone())
        .map_err(|e| {
            formatter.error(&format!(
                "{e}; pass --host/--api-key, set SCT_HOST/SCT_API_KEY, or run `sct config set`"
            ));
            ExitCode::UsageError
        })
}

/// `HTTP <status>` heading printed above a body in human mode
pub fn status_line(status: u16, formatter: &Formatter) -> String {
    format!(
        "{} {}",
        formatter.style_key("HTTP"),
        formatter.style_status(status)
    )
}

/// JSON envelope for a raw response
#[derive(Serialize)]
struct ResponseOutput {
    status_code: u16,
    body: serde_json::Value,
}

/// Body as JSON when it parses, otherwise as a JSON string
pub fn body_value(response: &ApiResponse) -> serde_json::Value {
    response
        .json_value()
        .unwrap_or_else(|_| serde_json::Value::String(response.text()))
}

/// Print a response without interpreting it
pub fn print_response(response: &ApiResponse, formatter: &Formatter) -> ExitCode {
    let status = response.status_code();
    let body = body_value(response);

    if formatter.is_json() {
        formatter.json(&ResponseOutput {
            status_code: status,
            body,
        });
        return ExitCode::from_status(status);
    }

    let text = match &body {
        serde_json::Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| response.text()),
    };

    if response.is_success() {
        formatter.println(&status_line(status, formatter));
        if !text.is_empty() {
            formatter.println(&text);
        }
    } else {
        formatter.error(&format!("HTTP {status}: {}", text.trim_end()));
    }

    ExitCode::from_status(status)
}

/// Report a transport failure
pub fn report_error(error: &sct_core::Error, formatter: &Formatter) -> ExitCode {
    formatter.error(&format!("Request failed: {error}"));
    ExitCode::from_error(error)
}
