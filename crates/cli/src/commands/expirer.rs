//! Expiring-object commands
//!
//! Schedule an object for automatic deletion, or cancel that schedule.

use anyhow::Context;
use clap::Subcommand;
use jiff::{Span, Zoned};

use super::{ConnectionArgs, get_client, print_response, report_error};
use crate::exit_code::ExitCode;
use crate::output::Formatter;
use sct_core::types::format_expiration_date;

/// Expirer subcommands
#[derive(Subcommand, Debug)]
pub enum ExpirerCommands {
    /// Schedule an object for deletion
    Create(CreateArgs),

    /// Cancel a scheduled deletion
    #[command(alias = "rm")]
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct CreateArgs {
    /// Swift account, e.g. AUTH_<project id>
    pub account: String,

    pub container: String,

    pub object: String,

    /// Deletion date as `YYYY-MM-DD HH:MM:SS`
    #[arg(long, required_unless_present = "in_secs", conflicts_with = "in_secs")]
    pub date: Option<String>,

    /// Delete this many seconds from now (local time)
    #[arg(long = "in", value_name = "SECONDS")]
    pub in_secs: Option<i64>,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    pub account: String,

    pub container: String,

    pub object: String,
}

/// Execute an expirer subcommand
pub async fn execute(
    cmd: ExpirerCommands,
    conn: &ConnectionArgs,
    formatter: &Formatter,
) -> ExitCode {
    match cmd {
        ExpirerCommands::Create(args) => execute_create(args, conn, formatter).await,
        ExpirerCommands::Delete(args) => execute_delete(args, conn, formatter).await,
    }
}

/// Date to send: given verbatim, or computed from an offset
fn resolve_date(date: Option<String>, in_secs: Option<i64>, now: &Zoned) -> anyhow::Result<String> {
    if let Some(date) = date {
        return Ok(date);
    }

    let secs = in_secs.context("either --date or --in is required")?;
    let span = Span::new()
        .try_seconds(secs)
        .with_context(|| format!("offset of {secs} seconds is out of range"))?;
    let when = now
        .checked_add(span)
        .with_context(|| format!("cannot add {secs} seconds to the current time"))?;
    Ok(format_expiration_date(&when.datetime()))
}

async fn execute_create(
    args: CreateArgs,
    conn: &ConnectionArgs,
    formatter: &Formatter,
) -> ExitCode {
    let date = match resolve_date(args.date, args.in_secs, &Zoned::now()) {
        Ok(d) => d,
        Err(e) => {
            formatter.error(&format!("{e:#}"));
            return ExitCode::UsageError;
        }
    };

    let client = match get_client(conn, formatter) {
        Ok(c) => c,
        Err(code) => return code,
    };

    tracing::info!(
        account = %args.account,
        container = %args.container,
        object = %args.object,
        date = %date,
        "Scheduling expiration"
    );

    match client
        .expirer_create(&args.account, &args.container, &args.object, &date)
        .await
    {
        Ok(response) => print_response(&response, formatter),
        Err(e) => report_error(&e, formatter),
    }
}

async fn execute_delete(
    args: DeleteArgs,
    conn: &ConnectionArgs,
    formatter: &Formatter,
) -> ExitCode {
    let client = match get_client(conn, formatter) {
        Ok(c) => c,
        Err(code) => return code,
    };

    match client
        .expirer_delete(&args.account, &args.container, &args.object)
        .await
    {
        Ok(response) => print_response(&response, formatter),
        Err(e) => report_error(&e, formatter),
    }
}
