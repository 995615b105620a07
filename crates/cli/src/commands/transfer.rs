//! Transfer commands
//!
//! Create a Swift-to-GCP transfer for a project and follow its progress.
//! Successful responses get a readable rendering in human mode; anything
//! that does not decode is printed as received.

use clap::Subcommand;
use comfy_table::Table;
use humansize::{BINARY, format_size};

use super::{ConnectionArgs, get_client, print_response, report_error, status_line};
use crate::exit_code::ExitCode;
use crate::output::Formatter;
use sct_core::{ApiResponse, TransferPage, TransferRecord, TransferState, TransferStatus};

/// Transfer subcommands
#[derive(Subcommand, Debug)]
pub enum TransferCommands {
    /// Create a transfer for a project
    Create(CreateArgs),

    /// Show the transfer record of a project
    Get(ProjectArgs),

    /// Show the transfer status of a project
    Status(ProjectArgs),

    /// List transfers page by page
    #[command(name = "ls", alias = "list")]
    List(ListArgs),

    /// Show the transfer records of several projects
    Projects(ProjectsArgs),
}

#[derive(clap::Args, Debug)]
pub struct CreateArgs {
    pub project_id: String,

    pub project_name: String,

    /// Environment label, e.g. dev, qa, prod
    pub environment: String,
}

#[derive(clap::Args, Debug)]
pub struct ProjectArgs {
    pub project_id: String,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    #[arg(long, default_value_t = 50)]
    pub per_page: u32,
}

#[derive(clap::Args, Debug)]
pub struct ProjectsArgs {
    /// Project ids to look up
    #[arg(required = true)]
    pub project_ids: Vec<String>,
}

/// Execute a transfer subcommand
pub async fn execute(
    cmd: TransferCommands,
    conn: &ConnectionArgs,
    formatter: &Formatter,
) -> ExitCode {
    let client = match get_client(conn, formatter) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let (result, view) = match cmd {
        TransferCommands::Create(args) => (
            client
                .transfer_create(&args.project_id, &args.project_name, &args.environment)
                .await,
            View::Raw,
        ),
        TransferCommands::Get(args) => (client.transfer_get(&args.project_id).await, View::Record),
        TransferCommands::Status(args) => {
            (client.transfer_status(&args.project_id).await, View::Status)
        }
        TransferCommands::List(args) => (
            client.transfer_status_all(args.page, args.per_page).await,
            View::Page,
        ),
        TransferCommands::Projects(args) => (
            client.transfer_status_by_projects(&args.project_ids).await,
            View::Records,
        ),
    };

    match result {
        Ok(response) => {
            if !formatter.is_json() && response.is_success() {
                if let Some(lines) = render(view, &response, formatter) {
                    for line in &lines {
                        formatter.println(line);
                    }
                    return ExitCode::Success;
                }
            }
            print_response(&response, formatter)
        }
        Err(e) => report_error(&e, formatter),
    }
}

/// How a successful body is shown in human mode
#[derive(Debug, Clone, Copy)]
enum View {
    Raw,
    Record,
    Status,
    Page,
    Records,
}

// ========== Human renderers ==========
//
// Each returns None when the body does not decode, so the caller falls back
// to printing it raw.

/// Status line followed by the decoded view of the body
fn render(view: View, response: &ApiResponse, formatter: &Formatter) -> Option<Vec<String>> {
    let body = match view {
        View::Raw => None,
        View::Record => render_record(response, formatter),
        View::Status => render_status(response, formatter),
        View::Page => render_page(response),
        View::Records => render_records(response),
    }?;

    let mut lines = vec![status_line(response.status_code(), formatter)];
    lines.extend(body);
    Some(lines)
}

fn render_status(response: &ApiResponse, formatter: &Formatter) -> Option<Vec<String>> {
    let status = response.json::<TransferStatus>().ok()?;

    let state = status.state();
    let mut lines = vec![format!(
        "{} {} ({state})",
        formatter.style_key("Status:  "),
        status.status
    )];
    if let Some(progress) = status.progress {
        lines.push(format!("{} {progress}%", formatter.style_key("Progress:")));
    } else if state == TransferState::Completed {
        lines.push(format!("{} 100%", formatter.style_key("Progress:")));
    }
    Some(lines)
}

fn render_record(response: &ApiResponse, formatter: &Formatter) -> Option<Vec<String>> {
    let record = response.json::<TransferRecord>().ok()?;

    let key = |k: &str| formatter.style_key(&format!("{k:<14}"));
    let date = |d: &Option<String>| {
        d.as_deref()
            .map(|s| formatter.style_date(s))
            .unwrap_or_else(|| "-".to_string())
    };

    let mut lines = vec![
        format!(
            "{} {}",
            key("Project:"),
            formatter.style_name(&record.project_name)
        ),
        format!("{} {}", key("Project ID:"), record.project_id),
        format!("{} {}", key("Environment:"), record.environment),
        format!(
            "{} {} containers, {} objects, {}",
            key("Swift:"),
            record.container_count_swift,
            record.object_count_swift,
            format_size(record.bytes_used_swift, BINARY)
        ),
        format!(
            "{} {} containers, {} objects, {}",
            key("GCP:"),
            record.container_count_gcp,
            record.object_count_gcp,
            format_size(record.bytes_used_gcp, BINARY)
        ),
        format!("{} {}", key("Errors:"), record.count_error),
    ];
    if !record.last_object.is_empty() {
        lines.push(format!("{} {}", key("Last object:"), record.last_object));
    }
    lines.push(format!("{} {}", key("Started:"), date(&record.initial_date)));
    lines.push(format!("{} {}", key("Finished:"), date(&record.final_date)));
    Some(lines)
}

fn render_page(response: &ApiResponse) -> Option<Vec<String>> {
    let page = response.json::<TransferPage>().ok()?;

    let mut lines = vec![records_listing(&page.items)];
    lines.push(format!(
        "Page {} of {} ({} per page, {} total)",
        page.page, page.pages, page.per_page, page.total
    ));
    Some(lines)
}

fn render_records(response: &ApiResponse) -> Option<Vec<String>> {
    let records = response.json::<Vec<TransferRecord>>().ok()?;
    Some(vec![records_listing(&records)])
}

fn records_listing(records: &[TransferRecord]) -> String {
    if records.is_empty() {
        "No transfers found.".to_string()
    } else {
        records_table(records).to_string()
    }
}

fn records_table(records: &[TransferRecord]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "PROJECT ID",
        "NAME",
        "ENV",
        "OBJECTS SWIFT/GCP",
        "SIZE SWIFT/GCP",
        "ERRORS",
        "STARTED",
        "FINISHED",
    ]);

    for r in records {
        table.add_row(vec![
            r.project_id.clone(),
            r.project_name.clone(),
            r.environment.clone(),
            format!("{}/{}", r.object_count_swift, r.object_count_gcp),
            format!(
                "{}/{}",
                format_size(r.bytes_used_swift, BINARY),
                format_size(r.bytes_used_gcp, BINARY)
            ),
            r.count_error.to_string(),
            r.initial_date.clone().unwrap_or_else(|| "-".to_string()),
            r.final_date.clone().unwrap_or_else(|| "-".to_string()),
        ]);
    }

    table
}
