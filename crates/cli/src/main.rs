//! sct: command-line client for the Swift Cloud Tools API

mod commands;
mod exit_code;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;

use commands::ConnectionArgs;
use commands::config::ConfigCommands;
use commands::expirer::ExpirerCommands;
use commands::transfer::TransferCommands;
use exit_code::ExitCode;
use output::{Formatter, OutputConfig};

#[derive(Parser, Debug)]
#[command(name = "sct", version, about = "Swift Cloud Tools client")]
struct Cli {
    /// Output strict JSON
    #[arg(long, global = true)]
    json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log requests and responses to stderr
    #[arg(long, global = true)]
    debug: bool,

    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Schedule or cancel object expiration
    #[command(subcommand)]
    Expirer(ExpirerCommands),

    /// Manage Swift-to-GCP transfers
    #[command(subcommand)]
    Transfer(TransferCommands),

    /// Manage the saved host and API key
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions {
        shell: Shell,
    },
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let formatter = Formatter::new(OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        quiet: cli.quiet,
    });
    console::set_colors_enabled(formatter.colors_enabled());
    console::set_colors_enabled_stderr(formatter.colors_enabled());

    let code = match cli.command {
        Commands::Expirer(cmd) => {
            commands::expirer::execute(cmd, &cli.connection, &formatter).await
        }
        Commands::Transfer(cmd) => {
            commands::transfer::execute(cmd, &cli.connection, &formatter).await
        }
        Commands::Config(cmd) => commands::config::execute(cmd, &formatter),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "sct", &mut std::io::stdout());
            ExitCode::Success
        }
    };

    code.into()
}
