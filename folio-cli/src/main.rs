use anyhow::Result;
use clap::{Parser, Subcommand};
use folio_core::ExportKind;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;
mod console;
mod export;
mod state;

use export::{ExportArgs, Target};

#[derive(Parser, Debug)]
#[command(
    name = "folio",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("FOLIO_BUILD_SHA"), ")"),
    about = "Export portfolio transactions and positions to spreadsheets"
)]
struct Cli {
    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch records and write them to the configured sink
    Export {
        #[command(subcommand)]
        target: ExportCommand,
    },

    /// Manage ~/.folio/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ExportCommand {
    /// Transactions in a date range
    Transactions(ExportArgs),

    /// Current positions
    Positions(ExportArgs),

    /// Transactions and positions in one two-sheet artifact
    All(ExportArgs),
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config.toml if none exists
    Init,

    /// Print the effective configuration
    Show,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "folio=debug,folio_export=debug,folio_ingest=debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false).compact())
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Export { target } => {
            let cfg = config::load_config()?;
            let (target, args) = match target {
                ExportCommand::Transactions(args) => {
                    (Target::Kind(ExportKind::Transactions), args)
                }
                ExportCommand::Positions(args) => (Target::Kind(ExportKind::Positions), args),
                ExportCommand::All(args) => (Target::Combined, args),
            };
            export::run_export(target, &args, &cfg).await?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config()?,
        },
    }

    Ok(())
}
