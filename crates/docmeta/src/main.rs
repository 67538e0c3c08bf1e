//! docmeta - document metadata schema tool
//!
//! Standalone utilities over `docmeta_schema`:
//! - **builtins**: the built-in table catalog
//! - **build**: rebuild a document schema from its metadata tables
//! - **config**: resolved paths and settings

use anyhow::Result;
use clap::{Parser, Subcommand};
use docmeta_logging::LogConfig;
use std::process::ExitCode;
use tracing::{debug, error};

mod cli;

use cli::config::Settings;

#[derive(Parser, Debug)]
#[command(name = "docmeta", version, about = "Inspect and rebuild document metadata schemas")]
struct Cli {
    /// Enable verbose logging (debug to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the built-in tables every document contains
    Builtins(cli::builtins::BuiltinsArgs),

    /// Rebuild a schema from _grist_Tables and _grist_Tables_column data
    Build(cli::build::BuildArgs),

    /// Show resolved paths and settings
    Config(cli::config::ConfigArgs),

    /// Show the tool version and the built-in schema version
    Version {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{:#}", err);
            return ExitCode::FAILURE;
        }
    };

    let log_dir = match cli::config::ensure_logs_dir() {
        Ok(dir) => Some(dir),
        Err(err) => {
            eprintln!("Warning: failed to create logs directory: {}", err);
            None
        }
    };
    let _log_guard = match docmeta_logging::init_logging(LogConfig {
        app_name: "docmeta",
        verbose: cli.verbose,
        log_dir,
        default_filter: settings.log_filter.as_deref(),
    }) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("Warning: failed to initialize logging: {:#}", err);
            None
        }
    };

    debug!("Running {:?}", cli.command);
    match run(cli.command, &settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Command failed: {:#}", err);
            eprintln!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands, settings: &Settings) -> Result<()> {
    match command {
        Commands::Builtins(args) => cli::builtins::run(args),
        Commands::Build(args) => cli::build::run(args, settings),
        Commands::Config(args) => cli::config::run(args, settings),
        Commands::Version { json } => {
            let version = env!("CARGO_PKG_VERSION");
            if json {
                let value = serde_json::json!({
                    "version": version,
                    "schemaVersion": docmeta_schema::SCHEMA_VERSION,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("docmeta {}", version);
                println!("schema version {}", docmeta_schema::SCHEMA_VERSION);
            }
            Ok(())
        }
    }
}
