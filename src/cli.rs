//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use codekit::output::OutputConfig;

use crate::commands;

/// Codekit - Copy templates and packages from a catalog into your workspace
#[derive(Parser, Debug)]
#[command(name = "codekit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Set up the user configuration and print catalog exports
    Init(commands::init::InitArgs),

    /// List the artifacts available in the catalog
    List(commands::list::ListArgs),

    /// Show an artifact's resolved dependencies and install order
    Deps(commands::deps::DepsArgs),

    /// Copy an artifact and its internal dependencies into a workspace
    Use(commands::use_cmd::UseArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);
        let output = OutputConfig::from_env_and_flag(&self.color);

        match self.command {
            Commands::Init(args) => commands::init::execute(args, &output),
            Commands::List(args) => commands::list::execute(args, &output),
            Commands::Deps(args) => commands::deps::execute(args, &output),
            Commands::Use(args) => commands::use_cmd::execute(args, &output),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// Initialize the logger from the --log-level flag.
///
/// `RUST_LOG` still takes precedence when set, matching env_logger's
/// usual behavior.
fn init_logging(level: &str) {
    let filter = level.parse().unwrap_or(log::LevelFilter::Warn);
    let mut builder = env_logger::Builder::new();
    builder.filter_level(filter);
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }
    let _ = builder.try_init();
}
