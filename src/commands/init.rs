//! # Init Command Implementation
//!
//! This module implements the `init` subcommand, which prepares a machine
//! to use a catalog:
//!
//! - Writes the default user configuration to `~/.codekit.json` (kept
//!   as-is unless `--force` is passed).
//! - Prints the shell export lines for the two catalog root environment
//!   variables, pointed at the given catalog directory.
//!
//! The command never edits shell rc files; the user pastes the printed
//! exports where they want them.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use codekit::config::{self, PACKAGES_ROOT_ENV, TEMPLATES_ROOT_ENV};
use codekit::output::{emoji, OutputConfig};

/// Set up the user configuration and print catalog exports
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path to the catalog root (the directory containing apps/ and packages/)
    #[arg(value_name = "CATALOG_ROOT")]
    pub root: PathBuf,

    /// Overwrite an existing ~/.codekit.json with the defaults
    #[arg(long)]
    pub force: bool,
}

/// Execute the `init` command.
pub fn execute(args: InitArgs, output: &OutputConfig) -> Result<()> {
    let root = args.root.canonicalize().map_err(|_| {
        anyhow::anyhow!(
            "Catalog root does not exist: {}\n\n\
             hint: Clone your catalog repository first, then pass its path",
            args.root.display()
        )
    })?;

    let templates_root = root.join("apps");
    let packages_root = root.join("packages");

    for (dir, label) in [(&templates_root, "apps"), (&packages_root, "packages")] {
        if !dir.is_dir() {
            println!(
                "{} Catalog has no {}/ directory: {}",
                emoji(output, "⚠️", "[WARN]"),
                label,
                dir.display()
            );
        }
    }

    match config::user_config_path() {
        Some(path) if path.exists() && !args.force => {
            println!(
                "{} Keeping existing {} (pass --force to overwrite)",
                emoji(output, "ℹ️", "[INFO]"),
                path.display()
            );
        }
        Some(path) => {
            config::write_default_user_config(&path)?;
            println!(
                "{} Wrote default configuration to {}",
                emoji(output, "✅", "[OK]"),
                path.display()
            );
        }
        None => {
            println!(
                "{} No home directory found; skipping user configuration",
                emoji(output, "⚠️", "[WARN]")
            );
        }
    }

    println!();
    println!("Add these to your shell profile:");
    println!();
    println!("export {}={}", TEMPLATES_ROOT_ENV, templates_root.display());
    println!("export {}={}", PACKAGES_ROOT_ENV, packages_root.display());

    Ok(())
}
