//! # Deps Command Implementation
//!
//! This module implements the `deps` subcommand, which resolves an
//! artifact's dependency graph and prints the internal/external partition
//! plus the installation order. It is a read-only operation; nothing is
//! copied.

use anyhow::Result;
use clap::Args;

use codekit::config::Config;
use codekit::index::{ArtifactIndex, Scope};
use codekit::output::OutputConfig;
use codekit::resolver::DependencyResolver;
use codekit::suggestions;

/// Show an artifact's resolved dependencies and install order
#[derive(Args, Debug)]
pub struct DepsArgs {
    /// The fully qualified artifact slug (e.g. "packages/ui")
    #[arg(value_name = "SLUG")]
    pub slug: String,

    /// Emit machine-readable JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the `deps` command.
pub fn execute(args: DepsArgs, _output: &OutputConfig) -> Result<()> {
    let config = Config::load()?;
    let mut index = ArtifactIndex::new(config.clone());
    index.scan(Scope::All)?;

    let artifact = match index.lookup(&args.slug) {
        Some(artifact) => artifact.clone(),
        None => {
            let known: Vec<String> = index.cached().map(|a| a.slug.clone()).collect();
            return Err(suggestions::artifact_not_found(&args.slug, &known));
        }
    };

    let resolver = DependencyResolver::new(&config, &mut index)?;
    let graph = resolver.resolve(&artifact);

    let internal: Vec<String> = graph
        .internal_dependencies()
        .iter()
        .map(|a| a.slug.clone())
        .collect();
    let external = graph.external_dependencies();
    let order: Vec<String> = graph.order.iter().map(|a| a.slug.clone()).collect();

    if args.json {
        let value = serde_json::json!({
            "root": graph.root.slug,
            "internal": internal,
            "external": external,
            "order": order,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", graph.root.slug);
    println!();

    if internal.is_empty() {
        println!("Internal dependencies: none");
    } else {
        println!("Internal dependencies:");
        for slug in &internal {
            println!("  {}", slug);
        }
    }

    println!();
    if external.is_empty() {
        println!("External dependencies: none");
    } else {
        println!("External dependencies:");
        for dep in &external {
            println!("  {}", dep);
        }
    }

    println!();
    println!("Install order:");
    for (position, slug) in order.iter().enumerate() {
        println!("  {}. {}", position + 1, slug);
    }

    Ok(())
}
