//! # List Command Implementation
//!
//! This module implements the `list` subcommand, which scans the catalog
//! and prints the available artifacts.
//!
//! ## Functionality
//!
//! - **Scoping**: List templates, packages, or both.
//! - **Filtering**: By tag (`--tag`) or free-text match (`--filter`) over
//!   slug, name, and description.
//! - **Pagination**: `--limit` and `--offset`.
//! - **Output modes**: default one-line listing, `--long` detail view,
//!   `--paths` absolute paths, `--quiet` slugs only, `--json`.
//!
//! This command is a read-only operation.

use anyhow::Result;
use clap::{Args, ValueEnum};

use codekit::config::Config;
use codekit::index::{ArtifactIndex, Scope};
use codekit::manifest::Artifact;
use codekit::output::OutputConfig;

/// List the artifacts available in the catalog
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Which part of the catalog to list
    #[arg(value_enum, default_value = "all")]
    pub scope: ListScope,

    /// Only show artifacts carrying this tag
    #[arg(short, long, value_name = "TAG")]
    pub tag: Option<String>,

    /// Only show artifacts whose slug, name, or description contains this text
    #[arg(short, long, value_name = "TEXT")]
    pub filter: Option<String>,

    /// Only show artifacts whose slug matches this glob (e.g. "packages/*")
    #[arg(short, long, value_name = "PATTERN")]
    pub pattern: Option<String>,

    /// Maximum number of artifacts to show
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Number of artifacts to skip
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub offset: usize,

    /// Emit machine-readable JSON
    #[arg(long)]
    pub json: bool,

    /// Use long listing format with description and tags
    #[arg(short, long)]
    pub long: bool,

    /// Print absolute paths instead of slugs
    #[arg(long)]
    pub paths: bool,

    /// Print slugs only, with no summary line
    #[arg(short, long)]
    pub quiet: bool,
}

/// Scope options for listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum ListScope {
    /// Only template artifacts
    Templates,
    /// Only package artifacts
    Packages,
    /// Both
    #[default]
    All,
}

impl From<ListScope> for Scope {
    fn from(scope: ListScope) -> Self {
        match scope {
            ListScope::Templates => Scope::Templates,
            ListScope::Packages => Scope::Packages,
            ListScope::All => Scope::All,
        }
    }
}

/// Execute the `list` command.
pub fn execute(args: ListArgs, _output: &OutputConfig) -> Result<()> {
    let config = Config::load()?;
    let mut index = ArtifactIndex::new(config);

    let mut artifacts = index.scan(args.scope.into())?;
    filter_artifacts(&mut artifacts, args.tag.as_deref(), args.filter.as_deref());

    if let Some(pattern) = &args.pattern {
        let glob_pattern = glob::Pattern::new(pattern)
            .map_err(|e| anyhow::anyhow!("Invalid glob pattern '{}': {}", pattern, e))?;
        artifacts.retain(|artifact| glob_pattern.matches(&artifact.slug));
    }

    let page: Vec<&Artifact> = artifacts
        .iter()
        .skip(args.offset)
        .take(args.limit.unwrap_or(usize::MAX))
        .collect();

    if args.json {
        let entries: Vec<serde_json::Value> = page
            .iter()
            .map(|artifact| {
                serde_json::json!({
                    "slug": artifact.slug,
                    "type": artifact.artifact_type.as_str(),
                    "name": artifact.manifest.name,
                    "description": artifact.manifest.description,
                    "tags": artifact.manifest.tags,
                    "path": artifact.abs_path,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if args.paths {
        for artifact in &page {
            println!("{}", artifact.abs_path.display());
        }
        return Ok(());
    }

    if args.quiet {
        for artifact in &page {
            println!("{}", artifact.slug);
        }
        return Ok(());
    }

    if page.is_empty() {
        println!("No artifacts found.");
        return Ok(());
    }

    if args.long {
        for artifact in &page {
            println!("{}  ({})", artifact.slug, artifact.manifest.name);
            if let Some(description) = &artifact.manifest.description {
                println!("    {}", description);
            }
            if !artifact.manifest.tags.is_empty() {
                println!("    tags: {}", artifact.manifest.tags.join(", "));
            }
        }
    } else {
        for artifact in &page {
            println!("{}  {}", artifact.slug, artifact.manifest.name);
        }
    }

    println!();
    println!("{} artifact(s)", page.len());

    Ok(())
}

/// Apply the tag and free-text filters in place.
fn filter_artifacts(artifacts: &mut Vec<Artifact>, tag: Option<&str>, filter: Option<&str>) {
    if let Some(tag) = tag {
        artifacts.retain(|artifact| artifact.manifest.tags.iter().any(|t| t == tag));
    }

    if let Some(filter) = filter {
        let needle = filter.to_lowercase();
        artifacts.retain(|artifact| {
            artifact.slug.to_lowercase().contains(&needle)
                || artifact.manifest.name.to_lowercase().contains(&needle)
                || artifact
                    .manifest
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
        });
    }
}
