//! # Use Command Implementation
//!
//! This module implements the `use` subcommand, the main workflow of the
//! tool: copy an artifact and every internal artifact it transitively
//! depends on into a destination workspace.
//!
//! ## Flow
//!
//! 1. Scan the catalog and look up the requested slug.
//! 2. Resolve the artifact's dependency graph.
//! 3. Plan destinations: the artifact itself goes to `--into`/`--as` or
//!    the type's default directory under the workspace root; internal
//!    dependencies go under the workspace's `packages/` directory.
//! 4. Copy in order (the artifact first, then its dependencies),
//!    continuing past per-item failures.
//! 5. Unless `--no-install`/`--dry-run`, run the package manager's
//!    install step at the workspace root.
//! 6. Report external dependencies and required environment variables.

use anyhow::Result;
use clap::Args;
use std::path::{Path, PathBuf};

use codekit::config::Config;
use codekit::copier::{self, CopyAction, CopyOptions, CopyOutcome};
use codekit::index::{ArtifactIndex, Scope};
use codekit::manifest::{Artifact, RequiredEnv};
use codekit::output::{emoji, OutputConfig};
use codekit::pm::{self, PackageManager};
use codekit::resolver::DependencyResolver;
use codekit::suggestions;
use codekit::workspace;

/// Copy an artifact and its internal dependencies into a workspace
#[derive(Args, Debug)]
pub struct UseArgs {
    /// The fully qualified artifact slug (e.g. "templates/saas-starter")
    #[arg(value_name = "SLUG")]
    pub slug: String,

    /// Destination directory for the artifact (defaults to the type's
    /// directory under the workspace root)
    #[arg(long, value_name = "DIR")]
    pub into: Option<PathBuf>,

    /// Directory name for the copied artifact (defaults to the artifact id)
    #[arg(long = "as", value_name = "NAME")]
    pub rename: Option<String>,

    /// Replace the artifact's destination if it exists with different contents
    #[arg(long)]
    pub overwrite: bool,

    /// Show what would be copied without touching the filesystem
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the package manager install step
    #[arg(long)]
    pub no_install: bool,

    /// Package manager for the install step (pnpm, npm, yarn, bun)
    #[arg(long, value_name = "PM")]
    pub pm: Option<String>,

    /// Show package manager output during install
    #[arg(long)]
    pub verbose: bool,

    /// Emit machine-readable JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the `use` command.
pub fn execute(args: UseArgs, output: &OutputConfig) -> Result<()> {
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

    let current_dir = std::env::current_dir()?;
    let workspace_root = workspace::find_workspace_root(&current_dir).unwrap_or_else(|| {
        log::debug!("No workspace marker found, using the current directory");
        current_dir.clone()
    });

    // The artifact itself, then its internal dependencies.
    let destination = plan_destination(
        &workspace_root,
        &artifact,
        args.into.as_deref(),
        args.rename.as_deref(),
    );
    let mut plan: Vec<(Artifact, PathBuf, CopyOptions)> = vec![(
        artifact.clone(),
        destination.clone(),
        CopyOptions {
            overwrite: args.overwrite,
            dry_run: args.dry_run,
        },
    )];

    // --overwrite applies to the requested artifact only. A locally
    // diverged dependency copy still surfaces as a conflict.
    let dep_options = CopyOptions {
        overwrite: false,
        dry_run: args.dry_run,
    };
    for dep in graph.internal_dependencies() {
        if dep.slug == artifact.slug {
            continue;
        }
        let dep_destination = workspace_root.join("packages").join(&dep.id);
        plan.push(((*dep).clone(), dep_destination, dep_options));
    }

    let mut outcomes: Vec<(String, CopyOutcome)> = Vec::new();
    for (item, dest, options) in &plan {
        let outcome = copier::copy_tree(&item.abs_path, dest, options);
        outcomes.push((item.slug.clone(), outcome));
    }
    let failures = outcomes.iter().filter(|(_, o)| !o.succeeded()).count();

    let external = graph.external_dependencies();
    let required_env = collect_required_env(&plan);

    // The install step runs at the workspace root so the package manager
    // links the freshly copied workspace members.
    let mut installed: Option<bool> = None;
    if !args.dry_run && !args.no_install && failures == 0 {
        let pm = select_package_manager(&config, &workspace_root, args.pm.as_deref())?;
        installed = Some(pm::run_install(&workspace_root, pm, args.verbose));
    }

    if args.json {
        print_json(&outcomes, &external, &required_env, installed)?;
    } else {
        print_report(output, &outcomes, &external, &required_env, installed);
    }

    if failures > 0 {
        anyhow::bail!("{} artifact(s) could not be copied", failures);
    }

    Ok(())
}

/// Where the requested artifact lands in the workspace.
fn plan_destination(
    workspace_root: &Path,
    artifact: &Artifact,
    into: Option<&Path>,
    rename: Option<&str>,
) -> PathBuf {
    let name = rename.unwrap_or(&artifact.id);
    let parent = match into {
        Some(dir) => dir.to_path_buf(),
        None => workspace_root.join(artifact.artifact_type.default_dest_dir()),
    };
    parent.join(name)
}

/// Every required environment variable across the copied artifacts,
/// deduplicated by name in first-seen order.
fn collect_required_env(plan: &[(Artifact, PathBuf, CopyOptions)]) -> Vec<RequiredEnv> {
    let mut seen = std::collections::BTreeSet::new();
    let mut vars = Vec::new();
    for (artifact, _, _) in plan {
        for var in &artifact.manifest.required_env {
            if seen.insert(var.name.clone()) {
                vars.push(var.clone());
            }
        }
    }
    vars
}

fn select_package_manager(
    config: &Config,
    workspace_root: &Path,
    flag: Option<&str>,
) -> Result<PackageManager> {
    match flag {
        Some(name) => name.parse().map_err(|message: String| anyhow::anyhow!(message)),
        None => Ok(PackageManager::detect(workspace_root)
            .unwrap_or(config.default_package_manager)),
    }
}

fn print_report(
    output: &OutputConfig,
    outcomes: &[(String, CopyOutcome)],
    external: &[String],
    required_env: &[RequiredEnv],
    installed: Option<bool>,
) {
    for (slug, outcome) in outcomes {
        match &outcome.error {
            Some(error) => {
                println!(
                    "{} {} -> {}",
                    emoji(output, "❌", "[FAIL]"),
                    slug,
                    outcome.destination.display()
                );
                println!("   {}", error);
            }
            None => {
                let mark = match outcome.action {
                    CopyAction::Identical => emoji(output, "✨", "[SAME]"),
                    CopyAction::WouldCopy => emoji(output, "🔍", "[PLAN]"),
                    _ => emoji(output, "✅", "[OK]"),
                };
                println!(
                    "{} {} -> {} ({})",
                    mark,
                    slug,
                    outcome.destination.display(),
                    outcome.action.as_str()
                );
            }
        }
    }

    if !external.is_empty() {
        println!();
        println!("External dependencies (install via your package manager):");
        for dep in external {
            println!("  {}", dep);
        }
    }

    if !required_env.is_empty() {
        println!();
        println!("Required environment variables:");
        for var in required_env {
            match &var.example {
                Some(example) => {
                    println!("  {}  {} (e.g. {})", var.name, var.description, example)
                }
                None => println!("  {}  {}", var.name, var.description),
            }
        }
    }

    match installed {
        Some(true) => println!("\n{} Dependencies installed", emoji(output, "✅", "[OK]")),
        Some(false) => println!(
            "\n{} Install step failed; run it manually in the workspace",
            emoji(output, "⚠️", "[WARN]")
        ),
        None => {}
    }
}

fn print_json(
    outcomes: &[(String, CopyOutcome)],
    external: &[String],
    required_env: &[RequiredEnv],
    installed: Option<bool>,
) -> Result<()> {
    let copies: Vec<serde_json::Value> = outcomes
        .iter()
        .map(|(slug, outcome)| {
            serde_json::json!({
                "slug": slug,
                "destination": outcome.destination,
                "action": outcome.action.as_str(),
                "error": outcome.error.as_ref().map(|e| e.to_string()),
            })
        })
        .collect();

    let value = serde_json::json!({
        "copies": copies,
        "external": external,
        "requiredEnv": required_env,
        "installed": installed,
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use codekit::manifest::{Manifest, PackageDescriptor};

    fn template(slug: &str) -> Artifact {
        let manifest = Manifest::parse(
            &format!(
                r#"{{"type": "template", "slug": "{}", "name": "{}"}}"#,
                slug, slug
            ),
            "kit.json",
        )
        .unwrap();
        Artifact::new(
            manifest,
            PackageDescriptor::default(),
            PathBuf::from(format!("apps/{}", slug)),
            PathBuf::from(format!("/catalog/apps/{}", slug)),
        )
    }

    #[test]
    fn test_plan_destination_defaults_to_type_directory() {
        let artifact = template("saas-starter");
        let dest = plan_destination(Path::new("/workspace"), &artifact, None, None);
        assert_eq!(dest, PathBuf::from("/workspace/apps/saas-starter"));
    }

    #[test]
    fn test_plan_destination_honors_into_and_rename() {
        let artifact = template("saas-starter");
        let dest = plan_destination(
            Path::new("/workspace"),
            &artifact,
            Some(Path::new("/elsewhere")),
            Some("my-app"),
        );
        assert_eq!(dest, PathBuf::from("/elsewhere/my-app"));
    }

    #[test]
    fn test_collect_required_env_dedupes_by_name() {
        let manifest_a = Manifest::parse(
            r#"{"type": "template", "slug": "a", "name": "A",
                "requiredEnv": [{"name": "API_KEY", "description": "key"}]}"#,
            "kit.json",
        )
        .unwrap();
        let manifest_b = Manifest::parse(
            r#"{"type": "package", "slug": "b", "name": "B",
                "requiredEnv": [
                    {"name": "API_KEY", "description": "key again"},
                    {"name": "DB_URL", "description": "database"}
                ]}"#,
            "kit.json",
        )
        .unwrap();

        let plan = vec![
            (
                Artifact::new(
                    manifest_a,
                    PackageDescriptor::default(),
                    PathBuf::new(),
                    PathBuf::new(),
                ),
                PathBuf::new(),
                CopyOptions::default(),
            ),
            (
                Artifact::new(
                    manifest_b,
                    PackageDescriptor::default(),
                    PathBuf::new(),
                    PathBuf::new(),
                ),
                PathBuf::new(),
                CopyOptions::default(),
            ),
        ];

        let vars = collect_required_env(&plan);
        let names: Vec<&str> = vars.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["API_KEY", "DB_URL"]);
        assert_eq!(vars[0].description, "key");
    }
}
