//! # Manifest Model
//!
//! This module defines the data structures that describe a single artifact
//! in the catalog: the `kit.json` manifest, the optional `package.json`
//! descriptor, and the derived `Artifact` record produced by the index.
//!
//! ## Key Components
//!
//! - **`ArtifactType`**: The two artifact kinds, `Template` and `Package`.
//!   Each variant carries its slug prefix and its default destination
//!   directory, so no other module branches on type strings.
//!
//! - **`Manifest`**: The typed representation of a `kit.json` file. Parsing
//!   validates the contract (non-empty slug, known type); everything else
//!   is optional with sensible defaults.
//!
//! - **`PackageDescriptor`**: A normalized view of `package.json`. Only the
//!   fields this tool reads are kept, and the dependency maps are coerced
//!   to ordered name -> version-string mappings, ignoring non-string values.
//!
//! - **`Artifact`**: A discovered artifact with its catalog location and
//!   both metadata records. Artifacts are immutable after construction.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// The name of the per-artifact manifest file.
pub const MANIFEST_FILENAME: &str = "kit.json";

/// The name of the optional per-artifact package descriptor file.
pub const DESCRIPTOR_FILENAME: &str = "package.json";

/// The kind of an artifact, as declared in its manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactType {
    /// A full application template, copied into the workspace's app directory.
    Template,
    /// A reusable package, copied into the workspace's package directory.
    Package,
}

impl ArtifactType {
    /// The slug prefix for this type ("templates" or "packages").
    pub fn prefix(&self) -> &'static str {
        match self {
            ArtifactType::Template => "templates",
            ArtifactType::Package => "packages",
        }
    }

    /// The default destination directory name in a target workspace.
    pub fn default_dest_dir(&self) -> &'static str {
        match self {
            ArtifactType::Template => "apps",
            ArtifactType::Package => "packages",
        }
    }

    /// Human-readable type name used in output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactType::Template => "template",
            ArtifactType::Package => "package",
        }
    }
}

/// An environment variable an artifact requires at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequiredEnv {
    /// Variable name (e.g., "STRIPE_SECRET_KEY").
    pub name: String,
    /// What the variable is for.
    pub description: String,
    /// An optional example value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

/// Typed representation of a `kit.json` manifest file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// The artifact kind.
    #[serde(rename = "type")]
    pub artifact_type: ArtifactType,
    /// Identifier unique within the type (non-empty).
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Optional free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Ordered list of tags for filtering.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Environment variables the artifact requires.
    #[serde(default)]
    pub required_env: Vec<RequiredEnv>,
    /// Preview directives, consumed only by external preview tooling.
    /// Carried opaquely; this tool never interprets them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<Vec<Value>>,
}

impl Manifest {
    /// Parse and validate a manifest from its JSON text.
    ///
    /// `path` is used only for error context.
    pub fn parse(content: &str, path: &str) -> Result<Manifest> {
        let manifest: Manifest =
            serde_json::from_str(content).map_err(|e| Error::ManifestParse {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        if manifest.slug.trim().is_empty() {
            return Err(Error::ManifestParse {
                path: path.to_string(),
                message: "slug must be non-empty".to_string(),
            });
        }

        Ok(manifest)
    }
}

/// Normalized view of an artifact's `package.json`.
///
/// Only the fields dependency resolution reads are retained. Dependency
/// maps are ordered and contain only string-valued entries; anything
/// else in the file is ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageDescriptor {
    /// The declared package name, if any.
    pub name: Option<String>,
    /// The declared version string, if any (never semantically parsed).
    pub version: Option<String>,
    /// Runtime dependencies: name -> declared version string.
    pub dependencies: BTreeMap<String, String>,
    /// Development dependencies.
    pub dev_dependencies: BTreeMap<String, String>,
    /// Peer dependencies.
    pub peer_dependencies: BTreeMap<String, String>,
}

impl PackageDescriptor {
    /// Parse a descriptor from JSON text.
    ///
    /// A descriptor that is not a JSON object, or that fails to parse at
    /// all, yields the default (empty) descriptor: malformed descriptors
    /// mean "no dependencies", never an error.
    pub fn parse(content: &str) -> PackageDescriptor {
        match serde_json::from_str::<Value>(content) {
            Ok(value) => Self::from_value(&value),
            Err(e) => {
                log::debug!("Ignoring unparsable package descriptor: {}", e);
                PackageDescriptor::default()
            }
        }
    }

    /// Extract the fields this tool reads from an arbitrary JSON value.
    pub fn from_value(value: &Value) -> PackageDescriptor {
        let obj = match value.as_object() {
            Some(obj) => obj,
            None => return PackageDescriptor::default(),
        };

        PackageDescriptor {
            name: obj.get("name").and_then(Value::as_str).map(str::to_string),
            version: obj
                .get("version")
                .and_then(Value::as_str)
                .map(str::to_string),
            dependencies: string_map(obj.get("dependencies")),
            dev_dependencies: string_map(obj.get("devDependencies")),
            peer_dependencies: string_map(obj.get("peerDependencies")),
        }
    }

    /// Merge `dependencies`, `devDependencies`, and `peerDependencies`
    /// into a single declared-dependency set. Keys already present from
    /// an earlier map are not overridden by later maps.
    pub fn merged_dependencies(&self) -> BTreeMap<String, String> {
        let mut merged = self.dependencies.clone();
        for (name, version) in self.dev_dependencies.iter().chain(&self.peer_dependencies) {
            merged
                .entry(name.clone())
                .or_insert_with(|| version.clone());
        }
        merged
    }
}

/// Coerce a JSON value into an ordered name -> version map, keeping only
/// string-valued entries.
fn string_map(value: Option<&Value>) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    if let Some(Value::Object(obj)) = value {
        for (name, version) in obj {
            if let Some(version) = version.as_str() {
                map.insert(name.clone(), version.to_string());
            }
        }
    }
    map
}

/// A discovered, copyable artifact: a manifest plus its catalog location.
///
/// Artifacts are constructed fresh on every index scan and never mutated
/// afterwards.
#[derive(Debug, Clone)]
pub struct Artifact {
    /// Globally unique key: `{type-prefix}/{manifest.slug}`.
    pub slug: String,
    /// The manifest slug without the type prefix.
    pub id: String,
    /// The artifact kind.
    pub artifact_type: ArtifactType,
    /// Location relative to the catalog root's parent (e.g. "apps/saas-starter").
    pub rel_path: PathBuf,
    /// Absolute location on disk.
    pub abs_path: PathBuf,
    /// The parsed manifest.
    pub manifest: Manifest,
    /// The normalized package descriptor (empty if the file was absent).
    pub descriptor: PackageDescriptor,
}

impl Artifact {
    /// Build an artifact record from its parsed metadata and location.
    pub fn new(
        manifest: Manifest,
        descriptor: PackageDescriptor,
        rel_path: PathBuf,
        abs_path: PathBuf,
    ) -> Artifact {
        Artifact {
            slug: format!("{}/{}", manifest.artifact_type.prefix(), manifest.slug),
            id: manifest.slug.clone(),
            artifact_type: manifest.artifact_type,
            rel_path,
            abs_path,
            manifest,
            descriptor,
        }
    }

    /// The package name declared in the descriptor, falling back to the id.
    pub fn package_name(&self) -> &str {
        self.descriptor.name.as_deref().unwrap_or(&self.id)
    }
}
