//! # Artifact Index
//!
//! This module discovers artifacts under the configured catalog roots and
//! caches them for lookup by slug.
//!
//! ## Discovery Rules
//!
//! - A direct subdirectory of a root is a candidate iff it contains a
//!   `kit.json` manifest. Directories without one are silently skipped.
//! - A candidate whose manifest fails to parse or validate is skipped with
//!   a debug diagnostic; one broken artifact never aborts discovery of the
//!   rest.
//! - `package.json` is optional; when absent the artifact carries an empty
//!   descriptor.
//!
//! The cache is owned by the `ArtifactIndex` value and replaced on every
//! scan; `lookup` never triggers an implicit scan.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::manifest::{
    Artifact, ArtifactType, Manifest, PackageDescriptor, DESCRIPTOR_FILENAME, MANIFEST_FILENAME,
};

/// Which catalog roots a scan covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Only the templates root.
    Templates,
    /// Only the packages root.
    Packages,
    /// Both roots.
    All,
}

impl Scope {
    fn includes(&self, artifact_type: ArtifactType) -> bool {
        match self {
            Scope::Templates => artifact_type == ArtifactType::Template,
            Scope::Packages => artifact_type == ArtifactType::Package,
            Scope::All => true,
        }
    }
}

/// Slug-keyed cache of discovered artifacts.
#[derive(Debug)]
pub struct ArtifactIndex {
    config: Config,
    artifacts: BTreeMap<String, Artifact>,
}

impl ArtifactIndex {
    pub fn new(config: Config) -> ArtifactIndex {
        ArtifactIndex {
            config,
            artifacts: BTreeMap::new(),
        }
    }

    /// The configuration this index scans against.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Scan the roots covered by `scope`, replacing cached entries, and
    /// return the discovered artifacts in slug order.
    pub fn scan(&mut self, scope: Scope) -> Result<Vec<Artifact>> {
        let mut discovered = Vec::new();

        if scope.includes(ArtifactType::Template) {
            let root = self.config.templates_root.clone();
            discovered.extend(self.scan_root(&root)?);
        }
        if scope.includes(ArtifactType::Package) {
            let root = self.config.packages_root.clone();
            discovered.extend(self.scan_root(&root)?);
        }

        discovered.retain(|artifact| scope.includes(artifact.artifact_type));
        discovered.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(discovered)
    }

    /// Enumerate every package-type artifact under the packages root,
    /// regardless of scan scope. Feeds dependency resolution with the
    /// complete candidate pool.
    pub fn scan_all_packages(&mut self) -> Result<Vec<Artifact>> {
        let root = self.config.packages_root.clone();
        let mut packages = self.scan_root(&root)?;
        packages.retain(|artifact| artifact.artifact_type == ArtifactType::Package);
        packages.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(packages)
    }

    /// Pure cache read. Returns `None` for unscanned or absent slugs.
    pub fn lookup(&self, slug: &str) -> Option<&Artifact> {
        self.artifacts.get(slug)
    }

    /// Like `lookup`, but a missing slug is a structured error.
    pub fn require(&self, slug: &str) -> Result<&Artifact> {
        self.lookup(slug).ok_or_else(|| Error::ArtifactNotFound {
            slug: slug.to_string(),
        })
    }

    /// All cached artifacts in slug order.
    pub fn cached(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.values()
    }

    /// Empty the cache.
    pub fn clear(&mut self) {
        self.artifacts.clear();
    }

    /// Scan one root directory, inserting every valid artifact into the
    /// cache and returning the ones found under this root.
    fn scan_root(&mut self, root: &Path) -> Result<Vec<Artifact>> {
        let mut found = Vec::new();

        if !root.is_dir() {
            log::debug!("Catalog root does not exist, skipping: {}", root.display());
            return Ok(found);
        }

        for entry in fs::read_dir(root)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }

            match self.load_artifact(root, &path) {
                Some(artifact) => {
                    self.artifacts
                        .insert(artifact.slug.clone(), artifact.clone());
                    found.push(artifact);
                }
                None => continue,
            }
        }

        Ok(found)
    }

    /// Load one candidate directory, or `None` when it is not an artifact
    /// or its manifest is malformed.
    fn load_artifact(&self, root: &Path, dir: &Path) -> Option<Artifact> {
        let manifest_path = dir.join(MANIFEST_FILENAME);
        if !manifest_path.is_file() {
            return None;
        }

        let content = match fs::read_to_string(&manifest_path) {
            Ok(content) => content,
            Err(e) => {
                log::debug!("Skipping unreadable manifest {}: {}", manifest_path.display(), e);
                return None;
            }
        };

        let manifest = match Manifest::parse(&content, &manifest_path.display().to_string()) {
            Ok(manifest) => manifest,
            Err(e) => {
                log::debug!("Skipping invalid artifact: {}", e);
                return None;
            }
        };

        let descriptor = match fs::read_to_string(dir.join(DESCRIPTOR_FILENAME)) {
            Ok(content) => PackageDescriptor::parse(&content),
            Err(_) => PackageDescriptor::default(),
        };

        let root_name = root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let dir_name = dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let rel_path = Path::new(&root_name).join(&dir_name);

        Some(Artifact::new(manifest, descriptor, rel_path, dir.to_path_buf()))
    }
}
