//! # Dependency Resolver
//!
//! This module turns an artifact's declared package dependencies into a
//! graph of internal artifacts plus a list of external dependencies, and
//! computes the order in which internal artifacts should be installed.
//!
//! ## Classification
//!
//! A dependency name is *internal* when it matches a configured internal
//! scope prefix (e.g. `@repo`) or when some package-type artifact in the
//! catalog declares that name in its `package.json`. Everything else is
//! *external*. The first classification for a name wins and is never
//! re-evaluated, even if a later artifact declares the same name with a
//! different version.
//!
//! ## Cycles
//!
//! Traversal tracks per-node visit state (unvisited, visiting, visited)
//! on an explicit stack rather than the call stack. Re-entering a node
//! that is still being visited is a cycle: a warning is logged, that
//! branch stops, and the partial dependency set collected so far is kept.
//! Resolution always terminates.

use std::collections::{BTreeMap, HashMap};

use crate::config::Config;
use crate::error::Result;
use crate::index::ArtifactIndex;
use crate::manifest::Artifact;

/// Whether a dependency resolves inside the catalog or to a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyKind {
    Internal,
    External,
}

/// One distinct dependency name encountered anywhere in the graph.
#[derive(Debug, Clone)]
pub struct Dependency {
    /// The dependency name as declared.
    pub name: String,
    /// The declared version string, verbatim. Never semantically parsed.
    pub version: String,
    pub kind: DependencyKind,
    /// The resolved catalog artifact. `Some` iff the dependency is
    /// internal and its name maps to a known package artifact.
    pub artifact: Option<Artifact>,
}

/// The result of resolving one root artifact.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    /// The artifact resolution started from.
    pub root: Artifact,
    /// Every distinct dependency name, keyed by name.
    pub dependencies: BTreeMap<String, Dependency>,
    /// Installation order: the root plus every resolved internal
    /// dependency, root first, each exactly once.
    pub order: Vec<Artifact>,
}

impl DependencyGraph {
    /// All resolved internal dependencies, in name order.
    pub fn internal_dependencies(&self) -> Vec<&Artifact> {
        self.dependencies
            .values()
            .filter(|dep| dep.kind == DependencyKind::Internal)
            .filter_map(|dep| dep.artifact.as_ref())
            .collect()
    }

    /// All external dependencies as `"{name}@{version}"`, in name order.
    pub fn external_dependencies(&self) -> Vec<String> {
        self.dependencies
            .values()
            .filter(|dep| dep.kind == DependencyKind::External)
            .map(|dep| format!("{}@{}", dep.name, dep.version))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Visiting,
    Visited,
}

/// A DFS frame: one artifact and its remaining declared dependencies.
struct Frame {
    artifact: Artifact,
    deps: Vec<(String, String)>,
    next: usize,
}

/// Resolves dependency graphs against a fixed pool of package artifacts.
pub struct DependencyResolver {
    internal_scopes: Vec<String>,
    by_package_name: BTreeMap<String, Artifact>,
}

impl DependencyResolver {
    /// Build a resolver over every package-type artifact in the catalog.
    ///
    /// Artifacts whose descriptor declares no name cannot be resolved to
    /// by name and are excluded from the pool.
    pub fn new(config: &Config, index: &mut ArtifactIndex) -> Result<DependencyResolver> {
        let mut by_package_name = BTreeMap::new();
        for artifact in index.scan_all_packages()? {
            if let Some(name) = artifact.descriptor.name.clone() {
                by_package_name.insert(name, artifact);
            }
        }

        Ok(DependencyResolver {
            internal_scopes: config.internal_scopes.clone(),
            by_package_name,
        })
    }

    /// Resolve the full dependency graph rooted at `root`.
    ///
    /// Never fails: malformed or missing descriptors mean "no
    /// dependencies", and cycles are logged and tolerated.
    pub fn resolve(&self, root: &Artifact) -> DependencyGraph {
        let mut dependencies: BTreeMap<String, Dependency> = BTreeMap::new();
        let mut states: HashMap<String, VisitState> = HashMap::new();

        states.insert(root.slug.clone(), VisitState::Visiting);
        let mut stack = vec![self.frame_for(root)];

        while let Some(frame) = stack.last_mut() {
            if frame.next >= frame.deps.len() {
                states.insert(frame.artifact.slug.clone(), VisitState::Visited);
                stack.pop();
                continue;
            }

            let (name, version) = frame.deps[frame.next].clone();
            frame.next += 1;

            if dependencies.contains_key(&name) {
                continue;
            }

            let resolved = self.by_package_name.get(&name).cloned();
            let kind = if resolved.is_some() || self.matches_internal_scope(&name) {
                DependencyKind::Internal
            } else {
                DependencyKind::External
            };

            dependencies.insert(
                name.clone(),
                Dependency {
                    name: name.clone(),
                    version,
                    kind,
                    artifact: resolved.clone(),
                },
            );

            if let Some(artifact) = resolved {
                match states.get(&artifact.slug) {
                    Some(VisitState::Visiting) => {
                        log::warn!(
                            "Circular dependency detected: {}",
                            cycle_path(&stack, &artifact.slug)
                        );
                    }
                    Some(VisitState::Visited) => {}
                    None => {
                        states.insert(artifact.slug.clone(), VisitState::Visiting);
                        stack.push(self.frame_for(&artifact));
                    }
                }
            }
        }

        let order = self.topological_order(root, &dependencies);

        DependencyGraph {
            root: root.clone(),
            dependencies,
            order,
        }
    }

    fn frame_for(&self, artifact: &Artifact) -> Frame {
        Frame {
            artifact: artifact.clone(),
            deps: artifact
                .descriptor
                .merged_dependencies()
                .into_iter()
                .collect(),
            next: 0,
        }
    }

    fn matches_internal_scope(&self, name: &str) -> bool {
        self.internal_scopes
            .iter()
            .any(|scope| name.starts_with(scope.as_str()))
    }

    /// Compute the installation order: root first, then every resolved
    /// internal dependency exactly once, dependents before their
    /// dependencies.
    ///
    /// The adjacency relation draws edges from every artifact in the full
    /// package pool that declares a dependency in the graph, not only from
    /// artifacts already reached, so an artifact needed by several
    /// independent dependents still sorts consistently relative to all of
    /// them. Internal dependencies unreachable from the root (possible
    /// with some cyclic configurations) are appended in a second pass.
    fn topological_order(
        &self,
        root: &Artifact,
        dependencies: &BTreeMap<String, Dependency>,
    ) -> Vec<Artifact> {
        let mut nodes: BTreeMap<String, Artifact> = BTreeMap::new();
        nodes.insert(root.slug.clone(), root.clone());
        for dep in dependencies.values() {
            if let Some(artifact) = &dep.artifact {
                nodes.insert(artifact.slug.clone(), artifact.clone());
            }
        }

        // edges[a] = slugs of graph artifacts that must install before a.
        let mut edges: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let pool = std::iter::once(root).chain(self.by_package_name.values());
        for artifact in pool {
            if !nodes.contains_key(&artifact.slug) {
                continue;
            }
            let declared = artifact.descriptor.merged_dependencies();
            for name in declared.keys() {
                let target = dependencies
                    .get(name)
                    .and_then(|dep| dep.artifact.as_ref())
                    .map(|a| a.slug.clone());
                if let Some(target) = target {
                    if target != artifact.slug {
                        edges
                            .entry(artifact.slug.clone())
                            .or_default()
                            .push(target);
                    }
                }
            }
        }

        let mut states: HashMap<String, VisitState> = HashMap::new();
        let mut ordered_slugs: Vec<String> = Vec::new();

        // Iterative post-order DFS; post-visits prepend, so the root lands
        // first and dependents precede their dependencies.
        let mut stack: Vec<(String, usize)> = vec![(root.slug.clone(), 0)];
        states.insert(root.slug.clone(), VisitState::Visiting);

        while let Some((slug, next)) = stack.last().cloned() {
            let successors = edges.get(&slug).cloned().unwrap_or_default();
            if next >= successors.len() {
                states.insert(slug.clone(), VisitState::Visited);
                ordered_slugs.insert(0, slug);
                stack.pop();
                continue;
            }

            if let Some(last) = stack.last_mut() {
                last.1 += 1;
            }

            let successor = successors[next].clone();
            match states.get(&successor) {
                Some(_) => {}
                None => {
                    states.insert(successor.clone(), VisitState::Visiting);
                    stack.push((successor, 0));
                }
            }
        }

        let mut order: Vec<Artifact> = ordered_slugs
            .into_iter()
            .filter_map(|slug| nodes.get(&slug).cloned())
            .collect();

        for (slug, artifact) in &nodes {
            if !order.iter().any(|a| &a.slug == slug) {
                order.push(artifact.clone());
            }
        }

        order
    }
}

/// Render the cycle as a slug path for the warning message.
fn cycle_path(stack: &[Frame], reentered: &str) -> String {
    let mut parts: Vec<&str> = stack.iter().map(|f| f.artifact.slug.as_str()).collect();
    parts.push(reentered);
    parts.join(" -> ")
}
