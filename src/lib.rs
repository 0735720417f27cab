//! # Codekit Library
//!
//! This library provides the core functionality for discovering, resolving,
//! and materializing code artifacts from a catalog of monorepos. It is
//! designed to be used by the `codekit` command-line tool but can also be
//! integrated into other applications that need catalog-driven scaffolding.
//!
//! ## Core Concepts
//!
//! - **Manifest Model (`manifest`)**: The typed representation of an
//!   artifact's `kit.json` manifest and optional `package.json` descriptor.
//! - **Artifact Index (`index`)**: Walks the configured catalog roots,
//!   loads manifests, and exposes lookup by fully qualified slug.
//! - **Dependency Resolver (`resolver`)**: Builds a dependency graph rooted
//!   at one artifact, classifying each declared dependency as internal or
//!   external, tolerating cycles, and computing an installation order.
//! - **Materializer (`copier`)**: Copies artifact trees into a destination
//!   workspace, using content hashing (`hasher`) to distinguish no-op
//!   re-copies from genuine conflicts.
//!
//! ## Execution Flow
//!
//! A typical `use` invocation runs:
//!
//! 1. **Scan**: Discover every artifact under the catalog roots.
//! 2. **Lookup**: Find the requested artifact by slug.
//! 3. **Resolve**: Build its dependency graph and installation order.
//! 4. **Materialize**: Copy the artifact and its internal dependencies
//!    into the workspace, in resolver order.
//! 5. **Install**: Hand off to the workspace's package manager (`pm`).
//!
//! Expected conditions (artifact not found, destination conflict, cycle)
//! are structured values the caller renders; the library never panics or
//! terminates the process.

pub mod config;
pub mod copier;
pub mod error;
pub mod hasher;
pub mod index;
pub mod manifest;
pub mod output;
pub mod pm;
pub mod resolver;
pub mod suggestions;
pub mod workspace;

#[cfg(test)]
mod hasher_proptest;
