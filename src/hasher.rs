//! # Content Hashing
//!
//! This module computes a deterministic digest over a directory tree, used
//! by the materializer to decide whether an existing destination is
//! byte-identical to its source (safe to skip) or has diverged (a conflict).
//!
//! ## Contract
//!
//! The digest is a SHA-256 over every file in the tree, visited in
//! lexicographically sorted relative-path order. For each file it feeds:
//!
//! 1. the relative path,
//! 2. the raw byte contents,
//! 3. a `"{size}-{mode}"` representation of length and permission bits.
//!
//! Version-control and dependency-cache directories are excluded by name.
//! Two trees that differ only in on-disk creation order hash identically;
//! any difference in contents, file set, or permissions changes the hash.

use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use crate::error::Result;

/// Directory names never included in a tree hash.
const EXCLUDED_DIRS: &[&str] = &[".git", "node_modules"];

/// Compute the content hash of a directory tree as a lowercase hex string.
pub fn hash_tree(dir: &Path) -> Result<String> {
    let mut files: Vec<(String, std::path::PathBuf)> = Vec::new();

    let walker = WalkDir::new(dir).into_iter().filter_entry(|entry| {
        !(entry.file_type().is_dir() && is_excluded(entry.file_name().to_str()))
    });

    for entry in walker {
        let entry = entry.map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(dir)
            .unwrap_or(entry.path())
            .to_string_lossy()
            .into_owned();
        files.push((rel, entry.path().to_path_buf()));
    }

    // Sort by relative path so directory iteration order cannot leak into
    // the digest.
    files.sort();

    let mut hasher = Sha256::new();
    for (rel, path) in files {
        hasher.update(rel.as_bytes());
        hasher.update(fs::read(&path)?);

        let metadata = fs::metadata(&path)?;
        hasher.update(format!("{}-{}", metadata.len(), permission_mode(&metadata)).as_bytes());
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Check whether two directory trees have identical content hashes.
///
/// Any failure to hash either tree is treated as "not identical".
pub fn trees_identical(a: &Path, b: &Path) -> bool {
    match (hash_tree(a), hash_tree(b)) {
        (Ok(hash_a), Ok(hash_b)) => hash_a == hash_b,
        _ => false,
    }
}

fn is_excluded(name: Option<&str>) -> bool {
    name.is_some_and(|name| EXCLUDED_DIRS.contains(&name))
}

#[cfg(unix)]
fn permission_mode(metadata: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode()
}

#[cfg(not(unix))]
fn permission_mode(metadata: &fs::Metadata) -> u32 {
    if metadata.permissions().readonly() {
        0o444
    } else {
        0o644
    }
}
