//! # Materializer
//!
//! This module copies artifact trees into a destination workspace. It is
//! deliberately conservative: an existing destination is only touched when
//! it is byte-identical to the source (a no-op) or when the caller
//! explicitly asked to overwrite. Anything else is a structured conflict
//! the caller renders, never a silent overwrite.
//!
//! Copies preserve file permissions and modification times so that a
//! re-copied tree hashes identically to its source.

use std::fs;
use std::path::{Path, PathBuf};

use filetime::FileTime;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::hasher;

/// Caller-supplied knobs for a copy.
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyOptions {
    /// Replace a differing destination instead of reporting a conflict.
    pub overwrite: bool,
    /// Report what would happen without touching the filesystem.
    pub dry_run: bool,
}

/// What the materializer did (or would do) for one source/destination pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyAction {
    /// The destination did not exist and was created.
    Copied,
    /// The destination existed and was replaced on request.
    Overwritten,
    /// The destination already matched the source byte for byte.
    Identical,
    /// Nothing was copied; the outcome's error says why.
    Skipped,
    /// Dry run: the copy would have proceeded.
    WouldCopy,
}

impl CopyAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            CopyAction::Copied => "copied",
            CopyAction::Overwritten => "overwritten",
            CopyAction::Identical => "identical",
            CopyAction::Skipped => "skipped",
            CopyAction::WouldCopy => "would-copy",
        }
    }
}

/// The result of one copy attempt. Errors are carried as values so that
/// bulk copies can continue past individual failures.
#[derive(Debug)]
pub struct CopyOutcome {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub action: CopyAction,
    pub error: Option<Error>,
}

impl CopyOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Copy the tree at `source` to `destination` under `options`.
///
/// Returns an outcome rather than failing: expected conditions (missing
/// source, conflicting destination) land in the outcome's error field.
pub fn copy_tree(source: &Path, destination: &Path, options: &CopyOptions) -> CopyOutcome {
    let outcome = |action, error| CopyOutcome {
        source: source.to_path_buf(),
        destination: destination.to_path_buf(),
        action,
        error,
    };

    if !source.exists() {
        return outcome(
            CopyAction::Skipped,
            Some(Error::SourceMissing {
                path: source.display().to_string(),
            }),
        );
    }

    let destination_existed = destination.exists();

    if destination_existed && !options.overwrite {
        if hasher::trees_identical(source, destination) {
            return outcome(CopyAction::Identical, None);
        }
        return outcome(
            CopyAction::Skipped,
            Some(Error::CopyConflict {
                destination: destination.display().to_string(),
            }),
        );
    }

    if options.dry_run {
        return outcome(CopyAction::WouldCopy, None);
    }

    if let Err(e) = copy_recursive(source, destination) {
        return outcome(
            CopyAction::Skipped,
            Some(Error::Copy {
                destination: destination.display().to_string(),
                message: e.to_string(),
            }),
        );
    }

    if destination_existed {
        outcome(CopyAction::Overwritten, None)
    } else {
        outcome(CopyAction::Copied, None)
    }
}

/// Copy each (source, destination) pair in order, continuing past
/// failures. Returns one outcome per pair, in the same order.
pub fn copy_artifacts(pairs: &[(PathBuf, PathBuf)], options: &CopyOptions) -> Vec<CopyOutcome> {
    pairs
        .iter()
        .map(|(source, destination)| copy_tree(source, destination, options))
        .collect()
}

/// Recursively copy a directory tree, creating parents as needed and
/// preserving permissions and modification times.
fn copy_recursive(source: &Path, destination: &Path) -> Result<()> {
    for entry in WalkDir::new(source) {
        let entry = entry
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
        let rel = entry.path().strip_prefix(source).unwrap_or(entry.path());
        let target = destination.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else if entry.file_type().is_file() {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;

            let metadata = entry.metadata().map_err(|e| {
                std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
            })?;
            let mtime = FileTime::from_last_modification_time(&metadata);
            filetime::set_file_mtime(&target, mtime)?;
        }
    }
    Ok(())
}
