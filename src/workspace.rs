//! Workspace root discovery.
//!
//! A destination workspace is identified by walking up from a starting
//! directory until a monorepo marker is found: `turbo.json`,
//! `pnpm-workspace.yaml`, or a `package.json` declaring `workspaces`.

use std::path::{Path, PathBuf};

use serde_json::Value;

/// Find the enclosing workspace root, or `None` when no marker exists
/// anywhere up the tree.
pub fn find_workspace_root(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if is_workspace_root(dir) {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}

fn is_workspace_root(dir: &Path) -> bool {
    if dir.join("turbo.json").is_file() || dir.join("pnpm-workspace.yaml").is_file() {
        return true;
    }

    let package_json = dir.join("package.json");
    if !package_json.is_file() {
        return false;
    }

    match std::fs::read_to_string(&package_json) {
        Ok(content) => serde_json::from_str::<Value>(&content)
            .ok()
            .and_then(|value| value.get("workspaces").cloned())
            .is_some(),
        Err(_) => false,
    }
}
