//! Shared test utilities for the CLI end-to-end tests.
//!
//! Provides a `CatalogFixture` that builds a temporary artifact catalog
//! (an `apps/` root and a `packages/` root), a destination workspace with
//! a monorepo marker, and an isolated home directory, and wires all three
//! into a ready-to-run `codekit` command.

use assert_cmd::Command;
use assert_fs::prelude::*;
use std::path::PathBuf;

/// A temporary catalog, workspace, and home directory for one test.
pub struct CatalogFixture {
    temp: assert_fs::TempDir,
}

#[allow(dead_code)]
impl CatalogFixture {
    pub fn new() -> Self {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("catalog/apps").create_dir_all().unwrap();
        temp.child("catalog/packages").create_dir_all().unwrap();
        temp.child("home").create_dir_all().unwrap();
        // turbo.json marks the workspace root for discovery.
        temp.child("workspace/turbo.json").write_str("{}").unwrap();
        CatalogFixture { temp }
    }

    pub fn catalog_root(&self) -> PathBuf {
        self.temp.path().join("catalog")
    }

    pub fn templates_root(&self) -> PathBuf {
        self.temp.path().join("catalog/apps")
    }

    pub fn packages_root(&self) -> PathBuf {
        self.temp.path().join("catalog/packages")
    }

    pub fn workspace(&self) -> PathBuf {
        self.temp.path().join("workspace")
    }

    pub fn home(&self) -> PathBuf {
        self.temp.path().join("home")
    }

    /// Add a template artifact with the given manifest JSON and files.
    pub fn add_template(&self, dir: &str, manifest: &str, files: &[(&str, &str)]) -> PathBuf {
        self.add_artifact("catalog/apps", dir, manifest, None, files)
    }

    /// Add a package artifact. `dependencies` become the package.json
    /// dependencies map.
    pub fn add_package(
        &self,
        dir: &str,
        package_name: &str,
        dependencies: &[(&str, &str)],
        files: &[(&str, &str)],
    ) -> PathBuf {
        let manifest = format!(
            r#"{{"type": "package", "slug": "{dir}", "name": "{dir}"}}"#
        );
        let deps: Vec<String> = dependencies
            .iter()
            .map(|(name, version)| format!(r#""{name}": "{version}""#))
            .collect();
        let descriptor = format!(
            r#"{{"name": "{package_name}", "version": "0.1.0", "dependencies": {{{}}}}}"#,
            deps.join(", ")
        );
        self.add_artifact("catalog/packages", dir, &manifest, Some(&descriptor), files)
    }

    fn add_artifact(
        &self,
        root: &str,
        dir: &str,
        manifest: &str,
        descriptor: Option<&str>,
        files: &[(&str, &str)],
    ) -> PathBuf {
        let base = format!("{root}/{dir}");
        self.temp
            .child(format!("{base}/kit.json"))
            .write_str(manifest)
            .unwrap();
        if let Some(descriptor) = descriptor {
            self.temp
                .child(format!("{base}/package.json"))
                .write_str(descriptor)
                .unwrap();
        }
        for (rel, content) in files {
            self.temp
                .child(format!("{base}/{rel}"))
                .write_str(content)
                .unwrap();
        }
        self.temp.path().join(base)
    }

    /// A `codekit` command wired to this fixture's catalog, workspace,
    /// and home directory.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("codekit").unwrap();
        cmd.current_dir(self.workspace())
            .env("CODEKIT_TEMPLATES_ROOT", self.templates_root())
            .env("CODEKIT_PACKAGES_ROOT", self.packages_root())
            .env("HOME", self.home())
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1");
        cmd
    }
}
