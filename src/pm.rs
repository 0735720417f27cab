//! Package manager detection and install invocation.
//!
//! The install step is an opaque external process: the materializer only
//! guarantees files are on disk before it runs. Failures here are reported
//! to the caller as a boolean, never as a hard error.

use std::path::Path;
use std::process::Command;
use std::str::FromStr;

/// The JavaScript package managers this tool knows how to invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Pnpm,
    Npm,
    Yarn,
    Bun,
}

impl PackageManager {
    /// Detect the package manager from lockfiles in `dir`.
    pub fn detect(dir: &Path) -> Option<PackageManager> {
        if dir.join("pnpm-lock.yaml").exists() {
            return Some(PackageManager::Pnpm);
        }
        if dir.join("yarn.lock").exists() {
            return Some(PackageManager::Yarn);
        }
        if dir.join("bun.lockb").exists() {
            return Some(PackageManager::Bun);
        }
        if dir.join("package-lock.json").exists() {
            return Some(PackageManager::Npm);
        }
        None
    }

    /// The executable name.
    pub fn command(&self) -> &'static str {
        match self {
            PackageManager::Pnpm => "pnpm",
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Bun => "bun",
        }
    }

    /// The name as written in configuration and CLI flags.
    pub fn as_str(&self) -> &'static str {
        self.command()
    }
}

impl FromStr for PackageManager {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pnpm" => Ok(PackageManager::Pnpm),
            "npm" => Ok(PackageManager::Npm),
            "yarn" => Ok(PackageManager::Yarn),
            "bun" => Ok(PackageManager::Bun),
            other => Err(format!(
                "unknown package manager '{}' (expected pnpm, npm, yarn, or bun)",
                other
            )),
        }
    }
}

impl Default for PackageManager {
    fn default() -> Self {
        PackageManager::Pnpm
    }
}

/// Run `<pm> install` in `dir`, inheriting stdio when `verbose`.
///
/// Returns whether the install succeeded. A failure to spawn the process
/// (e.g., the package manager is not installed) counts as a failed install.
pub fn run_install(dir: &Path, pm: PackageManager, verbose: bool) -> bool {
    let mut command = Command::new(pm.command());
    command.arg("install").current_dir(dir);

    if !verbose {
        command
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null());
    }

    match command.status() {
        Ok(status) => status.success(),
        Err(e) => {
            log::warn!("Failed to run {} install: {}", pm.command(), e);
            false
        }
    }
}
