//! # Configuration Loading
//!
//! This module loads and validates the configuration that the rest of the
//! tool consumes: the two catalog roots and the user's preferences.
//!
//! ## Sources
//!
//! - **Environment variables**: `CODEKIT_TEMPLATES_ROOT` points at the
//!   directory holding template artifacts (an `apps`-style directory),
//!   `CODEKIT_PACKAGES_ROOT` at the directory holding package artifacts.
//!   Both are required and validated to exist.
//!
//! - **User config file** (`~/.codekit.json`, optional): internal naming
//!   scopes used to classify dependencies as internal (default `["@repo"]`)
//!   and the default package manager for the install step.
//!
//! The loaded `Config` is an explicit value threaded through calls; there
//! is no global configuration state.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::pm::PackageManager;

/// Environment variable naming the templates root.
pub const TEMPLATES_ROOT_ENV: &str = "CODEKIT_TEMPLATES_ROOT";

/// Environment variable naming the packages root.
pub const PACKAGES_ROOT_ENV: &str = "CODEKIT_PACKAGES_ROOT";

/// The user configuration file name, located in the home directory.
pub const USER_CONFIG_FILENAME: &str = ".codekit.json";

/// User preferences as written in `~/.codekit.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserConfig {
    /// Name prefixes identifying packages that belong to the catalog
    /// rather than an external registry.
    pub internal_scopes: Vec<String>,
    /// Package manager used for the install step when none is detected.
    pub default_package_manager: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        UserConfig {
            internal_scopes: vec!["@repo".to_string()],
            default_package_manager: "pnpm".to_string(),
        }
    }
}

/// Fully resolved configuration for one invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory containing template artifacts.
    pub templates_root: PathBuf,
    /// Root directory containing package artifacts.
    pub packages_root: PathBuf,
    /// Internal naming scopes (e.g., `@repo`).
    pub internal_scopes: Vec<String>,
    /// Fallback package manager for the install step.
    pub default_package_manager: PackageManager,
}

impl Config {
    /// Build a configuration directly from root paths, using default user
    /// preferences. Intended for library consumers and tests.
    pub fn new(templates_root: PathBuf, packages_root: PathBuf) -> Config {
        let user = UserConfig::default();
        Config {
            templates_root,
            packages_root,
            internal_scopes: user.internal_scopes,
            default_package_manager: PackageManager::default(),
        }
    }

    /// Load configuration from the environment and the user config file.
    ///
    /// Fails with an actionable hint when a root variable is missing or
    /// points at a directory that does not exist. A missing user config
    /// file yields the defaults; a malformed one is an error.
    pub fn load() -> Result<Config> {
        let templates_root = required_root(TEMPLATES_ROOT_ENV)?;
        let packages_root = required_root(PACKAGES_ROOT_ENV)?;
        let user = load_user_config()?;

        let default_package_manager = user
            .default_package_manager
            .parse()
            .map_err(|message| Error::Config {
                message,
                hint: Some(format!(
                    "Check defaultPackageManager in ~/{}",
                    USER_CONFIG_FILENAME
                )),
            })?;

        Ok(Config {
            templates_root,
            packages_root,
            internal_scopes: user.internal_scopes,
            default_package_manager,
        })
    }
}

/// Read a root directory from the environment and verify it exists.
fn required_root(var: &str) -> Result<PathBuf> {
    let value = std::env::var(var).map_err(|_| Error::Config {
        message: format!("{} is not set", var),
        hint: Some("Run 'codekit init <root>' to print the required exports".to_string()),
    })?;

    let path = PathBuf::from(value);
    if !path.is_dir() {
        return Err(Error::Config {
            message: format!("{} does not exist: {}", var, path.display()),
            hint: Some("Point the variable at a directory of artifact folders".to_string()),
        });
    }

    Ok(path)
}

/// Load `~/.codekit.json`, falling back to defaults when absent.
fn load_user_config() -> Result<UserConfig> {
    let path = match user_config_path() {
        Some(path) => path,
        None => return Ok(UserConfig::default()),
    };

    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)?;
    serde_json::from_str(&content).map_err(|e| Error::Config {
        message: format!("invalid {}: {}", path.display(), e),
        hint: Some("Fix the JSON, or delete the file to use defaults".to_string()),
    })
}

/// The absolute path of the user config file, if a home directory exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(USER_CONFIG_FILENAME))
}

/// Write the default user configuration to `path`.
pub fn write_default_user_config(path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(&UserConfig::default())?;
    std::fs::write(path, content + "\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn set_roots(templates: &Path, packages: &Path) {
        std::env::set_var(TEMPLATES_ROOT_ENV, templates);
        std::env::set_var(PACKAGES_ROOT_ENV, packages);
    }

    fn clear_roots() {
        std::env::remove_var(TEMPLATES_ROOT_ENV);
        std::env::remove_var(PACKAGES_ROOT_ENV);
    }

    #[test]
    #[serial]
    fn test_load_requires_templates_root() {
        clear_roots();
        let result = Config::load();
        assert!(result.is_err());
        let message = result.unwrap_err().to_string();
        assert!(message.contains(TEMPLATES_ROOT_ENV));
        assert!(message.contains("codekit init"));
    }

    #[test]
    #[serial]
    fn test_load_rejects_missing_directory() {
        let temp = TempDir::new().unwrap();
        set_roots(&temp.path().join("nope"), temp.path());

        let result = Config::load();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("does not exist"));
        clear_roots();
    }

    #[test]
    #[serial]
    fn test_load_with_valid_roots() {
        let temp = TempDir::new().unwrap();
        let apps = temp.path().join("apps");
        let packages = temp.path().join("packages");
        fs::create_dir_all(&apps).unwrap();
        fs::create_dir_all(&packages).unwrap();
        set_roots(&apps, &packages);

        let config = Config::load().unwrap();
        assert_eq!(config.templates_root, apps);
        assert_eq!(config.packages_root, packages);
        assert!(config
            .internal_scopes
            .iter()
            .any(|scope| scope == "@repo"));
        clear_roots();
    }

    #[test]
    fn test_user_config_defaults() {
        let user = UserConfig::default();
        assert_eq!(user.internal_scopes, vec!["@repo"]);
        assert_eq!(user.default_package_manager, "pnpm");
    }

    #[test]
    fn test_user_config_parses_partial_file() {
        let user: UserConfig =
            serde_json::from_str(r#"{"internalScopes": ["@acme", "@acme-labs"]}"#).unwrap();
        assert_eq!(user.internal_scopes, vec!["@acme", "@acme-labs"]);
        assert_eq!(user.default_package_manager, "pnpm");
    }

    #[test]
    fn test_write_default_user_config_roundtrips() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".codekit.json");
        write_default_user_config(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let parsed: UserConfig = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.internal_scopes, vec!["@repo"]);
    }
}
