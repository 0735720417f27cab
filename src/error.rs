//! # Error Handling
//!
//! This module defines the centralized error handling mechanism for the
//! `codekit` application. It uses the `thiserror` library to create a
//! comprehensive `Error` enum that covers all anticipated failure modes,
//! providing clear and descriptive error messages.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum that represents all possible errors that can
//!   occur within the application. Each variant corresponds to a specific
//!   type of error and includes contextual information to aid in debugging.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`, used
//!   throughout the application to simplify function signatures and ensure
//!   type safety.
//!
//! Expected conditions (artifact not found, destination conflict) are
//! modeled as structured values rather than panics; the library never
//! terminates the process, and the CLI layer is responsible for rendering
//! these errors to the user. Dependency cycles are warnings, not errors.

use thiserror::Error;

/// Main error type for codekit operations
#[derive(Error, Debug)]
pub enum Error {
    /// An error occurred while loading or validating configuration.
    ///
    /// Includes an optional hint about how to fix the problem.
    #[error("Configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Config {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// An artifact manifest file could not be parsed or failed validation.
    #[error("Manifest parsing error at {path}: {message}")]
    ManifestParse { path: String, message: String },

    /// No artifact with the requested slug exists in the index.
    #[error("Artifact not found: {slug}")]
    ArtifactNotFound { slug: String },

    /// A copy was requested from a source path that does not exist.
    #[error("Source does not exist: {path}")]
    SourceMissing { path: String },

    /// The destination of a copy already exists and its contents differ
    /// from the source.
    #[error(
        "Destination already exists with different contents: {destination}\n  \
         hint: Rename the local copy (and update references), or pass --overwrite to replace it"
    )]
    CopyConflict { destination: String },

    /// A copy operation failed partway through.
    #[error("Copy failed for {destination}: {message}")]
    Copy {
        destination: String,
        message: String,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON parsing error, wrapped from `serde_json::Error`.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_config() {
        let error = Error::Config {
            message: "CODEKIT_TEMPLATES_ROOT is not set".to_string(),
            hint: None,
        };
        let display = format!("{}", error);
        assert!(display.contains("Configuration error"));
        assert!(display.contains("CODEKIT_TEMPLATES_ROOT"));
    }

    #[test]
    fn test_error_display_config_with_hint() {
        let error = Error::Config {
            message: "templates root does not exist".to_string(),
            hint: Some("Run 'codekit init <root>' to set up the catalog".to_string()),
        };
        let display = format!("{}", error);
        assert!(display.contains("Configuration error"));
        assert!(display.contains("hint:"));
        assert!(display.contains("codekit init"));
    }

    #[test]
    fn test_error_display_manifest_parse() {
        let error = Error::ManifestParse {
            path: "/catalog/apps/broken/kit.json".to_string(),
            message: "missing field `slug`".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Manifest parsing error"));
        assert!(display.contains("/catalog/apps/broken/kit.json"));
        assert!(display.contains("missing field"));
    }

    #[test]
    fn test_error_display_artifact_not_found() {
        let error = Error::ArtifactNotFound {
            slug: "templates/saas-starter".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Artifact not found"));
        assert!(display.contains("templates/saas-starter"));
    }

    #[test]
    fn test_error_display_copy_conflict_includes_remediation() {
        let error = Error::CopyConflict {
            destination: "/workspace/packages/ui".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Destination already exists"));
        assert!(display.contains("/workspace/packages/ui"));
        assert!(display.contains("--overwrite"));
        assert!(display.contains("Rename the local copy"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let error: Error = io_error.into();
        let display = format!("{}", error);
        assert!(display.contains("I/O error"));
        assert!(display.contains("File not found"));
    }

    #[test]
    fn test_error_from_json_error() {
        let json_error = serde_json::from_str::<serde_json::Value>("{unclosed").unwrap_err();
        let error: Error = json_error.into();
        let display = format!("{}", error);
        assert!(display.contains("JSON parsing error"));
    }
}
