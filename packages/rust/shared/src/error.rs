//! Error types for biocatalog.
//!
//! Library crates use [`CatalogError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all biocatalog operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Category or translation rule table is malformed.
    #[error("rules error: {message}")]
    Rules { message: String },

    /// A tabular source could not be opened or read.
    #[error("source error at {path:?}: {message}")]
    Source { path: PathBuf, message: String },

    /// The durable catalog could not be read or parsed. Raised before any mutation.
    #[error("failed to load catalog {path:?}: {message}")]
    CatalogLoad { path: PathBuf, message: String },

    /// The final catalog write failed. The previous durable catalog is untouched.
    #[error("failed to save catalog {path:?}: {message}")]
    CatalogSave { path: PathBuf, message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (bad row window, invalid argument, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, CatalogError>;

impl CatalogError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a rules error from any displayable message.
    pub fn rules(msg: impl Into<String>) -> Self {
        Self::Rules {
            message: msg.into(),
        }
    }

    /// Create a source error for the given path.
    pub fn row_source(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Source {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Create a catalog load error for the given path.
    pub fn catalog_load(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::CatalogLoad {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Create a catalog save error for the given path.
    pub fn catalog_save(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::CatalogSave {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = CatalogError::config("missing catalog path");
        assert_eq!(err.to_string(), "config error: missing catalog path");

        let err = CatalogError::rules("duplicate phrase 'gene'");
        assert!(err.to_string().contains("duplicate phrase"));
    }

    #[test]
    fn catalog_errors_carry_path() {
        let err = CatalogError::catalog_load("/data/catalog.json", "expected value at line 1");
        let text = err.to_string();
        assert!(text.contains("/data/catalog.json"));
        assert!(text.contains("expected value"));

        let err = CatalogError::catalog_save("out.json", "disk full");
        assert!(err.to_string().starts_with("failed to save catalog"));
    }
}
