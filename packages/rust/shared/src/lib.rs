//! Shared types, error model, and configuration for biocatalog.
//!
//! This crate is the foundation depended on by all other biocatalog crates.
//! It provides:
//! - [`CatalogError`]: the unified error type
//! - Domain types ([`CatalogEntry`], [`CategoryId`], [`SourceRow`], [`SourceKind`])
//! - Configuration ([`AppConfig`], [`ColumnMap`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ColumnMap, DefaultsConfig, SourceEntry, config_dir, config_file_path, init_config,
    load_config, load_config_from,
};
pub use error::{CatalogError, Result};
pub use types::{Access, CatalogEntry, CategoryId, ResourceType, SourceKind, SourceRow};
