//! Shared types, error model, and configuration for protonav.
//!
//! This crate is the foundation depended on by all other protonav crates.
//! It provides:
//! - [`ProtonavError`], the unified error type
//! - Navigation types ([`Category`], [`Section`], [`Link`], [`CategoryNav`])
//! - Configuration ([`AppConfig`], [`SyncConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CONFIG_FILE_NAME, DocsConfig, SectionRules, SiteConfig, SyncConfig,
    config_file_path, init_config, load_config, load_config_from,
};
pub use error::{ProtonavError, Result};
pub use types::{Category, CategoryNav, Link, Section};
