//! Configuration for gobook.
//!
//! This crate provides:
//! - The configuration model (`docs-config.json`, or TOML)
//! - Discovery of the configuration file in a repository
//! - Defaults and validation

mod config;
mod discover;

pub use config::{
    Config, ConfigError, ConfigFormat, DiscoveryConfig, DocsConfig, OutputConfig, PackageConfig,
    RepositoryConfig,
};
pub use discover::{find_config, load, CONFIG_FILES, DEFAULT_CONFIG_FILE};
