//! Documentation configuration (`docs-config.json`) parsing and validation.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("no configuration file found in {} (looked for {})", .dir.display(), .tried.join(", "))]
    NotFound { dir: PathBuf, tried: Vec<String> },

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// The complete configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub repository: RepositoryConfig,

    /// Packages to document, in addition to discovered ones.
    pub packages: Vec<PackageConfig>,

    pub docs: DocsConfig,

    pub discovery: DiscoveryConfig,

    pub output: OutputConfig,
}

/// The repository the packages belong to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    pub name: String,

    pub owner: String,

    pub description: String,

    /// Import path root; `github.com/<owner>/<name>` when empty.
    pub import_path: String,
}

/// A package listed in the configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageConfig {
    /// Package name, also its directory below the root.
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Lower values are documented first.
    #[serde(default)]
    pub priority: i32,

    /// Directory to search before the default locations, relative to the root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Where sources, generated docs and templates live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
    pub root_dir: PathBuf,

    pub docs_dir: PathBuf,

    pub templates_dir: PathBuf,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            docs_dir: PathBuf::from("docs"),
            templates_dir: PathBuf::from("templates"),
        }
    }
}

/// Automatic package discovery below the root directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub enabled: bool,

    /// Glob patterns matched against relative package paths and directory names.
    pub exclude_patterns: Vec<String>,

    /// Keep only discovered packages with a package doc comment.
    pub include_only_with_godoc: bool,
}

/// What to generate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Write `api-reference/all-packages.md`.
    pub generate_combined_api: bool,

    /// Write the `examples/<package>/` pages.
    pub generate_examples: bool,

    pub verbose: bool,

    /// Also document unexported declarations.
    pub include_unexported: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            generate_combined_api: false,
            generate_examples: true,
            verbose: false,
            include_unexported: false,
        }
    }
}

/// Serialization format of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// TOML for `.toml` files, JSON for everything else.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

impl Config {
    /// Load a configuration file.
    ///
    /// Relative directories in `docs` are resolved against the file's directory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&content, ConfigFormat::from_path(path))?;
        if let Some(base) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    /// Parse, apply defaults and validate.
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        let mut config: Self = match format {
            ConfigFormat::Json => serde_json::from_str(content)?,
            ConfigFormat::Toml => toml::from_str(content)?,
        };
        config.apply_defaults();
        config.validate()?;
        Ok(config)
    }

    /// A configuration for `github.com/<owner>/<name>` with one package.
    pub fn starter(owner: &str, name: &str) -> Self {
        let mut config = Self {
            repository: RepositoryConfig {
                name: name.to_string(),
                owner: owner.to_string(),
                description: String::new(),
                import_path: String::new(),
            },
            packages: vec![PackageConfig {
                name: name.to_string(),
                description: format!("The {name} package"),
                priority: 1,
                path: None,
            }],
            ..Self::default()
        };
        config.apply_defaults();
        config
    }

    /// Fill in values left empty.
    fn apply_defaults(&mut self) {
        let defaults = DocsConfig::default();
        if self.docs.root_dir.as_os_str().is_empty() {
            self.docs.root_dir = defaults.root_dir;
        }
        if self.docs.docs_dir.as_os_str().is_empty() {
            self.docs.docs_dir = defaults.docs_dir;
        }
        if self.docs.templates_dir.as_os_str().is_empty() {
            self.docs.templates_dir = defaults.templates_dir;
        }
        if self.repository.import_path.is_empty()
            && !self.repository.owner.is_empty()
            && !self.repository.name.is_empty()
        {
            self.repository.import_path =
                format!("github.com/{}/{}", self.repository.owner, self.repository.name);
        }
    }

    /// Make relative directories relative to `base` instead of the working directory.
    pub fn resolve_paths(&mut self, base: &Path) {
        for dir in [
            &mut self.docs.root_dir,
            &mut self.docs.docs_dir,
            &mut self.docs.templates_dir,
        ] {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.repository.import_path.is_empty() {
            if self.repository.name.is_empty() {
                return Err(ConfigError::MissingField("repository.name"));
            }
            if self.repository.owner.is_empty() {
                return Err(ConfigError::MissingField("repository.owner"));
            }
        }

        let mut seen = HashSet::new();
        for package in &self.packages {
            let name = package.name.trim();
            if name.is_empty() {
                return Err(ConfigError::Invalid("package name cannot be empty".to_string()));
            }
            if !seen.insert(name) {
                return Err(ConfigError::Invalid(format!("package '{name}' is listed twice")));
            }
        }

        for pattern in &self.discovery.exclude_patterns {
            glob::Pattern::new(pattern)
                .map_err(|e| ConfigError::Invalid(format!("exclude pattern '{pattern}': {e}")))?;
        }
        Ok(())
    }

    /// Configured packages, lowest priority first; ties keep file order.
    pub fn packages_by_priority(&self) -> Vec<&PackageConfig> {
        let mut packages: Vec<_> = self.packages.iter().collect();
        packages.sort_by_key(|p| p.priority);
        packages
    }

    /// The configuration as pretty JSON, the format of `docs-config.json`.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
