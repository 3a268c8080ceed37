//! Locating the configuration file of a repository.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::{Config, ConfigError};

/// Configuration file names, in the order they are tried.
pub const CONFIG_FILES: &[&str] = &[
    "docs-config.json",
    ".docs-config.json",
    ".config/docs.json",
    "gobook.json",
    "gobook.toml",
];

/// Name written by `gobook init`.
pub const DEFAULT_CONFIG_FILE: &str = CONFIG_FILES[0];

/// The first configuration file that exists in `dir`.
pub fn find_config(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILES.iter().map(|name| dir.join(name)).find(|path| {
        let found = path.is_file();
        debug!(path = %path.display(), found, "probing configuration file");
        found
    })
}

/// Load the configuration at `explicit`, or the first one found in `dir`.
///
/// Returns the configuration with the path it was read from.
pub fn load(dir: &Path, explicit: Option<&Path>) -> Result<(Config, PathBuf), ConfigError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => find_config(dir).ok_or_else(|| ConfigError::NotFound {
            dir: dir.to_path_buf(),
            tried: CONFIG_FILES.iter().map(|s| (*s).to_string()).collect(),
        })?,
    };
    let config = Config::from_path(&path)?;
    info!(path = %path.display(), packages = config.packages.len(), "loaded configuration");
    Ok((config, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const CONFIG: &str = r#"{ "repository": { "name": "kit", "owner": "acme" } }"#;

    #[test]
    fn tries_in_order() {
        let dir = TempDir::new().unwrap();
        assert_eq!(find_config(dir.path()), None);

        fs::write(dir.path().join("gobook.toml"), "[repository]\nname = \"kit\"\nowner = \"acme\"\n").unwrap();
        assert_eq!(find_config(dir.path()), Some(dir.path().join("gobook.toml")));

        fs::create_dir_all(dir.path().join(".config")).unwrap();
        fs::write(dir.path().join(".config/docs.json"), CONFIG).unwrap();
        assert_eq!(find_config(dir.path()), Some(dir.path().join(".config/docs.json")));

        fs::write(dir.path().join("docs-config.json"), CONFIG).unwrap();
        assert_eq!(find_config(dir.path()), Some(dir.path().join("docs-config.json")));
    }

    #[test]
    fn load_resolves_against_config_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("docs-config.json"), CONFIG).unwrap();
        let (config, path) = load(dir.path(), None).unwrap();
        assert_eq!(path, dir.path().join("docs-config.json"));
        assert_eq!(config.docs.docs_dir, dir.path().join("docs"));
    }

    #[test]
    fn explicit_path_skips_discovery() {
        let dir = TempDir::new().unwrap();
        let custom = dir.path().join("custom.toml");
        fs::write(&custom, "[repository]\nimport_path = \"go.acme.dev/kit\"\n").unwrap();
        let (config, _) = load(dir.path(), Some(&custom)).unwrap();
        assert_eq!(config.repository.import_path, "go.acme.dev/kit");
    }

    #[test]
    fn missing_config() {
        let dir = TempDir::new().unwrap();
        let err = load(dir.path(), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
        assert!(err.to_string().contains("docs-config.json"));
    }
}
