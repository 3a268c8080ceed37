//! Resolving package names to directories

use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

use super::error::DocError;
use super::filter::UnitFilter;

/// Directory names the Go tool never treats as packages of the module
const SKIPPED_DIRS: &[&str] = &["vendor", "testdata", "node_modules"];

/// Finds the directory holding a package's sources
#[derive(Debug, Clone)]
pub struct SourceLocator {
    root: PathBuf,
}

impl SourceLocator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Paths tried for `package`, in order.
    ///
    /// An explicit path (relative paths resolve against the root) comes
    /// first, then `<root>/<package>`, then the root itself.
    pub fn candidates(&self, package: &str, path_override: Option<&Path>) -> Vec<PathBuf> {
        let mut candidates = Vec::with_capacity(3);
        if let Some(path) = path_override {
            candidates.push(if path.is_absolute() {
                path.to_path_buf()
            } else {
                self.root.join(path)
            });
        }
        if !package.is_empty() {
            candidates.push(self.root.join(package));
        }
        candidates.push(self.root.clone());
        candidates
    }

    /// First existing candidate directory
    pub fn locate(&self, package: &str, path_override: Option<&Path>) -> Result<PathBuf, DocError> {
        let tried = self.candidates(package, path_override);
        for candidate in &tried {
            if candidate.is_dir() {
                debug!(package, path = %candidate.display(), "located package");
                return Ok(candidate.clone());
            }
            trace!(package, path = %candidate.display(), "candidate missing");
        }
        Err(DocError::Locate {
            package: package.to_string(),
            tried,
        })
    }

    /// Every directory below the root that holds eligible Go files.
    ///
    /// Hidden directories, `_`-prefixed directories and the ones in
    /// [`SKIPPED_DIRS`] are not descended into. A directory is left out when
    /// an exclude pattern matches its slash-separated path relative to the
    /// root or its own name. Results are sorted by path.
    pub fn discover(
        &self,
        exclude_patterns: &[String],
        filter: &UnitFilter,
    ) -> Result<Vec<DiscoveredPackage>, glob::PatternError> {
        let excludes = exclude_patterns
            .iter()
            .map(|p| Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        let mut found = Vec::new();
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !e.file_type().is_dir() || !is_skipped_dir(e));

        for entry in walker.filter_map(Result::ok) {
            if !entry.file_type().is_dir() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            let dir_name = entry.file_name().to_string_lossy();

            if excludes
                .iter()
                .any(|p| p.matches(&name) || p.matches(&dir_name))
            {
                debug!(package = %name, "excluded from discovery");
                continue;
            }
            if has_sources(entry.path(), filter) {
                found.push(DiscoveredPackage {
                    name,
                    dir: entry.path().to_path_buf(),
                });
            }
        }

        Ok(found)
    }
}

/// A package directory found by [`SourceLocator::discover`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredPackage {
    /// Path relative to the root, `/`-separated
    pub name: String,
    pub dir: PathBuf,
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || name.starts_with('_') || SKIPPED_DIRS.contains(&name.as_ref())
}

fn has_sources(dir: &Path, filter: &UnitFilter) -> bool {
    let Ok(entries) = fs::read_dir(dir) else {
        return false;
    };
    entries
        .filter_map(Result::ok)
        .any(|e| e.file_type().is_ok_and(|t| t.is_file()) && filter.accepts_path(&e.path()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "package x\n").unwrap();
    }

    #[test]
    fn prefers_package_subdirectory() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("widget")).unwrap();
        let locator = SourceLocator::new(dir.path());
        assert_eq!(locator.locate("widget", None).unwrap(), dir.path().join("widget"));
    }

    #[test]
    fn falls_back_to_root() {
        let dir = TempDir::new().unwrap();
        let locator = SourceLocator::new(dir.path());
        assert_eq!(locator.locate("widget", None).unwrap(), dir.path());
    }

    #[test]
    fn override_is_tried_first() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("pkg/widget")).unwrap();
        fs::create_dir(dir.path().join("widget")).unwrap();
        let locator = SourceLocator::new(dir.path());
        let found = locator
            .locate("widget", Some(Path::new("pkg/widget")))
            .unwrap();
        assert_eq!(found, dir.path().join("pkg/widget"));
    }

    #[test]
    fn missing_root_reports_every_candidate() {
        let dir = TempDir::new().unwrap();
        let locator = SourceLocator::new(dir.path().join("nope"));
        let err = locator.locate("missing", None).unwrap_err();
        match err {
            DocError::Locate { package, tried } => {
                assert_eq!(package, "missing");
                assert_eq!(tried.len(), 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn discovery_skips_tests_vendor_and_excludes() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "cache/cache.go");
        touch(dir.path(), "internal/queue/queue.go");
        touch(dir.path(), "onlytests/x_test.go");
        touch(dir.path(), "vendor/dep/dep.go");
        touch(dir.path(), ".git/hooks/h.go");
        touch(dir.path(), "cmd/tool/main.go");
        fs::create_dir(dir.path().join("empty")).unwrap();

        let locator = SourceLocator::new(dir.path());
        let found = locator
            .discover(&["cmd/*".to_string()], &UnitFilter::new())
            .unwrap();
        let names: Vec<_> = found.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["cache", "internal/queue"]);
    }

    #[test]
    fn invalid_exclude_pattern_is_rejected() {
        let dir = TempDir::new().unwrap();
        let locator = SourceLocator::new(dir.path());
        assert!(locator.discover(&["[".to_string()], &UnitFilter::new()).is_err());
    }
}
