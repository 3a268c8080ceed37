//! Which files of a package directory take part in extraction

use std::path::Path;

/// Suffix of Go source files
pub const SOURCE_SUFFIX: &str = ".go";

/// Suffix of Go test files, which never contribute declarations
pub const TEST_SUFFIX: &str = "_test.go";

/// Accepts Go source files and rejects test files
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitFilter;

impl UnitFilter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Whether a file name is an eligible compilation unit
    #[must_use]
    pub fn accepts(&self, name: &str) -> bool {
        !name.ends_with(TEST_SUFFIX) && name.ends_with(SOURCE_SUFFIX)
    }

    /// Like [`accepts`](Self::accepts) for the last component of a path
    #[must_use]
    pub fn accepts_path(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| self.accepts(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_go_sources_only() {
        let filter = UnitFilter::new();
        assert!(filter.accepts("widget.go"));
        assert!(filter.accepts("doc.go"));
        assert!(!filter.accepts("widget_test.go"));
        assert!(!filter.accepts("README.md"));
        assert!(!filter.accepts("widget.go.orig"));
        assert!(!filter.accepts("go"));
    }

    #[test]
    fn path_variant_uses_file_name() {
        let filter = UnitFilter::new();
        assert!(filter.accepts_path(Path::new("pkg/widget/widget.go")));
        assert!(!filter.accepts_path(Path::new("pkg/widget/widget_test.go")));
    }
}
