//! Documentation extraction for Go packages
//!
//! The pipeline for one package runs in three steps:
//! 1. [`SourceLocator`] resolves the package name to a directory
//! 2. [`parse_dir`] parses the eligible files ([`UnitFilter`]) into one
//!    [`ParsedPackage`] sharing a single [`SourceMap`](crate::source::SourceMap)
//! 3. [`DocExtractor`] walks the declarations once and builds a [`PackageDoc`]
//!
//! Each step fails with a [`DocError`] that concerns that package only.

mod classify;
mod error;
mod extractor;
mod fields;
mod filter;
mod locate;
mod model;
mod package;
mod signature;

pub use classify::TypeKind;
pub use error::DocError;
pub use extractor::{DocExtractor, ExtractOptions};
pub use fields::FieldExtractor;
pub use filter::{UnitFilter, SOURCE_SUFFIX, TEST_SUFFIX};
pub use locate::{DiscoveredPackage, SourceLocator};
pub use model::{FieldDoc, FormatWarning, FunctionDoc, PackageDoc, TypeDoc, ValueDoc};
pub use package::{parse_dir, FileFailure, ParsedPackage};
pub use signature::{SignaturePrinter, ELISION};

use std::path::{Path, PathBuf};

use tracing::{debug, info};

/// Locate, parse and extract packages below one root directory
#[derive(Debug, Clone)]
pub struct Pipeline {
    locator: SourceLocator,
    filter: UnitFilter,
    import_root: String,
    options: ExtractOptions,
}

impl Pipeline {
    pub fn new(root: impl Into<PathBuf>, import_root: impl Into<String>) -> Self {
        Self {
            locator: SourceLocator::new(root),
            filter: UnitFilter::new(),
            import_root: import_root.into(),
            options: ExtractOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    pub fn locator(&self) -> &SourceLocator {
        &self.locator
    }

    pub fn filter(&self) -> &UnitFilter {
        &self.filter
    }

    /// Document the package called `package`.
    ///
    /// `path_override` is tried before the default locations.
    pub fn extract(&self, package: &str, path_override: Option<&Path>) -> Result<PackageDoc, DocError> {
        let dir = self.locator.locate(package, path_override)?;
        self.extract_dir(package, &dir)
    }

    /// Document the package in `dir`, reporting it under the name `package`
    pub fn extract_dir(&self, package: &str, dir: &Path) -> Result<PackageDoc, DocError> {
        let parsed = parse_dir(package, dir, &self.filter)?;
        debug!(
            package,
            declared = %parsed.name,
            files = parsed.files.len(),
            skipped = parsed.skipped.len(),
            "parsed package"
        );

        let doc = DocExtractor::extract(&parsed, import_path(&self.import_root, package), &self.options);
        info!(
            package,
            functions = doc.functions.len(),
            types = doc.types.len(),
            constants = doc.constants.len(),
            variables = doc.variables.len(),
            "extracted package"
        );
        Ok(doc)
    }
}

/// `<import root>/<package>`, ignoring a trailing slash on the root
pub fn import_path(import_root: &str, package: &str) -> String {
    let root = import_root.trim_end_matches('/');
    if root.is_empty() {
        package.to_string()
    } else {
        format!("{root}/{package}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_path_concatenates() {
        assert_eq!(import_path("github.com/acme/kit", "widget"), "github.com/acme/kit/widget");
        assert_eq!(import_path("github.com/acme/kit/", "widget"), "github.com/acme/kit/widget");
        assert_eq!(import_path("", "widget"), "widget");
    }
}
