//! Parsing every eligible file of a directory into one logical package

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::error::DocError;
use super::filter::UnitFilter;
use crate::ast::File;
use crate::parser::Parser;
use crate::source::SourceMap;

/// Package clause suffix of external test packages
const TEST_PACKAGE_SUFFIX: &str = "_test";

/// The merged syntax of one package, with the map its spans point into
#[derive(Debug)]
pub struct ParsedPackage {
    /// Name from the package clause
    pub name: String,
    pub dir: PathBuf,
    /// Files declaring `name`, sorted by file name
    pub files: Vec<File>,
    pub map: SourceMap,
    /// Eligible files that were left out because they failed to parse
    pub skipped: Vec<FileFailure>,
}

impl ParsedPackage {
    /// Package doc comments of all files joined in file order
    pub fn doc(&self) -> String {
        self.files
            .iter()
            .filter_map(|f| f.doc.as_ref())
            .map(|d| d.text())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A file that could not be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub path: PathBuf,
    /// `file:line:col: message` for the first syntax error
    pub message: String,
}

/// Parse every file of `dir` accepted by `filter`.
///
/// Files are read in name order. Files that fail to parse are logged and
/// skipped; the call only fails when nothing eligible exists, when every file
/// fails, or when no file declares a non-test package. If several non-test
/// package names appear, the first one encountered wins.
pub fn parse_dir(package: &str, dir: &Path, filter: &UnitFilter) -> Result<ParsedPackage, DocError> {
    let io_err = |source| DocError::Io {
        package: package.to_string(),
        source,
    };

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let path = entry.path();
        if path.is_file() && filter.accepts_path(&path) {
            paths.push(path);
        }
    }
    paths.sort();

    if paths.is_empty() {
        return Err(DocError::Parse {
            package: package.to_string(),
            reason: format!("no eligible Go source files in {}", dir.display()),
        });
    }

    let mut map = SourceMap::new();
    let mut parsed = Vec::new();
    let mut skipped = Vec::new();

    for path in paths {
        let source = match fs::read_to_string(&path) {
            Ok(source) => source,
            Err(e) => {
                warn!(package, path = %path.display(), error = %e, "cannot read source file");
                skipped.push(FileFailure {
                    message: format!("{}: {e}", path.display()),
                    path,
                });
                continue;
            }
        };

        let id = map.add_file(&path, source);
        let Some(file) = map.get(id) else {
            continue;
        };
        match Parser::parse_file(file.source(), id) {
            Ok(ast) => {
                debug!(package, path = %path.display(), decls = ast.decls.len(), "parsed file");
                parsed.push(ast);
            }
            Err(errors) => {
                let message = errors.first().map_or_else(
                    || format!("{}: unknown syntax error", file.name()),
                    |e| format!("{}:{}: {}", file.name(), file.location(e.span.start), e.kind),
                );
                warn!(
                    package,
                    path = %path.display(),
                    errors = errors.len(),
                    first = %message,
                    "skipping file with syntax errors"
                );
                skipped.push(FileFailure { path, message });
            }
        }
    }

    if parsed.is_empty() {
        let reasons: Vec<&str> = skipped.iter().map(|f| f.message.as_str()).collect();
        return Err(DocError::Parse {
            package: package.to_string(),
            reason: format!("every source file failed to parse: {}", reasons.join("; ")),
        });
    }

    let Some(name) = parsed
        .iter()
        .map(|f| f.package.name.clone())
        .find(|n| !n.ends_with(TEST_PACKAGE_SUFFIX))
    else {
        return Err(DocError::PackageNotFound {
            package: package.to_string(),
            dir: dir.to_path_buf(),
        });
    };

    let (files, others): (Vec<File>, Vec<File>) =
        parsed.into_iter().partition(|f| f.package.name == name);
    for other in &others {
        debug!(
            package,
            ignored = %other.package.name,
            "ignoring file from another package"
        );
    }

    Ok(ParsedPackage {
        name,
        dir: dir.to_path_buf(),
        files,
        map,
        skipped,
    })
}
