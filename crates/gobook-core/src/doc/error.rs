//! Per-package extraction failures

use std::path::PathBuf;

use thiserror::Error;

/// Why one package could not be documented.
///
/// Every variant is fatal for its package only; a driver reports it and moves
/// on to the next package.
#[derive(Error, Debug)]
pub enum DocError {
    #[error("{package}: package directory not found (tried {})", join_paths(.tried))]
    Locate { package: String, tried: Vec<PathBuf> },

    #[error("{package}: {reason}")]
    Parse { package: String, reason: String },

    #[error("{package}: no non-test package found in {}", .dir.display())]
    PackageNotFound { package: String, dir: PathBuf },

    #[error("{package}: {source}")]
    Io {
        package: String,
        #[source]
        source: std::io::Error,
    },
}

impl DocError {
    /// Name of the package the error belongs to
    pub fn package(&self) -> &str {
        match self {
            DocError::Locate { package, .. }
            | DocError::Parse { package, .. }
            | DocError::PackageNotFound { package, .. }
            | DocError::Io { package, .. } => package,
        }
    }

    /// Short category label used in logs and summaries
    pub fn category(&self) -> &'static str {
        match self {
            DocError::Locate { .. } => "locate",
            DocError::Parse { .. } => "parse",
            DocError::PackageNotFound { .. } => "package-not-found",
            DocError::Io { .. } => "io",
        }
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
