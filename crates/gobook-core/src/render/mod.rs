//! Markdown rendering of package models
//!
//! [`TemplateRenderer`] turns one [`PackageDoc`] into a fixed set of
//! [`Artifact`]s, paths relative to the docs directory:
//!
//! | Artifact | Policy |
//! |----------|--------|
//! | `packages/<page>.md` | overwrite |
//! | `api-reference/<page>.md` | overwrite |
//! | `getting-started/<page>.md` | overwrite |
//! | `examples/<page>/{README,basic,advanced}.md` | overwrite, only with examples enabled |
//! | `guides/<page>/{README,best-practices,patterns}.md` | preserve |
//!
//! Rendering never touches the filesystem; [`write_artifacts`] does, and is
//! where the preserve policy is applied. The model is only read.

mod markdown;
mod stubs;
pub mod template;

pub use markdown::{anchor, oneline, truncate, MarkdownGenerator};
pub use template::{render_str, TemplateError};

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, trace};

use crate::doc::PackageDoc;

/// Errors raised while producing or writing documentation pages
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("template {name}: {source}")]
    Template {
        name: String,
        #[source]
        source: TemplateError,
    },

    #[error("failed to format markdown")]
    Fmt(#[from] fmt::Error),
}

/// What to do when an artifact's file already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePolicy {
    Overwrite,
    /// Keep the existing file, it may carry hand-written content
    Preserve,
}

/// One generated file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Relative to the docs directory
    pub path: PathBuf,
    pub content: String,
    pub policy: WritePolicy,
}

impl Artifact {
    pub fn new(path: impl Into<PathBuf>, content: String) -> Self {
        Self {
            path: path.into(),
            content,
            policy: WritePolicy::Overwrite,
        }
    }

    pub fn preserved(path: impl Into<PathBuf>, content: String) -> Self {
        Self {
            policy: WritePolicy::Preserve,
            ..Self::new(path, content)
        }
    }
}

/// Repository the documented packages belong to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoMeta {
    pub owner: String,
    pub name: String,
    pub import_root: String,
}

impl RepoMeta {
    /// A GitHub-hosted repository, import root `github.com/<owner>/<name>`
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        let owner = owner.into();
        let name = name.into();
        Self {
            import_root: format!("github.com/{owner}/{name}"),
            owner,
            name,
        }
    }

    #[must_use]
    pub fn with_import_root(mut self, import_root: impl Into<String>) -> Self {
        self.import_root = import_root.into();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Produce the `examples/<page>/` pages
    pub examples: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { examples: true }
    }
}

/// Renders package models into markdown artifacts
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    repo: RepoMeta,
    options: RenderOptions,
}

impl TemplateRenderer {
    pub fn new(repo: RepoMeta, options: RenderOptions) -> Self {
        Self { repo, options }
    }

    pub fn repo(&self) -> &RepoMeta {
        &self.repo
    }

    /// All artifacts of the package requested as `package`.
    ///
    /// `example_source` is embedded in the examples README; a placeholder
    /// program is used without it.
    pub fn render(
        &self,
        package: &str,
        doc: &PackageDoc,
        example_source: Option<&str>,
    ) -> Result<Vec<Artifact>, RenderError> {
        let page = page_name(package);
        let examples = self.options.examples;

        let mut artifacts = vec![
            Artifact::new(
                format!("packages/{page}.md"),
                MarkdownGenerator::overview(&page, doc, examples)?,
            ),
            Artifact::new(
                format!("api-reference/{page}.md"),
                MarkdownGenerator::api_reference(doc)?,
            ),
            Artifact::new(
                format!("getting-started/{page}.md"),
                MarkdownGenerator::getting_started(&page, doc, examples)?,
            ),
        ];

        if examples {
            let placeholder;
            let source = match example_source {
                Some(source) => source,
                None => {
                    placeholder = stubs::placeholder_program(doc);
                    &placeholder
                }
            };
            artifacts.extend([
                Artifact::new(
                    format!("examples/{page}/README.md"),
                    stubs::examples_readme(&page, doc, &self.repo, source)?,
                ),
                Artifact::new(format!("examples/{page}/basic.md"), stubs::basic_examples(&page, doc)?),
                Artifact::new(format!("examples/{page}/advanced.md"), stubs::advanced_examples(doc)?),
            ]);
        }

        artifacts.extend([
            Artifact::preserved(format!("guides/{page}/README.md"), stubs::guides_index(&page, doc)?),
            Artifact::preserved(
                format!("guides/{page}/best-practices.md"),
                stubs::best_practices(doc)?,
            ),
            Artifact::preserved(format!("guides/{page}/patterns.md"), stubs::patterns(doc)?),
        ]);

        trace!(package, count = artifacts.len(), "rendered artifacts");
        Ok(artifacts)
    }

    /// `api-reference/all-packages.md` covering every given package
    pub fn render_combined(&self, docs: &[&PackageDoc]) -> Result<Artifact, RenderError> {
        let title = format!("{} API Reference", self.repo.name);
        Ok(Artifact::new(
            "api-reference/all-packages.md",
            MarkdownGenerator::combined(&title, docs)?,
        ))
    }
}

/// File stem for a package's pages; nested packages use `-` for `/`
pub fn page_name(package: &str) -> String {
    package.trim_matches('/').replace('/', "-")
}

/// Program embedded in a package's examples README:
/// `examples/<package>/main.go`, then `example_test.go` below `root`
pub fn example_source(root: &Path, package: &str) -> Option<String> {
    let candidates = [
        root.join("examples").join(package).join("main.go"),
        root.join("example_test.go"),
    ];
    candidates.iter().find_map(|path| {
        let source = fs::read_to_string(path).ok()?;
        debug!(package, path = %path.display(), "using example source");
        Some(source)
    })
}

/// Expand a template, naming it in the error
pub fn render_template(name: &str, text: &str, data: &serde_json::Value) -> Result<String, RenderError> {
    render_str(text, data).map_err(|source| RenderError::Template {
        name: name.to_string(),
        source,
    })
}

/// Counts reported by [`write_artifacts`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub written: usize,
    pub preserved: usize,
}

/// Write artifacts below `docs_dir`, creating directories as needed.
///
/// A [`WritePolicy::Preserve`] artifact whose file exists is skipped.
pub fn write_artifacts(docs_dir: &Path, artifacts: &[Artifact]) -> Result<WriteSummary, RenderError> {
    let mut summary = WriteSummary::default();
    for artifact in artifacts {
        let path = docs_dir.join(&artifact.path);
        if artifact.policy == WritePolicy::Preserve && path.exists() {
            debug!(path = %path.display(), "keeping existing file");
            summary.preserved += 1;
            continue;
        }
        write_file(&path, &artifact.content)?;
        trace!(path = %path.display(), "wrote artifact");
        summary.written += 1;
    }
    Ok(summary)
}

/// Write `content` to `path`, creating parent directories
pub fn write_file(path: &Path, content: &str) -> Result<(), RenderError> {
    let io_error = |source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    fs::write(path, content).map_err(io_error)
}
