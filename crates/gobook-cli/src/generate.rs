//! The documentation run: every package, then the site around them

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gobook_config::{Config, PackageConfig};
use gobook_core::doc::{ExtractOptions, PackageDoc, Pipeline};
use gobook_core::render::{example_source, page_name, write_artifacts, write_file, RenderOptions, RepoMeta, TemplateRenderer};
use tracing::{debug, error, info, warn};

use crate::site::{self, PageEntry, TemplateData};

/// Outcome of a documentation run
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Packages documented, in processing order
    pub documented: Vec<String>,
    /// Packages that failed, with the reason
    pub failed: Vec<(String, String)>,
    /// Files written
    pub written: usize,
    /// Existing files left untouched
    pub preserved: usize,
}

impl RunSummary {
    pub fn print(&self, repo_name: &str) {
        println!(
            "Documented {} package(s) for {repo_name}: {} file(s) written, {} preserved",
            self.documented.len(),
            self.written,
            self.preserved
        );
        if !self.failed.is_empty() {
            println!("Failed:");
            for (package, reason) in &self.failed {
                println!("  {package}: {reason}");
            }
        }
    }
}

/// A package to document and where to look for it first
struct Target {
    name: String,
    dir: Option<PathBuf>,
    discovered: bool,
}

/// Generate the documentation tree described by `config`.
///
/// `config_path` is the file the configuration was read from; the GitBook
/// configuration is written next to it. A package that cannot be extracted
/// or rendered is logged and recorded in the summary, and the run moves on.
pub fn run(config: &Config, config_path: &Path) -> Result<RunSummary> {
    let docs_dir = &config.docs.docs_dir;
    let root = &config.docs.root_dir;
    let templates_dir = &config.docs.templates_dir;
    info!(root = %root.display(), docs = %docs_dir.display(), "generating documentation");

    site::create_structure(docs_dir)?;

    let mut summary = RunSummary::default();
    let data = TemplateData::new(config).to_value()?;
    match site::process_shared_templates(templates_dir, docs_dir, &data) {
        Ok(count) => debug!(count, "processed shared templates"),
        Err(e) => warn!(error = %format!("{e:#}"), "failed to process shared templates"),
    }
    let indexes = site::generate_indexes(templates_dir, docs_dir, &data);
    summary.written += indexes.written;
    summary.preserved += indexes.preserved;
    if let Err(e) = site::copy_readme(root, docs_dir) {
        warn!(error = %format!("{e:#}"), "failed to copy README");
    }

    let pipeline = Pipeline::new(root, config.repository.import_path.as_str()).with_options(ExtractOptions {
        include_unexported: config.output.include_unexported,
    });
    let repo = RepoMeta::new(&*config.repository.owner, &*config.repository.name)
        .with_import_root(config.repository.import_path.as_str());
    let renderer = TemplateRenderer::new(
        repo,
        RenderOptions {
            examples: config.output.generate_examples,
        },
    );

    let mut docs: Vec<(String, PackageDoc)> = Vec::new();
    for target in targets(config, &pipeline)? {
        match document(&pipeline, &renderer, root, docs_dir, &target, config) {
            Ok(Some((doc, written, preserved))) => {
                summary.written += written;
                summary.preserved += preserved;
                summary.documented.push(target.name.clone());
                docs.push((target.name, doc));
            }
            Ok(None) => debug!(package = %target.name, "no package documentation, skipped"),
            Err(e) => {
                let reason = format!("{e:#}");
                error!(package = %target.name, error = %reason, "failed to document package");
                summary.failed.push((target.name, reason));
            }
        }
    }

    if config.output.generate_combined_api && !docs.is_empty() {
        let all: Vec<&PackageDoc> = docs.iter().map(|(_, doc)| doc).collect();
        let artifact = renderer.render_combined(&all)?;
        let written = write_artifacts(docs_dir, &[artifact])?;
        summary.written += written.written;
        info!(packages = all.len(), "generated combined API reference");
    }

    let pages: Vec<PageEntry> = docs
        .iter()
        .map(|(name, _)| PageEntry {
            page: page_name(name),
            title: name.clone(),
        })
        .collect();
    let toc = site::summary_page(
        &config.repository.name,
        &pages,
        config.output.generate_examples,
        config.output.generate_combined_api && !docs.is_empty(),
    )
    .context("Failed to build SUMMARY.md")?;
    write_file(&docs_dir.join("SUMMARY.md"), &toc)?;
    summary.written += 1;

    let repo_dir = match config_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    site::write_gitbook_config(repo_dir, docs_dir)?;
    summary.written += 1;

    info!(
        documented = summary.documented.len(),
        failed = summary.failed.len(),
        "documentation run finished"
    );
    Ok(summary)
}

/// Configured packages by priority, then discovered ones not already listed
fn targets(config: &Config, pipeline: &Pipeline) -> Result<Vec<Target>> {
    let mut targets: Vec<Target> = config
        .packages_by_priority()
        .into_iter()
        .map(|p: &PackageConfig| Target {
            name: p.name.trim().to_string(),
            dir: p.path.as_ref().map(|path| config.docs.root_dir.join(path)),
            discovered: false,
        })
        .collect();

    if config.discovery.enabled {
        let found = pipeline
            .locator()
            .discover(&config.discovery.exclude_patterns, pipeline.filter())
            .context("Invalid discovery exclude pattern")?;
        let before = targets.len();
        for package in found {
            if targets.iter().any(|t| t.name == package.name) {
                continue;
            }
            targets.push(Target {
                name: package.name,
                dir: Some(package.dir),
                discovered: true,
            });
        }
        info!(count = targets.len() - before, "discovered packages");
    }
    Ok(targets)
}

/// Extract, render and write one package.
///
/// `None` when a discovered package has no package doc comment and only
/// documented packages are wanted.
fn document(
    pipeline: &Pipeline,
    renderer: &TemplateRenderer,
    root: &Path,
    docs_dir: &Path,
    target: &Target,
    config: &Config,
) -> Result<Option<(PackageDoc, usize, usize)>> {
    let doc = if target.discovered {
        let dir = target.dir.as_deref().unwrap_or(root);
        pipeline.extract_dir(&target.name, dir)?
    } else {
        pipeline.extract(&target.name, target.dir.as_deref())?
    };
    if target.discovered && config.discovery.include_only_with_godoc && doc.doc.is_empty() {
        return Ok(None);
    }

    let source = example_source(root, &target.name);
    let artifacts = renderer.render(&target.name, &doc, source.as_deref())?;
    let written = write_artifacts(docs_dir, &artifacts)?;
    info!(
        package = %target.name,
        written = written.written,
        preserved = written.preserved,
        "documented package"
    );
    Ok(Some((doc, written.written, written.preserved)))
}

/// Extract the package in `dir` and return its model as pretty JSON
pub fn extract_json(dir: &Path, name: Option<String>, import_root: &str, include_unexported: bool) -> Result<String> {
    let name = match name {
        Some(name) => name,
        None => fs::canonicalize(dir)
            .ok()
            .as_deref()
            .unwrap_or(dir)
            .file_name()
            .and_then(|n| n.to_str())
            .map(ToString::to_string)
            .context("Cannot infer package name from directory")?,
    };
    let pipeline = Pipeline::new(dir, import_root).with_options(ExtractOptions { include_unexported });
    let doc = pipeline
        .extract_dir(&name, dir)
        .with_context(|| format!("Failed to extract {}", dir.display()))?;
    serde_json::to_string_pretty(&doc).context("Failed to serialize package documentation")
}
