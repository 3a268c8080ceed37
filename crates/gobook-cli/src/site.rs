//! Site-level files around the per-package pages

use std::fmt::{self, Write as _};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gobook_config::Config;
use gobook_core::render::{render_template, write_artifacts, Artifact, WriteSummary};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Top-level sections of the docs directory
pub const SECTIONS: [&str; 5] = ["getting-started", "packages", "api-reference", "examples", "guides"];

/// Section index templates and the file each one renders to
const INDEX_TEMPLATES: &[(&str, &str)] = &[
    ("getting-started.md", "getting-started/README.md"),
    ("packages-index.md", "packages/README.md"),
    ("api-reference-index.md", "api-reference/README.md"),
    ("examples-index.md", "examples/README.md"),
    ("guides-index.md", "guides/README.md"),
    ("docs-index.md", "README.md"),
];

/// Guides rendered from templates only when missing
const PRESERVED_TEMPLATES: &[(&str, &str)] = &[
    ("contributing.md", "guides/contributing.md"),
    ("faq.md", "guides/faq.md"),
];

const README_NAMES: &[&str] = &["README.md", "readme.md", "Readme.md", "README.MD"];

pub const GITBOOK_CONFIG: &str = ".gitbook.yaml";

/// Data handed to repository templates, with Go-style field names
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemplateData<'a> {
    pub repository: RepositoryData<'a>,
    pub packages: Vec<PackageData<'a>>,
    pub import_path: &'a str,
    pub owner: &'a str,
    pub name: &'a str,
    /// The whole configuration, keys as in the configuration file
    pub config: &'a Config,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RepositoryData<'a> {
    pub name: &'a str,
    pub owner: &'a str,
    pub description: &'a str,
    pub import_path: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PackageData<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub priority: i32,
}

impl<'a> TemplateData<'a> {
    pub fn new(config: &'a Config) -> Self {
        let repo = &config.repository;
        Self {
            repository: RepositoryData {
                name: &repo.name,
                owner: &repo.owner,
                description: &repo.description,
                import_path: &repo.import_path,
            },
            packages: config
                .packages_by_priority()
                .into_iter()
                .map(|p| PackageData {
                    name: &p.name,
                    description: &p.description,
                    priority: p.priority,
                })
                .collect(),
            import_path: &repo.import_path,
            owner: &repo.owner,
            name: &repo.name,
            config,
        }
    }

    pub fn to_value(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).context("Failed to serialize template data")
    }
}

/// Create the docs directory and its sections
pub fn create_structure(docs_dir: &Path) -> Result<()> {
    for section in SECTIONS {
        let dir = docs_dir.join(section);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }
    debug!(docs = %docs_dir.display(), "created documentation structure");
    Ok(())
}

/// Render every `*.md` in the templates directory into the docs root.
///
/// A template that fails is reported and skipped.
pub fn process_shared_templates(templates_dir: &Path, docs_dir: &Path, data: &serde_json::Value) -> Result<usize> {
    if !templates_dir.is_dir() {
        debug!(templates = %templates_dir.display(), "no templates directory");
        return Ok(0);
    }
    let pattern = templates_dir.join("*.md");
    let pattern = pattern.to_string_lossy();
    let mut rendered = 0;
    for entry in glob::glob(&pattern).context("Invalid templates directory")? {
        let Ok(path) = entry else {
            continue;
        };
        let Some(file_name) = path.file_name() else {
            continue;
        };
        let name = file_name.to_string_lossy();
        let result = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))
            .and_then(|text| Ok(render_template(&name, &text, data)?))
            .and_then(|content| {
                write_artifacts(docs_dir, &[Artifact::new(file_name, content)])?;
                Ok(())
            });
        match result {
            Ok(()) => {
                debug!(template = %path.display(), "processed shared template");
                rendered += 1;
            }
            Err(e) => warn!(template = %path.display(), error = %format!("{e:#}"), "skipping template"),
        }
    }
    Ok(rendered)
}

/// Section indexes and the preservable guides, each from its template when present
pub fn generate_indexes(templates_dir: &Path, docs_dir: &Path, data: &serde_json::Value) -> WriteSummary {
    let mut summary = WriteSummary::default();
    let templates = INDEX_TEMPLATES
        .iter()
        .map(|&(t, o)| (t, o, false))
        .chain(PRESERVED_TEMPLATES.iter().map(|&(t, o)| (t, o, true)));

    for (template, output, preserve) in templates {
        let path = templates_dir.join(template);
        if !path.is_file() {
            debug!(template, "template not found, skipping {output}");
            continue;
        }
        let result = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))
            .and_then(|text| Ok(render_template(template, &text, data)?))
            .and_then(|content| {
                let artifact = if preserve {
                    Artifact::preserved(output, content)
                } else {
                    Artifact::new(output, content)
                };
                Ok(write_artifacts(docs_dir, &[artifact])?)
            });
        match result {
            Ok(written) => {
                summary.written += written.written;
                summary.preserved += written.preserved;
            }
            Err(e) => warn!(template, error = %format!("{e:#}"), "failed to generate {output}"),
        }
    }
    summary
}

/// Copy the repository README to `docs/README.md`; returns the copied file
pub fn copy_readme(root: &Path, docs_dir: &Path) -> Result<Option<PathBuf>> {
    let Some(source) = README_NAMES.iter().map(|n| root.join(n)).find(|p| p.is_file()) else {
        debug!(root = %root.display(), "no repository README");
        return Ok(None);
    };
    let target = docs_dir.join("README.md");
    fs::copy(&source, &target)
        .with_context(|| format!("Failed to copy {} to {}", source.display(), target.display()))?;
    info!(from = %source.display(), "copied repository README");
    Ok(Some(source))
}

/// A documented package as listed in the table of contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEntry {
    pub page: String,
    pub title: String,
}

/// `SUMMARY.md`, the GitBook table of contents
pub fn summary_page(title: &str, pages: &[PageEntry], examples: bool, combined: bool) -> Result<String, fmt::Error> {
    // (heading, section index, page link prefix, page link suffix)
    let mut sections = vec![
        ("Getting Started", "getting-started/README.md", "getting-started/", ".md"),
        ("Packages", "packages/README.md", "packages/", ".md"),
        ("API Reference", "api-reference/README.md", "api-reference/", ".md"),
    ];
    if examples {
        sections.push(("Examples", "examples/README.md", "examples/", "/README.md"));
    }
    sections.push(("Guides", "guides/README.md", "guides/", "/README.md"));

    let mut out = String::new();
    writeln!(out, "# {title}")?;
    writeln!(out)?;
    writeln!(out, "* [Introduction](README.md)")?;
    for (heading, index, prefix, suffix) in sections {
        writeln!(out, "* [{heading}]({index})")?;
        for page in pages {
            writeln!(out, "  * [{}]({prefix}{}{suffix})", page.title, page.page)?;
        }
    }
    if combined {
        writeln!(out, "* [All Packages](api-reference/all-packages.md)")?;
    }
    Ok(out)
}

/// Point GitBook at the docs directory
pub fn write_gitbook_config(repo_dir: &Path, docs_dir: &Path) -> Result<PathBuf> {
    let root = docs_dir.strip_prefix(repo_dir).unwrap_or(docs_dir);
    let root = root.to_string_lossy().replace('\\', "/");
    let content = format!(
        "root: ./{}/\n\nstructure:\n  readme: README.md\n  summary: SUMMARY.md\n",
        root.trim_start_matches("./").trim_end_matches('/')
    );
    let path = repo_dir.join(GITBOOK_CONFIG);
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gobook_config::ConfigFormat;
    use tempfile::TempDir;

    fn config() -> Config {
        Config::parse(
            r#"{ "repository": { "name": "kit", "owner": "acme", "description": "Tools" },
                 "packages": [ { "name": "widget", "priority": 2 }, { "name": "codec", "priority": 1 } ] }"#,
            ConfigFormat::Json,
        )
        .unwrap()
    }

    #[test]
    fn template_data_uses_go_field_names() {
        let config = config();
        let value = TemplateData::new(&config).to_value().unwrap();
        assert_eq!(value["Repository"]["ImportPath"], "github.com/acme/kit");
        assert_eq!(value["Owner"], "acme");
        assert_eq!(value["Packages"][0]["Name"], "codec");
        assert_eq!(value["Config"]["docs"]["docs_dir"], "docs");
    }

    #[test]
    fn shared_templates_render_into_docs_root() {
        let dir = TempDir::new().unwrap();
        let templates = dir.path().join("templates");
        let docs = dir.path().join("docs");
        fs::create_dir_all(&templates).unwrap();
        fs::write(templates.join("intro.md"), "# {{ .Name }}\n{{ range .Packages }}- {{ .Name }}\n{{ end }}").unwrap();
        fs::write(templates.join("broken.md"), "{{ range .Packages }}never closed").unwrap();
        fs::write(templates.join("notes.txt"), "ignored").unwrap();

        let config = config();
        let data = TemplateData::new(&config).to_value().unwrap();
        let rendered = process_shared_templates(&templates, &docs, &data).unwrap();
        assert_eq!(rendered, 1);
        assert_eq!(
            fs::read_to_string(docs.join("intro.md")).unwrap(),
            "# kit\n- codec\n- widget\n"
        );
        assert!(!docs.join("broken.md").exists());
        assert!(!docs.join("notes.txt").exists());
    }

    #[test]
    fn indexes_preserve_guides() {
        let dir = TempDir::new().unwrap();
        let templates = dir.path().join("templates");
        let docs = dir.path().join("docs");
        fs::create_dir_all(&templates).unwrap();
        fs::write(templates.join("docs-index.md"), "# {{ .Repository.Name }} docs").unwrap();
        fs::write(templates.join("faq.md"), "# FAQ").unwrap();
        create_structure(&docs).unwrap();
        fs::write(docs.join("guides/faq.md"), "hand written").unwrap();

        let config = config();
        let data = TemplateData::new(&config).to_value().unwrap();
        let summary = generate_indexes(&templates, &docs, &data);
        assert_eq!(summary.written, 1);
        assert_eq!(summary.preserved, 1);
        assert_eq!(fs::read_to_string(docs.join("README.md")).unwrap(), "# kit docs");
        assert_eq!(fs::read_to_string(docs.join("guides/faq.md")).unwrap(), "hand written");
    }

    #[test]
    fn readme_copy_tries_names() {
        let dir = TempDir::new().unwrap();
        let docs = dir.path().join("docs");
        create_structure(&docs).unwrap();
        assert_eq!(copy_readme(dir.path(), &docs).unwrap(), None);

        fs::write(dir.path().join("readme.md"), "# kit").unwrap();
        let copied = copy_readme(dir.path(), &docs).unwrap().unwrap();
        assert!(copied.ends_with("readme.md") || copied.ends_with("README.md"));
        assert_eq!(fs::read_to_string(docs.join("README.md")).unwrap(), "# kit");
    }

    #[test]
    fn summary_lists_every_page() {
        let pages = vec![PageEntry {
            page: "widget".to_string(),
            title: "widget".to_string(),
        }];
        let summary = summary_page("kit", &pages, false, true).unwrap();
        assert!(summary.contains("* [Packages](packages/README.md)\n  * [widget](packages/widget.md)\n"));
        assert!(!summary.contains("examples/"));
        assert!(summary.ends_with("* [All Packages](api-reference/all-packages.md)\n"));
    }

    #[test]
    fn gitbook_config_points_at_docs() {
        let dir = TempDir::new().unwrap();
        let path = write_gitbook_config(dir.path(), &dir.path().join("docs")).unwrap();
        let content = fs::read_to_string(path).unwrap();
        assert!(content.starts_with("root: ./docs/\n"));
        assert!(content.contains("summary: SUMMARY.md"));
    }
}
