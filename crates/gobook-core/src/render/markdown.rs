//! Markdown pages generated from a package model

use std::fmt::{self, Write};

use crate::doc::{FunctionDoc, PackageDoc, TypeDoc, ValueDoc};

/// Longest summary kept whole by [`truncate`], in bytes
const SUMMARY_LIMIT: usize = 100;
const ELLIPSIS: &str = "...";

/// Generates the per-package markdown pages
pub struct MarkdownGenerator;

impl MarkdownGenerator {
    /// `packages/<page>.md`: install instructions and links into the API page
    pub fn overview(page: &str, doc: &PackageDoc, examples: bool) -> Result<String, fmt::Error> {
        let mut out = String::new();
        writeln!(out, "# {}", doc.name)?;
        writeln!(out)?;
        write_doc(&mut out, &doc.doc)?;
        write_install(&mut out, &doc.import_path)?;

        writeln!(out, "## Quick Start")?;
        writeln!(out)?;
        writeln!(out, "```go")?;
        writeln!(out, "package main")?;
        writeln!(out)?;
        writeln!(out, "import \"{}\"", doc.import_path)?;
        writeln!(out)?;
        writeln!(out, "func main() {{")?;
        writeln!(out, "\t// call into {} here", doc.name)?;
        writeln!(out, "}}")?;
        writeln!(out, "```")?;
        writeln!(out)?;

        if !doc.functions.is_empty() || !doc.types.is_empty() {
            writeln!(out, "## API Reference")?;
            writeln!(out)?;
            let api = format!("../api-reference/{page}.md");
            let functions: Vec<_> = doc.functions.iter().map(|f| (f.name.as_str(), f.doc.as_str())).collect();
            let types: Vec<_> = doc.types.iter().map(|t| (t.name.as_str(), t.doc.as_str())).collect();
            write_link_list(&mut out, "Functions", &api, &functions)?;
            write_link_list(&mut out, "Types", &api, &types)?;
        }

        if examples {
            writeln!(out, "## Examples")?;
            writeln!(out)?;
            writeln!(out, "Worked examples live in [examples](../examples/{page}/README.md).")?;
            writeln!(out)?;
        }

        writeln!(out, "## Resources")?;
        writeln!(out)?;
        writeln!(out, "- [API Reference](../api-reference/{page}.md) - every exported declaration")?;
        if examples {
            writeln!(out, "- [Examples](../examples/{page}/README.md) - runnable programs")?;
        }
        writeln!(out, "- [Best Practices](../guides/{page}/best-practices.md) - usage advice")?;
        Ok(out)
    }

    /// `api-reference/<page>.md`: every declaration with its printed source
    pub fn api_reference(doc: &PackageDoc) -> Result<String, fmt::Error> {
        let mut out = String::new();
        writeln!(out, "# {} API", doc.name)?;
        writeln!(out)?;
        writeln!(out, "```go")?;
        writeln!(out, "import \"{}\"", doc.import_path)?;
        writeln!(out, "```")?;
        writeln!(out)?;

        if !doc.functions.is_empty() {
            writeln!(out, "## Functions")?;
            writeln!(out)?;
            for func in &doc.functions {
                write_function(&mut out, func, 3)?;
            }
        }

        if !doc.types.is_empty() {
            writeln!(out, "## Types")?;
            writeln!(out)?;
            for ty in &doc.types {
                write_type(&mut out, ty)?;
            }
        }

        write_values(&mut out, "Constants", &doc.constants)?;
        write_values(&mut out, "Variables", &doc.variables)?;
        Ok(out)
    }

    /// `getting-started/<page>.md`
    pub fn getting_started(page: &str, doc: &PackageDoc, examples: bool) -> Result<String, fmt::Error> {
        let mut out = String::new();
        writeln!(out, "# Getting Started with {}", doc.name)?;
        writeln!(out)?;
        write_doc(&mut out, &doc.doc)?;
        write_install(&mut out, &doc.import_path)?;

        if !doc.functions.is_empty() || !doc.types.is_empty() {
            writeln!(out, "## Basic Usage")?;
            writeln!(out)?;
            if !doc.functions.is_empty() {
                writeln!(out, "### Functions")?;
                writeln!(out)?;
                for func in &doc.functions {
                    write_bullet(&mut out, &func.name, &func.doc)?;
                }
                writeln!(out)?;
            }
            if !doc.types.is_empty() {
                writeln!(out, "### Types")?;
                writeln!(out)?;
                for ty in &doc.types {
                    write_bullet(&mut out, &ty.name, &ty.doc)?;
                }
                writeln!(out)?;
            }
        }

        writeln!(out, "## Next Steps")?;
        writeln!(out)?;
        writeln!(out, "- [Package Overview](../packages/{page}.md)")?;
        writeln!(out, "- [API Reference](../api-reference/{page}.md)")?;
        if examples {
            writeln!(out, "- [Examples](../examples/{page}/README.md)")?;
        }
        writeln!(out, "- [Best Practices](../guides/{page}/best-practices.md)")?;
        writeln!(out, "- [Common Patterns](../guides/{page}/patterns.md)")?;
        Ok(out)
    }

    /// API pages of several packages as one document, headings pushed down a level
    pub fn combined(title: &str, docs: &[&PackageDoc]) -> Result<String, fmt::Error> {
        let mut out = String::new();
        writeln!(out, "# {title}")?;
        writeln!(out)?;
        for doc in docs {
            writeln!(out, "- [{}](#{}-api) - `{}`", doc.name, anchor(&doc.name), doc.import_path)?;
        }
        for doc in docs {
            writeln!(out)?;
            out.push_str(&demote(&Self::api_reference(doc)?));
        }
        Ok(out)
    }
}

fn write_doc(out: &mut String, doc: &str) -> fmt::Result {
    if !doc.is_empty() {
        writeln!(out, "{doc}")?;
        writeln!(out)?;
    }
    Ok(())
}

fn write_install(out: &mut String, import_path: &str) -> fmt::Result {
    writeln!(out, "## Installation")?;
    writeln!(out)?;
    writeln!(out, "```bash")?;
    writeln!(out, "go get {import_path}")?;
    writeln!(out, "```")?;
    writeln!(out)
}

fn write_link_list(out: &mut String, heading: &str, target: &str, items: &[(&str, &str)]) -> fmt::Result {
    if items.is_empty() {
        return Ok(());
    }
    writeln!(out, "### {heading}")?;
    writeln!(out)?;
    for &(name, doc) in items {
        write!(out, "- [{name}]({target}#{})", anchor(name))?;
        let summary = truncate(&oneline(doc));
        if summary.is_empty() {
            writeln!(out)?;
        } else {
            writeln!(out, " - {summary}")?;
        }
    }
    writeln!(out)
}

fn write_bullet(out: &mut String, name: &str, doc: &str) -> fmt::Result {
    let summary = oneline(doc);
    if summary.is_empty() {
        writeln!(out, "- **{name}**")
    } else {
        writeln!(out, "- **{name}** - {summary}")
    }
}

fn write_code(out: &mut String, code: &str) -> fmt::Result {
    writeln!(out, "```go")?;
    writeln!(out, "{code}")?;
    writeln!(out, "```")?;
    writeln!(out)
}

fn write_function(out: &mut String, func: &FunctionDoc, level: usize) -> fmt::Result {
    writeln!(out, "{} {}", "#".repeat(level), func.name)?;
    writeln!(out)?;
    write_doc(out, &func.doc)?;
    write_code(out, &func.signature)
}

fn write_type(out: &mut String, ty: &TypeDoc) -> fmt::Result {
    writeln!(out, "### {}", ty.name)?;
    writeln!(out)?;
    write_doc(out, &ty.doc)?;
    write_code(out, &ty.decl)?;

    if ty.kind.has_members() && !ty.fields.is_empty() {
        writeln!(out, "#### Fields")?;
        writeln!(out)?;
        writeln!(out, "| Field | Type | Description |")?;
        writeln!(out, "|-------|------|-------------|")?;
        for field in &ty.fields {
            writeln!(
                out,
                "| `{}` | `{}` | {} |",
                field.name,
                table_cell(&single_line(&field.ty)),
                table_cell(&oneline(&field.doc))
            )?;
        }
        writeln!(out)?;
    }

    if !ty.underlying.is_empty() {
        writeln!(out, "#### Underlying Type")?;
        writeln!(out)?;
        write_code(out, &ty.underlying)?;
    }

    if !ty.methods.is_empty() {
        writeln!(out, "#### Methods")?;
        writeln!(out)?;
        for method in &ty.methods {
            write_function(out, method, 5)?;
        }
    }
    Ok(())
}

fn write_values(out: &mut String, heading: &str, values: &[ValueDoc]) -> fmt::Result {
    if values.is_empty() {
        return Ok(());
    }
    writeln!(out, "## {heading}")?;
    writeln!(out)?;
    for value in values {
        writeln!(out, "### {}", value.name)?;
        writeln!(out)?;
        write_doc(out, &value.doc)?;
        write_code(out, &value.decl)?;
    }
    Ok(())
}

/// Shorten `text` to at most 100 bytes, ending in `...` when cut
pub fn truncate(text: &str) -> String {
    if text.len() <= SUMMARY_LIMIT {
        return text.to_string();
    }
    let mut end = SUMMARY_LIMIT - ELLIPSIS.len();
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{ELLIPSIS}", &text[..end])
}

/// First line of the trimmed text
pub fn oneline(text: &str) -> String {
    text.trim().lines().next().unwrap_or_default().trim().to_string()
}

/// Heading anchor for a declaration name
pub fn anchor(name: &str) -> String {
    name.to_lowercase()
}

/// Fold a multi-line type into Go's single-line form:
/// `struct {\n\tX int\n\tY int\n}` becomes `struct { X int; Y int }`
fn single_line(ty: &str) -> String {
    let mut out = String::new();
    let mut previous = "";
    for line in ty.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if !out.is_empty() {
            let joint = previous.ends_with('{') || line.starts_with('}');
            out.push_str(if joint { " " } else { "; " });
        }
        out.push_str(line);
        previous = line;
    }
    out
}

fn table_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Push every heading outside code fences one level down
fn demote(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len() + 64);
    let mut fenced = false;
    for line in markdown.lines() {
        if line.starts_with("```") {
            fenced = !fenced;
        } else if !fenced && line.starts_with('#') {
            out.push('#');
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}
