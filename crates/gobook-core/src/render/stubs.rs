//! Starter pages for examples and guides
//!
//! Examples are regenerated on every run. Guides are written once and then
//! left alone so they can be edited by hand.

use std::fmt::{self, Write};

use super::markdown::oneline;
use super::RepoMeta;
use crate::doc::{FunctionDoc, PackageDoc, TypeKind};

/// Marks a page that the generator will never overwrite
const PRESERVED_NOTICE: &str = "<!-- Generated once by gobook. This file is not regenerated, edit it freely. -->";

/// `examples/<page>/README.md`
pub fn examples_readme(page: &str, doc: &PackageDoc, repo: &RepoMeta, source: &str) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "# {} Examples", doc.name)?;
    writeln!(out)?;
    writeln!(out, "Programs showing `{}` in use.", doc.import_path)?;
    writeln!(out)?;
    writeln!(out, "## Available Examples")?;
    writeln!(out)?;
    writeln!(out, "- [Basic Usage](basic.md) - entry points of the package")?;
    writeln!(out, "- [Advanced Usage](advanced.md) - methods grouped by type")?;
    writeln!(out)?;
    writeln!(out, "## Running the Examples")?;
    writeln!(out)?;
    writeln!(out, "```bash")?;
    writeln!(out, "git clone https://github.com/{}/{}.git", repo.owner, repo.name)?;
    writeln!(out, "cd {}/examples/{page}", repo.name)?;
    writeln!(out, "go run .")?;
    writeln!(out, "```")?;
    writeln!(out)?;
    writeln!(out, "## Source")?;
    writeln!(out)?;
    writeln!(out, "```go")?;
    writeln!(out, "{}", source.trim_end())?;
    writeln!(out, "```")?;
    writeln!(out)?;
    writeln!(
        out,
        "More programs live in the [repository examples](https://github.com/{}/{}/tree/main/examples/{page}).",
        repo.owner, repo.name
    )?;
    Ok(out)
}

/// Program shown when the repository has no example of its own
pub fn placeholder_program(doc: &PackageDoc) -> String {
    format!(
        "package main\n\nimport (\n\t\"fmt\"\n\n\t_ \"{}\"\n)\n\nfunc main() {{\n\tfmt.Println(\"see the {} package documentation\")\n}}\n",
        doc.import_path, doc.name
    )
}

/// `examples/<page>/basic.md`: the package-level functions, constructors first
pub fn basic_examples(page: &str, doc: &PackageDoc) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "# {} Basic Examples", doc.name)?;
    writeln!(out)?;
    writeln!(out, "Import the package:")?;
    writeln!(out)?;
    writeln!(out, "```go")?;
    writeln!(out, "import \"{}\"", doc.import_path)?;
    writeln!(out, "```")?;
    writeln!(out)?;

    let (constructors, others): (Vec<&FunctionDoc>, Vec<&FunctionDoc>) =
        doc.functions.iter().partition(|f| f.name.starts_with("New"));

    if constructors.is_empty() && others.is_empty() {
        writeln!(
            out,
            "`{}` has no package-level functions. Start from its types in the [API reference](../../api-reference/{page}.md).",
            doc.name
        )?;
        return Ok(out);
    }
    if !constructors.is_empty() {
        writeln!(out, "## Constructors")?;
        writeln!(out)?;
        write_snippets(&mut out, &constructors)?;
    }
    if !others.is_empty() {
        writeln!(out, "## Functions")?;
        writeln!(out)?;
        write_snippets(&mut out, &others)?;
    }
    Ok(out)
}

/// `examples/<page>/advanced.md`: methods grouped by their type
pub fn advanced_examples(doc: &PackageDoc) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "# {} Advanced Examples", doc.name)?;
    writeln!(out)?;

    let with_methods: Vec<_> = doc.types.iter().filter(|t| !t.methods.is_empty()).collect();
    if with_methods.is_empty() {
        writeln!(out, "No type in `{}` declares methods.", doc.name)?;
        return Ok(out);
    }
    for ty in with_methods {
        writeln!(out, "## Working with {}", ty.name)?;
        writeln!(out)?;
        let summary = oneline(&ty.doc);
        if !summary.is_empty() {
            writeln!(out, "{summary}")?;
            writeln!(out)?;
        }
        let methods: Vec<_> = ty.methods.iter().collect();
        write_snippets(&mut out, &methods)?;
    }
    Ok(out)
}

fn write_snippets(out: &mut String, funcs: &[&FunctionDoc]) -> fmt::Result {
    for func in funcs {
        writeln!(out, "### {}", func.name)?;
        writeln!(out)?;
        let summary = oneline(&func.doc);
        if !summary.is_empty() {
            writeln!(out, "{summary}")?;
            writeln!(out)?;
        }
        writeln!(out, "```go")?;
        writeln!(out, "{}", func.signature)?;
        writeln!(out, "```")?;
        writeln!(out)?;
    }
    Ok(())
}

/// `guides/<page>/README.md`
pub fn guides_index(page: &str, doc: &PackageDoc) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "# {} Guides", doc.name)?;
    writeln!(out)?;
    writeln!(out, "Hand-written guides for `{}`.", doc.import_path)?;
    writeln!(out)?;
    writeln!(out, "- [Best Practices](best-practices.md)")?;
    writeln!(out, "- [Common Patterns](patterns.md)")?;
    writeln!(out)?;
    writeln!(out, "See also the [API reference](../../api-reference/{page}.md) and the [getting started page](../../getting-started/{page}.md).")?;
    writeln!(out)?;
    writeln!(out, "{PRESERVED_NOTICE}")?;
    Ok(out)
}

/// `guides/<page>/best-practices.md`
pub fn best_practices(doc: &PackageDoc) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "# {} Best Practices", doc.name)?;
    writeln!(out)?;
    writeln!(out, "## Performance")?;
    writeln!(out)?;
    writeln!(out, "Describe allocation behaviour and which values are safe to reuse.")?;
    writeln!(out)?;
    writeln!(out, "## Concurrency")?;
    writeln!(out)?;
    writeln!(out, "State which types may be shared between goroutines.")?;
    writeln!(out)?;
    writeln!(out, "## Errors")?;
    writeln!(out)?;
    let fallible = fallible_functions(doc);
    if fallible.is_empty() {
        writeln!(out, "No exported function of `{}` returns an error.", doc.name)?;
    } else {
        writeln!(out, "Check the error returned by:")?;
        writeln!(out)?;
        for name in fallible {
            writeln!(out, "- `{name}`")?;
        }
    }
    writeln!(out)?;
    writeln!(out, "{PRESERVED_NOTICE}")?;
    Ok(out)
}

/// `guides/<page>/patterns.md`
pub fn patterns(doc: &PackageDoc) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "# {} Common Patterns", doc.name)?;
    writeln!(out)?;
    writeln!(out, "## Basic Pattern")?;
    writeln!(out)?;
    writeln!(out, "```go")?;
    writeln!(out, "import \"{}\"", doc.import_path)?;
    writeln!(out, "```")?;
    writeln!(out)?;
    let interfaces: Vec<_> = doc.types.iter().filter(|t| t.kind == TypeKind::Interface).collect();
    if !interfaces.is_empty() {
        writeln!(out, "## Extension Points")?;
        writeln!(out)?;
        writeln!(out, "These interfaces can be implemented outside the package:")?;
        writeln!(out)?;
        for ty in interfaces {
            writeln!(out, "- `{}`", ty.name)?;
        }
        writeln!(out)?;
    }
    writeln!(out, "## Testing")?;
    writeln!(out)?;
    writeln!(out, "Show how code depending on `{}` can be tested.", doc.name)?;
    writeln!(out)?;
    writeln!(out, "{PRESERVED_NOTICE}")?;
    Ok(out)
}

/// Functions and methods whose results mention `error`, as `Name` or `Type.Name`
fn fallible_functions(doc: &PackageDoc) -> Vec<String> {
    let returns_error = |f: &FunctionDoc| results(&f.signature).contains("error");
    let functions = doc
        .functions
        .iter()
        .filter(|f| returns_error(f))
        .map(|f| f.name.clone());
    let methods = doc.types.iter().flat_map(|t| {
        t.methods
            .iter()
            .filter(|m| returns_error(m))
            .map(move |m| format!("{}.{}", t.name, m.name))
    });
    functions.chain(methods).collect()
}

/// Result list of a printed signature: `func (r T) F(a int) (int, error)` gives ` (int, error)`
fn results(signature: &str) -> &str {
    let rest = signature.strip_prefix("func ").unwrap_or(signature);
    let rest = if rest.starts_with('(') { after_group(rest) } else { rest };
    match rest.find('(') {
        Some(open) => after_group(&rest[open..]),
        None => "",
    }
}

/// Text after the parenthesised group that `text` starts with
fn after_group(text: &str) -> &str {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return &text[i + 1..];
                }
            }
            _ => {}
        }
    }
    ""
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::TypeDoc;

    fn func(name: &str, signature: &str) -> FunctionDoc {
        FunctionDoc {
            name: name.to_string(),
            doc: String::new(),
            signature: signature.to_string(),
        }
    }

    fn store() -> PackageDoc {
        PackageDoc {
            name: "store".to_string(),
            import_path: "github.com/acme/kit/store".to_string(),
            functions: vec![
                func("Open", "func Open(path string) (*DB, error)"),
                func("NewDB", "func NewDB() *DB"),
            ],
            types: vec![TypeDoc {
                name: "DB".to_string(),
                doc: "DB is a handle.".to_string(),
                decl: "type DB struct{}".to_string(),
                kind: TypeKind::Struct,
                fields: Vec::new(),
                methods: vec![func("Close", "func (db *DB) Close() error")],
                underlying: String::new(),
            }],
            ..PackageDoc::default()
        }
    }

    #[test]
    fn readme_embeds_source_and_clone_instructions() {
        let repo = RepoMeta::new("acme", "kit");
        let doc = store();
        let page = examples_readme("store", &doc, &repo, &placeholder_program(&doc)).unwrap();
        assert!(page.contains("git clone https://github.com/acme/kit.git"));
        assert!(page.contains("cd kit/examples/store"));
        assert!(page.contains("_ \"github.com/acme/kit/store\""));
        assert!(!page.contains("TODO"));
    }

    #[test]
    fn basic_lists_constructors_first() {
        let page = basic_examples("store", &store()).unwrap();
        let constructors = page.find("## Constructors").unwrap();
        let functions = page.find("## Functions").unwrap();
        assert!(constructors < functions);
        assert!(page.contains("func NewDB() *DB"));
    }

    #[test]
    fn advanced_groups_methods() {
        let page = advanced_examples(&store()).unwrap();
        assert!(page.contains("## Working with DB\n\nDB is a handle.\n"));
        assert!(page.contains("func (db *DB) Close() error"));
    }

    #[test]
    fn results_skip_receiver_and_params() {
        assert_eq!(results("func (db *DB) Close() error"), " error");
        assert_eq!(results("func Wrap(err error)"), "");
        assert_eq!(results("func Open(path string) (*DB, error)"), " (*DB, error)");
        assert_eq!(results("func Run(f func() error) int"), " int");
    }

    #[test]
    fn best_practices_lists_fallible_calls() {
        assert_eq!(fallible_functions(&store()), vec!["Open", "DB.Close"]);
        let page = best_practices(&store()).unwrap();
        assert!(page.contains("- `DB.Close`"));
        assert!(page.ends_with(&format!("{PRESERVED_NOTICE}\n")));
    }
}
