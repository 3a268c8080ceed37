//! End-to-end tests of the extraction pipeline over on-disk packages

use std::fs;
use std::path::Path;

use gobook_core::doc::{DocError, ExtractOptions, FieldDoc, FunctionDoc, Pipeline, TypeKind};
use gobook_core::render::{write_artifacts, RenderOptions, RepoMeta, TemplateRenderer};
use tempfile::TempDir;

const IMPORT_ROOT: &str = "github.com/acme/kit";

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn widget_repo() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "widget/widget.go",
        "package widget\n\nfunc New() *Widget // New creates a Widget.\n\ntype Widget struct { ID string }\n",
    );
    dir
}

#[test]
fn test_widget_scenario() {
    let repo = widget_repo();
    let doc = Pipeline::new(repo.path(), IMPORT_ROOT)
        .extract("widget", None)
        .unwrap();

    assert_eq!(doc.name, "widget");
    assert_eq!(doc.import_path, "github.com/acme/kit/widget");
    assert_eq!(
        doc.functions,
        vec![FunctionDoc {
            name: "New".to_string(),
            doc: "New creates a Widget.".to_string(),
            signature: "func New() *Widget".to_string(),
        }]
    );
    assert_eq!(doc.types.len(), 1);
    assert_eq!(doc.types[0].name, "Widget");
    assert_eq!(doc.types[0].kind, TypeKind::Struct);
    assert_eq!(
        doc.types[0].fields,
        vec![FieldDoc {
            name: "ID".to_string(),
            ty: "string".to_string(),
            tag: String::new(),
            doc: String::new(),
        }]
    );
}

#[test]
fn test_test_files_contribute_nothing() {
    let repo = widget_repo();
    write(
        repo.path(),
        "widget/widget_test.go",
        "package widget\n\nimport \"testing\"\n\nfunc TestNew(t *testing.T) {}\n\ntype Fixture struct{}\n\nconst Seed = 7\n",
    );
    write(
        repo.path(),
        "widget/export_test.go",
        "package widget_test\n\nvar Helper = 1\n",
    );

    let doc = Pipeline::new(repo.path(), IMPORT_ROOT)
        .extract("widget", None)
        .unwrap();
    assert_eq!(doc.functions.len(), 1);
    assert_eq!(doc.types.len(), 1);
    assert!(doc.constants.is_empty());
    assert!(doc.variables.is_empty());
}

#[test]
fn test_test_marker_functions_in_regular_files() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "bench/bench.go",
        "package bench\n\nfunc TestHelper() {}\nfunc BenchmarkSort() {}\nfunc Sort() {}\n",
    );
    let doc = Pipeline::new(dir.path(), IMPORT_ROOT)
        .extract("bench", None)
        .unwrap();
    let names: Vec<_> = doc.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["Sort"]);
}

#[test]
fn test_missing_package_does_not_stop_the_run() {
    let repo = widget_repo();
    let pipeline = Pipeline::new(repo.path().join("nowhere"), IMPORT_ROOT);

    let err = pipeline.extract("missing", None).unwrap_err();
    assert!(matches!(err, DocError::Locate { .. }));
    assert_eq!(err.package(), "missing");

    // a later package in the same run still succeeds
    let doc = pipeline.extract("widget", Some(&repo.path().join("widget"))).unwrap();
    assert_eq!(doc.functions.len(), 1);
}

#[test]
fn test_run_reports_each_failure_and_continues() {
    let repo = widget_repo();
    write(repo.path(), "empty/README.md", "no go here\n");
    write(repo.path(), "tests_only/a_test.go", "package tests_only\n");
    write(repo.path(), "broken/broken.go", "package broken\n\nfunc (\n");

    let pipeline = Pipeline::new(repo.path(), IMPORT_ROOT);
    let mut outcomes = Vec::new();
    for name in ["empty", "widget", "tests_only", "broken"] {
        outcomes.push(match pipeline.extract(name, None) {
            Ok(doc) => format!("ok {}", doc.name),
            Err(e) => format!("{} {}", e.category(), e.package()),
        });
    }
    assert_eq!(
        outcomes,
        vec!["parse empty", "ok widget", "parse tests_only", "parse broken"]
    );
}

#[test]
fn test_block_comments_anywhere_in_a_file() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "widget/widget.go",
        r#"/* Copyright 2024 Acme. All rights reserved. */

// Package widget makes widgets.
package widget

/*
New makes one.
*/
func New() int {
	/* inline */
	return 1
}

// Widget is a thing.
type Widget struct {
	/* ID identifies the widget. */
	ID   string
	Size int /* in mm */
}
"#,
    );

    let doc = Pipeline::new(dir.path(), IMPORT_ROOT)
        .extract("widget", None)
        .unwrap();
    assert_eq!(doc.doc, "Package widget makes widgets.");
    assert!(doc.format_warnings.is_empty());

    assert_eq!(doc.functions.len(), 1);
    assert_eq!(doc.functions[0].doc, "New makes one.");
    assert_eq!(doc.functions[0].signature, "func New() int");

    let widget = &doc.types[0];
    assert_eq!(widget.doc, "Widget is a thing.");
    let names: Vec<_> = widget.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["ID", "Size"]);
    assert_eq!(widget.fields[0].doc.trim(), "ID identifies the widget.");
    assert_eq!(widget.fields[1].doc.trim(), "in mm");
}

#[test]
fn test_unterminated_block_comment_fails_only_that_file() {
    let repo = widget_repo();
    write(
        repo.path(),
        "widget/broken.go",
        "package widget\n\n/* never closed\nfunc Broken() {}\n",
    );
    let doc = Pipeline::new(repo.path(), IMPORT_ROOT)
        .extract("widget", None)
        .unwrap();
    let names: Vec<_> = doc.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["New"]);
}

#[test]
fn test_tool_directives_are_dropped_from_docs() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "kind/kind.go",
        "// Package kind names kinds.\npackage kind\n\n// Kind enumerates kinds.\n//\n//go:generate stringer -type=Kind\ntype Kind int\n\n// Parse reads a kind.\n//go:generate echo parse\nfunc Parse(s string) Kind { return 0 }\n",
    );
    let doc = Pipeline::new(dir.path(), IMPORT_ROOT)
        .extract("kind", None)
        .unwrap();
    assert_eq!(doc.types[0].doc, "Kind enumerates kinds.");
    assert_eq!(doc.functions[0].doc, "Parse reads a kind.");
    assert!(!serde_json::to_string(&doc).unwrap().contains("go:generate"));
}

#[test]
fn test_grouped_values_expand_per_name() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "level/level.go",
        "package level\n\n// Levels of logging.\nconst (\n\tDebug, Info, Warn = 0, 1, 2\n\tError = 3\n)\n\n// Defaults.\nvar (\n\tName, Path string\n)\n",
    );
    let doc = Pipeline::new(dir.path(), IMPORT_ROOT)
        .extract("level", None)
        .unwrap();

    let names: Vec<_> = doc.constants.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Debug", "Info", "Warn", "Error"]);
    assert!(doc.constants.iter().all(|c| c.doc == "Levels of logging."));
    assert_eq!(doc.constants[0].decl, "const Debug, Info, Warn = 0, 1, 2");

    assert_eq!(doc.variables.len(), 2);
    assert!(doc.variables.iter().all(|v| v.doc == "Defaults."));
    assert_eq!(doc.variables[1].decl, "var Name, Path string");
}

#[test]
fn test_members_underlying_and_embedding() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "shapes/shapes.go",
        r#"// Package shapes describes shapes.
package shapes

import "io"

// Base is embedded everywhere.
type Base struct{}

// Circle is round.
type Circle struct {
	Base
	*io.PipeReader
	// Radius in metres.
	Radius float64 `json:"radius"`
	X, Y   int // centre
}

type (
	Names   []string
	Index   map[string]int
	Events  chan<- string
	Visitor func(Circle) error
	Area    float64
	Shape   interface {
		Area() Area
	}
)

func (c *Circle) Area() Area { return 0 }
"#,
    );

    let doc = Pipeline::new(dir.path(), IMPORT_ROOT)
        .extract("shapes", None)
        .unwrap();
    assert_eq!(doc.doc, "Package shapes describes shapes.");

    let circle = doc.types.iter().find(|t| t.name == "Circle").unwrap();
    assert_eq!(circle.fields.len(), 4);
    let names: Vec<_> = circle.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["Base", "PipeReader", "Radius", "X"]);
    assert_eq!(circle.fields[1].ty, "*io.PipeReader");
    assert_eq!(circle.fields[2].tag, "`json:\"radius\"`");
    assert_eq!(circle.fields[2].doc, "Radius in metres.");
    assert_eq!(circle.fields[3].doc, "centre");
    assert!(circle.underlying.is_empty());
    assert_eq!(circle.methods.len(), 1);
    assert_eq!(circle.methods[0].signature, "func (c *Circle) Area() Area");

    let kinds: Vec<_> = doc
        .types
        .iter()
        .map(|t| (t.name.as_str(), t.kind))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("Base", TypeKind::Struct),
            ("Circle", TypeKind::Struct),
            ("Names", TypeKind::Array),
            ("Index", TypeKind::Map),
            ("Events", TypeKind::Channel),
            ("Visitor", TypeKind::Function),
            ("Area", TypeKind::Type),
            ("Shape", TypeKind::Interface),
        ]
    );

    for ty in &doc.types {
        match ty.kind {
            TypeKind::Struct | TypeKind::Interface => assert!(ty.underlying.is_empty(), "{}", ty.name),
            _ => {
                assert!(!ty.underlying.is_empty(), "{}", ty.name);
                assert!(ty.fields.is_empty(), "{}", ty.name);
            }
        }
    }
    let index = doc.types.iter().find(|t| t.name == "Index").unwrap();
    assert_eq!(index.underlying, "map[string]int");
    assert_eq!(index.decl, "type Index map[string]int");
}

#[test]
fn test_extraction_is_deterministic() {
    let repo = widget_repo();
    write(
        repo.path(),
        "widget/options.go",
        "package widget\n\n// Option configures a Widget.\ntype Option func(*Widget)\n\n// WithID sets the id.\nfunc WithID(id string) Option { return nil }\n",
    );
    let pipeline = Pipeline::new(repo.path(), IMPORT_ROOT);
    let first = serde_json::to_string(&pipeline.extract("widget", None).unwrap()).unwrap();
    let second = serde_json::to_string(&pipeline.extract("widget", None).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_unexported_option() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "cache/cache.go",
        "package cache\n\ntype entry struct{ key string }\n\nfunc lookup(k string) *entry { return nil }\n\nfunc TestLike() {}\n",
    );
    let pipeline = Pipeline::new(dir.path(), IMPORT_ROOT);
    assert!(pipeline.extract("cache", None).unwrap().is_empty());

    let doc = Pipeline::new(dir.path(), IMPORT_ROOT)
        .with_options(ExtractOptions {
            include_unexported: true,
        })
        .extract("cache", None)
        .unwrap();
    assert_eq!(doc.types.len(), 1);
    let names: Vec<_> = doc.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["lookup"]);
}

#[test]
fn test_discovery_and_rendering() {
    let repo = widget_repo();
    write(repo.path(), "internal/codec/codec.go", "package codec\n\nfunc Encode() {}\n");
    write(repo.path(), "vendor/dep/dep.go", "package dep\n");
    write(repo.path(), ".git/hooks/hook.go", "package hooks\n");

    let pipeline = Pipeline::new(repo.path(), IMPORT_ROOT);
    let found = pipeline
        .locator()
        .discover(&["testdata".to_string()], pipeline.filter())
        .unwrap();
    let names: Vec<_> = found.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["internal/codec", "widget"]);

    let codec = pipeline.extract_dir(&found[0].name, &found[0].dir).unwrap();
    assert_eq!(codec.import_path, "github.com/acme/kit/internal/codec");

    let docs = TempDir::new().unwrap();
    let renderer = TemplateRenderer::new(RepoMeta::new("acme", "kit"), RenderOptions::default());
    let artifacts = renderer.render(&found[0].name, &codec, None).unwrap();
    let summary = write_artifacts(docs.path(), &artifacts).unwrap();
    assert_eq!(summary.written, artifacts.len());

    let api = fs::read_to_string(docs.path().join("api-reference/internal-codec.md")).unwrap();
    assert!(api.contains("```go\nfunc Encode()\n```"));

    // a second run keeps hand-edited guides
    let guide = docs.path().join("guides/internal-codec/patterns.md");
    fs::write(&guide, "edited").unwrap();
    let summary = write_artifacts(docs.path(), &artifacts).unwrap();
    assert_eq!(summary.preserved, 3);
    assert_eq!(fs::read_to_string(&guide).unwrap(), "edited");
}
