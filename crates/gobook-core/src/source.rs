//! Position tracking shared by the parser and the signature formatter
//!
//! A [`SourceMap`] owns the text of every file parsed for one package. Syntax
//! nodes only carry a [`FileId`] and byte spans, so anything that needs to
//! print a node back out must be handed the map that produced it.

use std::path::{Path, PathBuf};

use crate::lexer::{LineIndex, Location, Span};

/// Identifies a file inside one [`SourceMap`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(u32);

impl FileId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One source file registered in a [`SourceMap`]
#[derive(Debug, Clone)]
pub struct SourceFile {
    path: PathBuf,
    source: String,
    lines: LineIndex,
}

impl SourceFile {
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The file name without directories, used in diagnostics
    #[must_use]
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map_or_else(|| self.path.display().to_string(), |n| n.to_string_lossy().into_owned())
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn lines(&self) -> &LineIndex {
        &self.lines
    }

    /// 1-indexed line of a byte offset
    #[must_use]
    pub fn line(&self, offset: u32) -> u32 {
        self.lines.line(offset)
    }

    #[must_use]
    pub fn location(&self, offset: u32) -> Location {
        self.lines.location(offset)
    }

    /// Source text covered by `span`, if the span lies within this file
    #[must_use]
    pub fn snippet(&self, span: Span) -> Option<&str> {
        self.source.get(span.as_range())
    }

    /// Leading whitespace of the line containing `offset`
    #[must_use]
    pub fn indentation_at(&self, offset: u32) -> &str {
        let line = self.line(offset);
        let start = self.lines.line_start(line).unwrap_or(0) as usize;
        let rest = self.source.get(start..).unwrap_or("");
        let width = rest
            .find(|c: char| c != ' ' && c != '\t')
            .unwrap_or(rest.len());
        &rest[..width]
    }
}

/// All files parsed during one package extraction
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    files: Vec<SourceFile>,
}

impl SourceMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file and return its id
    #[allow(clippy::cast_possible_truncation)]
    pub fn add_file(&mut self, path: impl Into<PathBuf>, source: impl Into<String>) -> FileId {
        let source = source.into();
        let lines = LineIndex::new(&source);
        let id = FileId(self.files.len() as u32);
        self.files.push(SourceFile {
            path: path.into(),
            source,
            lines,
        });
        id
    }

    #[must_use]
    pub fn get(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.index())
    }

    #[must_use]
    pub fn snippet(&self, id: FileId, span: Span) -> Option<&str> {
        self.get(id)?.snippet(span)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn files(&self) -> impl Iterator<Item = (FileId, &SourceFile)> {
        self.files
            .iter()
            .enumerate()
            .map(|(i, f)| (FileId(u32::try_from(i).unwrap_or(u32::MAX)), f))
    }
}
