//! Elastic tabstop alignment for struct and interface bodies
//!
//! Each line is a sequence of *cells* (text terminated by a tab in gofmt's
//! model) followed by trailing text that takes no part in alignment. A column
//! block is a run of consecutive lines that all have a cell in that column;
//! every cell of a block is padded to the widest cell plus one space. Blocks
//! of column `c + 1` never extend past the block of column `c` that encloses
//! them, so a line with fewer cells (a comment, a blank line, the tail of a
//! multi-line type) ends every block it interrupts.

/// Minimum gap between aligned columns
const PADDING: usize = 1;

/// One output line of a body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(super) struct Line {
    /// Prefix the line with the body indentation
    pub indent: bool,
    pub cells: Vec<String>,
    pub trailing: String,
}

impl Line {
    pub fn row(cells: Vec<String>, trailing: impl Into<String>) -> Self {
        Self {
            indent: true,
            cells,
            trailing: trailing.into(),
        }
    }

    /// A line that breaks alignment, printed at the body indentation
    pub fn text(text: impl Into<String>) -> Self {
        Self::row(Vec::new(), text)
    }

    /// A line printed exactly as given
    pub fn verbatim(text: impl Into<String>) -> Self {
        Self {
            indent: false,
            ..Self::text(text)
        }
    }

    pub fn blank() -> Self {
        Self::default()
    }
}

/// Render `lines`, prefixing indented ones with `prefix`.
///
/// Lines are joined with `\n`; the result has no trailing newline.
pub(super) fn render(lines: &[Line], prefix: &str) -> String {
    let widths = column_widths(lines);
    let mut out = String::new();

    for (i, (line, widths)) in lines.iter().zip(&widths).enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let mut text = String::new();
        for (cell, &width) in line.cells.iter().zip(widths) {
            text.push_str(cell);
            let pad = width.saturating_sub(display_width(cell));
            text.extend(std::iter::repeat(' ').take(pad));
        }
        text.push_str(&line.trailing);

        let text = text.trim_end();
        if text.is_empty() {
            continue;
        }
        if line.indent {
            out.push_str(prefix);
        }
        out.push_str(text);
    }

    out
}

/// Width of every cell of every line after alignment
fn column_widths(lines: &[Line]) -> Vec<Vec<usize>> {
    let mut widths: Vec<Vec<usize>> = lines.iter().map(|l| vec![0; l.cells.len()]).collect();
    align_blocks(lines, 0, lines.len(), 0, &mut widths);
    widths
}

fn align_blocks(lines: &[Line], start: usize, end: usize, column: usize, widths: &mut [Vec<usize>]) {
    let mut i = start;
    while i < end {
        if lines[i].cells.len() <= column {
            i += 1;
            continue;
        }

        let mut j = i;
        let mut width = 0;
        let mut all_empty = true;
        while j < end && lines[j].cells.len() > column {
            let cell = &lines[j].cells[column];
            width = width.max(display_width(cell));
            all_empty &= cell.is_empty();
            j += 1;
        }

        // columns made only of empty cells are discarded
        let width = if all_empty { 0 } else { width + PADDING };
        for row in &mut widths[i..j] {
            row[column] = width;
        }

        align_blocks(lines, i, j, column + 1, widths);
        i = j;
    }
}

fn display_width(text: &str) -> usize {
    text.chars().count()
}
