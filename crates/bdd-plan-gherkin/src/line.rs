//! Character-aware views over a single source line.
//!
//! Columns are counted in characters rather than bytes so locations stay
//! meaningful for non-ASCII keywords and cell values.

use std::mem;

use crate::ast::Location;
use crate::token::LineSpan;

/// One line of input together with its indentation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Line<'a> {
    number: usize,
    raw: &'a str,
    trimmed: &'a str,
    indent: usize,
}

impl<'a> Line<'a> {
    pub(crate) fn new(raw: &'a str, number: usize) -> Self {
        let trimmed = raw.trim_start();
        let indent = raw.chars().count() - trimmed.chars().count();
        Self {
            number,
            raw,
            trimmed,
            indent,
        }
    }

    pub(crate) fn number(&self) -> usize {
        self.number
    }

    pub(crate) fn raw(&self) -> &'a str {
        self.raw
    }

    /// Line content without leading whitespace.
    pub(crate) fn trimmed(&self) -> &'a str {
        self.trimmed
    }

    /// Location of the first non-blank character.
    pub(crate) fn location(&self) -> Location {
        Location::new(self.number, self.indent + 1)
    }

    pub(crate) fn indent(&self) -> usize {
        self.indent
    }

    pub(crate) fn is_blank(&self) -> bool {
        self.trimmed.is_empty()
    }

    /// Title following `keyword:`, or `None` if the line does not start with
    /// that keyword immediately followed by a colon.
    pub(crate) fn title_after(&self, keyword: &str) -> Option<&'a str> {
        self.trimmed
            .strip_prefix(keyword)?
            .strip_prefix(':')
            .map(str::trim)
    }

    /// Remove at most `indent` leading whitespace characters.
    pub(crate) fn text_without_indent(&self, indent: usize) -> String {
        self.raw.chars().skip(self.indent.min(indent)).collect()
    }

    /// Tags on a line made only of `@`-prefixed words, optionally followed by
    /// a `#` comment.
    pub(crate) fn tags(&self) -> Option<Vec<LineSpan>> {
        if !self.trimmed.starts_with('@') {
            return None;
        }
        let mut tags = Vec::new();
        let mut current = String::new();
        let mut start = 0;
        for (offset, ch) in self.trimmed.chars().chain(std::iter::once(' ')).enumerate() {
            if !ch.is_whitespace() {
                if current.is_empty() {
                    start = offset;
                }
                current.push(ch);
                continue;
            }
            if current.is_empty() {
                continue;
            }
            if current.starts_with('#') {
                break;
            }
            if !current.starts_with('@') || current.len() == 1 {
                return None;
            }
            tags.push(LineSpan {
                column: self.indent + start + 1,
                text: mem::take(&mut current),
            });
        }
        Some(tags)
    }

    /// Cells of a table row; text after the last `|` is ignored.
    pub(crate) fn table_cells(&self) -> Option<Vec<LineSpan>> {
        let rest = self.trimmed.strip_prefix('|')?;
        let mut cells = Vec::new();
        let mut raw = String::new();
        let mut cell_start = 1;
        let mut offset = 1;
        let mut chars = rest.chars();
        while let Some(ch) = chars.next() {
            match ch {
                '|' => {
                    cells.push(self.cell(cell_start, &raw));
                    raw.clear();
                    cell_start = offset + 1;
                }
                '\\' => {
                    raw.push(ch);
                    if let Some(escaped) = chars.next() {
                        raw.push(escaped);
                        offset += 1;
                    }
                }
                _ => raw.push(ch),
            }
            offset += 1;
        }
        Some(cells)
    }

    fn cell(&self, start: usize, raw: &str) -> LineSpan {
        let leading = raw.chars().take_while(|ch| ch.is_whitespace()).count();
        LineSpan {
            column: self.indent + start + leading + 1,
            text: unescape_cell(raw.trim()),
        }
    }
}

/// Resolve `\n`, `\|` and `\\`; any other escape is kept as written.
fn unescape_cell(raw: &str) -> String {
    let mut value = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            value.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => value.push('\n'),
            Some('|') => value.push('|'),
            Some('\\') => value.push('\\'),
            Some(other) => {
                value.push('\\');
                value.push(other);
            }
            None => value.push('\\'),
        }
    }
    value
}
