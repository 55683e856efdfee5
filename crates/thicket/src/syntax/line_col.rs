//! Line and column position utilities
//!
//! Tokenizers use [`LineIndex`] to turn byte offsets into the one-based
//! line/column pairs carried by every [`Span`].

use crate::syntax::{Span, TextRange, TextSize};

/// Zero-based line and column (in UTF-8 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineCol {
    pub line: u32,
    pub column: u32,
}

impl LineCol {
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Cached line starts for O(log n) offset lookups
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<TextSize>,
    text_len: TextSize,
}

impl LineIndex {
    /// Scan `text` once and record where every line starts.
    ///
    /// `\n`, `\r\n` and lone `\r` all end a line.
    #[must_use]
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::zero()];
        let bytes = text.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => {
                    line_starts.push(TextSize::of(i + 1));
                    i += 1;
                }
                b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                    line_starts.push(TextSize::of(i + 2));
                    i += 2;
                }
                b'\r' => {
                    line_starts.push(TextSize::of(i + 1));
                    i += 1;
                }
                _ => i += 1,
            }
        }

        Self {
            line_starts,
            text_len: TextSize::of(text.len()),
        }
    }

    /// Zero-based line/column of `offset`, clamped to the end of the text.
    #[must_use]
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let offset = offset.min(self.text_len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let column = offset.into() - self.line_starts[line].into();
        LineCol::new(u32::try_from(line).unwrap_or(u32::MAX), column)
    }

    /// Build the [`Span`] of the byte range `[start, end)`.
    #[must_use]
    pub fn span(&self, start: usize, end: usize) -> Span {
        let start = TextSize::of(start);
        let pos = self.line_col(start);
        Span::new(
            TextRange::new(start, TextSize::of(end)),
            pos.line + 1,
            pos.column + 1,
        )
    }

    /// Zero-width span just past the last byte of the text.
    #[must_use]
    pub fn end_span(&self) -> Span {
        let pos = self.line_col(self.text_len);
        Span::point(self.text_len, pos.line + 1, pos.column + 1)
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
