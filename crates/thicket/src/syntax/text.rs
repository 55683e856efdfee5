#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Text size in bytes (UTF-8)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct TextSize(u32);

/// Byte range `[start, end)` in the source text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct TextRange {
    start: TextSize,
    end: TextSize,
}

/// Source position of a token: its byte range plus the one-based line and
/// column where it starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Span {
    pub range: TextRange,
    pub line: u32,
    pub column: u32,
}

impl TextSize {
    #[must_use]
    pub const fn from(offset: u32) -> Self {
        Self(offset)
    }

    /// Convert a `usize` offset, saturating at `u32::MAX`.
    #[must_use]
    pub fn of(offset: usize) -> Self {
        Self(u32::try_from(offset).unwrap_or(u32::MAX))
    }

    #[must_use]
    pub const fn into(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn zero() -> Self {
        Self(0)
    }
}

impl std::ops::Add<Self> for TextSize {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl TextRange {
    #[must_use]
    pub const fn new(start: TextSize, end: TextSize) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn at(start: TextSize, len: TextSize) -> Self {
        Self::new(start, TextSize(start.0.saturating_add(len.0)))
    }

    #[must_use]
    pub const fn empty(offset: TextSize) -> Self {
        Self::new(offset, offset)
    }

    #[must_use]
    pub const fn start(self) -> TextSize {
        self.start
    }

    #[must_use]
    pub const fn end(self) -> TextSize {
        self.end
    }

    #[must_use]
    pub const fn len(self) -> TextSize {
        TextSize(self.end.0 - self.start.0)
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start.0 == self.end.0
    }

    #[must_use]
    pub const fn contains(self, offset: TextSize) -> bool {
        offset.0 >= self.start.0 && offset.0 < self.end.0
    }
}

impl Span {
    #[must_use]
    pub const fn new(range: TextRange, line: u32, column: u32) -> Self {
        Self {
            range,
            line,
            column,
        }
    }

    /// A zero-width span at the given position.
    #[must_use]
    pub const fn point(offset: TextSize, line: u32, column: u32) -> Self {
        Self::new(TextRange::empty(offset), line, column)
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start.0, self.end.0)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(feature = "diagnostics")]
impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        use miette::SourceOffset;
        Self::new(
            SourceOffset::from(span.range.start().into() as usize),
            span.range.len().into() as usize,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_size_saturates() {
        assert_eq!(TextSize::of(7).into(), 7);
        assert_eq!(TextSize::from(u32::MAX) + TextSize::from(1), TextSize::from(u32::MAX));
    }

    #[test]
    fn test_text_range_len_and_contains() {
        let range = TextRange::at(TextSize::from(4), TextSize::from(3));
        assert_eq!(range.end(), TextSize::from(7));
        assert_eq!(range.len(), TextSize::from(3));
        assert!(range.contains(TextSize::from(4)));
        assert!(!range.contains(TextSize::from(7)));
        assert!(TextRange::empty(TextSize::from(2)).is_empty());
    }

    #[test]
    fn test_text_range_at_saturates() {
        let range = TextRange::at(TextSize::from(u32::MAX - 1), TextSize::from(5));
        assert_eq!(range.end(), TextSize::from(u32::MAX));
    }

    #[test]
    fn test_span_display() {
        let span = Span::new(TextRange::at(TextSize::from(10), TextSize::from(2)), 3, 5);
        assert_eq!(span.to_string(), "3:5");
        assert_eq!(span.range.to_string(), "10..12");
    }
}
