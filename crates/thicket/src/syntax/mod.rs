//! Source positions: byte ranges, spans and line/column lookup.

pub mod line_col;
mod text;

pub use line_col::{LineCol, LineIndex};
pub use text::{Span, TextRange, TextSize};
