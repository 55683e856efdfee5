use crate::lexer::TokenKind;
use crate::syntax::Span;
use compact_str::CompactString;
use std::fmt;

/// A positioned token.
///
/// Tokens are produced once by a [`Tokenizer`](crate::lexer::Tokenizer) and
/// never modified afterwards. The [`TokenStream`](crate::lexer::TokenStream)
/// owns them; forests and parses only refer to them.
///
/// # Example
///
/// ```rust,ignore
/// use thicket::lexer::Token;
/// use thicket::syntax::{Span, TextRange, TextSize};
///
/// let token = Token::new(
///     MyKind::Number,
///     "42",
///     Span::new(TextRange::at(TextSize::from(0), TextSize::from(2)), 1, 1),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token<K: TokenKind> {
    /// The kind the grammar matches on
    pub kind: K,
    /// The source text this token was read from
    pub text: CompactString,
    /// Where the token appears in the source
    pub span: Span,
}

impl<K: TokenKind> Token<K> {
    #[must_use]
    pub fn new(kind: K, text: impl Into<CompactString>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Human-readable form including the position, e.g. `'+' (Plus) at 1:3`.
    #[must_use]
    pub fn describe(&self) -> String {
        format!("{self} at {}", self.span)
    }
}

impl<K: TokenKind> fmt::Display for Token<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' ({})", self.text, self.kind.display_name())
    }
}
