//! # Error Types
//!
//! - [`LexError`]: a tokenizer could not read its input.
//! - [`ParseError`]: the chart parser rejected the token stream. A syntax
//!   failure is an ordinary outcome; it always carries the furthest position
//!   reached and the terminals that would have been accepted there.
//! - [`ForestError`]: pricing, extraction or enumeration met a forest that
//!   violates its own invariants, or was handed a cursor that does not belong
//!   to it. Apart from [`ForestError::InvalidDirections`] these are internal
//!   consistency faults: they point at a bug and must not be retried.
//! - [`GrammarError`](crate::grammar::GrammarError): build-time grammar
//!   validation, defined next to the builder.
//!
//! Running out of parses during enumeration is not an error; it is reported
//! as `Ok(None)`.

use crate::forest::NodeId;
use crate::lexer::{Token, TokenKind};
use crate::syntax::Span;
use std::fmt;
use thiserror::Error;

#[cfg(feature = "diagnostics")]
use miette::Diagnostic;

/// Tokenizer error with location information
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
#[error("{kind} at {span}")]
pub struct LexError {
    #[cfg_attr(feature = "diagnostics", label)]
    pub span: Span,
    #[source]
    pub kind: LexErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum LexErrorKind {
    #[error("unexpected character '{char}'")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexer::unexpected_char)))]
    UnexpectedChar { char: char },

    #[error("{message}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexer::invalid)))]
    Invalid { message: String },
}

impl LexError {
    #[must_use]
    pub const fn unexpected_char(char: char, span: Span) -> Self {
        Self {
            span,
            kind: LexErrorKind::UnexpectedChar { char },
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>, span: Span) -> Self {
        Self {
            span,
            kind: LexErrorKind::Invalid {
                message: message.into(),
            },
        }
    }
}

/// The chart parser could not derive the start symbol over the whole input.
///
/// `position` is the index of the furthest token reached; `found` is that
/// token, or `None` when the input ended too early.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError<K: TokenKind> {
    pub position: usize,
    pub found: Option<Token<K>>,
    pub span: Span,
    pub expected: Vec<K>,
}

impl<K: TokenKind> fmt::Display for SyntaxError<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.found {
            Some(token) => write!(f, "unexpected {token} at {}", self.span)?,
            None => write!(f, "unexpected end of input at {}", self.span)?,
        }
        if !self.expected.is_empty() {
            let names: Vec<_> = self.expected.iter().map(|k| k.display_name()).collect();
            write!(f, ", expected one of: {}", names.join(", "))?;
        }
        Ok(())
    }
}

impl<K: TokenKind> std::error::Error for SyntaxError<K> {}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError<K: TokenKind> {
    #[error(transparent)]
    Syntax(#[from] SyntaxError<K>),

    #[error("start symbol `{symbol}` has no rules")]
    UnknownStart { symbol: String },

    #[error("chart grew past {limit} items at token {position}")]
    ChartLimitExceeded { limit: usize, position: usize },
}

impl<K: TokenKind> ParseError<K> {
    /// The syntax diagnostic, if this is an ordinary syntax failure.
    #[must_use]
    pub const fn as_syntax(&self) -> Option<&SyntaxError<K>> {
        match self {
            Self::Syntax(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum ForestError {
    #[error("the forest has no root")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(forest::empty)))]
    Empty,

    #[error("node {node} (`{symbol}` over {start}..{end}) has no alternatives")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(forest::no_alternatives)))]
    NoAlternatives {
        node: NodeId,
        symbol: String,
        start: usize,
        end: usize,
    },

    #[error("node {node} (`{symbol}` over {start}..{end}) derives itself")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(forest::cycle)))]
    Cycle {
        node: NodeId,
        symbol: String,
        start: usize,
        end: usize,
    },

    #[error("terminal node {node} refers to token {token}, past the end of the input")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(forest::missing_token)))]
    MissingToken { node: NodeId, token: usize },

    #[error("directions do not describe a parse of this forest: {reason}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(forest::invalid_directions)))]
    InvalidDirections { reason: String },
}

impl ForestError {
    /// Whether this error signals a broken forest rather than caller misuse.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        !matches!(self, Self::InvalidDirections { .. })
    }
}
