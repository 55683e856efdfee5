//! # Token boundary
//!
//! Lexing itself is not part of this crate. A caller supplies a
//! [`Tokenizer`] (or ready-made tokens) and the parser consumes the resulting
//! [`TokenStream`].

mod stream;
mod token;

pub use stream::TokenStream;
pub use token::Token;

use crate::error::LexError;

/// Trait for terminal kinds.
///
/// Grammars match tokens by kind only; the token text is carried along for
/// display and diagnostics.
pub trait TokenKind: Copy + std::fmt::Debug + std::hash::Hash + Eq + Send + Sync + 'static {
    /// Whether tokens of this kind are skipped before parsing (whitespace,
    /// comments).
    fn is_trivia(self) -> bool {
        false
    }

    /// Name used in diagnostics. Defaults to the `Debug` form.
    fn display_name(self) -> String {
        format!("{self:?}")
    }
}

/// Turns source text into positioned tokens.
pub trait Tokenizer<K: TokenKind> {
    /// # Errors
    ///
    /// Returns a [`LexError`] at the first input the tokenizer cannot read.
    fn tokenize(&self, text: &str) -> Result<Vec<Token<K>>, LexError>;
}
