use crate::error::LexError;
use crate::lexer::{Token, TokenKind, Tokenizer};
use crate::syntax::{LineIndex, Span};
use std::sync::Arc;

/// A cursor over positioned tokens.
///
/// The stream is what the chart parser consumes: it advances one token per
/// scanned input position, so after a failed parse [`cur_tok`](Self::cur_tok)
/// is the token the parser could not accept (or `None` at end of input).
///
/// Trivia tokens (see [`TokenKind::is_trivia`]) are dropped when the stream
/// is primed.
#[derive(Debug, Clone)]
pub struct TokenStream<K: TokenKind> {
    tokens: Arc<[Token<K>]>,
    position: usize,
    end: Span,
}

impl<K: TokenKind> Default for TokenStream<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: TokenKind> TokenStream<K> {
    /// An empty stream.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tokens: Arc::from(Vec::new()),
            position: 0,
            end: Span::default(),
        }
    }

    /// Build a stream from already-lexed tokens.
    ///
    /// The end-of-input position is placed right after the last token.
    #[must_use]
    pub fn from_tokens(tokens: Vec<Token<K>>) -> Self {
        let tokens: Vec<_> = tokens.into_iter().filter(|t| !t.kind.is_trivia()).collect();
        let end = tokens.last().map_or_else(Span::default, |last| {
            let width = u32::try_from(last.text.chars().count()).unwrap_or(u32::MAX);
            Span::point(
                last.span.range.end(),
                last.span.line,
                last.span.column.saturating_add(width),
            )
        });
        Self {
            tokens: tokens.into(),
            position: 0,
            end,
        }
    }

    /// Prime the stream by running `tokenizer` over `text`.
    ///
    /// Any previous contents are discarded and the cursor is rewound.
    ///
    /// # Errors
    ///
    /// Returns the tokenizer's [`LexError`]; the stream is left untouched.
    pub fn tokenize_from<T>(&mut self, tokenizer: &T, text: &str) -> Result<(), LexError>
    where
        T: Tokenizer<K> + ?Sized,
    {
        let tokens = tokenizer.tokenize(text)?;
        let tokens: Vec<_> = tokens.into_iter().filter(|t| !t.kind.is_trivia()).collect();
        log::trace!("tokenized {} bytes into {} tokens", text.len(), tokens.len());
        self.tokens = tokens.into();
        self.position = 0;
        self.end = LineIndex::new(text).end_span();
        Ok(())
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.position < self.tokens.len()
    }

    /// Consume the current token and return it.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&Token<K>> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }

    /// The lookahead token, or `None` once the input is exhausted.
    #[must_use]
    pub fn cur_tok(&self) -> Option<&Token<K>> {
        self.tokens.get(self.position)
    }

    /// Index of the lookahead token.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Span of the lookahead token, or the end-of-input span.
    #[must_use]
    pub fn current_span(&self) -> Span {
        self.cur_tok().map_or(self.end, |t| t.span)
    }

    #[must_use]
    pub const fn end_span(&self) -> Span {
        self.end
    }

    /// Every token in the stream, consumed or not.
    #[must_use]
    pub fn tokens(&self) -> &[Token<K>] {
        &self.tokens
    }

    /// Rewind to the first token.
    pub fn reset(&mut self) {
        self.position = 0;
    }

    pub(crate) fn shared_tokens(&self) -> Arc<[Token<K>]> {
        Arc::clone(&self.tokens)
    }
}
