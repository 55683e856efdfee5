//! # Chart Parser
//!
//! Earley recognition over a [`TokenStream`], followed by construction of the
//! shared parse [`Forest`].
//!
//! The chart holds one item set per input position. Each set is closed under
//! prediction and completion before the next token is scanned. Nullable
//! nonterminals are stepped over at prediction time, so grammars with empty
//! rules need no special handling during completion.
//!
//! Recognition fails at the first token that leaves the next item set empty,
//! or at end of input when no item for the start symbol spans everything. In
//! both cases the [`SyntaxError`] names the position, the token found there
//! and the terminals that would have been accepted.
//!
//! ## Example
//!
//! ```rust,ignore
//! use thicket::parser::{ChartParser, ParserConfig};
//!
//! let parser = ChartParser::new(&grammar, ParserConfig::default());
//! let forest = parser.parse(&mut stream)?;
//! println!("{} parses", forest.count_all_parses()?);
//! ```

mod build;
mod chart;
mod config;

pub use config::ParserConfig;

use crate::error::{ParseError, SyntaxError};
use crate::forest::Forest;
use crate::grammar::{Grammar, NonTerminal, Symbol};
use crate::lexer::{Token, TokenKind, TokenStream};
use crate::syntax::Span;
use build::ForestConstruction;
use chart::{Chart, Item};
use hashbrown::HashSet;
use log::{debug, trace};

/// Earley chart parser producing shared parse forests
#[derive(Debug, Clone)]
pub struct ChartParser<'g, K, N>
where
    K: TokenKind,
    N: NonTerminal,
{
    grammar: &'g Grammar<K, N>,
    config: ParserConfig,
}

impl<'g, K, N> ChartParser<'g, K, N>
where
    K: TokenKind,
    N: NonTerminal,
{
    #[must_use]
    pub const fn new(grammar: &'g Grammar<K, N>, config: ParserConfig) -> Self {
        Self { grammar, config }
    }

    #[must_use]
    pub const fn grammar(&self) -> &'g Grammar<K, N> {
        self.grammar
    }

    #[must_use]
    pub const fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse the rest of `stream` as the grammar's entry point.
    ///
    /// # Errors
    ///
    /// See [`ChartParser::parse_from`].
    pub fn parse(&self, stream: &mut TokenStream<K>) -> Result<Forest<'g, K, N>, ParseError<K>> {
        self.parse_from(stream, self.grammar.entry_point())
    }

    /// Parse the rest of `stream` as `start`.
    ///
    /// On success the stream is at its end. On a syntax failure it is left at
    /// the token that could not be scanned, or at the end when the input
    /// stopped too early.
    ///
    /// # Errors
    ///
    /// - [`ParseError::Syntax`] when the tokens are not a sentence of `start`
    /// - [`ParseError::UnknownStart`] when `start` has no rules
    /// - [`ParseError::ChartLimitExceeded`] when the chart outgrows
    ///   [`ParserConfig::max_items`]
    pub fn parse_from(
        &self,
        stream: &mut TokenStream<K>,
        start: &N,
    ) -> Result<Forest<'g, K, N>, ParseError<K>> {
        let Some((_, first)) = self.grammar.alternatives(start).next() else {
            return Err(ParseError::UnknownStart {
                symbol: start.name().to_string(),
            });
        };
        let start = &first.lhs;

        let tokens = stream.shared_tokens();
        let base = stream.position();
        let input = &tokens[base.min(tokens.len())..];
        debug!("parsing {} tokens as `{}`", input.len(), start.name());

        let mut recognizer = Recognizer {
            grammar: self.grammar,
            config: &self.config,
            base,
            chart: Chart::new(input.len()),
        };
        for (rule, _) in self.grammar.alternatives(start) {
            recognizer.add(0, Item::new(rule, 0))?;
        }

        for (position, token) in input.iter().enumerate() {
            recognizer.close(position)?;
            trace!(
                "position {}: {} items",
                base + position,
                recognizer.chart.set(position).len()
            );
            recognizer.scan(position, token)?;
            if recognizer.chart.set(position + 1).is_empty() {
                let err = recognizer.failure(position, Some(token), token.span);
                debug!("parse failed: {err}");
                return Err(err.into());
            }
            stream.next();
        }

        let end = input.len();
        recognizer.close(end)?;
        if !recognizer.accepts(start, end) {
            let err = recognizer.failure(end, None, stream.end_span());
            debug!("parse failed: {err}");
            return Err(err.into());
        }

        let forest = ForestConstruction::new(self.grammar, &recognizer.chart, tokens, base).build(start);
        let stats = forest.stats();
        debug!(
            "parsed {} tokens: {} chart items, {} forest nodes, {} ambiguity points",
            stats.tokens.saturating_sub(base),
            stats.chart_items,
            stats.nodes,
            stats.ambiguity_points
        );
        Ok(forest)
    }
}

/// Chart under construction for one parse
struct Recognizer<'p, 'g, K, N>
where
    K: TokenKind,
    N: NonTerminal,
{
    grammar: &'g Grammar<K, N>,
    config: &'p ParserConfig,
    base: usize,
    chart: Chart,
}

impl<K, N> Recognizer<'_, '_, K, N>
where
    K: TokenKind,
    N: NonTerminal,
{
    fn add(&mut self, position: usize, item: Item) -> Result<(), ParseError<K>> {
        if self.chart.add(position, item) {
            if let Some(limit) = self.config.max_items {
                if self.chart.total_items() > limit {
                    debug!("chart limit of {limit} items exceeded");
                    return Err(ParseError::ChartLimitExceeded {
                        limit,
                        position: self.base + position,
                    });
                }
            }
        }
        Ok(())
    }

    fn next_symbol(&self, item: Item) -> Option<&Symbol<K, N>> {
        self.grammar.rule(item.rule).rhs.get(item.dot)
    }

    /// Close the set at `position` under prediction and completion.
    fn close(&mut self, position: usize) -> Result<(), ParseError<K>> {
        let grammar = self.grammar;
        let mut index = 0;
        while let Some(item) = self.chart.set(position).get(index) {
            index += 1;
            let rule = grammar.rule(item.rule);
            match rule.rhs.get(item.dot) {
                Some(Symbol::NonTerminal(next)) => {
                    for (id, _) in grammar.alternatives(next) {
                        self.add(position, Item::new(id, position))?;
                    }
                    if grammar.is_nullable(next) {
                        self.add(position, item.advance())?;
                    }
                }
                Some(Symbol::Terminal(_)) => {}
                None => self.complete(position, item.origin, &rule.lhs)?,
            }
        }
        Ok(())
    }

    /// Advance every item at `origin` waiting on `lhs` into `position`.
    fn complete(&mut self, position: usize, origin: usize, lhs: &N) -> Result<(), ParseError<K>> {
        let mut index = 0;
        while let Some(parent) = self.chart.set(origin).get(index) {
            index += 1;
            let waiting = matches!(
                self.next_symbol(parent),
                Some(Symbol::NonTerminal(next)) if next == lhs
            );
            if waiting {
                self.add(position, parent.advance())?;
            }
        }
        Ok(())
    }

    fn scan(&mut self, position: usize, token: &Token<K>) -> Result<(), ParseError<K>> {
        let advanced: Vec<Item> = self
            .chart
            .set(position)
            .iter()
            .filter(|&item| matches!(self.next_symbol(item), Some(Symbol::Terminal(kind)) if *kind == token.kind))
            .map(Item::advance)
            .collect();
        for item in advanced {
            self.add(position + 1, item)?;
        }
        Ok(())
    }

    fn accepts(&self, start: &N, end: usize) -> bool {
        self.chart.set(end).iter().any(|item| {
            let rule = self.grammar.rule(item.rule);
            item.origin == 0 && item.dot == rule.rhs.len() && rule.lhs == *start
        })
    }

    /// Terminals some item at `position` is waiting for, in discovery order.
    fn expected(&self, position: usize) -> Vec<K> {
        if !self.config.collect_expected {
            return Vec::new();
        }
        let mut seen = HashSet::with_hasher(ahash::RandomState::new());
        self.chart
            .set(position)
            .iter()
            .filter_map(|item| match self.next_symbol(item) {
                Some(Symbol::Terminal(kind)) => Some(*kind),
                _ => None,
            })
            .filter(|kind| seen.insert(*kind))
            .collect()
    }

    fn failure(&self, position: usize, found: Option<&Token<K>>, span: Span) -> SyntaxError<K> {
        SyntaxError {
            position: self.base + position,
            found: found.cloned(),
            span,
            expected: self.expected(position),
        }
    }
}
