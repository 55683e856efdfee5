//! # Parse forests
//!
//! A [`Forest`] holds every derivation of the input at once. It is a graph,
//! not a tree: each nonterminal node stands for "all ways to derive `symbol`
//! over tokens `[start, end)`" and is shared by every derivation that needs
//! it. Nodes live in an arena and are addressed by [`NodeId`]; a lookup keyed
//! by `(symbol, start, end)` guarantees that no two nodes share a key, which
//! keeps the forest polynomial in size while the number of derivations it
//! encodes can be exponential.
//!
//! A node with more than one [`Alternative`] is an ambiguity point. On top of
//! the forest sit three read-only passes:
//!
//! - [`Forest::count_and_price_all_parses`] computes, per node, the cheapest
//!   achievable cost and the number of derivations (memoized in the forest)
//! - [`Forest::construct_cheapest_parse`] materializes one cheapest derivation
//! - [`Forest::construct_next_parse`] enumerates derivations one at a time,
//!   resuming from an explicit [`Directions`] cursor
//!
//! Forests never change after the parser builds them, so the cached pricing
//! can never go stale.

mod enumerate;
mod extract;
mod parse;
mod price;

pub use enumerate::{Choice, Directions, NextParse, Parses};
pub use parse::{Parse, ParseNode};
pub use price::{Price, PriceTable};

use crate::error::ForestError;
use crate::grammar::{Cost, Grammar, NonTerminal, RuleId};
use crate::lexer::{Token, TokenKind};
use hashbrown::HashMap;
use num::BigUint;
use once_cell::sync::OnceCell;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// Handle of a node in a forest's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize), serde(transparent))]
pub struct NodeId(usize);

impl NodeId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One way of deriving a nonterminal node: the rule applied and one child per
/// right-hand-side symbol, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alternative {
    pub rule: RuleId,
    pub children: SmallVec<[NodeId; 4]>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForestNode<'g, N> {
    /// A single token, by index into the forest's token slice
    Terminal { token: usize },
    /// All derivations of `symbol` over tokens `[start, end)`
    NonTerminal {
        symbol: &'g N,
        start: usize,
        end: usize,
        alternatives: Vec<Alternative>,
    },
}

impl<'g, N> ForestNode<'g, N> {
    /// Token span `[start, end)` covered by this node.
    #[must_use]
    pub const fn span(&self) -> (usize, usize) {
        match self {
            Self::Terminal { token } => (*token, *token + 1),
            Self::NonTerminal { start, end, .. } => (*start, *end),
        }
    }

    /// Alternatives of a nonterminal node; empty for terminals.
    #[must_use]
    pub fn alternatives(&self) -> &[Alternative] {
        match self {
            Self::Terminal { .. } => &[],
            Self::NonTerminal { alternatives, .. } => alternatives,
        }
    }

    #[must_use]
    pub const fn symbol(&self) -> Option<&'g N> {
        match self {
            Self::Terminal { .. } => None,
            Self::NonTerminal { symbol, .. } => Some(*symbol),
        }
    }

    #[must_use]
    pub fn is_ambiguous(&self) -> bool {
        self.alternatives().len() > 1
    }
}

/// Size figures for a forest and the chart it came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForestStats {
    pub tokens: usize,
    pub chart_items: usize,
    pub nodes: usize,
    pub alternatives: usize,
    pub ambiguity_points: usize,
}

type NodeKey<'g, N> = (&'g N, usize, usize);

/// Shared parse forest over a token sequence.
///
/// Node spans are token indices into [`Forest::tokens`].
#[derive(Debug)]
pub struct Forest<'g, K, N>
where
    K: TokenKind,
    N: NonTerminal,
{
    grammar: &'g Grammar<K, N>,
    tokens: Arc<[Token<K>]>,
    nodes: Vec<ForestNode<'g, N>>,
    keys: HashMap<NodeKey<'g, N>, NodeId, ahash::RandomState>,
    root: Option<NodeId>,
    chart_items: usize,
    pricing: OnceCell<PriceTable>,
}

impl<'g, K, N> Forest<'g, K, N>
where
    K: TokenKind,
    N: NonTerminal,
{
    /// A forest with no root and no derivations.
    #[must_use]
    pub fn empty(grammar: &'g Grammar<K, N>) -> Self {
        ForestBuilder::new(grammar, Arc::from(Vec::new())).finish(None, 0)
    }

    #[must_use]
    pub const fn grammar(&self) -> &'g Grammar<K, N> {
        self.grammar
    }

    #[must_use]
    pub const fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// # Panics
    ///
    /// Panics if `id` does not belong to this forest.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &ForestNode<'g, N> {
        &self.nodes[id.0]
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &ForestNode<'g, N>)> {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }

    /// Number of nodes, terminals included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn tokens(&self) -> &[Token<K>] {
        &self.tokens
    }

    /// The nonterminal node for `symbol` over `[start, end)`, if any.
    #[must_use]
    pub fn lookup(&self, symbol: &N, start: usize, end: usize) -> Option<NodeId> {
        self.keys.get(&(symbol, start, end)).copied()
    }

    /// Nodes with more than one alternative, in arena order.
    #[must_use]
    pub fn ambiguity_points(&self) -> Vec<NodeId> {
        self.nodes()
            .filter(|(_, node)| node.is_ambiguous())
            .map(|(id, _)| id)
            .collect()
    }

    #[must_use]
    pub fn stats(&self) -> ForestStats {
        ForestStats {
            tokens: self.tokens.len(),
            chart_items: self.chart_items,
            nodes: self.nodes.len(),
            alternatives: self.nodes.iter().map(|n| n.alternatives().len()).sum(),
            ambiguity_points: self.ambiguity_points().len(),
        }
    }

    /// Price every node: cheapest cost and derivation count.
    ///
    /// The table is computed on first use and cached; later calls return the
    /// same table.
    ///
    /// # Errors
    ///
    /// [`ForestError::NoAlternatives`] or [`ForestError::Cycle`] if the forest
    /// is malformed.
    pub fn count_and_price_all_parses(&self) -> Result<&PriceTable, ForestError> {
        self.pricing.get_or_try_init(|| price::price(self))
    }

    /// Recompute the pricing table, bypassing the cache.
    ///
    /// # Errors
    ///
    /// Same as [`Forest::count_and_price_all_parses`].
    pub fn price_uncached(&self) -> Result<PriceTable, ForestError> {
        price::price(self)
    }

    #[must_use]
    pub fn is_priced(&self) -> bool {
        self.pricing.get().is_some()
    }

    /// Pricing of the root node, pricing the forest first if needed.
    ///
    /// # Errors
    ///
    /// Same as [`Forest::count_and_price_all_parses`].
    pub fn root_price(&self) -> Result<Option<&Price>, ForestError> {
        let table = self.count_and_price_all_parses()?;
        Ok(self.root.and_then(|root| table.get(root)))
    }

    /// Number of distinct derivations; zero for an empty forest.
    ///
    /// # Errors
    ///
    /// Same as [`Forest::count_and_price_all_parses`].
    pub fn count_all_parses(&self) -> Result<BigUint, ForestError> {
        Ok(self
            .root_price()?
            .map_or_else(BigUint::default, |price| price.count.clone()))
    }

    /// Cost of the cheapest derivation, or `None` for an empty forest.
    ///
    /// # Errors
    ///
    /// Same as [`Forest::count_and_price_all_parses`].
    pub fn min_cost(&self) -> Result<Option<Cost>, ForestError> {
        Ok(self.root_price()?.map(|price| price.min_cost))
    }

    /// Materialize one cheapest derivation. Ties go to the earliest-declared
    /// alternative.
    ///
    /// # Errors
    ///
    /// [`ForestError::Empty`] if there is no root, or a consistency fault.
    pub fn construct_cheapest_parse(&self) -> Result<Parse<'_, K, N>, ForestError> {
        extract::cheapest(self)
    }

    /// The derivation following `directions`, or the first one when
    /// `directions` is `None`. `Ok(None)` means enumeration is exhausted.
    ///
    /// # Errors
    ///
    /// [`ForestError::InvalidDirections`] if `directions` came from a
    /// different forest, or a consistency fault.
    pub fn construct_next_parse(
        &self,
        directions: Option<&Directions>,
    ) -> Result<Option<NextParse<'_, K, N>>, ForestError> {
        enumerate::next_parse(self, directions)
    }

    /// Iterate over every derivation in enumeration order.
    #[must_use]
    pub fn parses(&self) -> Parses<'_, 'g, K, N> {
        Parses::new(self)
    }

    pub(crate) fn fault_context(&self, id: NodeId) -> (String, usize, usize) {
        let node = self.node(id);
        let (start, end) = node.span();
        let symbol = node
            .symbol()
            .map_or_else(|| "<token>".to_string(), |s| s.name().to_string());
        (symbol, start, end)
    }

    pub(crate) fn no_alternatives(&self, node: NodeId) -> ForestError {
        let (symbol, start, end) = self.fault_context(node);
        ForestError::NoAlternatives {
            node,
            symbol,
            start,
            end,
        }
    }

    pub(crate) fn cycle(&self, node: NodeId) -> ForestError {
        let (symbol, start, end) = self.fault_context(node);
        ForestError::Cycle {
            node,
            symbol,
            start,
            end,
        }
    }
}

/// Arena under construction. Only the chart parser (and tests) build forests.
pub(crate) struct ForestBuilder<'g, K, N>
where
    K: TokenKind,
    N: NonTerminal,
{
    grammar: &'g Grammar<K, N>,
    tokens: Arc<[Token<K>]>,
    nodes: Vec<ForestNode<'g, N>>,
    keys: HashMap<NodeKey<'g, N>, NodeId, ahash::RandomState>,
    terminals: HashMap<usize, NodeId, ahash::RandomState>,
}

impl<'g, K, N> ForestBuilder<'g, K, N>
where
    K: TokenKind,
    N: NonTerminal,
{
    pub(crate) fn new(grammar: &'g Grammar<K, N>, tokens: Arc<[Token<K>]>) -> Self {
        Self {
            grammar,
            tokens,
            nodes: Vec::new(),
            keys: HashMap::with_hasher(ahash::RandomState::new()),
            terminals: HashMap::with_hasher(ahash::RandomState::new()),
        }
    }

    /// The node for the token at `token`, created on first use.
    pub(crate) fn terminal(&mut self, token: usize) -> NodeId {
        if let Some(&id) = self.terminals.get(&token) {
            return id;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(ForestNode::Terminal { token });
        self.terminals.insert(token, id);
        id
    }

    /// The node for `(symbol, start, end)` and whether it was just created.
    pub(crate) fn nonterminal(&mut self, symbol: &'g N, start: usize, end: usize) -> (NodeId, bool) {
        if let Some(&id) = self.keys.get(&(symbol, start, end)) {
            return (id, false);
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(ForestNode::NonTerminal {
            symbol,
            start,
            end,
            alternatives: Vec::new(),
        });
        self.keys.insert((symbol, start, end), id);
        (id, true)
    }

    pub(crate) fn push_alternative(&mut self, id: NodeId, alternative: Alternative) {
        if let ForestNode::NonTerminal { alternatives, .. } = &mut self.nodes[id.0] {
            alternatives.push(alternative);
        }
    }

    pub(crate) fn finish(self, root: Option<NodeId>, chart_items: usize) -> Forest<'g, K, N> {
        Forest {
            grammar: self.grammar,
            tokens: self.tokens,
            nodes: self.nodes,
            keys: self.keys,
            root,
            chart_items,
            pricing: OnceCell::new(),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! A tiny grammar for hand-built forests.

    use crate::grammar::{Grammar, GrammarBuilder, NonTerminal, Symbol};
    use crate::lexer::{Token, TokenKind};
    use crate::syntax::{Span, TextRange, TextSize};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Kind {
        X,
    }

    impl TokenKind for Kind {}

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub enum Nt {
        S,
        A,
    }

    impl NonTerminal for Nt {
        fn name(&self) -> &str {
            match self {
                Self::S => "S",
                Self::A => "A",
            }
        }
    }

    /// `S -> A [3] | X [1]`, `A -> X [0]`
    pub fn grammar() -> Grammar<Kind, Nt> {
        GrammarBuilder::new()
            .entry_point(Nt::S)
            .rule(Nt::S, [Symbol::nt(Nt::A)], 3)
            .rule(Nt::S, [Symbol::t(Kind::X)], 1)
            .rule(Nt::A, [Symbol::t(Kind::X)], 0)
            .build()
            .expect("valid grammar")
    }

    pub fn tokens(count: usize) -> Vec<Token<Kind>> {
        (0..count)
            .map(|i| {
                let start = TextSize::of(i);
                let column = u32::try_from(i + 1).unwrap_or(u32::MAX);
                Token::new(Kind::X, "x", Span::new(TextRange::at(start, TextSize::from(1)), 1, column))
            })
            .collect()
    }
}
