//! # Grammar Module
//!
//! Rule tables for (possibly ambiguous) context-free grammars.
//!
//! ## Overview
//!
//! A [`Grammar`] is an immutable table of [`Rule`]s. Each rule rewrites one
//! nonterminal into a sequence of [`Symbol`]s and carries a [`Cost`]: the
//! price paid for choosing that alternative when disambiguating. Rules are
//! grouped by their left-hand side in declaration order, and that order is the
//! tie-break priority: an earlier alternative beats a later one of equal cost.
//!
//! Grammars are built with [`GrammarBuilder`], which validates them, and are
//! then shared by reference with every parse.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use thicket::grammar::{GrammarBuilder, Symbol};
//!
//! // E -> E '+' E [1] | E '*' E [1] | num [0]
//! let grammar = GrammarBuilder::new()
//!     .entry_point(Nt::E)
//!     .rule(Nt::E, [Symbol::nt(Nt::E), Symbol::t(Kind::Plus), Symbol::nt(Nt::E)], 1)
//!     .rule(Nt::E, [Symbol::nt(Nt::E), Symbol::t(Kind::Star), Symbol::nt(Nt::E)], 1)
//!     .rule(Nt::E, [Symbol::t(Kind::Num)], 0)
//!     .build()?;
//! ```

mod builder;
mod validate;

pub use builder::{GrammarBuilder, GrammarError};

use crate::lexer::TokenKind;
use hashbrown::{HashMap, HashSet};
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Disambiguation weight of a rule. Lower is preferred; costs of the rules
/// applied in a derivation are summed.
pub type Cost = u64;

/// Trait for nonterminal types
pub trait NonTerminal: Clone + std::fmt::Debug + std::hash::Hash + Eq + Send + Sync + 'static {
    /// Get the name of this nonterminal
    fn name(&self) -> &str;
}

/// A right-hand-side symbol
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Symbol<K, N> {
    Terminal(K),
    NonTerminal(N),
}

impl<K, N> Symbol<K, N> {
    #[must_use]
    pub const fn t(kind: K) -> Self {
        Self::Terminal(kind)
    }

    #[must_use]
    pub const fn nt(symbol: N) -> Self {
        Self::NonTerminal(symbol)
    }

    #[must_use]
    pub const fn as_nonterminal(&self) -> Option<&N> {
        match self {
            Self::NonTerminal(n) => Some(n),
            Self::Terminal(_) => None,
        }
    }
}

/// Index of a rule in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct RuleId(u32);

impl RuleId {
    pub(crate) fn new(index: usize) -> Self {
        Self(u32::try_from(index).unwrap_or(u32::MAX))
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// Production rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule<K, N> {
    pub lhs: N,
    pub rhs: Vec<Symbol<K, N>>,
    pub cost: Cost,
}

impl<K: TokenKind, N: NonTerminal> fmt::Display for Rule<K, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ->", self.lhs.name())?;
        if self.rhs.is_empty() {
            write!(f, " ε")?;
        }
        for symbol in &self.rhs {
            match symbol {
                Symbol::Terminal(k) => write!(f, " '{}'", k.display_name())?,
                Symbol::NonTerminal(n) => write!(f, " {}", n.name())?,
            }
        }
        write!(f, " [{}]", self.cost)
    }
}

/// A validated, immutable rule table.
#[derive(Debug, Clone)]
pub struct Grammar<K, N>
where
    K: TokenKind,
    N: NonTerminal,
{
    rules: Vec<Rule<K, N>>,
    by_lhs: HashMap<N, SmallVec<[RuleId; 4]>, ahash::RandomState>,
    nullable: HashSet<N, ahash::RandomState>,
    entry_point: N,
}

impl<K, N> Grammar<K, N>
where
    K: TokenKind,
    N: NonTerminal,
{
    #[must_use]
    pub const fn entry_point(&self) -> &N {
        &self.entry_point
    }

    /// The rule with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this grammar.
    #[must_use]
    pub fn rule(&self, id: RuleId) -> &Rule<K, N> {
        &self.rules[id.index()]
    }

    /// All rules in declaration order.
    pub fn rules(&self) -> impl Iterator<Item = (RuleId, &Rule<K, N>)> {
        self.rules
            .iter()
            .enumerate()
            .map(|(i, rule)| (RuleId::new(i), rule))
    }

    /// The alternatives for `lhs`, in declaration order.
    pub fn alternatives<'a>(
        &'a self,
        lhs: &N,
    ) -> impl Iterator<Item = (RuleId, &'a Rule<K, N>)> + 'a {
        self.by_lhs
            .get(lhs)
            .map(|ids| ids.as_slice())
            .unwrap_or_default()
            .iter()
            .map(move |&id| (id, self.rule(id)))
    }

    #[must_use]
    pub fn has_rules(&self, lhs: &N) -> bool {
        self.by_lhs.contains_key(lhs)
    }

    /// Whether `symbol` can derive the empty string.
    #[must_use]
    pub fn is_nullable(&self, symbol: &N) -> bool {
        self.nullable.contains(symbol)
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
