use crate::grammar::validate::{compute_nullable, find_cycle, find_undefined};
use crate::grammar::{Cost, Grammar, NonTerminal, Rule, RuleId, Symbol};
use crate::lexer::TokenKind;
use hashbrown::HashMap;
use smallvec::SmallVec;

/// Builder for [`Grammar`].
///
/// Rules are numbered in the order they are added; alternatives of the same
/// nonterminal keep that relative order even when interleaved with rules for
/// other nonterminals.
#[derive(Debug, Clone)]
pub struct GrammarBuilder<K, N>
where
    K: TokenKind,
    N: NonTerminal,
{
    rules: Vec<Rule<K, N>>,
    entry_point: Option<N>,
}

impl<K, N> Default for GrammarBuilder<K, N>
where
    K: TokenKind,
    N: NonTerminal,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, N> GrammarBuilder<K, N>
where
    K: TokenKind,
    N: NonTerminal,
{
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rules: Vec::new(),
            entry_point: None,
        }
    }

    #[must_use]
    pub fn entry_point(mut self, entry: N) -> Self {
        self.entry_point = Some(entry);
        self
    }

    /// Add one alternative for `lhs`.
    #[must_use]
    pub fn rule(
        mut self,
        lhs: N,
        rhs: impl IntoIterator<Item = Symbol<K, N>>,
        cost: Cost,
    ) -> Self {
        self.rules.push(Rule {
            lhs,
            rhs: rhs.into_iter().collect(),
            cost,
        });
        self
    }

    /// Add several alternatives for `lhs` at once, in order.
    #[must_use]
    pub fn alternatives<I, R>(mut self, lhs: &N, alternatives: I) -> Self
    where
        I: IntoIterator<Item = (R, Cost)>,
        R: IntoIterator<Item = Symbol<K, N>>,
    {
        for (rhs, cost) in alternatives {
            self = self.rule(lhs.clone(), rhs, cost);
        }
        self
    }

    /// Validate and freeze the grammar.
    ///
    /// # Errors
    ///
    /// - [`GrammarError::MissingEntryPoint`] when no entry point was set
    /// - [`GrammarError::NoRulesForEntry`] when the entry point has no rules
    /// - [`GrammarError::UndefinedNonTerminal`] when a rule mentions a
    ///   nonterminal that has no rules
    /// - [`GrammarError::Cyclic`] when some nonterminal can derive itself
    ///   without consuming input, which would give it infinitely many
    ///   derivations
    pub fn build(self) -> Result<Grammar<K, N>, GrammarError<N>> {
        let entry_point = self.entry_point.ok_or(GrammarError::MissingEntryPoint)?;

        let mut by_lhs: HashMap<N, SmallVec<[RuleId; 4]>, ahash::RandomState> =
            HashMap::with_hasher(ahash::RandomState::new());
        for (index, rule) in self.rules.iter().enumerate() {
            by_lhs
                .entry(rule.lhs.clone())
                .or_default()
                .push(RuleId::new(index));
        }

        if !by_lhs.contains_key(&entry_point) {
            return Err(GrammarError::NoRulesForEntry(entry_point));
        }
        if let Some((lhs, symbol)) = find_undefined(&self.rules, &by_lhs) {
            return Err(GrammarError::UndefinedNonTerminal { lhs, symbol });
        }

        let nullable = compute_nullable(&self.rules);
        if let Some(cycle) = find_cycle(&self.rules, &nullable) {
            return Err(GrammarError::Cyclic(cycle));
        }

        log::debug!(
            "built grammar with {} rules over {} nonterminals ({} nullable)",
            self.rules.len(),
            by_lhs.len(),
            nullable.len()
        );

        Ok(Grammar {
            rules: self.rules,
            by_lhs,
            nullable,
            entry_point,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError<N: NonTerminal> {
    #[error("missing entry point")]
    MissingEntryPoint,

    #[error("entry point `{}` has no rules", .0.name())]
    NoRulesForEntry(N),

    #[error("undefined nonterminal `{}` used by a rule for `{}`", .symbol.name(), .lhs.name())]
    UndefinedNonTerminal { lhs: N, symbol: N },

    #[error("grammar is cyclic: {}", cycle_names(.0))]
    Cyclic(Vec<N>),
}

fn cycle_names<N: NonTerminal>(cycle: &[N]) -> String {
    let mut names: Vec<_> = cycle.iter().map(NonTerminal::name).collect();
    if let Some(first) = cycle.first() {
        names.push(first.name());
    }
    names.join(" => ")
}
