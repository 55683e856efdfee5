//! Forest construction from a finished chart.

use super::chart::{Chart, Item};
use crate::forest::{Alternative, Forest, ForestBuilder, NodeId};
use crate::grammar::{Grammar, NonTerminal, Rule, RuleId, Symbol};
use crate::lexer::{Token, TokenKind};
use hashbrown::{HashMap, HashSet};
use smallvec::SmallVec;
use std::sync::Arc;

/// Complete items of a chart, keyed by rule and by left-hand side.
struct CompletionIndex<'g, N> {
    rules: HashSet<(RuleId, usize, usize), ahash::RandomState>,
    /// Origins of every completed `symbol` ending at a position, ascending.
    origins: HashMap<(&'g N, usize), SmallVec<[usize; 4]>, ahash::RandomState>,
}

impl<'g, N: NonTerminal> CompletionIndex<'g, N> {
    fn new<K: TokenKind>(grammar: &'g Grammar<K, N>, chart: &Chart) -> Self {
        let mut rules = HashSet::with_hasher(ahash::RandomState::new());
        let mut origins: HashMap<_, SmallVec<[usize; 4]>, _> =
            HashMap::with_hasher(ahash::RandomState::new());
        for end in 0..chart.len() {
            for item in chart.set(end).iter() {
                let rule = grammar.rule(item.rule);
                if item.dot == rule.rhs.len() {
                    rules.insert((item.rule, item.origin, end));
                    origins.entry((&rule.lhs, end)).or_default().push(item.origin);
                }
            }
        }
        for starts in origins.values_mut() {
            starts.sort_unstable();
            starts.dedup();
        }
        Self { rules, origins }
    }

    fn completed(&self, rule: RuleId, start: usize, end: usize) -> bool {
        self.rules.contains(&(rule, start, end))
    }

    /// Every `start` such that `symbol` derives `[start, end)`.
    fn origins(&self, symbol: &'g N, end: usize) -> &[usize] {
        self.origins
            .get(&(symbol, end))
            .map_or(&[][..], |starts| starts.as_slice())
    }
}

/// Walks a recognized chart top-down and builds the shared forest.
///
/// Chart positions are relative to `base`, the stream position the parse
/// started at; forest spans and terminal indices are absolute.
pub(super) struct ForestConstruction<'c, 'g, K, N>
where
    K: TokenKind,
    N: NonTerminal,
{
    grammar: &'g Grammar<K, N>,
    chart: &'c Chart,
    tokens: Arc<[Token<K>]>,
    base: usize,
    index: CompletionIndex<'g, N>,
}

impl<'c, 'g, K, N> ForestConstruction<'c, 'g, K, N>
where
    K: TokenKind,
    N: NonTerminal,
{
    pub(super) fn new(
        grammar: &'g Grammar<K, N>,
        chart: &'c Chart,
        tokens: Arc<[Token<K>]>,
        base: usize,
    ) -> Self {
        Self {
            grammar,
            chart,
            tokens,
            base,
            index: CompletionIndex::new(grammar, chart),
        }
    }

    /// Build the forest rooted at `start` over the whole chart.
    pub(super) fn build(self, start: &'g N) -> Forest<'g, K, N> {
        let end = self.chart.len() - 1;
        let mut builder = ForestBuilder::new(self.grammar, Arc::clone(&self.tokens));
        let (root, _) = builder.nonterminal(start, self.base, self.base + end);

        let mut work: Vec<(NodeId, &'g N, usize, usize)> = vec![(root, start, 0, end)];
        while let Some((id, symbol, from, to)) = work.pop() {
            for (rule_id, rule) in self.grammar.alternatives(symbol) {
                if !self.index.completed(rule_id, from, to) {
                    continue;
                }
                for split in self.splits(rule_id, rule, from, to) {
                    let mut children = SmallVec::with_capacity(rule.rhs.len());
                    for (k, rhs) in rule.rhs.iter().enumerate() {
                        let (left, right) = (split[k], split[k + 1]);
                        match rhs {
                            Symbol::Terminal(_) => children.push(builder.terminal(self.base + left)),
                            Symbol::NonTerminal(child) => {
                                let (node, created) =
                                    builder.nonterminal(child, self.base + left, self.base + right);
                                if created {
                                    work.push((node, child, left, right));
                                }
                                children.push(node);
                            }
                        }
                    }
                    builder.push_alternative(
                        id,
                        Alternative {
                            rule: rule_id,
                            children,
                        },
                    );
                }
            }
        }

        builder.finish(Some(root), self.chart.total_items())
    }

    /// Every way to split `[from, to)` over the right-hand side of `rule`
    /// that the chart justifies, as boundary lists `b` where symbol `k` spans
    /// `[b[k], b[k + 1])`. Sorted ascending.
    fn splits(&self, rule_id: RuleId, rule: &'g Rule<K, N>, from: usize, to: usize) -> Vec<Vec<usize>> {
        let mut splits = Vec::new();
        // Boundaries are collected right to left.
        let mut stack: Vec<(usize, Vec<usize>)> = vec![(rule.rhs.len(), vec![to])];
        while let Some((dot, boundaries)) = stack.pop() {
            let Some(&end) = boundaries.last() else {
                continue;
            };
            if dot == 0 {
                if end == from {
                    let mut split = boundaries;
                    split.reverse();
                    splits.push(split);
                }
                continue;
            }
            let prefix = Item {
                rule: rule_id,
                dot: dot - 1,
                origin: from,
            };
            match &rule.rhs[dot - 1] {
                Symbol::Terminal(kind) => {
                    if end == 0 || end - 1 < from {
                        continue;
                    }
                    let matches = self
                        .tokens
                        .get(self.base + end - 1)
                        .is_some_and(|token| token.kind == *kind);
                    if matches && self.chart.contains(end - 1, &prefix) {
                        let mut next = boundaries;
                        next.push(end - 1);
                        stack.push((dot - 1, next));
                    }
                }
                Symbol::NonTerminal(symbol) => {
                    for &mid in self.index.origins(symbol, end) {
                        if mid >= from && self.chart.contains(mid, &prefix) {
                            let mut next = boundaries.clone();
                            next.push(mid);
                            stack.push((dot - 1, next));
                        }
                    }
                }
            }
        }
        splits.sort_unstable();
        splits
    }
}
