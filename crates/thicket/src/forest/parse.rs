use super::{Forest, ForestNode, NodeId};
use crate::error::ForestError;
use crate::grammar::{Cost, NonTerminal, RuleId};
use crate::lexer::{Token, TokenKind};
use std::fmt;

/// A node of a materialized derivation tree.
///
/// Unlike forest nodes, parse nodes are never shared: every subtree belongs to
/// exactly one parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParseNode<'f, K: TokenKind, N: NonTerminal> {
    Leaf(&'f Token<K>),
    Branch {
        symbol: &'f N,
        rule: RuleId,
        start: usize,
        end: usize,
        children: Vec<ParseNode<'f, K, N>>,
    },
}

impl<'f, K: TokenKind, N: NonTerminal> ParseNode<'f, K, N> {
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Leaf(_) => &[],
            Self::Branch { children, .. } => children,
        }
    }

    #[must_use]
    pub const fn symbol(&self) -> Option<&'f N> {
        match self {
            Self::Leaf(_) => None,
            Self::Branch { symbol, .. } => Some(*symbol),
        }
    }

    #[must_use]
    pub const fn rule(&self) -> Option<RuleId> {
        match self {
            Self::Leaf(_) => None,
            Self::Branch { rule, .. } => Some(*rule),
        }
    }

    /// Preorder walk over this subtree.
    fn walk(&self) -> impl Iterator<Item = &Self> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children().iter().rev());
            Some(node)
        })
    }
}

impl<K: TokenKind, N: NonTerminal> Drop for ParseNode<'_, K, N> {
    fn drop(&mut self) {
        let Self::Branch { children, .. } = self else {
            return;
        };
        // Unlink descendants onto a heap stack so deep trees drop in constant stack space.
        let mut pending = std::mem::take(children);
        while let Some(mut node) = pending.pop() {
            if let Self::Branch { children, .. } = &mut node {
                pending.append(children);
            }
        }
    }
}

enum Step<'a, 'f, K: TokenKind, N: NonTerminal> {
    Open(&'a ParseNode<'f, K, N>),
    Close,
}

impl<K: TokenKind, N: NonTerminal> fmt::Display for ParseNode<'_, K, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![Step::Open(self)];
        let mut first = true;
        while let Some(step) = stack.pop() {
            let node = match step {
                Step::Close => {
                    f.write_str(")")?;
                    continue;
                }
                Step::Open(node) => node,
            };
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            match node {
                Self::Leaf(token) => f.write_str(token.text())?,
                Self::Branch {
                    symbol, children, ..
                } => {
                    write!(f, "({}", symbol.name())?;
                    stack.push(Step::Close);
                    stack.extend(children.iter().rev().map(Step::Open));
                }
            }
        }
        Ok(())
    }
}

/// One complete derivation of the input, with its total cost.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Parse<'f, K: TokenKind, N: NonTerminal> {
    root: ParseNode<'f, K, N>,
    weight: Cost,
}

impl<'f, K: TokenKind, N: NonTerminal> Parse<'f, K, N> {
    pub(crate) const fn new(root: ParseNode<'f, K, N>, weight: Cost) -> Self {
        Self { root, weight }
    }

    #[must_use]
    pub const fn root(&self) -> &ParseNode<'f, K, N> {
        &self.root
    }

    #[must_use]
    pub fn into_root(self) -> ParseNode<'f, K, N> {
        self.root
    }

    /// Sum of the costs of every rule applied.
    #[must_use]
    pub const fn weight(&self) -> Cost {
        self.weight
    }

    /// Leaves, left to right.
    #[must_use]
    pub fn tokens(&self) -> Vec<&'f Token<K>> {
        self.root
            .walk()
            .filter_map(|node| match node {
                ParseNode::Leaf(token) => Some(*token),
                ParseNode::Branch { .. } => None,
            })
            .collect()
    }

    /// Rules applied, in preorder.
    #[must_use]
    pub fn rules(&self) -> Vec<RuleId> {
        self.root.walk().filter_map(ParseNode::rule).collect()
    }
}

impl<K: TokenKind, N: NonTerminal> fmt::Display for Parse<'_, K, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.root, f)
    }
}

/// A branch whose children are still being built.
struct Frame<'f, K: TokenKind, N: NonTerminal> {
    symbol: &'f N,
    rule: RuleId,
    start: usize,
    end: usize,
    pending: &'f [NodeId],
    children: Vec<ParseNode<'f, K, N>>,
}

impl<'f, K: TokenKind, N: NonTerminal> Frame<'f, K, N> {
    fn into_node(self) -> ParseNode<'f, K, N> {
        ParseNode::Branch {
            symbol: self.symbol,
            rule: self.rule,
            start: self.start,
            end: self.end,
            children: self.children,
        }
    }
}

enum Entered<'f, K: TokenKind, N: NonTerminal> {
    Leaf(ParseNode<'f, K, N>),
    Branch(Frame<'f, K, N>),
}

/// Build the derivation below `id`, asking `choose` which alternative to take
/// at every nonterminal. `choose` sees nodes in preorder and is given the
/// number of alternatives available. Rule costs are added into `weight`.
pub(super) fn materialize<'f, K, N, F>(
    forest: &'f Forest<'_, K, N>,
    id: NodeId,
    choose: &mut F,
    weight: &mut Cost,
) -> Result<ParseNode<'f, K, N>, ForestError>
where
    K: TokenKind,
    N: NonTerminal,
    F: FnMut(NodeId, usize) -> Result<usize, ForestError>,
{
    let mut root = match enter(forest, id, choose, weight)? {
        Entered::Leaf(leaf) => return Ok(leaf),
        Entered::Branch(frame) => frame,
    };
    // Open branches below the root, innermost last.
    let mut stack: Vec<Frame<'f, K, N>> = Vec::new();
    loop {
        let top = stack.last_mut().unwrap_or(&mut root);
        match top.pending.split_first() {
            Some((&child, rest)) => {
                top.pending = rest;
                match enter(forest, child, choose, weight)? {
                    Entered::Leaf(leaf) => top.children.push(leaf),
                    Entered::Branch(frame) => stack.push(frame),
                }
            }
            None => match stack.pop() {
                Some(done) => {
                    let node = done.into_node();
                    stack.last_mut().unwrap_or(&mut root).children.push(node);
                }
                None => return Ok(root.into_node()),
            },
        }
    }
}

fn enter<'f, K, N, F>(
    forest: &'f Forest<'_, K, N>,
    id: NodeId,
    choose: &mut F,
    weight: &mut Cost,
) -> Result<Entered<'f, K, N>, ForestError>
where
    K: TokenKind,
    N: NonTerminal,
    F: FnMut(NodeId, usize) -> Result<usize, ForestError>,
{
    match forest.node(id) {
        ForestNode::Terminal { token } => forest
            .tokens()
            .get(*token)
            .map(|token| Entered::Leaf(ParseNode::Leaf(token)))
            .ok_or(ForestError::MissingToken {
                node: id,
                token: *token,
            }),
        ForestNode::NonTerminal {
            symbol,
            start,
            end,
            alternatives,
        } => {
            if alternatives.is_empty() {
                return Err(forest.no_alternatives(id));
            }
            let index = choose(id, alternatives.len())?;
            let alternative = alternatives
                .get(index)
                .ok_or_else(|| ForestError::InvalidDirections {
                    reason: format!("node {id} has no alternative {index}"),
                })?;
            *weight = weight.saturating_add(forest.grammar().rule(alternative.rule).cost);
            Ok(Entered::Branch(Frame {
                symbol: *symbol,
                rule: alternative.rule,
                start: *start,
                end: *end,
                pending: alternative.children.as_slice(),
                children: Vec::with_capacity(alternative.children.len()),
            }))
        }
    }
}
