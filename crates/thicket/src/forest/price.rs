use super::{Forest, ForestNode, NodeId};
use crate::error::ForestError;
use crate::grammar::{Cost, NonTerminal};
use crate::lexer::TokenKind;
use num::{BigUint, One, Zero};

/// Pricing of one node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Price {
    /// Cheapest cost of any derivation below this node
    pub min_cost: Cost,
    /// Number of distinct derivations below this node
    pub count: BigUint,
    /// First alternative achieving `min_cost`; `None` for terminals
    pub best: Option<usize>,
}

impl Price {
    fn terminal() -> Self {
        Self {
            min_cost: 0,
            count: BigUint::one(),
            best: None,
        }
    }
}

/// Prices of every node in a forest, indexed by [`NodeId`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceTable {
    prices: Vec<Price>,
}

impl PriceTable {
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Price> {
        self.prices.get(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Price)> {
        self.prices.iter().enumerate().map(|(i, price)| (NodeId(i), price))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Visiting,
    Done,
}

enum Frame {
    Enter(NodeId),
    Exit(NodeId),
}

/// Bottom-up pricing of every node, children before parents.
pub(super) fn price<K, N>(forest: &Forest<'_, K, N>) -> Result<PriceTable, ForestError>
where
    K: TokenKind,
    N: NonTerminal,
{
    let len = forest.len();
    let mut marks = vec![Mark::Unvisited; len];
    let mut prices: Vec<Option<Price>> = vec![None; len];
    let mut stack = Vec::new();

    for first in 0..len {
        if marks[first] != Mark::Unvisited {
            continue;
        }
        stack.push(Frame::Enter(NodeId(first)));
        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Enter(id) => match marks[id.0] {
                    Mark::Done => {}
                    Mark::Visiting => return Err(forest.cycle(id)),
                    Mark::Unvisited => {
                        marks[id.0] = Mark::Visiting;
                        stack.push(Frame::Exit(id));
                        for alternative in forest.node(id).alternatives().iter().rev() {
                            for &child in alternative.children.iter().rev() {
                                match marks[child.0] {
                                    Mark::Done => {}
                                    Mark::Visiting => return Err(forest.cycle(child)),
                                    Mark::Unvisited => stack.push(Frame::Enter(child)),
                                }
                            }
                        }
                    }
                },
                Frame::Exit(id) => {
                    prices[id.0] = Some(price_node(forest, id, &prices)?);
                    marks[id.0] = Mark::Done;
                }
            }
        }
    }

    let prices = prices
        .into_iter()
        .enumerate()
        .map(|(i, price)| price.ok_or_else(|| forest.cycle(NodeId(i))))
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(root) = forest.root().and_then(|root| prices.get(root.0)) {
        log::debug!(
            "priced {} nodes: {} parses, cheapest costs {}",
            prices.len(),
            root.count,
            root.min_cost
        );
    }
    Ok(PriceTable { prices })
}

fn price_node<K, N>(
    forest: &Forest<'_, K, N>,
    id: NodeId,
    prices: &[Option<Price>],
) -> Result<Price, ForestError>
where
    K: TokenKind,
    N: NonTerminal,
{
    let alternatives = match forest.node(id) {
        ForestNode::Terminal { .. } => return Ok(Price::terminal()),
        ForestNode::NonTerminal { alternatives, .. } => alternatives,
    };
    if alternatives.is_empty() {
        return Err(forest.no_alternatives(id));
    }

    let mut best: Option<(usize, Cost)> = None;
    let mut count = BigUint::zero();
    for (index, alternative) in alternatives.iter().enumerate() {
        let mut cost = forest.grammar().rule(alternative.rule).cost;
        let mut product = BigUint::one();
        for &child in &alternative.children {
            let price = prices[child.0].as_ref().ok_or_else(|| forest.cycle(child))?;
            cost = cost.saturating_add(price.min_cost);
            product *= &price.count;
        }
        count += product;
        if best.map_or(true, |(_, lowest)| cost < lowest) {
            best = Some((index, cost));
        }
    }

    let (best, min_cost) = best.ok_or_else(|| forest.no_alternatives(id))?;
    Ok(Price {
        min_cost,
        count,
        best: Some(best),
    })
}
