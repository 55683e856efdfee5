//! Earley chart: one item set per input position

use crate::grammar::RuleId;
use hashbrown::HashSet;

/// An Earley item: rule `rule` recognized up to `dot`, started at `origin`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Item {
    pub rule: RuleId,
    pub dot: usize,
    pub origin: usize,
}

impl Item {
    pub const fn new(rule: RuleId, origin: usize) -> Self {
        Self {
            rule,
            dot: 0,
            origin,
        }
    }

    /// The same item with the dot moved over one symbol.
    pub const fn advance(self) -> Self {
        Self {
            dot: self.dot + 1,
            ..self
        }
    }
}

/// Items at one position, in insertion order, without duplicates.
///
/// Insertion order doubles as the worklist: closing a set walks it by index
/// while new items are appended.
#[derive(Debug, Clone, Default)]
pub(crate) struct ItemSet {
    items: Vec<Item>,
    seen: HashSet<Item, ahash::RandomState>,
}

impl ItemSet {
    /// Add `item`; returns `false` if it was already present.
    pub fn add(&mut self, item: Item) -> bool {
        if self.seen.insert(item) {
            self.items.push(item);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, item: &Item) -> bool {
        self.seen.contains(item)
    }

    pub fn get(&self, index: usize) -> Option<Item> {
        self.items.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Item> + '_ {
        self.items.iter().copied()
    }
}

/// Chart for Earley parsing
///
/// `sets[i]` holds the items recognized after the first `i` tokens.
#[derive(Debug, Clone)]
pub(crate) struct Chart {
    sets: Vec<ItemSet>,
    total: usize,
}

impl Chart {
    /// A chart for `tokens` tokens, with `tokens + 1` empty sets.
    pub fn new(tokens: usize) -> Self {
        Self {
            sets: vec![ItemSet::default(); tokens + 1],
            total: 0,
        }
    }

    pub fn add(&mut self, position: usize, item: Item) -> bool {
        let added = self.sets[position].add(item);
        if added {
            self.total += 1;
        }
        added
    }

    pub fn set(&self, position: usize) -> &ItemSet {
        &self.sets[position]
    }

    pub fn contains(&self, position: usize, item: &Item) -> bool {
        self.sets.get(position).is_some_and(|set| set.contains(item))
    }

    /// Number of positions, one more than the number of tokens.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub const fn total_items(&self) -> usize {
        self.total
    }
}
