//! Cursor-driven enumeration of every derivation in a forest.
//!
//! Derivations are ordered lexicographically by the alternatives chosen at
//! ambiguity points, taken in preorder (depth-first, left to right), with
//! alternatives in declaration order. A [`Directions`] value records those
//! choices for one derivation and is all that is needed to produce the next.

use super::parse::{materialize, Parse};
use super::{Forest, NodeId};
use crate::error::ForestError;
use crate::grammar::NonTerminal;
use crate::lexer::TokenKind;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::FusedIterator;

/// The alternative taken at one ambiguity point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Choice {
    pub node: NodeId,
    pub alternative: usize,
}

/// Enumeration cursor: the choices made at every ambiguity point of one
/// derivation, in preorder.
///
/// Directions are plain data. They can be stored, sent elsewhere and handed
/// back later to resume enumeration of the same forest, and are checked
/// against the forest before use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Directions {
    choices: Vec<Choice>,
}

impl Directions {
    #[must_use]
    pub const fn new(choices: Vec<Choice>) -> Self {
        Self { choices }
    }

    #[must_use]
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.choices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }
}

impl fmt::Display for Directions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, choice) in self.choices.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}:{}", choice.node, choice.alternative)?;
        }
        f.write_str("]")
    }
}

/// A derivation together with the cursor that resumes after it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextParse<'f, K: TokenKind, N: NonTerminal> {
    pub parse: Parse<'f, K, N>,
    pub directions: Directions,
}

impl<'f, K: TokenKind, N: NonTerminal> NextParse<'f, K, N> {
    #[must_use]
    pub fn into_parts(self) -> (Parse<'f, K, N>, Directions) {
        (self.parse, self.directions)
    }
}

pub(super) fn next_parse<'f, K, N>(
    forest: &'f Forest<'_, K, N>,
    directions: Option<&Directions>,
) -> Result<Option<NextParse<'f, K, N>>, ForestError>
where
    K: TokenKind,
    N: NonTerminal,
{
    let Some(root) = forest.root() else {
        return Ok(None);
    };

    let prefix = match directions {
        None => Vec::new(),
        Some(directions) => match successor(forest, root, directions)? {
            Some(prefix) => prefix,
            None => {
                log::trace!("enumeration exhausted after {directions}");
                return Ok(None);
            }
        },
    };

    let mut recorded = Vec::with_capacity(prefix.len());
    let mut weight = 0;
    let mut choose = |id: NodeId, count: usize| {
        if count < 2 {
            return Ok(0);
        }
        let alternative = match prefix.get(recorded.len()) {
            Some(choice) if choice.node != id => {
                return Err(invalid(format!(
                    "expected a choice at {id}, found one at {}",
                    choice.node
                )))
            }
            Some(choice) => choice.alternative,
            None => 0,
        };
        recorded.push(Choice {
            node: id,
            alternative,
        });
        Ok(alternative)
    };
    let tree = materialize(forest, root, &mut choose, &mut weight)?;

    let directions = Directions::new(recorded);
    log::trace!("next parse {directions} with weight {weight}");
    Ok(Some(NextParse {
        parse: Parse::new(tree, weight),
        directions,
    }))
}

/// Choices fixing the successor of `directions`, or `None` once every
/// ambiguity point on the path is at its last alternative.
fn successor<K, N>(
    forest: &Forest<'_, K, N>,
    root: NodeId,
    directions: &Directions,
) -> Result<Option<Vec<Choice>>, ForestError>
where
    K: TokenKind,
    N: NonTerminal,
{
    let counts = replay(forest, root, directions)?;
    let mut choices = directions.choices.clone();
    while let Some(at) = choices.len().checked_sub(1) {
        if choices[at].alternative + 1 < counts[at] {
            choices[at].alternative += 1;
            return Ok(Some(choices));
        }
        choices.pop();
    }
    Ok(None)
}

/// Walk the derivation `directions` describes and return the number of
/// alternatives at each recorded ambiguity point.
fn replay<K, N>(
    forest: &Forest<'_, K, N>,
    root: NodeId,
    directions: &Directions,
) -> Result<Vec<usize>, ForestError>
where
    K: TokenKind,
    N: NonTerminal,
{
    let choices = &directions.choices;
    let mut counts = Vec::with_capacity(choices.len());
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        if id.index() >= forest.len() {
            return Err(invalid(format!("node {id} is not in this forest")));
        }
        let alternatives = forest.node(id).alternatives();
        let chosen = match alternatives.len() {
            0 if forest.node(id).symbol().is_none() => continue,
            0 => return Err(forest.no_alternatives(id)),
            1 => 0,
            count => {
                let Some(choice) = choices.get(counts.len()) else {
                    return Err(invalid(format!(
                        "ends after {} choices, before the ambiguity at {id}",
                        choices.len()
                    )));
                };
                if choice.node != id {
                    return Err(invalid(format!(
                        "choice {} names {} but the ambiguity is at {id}",
                        counts.len(),
                        choice.node
                    )));
                }
                if choice.alternative >= count {
                    return Err(invalid(format!(
                        "node {id} has {count} alternatives, not {}",
                        choice.alternative + 1
                    )));
                }
                counts.push(count);
                choice.alternative
            }
        };
        stack.extend(alternatives[chosen].children.iter().rev());
    }
    if counts.len() != choices.len() {
        return Err(invalid(format!(
            "{} choices given but the derivation has {}",
            choices.len(),
            counts.len()
        )));
    }
    Ok(counts)
}

fn invalid(reason: String) -> ForestError {
    ForestError::InvalidDirections { reason }
}

/// Iterator over every derivation of a forest, in enumeration order.
///
/// Stops after the last derivation or after the first error.
#[derive(Debug, Clone)]
pub struct Parses<'f, 'g, K, N>
where
    K: TokenKind,
    N: NonTerminal,
{
    forest: &'f Forest<'g, K, N>,
    cursor: Option<Directions>,
    done: bool,
}

impl<'f, 'g, K, N> Parses<'f, 'g, K, N>
where
    K: TokenKind,
    N: NonTerminal,
{
    pub(super) const fn new(forest: &'f Forest<'g, K, N>) -> Self {
        Self {
            forest,
            cursor: None,
            done: false,
        }
    }

    /// Continue enumeration after the derivation `directions` describes.
    #[must_use]
    pub const fn resume(forest: &'f Forest<'g, K, N>, directions: Directions) -> Self {
        Self {
            forest,
            cursor: Some(directions),
            done: false,
        }
    }

    /// Cursor of the most recently yielded derivation.
    #[must_use]
    pub const fn directions(&self) -> Option<&Directions> {
        self.cursor.as_ref()
    }
}

impl<'f, K, N> Iterator for Parses<'f, '_, K, N>
where
    K: TokenKind,
    N: NonTerminal,
{
    type Item = Result<Parse<'f, K, N>, ForestError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match next_parse(self.forest, self.cursor.as_ref()) {
            Ok(Some(next)) => {
                self.cursor = Some(next.directions);
                Some(Ok(next.parse))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl<K: TokenKind, N: NonTerminal> FusedIterator for Parses<'_, '_, K, N> {}
