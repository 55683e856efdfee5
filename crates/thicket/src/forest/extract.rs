use super::parse::{materialize, Parse};
use super::{Forest, NodeId};
use crate::error::ForestError;
use crate::grammar::NonTerminal;
use crate::lexer::TokenKind;

/// Follow each node's cheapest alternative down from the root.
pub(super) fn cheapest<'f, K, N>(forest: &'f Forest<'_, K, N>) -> Result<Parse<'f, K, N>, ForestError>
where
    K: TokenKind,
    N: NonTerminal,
{
    let root = forest.root().ok_or(ForestError::Empty)?;
    let table = forest.count_and_price_all_parses()?;

    let mut weight = 0;
    let mut choose = |id: NodeId, _: usize| {
        table
            .get(id)
            .and_then(|price| price.best)
            .ok_or_else(|| forest.no_alternatives(id))
    };
    let tree = materialize(forest, root, &mut choose, &mut weight)?;

    log::debug!("extracted cheapest parse with weight {weight}");
    Ok(Parse::new(tree, weight))
}
