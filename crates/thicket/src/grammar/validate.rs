use crate::grammar::{NonTerminal, Rule, RuleId, Symbol};
use hashbrown::{HashMap, HashSet};
use smallvec::SmallVec;

type RuleIndex<N> = HashMap<N, SmallVec<[RuleId; 4]>, ahash::RandomState>;

/// Nonterminals that derive the empty string, by fixed point.
pub(super) fn compute_nullable<K, N: NonTerminal>(
    rules: &[Rule<K, N>],
) -> HashSet<N, ahash::RandomState> {
    let mut nullable = HashSet::with_hasher(ahash::RandomState::new());
    let mut changed = true;
    while changed {
        changed = false;
        for rule in rules {
            if nullable.contains(&rule.lhs) {
                continue;
            }
            let all_nullable = rule.rhs.iter().all(|symbol| match symbol {
                Symbol::Terminal(_) => false,
                Symbol::NonTerminal(n) => nullable.contains(n),
            });
            if all_nullable {
                nullable.insert(rule.lhs.clone());
                changed = true;
            }
        }
    }
    nullable
}

/// First `(lhs, symbol)` pair where `symbol` has no rules.
pub(super) fn find_undefined<K, N: NonTerminal>(
    rules: &[Rule<K, N>],
    by_lhs: &RuleIndex<N>,
) -> Option<(N, N)> {
    rules.iter().find_map(|rule| {
        rule.rhs
            .iter()
            .filter_map(Symbol::as_nonterminal)
            .find(|n| !by_lhs.contains_key(*n))
            .map(|n| (rule.lhs.clone(), n.clone()))
    })
}

/// Find a nonterminal that derives itself without consuming input.
///
/// `A` reaches `B` when some rule `A -> α B β` has `α` and `β` nullable. A
/// cycle in that relation means `A =>+ A`. Returns the nonterminals on the
/// cycle, starting from the one first reached.
pub(super) fn find_cycle<K, N: NonTerminal>(
    rules: &[Rule<K, N>],
    nullable: &HashSet<N, ahash::RandomState>,
) -> Option<Vec<N>> {
    let mut edges: HashMap<&N, Vec<&N>, ahash::RandomState> =
        HashMap::with_hasher(ahash::RandomState::new());
    for rule in rules {
        let is_nullable = |s: &Symbol<K, N>| s.as_nonterminal().is_some_and(|n| nullable.contains(n));
        for (i, symbol) in rule.rhs.iter().enumerate() {
            let Symbol::NonTerminal(target) = symbol else {
                continue;
            };
            let others_nullable = rule.rhs[..i].iter().all(is_nullable)
                && rule.rhs[i + 1..].iter().all(is_nullable);
            if others_nullable {
                edges.entry(&rule.lhs).or_default().push(target);
            }
        }
    }

    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Mark {
        OnPath,
        Done,
    }

    let mut marks: HashMap<&N, Mark, ahash::RandomState> =
        HashMap::with_hasher(ahash::RandomState::new());
    for rule in rules {
        let start = &rule.lhs;
        if marks.contains_key(start) {
            continue;
        }
        // Iterative DFS; `path` mirrors the stack of nodes currently open.
        let mut path: Vec<&N> = vec![start];
        let mut cursors: Vec<usize> = vec![0];
        marks.insert(start, Mark::OnPath);
        while let Some(&node) = path.last() {
            let depth = cursors.len() - 1;
            let next = edges.get(node).and_then(|targets| targets.get(cursors[depth]));
            cursors[depth] += 1;
            match next {
                Some(&target) => match marks.get(target) {
                    Some(Mark::OnPath) => {
                        let from = path.iter().position(|n| *n == target).unwrap_or(0);
                        return Some(path[from..].iter().map(|n| (*n).clone()).collect());
                    }
                    Some(Mark::Done) => {}
                    None => {
                        marks.insert(target, Mark::OnPath);
                        path.push(target);
                        cursors.push(0);
                    }
                },
                None => {
                    marks.insert(node, Mark::Done);
                    path.pop();
                    cursors.pop();
                }
            }
        }
    }
    None
}
