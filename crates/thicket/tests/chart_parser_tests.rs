//! Tests for the chart parser: recognition, failure diagnostics and the shape
//! of the forests it builds.

mod common;

use common::{
    arith, assert_well_formed, chain, dangling_else, layered, list, numbers, padded_list, segments,
    stream, Kind, Nt,
};
use thicket::error::ParseError;
use thicket::forest::Forest;
use thicket::parser::{ChartParser, ParserConfig};

fn parse<'g>(
    grammar: &'g thicket::Grammar<Kind, Nt>,
    text: &str,
) -> Result<Forest<'g, Kind, Nt>, ParseError<Kind>> {
    ChartParser::new(grammar, ParserConfig::default()).parse(&mut stream(text))
}

#[test]
fn test_accepts_ambiguous_input() {
    let grammar = arith();
    let forest = parse(&grammar, "1 + 2 * 3").expect("should parse");
    assert_well_formed(&forest);

    let root = forest.root().expect("root");
    assert_eq!(forest.node(root).span(), (0, 5));
    assert_eq!(forest.node(root).symbol(), Some(&Nt::E));
    assert_eq!(forest.ambiguity_points(), vec![root]);
}

#[test]
fn test_subderivations_are_shared() {
    let grammar = arith();
    let forest = parse(&grammar, &chain(&['+', '+', '+', '+'])).expect("should parse");
    assert_well_formed(&forest);

    // One node per (E, i, j) with odd-length spans starting and ending on numbers.
    let expected_nonterminals = (0..5).map(|k| 5 - k).sum::<usize>();
    let nonterminals = forest
        .nodes()
        .filter(|(_, node)| node.symbol().is_some())
        .count();
    assert_eq!(nonterminals, expected_nonterminals);
    assert_eq!(forest.len(), expected_nonterminals + 9);
}

#[test]
fn test_unambiguous_grammar_has_no_ambiguity_points() {
    let grammar = layered();
    let forest = parse(&grammar, "(1 + 2) * 3 + 4").expect("should parse");
    assert_well_formed(&forest);
    assert!(forest.ambiguity_points().is_empty());
    assert_eq!(forest.count_all_parses(), Ok(1u32.into()));
}

#[test]
fn test_trailing_token_fails_at_that_token() {
    let grammar = arith();
    let mut tokens = stream("1 + 2 3");
    let parser = ChartParser::new(&grammar, ParserConfig::default());

    let err = parser.parse(&mut tokens).unwrap_err();
    let syntax = err.as_syntax().expect("syntax error");
    assert_eq!(syntax.position, 3);
    assert_eq!(syntax.found.as_ref().map(|t| t.text()), Some("3"));
    assert_eq!(syntax.expected, vec![Kind::Plus, Kind::Star]);
    assert_eq!(
        err.to_string(),
        "unexpected '3' (Num) at 1:7, expected one of: Plus, Star"
    );

    assert_eq!(tokens.position(), 3);
    assert_eq!(tokens.cur_tok().map(|t| t.text()), Some("3"));
}

#[test]
fn test_early_end_of_input() {
    let grammar = arith();
    let mut tokens = stream("1 +");
    let parser = ChartParser::new(&grammar, ParserConfig::default());

    let err = parser.parse(&mut tokens).unwrap_err();
    let syntax = err.as_syntax().expect("syntax error");
    assert_eq!(syntax.position, 2);
    assert!(syntax.found.is_none());
    assert_eq!(syntax.expected, vec![Kind::Num]);
    assert_eq!(err.to_string(), "unexpected end of input at 1:4, expected one of: Num");
    assert!(tokens.cur_tok().is_none());
}

#[test]
fn test_first_token_rejected() {
    let grammar = arith();
    let err = parse(&grammar, "+ 1").unwrap_err();
    let syntax = err.as_syntax().expect("syntax error");
    assert_eq!(syntax.position, 0);
    assert_eq!(syntax.found.as_ref().map(|t| t.kind), Some(Kind::Plus));
    assert_eq!(syntax.expected, vec![Kind::Num]);
}

#[test]
fn test_empty_input_for_non_nullable_start() {
    let grammar = arith();
    let err = parse(&grammar, "").unwrap_err();
    let syntax = err.as_syntax().expect("syntax error");
    assert_eq!(syntax.position, 0);
    assert!(syntax.found.is_none());
}

#[test]
fn test_expected_collection_can_be_disabled() {
    let grammar = arith();
    let parser = ChartParser::new(
        &grammar,
        ParserConfig::default().with_expected_collection(false),
    );
    let err = parser.parse(&mut stream("1 1")).unwrap_err();
    assert!(err.as_syntax().expect("syntax error").expected.is_empty());
    assert_eq!(err.to_string(), "unexpected '1' (Num) at 1:3");
}

#[test]
fn test_nullable_start_accepts_empty_input() {
    let grammar = list();
    let forest = parse(&grammar, "").expect("should parse");
    assert_well_formed(&forest);
    assert_eq!(forest.count_all_parses(), Ok(1u32.into()));
    assert_eq!(forest.construct_cheapest_parse().expect("parse").to_string(), "(List)");
}

#[test]
fn test_left_recursive_nullable_list() {
    let grammar = list();
    let forest = parse(&grammar, "1 2 3").expect("should parse");
    assert_well_formed(&forest);
    assert_eq!(
        forest.construct_cheapest_parse().expect("parse").to_string(),
        "(List (List (List (List) 1) 2) 3)"
    );
}

#[test]
fn test_deep_derivation_is_extracted_and_dropped() {
    let grammar = list();
    let forest = parse(&grammar, &numbers(50_000)).expect("should parse");
    assert_eq!(forest.count_all_parses(), Ok(1u32.into()));

    let cheapest = forest.construct_cheapest_parse().expect("parse");
    assert_eq!(cheapest.weight(), 0);
    assert_eq!(cheapest.tokens().len(), 50_000);
    drop(cheapest);

    let next = forest.construct_next_parse(None).expect("ok").expect("first");
    assert!(next.directions.is_empty());
    assert_eq!(next.parse.rules().len(), 50_001);
    drop(next);
    assert!(forest
        .construct_next_parse(Some(&thicket::Directions::default()))
        .expect("ok")
        .is_none());
}

#[test]
fn test_nullable_padding_multiplies_parses() {
    let grammar = padded_list();
    let forest = parse(&grammar, "1 2").expect("should parse");
    assert_well_formed(&forest);
    // Four ways to leave the two `A`s around each number empty.
    assert_eq!(forest.count_all_parses(), Ok(16u32.into()));
    assert_eq!(forest.min_cost(), Ok(Some(0)));
    assert_eq!(
        forest.construct_cheapest_parse().expect("parse").to_string(),
        "(S (S (S) (A (B)) 1 (A (B))) (A (B)) 2 (A (B)))"
    );
}

#[test]
fn test_multi_symbol_splits_over_nullable_prefix() {
    let grammar = segments();
    let forest = parse(&grammar, "1 2 3").expect("should parse");
    assert_well_formed(&forest);
    assert_eq!(forest.count_all_parses(), Ok(17u32.into()));
    assert_eq!(forest.min_cost(), Ok(Some(3)));
}

#[test]
fn test_dangling_else_is_ambiguous() {
    let grammar = dangling_else();
    let forest = parse(&grammar, "if a then if b then c else d").expect("should parse");
    assert_well_formed(&forest);
    assert_eq!(forest.count_all_parses(), Ok(2u32.into()));
}

#[test]
fn test_parse_from_other_start_symbol() {
    let grammar = layered();
    let parser = ChartParser::new(&grammar, ParserConfig::default());

    let forest = parser.parse_from(&mut stream("2 * 3"), &Nt::T).expect("should parse");
    let root = forest.root().expect("root");
    assert_eq!(forest.node(root).symbol(), Some(&Nt::T));

    let err = parser.parse_from(&mut stream("2"), &Nt::S).unwrap_err();
    assert_eq!(
        err,
        ParseError::UnknownStart {
            symbol: "S".to_string()
        }
    );
}

#[test]
fn test_parse_resumes_mid_stream() {
    let grammar = arith();
    let parser = ChartParser::new(&grammar, ParserConfig::default());
    let mut tokens = stream("( 1 + 2");
    assert!(tokens.next().is_some());

    let forest = parser.parse(&mut tokens).expect("should parse");
    let root = forest.root().expect("root");
    assert_eq!(forest.node(root).span(), (1, 4));
    let parse = forest.construct_cheapest_parse().expect("parse");
    assert_eq!(parse.to_string(), "(E (E 1) + (E 2))");
    assert!(!tokens.has_next());
}

#[test]
fn test_chart_limit() {
    let grammar = arith();
    let parser = ChartParser::new(&grammar, ParserConfig::default().with_max_items(Some(10)));
    let err = parser.parse(&mut stream(&chain(&['+'; 6]))).unwrap_err();
    assert!(matches!(err, ParseError::ChartLimitExceeded { limit: 10, .. }), "{err}");

    let unbounded = ChartParser::new(&grammar, ParserConfig::default().with_max_items(None));
    assert!(unbounded.parse(&mut stream(&chain(&['+'; 6]))).is_ok());
}

#[test]
fn test_stats() {
    let grammar = arith();
    let forest = parse(&grammar, "1 + 2 * 3").expect("should parse");
    let stats = forest.stats();
    assert_eq!(stats.tokens, 5);
    assert_eq!(stats.nodes, forest.len());
    assert_eq!(stats.ambiguity_points, 1);
    assert!(stats.chart_items > stats.nodes);
    assert!(stats.alternatives > stats.ambiguity_points);
}
