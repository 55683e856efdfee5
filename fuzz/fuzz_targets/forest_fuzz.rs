#![no_main]
use libfuzzer_sys::fuzz_target;
use num::BigUint;
use std::collections::HashSet;
use thicket::grammar::{GrammarBuilder, NonTerminal, Symbol};
use thicket::lexer::{Token, TokenKind, TokenStream};
use thicket::parser::{ChartParser, ParserConfig};
use thicket::syntax::{Span, TextRange, TextSize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum FuzzKind {
    Number,
    Plus,
    Star,
}

impl TokenKind for FuzzKind {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum FuzzNonTerminal {
    Expr,
    Opt,
}

impl NonTerminal for FuzzNonTerminal {
    fn name(&self) -> &str {
        match self {
            Self::Expr => "Expr",
            Self::Opt => "Opt",
        }
    }
}

const MAX_TOKENS: usize = 24;
const MAX_ENUMERATED: usize = 64;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // Expr -> Expr + Expr | Expr * Expr Opt | Number; Opt -> ε | +
    // with costs taken from the first byte.
    let costs = data[0];
    let expr = || Symbol::nt(FuzzNonTerminal::Expr);
    let Ok(grammar) = GrammarBuilder::new()
        .entry_point(FuzzNonTerminal::Expr)
        .rule(
            FuzzNonTerminal::Expr,
            [expr(), Symbol::t(FuzzKind::Plus), expr()],
            u64::from(costs & 0x7),
        )
        .rule(
            FuzzNonTerminal::Expr,
            [expr(), Symbol::t(FuzzKind::Star), expr(), Symbol::nt(FuzzNonTerminal::Opt)],
            u64::from((costs >> 3) & 0x7),
        )
        .rule(FuzzNonTerminal::Expr, [Symbol::t(FuzzKind::Number)], 0)
        .rule(FuzzNonTerminal::Opt, [], 0)
        .rule(FuzzNonTerminal::Opt, [Symbol::t(FuzzKind::Plus)], u64::from(costs >> 6))
        .build()
    else {
        return;
    };

    let tokens: Vec<_> = data[1..]
        .iter()
        .take(MAX_TOKENS)
        .enumerate()
        .map(|(i, byte)| {
            let (kind, text) = match byte % 3 {
                0 => (FuzzKind::Number, "1"),
                1 => (FuzzKind::Plus, "+"),
                _ => (FuzzKind::Star, "*"),
            };
            let column = u32::try_from(i + 1).unwrap_or(u32::MAX);
            Token::new(kind, text, Span::new(TextRange::at(TextSize::of(i), TextSize::from(1)), 1, column))
        })
        .collect();
    let len = tokens.len();

    let parser = ChartParser::new(&grammar, ParserConfig::default().with_max_items(Some(200_000)));
    let mut stream = TokenStream::from_tokens(tokens);
    let forest = match parser.parse(&mut stream) {
        Ok(forest) => forest,
        Err(err) => {
            if let Some(syntax) = err.as_syntax() {
                assert!(syntax.position <= len);
                assert_eq!(syntax.position, stream.position());
            }
            return;
        }
    };

    let count = forest.count_all_parses().expect("parser forests price cleanly");
    let min_cost = forest.min_cost().expect("priced").expect("root");
    let cheapest = forest.construct_cheapest_parse().expect("cheapest parse");
    assert_eq!(cheapest.weight(), min_cost);

    let mut seen = HashSet::new();
    let mut lowest = u64::MAX;
    for parse in forest.parses().take(MAX_ENUMERATED) {
        let parse = parse.expect("enumeration");
        assert_eq!(parse.tokens().len(), len);
        lowest = lowest.min(parse.weight());
        assert!(seen.insert(parse.to_string()), "duplicate parse");
    }
    assert!(lowest >= min_cost);
    if count <= BigUint::from(MAX_ENUMERATED) {
        assert_eq!(BigUint::from(seen.len()), count);
        assert_eq!(lowest, min_cost);
    }
});
