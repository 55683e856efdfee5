use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use thicket::grammar::{Grammar, GrammarBuilder, NonTerminal, Symbol};
use thicket::lexer::{Token, TokenKind, TokenStream};
use thicket::parser::{ChartParser, ParserConfig};
use thicket::syntax::{Span, TextRange, TextSize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum BenchKind {
    Number,
    Plus,
    Multiply,
}

impl TokenKind for BenchKind {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum BenchNonTerminal {
    Expr,
}

impl NonTerminal for BenchNonTerminal {
    fn name(&self) -> &str {
        "Expr"
    }
}

fn grammar() -> Grammar<BenchKind, BenchNonTerminal> {
    let expr = || Symbol::nt(BenchNonTerminal::Expr);
    GrammarBuilder::new()
        .entry_point(BenchNonTerminal::Expr)
        .rule(BenchNonTerminal::Expr, [expr(), Symbol::t(BenchKind::Plus), expr()], 2)
        .rule(BenchNonTerminal::Expr, [expr(), Symbol::t(BenchKind::Multiply), expr()], 1)
        .rule(BenchNonTerminal::Expr, [Symbol::t(BenchKind::Number)], 0)
        .build()
        .expect("valid grammar")
}

/// `operators` alternating `+` and `*` between single-digit numbers.
fn tokens(operators: usize) -> Vec<Token<BenchKind>> {
    (0..=operators * 2)
        .map(|i| {
            let (kind, text) = match i % 4 {
                1 => (BenchKind::Plus, "+"),
                3 => (BenchKind::Multiply, "*"),
                _ => (BenchKind::Number, "7"),
            };
            let offset = TextSize::of(i);
            let column = u32::try_from(i + 1).unwrap_or(u32::MAX);
            Token::new(kind, text, Span::new(TextRange::at(offset, TextSize::from(1)), 1, column))
        })
        .collect()
}

fn bench_parse(c: &mut Criterion) {
    let grammar = grammar();
    let parser = ChartParser::new(&grammar, ParserConfig::default());
    let mut group = c.benchmark_group("parse");
    for operators in [4, 16, 32] {
        let input = tokens(operators);
        group.bench_with_input(BenchmarkId::from_parameter(operators), &input, |b, input| {
            b.iter(|| {
                let mut stream = TokenStream::from_tokens(input.clone());
                black_box(parser.parse(&mut stream).expect("should parse"));
            });
        });
    }
    group.finish();
}

fn bench_price_and_extract(c: &mut Criterion) {
    let grammar = grammar();
    let parser = ChartParser::new(&grammar, ParserConfig::default());
    let forest = parser
        .parse(&mut TokenStream::from_tokens(tokens(32)))
        .expect("should parse");

    c.bench_function("price_32_operators", |b| {
        b.iter(|| black_box(forest.price_uncached().expect("priced")));
    });
    c.bench_function("cheapest_32_operators", |b| {
        b.iter(|| black_box(forest.construct_cheapest_parse().expect("parse")));
    });
}

fn bench_enumerate(c: &mut Criterion) {
    let grammar = grammar();
    let parser = ChartParser::new(&grammar, ParserConfig::default());
    let forest = parser
        .parse(&mut TokenStream::from_tokens(tokens(8)))
        .expect("should parse");

    c.bench_function("enumerate_first_100", |b| {
        b.iter(|| {
            for parse in forest.parses().take(100) {
                black_box(parse.expect("parse"));
            }
        });
    });
}

criterion_group!(benches, bench_parse, bench_price_and_extract, bench_enumerate);
criterion_main!(benches);
