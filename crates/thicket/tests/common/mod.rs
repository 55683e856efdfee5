//! Shared fixtures: a small arithmetic/statement token set, a tokenizer for
//! it and the grammars the integration tests parse with.

#![allow(dead_code)]

use num::BigUint;
use thicket::error::LexError;
use thicket::forest::{Forest, ForestNode};
use thicket::grammar::{Cost, Grammar, GrammarBuilder, NonTerminal, Symbol};
use thicket::lexer::{Token, TokenKind, TokenStream, Tokenizer};
use thicket::syntax::LineIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Num,
    Plus,
    Star,
    LParen,
    RParen,
    If,
    Then,
    Else,
    Id,
    Whitespace,
}

impl TokenKind for Kind {
    fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Nt {
    E,
    T,
    F,
    S,
    A,
    B,
    P,
    List,
}

impl NonTerminal for Nt {
    fn name(&self) -> &str {
        match self {
            Self::E => "E",
            Self::T => "T",
            Self::F => "F",
            Self::S => "S",
            Self::A => "A",
            Self::B => "B",
            Self::P => "P",
            Self::List => "List",
        }
    }
}

/// Digits, `+ * ( )`, the keywords `if then else`, other words as `Id`.
pub struct TestTokenizer;

impl Tokenizer<Kind> for TestTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Token<Kind>>, LexError> {
        let index = LineIndex::new(text);
        let mut tokens = Vec::new();
        let mut chars = text.char_indices().peekable();
        while let Some((start, c)) = chars.next() {
            let mut end = start + c.len_utf8();
            let mut extend = |pred: fn(char) -> bool| {
                while let Some(&(i, next)) = chars.peek() {
                    if !pred(next) {
                        break;
                    }
                    end = i + next.len_utf8();
                    chars.next();
                }
            };
            let kind = match c {
                '+' => Kind::Plus,
                '*' => Kind::Star,
                '(' => Kind::LParen,
                ')' => Kind::RParen,
                c if c.is_ascii_digit() => {
                    extend(|c| c.is_ascii_digit());
                    Kind::Num
                }
                c if c.is_whitespace() => {
                    extend(char::is_whitespace);
                    Kind::Whitespace
                }
                c if c.is_ascii_alphabetic() => {
                    extend(|c| c.is_ascii_alphanumeric());
                    match &text[start..end] {
                        "if" => Kind::If,
                        "then" => Kind::Then,
                        "else" => Kind::Else,
                        _ => Kind::Id,
                    }
                }
                other => return Err(LexError::unexpected_char(other, index.span(start, end))),
            };
            tokens.push(Token::new(kind, &text[start..end], index.span(start, end)));
        }
        Ok(tokens)
    }
}

pub fn stream(text: &str) -> TokenStream<Kind> {
    let mut stream = TokenStream::new();
    stream
        .tokenize_from(&TestTokenizer, text)
        .expect("test input should tokenize");
    stream
}

/// `E -> E '+' E [plus] | E '*' E [star] | num [num]`
pub fn arith_with_costs(plus: Cost, star: Cost, num: Cost) -> Grammar<Kind, Nt> {
    GrammarBuilder::new()
        .entry_point(Nt::E)
        .rule(Nt::E, [Symbol::nt(Nt::E), Symbol::t(Kind::Plus), Symbol::nt(Nt::E)], plus)
        .rule(Nt::E, [Symbol::nt(Nt::E), Symbol::t(Kind::Star), Symbol::nt(Nt::E)], star)
        .rule(Nt::E, [Symbol::t(Kind::Num)], num)
        .build()
        .expect("valid grammar")
}

/// The ambiguous expression grammar with unit operator costs.
pub fn arith() -> Grammar<Kind, Nt> {
    arith_with_costs(1, 1, 0)
}

/// Unambiguous layered expressions: `E -> E + T | T`, `T -> T * F | F`,
/// `F -> num | ( E )`.
pub fn layered() -> Grammar<Kind, Nt> {
    GrammarBuilder::new()
        .entry_point(Nt::E)
        .rule(Nt::E, [Symbol::nt(Nt::E), Symbol::t(Kind::Plus), Symbol::nt(Nt::T)], 0)
        .rule(Nt::E, [Symbol::nt(Nt::T)], 0)
        .rule(Nt::T, [Symbol::nt(Nt::T), Symbol::t(Kind::Star), Symbol::nt(Nt::F)], 0)
        .rule(Nt::T, [Symbol::nt(Nt::F)], 0)
        .rule(Nt::F, [Symbol::t(Kind::Num)], 0)
        .rule(
            Nt::F,
            [Symbol::t(Kind::LParen), Symbol::nt(Nt::E), Symbol::t(Kind::RParen)],
            0,
        )
        .build()
        .expect("valid grammar")
}

/// `S -> A [a] | B [b]`, `A -> num`, `B -> num`
pub fn choice(a: Cost, b: Cost) -> Grammar<Kind, Nt> {
    GrammarBuilder::new()
        .entry_point(Nt::S)
        .rule(Nt::S, [Symbol::nt(Nt::A)], a)
        .rule(Nt::S, [Symbol::nt(Nt::B)], b)
        .rule(Nt::A, [Symbol::t(Kind::Num)], 0)
        .rule(Nt::B, [Symbol::t(Kind::Num)], 0)
        .build()
        .expect("valid grammar")
}

/// Statements with the dangling-else ambiguity.
pub fn dangling_else() -> Grammar<Kind, Nt> {
    let cond = || Symbol::nt(Nt::E);
    GrammarBuilder::new()
        .entry_point(Nt::S)
        .rule(
            Nt::S,
            [Symbol::t(Kind::If), cond(), Symbol::t(Kind::Then), Symbol::nt(Nt::S)],
            0,
        )
        .rule(
            Nt::S,
            [
                Symbol::t(Kind::If),
                cond(),
                Symbol::t(Kind::Then),
                Symbol::nt(Nt::S),
                Symbol::t(Kind::Else),
                Symbol::nt(Nt::S),
            ],
            0,
        )
        .rule(Nt::S, [Symbol::t(Kind::Id)], 0)
        .rule(Nt::E, [Symbol::t(Kind::Id)], 0)
        .build()
        .expect("valid grammar")
}

/// `List -> ε | List num`
pub fn list() -> Grammar<Kind, Nt> {
    GrammarBuilder::new()
        .entry_point(Nt::List)
        .rule(Nt::List, [], 0)
        .rule(Nt::List, [Symbol::nt(Nt::List), Symbol::t(Kind::Num)], 0)
        .build()
        .expect("valid grammar")
}

/// `S -> ε | S A num A`, `A -> ε [1] | B`, `B -> ε`: every number is padded
/// by two nullable `A`s, each empty in two ways.
pub fn padded_list() -> Grammar<Kind, Nt> {
    GrammarBuilder::new()
        .entry_point(Nt::S)
        .rule(Nt::S, [], 0)
        .rule(
            Nt::S,
            [
                Symbol::nt(Nt::S),
                Symbol::nt(Nt::A),
                Symbol::t(Kind::Num),
                Symbol::nt(Nt::A),
            ],
            0,
        )
        .rule(Nt::A, [], 1)
        .rule(Nt::A, [Symbol::nt(Nt::B)], 0)
        .rule(Nt::B, [], 0)
        .build()
        .expect("valid grammar")
}

/// `S -> ε | S P`, `P -> A A num [1] | num [2]`, `A -> ε | num [1]`: numbers
/// grouped into segments of one to three.
pub fn segments() -> Grammar<Kind, Nt> {
    GrammarBuilder::new()
        .entry_point(Nt::S)
        .rule(Nt::S, [], 0)
        .rule(Nt::S, [Symbol::nt(Nt::S), Symbol::nt(Nt::P)], 0)
        .rule(
            Nt::P,
            [Symbol::nt(Nt::A), Symbol::nt(Nt::A), Symbol::t(Kind::Num)],
            1,
        )
        .rule(Nt::P, [Symbol::t(Kind::Num)], 2)
        .rule(Nt::A, [], 0)
        .rule(Nt::A, [Symbol::t(Kind::Num)], 1)
        .build()
        .expect("valid grammar")
}

/// `count` numbers separated by spaces.
pub fn numbers(count: usize) -> String {
    (1..=count).map(|i| (i % 10).to_string()).collect::<Vec<_>>().join(" ")
}

/// Every nonterminal node is the one its key looks up, has at least one
/// alternative, and each alternative's children tile its span in order.
pub fn assert_well_formed(forest: &Forest<'_, Kind, Nt>) {
    for (id, node) in forest.nodes() {
        let ForestNode::NonTerminal {
            symbol,
            start,
            end,
            alternatives,
        } = node
        else {
            continue;
        };
        assert_eq!(forest.lookup(symbol, *start, *end), Some(id));
        assert!(!alternatives.is_empty(), "{id} has no alternatives");
        for alternative in alternatives {
            let rule = forest.grammar().rule(alternative.rule);
            assert_eq!(&rule.lhs, *symbol);
            assert_eq!(alternative.children.len(), rule.rhs.len());
            let mut at = *start;
            for &child in &alternative.children {
                let (from, to) = forest.node(child).span();
                assert_eq!(from, at, "gap before {child} in {id}");
                at = to;
            }
            assert_eq!(at, *end, "alternative of {id} stops short");
        }
    }
}

/// `n` numbers joined by the given operators, e.g. `1 + 2 * 3`.
pub fn chain(operators: &[char]) -> String {
    let mut text = String::from("1");
    for (i, op) in operators.iter().enumerate() {
        text.push(' ');
        text.push(*op);
        text.push(' ');
        text.push_str(&(i + 2).to_string());
    }
    text
}

/// Number of binary bracketings of `n` operators.
pub fn catalan(n: u32) -> BigUint {
    let mut c = BigUint::from(1u32);
    for k in 0..n {
        c = c * BigUint::from(2 * (2 * k + 1)) / BigUint::from(k + 2);
    }
    c
}
