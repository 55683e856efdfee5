//! # Thicket
//!
//! Chart parsing for ambiguous context-free grammars.
//!
//! ## Overview
//!
//! Thicket parses a token stream against a grammar that may be ambiguous and
//! keeps every derivation instead of picking one up front:
//!
//! - **Chart parser**: an Earley recognizer that handles left recursion,
//!   empty rules and ambiguity, and reports the furthest position reached and
//!   the expected terminals when the input is rejected
//! - **Shared parse forest**: all derivations in one graph, with identical
//!   sub-derivations stored once
//! - **Pricing**: per-node cheapest cost and exact derivation count, computed
//!   once and cached in the forest
//! - **Cheapest parse**: one lowest-cost derivation, ties broken by rule
//!   declaration order
//! - **Enumeration**: every derivation exactly once, one at a time, resumable
//!   from a plain-data cursor that can be serialized and handed back later
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use thicket::grammar::{GrammarBuilder, Symbol};
//! use thicket::lexer::TokenStream;
//! use thicket::parser::{ChartParser, ParserConfig};
//!
//! // E -> E '+' E [1] | E '*' E [1] | num [0]
//! let grammar = GrammarBuilder::new()
//!     .entry_point(Nt::E)
//!     .rule(Nt::E, [Symbol::nt(Nt::E), Symbol::t(Kind::Plus), Symbol::nt(Nt::E)], 1)
//!     .rule(Nt::E, [Symbol::nt(Nt::E), Symbol::t(Kind::Star), Symbol::nt(Nt::E)], 1)
//!     .rule(Nt::E, [Symbol::t(Kind::Num)], 0)
//!     .build()?;
//!
//! let mut stream = TokenStream::new();
//! stream.tokenize_from(&ArithTokenizer, "1 + 2 * 3")?;
//!
//! let parser = ChartParser::new(&grammar, ParserConfig::default());
//! let forest = parser.parse(&mut stream)?;
//!
//! assert_eq!(forest.count_all_parses()?, 2u32.into());
//! println!("cheapest: {}", forest.construct_cheapest_parse()?);
//!
//! let mut cursor = None;
//! while let Some(next) = forest.construct_next_parse(cursor.as_ref())? {
//!     println!("{}", next.parse);
//!     cursor = Some(next.directions);
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `serialize` (default): serde support for enumeration cursors, spans and
//!   parser configuration
//! - `diagnostics`: `miette::Diagnostic` for lexer and forest errors

pub mod error;
pub mod forest;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod syntax;

pub use error::{ForestError, LexError, ParseError, SyntaxError};
pub use forest::{Directions, Forest, NodeId, Parse, ParseNode};
pub use grammar::{Cost, Grammar, GrammarBuilder, GrammarError, NonTerminal, Symbol};
pub use lexer::{Token, TokenKind, TokenStream, Tokenizer};
pub use parser::{ChartParser, ParserConfig};
