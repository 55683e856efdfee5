//! Parse an arithmetic expression with an ambiguous grammar, then report the
//! number of parses, the cheapest one and every parse in enumeration order.
//!
//! ```text
//! RUST_LOG=thicket=debug cargo run --example ambiguous_arith -- "1 + 2 * 3 + 4"
//! ```

use thicket::error::LexError;
use thicket::grammar::{GrammarBuilder, NonTerminal, Symbol};
use thicket::lexer::{Token, TokenKind, TokenStream, Tokenizer};
use thicket::parser::{ChartParser, ParserConfig};
use thicket::syntax::LineIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Kind {
    Num,
    Plus,
    Star,
    Whitespace,
}

impl TokenKind for Kind {
    fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Nt {
    Expr,
}

impl NonTerminal for Nt {
    fn name(&self) -> &str {
        "Expr"
    }
}

struct ArithTokenizer;

impl Tokenizer<Kind> for ArithTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Token<Kind>>, LexError> {
        let index = LineIndex::new(text);
        let mut tokens = Vec::new();
        let mut chars = text.char_indices().peekable();
        while let Some((start, c)) = chars.next() {
            let kind = match c {
                '+' => Kind::Plus,
                '*' => Kind::Star,
                c if c.is_ascii_digit() => Kind::Num,
                c if c.is_whitespace() => Kind::Whitespace,
                other => {
                    return Err(LexError::unexpected_char(
                        other,
                        index.span(start, start + other.len_utf8()),
                    ))
                }
            };
            let mut end = start + c.len_utf8();
            if kind == Kind::Num {
                while let Some(&(i, d)) = chars.peek() {
                    if !d.is_ascii_digit() {
                        break;
                    }
                    end = i + 1;
                    chars.next();
                }
            }
            tokens.push(Token::new(kind, &text[start..end], index.span(start, end)));
        }
        Ok(tokens)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let text = if args.is_empty() {
        "1 + 2 * 3 + 4".to_string()
    } else {
        args.join(" ")
    };

    let expr = || Symbol::nt(Nt::Expr);
    let grammar = GrammarBuilder::new()
        .entry_point(Nt::Expr)
        .rule(Nt::Expr, [expr(), Symbol::t(Kind::Plus), expr()], 2)
        .rule(Nt::Expr, [expr(), Symbol::t(Kind::Star), expr()], 1)
        .rule(Nt::Expr, [Symbol::t(Kind::Num)], 0)
        .build()?;

    let mut stream = TokenStream::new();
    stream.tokenize_from(&ArithTokenizer, &text)?;

    let parser = ChartParser::new(&grammar, ParserConfig::default());
    let forest = match parser.parse(&mut stream) {
        Ok(forest) => forest,
        Err(err) => {
            println!("Invalid parse: {err}");
            match stream.cur_tok() {
                Some(token) => println!("Next token is {}", token.describe()),
                None => println!("Input ended at {}", stream.end_span()),
            }
            return Ok(());
        }
    };

    if let Some(root) = forest.root_price()? {
        println!("Count: {}, min cost: {}", root.count, root.min_cost);
    }
    println!("There are {} potential parses", forest.count_all_parses()?);
    println!("Cheapest parse: {}", forest.construct_cheapest_parse()?);

    let mut cursor = None;
    let mut count = 0;
    while let Some(next) = forest.construct_next_parse(cursor.as_ref())? {
        count += 1;
        println!("Parse {count}: {} {}", next.parse.weight(), next.parse);
        cursor = Some(next.directions);
    }

    if let Some(last) = cursor {
        println!("Last cursor: {}", serde_json::to_string(&last)?);
    }
    Ok(())
}
