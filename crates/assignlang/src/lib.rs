//! Tokenizer and recursive-descent parser for a tiny assignment language.
//!
//! Source text is a sequence of `<variable> = <expression> ;` statements built from
//! integers, variable names, `+ - * /` and parentheses:
//!
//! ```text
//! source --tokenize--> TokenList --parse--> StatementList
//! ```

pub mod ast;
pub mod ast_walk;
pub mod parser;
pub mod tokenizer;
pub mod tree_dump;

pub use ast::{AssignmentStatement, Expression, Operator, StatementList, Term};
pub use parser::{parse, Parser, SyntaxError};
pub use tokenizer::{tokenize, InvalidToken, LexicalError, Token, TokenKind, TokenList, TokenValue};
pub use tree_dump::dump_tree;

/// Tokenizes and parses `source` in one go.
pub fn parse_source(source: &str) -> anyhow::Result<StatementList> {
    let tokens = tokenize(source)?;
    let ast = parse(tokens)?;
    Ok(ast)
}
