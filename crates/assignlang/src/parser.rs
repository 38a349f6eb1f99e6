//! Recursive-descent parser over a [`TokenList`].
//!
//! Grammar:
//!
//! ```text
//! StatementList       := (Statement SEMICOLON)*   -- one per SEMICOLON in the input
//! Statement           := AssignmentStatement
//! AssignmentStatement := VARIABLE ASSIGN Expression
//! Expression          := Term
//!                      | Term OPERATOR Expression
//!                      | '(' Expression ')' [ OPERATOR Term ]
//!                      | '(' Expression OPERATOR Term ')'
//! Term                := INTEGER | VARIABLE
//! ```
//!
//! Chained operators nest to the right: `1 + 2 + 3` becomes `1 + (2 + 3)`. There is no
//! precedence between operators. A parenthesized group takes at most one trailing
//! `OPERATOR Term`; `(a) - 2 / c` is a syntax error.

use tracing::trace;

use crate::ast::{AssignmentStatement, Expression, Operator, StatementList, Term};
use crate::tokenizer::{Token, TokenKind, TokenList, TokenValue};

/// Upper bound on nested expression rules (parentheses and chained operators together).
pub const MAX_NESTING_DEPTH: usize = 256;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("expected {expected} but found {found}")]
    UnexpectedToken {
        expected: TokenKind,
        found: TokenKind,
    },
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    #[error("expected INTEGER or VARIABLE but found {found}")]
    ExpectedTerm { found: TokenKind },
    #[error("unknown operator '{symbol}'")]
    UnknownOperator { symbol: String },
    #[error("expression too deeply nested (limit {limit})")]
    NestingTooDeep { limit: usize },
    #[error("unexpected {found} after final statement")]
    TrailingInput { found: TokenKind },
}

pub struct Parser {
    tokens: TokenList,
    position: usize,
    depth: usize,
}

impl Parser {
    pub fn new(tokens: TokenList) -> Self {
        Self {
            tokens,
            position: 0,
            depth: 0,
        }
    }

    /// Index of the next unread token.
    pub fn position(&self) -> usize {
        self.position
    }

    fn peek(&self) -> Result<&Token, SyntaxError> {
        self.tokens
            .get(self.position)
            .ok_or(SyntaxError::UnexpectedEndOfInput)
    }

    fn next_is(&self, kind: TokenKind) -> Result<bool, SyntaxError> {
        Ok(self.peek()?.kind() == kind)
    }

    fn consume(&mut self, expected: TokenKind) -> Result<Token, SyntaxError> {
        let token = self.peek()?;
        if token.kind() != expected {
            return Err(SyntaxError::UnexpectedToken {
                expected,
                found: token.kind(),
            });
        }
        let token = token.clone();
        self.position += 1;
        Ok(token)
    }

    fn consume_operator(&mut self) -> Result<Operator, SyntaxError> {
        let symbol = self.consume(TokenKind::Operator)?.source_text();
        Operator::from_symbol(&symbol).ok_or(SyntaxError::UnknownOperator { symbol })
    }

    #[tracing::instrument(level = "trace", skip_all)]
    pub fn parse(mut self) -> Result<StatementList, SyntaxError> {
        let statement_count = self.tokens.count(&Token::semicolon());
        trace!(statement_count, "Parsing statement list");
        if statement_count == 0 {
            return Err(SyntaxError::UnexpectedEndOfInput);
        }

        let mut statements = Vec::with_capacity(statement_count);
        for _ in 0..statement_count {
            statements.push(self.parse_statement()?);
            self.consume(TokenKind::Semicolon)?;
        }

        if let Some(token) = self.tokens.get(self.position) {
            return Err(SyntaxError::TrailingInput { found: token.kind() });
        }

        Ok(StatementList { statements })
    }

    fn parse_statement(&mut self) -> Result<AssignmentStatement, SyntaxError> {
        self.parse_assignment_statement()
    }

    fn parse_assignment_statement(&mut self) -> Result<AssignmentStatement, SyntaxError> {
        let variable = self.consume(TokenKind::Variable)?.source_text();
        self.consume(TokenKind::Assign)?;
        trace!(%variable, "Parsing assignment statement");
        let value = self.parse_expression()?;
        trace!(%variable, depth = value.depth(), "Parsed assignment statement");
        Ok(AssignmentStatement { variable, value })
    }

    fn parse_expression(&mut self) -> Result<Expression, SyntaxError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(SyntaxError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
            });
        }
        self.depth += 1;
        let expression = if self.next_is(TokenKind::ParenOpen)? {
            self.parse_parenthesized()
        } else {
            self.parse_operator_chain()
        };
        self.depth -= 1;
        expression
    }

    fn parse_parenthesized(&mut self) -> Result<Expression, SyntaxError> {
        trace!(position = self.position, "Parsing parenthesized expression");
        self.consume(TokenKind::ParenOpen)?;
        let inner = self.parse_expression()?;

        // Operator before the closing parenthesis: `( inner op term )`.
        if self.next_is(TokenKind::Operator)? {
            let operator = self.consume_operator()?;
            let right = Expression::Term(self.parse_term()?);
            self.consume(TokenKind::ParenClose)?;
            let right = self.extend_right_operand(operator, right)?;
            return Ok(Expression::binary(operator, inner, right));
        }

        self.consume(TokenKind::ParenClose)?;
        if self.next_is(TokenKind::Operator)? {
            let operator = self.consume_operator()?;
            let right = Expression::Term(self.parse_term()?);
            let right = self.extend_right_operand(operator, right)?;
            return Ok(Expression::binary(operator, inner, right));
        }

        Ok(inner)
    }

    /// When an operator follows the right term of a parenthesized group, the rest is
    /// parsed as an expression starting at that operator, which is left unconsumed. Any
    /// such input is therefore rejected with `ExpectedTerm { found: OPERATOR }`.
    fn extend_right_operand(
        &mut self,
        operator: Operator,
        right: Expression,
    ) -> Result<Expression, SyntaxError> {
        if !self.next_is(TokenKind::Operator)? {
            return Ok(right);
        }
        let rest = self.parse_expression()?;
        Ok(Expression::binary(operator, right, rest))
    }

    fn parse_operator_chain(&mut self) -> Result<Expression, SyntaxError> {
        let mut left = Expression::Term(self.parse_term()?);
        if self.next_is(TokenKind::Semicolon)? {
            return Ok(left);
        }

        while self.next_is(TokenKind::Operator)? {
            let operator = self.consume_operator()?;
            let right = self.parse_expression()?;
            left = Expression::binary(operator, left, right);
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Term, SyntaxError> {
        let token = self.peek()?;
        let term = match (token.kind(), token.value()) {
            (TokenKind::Integer, TokenValue::Integer(value)) => Term::Integer(*value),
            (TokenKind::Variable, TokenValue::Text(name)) => Term::Variable(name.clone()),
            (found, _) => return Err(SyntaxError::ExpectedTerm { found }),
        };
        self.position += 1;
        Ok(term)
    }
}

pub fn parse(tokens: TokenList) -> Result<StatementList, SyntaxError> {
    Parser::new(tokens).parse()
}
