//! Syntax tree produced by the parser.
//!
//! Arity is carried by the types themselves: a [`Term`] has no children, a binary
//! [`Expression`] always owns exactly two operands, and an [`AssignmentStatement`]
//! owns exactly one right-hand side.

use std::fmt;

use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StatementList {
    pub statements: Vec<AssignmentStatement>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AssignmentStatement {
    pub variable: String,
    pub value: Expression,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Expression {
    Binary {
        operator: Operator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Term(Term),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Term {
    Integer(i64),
    Variable(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Operator::Add),
            "-" => Some(Operator::Subtract),
            "*" => Some(Operator::Multiply),
            "/" => Some(Operator::Divide),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Integer(value) => write!(f, "{value}"),
            Term::Variable(name) => f.write_str(name),
        }
    }
}

impl StatementList {
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Total number of nodes in the tree, the root included.
    pub fn node_count(&self) -> usize {
        1 + self
            .statements
            .iter()
            .map(|statement| 1 + statement.value.node_count())
            .sum::<usize>()
    }
}

impl AssignmentStatement {
    pub fn new(variable: impl Into<String>, value: Expression) -> Self {
        Self {
            variable: variable.into(),
            value,
        }
    }
}

impl Expression {
    pub fn binary(operator: Operator, left: Expression, right: Expression) -> Self {
        Expression::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn integer(value: i64) -> Self {
        Expression::Term(Term::Integer(value))
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Expression::Term(Term::Variable(name.into()))
    }

    pub fn node_count(&self) -> usize {
        match self {
            Expression::Binary { left, right, .. } => 1 + left.node_count() + right.node_count(),
            Expression::Term(_) => 1,
        }
    }

    /// Height of the expression tree; a lone term has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Expression::Binary { left, right, .. } => 1 + left.depth().max(right.depth()),
            Expression::Term(_) => 1,
        }
    }
}
