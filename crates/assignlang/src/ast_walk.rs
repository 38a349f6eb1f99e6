use std::convert::Infallible;

use crate::ast::{AssignmentStatement, Expression, StatementList};

/// A borrowed view of any node in the tree, used by depth-first walkers.
#[derive(Clone, Copy, Debug)]
pub enum NodeRef<'a> {
    StatementList(&'a StatementList),
    AssignmentStatement(&'a AssignmentStatement),
    Expression(&'a Expression),
}

impl<'a> NodeRef<'a> {
    pub fn node_type(&self) -> &'static str {
        match self {
            NodeRef::StatementList(_) => "StatementList",
            NodeRef::AssignmentStatement(_) => "AssignmentStatement",
            NodeRef::Expression(Expression::Binary { .. }) => "Expression",
            NodeRef::Expression(Expression::Term(_)) => "Term",
        }
    }

    /// The node's value as it appears in a tree dump, if it has one.
    pub fn value(&self) -> Option<String> {
        match self {
            NodeRef::StatementList(_) => None,
            NodeRef::AssignmentStatement(statement) => Some(statement.variable.clone()),
            NodeRef::Expression(Expression::Binary { operator, .. }) => {
                Some(operator.to_string())
            }
            NodeRef::Expression(Expression::Term(term)) => Some(term.to_string()),
        }
    }

    pub fn children(&self) -> Vec<NodeRef<'a>> {
        match *self {
            NodeRef::StatementList(list) => list
                .statements
                .iter()
                .map(NodeRef::AssignmentStatement)
                .collect(),
            NodeRef::AssignmentStatement(statement) => vec![NodeRef::Expression(&statement.value)],
            NodeRef::Expression(Expression::Binary { left, right, .. }) => {
                vec![NodeRef::Expression(left), NodeRef::Expression(right)]
            }
            NodeRef::Expression(Expression::Term(_)) => Vec::new(),
        }
    }
}

/// Visits every node in pre-order, passing its depth (the root is at depth 0).
pub fn walk_depth_first<'a, F>(root: NodeRef<'a>, visit: &mut F)
where
    F: FnMut(NodeRef<'a>, usize),
{
    let walked: Result<(), Infallible> = try_walk_depth_first(root, &mut |node, depth| {
        visit(node, depth);
        Ok(())
    });
    match walked {
        Ok(()) => {}
        Err(never) => match never {},
    }
}

/// Pre-order walk that stops at the first error returned by `visit`.
pub fn try_walk_depth_first<'a, E, F>(root: NodeRef<'a>, visit: &mut F) -> Result<(), E>
where
    F: FnMut(NodeRef<'a>, usize) -> Result<(), E>,
{
    try_walk_inner(root, 0, visit)
}

fn try_walk_inner<'a, E, F>(node: NodeRef<'a>, depth: usize, visit: &mut F) -> Result<(), E>
where
    F: FnMut(NodeRef<'a>, usize) -> Result<(), E>,
{
    visit(node, depth)?;
    for child in node.children() {
        try_walk_inner(child, depth + 1, visit)?;
    }
    Ok(())
}
