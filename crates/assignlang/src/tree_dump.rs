//! Indented text rendering of a syntax tree, mostly for debugging and tests.
//!
//! One node per line, depth first, each line indented by one tab per level and written
//! as `Type: value`. Nodes without a value print their type alone.

use std::fmt;

use crate::ast::StatementList;
use crate::ast_walk::{try_walk_depth_first, NodeRef};

pub fn dump_tree(list: &StatementList) -> String {
    list.to_string()
}

impl fmt::Display for StatementList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        try_walk_depth_first(NodeRef::StatementList(self), &mut |node, depth| {
            for _ in 0..depth {
                f.write_str("\t")?;
            }
            match node.value() {
                Some(value) => writeln!(f, "{}: {}", node.node_type(), value),
                None => writeln!(f, "{}", node.node_type()),
            }
        })
    }
}
