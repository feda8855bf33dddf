//! Parser test suite: grammar coverage, limits, universal invariants.

mod grammar;
mod limits;

use crate::{NodeId, NodeKind, Parse, SyntaxError, parse};

pub(crate) fn parse_ok(source: &str) -> Parse {
    match parse(source) {
        Ok(parse) => parse,
        Err(err) => panic!("parse failed for {source:?}: {err}"),
    }
}

pub(crate) fn parse_err(source: &str) -> SyntaxError {
    parse(source).expect_err("expected a parse failure")
}

pub(crate) fn dump(source: &str) -> String {
    let parse = parse_ok(source);
    parse.arena.dump(parse.root, source)
}

/// All node ids in allocation order.
pub(crate) fn node_ids(parse: &Parse) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
    (0..parse.arena.node_count() as u32).map(NodeId::new)
}

/// First node of the given kind, in allocation order.
pub(crate) fn find(parse: &Parse, kind: NodeKind) -> NodeId {
    node_ids(parse)
        .find(|&id| parse.arena.kind(id) == kind)
        .unwrap_or_else(|| panic!("no {kind:?} node in tree"))
}

/// Last node of the given kind: with post-order allocation this is the
/// outermost one.
pub(crate) fn find_last(parse: &Parse, kind: NodeKind) -> NodeId {
    node_ids(parse)
        .filter(|&id| parse.arena.kind(id) == kind)
        .next_back()
        .unwrap_or_else(|| panic!("no {kind:?} node in tree"))
}

pub(crate) fn child_kinds(parse: &Parse, id: NodeId) -> Vec<NodeKind> {
    parse
        .arena
        .children(id)
        .map(|child| parse.arena.kind(child))
        .collect()
}
