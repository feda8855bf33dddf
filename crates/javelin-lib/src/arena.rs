//! Index-overlay node store.
//!
//! Nodes are fixed-size records `(kind, start, end, first_child)` in
//! parallel arrays, with sibling chaining in a `next_sibling` array. The
//! tree borrows nothing: records hold absolute source offsets, and the
//! caller keeps the source alongside the arena to recover text.
//!
//! Allocation is append-only and post-order: a parent is allocated after
//! all of its children, so a node's id is strictly greater than the id of
//! any descendant and a linear walk of the arena is a topological order.
//!
//! Attributes for the few kinds that carry one live out-of-line in a
//! sparse side table, keeping the hot arrays small and of uniform stride.
//!
//! A watchdog bounds the arena on adversarial input: a hard node-count cap
//! plus a soft memory ceiling checked every 1000 allocations.

use indexmap::IndexMap;
use javelin_core::{Interner, Symbol};
use rowan::TextRange;
use serde::Serialize;

use crate::syntax::NodeKind;

/// Id of a node in its arena. Valid only against the arena that made it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub(crate) fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// Sentinel for "no node" in the child/sibling arrays.
const NONE: u32 = u32::MAX;

/// Estimated bytes per node record, for the memory watchdog.
const NODE_RECORD_BYTES: usize = 2 + 4 + 4 + 4 + 4;

/// Out-of-line attribute for the attribute-bearing node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    TypeDeclaration {
        name: Symbol,
    },
    Import {
        qualified_name: Symbol,
        is_static: bool,
    },
    Package {
        name: Symbol,
    },
    Parameter {
        name: Symbol,
        is_final: bool,
        is_var_args: bool,
        is_receiver: bool,
    },
}

/// Watchdog budgets. Exceeding either fails the current allocation.
#[derive(Debug, Clone, Copy)]
pub struct ArenaLimits {
    /// Hard cap on the number of nodes.
    pub max_nodes: u32,
    /// Soft ceiling on estimated bytes in use, checked every 1000
    /// allocations.
    pub memory_soft_limit: usize,
}

impl Default for ArenaLimits {
    fn default() -> Self {
        Self {
            max_nodes: 16_000_000,
            memory_soft_limit: 512 * 1024 * 1024,
        }
    }
}

/// Allocation failure raised by the watchdog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArenaError {
    #[error("Arena is full: node limit of {limit} reached")]
    Full { limit: u32 },

    #[error("Arena memory pressure: {used} bytes in use exceeds the soft limit of {limit}")]
    MemoryPressure { used: usize, limit: usize },
}

/// Flat node record for serialization and tooling.
#[derive(Debug, Clone, Serialize)]
pub struct NodeRecord<'a> {
    pub kind: NodeKind,
    pub start: u32,
    pub end: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
}

/// Bump-allocated, append-only node store indexed by small integer ids.
///
/// Exclusively mutated by its parser during a parse; read-only afterwards
/// and shareable by any number of readers. `reset` returns it to empty for
/// pooled reuse.
#[derive(Debug)]
pub struct NodeArena {
    kinds: Vec<NodeKind>,
    starts: Vec<u32>,
    ends: Vec<u32>,
    first_child: Vec<u32>,
    next_sibling: Vec<u32>,
    attributes: IndexMap<u32, Attribute>,
    interner: Interner,
    limits: ArenaLimits,
    allocs_since_check: u32,
}

impl Default for NodeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeArena {
    pub fn new() -> Self {
        Self::with_limits(ArenaLimits::default())
    }

    pub fn with_limits(limits: ArenaLimits) -> Self {
        Self {
            kinds: Vec::new(),
            starts: Vec::new(),
            ends: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            attributes: IndexMap::new(),
            interner: Interner::new(),
            limits,
            allocs_since_check: 0,
        }
    }

    /// Number of allocated nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.kinds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Allocate a node whose children (already allocated, in source
    /// order) are linked into its child list.
    pub(crate) fn alloc(
        &mut self,
        kind: NodeKind,
        start: u32,
        end: u32,
        children: &[NodeId],
    ) -> Result<NodeId, ArenaError> {
        debug_assert!(start <= end, "node span must be non-empty ordered");
        self.check_budget()?;

        let id = self.kinds.len() as u32;
        self.kinds.push(kind);
        self.starts.push(start);
        self.ends.push(end);
        self.first_child
            .push(children.first().map_or(NONE, |c| c.0));
        self.next_sibling.push(NONE);

        for pair in children.windows(2) {
            self.next_sibling[pair[0].index()] = pair[1].0;
        }

        Ok(NodeId(id))
    }

    fn check_budget(&mut self) -> Result<(), ArenaError> {
        if self.kinds.len() as u32 >= self.limits.max_nodes {
            return Err(ArenaError::Full {
                limit: self.limits.max_nodes,
            });
        }

        self.allocs_since_check += 1;
        if self.allocs_since_check >= 1000 {
            self.allocs_since_check = 0;
            let used = self.bytes_in_use();
            if used > self.limits.memory_soft_limit {
                return Err(ArenaError::MemoryPressure {
                    used,
                    limit: self.limits.memory_soft_limit,
                });
            }
        }
        Ok(())
    }

    /// Estimated bytes currently held by node records, side tables, and
    /// interned strings.
    pub fn bytes_in_use(&self) -> usize {
        self.kinds.len() * NODE_RECORD_BYTES
            + self.attributes.len() * std::mem::size_of::<(u32, Attribute)>()
            + self.interner.bytes_in_use()
    }

    /// The `(kind, start, end)` triple of a node.
    #[inline]
    pub fn get(&self, id: NodeId) -> (NodeKind, u32, u32) {
        (self.kinds[id.index()], self.starts[id.index()], self.ends[id.index()])
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.kinds[id.index()]
    }

    #[inline]
    pub fn start(&self, id: NodeId) -> u32 {
        self.starts[id.index()]
    }

    #[inline]
    pub fn end(&self, id: NodeId) -> u32 {
        self.ends[id.index()]
    }

    #[inline]
    pub fn span(&self, id: NodeId) -> TextRange {
        TextRange::new(self.start(id).into(), self.end(id).into())
    }

    /// Children of a node, in source order.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            arena: self,
            next: self.first_child[id.index()],
        }
    }

    /// Attribute of an attribute-bearing node, if any.
    pub fn attribute(&self, id: NodeId) -> Option<&Attribute> {
        self.attributes.get(&id.0)
    }

    pub(crate) fn set_attribute(&mut self, id: NodeId, attribute: Attribute) {
        self.attributes.insert(id.0, attribute);
    }

    /// Resolve an interned symbol from a side-table attribute.
    #[inline]
    pub fn resolve(&self, sym: Symbol) -> &str {
        self.interner.resolve(sym)
    }

    pub(crate) fn intern(&mut self, s: &str) -> Symbol {
        self.interner.intern(s)
    }

    pub(crate) fn intern_owned(&mut self, s: String) -> Symbol {
        self.interner.intern_owned(s)
    }

    /// Source text covered by a node's span.
    #[inline]
    pub fn text<'s>(&self, id: NodeId, source: &'s str) -> &'s str {
        &source[self.start(id) as usize..self.end(id) as usize]
    }

    /// Return the arena to empty in O(1) for pooled reuse. All node ids
    /// and symbols handed out before the call are invalidated.
    pub fn reset(&mut self) {
        self.kinds.clear();
        self.starts.clear();
        self.ends.clear();
        self.first_child.clear();
        self.next_sibling.clear();
        self.attributes.clear();
        self.interner.clear();
        self.allocs_since_check = 0;
    }

    /// One-pass post-computation of a parallel parent array. The core
    /// never needs parents; consumers that navigate upward fill this once.
    pub fn compute_parents(&self) -> Vec<Option<NodeId>> {
        let mut parents = vec![None; self.node_count()];
        for id in 0..self.node_count() as u32 {
            let mut child = self.first_child[id as usize];
            while child != NONE {
                parents[child as usize] = Some(NodeId(id));
                child = self.next_sibling[child as usize];
            }
        }
        parents
    }

    /// Flat record view of one node, names resolved.
    pub fn record(&self, id: NodeId) -> NodeRecord<'_> {
        let (kind, start, end) = self.get(id);
        let name = match self.attribute(id) {
            Some(Attribute::TypeDeclaration { name })
            | Some(Attribute::Package { name })
            | Some(Attribute::Parameter { name, .. }) => Some(self.resolve(*name)),
            Some(Attribute::Import { qualified_name, .. }) => Some(self.resolve(*qualified_name)),
            None => None,
        };
        NodeRecord {
            kind,
            start,
            end,
            name,
        }
    }

    /// Flat record view of the whole arena, in allocation (post-) order.
    pub fn records(&self) -> Vec<NodeRecord<'_>> {
        (0..self.node_count() as u32)
            .map(|raw| self.record(NodeId(raw)))
            .collect()
    }

    /// Indented tree dump used by snapshot tests and tooling.
    pub fn dump(&self, root: NodeId, source: &str) -> String {
        let mut out = String::new();
        self.dump_into(&mut out, root, source, 0);
        out
    }

    fn dump_into(&self, out: &mut String, id: NodeId, source: &str, depth: usize) {
        use std::fmt::Write;

        let (kind, start, end) = self.get(id);
        for _ in 0..depth {
            out.push_str("  ");
        }
        let _ = write!(out, "{kind:?} {start}..{end}");

        match self.attribute(id) {
            Some(Attribute::TypeDeclaration { name }) => {
                let _ = write!(out, " name={:?}", self.resolve(*name));
            }
            Some(Attribute::Package { name }) => {
                let _ = write!(out, " name={:?}", self.resolve(*name));
            }
            Some(Attribute::Import {
                qualified_name,
                is_static,
            }) => {
                let _ = write!(out, " name={:?}", self.resolve(*qualified_name));
                if *is_static {
                    out.push_str(" static");
                }
            }
            Some(Attribute::Parameter {
                name,
                is_final,
                is_var_args,
                is_receiver,
            }) => {
                let _ = write!(out, " name={:?}", self.resolve(*name));
                if *is_final {
                    out.push_str(" final");
                }
                if *is_var_args {
                    out.push_str(" varargs");
                }
                if *is_receiver {
                    out.push_str(" receiver");
                }
            }
            None => {}
        }

        let textual = matches!(
            kind,
            NodeKind::Identifier
                | NodeKind::QualifiedName
                | NodeKind::PrimitiveType
                | NodeKind::IntegerLiteral
                | NodeKind::LongLiteral
                | NodeKind::FloatLiteral
                | NodeKind::DoubleLiteral
                | NodeKind::BooleanLiteral
                | NodeKind::StringLiteral
                | NodeKind::CharLiteral
                | NodeKind::NullLiteral
                | NodeKind::LineComment
                | NodeKind::BlockComment
                | NodeKind::JavadocComment
        );
        if textual && self.first_child[id.index()] == NONE {
            let text = &source[start as usize..end as usize];
            let _ = write!(out, " {text:?}");
        }
        out.push('\n');
        for child in self.children(id) {
            self.dump_into(out, child, source, depth + 1);
        }
    }
}

/// Iterator over a node's children in source order.
pub struct Children<'a> {
    arena: &'a NodeArena,
    next: u32,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.next == NONE {
            return None;
        }
        let id = NodeId(self.next);
        self.next = self.arena.next_sibling[id.index()];
        Some(id)
    }
}
