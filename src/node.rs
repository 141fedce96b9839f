//! Interface to the external node table.

use crate::reference::NodeId;
use crate::types::Level;

/// The part of a BDD node the cache layer reads.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Node {
    pub level: Level,
    pub low: NodeId,
    pub high: NodeId,
}

impl Node {
    pub fn new(level: Level, low: NodeId, high: NodeId) -> Self {
        Self { level, low, high }
    }
}

impl Default for Node {
    fn default() -> Self {
        Self {
            level: Level::new(0),
            low: NodeId::ZERO,
            high: NodeId::ZERO,
        }
    }
}

/// Node table owned by the engine.
///
/// Only the variable-set register walks nodes; the caches themselves treat
/// node ids as opaque integers.
pub trait NodeTable {
    /// Number of slots in the node table. Caches with a non-zero ratio are
    /// sized relative to this.
    fn node_count(&self) -> usize;

    /// Number of declared variables (and thus levels).
    fn var_count(&self) -> usize;

    /// Level and children of a non-terminal node.
    fn node(&self, id: NodeId) -> Node;
}
