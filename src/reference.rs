use std::fmt::{Display, Formatter};

/// Identifier of a node in the external node table.
///
/// Ids are plain integers without ownership semantics: the node table owns
/// the nodes, and the same id may denote a different node after garbage
/// collection or compaction.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId(i32);

impl NodeId {
    /// The constant-false terminal.
    pub const ZERO: NodeId = NodeId(0);
    /// The constant-true terminal.
    pub const ONE: NodeId = NodeId(1);
    /// Marker stored in the first key field of an empty cache slot.
    pub const INVALID: NodeId = NodeId(-1);

    /// Creates an id from a node table index.
    ///
    /// # Panics
    ///
    /// Panics if `index` does not fit into a non-negative `i32`.
    pub const fn new(index: u32) -> Self {
        assert!(index <= i32::MAX as u32, "Node index out of range");
        Self(index as i32)
    }

    /// Return the internal representation of the id.
    pub const fn get(self) -> i32 {
        self.0
    }

    /// Return the index of the node in the node table.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn is_terminal(self) -> bool {
        self.0 == 0 || self.0 == 1
    }

    pub const fn is_valid(self) -> bool {
        self.0 >= 0
    }
}

impl From<u32> for NodeId {
    fn from(index: u32) -> Self {
        Self::new(index)
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "@{}", self.0)
        } else {
            write!(f, "@invalid")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminals() {
        assert!(NodeId::ZERO.is_terminal());
        assert!(NodeId::ONE.is_terminal());
        assert!(!NodeId::new(2).is_terminal());
        assert!(!NodeId::INVALID.is_terminal());
    }

    #[test]
    fn test_sentinel_is_never_valid() {
        assert!(!NodeId::INVALID.is_valid());
        assert!(NodeId::new(0).is_valid());
        assert!(NodeId::new(i32::MAX as u32).is_valid());
        assert_ne!(NodeId::new(i32::MAX as u32), NodeId::INVALID);
    }

    #[test]
    #[should_panic(expected = "Node index out of range")]
    fn test_index_too_large() {
        NodeId::new(u32::MAX);
    }

    #[test]
    fn test_display() {
        assert_eq!(NodeId::new(42).to_string(), "@42");
        assert_eq!(NodeId::INVALID.to_string(), "@invalid");
    }
}
