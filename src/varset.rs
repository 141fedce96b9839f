//! Register of the currently quantified variable set.
//!
//! A variable set is a chain of nodes linked through their `high` children,
//! one node per variable. Registering a set bumps a global generation and
//! stamps every level of the chain with it, so membership is a single
//! comparison and switching sets never requires clearing the register.

use std::fmt;

use log::{debug, trace};

use crate::config::DEFAULT_COUNTER_LIMIT;
use crate::error::{CacheError, Result};
use crate::node::NodeTable;
use crate::reference::NodeId;
use crate::types::Level;

/// Generation of a registered variable set.
///
/// Caches that depend on the quantified set fold this into their tag, which
/// makes entries computed for other sets unreachable.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Generation(u32);

impl Generation {
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct VarsetRegister {
    /// Generation stamp per level. Zero never equals a live generation.
    levels: Vec<u32>,
    generation: u32,
    limit: u32,
    /// Deepest level of the current set.
    last: Option<Level>,
}

impl Default for VarsetRegister {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTER_LIMIT)
    }
}

impl VarsetRegister {
    /// Creates an empty register. The generation restarts at 1 once it reaches `limit`.
    pub fn new(limit: u32) -> Self {
        assert!(limit >= 2, "Generation limit must be at least 2, got {}", limit);
        Self {
            levels: Vec::new(),
            generation: 0,
            limit,
            last: None,
        }
    }

    /// Generation of the current set (0 before the first registration).
    pub fn generation(&self) -> Generation {
        Generation(self.generation)
    }

    /// Deepest level of the current set.
    pub fn last(&self) -> Option<Level> {
        self.last
    }

    /// Number of levels the register currently covers.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Is `level` in the current set?
    pub fn contains(&self, level: Level) -> bool {
        self.generation != 0 && self.levels.get(level.index()) == Some(&self.generation)
    }

    /// Levels of the current set, top to bottom.
    pub fn levels(&self) -> impl Iterator<Item = Level> + '_ {
        let generation = self.generation;
        self.levels
            .iter()
            .enumerate()
            .filter(move |&(_, &g)| generation != 0 && g == generation)
            .map(|(i, _)| Level::new(i))
    }

    /// Drops all stamps. The register is re-sized on the next registration.
    ///
    /// The generation counter keeps running, so ids handed out before stay stale.
    pub fn clear(&mut self) {
        self.levels = Vec::new();
        self.last = None;
    }

    /// Makes the chain starting at `head` the current variable set.
    ///
    /// Fails if `head` is a terminal: a variable set has at least one variable.
    pub fn register<T>(&mut self, nodes: &T, head: NodeId) -> Result<Generation>
    where
        T: NodeTable + ?Sized,
    {
        if head.is_terminal() || !head.is_valid() {
            return Err(CacheError::IllegalVarset { node: head });
        }

        self.generation += 1;
        if self.generation >= self.limit {
            debug!("varset generation reached {}, clearing register", self.limit);
            self.levels = vec![0; nodes.var_count()];
            self.generation = 1;
        }
        if self.levels.len() < nodes.var_count() {
            self.levels.resize(nodes.var_count(), 0);
        }

        let mut last: Option<Level> = None;
        let mut current = head;
        while !current.is_terminal() {
            let node = nodes.node(current);
            let index = node.level.index();
            if index >= self.levels.len() {
                self.levels.resize(index + 1, 0);
            }
            self.levels[index] = self.generation;
            last = last.max(Some(node.level));
            current = node.high;
        }
        self.last = last;

        trace!("registered varset {} as {} (last = {:?})", head, self.generation(), self.last);
        Ok(self.generation())
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::node::Node;

    /// Node table holding only variable-set chains.
    struct Chains {
        nodes: Vec<Node>,
        vars: usize,
    }

    impl Chains {
        fn new(vars: usize) -> Self {
            Self {
                nodes: vec![Node::default(); 2],
                vars,
            }
        }

        /// Builds the chain for `levels` and returns its head.
        fn varset(&mut self, levels: &[usize]) -> NodeId {
            let mut levels = levels.to_vec();
            levels.sort_unstable();
            let mut head = NodeId::ONE;
            for &level in levels.iter().rev() {
                self.nodes.push(Node::new(Level::new(level), NodeId::ZERO, head));
                head = NodeId::new(self.nodes.len() as u32 - 1);
            }
            head
        }
    }

    impl NodeTable for Chains {
        fn node_count(&self) -> usize {
            self.nodes.len()
        }

        fn var_count(&self) -> usize {
            self.vars
        }

        fn node(&self, id: NodeId) -> Node {
            self.nodes[id.index()]
        }
    }

    #[test]
    fn test_register_and_contains() {
        let mut nodes = Chains::new(8);
        let set = nodes.varset(&[2, 4, 7]);

        let mut register = VarsetRegister::default();
        assert!(register.is_empty());
        let generation = register.register(&nodes, set).unwrap();

        assert_eq!(generation.get(), 1);
        assert_eq!(register.len(), 8);
        assert!(register.contains(Level::new(4)));
        assert!(!register.contains(Level::new(5)));
        assert_eq!(register.last(), Some(Level::new(7)));
        assert_eq!(
            register.levels().collect::<Vec<_>>(),
            vec![Level::new(2), Level::new(4), Level::new(7)]
        );
    }

    #[test]
    fn test_rebuild_makes_old_levels_stale() {
        let mut nodes = Chains::new(8);
        let first = nodes.varset(&[2, 4, 7]);
        let second = nodes.varset(&[4, 6]);

        let mut register = VarsetRegister::default();
        register.register(&nodes, first).unwrap();
        register.register(&nodes, second).unwrap();

        assert!(register.contains(Level::new(4)));
        assert!(register.contains(Level::new(6)));
        assert!(!register.contains(Level::new(2)));
        assert!(!register.contains(Level::new(7)));
        assert_eq!(register.last(), Some(Level::new(6)));
    }

    #[test]
    fn test_terminal_head_is_illegal() {
        let nodes = Chains::new(4);
        let mut register = VarsetRegister::default();

        for head in [NodeId::ZERO, NodeId::ONE] {
            let err = register.register(&nodes, head).unwrap_err();
            assert!(matches!(err, CacheError::IllegalVarset { node } if node == head));
        }
        assert_eq!(register.generation().get(), 0);
    }

    #[test]
    fn test_generation_is_monotonic() {
        let mut nodes = Chains::new(4);
        let set = nodes.varset(&[1]);
        let mut register = VarsetRegister::default();

        let mut previous = register.generation();
        for _ in 0..10 {
            let generation = register.register(&nodes, set).unwrap();
            assert!(generation > previous);
            previous = generation;
        }
    }

    #[test]
    fn test_generation_wraps_and_clears() {
        let mut nodes = Chains::new(4);
        let a = nodes.varset(&[0]);
        let b = nodes.varset(&[1]);

        let mut register = VarsetRegister::new(3);
        assert_eq!(register.register(&nodes, a).unwrap().get(), 1);
        assert_eq!(register.register(&nodes, b).unwrap().get(), 2);
        assert!(register.contains(Level::new(1)));

        // The third registration hits the limit: the register is cleared
        // and the counter restarts at 1.
        assert_eq!(register.register(&nodes, b).unwrap().get(), 1);
        assert!(register.contains(Level::new(1)));
        // Level 0 was stamped with generation 1 before the wrap; it must not match now.
        assert!(!register.contains(Level::new(0)));
    }

    #[test]
    fn test_lazy_sizing() {
        let mut nodes = Chains::new(3);
        let set = nodes.varset(&[0, 2]);

        let mut register = VarsetRegister::default();
        register.register(&nodes, set).unwrap();
        assert_eq!(register.len(), 3);

        register.clear();
        assert!(register.is_empty());
        assert!(!register.contains(Level::new(0)));

        register.register(&nodes, set).unwrap();
        assert!(register.contains(Level::new(2)));
    }
}
