//! Cache for quantification.
//!
//! The index is `#(n, varset)`; the tag combines the quantifier with the
//! generation of the registered variable set. A new set gets a new
//! generation, so results for an older set are never matched again and the
//! table does not have to be cleared between quantifications.

use std::fmt;

use crate::cache::slot_table::{Slot4, SlotTable};
use crate::error::Result;
use crate::reference::NodeId;
use crate::utils::pair_index;
use crate::varset::{Generation, VarsetRegister};

/// Quantifiers sharing the quantification cache.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum QuantKind {
    /// Existential quantification (disjunction of cofactors).
    Exist,
    /// Universal quantification (conjunction of cofactors).
    Forall,
    /// Unique quantification (exclusive-or of cofactors).
    Unique,
}

impl QuantKind {
    pub const ALL: [QuantKind; 3] = [QuantKind::Exist, QuantKind::Forall, QuantKind::Unique];

    /// Cache id of the quantifier. Fits in two bits; `3` is taken by the AppEx cache.
    pub const fn code(self) -> u64 {
        match self {
            QuantKind::Exist => 0,
            QuantKind::Forall => 1,
            QuantKind::Unique => 2,
        }
    }

    /// Tag of quantification entries for a variable set of `generation`.
    pub const fn tag(self, generation: Generation) -> u64 {
        ((generation.get() as u64) << 2) | self.code()
    }
}

#[derive(Debug, Clone)]
pub struct QuantCache {
    table: SlotTable<Slot4>,
}

impl QuantCache {
    pub fn new(size: usize, ratio: usize) -> Result<Self> {
        Ok(Self {
            table: SlotTable::new(size, ratio)?,
        })
    }

    pub fn table(&self) -> &SlotTable<Slot4> {
        &self.table
    }

    pub fn reset(&mut self) {
        self.table.reset();
    }

    pub fn resize(&mut self, base_size: usize) -> Result<()> {
        self.table.resize(base_size)
    }

    /// Acquires the discriminant for one top-level quantification over the
    /// variable set currently held by `varset`.
    ///
    /// The generation is read from the register, so a scope always refers to
    /// the set the recursion tests membership against.
    pub fn scope(&mut self, kind: QuantKind, varset: &VarsetRegister) -> QuantScope<'_> {
        QuantScope {
            cache: self,
            kind,
            id: kind.tag(varset.generation()),
        }
    }
}

impl fmt::Display for QuantCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.table.write_summary(f, "Quant")
    }
}

/// A [`QuantCache`] bound to a quantifier and variable-set generation.
#[derive(Debug)]
pub struct QuantScope<'a> {
    cache: &'a mut QuantCache,
    kind: QuantKind,
    id: u64,
}

impl QuantScope<'_> {
    pub fn kind(&self) -> QuantKind {
        self.kind
    }

    /// The tag stored with every entry of this scope.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn lookup(&mut self, n: NodeId, varset: NodeId) -> Option<NodeId> {
        let index = pair_index(n.get() as u64, varset.get() as u64, self.cache.table.capacity());
        let id = self.id;
        self.cache
            .table
            .probe(index, |e| e.a == n && e.b == varset && e.c == id)
    }

    /// Stores the quantification of `n` over `varset` and returns `res`.
    pub fn insert(&mut self, n: NodeId, varset: NodeId, res: NodeId) -> NodeId {
        let index = pair_index(n.get() as u64, varset.get() as u64, self.cache.table.capacity());
        self.cache.table.store(
            index,
            Slot4 {
                res,
                a: n,
                b: varset,
                c: self.id,
            },
        );
        res
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::node::{Node, NodeTable};
    use crate::types::Level;

    fn id(i: u32) -> NodeId {
        NodeId::new(i)
    }

    /// Two single-variable sets: `{L0}` at id 2 and `{L1}` at id 3.
    struct Sets;

    impl NodeTable for Sets {
        fn node_count(&self) -> usize {
            4
        }
        fn var_count(&self) -> usize {
            2
        }
        fn node(&self, id: NodeId) -> Node {
            Node::new(Level::new(id.index() - 2), NodeId::ZERO, NodeId::ONE)
        }
    }

    #[test]
    fn test_tags_are_distinct() {
        let mut register = VarsetRegister::default();
        let g1 = register.register(&Sets, id(2)).unwrap();
        let g2 = register.register(&Sets, id(3)).unwrap();
        let mut tags: Vec<u64> = [g1, g2]
            .iter()
            .flat_map(|&g| QuantKind::ALL.iter().map(move |k| k.tag(g)))
            .collect();
        tags.sort();
        tags.dedup();
        assert_eq!(tags.len(), 6);
    }

    #[test]
    fn test_quant_insert_lookup() {
        let mut register = VarsetRegister::default();
        register.register(&Sets, id(2)).unwrap();
        let mut cache = QuantCache::new(101, 0).unwrap();
        let mut scope = cache.scope(QuantKind::Exist, &register);

        assert_eq!(scope.lookup(id(5), id(2)), None);
        scope.insert(id(5), id(2), id(3));
        assert_eq!(scope.lookup(id(5), id(2)), Some(id(3)));
        assert_eq!(scope.lookup(id(5), id(4)), None);
    }

    #[test]
    fn test_quant_generation_isolation() {
        let mut register = VarsetRegister::default();
        let mut cache = QuantCache::new(101, 0).unwrap();

        register.register(&Sets, id(2)).unwrap();
        cache.scope(QuantKind::Exist, &register).insert(id(5), id(2), id(3));

        // Registering the same chain again yields a fresh generation.
        register.register(&Sets, id(2)).unwrap();
        assert_eq!(cache.scope(QuantKind::Exist, &register).lookup(id(5), id(2)), None);
    }

    #[test]
    fn test_quant_kind_isolation() {
        let mut register = VarsetRegister::default();
        register.register(&Sets, id(2)).unwrap();
        let mut cache = QuantCache::new(101, 0).unwrap();

        cache.scope(QuantKind::Exist, &register).insert(id(5), id(2), id(3));
        assert_eq!(cache.scope(QuantKind::Forall, &register).lookup(id(5), id(2)), None);
        assert_eq!(cache.scope(QuantKind::Unique, &register).lookup(id(5), id(2)), None);
    }

    #[test]
    fn test_scope_follows_register() {
        let mut register = VarsetRegister::default();
        let mut cache = QuantCache::new(101, 0).unwrap();

        let first = register.register(&Sets, id(2)).unwrap();
        let id_first = cache.scope(QuantKind::Exist, &register).id();
        assert_eq!(id_first, QuantKind::Exist.tag(first));

        let second = register.register(&Sets, id(3)).unwrap();
        let id_second = cache.scope(QuantKind::Exist, &register).id();
        assert_eq!(id_second, QuantKind::Exist.tag(second));
        assert_ne!(id_first, id_second);
    }
}
