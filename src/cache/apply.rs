//! Cache for binary apply and complement.
//!
//! The index for a binary apply is `#(left, right, op)`. Complement is unary,
//! so its index is simply `n mod capacity`; it shares the table with the
//! binary results and is told apart by a reserved operator code.

use std::fmt;

use crate::cache::slot_table::{Slot4, SlotTable};
use crate::error::Result;
use crate::reference::NodeId;
use crate::utils::triple_index;

/// Binary boolean connectives.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BinOp {
    And,
    Xor,
    Or,
    Nand,
    Nor,
    /// `a -> b`
    Imp,
    /// `a <-> b`
    Biimp,
    /// `a & !b`
    Diff,
    /// `!a & b`
    Less,
    /// `b -> a`
    InvImp,
}

impl BinOp {
    pub const ALL: [BinOp; 10] = [
        BinOp::And,
        BinOp::Xor,
        BinOp::Or,
        BinOp::Nand,
        BinOp::Nor,
        BinOp::Imp,
        BinOp::Biimp,
        BinOp::Diff,
        BinOp::Less,
        BinOp::InvImp,
    ];

    /// Operator code stored in the tag field of apply entries.
    pub const fn code(self) -> u64 {
        match self {
            BinOp::And => 0,
            BinOp::Xor => 1,
            BinOp::Or => 2,
            BinOp::Nand => 3,
            BinOp::Nor => 4,
            BinOp::Imp => 5,
            BinOp::Biimp => 6,
            BinOp::Diff => 7,
            BinOp::Less => 8,
            BinOp::InvImp => 9,
        }
    }

    /// Truth table of the connective.
    pub const fn eval(self, a: bool, b: bool) -> bool {
        match self {
            BinOp::And => a & b,
            BinOp::Xor => a ^ b,
            BinOp::Or => a | b,
            BinOp::Nand => !(a & b),
            BinOp::Nor => !(a | b),
            BinOp::Imp => !a | b,
            BinOp::Biimp => a == b,
            BinOp::Diff => a & !b,
            BinOp::Less => !a & b,
            BinOp::InvImp => a | !b,
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BinOp::And => "and",
            BinOp::Xor => "xor",
            BinOp::Or => "or",
            BinOp::Nand => "nand",
            BinOp::Nor => "nor",
            BinOp::Imp => "imp",
            BinOp::Biimp => "biimp",
            BinOp::Diff => "diff",
            BinOp::Less => "less",
            BinOp::InvImp => "invimp",
        };
        f.write_str(name)
    }
}

/// Tag reserved for complement entries. Distinct from every [`BinOp::code`].
pub const NOT_CODE: u64 = 10;

/// Cache for `apply(left, op, right)` and `not(n)`.
#[derive(Debug, Clone)]
pub struct ApplyCache {
    table: SlotTable<Slot4>,
}

impl ApplyCache {
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

    /// Acquires the operator for one top-level apply.
    ///
    /// The scope is held for the whole recursion; every lookup and insert
    /// made through it is tagged with `op`.
    pub fn scope(&mut self, op: BinOp) -> ApplyScope<'_> {
        ApplyScope { cache: self, op }
    }

    pub fn lookup_not(&mut self, n: NodeId) -> Option<NodeId> {
        let index = n.index() % self.table.capacity();
        self.table.probe(index, |e| e.a == n && e.c == NOT_CODE)
    }

    /// Stores `not(n) = res` and returns `res`.
    pub fn insert_not(&mut self, n: NodeId, res: NodeId) -> NodeId {
        let index = n.index() % self.table.capacity();
        self.table.store(
            index,
            Slot4 {
                res,
                a: n,
                b: NodeId::INVALID,
                c: NOT_CODE,
            },
        );
        res
    }

    fn index(&self, left: NodeId, right: NodeId, op: BinOp) -> usize {
        triple_index(left.get() as u64, right.get() as u64, op.code(), self.table.capacity())
    }
}

impl fmt::Display for ApplyCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.table.write_summary(f, "Apply")
    }
}

/// An [`ApplyCache`] bound to the operator of the in-flight apply.
#[derive(Debug)]
pub struct ApplyScope<'a> {
    cache: &'a mut ApplyCache,
    op: BinOp,
}

impl ApplyScope<'_> {
    pub fn op(&self) -> BinOp {
        self.op
    }

    pub fn lookup(&mut self, left: NodeId, right: NodeId) -> Option<NodeId> {
        let op = self.op;
        let index = self.cache.index(left, right, op);
        self.cache
            .table
            .probe(index, |e| e.a == left && e.b == right && e.c == op.code())
    }

    /// Stores `apply(left, op, right) = res` and returns `res`.
    pub fn insert(&mut self, left: NodeId, right: NodeId, res: NodeId) -> NodeId {
        let index = self.cache.index(left, right, self.op);
        self.cache.table.store(
            index,
            Slot4 {
                res,
                a: left,
                b: right,
                c: self.op.code(),
            },
        );
        res
    }

    pub fn lookup_not(&mut self, n: NodeId) -> Option<NodeId> {
        self.cache.lookup_not(n)
    }

    pub fn insert_not(&mut self, n: NodeId, res: NodeId) -> NodeId {
        self.cache.insert_not(n, res)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn id(i: u32) -> NodeId {
        NodeId::new(i)
    }

    #[test]
    fn test_op_codes_are_distinct() {
        let mut codes: Vec<u64> = BinOp::ALL.iter().map(|op| op.code()).collect();
        codes.push(NOT_CODE);
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), BinOp::ALL.len() + 1);
    }

    #[test]
    fn test_eval() {
        assert!(BinOp::And.eval(true, true));
        assert!(!BinOp::And.eval(true, false));
        assert!(BinOp::Imp.eval(false, true));
        assert!(!BinOp::Imp.eval(true, false));
        assert!(BinOp::InvImp.eval(true, false));
        assert!(BinOp::Less.eval(false, true));
        assert!(!BinOp::Diff.eval(false, true));
        for op in BinOp::ALL {
            // Every connective is determined by its truth table: no two agree on all inputs.
            for other in BinOp::ALL {
                if op != other {
                    let same = [(false, false), (false, true), (true, false), (true, true)]
                        .iter()
                        .all(|&(a, b)| op.eval(a, b) == other.eval(a, b));
                    assert!(!same, "{} and {} have the same truth table", op, other);
                }
            }
        }
    }

    #[test]
    fn test_apply_and_vs_or() {
        let mut cache = ApplyCache::new(7, 0).unwrap();
        assert_eq!(cache.table().capacity(), 7);

        cache.scope(BinOp::And).insert(id(3), id(5), id(9));
        assert_eq!(cache.scope(BinOp::And).lookup(id(3), id(5)), Some(id(9)));
        assert_eq!(cache.scope(BinOp::Or).lookup(id(3), id(5)), None);

        cache.reset();
        assert_eq!(cache.scope(BinOp::And).lookup(id(3), id(5)), None);
    }

    #[test]
    fn test_apply_operand_order_matters() {
        let mut cache = ApplyCache::new(101, 0).unwrap();
        let mut scope = cache.scope(BinOp::Diff);
        scope.insert(id(4), id(6), id(8));
        assert_eq!(scope.lookup(id(4), id(6)), Some(id(8)));
        assert_eq!(scope.lookup(id(6), id(4)), None);
    }

    #[test]
    fn test_terminals_are_valid_keys() {
        let mut cache = ApplyCache::new(7, 0).unwrap();
        let mut scope = cache.scope(BinOp::Xor);
        scope.insert(NodeId::ZERO, NodeId::ONE, NodeId::ONE);
        assert_eq!(scope.lookup(NodeId::ZERO, NodeId::ONE), Some(NodeId::ONE));
    }

    #[test]
    fn test_fresh_table_has_no_hits() {
        let mut cache = ApplyCache::new(7, 0).unwrap();
        // Empty slots carry INVALID keys and tag 0, which is the code of And.
        assert_eq!(cache.scope(BinOp::And).lookup(NodeId::INVALID, NodeId::INVALID), None);
        assert_eq!(cache.lookup_not(NodeId::INVALID), None);
    }

    #[test]
    fn test_not() {
        let mut cache = ApplyCache::new(11, 0).unwrap();
        assert_eq!(cache.lookup_not(id(4)), None);
        assert_eq!(cache.insert_not(id(4), id(7)), id(7));
        assert_eq!(cache.lookup_not(id(4)), Some(id(7)));
        // Same slot, different key.
        assert_eq!(cache.lookup_not(id(15)), None);
    }

    #[test]
    fn test_not_and_apply_share_the_table() {
        let mut cache = ApplyCache::new(11, 0).unwrap();
        cache.insert_not(id(4), id(7));

        // NOT entries are reachable through an apply scope, but never as binary results.
        let mut scope = cache.scope(BinOp::And);
        assert_eq!(scope.lookup_not(id(4)), Some(id(7)));
        assert_eq!(scope.lookup(id(4), NodeId::INVALID), None);

        // If the binary entry landed on the NOT slot, it replaced it.
        scope.insert(id(4), id(5), id(6));
        let occupied = cache.table().occupied();
        let not_survived = cache.lookup_not(id(4)).is_some();
        assert_eq!(occupied, if not_survived { 2 } else { 1 });
    }

    #[test]
    fn test_collisions_overwrite() {
        let mut cache = ApplyCache::new(2, 0).unwrap();
        let mut scope = cache.scope(BinOp::And);
        for i in 0..16 {
            scope.insert(id(i), id(i + 1), id(i + 2));
        }
        let found = (0..16).filter(|&i| scope.lookup(id(i), id(i + 1)).is_some()).count();
        assert!(found <= 2);
        // Whatever is found is correct.
        for i in 0..16 {
            if let Some(res) = scope.lookup(id(i), id(i + 1)) {
                assert_eq!(res, id(i + 2));
            }
        }
    }

    #[test]
    fn test_statistics() {
        let mut cache = ApplyCache::new(7, 0).unwrap();
        let mut scope = cache.scope(BinOp::Or);
        scope.lookup(id(2), id(3)); // Miss
        scope.insert(id(2), id(3), id(4));
        scope.lookup(id(2), id(3)); // Hit
        assert_eq!(cache.table().stats().hits(), 1);
        assert_eq!(cache.table().stats().misses(), 1);
        assert!(cache.to_string().starts_with("== Apply cache (7 slots"));
    }
}
