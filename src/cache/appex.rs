//! Cache for apply fused with quantification (relational product and friends).
//!
//! The index is `#(left, right, id)` where `id` packs the variable-set
//! generation together with the operator and the quantifier, so one table
//! serves `relprod` (and/exist), `appall` (op/forall) and `appuni` (op/unique).

use std::fmt;

use crate::cache::apply::BinOp;
use crate::cache::quant::QuantKind;
use crate::cache::slot_table::{Slot4, SlotTable};
use crate::error::Result;
use crate::reference::NodeId;
use crate::utils::triple_index;
use crate::varset::{Generation, VarsetRegister};

/// Cache id of AppEx entries, next to the three quantifier ids.
pub const APPEX_CACHE_ID: u64 = 3;

/// Tag of fused apply/quantify entries.
///
/// Layout: `generation << 7 | (op * 3 + kind) << 2 | APPEX_CACHE_ID`.
pub const fn appex_tag(op: BinOp, kind: QuantKind, generation: Generation) -> u64 {
    let combined = op.code() * 3 + kind.code();
    ((generation.get() as u64) << 7) | (combined << 2) | APPEX_CACHE_ID
}

#[derive(Debug, Clone)]
pub struct AppExCache {
    table: SlotTable<Slot4>,
}

impl AppExCache {
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

    /// Acquires the discriminant for one top-level fused operation over the
    /// variable set currently held by `varset`.
    ///
    /// Entries are not keyed on the set itself, only on its generation, so
    /// the generation is always taken from the register.
    pub fn scope(&mut self, op: BinOp, kind: QuantKind, varset: &VarsetRegister) -> AppExScope<'_> {
        AppExScope {
            cache: self,
            id: appex_tag(op, kind, varset.generation()),
        }
    }
}

impl fmt::Display for AppExCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.table.write_summary(f, "AppEx")
    }
}

/// An [`AppExCache`] bound to an operator, quantifier and variable-set generation.
#[derive(Debug)]
pub struct AppExScope<'a> {
    cache: &'a mut AppExCache,
    id: u64,
}

impl AppExScope<'_> {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn lookup(&mut self, left: NodeId, right: NodeId) -> Option<NodeId> {
        let index = self.index(left, right);
        let id = self.id;
        self.cache
            .table
            .probe(index, |e| e.a == left && e.b == right && e.c == id)
    }

    /// Stores the fused result for `(left, right)` and returns `res`.
    pub fn insert(&mut self, left: NodeId, right: NodeId, res: NodeId) -> NodeId {
        let index = self.index(left, right);
        self.cache.table.store(
            index,
            Slot4 {
                res,
                a: left,
                b: right,
                c: self.id,
            },
        );
        res
    }

    fn index(&self, left: NodeId, right: NodeId) -> usize {
        triple_index(left.get() as u64, right.get() as u64, self.id, self.cache.table.capacity())
    }
}
