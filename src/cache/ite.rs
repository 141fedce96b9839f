//! Cache for if-then-else.
//!
//! The index for ITE is `#(f, g, h)`, so an entry needs all four fields of a
//! [`Slot4`]: `h` lives in the tag position.

use std::fmt;

use crate::cache::slot_table::{Slot4, SlotTable};
use crate::error::Result;
use crate::reference::NodeId;
use crate::utils::triple_index;

#[derive(Debug, Clone)]
pub struct IteCache {
    table: SlotTable<Slot4>,
}

impl IteCache {
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

    pub fn lookup(&mut self, f: NodeId, g: NodeId, h: NodeId) -> Option<NodeId> {
        let index = self.index(f, g, h);
        let h = h.get() as u64;
        self.table.probe(index, |e| e.a == f && e.b == g && e.c == h)
    }

    /// Stores `ite(f, g, h) = res` and returns `res`.
    pub fn insert(&mut self, f: NodeId, g: NodeId, h: NodeId, res: NodeId) -> NodeId {
        let index = self.index(f, g, h);
        self.table.store(
            index,
            Slot4 {
                res,
                a: f,
                b: g,
                c: h.get() as u64,
            },
        );
        res
    }

    fn index(&self, f: NodeId, g: NodeId, h: NodeId) -> usize {
        triple_index(f.get() as u64, g.get() as u64, h.get() as u64, self.table.capacity())
    }
}

impl fmt::Display for IteCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.table.write_summary(f, "ITE")
    }
}
