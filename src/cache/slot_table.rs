//! Fixed-capacity direct-mapped slot table.
//!
//! This is the storage underneath every operator cache: a plain array where
//! each key hashes to exactly one slot. Collisions simply overwrite the
//! previous entry.
//!
//! # Characteristics
//!
//! - **O(1) lookup and insert**: Single array access
//! - **Prime capacity**: Reduces systematic collisions of the pairing hashes
//! - **Sentinel-based**: A slot is empty iff its first key is [`NodeId::INVALID`]
//! - **O(n) reset**: Only the first key of each slot is rewritten

use std::fmt;

use log::debug;

use crate::error::{CacheError, Result};
use crate::reference::NodeId;
use crate::stats::OpStats;
use crate::utils::{human_size, prime_gte};

/// A cache record.
pub trait Slot: Copy {
    /// A record whose first key is the empty-slot sentinel.
    const EMPTY: Self;

    /// The first key field. Equal to [`NodeId::INVALID`] iff the slot is empty.
    fn key(&self) -> NodeId;

    /// The cached result.
    fn result(&self) -> NodeId;

    /// Mark the slot as empty. Other fields are left as they are.
    fn invalidate(&mut self);

    fn is_empty(&self) -> bool {
        self.key() == NodeId::INVALID
    }
}

/// Record for caches keyed on two node ids plus a tag.
///
/// The tag `c` holds an operator code, a generation id, or (for ITE) a third
/// node id.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Slot4 {
    pub res: NodeId,
    pub a: NodeId,
    pub b: NodeId,
    pub c: u64,
}

impl Slot for Slot4 {
    const EMPTY: Self = Slot4 {
        res: NodeId::INVALID,
        a: NodeId::INVALID,
        b: NodeId::INVALID,
        c: 0,
    };

    fn key(&self) -> NodeId {
        self.a
    }

    fn result(&self) -> NodeId {
        self.res
    }

    fn invalidate(&mut self) {
        self.a = NodeId::INVALID;
    }
}

/// Record for caches keyed on a single node id plus a tag.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Slot3 {
    pub res: NodeId,
    pub a: NodeId,
    pub c: u64,
}

impl Slot for Slot3 {
    const EMPTY: Self = Slot3 {
        res: NodeId::INVALID,
        a: NodeId::INVALID,
        c: 0,
    };

    fn key(&self) -> NodeId {
        self.a
    }

    fn result(&self) -> NodeId {
        self.res
    }

    fn invalidate(&mut self) {
        self.a = NodeId::INVALID;
    }
}

/// A direct-mapped table of `S` records with prime capacity.
#[derive(Debug, Clone)]
pub struct SlotTable<S> {
    slots: Vec<S>,
    ratio: usize,
    stats: OpStats,
}

impl<S: Slot> SlotTable<S> {
    /// Creates a table with at least `min_capacity` slots (rounded up to a
    /// prime, never below 2).
    ///
    /// With `ratio > 0`, later [`resize`](Self::resize) calls size the table
    /// to `node_count / ratio`; with `ratio == 0` the capacity stays fixed.
    pub fn new(min_capacity: usize, ratio: usize) -> Result<Self> {
        let slots = allocate(min_capacity)?;
        Ok(Self {
            slots,
            ratio,
            stats: OpStats::default(),
        })
    }

    /// Returns the number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn ratio(&self) -> usize {
        self.ratio
    }

    pub fn stats(&self) -> &OpStats {
        &self.stats
    }

    /// Estimated memory used by the slots.
    pub fn size_in_bytes(&self) -> usize {
        self.slots.len() * std::mem::size_of::<S>()
    }

    /// Number of non-empty slots. O(n).
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|slot| !slot.is_empty()).count()
    }

    /// Invalidates every slot. This is O(n).
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.invalidate();
        }
    }

    /// Adapts the table to a node table of `base_size` slots.
    ///
    /// With `ratio > 0` the table is reallocated to `prime_gte(base_size / ratio)`
    /// slots; otherwise it is only invalidated. Either way no prior entry survives,
    /// even if the reallocation fails.
    pub fn resize(&mut self, base_size: usize) -> Result<()> {
        if self.ratio == 0 {
            self.reset();
            return Ok(());
        }

        match allocate(base_size / self.ratio) {
            Ok(slots) => {
                debug!("resize slot table: {} -> {} slots", self.slots.len(), slots.len());
                self.slots = slots;
                Ok(())
            }
            Err(e) => {
                self.reset();
                Err(e)
            }
        }
    }

    /// Returns the result stored at `index` if the slot is occupied and
    /// `matches` accepts it.
    #[inline]
    pub(crate) fn probe(&mut self, index: usize, matches: impl FnOnce(&S) -> bool) -> Option<NodeId> {
        let slot = &self.slots[index];
        if !slot.is_empty() && matches(slot) {
            let res = slot.result();
            self.stats.hit();
            Some(res)
        } else {
            self.stats.miss();
            None
        }
    }

    /// Overwrites the slot at `index` unconditionally.
    #[inline]
    pub(crate) fn store(&mut self, index: usize, slot: S) {
        self.slots[index] = slot;
    }

    /// Writes the `== name cache` section of the statistics dump.
    pub(crate) fn write_summary(&self, f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
        writeln!(
            f,
            "== {} cache ({} slots, {})",
            name,
            self.capacity(),
            human_size(self.capacity(), std::mem::size_of::<S>())
        )?;
        writeln!(f, " Operator Hits: {}", self.stats.hits())?;
        writeln!(f, " Operator Miss: {}", self.stats.misses())
    }
}

/// Allocates `prime_gte(min_capacity)` empty slots.
fn allocate<S: Slot>(min_capacity: usize) -> Result<Vec<S>> {
    let size = prime_gte(min_capacity).ok_or(CacheError::CapacityOverflow {
        requested: min_capacity,
    })?;
    let mut slots = Vec::new();
    slots.try_reserve_exact(size)?;
    slots.resize(size, S::EMPTY);
    Ok(slots)
}
