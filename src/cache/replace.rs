//! Cache for variable substitution.
//!
//! The index for `replace(n)` is simply `n mod capacity`. The tag is the id of
//! the substitution (pairing) being applied, so results for one mapping are
//! never returned for another.

use std::fmt;

use log::debug;

use crate::cache::slot_table::{Slot3, SlotTable};
use crate::config::DEFAULT_COUNTER_LIMIT;
use crate::error::Result;
use crate::reference::NodeId;

/// Id of a variable substitution.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct PairingId(u32);

impl PairingId {
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PairingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pair#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct ReplaceCache {
    table: SlotTable<Slot3>,
    /// Last pairing id handed out.
    pairing: u32,
    pairing_limit: u32,
}

impl ReplaceCache {
    pub fn new(size: usize, ratio: usize) -> Result<Self> {
        Ok(Self {
            table: SlotTable::new(size, ratio)?,
            pairing: 0,
            pairing_limit: DEFAULT_COUNTER_LIMIT,
        })
    }

    /// Sets the value at which pairing ids restart.
    ///
    /// # Panics
    ///
    /// Panics if `limit < 2`.
    pub fn with_pairing_limit(mut self, limit: u32) -> Self {
        assert!(limit >= 2, "Pairing limit must be at least 2, got {}", limit);
        self.pairing_limit = limit;
        self
    }

    pub fn table(&self) -> &SlotTable<Slot3> {
        &self.table
    }

    pub fn reset(&mut self) {
        self.table.reset();
    }

    pub fn resize(&mut self, base_size: usize) -> Result<()> {
        self.table.resize(base_size)
    }

    /// Hands out an id for a new substitution.
    ///
    /// When the counter reaches its limit the table is reset and ids restart
    /// at 1, so an entry tagged with a reused id can never be hit.
    pub fn new_pairing(&mut self) -> PairingId {
        self.pairing += 1;
        if self.pairing >= self.pairing_limit {
            debug!("pairing id reached {}, resetting replace cache", self.pairing_limit);
            self.table.reset();
            self.pairing = 1;
        }
        PairingId(self.pairing)
    }

    /// Acquires the discriminant for one top-level replace.
    pub fn scope(&mut self, id: PairingId) -> ReplaceScope<'_> {
        ReplaceScope { cache: self, id }
    }
}

impl fmt::Display for ReplaceCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.table.write_summary(f, "Replace")
    }
}

/// A [`ReplaceCache`] bound to the substitution in flight.
#[derive(Debug)]
pub struct ReplaceScope<'a> {
    cache: &'a mut ReplaceCache,
    id: PairingId,
}

impl ReplaceScope<'_> {
    pub fn id(&self) -> PairingId {
        self.id
    }

    pub fn lookup(&mut self, n: NodeId) -> Option<NodeId> {
        let index = n.index() % self.cache.table.capacity();
        let id = self.id.get() as u64;
        self.cache.table.probe(index, |e| e.a == n && e.c == id)
    }

    /// Stores `replace(n) = res` and returns `res`.
    pub fn insert(&mut self, n: NodeId, res: NodeId) -> NodeId {
        let index = n.index() % self.cache.table.capacity();
        self.cache.table.store(
            index,
            Slot3 {
                res,
                a: n,
                c: self.id.get() as u64,
            },
        );
        res
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
    fn test_replace_insert_lookup() {
        let mut cache = ReplaceCache::new(13, 0).unwrap();
        let pairing = cache.new_pairing();
        let mut scope = cache.scope(pairing);

        assert_eq!(scope.lookup(id(5)), None);
        assert_eq!(scope.insert(id(5), id(8)), id(8));
        assert_eq!(scope.lookup(id(5)), Some(id(8)));
        // Same slot (5 + 13), different key.
        assert_eq!(scope.lookup(id(18)), None);
    }

    #[test]
    fn test_pairings_are_isolated() {
        let mut cache = ReplaceCache::new(13, 0).unwrap();
        let p1 = cache.new_pairing();
        let p2 = cache.new_pairing();
        assert_ne!(p1, p2);

        cache.scope(p1).insert(id(5), id(8));
        assert_eq!(cache.scope(p2).lookup(id(5)), None);
        assert_eq!(cache.scope(p1).lookup(id(5)), Some(id(8)));
    }

    #[test]
    fn test_pairing_wrap_resets_table() {
        let mut cache = ReplaceCache::new(13, 0).unwrap().with_pairing_limit(3);
        let p1 = cache.new_pairing();
        assert_eq!(p1.get(), 1);
        cache.scope(p1).insert(id(5), id(8));

        assert_eq!(cache.new_pairing().get(), 2);
        // Wraps: id 1 is handed out again, so its old entries must be gone.
        let again = cache.new_pairing();
        assert_eq!(again, p1);
        assert_eq!(cache.scope(again).lookup(id(5)), None);
    }
}
