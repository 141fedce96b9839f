//! Lifecycle of the operator caches.
//!
//! The [`CacheManager`] owns one instance of every operator cache plus the
//! variable-set register. The engine's garbage collector and node-table
//! growth logic drive it; the caches never reset themselves.
//!
//! Node ids are reused after garbage collection and reassigned by
//! compaction, so a cached id is only meaningful for the node-table
//! [`Epoch`] it was computed in. The manager records the epoch it was last
//! invalidated for, and [`CacheManager::session`] refuses to hand out caches
//! for any other epoch.
//!
//! ```
//! use bdd_opcache::cache::BinOp;
//! use bdd_opcache::config::CacheConfig;
//! use bdd_opcache::manager::{CacheManager, Epoch};
//! use bdd_opcache::reference::NodeId;
//!
//! let mut manager = CacheManager::new(CacheConfig::default(), 1000).unwrap();
//! let epoch = Epoch::INITIAL;
//!
//! let session = manager.session(epoch).unwrap();
//! let mut apply = session.apply.scope(BinOp::And);
//! apply.insert(NodeId::new(3), NodeId::new(5), NodeId::new(9));
//! assert_eq!(apply.lookup(NodeId::new(3), NodeId::new(5)), Some(NodeId::new(9)));
//!
//! // Garbage collection reassigned ids: invalidate before the next operation.
//! let epoch = epoch.next();
//! assert!(manager.session(epoch).is_err());
//! manager.reset_all(epoch);
//! let session = manager.session(epoch).unwrap();
//! assert_eq!(session.apply.scope(BinOp::And).lookup(NodeId::new(3), NodeId::new(5)), None);
//! ```

use std::fmt;

use log::debug;

use crate::cache::{AppExCache, ApplyCache, IteCache, PairingId, QuantCache, ReplaceCache};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::node::NodeTable;
use crate::reference::NodeId;
use crate::stats::UniqueStats;
use crate::varset::{Generation, VarsetRegister};

/// Version of the node table's id assignment.
///
/// The node table bumps its epoch whenever garbage collection or compaction
/// may have given existing ids to different nodes.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct Epoch(u64);

impl Epoch {
    pub const INITIAL: Epoch = Epoch(0);

    pub const fn next(self) -> Epoch {
        Epoch(self.0 + 1)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "epoch#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct CacheManager {
    config: CacheConfig,
    apply: ApplyCache,
    ite: IteCache,
    quant: QuantCache,
    appex: AppExCache,
    replace: ReplaceCache,
    varset: VarsetRegister,
    unique: UniqueStats,
    epoch: Epoch,
}

impl CacheManager {
    /// Allocates all caches for a node table of `node_count` slots.
    ///
    /// Every cache gets `config.cache_size` slots, or `node_count / 4 + 1`
    /// when no size is configured. The variable-set register starts empty and
    /// is sized on first use.
    pub fn new(config: CacheConfig, node_count: usize) -> Result<Self> {
        let size = config.initial_size(node_count);
        let ratio = config.cache_ratio;
        debug!("cache init: {} slots requested per cache (ratio = {})", size, ratio);

        let manager = Self {
            config,
            apply: ApplyCache::new(size, ratio)?,
            ite: IteCache::new(size, ratio)?,
            quant: QuantCache::new(size, ratio)?,
            appex: AppExCache::new(size, ratio)?,
            replace: ReplaceCache::new(size, ratio)?.with_pairing_limit(config.pairing_limit),
            varset: VarsetRegister::new(config.generation_limit),
            unique: UniqueStats::default(),
            epoch: Epoch::INITIAL,
        };
        debug!("cache init: capacity = {}", manager.apply.table().capacity());
        Ok(manager)
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// The node-table epoch the caches are valid for.
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn apply(&self) -> &ApplyCache {
        &self.apply
    }

    pub fn ite(&self) -> &IteCache {
        &self.ite
    }

    pub fn quant(&self) -> &QuantCache {
        &self.quant
    }

    pub fn appex(&self) -> &AppExCache {
        &self.appex
    }

    pub fn replace(&self) -> &ReplaceCache {
        &self.replace
    }

    pub fn varset(&self) -> &VarsetRegister {
        &self.varset
    }

    pub fn unique_stats(&self) -> &UniqueStats {
        &self.unique
    }

    /// Counters the node table updates while probing its unique table.
    pub fn unique_stats_mut(&mut self) -> &mut UniqueStats {
        &mut self.unique
    }

    /// Invalidates every operator cache and records `epoch` as current.
    ///
    /// The variable-set register and its generation are left alone.
    pub fn reset_all(&mut self, epoch: Epoch) {
        debug!("cache reset ({} -> {})", self.epoch, epoch);
        self.apply.reset();
        self.ite.reset();
        self.quant.reset();
        self.appex.reset();
        self.replace.reset();
        self.epoch = epoch;
    }

    /// Resizes every operator cache for a node table of `node_count` slots
    /// and records `epoch` as current.
    ///
    /// All caches are invalidated even if an allocation fails; the first
    /// allocation error is returned.
    pub fn resize_all(&mut self, node_count: usize, epoch: Epoch) -> Result<()> {
        let before = self.apply.table().capacity();
        let results = [
            self.apply.resize(node_count),
            self.ite.resize(node_count),
            self.quant.resize(node_count),
            self.appex.resize(node_count),
            self.replace.resize(node_count),
        ];
        self.epoch = epoch;
        debug!(
            "cache resize for {} nodes: {} -> {} slots ({})",
            node_count,
            before,
            self.apply.table().capacity(),
            epoch
        );
        results.into_iter().collect()
    }

    /// Makes the variable set starting at `head` current for the next
    /// quantification or fused operation.
    ///
    /// AppEx entries are not keyed on the variable set itself, only on its
    /// generation. When the generation wraps, the AppEx cache is reset so
    /// that a reused generation cannot match results of an older set.
    pub fn register_varset<T>(&mut self, nodes: &T, head: NodeId) -> Result<Generation>
    where
        T: NodeTable + ?Sized,
    {
        let previous = self.varset.generation();
        let generation = self.varset.register(nodes, head)?;
        if generation <= previous {
            debug!("varset generation wrapped, resetting AppEx cache");
            self.appex.reset();
        }
        Ok(generation)
    }

    /// Hands out an id for a new variable substitution.
    pub fn new_pairing(&mut self) -> PairingId {
        self.replace.new_pairing()
    }

    /// Borrows all caches for one top-level operation on a node table at `epoch`.
    ///
    /// Fails with [`CacheError::StaleEpoch`] if the caches were not reset or
    /// resized for `epoch`. While the session is alive the manager cannot be
    /// reset or resized.
    pub fn session(&mut self, epoch: Epoch) -> Result<CacheSession<'_>> {
        if epoch != self.epoch {
            return Err(CacheError::StaleEpoch {
                cached: self.epoch,
                current: epoch,
            });
        }
        Ok(CacheSession {
            apply: &mut self.apply,
            ite: &mut self.ite,
            quant: &mut self.quant,
            appex: &mut self.appex,
            replace: &mut self.replace,
            varset: &self.varset,
        })
    }
}

impl fmt::Display for CacheManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.apply)?;
        write!(f, "{}", self.ite)?;
        write!(f, "{}", self.quant)?;
        write!(f, "{}", self.appex)?;
        write!(f, "{}", self.replace)?;
        write!(f, "{}", self.unique)
    }
}

/// Caches borrowed for the recursion of one top-level operation.
///
/// Fields are borrowed separately, so an operation may hold scopes on
/// several caches at once (e.g. quantification calling back into apply).
#[derive(Debug)]
pub struct CacheSession<'a> {
    pub apply: &'a mut ApplyCache,
    pub ite: &'a mut IteCache,
    pub quant: &'a mut QuantCache,
    pub appex: &'a mut AppExCache,
    pub replace: &'a mut ReplaceCache,
    pub varset: &'a VarsetRegister,
}
