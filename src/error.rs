//! Errors raised by the cache layer.

use std::collections::TryReserveError;

use thiserror::Error;

use crate::manager::Epoch;
use crate::reference::NodeId;

/// Error type for cache setup and variable-set registration.
///
/// Misses, collisions and generation wraparound are normal control flow and
/// never show up here.
#[derive(Error, Debug)]
pub enum CacheError {
    /// A variable set must contain at least one real variable.
    #[error("Illegal variable ({node}) in varset to cache")]
    IllegalVarset { node: NodeId },

    /// A cache table could not be allocated at the requested size.
    #[error("Cache allocation failed: {0}")]
    Allocation(#[from] TryReserveError),

    /// No prime slot count at least `requested` is representable.
    #[error("Cache capacity overflow: no table of at least {requested} slots")]
    CapacityOverflow { requested: usize },

    /// The caches were not invalidated since the node table last reassigned ids.
    #[error("Caches are synchronized with {cached}, but the node table is at {current}")]
    StaleEpoch { cached: Epoch, current: Epoch },
}

pub type Result<T, E = CacheError> = std::result::Result<T, E>;
