//! Cache usage counters.
//!
//! Counters are only updated in debug builds or with the `statistics`
//! feature; otherwise every update compiles to nothing.

use std::fmt;

/// Whether counter updates are compiled in.
pub const ENABLED: bool = cfg!(any(debug_assertions, feature = "statistics"));

/// Hit/miss counters of an operator cache.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct OpStats {
    hits: usize,
    misses: usize,
}

impl OpStats {
    /// Returns the number of lookups that found their entry.
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Returns the number of lookups that did not.
    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn lookups(&self) -> usize {
        self.hits + self.misses
    }

    /// Hit rate in `[0, 1]`, or `0` before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        match self.lookups() {
            0 => 0.0,
            total => self.hits as f64 / total as f64,
        }
    }

    #[inline(always)]
    pub(crate) fn hit(&mut self) {
        if ENABLED {
            self.hits += 1;
        }
    }

    #[inline(always)]
    pub(crate) fn miss(&mut self) {
        if ENABLED {
            self.misses += 1;
        }
    }
}

/// Counters for the engine's unique node table.
///
/// The node table lives outside this crate; it reports its probes here so
/// that all cache diagnostics end up in one dump.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct UniqueStats {
    /// Accesses to the unique node table.
    pub access: usize,
    /// Iterations through the hash chains of the unique node table.
    pub chain: usize,
    /// Entries actually found in the unique node table.
    pub hit: usize,
    /// Entries not found in the unique node table.
    pub miss: usize,
}

impl UniqueStats {
    #[inline(always)]
    pub fn record_access(&mut self) {
        if ENABLED {
            self.access += 1;
        }
    }

    #[inline(always)]
    pub fn record_chain(&mut self) {
        if ENABLED {
            self.chain += 1;
        }
    }

    #[inline(always)]
    pub fn record_hit(&mut self) {
        if ENABLED {
            self.hit += 1;
        }
    }

    #[inline(always)]
    pub fn record_miss(&mut self) {
        if ENABLED {
            self.miss += 1;
        }
    }
}

impl fmt::Display for UniqueStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Unique Access:  {}", self.access)?;
        writeln!(f, "Unique Chain:   {}", self.chain)?;
        writeln!(f, "Unique Hit:     {}", self.hit)?;
        writeln!(f, "Unique Miss:    {}", self.miss)
    }
}
