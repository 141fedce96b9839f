//! Type-safe wrapper for BDD variable levels.
use std::fmt;

/// A level in the variable ordering (0-indexed).
///
/// Levels index the variable-set register: each level holds the generation
/// of the last variable set that contained it.
///
/// # Invariants
///
/// - Level 0 is the topmost level (closest to root)
/// - Levels increase downward toward terminals
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Level(usize);

impl Level {
    /// Creates a new level with the given index.
    pub fn new(index: usize) -> Self {
        Level(index)
    }

    /// Returns the raw level index as a `usize`.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

impl From<Level> for usize {
    fn from(level: Level) -> Self {
        level.0
    }
}

impl From<usize> for Level {
    fn from(index: usize) -> Self {
        Level(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_creation() {
        let l0 = Level::new(0);
        let l1 = Level::from(1);
        assert_eq!(l0.index(), 0);
        assert_eq!(usize::from(l1), 1);
        assert!(l0 < l1);
        assert_eq!(l1.to_string(), "L1");
    }
}
