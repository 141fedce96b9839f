//! # bdd-opcache: operation caches for Binary Decision Diagrams
//!
//! BDD algorithms recurse over shared subdiagrams. Without memoization the
//! same sub-results would be recomputed exponentially many times. This crate
//! is the computed-table layer of a BDD engine: fixed-size, direct-mapped
//! caches for apply, not, if-then-else, quantification, fused
//! apply-and-quantify, and variable substitution.
//!
//! ## Key Features
//!
//! - **O(1) worst case**: Each key maps to exactly one slot. Collisions overwrite.
//! - **Never a wrong hit**: Every entry carries a discriminant (operator code,
//!   variable-set generation, pairing id) that must match on lookup.
//! - **No clearing between operations**: A fresh discriminant makes old entries
//!   unreachable without touching the table.
//! - **Safe id reuse**: Node ids are reassigned by garbage collection; the
//!   [`CacheManager`][crate::manager::CacheManager] refuses to serve caches for
//!   a node-table [`Epoch`][crate::manager::Epoch] it was not invalidated for.
//!
//! ## Basic Usage
//!
//! ```rust
//! use bdd_opcache::cache::BinOp;
//! use bdd_opcache::config::CacheConfig;
//! use bdd_opcache::manager::{CacheManager, Epoch};
//! use bdd_opcache::reference::NodeId;
//!
//! // 1. Allocate caches for a node table with 4096 slots.
//! let mut caches = CacheManager::new(CacheConfig::default(), 4096).unwrap();
//!
//! // 2. Before a top-level apply, borrow the caches and fix the operator.
//! let session = caches.session(Epoch::INITIAL).unwrap();
//! let mut and = session.apply.scope(BinOp::And);
//!
//! // 3. In the recursion: check, compute on miss, insert.
//! let (f, g) = (NodeId::new(7), NodeId::new(12));
//! let res = match and.lookup(f, g) {
//!     Some(res) => res,
//!     None => and.insert(f, g, NodeId::new(15)),
//! };
//! assert_eq!(res, NodeId::new(15));
//! assert_eq!(and.lookup(f, g), Some(res));
//! ```
//!
//! ## Core Components
//!
//! - **[`cache`]**: The slot table and the operator caches.
//! - **[`varset`]**: Generation-tagged register of the quantified variable set.
//! - **[`manager`]**: Init, reset and resize of all caches together.
//! - **[`stats`]**: Hit/miss counters, compiled in for debug builds or with
//!   the `statistics` feature.

pub mod cache;
pub mod config;
pub mod error;
pub mod manager;
pub mod node;
pub mod reference;
pub mod stats;
pub mod types;
pub mod utils;
pub mod varset;
