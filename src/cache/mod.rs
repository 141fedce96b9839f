//! Operator caches for BDD operation memoization.
//!
//! Every cache is a direct-mapped [`SlotTable`]: one slot per index, no
//! chaining, and an insert silently replaces whatever occupied the slot.
//! A miss only means "recompute", so correctness never depends on an entry
//! staying resident, only on never returning a wrong hit.
//!
//! | Cache | Record | Index | Tag |
//! |-------|--------|-------|-----|
//! | [`ApplyCache`] | [`Slot4`] | `#(left, right, op)` | operator code |
//! | not (in [`ApplyCache`]) | [`Slot4`] | `n mod size` | [`NOT_CODE`] |
//! | [`IteCache`] | [`Slot4`] | `#(f, g, h)` | `h` |
//! | [`QuantCache`] | [`Slot4`] | `#(n, varset)` | quantifier + varset generation |
//! | [`AppExCache`] | [`Slot4`] | `#(left, right, id)` | operator + quantifier + generation |
//! | [`ReplaceCache`] | [`Slot3`] | `n mod size` | pairing id |
//!
//! Caches with a discriminant hand out *scopes*: the discriminant is fixed
//! when the top-level operation starts and every lookup and insert of its
//! recursion goes through the scope.
//!
//! # Example
//!
//! ```
//! use bdd_opcache::cache::{ApplyCache, BinOp};
//! use bdd_opcache::reference::NodeId;
//!
//! let mut cache = ApplyCache::new(7, 0).unwrap();
//! let (x, y) = (NodeId::new(3), NodeId::new(5));
//!
//! cache.scope(BinOp::And).insert(x, y, NodeId::new(9));
//! assert_eq!(cache.scope(BinOp::And).lookup(x, y), Some(NodeId::new(9)));
//! assert_eq!(cache.scope(BinOp::Or).lookup(x, y), None);
//! ```

mod appex;
mod apply;
mod ite;
mod quant;
mod replace;
mod slot_table;

pub use appex::{appex_tag, AppExCache, AppExScope, APPEX_CACHE_ID};
pub use apply::{ApplyCache, ApplyScope, BinOp, NOT_CODE};
pub use ite::IteCache;
pub use quant::{QuantCache, QuantKind, QuantScope};
pub use replace::{PairingId, ReplaceCache, ReplaceScope};
pub use slot_table::{Slot, Slot3, Slot4, SlotTable};
