//! Data structures with no internal synchronization.
//!
//! Nothing in here is `Sync`-aware: if you need to share one across threads,
//! wrap it in a lock yourself.

pub mod rbtree;
