#![warn(clippy::pedantic, clippy::nursery, clippy::cargo)]
#![deny(missing_docs)]

//! This crate provides a fixed capacity LRU cache with constant time
//! insertion, fetching, and removing.
//!
//! The cache pairs a [`HashMap`] of values with a [`RecencyIndex`], an ordered
//! set of keys that tracks which key was touched most and least recently. The
//! two are only ever updated together, so the cache always holds exactly the
//! keys that the index orders.
//!
//! The recency index is a doubly linked list whose nodes live in an arena and
//! refer to each other by index rather than by pointer. This keeps promotion
//! and removal from anywhere in the order constant time without any unsafe
//! code. As with any linked structure, this can not make as good use of the
//! CPU cache as array-based containers.
//!
//! Neither structure is synchronized. Callers sharing a cache across threads
//! should guard each call with a lock, as a single `put` performs several
//! dependent updates.
//!
//! [`HashMap`]: std::collections::HashMap

pub use error::ConfigError;
pub use iter::LruCacheIter;
pub use lru::LruCache;
pub use recency::RecencyIndex;

pub mod error;
mod iter;
mod lru;
pub mod recency;
