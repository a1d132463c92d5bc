//! Cache module for storing API responses to disk
//!
//! Each series gets a directory under the cache root holding the last fetched
//! metadata envelope and chapter listing. Entries are never expired; callers
//! decide when to bypass them.

mod store;

pub use store::{CacheError, CacheKey, CacheStore, ResourceKind};
