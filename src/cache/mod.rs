//! Download cache for installer artifacts
//!
//! A flat directory of downloaded artifacts (keyrings, install scripts) plus
//! a `.index` text ledger, one `key:filename:digest` line per live artifact.
//!
//! # Trust model
//!
//! - Keys are exact strings of the form `component:artifact-filename`
//! - A hit is verified against the recorded SHA-256 digest before reuse
//! - Once the directory grows past the configured limit, the next eviction
//!   sweep flushes every indexed artifact (all-or-nothing, not LRU)

pub mod index;
pub mod store;

pub use index::{CacheIndex, IndexEntry};
pub use store::{digest_bytes, ArtifactCache, EvictionReport};
