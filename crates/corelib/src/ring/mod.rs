//! Consistent hash ring implementation.
//!
//! The ring manages token positions and provides efficient lookup
//! operations for finding the provider responsible for a key.

pub mod ring;

pub use ring::{validate_replicas, HashRing, RingBuilder, DEFAULT_REPLICAS};
