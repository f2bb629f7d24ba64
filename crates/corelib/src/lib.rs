//! Core library for consistent-hash request routing.
//!
//! This crate provides the building blocks the load balancers sit on:
//! - Digest primitives (partitioners) and 32-bit ring tokens
//! - Virtual nodes and the immutable hash ring
//! - Candidate-list fingerprints
//! - Per-service selectors and the concurrent selector cache
//! - The routing view of an RPC request

pub mod cache;
pub mod error;
pub mod fingerprint;
pub mod partitioner;
pub mod request;
pub mod ring;
pub mod selector;
pub mod token;
pub mod vnode;

pub use cache::SelectorCache;
pub use error::{Error, Result};
pub use fingerprint::{Fingerprint, FingerprintMode};
pub use partitioner::Partitioner;
pub use request::{RoutingKeyMode, RoutingRequest};
pub use ring::{HashRing, RingBuilder, DEFAULT_REPLICAS};
pub use selector::Selector;
pub use token::Token;
pub use vnode::VirtualNode;
