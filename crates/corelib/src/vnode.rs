//! Virtual node abstractions.
//!
//! # Virtual Nodes (VNodes) Concept
//!
//! Each provider address is placed on the ring many times. Instead of hashing
//! `address:index` once per virtual node, one digest of `address + group` is
//! split into four tokens, so an address with a replica factor of `R` costs
//! `R / 4` digest computations:
//!
//! ```text
//! md5("10.0.0.1:8080" + "0") = [b0 .. b3 | b4 .. b7 | b8 .. b11 | b12 .. b15]
//!                                  │          │          │           │
//!                               token 0    token 1    token 2     token 3
//! ```
//!
//! # Performance Characteristics
//!
//! - **Memory**: one token plus one shared owner pointer per vnode
//! - **Lookup**: O(log n) where n = total vnodes
//! - **Construction**: O(R/4) digests per address

use std::sync::Arc;

use crate::partitioner::Partitioner;
use crate::token::{Token, TOKENS_PER_DIGEST};

/// A virtual node on the hash ring.
///
/// Represents a single token position owned by a real provider address.
///
/// # Invariants
///
/// - Every `VirtualNode` belongs to exactly one provider address
/// - Ordering is by token first, so a sorted run of vnodes is a ring walk
///
/// # Example
///
/// ```rust
/// use corelib::{Partitioner, VirtualNode};
///
/// let vnodes = VirtualNode::group("10.0.0.1:8080".into(), 0, Partitioner::Md5);
/// assert_eq!(vnodes.len(), 4);
/// assert!(vnodes.iter().all(|v| v.owner() == "10.0.0.1:8080"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtualNode {
    /// Token position on the ring.
    pub token: Token,

    /// The provider address that owns this virtual node.
    ///
    /// Shared between all vnodes of the same address.
    pub owner: Arc<str>,
}

impl VirtualNode {
    /// Create a new virtual node.
    #[inline]
    pub fn new(token: Token, owner: Arc<str>) -> Self {
        Self { token, owner }
    }

    /// Create the four virtual nodes of one digest group.
    ///
    /// # Algorithm
    ///
    /// 1. Format the key as the address immediately followed by `group`
    ///    in decimal (`"10.0.0.1:8080" + 3` → `"10.0.0.1:80803"`)
    /// 2. Digest the key once
    /// 3. Read each 4-byte window of the digest as a little-endian token
    ///
    /// # Arguments
    /// * `owner` - The provider address
    /// * `group` - Digest group index, `0 .. replicas / 4`
    /// * `partitioner` - Digest primitive
    pub fn group(
        owner: Arc<str>,
        group: usize,
        partitioner: Partitioner,
    ) -> [VirtualNode; TOKENS_PER_DIGEST] {
        let key = format!("{}{}", owner, group);
        let digest = partitioner.digest(key.as_bytes());
        Token::all_from_digest(&digest).map(|token| Self::new(token, Arc::clone(&owner)))
    }

    /// Get the token position.
    #[inline]
    pub fn token(&self) -> Token {
        self.token
    }

    /// Get the owning address.
    #[inline]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Clockwise distance to another virtual node.
    #[inline]
    pub fn distance_to(&self, other: &Self) -> u32 {
        self.token.distance_to(&other.token)
    }
}

impl std::fmt::Display for VirtualNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VNode(token={}, owner={})", self.token, self.owner)
    }
}
