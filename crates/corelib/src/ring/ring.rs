//! Hash ring data structure.
//!
//! Holds a `BTreeMap<Token, owner>` and the wraparound lookup logic. A ring
//! is immutable once built: topology changes produce a new ring, so readers
//! never need a lock.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::partitioner::Partitioner;
use crate::token::{Token, TOKENS_PER_DIGEST};
use crate::vnode::VirtualNode;

/// Virtual nodes per address when none is configured.
pub const DEFAULT_REPLICAS: usize = 160;

/// Checks that a replica factor is a positive multiple of the tokens one
/// digest yields.
pub fn validate_replicas(replicas: usize) -> Result<()> {
    if replicas == 0 || replicas % TOKENS_PER_DIGEST != 0 {
        return Err(Error::InvalidConfig(format!(
            "replica factor must be a positive multiple of {}, got {}",
            TOKENS_PER_DIGEST, replicas
        )));
    }
    Ok(())
}

/// Consistent hash ring over provider addresses.
///
/// # Invariants
///
/// - Never empty: every ring owns at least one virtual node
/// - Every `u32` resolves to exactly one owner (first token ≥ value, else
///   the minimum token)
/// - Built from the sorted, de-duplicated address set, so the candidate order
///   never changes the ring, token collisions included
#[derive(Debug, Clone)]
pub struct HashRing {
    points: BTreeMap<Token, Arc<str>>,
    addresses: Vec<Arc<str>>,
    replicas: usize,
    partitioner: Partitioner,
}

impl HashRing {
    /// Start building a ring.
    pub fn builder() -> RingBuilder {
        RingBuilder::new()
    }

    /// Build a ring from a slice of addresses in one call.
    pub fn from_addresses<S: AsRef<str>>(
        addresses: &[S],
        replicas: usize,
        partitioner: Partitioner,
    ) -> Result<Self> {
        RingBuilder::new()
            .with_replicas(replicas)
            .with_partitioner(partitioner)
            .add_addresses(addresses.iter().map(|a| a.as_ref()))
            .build()
    }

    /// Find the owner of `token`.
    ///
    /// # Algorithm
    ///
    /// 1. Range-scan for the first token ≥ `token`
    /// 2. If the scan runs off the end, wrap to the minimum token
    ///
    /// # Performance
    /// - **Time**: O(log n) where n = total vnodes
    pub fn lookup(&self, token: Token) -> Option<&str> {
        self.points
            .range(token..)
            .next()
            .or_else(|| self.points.iter().next())
            .map(|(_, owner)| owner.as_ref())
    }

    /// Digest `key` and find its owner.
    pub fn lookup_key(&self, key: &[u8]) -> Option<&str> {
        self.lookup(self.partitioner.partition(key))
    }

    /// Number of virtual nodes on the ring.
    pub fn token_count(&self) -> usize {
        self.points.len()
    }

    /// Number of distinct provider addresses.
    pub fn address_count(&self) -> usize {
        self.addresses.len()
    }

    /// Distinct provider addresses, sorted.
    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        self.addresses.iter().map(|a| a.as_ref())
    }

    /// All `(token, owner)` pairs in ring order.
    pub fn tokens(&self) -> Vec<(Token, &str)> {
        self.points
            .iter()
            .map(|(token, owner)| (*token, owner.as_ref()))
            .collect()
    }

    /// All virtual nodes in ring order.
    pub fn vnodes(&self) -> impl Iterator<Item = VirtualNode> + '_ {
        self.points
            .iter()
            .map(|(token, owner)| VirtualNode::new(*token, Arc::clone(owner)))
    }

    /// How many virtual nodes each address ended up owning.
    ///
    /// Slightly below the replica factor when tokens collided.
    pub fn points_per_address(&self) -> HashMap<&str, usize> {
        let mut counts: HashMap<&str, usize> = HashMap::with_capacity(self.addresses.len());
        for owner in self.points.values() {
            *counts.entry(owner.as_ref()).or_default() += 1;
        }
        counts
    }

    pub fn min_token(&self) -> Option<Token> {
        self.points.keys().next().copied()
    }

    pub fn max_token(&self) -> Option<Token> {
        self.points.keys().next_back().copied()
    }

    pub fn replicas(&self) -> usize {
        self.replicas
    }

    pub fn partitioner(&self) -> Partitioner {
        self.partitioner
    }
}

/// Builder for [`HashRing`].
///
/// # Example
///
/// ```rust
/// use corelib::ring::RingBuilder;
///
/// let ring = RingBuilder::new()
///     .with_replicas(8)
///     .add_address("10.0.0.1:8080")
///     .add_address("10.0.0.2:8080")
///     .build()
///     .unwrap();
/// assert_eq!(ring.address_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct RingBuilder {
    replicas: usize,
    partitioner: Partitioner,
    addresses: Vec<String>,
}

impl Default for RingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RingBuilder {
    pub fn new() -> Self {
        Self {
            replicas: DEFAULT_REPLICAS,
            partitioner: Partitioner::default(),
            addresses: Vec::new(),
        }
    }

    /// Virtual nodes per address; must be a positive multiple of 4.
    pub fn with_replicas(mut self, replicas: usize) -> Self {
        self.replicas = replicas;
        self
    }

    pub fn with_partitioner(mut self, partitioner: Partitioner) -> Self {
        self.partitioner = partitioner;
        self
    }

    pub fn add_address(mut self, address: impl Into<String>) -> Self {
        self.addresses.push(address.into());
        self
    }

    pub fn add_addresses<I, S>(mut self, addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.addresses.extend(addresses.into_iter().map(Into::into));
        self
    }

    /// Build the ring.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidConfig`] for a bad replica factor
    /// - [`Error::InvalidInput`] when no address was added
    pub fn build(self) -> Result<HashRing> {
        validate_replicas(self.replicas)?;

        let distinct: BTreeSet<&str> = self.addresses.iter().map(String::as_str).collect();
        if distinct.is_empty() {
            return Err(Error::InvalidInput(
                "cannot build a ring without addresses".to_string(),
            ));
        }

        let groups = self.replicas / TOKENS_PER_DIGEST;
        let addresses: Vec<Arc<str>> = distinct.into_iter().map(Arc::from).collect();
        let mut points = BTreeMap::new();

        for address in &addresses {
            for group in 0..groups {
                for vnode in VirtualNode::group(Arc::clone(address), group, self.partitioner) {
                    // Collisions overwrite: last write wins.
                    points.insert(vnode.token, vnode.owner);
                }
            }
        }

        Ok(HashRing {
            points,
            addresses,
            replicas: self.replicas,
            partitioner: self.partitioner,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_node_ring() -> HashRing {
        HashRing::from_addresses(&["10.0.0.1:8080", "10.0.0.2:8080"], 160, Partitioner::Md5)
            .unwrap()
    }

    #[test]
    fn test_validate_replicas() {
        assert!(validate_replicas(160).is_ok());
        assert!(validate_replicas(4).is_ok());
        assert!(matches!(validate_replicas(0), Err(Error::InvalidConfig(_))));
        assert!(matches!(validate_replicas(10), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_empty_builder_rejected() {
        let err = RingBuilder::new().build().unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_lookup_exact_token() {
        let ring = two_node_ring();
        for (token, owner) in ring.tokens() {
            assert_eq!(ring.lookup(token), Some(owner));
        }
    }

    #[test]
    fn test_wraparound_to_min() {
        let ring = two_node_ring();
        let min = ring.min_token().unwrap();
        let max = ring.max_token().unwrap();
        let min_owner = ring.lookup(min).unwrap();

        if let Some(past_max) = max.successor() {
            assert_eq!(ring.lookup(past_max), Some(min_owner));
        }

        let expected = if max == Token::MAX { ring.lookup(max) } else { Some(min_owner) };
        assert_eq!(ring.lookup(Token::MAX), expected);
    }

    #[test]
    fn test_duplicate_addresses_collapse() {
        let ring = HashRing::from_addresses(&["a:1", "a:1", "b:2"], 8, Partitioner::Md5).unwrap();
        assert_eq!(ring.address_count(), 2);
        assert!(ring.token_count() <= 16);
    }

    #[test]
    fn test_vnodes_in_ring_order() {
        let ring = two_node_ring();
        let vnodes: Vec<VirtualNode> = ring.vnodes().collect();
        assert_eq!(vnodes.len(), ring.token_count());
        assert!(vnodes.windows(2).all(|w| w[0].token < w[1].token));
    }
}
