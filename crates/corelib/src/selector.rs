//! Per-service selector: one immutable ring plus the fingerprint of the
//! candidate list it was built from.

use crate::error::{Error, Result};
use crate::fingerprint::Fingerprint;
use crate::partitioner::Partitioner;
use crate::ring::HashRing;

#[derive(Debug, Clone)]
pub struct Selector {
    ring: HashRing,
    fingerprint: Fingerprint,
}

impl Selector {
    /// Build a selector over `candidates`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] for an empty list, [`Error::InvalidConfig`]
    /// for a bad replica factor.
    pub fn build(
        candidates: &[String],
        replicas: usize,
        partitioner: Partitioner,
        fingerprint: Fingerprint,
    ) -> Result<Self> {
        let ring = HashRing::from_addresses(candidates, replicas, partitioner)?;
        Ok(Self { ring, fingerprint })
    }

    /// Pick the provider for `routing_key`.
    pub fn pick(&self, routing_key: &str) -> Result<&str> {
        self.ring
            .lookup_key(routing_key.as_bytes())
            .ok_or(Error::EmptyRing)
    }

    /// True when this selector was built from a list with `fingerprint`.
    #[inline]
    pub fn matches(&self, fingerprint: &Fingerprint) -> bool {
        self.fingerprint == *fingerprint
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    pub fn ring(&self) -> &HashRing {
        &self.ring
    }
}
