//! Candidate-list fingerprints.
//!
//! A selector remembers the fingerprint of the list it was built from; a
//! mismatch on a later call means the topology moved and the ring is stale.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::Xxh3;

/// How a candidate list is fingerprinted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FingerprintMode {
    /// XXH3 over the sorted, de-duplicated address set.
    ///
    /// Sees in-place mutations and never rebuilds for a list with the same
    /// members, whatever its order or allocation.
    #[default]
    Content,
    /// Location and length of the list's backing storage.
    ///
    /// Costs nothing per call but only works when the discovery layer
    /// replaces its list on every change and never mutates it in place.
    /// A content-identical copy triggers a harmless rebuild.
    Identity,
}

impl FingerprintMode {
    pub fn fingerprint(&self, candidates: &[String]) -> Fingerprint {
        match self {
            FingerprintMode::Content => Fingerprint::content(candidates),
            FingerprintMode::Identity => Fingerprint::identity(candidates),
        }
    }
}

/// Value compared to decide whether a cached selector is stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Fingerprint {
    Content(u64),
    Identity { ptr: usize, len: usize },
}

impl Fingerprint {
    pub fn content(candidates: &[String]) -> Self {
        let members: BTreeSet<&str> = candidates.iter().map(String::as_str).collect();
        let mut hasher = Xxh3::new();
        for member in members {
            hasher.update(member.as_bytes());
            // Separator so ["ab", "c"] and ["a", "bc"] differ.
            hasher.update(&[0]);
        }
        Fingerprint::Content(hasher.digest())
    }

    pub fn identity(candidates: &[String]) -> Self {
        Fingerprint::Identity {
            ptr: candidates.as_ptr() as usize,
            len: candidates.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_content_ignores_order_and_allocation() {
        let a = list(&["10.0.0.1:8080", "10.0.0.2:8080"]);
        let b = list(&["10.0.0.2:8080", "10.0.0.1:8080"]);
        assert_eq!(Fingerprint::content(&a), Fingerprint::content(&b));
    }

    #[test]
    fn test_content_sees_membership() {
        let a = list(&["10.0.0.1:8080", "10.0.0.2:8080"]);
        let b = list(&["10.0.0.1:8080", "10.0.0.3:8080"]);
        assert_ne!(Fingerprint::content(&a), Fingerprint::content(&b));
        assert_ne!(
            Fingerprint::content(&list(&["ab", "c"])),
            Fingerprint::content(&list(&["a", "bc"]))
        );
    }

    #[test]
    fn test_identity_tracks_the_list_object() {
        let a = list(&["10.0.0.1:8080", "10.0.0.2:8080"]);
        let b = a.clone();
        assert_eq!(Fingerprint::identity(&a), Fingerprint::identity(&a));
        assert_ne!(Fingerprint::identity(&a), Fingerprint::identity(&b));
    }

    #[test]
    fn test_mode_deserialize() {
        let mode: FingerprintMode = serde_json::from_str("\"identity\"").unwrap();
        assert_eq!(mode, FingerprintMode::Identity);
        assert_eq!(FingerprintMode::default(), FingerprintMode::Content);
    }
}
