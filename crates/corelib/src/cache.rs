//! Service name → selector cache.
//!
//! # Concurrency Model
//!
//! Backed by a `DashMap`, so every get and insert is atomic per key and no
//! outer lock is needed. Rebuilding is not serialized: two callers that see
//! the same stale entry at once both build a selector from equal inputs and
//! the last insert wins. The duplicate work is bounded by the number of
//! racing callers and never yields a wrong ring.
//!
//! Selectors are handed out as `Arc`s, so a caller keeps routing on the ring
//! it fetched even if another thread replaces the entry meanwhile.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::error::{Error, Result};
use crate::fingerprint::FingerprintMode;
use crate::partitioner::Partitioner;
use crate::ring::{validate_replicas, DEFAULT_REPLICAS};
use crate::selector::Selector;

#[derive(Debug)]
pub struct SelectorCache {
    selectors: DashMap<String, Arc<Selector>>,
    replicas: usize,
    partitioner: Partitioner,
    fingerprint_mode: FingerprintMode,
}

impl Default for SelectorCache {
    fn default() -> Self {
        Self {
            selectors: DashMap::new(),
            replicas: DEFAULT_REPLICAS,
            partitioner: Partitioner::default(),
            fingerprint_mode: FingerprintMode::default(),
        }
    }
}

impl SelectorCache {
    /// Create an empty cache whose selectors use `replicas` virtual nodes
    /// per address.
    pub fn new(
        replicas: usize,
        partitioner: Partitioner,
        fingerprint_mode: FingerprintMode,
    ) -> Result<Self> {
        validate_replicas(replicas)?;
        Ok(Self {
            selectors: DashMap::new(),
            replicas,
            partitioner,
            fingerprint_mode,
        })
    }

    /// Return the selector for `service`, building it when missing or when
    /// `candidates` no longer match its fingerprint.
    pub fn get_or_rebuild(&self, service: &str, candidates: &[String]) -> Result<Arc<Selector>> {
        if candidates.is_empty() {
            return Err(Error::no_candidates(service));
        }

        let fingerprint = self.fingerprint_mode.fingerprint(candidates);
        // The shard guard must be released before inserting into the same map.
        let cached = self.selectors.get(service).map(|entry| Arc::clone(entry.value()));
        let reason = match cached {
            Some(selector) if selector.matches(&fingerprint) => return Ok(selector),
            Some(_) => "stale",
            None => "missing",
        };

        let selector = Arc::new(Selector::build(
            candidates,
            self.replicas,
            self.partitioner,
            fingerprint,
        )?);
        debug!(
            service,
            reason,
            addresses = selector.ring().address_count(),
            tokens = selector.ring().token_count(),
            "built consistent hash selector"
        );
        self.selectors
            .insert(service.to_string(), Arc::clone(&selector));
        Ok(selector)
    }

    /// Current selector for `service`, if any, without staleness checks.
    pub fn get(&self, service: &str) -> Option<Arc<Selector>> {
        self.selectors.get(service).map(|entry| Arc::clone(entry.value()))
    }

    /// Drop the selector for `service`; the next call rebuilds it.
    pub fn invalidate(&self, service: &str) -> bool {
        let removed = self.selectors.remove(service).is_some();
        if removed {
            debug!(service, "invalidated consistent hash selector");
        }
        removed
    }

    /// Drop every selector.
    pub fn clear(&self) {
        let count = self.selectors.len();
        self.selectors.clear();
        debug!(count, "cleared selector cache");
    }

    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    pub fn replicas(&self) -> usize {
        self.replicas
    }

    pub fn partitioner(&self) -> Partitioner {
        self.partitioner
    }

    pub fn fingerprint_mode(&self) -> FingerprintMode {
        self.fingerprint_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_rejects_bad_replicas() {
        let err = SelectorCache::new(6, Partitioner::Md5, FingerprintMode::Content).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_empty_candidates() {
        let cache = SelectorCache::default();
        let err = cache.get_or_rebuild("svc", &[]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_reuse_same_list() {
        let cache = SelectorCache::default();
        let candidates = list(&["a:1", "b:2"]);

        let first = cache.get_or_rebuild("svc", &candidates).unwrap();
        let second = cache.get_or_rebuild("svc", &candidates).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_rebuild_on_new_membership() {
        let cache = SelectorCache::default();
        let before = cache.get_or_rebuild("svc", &list(&["a:1", "b:2"])).unwrap();
        let after = cache.get_or_rebuild("svc", &list(&["a:1", "c:3"])).unwrap();

        assert!(!Arc::ptr_eq(&before, &after));
        let addrs: Vec<&str> = after.ring().addresses().collect();
        assert_eq!(addrs, vec!["a:1", "c:3"]);
        assert!(Arc::ptr_eq(&cache.get("svc").unwrap(), &after));
    }

    #[test]
    fn test_services_are_independent() {
        let cache = SelectorCache::default();
        cache.get_or_rebuild("one", &list(&["a:1", "b:2"])).unwrap();
        cache.get_or_rebuild("two", &list(&["c:3", "d:4"])).unwrap();
        assert_eq!(cache.len(), 2);

        assert!(cache.invalidate("one"));
        assert!(!cache.invalidate("one"));
        assert!(cache.get("one").is_none());
        assert!(cache.get("two").is_some());

        cache.clear();
        assert!(cache.is_empty());
    }
}
