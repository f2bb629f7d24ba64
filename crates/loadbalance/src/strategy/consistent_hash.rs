//! Consistent hash load balancing strategy.
//!
//! # Algorithm
//!
//! 1. Fetch the service's selector from the cache, rebuilding it when the
//!    candidate list's fingerprint changed
//! 2. Derive the routing key from the request
//! 3. Digest the key; its first four bytes (little-endian) are the lookup
//!    token
//! 4. Walk clockwise to the first virtual node, wrapping at the end
//!
//! Calls with the same routing key stick to the same provider for as long as
//! the provider set is unchanged, and only keys owned by a departed or new
//! provider move when it changes.

use corelib::{
    FingerprintMode, Partitioner, Result, RoutingKeyMode, RoutingRequest, SelectorCache,
};
use tracing::trace;

use crate::strategy::LoadBalance;

/// Consistent hash selector over per-service hash rings.
#[derive(Debug, Default)]
pub struct ConsistentHashBalance {
    cache: SelectorCache,
    routing_key: RoutingKeyMode,
}

impl ConsistentHashBalance {
    /// Wrap an existing cache.
    pub fn new(cache: SelectorCache, routing_key: RoutingKeyMode) -> Self {
        Self { cache, routing_key }
    }

    /// Build a balancer with its own cache.
    pub fn with_settings(
        replicas: usize,
        partitioner: Partitioner,
        fingerprint: FingerprintMode,
        routing_key: RoutingKeyMode,
    ) -> Result<Self> {
        let cache = SelectorCache::new(replicas, partitioner, fingerprint)?;
        Ok(Self::new(cache, routing_key))
    }

    pub fn cache(&self) -> &SelectorCache {
        &self.cache
    }

    pub fn routing_key_mode(&self) -> RoutingKeyMode {
        self.routing_key
    }
}

impl LoadBalance for ConsistentHashBalance {
    fn do_select(&self, candidates: &[String], request: &RoutingRequest) -> Result<String> {
        let service = request.service_name();
        let selector = self.cache.get_or_rebuild(&service, candidates)?;
        let key = request.routing_key(self.routing_key);
        let address = selector.pick(&key)?;
        trace!(service = %service, address, "consistent hash selection");
        Ok(address.to_string())
    }

    fn name(&self) -> &'static str {
        "ConsistentHash"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::HashRing;
    use serde_json::json;

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_matches_direct_ring_lookup() {
        let lb = ConsistentHashBalance::default();
        let candidates = list(&["10.0.0.1:8080", "10.0.0.2:8080", "10.0.0.3:8080"]);
        let request = RoutingRequest::for_service("svc").with_parameters(vec![json!(7)]);

        let ring = HashRing::from_addresses(&candidates, 160, Partitioner::Md5).unwrap();
        let expected = ring.lookup_key(b"svc[7]").unwrap();

        assert_eq!(lb.choose(&candidates, &request).unwrap(), expected);
    }

    #[test]
    fn test_same_request_is_sticky() {
        let lb = ConsistentHashBalance::default();
        let candidates = list(&["a:1", "b:2", "c:3", "d:4"]);
        let request = RoutingRequest::new("svc", "g", "v1", vec![json!("user-42")]);

        let first = lb.choose(&candidates, &request).unwrap();
        for _ in 0..20 {
            assert_eq!(lb.choose(&candidates, &request).unwrap(), first);
        }
        assert_eq!(lb.cache().len(), 1);
    }

    #[test]
    fn test_parameters_spread_calls() {
        let lb = ConsistentHashBalance::default();
        let candidates = list(&["a:1", "b:2", "c:3", "d:4"]);

        let chosen: std::collections::HashSet<String> = (0..200)
            .map(|i| {
                let request = RoutingRequest::for_service("svc").with_parameters(vec![json!(i)]);
                lb.choose(&candidates, &request).unwrap()
            })
            .collect();
        assert_eq!(chosen.len(), 4);
    }

    #[test]
    fn test_service_only_key_ignores_parameters() {
        let lb = ConsistentHashBalance::with_settings(
            160,
            Partitioner::Md5,
            FingerprintMode::Content,
            RoutingKeyMode::Service,
        )
        .unwrap();
        let candidates = list(&["a:1", "b:2", "c:3", "d:4"]);

        let first = lb
            .choose(&candidates, &RoutingRequest::for_service("svc"))
            .unwrap();
        for i in 0..50 {
            let request = RoutingRequest::for_service("svc").with_parameters(vec![json!(i)]);
            assert_eq!(lb.choose(&candidates, &request).unwrap(), first);
        }
    }
}
