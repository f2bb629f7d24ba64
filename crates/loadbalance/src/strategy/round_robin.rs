//! Round-robin load balancing strategy.

use std::sync::atomic::{AtomicUsize, Ordering};

use corelib::{Result, RoutingRequest};
use dashmap::DashMap;

use crate::strategy::LoadBalance;

/// Round-robin selector.
///
/// Keeps one atomic counter per service so services rotate independently.
#[derive(Debug, Default)]
pub struct RoundRobinBalance {
    counters: DashMap<String, AtomicUsize>,
}

impl RoundRobinBalance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset every service's rotation.
    pub fn clear(&self) {
        self.counters.clear();
    }

    fn next_ticket(&self, service: String) -> usize {
        if let Some(counter) = self.counters.get(&service) {
            return counter.fetch_add(1, Ordering::Relaxed);
        }
        self.counters
            .entry(service)
            .or_default()
            .fetch_add(1, Ordering::Relaxed)
    }
}

impl LoadBalance for RoundRobinBalance {
    fn do_select(&self, candidates: &[String], request: &RoutingRequest) -> Result<String> {
        let ticket = self.next_ticket(request.service_name());
        Ok(candidates[ticket % candidates.len()].clone())
    }

    fn name(&self) -> &'static str {
        "RoundRobin"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> Vec<String> {
        vec!["a:1".to_string(), "b:2".to_string(), "c:3".to_string()]
    }

    #[test]
    fn test_round_robin() {
        let lb = RoundRobinBalance::new();
        let request = RoutingRequest::for_service("svc");
        let candidates = list();

        let picks: Vec<String> = (0..4)
            .map(|_| lb.choose(&candidates, &request).unwrap())
            .collect();
        assert_eq!(picks, vec!["a:1", "b:2", "c:3", "a:1"]);
    }

    #[test]
    fn test_services_rotate_independently() {
        let lb = RoundRobinBalance::new();
        let candidates = list();
        let one = RoutingRequest::for_service("one");
        let two = RoutingRequest::for_service("two");

        assert_eq!(lb.choose(&candidates, &one).unwrap(), "a:1");
        assert_eq!(lb.choose(&candidates, &one).unwrap(), "b:2");
        assert_eq!(lb.choose(&candidates, &two).unwrap(), "a:1");

        lb.clear();
        assert_eq!(lb.choose(&candidates, &one).unwrap(), "a:1");
    }

    #[test]
    fn test_concurrent_rotation_is_even() {
        let lb = RoundRobinBalance::new();
        let candidates = list();
        let request = RoutingRequest::for_service("svc");

        let picks: Vec<String> = crossbeam::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    s.spawn(|_| {
                        (0..300)
                            .map(|_| lb.choose(&candidates, &request).unwrap())
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap())
                .collect()
        })
        .unwrap();

        for address in &candidates {
            assert_eq!(picks.iter().filter(|p| *p == address).count(), 400);
        }
    }
}
