//! Random load balancing strategy.

use corelib::{Result, RoutingRequest};
use rand::Rng;

use crate::strategy::LoadBalance;

/// Uniform random pick per call. Holds no state.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomBalance;

impl RandomBalance {
    pub fn new() -> Self {
        Self
    }
}

impl LoadBalance for RandomBalance {
    fn do_select(&self, candidates: &[String], _request: &RoutingRequest) -> Result<String> {
        let index = rand::thread_rng().gen_range(0..candidates.len());
        Ok(candidates[index].clone())
    }

    fn name(&self) -> &'static str {
        "Random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_random_picks_members() {
        let lb = RandomBalance::new();
        let list: Vec<String> = (1..=3).map(|i| format!("10.0.0.{}:8080", i)).collect();
        let request = RoutingRequest::for_service("svc");

        let mut seen = HashSet::new();
        for _ in 0..300 {
            let chosen = lb.choose(&list, &request).unwrap();
            assert!(list.contains(&chosen));
            seen.insert(chosen);
        }
        // 300 uniform draws over 3 members miss one with negligible odds.
        assert_eq!(seen.len(), 3);
    }
}
