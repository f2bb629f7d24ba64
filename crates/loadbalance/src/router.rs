//! Caller-facing routing entry point.

use corelib::{Result, RoutingRequest};

use crate::config::LoadBalancerConfig;
use crate::strategy::{LoadBalance, LoadBalancer};

/// Hands each outbound call to the configured balancer.
#[derive(Debug, Default)]
pub struct RequestRouter {
    balancer: LoadBalancer,
}

impl RequestRouter {
    pub fn new(balancer: LoadBalancer) -> Self {
        Self { balancer }
    }

    pub fn from_config(config: &LoadBalancerConfig) -> Result<Self> {
        Ok(Self::new(LoadBalancer::from_config(config)?))
    }

    /// Pick the provider address for `request` out of `candidates`.
    pub fn select(&self, candidates: &[String], request: &RoutingRequest) -> Result<String> {
        self.balancer.choose(candidates, request)
    }

    pub fn balancer(&self) -> &LoadBalancer {
        &self.balancer
    }

    /// Drop all cached routing state, e.g. from a shutdown hook.
    pub fn clear(&self) {
        self.balancer.clear();
    }
}
