//! Load balancing strategy abstractions.
//!
//! A strategy picks one provider address out of the candidate list handed
//! over by service discovery:
//!
//! - **RandomBalance**: uniform pick per call, stateless
//! - **RoundRobinBalance**: per-service rotating counter
//! - **ConsistentHashBalance**: per-service hash ring keyed by the request

pub mod consistent_hash;
pub mod random;
pub mod round_robin;

pub use consistent_hash::ConsistentHashBalance;
pub use random::RandomBalance;
pub use round_robin::RoundRobinBalance;

use corelib::{Error, Result, RoutingRequest};
use tracing::info;

use crate::config::{LoadBalancerConfig, StrategyKind};

/// Trait for load balancing strategies.
///
/// Implementors only provide [`LoadBalance::do_select`]; the shared
/// contract lives in [`LoadBalance::choose`].
///
/// # Thread Safety
///
/// Implementations must be thread-safe (Send + Sync): one balancer serves
/// every in-flight call.
pub trait LoadBalance: Send + Sync + 'static {
    /// Choose the address the call is dispatched to.
    ///
    /// # Contract
    ///
    /// 1. An empty candidate list fails with [`Error::InvalidInput`]
    /// 2. A single candidate is returned as is, without running the strategy
    /// 3. Anything else is handed to [`LoadBalance::do_select`] unchanged
    ///
    /// The returned address is not checked for liveness.
    fn choose(&self, candidates: &[String], request: &RoutingRequest) -> Result<String> {
        match candidates {
            [] => Err(Error::no_candidates(&request.service_name())),
            [only] => Ok(only.clone()),
            _ => self.do_select(candidates, request),
        }
    }

    /// Strategy-specific selection over two or more candidates.
    fn do_select(&self, candidates: &[String], request: &RoutingRequest) -> Result<String>;

    /// Get the strategy name (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// The closed set of strategies, selected by configuration at startup.
#[derive(Debug)]
pub enum LoadBalancer {
    Random(RandomBalance),
    RoundRobin(RoundRobinBalance),
    ConsistentHash(ConsistentHashBalance),
}

impl Default for LoadBalancer {
    fn default() -> Self {
        LoadBalancer::ConsistentHash(ConsistentHashBalance::default())
    }
}

impl LoadBalancer {
    /// Build the configured strategy.
    ///
    /// The digest is resolved here, so a missing primitive fails at startup
    /// rather than on the first routed call.
    pub fn from_config(config: &LoadBalancerConfig) -> Result<Self> {
        let partitioner = config.validate()?;
        let balancer = match config.strategy {
            StrategyKind::Random => LoadBalancer::Random(RandomBalance::new()),
            StrategyKind::RoundRobin => LoadBalancer::RoundRobin(RoundRobinBalance::new()),
            StrategyKind::ConsistentHash => LoadBalancer::ConsistentHash(
                ConsistentHashBalance::with_settings(
                    config.replicas,
                    partitioner,
                    config.fingerprint,
                    config.routing_key,
                )?,
            ),
        };
        info!(
            strategy = balancer.name(),
            replicas = config.replicas,
            digest = %partitioner,
            "load balancer configured"
        );
        Ok(balancer)
    }

    /// Forget all per-service state (selectors, counters).
    pub fn clear(&self) {
        match self {
            LoadBalancer::Random(_) => {}
            LoadBalancer::RoundRobin(lb) => lb.clear(),
            LoadBalancer::ConsistentHash(lb) => lb.cache().clear(),
        }
    }
}

impl LoadBalance for LoadBalancer {
    fn do_select(&self, candidates: &[String], request: &RoutingRequest) -> Result<String> {
        match self {
            LoadBalancer::Random(lb) => lb.do_select(candidates, request),
            LoadBalancer::RoundRobin(lb) => lb.do_select(candidates, request),
            LoadBalancer::ConsistentHash(lb) => lb.do_select(candidates, request),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            LoadBalancer::Random(lb) => lb.name(),
            LoadBalancer::RoundRobin(lb) => lb.name(),
            LoadBalancer::ConsistentHash(lb) => lb.name(),
        }
    }
}
