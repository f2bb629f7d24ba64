//! Load balancer configuration.
//!
//! All fields have defaults, so an empty document yields a consistent hash
//! balancer with 160 MD5 virtual nodes per address.

use corelib::ring::validate_replicas;
use corelib::{Error, FingerprintMode, Partitioner, Result, RoutingKeyMode, DEFAULT_REPLICAS};
use serde::{Deserialize, Serialize};

/// Which balancing strategy to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Random,
    RoundRobin,
    #[default]
    ConsistentHash,
}

/// Balancer settings, usually a `[load_balancer]` table of the
/// application's config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadBalancerConfig {
    /// Strategy selected at startup.
    pub strategy: StrategyKind,

    /// Virtual nodes per address (consistent hash only).
    pub replicas: usize,

    /// Digest name, resolved eagerly by [`LoadBalancerConfig::validate`].
    pub digest: String,

    /// How candidate lists are compared for staleness.
    pub fingerprint: FingerprintMode,

    /// How the routing key is derived from a request.
    pub routing_key: RoutingKeyMode,
}

impl Default for LoadBalancerConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            replicas: DEFAULT_REPLICAS,
            digest: Partitioner::default().name().to_string(),
            fingerprint: FingerprintMode::default(),
            routing_key: RoutingKeyMode::default(),
        }
    }
}

impl LoadBalancerConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the replica factor and resolve the digest.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidConfig`] for a bad replica factor
    /// - [`Error::HashingUnavailable`] for an unknown digest
    pub fn validate(&self) -> Result<Partitioner> {
        validate_replicas(self.replicas)?;
        self.digest.parse()
    }
}
