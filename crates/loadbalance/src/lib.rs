//! Load balancing strategies for RPC request routing.
//!
//! This crate decides which provider receives a call:
//! - The shared strategy contract and its variants
//! - Startup configuration selecting a variant
//! - The request router callers go through

pub mod config;
pub mod router;
pub mod strategy;

pub use config::{LoadBalancerConfig, StrategyKind};
pub use router::RequestRouter;
pub use strategy::{
    ConsistentHashBalance, LoadBalance, LoadBalancer, RandomBalance, RoundRobinBalance,
};
