//! The slice of an RPC request that routing needs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How the routing key is derived from a request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingKeyMode {
    /// Service name only: every call to a service lands on the same provider
    /// until the topology changes.
    Service,
    /// Service name followed by the canonical JSON of the parameters, so
    /// calls with different arguments spread across providers.
    #[default]
    ServiceAndParameters,
}

/// Service identity plus call parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoutingRequest {
    pub interface_name: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub parameters: Vec<Value>,
}

impl RoutingRequest {
    pub fn new(
        interface_name: impl Into<String>,
        group: impl Into<String>,
        version: impl Into<String>,
        parameters: Vec<Value>,
    ) -> Self {
        Self {
            interface_name: interface_name.into(),
            group: group.into(),
            version: version.into(),
            parameters,
        }
    }

    /// A request for a service with no group, version or parameters.
    pub fn for_service(interface_name: impl Into<String>) -> Self {
        Self::new(interface_name, "", "", Vec::new())
    }

    pub fn with_parameters(mut self, parameters: Vec<Value>) -> Self {
        self.parameters = parameters;
        self
    }

    /// Stable service key: interface name, group and version concatenated.
    pub fn service_name(&self) -> String {
        let mut name =
            String::with_capacity(self.interface_name.len() + self.group.len() + self.version.len());
        name.push_str(&self.interface_name);
        name.push_str(&self.group);
        name.push_str(&self.version);
        name
    }

    /// The string hashed to pick a ring position.
    ///
    /// `serde_json` writes objects in key order, so equal parameter values
    /// always give the same key.
    pub fn routing_key(&self, mode: RoutingKeyMode) -> String {
        let mut key = self.service_name();
        if mode == RoutingKeyMode::ServiceAndParameters {
            key.push('[');
            for (i, param) in self.parameters.iter().enumerate() {
                if i > 0 {
                    key.push(',');
                }
                key.push_str(&param.to_string());
            }
            key.push(']');
        }
        key
    }
}
