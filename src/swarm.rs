//! # Swarm Service Model
//!
//! The unified service shape produced by the converter. Field names follow the
//! swarm API's JSON vocabulary so the output can be consumed by tooling that
//! already understands `docker service inspect`.

use serde::Serialize;
use std::fmt;

/// A converted service, one per logical application component
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SwarmService {
    /// Uid of the internal service anchoring this logical service
    #[serde(rename = "ID")]
    pub id: String,
    pub spec: ServiceSpec,
    pub endpoint: Endpoint,
    pub service_status: ServiceStatus,
    /// Stack the service was deployed in, if any
    #[serde(skip)]
    pub stack: Option<String>,
}

impl SwarmService {
    /// Stack-qualified name (`<stack>_<service>`)
    #[must_use]
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    /// Whether the service was deployed as part of `stack`
    #[must_use]
    pub fn belongs_to(&self, stack: &str) -> bool {
        self.stack.as_deref() == Some(stack)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceSpec {
    pub name: String,
    pub task_template: TaskSpec,
    pub mode: ServiceMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaskSpec {
    pub container_spec: ContainerSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerSpec {
    pub image: String,
}

/// Scaling mode of a service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub enum ServiceMode {
    /// Fixed replica count
    Replicated(ReplicatedService),
    /// One task per eligible node
    Global(GlobalService),
}

impl ServiceMode {
    #[must_use]
    pub fn replicated(replicas: u64) -> Self {
        Self::Replicated(ReplicatedService { replicas })
    }

    #[must_use]
    pub fn global() -> Self {
        Self::Global(GlobalService {})
    }
}

impl fmt::Display for ServiceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Replicated(_) => f.write_str("replicated"),
            Self::Global(_) => f.write_str("global"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReplicatedService {
    pub replicas: u64,
}

#[allow(
    clippy::empty_structs_with_brackets,
    reason = "Serializes as an empty object, matching the swarm API"
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct GlobalService {}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Endpoint {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<PortConfig>,
}

/// Running and desired task counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceStatus {
    pub running_tasks: u64,
    pub desired_tasks: u64,
}

/// One published port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PortConfig {
    pub protocol: PortProtocol,
    pub target_port: u32,
    pub published_port: u32,
    pub publish_mode: PublishMode,
}

impl fmt::Display for PortConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.publish_mode {
            PublishMode::Ingress => write!(
                f,
                "*:{}->{}/{}",
                self.published_port, self.target_port, self.protocol
            ),
            PublishMode::Host => write!(
                f,
                "{}->{}/{}",
                self.published_port, self.target_port, self.protocol
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PortProtocol {
    Tcp,
    Udp,
    Sctp,
}

impl fmt::Display for PortProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => f.write_str("tcp"),
            Self::Udp => f.write_str("udp"),
            Self::Sctp => f.write_str("sctp"),
        }
    }
}

/// How a port is reachable from outside the cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishMode {
    /// Routed through the cluster-wide mesh
    Ingress,
    /// Bound directly on each node
    Host,
}
