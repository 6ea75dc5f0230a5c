//! # Exposure Kinds
//!
//! Classifies `Service` objects by `spec.type`.

use k8s_openapi::api::core::v1::Service;

use crate::swarm::PublishMode;

/// Kind of network exposure a `Service` provides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExposureKind {
    /// `ClusterIP`: reachable only inside the cluster, anchors service identity
    Internal,
    /// `LoadBalancer`: published through an external load balancer
    LoadBalanced,
    /// `NodePort`: published on a port of every node
    NodePublished,
    /// `ExternalName`: a DNS alias, never part of a stack service
    ExternalName,
}

impl ExposureKind {
    /// Classify a service; `None` for types this converter does not know
    #[must_use]
    pub fn of(service: &Service) -> Option<Self> {
        let service_type = service
            .spec
            .as_ref()
            .and_then(|spec| spec.type_.as_deref())
            .unwrap_or("ClusterIP");

        match service_type {
            "ClusterIP" => Some(Self::Internal),
            "LoadBalancer" => Some(Self::LoadBalanced),
            "NodePort" => Some(Self::NodePublished),
            "ExternalName" => Some(Self::ExternalName),
            _ => None,
        }
    }

    /// Publish mode of ports exposed this way, `None` if not externally reachable
    #[must_use]
    pub fn publish_mode(self) -> Option<PublishMode> {
        match self {
            Self::LoadBalanced => Some(PublishMode::Ingress),
            Self::NodePublished => Some(PublishMode::Host),
            Self::Internal | Self::ExternalName => None,
        }
    }
}
