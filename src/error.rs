//! # Conversion Errors
//!
//! Every variant is fatal for the whole batch: the converter returns the
//! first error it meets and never hands back a partial service list.

use thiserror::Error;

/// Errors raised while converting a cluster snapshot into swarm services
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// No internal (`ClusterIP`) service anchors the logical service
    #[error("could not find service '{name}'")]
    ServiceNotFound { name: String },

    /// A workload lacks the label naming its logical service
    #[error("could not find service for {kind} '{workload}': missing label '{label}'")]
    MissingServiceLabel {
        kind: &'static str,
        workload: String,
        label: String,
    },

    /// The anchoring service has no `metadata.uid`
    #[error("service '{name}' has no uid")]
    MissingUid { name: String },

    /// A named target port matches no container port of the workload
    #[error("service '{service}' targets port '{port}' which no container of '{name}' declares")]
    UnresolvedTargetPort {
        name: String,
        service: String,
        port: String,
    },

    /// A service port uses a protocol swarm cannot express
    #[error("service '{service}' uses unsupported protocol '{protocol}'")]
    UnsupportedProtocol { service: String, protocol: String },
}

impl ConversionError {
    /// Returns true when a workload could not be tied to its internal service
    #[must_use]
    pub fn is_association_failure(&self) -> bool {
        matches!(
            self,
            Self::ServiceNotFound { .. } | Self::MissingServiceLabel { .. }
        )
    }

    /// Name of the logical service or workload the error is about
    #[must_use]
    pub fn subject(&self) -> &str {
        match self {
            Self::ServiceNotFound { name }
            | Self::MissingUid { name }
            | Self::UnresolvedTargetPort { name, .. } => name,
            Self::MissingServiceLabel { workload, .. } => workload,
            Self::UnsupportedProtocol { service, .. } => service,
        }
    }
}
