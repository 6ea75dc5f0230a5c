//! # Workloads
//!
//! Both workload controllers behind one enum, so scaling mode and status are
//! derived by a single exhaustive match.

use k8s_openapi::api::apps::v1::{DaemonSet, ReplicaSet};
use k8s_openapi::api::core::v1::{Container, PodTemplateSpec};
use kube::ResourceExt;
use std::collections::BTreeMap;

use crate::swarm::{ServiceMode, ServiceStatus};

/// A workload controller backing one logical service
#[derive(Debug, Clone, Copy)]
pub enum Workload<'a> {
    /// Replica-counted workload
    Replicated(&'a ReplicaSet),
    /// One pod per eligible node
    Global(&'a DaemonSet),
}

impl<'a> Workload<'a> {
    /// Kubernetes kind, for diagnostics
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Replicated(_) => "ReplicaSet",
            Self::Global(_) => "DaemonSet",
        }
    }

    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Replicated(rs) => rs.name_any(),
            Self::Global(ds) => ds.name_any(),
        }
    }

    #[must_use]
    pub fn labels(&self) -> &'a BTreeMap<String, String> {
        match *self {
            Self::Replicated(rs) => rs.labels(),
            Self::Global(ds) => ds.labels(),
        }
    }

    /// Containers of the pod template, empty when the template is absent
    #[must_use]
    pub fn containers(&self) -> &'a [Container] {
        let template: Option<&'a PodTemplateSpec> = match *self {
            Self::Replicated(rs) => rs.spec.as_ref().and_then(|s| s.template.as_ref()),
            Self::Global(ds) => ds.spec.as_ref().map(|s| &s.template),
        };
        template
            .and_then(|t| t.spec.as_ref())
            .map(|pod| pod.containers.as_slice())
            .unwrap_or_default()
    }

    /// Image of the first container, empty when there is none
    #[must_use]
    pub fn image(&self) -> String {
        self.containers()
            .first()
            .and_then(|c| c.image.clone())
            .unwrap_or_default()
    }

    /// Scaling mode and task counts
    ///
    /// Replicated services take their desired count from `status.replicas`,
    /// falling back to `spec.replicas` before the controller has reported.
    #[must_use]
    pub fn mode_and_status(&self) -> (ServiceMode, ServiceStatus) {
        match self {
            Self::Replicated(rs) => {
                let declared = rs.spec.as_ref().and_then(|s| s.replicas);
                let (desired, available) = match rs.status.as_ref() {
                    Some(status) => (status.replicas, status.available_replicas.unwrap_or(0)),
                    None => (declared.unwrap_or(0), 0),
                };
                let desired = to_count(desired);
                let mode = ServiceMode::replicated(desired);
                let status = ServiceStatus {
                    running_tasks: to_count(available),
                    desired_tasks: desired,
                };
                (mode, status)
            }
            Self::Global(ds) => {
                let status = ds
                    .status
                    .as_ref()
                    .map(|s| ServiceStatus {
                        running_tasks: to_count(s.number_ready),
                        desired_tasks: to_count(s.desired_number_scheduled),
                    })
                    .unwrap_or_default();
                (ServiceMode::global(), status)
            }
        }
    }
}

/// Negative counts never come from a healthy API server; clamp them to zero.
fn to_count(value: i32) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::apps::v1::{
        DaemonSetSpec, DaemonSetStatus, ReplicaSetSpec, ReplicaSetStatus,
    };
    use k8s_openapi::api::core::v1::PodSpec;

    fn template(image: &str) -> PodTemplateSpec {
        PodTemplateSpec {
            spec: Some(PodSpec {
                containers: vec![Container {
                    name: "main".to_string(),
                    image: Some(image.to_string()),
                    ..Container::default()
                }],
                ..PodSpec::default()
            }),
            ..PodTemplateSpec::default()
        }
    }

    #[test]
    fn test_replicated_mode_and_status() {
        let rs = ReplicaSet {
            spec: Some(ReplicaSetSpec {
                replicas: Some(5),
                template: Some(template("nginx:1.25")),
                ..ReplicaSetSpec::default()
            }),
            status: Some(ReplicaSetStatus {
                replicas: 5,
                available_replicas: Some(2),
                ..ReplicaSetStatus::default()
            }),
            ..ReplicaSet::default()
        };
        let workload = Workload::Replicated(&rs);

        let (mode, status) = workload.mode_and_status();
        assert_eq!(mode, ServiceMode::replicated(5));
        assert_eq!(status.running_tasks, 2);
        assert_eq!(status.desired_tasks, 5);
        assert_eq!(workload.image(), "nginx:1.25");
        assert_eq!(workload.kind(), "ReplicaSet");
    }

    #[test]
    fn test_replicated_without_status_uses_spec() {
        let rs = ReplicaSet {
            spec: Some(ReplicaSetSpec {
                replicas: Some(3),
                ..ReplicaSetSpec::default()
            }),
            ..ReplicaSet::default()
        };

        let (mode, status) = Workload::Replicated(&rs).mode_and_status();
        assert_eq!(mode, ServiceMode::replicated(3));
        assert_eq!(status.running_tasks, 0);
        assert_eq!(status.desired_tasks, 3);
        assert_eq!(Workload::Replicated(&rs).image(), "");
    }

    #[test]
    fn test_global_mode_and_status() {
        let ds = DaemonSet {
            spec: Some(DaemonSetSpec {
                template: template("fluentd"),
                ..DaemonSetSpec::default()
            }),
            status: Some(DaemonSetStatus {
                number_ready: 2,
                desired_number_scheduled: 3,
                ..DaemonSetStatus::default()
            }),
            ..DaemonSet::default()
        };
        let workload = Workload::Global(&ds);

        let (mode, status) = workload.mode_and_status();
        assert_eq!(mode, ServiceMode::global());
        assert_eq!(status.running_tasks, 2);
        assert_eq!(status.desired_tasks, 3);
        assert_eq!(workload.image(), "fluentd");
    }

    #[test]
    fn test_negative_counts_clamp_to_zero() {
        assert_eq!(to_count(-1), 0);
        assert_eq!(to_count(7), 7);
    }
}
