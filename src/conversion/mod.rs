//! # Conversion
//!
//! Converts a snapshot of stack workloads (`ReplicaSet`, `DaemonSet`) and
//! services into swarm services.
//!
//! Each workload names its logical service through a label. The internal
//! (`ClusterIP`) service with that name anchors the swarm service: its uid
//! becomes the service ID and its stack label qualifies the name. Externally
//! reachable services tied to it by the [`PublishedServiceMatcher`]
//! contribute published ports.
//!
//! Conversion is all-or-nothing: the first workload that cannot be converted
//! aborts the batch and no services are returned.

mod exposure;
mod index;
mod matcher;
mod ports;
mod workload;

pub use exposure::ExposureKind;
pub use matcher::{AnyOf, LabelMatcher, PublishedServiceMatcher, SuffixMatcher};
pub use workload::Workload;

use k8s_openapi::api::apps::v1::{DaemonSet, ReplicaSet};
use k8s_openapi::api::core::v1::Service;
use tracing::{debug, warn};

use crate::config::ConverterConfig;
use crate::constants::QUALIFIED_NAME_SEPARATOR;
use crate::error::ConversionError;
use crate::swarm::{ContainerSpec, Endpoint, ServiceSpec, SwarmService, TaskSpec};
use index::ServiceIndex;

/// Converts stack workloads and services into swarm services
#[derive(Debug)]
pub struct Converter {
    config: ConverterConfig,
    matcher: Box<dyn PublishedServiceMatcher>,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(ConverterConfig::default())
    }
}

impl Converter {
    /// Converter using the name suffix convention from `config`
    #[must_use]
    pub fn new(config: ConverterConfig) -> Self {
        let matcher = SuffixMatcher::from_config(&config);
        Self {
            config,
            matcher: Box::new(matcher),
        }
    }

    /// Replace the strategy tying published services to logical services
    #[must_use]
    pub fn with_matcher(mut self, matcher: impl PublishedServiceMatcher + 'static) -> Self {
        self.matcher = Box::new(matcher);
        self
    }

    #[must_use]
    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Convert a snapshot into swarm services
    ///
    /// Services come out in workload order: replica sets first, then daemon
    /// sets, each in input order.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConversionError`] met; no partial result is kept.
    pub fn convert(
        &self,
        replica_sets: &[ReplicaSet],
        daemon_sets: &[DaemonSet],
        services: &[Service],
    ) -> Result<Vec<SwarmService>, ConversionError> {
        let index = ServiceIndex::build(services, &self.config.stack_name_label);

        replica_sets
            .iter()
            .map(Workload::Replicated)
            .chain(daemon_sets.iter().map(Workload::Global))
            .map(|workload| self.convert_workload(&index, workload))
            .collect()
    }

    fn convert_workload<'a>(
        &self,
        index: &ServiceIndex<'a>,
        workload: Workload<'a>,
    ) -> Result<SwarmService, ConversionError> {
        let labels = workload.labels();
        let service_name = labels
            .get(&self.config.service_name_label)
            .ok_or_else(|| {
                warn!(
                    "{} '{}' has no '{}' label",
                    workload.kind(),
                    workload.name(),
                    self.config.service_name_label
                );
                ConversionError::MissingServiceLabel {
                    kind: workload.kind(),
                    workload: workload.name(),
                    label: self.config.service_name_label.clone(),
                }
            })?;
        let workload_stack = labels
            .get(&self.config.stack_name_label)
            .map(String::as_str);

        let anchor = index.anchor(workload_stack, service_name).ok_or_else(|| {
            warn!("Could not find service '{service_name}' (stack: {workload_stack:?})");
            ConversionError::ServiceNotFound {
                name: service_name.clone(),
            }
        })?;
        let id = anchor
            .metadata
            .uid
            .clone()
            .ok_or_else(|| ConversionError::MissingUid {
                name: service_name.clone(),
            })?;

        // An anchor without a stack label takes the workload's stack.
        let stack = index.stack_of(anchor).or(workload_stack);
        let name = match stack {
            Some(stack) => format!("{stack}{QUALIFIED_NAME_SEPARATOR}{service_name}"),
            None => service_name.clone(),
        };

        let mut ports = Vec::new();
        for exposure in index.published_in(stack) {
            if !self
                .matcher
                .matches(service_name, exposure.service, exposure.kind)
            {
                continue;
            }
            let Some(publish_mode) = exposure.kind.publish_mode() else {
                continue;
            };
            debug!(
                "Service '{}' publishes ports of '{}' ({:?})",
                exposure.service.metadata.name.as_deref().unwrap_or_default(),
                name,
                publish_mode
            );
            ports.extend(ports::published_ports(
                exposure.service,
                publish_mode,
                service_name,
                workload.containers(),
            )?);
        }

        let (mode, service_status) = workload.mode_and_status();
        debug!(
            "Converted {} '{}' into service '{}' ({}, {}/{} tasks, {} ports)",
            workload.kind(),
            workload.name(),
            name,
            mode,
            service_status.running_tasks,
            service_status.desired_tasks,
            ports.len()
        );

        Ok(SwarmService {
            id,
            spec: ServiceSpec {
                name,
                task_template: TaskSpec {
                    container_spec: ContainerSpec {
                        image: workload.image(),
                    },
                },
                mode,
            },
            endpoint: Endpoint { ports },
            service_status,
            stack: stack.map(str::to_string),
        })
    }
}

/// Convert a snapshot using the default label and naming conventions
///
/// # Errors
///
/// See [`Converter::convert`].
pub fn convert_to_services(
    replica_sets: &[ReplicaSet],
    daemon_sets: &[DaemonSet],
    services: &[Service],
) -> Result<Vec<SwarmService>, ConversionError> {
    Converter::default().convert(replica_sets, daemon_sets, services)
}
