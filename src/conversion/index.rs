//! # Service Index
//!
//! Workloads and services carry no reference to each other, only labels and
//! naming conventions. The index rebuilds that join once per conversion:
//! internal services keyed by (stack, name), externally reachable services
//! grouped by stack in input order.

use k8s_openapi::api::core::v1::Service;
use kube::ResourceExt;
use std::collections::HashMap;
use tracing::debug;

use super::exposure::ExposureKind;

/// An externally reachable service and how it publishes its ports
#[derive(Debug, Clone, Copy)]
pub struct PublishedExposure<'a> {
    pub service: &'a Service,
    pub kind: ExposureKind,
}

#[derive(Debug)]
pub(crate) struct ServiceIndex<'a> {
    stack_label: &'a str,
    anchors: HashMap<(Option<&'a str>, &'a str), &'a Service>,
    anchors_by_name: HashMap<&'a str, &'a Service>,
    published: HashMap<Option<&'a str>, Vec<PublishedExposure<'a>>>,
}

impl<'a> ServiceIndex<'a> {
    pub(crate) fn build(services: &'a [Service], stack_label: &'a str) -> Self {
        let mut index = Self {
            stack_label,
            anchors: HashMap::new(),
            anchors_by_name: HashMap::new(),
            published: HashMap::new(),
        };

        for service in services {
            let Some(name) = service.metadata.name.as_deref() else {
                continue;
            };
            let stack = index.stack_of(service);

            match ExposureKind::of(service) {
                Some(ExposureKind::Internal) => {
                    // Duplicates are undefined upstream; the first one wins.
                    index.anchors.entry((stack, name)).or_insert(service);
                    index.anchors_by_name.entry(name).or_insert(service);
                }
                Some(kind @ (ExposureKind::LoadBalanced | ExposureKind::NodePublished)) => {
                    index
                        .published
                        .entry(stack)
                        .or_default()
                        .push(PublishedExposure { service, kind });
                }
                Some(ExposureKind::ExternalName) | None => {
                    debug!("Ignoring service '{name}': not part of a stack service");
                }
            }
        }

        index
    }

    /// Stack label value of a service
    pub(crate) fn stack_of(&self, service: &'a Service) -> Option<&'a str> {
        service.labels().get(self.stack_label).map(String::as_str)
    }

    /// Internal service anchoring `name`
    ///
    /// With a stack, only services of that stack (or carrying no stack label)
    /// match. Without one, the first internal service with that name is used.
    pub(crate) fn anchor(&self, stack: Option<&'a str>, name: &'a str) -> Option<&'a Service> {
        match stack {
            Some(_) => self
                .anchors
                .get(&(stack, name))
                .or_else(|| self.anchors.get(&(None, name)))
                .copied(),
            None => self.anchors_by_name.get(name).copied(),
        }
    }

    /// Externally reachable services in `stack`, in input order
    pub(crate) fn published_in(&self, stack: Option<&'a str>) -> &[PublishedExposure<'a>] {
        self.published
            .get(&stack)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
