//! # Published Service Matching
//!
//! Decides which externally reachable services publish ports for a logical
//! service. The index already restricts candidates to the anchor's stack, so
//! matchers only look at names, kinds and labels.
//!
//! The stack deployer creates one `LoadBalancer` service named
//! `<service>-published` for ingress ports and one `NodePort` service named
//! `<service>-random-ports` for ports without a fixed published port.
//! [`SuffixMatcher`] follows that convention and is the default.

use k8s_openapi::api::core::v1::Service;
use kube::ResourceExt;
use std::fmt;

use super::exposure::ExposureKind;
use crate::config::ConverterConfig;

/// Strategy tying externally reachable services to a logical service
pub trait PublishedServiceMatcher: fmt::Debug + Send + Sync {
    /// Whether `candidate`, exposed as `kind`, publishes ports of `service_name`
    fn matches(&self, service_name: &str, candidate: &Service, kind: ExposureKind) -> bool;
}

/// Matches companion services by name suffix and exposure kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixMatcher {
    published_suffix: String,
    random_ports_suffix: String,
}

impl SuffixMatcher {
    #[must_use]
    pub fn new(
        published_suffix: impl Into<String>,
        random_ports_suffix: impl Into<String>,
    ) -> Self {
        Self {
            published_suffix: published_suffix.into(),
            random_ports_suffix: random_ports_suffix.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &ConverterConfig) -> Self {
        Self::new(
            config.published_service_suffix.as_str(),
            config.random_ports_service_suffix.as_str(),
        )
    }
}

impl Default for SuffixMatcher {
    fn default() -> Self {
        Self::from_config(&ConverterConfig::default())
    }
}

impl PublishedServiceMatcher for SuffixMatcher {
    fn matches(&self, service_name: &str, candidate: &Service, kind: ExposureKind) -> bool {
        let suffix = match kind {
            ExposureKind::LoadBalanced => &self.published_suffix,
            ExposureKind::NodePublished => &self.random_ports_suffix,
            ExposureKind::Internal | ExposureKind::ExternalName => return false,
        };

        candidate
            .metadata
            .name
            .as_deref()
            .and_then(|name| name.strip_suffix(suffix.as_str()))
            .is_some_and(|base| base == service_name)
    }
}

/// Matches externally reachable services carrying the service name label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMatcher {
    service_name_label: String,
}

impl LabelMatcher {
    #[must_use]
    pub fn new(service_name_label: impl Into<String>) -> Self {
        Self {
            service_name_label: service_name_label.into(),
        }
    }
}

impl PublishedServiceMatcher for LabelMatcher {
    fn matches(&self, service_name: &str, candidate: &Service, kind: ExposureKind) -> bool {
        kind.publish_mode().is_some()
            && candidate
                .labels()
                .get(&self.service_name_label)
                .is_some_and(|value| value == service_name)
    }
}

/// Matches when any of the inner matchers does
#[derive(Debug, Default)]
pub struct AnyOf {
    matchers: Vec<Box<dyn PublishedServiceMatcher>>,
}

impl AnyOf {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, matcher: impl PublishedServiceMatcher + 'static) -> Self {
        self.matchers.push(Box::new(matcher));
        self
    }
}

impl PublishedServiceMatcher for AnyOf {
    fn matches(&self, service_name: &str, candidate: &Service, kind: ExposureKind) -> bool {
        self.matchers
            .iter()
            .any(|m| m.matches(service_name, candidate, kind))
    }
}
