//! # Snapshot Loading
//!
//! Reads workloads and services from manifests on disk, as produced by
//! `kubectl get replicasets,daemonsets,services -o yaml` or written by hand.
//!
//! Supported input:
//! - multi-document YAML (JSON is accepted as YAML)
//! - `kind: List` and typed lists (`ServiceList`, ...), whose items may omit
//!   `apiVersion`/`kind`
//! - `apps/v1beta2` and `extensions/v1beta1` workloads, read as `apps/v1`
//!
//! Other kinds are skipped.

use anyhow::{Context, Result};
use k8s_openapi::api::apps::v1::{DaemonSet, ReplicaSet};
use k8s_openapi::api::core::v1::Service;
use serde::Deserialize;
use serde_yaml::Value;
use std::path::Path;
use tracing::debug;

use crate::conversion::Converter;
use crate::error::ConversionError;
use crate::swarm::SwarmService;

/// Workloads and services of one or more stacks
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub replica_sets: Vec<ReplicaSet>,
    pub daemon_sets: Vec<DaemonSet>,
    pub services: Vec<Service>,
}

impl Snapshot {
    /// Load a snapshot from a manifest file
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or holds an invalid object.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        Self::from_yaml_str(&contents)
            .with_context(|| format!("Failed to parse snapshot {}", path.display()))
    }

    /// Parse a snapshot from YAML or JSON text
    ///
    /// # Errors
    ///
    /// Fails on malformed YAML or on a workload/service that does not match
    /// its Kubernetes schema.
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let mut snapshot = Self::default();

        for (position, document) in serde_yaml::Deserializer::from_str(contents).enumerate() {
            let value = Value::deserialize(document)
                .with_context(|| format!("Invalid YAML in document {}", position + 1))?;
            if value.is_null() {
                continue;
            }
            snapshot
                .add_object(value)
                .with_context(|| format!("Invalid object in document {}", position + 1))?;
        }

        debug!(
            "Loaded snapshot: {} replica sets, {} daemon sets, {} services",
            snapshot.replica_sets.len(),
            snapshot.daemon_sets.len(),
            snapshot.services.len()
        );
        Ok(snapshot)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.replica_sets.is_empty() && self.daemon_sets.is_empty() && self.services.is_empty()
    }

    /// Convert the snapshot with `converter`
    ///
    /// # Errors
    ///
    /// See [`Converter::convert`].
    pub fn convert(&self, converter: &Converter) -> Result<Vec<SwarmService>, ConversionError> {
        converter.convert(&self.replica_sets, &self.daemon_sets, &self.services)
    }

    fn add_object(&mut self, mut value: Value) -> Result<()> {
        let kind = value
            .get("kind")
            .and_then(Value::as_str)
            .map(str::to_string)
            .context("Object has no kind")?;

        if kind == "List" || typed_list_item_kind(&kind).is_some() {
            let item_kind = typed_list_item_kind(&kind);
            let items = match value.get_mut("items") {
                Some(Value::Sequence(items)) => std::mem::take(items),
                Some(Value::Null) | None => Vec::new(),
                Some(_) => anyhow::bail!("{kind} items must be a sequence"),
            };
            for (position, mut item) in items.into_iter().enumerate() {
                if let Some(item_kind) = item_kind {
                    fill_type_meta(&mut item, item_kind);
                }
                self.add_object(item)
                    .with_context(|| format!("Invalid item {} of {kind}", position + 1))?;
            }
            return Ok(());
        }

        match kind.as_str() {
            "ReplicaSet" => {
                normalize_apps_version(&mut value);
                let replica_set: ReplicaSet =
                    serde_yaml::from_value(value).context("Invalid ReplicaSet")?;
                self.replica_sets.push(replica_set);
            }
            "DaemonSet" => {
                normalize_apps_version(&mut value);
                let daemon_set: DaemonSet =
                    serde_yaml::from_value(value).context("Invalid DaemonSet")?;
                self.daemon_sets.push(daemon_set);
            }
            "Service" => {
                let service: Service = serde_yaml::from_value(value).context("Invalid Service")?;
                self.services.push(service);
            }
            other => debug!("Skipping object of kind {other}"),
        }

        Ok(())
    }
}

/// Item kind of a typed list
fn typed_list_item_kind(kind: &str) -> Option<&'static str> {
    match kind {
        "ReplicaSetList" => Some("ReplicaSet"),
        "DaemonSetList" => Some("DaemonSet"),
        "ServiceList" => Some("Service"),
        _ => None,
    }
}

/// Typed list items returned by the API server omit their type meta
fn fill_type_meta(item: &mut Value, kind: &str) {
    let Value::Mapping(map) = item else {
        return;
    };
    let api_version = if kind == "Service" { "v1" } else { "apps/v1" };

    if !map.contains_key("kind") {
        map.insert(
            Value::String("kind".to_string()),
            Value::String(kind.to_string()),
        );
    }
    if !map.contains_key("apiVersion") {
        map.insert(
            Value::String("apiVersion".to_string()),
            Value::String(api_version.to_string()),
        );
    }
}

/// Read pre-`apps/v1` workloads as `apps/v1`; the fields used here did not change
fn normalize_apps_version(value: &mut Value) {
    let Value::Mapping(map) = value else {
        return;
    };
    let is_legacy = map
        .get("apiVersion")
        .and_then(Value::as_str)
        .is_some_and(|v| matches!(v, "apps/v1beta2" | "apps/v1beta1" | "extensions/v1beta1"));
    if is_legacy {
        map.insert(
            Value::String("apiVersion".to_string()),
            Value::String("apps/v1".to_string()),
        );
    }
}
