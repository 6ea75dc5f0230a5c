//! # Converter Configuration
//!
//! Label keys and naming conventions used to tie workloads to services,
//! loaded from environment variables.

use anyhow::Result;
use regex::Regex;

use crate::constants::{
    DEFAULT_LOG_LEVEL, DEFAULT_PUBLISHED_SERVICE_SUFFIX, DEFAULT_RANDOM_PORTS_SERVICE_SUFFIX,
    DEFAULT_SERVICE_NAME_LABEL, DEFAULT_STACK_NAME_LABEL,
};

/// Converter configuration
///
/// All settings have defaults matching the stack deployer's conventions and can
/// be overridden via environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterConfig {
    /// Label naming the logical service on workloads (`STACK_SERVICE_LABEL`)
    pub service_name_label: String,
    /// Label naming the owning stack (`STACK_NAME_LABEL`)
    pub stack_name_label: String,
    /// Name suffix of the `LoadBalancer` companion service (`PUBLISHED_SERVICE_SUFFIX`)
    pub published_service_suffix: String,
    /// Name suffix of the `NodePort` companion service (`RANDOM_PORTS_SERVICE_SUFFIX`)
    pub random_ports_service_suffix: String,
    /// Log level used when `RUST_LOG` is not set (`LOG_LEVEL`)
    pub log_level: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            service_name_label: DEFAULT_SERVICE_NAME_LABEL.to_string(),
            stack_name_label: DEFAULT_STACK_NAME_LABEL.to_string(),
            published_service_suffix: DEFAULT_PUBLISHED_SERVICE_SUFFIX.to_string(),
            random_ports_service_suffix: DEFAULT_RANDOM_PORTS_SERVICE_SUFFIX.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl ConverterConfig {
    /// Load configuration from environment variables with defaults
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let or_default = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            service_name_label: or_default("STACK_SERVICE_LABEL", DEFAULT_SERVICE_NAME_LABEL),
            stack_name_label: or_default("STACK_NAME_LABEL", DEFAULT_STACK_NAME_LABEL),
            published_service_suffix: or_default(
                "PUBLISHED_SERVICE_SUFFIX",
                DEFAULT_PUBLISHED_SERVICE_SUFFIX,
            ),
            random_ports_service_suffix: or_default(
                "RANDOM_PORTS_SERVICE_SUFFIX",
                DEFAULT_RANDOM_PORTS_SERVICE_SUFFIX,
            ),
            log_level: or_default("LOG_LEVEL", DEFAULT_LOG_LEVEL),
        }
    }

    /// Validate label keys and service name suffixes
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        validate_label_key(&self.service_name_label, "STACK_SERVICE_LABEL")?;
        validate_label_key(&self.stack_name_label, "STACK_NAME_LABEL")?;
        validate_name_suffix(&self.published_service_suffix, "PUBLISHED_SERVICE_SUFFIX")?;
        validate_name_suffix(
            &self.random_ports_service_suffix,
            "RANDOM_PORTS_SERVICE_SUFFIX",
        )?;

        if self.published_service_suffix == self.random_ports_service_suffix {
            return Err(anyhow::anyhow!(
                "PUBLISHED_SERVICE_SUFFIX and RANDOM_PORTS_SERVICE_SUFFIX must differ, both are '{}'",
                self.published_service_suffix
            ));
        }

        match self.log_level.to_uppercase().as_str() {
            "ERROR" | "WARN" | "INFO" | "DEBUG" | "TRACE" => Ok(()),
            other => Err(anyhow::anyhow!(
                "LOG_LEVEL must be one of ERROR, WARN, INFO, DEBUG, TRACE, got '{other}'"
            )),
        }
    }
}

/// Validate a Kubernetes label key (optional DNS prefix, then a name segment)
fn validate_label_key(key: &str, field_name: &str) -> Result<()> {
    if key.len() > 316 {
        return Err(anyhow::anyhow!(
            "{field_name} '{key}' exceeds maximum length of 316 characters (got {})",
            key.len()
        ));
    }

    // [prefix/]name, prefix is an RFC 1123 subdomain, name is at most 63 characters
    let key_regex = Regex::new(
        r"^([a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*/)?[A-Za-z0-9]([-A-Za-z0-9_.]{0,61}[A-Za-z0-9])?$",
    )
    .map_err(|e| anyhow::anyhow!("Failed to compile regex: {e}"))?;

    if !key_regex.is_match(key) {
        return Err(anyhow::anyhow!(
            "{field_name} '{key}' must be a valid Kubernetes label key"
        ));
    }

    Ok(())
}

/// Validate a suffix appended to a service name
/// The combined name must stay an RFC 1123 label, so the suffix may start with a
/// hyphen but not end with one.
fn validate_name_suffix(suffix: &str, field_name: &str) -> Result<()> {
    if suffix.len() > 62 {
        return Err(anyhow::anyhow!(
            "{field_name} '{suffix}' exceeds maximum length of 62 characters (got {})",
            suffix.len()
        ));
    }

    let suffix_regex = Regex::new(r"^-?[a-z0-9]([-a-z0-9]*[a-z0-9])?$")
        .map_err(|e| anyhow::anyhow!("Failed to compile regex: {e}"))?;

    if !suffix_regex.is_match(suffix) {
        return Err(anyhow::anyhow!(
            "{field_name} '{suffix}' must be lowercase alphanumeric with hyphens and cannot end with a hyphen"
        ));
    }

    Ok(())
}
