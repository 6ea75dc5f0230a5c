//! # Constants
//!
//! Shared constants used throughout the converter.
//!
//! These values match the conventions of the stack deployer and can be
//! overridden via configuration or environment variables where applicable.

/// Label carrying the logical service name on workloads and services
pub const DEFAULT_SERVICE_NAME_LABEL: &str = "com.docker.service.name";

/// Label carrying the owning stack name
pub const DEFAULT_STACK_NAME_LABEL: &str = "com.docker.stack.namespace";

/// Name suffix of the `LoadBalancer` service publishing a logical service's ports
pub const DEFAULT_PUBLISHED_SERVICE_SUFFIX: &str = "-published";

/// Name suffix of the `NodePort` service publishing a logical service's ports
pub const DEFAULT_RANDOM_PORTS_SERVICE_SUFFIX: &str = "-random-ports";

/// Separator between stack name and service name in qualified names
pub const QUALIFIED_NAME_SEPARATOR: char = '_';

/// Default log level when neither `RUST_LOG` nor `LOG_LEVEL` is set
pub const DEFAULT_LOG_LEVEL: &str = "INFO";
