//! Stack Service Converter Library
//!
//! Converts the Kubernetes objects a stack deployer creates (`ReplicaSet`,
//! `DaemonSet` and `Service` objects tied together by labels and naming
//! conventions) into swarm-style services, one per logical service of the
//! stack.
//!
//! ```no_run
//! use stack_service_converter::convert_to_services;
//!
//! # use k8s_openapi::api::{apps::v1::{DaemonSet, ReplicaSet}, core::v1::Service};
//! # let replica_sets: Vec<ReplicaSet> = Vec::new();
//! # let daemon_sets: Vec<DaemonSet> = Vec::new();
//! # let services: Vec<Service> = Vec::new();
//! let services = convert_to_services(&replica_sets, &daemon_sets, &services)?;
//! for service in &services {
//!     println!("{} {}", service.id, service.name());
//! }
//! # Ok::<(), stack_service_converter::ConversionError>(())
//! ```

pub mod config;
pub mod constants;
pub mod conversion;
pub mod error;
pub mod output;
pub mod snapshot;
pub mod swarm;

pub use config::ConverterConfig;
pub use conversion::{convert_to_services, Converter};
pub use error::ConversionError;
pub use snapshot::Snapshot;
pub use swarm::SwarmService;
