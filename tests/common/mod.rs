//! Shared fixtures for conversion tests
//!
//! Builders for the objects a stack deployer creates.

#![allow(dead_code, reason = "Each test binary uses a different subset of fixtures")]

use k8s_openapi::api::apps::v1::{
    DaemonSet, DaemonSetSpec, DaemonSetStatus, ReplicaSet, ReplicaSetSpec, ReplicaSetStatus,
};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, PodSpec, PodTemplateSpec, Service, ServicePort, ServiceSpec,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use std::collections::BTreeMap;

use stack_service_converter::swarm::{
    ContainerSpec, Endpoint, PortConfig, ServiceMode, ServiceSpec as SwarmServiceSpec,
    ServiceStatus, SwarmService, TaskSpec,
};

pub const SERVICE_LABEL: &str = "com.docker.service.name";
pub const STACK_LABEL: &str = "com.docker.stack.namespace";

fn pod_template() -> PodTemplateSpec {
    PodTemplateSpec {
        spec: Some(PodSpec {
            containers: vec![Container {
                name: "main".to_string(),
                image: Some("image".to_string()),
                ports: Some(vec![ContainerPort {
                    name: Some("http".to_string()),
                    container_port: 8080,
                    ..ContainerPort::default()
                }]),
                ..Container::default()
            }],
            ..PodSpec::default()
        }),
        ..PodTemplateSpec::default()
    }
}

/// Replica set of `service` with `available` of `replicas` ready
pub fn make_replica_set(service: &str, available: i32, replicas: i32) -> ReplicaSet {
    ReplicaSet {
        metadata: ObjectMeta {
            name: Some(format!("{service}-5d8f7c")),
            labels: Some(BTreeMap::from([(
                SERVICE_LABEL.to_string(),
                service.to_string(),
            )])),
            ..ObjectMeta::default()
        },
        spec: Some(ReplicaSetSpec {
            replicas: Some(replicas),
            template: Some(pod_template()),
            ..ReplicaSetSpec::default()
        }),
        status: Some(ReplicaSetStatus {
            available_replicas: Some(available),
            replicas,
            ..ReplicaSetStatus::default()
        }),
    }
}

/// Replica set additionally labelled with its stack
pub fn make_stack_replica_set(
    service: &str,
    stack: &str,
    available: i32,
    replicas: i32,
) -> ReplicaSet {
    let mut rs = make_replica_set(service, available, replicas);
    if let Some(labels) = rs.metadata.labels.as_mut() {
        labels.insert(STACK_LABEL.to_string(), stack.to_string());
    }
    rs
}

/// Daemon set of `service` with `ready` of `desired` pods ready
pub fn make_daemon_set(service: &str, ready: i32, desired: i32) -> DaemonSet {
    DaemonSet {
        metadata: ObjectMeta {
            name: Some(service.to_string()),
            labels: Some(BTreeMap::from([(
                SERVICE_LABEL.to_string(),
                service.to_string(),
            )])),
            ..ObjectMeta::default()
        },
        spec: Some(DaemonSetSpec {
            template: pod_template(),
            ..DaemonSetSpec::default()
        }),
        status: Some(DaemonSetStatus {
            number_ready: ready,
            desired_number_scheduled: desired,
            ..DaemonSetStatus::default()
        }),
    }
}

pub fn make_kube_service(
    name: &str,
    stack: &str,
    uid: &str,
    service_type: &str,
    ports: Vec<ServicePort>,
) -> Service {
    Service {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            uid: Some(uid.to_string()),
            labels: Some(BTreeMap::from([(STACK_LABEL.to_string(), stack.to_string())])),
            ..ObjectMeta::default()
        },
        spec: Some(ServiceSpec {
            type_: Some(service_type.to_string()),
            ports: (!ports.is_empty()).then_some(ports),
            ..ServiceSpec::default()
        }),
        status: None,
    }
}

pub fn tcp_port(port: i32, target: i32) -> ServicePort {
    ServicePort {
        port,
        target_port: Some(IntOrString::Int(target)),
        protocol: Some("TCP".to_string()),
        ..ServicePort::default()
    }
}

/// Expected swarm service `<stack>_<service>` with the fixtures' image and no ports
pub fn make_swarm_service(
    stack: &str,
    service: &str,
    id: &str,
    mode: ServiceMode,
    status: ServiceStatus,
) -> SwarmService {
    SwarmService {
        id: id.to_string(),
        spec: SwarmServiceSpec {
            name: format!("{stack}_{service}"),
            task_template: TaskSpec {
                container_spec: ContainerSpec {
                    image: "image".to_string(),
                },
            },
            mode,
        },
        endpoint: Endpoint::default(),
        service_status: status,
        stack: Some(stack.to_string()),
    }
}

pub fn with_ports(mut service: SwarmService, ports: Vec<PortConfig>) -> SwarmService {
    service.endpoint.ports.extend(ports);
    service
}

pub fn status(running: u64, desired: u64) -> ServiceStatus {
    ServiceStatus {
        running_tasks: running,
        desired_tasks: desired,
    }
}
