//! # Port Translation
//!
//! Translates `Service` ports into swarm port configs.

use k8s_openapi::api::core::v1::{Container, Service, ServicePort};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::ResourceExt;

use crate::error::ConversionError;
use crate::swarm::{PortConfig, PortProtocol, PublishMode};

/// Translate every port of `service`, in declaration order
///
/// `service_name` is the logical service the ports are published for and
/// `containers` its pod template, used to resolve named target ports.
pub(crate) fn published_ports(
    service: &Service,
    publish_mode: PublishMode,
    service_name: &str,
    containers: &[Container],
) -> Result<Vec<PortConfig>, ConversionError> {
    let ports = service
        .spec
        .as_ref()
        .and_then(|spec| spec.ports.as_deref())
        .unwrap_or_default();

    ports
        .iter()
        .map(|port| {
            let published_port = match publish_mode {
                PublishMode::Ingress => port.port,
                // The node port is assigned by the API server; manifests that
                // never reached it only carry the declared port.
                PublishMode::Host => port.node_port.filter(|p| *p > 0).unwrap_or(port.port),
            };

            Ok(PortConfig {
                protocol: to_swarm_protocol(service, port.protocol.as_deref())?,
                target_port: resolve_target_port(service, port, service_name, containers)?,
                published_port: to_port_number(published_port),
                publish_mode,
            })
        })
        .collect()
}

/// Resolve `targetPort` to a number
///
/// Absent means the declared port, a name refers to a container port of the
/// workload (or is a number written as a string).
fn resolve_target_port(
    service: &Service,
    port: &ServicePort,
    service_name: &str,
    containers: &[Container],
) -> Result<u32, ConversionError> {
    match &port.target_port {
        None => Ok(to_port_number(port.port)),
        Some(IntOrString::Int(target)) => Ok(to_port_number(*target)),
        Some(IntOrString::String(target)) => containers
            .iter()
            .flat_map(|c| c.ports.as_deref().unwrap_or_default())
            .find(|cp| cp.name.as_deref() == Some(target.as_str()))
            .map(|cp| to_port_number(cp.container_port))
            .or_else(|| target.parse::<u32>().ok())
            .ok_or_else(|| ConversionError::UnresolvedTargetPort {
                name: service_name.to_string(),
                service: service.name_any(),
                port: target.clone(),
            }),
    }
}

fn to_swarm_protocol(
    service: &Service,
    protocol: Option<&str>,
) -> Result<PortProtocol, ConversionError> {
    // PortProtocol is closed, so a protocol it cannot name fails the batch.
    match protocol.unwrap_or("TCP") {
        "TCP" => Ok(PortProtocol::Tcp),
        "UDP" => Ok(PortProtocol::Udp),
        "SCTP" => Ok(PortProtocol::Sctp),
        other => Err(ConversionError::UnsupportedProtocol {
            service: service.name_any(),
            protocol: other.to_string(),
        }),
    }
}

fn to_port_number(port: i32) -> u32 {
    u32::try_from(port).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::{ContainerPort, ServiceSpec};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    fn service_with_ports(ports: Vec<ServicePort>) -> Service {
        Service {
            metadata: ObjectMeta {
                name: Some("web-published".to_string()),
                ..ObjectMeta::default()
            },
            spec: Some(ServiceSpec {
                ports: Some(ports),
                ..ServiceSpec::default()
            }),
            ..Service::default()
        }
    }

    fn port(port: i32, target: Option<IntOrString>, protocol: Option<&str>) -> ServicePort {
        ServicePort {
            port,
            target_port: target,
            protocol: protocol.map(str::to_string),
            ..ServicePort::default()
        }
    }

    fn container_with_port(name: &str, port: i32) -> Container {
        Container {
            name: "main".to_string(),
            ports: Some(vec![ContainerPort {
                name: Some(name.to_string()),
                container_port: port,
                ..ContainerPort::default()
            }]),
            ..Container::default()
        }
    }

    #[test]
    fn test_ingress_uses_declared_port() {
        let service = service_with_ports(vec![port(80, Some(IntOrString::Int(8080)), Some("TCP"))]);

        let ports = published_ports(&service, PublishMode::Ingress, "web", &[]).unwrap();
        assert_eq!(
            ports,
            vec![PortConfig {
                protocol: PortProtocol::Tcp,
                target_port: 8080,
                published_port: 80,
                publish_mode: PublishMode::Ingress,
            }]
        );
    }

    #[test]
    fn test_host_prefers_assigned_node_port() {
        let mut assigned = port(80, Some(IntOrString::Int(80)), Some("TCP"));
        assigned.node_port = Some(31000);
        let declared = port(35666, Some(IntOrString::Int(80)), Some("UDP"));
        let service = service_with_ports(vec![assigned, declared]);

        let ports = published_ports(&service, PublishMode::Host, "web", &[]).unwrap();
        assert_eq!(ports.len(), 2);
        assert_eq!(ports[0].published_port, 31000);
        assert_eq!(ports[1].published_port, 35666);
        assert_eq!(ports[1].protocol, PortProtocol::Udp);
        assert!(ports.iter().all(|p| p.publish_mode == PublishMode::Host));
    }

    #[test]
    fn test_missing_target_and_protocol_default() {
        let service = service_with_ports(vec![port(443, None, None)]);

        let ports = published_ports(&service, PublishMode::Ingress, "web", &[]).unwrap();
        assert_eq!(ports[0].target_port, 443);
        assert_eq!(ports[0].protocol, PortProtocol::Tcp);
    }

    #[test]
    fn test_named_target_port_resolves_against_containers() {
        let service = service_with_ports(vec![port(
            80,
            Some(IntOrString::String("http".to_string())),
            Some("TCP"),
        )]);
        let containers = vec![container_with_port("http", 8000)];

        let ports = published_ports(&service, PublishMode::Ingress, "web", &containers).unwrap();
        assert_eq!(ports[0].target_port, 8000);
    }

    #[test]
    fn test_numeric_string_target_port() {
        let service = service_with_ports(vec![port(
            80,
            Some(IntOrString::String("9090".to_string())),
            None,
        )]);

        let ports = published_ports(&service, PublishMode::Ingress, "web", &[]).unwrap();
        assert_eq!(ports[0].target_port, 9090);
    }

    #[test]
    fn test_unresolved_named_port_fails() {
        let service = service_with_ports(vec![port(
            80,
            Some(IntOrString::String("metrics".to_string())),
            None,
        )]);
        let containers = vec![container_with_port("http", 8000)];

        let err = published_ports(&service, PublishMode::Ingress, "web", &containers).unwrap_err();
        assert_eq!(
            err,
            ConversionError::UnresolvedTargetPort {
                name: "web".to_string(),
                service: "web-published".to_string(),
                port: "metrics".to_string(),
            }
        );
    }

    #[test]
    fn test_unsupported_protocol_fails() {
        let service = service_with_ports(vec![port(80, None, Some("QUIC"))]);

        let err = published_ports(&service, PublishMode::Ingress, "web", &[]).unwrap_err();
        assert!(matches!(err, ConversionError::UnsupportedProtocol { .. }));
    }

    #[test]
    fn test_service_without_ports() {
        let service = Service::default();

        let ports = published_ports(&service, PublishMode::Host, "web", &[]).unwrap();
        assert!(ports.is_empty());
    }
}
