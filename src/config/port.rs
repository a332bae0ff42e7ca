// ABOUTME: Port-binding spec parsing.
// ABOUTME: Format: [host_interface]:[host_port]:container_port[/proto][@environment].

use std::collections::BTreeMap;
use std::fmt;

use crate::error::ValidationError;

const DEFAULT_PROTOCOL: &str = "tcp";

/// Container side of a binding, rendered `port/proto`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GuestPort {
    pub port: u16,
    pub protocol: String,
}

impl fmt::Display for GuestPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.port, self.protocol)
    }
}

/// Host side of a binding. Empty fields leave the choice to the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostBinding {
    pub interface: String,
    pub port: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortBinding {
    pub guest: GuestPort,
    pub host: HostBinding,
}

/// Guest port spec (`80/tcp`) to every host binding requested for it.
pub type PortBindings = BTreeMap<String, Vec<HostBinding>>;

/// Parse a single port-binding spec.
///
/// Returns `Ok(None)` when the spec is scoped to an environment other than
/// `environment`. Without an active environment the scope is ignored.
pub fn parse_port_binding(
    spec: &str,
    environment: Option<&str>,
) -> Result<Option<PortBinding>, ValidationError> {
    let malformed = || ValidationError::MalformedPort(spec.to_string());

    let (binding, scope) = match spec.split_once('@') {
        Some((binding, scope)) => (binding, Some(scope)),
        None => (spec, None),
    };

    if let (Some(scope), Some(active)) = (scope, environment)
        && scope != active
    {
        return Ok(None);
    }

    let (ports, protocol) = match binding.split_once('/') {
        Some((ports, protocol)) => (ports, protocol),
        None => (binding, DEFAULT_PROTOCOL),
    };

    if !matches!(protocol, "tcp" | "udp" | "sctp") {
        return Err(malformed());
    }

    let segments: Vec<&str> = ports.splitn(3, ':').collect();
    let [interface, host_port, container_port] = segments.as_slice() else {
        return Err(malformed());
    };

    let port = container_port.parse::<u16>().map_err(|_| malformed())?;
    if !host_port.is_empty() && host_port.parse::<u16>().is_err() {
        return Err(malformed());
    }

    Ok(Some(PortBinding {
        guest: GuestPort {
            port,
            protocol: protocol.to_string(),
        },
        host: HostBinding {
            interface: interface.to_string(),
            port: host_port.to_string(),
        },
    }))
}

/// Parse every spec of a project, grouping host bindings by guest port.
/// The first malformed spec aborts the whole list.
pub fn parse_port_bindings(
    specs: &[String],
    environment: Option<&str>,
) -> Result<PortBindings, ValidationError> {
    let mut bindings = PortBindings::new();
    for spec in specs {
        if let Some(binding) = parse_port_binding(spec, environment)? {
            bindings
                .entry(binding.guest.to_string())
                .or_default()
                .push(binding.host);
        }
    }
    Ok(bindings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_spec() {
        let binding = parse_port_binding("0.0.0.0:8080:80/tcp", None)
            .unwrap()
            .unwrap();
        assert_eq!(binding.guest.to_string(), "80/tcp");
        assert_eq!(binding.host.interface, "0.0.0.0");
        assert_eq!(binding.host.port, "8080");
    }

    #[test]
    fn environment_scope_skips_other_environments() {
        let spec = "127.0.0.1:8080:80/tcp@staging";
        assert_eq!(parse_port_binding(spec, Some("prod")).unwrap(), None);

        let binding = parse_port_binding(spec, Some("staging")).unwrap().unwrap();
        assert_eq!(binding.guest.to_string(), "80/tcp");
        assert_eq!(binding.host.interface, "127.0.0.1");
        assert_eq!(binding.host.port, "8080");
    }

    #[test]
    fn scope_ignored_without_active_environment() {
        let binding = parse_port_binding("::53/udp@dns", None).unwrap().unwrap();
        assert_eq!(binding.guest.to_string(), "53/udp");
        assert_eq!(binding.host.interface, "");
        assert_eq!(binding.host.port, "");
    }

    #[test]
    fn missing_segment_names_literal() {
        let err = parse_port_binding("8080:80", None).unwrap_err();
        assert_eq!(err, ValidationError::MalformedPort("8080:80".to_string()));
        assert!(err.to_string().contains("8080:80"));
    }

    #[test]
    fn protocol_defaults_to_tcp() {
        let binding = parse_port_binding(":8080:80", None).unwrap().unwrap();
        assert_eq!(binding.guest.to_string(), "80/tcp");
    }

    #[test]
    fn rejects_non_numeric_ports_and_unknown_protocols() {
        for spec in [":8080:http", ":web:80", ":8080:80/icmp", "a:b:c:d"] {
            assert!(parse_port_binding(spec, None).is_err(), "{spec}");
        }
    }

    #[test]
    fn bindings_group_by_guest_port() {
        let specs = vec![
            "0.0.0.0:8080:80/tcp".to_string(),
            "127.0.0.1:9090:80/tcp".to_string(),
            ":5353:53/udp@prod".to_string(),
            ":5354:53/udp@staging".to_string(),
        ];
        let bindings = parse_port_bindings(&specs, Some("prod")).unwrap();
        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings["80/tcp"].len(), 2);
        assert_eq!(bindings["53/udp"][0].port, "5353");
    }

    #[test]
    fn one_bad_spec_fails_the_list() {
        let specs = vec!["0.0.0.0:8080:80/tcp".to_string(), "8080:80".to_string()];
        let err = parse_port_bindings(&specs, None).unwrap_err();
        assert_eq!(err.literal(), "8080:80");
    }
}
