use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

use super::DmxAddress;

/// One `Network` entry of a fixture. Entries without an IPv4 address are
/// kept so that documents survive a read/write cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkAddress {
    pub geometry: Option<String>,
    pub ipv4: Option<Ipv4Addr>,
    pub subnet_mask: Option<Ipv4Addr>,
    pub hostname: Option<String>,
}

impl NetworkAddress {
    pub fn ipv4(ip: Ipv4Addr) -> Self {
        Self {
            ipv4: Some(ip),
            ..Default::default()
        }
    }
}

/// Represents one addressable lighting-network device of a scene document.
/// The `uuid` is the stable join key with the remote inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub uuid: String,
    pub name: String,
    pub network: Vec<NetworkAddress>,
    pub dmx: Vec<DmxAddress>,
    pub class_ref: Option<String>,
    pub position_ref: Option<String>,
    pub gdtf_spec: Option<String>,
    pub gdtf_mode: Option<String>,
    pub fixture_id: Option<String>,
}

impl Fixture {
    pub fn new(uuid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            name: name.into(),
            network: Vec::new(),
            dmx: Vec::new(),
            class_ref: None,
            position_ref: None,
            gdtf_spec: None,
            gdtf_mode: None,
            fixture_id: None,
        }
    }

    pub fn with_ipv4(mut self, ip: Ipv4Addr) -> Self {
        self.network.push(NetworkAddress::ipv4(ip));
        self
    }

    pub fn with_class(mut self, class_uuid: impl Into<String>) -> Self {
        self.class_ref = Some(class_uuid.into());
        self
    }

    pub fn with_position(mut self, position_uuid: impl Into<String>) -> Self {
        self.position_ref = Some(position_uuid.into());
        self
    }

    /// First network entry carrying an IPv4 address, in document order.
    pub fn first_ipv4(&self) -> Option<Ipv4Addr> {
        self.network.iter().find_map(|n| n.ipv4)
    }

    /// Replace this fixture's network entries with those of another fixture.
    pub fn adopt_network(&mut self, other: &Fixture) {
        self.network = other.network.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_ipv4_skips_empty_entries() {
        let mut fixture = Fixture::new("U1", "Spot 1");
        fixture.network.push(NetworkAddress {
            hostname: Some("spot-1".to_string()),
            ..Default::default()
        });
        fixture.network.push(NetworkAddress::ipv4(Ipv4Addr::new(10, 0, 0, 5)));
        fixture.network.push(NetworkAddress::ipv4(Ipv4Addr::new(10, 0, 0, 6)));

        assert_eq!(fixture.first_ipv4(), Some(Ipv4Addr::new(10, 0, 0, 5)));
    }

    #[test]
    fn test_fixture_without_network() {
        let fixture = Fixture::new("U2", "Wash 1");
        assert_eq!(fixture.first_ipv4(), None);
    }

    #[test]
    fn test_adopt_network_replaces_entries() {
        let mut target = Fixture::new("U1", "Spot 1").with_ipv4(Ipv4Addr::new(1, 1, 1, 1));
        let source = Fixture::new("X", "discovered").with_ipv4(Ipv4Addr::new(2, 0, 0, 3));

        target.adopt_network(&source);

        assert_eq!(target.uuid, "U1");
        assert_eq!(target.network.len(), 1);
        assert_eq!(target.first_ipv4(), Some(Ipv4Addr::new(2, 0, 0, 3)));
    }
}
