use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};

/// A live lighting-network node that answered a discovery poll.
///
/// Keyed by `reported_ip`: the address the node claims in its reply,
/// which can differ from the datagram source when the node sits behind
/// a gateway or has several interfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDevice {
    pub reported_ip: Ipv4Addr,
    pub source_ip: IpAddr,
    pub short_name: String,
    pub long_name: String,
}

impl NetworkDevice {
    pub fn new(
        reported_ip: Ipv4Addr,
        source_ip: IpAddr,
        short_name: String,
        long_name: String,
    ) -> Self {
        Self {
            reported_ip,
            source_ip,
            short_name,
            long_name,
        }
    }

    /// Best human label for the node: short name, then long name, then address.
    pub fn display_name(&self) -> String {
        if !self.short_name.is_empty() {
            self.short_name.clone()
        } else if !self.long_name.is_empty() {
            self.long_name.clone()
        } else {
            self.reported_ip.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_creation() {
        let device = NetworkDevice::new(
            Ipv4Addr::new(2, 0, 0, 10),
            IpAddr::V4(Ipv4Addr::new(192, 168, 1, 10)),
            "Node 1".to_string(),
            "Four port node".to_string(),
        );

        assert_eq!(device.reported_ip, Ipv4Addr::new(2, 0, 0, 10));
        assert_eq!(device.display_name(), "Node 1");
    }

    #[test]
    fn test_display_name_falls_back_to_address() {
        let device = NetworkDevice::new(
            Ipv4Addr::new(10, 0, 0, 7),
            IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7)),
            String::new(),
            String::new(),
        );
        assert_eq!(device.display_name(), "10.0.0.7");
    }
}
