use async_trait::async_trait;
use domain::device::DeviceDiscovery;
use domain::{DomainError, NetworkDevice};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::packet::{self, ARTNET_PORT, ArtPoll};

/// How long a single receive waits before the deadline is re-checked.
const RECV_SLICE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtNetConfig {
    #[serde(default = "default_bind_ip")]
    pub bind_ip: Ipv4Addr,
    #[serde(default = "default_broadcast")]
    pub broadcast: Ipv4Addr,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind_ip() -> Ipv4Addr {
    Ipv4Addr::UNSPECIFIED
}
fn default_broadcast() -> Ipv4Addr {
    Ipv4Addr::BROADCAST
}
fn default_port() -> u16 {
    ARTNET_PORT
}

impl Default for ArtNetConfig {
    fn default() -> Self {
        Self {
            bind_ip: default_bind_ip(),
            broadcast: default_broadcast(),
            port: default_port(),
        }
    }
}

/// Devices seen during one discovery run, keyed by reported IP.
#[derive(Debug, Default)]
pub struct DeviceTable {
    devices: HashMap<Ipv4Addr, NetworkDevice>,
}

impl DeviceTable {
    /// Decode one datagram and record the device. Anything that is not a
    /// well-formed poll reply is dropped. A later reply for the same
    /// reported IP replaces the earlier one.
    pub fn ingest(&mut self, data: &[u8], source: SocketAddr) -> bool {
        if !packet::is_poll_reply(data) {
            return false;
        }
        match packet::decode_poll_reply(data) {
            Ok(reply) => {
                let device = NetworkDevice::new(
                    reply.reported_ip,
                    source.ip(),
                    reply.short_name,
                    reply.long_name,
                );
                debug!(reported_ip = %device.reported_ip, source_ip = %source, name = %device.short_name, "Poll reply");
                self.devices.insert(device.reported_ip, device);
                true
            }
            Err(e) => {
                debug!(source_ip = %source, "Discarding datagram: {}", e);
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn into_devices(self) -> Vec<NetworkDevice> {
        self.devices.into_values().collect()
    }
}

/// Art-Net poll based device discovery over UDP broadcast.
pub struct ArtNetDiscovery {
    config: ArtNetConfig,
}

impl ArtNetDiscovery {
    pub fn new(config: ArtNetConfig) -> Self {
        Self { config }
    }

    fn open_socket(&self) -> Result<UdpSocket, DomainError> {
        let bind = SocketAddr::from((self.config.bind_ip, self.config.port));
        let transport = |what: &str, e: std::io::Error| {
            DomainError::Transport(format!("{what} discovery socket on {bind}: {e}"))
        };

        let socket = socket2::Socket::new(
            socket2::Domain::IPV4,
            socket2::Type::DGRAM,
            Some(socket2::Protocol::UDP),
        )
        .map_err(|e| transport("create", e))?;
        socket
            .set_reuse_address(true)
            .map_err(|e| transport("configure", e))?;
        socket
            .set_broadcast(true)
            .map_err(|e| transport("configure", e))?;
        socket
            .bind(&bind.into())
            .map_err(|e| transport("bind", e))?;
        socket
            .set_nonblocking(true)
            .map_err(|e| transport("configure", e))?;

        UdpSocket::from_std(socket.into()).map_err(|e| transport("register", e))
    }
}

#[async_trait]
impl DeviceDiscovery for ArtNetDiscovery {
    async fn discover(&self, timeout: Duration) -> Result<Vec<NetworkDevice>, DomainError> {
        let deadline = Instant::now().checked_add(timeout).ok_or_else(|| {
            DomainError::InvalidConfiguration(format!("discovery timeout {timeout:?} is too large"))
        })?;
        let socket = self.open_socket()?;
        let target = SocketAddr::from((self.config.broadcast, self.config.port));

        info!(bind = %self.config.bind_ip, target = %target, ?timeout, "Sending ArtPoll");
        socket
            .send_to(&ArtPoll::default().encode(), target)
            .await
            .map_err(|e| DomainError::Transport(format!("send ArtPoll to {target}: {e}")))?;

        let mut table = DeviceTable::default();
        let mut buf = [0u8; 1024];

        loop {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            let wait = (deadline - now).min(RECV_SLICE);

            match tokio::time::timeout(wait, socket.recv_from(&mut buf)).await {
                Ok(Ok((len, from))) => {
                    table.ingest(&buf[..len], from);
                }
                Ok(Err(e)) => warn!("Discovery receive failed: {}", e),
                // Receive window elapsed; re-check the overall deadline
                Err(_) => continue,
            }
        }

        info!("Discovery finished: {} device(s)", table.len());
        Ok(table.into_devices())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::packet::build_reply;
    use std::net::IpAddr;

    fn src(last: u8, port: u16) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::new(192, 168, 1, last), port))
    }

    #[test]
    fn test_duplicate_replies_collapse_to_one_device() {
        let mut table = DeviceTable::default();
        let first = build_reply([2, 0, 0, 10], "Node", "first");
        let second = build_reply([2, 0, 0, 10], "Node", "second");

        assert!(table.ingest(&first, src(10, 6454)));
        assert!(table.ingest(&second, src(10, 50000)));

        let devices = table.into_devices();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].long_name, "second");
        assert_eq!(devices[0].source_ip, IpAddr::V4(Ipv4Addr::new(192, 168, 1, 10)));
    }

    #[test]
    fn test_distinct_devices_are_kept() {
        let mut table = DeviceTable::default();
        table.ingest(&build_reply([2, 0, 0, 10], "A", ""), src(10, 6454));
        table.ingest(&build_reply([2, 0, 0, 11], "B", ""), src(11, 6454));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_truncated_datagram_is_ignored() {
        let mut table = DeviceTable::default();
        let data = build_reply([2, 0, 0, 10], "A", "");
        assert!(!table.ingest(&data[..9], src(10, 6454)));
        assert!(table.is_empty());
    }

    #[test]
    fn test_own_poll_is_ignored() {
        let mut table = DeviceTable::default();
        assert!(!table.ingest(&ArtPoll::default().encode(), src(1, 6454)));
        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn test_discover_on_quiet_loopback_returns_no_devices() {
        let port = std::net::UdpSocket::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let discovery = ArtNetDiscovery::new(ArtNetConfig {
            bind_ip: Ipv4Addr::LOCALHOST,
            broadcast: Ipv4Addr::LOCALHOST,
            port,
        });

        let started = std::time::Instant::now();
        let devices = discovery.discover(Duration::from_millis(300)).await.unwrap();

        // Our own poll loops back and must not be mistaken for a reply
        assert!(devices.is_empty());
        assert!(started.elapsed() >= Duration::from_millis(300));
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_unrepresentable_timeout_is_rejected() {
        let discovery = ArtNetDiscovery::new(ArtNetConfig {
            bind_ip: Ipv4Addr::LOCALHOST,
            broadcast: Ipv4Addr::LOCALHOST,
            port: 0,
        });

        let result = discovery.discover(Duration::MAX).await;
        assert!(matches!(result, Err(DomainError::InvalidConfiguration(_))));
    }
}
