use std::time::Duration;

use super::NetworkDevice;
use crate::DomainError;
use async_trait::async_trait;

/// Bounded-time discovery of live devices on the lighting network.
///
/// Implementations own their socket for the duration of the call and
/// always return once `timeout` has elapsed. Devices that do not answer
/// within the window are simply absent from the result.
#[async_trait]
pub trait DeviceDiscovery: Send + Sync {
    /// Poll the network and collect replies, one entry per reported IP.
    /// Ordering of the returned devices is unspecified.
    async fn discover(&self, timeout: Duration) -> Result<Vec<NetworkDevice>, DomainError>;
}
