use domain::device::DeviceDiscovery;
use domain::error::Result;
use domain::{NetworkDevice, SceneDocument, SceneStore};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::gate::TaskGate;
use crate::scene::DiscoveryScene;

/// Runs one discovery at a time and turns its result into a scene document.
pub struct DiscoveryService {
    discovery: Arc<dyn DeviceDiscovery>,
    store: Arc<dyn SceneStore>,
    gate: TaskGate,
}

impl DiscoveryService {
    pub fn new(discovery: Arc<dyn DeviceDiscovery>, store: Arc<dyn SceneStore>) -> Self {
        Self {
            discovery,
            store,
            gate: TaskGate::new(),
        }
    }

    /// Share `gate` with other services so their tasks exclude each other.
    pub fn with_gate(mut self, gate: TaskGate) -> Self {
        self.gate = gate;
        self
    }

    pub async fn discover(&self, timeout: Duration) -> Result<Vec<NetworkDevice>> {
        let _run = self.gate.enter("discovery")?;

        let devices = self.discovery.discover(timeout).await?;
        info!(count = devices.len(), ?timeout, "Discovery finished");
        Ok(devices)
    }

    /// Discover, build the discovery scene and write it to `output`.
    pub async fn discover_to_file(
        &self,
        timeout: Duration,
        output: &Path,
    ) -> Result<(Vec<NetworkDevice>, SceneDocument)> {
        let devices = self.discover(timeout).await?;
        let scene = DiscoveryScene::build(&devices)?;
        self.store.save(&scene, output)?;
        Ok((devices, scene))
    }
}
