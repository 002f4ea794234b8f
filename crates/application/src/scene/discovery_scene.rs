use domain::error::Result;
use domain::scene::Parent;
use domain::{Fixture, NetworkDevice, SceneDocument};
use uuid::Uuid;

pub const DISCOVERY_LAYER_NAME: &str = "Network discovery";

/// Builds a scene document out of discovered devices.
pub struct DiscoveryScene;

impl DiscoveryScene {
    /// One layer holding one fixture per device, ordered by reported IP.
    /// Each fixture gets a fresh uuid and the device's reported address.
    pub fn build(devices: &[NetworkDevice]) -> Result<SceneDocument> {
        let mut sorted: Vec<&NetworkDevice> = devices.iter().collect();
        sorted.sort_by_key(|d| d.reported_ip);

        let mut doc = SceneDocument::new();
        let layer = doc.add_layer(new_uuid(), DISCOVERY_LAYER_NAME);
        for device in sorted {
            let fixture = Fixture::new(new_uuid(), device.display_name()).with_ipv4(device.reported_ip);
            doc.add_fixture(Parent::Layer(layer), fixture)?;
        }
        Ok(doc)
    }
}

fn new_uuid() -> String {
    Uuid::new_v4().to_string().to_uppercase()
}
