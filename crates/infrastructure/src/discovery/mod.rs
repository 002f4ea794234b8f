mod artnet;
pub mod packet;

pub use artnet::{ArtNetConfig, ArtNetDiscovery, DeviceTable};
