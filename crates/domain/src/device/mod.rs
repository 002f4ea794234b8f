mod discovery;
mod entity;

pub use discovery::DeviceDiscovery;
pub use entity::NetworkDevice;
