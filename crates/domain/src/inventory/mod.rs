mod client;
mod entity;

#[cfg(any(test, feature = "mocks"))]
pub use client::MockInventoryClient;
pub use client::InventoryClient;
pub use entity::{InventorySnapshot, MonitorKind, NewMonitor, RemoteMonitor, RemoteTag};
