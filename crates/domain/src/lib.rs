//! Domain layer - Pure fixture inventory model with no external dependencies
//!
//! This crate contains:
//! - Entities (NetworkDevice, Fixture, SceneDocument, RemoteMonitor, RemoteTag)
//! - Value Objects (DmxAddress, NetworkAddress, SceneTag, TagAxis)
//! - Port interfaces (DeviceDiscovery, SceneStore, InventoryClient)
//!
//! Principles:
//! - No dependencies on infrastructure
//! - Scene traversal rules enforced at domain level
//! - Testable in isolation

pub mod device;
pub mod error;
pub mod fixture;
pub mod inventory;
pub mod scene;

// Re-export commonly used types
pub use device::NetworkDevice;
pub use error::DomainError;
pub use fixture::{DmxAddress, Fixture, NetworkAddress, SceneTag, TagAxis, TagSet};
pub use inventory::{InventoryClient, InventorySnapshot, RemoteMonitor, RemoteTag};
pub use scene::{SceneDocument, SceneStore};
