//! Infrastructure layer - External integrations

pub mod config;
pub mod discovery;
pub mod inventory;
pub mod scene;

pub use config::AppConfig;
pub use discovery::ArtNetDiscovery;
pub use inventory::{FileInventory, InMemoryInventory};
pub use scene::MvrSceneStore;
