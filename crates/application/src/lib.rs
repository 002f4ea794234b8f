//! Application layer - Scene and inventory workflows

pub mod discovery;
pub mod gate;
pub mod scene;
pub mod sync;

pub use discovery::DiscoveryService;
pub use gate::TaskGate;
pub use scene::{DiscoveryScene, FlattenedScene, SceneFlattener, SceneMerger};
pub use sync::{ReconciliationEngine, SyncOptions, SyncReport, SyncService, SyncSteps};
