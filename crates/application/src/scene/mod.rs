mod discovery_scene;
mod flattener;
mod merger;

pub use discovery_scene::{DISCOVERY_LAYER_NAME, DiscoveryScene};
pub use flattener::{FixtureLayer, FlattenedScene, SceneFlattener};
pub use merger::{MergeOutcome, MergeSummary, NameMismatch, SceneMerger};
