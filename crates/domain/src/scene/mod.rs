mod document;
mod store;

pub use document::{
    AuxData, AuxDefinition, ChildList, FixtureIdx, GroupIdx, GroupObject, LayerFixtures, Parent,
    SceneDocument, SceneLayer,
};
#[cfg(any(test, feature = "mocks"))]
pub use store::MockSceneStore;
pub use store::SceneStore;
