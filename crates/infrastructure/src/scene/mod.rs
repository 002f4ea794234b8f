mod mvr_reader;
mod mvr_writer;
mod store;

pub use mvr_reader::parse_scene_xml;
pub use mvr_writer::write_scene_xml;
pub use store::{MvrSceneStore, SCENE_ENTRY};
