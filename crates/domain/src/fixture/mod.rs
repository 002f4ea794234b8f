mod dmx_address;
mod entity;
mod tag;

pub use dmx_address::{DmxAddress, MAX_UNIVERSE};
pub use entity::{Fixture, NetworkAddress};
pub use tag::{SceneTag, TagAxis, TagSet};
