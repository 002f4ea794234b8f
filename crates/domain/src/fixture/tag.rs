use serde::{Deserialize, Serialize};

/// Source of a tag: which part of the scene document it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagAxis {
    Layer,
    Class,
    Position,
}

impl TagAxis {
    pub const ALL: [TagAxis; 3] = [TagAxis::Layer, TagAxis::Class, TagAxis::Position];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Layer => "layer",
            Self::Class => "class",
            Self::Position => "position",
        }
    }
}

impl std::fmt::Display for TagAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named label derived from a layer, class or position of a scene document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SceneTag {
    pub uuid: String,
    pub name: String,
}

impl SceneTag {
    pub fn new(uuid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            name: name.into(),
        }
    }
}

/// Tags collected from one scene document, one list per axis.
///
/// Each list keeps first-seen order and holds at most one entry per uuid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSet {
    pub layers: Vec<SceneTag>,
    pub classes: Vec<SceneTag>,
    pub positions: Vec<SceneTag>,
}

impl TagSet {
    pub fn axis(&self, axis: TagAxis) -> &[SceneTag] {
        match axis {
            TagAxis::Layer => &self.layers,
            TagAxis::Class => &self.classes,
            TagAxis::Position => &self.positions,
        }
    }

    /// Adds the tag unless one with the same uuid is already present.
    /// Returns whether the tag was added.
    pub fn insert(&mut self, axis: TagAxis, tag: SceneTag) -> bool {
        let list = match axis {
            TagAxis::Layer => &mut self.layers,
            TagAxis::Class => &mut self.classes,
            TagAxis::Position => &mut self.positions,
        };
        if list.iter().any(|t| t.uuid == tag.uuid) {
            return false;
        }
        list.push(tag);
        true
    }

    pub fn find(&self, axis: TagAxis, uuid: &str) -> Option<&SceneTag> {
        self.axis(axis).iter().find(|t| t.uuid == uuid)
    }

    pub fn len(&self) -> usize {
        self.layers.len() + self.classes.len() + self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_deduplicates_by_uuid() {
        let mut tags = TagSet::default();
        assert!(tags.insert(TagAxis::Class, SceneTag::new("C1", "Spot")));
        assert!(!tags.insert(TagAxis::Class, SceneTag::new("C1", "Renamed")));

        assert_eq!(tags.classes.len(), 1);
        assert_eq!(tags.classes[0].name, "Spot");
    }

    #[test]
    fn test_same_name_different_uuid_is_kept() {
        let mut tags = TagSet::default();
        tags.insert(TagAxis::Position, SceneTag::new("P1", "FOH"));
        tags.insert(TagAxis::Position, SceneTag::new("P2", "FOH"));

        assert_eq!(tags.positions.len(), 2);
    }

    #[test]
    fn test_axes_are_independent() {
        let mut tags = TagSet::default();
        tags.insert(TagAxis::Layer, SceneTag::new("X", "Stage"));
        tags.insert(TagAxis::Class, SceneTag::new("X", "Stage"));

        assert_eq!(tags.len(), 2);
        assert!(tags.find(TagAxis::Layer, "X").is_some());
        assert!(tags.find(TagAxis::Position, "X").is_none());
    }

    #[test]
    fn test_axis_as_str() {
        assert_eq!(TagAxis::Layer.as_str(), "layer");
        assert_eq!(TagAxis::Class.as_str(), "class");
        assert_eq!(TagAxis::Position.as_str(), "position");
    }
}
