use domain::TagAxis;
use serde::{Deserialize, Serialize};

/// Which tag axes take part in tag creation and assignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOptions {
    pub layers: bool,
    pub classes: bool,
    pub positions: bool,
}

impl SyncOptions {
    pub fn all() -> Self {
        Self {
            layers: true,
            classes: true,
            positions: true,
        }
    }

    pub fn enabled(&self, axis: TagAxis) -> bool {
        match axis {
            TagAxis::Layer => self.layers,
            TagAxis::Class => self.classes,
            TagAxis::Position => self.positions,
        }
    }

    pub fn enabled_axes(&self) -> impl Iterator<Item = TagAxis> + '_ {
        TagAxis::ALL.into_iter().filter(|a| self.enabled(*a))
    }
}

/// Parts of a reconciliation pass to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncSteps {
    TagsOnly,
    MonitorsOnly,
    #[default]
    All,
}

impl SyncSteps {
    pub fn syncs_tags(&self) -> bool {
        matches!(self, Self::TagsOnly | Self::All)
    }

    pub fn syncs_monitors(&self) -> bool {
        matches!(self, Self::MonitorsOnly | Self::All)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enabled_axes_follow_flags() {
        let options = SyncOptions {
            layers: false,
            classes: true,
            positions: true,
        };
        let axes: Vec<TagAxis> = options.enabled_axes().collect();
        assert_eq!(axes, vec![TagAxis::Class, TagAxis::Position]);
        assert_eq!(SyncOptions::default().enabled_axes().count(), 0);
    }
}
