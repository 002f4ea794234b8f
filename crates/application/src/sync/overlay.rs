use domain::{InventorySnapshot, RemoteMonitor, RemoteTag};
use std::collections::HashMap;

/// Mutable view of the remote inventory for the duration of one pass.
///
/// Seeded from the snapshot and updated in place as tags and monitors are
/// created or tagged, so later steps see earlier results without another
/// remote fetch.
#[derive(Debug, Default)]
pub struct InventoryOverlay {
    tags: Vec<RemoteTag>,
    tag_by_name: HashMap<String, usize>,
    tag_by_uuid: HashMap<String, usize>,
    monitors: Vec<RemoteMonitor>,
    monitor_by_fixture: HashMap<String, usize>,
}

impl InventoryOverlay {
    pub fn from_snapshot(snapshot: InventorySnapshot) -> Self {
        let mut overlay = Self::default();
        for tag in snapshot.tags {
            overlay.insert_tag(tag);
        }
        for monitor in snapshot.monitors {
            overlay.insert_monitor(monitor);
        }
        overlay
    }

    /// Remote tag equivalent to a local one: same name, or same uuid.
    pub fn tag(&self, name: &str, uuid: &str) -> Option<&RemoteTag> {
        self.tag_by_name
            .get(name)
            .or_else(|| self.tag_by_uuid.get(uuid))
            .map(|i| &self.tags[*i])
    }

    pub fn insert_tag(&mut self, tag: RemoteTag) {
        let idx = self.tags.len();
        // First entry wins when the remote side holds duplicates
        self.tag_by_name.entry(tag.name.clone()).or_insert(idx);
        if let Some(uuid) = tag.uuid.as_ref().filter(|u| !u.is_empty()) {
            self.tag_by_uuid.entry(uuid.clone()).or_insert(idx);
        }
        self.tags.push(tag);
    }

    pub fn monitor(&self, fixture_uuid: &str) -> Option<&RemoteMonitor> {
        self.monitor_by_fixture
            .get(fixture_uuid)
            .map(|i| &self.monitors[*i])
    }

    pub fn insert_monitor(&mut self, monitor: RemoteMonitor) {
        let idx = self.monitors.len();
        if let Some(uuid) = monitor.description.as_ref().filter(|d| !d.is_empty()) {
            self.monitor_by_fixture.entry(uuid.clone()).or_insert(idx);
        }
        self.monitors.push(monitor);
    }

    /// Record that the monitor tracking `fixture_uuid` now carries `tag_name`.
    pub fn attach_tag(&mut self, fixture_uuid: &str, tag_name: &str) {
        let Some(idx) = self.monitor_by_fixture.get(fixture_uuid) else {
            return;
        };
        let monitor = &mut self.monitors[*idx];
        if !monitor.has_tag(tag_name) {
            monitor.tags.push(tag_name.to_string());
        }
    }

    pub fn tags(&self) -> &[RemoteTag] {
        &self.tags
    }

    pub fn monitors(&self) -> &[RemoteMonitor] {
        &self.monitors
    }
}
