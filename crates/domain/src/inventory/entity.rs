use serde::{Deserialize, Serialize};

/// A monitor as held by the remote inventory.
///
/// `description` carries the uuid of the fixture the monitor was created
/// for; it is the join key back to the scene document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteMonitor {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// Names of the tags attached to this monitor.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl RemoteMonitor {
    /// True when this monitor was created for the fixture with `uuid`.
    pub fn tracks(&self, uuid: &str) -> bool {
        self.description.as_deref() == Some(uuid)
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteTag {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl RemoteTag {
    /// Equivalence with a local tag: names match OR uuids match.
    pub fn matches(&self, name: &str, uuid: &str) -> bool {
        self.name == name || self.uuid.as_deref() == Some(uuid)
    }
}

/// Point-in-time view of the remote inventory, fetched once per pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub monitors: Vec<RemoteMonitor>,
    pub tags: Vec<RemoteTag>,
}

impl InventorySnapshot {
    pub fn new(monitors: Vec<RemoteMonitor>, tags: Vec<RemoteTag>) -> Self {
        Self { monitors, tags }
    }

    pub fn monitor_for(&self, fixture_uuid: &str) -> Option<&RemoteMonitor> {
        self.monitors.iter().find(|m| m.tracks(fixture_uuid))
    }

    pub fn tag_matching(&self, name: &str, uuid: &str) -> Option<&RemoteTag> {
        self.tags.iter().find(|t| t.matches(name, uuid))
    }
}

/// Kind of check the remote inventory performs for a monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonitorKind {
    #[serde(rename = "http")]
    Http,
}

impl MonitorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
        }
    }
}

/// Request to create a monitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMonitor {
    pub kind: MonitorKind,
    pub name: String,
    pub url: String,
    pub description: String,
}

impl NewMonitor {
    pub fn http(
        name: impl Into<String>,
        url: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind: MonitorKind::Http,
            name: name.into(),
            url: url.into(),
            description: description.into(),
        }
    }
}
