use domain::DomainError;
use domain::inventory::{NewMonitor, RemoteMonitor, RemoteTag};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Monitors and tags held by a local inventory backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryState {
    #[serde(default)]
    pub credentials: Option<Credentials>,
    #[serde(default)]
    pub monitors: Vec<RemoteMonitor>,
    #[serde(default)]
    pub tags: Vec<RemoteTag>,
    #[serde(default = "first_id")]
    pub next_id: i64,
}

fn first_id() -> i64 {
    1
}

impl InventoryState {
    pub fn new() -> Self {
        Self {
            next_id: first_id(),
            ..Default::default()
        }
    }

    pub fn check_credentials(&self, username: &str, password: &str) -> Result<(), DomainError> {
        match &self.credentials {
            Some(c) if c.username != username || c.password != password => Err(
                DomainError::Auth(format!("Invalid credentials for user '{username}'")),
            ),
            _ => Ok(()),
        }
    }

    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        id
    }

    pub fn create_monitor(&mut self, monitor: &NewMonitor) -> i64 {
        let id = self.allocate_id();
        self.monitors.push(RemoteMonitor {
            id,
            name: monitor.name.clone(),
            description: Some(monitor.description.clone()),
            url: Some(monitor.url.clone()),
            tags: Vec::new(),
        });
        id
    }

    pub fn create_tag(&mut self, name: &str, color: &str) -> i64 {
        let id = self.allocate_id();
        self.tags.push(RemoteTag {
            id,
            name: name.to_string(),
            uuid: None,
            color: Some(color.to_string()),
        });
        id
    }

    pub fn associate_tag(&mut self, monitor_id: i64, tag_id: i64) -> Result<(), DomainError> {
        let tag_name = self
            .tags
            .iter()
            .find(|t| t.id == tag_id)
            .map(|t| t.name.clone())
            .ok_or_else(|| DomainError::Transport(format!("Tag {tag_id} not found")))?;
        let monitor = self
            .monitors
            .iter_mut()
            .find(|m| m.id == monitor_id)
            .ok_or_else(|| DomainError::Transport(format!("Monitor {monitor_id} not found")))?;

        if !monitor.has_tag(&tag_name) {
            monitor.tags.push(tag_name);
        }
        Ok(())
    }

    pub fn delete_monitor(&mut self, id: i64) -> Result<(), DomainError> {
        let before = self.monitors.len();
        self.monitors.retain(|m| m.id != id);
        if self.monitors.len() == before {
            return Err(DomainError::Transport(format!("Monitor {id} not found")));
        }
        Ok(())
    }

    pub fn delete_tag(&mut self, id: i64) -> Result<(), DomainError> {
        let position = self
            .tags
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| DomainError::Transport(format!("Tag {id} not found")))?;
        let removed = self.tags.remove(position);
        for monitor in &mut self.monitors {
            monitor.tags.retain(|t| *t != removed.name);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_across_kinds() {
        let mut state = InventoryState::new();
        let tag = state.create_tag("Stage", "#ff0000");
        let monitor = state.create_monitor(&NewMonitor::http("Spot", "http://10.0.0.5", "U1"));
        assert_ne!(tag, monitor);
    }

    #[test]
    fn test_associate_is_idempotent() {
        let mut state = InventoryState::new();
        let tag = state.create_tag("Stage", "#ff0000");
        let monitor = state.create_monitor(&NewMonitor::http("Spot", "http://10.0.0.5", "U1"));

        state.associate_tag(monitor, tag).unwrap();
        state.associate_tag(monitor, tag).unwrap();

        assert_eq!(state.monitors[0].tags, vec!["Stage".to_string()]);
    }

    #[test]
    fn test_delete_tag_detaches_it() {
        let mut state = InventoryState::new();
        let tag = state.create_tag("Stage", "#ff0000");
        let monitor = state.create_monitor(&NewMonitor::http("Spot", "http://10.0.0.5", "U1"));
        state.associate_tag(monitor, tag).unwrap();

        state.delete_tag(tag).unwrap();

        assert!(state.tags.is_empty());
        assert!(state.monitors[0].tags.is_empty());
    }

    #[test]
    fn test_unknown_ids_are_transport_errors() {
        let mut state = InventoryState::new();
        assert!(matches!(state.delete_monitor(9), Err(DomainError::Transport(_))));
        assert!(matches!(state.associate_tag(1, 2), Err(DomainError::Transport(_))));
    }

    #[test]
    fn test_credentials_check() {
        let mut state = InventoryState::new();
        assert!(state.check_credentials("anyone", "anything").is_ok());

        state.credentials = Some(Credentials {
            username: "admin".to_string(),
            password: "secret".to_string(),
        });
        assert!(state.check_credentials("admin", "secret").is_ok());
        assert!(matches!(
            state.check_credentials("admin", "wrong"),
            Err(DomainError::Auth(_))
        ));
    }
}
