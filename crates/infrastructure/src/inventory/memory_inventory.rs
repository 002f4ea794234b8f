use async_trait::async_trait;
use domain::DomainError;
use domain::inventory::{InventoryClient, NewMonitor, RemoteMonitor, RemoteTag};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

use super::state::{Credentials, InventoryState};

/// One call received by an [`InMemoryInventory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryCall {
    Login,
    ListMonitors,
    ListTags,
    CreateMonitor(NewMonitor),
    CreateTag(String),
    AssociateTag { monitor_id: i64, tag_id: i64 },
    DeleteMonitor(i64),
    DeleteTag(i64),
}

impl InventoryCall {
    pub fn is_create(&self) -> bool {
        matches!(self, Self::CreateMonitor(_) | Self::CreateTag(_))
    }

    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::Login | Self::ListMonitors | Self::ListTags)
    }
}

/// Process-local inventory that records every call it receives.
#[derive(Clone, Default)]
pub struct InMemoryInventory {
    state: Arc<Mutex<InventoryState>>,
    calls: Arc<Mutex<Vec<InventoryCall>>>,
    logged_in: Arc<AtomicBool>,
}

impl InMemoryInventory {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(InventoryState::new())),
            ..Default::default()
        }
    }

    pub async fn with_credentials(self, username: &str, password: &str) -> Self {
        self.state.lock().await.credentials = Some(Credentials {
            username: username.to_string(),
            password: password.to_string(),
        });
        self
    }

    /// Insert an existing monitor, bypassing the call log.
    pub async fn seed_monitor(&self, name: &str, description: &str, tags: &[&str]) -> i64 {
        let mut state = self.state.lock().await;
        let id = state.create_monitor(&NewMonitor::http(name, "", description));
        if let Some(m) = state.monitors.iter_mut().find(|m| m.id == id) {
            m.url = None;
            m.tags = tags.iter().map(|t| t.to_string()).collect();
        }
        id
    }

    /// Insert an existing tag, bypassing the call log.
    pub async fn seed_tag(&self, name: &str, uuid: Option<&str>) -> i64 {
        let mut state = self.state.lock().await;
        let id = state.create_tag(name, "#808080");
        if let Some(t) = state.tags.iter_mut().find(|t| t.id == id) {
            t.uuid = uuid.map(str::to_string);
        }
        id
    }

    pub async fn calls(&self) -> Vec<InventoryCall> {
        self.calls.lock().await.clone()
    }

    pub async fn clear_calls(&self) {
        self.calls.lock().await.clear();
    }

    pub async fn monitors(&self) -> Vec<RemoteMonitor> {
        self.state.lock().await.monitors.clone()
    }

    pub async fn tags(&self) -> Vec<RemoteTag> {
        self.state.lock().await.tags.clone()
    }

    async fn record(&self, call: InventoryCall) -> Result<(), DomainError> {
        let needs_session = call != InventoryCall::Login;
        self.calls.lock().await.push(call);
        if needs_session && !self.logged_in.load(Ordering::SeqCst) {
            return Err(DomainError::Auth("Not logged in".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl InventoryClient for InMemoryInventory {
    async fn login(&self, username: &str, password: &str) -> Result<(), DomainError> {
        self.record(InventoryCall::Login).await?;
        self.state
            .lock()
            .await
            .check_credentials(username, password)?;
        self.logged_in.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn list_monitors(&self) -> Result<Vec<RemoteMonitor>, DomainError> {
        self.record(InventoryCall::ListMonitors).await?;
        Ok(self.state.lock().await.monitors.clone())
    }

    async fn list_tags(&self) -> Result<Vec<RemoteTag>, DomainError> {
        self.record(InventoryCall::ListTags).await?;
        Ok(self.state.lock().await.tags.clone())
    }

    async fn create_monitor(&self, monitor: &NewMonitor) -> Result<i64, DomainError> {
        self.record(InventoryCall::CreateMonitor(monitor.clone()))
            .await?;
        Ok(self.state.lock().await.create_monitor(monitor))
    }

    async fn create_tag(&self, name: &str, color: &str) -> Result<i64, DomainError> {
        self.record(InventoryCall::CreateTag(name.to_string()))
            .await?;
        Ok(self.state.lock().await.create_tag(name, color))
    }

    async fn associate_tag(&self, monitor_id: i64, tag_id: i64) -> Result<(), DomainError> {
        self.record(InventoryCall::AssociateTag { monitor_id, tag_id })
            .await?;
        self.state.lock().await.associate_tag(monitor_id, tag_id)
    }

    async fn delete_monitor(&self, id: i64) -> Result<(), DomainError> {
        self.record(InventoryCall::DeleteMonitor(id)).await?;
        self.state.lock().await.delete_monitor(id)
    }

    async fn delete_tag(&self, id: i64) -> Result<(), DomainError> {
        self.record(InventoryCall::DeleteTag(id)).await?;
        self.state.lock().await.delete_tag(id)
    }
}
