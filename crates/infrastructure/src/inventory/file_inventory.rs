use async_trait::async_trait;
use domain::DomainError;
use domain::inventory::{InventoryClient, NewMonitor, RemoteMonitor, RemoteTag};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::state::InventoryState;

/// Inventory persisted as a JSON document on disk.
///
/// The file is read and rewritten on every call so that several tools can
/// share it; a missing file is an empty inventory.
pub struct FileInventory {
    path: PathBuf,
    logged_in: AtomicBool,
    // Serializes read-modify-write cycles within this process
    io_lock: Mutex<()>,
}

impl FileInventory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            logged_in: AtomicBool::new(false),
            io_lock: Mutex::new(()),
        }
    }

    async fn read_state(&self) -> Result<InventoryState, DomainError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                DomainError::Transport(format!("Corrupt inventory file {:?}: {}", self.path, e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = ?self.path, "Inventory file missing, starting empty");
                Ok(InventoryState::new())
            }
            Err(e) => Err(DomainError::Transport(format!(
                "Failed to read inventory file {:?}: {}",
                self.path, e
            ))),
        }
    }

    async fn write_state(&self, state: &InventoryState) -> Result<(), DomainError> {
        let json = serde_json::to_vec_pretty(state)
            .map_err(|e| DomainError::Transport(format!("Failed to encode inventory: {}", e)))?;
        tokio::fs::write(&self.path, json).await.map_err(|e| {
            DomainError::Transport(format!(
                "Failed to write inventory file {:?}: {}",
                self.path, e
            ))
        })
    }

    fn ensure_session(&self) -> Result<(), DomainError> {
        if self.logged_in.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DomainError::Auth("Not logged in".to_string()))
        }
    }

    async fn read(&self) -> Result<InventoryState, DomainError> {
        self.ensure_session()?;
        let _guard = self.io_lock.lock().await;
        self.read_state().await
    }

    async fn update<T: Send>(
        &self,
        apply: impl FnOnce(&mut InventoryState) -> Result<T, DomainError> + Send,
    ) -> Result<T, DomainError> {
        self.ensure_session()?;
        let _guard = self.io_lock.lock().await;
        let mut state = self.read_state().await?;
        let result = apply(&mut state)?;
        self.write_state(&state).await?;
        Ok(result)
    }
}

#[async_trait]
impl InventoryClient for FileInventory {
    async fn login(&self, username: &str, password: &str) -> Result<(), DomainError> {
        let state = {
            let _guard = self.io_lock.lock().await;
            self.read_state().await?
        };
        state.check_credentials(username, password)?;
        self.logged_in.store(true, Ordering::SeqCst);
        info!(path = ?self.path, user = %username, "Inventory session opened");
        Ok(())
    }

    async fn list_monitors(&self) -> Result<Vec<RemoteMonitor>, DomainError> {
        Ok(self.read().await?.monitors)
    }

    async fn list_tags(&self) -> Result<Vec<RemoteTag>, DomainError> {
        Ok(self.read().await?.tags)
    }

    async fn create_monitor(&self, monitor: &NewMonitor) -> Result<i64, DomainError> {
        self.update(|s| Ok(s.create_monitor(monitor))).await
    }

    async fn create_tag(&self, name: &str, color: &str) -> Result<i64, DomainError> {
        self.update(|s| Ok(s.create_tag(name, color))).await
    }

    async fn associate_tag(&self, monitor_id: i64, tag_id: i64) -> Result<(), DomainError> {
        self.update(|s| s.associate_tag(monitor_id, tag_id)).await
    }

    async fn delete_monitor(&self, id: i64) -> Result<(), DomainError> {
        self.update(|s| s.delete_monitor(id)).await
    }

    async fn delete_tag(&self, id: i64) -> Result<(), DomainError> {
        self.update(|s| s.delete_tag(id)).await
    }
}
