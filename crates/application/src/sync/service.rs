use domain::error::Result;
use domain::{InventoryClient, InventorySnapshot};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use super::engine::{ReconciliationEngine, bounded};
use super::options::{SyncOptions, SyncSteps};
use super::purge::{InventoryPurger, PurgeTarget};
use super::report::SyncReport;
use crate::gate::{TaskGate, TaskPermit};
use crate::scene::FlattenedScene;

/// Login data for the remote inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryLogin {
    pub username: String,
    pub password: String,
}

/// Runs reconciliation and purge passes, at most one at a time.
///
/// Every pass logs in and takes a fresh snapshot before mutating. A login
/// or snapshot failure aborts the pass; a request made while another pass
/// is running is rejected with [`DomainError::Busy`].
pub struct SyncService {
    client: Arc<dyn InventoryClient>,
    login: InventoryLogin,
    call_timeout: Duration,
    options: SyncOptions,
    gate: TaskGate,
}

impl SyncService {
    pub fn new(
        client: Arc<dyn InventoryClient>,
        login: InventoryLogin,
        call_timeout: Duration,
        options: SyncOptions,
    ) -> Self {
        Self {
            client,
            login,
            call_timeout,
            options,
            gate: TaskGate::new(),
        }
    }

    /// Share `gate` with other services so their tasks exclude each other.
    pub fn with_gate(mut self, gate: TaskGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Log in and list the remote inventory.
    pub async fn fetch_snapshot(&self) -> Result<InventorySnapshot> {
        let _pass = self.begin()?;
        self.open_session().await
    }

    pub async fn run(&self, scene: &FlattenedScene, steps: SyncSteps) -> Result<SyncReport> {
        let _pass = self.begin()?;
        let snapshot = self.open_session().await?;

        info!(
            fixtures = scene.fixture_count(),
            remote_monitors = snapshot.monitors.len(),
            remote_tags = snapshot.tags.len(),
            ?steps,
            "Starting reconciliation pass"
        );
        let engine = ReconciliationEngine::new(self.client.clone(), self.call_timeout);
        Ok(engine
            .reconcile(scene, snapshot, &self.options, steps)
            .await)
    }

    pub async fn purge(&self, target: PurgeTarget) -> Result<SyncReport> {
        let _pass = self.begin()?;
        let snapshot = self.open_session().await?;

        let purger = InventoryPurger::new(self.client.clone(), self.call_timeout);
        Ok(match target {
            PurgeTarget::Monitors => purger.purge_monitors(&snapshot.monitors).await,
            PurgeTarget::Tags => purger.purge_tags(&snapshot.tags).await,
        })
    }

    fn begin(&self) -> Result<TaskPermit> {
        self.gate.enter("inventory pass")
    }

    async fn open_session(&self) -> Result<InventorySnapshot> {
        bounded(
            self.call_timeout,
            "login",
            self.client
                .login(&self.login.username, &self.login.password),
        )
        .await
        .inspect_err(|e| error!(error = %e, "Inventory login failed, aborting pass"))?;

        let monitors = bounded(self.call_timeout, "list monitors", self.client.list_monitors())
            .await
            .inspect_err(|e| error!(error = %e, "Could not list monitors, aborting pass"))?;
        let tags = bounded(self.call_timeout, "list tags", self.client.list_tags())
            .await
            .inspect_err(|e| error!(error = %e, "Could not list tags, aborting pass"))?;

        Ok(InventorySnapshot::new(monitors, tags))
    }
}
