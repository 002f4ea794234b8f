use domain::{InventoryClient, RemoteMonitor, RemoteTag};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use super::engine::bounded;
use super::report::{Mutation, SyncIssue, SyncReport};

/// What a purge removes from the remote inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurgeTarget {
    Monitors,
    Tags,
}

/// Deletes every monitor or every tag listed in a snapshot.
///
/// There is no scoping: all entries are removed, whether or not they came
/// from the current scene document.
pub struct InventoryPurger {
    client: Arc<dyn InventoryClient>,
    call_timeout: Duration,
}

impl InventoryPurger {
    pub fn new(client: Arc<dyn InventoryClient>, call_timeout: Duration) -> Self {
        Self {
            client,
            call_timeout,
        }
    }

    pub async fn purge_monitors(&self, monitors: &[RemoteMonitor]) -> SyncReport {
        let mut report = SyncReport::new();
        for monitor in monitors {
            match bounded(
                self.call_timeout,
                "delete monitor",
                self.client.delete_monitor(monitor.id),
            )
            .await
            {
                Ok(()) => report.record(Mutation::MonitorDeleted {
                    id: monitor.id,
                    name: monitor.name.clone(),
                }),
                Err(e) => {
                    warn!(id = monitor.id, error = %e, "Monitor delete failed");
                    report.issue(SyncIssue::DeleteFailed {
                        kind: "monitor",
                        id: monitor.id,
                        error: e,
                    });
                }
            }
        }
        info!(deleted = report.mutations.len(), failed = report.issues.len(), "Monitors purged");
        report
    }

    pub async fn purge_tags(&self, tags: &[RemoteTag]) -> SyncReport {
        let mut report = SyncReport::new();
        for tag in tags {
            match bounded(self.call_timeout, "delete tag", self.client.delete_tag(tag.id)).await {
                Ok(()) => report.record(Mutation::TagDeleted {
                    id: tag.id,
                    name: tag.name.clone(),
                }),
                Err(e) => {
                    warn!(id = tag.id, error = %e, "Tag delete failed");
                    report.issue(SyncIssue::DeleteFailed {
                        kind: "tag",
                        id: tag.id,
                        error: e,
                    });
                }
            }
        }
        info!(deleted = report.mutations.len(), failed = report.issues.len(), "Tags purged");
        report
    }
}
