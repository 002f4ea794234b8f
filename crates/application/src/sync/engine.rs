use domain::inventory::NewMonitor;
use domain::{DomainError, InventoryClient, InventorySnapshot, RemoteMonitor, RemoteTag};
use rand::Rng;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::options::{SyncOptions, SyncSteps};
use super::overlay::InventoryOverlay;
use super::report::{Mutation, SyncIssue, SyncReport};
use crate::scene::FlattenedScene;

/// Await one remote call, turning an elapsed deadline into a transport error.
pub(crate) async fn bounded<T>(
    timeout: Duration,
    op: &str,
    call: impl Future<Output = Result<T, DomainError>>,
) -> Result<T, DomainError> {
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(DomainError::Transport(format!(
            "{op} timed out after {timeout:?}"
        ))),
    }
}

fn random_color() -> String {
    format!("#{:06x}", rand::thread_rng().gen_range(0..=0xFF_FFFFu32))
}

/// Converges a remote inventory towards a flattened scene.
///
/// Remote calls are issued one at a time. Failures that concern a single
/// tag or fixture are recorded in the report and the pass carries on.
pub struct ReconciliationEngine {
    client: Arc<dyn InventoryClient>,
    call_timeout: Duration,
}

impl ReconciliationEngine {
    pub fn new(client: Arc<dyn InventoryClient>, call_timeout: Duration) -> Self {
        Self {
            client,
            call_timeout,
        }
    }

    /// Run the selected steps against a snapshot taken just before the pass.
    pub async fn reconcile(
        &self,
        scene: &FlattenedScene,
        snapshot: InventorySnapshot,
        options: &SyncOptions,
        steps: SyncSteps,
    ) -> SyncReport {
        let mut overlay = InventoryOverlay::from_snapshot(snapshot);
        let mut report = SyncReport::new();

        if steps.syncs_tags() {
            self.sync_tags(scene, &mut overlay, options, &mut report)
                .await;
        }
        if steps.syncs_monitors() {
            self.sync_monitors(scene, &mut overlay, options, &mut report)
                .await;
        }

        info!(
            mutations = report.mutations.len(),
            reused = report.reused_monitors,
            issues = report.issues.len(),
            "Reconciliation pass finished"
        );
        report
    }

    /// Create every enabled local tag that has no remote equivalent.
    pub async fn sync_tags(
        &self,
        scene: &FlattenedScene,
        overlay: &mut InventoryOverlay,
        options: &SyncOptions,
        report: &mut SyncReport,
    ) {
        for axis in options.enabled_axes() {
            for tag in scene.tags.axis(axis) {
                if let Some(existing) = overlay.tag(&tag.name, &tag.uuid) {
                    debug!(tag = %tag.name, remote_id = existing.id, "Tag already present");
                    continue;
                }

                let color = random_color();
                match bounded(
                    self.call_timeout,
                    "create tag",
                    self.client.create_tag(&tag.name, &color),
                )
                .await
                {
                    Ok(id) => {
                        info!(tag = %tag.name, %axis, id, "Tag created");
                        overlay.insert_tag(RemoteTag {
                            id,
                            name: tag.name.clone(),
                            uuid: Some(tag.uuid.clone()),
                            color: Some(color),
                        });
                        report.record(Mutation::TagCreated {
                            id,
                            name: tag.name.clone(),
                            axis,
                        });
                    }
                    Err(e) => {
                        warn!(tag = %tag.name, error = %e, "Tag creation failed");
                        report.issue(SyncIssue::TagCreateFailed {
                            name: tag.name.clone(),
                            error: e,
                        });
                    }
                }
            }
        }
    }

    /// Ensure one monitor per addressed fixture and attach its enabled tags.
    pub async fn sync_monitors(
        &self,
        scene: &FlattenedScene,
        overlay: &mut InventoryOverlay,
        options: &SyncOptions,
        report: &mut SyncReport,
    ) {
        for (layer, fixture) in scene.fixtures() {
            let Some(ip) = fixture.first_ipv4() else {
                warn!(fixture_uuid = %fixture.uuid, name = %fixture.name, "Fixture has no IPv4 address, skipping");
                report.issue(SyncIssue::NoAddress {
                    fixture_uuid: fixture.uuid.clone(),
                    fixture_name: fixture.name.clone(),
                });
                continue;
            };

            let existing = overlay.monitor(&fixture.uuid).map(|m| m.id);
            let monitor_id = match existing {
                Some(id) => {
                    debug!(fixture_uuid = %fixture.uuid, monitor_id = id, "Monitor already exists");
                    report.reused_monitors += 1;
                    id
                }
                None => {
                    let request =
                        NewMonitor::http(&fixture.name, format!("http://{ip}"), &fixture.uuid);
                    match bounded(
                        self.call_timeout,
                        "create monitor",
                        self.client.create_monitor(&request),
                    )
                    .await
                    {
                        Ok(id) => {
                            info!(fixture_uuid = %fixture.uuid, id, url = %request.url, "Monitor created");
                            overlay.insert_monitor(RemoteMonitor {
                                id,
                                name: request.name.clone(),
                                description: Some(fixture.uuid.clone()),
                                url: Some(request.url.clone()),
                                tags: Vec::new(),
                            });
                            report.record(Mutation::MonitorCreated {
                                id,
                                fixture_uuid: fixture.uuid.clone(),
                                name: request.name,
                                url: request.url,
                            });
                            id
                        }
                        Err(e) => {
                            warn!(fixture_uuid = %fixture.uuid, error = %e, "Monitor creation failed");
                            report.issue(SyncIssue::MonitorCreateFailed {
                                fixture_uuid: fixture.uuid.clone(),
                                error: e,
                            });
                            continue;
                        }
                    }
                }
            };

            for axis in options.enabled_axes() {
                let Some(local) = scene.tag_for(axis, layer, fixture) else {
                    continue;
                };
                let Some(remote) = overlay.tag(&local.name, &local.uuid) else {
                    report.issue(SyncIssue::UnresolvedTag {
                        axis,
                        tag_name: local.name.clone(),
                        fixture_uuid: fixture.uuid.clone(),
                    });
                    continue;
                };
                let (tag_id, tag_name) = (remote.id, remote.name.clone());

                let already_tagged = overlay
                    .monitor(&fixture.uuid)
                    .is_some_and(|m| m.has_tag(&tag_name));
                if already_tagged {
                    continue;
                }

                match bounded(
                    self.call_timeout,
                    "associate tag",
                    self.client.associate_tag(monitor_id, tag_id),
                )
                .await
                {
                    Ok(()) => {
                        debug!(monitor_id, tag = %tag_name, "Tag associated");
                        overlay.attach_tag(&fixture.uuid, &tag_name);
                        report.record(Mutation::TagAssociated {
                            monitor_id,
                            tag_id,
                            tag_name,
                            fixture_uuid: fixture.uuid.clone(),
                        });
                    }
                    Err(e) => {
                        warn!(monitor_id, tag = %tag_name, error = %e, "Tag association failed");
                        report.issue(SyncIssue::AssociateFailed {
                            monitor_id,
                            tag_name,
                            fixture_uuid: fixture.uuid.clone(),
                            error: e,
                        });
                    }
                }
            }
        }
    }
}
