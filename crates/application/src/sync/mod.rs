mod engine;
mod options;
mod overlay;
mod purge;
mod report;
mod service;

pub use engine::ReconciliationEngine;
pub use options::{SyncOptions, SyncSteps};
pub use overlay::InventoryOverlay;
pub use purge::{InventoryPurger, PurgeTarget};
pub use report::{Mutation, SyncIssue, SyncReport};
pub use service::{InventoryLogin, SyncService};
