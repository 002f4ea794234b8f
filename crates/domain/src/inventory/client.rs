use super::{NewMonitor, RemoteMonitor, RemoteTag};
use crate::DomainError;
use async_trait::async_trait;

/// Client interface of the remote monitoring inventory.
///
/// Every call may fail with `Transport`; `login` fails with `Auth` when
/// the credentials are rejected. Implementations are provided in the
/// infrastructure layer.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait InventoryClient: Send + Sync {
    /// Open an authenticated session
    async fn login(&self, username: &str, password: &str) -> Result<(), DomainError>;

    async fn list_monitors(&self) -> Result<Vec<RemoteMonitor>, DomainError>;

    async fn list_tags(&self) -> Result<Vec<RemoteTag>, DomainError>;

    /// Create a monitor and return its remote id
    async fn create_monitor(&self, monitor: &NewMonitor) -> Result<i64, DomainError>;

    /// Create a tag and return its remote id
    async fn create_tag(&self, name: &str, color: &str) -> Result<i64, DomainError>;

    /// Attach an existing tag to an existing monitor
    async fn associate_tag(&self, monitor_id: i64, tag_id: i64) -> Result<(), DomainError>;

    async fn delete_monitor(&self, id: i64) -> Result<(), DomainError>;

    async fn delete_tag(&self, id: i64) -> Result<(), DomainError>;
}
