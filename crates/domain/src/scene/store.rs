use std::path::Path;

use super::SceneDocument;
use crate::DomainError;

/// Reads and writes scene documents.
///
/// Implementations live in the infrastructure layer; a failed read is a
/// `DocumentParse` (or `Io`) error and aborts the enclosing operation.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
pub trait SceneStore: Send + Sync {
    fn load(&self, path: &Path) -> Result<SceneDocument, DomainError>;

    fn save(&self, document: &SceneDocument, path: &Path) -> Result<(), DomainError>;
}
