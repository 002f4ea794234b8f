use domain::DomainError;
use domain::error::Result;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Admits one long-running task at a time.
///
/// Services built on clones of the same gate exclude each other, so a
/// discovery cannot start while an inventory pass holds the gate.
#[derive(Clone, Default)]
pub struct TaskGate {
    slot: Arc<Mutex<()>>,
}

/// Held for the duration of an admitted task.
pub type TaskPermit = OwnedMutexGuard<()>;

impl TaskGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit `task` or fail with [`DomainError::Busy`] naming it.
    pub fn enter(&self, task: &'static str) -> Result<TaskPermit> {
        self.slot
            .clone()
            .try_lock_owned()
            .map_err(|_| DomainError::Busy(task))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_the_slot() {
        let gate = TaskGate::new();
        let other = gate.clone();

        let permit = gate.enter("discovery").unwrap();
        assert_eq!(
            other.enter("inventory pass").unwrap_err(),
            DomainError::Busy("inventory pass")
        );

        drop(permit);
        assert!(other.enter("inventory pass").is_ok());
    }

    #[test]
    fn test_separate_gates_are_independent() {
        let first = TaskGate::new();
        let _permit = first.enter("discovery").unwrap();
        assert!(TaskGate::new().enter("discovery").is_ok());
    }
}
