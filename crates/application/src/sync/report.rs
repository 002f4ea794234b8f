use domain::{DomainError, TagAxis};
use std::fmt;

/// A change applied to the remote inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    TagCreated {
        id: i64,
        name: String,
        axis: TagAxis,
    },
    MonitorCreated {
        id: i64,
        fixture_uuid: String,
        name: String,
        url: String,
    },
    TagAssociated {
        monitor_id: i64,
        tag_id: i64,
        tag_name: String,
        fixture_uuid: String,
    },
    MonitorDeleted {
        id: i64,
        name: String,
    },
    TagDeleted {
        id: i64,
        name: String,
    },
}

impl Mutation {
    pub fn is_create(&self) -> bool {
        matches!(self, Self::TagCreated { .. } | Self::MonitorCreated { .. })
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TagCreated { id, name, axis } => {
                write!(f, "created {axis} tag '{name}' (id {id})")
            }
            Self::MonitorCreated {
                id,
                fixture_uuid,
                name,
                url,
            } => write!(f, "created monitor '{name}' -> {url} for {fixture_uuid} (id {id})"),
            Self::TagAssociated {
                monitor_id,
                tag_name,
                fixture_uuid,
                ..
            } => write!(
                f,
                "tagged monitor {monitor_id} ({fixture_uuid}) with '{tag_name}'"
            ),
            Self::MonitorDeleted { id, name } => write!(f, "deleted monitor '{name}' (id {id})"),
            Self::TagDeleted { id, name } => write!(f, "deleted tag '{name}' (id {id})"),
        }
    }
}

/// An item that was skipped or failed without stopping the pass.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncIssue {
    NoAddress {
        fixture_uuid: String,
        fixture_name: String,
    },
    TagCreateFailed {
        name: String,
        error: DomainError,
    },
    MonitorCreateFailed {
        fixture_uuid: String,
        error: DomainError,
    },
    UnresolvedTag {
        axis: TagAxis,
        tag_name: String,
        fixture_uuid: String,
    },
    AssociateFailed {
        monitor_id: i64,
        tag_name: String,
        fixture_uuid: String,
        error: DomainError,
    },
    DeleteFailed {
        kind: &'static str,
        id: i64,
        error: DomainError,
    },
}

impl fmt::Display for SyncIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoAddress {
                fixture_uuid,
                fixture_name,
            } => write!(
                f,
                "skipped fixture '{fixture_name}' ({fixture_uuid}): no IPv4 address"
            ),
            Self::TagCreateFailed { name, error } => {
                write!(f, "could not create tag '{name}': {error}")
            }
            Self::MonitorCreateFailed {
                fixture_uuid,
                error,
            } => write!(f, "could not create monitor for {fixture_uuid}: {error}"),
            Self::UnresolvedTag {
                axis,
                tag_name,
                fixture_uuid,
            } => write!(
                f,
                "no remote {axis} tag '{tag_name}' for {fixture_uuid}; run tag sync first"
            ),
            Self::AssociateFailed {
                monitor_id,
                tag_name,
                fixture_uuid,
                error,
            } => write!(
                f,
                "could not tag monitor {monitor_id} ({fixture_uuid}) with '{tag_name}': {error}"
            ),
            Self::DeleteFailed { kind, id, error } => {
                write!(f, "could not delete {kind} {id}: {error}")
            }
        }
    }
}

/// Outcome of one reconciliation or purge pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
    pub mutations: Vec<Mutation>,
    pub issues: Vec<SyncIssue>,
    pub reused_monitors: usize,
}

impl SyncReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, mutation: Mutation) {
        self.mutations.push(mutation);
    }

    pub fn issue(&mut self, issue: SyncIssue) {
        self.issues.push(issue);
    }

    pub fn created(&self) -> usize {
        self.mutations.iter().filter(|m| m.is_create()).count()
    }

    pub fn associations(&self) -> usize {
        self.mutations
            .iter()
            .filter(|m| matches!(m, Mutation::TagAssociated { .. }))
            .count()
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} mutation(s), {} monitor(s) reused, {} issue(s)",
            self.mutations.len(),
            self.reused_monitors,
            self.issues.len()
        )?;
        for m in &self.mutations {
            writeln!(f, "  + {m}")?;
        }
        for i in &self.issues {
            writeln!(f, "  ! {i}")?;
        }
        Ok(())
    }
}
