use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed discovery datagram: {0}")]
    ProtocolDecode(String),

    #[error("Invalid scene document: {0}")]
    DocumentParse(String),

    #[error("Fixture correspondence mismatch: {0}")]
    Correspondence(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("{0} already in progress")]
    Busy(&'static str),
}

impl DomainError {
    /// Errors that invalidate the whole remote session or input document.
    pub fn aborts_pass(&self) -> bool {
        matches!(
            self,
            Self::Auth(_) | Self::DocumentParse(_) | Self::Correspondence(_) | Self::Busy(_)
        )
    }
}

impl From<std::io::Error> for DomainError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abort_classification() {
        assert!(DomainError::Auth("bad password".into()).aborts_pass());
        assert!(DomainError::Busy("sync pass").aborts_pass());
        assert!(!DomainError::Transport("timeout".into()).aborts_pass());
        assert!(!DomainError::ProtocolDecode("short".into()).aborts_pass());
    }

    #[test]
    fn test_busy_message() {
        assert_eq!(
            DomainError::Busy("discovery").to_string(),
            "discovery already in progress"
        );
    }
}
