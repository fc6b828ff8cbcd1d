//! Types d'erreurs pour ysxsplaylist

use crate::orchestrator::OrchestratorState;

/// Erreurs de construction et de pilotage de la playlist
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A directory listing or file lookup failed on the server
    #[error(transparent)]
    Remote(#[from] ysxsalist::AlistError),

    /// Unusable album configuration (empty album path, ...)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Track order or track name pattern does not compile
    #[error("Invalid track pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// The external player refused an operation
    #[error("Player error: {0}")]
    Player(String),

    #[error("Invalid orchestrator state: expected {expected}, found {actual}")]
    InvalidState {
        expected: OrchestratorState,
        actual: OrchestratorState,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn player(msg: impl Into<String>) -> Self {
        Self::Player(msg.into())
    }

    /// Whether the error came from the remote listing service
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

/// Type Result spécialisé pour ysxsplaylist
pub type Result<T> = std::result::Result<T, Error>;
