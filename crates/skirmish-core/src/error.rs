//! Error types for the engine.

use thiserror::Error;

/// A serialized NPC record could not be read.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The stream ended, or held garbage, where a required field was expected.
    #[error("invalid record: {field} {detail}")]
    InvalidRecord {
        field: &'static str,
        detail: String,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RecordError {
    pub(crate) fn missing(field: &'static str) -> Self {
        RecordError::InvalidRecord {
            field,
            detail: "is missing".to_string(),
        }
    }

    pub(crate) fn malformed(field: &'static str, token: &str) -> Self {
        RecordError::InvalidRecord {
            field,
            detail: format!("is not an integer: {token:?}"),
        }
    }
}

/// Errors that can occur during snapshot save/load.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Encode(#[from] Box<bincode::ErrorKind>),
    #[error("snapshot version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Configuration could not be loaded or is out of range.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// An observer failed to handle a fight notification.
#[derive(Debug, Error)]
pub enum ObserverError {
    #[error("log sink write failed: {0}")]
    Sink(#[from] std::io::Error),
}

/// Errors surfaced by the simulation driver.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("cannot {action} while {phase:?}")]
    InvalidPhase {
        action: &'static str,
        phase: crate::engine::SimPhase,
    },
    #[error("failed to spawn {actor} thread: {source}")]
    Spawn {
        actor: &'static str,
        source: std::io::Error,
    },
    #[error("{0} actor panicked")]
    ActorPanicked(&'static str),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
