//! Error types for loading sentences, persisting records and configuration.
//!
//! The typing core itself (session, navigation, matching) never fails; these
//! errors only come from the collaborators around it.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DojoError {
    /// A practice run needs at least one sentence to point the cursor at
    #[error("sentence set is empty")]
    EmptySentenceSet,

    #[error("no sentences tagged {0:?}")]
    UnknownTag(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The background record writer has shut down
    #[error("record sink is closed")]
    SinkClosed,
}

pub type Result<T> = std::result::Result<T, DojoError>;
