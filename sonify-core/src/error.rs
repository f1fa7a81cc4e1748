use thiserror::Error;

use crate::events::{EventKind, Target};

#[derive(Debug, Error)]
pub enum PageError {
    #[error("chart `{id}` has an invalid payload: {source}")]
    InvalidChartPayload {
        id: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("chart `{id}` failed to render: {message}")]
    Render { id: String, message: String },
    #[error("storage error: {0}")]
    Storage(String),
    #[error("dom error: {0}")]
    Dom(String),
    #[error("element `{0}` not found")]
    MissingElement(String),
    #[error("{target:?} cannot deliver {kind:?} events")]
    Unsupported { target: Target, kind: EventKind },
    #[error("page is already mounted")]
    AlreadyMounted,
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("invalid page config: {0}")]
    Config(String),
}

pub type Result<T, E = PageError> = std::result::Result<T, E>;
