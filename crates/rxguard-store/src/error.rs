use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("label source error: {0}")]
    Source(#[from] rxguard_source::SourceError),

    #[error(transparent)]
    Identity(#[from] rxguard_core::MissingIdentity),

    #[error("primary record missing after write: {0}")]
    MissingRecord(String),

    #[error("store mutex poisoned")]
    Poisoned,
}
