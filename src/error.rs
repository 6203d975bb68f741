use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContactsError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not start contacts worker: {0}")]
    Worker(std::io::Error),

    #[error("Contacts worker exited before delivering a result")]
    WorkerGone,

    #[error("Unknown mimetype: {0}")]
    UnknownMimetype(String),

    #[error("{0}")]
    Other(String),
}

pub type ContactsResult<T> = Result<T, ContactsError>;
