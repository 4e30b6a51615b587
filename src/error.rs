use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("not found")]
    NotFound,

    #[error("forbidden")]
    Forbidden,

    #[error("already exists")]
    Conflict,

    #[error("token limit exceeded")]
    LimitExceeded,

    #[error("unauthenticated")]
    Unauthenticated,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("renderer error: {0}")]
    Renderer(String),
}

pub type Result<T> = std::result::Result<T, Error>;
