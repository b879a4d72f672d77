use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    InvalidUrl(String),

    #[error("Request timed out")]
    Timeout { elapsed_ms: f64 },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("TLS error: {0}")]
    Tls(String),

    #[error("Cannot compute statistics from an empty sample set")]
    EmptySampleSet,

    #[error("This URL has already been analyzed: {0}")]
    DuplicateUrl(String),
}

pub type Result<T> = std::result::Result<T, Error>;
