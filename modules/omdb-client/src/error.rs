use thiserror::Error;

pub type Result<T> = std::result::Result<T, OmdbError>;

/// Transport-level failures. A `Response: "False"` body is not an error; it
/// decodes to [`crate::Lookup::NotFound`].
#[derive(Debug, Error)]
pub enum OmdbError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for OmdbError {
    fn from(err: reqwest::Error) -> Self {
        OmdbError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for OmdbError {
    fn from(err: serde_json::Error) -> Self {
        OmdbError::Parse(err.to_string())
    }
}
