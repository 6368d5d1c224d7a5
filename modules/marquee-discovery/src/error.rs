use thiserror::Error;

pub type Result<T> = std::result::Result<T, DiscoveryError>;

/// Failures that escape a discovery flow. Per-page and per-item faults are
/// absorbed lower down; what reaches the caller is a required first step
/// failing with nothing to fall back on.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Catalog unreachable: {0}")]
    Transport(String),

    #[error(transparent)]
    Common(#[from] marquee_common::MarqueeError),
}

impl From<omdb_client::OmdbError> for DiscoveryError {
    fn from(err: omdb_client::OmdbError) -> Self {
        DiscoveryError::Transport(err.to_string())
    }
}
