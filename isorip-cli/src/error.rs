use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Engine error (opening, listing, extracting, converting)
    #[error("{0}")]
    Engine(#[from] isorip_lib::ExtractError),

    /// Image decode error
    #[error("{0}")]
    Image(#[from] isorip_core::ImageError),

    /// JSON output failed to serialize
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
