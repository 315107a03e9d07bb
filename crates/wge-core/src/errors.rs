/// Core error type for the exporter.
///
/// Adapter crates should map their specific errors into this type so the
/// application core can handle failures consistently (user-correctable vs
/// retryable).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The submitted invite link does not match the expected shape.
    /// Surfaced to callers as a 4xx.
    #[error("invalid invite link: {0}")]
    InvalidLink(String),

    /// No group could be identified, or its metadata could not be fetched.
    /// Surfaced as a 5xx; retryable by the caller.
    #[error("resolution failed: {0}")]
    Resolution(String),

    /// Transport failure talking to the WhatsApp bridge.
    #[error("bridge error: {0}")]
    Bridge(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
