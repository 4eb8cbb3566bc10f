/// Core error type for the bot.
///
/// Adapter crates map their specific errors into this type so handlers can
/// turn any failure into a user-facing message at the command boundary.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("search api responded with status {status}")]
    ApiStatus { status: u16 },

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
