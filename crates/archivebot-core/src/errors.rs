/// Core error type for the archive bot.
///
/// The Slack adapter maps its transport and API failures into this type so
/// the pipelines can handle failures consistently (fatal-to-run vs
/// best-effort).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("slack {method} failed: {reason}")]
    Api { method: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
