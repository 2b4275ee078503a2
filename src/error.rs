use thiserror::Error;

// ─── Error hierarchy ─────────────────────────────────────────────────────────
//
// Each subsystem owns its error type so callers can match on the failure
// they care about. Startup code wraps these in `anyhow::Result` with context.

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Telegram errors ────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("{method} request failed: {message}")]
    Request { method: String, message: String },

    #[error("{method} rejected ({status}): {description}")]
    Api {
        method: String,
        status: u16,
        description: String,
    },

    #[error("{method} returned an unreadable response: {message}")]
    Decode { method: String, message: String },
}

// ─── Subscriber store errors ────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("failed to write {path}: {message}")]
    Write { path: String, message: String },

    #[error("corrupt subscriber file {path}: {message}")]
    Corrupt { path: String, message: String },
}
