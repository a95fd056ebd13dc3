use thiserror::Error;

/// Errors from repository operations (used by trait definitions in voxroute-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),
}

/// Errors from the dialogue backend (Dialogflow) gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("credentials unavailable for agent '{agent}': {reason}")]
    Credentials { agent: String, reason: String },

    #[error("authentication rejected by dialogue service")]
    Authentication,

    #[error("rate limited by dialogue service")]
    RateLimited,

    #[error("dialogue service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to parse dialogue response: {0}")]
    Deserialization(String),

    #[error("dialogue request timed out after {0} ms")]
    Timeout(u64),
}

/// Errors raised while loading startup configuration. All are fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required configuration: {0}")]
    Missing(String),

    #[error("failed to read config file '{path}': {reason}")]
    Read { path: String, reason: String },

    #[error("failed to parse config file '{path}': {reason}")]
    Parse { path: String, reason: String },

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}
