use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors that reject a whole outcome event before any state is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("no eligible bot: {0}")]
    NoEligibleBot(String),
}

/// A time-of-day bound that could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed time window bound '{value}'")]
pub struct WindowError {
    pub value: String,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Signal(#[from] SignalError),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("messaging error: {0}")]
    Messaging(String),

    #[error("parse error: {0}")]
    Parse(String),
}

impl Error {
    /// Stable machine-readable error kind for structured error bodies.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Signal(SignalError::InvalidPayload(_)) => "invalid_payload",
            Self::Signal(SignalError::NoEligibleBot(_)) => "no_eligible_bot",
            Self::NotFound { .. } => "config_not_found",
            Self::Validation(_) => "validation",
            Self::Json(_) => "json",
            Self::Io(_) => "io",
            Self::Connection(_) => "connection",
            Self::Database(_) => "database",
            Self::Messaging(_) => "messaging",
            Self::Parse(_) => "parse",
        }
    }
}

impl From<diesel::result::Error> for Error {
    fn from(err: diesel::result::Error) -> Self {
        Error::Database(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
