use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnarvaError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Operation not permitted: {0}")]
    Forbidden(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Invalid mission state: expected {expected}, got {actual}")]
    InvalidState { expected: String, actual: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{0}")]
    Internal(String),
}

impl EnarvaError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn forbidden(operation: impl Into<String>) -> Self {
        Self::Forbidden(operation.into())
    }

    pub fn invalid_state(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::InvalidState {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Stable machine-readable code used in HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::InvalidState { .. } => "INVALID_STATE",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::Config(_) => "CONFIG_ERROR",
            _ => "INTERNAL_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, EnarvaError>;
