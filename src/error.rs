//! Error taxonomy shared by the store, the wire protocol and the view-model.

pub const CODE_NOT_FOUND: &str = "NOT_FOUND";
pub const CODE_BAD_STATUS: &str = "BAD_STATUS";
pub const CODE_BAD_REQUEST: &str = "BAD_REQUEST";
pub const CODE_TRANSPORT: &str = "TRANSPORT";
pub const CODE_VALIDATION: &str = "VALIDATION";

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WidgetError {
    /// Widget or item missing.
    #[error("not found: {0}")]
    NotFound(String),

    /// Status id not present in the widget's catalog.
    #[error("invalid status: {0}")]
    InvalidStatus(String),

    /// The server answered `ok=false` with a code we do not map.
    #[error("api error {code}: {message}")]
    Api { code: String, message: String },

    /// Network failure or a body that is not a well-formed envelope.
    #[error("transport error: {0}")]
    Transport(String),

    /// Malformed catalog or seed data.
    #[error("validation error: {0}")]
    Validation(String),
}

impl WidgetError {
    /// Build the typed error for an `ok=false` envelope.
    pub fn from_api(code: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            CODE_NOT_FOUND => WidgetError::NotFound(message),
            CODE_BAD_STATUS => WidgetError::InvalidStatus(message),
            CODE_TRANSPORT => WidgetError::Transport(message),
            CODE_VALIDATION => WidgetError::Validation(message),
            _ => WidgetError::Api {
                code: code.to_string(),
                message,
            },
        }
    }

    /// Wire code used in `error.code`.
    pub fn code(&self) -> &str {
        match self {
            WidgetError::NotFound(_) => CODE_NOT_FOUND,
            WidgetError::InvalidStatus(_) => CODE_BAD_STATUS,
            WidgetError::Api { code, .. } => code,
            WidgetError::Transport(_) => CODE_TRANSPORT,
            WidgetError::Validation(_) => CODE_VALIDATION,
        }
    }

    /// Human-readable message without the category prefix.
    pub fn message(&self) -> &str {
        match self {
            WidgetError::NotFound(m)
            | WidgetError::InvalidStatus(m)
            | WidgetError::Transport(m)
            | WidgetError::Validation(m) => m,
            WidgetError::Api { message, .. } => message,
        }
    }
}

pub type WidgetResult<T> = std::result::Result<T, WidgetError>;
