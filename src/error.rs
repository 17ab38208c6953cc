use thiserror::Error;

/// Errors surfaced by configuration loading and UI-facing setters.
///
/// The per-frame animation path never produces these; ignored requests and
/// unresolved collisions are logged instead.
#[derive(Debug, Error)]
pub enum RigError {
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Invalid color '{0}' (expected #rgb or #rrggbb)")]
    InvalidColor(String),

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Unknown color slot: {0}")]
    UnknownColorSlot(String),

    #[error("Unknown feature toggle: {0}")]
    UnknownFeature(String),
}

impl RigError {
    pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RigError>;
