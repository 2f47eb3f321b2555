/// Convenience result type used across huplo.
pub type HuploResult<T> = Result<T, HuploError>;

/// Top-level error taxonomy used by overlay APIs.
///
/// None of these ever escape the per-frame draw entry points; they are logged and
/// isolated to the message or queue that produced them.
#[derive(thiserror::Error, Debug)]
pub enum HuploError {
    /// Invalid caller-provided values.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while building or advancing animation chains.
    #[error("animation error: {0}")]
    Animation(String),

    /// Malformed queue or overlay configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Errors while laying out or painting text.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HuploError {
    /// Build a [`HuploError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`HuploError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`HuploError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`HuploError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`HuploError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for HuploError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
