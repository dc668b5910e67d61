/// Convenience result type used across the crate.
pub type CountUpResult<T> = Result<T, CountUpError>;

/// Top-level error taxonomy used by controller, manager and host APIs.
#[derive(thiserror::Error, Debug)]
pub enum CountUpError {
    /// Element content or resolved options that cannot drive an animation.
    #[error("validation error: {0}")]
    Validation(String),

    /// Malformed configuration (attributes, overrides, page descriptions).
    #[error("config error: {0}")]
    Config(String),

    /// The host document refused an operation or lost track of an element.
    #[error("host error: {0}")]
    Host(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CountUpError {
    /// Build a [`CountUpError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CountUpError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`CountUpError::Host`] value.
    pub fn host(msg: impl Into<String>) -> Self {
        Self::Host(msg.into())
    }

    /// Build a [`CountUpError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for CountUpError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
