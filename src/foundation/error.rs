/// Convenience result type used across flarefx.
pub type FxResult<T> = Result<T, FxError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Lookup misses (unknown effect names, deleted batches) are not represented here;
/// they surface as `false`, `None` or an invalid [`crate::ItemHandle`].
#[derive(thiserror::Error, Debug)]
pub enum FxError {
    /// Malformed or incomplete effect, texture or template definition.
    #[error("definition error: {0}")]
    Definition(String),

    /// Rejected structural edit of the scene graph.
    #[error("scene error: {0}")]
    Scene(String),

    /// Invalid keyframe track data.
    #[error("animation error: {0}")]
    Animation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FxError {
    /// Build a [`FxError::Definition`] value.
    pub fn definition(msg: impl Into<String>) -> Self {
        Self::Definition(msg.into())
    }

    /// Build a [`FxError::Scene`] value.
    pub fn scene(msg: impl Into<String>) -> Self {
        Self::Scene(msg.into())
    }

    /// Build a [`FxError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`FxError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
