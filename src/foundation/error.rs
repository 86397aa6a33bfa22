/// Convenience result type used across lineart.
pub type LineartResult<T> = Result<T, LineartError>;

/// Top-level error taxonomy used by the simulation, compositing and encoding APIs.
#[derive(thiserror::Error, Debug)]
pub enum LineartError {
    /// Bad dimensions, non-positive rates/speeds/distances, negative coordinates and other
    /// caller-supplied values that are rejected before any work starts.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An image, video or font could not be opened or decoded, or an encoder could not start.
    #[error("resource error: {0}")]
    Resource(String),

    /// Failures while composing or encoding frames of a run that already started.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LineartError {
    /// Build a [`LineartError::InvalidConfig`] value.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Build a [`LineartError::Resource`] value.
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    /// Build a [`LineartError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Return `true` for the invalid-configuration class.
    pub fn is_invalid_config(&self) -> bool {
        matches!(self, Self::InvalidConfig(_))
    }

    /// Return `true` for the resource class.
    pub fn is_resource(&self) -> bool {
        matches!(self, Self::Resource(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
