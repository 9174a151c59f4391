/// Convenience result type used across Proofreel.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Top-level error taxonomy used by pipeline APIs.
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    /// Invalid options, identifiers or paths.
    #[error("validation error: {0}")]
    Validation(String),

    /// A proof-description file that could not be parsed.
    #[error("proof payload error: {0}")]
    Payload(String),

    /// The external renderer failed for one scene.
    #[error("render error: {0}")]
    Render(String),

    /// An existing manifest is structurally unusable.
    #[error("manifest error: {0}")]
    Manifest(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CatalogError {
    /// Build a [`CatalogError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CatalogError::Payload`] value.
    pub fn payload(msg: impl Into<String>) -> Self {
        Self::Payload(msg.into())
    }

    /// Build a [`CatalogError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`CatalogError::Manifest`] value.
    pub fn manifest(msg: impl Into<String>) -> Self {
        Self::Manifest(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
