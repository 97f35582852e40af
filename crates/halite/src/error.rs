use std::sync::Arc;
use thiserror::Error;

/// Result type for halite operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while declaring schemas or presenting resources
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// A schema declaration is unusable (raised at definition time)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A resource does not expose the requested attribute
    #[error("Unknown attribute '{attribute}' on {resource}")]
    UnknownAttribute { resource: String, attribute: String },

    /// Virtual attributes that depend on themselves
    #[error("Cyclic virtual attribute: {0}")]
    CyclicAttribute(String),

    /// A value that has no document representation
    #[error("Cannot present value: {0}")]
    Unpresentable(String),

    /// Failure raised from user supplied handler code
    #[error("Handler error: {0}")]
    Handler(String),

    #[error("JSON error: {0}")]
    Json(#[source] Arc<serde_json::Error>),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(Arc::new(err))
    }
}

impl Error {
    pub fn unknown_attribute(resource: impl Into<String>, attribute: impl Into<String>) -> Self {
        Error::UnknownAttribute {
            resource: resource.into(),
            attribute: attribute.into(),
        }
    }

    /// Wrap an arbitrary failure from handler code
    pub fn handler(message: impl std::fmt::Display) -> Self {
        Error::Handler(message.to_string())
    }
}
