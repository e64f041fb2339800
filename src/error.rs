use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the router
#[derive(Error, Debug)]
pub enum Error {
    /// A wildcard segment was registered where a differently named
    /// wildcard already exists at the same depth.
    #[error("wildcard '{conflicting}' in '{path}' conflicts with existing wildcard '{existing}'")]
    ConflictingWildcard {
        path: String,
        existing: String,
        conflicting: String,
    },

    #[error("Handler error: {0}")]
    Handler(String),

    #[error("HTTP error: {0}")]
    Http(#[from] hyper::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    // Error with context chain
    #[error("{message}")]
    WithContext {
        message: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub fn handler(msg: impl Into<String>) -> Self {
        Self::Handler(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    // Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            message: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::ConflictingWildcard { .. } => "E_ROUTE_CONFLICT",
            Error::Handler(_) => "E_HANDLER",
            Error::Http(_) => "E_HTTP",
            Error::Json(_) => "E_JSON",
            Error::Io(_) => "E_IO",
            Error::Config(_) => "E_CONFIG",
            Error::Internal(_) => "E_INTERNAL",
            Error::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Get HTTP status code for the error
    pub fn status_code(&self) -> u16 {
        match self {
            Error::WithContext { source, .. } => source.status_code(),
            _ => 500,
        }
    }
}
