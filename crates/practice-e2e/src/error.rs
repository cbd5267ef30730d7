// Error types for practice-e2e

use thiserror::Error;

/// Result type alias for page object, report and flow operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving the practice application
#[derive(Debug, Error)]
pub enum Error {
    /// Timeout waiting for an element or notification
    ///
    /// This is the expected-absence case: the thing being waited for did not
    /// show up in time. Page primitives turn it into `false`.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Fault reported by the browser driver (anything other than a timeout)
    #[error("Driver error: {0}")]
    Driver(String),

    /// A step of a compound page operation did not complete
    ///
    /// Carries the page object name and the step that failed, so the report
    /// shows exactly where a form submission stopped.
    #[error("{page}: failed to {action}")]
    ActionFailed { page: &'static str, action: String },

    /// Scenario post-condition did not hold (URL, notification text, ...)
    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    /// Reporting sink failed to record a step or attachment
    #[error("Report error: {0}")]
    Report(String),

    /// Configuration could not be loaded or is incomplete
    #[error("Configuration error: {0}")]
    Config(String),

    /// The log bridge is already attached for this session
    #[error("Log bridge is already installed")]
    LogBridgeActive,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error with additional context
    #[error("{0}: {1}")]
    Context(String, #[source] Box<Error>),
}

impl Error {
    /// Adds context to the error
    pub fn context(self, msg: impl Into<String>) -> Self {
        Error::Context(msg.into(), Box::new(self))
    }

    /// Returns true for the expected-absence case (a wait that ran out).
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::Timeout(_) => true,
            Error::Context(_, inner) => inner.is_timeout(),
            _ => false,
        }
    }
}
