//! Error types for the motion compensation pipeline

use thiserror::Error;

pub type MCResult<T> = Result<T, MCError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MCError {
    /// Invalid tunable, e.g. a filter cascade order outside [1, 3].
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A configured value could not be converted to the requested type.
    #[error("unable to parse value '{value}' for key {key}: {reason}")]
    Parse {
        key: String,
        value: String,
        reason: String,
    },

    /// No value stored for the key.
    #[error("no value found for key {0}")]
    MissingValue(String),

    /// The pose source could not resolve a pose for the requested time.
    #[error("pose source unavailable: {0}")]
    SourceUnavailable(String),

    /// The reference pose could not be captured.
    #[error("calibration failed: {0}")]
    CalibrationFailure(String),

    /// The out-of-process tracking feed is not open or returned no data.
    #[error("external feed unavailable: {0}")]
    FeedUnavailable(String),
}

impl MCError {
    /// Errors worth retrying on the next frame.
    pub fn is_recoverable(&self) -> bool {
        match *self {
            MCError::SourceUnavailable(_)
            | MCError::CalibrationFailure(_)
            | MCError::FeedUnavailable(_) => true,
            _ => false,
        }
    }
}
