//! Unified error type for feederfix.
//!
//! Library crates return [`FeederResult`]; binaries and the I/O layer wrap it
//! in `anyhow` where they add file context.
//!
//! # Example
//!
//! ```ignore
//! use feederfix_core::{FeederError, FeederResult};
//!
//! fn resolve(study: &mut Study) -> FeederResult<()> {
//!     let feeder = study.single_feeder_mut()?;
//!     run_resolver(feeder)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Unified error type for all feederfix operations.
#[derive(Error, Debug)]
pub enum FeederError {
    /// I/O errors (file access, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Data validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors (including "exactly one network must be loaded")
    #[error("Configuration error: {0}")]
    Config(String),

    /// Lookups against the network model that found nothing
    #[error("Network error: {0}")]
    Network(String),

    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Results using FeederError.
pub type FeederResult<T> = Result<T, FeederError>;

impl From<anyhow::Error> for FeederError {
    fn from(err: anyhow::Error) -> Self {
        FeederError::Other(err.to_string())
    }
}

impl From<String> for FeederError {
    fn from(s: String) -> Self {
        FeederError::Other(s)
    }
}

impl From<&str> for FeederError {
    fn from(s: &str) -> Self {
        FeederError::Other(s.to_string())
    }
}

impl From<serde_json::Error> for FeederError {
    fn from(err: serde_json::Error) -> Self {
        FeederError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FeederError::Config("no circuit loaded".into());
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("no circuit loaded"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: FeederError = io_err.into();
        assert!(matches!(err, FeederError::Io(_)));
    }

    #[test]
    fn test_question_mark_operator() {
        fn inner() -> FeederResult<()> {
            Err(FeederError::Network("unknown section 'S9'".into()))
        }

        fn outer() -> FeederResult<()> {
            inner()?;
            Ok(())
        }

        assert!(matches!(outer(), Err(FeederError::Network(_))));
    }
}
