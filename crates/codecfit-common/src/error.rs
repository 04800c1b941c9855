//! Common error types used throughout codecfit.
//!
//! Normalization itself never fails; every variant here comes from
//! loading rule data. The CLI reports bad input documents on its own.

use std::path::PathBuf;

/// Common error type for codecfit.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Rule data could not be parsed or is missing a required key.
    #[error("Rule data error: {0}")]
    RuleData(String),

    /// A configured rule data file does not exist.
    #[error("Rule data file not found: {}", .0.display())]
    RuleDataMissing(PathBuf),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new RuleData error.
    pub fn rule_data<S: Into<String>>(msg: S) -> Self {
        Self::RuleData(msg.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::rule_data("missing field `allContainers`");
        assert_eq!(
            err.to_string(),
            "Rule data error: missing field `allContainers`"
        );

        let err = Error::RuleDataMissing(PathBuf::from("/etc/codecfit/rules.json"));
        assert_eq!(
            err.to_string(),
            "Rule data file not found: /etc/codecfit/rules.json"
        );
    }

    #[test]
    fn test_io_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.to_string(), "IO error: denied");
    }

    #[test]
    fn test_result_alias() {
        fn ok_fn() -> Result<u8> {
            Ok(7)
        }
        assert_eq!(ok_fn().unwrap(), 7);

        fn err_fn() -> Result<u8> {
            Err(Error::rule_data("boom"))
        }
        assert!(err_fn().is_err());
    }
}
