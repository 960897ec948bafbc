//! Error taxonomy for the marketplace crates.
//!
//! Domain failures (catalog unavailable, unknown template, closed session)
//! sit beside the transport failures raised by the catalog HTTP client.
//! Every variant carries a stable machine code and a recoverability flag
//! that front ends use to decide between an inline error and aborting.

use serde::Serialize;
use thiserror::Error;

/// Errors raised by catalog, pricing and deployment operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The catalog could not be fetched or decoded
    #[error("Catalog source unavailable: {0}")]
    SourceUnavailable(String),

    /// A deploy flow referenced an app id absent from the loaded catalog
    #[error("App template not found: {0}")]
    TemplateNotFound(String),

    /// An edit was attempted while no deployment session is open
    #[error("No deployment session is open")]
    SessionClosed,

    /// The catalog API answered with a transient failure
    #[error("Catalog service unavailable: {0}")]
    ServiceUnavailable(String),

    /// A response body did not match the expected shape
    #[error("Malformed catalog data: {0}")]
    ParseError(String),

    /// Client settings were rejected
    #[error("Invalid client configuration: {0}")]
    ConfigError(String),

    /// The catalog API answered with an unexpected status
    #[error("Catalog request failed: {0}")]
    HttpError(String),

    /// The catalog API did not answer in time
    #[error("Catalog request timed out: {0}")]
    Timeout(String),

    /// The catalog API answered 404
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad input to an operation
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A validated structure failed its constraints
    #[error("Validation failed: {0}")]
    ValidationError(String),

    /// The catalog cache could not be read or written
    #[error("Catalog cache error: {0}")]
    CacheError(String),

    /// A URL could not be built
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Result alias over [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Serializable summary of an [`Error`] for front ends.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorReport {
    /// Stable machine code, e.g. `TEMPLATE_NOT_FOUND`.
    pub code: &'static str,
    /// Human-readable message.
    pub message: String,
    /// Whether the surface can stay up and offer a retry or close action.
    pub recoverable: bool,
}

impl Error {
    /// Stable machine code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::SourceUnavailable(_) => "SOURCE_UNAVAILABLE",
            Self::TemplateNotFound(_) => "TEMPLATE_NOT_FOUND",
            Self::SessionClosed => "SESSION_CLOSED",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::ParseError(_) => "PARSE_ERROR",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
        }
    }

    /// Listings show an inline error and deploy flows a "not found" panel
    /// for these; anything else is a programming or configuration fault.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::SourceUnavailable(_)
                | Self::TemplateNotFound(_)
                | Self::Timeout(_)
                | Self::ServiceUnavailable(_)
        )
    }

    /// Summarize for display or serialization.
    #[must_use]
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            code: self.error_code(),
            message: self.to_string(),
            recoverable: self.is_recoverable(),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let message = err.to_string();
        if err.is_timeout() {
            Self::Timeout(message)
        } else if err.is_connect() {
            Self::ServiceUnavailable(message)
        } else if err.is_decode() {
            Self::ParseError(message)
        } else {
            Self::HttpError(message)
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ValidationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_have_stable_codes() {
        let cases = [
            (Error::SourceUnavailable(String::new()), "SOURCE_UNAVAILABLE"),
            (Error::TemplateNotFound(String::new()), "TEMPLATE_NOT_FOUND"),
            (Error::SessionClosed, "SESSION_CLOSED"),
            (Error::InvalidRequest(String::new()), "INVALID_REQUEST"),
        ];
        for (err, code) in cases {
            assert_eq!(err.error_code(), code);
        }
    }

    #[test]
    fn messages_name_the_subject() {
        assert_eq!(
            Error::TemplateNotFound("wordpress".to_string()).to_string(),
            "App template not found: wordpress"
        );
        assert_eq!(
            Error::SourceUnavailable("connection refused".to_string()).to_string(),
            "Catalog source unavailable: connection refused"
        );
        assert_eq!(
            Error::SessionClosed.to_string(),
            "No deployment session is open"
        );
    }

    #[test]
    fn recoverability() {
        assert!(Error::SourceUnavailable("x".to_string()).is_recoverable());
        assert!(Error::TemplateNotFound("x".to_string()).is_recoverable());
        assert!(Error::Timeout("x".to_string()).is_recoverable());
        assert!(!Error::SessionClosed.is_recoverable());
        assert!(!Error::ConfigError("x".to_string()).is_recoverable());
    }

    #[test]
    fn report_serializes_code_and_flag() {
        let report = Error::TemplateNotFound("ghost".to_string()).report();
        assert_eq!(report.code, "TEMPLATE_NOT_FOUND");
        assert!(report.recoverable);

        let json = serde_json::to_value(Error::SessionClosed.report()).unwrap();
        assert_eq!(json["code"], "SESSION_CLOSED");
        assert_eq!(json["recoverable"], false);
    }

    #[test]
    fn conversions() {
        let err: Error = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, Error::InvalidEndpoint(_)));

        let err: Error = serde_json::from_str::<serde_json::Value>("{oops")
            .unwrap_err()
            .into();
        assert!(matches!(err, Error::ParseError(_)));
    }
}
