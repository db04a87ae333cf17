//! Error types for the Emarsys client
//!
//! Every public API returns `Result<T, Error>`. Errors that originate from a
//! response always keep the HTTP status and the raw body bytes so callers can
//! log or re-parse them.

use bytes::Bytes;
use std::fmt;
use thiserror::Error;

/// Application-level failure reported inside a response envelope
///
/// Produced when the HTTP status is not 200, or when a 200 response carries a
/// non-zero reply code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status set by the transport
    pub status: u16,
    /// Reply code from the envelope (0 means success)
    pub reply_code: i64,
    /// Human-readable reply text from the envelope
    pub reply_text: String,
    /// The untouched response body
    pub body: Bytes,
    has_data: bool,
}

impl ApiError {
    /// Create a new API error
    pub fn new(
        status: u16,
        reply_code: i64,
        reply_text: impl Into<String>,
        body: Bytes,
        has_data: bool,
    ) -> Self {
        Self {
            status,
            reply_code,
            reply_text: reply_text.into(),
            body,
            has_data,
        }
    }

    /// Whether the envelope carried a `data` member
    pub fn has_data(&self) -> bool {
        self.has_data
    }

    /// Body as lossy UTF-8, for logging
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HTTP {}: replyCode {} replyText {:?}",
            self.status, self.reply_code, self.reply_text
        )?;
        if self.has_data {
            write!(f, " (with data)")?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// The main error type for the client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    /// Invalid or inconsistent configuration
    #[error("Configuration error: {message}")]
    Config {
        /// What was wrong
        message: String,
    },

    /// A required setting was not provided
    #[error("Missing required config field: {field}")]
    MissingConfigField {
        /// Name of the missing setting
        field: String,
    },

    /// A setting had an unusable value
    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue {
        /// Name of the setting
        field: String,
        /// Why the value was rejected
        message: String,
    },

    /// Base URL or endpoint did not parse
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request body could not be serialized
    #[error("Failed to serialize JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Transport Errors
    // ============================================================================
    /// reqwest failed to send or read
    #[error("Failed to execute HTTP request: {0}")]
    Http(#[from] reqwest::Error),

    /// A custom transport failed
    #[error("Transport failed: {message}")]
    Transport {
        /// Failure reported by the transport
        message: String,
    },

    // ============================================================================
    // Response Errors
    // ============================================================================
    /// Body was not a valid envelope
    #[error("Failed to decode response envelope (HTTP {status}): {source}")]
    EnvelopeDecode {
        /// HTTP status of the response
        status: u16,
        /// The untouched response body
        body: Bytes,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Non-200 status or non-zero reply code
    #[error(transparent)]
    Api(#[from] ApiError),

    /// `data` did not match the requested type
    #[error("Failed to decode response data (HTTP {status}): {source}")]
    PayloadDecode {
        /// HTTP status of the response
        status: u16,
        /// The untouched response body
        body: Bytes,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    /// I/O failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything else
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a transport error for custom transports
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// HTTP status of the response that caused this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api(api) => Some(api.status),
            Error::EnvelopeDecode { status, .. } | Error::PayloadDecode { status, .. } => {
                Some(*status)
            }
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Raw response body, if the error came from a response
    pub fn body(&self) -> Option<&Bytes> {
        match self {
            Error::Api(api) => Some(&api.body),
            Error::EnvelopeDecode { body, .. } | Error::PayloadDecode { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Application reply code, if the envelope decoded
    pub fn reply_code(&self) -> Option<i64> {
        match self {
            Error::Api(api) => Some(api.reply_code),
            _ => None,
        }
    }

    /// Check if this error is retryable
    ///
    /// Only non-200 responses are retried. A 200 with a bad envelope, a
    /// non-zero reply code or an undecodable payload is permanent, and so is
    /// every transport failure.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Api(api) => api.status != 200,
            Error::EnvelopeDecode { status, .. } => *status != 200,
            _ => false,
        }
    }
}

/// Result type alias for the client
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn json_error() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("{not json").unwrap_err()
    }

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_field("credentials");
        assert_eq!(err.to_string(), "Missing required config field: credentials");

        let err = Error::transport("connection reset");
        assert_eq!(err.to_string(), "Transport failed: connection reset");
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError::new(200, 1003, "Invalid date", Bytes::new(), false);
        assert_eq!(
            err.to_string(),
            "HTTP 200: replyCode 1003 replyText \"Invalid date\""
        );

        let err = ApiError::new(400, 2004, "Bad field", Bytes::new(), true);
        assert!(err.to_string().ends_with("(with data)"));
        assert_eq!(Error::Api(err.clone()).to_string(), err.to_string());
    }

    #[test_case(400, true ; "bad request retried")]
    #[test_case(503, true ; "unavailable retried")]
    #[test_case(200, false ; "http 200 reply code is permanent")]
    fn test_api_error_retryable(status: u16, expected: bool) {
        let err = Error::Api(ApiError::new(status, 1, "x", Bytes::new(), false));
        assert_eq!(err.is_retryable(), expected);
    }

    #[test_case(500, true ; "non 200 garbage retried")]
    #[test_case(200, false ; "200 garbage permanent")]
    fn test_envelope_decode_retryable(status: u16, expected: bool) {
        let err = Error::EnvelopeDecode {
            status,
            body: Bytes::from_static(b"{not json"),
            source: json_error(),
        };
        assert_eq!(err.is_retryable(), expected);
    }

    #[test]
    fn test_permanent_errors() {
        assert!(!Error::transport("refused").is_retryable());
        assert!(!Error::config("bad").is_retryable());
        assert!(!Error::PayloadDecode {
            status: 200,
            body: Bytes::new(),
            source: json_error(),
        }
        .is_retryable());
    }

    #[test]
    fn test_accessors() {
        let body = Bytes::from_static(br#"{"replyCode":1,"replyText":"x"}"#);
        let err = Error::Api(ApiError::new(404, 1, "x", body.clone(), false));
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.body(), Some(&body));
        assert_eq!(err.reply_code(), Some(1));

        let err = Error::EnvelopeDecode {
            status: 502,
            body: body.clone(),
            source: json_error(),
        };
        assert_eq!(err.status(), Some(502));
        assert_eq!(err.body(), Some(&body));
        assert_eq!(err.reply_code(), None);

        assert_eq!(Error::config("x").status(), None);
        assert_eq!(Error::config("x").body(), None);
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }

    #[test]
    fn test_result_with_context() {
        let result: std::result::Result<(), serde_json::Error> = Err(json_error());
        let err = result
            .with_context(|| format!("parsing {}", "body"))
            .unwrap_err();
        assert!(matches!(err, Error::Other(ref m) if m.starts_with("parsing body: Failed to serialize JSON")));
    }
}
