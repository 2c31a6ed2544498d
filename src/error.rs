//! Error types.
//!
//! Every client call and the demo runner return [`KrakenError`]. Kraken
//! answers most failures with HTTP 200 and an `error` array in the body;
//! those arrive as [`KrakenError::Api`], or [`KrakenError::RateLimitExceeded`]
//! when the message names a rate limit.

use thiserror::Error;

/// Anything that can stop a request or the report.
#[derive(Error, Debug)]
pub enum KrakenError {
    /// Transport failure while reading the body
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Transport failure inside the middleware stack
    #[error("HTTP request failed: {0}")]
    HttpMiddleware(#[from] reqwest_middleware::Error),

    /// Writing the report failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Kraken listed an error in the response envelope
    #[error("Kraken API error: {0}")]
    Api(ApiError),

    /// Kraken refused the call with a rate-limit error
    #[error("Rate limit exceeded, retry after {retry_after_ms:?}ms")]
    RateLimitExceeded {
        /// Suggested wait time in milliseconds, when known
        retry_after_ms: Option<u64>,
    },

    /// The body was not an envelope, had no result, or lacked an expected key
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// A request parameter was rejected before anything was sent
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// One entry of Kraken's `error` array, split at the first `:`.
///
/// `"EQuery:Unknown asset pair"` becomes code `EQuery`, message
/// `Unknown asset pair`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Category, such as `EGeneral`, `EAPI`, `EQuery` or `EService`
    pub code: String,
    /// Text after the category
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl ApiError {
    /// Build an error from its two halves.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// First entry of an `error` array, or `None` when the array is empty.
    ///
    /// Entries without a category are kept whole under code `Unknown`.
    pub fn from_error_array(errors: &[String]) -> Option<Self> {
        let first = errors.first()?;
        Some(match first.split_once(':') {
            Some((code, message)) => Self::new(code, message),
            None => Self::new("Unknown", first.as_str()),
        })
    }

    /// Whether Kraken is throttling this caller.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self.code.as_str(), "EAPI" | "EOrder") && self.message.contains("Rate limit")
    }
}
