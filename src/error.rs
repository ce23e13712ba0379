//! Error types for API calls.
//!
//! The resource methods on [`Client`](crate::Client) collapse every failure to
//! `None`. [`Client::fetch`](crate::Client::fetch) returns these errors
//! instead, for callers that need to tell a missing document from an outage.

use http::StatusCode;

/// Everything that can go wrong between building a request URL and decoding
/// the response.
///
/// # Examples
///
/// ```no_run
/// use one_api::{Client, Error, Token};
/// use one_api::endpoint::Endpoint;
/// use one_api::model::Book;
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::new()?;
/// let token = Token::new("secret");
///
/// match client.fetch::<Book>(&token, Endpoint::Books(None), None).await {
///     Ok(response) => println!("{} books", response.data.total),
///     Err(Error::HttpError { status, raw_response }) => {
///         eprintln!("HTTP error {}: {}", status, raw_response);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The request never produced a response (connection refused, DNS, TLS...).
    #[error("Network error: {0}")]
    Network(reqwest::Error),

    /// The request exceeded the timeout configured on the client.
    #[error("Request timed out")]
    Timeout,

    /// The response body was not the expected JSON document.
    ///
    /// Keeps the raw body so the mismatch can be inspected.
    #[error("Failed to deserialize response (status {status}): {serde_error}")]
    DeserializationFailed {
        /// The raw response body
        raw_response: String,
        /// The serde error message
        serde_error: String,
        /// The HTTP status code
        status: StatusCode,
    },

    /// The server answered with a status other than `200 OK`.
    #[error("HTTP error {status}: {raw_response}")]
    HttpError {
        /// The HTTP status code
        status: StatusCode,
        /// The raw response body
        raw_response: String,
    },

    /// The client or a request was configured with an unusable value, such
    /// as a token that is not a valid header value.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Every attempt allowed by the retry strategy failed.
    #[error("Max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded {
        /// The number of attempts made
        attempts: usize,
        /// The error from the final attempt
        last_error: Box<Error>,
    },

    /// The base URL, path and query did not form a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else {
            Error::Network(err)
        }
    }
}

impl Error {
    /// Returns `true` if repeating the request could succeed.
    ///
    /// Network errors, timeouts, 5xx responses and `429 Too Many Requests`
    /// are retryable. Other 4xx responses and bad payloads are not.
    ///
    /// ```
    /// use one_api::Error;
    /// use http::StatusCode;
    ///
    /// let err = Error::HttpError {
    ///     status: StatusCode::TOO_MANY_REQUESTS,
    ///     raw_response: "Too many requests, please try again later.".to_string(),
    /// };
    /// assert!(err.is_retryable());
    ///
    /// let err = Error::HttpError {
    ///     status: StatusCode::UNAUTHORIZED,
    ///     raw_response: "Unauthorized.".to_string(),
    /// };
    /// assert!(!err.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network(_) | Error::Timeout => true,
            Error::HttpError { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            Error::DeserializationFailed { .. }
            | Error::ConfigurationError(_)
            | Error::MaxRetriesExceeded { .. }
            | Error::InvalidUrl(_) => false,
        }
    }

    /// The HTTP status of the response that caused this error, if there was one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::HttpError { status, .. } => Some(*status),
            Error::DeserializationFailed { status, .. } => Some(*status),
            Error::MaxRetriesExceeded { last_error, .. } => last_error.status(),
            _ => None,
        }
    }

    /// The raw body of the response that caused this error, if there was one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::HttpError { raw_response, .. } => Some(raw_response),
            Error::DeserializationFailed { raw_response, .. } => Some(raw_response),
            Error::MaxRetriesExceeded { last_error, .. } => last_error.raw_response(),
            _ => None,
        }
    }
}

/// A specialized `Result` type for API calls.
pub type Result<T> = std::result::Result<T, Error>;
