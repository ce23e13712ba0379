//! Successful responses and their transport details.

use http::StatusCode;
use std::time::Duration;
use url::Url;

/// A decoded response together with how it was obtained.
///
/// Dereferences to `data`, so `response.docs` works on a
/// `Response<Page<T>>`.
///
/// ```no_run
/// use one_api::{Client, Token};
/// use one_api::endpoint::Endpoint;
/// use one_api::model::Movie;
///
/// # async fn example() -> Result<(), one_api::Error> {
/// let client = Client::new()?;
/// let response = client
///     .fetch::<Movie>(&Token::new("secret"), Endpoint::Movies(None), None)
///     .await?;
///
/// println!("GET {} took {:?}", response.url, response.latency);
/// for movie in &response.docs {
///     println!("{}", movie.name);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Response<T> {
    /// The decoded body.
    pub data: T,

    /// The body as received, before decoding.
    pub raw_body: String,

    pub status: StatusCode,

    /// The final request URL, query string included.
    pub url: Url,

    /// Time from the first attempt to the decoded response, retries included.
    pub latency: Duration,

    /// Number of attempts; `1` unless the client retried.
    pub attempts: usize,
}

impl<T> Response<T> {
    pub fn new(
        data: T,
        raw_body: String,
        status: StatusCode,
        url: Url,
        latency: Duration,
        attempts: usize,
    ) -> Self {
        Self {
            data,
            raw_body,
            status,
            url,
            latency,
            attempts,
        }
    }

    /// Transforms the decoded body, keeping the transport details.
    ///
    /// ```
    /// # use one_api::Response;
    /// # use http::StatusCode;
    /// # use std::time::Duration;
    /// let response = Response::new(
    ///     vec!["The Two Towers".to_string()],
    ///     String::new(),
    ///     StatusCode::OK,
    ///     "https://the-one-api.dev/v2/book".parse().unwrap(),
    ///     Duration::from_millis(80),
    ///     1,
    /// );
    ///
    /// let count = response.map(|names| names.len());
    /// assert_eq!(count.data, 1);
    /// ```
    pub fn map<U, F>(self, f: F) -> Response<U>
    where
        F: FnOnce(T) -> U,
    {
        Response {
            data: f(self.data),
            raw_body: self.raw_body,
            status: self.status,
            url: self.url,
            latency: self.latency,
            attempts: self.attempts,
        }
    }

    /// Returns `true` if the request needed more than one attempt.
    pub fn was_retried(&self) -> bool {
        self.attempts > 1
    }

    /// Discards the transport details.
    pub fn into_inner(self) -> T {
        self.data
    }
}

impl<T> AsRef<T> for Response<T> {
    fn as_ref(&self) -> &T {
        &self.data
    }
}

impl<T> std::ops::Deref for Response<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}
