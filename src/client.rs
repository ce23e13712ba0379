//! The API client and its resource methods.
//!
//! [`Client`] exposes one method per resource. Each method encodes the
//! request [`Options`], issues an authenticated GET and returns the decoded
//! [`Page`], or `None` if anything went wrong. [`Client::fetch`] is the same
//! request with the error kept.

use crate::{
    endpoint::Endpoint,
    model::{BookChapters, Books, Chapters, Characters, Movies, Page, Quotes},
    query::{self, Options},
    retry::{RetryOnRetryable, RetryPredicate, RetryStrategy},
    Error, Response, Result,
};
use http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Origin and version prefix of the public API.
pub const DEFAULT_BASE_URL: &str = "https://the-one-api.dev/v2";

/// Environment variable read by [`Token::from_env`].
pub const TOKEN_ENV_VAR: &str = "ONE_API_TOKEN";

/// A bearer token for the API.
///
/// The token is supplied per call and never stored by the client. Its
/// `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Reads the token from the `ONE_API_TOKEN` environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigurationError`] if the variable is unset or empty.
    pub fn from_env() -> Result<Self> {
        match std::env::var(TOKEN_ENV_VAR) {
            Ok(token) if !token.trim().is_empty() => Ok(Self(token.trim().to_string())),
            _ => Err(Error::ConfigurationError(format!(
                "{TOKEN_ENV_VAR} is not set"
            ))),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn authorization(&self) -> Result<HeaderValue> {
        let mut value = HeaderValue::try_from(format!("Bearer {}", self.0))
            .map_err(|e| Error::ConfigurationError(format!("Invalid token: {}", e)))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(<redacted>)")
    }
}

impl From<String> for Token {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for Token {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

/// A client for The One API.
///
/// Cheap to clone; clones share the connection pool and configuration.
///
/// # Examples
///
/// ```no_run
/// use one_api::{Client, Token};
/// use one_api::query::{Direction, Filter, Options};
///
/// # async fn example() -> Result<(), one_api::Error> {
/// let client = Client::new()?;
/// let token = Token::from_env()?;
///
/// let options = Options::new()
///     .limit(5)
///     .sort(Direction::Ascending, "name")
///     .filter(Filter::matching("race", "Hobbit"));
///
/// if let Some(hobbits) = client.characters(&token, None, Some(&options)).await {
///     for hobbit in hobbits {
///         println!("{}", hobbit.name);
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    base_url: String,
    default_headers: HeaderMap,
    retry_strategy: RetryStrategy,
    retry_predicate: Box<dyn RetryPredicate>,
    timeout: Option<Duration>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.inner.base_url)
            .field("retry_strategy", &self.inner.retry_strategy)
            .field("timeout", &self.inner.timeout)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client for [`DEFAULT_BASE_URL`] with no timeout and no
    /// retries.
    pub fn new() -> Result<Self> {
        ClientBuilder::new().build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// The base URL every path is appended to, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Builds the full request URL for `endpoint` with `options` encoded as
    /// its query string.
    ///
    /// The document id is a single path segment: `/`, `?` and `#` inside it
    /// are percent-encoded. Filter values keep the encoder's syntax, and
    /// characters a query cannot carry (`#`, `<`, `>`, spaces) are
    /// percent-encoded.
    ///
    /// ```
    /// use one_api::Client;
    /// use one_api::endpoint::Endpoint;
    /// use one_api::query::Options;
    ///
    /// # fn main() -> Result<(), one_api::Error> {
    /// let client = Client::new()?;
    /// let url = client.url_for(Endpoint::Books(None), Some(&Options::new().limit(2)))?;
    /// assert_eq!(url.as_str(), "https://the-one-api.dev/v2/book?limit=2");
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigurationError`] for an id that is empty, `.` or
    /// `..`, since none of those can name a document.
    pub fn url_for(&self, endpoint: Endpoint<'_>, options: Option<&Options>) -> Result<Url> {
        if let Some(id) = endpoint.id() {
            if matches!(id, "" | "." | "..") {
                return Err(Error::ConfigurationError(format!(
                    "Invalid document id: {:?}",
                    id
                )));
            }
        }

        let mut url = Url::parse(&self.inner.base_url)?;
        url.path_segments_mut()
            .map_err(|_| {
                Error::ConfigurationError(format!(
                    "Base URL cannot carry a path: {}",
                    self.inner.base_url
                ))
            })?
            .pop_if_empty()
            .extend(endpoint.segments());

        let fragment = query::encode(options);
        if let Some(pairs) = fragment.strip_prefix('?') {
            url.set_query(Some(pairs));
        }
        Ok(url)
    }

    /// Fetches one page of documents from `endpoint`.
    ///
    /// This is what every resource method calls. Unlike them it reports
    /// failures: a non-200 status is [`Error::HttpError`] and a body that
    /// does not decode as `Page<T>` is [`Error::DeserializationFailed`].
    ///
    /// Retries follow the client's [`RetryStrategy`] and [`RetryPredicate`].
    pub async fn fetch<T>(
        &self,
        token: &Token,
        endpoint: Endpoint<'_>,
        options: Option<&Options>,
    ) -> Result<Response<Page<T>>>
    where
        T: DeserializeOwned,
    {
        let url = self.url_for(endpoint, options)?;
        let authorization = token.authorization()?;
        let start_time = Instant::now();
        let mut attempt = 0;

        loop {
            attempt += 1;

            let result = match self.execute_request(&url, &authorization, attempt).await {
                Ok(response) => {
                    self.parse_response(response, &url, start_time, attempt)
                        .await
                }
                Err(e) => Err(e),
            };

            let err = match result {
                Ok(response) => return Ok(response),
                Err(e) => e,
            };

            tracing::warn!(
                error = %err,
                attempt = attempt,
                path = %endpoint,
                "Request failed"
            );

            if !self.inner.retry_predicate.should_retry(&err, attempt) {
                return Err(err);
            }

            match self.inner.retry_strategy.delay_for_attempt(attempt) {
                Some(delay) => {
                    tracing::info!(
                        delay_ms = delay.as_millis(),
                        attempt = attempt,
                        "Retrying request after delay"
                    );
                    tokio::time::sleep(delay).await;
                }
                None if attempt == 1 => return Err(err),
                None => {
                    return Err(Error::MaxRetriesExceeded {
                        attempts: attempt,
                        last_error: Box::new(err),
                    })
                }
            }
        }
    }

    async fn execute_request(
        &self,
        url: &Url,
        authorization: &HeaderValue,
        attempt: usize,
    ) -> Result<reqwest::Response> {
        tracing::debug!(url = %url, attempt = attempt, "Executing HTTP request");

        let mut request = self
            .inner
            .http_client
            .get(url.clone())
            .headers(self.inner.default_headers.clone())
            .header(header::AUTHORIZATION, authorization.clone())
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        Ok(request.send().await?)
    }

    async fn parse_response<T>(
        &self,
        response: reqwest::Response,
        url: &Url,
        start_time: Instant,
        attempts: usize,
    ) -> Result<Response<T>>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        let raw_body = response.text().await?;
        let latency = start_time.elapsed();

        tracing::info!(
            status = status.as_u16(),
            latency_ms = latency.as_millis(),
            attempts = attempts,
            "Received HTTP response"
        );

        if status != StatusCode::OK {
            if status.is_server_error() {
                tracing::warn!(status = status.as_u16(), response = %raw_body, "Server error (5xx)");
            } else {
                tracing::error!(status = status.as_u16(), response = %raw_body, "Unexpected status");
            }

            return Err(Error::HttpError {
                status,
                raw_response: raw_body,
            });
        }

        match serde_json::from_str::<T>(&raw_body) {
            Ok(data) => Ok(Response::new(
                data,
                raw_body,
                status,
                url.clone(),
                latency,
                attempts,
            )),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    raw_response = %raw_body,
                    "Failed to deserialize response"
                );

                Err(Error::DeserializationFailed {
                    raw_response: raw_body,
                    serde_error: e.to_string(),
                    status,
                })
            }
        }
    }

    /// Fetches and drops the error, logging it instead.
    async fn retrieve<T>(
        &self,
        token: &Token,
        endpoint: Endpoint<'_>,
        options: Option<&Options>,
    ) -> Option<Page<T>>
    where
        T: DeserializeOwned,
    {
        match self.fetch(token, endpoint, options).await {
            Ok(response) => Some(response.into_inner()),
            Err(e) => {
                tracing::warn!(error = %e, path = %endpoint, "No data returned");
                None
            }
        }
    }

    /// Lists all books, or looks up one book by id.
    pub async fn books(
        &self,
        token: &Token,
        book_id: Option<&str>,
        options: Option<&Options>,
    ) -> Option<Books> {
        self.retrieve(token, Endpoint::Books(book_id), options)
            .await
    }

    /// Lists the chapters of one book.
    pub async fn book_chapters(
        &self,
        token: &Token,
        book_id: &str,
        options: Option<&Options>,
    ) -> Option<BookChapters> {
        self.retrieve(token, Endpoint::BookChapters(book_id), options)
            .await
    }

    /// Lists all movies, or looks up one movie by id.
    pub async fn movies(
        &self,
        token: &Token,
        movie_id: Option<&str>,
        options: Option<&Options>,
    ) -> Option<Movies> {
        self.retrieve(token, Endpoint::Movies(movie_id), options)
            .await
    }

    /// Lists the quotes of one movie.
    pub async fn movie_quotes(
        &self,
        token: &Token,
        movie_id: &str,
        options: Option<&Options>,
    ) -> Option<Quotes> {
        self.retrieve(token, Endpoint::MovieQuotes(movie_id), options)
            .await
    }

    /// Lists all characters, or looks up one character by id.
    pub async fn characters(
        &self,
        token: &Token,
        character_id: Option<&str>,
        options: Option<&Options>,
    ) -> Option<Characters> {
        self.retrieve(token, Endpoint::Characters(character_id), options)
            .await
    }

    /// Lists the quotes of one character.
    pub async fn character_quotes(
        &self,
        token: &Token,
        character_id: &str,
        options: Option<&Options>,
    ) -> Option<Quotes> {
        self.retrieve(token, Endpoint::CharacterQuotes(character_id), options)
            .await
    }

    /// Lists all quotes, or looks up one quote by id.
    pub async fn quotes(
        &self,
        token: &Token,
        quote_id: Option<&str>,
        options: Option<&Options>,
    ) -> Option<Quotes> {
        self.retrieve(token, Endpoint::Quotes(quote_id), options)
            .await
    }

    /// Lists all chapters, or looks up one chapter by id.
    pub async fn chapters(
        &self,
        token: &Token,
        chapter_id: Option<&str>,
        options: Option<&Options>,
    ) -> Option<Chapters> {
        self.retrieve(token, Endpoint::Chapters(chapter_id), options)
            .await
    }
}

/// Builder for a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use one_api::{ClientBuilder, RetryStrategy};
/// use one_api::retry::RetryOnRateLimit;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), one_api::Error> {
/// let client = ClientBuilder::new()
///     .timeout(Duration::from_secs(10))
///     .retry_strategy(RetryStrategy::Linear {
///         delay: Duration::from_secs(5),
///         max_retries: 2,
///     })
///     .retry_predicate(Box::new(RetryOnRateLimit))
///     .default_header("User-Agent", "middle-earth-explorer/1.0")?
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    base_url: String,
    default_headers: HeaderMap,
    retry_strategy: RetryStrategy,
    retry_predicate: Option<Box<dyn RetryPredicate>>,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Creates a builder targeting [`DEFAULT_BASE_URL`].
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            default_headers: HeaderMap::new(),
            retry_strategy: RetryStrategy::None,
            retry_predicate: None,
            timeout: None,
        }
    }

    /// Points the client at another deployment of the API.
    ///
    /// The URL should include the version prefix (e.g. `.../v2`). A trailing
    /// slash is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or cannot carry a path.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        let parsed = Url::parse(url.as_ref())?;
        if parsed.cannot_be_a_base() {
            return Err(Error::ConfigurationError(format!(
                "Base URL cannot carry a path: {}",
                url.as_ref()
            )));
        }
        self.base_url = url.as_ref().trim_end_matches('/').to_string();
        Ok(self)
    }

    /// Adds a header sent with every request.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header value: {}", e)))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    pub fn retry_strategy(mut self, strategy: RetryStrategy) -> Self {
        self.retry_strategy = strategy;
        self
    }

    /// Replaces the default predicate, [`RetryOnRetryable`].
    pub fn retry_predicate(mut self, predicate: Box<dyn RetryPredicate>) -> Self {
        self.retry_predicate = Some(predicate);
        self
    }

    /// Sets a per-attempt timeout. Without one a request waits as long as
    /// the transport does.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<Client> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| {
                Error::ConfigurationError(format!("Failed to build HTTP client: {}", e))
            })?;

        let retry_predicate = self
            .retry_predicate
            .unwrap_or_else(|| Box::new(RetryOnRetryable));

        Ok(Client {
            inner: Arc::new(ClientInner {
                http_client,
                base_url: self.base_url,
                default_headers: self.default_headers,
                retry_strategy: self.retry_strategy,
                retry_predicate,
                timeout: self.timeout,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Filter, Operator};

    #[test]
    fn test_url_for_without_options() {
        let client = Client::new().unwrap();
        let url = client.url_for(Endpoint::Movies(None), None).unwrap();
        assert_eq!(url.as_str(), "https://the-one-api.dev/v2/movie");
    }

    #[test]
    fn test_url_for_keeps_filter_syntax() {
        let client = Client::builder()
            .base_url("http://localhost:8080/v2/")
            .unwrap()
            .build()
            .unwrap();

        let options = Options::new()
            .filter(Filter::not_matching("race", "Orc,Goblin"))
            .filter(Filter::exists("name"));
        let url = client
            .url_for(Endpoint::CharacterQuotes("abc"), Some(&options))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/v2/character/abc/quote?race!=Orc,Goblin&name"
        );
    }

    #[test]
    fn test_url_for_keeps_id_in_one_segment() {
        let client = Client::new().unwrap();

        let url = client
            .url_for(Endpoint::BookChapters("a?b"), Some(&Options::new().limit(2)))
            .unwrap();
        assert_eq!(url.path(), "/v2/book/a%3Fb/chapter");
        assert_eq!(url.query(), Some("limit=2"));

        let url = client
            .url_for(Endpoint::Books(Some("../movie")), None)
            .unwrap();
        assert_eq!(url.path(), "/v2/book/..%2Fmovie");

        let url = client
            .url_for(Endpoint::Characters(Some("x#y")), None)
            .unwrap();
        assert_eq!(url.path(), "/v2/character/x%23y");
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_url_for_rejects_dot_and_empty_ids() {
        let client = Client::new().unwrap();
        for id in ["", ".", ".."] {
            assert!(matches!(
                client.url_for(Endpoint::Movies(Some(id)), None),
                Err(Error::ConfigurationError(_))
            ));
        }
    }

    #[test]
    fn test_url_for_keeps_terms_after_hash_in_value() {
        let client = Client::new().unwrap();
        let options = Options::new()
            .filter(Filter::matching("name", "C#"))
            .filter(Filter::exists("race"));
        let url = client
            .url_for(Endpoint::Characters(None), Some(&options))
            .unwrap();
        assert_eq!(url.query(), Some("name=C%23&race"));
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_url_for_percent_encodes_comparisons() {
        let client = Client::new().unwrap();
        let options = Options::new().filter(Filter::compare("runtimeInMinutes", Operator::Ge, 160.0));
        let url = client
            .url_for(Endpoint::Movies(None), Some(&options))
            .unwrap();
        assert_eq!(url.query(), Some("runtimeInMinutes%3E=160"));
    }

    #[test]
    fn test_base_url_rejects_garbage() {
        assert!(matches!(
            Client::builder().base_url("not a url"),
            Err(Error::InvalidUrl(_))
        ));
        assert!(matches!(
            Client::builder().base_url("mailto:someone@example.com"),
            Err(Error::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = Token::new("super-secret");
        assert_eq!(format!("{:?}", token), "Token(<redacted>)");
        assert_eq!(token.as_str(), "super-secret");
    }

    #[test]
    fn test_token_rejects_header_breaking_characters() {
        let token = Token::new("abc\ndef");
        assert!(matches!(
            token.authorization(),
            Err(Error::ConfigurationError(_))
        ));
    }
}
