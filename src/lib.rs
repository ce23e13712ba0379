//! # one-api - a typed client for The One API
//!
//! [The One API](https://the-one-api.dev) serves books, chapters, movies,
//! characters and quotes from The Lord of the Rings. This crate wraps it with
//! typed documents and a structured way to express the API's pagination,
//! sorting and filtering query syntax.
//!
//! ## Quick Start
//!
//! ```no_run
//! use one_api::{Client, Token};
//! use one_api::query::{Direction, Filter, Operator, Options};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), one_api::Error> {
//!     let client = Client::new()?;
//!     let token = Token::from_env()?;
//!
//!     // Movies over three hours, longest first
//!     let options = Options::new()
//!         .sort(Direction::Descending, "runtimeInMinutes")
//!         .filter(Filter::compare("runtimeInMinutes", Operator::Gt, 180.0));
//!
//!     match client.movies(&token, None, Some(&options)).await {
//!         Some(movies) => {
//!             for movie in movies {
//!                 println!("{} ({} min)", movie.name, movie.runtime_in_minutes);
//!             }
//!         }
//!         None => eprintln!("no movies returned"),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Failure handling
//!
//! The resource methods ([`Client::books`], [`Client::movie_quotes`], ...)
//! return `None` for every failure: transport errors, non-200 statuses and
//! bodies that do not decode. The failure is logged through `tracing`.
//!
//! When the cause matters, call [`Client::fetch`] with an
//! [`Endpoint`](endpoint::Endpoint) instead; it returns the same data wrapped
//! in a [`Response`], or an [`Error`].
//!
//! ```no_run
//! use one_api::{Client, Error, Token};
//! use one_api::endpoint::Endpoint;
//! use one_api::model::Quote;
//!
//! # async fn example() -> Result<(), Error> {
//! # let client = Client::new()?;
//! # let token = Token::new("secret");
//! match client.fetch::<Quote>(&token, Endpoint::Quotes(Some("5cd96e05de30eff6ebcce7e9")), None).await {
//!     Ok(response) => println!("{:?}", response.first()),
//!     Err(Error::HttpError { status, .. }) if status.as_u16() == 401 => {
//!         eprintln!("token rejected");
//!     }
//!     Err(e) => eprintln!("request failed: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

mod client;
pub mod endpoint;
mod error;
pub mod model;
pub mod query;
mod response;
pub mod retry;

pub use client::{Client, ClientBuilder, Token, DEFAULT_BASE_URL, TOKEN_ENV_VAR};
pub use error::{Error, Result};
pub use response::Response;
pub use retry::{RetryPredicate, RetryStrategy};
