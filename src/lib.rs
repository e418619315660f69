//! A small blocking Rust client for the LORIS REST API.
//!
//! Log in once, then pass the token to each call (or let a [`Session`] carry
//! it). Every call returns an [`Outcome`]: decoded JSON, raw image bytes, an
//! empty body, a descriptive error string, or an unrendered network failure.
//! Nothing is retried.
//!
//! ## Quick start
//! - Configure the API base URL via `LORIS_API_URL` (and optionally
//!   `LORIS_API_TIMEOUT`, in seconds) or a `.lorisrc` file in the current or
//!   home directory.
//! - Call [`Client::login`], then the resource methods.
//!
//! ```no_run
//! use anyhow::Result;
//! use loris_api::{Client, Login, Outcome};
//!
//! fn main() -> Result<()> {
//!     let client = Client::from_env()?;
//!     let token = match client.login("loris", "loris") {
//!         Login::Token(token) => token,
//!         Login::Raw(other) => anyhow::bail!("login failed: {:?}", other),
//!     };
//!
//!     match client.candidate_visit(Some(&token), Some("230796"), Some("T1")) {
//!         Outcome::Json(visit) => println!("{:#}", visit),
//!         other => eprintln!("{:?}", other),
//!     }
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]

mod client;
mod config;
mod dispatch;
mod endpoint;
mod error;
mod request;
mod session;
mod transport;
mod util;
mod validate;

pub use client::{Client, ClientConfig, Login};
pub use dispatch::Dispatcher;
pub use endpoint::Endpoint;
pub use error::Outcome;
pub use request::{LOGIN_ENDPOINT, Method, RequestBody, RequestOptions, build_options};
pub use session::Session;
pub use transport::{ReqwestTransport, Transport, TransportFailure, TransportResponse};
pub use validate::{INVALID_CANDIDATE, MISSING_PARAMETER, validate_candidate, validate_params};
