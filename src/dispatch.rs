//! The request pipeline every operation goes through: build options, send
//! once, then decode the response or translate the failure into an
//! [`Outcome`].

use anyhow::anyhow;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Outcome, render_response};
use crate::request::{Method, build_options};
use crate::transport::{Transport, TransportFailure, TransportResponse};

/// Sends single requests through a [`Transport`]. Holds no session state; the
/// token is passed on every call.
#[derive(Debug, Clone)]
pub struct Dispatcher<T> {
    transport: T,
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sends `verb path` and decodes the JSON response.
    ///
    /// An unrecognised verb sends nothing and yields [`Outcome::Empty`].
    pub fn dispatch(
        &self,
        verb: &str,
        token: Option<&str>,
        path: &str,
        payload: Option<&Value>,
    ) -> Outcome {
        let Some(method) = Method::parse(verb) else {
            warn!(verb, path, "unsupported HTTP verb, request not sent");
            return Outcome::Empty;
        };

        let options = match build_options(path, payload, token) {
            Ok(options) => options,
            Err(e) => return Outcome::Failure(e),
        };
        debug!(verb = method.as_str(), path, ?options, "sending request");

        match self.transport.send(method, path, &options) {
            Ok(resp) => decode_json(path, resp),
            Err(failure) => translate(failure),
        }
    }

    /// Sends an authenticated GET and returns the body as-is.
    pub fn fetch_raw(&self, token: Option<&str>, path: &str) -> Outcome {
        let options = match build_options(path, None, token) {
            Ok(options) => options,
            Err(e) => return Outcome::Failure(e),
        };
        debug!(verb = "GET", path, ?options, "sending raw request");

        match self.transport.send(Method::Get, path, &options) {
            Ok(resp) => {
                let content_type = resp
                    .headers
                    .get(CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                Outcome::Raw {
                    body: resp.body,
                    content_type,
                }
            }
            Err(failure) => translate(failure),
        }
    }
}

fn decode_json(path: &str, resp: TransportResponse) -> Outcome {
    if resp.body.iter().all(u8::is_ascii_whitespace) {
        return Outcome::Empty;
    }
    match serde_json::from_slice::<Value>(&resp.body) {
        Ok(v) => Outcome::Json(v),
        Err(e) => Outcome::Failure(anyhow!(e).context(format!(
            "failed to parse API JSON (path={}, status={})",
            path, resp.status
        ))),
    }
}

fn translate(failure: TransportFailure) -> Outcome {
    debug!(error = %failure, has_response = failure.response.is_some(), "request failed");
    match failure.response {
        Some(resp) => Outcome::Error(render_response(&resp)),
        None => Outcome::Failure(failure.error),
    }
}
