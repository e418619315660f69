use anyhow::{Context, Result, anyhow};
use reqwest::blocking::Client as HttpClient;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{StatusCode, Version};
use std::fmt;
use std::time::Duration;

use crate::request::{Method, RequestBody, RequestOptions};
use crate::util::urljoin;

/// A fully read HTTP response.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub version: Version,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// A failed round trip. `response` is set when the server answered with an
/// error status; it is `None` for network-level failures.
#[derive(Debug)]
pub struct TransportFailure {
    pub response: Option<TransportResponse>,
    pub error: anyhow::Error,
}

impl TransportFailure {
    pub fn with_response(response: TransportResponse, error: anyhow::Error) -> Self {
        Self {
            response: Some(response),
            error,
        }
    }

    pub fn without_response(error: anyhow::Error) -> Self {
        Self {
            response: None,
            error,
        }
    }
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#}", self.error)
    }
}

/// Performs one HTTP round trip.
///
/// `path` is relative to whatever base URL the implementation was configured
/// with. Implementations must report 4xx/5xx answers as a
/// [`TransportFailure`] carrying the response.
pub trait Transport {
    fn send(
        &self,
        method: Method,
        path: &str,
        options: &RequestOptions,
    ) -> std::result::Result<TransportResponse, TransportFailure>;
}

/// Blocking `reqwest` transport bound to a base URL and a fixed timeout.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    base_url: String,
    http: HttpClient,
}

impl ReqwestTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("loris-api-rs/{}", env!("CARGO_PKG_VERSION")))
                .unwrap_or(HeaderValue::from_static("loris-api-rs")),
        );

        let http = HttpClient::builder()
            .default_headers(default_headers)
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Transport for ReqwestTransport {
    fn send(
        &self,
        method: Method,
        path: &str,
        options: &RequestOptions,
    ) -> std::result::Result<TransportResponse, TransportFailure> {
        let url = urljoin(&self.base_url, path);

        let mut req = self
            .http
            .request(method.into(), &url)
            .headers(options.headers.clone());
        match &options.body {
            Some(RequestBody::Json(v)) => req = req.json(v),
            Some(RequestBody::Raw(raw)) => req = req.body(raw.clone()),
            None => {}
        }

        let resp = req.send().map_err(|e| {
            TransportFailure::without_response(
                anyhow::Error::new(e).context(format!("request failed ({} {})", method.as_str(), url)),
            )
        })?;

        let status = resp.status();
        let version = resp.version();
        let headers = resp.headers().clone();
        let body = resp
            .bytes()
            .map_err(|e| {
                TransportFailure::without_response(
                    anyhow::Error::new(e)
                        .context(format!("failed to read response body (url={}, status={})", url, status)),
                )
            })?
            .to_vec();

        let response = TransportResponse {
            status,
            version,
            headers,
            body,
        };

        if status.is_client_error() || status.is_server_error() {
            return Err(TransportFailure::with_response(
                response,
                anyhow!("API request failed: HTTP {} for url ({})", status, url),
            ));
        }

        Ok(response)
    }
}
