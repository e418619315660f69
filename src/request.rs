use anyhow::{Context, Result};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::Value;
use std::fmt;

/// The one endpoint that is called before a token exists.
pub const LOGIN_ENDPOINT: &str = "login";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// Parses an upper-case HTTP verb. Anything outside the five supported
    /// verbs yields `None`.
    pub fn parse(verb: &str) -> Option<Self> {
        match verb {
            "GET" => Some(Method::Get),
            "POST" => Some(Method::Post),
            "PUT" => Some(Method::Put),
            "PATCH" => Some(Method::Patch),
            "DELETE" => Some(Method::Delete),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(m: Method) -> Self {
        match m {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// How a payload travels to the server.
#[derive(Clone, PartialEq)]
pub enum RequestBody {
    /// Handed to the transport's JSON helper, which also sets
    /// `Content-Type: application/json`. Login only.
    Json(Value),
    /// Serialized by the client and sent verbatim, with no content type.
    Raw(String),
}

// The JSON field carries login credentials, so it never reaches a trace.
impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestBody::Json(_) => f.write_str("Json(<redacted>)"),
            RequestBody::Raw(raw) => f.debug_tuple("Raw").field(raw).finish(),
        }
    }
}

/// Headers and body for one call, ready for a [`Transport`](crate::Transport).
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub headers: HeaderMap,
    pub body: Option<RequestBody>,
}

/// Builds the headers and body for a call to `endpoint`.
///
/// A non-empty payload is sent as a JSON field for the login endpoint and as a
/// pre-serialized raw body everywhere else. A non-empty token adds
/// `Authorization: Bearer <token>`.
pub fn build_options(
    endpoint: &str,
    payload: Option<&Value>,
    token: Option<&str>,
) -> Result<RequestOptions> {
    let mut options = RequestOptions::default();

    if let Some(data) = payload.filter(|v| !is_blank(v)) {
        if endpoint == LOGIN_ENDPOINT {
            options.body = Some(RequestBody::Json(data.clone()));
        } else {
            let raw = serde_json::to_string(data).context("failed to serialize request payload")?;
            options.body = Some(RequestBody::Raw(raw));
        }
    }

    if let Some(token) = token.filter(|t| !t.is_empty()) {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
            .context("bearer token contains characters not allowed in a header")?;
        value.set_sensitive(true);
        options.headers.insert(AUTHORIZATION, value);
    }

    Ok(options)
}

/// `null`, `""`, `[]` and `{}` count as no payload at all.
pub(crate) fn is_blank(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}
