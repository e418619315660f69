use serde_json::Value;

use crate::transport::TransportResponse;

/// Result of one call against the LORIS API.
///
/// Failures are reported through this value rather than through `Err`, so a
/// caller always gets something back and can decide how much of it to show.
#[derive(Debug)]
pub enum Outcome {
    /// The response body decoded as JSON.
    Json(Value),
    /// Undecoded response body (image retrieval only).
    Raw {
        body: Vec<u8>,
        content_type: Option<String>,
    },
    /// The server answered successfully with an empty body.
    ///
    /// This is not the same as `Json(Value::Null)`, which means the body was
    /// the literal `null`.
    Empty,
    /// A descriptive error: a missing parameter detected locally, or the
    /// rendered status line, headers and body of an error response.
    Error(String),
    /// A failure that carried no HTTP response (connection refused, timeout,
    /// undecodable body). Left unrendered.
    Failure(anyhow::Error),
}

impl Outcome {
    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error(_) | Outcome::Failure(_))
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Outcome::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            Outcome::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Outcome::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Renders an error response as an HTTP message: status line, one line per
/// header, a blank line, then the body (lossily decoded as UTF-8).
///
/// Repeated headers are folded into a single comma-separated line.
pub(crate) fn render_response(resp: &TransportResponse) -> String {
    let mut out = format!(
        "{:?} {} {}",
        resp.version,
        resp.status.as_u16(),
        resp.status.canonical_reason().unwrap_or("")
    );

    for name in resp.headers.keys() {
        let values = resp
            .headers
            .get_all(name)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str("\r\n");
        out.push_str(name.as_str());
        out.push_str(": ");
        out.push_str(&values);
    }

    out.push_str("\r\n\r\n");
    out.push_str(&String::from_utf8_lossy(&resp.body));
    out
}
