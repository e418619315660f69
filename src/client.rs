use anyhow::Result;
use serde::Serialize;
use serde_json::{Value, json};
use std::time::Duration;

use crate::config::load_config;
use crate::dispatch::Dispatcher;
use crate::endpoint::Endpoint;
use crate::error::Outcome;
use crate::session::Session;
use crate::transport::{ReqwestTransport, Transport};
use crate::validate::{present_token, validate_candidate, validate_params};

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Versioned base URL of the API, e.g. `http://192.168.1.244/api/v0.0.2/`.
    pub url: String,
    /// Timeout applied to every request.
    pub timeout: Duration,
}

/// Client for the LORIS REST API.
///
/// Every operation takes the bearer token explicitly and reports failures
/// through the returned [`Outcome`]. Use [`Session`] to avoid passing the
/// token by hand.
#[derive(Debug, Clone)]
pub struct Client<T = ReqwestTransport> {
    dispatcher: Dispatcher<T>,
}

/// What `login` produced.
///
/// The service answers a successful login with `{"token": ...}`; anything
/// else (an error object, a rendered error response, a network failure) is
/// handed back untouched for the caller to inspect.
#[derive(Debug)]
pub enum Login {
    Token(String),
    Raw(Outcome),
}

impl Login {
    pub fn token(&self) -> Option<&str> {
        match self {
            Login::Token(t) => Some(t),
            Login::Raw(_) => None,
        }
    }

    pub fn into_token(self) -> Option<String> {
        match self {
            Login::Token(t) => Some(t),
            Login::Raw(_) => None,
        }
    }
}

#[derive(Debug, Serialize)]
struct NewVisit<'a> {
    #[serde(rename = "Meta")]
    meta: VisitMeta<'a>,
}

#[derive(Debug, Serialize)]
struct VisitMeta<'a> {
    #[serde(rename = "CandID")]
    cand_id: &'a str,
    #[serde(rename = "Visit")]
    visit: &'a str,
    #[serde(rename = "Battery")]
    battery: Option<&'a str>,
}

impl Client<ReqwestTransport> {
    /// Creates a client using environment variables and/or `.lorisrc`.
    ///
    /// This is equivalent to `Client::new(None, None)`.
    pub fn from_env() -> Result<Self> {
        Self::new(None, None)
    }

    /// Creates a client using (in order of precedence):
    /// - explicit `url`/`timeout` arguments
    /// - environment variables `LORIS_API_URL` / `LORIS_API_TIMEOUT`
    /// - config file from `LORIS_API_RC` or `.lorisrc`
    pub fn new(url: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let cfg = load_config(url, timeout)?;
        Self::from_config(&cfg)
    }

    pub fn from_config(cfg: &ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&cfg.url, cfg.timeout)?;
        Ok(Self::with_transport(transport))
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(transport: T) -> Self {
        Self {
            dispatcher: Dispatcher::new(transport),
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher<T> {
        &self.dispatcher
    }

    /// POST /login
    pub fn login(&self, username: &str, password: &str) -> Login {
        let data = json!({
            "username": username,
            "password": password,
        });
        let outcome = self
            .dispatcher
            .dispatch("POST", None, &Endpoint::Login.path(), Some(&data));

        let token = outcome
            .as_json()
            .and_then(|v| v.get("token"))
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        match token {
            Some(token) => Login::Token(token),
            None => Login::Raw(outcome),
        }
    }

    /// Logs in and wraps the token in a [`Session`], or returns whatever the
    /// login produced instead of a token.
    pub fn session(&self, username: &str, password: &str) -> std::result::Result<Session<'_, T>, Outcome> {
        match self.login(username, password) {
            Login::Token(token) => Ok(Session::new(self, token)),
            Login::Raw(outcome) => Err(outcome),
        }
    }

    /// GET /projects
    pub fn projects(&self, token: Option<&str>) -> Outcome {
        match require([present_token(token)]) {
            Ok([token]) => self.get(token, Endpoint::Projects),
            Err(out) => out,
        }
    }

    /// GET /projects/{name}
    pub fn project(&self, token: Option<&str>, name: Option<&str>) -> Outcome {
        match require([present_token(token), name]) {
            Ok([token, name]) => self.get(token, Endpoint::Project { name }),
            Err(out) => out,
        }
    }

    /// GET /projects/{name}/candidates
    pub fn project_candidates(&self, token: Option<&str>, name: Option<&str>) -> Outcome {
        match require([present_token(token), name]) {
            Ok([token, name]) => self.get(token, Endpoint::ProjectCandidates { name }),
            Err(out) => out,
        }
    }

    /// GET /candidates/{id}
    pub fn candidate(&self, token: Option<&str>, cand_id: Option<&str>) -> Outcome {
        match require([present_token(token), cand_id]) {
            Ok([token, cand_id]) => self.get(token, Endpoint::Candidate { cand_id }),
            Err(out) => out,
        }
    }

    /// POST /candidates/
    ///
    /// `data` must look like
    /// `{"Candidate": {"Project": .., "Gender": .., "DoB": ..}}`.
    pub fn create_candidate(&self, token: Option<&str>, data: &Value) -> Outcome {
        let token = match require([present_token(token)]) {
            Ok([token]) => token,
            Err(out) => return out,
        };
        if let Err(msg) = validate_candidate(data) {
            return Outcome::Error(msg.to_string());
        }
        self.dispatcher
            .dispatch("POST", Some(token), &Endpoint::Candidates.path(), Some(data))
    }

    /// GET /candidates/{id}/{visit}
    pub fn candidate_visit(
        &self,
        token: Option<&str>,
        cand_id: Option<&str>,
        visit: Option<&str>,
    ) -> Outcome {
        match require([present_token(token), cand_id, visit]) {
            Ok([token, cand_id, visit]) => self.get(token, Endpoint::Visit { cand_id, visit }),
            Err(out) => out,
        }
    }

    /// PUT /candidates/{id}/{visit}
    ///
    /// `battery` is the subproject the visit belongs to. It is not required.
    pub fn create_candidate_visit(
        &self,
        token: Option<&str>,
        cand_id: Option<&str>,
        visit: Option<&str>,
        battery: Option<&str>,
    ) -> Outcome {
        let [token, cand_id, visit] = match require([present_token(token), cand_id, visit]) {
            Ok(params) => params,
            Err(out) => return out,
        };

        let body = NewVisit {
            meta: VisitMeta {
                cand_id,
                visit,
                battery,
            },
        };
        let data = match serde_json::to_value(&body) {
            Ok(v) => v,
            Err(e) => return Outcome::Failure(e.into()),
        };
        self.dispatcher.dispatch(
            "PUT",
            Some(token),
            &Endpoint::Visit { cand_id, visit }.path(),
            Some(&data),
        )
    }

    /// GET /candidates/{id}/{visit}/images
    pub fn candidate_images(
        &self,
        token: Option<&str>,
        cand_id: Option<&str>,
        visit: Option<&str>,
    ) -> Outcome {
        match require([present_token(token), cand_id, visit]) {
            Ok([token, cand_id, visit]) => self.get(token, Endpoint::Images { cand_id, visit }),
            Err(out) => out,
        }
    }

    /// GET /candidates/{id}/{visit}/images/{filename}
    ///
    /// Returns the file as [`Outcome::Raw`], with the server's content type.
    /// Only the token is checked up front; the identifiers go into the path
    /// as given.
    pub fn image_data(
        &self,
        token: Option<&str>,
        cand_id: &str,
        visit: &str,
        filename: &str,
    ) -> Outcome {
        let token = match require([present_token(token)]) {
            Ok([token]) => token,
            Err(out) => return out,
        };
        let path = Endpoint::Image {
            cand_id,
            visit,
            filename,
        }
        .path();
        self.dispatcher.fetch_raw(Some(token), &path)
    }

    /// GET /candidates/{id}/{visit}/qc/imaging
    pub fn session_imaging_qc(
        &self,
        token: Option<&str>,
        cand_id: Option<&str>,
        visit: Option<&str>,
    ) -> Outcome {
        match require([present_token(token), cand_id, visit]) {
            Ok([token, cand_id, visit]) => self.get(token, Endpoint::ImagingQc { cand_id, visit }),
            Err(out) => out,
        }
    }

    fn get(&self, token: &str, endpoint: Endpoint<'_>) -> Outcome {
        self.dispatcher
            .dispatch("GET", Some(token), &endpoint.path(), None)
    }
}

/// Unwraps the parameters if all are present, otherwise produces the
/// missing-parameter error.
fn require<const N: usize>(params: [Option<&str>; N]) -> std::result::Result<[&str; N], Outcome> {
    validate_params(&params).map_err(|msg| Outcome::Error(msg.to_string()))?;
    Ok(params.map(Option::unwrap_or_default))
}
