use serde_json::Value;

use crate::client::Client;
use crate::error::Outcome;
use crate::transport::{ReqwestTransport, Transport};

/// A client paired with a token, so calls don't need the token spelled out.
///
/// Borrows the client and owns a copy of the token; the token is never
/// refreshed.
#[derive(Debug, Clone)]
pub struct Session<'c, T = ReqwestTransport> {
    client: &'c Client<T>,
    token: String,
}

impl<'c, T: Transport> Session<'c, T> {
    pub fn new(client: &'c Client<T>, token: impl Into<String>) -> Self {
        Self {
            client,
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn client(&self) -> &'c Client<T> {
        self.client
    }

    pub fn projects(&self) -> Outcome {
        self.client.projects(Some(&self.token))
    }

    pub fn project(&self, name: &str) -> Outcome {
        self.client.project(Some(&self.token), Some(name))
    }

    pub fn project_candidates(&self, name: &str) -> Outcome {
        self.client.project_candidates(Some(&self.token), Some(name))
    }

    pub fn candidate(&self, cand_id: &str) -> Outcome {
        self.client.candidate(Some(&self.token), Some(cand_id))
    }

    pub fn create_candidate(&self, data: &Value) -> Outcome {
        self.client.create_candidate(Some(&self.token), data)
    }

    pub fn candidate_visit(&self, cand_id: &str, visit: &str) -> Outcome {
        self.client
            .candidate_visit(Some(&self.token), Some(cand_id), Some(visit))
    }

    pub fn create_candidate_visit(&self, cand_id: &str, visit: &str, battery: &str) -> Outcome {
        self.client.create_candidate_visit(
            Some(&self.token),
            Some(cand_id),
            Some(visit),
            Some(battery),
        )
    }

    pub fn candidate_images(&self, cand_id: &str, visit: &str) -> Outcome {
        self.client
            .candidate_images(Some(&self.token), Some(cand_id), Some(visit))
    }

    pub fn image_data(&self, cand_id: &str, visit: &str, filename: &str) -> Outcome {
        self.client
            .image_data(Some(&self.token), cand_id, visit, filename)
    }

    pub fn session_imaging_qc(&self, cand_id: &str, visit: &str) -> Outcome {
        self.client
            .session_imaging_qc(Some(&self.token), Some(cand_id), Some(visit))
    }
}
