use serde_json::Value;

pub const MISSING_PARAMETER: &str =
    "Error: Some or all parametres to the method have invalid values";

pub const INVALID_CANDIDATE: &str =
    "Error: Invalid parametres. Verify that Project, Gender , DoB are set";

/// Checks that every parameter is present.
///
/// This only detects absence. An empty identifier is still "present".
pub fn validate_params(params: &[Option<&str>]) -> Result<(), &'static str> {
    if params.iter().all(Option::is_some) {
        Ok(())
    } else {
        Err(MISSING_PARAMETER)
    }
}

/// An empty token is as good as none.
pub(crate) fn present_token(token: Option<&str>) -> Option<&str> {
    token.filter(|t| !t.is_empty())
}

/// Checks the shape `{"Candidate": {"Project", "Gender", "DoB"}}` required by
/// candidate creation. Values are not inspected beyond being non-null.
pub fn validate_candidate(data: &Value) -> Result<(), &'static str> {
    let Some(candidate) = data.get("Candidate").filter(|c| !c.is_null()) else {
        return Err(INVALID_CANDIDATE);
    };
    let complete = ["Project", "Gender", "DoB"]
        .iter()
        .all(|field| candidate.get(*field).is_some_and(|v| !v.is_null()));
    if complete { Ok(()) } else { Err(INVALID_CANDIDATE) }
}
