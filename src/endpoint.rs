use std::fmt;

use crate::request::LOGIN_ENDPOINT;

/// Paths of the LORIS API, relative to the versioned base URL
/// (e.g. `http://host/api/v0.0.2/`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    Login,
    Projects,
    Project { name: &'a str },
    ProjectCandidates { name: &'a str },
    Candidates,
    Candidate { cand_id: &'a str },
    Visit { cand_id: &'a str, visit: &'a str },
    Images { cand_id: &'a str, visit: &'a str },
    Image { cand_id: &'a str, visit: &'a str, filename: &'a str },
    ImagingQc { cand_id: &'a str, visit: &'a str },
}

impl Endpoint<'_> {
    /// The path relative to the base URL. Identifiers are percent-encoded, so
    /// each one stays a single path segment.
    pub fn path(&self) -> String {
        match self {
            Endpoint::Login => LOGIN_ENDPOINT.to_string(),
            Endpoint::Projects => "projects".to_string(),
            Endpoint::Project { name } => format!("projects/{}", seg(name)),
            Endpoint::ProjectCandidates { name } => format!("projects/{}/candidates", seg(name)),
            // The trailing slash is what the server routes candidate creation on.
            Endpoint::Candidates => "candidates/".to_string(),
            Endpoint::Candidate { cand_id } => format!("candidates/{}", seg(cand_id)),
            Endpoint::Visit { cand_id, visit } => {
                format!("candidates/{}/{}", seg(cand_id), seg(visit))
            }
            Endpoint::Images { cand_id, visit } => {
                format!("candidates/{}/{}/images", seg(cand_id), seg(visit))
            }
            Endpoint::Image {
                cand_id,
                visit,
                filename,
            } => format!(
                "candidates/{}/{}/images/{}",
                seg(cand_id),
                seg(visit),
                seg(filename)
            ),
            Endpoint::ImagingQc { cand_id, visit } => {
                format!("candidates/{}/{}/qc/imaging", seg(cand_id), seg(visit))
            }
        }
    }
}

/// Percent-encodes everything outside the RFC 3986 unreserved set.
fn seg(raw: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(raw.len());
    for &b in raw.as_bytes() {
        if matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~') {
            out.push(b as char);
        } else {
            out.push('%');
            out.push(HEX[(b >> 4) as usize] as char);
            out.push(HEX[(b & 0x0F) as usize] as char);
        }
    }
    out
}

impl fmt::Display for Endpoint<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_match_service_layout() {
        let cases = [
            (Endpoint::Login, "login"),
            (Endpoint::Projects, "projects"),
            (Endpoint::Project { name: "loris" }, "projects/loris"),
            (Endpoint::ProjectCandidates { name: "loris" }, "projects/loris/candidates"),
            (Endpoint::Candidates, "candidates/"),
            (Endpoint::Candidate { cand_id: "230796" }, "candidates/230796"),
            (Endpoint::Visit { cand_id: "230796", visit: "T1" }, "candidates/230796/T1"),
            (
                Endpoint::Images { cand_id: "230796", visit: "T1" },
                "candidates/230796/T1/images",
            ),
            (
                Endpoint::Image { cand_id: "230796", visit: "T1", filename: "t1.mnc" },
                "candidates/230796/T1/images/t1.mnc",
            ),
            (
                Endpoint::ImagingQc { cand_id: "230796", visit: "T1" },
                "candidates/230796/T1/qc/imaging",
            ),
        ];
        for (endpoint, path) in cases {
            assert_eq!(endpoint.path(), path);
            assert_eq!(endpoint.to_string(), path);
        }
    }

    #[test]
    fn identifiers_cannot_escape_their_segment() {
        let image = Endpoint::Image {
            cand_id: "230796",
            visit: "T1/../../projects",
            filename: "scan?.mnc#frag",
        };
        assert_eq!(
            image.path(),
            "candidates/230796/T1%2F..%2F..%2Fprojects/images/scan%3F.mnc%23frag"
        );
        assert_eq!(
            Endpoint::Project { name: "my project" }.path(),
            "projects/my%20project"
        );
        assert_eq!(Endpoint::Candidate { cand_id: "é" }.path(), "candidates/%C3%A9");
    }
}
