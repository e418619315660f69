//! In-process mock of the LORIS API used by the integration tests.
//!
//! Serves under `/api/v0.0.2`, accepts `loris`/`loris` and hands out
//! `test-token`. Every other route requires that bearer token.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::Path,
    http::{HeaderMap, Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{any, get, post},
};
use serde_json::{Value, json};

pub const TOKEN: &str = "test-token";
pub const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00];

fn app() -> Router {
    Router::new()
        .route("/api/v0.0.2/login", post(login))
        .route("/api/v0.0.2/projects", get(projects))
        .route("/api/v0.0.2/projects/{name}", get(project))
        .route("/api/v0.0.2/projects/{name}/candidates", get(project_candidates))
        .route("/api/v0.0.2/candidates/", post(create_candidate))
        .route("/api/v0.0.2/candidates/{id}", get(candidate))
        .route(
            "/api/v0.0.2/candidates/{id}/{visit}",
            get(visit).put(create_visit),
        )
        .route("/api/v0.0.2/candidates/{id}/{visit}/images", get(images))
        .route(
            "/api/v0.0.2/candidates/{id}/{visit}/images/{filename}",
            get(image),
        )
        .route("/api/v0.0.2/candidates/{id}/{visit}/qc/imaging", get(imaging_qc))
        .route("/api/v0.0.2/slow", get(slow))
        .route("/api/v0.0.2/echo", any(echo))
}

/// Starts the server on a random port and returns the versioned base URL.
pub fn spawn_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            axum::serve(listener, app()).await
        })
        .unwrap();
    });

    base_url(addr)
}

/// A base URL nothing is listening on.
pub fn dead_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    base_url(addr)
}

fn base_url(addr: SocketAddr) -> String {
    format!("http://{addr}/api/v0.0.2/")
}

fn authorized(headers: &HeaderMap) -> Result<(), Response> {
    let expected = format!("Bearer {TOKEN}");
    match headers.get(header::AUTHORIZATION) {
        Some(v) if v.as_bytes() == expected.as_bytes() => Ok(()),
        _ => Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Invalid or missing token"})),
        )
            .into_response()),
    }
}

/// Raw-body endpoints must not receive a content type, and the body must be
/// JSON anyway.
fn raw_json(headers: &HeaderMap, body: &str) -> Result<Value, Response> {
    if headers.contains_key(header::CONTENT_TYPE) {
        return Err((StatusCode::UNSUPPORTED_MEDIA_TYPE, "unexpected content type").into_response());
    }
    serde_json::from_str(body)
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("invalid JSON: {e}")).into_response())
}

async fn login(Json(input): Json<Value>) -> Response {
    if input["username"] == "loris" && input["password"] == "loris" {
        Json(json!({ "token": TOKEN })).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Invalid username or password"})),
        )
            .into_response()
    }
}

async fn projects(headers: HeaderMap) -> Response {
    if let Err(resp) = authorized(&headers) {
        return resp;
    }
    Json(json!({"Projects": {"loris": {"useEDC": "false", "PSCID": {"Type": "prompt"}}}}))
        .into_response()
}

async fn project(headers: HeaderMap, Path(name): Path<String>) -> Response {
    if let Err(resp) = authorized(&headers) {
        return resp;
    }
    if name != "loris" {
        return (StatusCode::NOT_FOUND, Json(json!({"error": "Project not found"}))).into_response();
    }
    Json(json!({"Meta": {"Project": name}, "Candidates": ["230796"]})).into_response()
}

async fn project_candidates(headers: HeaderMap, Path(name): Path<String>) -> Response {
    if let Err(resp) = authorized(&headers) {
        return resp;
    }
    Json(json!({"Meta": {"Project": name}, "Candidates": ["230796", "300001"]})).into_response()
}

async fn create_candidate(headers: HeaderMap, body: String) -> Response {
    if let Err(resp) = authorized(&headers) {
        return resp;
    }
    let input = match raw_json(&headers, &body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let c = &input["Candidate"];
    (
        StatusCode::CREATED,
        Json(json!({
            "Meta": {
                "CandID": "300001",
                "Project": c["Project"],
                "Gender": c["Gender"],
                "DoB": c["DoB"],
            }
        })),
    )
        .into_response()
}

async fn candidate(headers: HeaderMap, Path(id): Path<String>) -> Response {
    if let Err(resp) = authorized(&headers) {
        return resp;
    }
    if id != "230796" {
        return (StatusCode::NOT_FOUND, Json(json!({"error": "Candidate not found"}))).into_response();
    }
    Json(json!({"Meta": {"CandID": id, "Project": "loris"}, "Visits": ["T1"]})).into_response()
}

async fn visit(headers: HeaderMap, Path((id, visit)): Path<(String, String)>) -> Response {
    if let Err(resp) = authorized(&headers) {
        return resp;
    }
    Json(json!({"Meta": {"CandID": id, "Visit": visit, "Battery": "Experimental"}})).into_response()
}

async fn create_visit(
    headers: HeaderMap,
    Path((id, visit)): Path<(String, String)>,
    body: String,
) -> Response {
    if let Err(resp) = authorized(&headers) {
        return resp;
    }
    let input = match raw_json(&headers, &body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    if input["Meta"]["CandID"] != id.as_str() || input["Meta"]["Visit"] != visit.as_str() {
        return (StatusCode::BAD_REQUEST, "meta does not match URL").into_response();
    }
    StatusCode::CREATED.into_response()
}

async fn images(headers: HeaderMap, Path((id, visit)): Path<(String, String)>) -> Response {
    if let Err(resp) = authorized(&headers) {
        return resp;
    }
    Json(json!({
        "Meta": {"CandID": id, "Visit": visit},
        "Files": [{"Filename": "scan.jpg", "AcquisitionProtocol": "t1"}],
    }))
    .into_response()
}

async fn image(
    headers: HeaderMap,
    Path((_id, _visit, filename)): Path<(String, String, String)>,
) -> Response {
    if let Err(resp) = authorized(&headers) {
        return resp;
    }
    if filename != "scan.jpg" {
        return (StatusCode::NOT_FOUND, "file not found").into_response();
    }
    ([(header::CONTENT_TYPE, "image/jpeg")], JPEG).into_response()
}

async fn imaging_qc(headers: HeaderMap, Path((id, visit)): Path<(String, String)>) -> Response {
    if let Err(resp) = authorized(&headers) {
        return resp;
    }
    Json(json!({
        "Meta": {"CandID": id, "Visit": visit},
        "SessionQC": "Pass",
        "Pending": false,
    }))
    .into_response()
}

async fn slow() -> Response {
    tokio::time::sleep(Duration::from_secs(2)).await;
    Json(json!({"late": true})).into_response()
}

/// Reports the verb and body the request arrived with.
async fn echo(method: Method, headers: HeaderMap, body: String) -> Response {
    if let Err(resp) = authorized(&headers) {
        return resp;
    }
    Json(json!({"method": method.as_str(), "body": body})).into_response()
}
