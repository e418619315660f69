use anyhow::{Result, bail};
use loris_api::{Client, Outcome};
use serde_json::json;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // RUST_LOG=loris_api=debug shows every request as it is built.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Configure the base URL via LORIS_API_URL or a `.lorisrc` file.
    let client = Client::from_env()?;
    let username = std::env::var("LORIS_USERNAME").unwrap_or_else(|_| "loris".to_string());
    let password = std::env::var("LORIS_PASSWORD").unwrap_or_else(|_| "loris".to_string());
    let visit = "T1";

    let session = match client.session(&username, &password) {
        Ok(session) => session,
        Err(other) => bail!("login did not return a token: {:?}", other),
    };
    println!("token: {}", session.token());

    let data = json!({
        "Candidate": {
            "Project": "loris",
            "DoB": "2018-05-06",
            "Gender": "Female",
        }
    });
    let mut result = session.create_candidate(&data);

    let cand_id = result
        .as_json()
        .and_then(|v| v["Meta"]["CandID"].as_str())
        .map(str::to_string);
    if let Some(cand_id) = cand_id {
        result = session.create_candidate_visit(&cand_id, visit, "Experimental");
        if !result.is_error() {
            result = session.candidate_visit(&cand_id, visit);
        }
    }

    match result {
        Outcome::Json(v) => println!("{:#}", v),
        Outcome::Error(msg) => println!("{}", msg),
        other => println!("{:?}", other),
    }
    Ok(())
}
