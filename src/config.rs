use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::ClientConfig;
use crate::util::strip_quotes;

pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Default)]
struct RcConfig {
    url: Option<String>,
    timeout: Option<String>,
}

pub(crate) fn load_config(url: Option<String>, timeout: Option<Duration>) -> Result<ClientConfig> {
    resolve_config(url, timeout, |name| std::env::var(name).ok(), &rc_candidates())
}

fn resolve_config<F>(
    url: Option<String>,
    timeout: Option<Duration>,
    env: F,
    rc_candidates: &[PathBuf],
) -> Result<ClientConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut url = url.or_else(|| env("LORIS_API_URL"));
    let mut timeout_raw = if timeout.is_none() {
        env("LORIS_API_TIMEOUT")
    } else {
        None
    };

    if url.is_none() || (timeout.is_none() && timeout_raw.is_none()) {
        for rc_path in rc_candidates {
            if rc_path.exists() {
                let cfg = read_rc(rc_path).with_context(|| {
                    format!("failed to read configuration file {}", rc_path.display())
                })?;

                if url.is_none() {
                    url = cfg.url;
                }
                if timeout.is_none() && timeout_raw.is_none() {
                    timeout_raw = cfg.timeout;
                }
                break;
            }
        }
    }

    let url = match url {
        Some(v) => v,
        None => {
            if !rc_candidates.is_empty() {
                bail!(
                    "Missing configuration: url (set LORIS_API_URL or put `url:` in one of: {})",
                    rc_candidates
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }
            bail!("Missing configuration: url (set LORIS_API_URL or create .lorisrc)");
        }
    };

    let timeout = match (timeout, timeout_raw) {
        (Some(t), _) => t,
        (None, Some(raw)) => parse_timeout(&raw)?,
        (None, None) => DEFAULT_TIMEOUT,
    };

    Ok(ClientConfig { url, timeout })
}

fn parse_timeout(raw: &str) -> Result<Duration> {
    let secs: f64 = raw
        .trim()
        .parse()
        .with_context(|| format!("invalid timeout {:?} (expected seconds)", raw))?;
    if !secs.is_finite() || secs <= 0.0 {
        bail!("invalid timeout {:?} (must be a positive number of seconds)", raw);
    }
    Ok(Duration::from_secs_f64(secs))
}

fn is_entry(line: &str) -> bool {
    line.split_once(':')
        .is_some_and(|(k, _)| matches!(k.trim(), "url" | "timeout"))
}

fn read_rc(path: &Path) -> Result<RcConfig> {
    let text = std::fs::read_to_string(path)?;
    let mut cfg = RcConfig::default();

    // `url:` may be left empty with the value on the following line.
    let mut pending_key: Option<&str> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(pk) = pending_key.take() {
            if !is_entry(line) {
                let v = strip_quotes(line).to_string();
                match pk {
                    "url" => cfg.url = Some(v),
                    "timeout" => cfg.timeout = Some(v),
                    _ => {}
                }
                continue;
            }
        }

        if let Some((k, v)) = line.split_once(':') {
            let k = k.trim();
            let v = strip_quotes(v.trim());
            match k {
                "url" => {
                    if !v.is_empty() {
                        cfg.url = Some(v.to_string());
                    } else {
                        pending_key = Some("url");
                    }
                }
                "timeout" => {
                    if !v.is_empty() {
                        cfg.timeout = Some(v.to_string());
                    } else {
                        pending_key = Some("timeout");
                    }
                }
                _ => {}
            }
        }
    }

    Ok(cfg)
}

fn rc_candidates() -> Vec<PathBuf> {
    // 1) LORIS_API_RC (explicit)
    // 2) ./.lorisrc
    // 3) ~/.lorisrc
    if let Ok(p) = std::env::var("LORIS_API_RC") {
        return vec![PathBuf::from(p)];
    }

    let mut v = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        v.push(cwd.join(".lorisrc"));
    }
    if let Some(home) = dirs::home_dir() {
        v.push(home.join(".lorisrc"));
    }
    v
}
