use std::{env, fs, path::Path, time::Duration};

use crate::{errors::Error, Result};

/// Typed configuration for the exporter.
///
/// Everything comes from environment variables, with a best-effort `.env`
/// loader that never overrides values already present in the environment.
#[derive(Clone, Debug)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub bind_addr: String,

    /// Base URL of the whatsapp-web.js bridge sidecar.
    pub bridge_url: String,
    /// Optional bearer token for the bridge.
    pub bridge_token: Option<String>,
    /// Per-request timeout for bridge calls.
    pub bridge_request_timeout: Duration,
    /// Long-poll wait used by the lifecycle event pump.
    pub bridge_poll_timeout: Duration,

    /// Upper bound on one whole invite resolution. A timeout surfaces as a
    /// retryable resolution failure, never a crash.
    pub resolve_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        // PORT default matches the original deployment.
        let port = env_u64("PORT").unwrap_or(5000);
        let bind_addr = format!("0.0.0.0:{port}");

        let bridge_url = env_str("WGE_BRIDGE_URL")
            .and_then(non_empty)
            .ok_or_else(|| {
                Error::Config("WGE_BRIDGE_URL environment variable is required".to_string())
            })?;
        let bridge_url = bridge_url.trim_end_matches('/').to_string();

        let bridge_token = env_str("WGE_BRIDGE_TOKEN").and_then(non_empty);

        let bridge_request_timeout =
            Duration::from_secs(env_u64("WGE_BRIDGE_REQUEST_TIMEOUT_SECS").unwrap_or(30));
        let bridge_poll_timeout =
            Duration::from_secs(env_u64("WGE_BRIDGE_POLL_TIMEOUT_SECS").unwrap_or(25));
        let resolve_timeout =
            Duration::from_secs(env_u64("WGE_RESOLVE_TIMEOUT_SECS").unwrap_or(120));

        Ok(Self {
            bind_addr,
            bridge_url,
            bridge_token,
            bridge_request_timeout,
            bridge_poll_timeout,
            resolve_timeout,
        })
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}
