//! API key lookup.

use anyhow::{Context, Result, bail};
use log::debug;
use serde::Deserialize;
use std::path::PathBuf;

use crate::runtime::Runtime;

pub const API_KEY_ENV: &str = "MOLTBOOK_API_KEY";

/// Contents of `~/.config/moltbook/credentials.json`.
#[derive(Debug, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub agent_name: Option<String>,
}

/// Location of the credentials file under the user's home directory.
pub fn credentials_path<R: Runtime>(runtime: &R) -> Result<PathBuf> {
    let home = runtime
        .home_dir()
        .context("Could not find home directory")?;
    Ok(home.join(".config").join("moltbook").join("credentials.json"))
}

/// Returns the API key from `MOLTBOOK_API_KEY`, or from the credentials file
/// when the variable is unset or blank.
#[tracing::instrument(skip(runtime))]
pub fn load_api_key<R: Runtime>(runtime: &R) -> Result<String> {
    if let Ok(key) = runtime.env_var(API_KEY_ENV) {
        let key = key.trim();
        if !key.is_empty() {
            debug!("Using API key from {}", API_KEY_ENV);
            return Ok(key.to_string());
        }
    }

    let path = credentials_path(runtime)?;
    if !runtime.exists(&path) {
        bail!(
            "Missing API key. Set {} or create {} with {{\"api_key\":\"moltbook_sk_...\"}}.",
            API_KEY_ENV,
            path.display()
        );
    }

    let raw = runtime.read_to_string(&path)?;
    let creds: Credentials = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse credentials file {}", path.display()))?;

    match creds.api_key.as_deref().map(str::trim) {
        Some(key) if !key.is_empty() => {
            debug!(
                "Using API key from {} (agent: {})",
                path.display(),
                creds.agent_name.as_deref().unwrap_or("unknown")
            );
            Ok(key.to_string())
        }
        _ => bail!(
            "Invalid credentials file (missing api_key): {}",
            path.display()
        ),
    }
}
