use anyhow::Result;
use log::debug;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use super::OutputFormat;
use crate::{
    auth::load_api_key,
    http::{ApiClient, FetchJson, FetchOptions},
    runtime::Runtime,
    settings::FetchDefaults,
};

/// Options collected from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptions {
    pub api_url: Option<String>,
    pub timeout_ms: Option<u64>,
    pub retries: Option<u32>,
    pub output: OutputFormat,
}

/// Everything a command needs to talk to the API and print the result.
pub struct Config<F: FetchJson> {
    pub fetcher: F,
    pub options: FetchOptions,
    pub output: OutputFormat,
}

impl Config<ApiClient> {
    pub fn new<R: Runtime>(runtime: &R, cli: &CliOptions) -> Result<Self> {
        let api_key = load_api_key(runtime)?;
        debug!("Using API key: {}", mask(&api_key));

        let defaults = FetchDefaults::from_runtime(runtime);
        let client = Client::builder().user_agent("moltbook-cli").build()?;
        let fetcher = ApiClient::new(client, cli.api_url.as_deref(), defaults)?;

        let mut options = FetchOptions::new(api_key);
        // Zero falls back to the default, as it does for MOLTBOOK_TIMEOUT_MS.
        options.timeout = cli
            .timeout_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis);
        options.max_retries = cli.retries;

        Ok(Self {
            fetcher,
            options,
            output: cli.output,
        })
    }
}

impl<F: FetchJson> Config<F> {
    /// GETs `path` with the configured key and fetch options.
    pub async fn fetch(&self, path: &str) -> Result<Value> {
        Ok(self.fetcher.fetch_json(path, &self.options).await?)
    }
}

/// Keeps only the first 8 characters of a key for diagnostics.
fn mask(key: &str) -> String {
    let visible: String = key.chars().take(8).collect();
    if visible.len() == key.len() {
        "*********".to_string()
    } else {
        format!("{}*********", visible)
    }
}
