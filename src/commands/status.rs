use anyhow::Result;

use super::Config;
use crate::{api, format::render_auth_status, http::FetchJson};

/// Check auth and claim status of the current agent
#[tracing::instrument(skip(config))]
pub async fn auth_status<F: FetchJson>(config: &Config<F>) -> Result<String> {
    let data = config.fetch(&api::agents_status()).await?;
    config.output.render(&data, || render_auth_status(&data))
}
