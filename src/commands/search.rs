use anyhow::Result;

use super::{Config, clamp_limit};
use crate::{
    api::{self, SearchType},
    format::render_search,
    http::FetchJson,
};

const MAX_RESULTS: u32 = 50;

/// Semantic search over posts and comments
#[tracing::instrument(skip(config))]
pub async fn search<F: FetchJson>(
    config: &Config<F>,
    query: &str,
    kind: SearchType,
    limit: &str,
) -> Result<String> {
    let limit = clamp_limit(limit, 1, MAX_RESULTS);
    let data = config.fetch(&api::search(query, kind, limit)).await?;
    config
        .output
        .render(&data, || render_search(query, kind, &data, limit as usize))
}
