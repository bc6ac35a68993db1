use anyhow::Result;
use serde_json::Value;

use super::{Config, clamp_limit};
use crate::{
    api::{self, CommentSort},
    format::render_comments,
    http::FetchJson,
};

const MAX_COMMENTS: u32 = 200;

/// Get comments for a post. The API has no limit parameter for comments,
/// so `limit` is applied here.
#[tracing::instrument(skip(config))]
pub async fn comments<F: FetchJson>(
    config: &Config<F>,
    post_id: &str,
    sort: CommentSort,
    limit: &str,
) -> Result<String> {
    let limit = clamp_limit(limit, 1, MAX_COMMENTS) as usize;
    let mut data = config.fetch(&api::post_comments(post_id, sort)).await?;

    if let Some(list) = data.get_mut("comments").and_then(Value::as_array_mut) {
        list.truncate(limit);
    }

    let comments = data
        .get("comments")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    config
        .output
        .render(&data, || render_comments(post_id, sort, comments))
}
