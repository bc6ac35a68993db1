use anyhow::Result;

use super::{Config, clamp_limit};
use crate::{
    api::{self, PostSort},
    format::{render_post, render_posts},
    http::FetchJson,
};

const MAX_POSTS: u32 = 50;

/// List posts in the given sort order
#[tracing::instrument(skip(config))]
pub async fn posts_list<F: FetchJson>(config: &Config<F>, sort: PostSort, limit: &str) -> Result<String> {
    let limit = clamp_limit(limit, 1, MAX_POSTS);
    let data = config.fetch(&api::posts(sort, limit)).await?;
    config.output.render(&data, || render_posts(sort, &data))
}

/// Show a single post
#[tracing::instrument(skip(config))]
pub async fn post_get<F: FetchJson>(config: &Config<F>, post_id: &str) -> Result<String> {
    let data = config.fetch(&api::post(post_id)).await?;
    config.output.render(&data, || render_post(post_id, &data))
}
