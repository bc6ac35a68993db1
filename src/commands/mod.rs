use anyhow::Result;
use serde_json::Value;

use crate::{format::json_string, settings::parse_int_prefix};

pub mod config;
mod comments;
mod posts;
mod search;
mod status;

pub use comments::comments;
pub use config::{CliOptions, Config};
pub use posts::{post_get, posts_list};
pub use search::search;
pub use status::auth_status;

/// How command results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json {
        pretty: bool,
    },
}

impl OutputFormat {
    pub fn from_flags(json: bool, pretty: bool) -> Self {
        if json {
            OutputFormat::Json { pretty }
        } else {
            OutputFormat::Markdown
        }
    }

    /// Renders `data` as JSON, or as the markdown produced by `markdown`.
    pub fn render<M>(&self, data: &Value, markdown: M) -> Result<String>
    where
        M: FnOnce() -> Vec<String>,
    {
        match self {
            OutputFormat::Json { pretty } => json_string(data, *pretty),
            OutputFormat::Markdown => Ok(markdown().join("\n")),
        }
    }
}

/// Parses a `--limit` value leniently and clamps it to `[min, max]`.
/// Values that are not numbers become `min`.
pub fn clamp_limit(raw: &str, min: u32, max: u32) -> u32 {
    match parse_int_prefix(raw) {
        Some(n) => n.clamp(i64::from(min), i64::from(max)) as u32,
        None => min,
    }
}
