use clap::ValueEnum;
use std::fmt;

/// Sort order for post listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PostSort {
    Hot,
    New,
    Top,
}

impl fmt::Display for PostSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PostSort::Hot => "hot",
            PostSort::New => "new",
            PostSort::Top => "top",
        })
    }
}

/// Sort order for a post's comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CommentSort {
    #[default]
    Top,
    New,
    Controversial,
}

impl fmt::Display for CommentSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CommentSort::Top => "top",
            CommentSort::New => "new",
            CommentSort::Controversial => "controversial",
        })
    }
}

/// What a search should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SearchType {
    #[default]
    All,
    Posts,
    Comments,
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SearchType::All => "all",
            SearchType::Posts => "posts",
            SearchType::Comments => "comments",
        })
    }
}

pub fn agents_status() -> String {
    "/agents/status".to_string()
}

pub fn posts(sort: PostSort, limit: u32) -> String {
    format!("/posts?sort={}&limit={}", sort, limit)
}

pub fn post(id: &str) -> String {
    format!("/posts/{}", urlencoding::encode(id))
}

pub fn post_comments(id: &str, sort: CommentSort) -> String {
    format!("/posts/{}/comments?sort={}", urlencoding::encode(id), sort)
}

pub fn search(query: &str, kind: SearchType, limit: u32) -> String {
    format!(
        "/search?q={}&type={}&limit={}",
        urlencoding::encode(query),
        kind,
        limit
    )
}
