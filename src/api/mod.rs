//! Moltbook API endpoints and the response views used for rendering.

mod paths;
mod types;

pub use paths::{
    CommentSort, PostSort, SearchType, agents_status, post, post_comments, posts, search,
};
pub use types::{AuthStatus, Comment, Named, Post, SearchResult, view};
