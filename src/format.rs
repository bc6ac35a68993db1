//! Output formatting: raw JSON and markdown documents.

use anyhow::{Context, Result};
use serde_json::Value;

use crate::api::{AuthStatus, Comment, CommentSort, Post, PostSort, SearchResult, SearchType, view};

/// Maximum title length in table cells.
const CELL_WIDTH: usize = 80;

/// Serializes `value` as compact or 2-space indented JSON.
pub fn json_string(value: &Value, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    text.context("Failed to serialize JSON output")
}

/// Escapes text for use inside a markdown table cell.
pub fn md_escape(text: &str) -> String {
    text.replace('|', "\\|")
        .replace("\r\n", " ")
        .replace('\n', " ")
}

/// Shortens `text` to at most `max` characters, ending with `…` when cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Formats a number with en-US digit grouping and at most three decimals.
pub fn fmt_num(n: f64) -> String {
    if !n.is_finite() {
        return "-".to_string();
    }

    let fixed = format!("{:.3}", n.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let is_zero = int_part.chars().all(|c| c == '0') && frac_part.is_empty();
    let sign = if n < 0.0 && !is_zero { "-" } else { "" };

    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac_part)
    }
}

/// Formats an arbitrary JSON value as a number; `-` when it is not one.
pub fn fmt_value_num(value: Option<&Value>) -> String {
    match value {
        Some(Value::Number(n)) => n.as_f64().map(fmt_num).unwrap_or_else(|| "-".to_string()),
        Some(Value::String(s)) if s.trim().is_empty() => fmt_num(0.0),
        Some(Value::String(s)) => s.trim().parse().map(fmt_num).unwrap_or_else(|_| "-".to_string()),
        Some(Value::Bool(b)) => fmt_num(if *b { 1.0 } else { 0.0 }),
        Some(Value::Null) => fmt_num(0.0),
        _ => "-".to_string(),
    }
}

/// Drops fractional seconds from an ISO timestamp (`...00.123Z` -> `...00Z`).
pub fn fmt_date(iso: Option<&str>) -> String {
    let Some(s) = iso.filter(|s| !s.is_empty()) else {
        return "-".to_string();
    };

    let stripped = s.strip_suffix('Z').and_then(|stem| {
        let (head, fraction) = stem.rsplit_once('.')?;
        let all_digits = !fraction.is_empty() && fraction.chars().all(|c| c.is_ascii_digit());
        all_digits.then(|| format!("{}Z", head))
    });
    stripped.unwrap_or_else(|| s.to_string())
}

/// Display text of an id-like value; `-` when absent.
pub fn value_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|s| !s.is_empty())
}

fn or_dash(s: String) -> String {
    if s.is_empty() { "-".to_string() } else { s }
}

pub fn render_auth_status(data: &Value) -> Vec<String> {
    let status: AuthStatus = view(data);
    let mut lines = vec!["# Moltbook auth status".to_string(), String::new()];

    lines.push(format!(
        "- status: **{}**",
        md_escape(status.status.as_deref().unwrap_or("unknown"))
    ));
    if let Some(name) = status.agent.as_ref().and_then(|a| non_empty(&a.name)) {
        lines.push(format!("- agent: **{}**", md_escape(name)));
    }
    if let Some(message) = non_empty(&status.message) {
        lines.push(format!("- message: {}", md_escape(message)));
    }
    if let Some(url) = non_empty(&status.claim_url) {
        lines.push(format!("- claim_url: {}", url));
    }
    if let Some(hint) = non_empty(&status.hint) {
        lines.push(format!("- hint: {}", md_escape(hint)));
    }
    lines
}

pub fn render_posts(sort: PostSort, data: &Value) -> Vec<String> {
    let mut lines = vec![
        format!("# Moltbook posts ({})", sort),
        String::new(),
        format!("Count: **{}**", fmt_value_num(data.get("count"))),
        String::new(),
        "| # | title | id | score | comments | submolt | created_at |".to_string(),
        "|---:|---|---|---:|---:|---|---|".to_string(),
    ];

    let posts = data
        .get("posts")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for (i, raw) in posts.iter().enumerate() {
        let post: Post = view(raw);
        let title = or_dash(md_escape(&truncate(
            post.title.as_deref().unwrap_or(""),
            CELL_WIDTH,
        )));
        lines.push(format!(
            "| {} | {} | {} | {} | {} | {} | {} |",
            i + 1,
            title,
            md_escape(&value_text(post.id.as_ref())),
            fmt_num(post.score()),
            fmt_num(post.comment_count.unwrap_or(0.0)),
            md_escape(post.submolt_name().unwrap_or("-")),
            md_escape(&fmt_date(post.created_at.as_deref())),
        ));
    }
    lines
}

pub fn render_post(post_id: &str, data: &Value) -> Vec<String> {
    let raw = data.get("post").filter(|p| !p.is_null()).unwrap_or(data);
    let post: Post = view(raw);

    let mut lines = vec![
        format!(
            "# {}",
            md_escape(post.title.as_deref().unwrap_or("(no title)"))
        ),
        String::new(),
    ];

    let id = match post.id.as_ref() {
        Some(id) if !id.is_null() => value_text(Some(id)),
        _ => post_id.to_string(),
    };
    lines.push(format!("- id: `{}`", md_escape(&id)));

    if let Some(name) = post.submolt_name().filter(|n| !n.is_empty()) {
        lines.push(format!("- submolt: **{}**", md_escape(name)));
    }
    lines.push(format!(
        "- score: **{}** (▲{} / ▼{})",
        fmt_num(post.score()),
        fmt_num(post.upvotes.unwrap_or(0.0)),
        fmt_num(post.downvotes.unwrap_or(0.0)),
    ));
    if let Some(count) = post.comment_count {
        lines.push(format!("- comments: **{}**", fmt_num(count)));
    }
    if let Some(created) = non_empty(&post.created_at) {
        lines.push(format!("- created_at: {}", md_escape(&fmt_date(Some(created)))));
    }
    if let Some(url) = non_empty(&post.url) {
        lines.push(format!("- url: {}", url));
    }
    lines.push(String::new());

    if let Some(content) = non_empty(&post.content) {
        lines.push("## Content".to_string());
        lines.push(String::new());
        lines.push(content.to_string());
    }
    lines
}

pub fn render_comments(post_id: &str, sort: CommentSort, comments: &[Value]) -> Vec<String> {
    let mut lines = vec![
        "# Moltbook comments".to_string(),
        String::new(),
        format!("- postId: `{}`", md_escape(post_id)),
        format!("- sort: **{}**", md_escape(&sort.to_string())),
        format!("- showing: **{}**", fmt_num(comments.len() as f64)),
        String::new(),
    ];

    for (i, raw) in comments.iter().enumerate() {
        let comment: Comment = view(raw);
        let author = comment
            .author_name()
            .filter(|n| !n.is_empty())
            .map(|n| format!(" (@{})", n))
            .unwrap_or_default();

        lines.push(format!("## {}{}", i + 1, md_escape(&author)));
        lines.push(String::new());
        lines.push(format!("- id: `{}`", md_escape(&value_text(comment.id.as_ref()))));
        lines.push(format!("- score: **{}**", fmt_num(comment.score())));
        if let Some(created) = non_empty(&comment.created_at) {
            lines.push(format!("- created_at: {}", md_escape(&fmt_date(Some(created)))));
        }
        lines.push(String::new());
        if let Some(content) = non_empty(&comment.content) {
            lines.push(content.to_string());
        }
        lines.push(String::new());
    }
    lines
}

pub fn render_search(query: &str, kind: SearchType, data: &Value, limit: usize) -> Vec<String> {
    let results = data.get("results").and_then(Value::as_array);
    let count = match data.get("count") {
        Some(count) if !count.is_null() => fmt_value_num(Some(count)),
        _ => fmt_num(results.map_or(0, Vec::len) as f64),
    };

    let mut lines = vec![
        "# Moltbook search".to_string(),
        String::new(),
        format!("- query: **{}**", md_escape(query)),
        format!("- type: **{}**", md_escape(&kind.to_string())),
        format!("- count: **{}**", count),
        String::new(),
    ];

    let results: Vec<&Value> = results
        .map(|r| r.iter().take(limit).collect())
        .unwrap_or_default();
    if results.is_empty() {
        return lines;
    }

    lines.push("| # | type | title/content | similarity | post_id |".to_string());
    lines.push("|---:|---|---|---:|---|".to_string());
    for (i, raw) in results.into_iter().enumerate() {
        let result: SearchResult = view(raw);
        let text = result
            .title
            .as_deref()
            .or(result.content.as_deref())
            .unwrap_or("");
        let similarity = result
            .similarity
            .map(|s| format!("{:.2}", s))
            .unwrap_or_else(|| "-".to_string());
        let post_id = match result.post_id.as_ref().filter(|v| !v.is_null()) {
            Some(id) => value_text(Some(id)),
            None => value_text(result.id.as_ref()),
        };

        lines.push(format!(
            "| {} | {} | {} | {} | {} |",
            i + 1,
            md_escape(result.kind.as_deref().unwrap_or("-")),
            or_dash(md_escape(&truncate(text, CELL_WIDTH))),
            similarity,
            md_escape(&post_id),
        ));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_md_escape() {
        assert_eq!(md_escape("a|b"), "a\\|b");
        assert_eq!(md_escape("line1\nline2\r\nline3"), "line1 line2 line3");
        assert_eq!(md_escape("plain"), "plain");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
        assert_eq!(truncate("this is too long", 8), "this is…");
        assert_eq!(truncate("héllo wörld", 6), "héllo…");
        assert_eq!(truncate("abc", 0), "…");
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(0.0), "0");
        assert_eq!(fmt_num(7.0), "7");
        assert_eq!(fmt_num(1234.0), "1,234");
        assert_eq!(fmt_num(1234567.0), "1,234,567");
        assert_eq!(fmt_num(-9876.0), "-9,876");
        assert_eq!(fmt_num(1.5), "1.5");
        assert_eq!(fmt_num(1234.56789), "1,234.568");
        assert_eq!(fmt_num(-0.0001), "0");
        assert_eq!(fmt_num(f64::NAN), "-");
        assert_eq!(fmt_num(f64::INFINITY), "-");
    }

    #[test]
    fn test_fmt_value_num() {
        assert_eq!(fmt_value_num(Some(&json!(1500))), "1,500");
        assert_eq!(fmt_value_num(Some(&json!("42"))), "42");
        assert_eq!(fmt_value_num(Some(&json!("many"))), "-");
        assert_eq!(fmt_value_num(Some(&Value::Null)), "0");
        assert_eq!(fmt_value_num(Some(&json!([1]))), "-");
        assert_eq!(fmt_value_num(None), "-");
    }

    #[test]
    fn test_fmt_date() {
        assert_eq!(
            fmt_date(Some("2025-01-30T12:34:56.789Z")),
            "2025-01-30T12:34:56Z"
        );
        assert_eq!(fmt_date(Some("2025-01-30T12:34:56Z")), "2025-01-30T12:34:56Z");
        assert_eq!(
            fmt_date(Some("2025-01-30T12:34:56.789+00:00")),
            "2025-01-30T12:34:56.789+00:00"
        );
        assert_eq!(fmt_date(Some("")), "-");
        assert_eq!(fmt_date(None), "-");
    }

    #[test]
    fn test_json_string() {
        let value = json!({"zeta": 1, "alpha": [true]});
        assert_eq!(json_string(&value, false).unwrap(), r#"{"zeta":1,"alpha":[true]}"#);
        assert_eq!(
            json_string(&value, true).unwrap(),
            "{\n  \"zeta\": 1,\n  \"alpha\": [\n    true\n  ]\n}"
        );
    }

    #[test]
    fn test_render_auth_status() {
        let lines = render_auth_status(&json!({
            "status": "pending_claim",
            "agent": {"name": "clawd"},
            "claim_url": "https://www.moltbook.com/claim/x",
            "hint": "ask | your human"
        }));
        assert_eq!(
            lines,
            vec![
                "# Moltbook auth status",
                "",
                "- status: **pending_claim**",
                "- agent: **clawd**",
                "- claim_url: https://www.moltbook.com/claim/x",
                "- hint: ask \\| your human",
            ]
        );
    }

    #[test]
    fn test_render_auth_status_unknown() {
        let lines = render_auth_status(&Value::Null);
        assert_eq!(lines[2], "- status: **unknown**");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_render_posts() {
        let data = json!({
            "success": true,
            "count": 1234,
            "posts": [
                {
                    "id": "p1",
                    "title": "Hello | world",
                    "upvotes": 1500,
                    "downvotes": 2,
                    "comment_count": 3,
                    "submolt": {"name": "general"},
                    "created_at": "2025-01-30T12:00:00.000Z"
                },
                {"id": 7}
            ]
        });

        let lines = render_posts(PostSort::Hot, &data);
        assert_eq!(lines[0], "# Moltbook posts (hot)");
        assert_eq!(lines[2], "Count: **1,234**");
        assert_eq!(
            lines[6],
            "| 1 | Hello \\| world | p1 | 1,498 | 3 | general | 2025-01-30T12:00:00Z |"
        );
        assert_eq!(lines[7], "| 2 | - | 7 | 0 | 0 | - | - |");
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn test_render_posts_truncates_titles() {
        let long = "x".repeat(100);
        let lines = render_posts(PostSort::New, &json!({"posts": [{"title": long}]}));
        let expected = format!("{}…", "x".repeat(79));
        assert!(lines[6].contains(&expected));
        assert_eq!(lines[2], "Count: **-**");
    }

    #[test]
    fn test_render_posts_without_posts_array() {
        let lines = render_posts(PostSort::Top, &json!("maintenance"));
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn test_render_posts_keeps_row_with_mistyped_field() {
        let data = json!({
            "count": 1,
            "posts": [{
                "id": "p1",
                "title": "Real title",
                "upvotes": "5",
                "downvotes": 0,
                "created_at": 1700000000,
                "submolt": {"name": "general"}
            }]
        });
        let lines = render_posts(PostSort::Hot, &data);
        assert_eq!(lines[6], "| 1 | Real title | p1 | 5 | 0 | general | - |");
    }

    #[test]
    fn test_render_post_with_numeric_timestamp() {
        let data = json!({"post": {"id": "p9", "title": "Hi", "created_at": 1700000000}});
        let lines = render_post("p9", &data);
        assert_eq!(lines[0], "# Hi");
        assert_eq!(lines[2], "- id: `p9`");
        assert!(!lines.iter().any(|l| l.starts_with("- created_at")));
    }

    #[test]
    fn test_render_post() {
        let data = json!({
            "post": {
                "id": "abc",
                "title": "A title",
                "content": "Body text\nwith lines",
                "url": "https://example.com",
                "upvotes": 5,
                "downvotes": 1,
                "comment_count": 0,
                "submolt": {"name": "rust"},
                "created_at": "2025-02-01T00:00:00.5Z"
            }
        });
        assert_eq!(
            render_post("abc", &data),
            vec![
                "# A title",
                "",
                "- id: `abc`",
                "- submolt: **rust**",
                "- score: **4** (▲5 / ▼1)",
                "- comments: **0**",
                "- created_at: 2025-02-01T00:00:00Z",
                "- url: https://example.com",
                "",
                "## Content",
                "",
                "Body text\nwith lines",
            ]
        );
    }

    #[test]
    fn test_render_post_unwrapped_and_sparse() {
        let lines = render_post("fallback-id", &json!({"upvotes": 2}));
        assert_eq!(
            lines,
            vec![
                "# (no title)",
                "",
                "- id: `fallback-id`",
                "- score: **2** (▲2 / ▼0)",
                "",
            ]
        );
    }

    #[test]
    fn test_render_comments() {
        let comments = vec![
            json!({
                "id": "c1",
                "content": "First!",
                "upvotes": 3,
                "downvotes": 1,
                "author": {"name": "molty"},
                "created_at": "2025-01-01T00:00:00.000Z"
            }),
            json!({"id": "c2"}),
        ];
        let lines = render_comments("p1", CommentSort::Top, &comments);
        assert_eq!(
            lines,
            vec![
                "# Moltbook comments",
                "",
                "- postId: `p1`",
                "- sort: **top**",
                "- showing: **2**",
                "",
                "## 1 (@molty)",
                "",
                "- id: `c1`",
                "- score: **2**",
                "- created_at: 2025-01-01T00:00:00Z",
                "",
                "First!",
                "",
                "## 2",
                "",
                "- id: `c2`",
                "- score: **0**",
                "",
                "",
            ]
        );
    }

    #[test]
    fn test_render_search() {
        let data = json!({
            "count": 3,
            "results": [
                {"type": "post", "id": "p1", "title": "Agents", "similarity": 0.91234},
                {"type": "comment", "id": "c1", "post_id": "p2", "content": "I agree"},
                {"type": "post", "id": "p3", "title": "Third"}
            ]
        });
        let lines = render_search("agents", SearchType::All, &data, 2);
        assert_eq!(
            lines,
            vec![
                "# Moltbook search",
                "",
                "- query: **agents**",
                "- type: **all**",
                "- count: **3**",
                "",
                "| # | type | title/content | similarity | post_id |",
                "|---:|---|---|---:|---|",
                "| 1 | post | Agents | 0.91 | p1 |",
                "| 2 | comment | I agree | - | p2 |",
            ]
        );
    }

    #[test]
    fn test_render_search_count_falls_back_to_results() {
        let data = json!({"results": [{"type": "post"}]});
        let lines = render_search("q", SearchType::Posts, &data, 10);
        assert_eq!(lines[4], "- count: **1**");
        assert_eq!(lines[8], "| 1 | post | - | - | - |");
    }

    #[test]
    fn test_render_search_without_results_has_no_table() {
        let lines = render_search("nothing", SearchType::Comments, &json!({"results": []}), 10);
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[4], "- count: **0**");
    }
}
