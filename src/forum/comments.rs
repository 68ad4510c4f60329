// Comment fetching: paginated /api/v2/comments retrieval with a lookback cutoff.
//
// Pages are requested newest-first. With a cutoff, the forum is also asked
// to filter server-side, but the window is enforced again here so an API
// that ignores the filter still can't leak old comments into the report.

use std::collections::HashSet;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use super::client::ForumClient;
use crate::error::FetchError;

const COMMENTS_ENDPOINT: &str = "/api/v2/comments";

/// Author name used when the payload has no usable name or user ID.
pub const UNKNOWN_AUTHOR: &str = "unknown";

/// A fetched forum comment.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: u64,
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub permalink: String,
}

/// Fetch every comment inside the lookback window.
///
/// `lookback_hours == 0` disables the cutoff and pages until the API runs
/// out of results.
pub async fn fetch_comments(
    client: &ForumClient,
    lookback_hours: u64,
    page_size: u32,
) -> Result<Vec<Comment>, FetchError> {
    let cutoff = cutoff_for(Utc::now(), lookback_hours);
    fetch_comments_since(client, cutoff, page_size).await
}

/// Start of the lookback window ending at `now`, or None when disabled.
pub fn cutoff_for(now: DateTime<Utc>, lookback_hours: u64) -> Option<DateTime<Utc>> {
    if lookback_hours == 0 {
        return None;
    }
    let hours = i64::try_from(lookback_hours).unwrap_or(i64::MAX);
    let window = Duration::try_hours(hours).unwrap_or(Duration::MAX);
    Some(now.checked_sub_signed(window).unwrap_or(DateTime::<Utc>::MIN_UTC))
}

/// Page through the comment feed, keeping comments at or after `cutoff`.
///
/// Paging stops on an empty page, once a whole page falls before the
/// cutoff, or when a page holds nothing but comments already collected.
/// Pages shift when new comments land mid-scan, so a comment can show up
/// on two pages; it is kept only the first time.
pub async fn fetch_comments_since(
    client: &ForumClient,
    cutoff: Option<DateTime<Utc>>,
    page_size: u32,
) -> Result<Vec<Comment>, FetchError> {
    let mut comments = Vec::new();
    let mut seen: HashSet<u64> = HashSet::new();
    let mut page: u32 = 1;

    loop {
        let mut params = vec![
            ("limit", page_size.to_string()),
            ("page", page.to_string()),
            ("sort", "-dateInserted".to_string()),
        ];
        if let Some(cutoff) = cutoff {
            params.push((
                "dateInserted",
                format!(">{}", cutoff.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ));
        }

        let payload: Value = client.get_json(COMMENTS_ENDPOINT, &params, page).await?;
        let items = page_items(payload, page)?;
        let fetched = items.len();

        if fetched == 0 {
            break;
        }

        let mut in_window = 0;
        let mut added = 0;
        for raw in items {
            let comment = raw.into_comment(client.base_url());
            if cutoff.map_or(false, |c| comment.created_at < c) {
                continue;
            }
            in_window += 1;
            if seen.insert(comment.id) {
                comments.push(comment);
                added += 1;
            }
        }

        debug!(
            page,
            fetched,
            in_window,
            added,
            total_collected = comments.len(),
            "Fetched page of comments"
        );

        if cutoff.is_some() && in_window == 0 {
            break;
        }
        if added == 0 {
            debug!(page, "Page repeated earlier comments only, stopping");
            break;
        }
        page += 1;
    }

    info!(count = comments.len(), pages = page, "Collected comments for review");

    Ok(comments)
}

/// Unwrap a page body. Vanilla returns either a bare array or `{"items": [...]}`.
fn page_items(payload: Value, page: u32) -> Result<Vec<RawComment>, FetchError> {
    let items = match payload {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut map) => map.remove("items").unwrap_or(Value::Array(Vec::new())),
        other => {
            return Err(FetchError::Payload {
                page,
                reason: format!("expected a list of comments, got {}", json_kind(&other)),
            })
        }
    };

    serde_json::from_value(items).map_err(|e| FetchError::Payload {
        page,
        reason: e.to_string(),
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Display name for a comment's author.
///
/// Prefers `insertUser.name`, then `user_<insertUserID>`, then
/// `UNKNOWN_AUTHOR`. Missing, null, or non-string fields are skipped over
/// rather than treated as errors.
pub fn author_name(insert_user: Option<&Value>, insert_user_id: Option<&Value>) -> String {
    let name = insert_user
        .and_then(|u| u.get("name"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|n| !n.is_empty());
    if let Some(name) = name {
        return name.to_string();
    }

    match insert_user_id {
        Some(Value::Number(id)) => format!("user_{id}"),
        Some(Value::String(id)) if !id.trim().is_empty() => format!("user_{}", id.trim()),
        _ => UNKNOWN_AUTHOR.to_string(),
    }
}

/// Link to a comment: the payload's own `url` when it has one.
pub fn permalink(base_url: &str, id: u64, url: Option<&str>) -> String {
    match url.map(str::trim).filter(|u| !u.is_empty()) {
        Some(url) => url.to_string(),
        None => format!("{base_url}/discussion/comment/{id}"),
    }
}

// --- Forum API response types ---

#[derive(Deserialize)]
struct RawComment {
    #[serde(rename = "commentID")]
    comment_id: u64,
    #[serde(default)]
    body: Option<String>,
    #[serde(rename = "dateInserted")]
    date_inserted: DateTime<Utc>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default, rename = "insertUser")]
    insert_user: Option<Value>,
    #[serde(default, rename = "insertUserID")]
    insert_user_id: Option<Value>,
}

impl RawComment {
    fn into_comment(self, base_url: &str) -> Comment {
        Comment {
            id: self.comment_id,
            author: author_name(self.insert_user.as_ref(), self.insert_user_id.as_ref()),
            permalink: permalink(base_url, self.comment_id, self.url.as_deref()),
            body: self.body.unwrap_or_default(),
            created_at: self.date_inserted,
        }
    }
}
