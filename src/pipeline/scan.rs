// Moderation sweep: fetch -> classify -> filter.
//
// Everything runs in sequence. A fetch failure aborts the sweep; a
// classification failure only drops that one comment, which is logged and
// counted so the summary shows how much of the window went unreviewed.

use std::collections::HashMap;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::error::FetchError;
use crate::filter::{flag_comment, FlaggedEntry};
use crate::forum::client::ForumClient;
use crate::forum::comments::{self, Comment};
use crate::moderation::traits::{Classifier, ModerationResult};
use crate::output::log_preview;

/// Knobs for one sweep.
#[derive(Debug, Clone, Copy)]
pub struct ScanSettings {
    pub threshold: f64,
    pub lookback_hours: u64,
    pub page_size: u32,
}

/// Counts for the stderr summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub fetched: usize,
    pub classified: usize,
    pub skipped: usize,
    pub flagged: usize,
}

/// Flagged entries in fetch order, plus run counts.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub entries: Vec<FlaggedEntry>,
    pub summary: ScanSummary,
}

/// Run a full sweep against the forum.
pub async fn run(
    client: &ForumClient,
    classifier: &dyn Classifier,
    settings: &ScanSettings,
) -> Result<ScanOutcome, FetchError> {
    let fetched =
        comments::fetch_comments(client, settings.lookback_hours, settings.page_size).await?;
    info!(count = fetched.len(), "Fetched comment(s) for review");

    Ok(review(classifier, &fetched, settings.threshold).await)
}

/// Classify and filter already-fetched comments.
pub async fn review(
    classifier: &dyn Classifier,
    comments: &[Comment],
    threshold: f64,
) -> ScanOutcome {
    let results = classify_all(classifier, comments).await;
    let entries = flag_all(comments, &results, threshold);

    let summary = ScanSummary {
        fetched: comments.len(),
        classified: results.len(),
        skipped: comments.len() - results.len(),
        flagged: entries.len(),
    };

    info!(
        flagged = summary.flagged,
        skipped = summary.skipped,
        threshold,
        "Review complete"
    );

    ScanOutcome { entries, summary }
}

/// Classify each comment body in turn, skipping the ones that fail.
pub async fn classify_all(
    classifier: &dyn Classifier,
    comments: &[Comment],
) -> Vec<ModerationResult> {
    let pb = ProgressBar::new(comments.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("  Classifying [{bar:30}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut results = Vec::with_capacity(comments.len());
    for comment in comments {
        match classifier.classify(&comment.body).await {
            Ok(scores) => results.push(ModerationResult {
                comment_id: comment.id,
                scores,
            }),
            Err(e) => {
                warn!(
                    comment_id = comment.id,
                    preview = %log_preview(&comment.body, 50),
                    error = %e,
                    "Failed to classify comment, skipping"
                );
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    results
}

/// Apply the threshold filter, keeping the comments' original order.
pub fn flag_all(
    comments: &[Comment],
    results: &[ModerationResult],
    threshold: f64,
) -> Vec<FlaggedEntry> {
    let by_id: HashMap<u64, &ModerationResult> =
        results.iter().map(|r| (r.comment_id, r)).collect();

    comments
        .iter()
        .filter_map(|c| by_id.get(&c.id).and_then(|r| flag_comment(c, r, threshold)))
        .collect()
}
