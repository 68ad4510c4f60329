// Threshold filter: turns a comment's category scores into a report entry.

use crate::forum::comments::Comment;
use crate::moderation::traits::ModerationResult;

/// A category whose score met the threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggeredCategory {
    pub category: String,
    pub score: f64,
}

impl TriggeredCategory {
    /// Category name as shown in the report, e.g. `self_harm` -> `self harm`.
    pub fn display_name(&self) -> String {
        self.category.replace('_', " ")
    }
}

/// A comment that tripped at least one category.
#[derive(Debug, Clone, PartialEq)]
pub struct FlaggedEntry {
    pub author: String,
    pub permalink: String,
    /// Highest score first; equal scores ordered by category name.
    pub reasons: Vec<TriggeredCategory>,
}

/// Flag `comment` if any category score is at or above `threshold`.
pub fn flag_comment(
    comment: &Comment,
    result: &ModerationResult,
    threshold: f64,
) -> Option<FlaggedEntry> {
    let mut reasons: Vec<TriggeredCategory> = result
        .scores
        .iter()
        .filter(|(_, score)| **score >= threshold)
        .map(|(category, &score)| TriggeredCategory {
            category: category.clone(),
            score,
        })
        .collect();

    if reasons.is_empty() {
        return None;
    }

    reasons.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.category.cmp(&b.category))
    });

    Some(FlaggedEntry {
        author: comment.author.clone(),
        permalink: comment.permalink.clone(),
        reasons,
    })
}
