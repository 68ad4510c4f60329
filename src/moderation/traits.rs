// Classifier trait: the seam between the pipeline and a moderation provider.
//
// OpenAiModerator is the production implementation. Tests plug in fixture
// classifiers so the filter and report stages run without the network.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::ClassificationError;

/// Category name -> score in [0, 1], as reported by the provider.
pub type CategoryScores = BTreeMap<String, f64>;

/// Scores for one fetched comment.
#[derive(Debug, Clone, PartialEq)]
pub struct ModerationResult {
    pub comment_id: u64,
    pub scores: CategoryScores,
}

/// Scores text against a provider's policy categories.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify a single text. One remote call per text, no batching.
    async fn classify(&self, text: &str) -> Result<CategoryScores, ClassificationError>;
}
