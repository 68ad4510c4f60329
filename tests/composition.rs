// Composition tests: fixture comments -> fixture classifier -> filter -> report.
//
// These chain the pure stages together without touching the network.
// The end-to-end tests at the bottom run the same chain against wiremock
// stand-ins for the forum and the moderation endpoint.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use forum_watch::error::ClassificationError;
use forum_watch::forum::client::ForumClient;
use forum_watch::forum::comments::{author_name, Comment, UNKNOWN_AUTHOR};
use forum_watch::moderation::openai::OpenAiModerator;
use forum_watch::moderation::traits::{CategoryScores, Classifier};
use forum_watch::output::markdown::{render_report, NO_CONCERNS};
use forum_watch::pipeline::scan::{self, ScanSettings, ScanSummary};

// ============================================================
// Fixtures
// ============================================================

/// Classifier that looks scores up by exact comment text.
/// Texts it doesn't know fail, like a provider error would.
struct FixtureClassifier {
    scores: HashMap<String, CategoryScores>,
    calls: Mutex<Vec<String>>,
}

impl FixtureClassifier {
    fn new() -> Self {
        Self {
            scores: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn with(mut self, text: &str, pairs: &[(&str, f64)]) -> Self {
        let map: CategoryScores = pairs.iter().map(|(c, s)| (c.to_string(), *s)).collect();
        self.scores.insert(text.to_string(), map);
        self
    }
}

#[async_trait]
impl Classifier for FixtureClassifier {
    async fn classify(&self, text: &str) -> Result<CategoryScores, ClassificationError> {
        self.calls.lock().unwrap().push(text.to_string());
        self.scores
            .get(text)
            .cloned()
            .ok_or_else(|| ClassificationError::Payload(format!("no fixture for {text:?}")))
    }
}

fn at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 7, 28, 12, 0, 0).unwrap()
}

fn comment(id: u64, author: &str, body: &str) -> Comment {
    Comment {
        id,
        author: author.to_string(),
        body: body.to_string(),
        created_at: at(),
        permalink: format!("https://forum.test/discussion/comment/{id}"),
    }
}

// ============================================================
// Chain: comments -> classify -> filter -> render
// ============================================================

#[tokio::test]
async fn threshold_scenario_yields_one_row() {
    let classifier = FixtureClassifier::new()
        .with("first", &[("hate", 0.6), ("sexual", 0.1)])
        .with("second", &[("hate", 0.1)]);
    let comments = vec![comment(1, "alice", "first"), comment(2, "bob", "second")];

    let outcome = scan::review(&classifier, &comments, 0.5).await;
    let report = render_report(&outcome.entries);

    assert_eq!(
        report,
        "| User | Comment | Reason |\n\
         |------|---------|--------|\n\
         | alice | [link](https://forum.test/discussion/comment/1) | hate (0.60) |"
    );
    assert_eq!(
        outcome.summary,
        ScanSummary {
            fetched: 2,
            classified: 2,
            skipped: 0,
            flagged: 1,
        }
    );
}

#[tokio::test]
async fn zero_comments_render_the_sentinel_verbatim() {
    let classifier = FixtureClassifier::new();
    let outcome = scan::review(&classifier, &[], 0.01).await;
    assert!(outcome.entries.is_empty());
    assert_eq!(render_report(&outcome.entries), NO_CONCERNS);
    assert!(classifier.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn nothing_above_threshold_renders_the_sentinel() {
    let classifier =
        FixtureClassifier::new().with("calm", &[("hate", 0.001), ("violence", 0.002)]);
    let outcome = scan::review(&classifier, &[comment(1, "alice", "calm")], 0.01).await;
    assert_eq!(render_report(&outcome.entries), NO_CONCERNS);
}

#[tokio::test]
async fn classification_failure_skips_only_that_comment() {
    let classifier = FixtureClassifier::new()
        .with("bad one", &[("harassment", 0.7)])
        .with("bad two", &[("violence", 0.8)]);
    let comments = vec![
        comment(1, "alice", "bad one"),
        comment(2, "bob", "provider chokes on this"),
        comment(3, "carol", "bad two"),
    ];

    let outcome = scan::review(&classifier, &comments, 0.5).await;

    let authors: Vec<&str> = outcome.entries.iter().map(|e| e.author.as_str()).collect();
    assert_eq!(authors, vec!["alice", "carol"]);
    assert_eq!(outcome.summary.skipped, 1);
    assert_eq!(outcome.summary.classified, 2);
    assert_eq!(classifier.calls.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn rows_follow_fetch_order() {
    let classifier = FixtureClassifier::new()
        .with("c", &[("hate", 0.2)])
        .with("b", &[("hate", 0.9)])
        .with("a", &[("hate", 0.5)]);
    let comments = vec![
        comment(3, "third", "c"),
        comment(2, "second", "b"),
        comment(1, "first", "a"),
    ];

    let outcome = scan::review(&classifier, &comments, 0.1).await;
    let authors: Vec<&str> = outcome.entries.iter().map(|e| e.author.as_str()).collect();
    assert_eq!(authors, vec!["third", "second", "first"]);
}

#[tokio::test]
async fn missing_author_renders_placeholder() {
    let author = author_name(None, None);
    let classifier = FixtureClassifier::new().with("rude", &[("harassment", 0.4)]);
    let outcome = scan::review(&classifier, &[comment(9, &author, "rude")], 0.3).await;

    let report = render_report(&outcome.entries);
    let row = report.lines().nth(2).unwrap();
    assert!(row.starts_with(&format!("| {UNKNOWN_AUTHOR} | ")), "row was {row}");
}

// ============================================================
// End to end: mock forum + mock moderation endpoint
// ============================================================

fn forum_comment(id: u64, name: Option<&str>, body: &str, at: DateTime<Utc>) -> serde_json::Value {
    json!({
        "commentID": id,
        "body": body,
        "dateInserted": at.to_rfc3339(),
        "insertUserID": id,
        "insertUser": name.map(|n| json!({ "name": n })),
    })
}

async fn mount_moderation(server: &MockServer, input: &str, scores: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/v1/moderations"))
        .and(wiremock::matchers::body_partial_json(json!({ "input": input })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "flagged": false, "category_scores": scores }]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn full_sweep_over_mock_services() {
    let forum = MockServer::start().await;
    let openai = MockServer::start().await;
    let now = Utc::now();

    Mock::given(method("GET"))
        .and(path("/api/v2/comments"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            forum_comment(12, Some("mallory"), "go away forever", now - chrono::Duration::hours(2)),
            forum_comment(11, None, "thanks for the help", now - chrono::Duration::hours(3)),
        ])))
        .mount(&forum)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/comments"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&forum)
        .await;

    mount_moderation(&openai, "go away forever", json!({ "harassment": 0.72, "violence": 0.31, "hate": 0.02 })).await;
    mount_moderation(&openai, "thanks for the help", json!({ "harassment": 0.001 })).await;

    let client = ForumClient::with_page_delay(&forum.uri(), "va-token", Duration::ZERO).unwrap();
    let moderator = OpenAiModerator::with_call_delay(
        &format!("{}/v1/moderations", openai.uri()),
        "sk-test",
        "omni-moderation-latest",
        Duration::ZERO,
    )
    .unwrap();
    let settings = ScanSettings {
        threshold: 0.3,
        lookback_hours: 24,
        page_size: 100,
    };

    let outcome = scan::run(&client, &moderator, &settings).await.unwrap();
    let report = render_report(&outcome.entries);

    assert_eq!(outcome.summary.fetched, 2);
    assert_eq!(
        report,
        format!(
            "| User | Comment | Reason |\n\
             |------|---------|--------|\n\
             | mallory | [link]({}/discussion/comment/12) | harassment (0.72), violence (0.31) |",
            forum.uri()
        )
    );
}

#[tokio::test]
async fn forum_failure_aborts_the_sweep() {
    let forum = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&forum)
        .await;

    let client = ForumClient::with_page_delay(&forum.uri(), "va-token", Duration::ZERO).unwrap();
    let classifier = FixtureClassifier::new();
    let settings = ScanSettings {
        threshold: 0.01,
        lookback_hours: 0,
        page_size: 100,
    };

    assert!(scan::run(&client, &classifier, &settings).await.is_err());
    assert!(classifier.calls.lock().unwrap().is_empty());
}
