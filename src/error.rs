// Error taxonomy for a moderation run.
//
// ConfigError and FetchError are fatal: main prints them and exits non-zero
// without producing a report. ClassificationError is scoped to one comment;
// the scan pipeline logs it and moves on.

use thiserror::Error;

/// A required environment variable is missing or a value can't be parsed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set as an environment variable (or in .env)")]
    Missing(&'static str),

    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// The forum API failed on some page. Aborts the whole run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build forum HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("forum request for page {page} failed")]
    Request {
        page: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("forum API returned {status} for page {page}: {body}")]
    Status {
        page: u32,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("malformed comment payload on page {page}: {reason}")]
    Payload { page: u32, reason: String },
}

/// The moderation service couldn't score one comment.
#[derive(Debug, Error)]
pub enum ClassificationError {
    #[error("moderation request failed")]
    Request(#[source] reqwest::Error),

    #[error("moderation API returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("unparseable moderation response: {0}")]
    Payload(String),
}
