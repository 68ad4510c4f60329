// forum-watch: moderation sweep for Vanilla forum comments.
//
// This is the library root. Each module corresponds to a stage of the
// fetch -> classify -> filter -> report pipeline, plus shared plumbing.

pub mod config;
pub mod error;
pub mod filter;
pub mod forum;
pub mod moderation;
pub mod output;
pub mod pipeline;
pub mod rate_limiter;
