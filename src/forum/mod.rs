// Vanilla forum API: authenticated client and comment-feed paging.

pub mod client;
pub mod comments;
