// Content moderation: trait-based abstraction over the classification provider.
//
// The Classifier trait is the interface the pipeline depends on.
// OpenAiModerator implements it over OpenAI's moderation endpoint.

pub mod openai;
pub mod traits;
