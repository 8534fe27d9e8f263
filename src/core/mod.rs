// core logic - moderation, the completion relay, and the pipeline tying them together

mod moderation;
mod pipeline;
mod relay;

pub use moderation::{DEFAULT_BANNED_TERMS, InputCheck, Moderator, OutputCheck, REDACTED};
pub use pipeline::{Outcome, Pipeline};
pub use relay::{OpenRouter, Relay};
