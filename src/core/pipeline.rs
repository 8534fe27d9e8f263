// moderate the prompt, relay it, moderate the reply
// shared by the console and the http server

use super::{Moderator, Relay};
use crate::Error;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing but whitespace came in; nothing was checked or sent.
    Empty,
    /// The prompt hit a banned term and never left the process.
    Rejected { reason: String },
    /// The relay replied; `redacted` is set when banned terms were masked.
    Answered { text: String, redacted: bool },
}

/// Input moderation, the relay call and output moderation, in that order.
pub struct Pipeline {
    moderator: Moderator,
    relay: Box<dyn Relay>,
}

impl Pipeline {
    pub fn new(moderator: Moderator, relay: Box<dyn Relay>) -> Self {
        Self { moderator, relay }
    }

    pub fn moderator(&self) -> &Moderator {
        &self.moderator
    }

    pub async fn run(&self, prompt: &str) -> Result<Outcome, Error> {
        match self.screen(prompt) {
            Some(outcome) => Ok(outcome),
            None => self.answer(prompt).await,
        }
    }

    /// Input half of the pipeline. `Some` means the prompt stops here.
    pub fn screen(&self, prompt: &str) -> Option<Outcome> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Some(Outcome::Empty);
        }

        let input = self.moderator.check_input(prompt);
        if input.safe {
            return None;
        }

        info!(term = input.term().unwrap_or_default(), "prompt blocked");
        Some(Outcome::Rejected {
            reason: input.reason.unwrap_or_default(),
        })
    }

    /// Relays an already screened prompt and redacts the reply.
    pub async fn answer(&self, prompt: &str) -> Result<Outcome, Error> {
        let reply = self.relay.complete(prompt.trim()).await?;
        let output = self.moderator.check_output(&reply);

        Ok(Outcome::Answered {
            text: output.text,
            redacted: output.violated,
        })
    }
}
