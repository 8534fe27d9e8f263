// process-wide settings, built once at startup and handed down

use crate::Error;
use crate::core::DEFAULT_BANNED_TERMS;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "openai/gpt-3.5-turbo";
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a polite and helpful assistant that refuses harmful requests.";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
    pub system_prompt: String,
    pub banned_terms: Vec<String>,
    /// No timeout unless one is asked for.
    pub timeout: Option<Duration>,
    pub referer: String,
    pub title: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            banned_terms: DEFAULT_BANNED_TERMS.iter().map(|t| t.to_string()).collect(),
            timeout: None,
            referer: "http://localhost".to_string(),
            title: "modrelay".to_string(),
        }
    }
}

impl Config {
    /// The key, or [`Error::MissingApiKey`] when it is unset or blank.
    pub fn require_api_key(&self) -> Result<&str, Error> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(Error::MissingApiKey)
    }
}
