// openrouter integration - one chat completion per prompt, no retries

use crate::{Config, Error};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Something that turns a user prompt into an assistant reply.
#[async_trait]
pub trait Relay: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, Error>;
}

pub struct OpenRouter {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    system_prompt: String,
    referer: String,
    title: String,
}

// what we send
#[derive(Serialize)]
struct Request<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

// what comes back
#[derive(Deserialize)]
struct Response {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ReplyMessage>,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

impl OpenRouter {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            system_prompt: config.system_prompt.clone(),
            referer: config.referer.clone(),
            title: config.title.clone(),
        })
    }
}

#[async_trait]
impl Relay for OpenRouter {
    async fn complete(&self, prompt: &str) -> Result<String, Error> {
        let request = Request {
            model: &self.model,
            messages: [
                Message {
                    role: "system",
                    content: &self.system_prompt,
                },
                Message {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let mut call = self
            .client
            .post(&self.endpoint)
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.title)
            .json(&request);

        // without a key the request still goes out and upstream rejects it
        if let Some(key) = &self.api_key {
            call = call.bearer_auth(key);
        }

        info!(model = %self.model, "sending request to completion API");
        let response = call.send().await?;
        let status = response.status();
        let body = response.text().await?;

        debug!(status = status.as_u16(), body = %body, "raw completion API response");

        if !status.is_success() {
            // prefer the api's own error message when it sends one
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .and_then(|e| e.message);
            let message = match message {
                Some(m) => m,
                None if body.trim().is_empty() => "unknown error".to_string(),
                None => body,
            };
            return Err(Error::Relay(format!("status {}: {message}", status.as_u16())));
        }

        let response: Response = serde_json::from_str(&body)?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .ok_or(Error::EmptyReply)
    }
}
