use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error("Missing API key")]
    #[diagnostic(help("set OPENROUTER_API_KEY (a .env file works too) or pass --api-key"))]
    MissingApiKey,

    #[error("Invalid banned term {0:?}: it would collide with the redaction marker")]
    InvalidTerm(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Completion API error: {0}")]
    Relay(String),

    #[error("Completion API returned no reply")]
    EmptyReply,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Server error: {0}")]
    Server(String),
}

impl Error {
    /// Whether this error came out of the outbound completion call.
    pub fn is_relay_failure(&self) -> bool {
        matches!(
            self,
            Error::Relay(_) | Error::EmptyReply | Error::Http(_) | Error::Json(_)
        )
    }

    /// The message shown to a chat user. Details stay in the logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            Error::Json(_) | Error::EmptyReply => "Invalid API response. Check logs.",
            _ => "Server error. Try again later.",
        }
    }
}
