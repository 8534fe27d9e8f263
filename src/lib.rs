// modrelay library - moderated chat relay

pub mod cli;
mod config;
mod console;
mod core;
mod error;
mod server;

pub use config::Config;
pub use console::Console;
pub use crate::core::{
    DEFAULT_BANNED_TERMS, InputCheck, Moderator, OpenRouter, Outcome, OutputCheck, Pipeline,
    REDACTED, Relay,
};
pub use error::Error;
pub use server::Server;
