// command line interface

use crate::config::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use crate::core::{Moderator, OpenRouter, Pipeline};
use crate::{Config, Console, Error, Server};
use clap::{Parser, Subcommand};
use miette::Result;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use tokio::io::AsyncBufRead;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "modrelay", version, about = "Moderated chat relay for OpenRouter")]
struct Cli {
    /// openrouter api key
    #[arg(long, short = 'k', env = "OPENROUTER_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// model identifier sent with every request
    #[arg(long, env = "MODRELAY_MODEL", default_value = DEFAULT_MODEL, global = true)]
    model: String,

    /// chat-completion endpoint
    #[arg(long, default_value = DEFAULT_ENDPOINT, global = true)]
    endpoint: String,

    /// give up on the completion call after this many seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// banned terms, replaces the built-in list (repeat or comma separate)
    #[arg(
        long = "banned-term",
        env = "MODRELAY_BANNED_TERMS",
        value_delimiter = ',',
        global = true
    )]
    banned_terms: Vec<String>,

    /// log filter when RUST_LOG is unset
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// chat in the terminal (default)
    Chat,

    /// start as http server
    Serve {
        /// port number
        #[arg(long, short, env = "PORT", default_value = "3000")]
        port: u16,

        /// host to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// directory with the landing page and other static files
        #[arg(long, default_value = "public")]
        public: PathBuf,
    },
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config {
            api_key: self.api_key.clone(),
            endpoint: self.endpoint.clone(),
            model: self.model.clone(),
            timeout: self.timeout.map(Duration::from_secs),
            ..Config::default()
        };
        if !self.banned_terms.is_empty() {
            config.banned_terms = self.banned_terms.clone();
        }
        config
    }
}

fn init_logging(level: Option<&str>, fallback: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.unwrap_or(fallback)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_pipeline(config: &Config) -> Result<Pipeline, Error> {
    let moderator = Moderator::new(&config.banned_terms)?;
    let relay = OpenRouter::new(config)?;
    Ok(Pipeline::new(moderator, Box::new(relay)))
}

/// Terminal chat mode. Without an api key nothing is read or printed.
pub async fn chat<R, O, E>(config: &Config, input: R, out: &mut O, err: &mut E) -> Result<(), Error>
where
    R: AsyncBufRead + Unpin,
    O: Write,
    E: Write,
{
    config.require_api_key()?;
    let pipeline = build_pipeline(config)?;

    Console::new(&pipeline).run(input, out, err).await
}

pub async fn run() -> Result<()> {
    // a missing .env is fine, the environment may already be set
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = cli.config();

    match cli.command {
        Some(Commands::Serve { port, host, public }) => {
            init_logging(cli.log_level.as_deref(), "info");

            // the server still starts, requests just fail upstream
            if config.require_api_key().is_err() {
                warn!("no OPENROUTER_API_KEY set, completion requests will be rejected");
            } else {
                info!("api key loaded");
            }

            let pipeline = build_pipeline(&config)?;
            info!(
                model = %config.model,
                banned_terms = ?pipeline.moderator().terms(),
                "moderation ready"
            );

            Ok(Server::run(pipeline, &public, &host, port).await?)
        }

        Some(Commands::Chat) | None => {
            init_logging(cli.log_level.as_deref(), "warn");

            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            let mut stderr = std::io::stderr();

            Ok(chat(&config, stdin, &mut stdout, &mut stderr).await?)
        }
    }
}
