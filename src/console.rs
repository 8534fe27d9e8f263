// interactive terminal chat - one prompt in flight at a time

use crate::core::{Outcome, Pipeline};
use crate::Error;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::error;

#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Skip,
    Exit,
    Prompt(&'a str),
}

impl<'a> Command<'a> {
    fn parse(line: &'a str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            Command::Skip
        } else if line.eq_ignore_ascii_case("exit") {
            Command::Exit
        } else {
            Command::Prompt(line)
        }
    }
}

/// Line-by-line chat over any async reader, one exchange at a time.
pub struct Console<'a> {
    pipeline: &'a Pipeline,
}

impl<'a> Console<'a> {
    pub fn new(pipeline: &'a Pipeline) -> Self {
        Self { pipeline }
    }

    /// Reads prompts until `exit` or end of input.
    pub async fn run<R, O, E>(&self, input: R, out: &mut O, err: &mut E) -> Result<(), Error>
    where
        R: AsyncBufRead + Unpin,
        O: Write,
        E: Write,
    {
        writeln!(out, "AI moderation chat started")?;
        writeln!(out, "Type your message (or \"exit\" to quit)\n")?;

        let mut lines = input.lines();

        loop {
            write!(out, "You: ")?;
            out.flush()?;

            // closed stdin ends the session like exit does
            let Some(line) = lines.next_line().await? else {
                writeln!(out)?;
                break;
            };

            match Command::parse(&line) {
                Command::Skip => continue,
                Command::Exit => {
                    writeln!(out, "Goodbye!")?;
                    break;
                }
                Command::Prompt(prompt) => self.turn(prompt, out, err).await?,
            }
        }

        Ok(())
    }

    async fn turn<O, E>(&self, prompt: &str, out: &mut O, err: &mut E) -> Result<(), Error>
    where
        O: Write,
        E: Write,
    {
        if let Some(outcome) = self.pipeline.screen(prompt) {
            return report(&outcome, out);
        }

        writeln!(out, "Thinking...")?;

        match self.pipeline.answer(prompt).await {
            Ok(outcome) => report(&outcome, out),
            Err(e) if e.is_relay_failure() => {
                error!(error = %e, "completion call failed");
                writeln!(err, "\nError: {}\n", e.user_message())?;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

fn report<O: Write>(outcome: &Outcome, out: &mut O) -> Result<(), Error> {
    match outcome {
        Outcome::Empty => {}
        Outcome::Rejected { reason } => {
            writeln!(out, "\nYour input violated the moderation policy.")?;
            writeln!(out, "   Reason: {reason}\n")?;
        }
        Outcome::Answered { text, redacted } => {
            if *redacted {
                writeln!(out, "\nAI response contained inappropriate content (redacted)")?;
            }
            writeln!(out, "\nAI: {text}\n")?;
        }
    }
    Ok(())
}
