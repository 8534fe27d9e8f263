// banned-word moderation for prompts going out and replies coming back
// plain substring matching, so "hacker" trips "hack" on purpose

use crate::Error;
use regex::{Regex, RegexBuilder};
use tracing::warn;

/// Marker written over every banned term found in a reply.
pub const REDACTED: &str = "[REDACTED]";

pub const DEFAULT_BANNED_TERMS: [&str; 4] = ["kill", "hack", "bomb", "exploit"];

pub struct InputCheck {
    pub safe: bool,
    pub reason: Option<String>,
    term: Option<String>,
}

impl InputCheck {
    /// The banned term that blocked the input, if any.
    pub fn term(&self) -> Option<&str> {
        self.term.as_deref()
    }
}

pub struct OutputCheck {
    pub text: String,
    pub violated: bool,
}

pub struct Moderator {
    terms: Vec<String>,
    // one alternation over every term, None when the list is empty
    pattern: Option<Regex>,
}

impl Default for Moderator {
    /// The built-in list, [`DEFAULT_BANNED_TERMS`].
    fn default() -> Self {
        // fixed literals, valid by construction
        Self::new(DEFAULT_BANNED_TERMS).expect("built-in banned terms compile")
    }
}

impl Moderator {
    pub fn new<I, S>(terms: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let marker = REDACTED.to_lowercase();
        let mut normalized: Vec<String> = Vec::new();

        for term in terms {
            let term = term.as_ref().trim().to_lowercase();
            if term.is_empty() || normalized.contains(&term) {
                continue;
            }
            // a term that overlaps the marker would get redacted again on a second pass
            if term.contains('[') || term.contains(']') || marker.contains(&term) {
                return Err(Error::InvalidTerm(term));
            }
            normalized.push(term);
        }

        let pattern = if normalized.is_empty() {
            None
        } else {
            let alternation = normalized
                .iter()
                .map(|t| regex::escape(t))
                .collect::<Vec<_>>()
                .join("|");

            let regex = RegexBuilder::new(&alternation)
                .case_insensitive(true)
                .build()
                .map_err(|e| Error::Config(format!("cannot compile banned-term list: {e}")))?;
            Some(regex)
        };

        Ok(Self {
            terms: normalized,
            pattern,
        })
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// First banned term (in list order) contained in `text` blocks it.
    pub fn check_input(&self, text: &str) -> InputCheck {
        let lower = text.to_lowercase();

        for term in &self.terms {
            if lower.contains(term.as_str()) {
                return InputCheck {
                    safe: false,
                    reason: Some(format!("Contains banned word: \"{term}\"")),
                    term: Some(term.clone()),
                };
            }
        }

        InputCheck {
            safe: true,
            reason: None,
            term: None,
        }
    }

    /// Replaces every occurrence of every banned term with [`REDACTED`].
    pub fn check_output(&self, text: &str) -> OutputCheck {
        let Some(pattern) = &self.pattern else {
            return OutputCheck {
                text: text.to_string(),
                violated: false,
            };
        };

        let hits = pattern.find_iter(text).count();
        if hits == 0 {
            return OutputCheck {
                text: text.to_string(),
                violated: false,
            };
        }

        warn!(matches = hits, "redacting banned words from reply");

        OutputCheck {
            text: pattern.replace_all(text, REDACTED).into_owned(),
            violated: true,
        }
    }
}
