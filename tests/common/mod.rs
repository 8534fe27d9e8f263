// fake completion api shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use modrelay::{Error, Moderator, Pipeline, Relay};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// What the tests can see of a fake after handing it to a pipeline.
#[derive(Clone, Default)]
pub struct Probe {
    calls: Arc<AtomicUsize>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl Probe {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

/// Plays back scripted replies in order. `None` (or running out) fails the call.
pub struct FakeRelay {
    replies: Mutex<VecDeque<Option<String>>>,
    repeat: Option<String>,
    probe: Probe,
}

impl FakeRelay {
    pub fn script(replies: &[Option<&str>]) -> (Self, Probe) {
        let probe = Probe::default();
        let relay = Self {
            replies: Mutex::new(replies.iter().map(|r| r.map(str::to_string)).collect()),
            repeat: None,
            probe: probe.clone(),
        };
        (relay, probe)
    }

    /// Answers every call with the same text.
    pub fn always(reply: &str) -> (Self, Probe) {
        let (mut relay, probe) = Self::script(&[]);
        relay.repeat = Some(reply.to_string());
        (relay, probe)
    }

    pub fn failing() -> (Self, Probe) {
        Self::script(&[])
    }
}

#[async_trait]
impl Relay for FakeRelay {
    async fn complete(&self, prompt: &str) -> Result<String, Error> {
        self.probe.calls.fetch_add(1, Ordering::SeqCst);
        self.probe.prompts.lock().unwrap().push(prompt.to_string());

        if let Some(reply) = &self.repeat {
            return Ok(reply.clone());
        }

        match self.replies.lock().unwrap().pop_front().flatten() {
            Some(reply) => Ok(reply),
            None => Err(Error::Relay("status 502: bad gateway".to_string())),
        }
    }
}

pub fn pipeline(relay: FakeRelay) -> Pipeline {
    Pipeline::new(Moderator::default(), Box::new(relay))
}
