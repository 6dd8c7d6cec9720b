//! Recording doubles for the session and fetcher seams.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{BoxError, FetchError};
use crate::fetch::Fetcher;
use crate::script::ScriptSource;
use crate::session::Session;

/// Session that records every statement and fails the ones registered with `failing_on`.
#[derive(Default)]
pub struct RecordingSession {
    executed: Mutex<Vec<String>>,
    failures: HashMap<String, String>,
    delays: HashMap<String, Duration>,
}

impl RecordingSession {
    pub fn failing_on(mut self, statement: &str, message: &str) -> Self {
        self.failures.insert(statement.to_string(), message.to_string());
        self
    }

    pub fn delaying(mut self, statement: &str, delay: Duration) -> Self {
        self.delays.insert(statement.to_string(), delay);
        self
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    pub fn count_of(&self, statement: &str) -> usize {
        self.executed.lock().unwrap().iter().filter(|s| *s == statement).count()
    }
}

#[async_trait]
impl Session for RecordingSession {
    async fn execute(&self, statement: &str) -> Result<(), BoxError> {
        if let Some(delay) = self.delays.get(statement) {
            tokio::time::sleep(*delay).await;
        }
        self.executed.lock().unwrap().push(statement.to_string());
        match self.failures.get(statement) {
            Some(message) => Err(message.clone().into()),
            None => Ok(()),
        }
    }
}

/// Fetcher serving fixed content per locator; unknown locators fail with a not-found I/O error.
#[derive(Default)]
pub struct MapFetcher {
    scripts: HashMap<String, String>,
    fetched: Mutex<Vec<String>>,
}

impl MapFetcher {
    pub fn with(mut self, locator: &str, content: &str) -> Self {
        self.scripts.insert(locator.to_string(), content.to_string());
        self
    }

    pub fn fetch_count(&self, locator: &str) -> usize {
        self.fetched.lock().unwrap().iter().filter(|l| *l == locator).count()
    }
}

#[async_trait]
impl Fetcher for MapFetcher {
    async fn fetch_raw(&self, source: &ScriptSource) -> Result<String, FetchError> {
        self.fetched.lock().unwrap().push(source.as_str().to_string());
        self.scripts.get(source.as_str()).cloned().ok_or_else(|| FetchError::Io {
            locator: source.clone(),
            cause: std::io::Error::new(std::io::ErrorKind::NotFound, "unreachable"),
        })
    }
}
