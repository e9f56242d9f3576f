//! Static job-name → handler table.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use taskdeck_tasks::TaskStore;

use crate::mailer::Mailer;
use crate::types::JobOutcome;

/// Simulated work durations, injectable so tests can shrink them.
#[derive(Debug, Clone, Copy)]
pub struct JobTimings {
    pub delay_test: Duration,
    pub report: Duration,
}

impl Default for JobTimings {
    fn default() -> Self {
        Self {
            delay_test: Duration::from_secs(5),
            report: Duration::from_secs(15),
        }
    }
}

/// Collaborators handed to every job body.
///
/// Constructed once at startup and shared by the worker pool; handlers get
/// no other way to reach application state.
pub struct JobContext {
    pub tasks: Arc<dyn TaskStore>,
    pub mailer: Arc<dyn Mailer>,
    pub timings: JobTimings,
}

/// A job body: arguments in, outcome out. Runs on a worker thread, so
/// blocking (sleeps, mail round trips) is fine here and nowhere else.
pub type JobHandler = Box<dyn Fn(&JobContext, &serde_json::Value) -> JobOutcome + Send + Sync>;

/// Name → handler table, built once and consulted identically by the
/// dispatcher (to reject unknown names at submission) and by the worker
/// pool (to route claimed jobs).
#[derive(Default)]
pub struct JobRegistry {
    handlers: HashMap<&'static str, JobHandler>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: &'static str, handler: F)
    where
        F: Fn(&JobContext, &serde_json::Value) -> JobOutcome + Send + Sync + 'static,
    {
        self.handlers.insert(name, Box::new(handler));
    }

    pub fn get(&self, name: &str) -> Option<&JobHandler> {
        self.handlers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.keys().copied()
    }
}
