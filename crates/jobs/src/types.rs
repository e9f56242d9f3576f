//! Core job types.

use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Broker-assigned job identifier, opaque to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for JobId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

/// Job lifecycle state as reported by the result backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Not yet picked up by a worker. Also reported for ids the backend
    /// has never seen: it cannot distinguish "not yet started" from
    /// "never existed".
    Pending,
    /// A worker has begun execution.
    Started,
    /// Completed; the record's result holds the job's return value.
    Success,
    /// Terminated abnormally; the record's result holds the error text.
    Failure,
    /// Failed and queued for another attempt per broker policy.
    Retry,
    /// Cancelled before or during execution.
    Revoked,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Success | JobState::Failure | JobState::Revoked)
    }
}

/// What a handler produced.
///
/// Handled conditions (including a vanished notification target) are
/// successes with a descriptive result string; `Failure` is reserved for
/// abnormal termination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Success(Option<String>),
    Failure(String),
}

/// A job as held by the broker/result backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: JobId,
    pub name: String,
    pub args: serde_json::Value,
    pub state: JobState,
    pub result: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Delivery attempts so far (at-least-once: may exceed 1).
    pub attempt: u32,
}

impl JobRecord {
    pub fn new(name: impl Into<String>, args: serde_json::Value) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            name: name.into(),
            args,
            state: JobState::Pending,
            result: None,
            submitted_at: now,
            updated_at: now,
            attempt: 0,
        }
    }

    pub fn mark_started(&mut self) {
        self.state = JobState::Started;
        self.attempt += 1;
        self.updated_at = Utc::now();
    }

    pub fn mark_success(&mut self, result: Option<String>) {
        self.state = JobState::Success;
        self.result = result;
        self.updated_at = Utc::now();
    }

    pub fn mark_failure(&mut self, error: String) {
        self.state = JobState::Failure;
        self.result = Some(error);
        self.updated_at = Utc::now();
    }

    pub fn mark_retry(&mut self, error: String) {
        self.state = JobState::Retry;
        self.result = Some(error);
        self.updated_at = Utc::now();
    }

    pub fn mark_revoked(&mut self) {
        self.state = JobState::Revoked;
        self.updated_at = Utc::now();
    }
}

/// Client-facing status projection: current state plus the result or error
/// text once the job has finished.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusView {
    pub id: JobId,
    pub state: JobState,
    pub result: Option<String>,
}
