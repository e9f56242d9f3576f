//! Broker and result-backend contracts plus the in-memory implementation.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, RwLock};

use super::types::{JobId, JobOutcome, JobRecord, JobState};

/// Message-queue side of the job pipeline.
///
/// `enqueue` is the submission path (API-facing); `claim_next`/`complete`
/// are the consumption path (worker-facing). Revocation is a broker-level
/// capability: the application surfaces the `revoked` state but never
/// initiates it.
pub trait Broker: Send + Sync {
    /// Enqueue a job, returning its assigned id immediately.
    fn enqueue(&self, name: &str, args: serde_json::Value) -> Result<JobId, BrokerError>;

    /// Claim the next queued job, marking it started. Returns `None` when
    /// the queue is empty.
    fn claim_next(&self) -> Result<Option<JobRecord>, BrokerError>;

    /// Record the outcome of a claimed job. Depending on broker policy a
    /// failure may be requeued (`retry`) instead of going terminal.
    fn complete(&self, id: JobId, outcome: JobOutcome) -> Result<(), BrokerError>;

    /// Cancel a job before or during execution.
    fn revoke(&self, id: JobId) -> Result<(), BrokerError>;
}

/// Result store queried by job id.
pub trait ResultBackend: Send + Sync {
    /// Read-only lookup. `None` for ids the backend has never seen.
    fn fetch(&self, id: JobId) -> Result<Option<JobRecord>, BrokerError>;
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum BrokerError {
    #[error("unknown job: {0}")]
    UnknownJob(JobId),

    #[error("broker storage error: {0}")]
    Storage(String),
}

/// In-memory broker + result backend.
///
/// FIFO per queue, at-least-once. `max_attempts` is the broker retry
/// policy: a failed job is requeued through the `retry` state until the
/// attempt budget is spent, then lands in `failure`. The default budget of
/// 1 means no automatic retries, matching the application's stance that
/// retry policy belongs here and not in job bodies.
pub struct InMemoryBroker {
    queue: Mutex<VecDeque<JobId>>,
    records: RwLock<HashMap<JobId, JobRecord>>,
    max_attempts: u32,
}

impl InMemoryBroker {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            records: RwLock::new(HashMap::new()),
            max_attempts: 1,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }
}

impl Default for InMemoryBroker {
    fn default() -> Self {
        Self::new()
    }
}

impl Broker for InMemoryBroker {
    fn enqueue(&self, name: &str, args: serde_json::Value) -> Result<JobId, BrokerError> {
        let record = JobRecord::new(name, args);
        let id = record.id;

        self.records.write().unwrap().insert(id, record);
        self.queue.lock().unwrap().push_back(id);
        Ok(id)
    }

    fn claim_next(&self) -> Result<Option<JobRecord>, BrokerError> {
        let mut queue = self.queue.lock().unwrap();
        let mut records = self.records.write().unwrap();

        while let Some(id) = queue.pop_front() {
            let Some(record) = records.get_mut(&id) else {
                continue;
            };
            // Revoked while queued: leave the record terminal, skip delivery.
            if record.state == JobState::Revoked {
                continue;
            }
            record.mark_started();
            return Ok(Some(record.clone()));
        }

        Ok(None)
    }

    fn complete(&self, id: JobId, outcome: JobOutcome) -> Result<(), BrokerError> {
        // The record lock is released before touching the queue: `claim_next`
        // takes queue then records, so holding records while waiting on the
        // queue here would invert the lock order and wedge the pool.
        let requeue = {
            let mut records = self.records.write().unwrap();
            let record = records.get_mut(&id).ok_or(BrokerError::UnknownJob(id))?;

            // A revocation that raced the execution wins.
            if record.state == JobState::Revoked {
                return Ok(());
            }

            match outcome {
                JobOutcome::Success(result) => {
                    record.mark_success(result);
                    false
                }
                JobOutcome::Failure(error) => {
                    if record.attempt < self.max_attempts {
                        record.mark_retry(error);
                        true
                    } else {
                        record.mark_failure(error);
                        false
                    }
                }
            }
        };

        if requeue {
            self.queue.lock().unwrap().push_back(id);
        }
        Ok(())
    }

    fn revoke(&self, id: JobId) -> Result<(), BrokerError> {
        let mut records = self.records.write().unwrap();
        let record = records.get_mut(&id).ok_or(BrokerError::UnknownJob(id))?;

        if !record.state.is_terminal() {
            record.mark_revoked();
        }
        Ok(())
    }
}

impl ResultBackend for InMemoryBroker {
    fn fetch(&self, id: JobId) -> Result<Option<JobRecord>, BrokerError> {
        Ok(self.records.read().unwrap().get(&id).cloned())
    }
}
