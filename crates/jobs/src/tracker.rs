//! Read-through job status projection.

use std::sync::Arc;

use crate::broker::{BrokerError, ResultBackend};
use crate::types::{JobId, JobState, JobStatusView};

/// Answers "where is this job?" against the result backend. Read-only:
/// it never mutates job state.
pub struct JobStatusTracker {
    backend: Arc<dyn ResultBackend>,
}

impl JobStatusTracker {
    pub fn new(backend: Arc<dyn ResultBackend>) -> Self {
        Self { backend }
    }

    /// Current state and, once finished, the result or error text.
    ///
    /// Ids the backend has never seen report `pending`: the backend cannot
    /// distinguish "not yet started" from "never existed", and the contract
    /// chooses a well-defined answer over an error.
    pub fn status(&self, id: JobId) -> Result<JobStatusView, BrokerError> {
        let view = match self.backend.fetch(id)? {
            Some(record) => JobStatusView {
                id,
                state: record.state,
                result: record.result,
            },
            None => JobStatusView {
                id,
                state: JobState::Pending,
                result: None,
            },
        };
        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::{Broker, InMemoryBroker};
    use crate::types::JobOutcome;

    #[test]
    fn unknown_id_reports_pending() {
        let broker = Arc::new(InMemoryBroker::new());
        let tracker = JobStatusTracker::new(broker);

        let view = tracker.status(JobId::new()).unwrap();
        assert_eq!(view.state, JobState::Pending);
        assert_eq!(view.result, None);
    }

    #[test]
    fn finished_job_reports_state_and_result() {
        let broker = Arc::new(InMemoryBroker::new());
        let tracker = JobStatusTracker::new(broker.clone());

        let id = broker.enqueue("generate_report", serde_json::Value::Null).unwrap();
        broker.claim_next().unwrap();
        broker
            .complete(id, JobOutcome::Success(Some("report generated".into())))
            .unwrap();

        let view = tracker.status(id).unwrap();
        assert_eq!(view.state, JobState::Success);
        assert_eq!(view.result.as_deref(), Some("report generated"));
    }
}
