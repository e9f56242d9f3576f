//! Fire-and-forget job submission.

use std::sync::Arc;

use tracing::info;

use crate::broker::{Broker, BrokerError};
use crate::registry::JobRegistry;
use crate::types::JobId;

#[derive(Debug, Clone, thiserror::Error)]
pub enum DispatchError {
    #[error("unknown job name: {0}")]
    UnknownJobName(String),

    #[error(transparent)]
    Broker(#[from] BrokerError),
}

/// Submits jobs by name. Holds the same registry the worker pool routes
/// with, so a name that cannot execute is rejected at submission instead of
/// dying later on a worker.
pub struct JobDispatcher {
    broker: Arc<dyn Broker>,
    registry: Arc<JobRegistry>,
}

impl JobDispatcher {
    pub fn new(broker: Arc<dyn Broker>, registry: Arc<JobRegistry>) -> Self {
        Self { broker, registry }
    }

    /// Enqueue a job and return its id immediately. Never waits for worker
    /// availability or execution.
    pub fn submit(&self, name: &str, args: serde_json::Value) -> Result<JobId, DispatchError> {
        if !self.registry.contains(name) {
            return Err(DispatchError::UnknownJobName(name.to_string()));
        }

        let id = self.broker.enqueue(name, args)?;
        info!(job_id = %id, job = name, "job submitted");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::{InMemoryBroker, ResultBackend};
    use crate::handlers::{GENERATE_REPORT, default_registry};
    use crate::types::JobState;

    #[test]
    fn submit_returns_a_pending_job_id() {
        let broker = Arc::new(InMemoryBroker::new());
        let dispatcher = JobDispatcher::new(broker.clone(), Arc::new(default_registry()));

        let id = dispatcher
            .submit(GENERATE_REPORT, serde_json::Value::Null)
            .unwrap();

        assert_eq!(broker.fetch(id).unwrap().unwrap().state, JobState::Pending);
    }

    #[test]
    fn unknown_job_name_is_rejected_at_submission() {
        let broker = Arc::new(InMemoryBroker::new());
        let dispatcher = JobDispatcher::new(broker, Arc::new(default_registry()));

        assert!(matches!(
            dispatcher.submit("definitely_not_a_job", serde_json::Value::Null),
            Err(DispatchError::UnknownJobName(_))
        ));
    }
}
