//! Worker pool: claims queued jobs and runs their handlers.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::broker::Broker;
use crate::registry::{JobContext, JobRegistry};
use crate::types::{JobId, JobOutcome};

/// Worker pool configuration.
#[derive(Debug, Clone)]
pub struct WorkerPoolConfig {
    /// How often an idle worker polls the broker.
    pub poll_interval: Duration,
    /// Number of worker threads.
    pub workers: usize,
    /// Name prefix for logging and thread names.
    pub name: String,
}

impl Default for WorkerPoolConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            workers: 2,
            name: "job-worker".to_string(),
        }
    }
}

impl WorkerPoolConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

/// Handle to a running pool. Dropping it signals the workers to stop after
/// their current job; [`WorkerPoolHandle::shutdown`] additionally waits for
/// them to finish.
pub struct WorkerPoolHandle {
    shutdown: Vec<mpsc::Sender<()>>,
    joins: Vec<thread::JoinHandle<()>>,
}

impl WorkerPoolHandle {
    /// Request shutdown and wait for every worker to finish its current job.
    pub fn shutdown(self) {
        for tx in &self.shutdown {
            let _ = tx.send(());
        }
        for join in self.joins {
            let _ = join.join();
        }
    }
}

/// Spawns OS threads that poll the broker. Workers share nothing with the
/// request path except the broker and the collaborators in [`JobContext`].
pub struct WorkerPool;

impl WorkerPool {
    pub fn spawn(
        broker: Arc<dyn Broker>,
        registry: Arc<JobRegistry>,
        ctx: Arc<JobContext>,
        config: WorkerPoolConfig,
    ) -> WorkerPoolHandle {
        let mut shutdown = Vec::with_capacity(config.workers);
        let mut joins = Vec::with_capacity(config.workers);

        for n in 0..config.workers {
            let (tx, rx) = mpsc::channel::<()>();
            let name = format!("{}-{n}", config.name);
            let broker = broker.clone();
            let registry = registry.clone();
            let ctx = ctx.clone();
            let poll_interval = config.poll_interval;

            let join = thread::Builder::new()
                .name(name.clone())
                .spawn(move || worker_loop(name, broker, registry, ctx, poll_interval, rx))
                .expect("failed to spawn job worker thread");

            shutdown.push(tx);
            joins.push(join);
        }

        WorkerPoolHandle { shutdown, joins }
    }
}

fn worker_loop(
    name: String,
    broker: Arc<dyn Broker>,
    registry: Arc<JobRegistry>,
    ctx: Arc<JobContext>,
    poll_interval: Duration,
    shutdown_rx: mpsc::Receiver<()>,
) {
    info!(worker = %name, "job worker started");

    loop {
        // An explicit signal or a dropped handle both stop the worker.
        match shutdown_rx.try_recv() {
            Ok(()) | Err(mpsc::TryRecvError::Disconnected) => break,
            Err(mpsc::TryRecvError::Empty) => {}
        }

        match run_next(broker.as_ref(), &registry, &ctx) {
            Ok(Some(_)) => {}
            Ok(None) => thread::sleep(poll_interval),
            Err(e) => {
                error!(worker = %name, error = %e, "broker poll failed");
                thread::sleep(poll_interval);
            }
        }
    }

    info!(worker = %name, "job worker stopped");
}

/// Claim and execute at most one job. Shared by the worker loop and by
/// tests that want deterministic single-step execution.
pub fn run_next(
    broker: &dyn Broker,
    registry: &JobRegistry,
    ctx: &JobContext,
) -> Result<Option<JobId>, crate::broker::BrokerError> {
    let Some(record) = broker.claim_next()? else {
        return Ok(None);
    };

    debug!(job_id = %record.id, name = %record.name, attempt = record.attempt, "claimed job");

    let outcome = match registry.get(&record.name) {
        Some(handler) => handler(ctx, &record.args),
        None => JobOutcome::Failure(format!("no handler registered for job '{}'", record.name)),
    };

    match &outcome {
        JobOutcome::Success(_) => debug!(job_id = %record.id, "job completed"),
        JobOutcome::Failure(error) => {
            warn!(job_id = %record.id, %error, "job failed");
        }
    }

    broker.complete(record.id, outcome)?;
    Ok(Some(record.id))
}
