//! Collaborator wiring: store, broker, worker pool, auth.

use std::sync::Arc;
use std::time::Duration;

use taskdeck_auth::{TokenCodec, UserDirectory};
use taskdeck_jobs::{
    InMemoryBroker, JobContext, JobDispatcher, JobStatusTracker, Mailer, WorkerPool,
    WorkerPoolConfig, WorkerPoolHandle, default_registry,
};
use taskdeck_tasks::{InMemoryTaskStore, TaskStore};

use crate::config::AppConfig;

/// Everything the handlers need, constructed once and passed down as a
/// router extension. No globals: the broker, backend, store, and registry
/// live here.
pub struct AppServices {
    pub users: Arc<UserDirectory>,
    pub codec: Arc<TokenCodec>,
    pub tasks: Arc<dyn TaskStore>,
    pub dispatcher: JobDispatcher,
    pub tracker: JobStatusTracker,
    /// Keeps the worker pool alive for the router's lifetime; dropping the
    /// services stops the workers.
    _workers: WorkerPoolHandle,
}

pub fn build_services(
    cfg: &AppConfig,
    users: Arc<UserDirectory>,
    mailer: Arc<dyn Mailer>,
) -> AppServices {
    let codec = Arc::new(TokenCodec::new(cfg.jwt_secret.as_bytes()));
    let tasks: Arc<dyn TaskStore> = Arc::new(InMemoryTaskStore::new());

    let broker = Arc::new(InMemoryBroker::new());
    let registry = Arc::new(default_registry());

    let ctx = Arc::new(JobContext {
        tasks: tasks.clone(),
        mailer,
        timings: cfg.timings,
    });

    let workers = WorkerPool::spawn(
        broker.clone(),
        registry.clone(),
        ctx,
        WorkerPoolConfig::default()
            .with_workers(cfg.workers)
            .with_poll_interval(Duration::from_millis(50)),
    );

    AppServices {
        users,
        codec,
        tasks,
        dispatcher: JobDispatcher::new(broker.clone(), registry),
        tracker: JobStatusTracker::new(broker),
        _workers: workers,
    }
}
