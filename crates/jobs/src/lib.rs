//! `taskdeck-jobs` — queue-backed background work.
//!
//! ## Design
//!
//! - Submission is fire-and-forget: [`JobDispatcher::submit`] enqueues a
//!   message and returns the broker-assigned id without waiting for a worker.
//! - Job names map to handlers through a static table ([`JobRegistry`]) used
//!   identically by the dispatcher and the worker pool.
//! - Status is a read-through projection over the result backend
//!   ([`JobStatusTracker`]); the tracker never mutates job state.
//! - Delivery is at-least-once; job bodies must tolerate duplicates (the
//!   email notification does not, a known weakness of the product).

pub mod broker;
pub mod dispatcher;
pub mod handlers;
pub mod mailer;
pub mod registry;
pub mod tracker;
pub mod types;
pub mod worker;

pub use broker::{Broker, BrokerError, InMemoryBroker, ResultBackend};
pub use dispatcher::{DispatchError, JobDispatcher};
pub use handlers::{
    CLEANUP_COMPLETED, DELAY_TEST, GENERATE_REPORT, SEND_CREATION_NOTIFICATION, default_registry,
};
pub use mailer::{LogMailer, Mailer, MailerError, RecordingMailer, SentMail};
pub use registry::{JobContext, JobRegistry, JobTimings};
pub use tracker::JobStatusTracker;
pub use types::{JobId, JobOutcome, JobRecord, JobState, JobStatusView};
pub use worker::{WorkerPool, WorkerPoolConfig, WorkerPoolHandle};
