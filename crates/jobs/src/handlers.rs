//! The application's job definitions.

use std::thread;

use taskdeck_core::TaskId;
use taskdeck_tasks::Task;

use crate::registry::{JobContext, JobRegistry};
use crate::types::JobOutcome;

pub const DELAY_TEST: &str = "delay_test";
pub const SEND_CREATION_NOTIFICATION: &str = "send_creation_notification";
pub const GENERATE_REPORT: &str = "generate_report";
pub const CLEANUP_COMPLETED: &str = "cleanup_completed";

/// Build the registry with every defined job.
pub fn default_registry() -> JobRegistry {
    let mut registry = JobRegistry::new();
    registry.register(DELAY_TEST, delay_test);
    registry.register(SEND_CREATION_NOTIFICATION, send_creation_notification);
    registry.register(GENERATE_REPORT, generate_report);
    registry.register(CLEANUP_COMPLETED, cleanup_completed);
    registry
}

/// Sleep the configured test delay, then log. Proves the asynchronous
/// pipeline end to end; safe to duplicate.
fn delay_test(ctx: &JobContext, _args: &serde_json::Value) -> JobOutcome {
    thread::sleep(ctx.timings.delay_test);
    tracing::info!("asynchronous test job finished");
    JobOutcome::Success(None)
}

/// Email the owner that a task was created.
///
/// A vanished task is a handled condition: no caller is waiting
/// synchronously, so it completes with a descriptive success result rather
/// than a failure. Not idempotent: a duplicate delivery mails twice.
fn send_creation_notification(ctx: &JobContext, args: &serde_json::Value) -> JobOutcome {
    let task_id: TaskId = match args.get("task_id").and_then(|v| v.as_str()) {
        Some(raw) => match raw.parse() {
            Ok(id) => id,
            Err(e) => return JobOutcome::Failure(format!("invalid task_id argument: {e}")),
        },
        None => return JobOutcome::Failure("missing task_id argument".to_string()),
    };

    let task = match ctx.tasks.find_any(task_id) {
        Ok(Some(task)) => task,
        Ok(None) => {
            return JobOutcome::Success(Some(format!(
                "task {task_id} not found, no notification sent"
            )));
        }
        Err(e) => return JobOutcome::Failure(format!("task lookup failed: {e}")),
    };

    let (to, subject, body) = notification_message(&task);
    match ctx.mailer.send(&to, &subject, &body) {
        Ok(()) => JobOutcome::Success(Some(format!("notification sent for task {task_id}"))),
        Err(e) => JobOutcome::Failure(e.to_string()),
    }
}

/// Sleep the configured report delay, then return a fixed message.
/// Placeholder for real report computation; success is its only terminal
/// state.
fn generate_report(ctx: &JobContext, _args: &serde_json::Value) -> JobOutcome {
    thread::sleep(ctx.timings.report);
    tracing::info!("report generation finished");
    JobOutcome::Success(Some("report generated".to_string()))
}

/// Delete every completed task across all owners. Irreversible; running it
/// against an already-clean store deletes nothing.
fn cleanup_completed(ctx: &JobContext, _args: &serde_json::Value) -> JobOutcome {
    match ctx.tasks.purge_completed() {
        Ok(count) => {
            tracing::info!(count, "completed tasks purged");
            JobOutcome::Success(Some(format!("removed {count} completed tasks")))
        }
        Err(e) => JobOutcome::Failure(format!("cleanup failed: {e}")),
    }
}

fn notification_message(task: &Task) -> (String, String, String) {
    let to = format!("{}@users.taskdeck.local", task.owner);
    let subject = format!("New task: {}", task.title);
    let body = format!(
        "A task was created.\n\nTitle: {}\nDescription: {}\nCreated: {}\n",
        task.title, task.description, task.created_at
    );
    (to, subject, body)
}
