//! Task storage: owner-scoped contract plus the in-memory implementation.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

use taskdeck_core::{TaskId, UserId};

use crate::model::{self, FieldErrors, NewTask, Task, TaskPatch};

/// Task store abstraction.
///
/// The owner-scoped operations are the public CRUD contract: a caller may
/// only see, modify, or delete its own tasks, and anything else reports
/// `NotFound` (never a permission error, so existence does not leak).
///
/// The system-level operations (`find_any`, `purge_completed`,
/// `delete_all_for_owner`) are reserved for background jobs and user
/// lifecycle; they are never reachable from the HTTP surface.
pub trait TaskStore: Send + Sync {
    /// Create a task bound to `owner`.
    fn create(&self, owner: UserId, input: NewTask) -> Result<Task, TaskStoreError>;

    /// List `owner`'s tasks, most recently created first.
    fn list(&self, owner: UserId) -> Result<Vec<Task>, TaskStoreError>;

    /// Fetch one of `owner`'s tasks.
    fn get(&self, owner: UserId, id: TaskId) -> Result<Task, TaskStoreError>;

    /// Apply a full or partial update to one of `owner`'s tasks.
    fn update(&self, owner: UserId, id: TaskId, patch: TaskPatch) -> Result<Task, TaskStoreError>;

    /// Delete one of `owner`'s tasks.
    fn delete(&self, owner: UserId, id: TaskId) -> Result<(), TaskStoreError>;

    /// Cross-owner lookup (background jobs only).
    fn find_any(&self, id: TaskId) -> Result<Option<Task>, TaskStoreError>;

    /// Delete every completed task across all owners, returning the count.
    /// Irreversible; running it again immediately deletes nothing.
    fn purge_completed(&self) -> Result<usize, TaskStoreError>;

    /// Cascade for user deletion: remove all of `owner`'s tasks.
    fn delete_all_for_owner(&self, owner: UserId) -> Result<usize, TaskStoreError>;
}

/// Task store error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TaskStoreError {
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    #[error("task not found")]
    NotFound,
}

struct StoredTask {
    task: Task,
    /// Insertion sequence, tie-breaker for same-instant creation times.
    seq: u64,
}

/// In-memory task store.
///
/// The `RwLock` is the single serialization point for task writes; the
/// persistence layer's consistency guarantees are modeled by it.
#[derive(Default)]
pub struct InMemoryTaskStore {
    tasks: RwLock<HashMap<TaskId, StoredTask>>,
    seq: AtomicU64,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TaskStore for InMemoryTaskStore {
    fn create(&self, owner: UserId, input: NewTask) -> Result<Task, TaskStoreError> {
        let mut errors = FieldErrors::new();
        model::validate_title(&input.title, &mut errors);
        if !errors.is_empty() {
            return Err(TaskStoreError::Validation(errors));
        }

        let task = Task {
            id: TaskId::new(),
            owner,
            title: input.title,
            description: input.description.unwrap_or_default(),
            completed: input.completed,
            created_at: Utc::now(),
        };

        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        self.tasks.write().unwrap().insert(
            task.id,
            StoredTask {
                task: task.clone(),
                seq,
            },
        );
        Ok(task)
    }

    fn list(&self, owner: UserId) -> Result<Vec<Task>, TaskStoreError> {
        let tasks = self.tasks.read().unwrap();
        let mut result: Vec<_> = tasks
            .values()
            .filter(|s| s.task.owner == owner)
            .map(|s| (s.task.created_at, s.seq, s.task.clone()))
            .collect();

        // Most recent first; seq disambiguates same-instant timestamps.
        result.sort_by(|a, b| (b.0, b.1).cmp(&(a.0, a.1)));
        Ok(result.into_iter().map(|(_, _, t)| t).collect())
    }

    fn get(&self, owner: UserId, id: TaskId) -> Result<Task, TaskStoreError> {
        let tasks = self.tasks.read().unwrap();
        match tasks.get(&id) {
            Some(s) if s.task.owner == owner => Ok(s.task.clone()),
            _ => Err(TaskStoreError::NotFound),
        }
    }

    fn update(&self, owner: UserId, id: TaskId, patch: TaskPatch) -> Result<Task, TaskStoreError> {
        let mut errors = FieldErrors::new();
        if let Some(title) = &patch.title {
            model::validate_title(title, &mut errors);
        }
        if !errors.is_empty() {
            return Err(TaskStoreError::Validation(errors));
        }

        let mut tasks = self.tasks.write().unwrap();
        match tasks.get_mut(&id) {
            Some(s) if s.task.owner == owner => {
                if let Some(title) = patch.title {
                    s.task.title = title;
                }
                if let Some(description) = patch.description {
                    s.task.description = description;
                }
                if let Some(completed) = patch.completed {
                    s.task.completed = completed;
                }
                Ok(s.task.clone())
            }
            _ => Err(TaskStoreError::NotFound),
        }
    }

    fn delete(&self, owner: UserId, id: TaskId) -> Result<(), TaskStoreError> {
        let mut tasks = self.tasks.write().unwrap();
        match tasks.get(&id) {
            Some(s) if s.task.owner == owner => {
                tasks.remove(&id);
                Ok(())
            }
            _ => Err(TaskStoreError::NotFound),
        }
    }

    fn find_any(&self, id: TaskId) -> Result<Option<Task>, TaskStoreError> {
        let tasks = self.tasks.read().unwrap();
        Ok(tasks.get(&id).map(|s| s.task.clone()))
    }

    fn purge_completed(&self) -> Result<usize, TaskStoreError> {
        let mut tasks = self.tasks.write().unwrap();
        let before = tasks.len();
        tasks.retain(|_, s| !s.task.completed);
        Ok(before - tasks.len())
    }

    fn delete_all_for_owner(&self, owner: UserId) -> Result<usize, TaskStoreError> {
        let mut tasks = self.tasks.write().unwrap();
        let before = tasks.len();
        tasks.retain(|_, s| s.task.owner != owner);
        Ok(before - tasks.len())
    }
}
