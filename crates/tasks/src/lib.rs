//! `taskdeck-tasks` — the Task entity and the owner-scoped store contract.

pub mod model;
pub mod store;

pub use model::{FieldErrors, NewTask, Task, TaskPatch};
pub use store::{InMemoryTaskStore, TaskStore, TaskStoreError};
