//! Task definitions stored in the registry.
use std::fmt::Debug;
use std::sync::Arc;

use crate::Context;

/// Result returned by a single task body.
pub type TaskResult<T = Context> = anyhow::Result<T>;

/// Task body. Receives the run's context so far and returns the partial
/// context it produced.
pub(crate) type TaskFn = Arc<dyn Fn(&Context) -> TaskResult + Send + Sync>;

/// A named unit of seeding work together with the names of the tasks whose
/// output it reads.
#[derive(Clone)]
pub struct Task {
    name: String,
    dependencies: Vec<String>,
    body: TaskFn,
}

impl Task {
    pub(crate) fn new<F>(name: String, dependencies: Vec<String>, body: F) -> Self
    where
        F: Fn(&Context) -> TaskResult + Send + Sync + 'static,
    {
        Self {
            name,
            dependencies,
            body: Arc::new(body),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dependency names in declaration order.
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    pub(crate) fn body(&self) -> TaskFn {
        self.body.clone()
    }
}

impl Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}

/// Lifecycle of a task within one executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Registered, body not invoked yet.
    Registered,
    /// Body currently running.
    InProgress,
    /// Body returned successfully and its output was merged.
    Complete,
    /// Body returned an error. A later `run_task` call retries it.
    Failed,
}
