use thiserror::Error;

/// Errors raised by the orchestrator itself.
///
/// Registration and graph defects (`DuplicateTask`, `UnknownTask`,
/// `CircularDependency`) are always fatal. `Task` wraps whatever a task body
/// returned, together with the name of the task that failed.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Task '{0}' is already registered")]
    DuplicateTask(String),

    #[error("{}", unknown_task_message(.name, .requested_by.as_deref()))]
    UnknownTask {
        /// The name that could not be found.
        name: String,
        /// The task whose dependency list referenced `name`, if any.
        requested_by: Option<String>,
    },

    #[error("Circular dependency detected: {}", .path.join(" -> "))]
    CircularDependency {
        /// The cycle in visitation order, starting and ending with the same
        /// task.
        path: Vec<String>,
    },

    #[error("Task '{name}':\n{source}")]
    Task {
        name: String,
        #[source]
        source: anyhow::Error,
    },
}

impl SeedError {
    /// Name of the task a failure is attributed to, if there is one.
    pub fn task_name(&self) -> Option<&str> {
        match self {
            SeedError::DuplicateTask(name) => Some(name),
            SeedError::UnknownTask { requested_by, .. } => requested_by.as_deref(),
            SeedError::CircularDependency { path } => path.first().map(String::as_str),
            SeedError::Task { name, .. } => Some(name),
        }
    }

    /// Structural errors describe a broken registry rather than a failing
    /// body. They are never contained by continue-mode.
    pub fn is_structural(&self) -> bool {
        !matches!(self, SeedError::Task { .. })
    }
}

fn unknown_task_message(name: &str, requested_by: Option<&str>) -> String {
    match requested_by {
        Some(requester) => format!("Task '{name}' is not registered (required by '{requester}')"),
        None => format!("Task '{name}' is not registered"),
    }
}

/// A task body's declared prerequisites were not found in the context.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("'{caller}' is missing prerequisite context keys: {}", .missing.join(", "))]
pub struct MissingPrerequisiteError {
    /// Keys that were absent or empty, in the order they were requested.
    pub missing: Vec<String>,
    /// Label of the code that asked for them, usually a task name.
    pub caller: String,
}

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("Context key '{0}' not found")]
    NotFound(String),

    #[error("Context key '{key}' has an unexpected shape:\n{source}")]
    WrongShape {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_task_names_both_sides() {
        let err = SeedError::UnknownTask {
            name: "ghost".into(),
            requested_by: Some("X".into()),
        };

        let msg = err.to_string();
        assert!(msg.contains("'ghost'"));
        assert!(msg.contains("'X'"));
        assert_eq!(err.task_name(), Some("X"));
    }

    #[test]
    fn test_cycle_message() {
        let err = SeedError::CircularDependency {
            path: vec!["a".into(), "b".into(), "a".into()],
        };

        assert_eq!(err.to_string(), "Circular dependency detected: a -> b -> a");
        assert!(err.is_structural());
    }

    #[test]
    fn test_missing_prerequisite_message() {
        let err = MissingPrerequisiteError {
            missing: vec!["roles".into(), "plans".into()],
            caller: "users".into(),
        };

        assert_eq!(
            err.to_string(),
            "'users' is missing prerequisite context keys: roles, plans"
        );
    }
}
