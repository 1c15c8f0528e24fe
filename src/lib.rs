#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

mod context;
mod diagnostics;
mod error;
mod executor;
#[cfg(feature = "logging")]
mod logging;
mod registry;
pub mod report;
mod resolver;
mod task;

pub use crate::context::Context;
pub use crate::diagnostics::{Diagnostics, TaskExecution};
pub use crate::error::{ContextError, MissingPrerequisiteError, SeedError};
pub use crate::executor::{Executor, RunOptions};
#[cfg(feature = "logging")]
pub use crate::logging::init_logging;
pub use crate::registry::{Registry, TaskDef};
pub use crate::report::{Event, Recorder, Reporter, RunSummary, TracingReporter};
pub use crate::resolver::Resolver;
pub use crate::task::{Task, TaskResult, TaskState};
