//! Structured progress events and the sinks that consume them.
use std::fmt::Display;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use console::Style;

const ANSI_GREEN: Style = Style::new().green();
const ANSI_RED: Style = Style::new().red();
const ANSI_YELLOW: Style = Style::new().yellow();
const ANSI_BLUE: Style = Style::new().blue();

/// Something that happened while the executor was running tasks.
#[derive(Debug, Clone, Copy)]
pub enum Event<'a> {
    TaskStarted {
        name: &'a str,
    },
    /// `run_task` was asked for a task that already completed.
    TaskSkipped {
        name: &'a str,
    },
    /// A continue-mode pass did not attempt `name` because `dependency`
    /// failed earlier in the same pass.
    TaskBlocked {
        name: &'a str,
        dependency: &'a str,
    },
    TaskCompleted {
        name: &'a str,
        duration: Duration,
    },
    TaskFailed {
        name: &'a str,
        error: &'a anyhow::Error,
    },
    RunCompleted {
        summary: &'a RunSummary,
    },
}

/// Receives executor events.
pub trait Reporter: Send {
    fn report(&self, event: &Event<'_>);
}

impl<F> Reporter for F
where
    F: Fn(&Event<'_>) + Send,
{
    fn report(&self, event: &Event<'_>) {
        self(event)
    }
}

/// Forwards events to `tracing`, one line per task plus a final summary.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, event: &Event<'_>) {
        match *event {
            Event::TaskStarted { name } => {
                tracing::debug!(task = name, "starting");
            }
            Event::TaskSkipped { name } => {
                tracing::debug!(task = name, "already complete, skipping");
            }
            Event::TaskBlocked { name, dependency } => {
                tracing::warn!(
                    task = name,
                    dependency,
                    "{} {name} (blocked by {dependency})",
                    ANSI_YELLOW.apply_to("skip")
                );
            }
            Event::TaskCompleted { name, duration } => {
                tracing::info!(
                    task = name,
                    "{} {name} {}",
                    ANSI_GREEN.apply_to("done"),
                    as_overhead(duration)
                );
            }
            Event::TaskFailed { name, error } => {
                tracing::error!(
                    task = name,
                    "{} {name}: {error:#}",
                    ANSI_RED.apply_to("fail")
                );
            }
            Event::RunCompleted { summary } => {
                if summary.is_success() {
                    tracing::info!("{summary}");
                } else {
                    tracing::error!("{summary}");
                }
            }
        }
    }
}

/// Keeps a plain-text log of every event it receives. Clones share the log.
#[derive(Debug, Default, Clone)]
pub struct Recorder {
    events: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded events, formatted as `kind:name`, e.g. `completed:roles`.
    pub fn events(&self) -> Vec<String> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Recorded events of one kind, in order.
    pub fn names_of(&self, kind: &str) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|line| {
                line.strip_prefix(kind)
                    .and_then(|rest| rest.strip_prefix(':'))
                    .map(str::to_string)
            })
            .collect()
    }
}

impl Reporter for Recorder {
    fn report(&self, event: &Event<'_>) {
        let line = match *event {
            Event::TaskStarted { name } => format!("started:{name}"),
            Event::TaskSkipped { name } => format!("skipped:{name}"),
            Event::TaskBlocked { name, .. } => format!("blocked:{name}"),
            Event::TaskCompleted { name, .. } => format!("completed:{name}"),
            Event::TaskFailed { name, .. } => format!("failed:{name}"),
            Event::RunCompleted { summary } => format!(
                "run:{}/{}/{}",
                summary.succeeded, summary.failed, summary.blocked
            ),
        };

        if let Ok(mut events) = self.events.lock() {
            events.push(line);
        }
    }
}

/// A task whose body failed during a `run_all` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFailure {
    pub name: String,
    /// The error rendered with its chain of causes.
    pub error: String,
}

/// Outcome of a `run_all` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Tasks whose bodies ran and succeeded during the call.
    pub succeeded: usize,
    /// Tasks whose bodies returned an error.
    pub failed: usize,
    /// Tasks not attempted because a dependency failed.
    pub blocked: usize,
    pub duration: Duration,
    pub failures: Vec<TaskFailure>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.blocked == 0
    }
}

impl Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Seeded {} task(s)", self.succeeded)?;

        if self.failed > 0 {
            write!(f, ", {} failed", self.failed)?;
        }

        if self.blocked > 0 {
            write!(f, ", {} blocked", self.blocked)?;
        }

        write!(f, " {}", as_overhead(self.duration))
    }
}

pub(crate) fn as_overhead(duration: Duration) -> impl Display {
    let f = format!("(+{}ms)", duration.as_millis());
    ANSI_BLUE.apply_to(f)
}
