use std::collections::{HashMap, HashSet};
use std::panic::AssertUnwindSafe;
use std::sync::LazyLock;
use std::time::Instant;

use indicatif::ProgressStyle;
use tracing::Level;
use tracing_indicatif::span_ext::IndicatifSpanExt;

use crate::diagnostics::Diagnostics;
use crate::error::{MissingPrerequisiteError, SeedError};
use crate::registry::Registry;
use crate::report::{Event, Reporter, RunSummary, TaskFailure, TracingReporter};
use crate::resolver::Resolver;
use crate::task::{TaskFn, TaskState};
use crate::{Context, TaskResult};

static RUN_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .expect("Error setting progress bar template")
        .progress_chars("=>-")
});

static TASK_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_spinner()
        .template("{spinner:.blue} {msg}")
        .expect("Error setting progress bar template")
});

/// Policy for a whole [`Executor::run_all`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Record failing tasks and keep running unrelated ones instead of
    /// returning the first error.
    pub continue_on_error: bool,
}

impl RunOptions {
    pub fn fail_fast() -> Self {
        Self::default()
    }

    pub fn continue_on_error() -> Self {
        Self {
            continue_on_error: true,
        }
    }
}

/// Runs registered tasks in dependency order, each at most once, folding
/// their output into a single [`Context`].
///
/// # Example
///
/// ```rust
/// use seedflow::{Context, Executor, Registry};
/// use serde_json::json;
///
/// let mut registry = Registry::new();
/// registry
///     .task("roles")
///     .run(|_| Ok(Context::new().with("roles", json!(["admin", "student"]))))?;
/// registry
///     .task("users")
///     .after(["roles"])
///     .run(|ctx| {
///         let roles: Vec<String> = ctx.get_as("roles")?;
///         Ok(Context::new().with("users", json!([{ "id": 1, "role": roles[0] }])))
///     })?;
///
/// let mut executor = Executor::new(registry);
/// let context = executor.run_task("users")?;
/// assert!(context.contains("roles"));
/// assert!(context.contains("users"));
/// # Ok::<(), seedflow::SeedError>(())
/// ```
pub struct Executor {
    registry: Registry,
    context: Context,
    states: HashMap<String, TaskState>,
    reporter: Box<dyn Reporter>,
    diagnostics: Diagnostics,
}

impl Executor {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            context: Context::new(),
            states: HashMap::new(),
            reporter: Box::new(TracingReporter),
            diagnostics: Diagnostics::default(),
        }
    }

    /// Replaces the default [`TracingReporter`].
    pub fn with_reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    /// Seeds the context store before any task runs.
    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn state(&self, name: &str) -> Result<TaskState, SeedError> {
        self.registry.get(name)?;

        Ok(self
            .states
            .get(name)
            .copied()
            .unwrap_or(TaskState::Registered))
    }

    pub fn is_complete(&self, name: &str) -> bool {
        self.states.get(name) == Some(&TaskState::Complete)
    }

    /// A copy of the context store. Changing it does not affect the run.
    pub fn context(&self) -> Context {
        self.context.clone()
    }

    pub fn into_context(self) -> Context {
        self.context
    }

    /// Checks that `keys` are present and non-empty in the current context.
    pub fn require_context<I, S>(&self, keys: I, caller: &str) -> Result<(), MissingPrerequisiteError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.context.require(keys, caller)
    }

    /// Runs `name` after every dependency that has not completed yet.
    ///
    /// A task that already completed is not run again; the current context is
    /// returned as is. The first failing body stops the chain, its error is
    /// returned and the task can be retried by calling this again.
    pub fn run_task(&mut self, name: &str) -> Result<&Context, SeedError> {
        self.registry.get(name)?;

        if self.is_complete(name) {
            self.reporter.report(&Event::TaskSkipped { name });
            return Ok(&self.context);
        }

        for task in self.pending_chain(name)? {
            self.execute(&task)?;
        }

        Ok(&self.context)
    }

    /// Runs every registered task that has not completed yet.
    ///
    /// The registry is validated first, so unknown dependencies and cycles
    /// are reported before any body runs. They are fatal in either mode.
    ///
    /// By default the first failing task ends the call with its error. With
    /// [`RunOptions::continue_on_error`] the failure is recorded, tasks that
    /// depend on it are reported as blocked, and everything else still runs;
    /// the returned summary carries the counts.
    ///
    /// `RunCompleted` is reported on every return path, errors included.
    pub fn run_all(&mut self, options: RunOptions) -> Result<RunSummary, SeedError> {
        let start = Instant::now();

        if let Err(err) = self.registry.validate() {
            let summary = RunSummary {
                duration: start.elapsed(),
                ..RunSummary::default()
            };
            self.reporter.report(&Event::RunCompleted { summary: &summary });
            return Err(err);
        }

        let pending: Vec<String> = self
            .registry
            .names()
            .filter(|name| !self.is_complete(name))
            .map(str::to_string)
            .collect();

        let root_span = tracing::span!(Level::INFO, "seeding");
        root_span.pb_set_style(&RUN_STYLE);
        root_span.pb_set_length(pending.len() as u64);
        root_span.pb_set_message("Running seed tasks...");
        let _enter = root_span.enter();

        let mut summary = RunSummary::default();
        let mut failed: HashSet<String> = HashSet::new();

        for name in &pending {
            if self.is_complete(name) || failed.contains(name) {
                continue;
            }

            let chain = match self.pending_chain(name) {
                Ok(chain) => chain,
                Err(err) => {
                    summary.duration = start.elapsed();
                    self.reporter.report(&Event::RunCompleted { summary: &summary });
                    return Err(err);
                }
            };

            if let Some(dependency) = chain.iter().find(|task| failed.contains(*task)) {
                self.reporter.report(&Event::TaskBlocked {
                    name: name.as_str(),
                    dependency: dependency.as_str(),
                });
                summary.blocked += 1;
                root_span.pb_inc(1);
                continue;
            }

            for task in &chain {
                match self.execute(task) {
                    Ok(()) => {
                        summary.succeeded += 1;
                        root_span.pb_inc(1);
                    }
                    Err(err) => {
                        summary.failed += 1;
                        summary.failures.push(TaskFailure {
                            name: task.clone(),
                            error: format!("{:#}", source_of(&err)),
                        });
                        root_span.pb_inc(1);

                        if !options.continue_on_error || err.is_structural() {
                            summary.duration = start.elapsed();
                            self.reporter.report(&Event::RunCompleted { summary: &summary });
                            return Err(err);
                        }

                        failed.insert(task.clone());

                        if task != name {
                            self.reporter.report(&Event::TaskBlocked {
                                name: name.as_str(),
                                dependency: task.as_str(),
                            });
                            summary.blocked += 1;
                            root_span.pb_inc(1);
                        }

                        break;
                    }
                }
            }
        }

        summary.duration = start.elapsed();
        self.reporter.report(&Event::RunCompleted { summary: &summary });

        Ok(summary)
    }

    /// Not-yet-complete tasks `name` needs, ending with `name` itself.
    fn pending_chain(&self, name: &str) -> Result<Vec<String>, SeedError> {
        let states = &self.states;

        let chain = Resolver::new(&self.registry).resolve_pending(name, |task| {
            states.get(task) == Some(&TaskState::Complete)
        })?;

        Ok(chain.into_iter().map(str::to_string).collect())
    }

    fn execute(&mut self, name: &str) -> Result<(), SeedError> {
        let body = self.registry.get(name)?.body();

        self.states.insert(name.to_string(), TaskState::InProgress);
        self.reporter.report(&Event::TaskStarted { name });

        let span = tracing::span!(Level::INFO, "task", name);
        span.pb_set_style(&TASK_STYLE);
        span.pb_set_message(&format!("Running {name}"));
        let _enter = span.enter();

        let start = Instant::now();
        let result = invoke(&body, &self.context);
        let duration = start.elapsed();

        match result {
            Ok(partial) => {
                self.context.merge(partial);
                self.states.insert(name.to_string(), TaskState::Complete);
                self.diagnostics.record(name, start, duration);
                self.reporter
                    .report(&Event::TaskCompleted { name, duration });

                Ok(())
            }
            Err(error) => {
                self.states.insert(name.to_string(), TaskState::Failed);
                self.reporter.report(&Event::TaskFailed {
                    name,
                    error: &error,
                });

                Err(SeedError::Task {
                    name: name.to_string(),
                    source: error,
                })
            }
        }
    }
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("registry", &self.registry)
            .field("context", &self.context)
            .field("states", &self.states)
            .finish_non_exhaustive()
    }
}

/// Calls a task body, turning a panic into an ordinary task error.
fn invoke(body: &TaskFn, context: &Context) -> TaskResult {
    // The context is only read by the body and the executor discards the
    // body's result on panic, so no broken state survives an unwind.
    match std::panic::catch_unwind(AssertUnwindSafe(|| body(context))) {
        Ok(result) => result,
        Err(panic) => {
            let msg = if let Some(s) = panic.downcast_ref::<&str>() {
                format!("Task panicked: {s}")
            } else if let Some(s) = panic.downcast_ref::<String>() {
                format!("Task panicked: {s}")
            } else {
                String::from("Task panicked with unknown payload")
            };

            Err(anyhow::anyhow!(msg))
        }
    }
}

fn source_of(err: &SeedError) -> &dyn std::fmt::Display {
    match err {
        SeedError::Task { source, .. } => source,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Recorder;
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Shared log of body invocations, in call order.
    #[derive(Clone, Default)]
    struct Calls(Arc<Mutex<Vec<String>>>);

    impl Calls {
        fn push(&self, name: &str) {
            self.0.lock().unwrap().push(name.to_string());
        }

        fn list(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }

        fn count(&self, name: &str) -> usize {
            self.list().iter().filter(|n| *n == name).count()
        }
    }

    fn ok_task(registry: &mut Registry, calls: &Calls, name: &str, deps: &[&str]) {
        let calls = calls.clone();
        let key = name.to_string();
        registry
            .register(name, deps.iter().copied(), move |_| {
                calls.push(&key);
                Ok(Context::new().with(key.clone(), true))
            })
            .unwrap();
    }

    fn failing_task(registry: &mut Registry, calls: &Calls, name: &str, deps: &[&str]) {
        let calls = calls.clone();
        let key = name.to_string();
        registry
            .register(name, deps.iter().copied(), move |_| {
                calls.push(&key);
                anyhow::bail!("{key} exploded")
            })
            .unwrap();
    }

    fn executor(registry: Registry) -> (Executor, Recorder) {
        let recorder = Recorder::new();
        let executor = Executor::new(registry).with_reporter(recorder.clone());
        (executor, recorder)
    }

    #[test]
    fn test_run_task_twice_runs_body_once() {
        let calls = Calls::default();
        let mut registry = Registry::new();
        ok_task(&mut registry, &calls, "x", &[]);

        let (mut executor, recorder) = executor(registry);
        executor.run_task("x").unwrap();
        executor.run_task("x").unwrap();

        assert_eq!(calls.count("x"), 1);
        assert_eq!(recorder.names_of("skipped"), ["x"]);
        assert_eq!(executor.state("x").unwrap(), TaskState::Complete);
    }

    #[test]
    fn test_concrete_seed_chain() {
        let calls = Calls::default();
        let seen_by_users: Arc<Mutex<Option<Context>>> = Arc::default();
        let mut registry = Registry::new();

        let log = calls.clone();
        registry
            .task("roles")
            .run(move |_| {
                log.push("roles");
                let names = [
                    "Super Administrador",
                    "Administrador",
                    "Instructor",
                    "Estudiante",
                    "Reclutador",
                    "Empresa",
                    "Soporte",
                    "Invitado",
                ];
                let roles: Vec<Value> = names
                    .iter()
                    .enumerate()
                    .map(|(i, name)| json!({ "id": i + 1, "name": name }))
                    .collect();
                Ok(Context::new().with("roles", roles))
            })
            .unwrap();

        let log = calls.clone();
        registry
            .task("adminUser")
            .after(["roles"])
            .run(move |ctx| {
                log.push("adminUser");
                ctx.require(["roles"], "adminUser")?;
                let roles: Vec<Value> = ctx.get_as("roles")?;
                let role = roles
                    .iter()
                    .find(|r| r["name"] == "Super Administrador")
                    .ok_or_else(|| anyhow::anyhow!("no super admin role"))?;
                Ok(Context::new().with("adminUser", json!({ "id": 100, "roleId": role["id"] })))
            })
            .unwrap();

        let log = calls.clone();
        let seen = seen_by_users.clone();
        registry
            .task("users")
            .after(["roles", "adminUser"])
            .run(move |ctx| {
                log.push("users");
                *seen.lock().unwrap() = Some(ctx.clone());
                Ok(Context::new())
            })
            .unwrap();

        let (mut executor, recorder) = executor(registry);
        executor.run_task("users").unwrap();

        assert_eq!(calls.list(), ["roles", "adminUser", "users"]);
        assert_eq!(
            recorder.events(),
            [
                "started:roles",
                "completed:roles",
                "started:adminUser",
                "completed:adminUser",
                "started:users",
                "completed:users",
            ]
        );

        let seen = seen_by_users.lock().unwrap().clone().unwrap();
        assert_eq!(seen.get("roles").unwrap().as_array().unwrap().len(), 8);
        assert_eq!(
            seen.get("adminUser"),
            Some(&json!({ "id": 100, "roleId": 1 }))
        );
    }

    #[test]
    fn test_context_propagates_to_dependents() {
        let mut registry = Registry::new();
        registry
            .task("a")
            .run(|_| Ok(Context::new().with("roles", json!(["admin"]))))
            .unwrap();
        registry
            .task("b")
            .after(["a"])
            .run(|ctx| {
                ctx.require(["roles"], "b")?;
                Ok(Context::new().with("saw_roles", true))
            })
            .unwrap();

        let (mut executor, _) = executor(registry);
        let context = executor.run_task("b").unwrap();

        assert_eq!(context.get("saw_roles"), Some(&json!(true)));
    }

    #[test]
    fn test_cycle_runs_nothing() {
        let calls = Calls::default();
        let mut registry = Registry::new();
        ok_task(&mut registry, &calls, "A", &["B"]);
        ok_task(&mut registry, &calls, "B", &["C"]);
        ok_task(&mut registry, &calls, "C", &["A"]);

        let (mut executor, recorder) = executor(registry);
        let err = executor.run_task("A").unwrap_err();

        assert!(matches!(
            err,
            SeedError::CircularDependency { path } if path == ["A", "B", "C", "A"]
        ));

        let err = executor.run_all(RunOptions::continue_on_error()).unwrap_err();
        assert!(matches!(err, SeedError::CircularDependency { .. }));
        assert!(calls.list().is_empty());
        assert_eq!(recorder.events(), ["run:0/0/0"]);
    }

    #[test]
    fn test_missing_dependency() {
        let calls = Calls::default();
        let mut registry = Registry::new();
        ok_task(&mut registry, &calls, "X", &["ghost"]);

        let (mut executor, recorder) = executor(registry);
        let err = executor.run_task("X").unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("ghost"));
        assert!(msg.contains("X"));
        assert!(matches!(
            err,
            SeedError::UnknownTask { name, requested_by: Some(by) } if name == "ghost" && by == "X"
        ));
        assert!(calls.list().is_empty());
        assert!(recorder.events().is_empty());

        let err = executor.run_all(RunOptions::continue_on_error()).unwrap_err();
        assert!(matches!(err, SeedError::UnknownTask { .. }));
        assert_eq!(recorder.events(), ["run:0/0/0"]);
    }

    #[test]
    fn test_completed_events_carry_durations() {
        let durations: Arc<Mutex<Vec<(String, Duration)>>> = Arc::default();
        let sink = durations.clone();

        let mut registry = Registry::new();
        registry
            .task("slow")
            .run(|_| {
                std::thread::sleep(Duration::from_millis(5));
                Ok(Context::new())
            })
            .unwrap();

        let mut executor = Executor::new(registry).with_reporter(move |event: &Event<'_>| {
            if let Event::TaskCompleted { name, duration } = *event {
                sink.lock().unwrap().push((name.to_string(), duration));
            }
        });
        executor.run_task("slow").unwrap();

        let durations = durations.lock().unwrap();
        assert_eq!(durations.len(), 1);
        assert_eq!(durations[0].0, "slow");
        assert!(durations[0].1 >= Duration::from_millis(5));
    }

    #[test]
    fn test_fail_fast_default() {
        let calls = Calls::default();
        let mut registry = Registry::new();
        failing_task(&mut registry, &calls, "B", &[]);
        ok_task(&mut registry, &calls, "C", &["B"]);
        ok_task(&mut registry, &calls, "D", &[]);

        let (mut executor, recorder) = executor(registry);
        let err = executor.run_all(RunOptions::default()).unwrap_err();

        assert!(matches!(&err, SeedError::Task { name, .. } if name == "B"));
        assert!(err.to_string().contains("B exploded"));
        assert_eq!(calls.count("C"), 0);
        assert_eq!(executor.state("B").unwrap(), TaskState::Failed);
        assert_eq!(executor.state("C").unwrap(), TaskState::Registered);
        assert_eq!(recorder.names_of("failed"), ["B"]);
        assert_eq!(recorder.events().last().unwrap(), "run:0/1/0");
    }

    #[test]
    fn test_fail_fast_summary_lists_failure() {
        let calls = Calls::default();
        let mut registry = Registry::new();
        failing_task(&mut registry, &calls, "B", &[]);

        let last: Arc<Mutex<Option<RunSummary>>> = Arc::default();
        let sink = last.clone();
        let mut executor = Executor::new(registry).with_reporter(move |event: &Event<'_>| {
            if let Event::RunCompleted { summary } = *event {
                *sink.lock().unwrap() = Some(summary.clone());
            }
        });
        assert!(executor.run_all(RunOptions::fail_fast()).is_err());

        let summary = last.lock().unwrap().clone().unwrap();
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].name, "B");
        assert!(summary.failures[0].error.contains("B exploded"));
    }

    #[test]
    fn test_continue_mode_contains_failures() {
        let calls = Calls::default();
        let mut registry = Registry::new();
        failing_task(&mut registry, &calls, "B", &[]);
        ok_task(&mut registry, &calls, "C", &["B"]);
        ok_task(&mut registry, &calls, "D", &[]);
        ok_task(&mut registry, &calls, "E", &["C"]);

        let (mut executor, recorder) = executor(registry);
        let summary = executor
            .run_all(RunOptions::continue_on_error())
            .unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.blocked, 2);
        assert_eq!(summary.failures[0].name, "B");
        assert!(summary.failures[0].error.contains("B exploded"));
        assert!(executor.is_complete("D"));
        assert_eq!(calls.count("B"), 1);
        assert_eq!(calls.count("C"), 0);
        assert_eq!(recorder.names_of("blocked"), ["C", "E"]);
    }

    #[test]
    fn test_continue_mode_runs_independent_siblings() {
        let calls = Calls::default();
        let mut registry = Registry::new();
        ok_task(&mut registry, &calls, "top", &["bad", "good"]);
        failing_task(&mut registry, &calls, "bad", &[]);
        ok_task(&mut registry, &calls, "good", &[]);

        let (mut executor, _) = executor(registry);
        let summary = executor
            .run_all(RunOptions::continue_on_error())
            .unwrap();

        assert!(executor.is_complete("good"));
        assert!(!executor.is_complete("top"));
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.blocked, 1);
        assert_eq!(summary.succeeded, 1);
    }

    #[test]
    fn test_failed_task_can_be_retried() {
        let attempts = Arc::new(Mutex::new(0));
        let counter = attempts.clone();
        let mut registry = Registry::new();
        registry
            .task("flaky")
            .run(move |_| {
                let mut n = counter.lock().unwrap();
                *n += 1;
                if *n == 1 {
                    anyhow::bail!("first attempt fails");
                }
                Ok(Context::new().with("flaky", *n))
            })
            .unwrap();

        let (mut executor, _) = executor(registry);
        assert!(executor.run_task("flaky").is_err());
        assert_eq!(executor.state("flaky").unwrap(), TaskState::Failed);

        let context = executor.run_task("flaky").unwrap();
        assert_eq!(context.get("flaky"), Some(&json!(2)));
        assert_eq!(*attempts.lock().unwrap(), 2);
    }

    #[test]
    fn test_panicking_body_is_a_failure() {
        let mut registry = Registry::new();
        registry
            .task("boom")
            .run(|_| panic!("kaboom"))
            .unwrap();

        let (mut executor, _) = executor(registry);
        let err = executor.run_task("boom").unwrap_err();

        assert!(err.to_string().contains("Task panicked: kaboom"));
        assert_eq!(executor.state("boom").unwrap(), TaskState::Failed);
    }

    #[test]
    fn test_missing_prerequisite_surfaces_from_body() {
        let mut registry = Registry::new();
        registry
            .task("users")
            .run(|ctx| {
                ctx.require(["roles", "plans"], "users")?;
                Ok(Context::new())
            })
            .unwrap();

        let (mut executor, _) = executor(registry);
        let err = executor.run_task("users").unwrap_err();

        let SeedError::Task { source, .. } = err else {
            panic!("expected a task error");
        };
        let missing = source.downcast_ref::<MissingPrerequisiteError>().unwrap();
        assert_eq!(missing.missing, ["roles", "plans"]);
        assert_eq!(missing.caller, "users");
    }

    #[test]
    fn test_context_is_a_copy() {
        let mut registry = Registry::new();
        registry
            .task("roles")
            .run(|_| Ok(Context::new().with("roles", json!([1]))))
            .unwrap();

        let (mut executor, _) = executor(registry);
        executor.run_all(RunOptions::default()).unwrap();

        let mut copy = executor.context();
        copy.insert("roles", json!("tampered"));

        assert_eq!(executor.context().get("roles"), Some(&json!([1])));
        assert!(executor.require_context(["roles"], "test").is_ok());
        assert_eq!(
            executor.require_context(["plans"], "test").unwrap_err().missing,
            ["plans"]
        );
    }

    #[test]
    fn test_run_all_after_run_task() {
        let calls = Calls::default();
        let mut registry = Registry::new();
        ok_task(&mut registry, &calls, "a", &[]);
        ok_task(&mut registry, &calls, "b", &["a"]);
        ok_task(&mut registry, &calls, "c", &[]);

        let (mut executor, recorder) = executor(registry);
        executor.run_task("b").unwrap();
        let summary = executor.run_all(RunOptions::default()).unwrap();

        assert_eq!(summary.succeeded, 1);
        assert!(summary.is_success());
        assert_eq!(calls.list(), ["a", "b", "c"]);
        assert!(recorder.names_of("skipped").is_empty());
        assert_eq!(executor.diagnostics().execution_times.len(), 3);
    }

    #[test]
    fn test_initial_context() {
        let mut registry = Registry::new();
        registry
            .task("users")
            .run(|ctx| {
                ctx.require(["tenant"], "users")?;
                Ok(Context::new())
            })
            .unwrap();

        let mut executor =
            Executor::new(registry).with_context(Context::new().with("tenant", "acme"));
        assert!(executor.run_task("users").is_ok());
    }

    #[test]
    fn test_state_of_unknown_task() {
        let (executor, _) = executor(Registry::new());
        assert!(matches!(
            executor.state("ghost"),
            Err(SeedError::UnknownTask { .. })
        ));
    }
}
