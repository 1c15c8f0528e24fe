mod db;
mod tasks;

use std::process::ExitCode;

use clap::Parser;
use console::Style;
use seedflow::{Executor, Registry, RunOptions, RunSummary, SeedError, init_logging};
use tracing::Level;

use crate::db::Database;

const ANSI_RED: Style = Style::new().red();
const ANSI_GREEN: Style = Style::new().green();
const ANSI_DIM: Style = Style::new().dim();

/// Seeds the platform database in dependency order.
#[derive(Parser, Debug, Clone)]
#[clap(name = "seed", version)]
struct Args {
    /// Run only these tasks and whatever they depend on.
    #[clap(short, long = "task", value_name = "NAME")]
    tasks: Vec<String>,

    /// Record failures and keep running unrelated tasks. Full runs only.
    #[clap(long, env = "SEED_CONTINUE_ON_ERROR", conflicts_with = "tasks")]
    continue_on_error: bool,

    /// Exit with success even when some tasks failed.
    #[clap(long)]
    allow_failures: bool,

    /// Print the registered tasks and exit.
    #[clap(long, conflicts_with = "graph")]
    list: bool,

    /// Print the dependency graph as a Mermaid diagram and exit.
    #[clap(long)]
    graph: bool,

    /// Print a Mermaid diagram coloured by task duration after the run.
    #[clap(long)]
    timings: bool,

    /// More output, repeat for more.
    #[clap(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only warnings and errors.
    #[clap(short, long)]
    quiet: bool,
}

impl Args {
    fn level(&self) -> Level {
        match (self.quiet, self.verbose) {
            (true, _) => Level::WARN,
            (false, 0) => Level::INFO,
            (false, 1) => Level::DEBUG,
            (false, _) => Level::TRACE,
        }
    }

    fn options(&self) -> RunOptions {
        RunOptions {
            continue_on_error: self.continue_on_error,
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    init_logging(args.level())?;

    let db = Database::open();
    let mut registry = Registry::new();
    tasks::register(&mut registry, &db)?;

    if args.list {
        for task in registry.tasks() {
            if task.dependencies().is_empty() {
                println!("{}", task.name());
            } else {
                let deps = task.dependencies().join(", ");
                println!("{} {}", task.name(), ANSI_DIM.apply_to(format!("<- {deps}")));
            }
        }
        return Ok(ExitCode::SUCCESS);
    }

    if args.graph {
        registry.validate()?;
        print!("{registry}");
        return Ok(ExitCode::SUCCESS);
    }

    let mut executor = Executor::new(registry);

    let summary = if args.tasks.is_empty() {
        executor.run_all(args.options())
    } else {
        run_selected(&mut executor, &args.tasks)
    };

    db.close()?;

    let summary = summary?;

    if args.timings {
        print!("{}", executor.diagnostics().render_mermaid(executor.registry()));
    }

    for failure in &summary.failures {
        eprintln!("{} {}", ANSI_RED.apply_to(&failure.name), failure.error);
    }

    if summary.is_success() {
        eprintln!("{}", ANSI_GREEN.apply_to(&summary));
        Ok(ExitCode::SUCCESS)
    } else if args.allow_failures {
        eprintln!("{summary}");
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!("{}", ANSI_RED.apply_to(&summary));
        Ok(ExitCode::FAILURE)
    }
}

/// Runs the selected tasks one after the other with `run_task`.
///
/// The first failure ends the run with its error.
fn run_selected(executor: &mut Executor, names: &[String]) -> Result<RunSummary, SeedError> {
    let start = std::time::Instant::now();

    for name in names {
        executor.run_task(name)?;
    }

    let succeeded = executor
        .registry()
        .names()
        .filter(|name| executor.is_complete(name))
        .count();

    let summary = RunSummary {
        succeeded,
        duration: start.elapsed(),
        ..RunSummary::default()
    };
    tracing::info!("{summary}");

    Ok(summary)
}
