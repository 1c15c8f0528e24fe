use std::collections::HashMap;
use std::fmt::Write;
use std::time::{Duration, Instant};

use crate::registry::Registry;

#[derive(Debug, Clone, Copy)]
pub struct TaskExecution {
    pub start: Instant,
    pub duration: Duration,
}

/// Execution metrics collected by an [`Executor`](crate::Executor).
///
/// Only successful task runs are recorded. A retried task keeps the timing of
/// its successful attempt.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    /// Task name to execution metrics.
    pub execution_times: HashMap<String, TaskExecution>,
}

impl Diagnostics {
    pub(crate) fn record(&mut self, name: &str, start: Instant, duration: Duration) {
        self.execution_times
            .insert(name.to_string(), TaskExecution { start, duration });
    }

    /// Sum of all recorded task durations.
    pub fn total(&self) -> Duration {
        self.execution_times.values().map(|t| t.duration).sum()
    }

    /// Recorded tasks, slowest first.
    pub fn slowest(&self) -> Vec<(&str, Duration)> {
        let mut tasks: Vec<_> = self
            .execution_times
            .iter()
            .map(|(name, t)| (name.as_str(), t.duration))
            .collect();

        tasks.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        tasks
    }

    /// Renders the task graph as a Mermaid diagram, color-coded by execution duration.
    ///
    /// * **Green**: Fast
    /// * **Yellow**: Moderate
    /// * **Red**: Slow
    /// * **Grey**: Not run
    pub fn render_mermaid(&self, registry: &Registry) -> String {
        let mut f = String::new();
        let _ = self.write_mermaid(&mut f, registry);
        f
    }

    fn write_mermaid(&self, f: &mut String, registry: &Registry) -> std::fmt::Result {
        writeln!(f, "graph LR")?;

        let times = &self.execution_times;
        let (min_time, max_time) = times
            .values()
            .map(|t| t.duration.as_secs_f64())
            .fold(None, |acc: Option<(f64, f64)>, secs| match acc {
                Some((lo, hi)) => Some((lo.min(secs), hi.max(secs))),
                None => Some((secs, secs)),
            })
            .unwrap_or((0.0, 0.0));

        // Avoid divide by zero if all tasks took same time
        let span = if (max_time - min_time).abs() < f64::EPSILON {
            1.0
        } else {
            max_time - min_time
        };

        let graph = registry.graph();

        for index in graph.node_indices() {
            let name = graph[index];
            let escaped = name.replace('"', "\\\"");

            let (label_extra, color_code) = match times.get(name) {
                Some(exec) => {
                    let t = (exec.duration.as_secs_f64() - min_time) / span;
                    (format!("{:.2?}", exec.duration), heat(t))
                }
                None => ("not run".to_string(), "#D3D3D3".to_string()),
            };

            writeln!(f, "    {}[\"{}\\n{}\"]", index.index(), escaped, label_extra)?;
            writeln!(f, "    style {} fill:{}", index.index(), color_code)?;
        }

        for edge in graph.raw_edges() {
            writeln!(
                f,
                "    {} --> {}",
                edge.source().index(),
                edge.target().index()
            )?;
        }

        Ok(())
    }
}

/// Maps `t` in `0.0..=1.0` onto green, through yellow, to red.
fn heat(t: f64) -> String {
    let t = t.clamp(0.0, 1.0);

    let (r, g, b) = if t < 0.5 {
        ((255.0 * t * 2.0) as u8, 255, 0)
    } else {
        (255, (255.0 * (1.0 - (t - 0.5) * 2.0)) as u8, 0)
    };

    format!("#{r:02X}{g:02X}{b:02X}")
}
