use std::collections::HashMap;

use petgraph::Graph;
use petgraph::graph::NodeIndex;

use crate::error::SeedError;
use crate::resolver::Resolver;
use crate::task::{Task, TaskResult};
use crate::Context;

/// The catalogue of seed tasks for a run.
///
/// `Registry` only stores definitions: a name, the names it depends on, and a
/// body. Dependencies may point at tasks registered later, so unknown names
/// are reported when the graph is resolved, not here.
///
/// # Example
///
/// ```rust
/// use seedflow::{Context, Registry};
/// use serde_json::json;
///
/// let mut registry = Registry::new();
///
/// registry
///     .task("roles")
///     .run(|_| Ok(Context::new().with("roles", json!(["admin"]))))?;
///
/// registry
///     .task("users")
///     .after(["roles"])
///     .run(|ctx| {
///         ctx.require(["roles"], "users")?;
///         Ok(Context::new())
///     })?;
///
/// assert_eq!(registry.names().collect::<Vec<_>>(), ["roles", "users"]);
/// # Ok::<(), seedflow::SeedError>(())
/// ```
#[derive(Debug, Default)]
pub struct Registry {
    tasks: Vec<Task>,
    index: HashMap<String, usize>,
}

impl Registry {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The entry point of the builder form of [`Registry::register`].
    pub fn task(&mut self, name: impl Into<String>) -> TaskDef<'_> {
        TaskDef {
            registry: self,
            name: name.into(),
            dependencies: Vec::new(),
        }
    }

    /// Stores a task definition.
    ///
    /// Fails with [`SeedError::DuplicateTask`] when `name` is taken.
    pub fn register<I, S, F>(
        &mut self,
        name: impl Into<String>,
        dependencies: I,
        body: F,
    ) -> Result<&mut Self, SeedError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&Context) -> TaskResult + Send + Sync + 'static,
    {
        let name = name.into();

        if self.index.contains_key(&name) {
            return Err(SeedError::DuplicateTask(name));
        }

        let dependencies = dependencies.into_iter().map(Into::into).collect();

        self.index.insert(name.clone(), self.tasks.len());
        self.tasks.push(Task::new(name, dependencies, body));

        Ok(self)
    }

    pub fn get(&self, name: &str) -> Result<&Task, SeedError> {
        self.index
            .get(name)
            .map(|&i| &self.tasks[i])
            .ok_or_else(|| SeedError::UnknownTask {
                name: name.to_string(),
                requested_by: None,
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All registered names in declaration order.
    ///
    /// The iterator is lazy and can be cloned to walk the names again.
    pub fn names(&self) -> impl Iterator<Item = &str> + Clone + '_ {
        self.tasks.iter().map(Task::name)
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> + Clone + '_ {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Checks the whole registry: every dependency must be registered and
    /// the graph must be acyclic.
    pub fn validate(&self) -> Result<(), SeedError> {
        Resolver::new(self).resolve_all().map(|_| ())
    }

    /// The registry as a dependency graph. Edges point from a dependency to
    /// the task that needs it; dependencies on unregistered names are left
    /// out.
    pub fn graph(&self) -> Graph<&str, ()> {
        let mut graph = Graph::with_capacity(self.tasks.len(), self.tasks.len());

        let nodes: Vec<NodeIndex> = self
            .tasks
            .iter()
            .map(|task| graph.add_node(task.name()))
            .collect();

        for (i, task) in self.tasks.iter().enumerate() {
            for dependency in task.dependencies() {
                if let Some(&j) = self.index.get(dependency) {
                    graph.add_edge(nodes[j], nodes[i], ());
                }
            }
        }

        graph
    }
}

impl std::fmt::Display for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let graph = self.graph();

        writeln!(f, "graph LR")?;

        for index in graph.node_indices() {
            let name = graph[index].replace('"', "\\\"");
            writeln!(f, "    {}[\"{}\"]", index.index(), name)?;
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

pub struct TaskDef<'a> {
    registry: &'a mut Registry,
    name: String,
    dependencies: Vec<String>,
}

impl<'a> TaskDef<'a> {
    /// Declares tasks that have to complete before this one. Can be called
    /// repeatedly, order is preserved.
    pub fn after<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies
            .extend(dependencies.into_iter().map(Into::into));
        self
    }

    pub fn run<F>(self, body: F) -> Result<&'a mut Registry, SeedError>
    where
        F: Fn(&Context) -> TaskResult + Send + Sync + 'static,
    {
        self.registry.register(self.name, self.dependencies, body)
    }
}
