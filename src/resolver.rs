//! Linear execution order for a task and its transitive dependencies.
use std::collections::HashSet;

use crate::error::SeedError;
use crate::registry::Registry;

/// Computes execution orders over a [`Registry`].
///
/// The walk is a depth-first search in declaration order. Dependencies are
/// emitted before their dependents, and ties between independent subtrees are
/// broken by the order the dependencies were declared in, never by name, so
/// the same registry always produces the same order.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    registry: &'a Registry,
}

impl<'a> Resolver<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Orders `name` and everything it transitively depends on.
    pub fn resolve(&self, name: &str) -> Result<Vec<&'a str>, SeedError> {
        self.resolve_pending(name, |_| false)
    }

    /// Like [`Resolver::resolve`], but names for which `is_satisfied` holds
    /// are treated as already resolved: they and the branches below them are
    /// left out of the result.
    pub fn resolve_pending<F>(&self, name: &str, is_satisfied: F) -> Result<Vec<&'a str>, SeedError>
    where
        F: Fn(&str) -> bool,
    {
        let mut walk = Walk::new(self.registry);
        walk.done.extend(
            self.registry
                .names()
                .filter(|&known| known != name && is_satisfied(known)),
        );

        walk.visit(name, None)?;
        Ok(walk.order)
    }

    /// Orders every registered task, visiting roots in declaration order.
    pub fn resolve_all(&self) -> Result<Vec<&'a str>, SeedError> {
        let mut walk = Walk::new(self.registry);

        for name in self.registry.names() {
            walk.visit(name, None)?;
        }

        Ok(walk.order)
    }
}

struct Walk<'a> {
    registry: &'a Registry,
    /// Current path from the root of the walk.
    visiting: Vec<&'a str>,
    done: HashSet<&'a str>,
    order: Vec<&'a str>,
}

impl<'a> Walk<'a> {
    fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            visiting: Vec::new(),
            done: HashSet::new(),
            order: Vec::new(),
        }
    }

    fn visit(&mut self, name: &str, requested_by: Option<&str>) -> Result<(), SeedError> {
        if self.done.contains(name) {
            return Ok(());
        }

        if let Some(start) = self.visiting.iter().position(|&v| v == name) {
            let mut path: Vec<String> = self.visiting[start..]
                .iter()
                .map(|v| v.to_string())
                .collect();
            path.push(name.to_string());

            return Err(SeedError::CircularDependency { path });
        }

        let registry = self.registry;
        let task = registry
            .get(name)
            .map_err(|_| SeedError::UnknownTask {
                name: name.to_string(),
                requested_by: requested_by.map(str::to_string),
            })?;

        self.visiting.push(task.name());

        for dependency in task.dependencies() {
            self.visit(dependency, Some(task.name()))?;
        }

        self.visiting.pop();
        self.done.insert(task.name());
        self.order.push(task.name());

        Ok(())
    }
}
