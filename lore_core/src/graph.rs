//! Dependency graph - the inverted prerequisite relation between entries.
//!
//! Entry definitions declare `requires(dependent, required)` edges; the
//! cascade algorithm needs the opposite view: given an entry, every entry
//! whose prerequisite chain includes it. The graph is built once from the
//! catalog and read-only afterwards.

use std::collections::{HashMap, HashSet, VecDeque};

use lore_rules::EntryCatalog;

/// Inverted prerequisite relation: entry ID -> its direct dependents.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    dependents: HashMap<String, HashSet<String>>,
}

impl DependencyGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph from the catalog's requirement declarations.
    pub fn from_catalog(catalog: &EntryCatalog) -> Self {
        let mut graph = Self::new();
        for (dependent, required) in catalog.requirements() {
            graph.add_requirement(dependent, required);
        }
        graph
    }

    /// Record that `dependent` requires `required` as a prerequisite.
    pub fn add_requirement(&mut self, dependent: impl Into<String>, required: impl Into<String>) {
        self.dependents
            .entry(required.into())
            .or_default()
            .insert(dependent.into());
    }

    /// Iterate over the entries that directly require `id`.
    pub fn direct_dependents(&self, id: &str) -> impl Iterator<Item = &str> {
        self.dependents
            .get(id)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Collect `id` plus every entry transitively depending on it.
    ///
    /// Explicit worklist traversal with a visited set: terminates and yields
    /// a well-defined set even if the declared requirements contain a cycle.
    /// The returned order is the visit order; only the set of IDs is
    /// meaningful.
    pub fn cascade_from(&self, id: &str) -> Vec<String> {
        let mut visited: HashSet<String> = HashSet::new();
        let mut result = Vec::new();
        let mut worklist = VecDeque::new();
        worklist.push_back(id.to_string());

        while let Some(current) = worklist.pop_front() {
            if !visited.insert(current.clone()) {
                continue;
            }
            for dependent in self.direct_dependents(&current) {
                worklist.push_back(dependent.to_string());
            }
            result.push(current);
        }
        result
    }

    /// Number of entries that have at least one dependent.
    pub fn len(&self) -> usize {
        self.dependents.len()
    }

    /// Whether any requirement edges exist.
    pub fn is_empty(&self) -> bool {
        self.dependents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lore_rules::EntryDef;
    use std::collections::HashSet;

    fn ids(cascade: &[String]) -> HashSet<&str> {
        cascade.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_cascade_without_dependents_is_just_the_root() {
        let graph = DependencyGraph::new();
        assert_eq!(graph.cascade_from("morse"), vec!["morse"]);
    }

    #[test]
    fn test_cascade_follows_chains() {
        let mut graph = DependencyGraph::new();
        graph.add_requirement("ciphers", "morse");
        graph.add_requirement("one_time_pads", "ciphers");

        let cascade = graph.cascade_from("morse");
        assert_eq!(
            ids(&cascade),
            HashSet::from(["morse", "ciphers", "one_time_pads"])
        );

        // A mid-chain root only takes its own dependents with it.
        let cascade = graph.cascade_from("ciphers");
        assert_eq!(ids(&cascade), HashSet::from(["ciphers", "one_time_pads"]));
    }

    #[test]
    fn test_cascade_covers_diamonds_once() {
        let mut graph = DependencyGraph::new();
        graph.add_requirement("left", "root");
        graph.add_requirement("right", "root");
        graph.add_requirement("apex", "left");
        graph.add_requirement("apex", "right");

        let cascade = graph.cascade_from("root");
        assert_eq!(cascade.len(), 4);
        assert_eq!(
            ids(&cascade),
            HashSet::from(["root", "left", "right", "apex"])
        );
    }

    #[test]
    fn test_cascade_terminates_on_cycles() {
        let mut graph = DependencyGraph::new();
        graph.add_requirement("alpha", "beta");
        graph.add_requirement("beta", "alpha");

        let cascade = graph.cascade_from("alpha");
        assert_eq!(ids(&cascade), HashSet::from(["alpha", "beta"]));
    }

    #[test]
    fn test_direct_dependents() {
        let mut graph = DependencyGraph::new();
        graph.add_requirement("ciphers", "morse");
        graph.add_requirement("frequencies", "morse");

        let direct: HashSet<&str> = graph.direct_dependents("morse").collect();
        assert_eq!(direct, HashSet::from(["ciphers", "frequencies"]));
        assert_eq!(graph.direct_dependents("ciphers").count(), 0);
    }

    #[test]
    fn test_from_catalog() {
        let catalog: EntryCatalog = [
            EntryDef::new("morse", "Morse Code"),
            EntryDef::new("ciphers", "Field Ciphers").with_requirement("morse"),
            EntryDef::new("dead_drops", "Dead Drops"),
        ]
        .into_iter()
        .collect();

        let graph = DependencyGraph::from_catalog(&catalog);
        assert!(!graph.is_empty());
        assert_eq!(ids(&graph.cascade_from("morse")), HashSet::from(["morse", "ciphers"]));
        assert_eq!(graph.cascade_from("dead_drops"), vec!["dead_drops"]);
    }
}
