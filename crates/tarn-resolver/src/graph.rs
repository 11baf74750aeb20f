//! Arena of element sets linked by reference-counted requirement edges.

use std::collections::HashMap;

use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::Direction;

use crate::element_set::ElementSet;

/// Element sets addressed by stable node indices.
///
/// An edge `a -> b` means some element of `a` depends on id `b`. Its weight
/// counts how many dependencies share that edge, so the required and
/// requiring views of a pair can never disagree.
#[derive(Debug)]
pub(crate) struct SetGraph<U> {
    graph: StableDiGraph<ElementSet<U>, usize>,
    /// Lookup from element id to node index.
    index: HashMap<String, NodeIndex>,
}

impl<U> SetGraph<U> {
    pub fn new() -> Self {
        Self {
            graph: StableDiGraph::new(),
            index: HashMap::new(),
        }
    }

    /// Return the set for `id`, creating an empty one if needed.
    pub fn get_or_insert(&mut self, id: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        let idx = self.graph.add_node(ElementSet::new(id));
        self.index.insert(id.to_string(), idx);
        idx
    }

    pub fn find(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    pub fn set(&self, idx: NodeIndex) -> &ElementSet<U> {
        &self.graph[idx]
    }

    pub fn set_mut(&mut self, idx: NodeIndex) -> &mut ElementSet<U> {
        &mut self.graph[idx]
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn sets(&self) -> impl Iterator<Item = &ElementSet<U>> + '_ {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    /// Count one more dependency from `from` on `to`.
    pub fn add_requirement(&mut self, from: NodeIndex, to: NodeIndex) {
        match self.graph.find_edge(from, to) {
            Some(edge) => self.graph[edge] += 1,
            None => {
                self.graph.add_edge(from, to, 1);
            }
        }
    }

    /// Count one dependency less; the edge disappears at zero. Returns `false`
    /// if there was no such edge.
    pub fn remove_requirement(&mut self, from: NodeIndex, to: NodeIndex) -> bool {
        let Some(edge) = self.graph.find_edge(from, to) else {
            return false;
        };
        let count = &mut self.graph[edge];
        *count -= 1;
        if *count == 0 {
            self.graph.remove_edge(edge);
        }
        true
    }

    /// Sets the elements of `idx` depend on.
    pub fn required(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.neighbors(idx, Direction::Outgoing)
    }

    /// Sets whose elements depend on `idx`.
    pub fn requiring(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.neighbors(idx, Direction::Incoming)
    }

    pub fn neighbors(&self, idx: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        self.graph.neighbors_directed(idx, direction).collect()
    }

    pub fn has_self_loop(&self, idx: NodeIndex) -> bool {
        self.graph.find_edge(idx, idx).is_some()
    }

    /// Reference count of the edge `from -> to`, zero if absent.
    #[cfg(test)]
    pub fn requirement_count(&self, from: NodeIndex, to: NodeIndex) -> usize {
        self.graph
            .find_edge(from, to)
            .map_or(0, |edge| self.graph[edge])
    }

    /// Sets with no outgoing edges, where dependency-ordered sweeps start.
    pub fn roots(&self) -> Vec<NodeIndex> {
        self.graph
            .node_indices()
            .filter(|&idx| self.required(idx).is_empty())
            .collect()
    }

    pub fn remove(&mut self, idx: NodeIndex) -> Option<ElementSet<U>> {
        let set = self.graph.remove_node(idx)?;
        self.index.remove(set.id());
        Some(set)
    }

    pub(crate) fn inner(&self) -> &StableDiGraph<ElementSet<U>, usize> {
        &self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_or_insert_is_idempotent() {
        let mut g: SetGraph<()> = SetGraph::new();
        let a = g.get_or_insert("a");
        assert_eq!(g.get_or_insert("a"), a);
        assert_eq!(g.find("a"), Some(a));
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn edges_are_reference_counted() {
        let mut g: SetGraph<()> = SetGraph::new();
        let a = g.get_or_insert("a");
        let b = g.get_or_insert("b");
        g.add_requirement(a, b);
        g.add_requirement(a, b);
        assert_eq!(g.requirement_count(a, b), 2);
        assert_eq!(g.required(a), vec![b]);
        assert_eq!(g.requiring(b), vec![a]);

        assert!(g.remove_requirement(a, b));
        assert_eq!(g.required(a), vec![b]);
        assert!(g.remove_requirement(a, b));
        assert!(g.required(a).is_empty());
        assert!(g.requiring(b).is_empty());
        assert!(!g.remove_requirement(a, b));
    }

    #[test]
    fn roots_have_no_requirements() {
        let mut g: SetGraph<()> = SetGraph::new();
        let a = g.get_or_insert("a");
        let b = g.get_or_insert("b");
        g.add_requirement(a, b);
        assert_eq!(g.roots(), vec![b]);
    }

    #[test]
    fn remove_drops_index_entry() {
        let mut g: SetGraph<()> = SetGraph::new();
        let a = g.get_or_insert("a");
        let b = g.get_or_insert("b");
        assert_eq!(g.remove(a).unwrap().id(), "a");
        assert!(g.find("a").is_none());
        assert_eq!(g.find("b"), Some(b));
        assert_eq!(g.len(), 1);
    }
}
