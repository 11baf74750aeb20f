use std::collections::BTreeSet;

use petgraph::stable_graph::NodeIndex;
use petgraph::Direction;
use tarn_core::dependency::Dependency;

use super::PhaseVisitor;
use crate::graph::SetGraph;
use crate::mark::{Mark, Phase};

/// Computes which available versions have every mandatory prerequisite.
///
/// Walks from sets with no requirements toward their dependents.
pub(crate) struct SatisfactionVisitor;

impl<U> PhaseVisitor<U> for SatisfactionVisitor {
    fn phase(&self) -> Phase {
        Phase::Satisfaction
    }

    fn ancestor_direction(&self) -> Direction {
        Direction::Outgoing
    }

    fn update(&mut self, graph: &mut SetGraph<U>, node: NodeIndex, _mark: Mark) -> bool {
        let view: &SetGraph<U> = graph;
        let satisfied: BTreeSet<String> = view
            .set(node)
            .available()
            .filter(|element| {
                element
                    .dependencies()
                    .iter()
                    .all(|dep| dep.is_optional() || has_satisfied_match(view, dep))
            })
            .map(|element| element.version().to_string())
            .collect();
        graph.set_mut(node).set_satisfied(satisfied)
    }
}

fn has_satisfied_match<U>(graph: &SetGraph<U>, dep: &Dependency<U>) -> bool {
    if !dep.is_satisfiable() {
        return false;
    }
    graph.find(dep.required_id()).is_some_and(|idx| {
        graph
            .set(idx)
            .satisfied()
            .iter()
            .any(|version| dep.accepts(version))
    })
}
