use std::collections::BTreeSet;

use petgraph::stable_graph::NodeIndex;
use petgraph::Direction;
use tarn_core::version::VersionComparator;

use super::PhaseVisitor;
use crate::graph::SetGraph;
use crate::mark::{Mark, Phase};
use crate::policy::SelectionPolicy;

/// Chooses the selected versions of each set.
///
/// Walks from the sets nothing requires down toward shared dependencies, so
/// every requiring set has made its choice before a dependency's turn.
pub(crate) struct SelectionVisitor<'a, U> {
    pub policy: &'a dyn SelectionPolicy<U>,
    pub comparator: &'a dyn VersionComparator,
}

impl<U> PhaseVisitor<U> for SelectionVisitor<'_, U> {
    fn phase(&self) -> Phase {
        Phase::Selection
    }

    fn ancestor_direction(&self) -> Direction {
        Direction::Incoming
    }

    fn update(&mut self, graph: &mut SetGraph<U>, node: NodeIndex, _mark: Mark) -> bool {
        let set = graph.set(node);
        let selected: BTreeSet<String> = if set.satisfied().is_empty() {
            BTreeSet::new()
        } else if set.allows_concurrency() {
            self.policy
                .select_multiple(set)
                .intersection(set.satisfied())
                .cloned()
                .collect()
        } else {
            self.policy
                .select_single(set, self.comparator)
                .filter(|version| set.satisfied().contains(version))
                .into_iter()
                .collect()
        };
        graph.set_mut(node).set_selected(selected)
    }
}
