use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;

use petgraph::stable_graph::NodeIndex;
use petgraph::Direction;
use tarn_core::dependency::Dependency;
use tarn_core::version::VersionComparator;

use super::PhaseVisitor;
use crate::delta::{ChangeKind, ResolutionDelta};
use crate::graph::SetGraph;
use crate::mark::{Mark, Phase};

/// Binds each selected element's dependencies to concrete resolved versions
/// and publishes the resolved subset.
///
/// Walks in dependency order, so a set's prerequisites are resolved first.
pub(crate) struct ResolutionVisitor<'a, U> {
    pub comparator: &'a dyn VersionComparator,
    pub delta: &'a mut ResolutionDelta<U>,
}

impl<U: Clone + Eq + Hash> PhaseVisitor<U> for ResolutionVisitor<'_, U> {
    fn phase(&self) -> Phase {
        Phase::Resolution
    }

    fn ancestor_direction(&self) -> Direction {
        Direction::Outgoing
    }

    fn update(&mut self, graph: &mut SetGraph<U>, node: NodeIndex, mark: Mark) -> bool {
        // Bindings for every selected version whose mandatory dependencies
        // can all be bound.
        let view: &SetGraph<U> = graph;
        let bindings: HashMap<String, Vec<Option<String>>> = view
            .set(node)
            .selected_elements()
            .filter_map(|element| {
                let bound: Vec<Option<String>> = element
                    .dependencies()
                    .iter()
                    .map(|dep| best_resolved(view, dep, self.comparator))
                    .collect();
                let complete = element
                    .dependencies()
                    .iter()
                    .zip(&bound)
                    .all(|(dep, version)| dep.is_optional() || version.is_some());
                complete.then(|| (element.version().to_string(), bound))
            })
            .collect();

        let set = graph.set_mut(node);
        let previous = set.resolved().clone();
        let mut relinked = Vec::new();
        for element in set.elements_mut() {
            let bound = bindings.get(element.version());
            let mut rebound = false;
            for (i, dep) in element.dependencies_mut().iter_mut().enumerate() {
                let version = bound.and_then(|b| b[i].as_deref());
                rebound |= dep.bind(version, mark.epoch);
            }
            if rebound && bound.is_some() && previous.contains(element.version()) {
                relinked.push(element.version().to_string());
            }
        }

        let resolved: BTreeSet<String> = bindings.into_keys().collect();
        let changed = set.set_resolved(resolved.clone());

        for version in resolved.difference(&previous) {
            if let Some(element) = set.element(version) {
                self.delta.record(element, ChangeKind::RESOLVED);
            }
        }
        for version in previous.difference(&resolved) {
            if let Some(element) = set.element(version) {
                self.delta.record(element, ChangeKind::UNRESOLVED);
            }
        }
        for version in &relinked {
            if let Some(element) = set.element(version) {
                self.delta.record(element, ChangeKind::LINKAGE_CHANGED);
            }
        }

        changed || !relinked.is_empty()
    }
}

/// The best resolved version of the required set accepted by `dep`. Ties go
/// to the first version found.
fn best_resolved<U>(
    graph: &SetGraph<U>,
    dep: &Dependency<U>,
    comparator: &dyn VersionComparator,
) -> Option<String> {
    if !dep.is_satisfiable() {
        return None;
    }
    let set = graph.set(graph.find(dep.required_id())?);
    set.resolved()
        .iter()
        .filter(|version| dep.accepts(version))
        .fold(None::<&String>, |best, candidate| match best {
            Some(best) if comparator.compare(candidate, best).is_le() => Some(best),
            _ => Some(candidate),
        })
        .cloned()
}
