//! The dependency-ordered sweep shared by all three resolution phases.
//!
//! A sweep starts from a set of roots and visits a node only once every one
//! of its ancestors has been visited, breadth first. Which edge direction
//! counts as "ancestor" is up to the phase's [`PhaseVisitor`].

mod resolution;
mod satisfaction;
mod selection;

pub(crate) use resolution::ResolutionVisitor;
pub(crate) use satisfaction::SatisfactionVisitor;
pub(crate) use selection::SelectionVisitor;

use std::collections::{HashSet, VecDeque};

use petgraph::stable_graph::NodeIndex;
use petgraph::Direction;
use tarn_util::errors::{TarnError, TarnResult};

use crate::cycle;
use crate::graph::SetGraph;
use crate::mark::{Mark, Phase};

/// One resolution phase: its edge orientation and its per-set update.
pub(crate) trait PhaseVisitor<U> {
    fn phase(&self) -> Phase;

    /// Edge direction leading to the sets that must be visited first.
    fn ancestor_direction(&self) -> Direction;

    fn ancestors(&self, graph: &SetGraph<U>, node: NodeIndex) -> Vec<NodeIndex> {
        graph.neighbors(node, self.ancestor_direction())
    }

    fn descendants(&self, graph: &SetGraph<U>, node: NodeIndex) -> Vec<NodeIndex> {
        graph.neighbors(node, self.ancestor_direction().opposite())
    }

    /// Recompute this phase's subset for `node`. Returns `true` if it changed.
    fn update(&mut self, graph: &mut SetGraph<U>, node: NodeIndex, mark: Mark) -> bool;
}

/// Visitation order of a complete sweep plus the sets it ended on.
#[derive(Debug)]
pub(crate) struct Sweep {
    pub order: Vec<NodeIndex>,
    pub leaves: Vec<NodeIndex>,
}

/// Compute the visitation order without touching any set. Fails with the
/// cycle groups if some set's ancestors can never all be visited.
pub(crate) fn plan<U, V>(
    graph: &SetGraph<U>,
    visitor: &V,
    roots: Vec<NodeIndex>,
) -> TarnResult<Sweep>
where
    V: PhaseVisitor<U>,
{
    let mut visited: HashSet<NodeIndex> = HashSet::new();
    let mut order = Vec::new();
    let mut leaves = Vec::new();
    let mut queue: VecDeque<NodeIndex> = roots.into();

    while let Some(node) = queue.pop_front() {
        if visited.contains(&node) {
            continue;
        }
        let ready = visitor
            .ancestors(graph, node)
            .iter()
            .all(|ancestor| visited.contains(ancestor));
        if !ready {
            continue;
        }
        visited.insert(node);
        order.push(node);

        let descendants = visitor.descendants(graph, node);
        if descendants.is_empty() {
            leaves.push(node);
        } else {
            queue.extend(descendants);
        }
    }

    if visited.len() != graph.len() {
        let cycles = cycle::find_cycles(graph);
        tracing::warn!(
            "Sweep visited {} of {} element sets; {} cycle(s) found",
            visited.len(),
            graph.len(),
            cycles.len()
        );
        return Err(TarnError::Cyclic { cycles });
    }

    Ok(Sweep { order, leaves })
}

/// Run one phase over the graph and return the sweep's leaves, which seed
/// the next phase. Nothing is modified if the sweep hits a cycle.
pub(crate) fn walk<U, V>(
    graph: &mut SetGraph<U>,
    visitor: &mut V,
    roots: Vec<NodeIndex>,
    mark: Mark,
    debug: bool,
) -> TarnResult<Vec<NodeIndex>>
where
    V: PhaseVisitor<U>,
{
    let sweep = plan(graph, visitor, roots)?;
    let mut updated = 0usize;

    for &node in &sweep.order {
        let ancestor_changed = visitor
            .ancestors(graph, node)
            .iter()
            .any(|&ancestor| {
                let ancestor = graph.set(ancestor);
                ancestor.visited_mark() == Some(mark) && ancestor.changed_mark() == Some(mark)
            });

        let set = graph.set_mut(node);
        set.visit(mark);
        if ancestor_changed {
            set.mark_needing_update(mark.phase);
        }
        if !set.needs_update(mark.phase) {
            continue;
        }

        let changed = visitor.update(graph, node, mark);
        let set = graph.set_mut(node);
        set.finish_update(mark, changed);
        updated += 1;
        if debug {
            tracing::debug!(
                "[{mark}] updated {} (changed: {changed}, next: {:?})",
                set.id(),
                set.needing_update()
            );
        }
    }

    tracing::debug!(
        "{} sweep {}: visited {} set(s), updated {updated}",
        visitor.phase(),
        mark.epoch,
        sweep.order.len()
    );
    Ok(sweep.leaves)
}
