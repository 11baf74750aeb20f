//! Cycle reporting for sweeps that could not visit every element set.

use petgraph::algo::tarjan_scc;

use crate::graph::SetGraph;

/// Every group of element sets that depend on each other in a cycle, as
/// sorted id lists. A set depending on its own id forms a group of one.
pub(crate) fn find_cycles<U>(graph: &SetGraph<U>) -> Vec<Vec<String>> {
    let mut cycles: Vec<Vec<String>> = tarjan_scc(graph.inner())
        .into_iter()
        .filter(|component| component.len() > 1 || graph.has_self_loop(component[0]))
        .map(|component| {
            let mut ids: Vec<String> = component
                .into_iter()
                .map(|idx| graph.set(idx).id().to_string())
                .collect();
            ids.sort();
            ids
        })
        .collect();
    cycles.sort();
    cycles
}
