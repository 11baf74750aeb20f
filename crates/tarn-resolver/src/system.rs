//! The dependency system: registry of element sets and the three-phase
//! resolution driver.

use std::hash::Hash;

use petgraph::stable_graph::NodeIndex;
use petgraph::Direction;
use tarn_core::config::ResolverConfig;
use tarn_core::dependency::Dependency;
use tarn_core::element::Element;
use tarn_core::match_rule::SharedMatchRule;
use tarn_core::version::{MavenComparator, VersionComparator};
use tarn_util::errors::{TarnError, TarnResult};

use crate::delta::{ChangeKind, ResolutionDelta};
use crate::element_set::ElementSet;
use crate::graph::SetGraph;
use crate::mark::{Mark, Phase};
use crate::policy::{policy_for, HighestVersionPolicy, SelectionPolicy};
use crate::visitor::{self, ResolutionVisitor, SatisfactionVisitor, SelectionVisitor};

/// A universe of versioned elements and their resolution state.
///
/// Mutations (`add_element`, `remove_element`, `unresolve`) only record what
/// changed; `resolve` brings the satisfied, selected and resolved subsets up
/// to date and returns everything that changed since the previous call.
pub struct DependencySystem<U = ()> {
    sets: SetGraph<U>,
    comparator: Box<dyn VersionComparator>,
    policy: Box<dyn SelectionPolicy<U>>,
    debug: bool,
    element_count: u32,
    epoch: u64,
    delta: ResolutionDelta<U>,
    last_delta: ResolutionDelta<U>,
}

impl<U: Clone + Eq + Hash> Default for DependencySystem<U> {
    fn default() -> Self {
        Self::new(MavenComparator, HighestVersionPolicy, false)
    }
}

impl<U: Clone + Eq + Hash> DependencySystem<U> {
    pub fn new(
        comparator: impl VersionComparator + 'static,
        policy: impl SelectionPolicy<U> + 'static,
        debug: bool,
    ) -> Self {
        Self::with_boxed(Box::new(comparator), Box::new(policy), debug)
    }

    pub fn with_boxed(
        comparator: Box<dyn VersionComparator>,
        policy: Box<dyn SelectionPolicy<U>>,
        debug: bool,
    ) -> Self {
        Self {
            sets: SetGraph::new(),
            comparator,
            policy,
            debug,
            element_count: 0,
            epoch: 0,
            delta: ResolutionDelta::new(),
            last_delta: ResolutionDelta::new(),
        }
    }

    /// Build a system with the comparator and policy named by `config`.
    pub fn from_config(config: &ResolverConfig) -> Self {
        Self::with_boxed(
            config.versioning.scheme.comparator(),
            policy_for(config.selection.prefer),
            config.debug,
        )
    }

    pub fn create_element(
        &self,
        id: impl Into<String>,
        version: impl Into<String>,
        dependencies: Vec<Dependency<U>>,
        singleton: bool,
        user_object: Option<U>,
    ) -> TarnResult<Element<U>> {
        Element::new(id, version, dependencies, singleton, user_object)
    }

    pub fn create_dependency(
        &self,
        required_id: impl Into<String>,
        match_rule: SharedMatchRule,
        required_version: Option<String>,
        optional: bool,
        user_object: Option<U>,
    ) -> TarnResult<Dependency<U>> {
        Dependency::new(required_id, match_rule, required_version, optional, user_object)
    }

    /// The set for `id`, registering an empty one if needed.
    pub fn get_element_set(&mut self, id: &str) -> &ElementSet<U> {
        let idx = self.sets.get_or_insert(id);
        self.sets.set(idx)
    }

    /// The set for `id`, if registered.
    pub fn element_set(&self, id: &str) -> Option<&ElementSet<U>> {
        self.sets.find(id).map(|idx| self.sets.set(idx))
    }

    pub fn contains_set(&self, id: &str) -> bool {
        self.sets.find(id).is_some()
    }

    pub fn element_sets(&self) -> impl Iterator<Item = &ElementSet<U>> + '_ {
        self.sets.sets()
    }

    pub fn set_count(&self) -> usize {
        self.sets.len()
    }

    /// Ids of the sets the elements of `id` depend on.
    pub fn required_ids(&self, id: &str) -> Vec<&str> {
        self.neighbor_ids(id, Direction::Outgoing)
    }

    /// Ids of the sets whose elements depend on `id`.
    pub fn requiring_ids(&self, id: &str) -> Vec<&str> {
        self.neighbor_ids(id, Direction::Incoming)
    }

    fn neighbor_ids(&self, id: &str, direction: Direction) -> Vec<&str> {
        let Some(idx) = self.sets.find(id) else {
            return Vec::new();
        };
        let mut ids: Vec<&str> = self
            .sets
            .neighbors(idx, direction)
            .into_iter()
            .map(|n| self.sets.set(n).id())
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Number of elements ever added to this system.
    pub fn element_count(&self) -> u32 {
        self.element_count
    }

    pub fn get_element(&self, id: &str, version: &str) -> Option<&Element<U>> {
        self.element_set(id)?.element(version)
    }

    /// Changes recorded since the last `resolve`, not yet finalized.
    pub fn pending_delta(&self) -> &ResolutionDelta<U> {
        &self.delta
    }

    /// The delta returned by the most recent successful `resolve`.
    pub fn last_delta(&self) -> &ResolutionDelta<U> {
        &self.last_delta
    }

    /// Register an element. Returns `false` without changing anything if its
    /// version is already known.
    pub fn add_element(&mut self, element: Element<U>) -> TarnResult<bool> {
        let count = self
            .element_count
            .checked_add(1)
            .ok_or_else(|| TarnError::IdSpaceExhausted {
                what: "element counter".to_string(),
            })?;
        let idx = self.sets.get_or_insert(element.id());
        if self.sets.set(idx).element(element.version()).is_some() {
            tracing::debug!("{element} is already registered");
            return Ok(false);
        }
        self.element_count = count;

        for dep in element.dependencies().iter().filter(|d| d.is_satisfiable()) {
            let target = self.sets.get_or_insert(dep.required_id());
            self.sets.add_requirement(idx, target);
        }
        self.delta.record(&element, ChangeKind::ADDED);
        tracing::debug!("Added {element}");
        self.sets.set_mut(idx).insert(element);
        Ok(true)
    }

    /// Unregister `id@version`. Returns the removed element, or `None` if it
    /// wasn't registered.
    pub fn remove_element(&mut self, id: &str, version: &str) -> Option<Element<U>> {
        let idx = self.sets.find(id)?;
        let Some((element, was_resolved)) = self.sets.set_mut(idx).remove(version) else {
            if self.debug {
                tracing::debug!("Ignoring removal of unknown element {id}@{version}");
            }
            return None;
        };
        self.drop_requirements(idx, &element);
        if was_resolved {
            self.delta.record(&element, ChangeKind::UNRESOLVED);
        }
        self.delta.record(&element, ChangeKind::REMOVED);
        tracing::debug!("Removed {element}");
        Some(element)
    }

    pub fn remove_element_by(&mut self, element: &Element<U>) -> Option<Element<U>> {
        self.remove_element(element.id(), element.version())
    }

    /// Evict `id@version` from whatever cycle it takes part in by replacing
    /// its dependencies with one that can never be satisfied. The element
    /// stays registered but will not be satisfied again.
    pub fn remove_from_cycle(&mut self, id: &str, version: &str) -> bool {
        let Some(idx) = self.sets.find(id) else {
            return false;
        };
        let Some((mut element, was_resolved)) = self.sets.set_mut(idx).remove(version) else {
            return false;
        };
        self.drop_requirements(idx, &element);
        if was_resolved {
            self.delta.record(&element, ChangeKind::UNRESOLVED);
        }
        element.remove_from_cycle();
        tracing::debug!("Removed {element} from its cycle");
        self.sets.set_mut(idx).insert(element);
        true
    }

    fn drop_requirements(&mut self, idx: NodeIndex, element: &Element<U>) {
        for dep in element.dependencies().iter().filter(|d| d.is_satisfiable()) {
            let dropped = self
                .sets
                .find(dep.required_id())
                .is_some_and(|target| self.sets.remove_requirement(idx, target));
            if !dropped && self.debug {
                tracing::debug!(
                    "No requirement edge from {} to {} to drop",
                    element.id(),
                    dep.required_id()
                );
            }
        }
    }

    /// Force elements out of their set's resolved subset. Records no change
    /// and leaves dependents alone; the next `resolve` binds them again.
    pub fn unresolve(&mut self, elements: &[Element<U>]) {
        for element in elements {
            let Some(idx) = self.sets.find(element.id()) else {
                continue;
            };
            if self.sets.set_mut(idx).unresolve(element.version()) && self.debug {
                tracing::debug!("Unresolved {element}");
            }
        }
    }

    /// Run the three resolution phases and return the finalized delta.
    pub fn resolve(&mut self) -> TarnResult<ResolutionDelta<U>> {
        self.resolve_with(true)
    }

    /// Like [`resolve`](Self::resolve). With `produce_delta == false` the
    /// recorded changes are discarded and an empty delta is returned.
    ///
    /// On a cycle error the phase that failed is left untouched and pending
    /// changes are kept for the next attempt.
    pub fn resolve_with(&mut self, produce_delta: bool) -> TarnResult<ResolutionDelta<U>> {
        let epoch = self
            .epoch
            .checked_add(1)
            .ok_or_else(|| TarnError::IdSpaceExhausted {
                what: "resolution epoch".to_string(),
            })?;
        self.epoch = epoch;
        tracing::debug!("Resolving {} element set(s), epoch {epoch}", self.sets.len());

        let roots = self.sets.roots();
        let leaves = visitor::walk(
            &mut self.sets,
            &mut SatisfactionVisitor,
            roots,
            Mark::new(epoch, Phase::Satisfaction),
            self.debug,
        )?;
        let leaves = visitor::walk(
            &mut self.sets,
            &mut SelectionVisitor {
                policy: self.policy.as_ref(),
                comparator: self.comparator.as_ref(),
            },
            leaves,
            Mark::new(epoch, Phase::Selection),
            self.debug,
        )?;
        visitor::walk(
            &mut self.sets,
            &mut ResolutionVisitor {
                comparator: self.comparator.as_ref(),
                delta: &mut self.delta,
            },
            leaves,
            Mark::new(epoch, Phase::Resolution),
            self.debug,
        )?;

        self.prune();

        let delta = std::mem::take(&mut self.delta);
        self.last_delta = if produce_delta {
            delta
        } else {
            ResolutionDelta::new()
        };
        tracing::debug!("Resolution {epoch} produced {} change(s)", self.last_delta.len());
        Ok(self.last_delta.clone())
    }

    /// Drop sets that hold no element and that nothing depends on.
    fn prune(&mut self) {
        let doomed: Vec<NodeIndex> = self
            .sets
            .node_indices()
            .filter(|&idx| self.sets.set(idx).is_empty() && self.sets.requiring(idx).is_empty())
            .collect();
        for idx in doomed {
            if let Some(set) = self.sets.remove(idx) {
                tracing::debug!("Pruned empty element set {}", set.id());
            }
        }
    }

    /// All resolved elements, prerequisites before dependents.
    pub fn resolved_elements(&self) -> TarnResult<Vec<&Element<U>>> {
        let sweep = visitor::plan(&self.sets, &SatisfactionVisitor, self.sets.roots())?;
        Ok(sweep
            .order
            .into_iter()
            .flat_map(|idx| self.sets.set(idx).resolved_elements())
            .collect())
    }

    /// Resolved elements whose dependencies are bound to `element`.
    pub fn requiring_elements(&self, element: &Element<U>) -> Vec<&Element<U>> {
        let Some(idx) = self.sets.find(element.id()) else {
            return Vec::new();
        };
        self.sets
            .requiring(idx)
            .into_iter()
            .flat_map(|r| self.sets.set(r).resolved_elements())
            .filter(|dependent| {
                dependent.dependencies().iter().any(|dep| {
                    dep.required_id() == element.id()
                        && dep.resolved_version() == Some(element.version())
                })
            })
            .collect()
    }
}
