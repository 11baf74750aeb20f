//! All known versions of one element id plus their derived resolution state.

use std::collections::{BTreeMap, BTreeSet};

use tarn_core::element::Element;

use crate::mark::{Mark, Phase};

/// The family of all known versions of one element id.
///
/// At rest `resolved ⊆ selected ⊆ satisfied ⊆ available`. The subsets hold
/// version ids; the elements themselves live in `available`. Edges to other
/// sets are kept by the owning graph, not here.
#[derive(Debug)]
pub struct ElementSet<U = ()> {
    id: String,
    available: BTreeMap<String, Element<U>>,
    satisfied: BTreeSet<String>,
    selected: BTreeSet<String>,
    resolved: BTreeSet<String>,
    singletons: usize,
    visited: Option<Mark>,
    changed: Option<Mark>,
    needing_update: Option<Phase>,
    /// Subsets were edited outside a sweep, or the set just became
    /// exclusive; the next update of every phase must report a change.
    stale: bool,
}

impl<U> ElementSet<U> {
    pub(crate) fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            available: BTreeMap::new(),
            satisfied: BTreeSet::new(),
            selected: BTreeSet::new(),
            resolved: BTreeSet::new(),
            singletons: 0,
            visited: None,
            changed: None,
            needing_update: None,
            stale: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_empty(&self) -> bool {
        self.available.is_empty()
    }

    pub fn len(&self) -> usize {
        self.available.len()
    }

    pub fn element(&self, version: &str) -> Option<&Element<U>> {
        self.available.get(version)
    }

    /// Every known version, in version-id order.
    pub fn available(&self) -> impl Iterator<Item = &Element<U>> {
        self.available.values()
    }

    pub fn satisfied(&self) -> &BTreeSet<String> {
        &self.satisfied
    }

    pub fn selected(&self) -> &BTreeSet<String> {
        &self.selected
    }

    pub fn resolved(&self) -> &BTreeSet<String> {
        &self.resolved
    }

    pub fn satisfied_elements(&self) -> impl Iterator<Item = &Element<U>> {
        self.subset_elements(&self.satisfied)
    }

    pub fn selected_elements(&self) -> impl Iterator<Item = &Element<U>> {
        self.subset_elements(&self.selected)
    }

    pub fn resolved_elements(&self) -> impl Iterator<Item = &Element<U>> {
        self.subset_elements(&self.resolved)
    }

    fn subset_elements<'a>(
        &'a self,
        subset: &'a BTreeSet<String>,
    ) -> impl Iterator<Item = &'a Element<U>> {
        subset.iter().filter_map(|version| self.available.get(version))
    }

    /// Number of available singleton versions.
    pub fn singleton_count(&self) -> usize {
        self.singletons
    }

    /// `true` when no known version is a singleton, so every satisfied
    /// version may be selected at once.
    pub fn allows_concurrency(&self) -> bool {
        self.singletons == 0
    }

    pub fn visited_mark(&self) -> Option<Mark> {
        self.visited
    }

    pub fn changed_mark(&self) -> Option<Mark> {
        self.changed
    }

    /// The lowest phase this set must recompute, if any.
    pub fn needing_update(&self) -> Option<Phase> {
        self.needing_update
    }

    pub fn needs_update(&self, phase: Phase) -> bool {
        self.needing_update.is_some_and(|needed| needed <= phase)
    }

    pub(crate) fn mark_needing_update(&mut self, phase: Phase) {
        self.needing_update = Some(match self.needing_update {
            Some(current) => current.min(phase),
            None => phase,
        });
    }

    pub(crate) fn visit(&mut self, mark: Mark) {
        self.visited = Some(mark);
    }

    /// Record the outcome of a phase update on this set.
    pub(crate) fn finish_update(&mut self, mark: Mark, changed: bool) {
        let changed = changed || self.stale;
        if changed {
            self.changed = Some(mark);
        }
        self.needing_update = if changed { mark.phase.next() } else { None };
        if mark.phase == Phase::Resolution {
            self.stale = false;
        }
    }

    pub(crate) fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element<U>> {
        self.available.values_mut()
    }

    /// Insert a new version. Returns `false` if the version is already known.
    pub(crate) fn insert(&mut self, element: Element<U>) -> bool {
        if self.available.contains_key(element.version()) {
            return false;
        }
        if element.is_singleton() {
            self.singletons += 1;
            // First singleton makes the set exclusive; selection must rerun
            // even if satisfaction comes out unchanged.
            if self.singletons == 1 {
                self.stale = true;
            }
        }
        self.available.insert(element.version().to_string(), element);
        self.mark_needing_update(Phase::Satisfaction);
        true
    }

    /// Remove a version, stripping it from every subset. Returns the element
    /// and whether it was resolved.
    pub(crate) fn remove(&mut self, version: &str) -> Option<(Element<U>, bool)> {
        let element = self.available.remove(version)?;
        if element.is_singleton() {
            self.singletons -= 1;
        }
        self.satisfied.remove(version);
        self.selected.remove(version);
        let was_resolved = self.resolved.remove(version);
        self.stale = true;
        self.mark_needing_update(Phase::Satisfaction);
        Some((element, was_resolved))
    }

    /// Drop a version from `resolved` only. Returns `false` if it wasn't resolved.
    pub(crate) fn unresolve(&mut self, version: &str) -> bool {
        if !self.resolved.remove(version) {
            return false;
        }
        self.stale = true;
        self.mark_needing_update(Phase::Resolution);
        true
    }

    pub(crate) fn set_satisfied(&mut self, satisfied: BTreeSet<String>) -> bool {
        replace_subset(&mut self.satisfied, satisfied)
    }

    pub(crate) fn set_selected(&mut self, selected: BTreeSet<String>) -> bool {
        replace_subset(&mut self.selected, selected)
    }

    pub(crate) fn set_resolved(&mut self, resolved: BTreeSet<String>) -> bool {
        replace_subset(&mut self.resolved, resolved)
    }
}

fn replace_subset(slot: &mut BTreeSet<String>, next: BTreeSet<String>) -> bool {
    if *slot == next {
        return false;
    }
    *slot = next;
    true
}
