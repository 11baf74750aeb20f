//! Per-element status transitions accumulated between two resolutions.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::ops::{BitOr, BitOrAssign};

use tarn_core::element::Element;

/// Bitmask of the transitions an element went through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ChangeKind(u8);

impl ChangeKind {
    pub const NONE: ChangeKind = ChangeKind(0);
    pub const ADDED: ChangeKind = ChangeKind(1);
    pub const REMOVED: ChangeKind = ChangeKind(1 << 1);
    pub const RESOLVED: ChangeKind = ChangeKind(1 << 2);
    pub const UNRESOLVED: ChangeKind = ChangeKind(1 << 3);
    pub const LINKAGE_CHANGED: ChangeKind = ChangeKind(1 << 4);

    const NAMES: [(ChangeKind, &'static str); 5] = [
        (ChangeKind::ADDED, "ADDED"),
        (ChangeKind::REMOVED, "REMOVED"),
        (ChangeKind::RESOLVED, "RESOLVED"),
        (ChangeKind::UNRESOLVED, "UNRESOLVED"),
        (ChangeKind::LINKAGE_CHANGED, "LINKAGE_CHANGED"),
    ];

    pub fn contains(self, other: ChangeKind) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for ChangeKind {
    type Output = ChangeKind;

    fn bitor(self, rhs: ChangeKind) -> ChangeKind {
        ChangeKind(self.0 | rhs.0)
    }
}

impl BitOrAssign for ChangeKind {
    fn bitor_assign(&mut self, rhs: ChangeKind) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("NONE");
        }
        let names: Vec<&str> = Self::NAMES
            .iter()
            .filter(|(kind, _)| self.contains(*kind))
            .map(|(_, name)| *name)
            .collect();
        f.write_str(&names.join("|"))
    }
}

/// The accumulated transitions of one element.
#[derive(Debug, Clone)]
pub struct ElementChange<U = ()> {
    element: Element<U>,
    kind: ChangeKind,
}

impl<U> ElementChange<U> {
    pub fn element(&self) -> &Element<U> {
        &self.element
    }

    pub fn kind(&self) -> ChangeKind {
        self.kind
    }
}

impl<U> fmt::Display for ElementChange<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.element, self.kind)
    }
}

/// Everything that changed during one resolution cycle, keyed by element
/// identity.
#[derive(Debug, Clone)]
pub struct ResolutionDelta<U = ()> {
    changes: HashMap<Element<U>, ElementChange<U>>,
}

impl<U> Default for ResolutionDelta<U> {
    fn default() -> Self {
        Self {
            changes: HashMap::new(),
        }
    }
}

impl<U: Clone + Eq + Hash> ResolutionDelta<U> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `kind` into the element's entry. A removal cancels an addition
    /// recorded in the same delta.
    pub fn record(&mut self, element: &Element<U>, kind: ChangeKind) {
        if kind.contains(ChangeKind::REMOVED)
            && self
                .changes
                .get(element)
                .is_some_and(|change| change.kind.contains(ChangeKind::ADDED))
        {
            self.changes.remove(element);
            return;
        }
        let change = self
            .changes
            .entry(element.clone())
            .or_insert_with(|| ElementChange {
                element: element.clone(),
                kind: ChangeKind::NONE,
            });
        change.element = element.clone();
        change.kind |= kind;
    }

    pub fn get(&self, element: &Element<U>) -> Option<&ElementChange<U>> {
        self.changes.get(element)
    }

    /// Look up a change by id and version.
    pub fn find(&self, id: &str, version: &str) -> Option<&ElementChange<U>> {
        self.changes
            .values()
            .find(|change| change.element.id() == id && change.element.version() == version)
    }

    /// The accumulated kind for `id@version`, `NONE` if untouched.
    pub fn kind_of(&self, id: &str, version: &str) -> ChangeKind {
        self.find(id, version)
            .map_or(ChangeKind::NONE, ElementChange::kind)
    }
}

impl<U> ResolutionDelta<U> {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// All changes ordered by element id, then version id.
    pub fn changes(&self) -> Vec<&ElementChange<U>> {
        let mut changes: Vec<_> = self.changes.values().collect();
        changes.sort_by(|a, b| {
            (a.element.id(), a.element.version()).cmp(&(b.element.id(), b.element.version()))
        });
        changes
    }

    /// Changes whose kind includes `kind`.
    pub fn of_kind(&self, kind: ChangeKind) -> Vec<&ElementChange<U>> {
        self.changes()
            .into_iter()
            .filter(|change| change.kind.contains(kind))
            .collect()
    }
}

impl<U> fmt::Display for ResolutionDelta<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.changes.is_empty() {
            return write!(f, "No changes.");
        }
        writeln!(f, "Changes ({}):", self.changes.len())?;
        for change in self.changes() {
            writeln!(f, "  {change}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(id: &str, version: &str) -> Element {
        Element::new(id, version, vec![], false, None).unwrap()
    }

    #[test]
    fn kinds_accumulate() {
        let mut delta = ResolutionDelta::new();
        let x = element("x", "1.0");
        delta.record(&x, ChangeKind::ADDED);
        delta.record(&x, ChangeKind::RESOLVED);
        let kind = delta.get(&x).unwrap().kind();
        assert!(kind.contains(ChangeKind::ADDED));
        assert!(kind.contains(ChangeKind::RESOLVED));
        assert!(!kind.contains(ChangeKind::UNRESOLVED));
        assert_eq!(kind.to_string(), "ADDED|RESOLVED");
    }

    #[test]
    fn removal_cancels_addition() {
        let mut delta = ResolutionDelta::new();
        let x = element("x", "1.0");
        delta.record(&x, ChangeKind::ADDED);
        delta.record(&x, ChangeKind::REMOVED);
        assert!(delta.is_empty());
    }

    #[test]
    fn removal_without_addition_is_kept() {
        let mut delta = ResolutionDelta::new();
        let x = element("x", "1.0");
        delta.record(&x, ChangeKind::UNRESOLVED);
        delta.record(&x, ChangeKind::REMOVED);
        assert_eq!(
            delta.kind_of("x", "1.0"),
            ChangeKind::UNRESOLVED | ChangeKind::REMOVED
        );
    }

    #[test]
    fn changes_are_sorted() {
        let mut delta = ResolutionDelta::new();
        delta.record(&element("b", "1.0"), ChangeKind::ADDED);
        delta.record(&element("a", "2.0"), ChangeKind::ADDED);
        delta.record(&element("a", "1.0"), ChangeKind::RESOLVED);
        let order: Vec<String> = delta
            .changes()
            .iter()
            .map(|c| c.element().to_string())
            .collect();
        assert_eq!(order, vec!["a@1.0", "a@2.0", "b@1.0"]);
        assert_eq!(delta.of_kind(ChangeKind::ADDED).len(), 2);
    }

    #[test]
    fn display() {
        let mut delta = ResolutionDelta::new();
        assert_eq!(delta.to_string(), "No changes.");
        delta.record(&element("x", "1.0"), ChangeKind::RESOLVED);
        let s = delta.to_string();
        assert!(s.contains("Changes (1):"));
        assert!(s.contains("x@1.0 RESOLVED"));
    }

    #[test]
    fn none_is_contained_nowhere() {
        assert!(!ChangeKind::ADDED.contains(ChangeKind::NONE));
        assert_eq!(ChangeKind::NONE.to_string(), "NONE");
    }
}
