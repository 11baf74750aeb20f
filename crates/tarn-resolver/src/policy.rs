//! Strategies choosing which satisfied versions become selected.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use tarn_core::config::Preference;
use tarn_core::element::Element;
use tarn_core::version::VersionComparator;

use crate::element_set::ElementSet;

/// Chooses the selected subset of an element set's satisfied versions.
pub trait SelectionPolicy<U> {
    /// Called when the set holds no singleton version. Anything returned
    /// outside the satisfied subset is ignored.
    fn select_multiple(&self, set: &ElementSet<U>) -> BTreeSet<String>;

    /// Called when at least one available version is a singleton, satisfied
    /// or not. A result outside the satisfied subset is ignored.
    fn select_single(
        &self,
        set: &ElementSet<U>,
        comparator: &dyn VersionComparator,
    ) -> Option<String>;
}

/// Selects every satisfied version, or the highest one under exclusivity.
/// Ties go to the first version found.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighestVersionPolicy;

impl<U> SelectionPolicy<U> for HighestVersionPolicy {
    fn select_multiple(&self, set: &ElementSet<U>) -> BTreeSet<String> {
        set.satisfied().clone()
    }

    fn select_single(
        &self,
        set: &ElementSet<U>,
        comparator: &dyn VersionComparator,
    ) -> Option<String> {
        pick(set, comparator, Ordering::Greater)
    }
}

/// Like [`HighestVersionPolicy`] but favours the lowest version.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowestVersionPolicy;

impl<U> SelectionPolicy<U> for LowestVersionPolicy {
    fn select_multiple(&self, set: &ElementSet<U>) -> BTreeSet<String> {
        set.satisfied().clone()
    }

    fn select_single(
        &self,
        set: &ElementSet<U>,
        comparator: &dyn VersionComparator,
    ) -> Option<String> {
        pick(set, comparator, Ordering::Less)
    }
}

/// Build the policy named by a configuration preference.
pub fn policy_for<U>(preference: Preference) -> Box<dyn SelectionPolicy<U>> {
    match preference {
        Preference::Highest => Box::new(HighestVersionPolicy),
        Preference::Lowest => Box::new(LowestVersionPolicy),
    }
}

/// The satisfied version that wins every strict comparison in direction `wins`.
fn pick<U>(
    set: &ElementSet<U>,
    comparator: &dyn VersionComparator,
    wins: Ordering,
) -> Option<String> {
    set.satisfied_elements()
        .fold(None::<&Element<U>>, |best, candidate| match best {
            Some(best) if comparator.compare(candidate.version(), best.version()) != wins => {
                Some(best)
            }
            _ => Some(candidate),
        })
        .map(|element| element.version().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tarn_core::version::MavenComparator;

    fn satisfied_set(versions: &[&str]) -> ElementSet {
        let mut set = ElementSet::new("lib");
        for v in versions {
            set.insert(Element::new("lib", *v, vec![], true, None).unwrap());
        }
        set.set_satisfied(versions.iter().map(|v| v.to_string()).collect());
        set
    }

    #[test]
    fn highest_picks_max() {
        let set = satisfied_set(&["1.0", "2.0", "1.10"]);
        let picked = HighestVersionPolicy.select_single(&set, &MavenComparator);
        assert_eq!(picked.as_deref(), Some("2.0"));
    }

    #[test]
    fn lowest_picks_min() {
        let set = satisfied_set(&["1.0", "2.0", "0.9"]);
        let picked = LowestVersionPolicy.select_single(&set, &MavenComparator);
        assert_eq!(picked.as_deref(), Some("0.9"));
    }

    #[test]
    fn ties_go_to_first_found() {
        // "1.0" and "1.0.0" compare equal; "1.0" sorts first
        let set = satisfied_set(&["1.0.0", "1.0"]);
        let picked = HighestVersionPolicy.select_single(&set, &MavenComparator);
        assert_eq!(picked.as_deref(), Some("1.0"));
    }

    #[test]
    fn empty_satisfied_picks_nothing() {
        let set: ElementSet = ElementSet::new("lib");
        assert!(HighestVersionPolicy.select_single(&set, &MavenComparator).is_none());
    }

    #[test]
    fn select_multiple_returns_satisfied() {
        let set = satisfied_set(&["1.0", "2.0"]);
        let selected = SelectionPolicy::<()>::select_multiple(&HighestVersionPolicy, &set);
        assert_eq!(selected.len(), 2);
    }
}
