//! Predicates deciding whether an available version fulfils a dependency.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::version::MavenOrder;

/// A pure predicate evaluated once per candidate version during satisfaction.
///
/// `required` is the dependency's version hint, `available` the candidate
/// version id. Implementations must not have side effects.
pub trait MatchRule: fmt::Debug {
    fn is_satisfied(&self, required: Option<&str>, available: &str) -> bool;

    /// `false` for rules that can never match anything. The system creates no
    /// graph edge for dependencies carrying such a rule.
    fn is_satisfiable(&self) -> bool {
        true
    }
}

/// Shared handle to a match rule.
pub type SharedMatchRule = Arc<dyn MatchRule>;

/// Accepts any version. Used when a dependency declares no constraint.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unspecified;

impl MatchRule for Unspecified {
    fn is_satisfied(&self, _required: Option<&str>, _available: &str) -> bool {
        true
    }
}

/// Rejects every version. Poisons elements evicted from a cycle.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsatisfiable;

impl MatchRule for Unsatisfiable {
    fn is_satisfied(&self, _required: Option<&str>, _available: &str) -> bool {
        false
    }

    fn is_satisfiable(&self) -> bool {
        false
    }
}

/// The available version id must equal the hint verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatch;

impl MatchRule for ExactMatch {
    fn is_satisfied(&self, required: Option<&str>, available: &str) -> bool {
        required.map_or(true, |required| required == available)
    }
}

/// The available version must be at least the hint, in Maven ordering.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinimumVersion;

impl MatchRule for MinimumVersion {
    fn is_satisfied(&self, required: Option<&str>, available: &str) -> bool {
        required.map_or(true, |required| {
            MavenOrder::parse(available) >= MavenOrder::parse(required)
        })
    }
}

/// Maven range syntax: `[1.0,2.0)`, `[1.0,]`, `(,2.0)`, `[1.5]` (exact).
///
/// A hint without brackets is treated as an inclusive lower bound. A
/// malformed range matches nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct MavenRange;

impl MatchRule for MavenRange {
    fn is_satisfied(&self, required: Option<&str>, available: &str) -> bool {
        let Some(required) = required else {
            return true;
        };
        match VersionRange::parse(required) {
            Some(range) => range.contains(&MavenOrder::parse(available)),
            None if is_bracketed(required) => false,
            None => MinimumVersion.is_satisfied(Some(required), available),
        }
    }
}

/// Semver requirement syntax (`^1.2`, `>=1.0, <2.0`). Versions that do not
/// parse never match.
#[derive(Debug, Clone, Copy, Default)]
pub struct SemverRequirement;

impl MatchRule for SemverRequirement {
    fn is_satisfied(&self, required: Option<&str>, available: &str) -> bool {
        let Some(required) = required else {
            return true;
        };
        match (
            semver::VersionReq::parse(required),
            semver::Version::parse(available),
        ) {
            (Ok(req), Ok(version)) => req.matches(&version),
            _ => false,
        }
    }
}

fn is_bracketed(spec: &str) -> bool {
    let s = spec.trim();
    s.starts_with('[') || s.starts_with('(')
}

#[derive(Debug, Clone)]
struct Bound {
    version: MavenOrder,
    inclusive: bool,
}

#[derive(Debug, Clone)]
struct VersionRange {
    lower: Option<Bound>,
    upper: Option<Bound>,
}

impl VersionRange {
    fn parse(spec: &str) -> Option<Self> {
        let s = spec.trim();
        if !is_bracketed(s) || s.len() < 2 {
            return None;
        }
        let close_inclusive = match s.chars().last()? {
            ']' => true,
            ')' => false,
            _ => return None,
        };
        let open_inclusive = s.starts_with('[');
        let inner = &s[1..s.len() - 1];

        let bound = |text: &str, inclusive: bool| {
            let text = text.trim();
            (!text.is_empty()).then(|| Bound {
                version: MavenOrder::parse(text),
                inclusive,
            })
        };

        match inner.split_once(',') {
            Some((lower, upper)) => Some(VersionRange {
                lower: bound(lower, open_inclusive),
                upper: bound(upper, close_inclusive),
            }),
            None => {
                let exact = bound(inner, true)?;
                Some(VersionRange {
                    lower: Some(exact.clone()),
                    upper: Some(exact),
                })
            }
        }
    }

    fn contains(&self, version: &MavenOrder) -> bool {
        let above_lower = self.lower.as_ref().map_or(true, |b| {
            match version.cmp(&b.version) {
                Ordering::Greater => true,
                Ordering::Equal => b.inclusive,
                Ordering::Less => false,
            }
        });
        let below_upper = self.upper.as_ref().map_or(true, |b| {
            match version.cmp(&b.version) {
                Ordering::Less => true,
                Ordering::Equal => b.inclusive,
                Ordering::Greater => false,
            }
        });
        above_lower && below_upper
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unspecified_accepts_everything() {
        assert!(Unspecified.is_satisfied(None, "1.0"));
        assert!(Unspecified.is_satisfied(Some("9.9"), "1.0"));
        assert!(Unspecified.is_satisfiable());
    }

    #[test]
    fn unsatisfiable_rejects_everything() {
        assert!(!Unsatisfiable.is_satisfied(None, "1.0"));
        assert!(!Unsatisfiable.is_satisfiable());
    }

    #[test]
    fn exact_match() {
        assert!(ExactMatch.is_satisfied(Some("1.0"), "1.0"));
        assert!(!ExactMatch.is_satisfied(Some("1.0"), "1.0.0"));
        assert!(ExactMatch.is_satisfied(None, "3.0"));
    }

    #[test]
    fn minimum_version() {
        assert!(MinimumVersion.is_satisfied(Some("1.2"), "1.2"));
        assert!(MinimumVersion.is_satisfied(Some("1.2"), "1.10"));
        assert!(!MinimumVersion.is_satisfied(Some("1.2"), "1.1"));
    }

    #[test]
    fn maven_range_inclusive() {
        let rule = MavenRange;
        assert!(rule.is_satisfied(Some("[1.0,2.0]"), "1.0"));
        assert!(rule.is_satisfied(Some("[1.0,2.0]"), "2.0"));
        assert!(!rule.is_satisfied(Some("[1.0,2.0]"), "2.1"));
    }

    #[test]
    fn maven_range_exclusive_upper() {
        let rule = MavenRange;
        assert!(rule.is_satisfied(Some("[1.0,2.0)"), "1.9.9"));
        assert!(!rule.is_satisfied(Some("[1.0,2.0)"), "2.0"));
        assert!(rule.is_satisfied(Some("(,2.0)"), "0.1"));
    }

    #[test]
    fn maven_range_exact_and_bare() {
        let rule = MavenRange;
        assert!(rule.is_satisfied(Some("[1.5]"), "1.5"));
        assert!(!rule.is_satisfied(Some("[1.5]"), "1.6"));
        assert!(rule.is_satisfied(Some("1.5"), "1.6"));
        assert!(!rule.is_satisfied(Some("1.5"), "1.4"));
    }

    #[test]
    fn maven_range_malformed_matches_nothing() {
        assert!(!MavenRange.is_satisfied(Some("[1.0,2.0"), "1.5"));
    }

    #[test]
    fn semver_requirement() {
        let rule = SemverRequirement;
        assert!(rule.is_satisfied(Some("^1.2"), "1.4.0"));
        assert!(!rule.is_satisfied(Some("^1.2"), "2.0.0"));
        assert!(!rule.is_satisfied(Some("^1.2"), "not-a-version"));
    }
}
