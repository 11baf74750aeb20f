//! Version ordering used by selection and dependency binding.
//!
//! The engine never interprets version ids itself. It asks an injected
//! [`VersionComparator`], so any scheme can be plugged in. Three comparators
//! ship with the crate:
//! - [`MavenComparator`]: segments split on `.` and `-`, numeric segments
//!   compare as numbers, known qualifiers order as
//!   `alpha` < `beta` < `milestone` < `rc` < `snapshot` < release < `sp`
//! - [`SemverComparator`]: strict semver, with Maven ordering as fallback for
//!   ids that are not valid semver
//! - [`LexicalComparator`]: plain string ordering

use std::cmp::Ordering;

/// Total order over version ids.
pub trait VersionComparator {
    fn compare(&self, a: &str, b: &str) -> Ordering;
}

impl<F> VersionComparator for F
where
    F: Fn(&str, &str) -> Ordering,
{
    fn compare(&self, a: &str, b: &str) -> Ordering {
        self(a, b)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MavenComparator;

impl VersionComparator for MavenComparator {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        MavenOrder::parse(a).cmp(&MavenOrder::parse(b))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SemverComparator;

impl VersionComparator for SemverComparator {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        match (semver::Version::parse(a), semver::Version::parse(b)) {
            (Ok(a), Ok(b)) => a.cmp(&b),
            _ => MavenComparator.compare(a, b),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalComparator;

impl VersionComparator for LexicalComparator {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        a.cmp(b)
    }
}

/// A version id broken into Maven-comparable segments.
#[derive(Debug, Clone)]
pub struct MavenOrder {
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
enum Segment {
    Number(u64),
    Known(Qualifier),
    Text(String),
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
enum Qualifier {
    Alpha,
    Beta,
    Milestone,
    Rc,
    Snapshot,
    Release,
    Sp,
}

impl MavenOrder {
    pub fn parse(version: &str) -> Self {
        let segments = version
            .split(['.', '-'])
            .filter(|token| !token.is_empty())
            .map(Segment::classify)
            .collect();
        Self { segments }
    }
}

impl PartialEq for MavenOrder {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MavenOrder {}

impl PartialOrd for MavenOrder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MavenOrder {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        (0..len)
            .map(|i| match (self.segments.get(i), other.segments.get(i)) {
                (Some(a), Some(b)) => a.compare(b),
                (Some(a), None) => a.compare_to_missing(),
                (None, Some(b)) => b.compare_to_missing().reverse(),
                (None, None) => Ordering::Equal,
            })
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

impl Segment {
    fn classify(token: &str) -> Self {
        if let Ok(n) = token.parse::<u64>() {
            return Segment::Number(n);
        }
        match token.to_lowercase().as_str() {
            "alpha" | "a" => Segment::Known(Qualifier::Alpha),
            "beta" | "b" => Segment::Known(Qualifier::Beta),
            "milestone" | "m" => Segment::Known(Qualifier::Milestone),
            "rc" | "cr" => Segment::Known(Qualifier::Rc),
            "snapshot" => Segment::Known(Qualifier::Snapshot),
            "ga" | "final" | "release" => Segment::Known(Qualifier::Release),
            "sp" => Segment::Known(Qualifier::Sp),
            _ => Segment::Text(token.to_lowercase()),
        }
    }

    /// Ordering of this segment against a version that has run out of segments.
    fn compare_to_missing(&self) -> Ordering {
        match self {
            Segment::Number(0) => Ordering::Equal,
            Segment::Number(_) => Ordering::Greater,
            Segment::Known(q) => q.cmp(&Qualifier::Release),
            Segment::Text(_) => Ordering::Less,
        }
    }

    fn compare(&self, other: &Segment) -> Ordering {
        use Segment::*;
        match (self, other) {
            (Number(a), Number(b)) => a.cmp(b),
            (Known(a), Known(b)) => a.cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            (Number(_), _) => Ordering::Greater,
            (_, Number(_)) => Ordering::Less,
            (Known(q), Text(_)) if *q >= Qualifier::Release => Ordering::Greater,
            (Known(_), Text(_)) => Ordering::Less,
            (Text(_), Known(q)) if *q >= Qualifier::Release => Ordering::Less,
            (Text(_), Known(_)) => Ordering::Greater,
        }
    }
}
