//! Epoch marks used for incremental recomputation.

use std::fmt;

/// The three resolution passes, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    Satisfaction = 0,
    Selection = 1,
    Resolution = 2,
}

impl Phase {
    /// The pass that consumes this pass's output.
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Satisfaction => Some(Phase::Selection),
            Phase::Selection => Some(Phase::Resolution),
            Phase::Resolution => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Satisfaction => "satisfaction",
            Phase::Selection => "selection",
            Phase::Resolution => "resolution",
        };
        f.write_str(name)
    }
}

/// Identifies one sweep: the resolve epoch plus the pass within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mark {
    pub epoch: u64,
    pub phase: Phase,
}

impl Mark {
    pub fn new(epoch: u64, phase: Phase) -> Self {
        Self { epoch, phase }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.epoch, self.phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_are_ordered() {
        assert!(Phase::Satisfaction < Phase::Selection);
        assert!(Phase::Selection < Phase::Resolution);
    }

    #[test]
    fn next_phase() {
        assert_eq!(Phase::Satisfaction.next(), Some(Phase::Selection));
        assert_eq!(Phase::Resolution.next(), None);
    }

    #[test]
    fn marks_differ_by_phase() {
        assert_ne!(Mark::new(1, Phase::Selection), Mark::new(1, Phase::Resolution));
        assert_eq!(Mark::new(4, Phase::Selection).to_string(), "4/selection");
    }
}
