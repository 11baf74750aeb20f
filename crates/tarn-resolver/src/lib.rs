//! Generic dependency resolution engine.
//!
//! A [`DependencySystem`](system::DependencySystem) holds every known version
//! of every element, grouped into [`ElementSet`](element_set::ElementSet)s.
//! Each `resolve` runs three dependency-ordered sweeps (satisfaction,
//! selection, resolution), recomputing only the sets touched since the last
//! run, and reports the outcome as a [`ResolutionDelta`](delta::ResolutionDelta).

mod cycle;
mod graph;
mod visitor;

pub mod delta;
pub mod element_set;
pub mod mark;
pub mod policy;
pub mod system;

pub use delta::{ChangeKind, ElementChange, ResolutionDelta};
pub use element_set::ElementSet;
pub use policy::{HighestVersionPolicy, LowestVersionPolicy, SelectionPolicy};
pub use system::DependencySystem;
