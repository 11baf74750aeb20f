//! Core data types for the Tarn resolution engine.
//!
//! This crate defines the leaf values the engine works on: versioned
//! elements, their dependency declarations, the match rules that constrain
//! those dependencies, version comparators and the resolver configuration.
//!
//! Nothing here knows about the resolution graph; see `tarn-resolver`.

pub mod config;
pub mod dependency;
pub mod element;
pub mod match_rule;
pub mod version;
