//! Shared utilities for the Tarn resolution engine.
//!
//! This crate provides the cross-cutting error type used by every other Tarn
//! crate.

pub mod errors;
