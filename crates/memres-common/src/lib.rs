//! Common types and utilities for the memres member-resolution engine.
//!
//! This crate provides foundational types shared by the memres crates:
//! - String interning for member and classifier names (`Atom`, `Interner`)
//! - Centralized limits and thresholds

// String interning for identifier deduplication
pub mod interner;
pub use interner::{Atom, Interner};

// Centralized limits and thresholds
pub mod limits;
