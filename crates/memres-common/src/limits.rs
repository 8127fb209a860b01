//! Centralized limits and thresholds for the member-resolution engine.
//!
//! The values live here so the solver, the reference type model and the
//! configuration defaults agree.

// =============================================================================
// Hierarchy Limits
// =============================================================================

/// Maximum length of a supertype chain followed by one resolution request.
///
/// Real hierarchies are a few dozen levels deep at most. A chain longer than
/// this is reported as `ResolveError::DepthLimitExceeded` instead of being
/// walked to exhaustion.
///
/// ```text
/// Leaf -> Mid_1 -> Mid_2 -> ... -> Mid_255 -> Root
/// //      ^ 256 frames on the explicit walk stack
/// ```
pub const MAX_HIERARCHY_DEPTH: u32 = 256;

/// Maximum number of supertype edges examined by one resolution request.
///
/// Bounds the total work of a single walk independently of depth: a wide,
/// shallow hierarchy with many diamonds revisits cached classifiers through
/// every edge.
pub const MAX_HIERARCHY_ITERATIONS: u32 = 1_000_000;

// =============================================================================
// Type Model Limits
// =============================================================================

/// Maximum depth for structural subtype checks in the reference type model.
///
/// Generic arguments are compared invariantly, so each nested argument adds
/// a level:
///
/// ```text
/// List<List<List<...<String>...>>> <: List<List<List<...<Any>...>>>
/// ```
pub const MAX_SUBTYPE_DEPTH: u32 = 100;

// =============================================================================
// Capacity Hints
// =============================================================================

/// Expected number of declared members per classifier.
///
/// Used to pre-size signature tables. Most classifiers declare fewer.
pub const MEMBER_TABLE_CAPACITY: usize = 32;
