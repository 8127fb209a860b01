//! Structured query tracing for resolver entry points.
//!
//! Events use target `memres::query_json` and are intended to be consumed with:
//! `MEMRES_LOG=memres::query_json=trace MEMRES_LOG_FORMAT=json`.
//!
//! Environment:
//! - `MEMRES_QUERY_RUN_ID`: optional run identifier attached to every event.

use crate::def::DefId;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{Level, trace};

static NEXT_QUERY_ID: AtomicU64 = AtomicU64::new(1);
static QUERY_RUN_ID: OnceLock<String> = OnceLock::new();

#[inline]
pub(crate) fn enabled() -> bool {
    tracing::enabled!(target: "memres::query_json", Level::TRACE)
}

#[inline]
pub(crate) fn next_query_id() -> u64 {
    NEXT_QUERY_ID.fetch_add(1, Ordering::Relaxed)
}

#[inline]
fn run_id() -> &'static str {
    QUERY_RUN_ID
        .get_or_init(|| std::env::var("MEMRES_QUERY_RUN_ID").unwrap_or_else(|_| "default".to_string()))
        .as_str()
}

#[inline]
pub(crate) fn members_start(query_id: u64, op: &'static str, def: DefId) {
    trace!(
        target: "memres::query_json",
        event = "query",
        phase = "start",
        run_id = run_id(),
        query_id,
        op,
        def_id = def.0
    );
}

#[inline]
pub(crate) fn members_end(query_id: u64, op: &'static str, member_count: usize, cache_hit: bool) {
    trace!(
        target: "memres::query_json",
        event = "query",
        phase = "end",
        run_id = run_id(),
        query_id,
        op,
        member_count,
        cache_hit
    );
}

#[inline]
pub(crate) fn members_error(query_id: u64, op: &'static str, error_kind: &'static str) {
    trace!(
        target: "memres::query_json",
        event = "query",
        phase = "error",
        run_id = run_id(),
        query_id,
        op,
        error_kind
    );
}
