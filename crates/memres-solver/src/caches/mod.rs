pub(crate) mod query_trace;
