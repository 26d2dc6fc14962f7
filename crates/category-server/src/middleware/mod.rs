pub mod tracing_middleware;

pub use tracing_middleware::{extract_trace_id, trace_requests, TraceId, TRACE_ID_HEADER};
