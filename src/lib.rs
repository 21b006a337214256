//! Span-lifecycle tracing middleware for endpoint call chains.
//!
//! This crate wraps a unit of request handling (an "endpoint") so that each
//! invocation is recorded as a span in a distributed trace, with server-side
//! and client-side variants. The wrapped endpoint's contract is untouched:
//! the same request goes in, the same response or error comes out, and the
//! trace data is a pure side channel.
//!
//! # Span topology
//!
//! ```text
//! inbound call ─ trace_server("GetUser")        one span per inbound call,
//!                  └─ trace_client("FetchDb")   renamed to the logical op;
//!                  └─ trace_client("FetchCache")  one child span per outbound leg
//! ```
//!
//! The server decorator reuses and renames a span already present in the
//! context (typically extracted from wire headers by an outer layer) instead
//! of stacking a second span over it; the client decorator always starts a
//! new child span, since every outbound call is a distinct edge in the trace.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use endpoint_trace::{endpoint, trace_server, Context, NoopTracer};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let tracer = Arc::new(NoopTracer::new());
//! let get_user = endpoint(|_ctx, user_id: u64| async move {
//!     Ok::<_, String>(format!("user {user_id}"))
//! });
//!
//! let traced = trace_server(tracer, "GetUser")(get_user);
//! let response = traced(Context::new(), 7).await;
//! assert_eq!(response, Ok("user 7".to_string()));
//! # }
//! ```
//!
//! Span closure is guaranteed on every exit path — success, error, panic
//! unwind, and dropped call futures — and always happens after error tagging
//! and before the caller observes completion.

pub mod context;
pub mod endpoint;
pub mod log;
pub mod mock;
pub mod span;
pub mod trace;
pub mod tracer;

pub use context::Context;
pub use endpoint::{chain, endpoint, Endpoint, Middleware};
pub use log::log_endpoint;
pub use span::{tag, Span, SpanContext, SpanHandle, SpanKind};
pub use trace::{trace_client, trace_server};
pub use tracer::{NoopTracer, Tracer};
