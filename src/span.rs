//! Core span types: the `Span` capability, its trace identity, and the
//! standard tag vocabulary used by the middleware.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// RPC kind of a span, recorded as the `span.kind` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanKind {
    Server,
    Client,
}

impl SpanKind {
    /// Tag value for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            SpanKind::Server => "server",
            SpanKind::Client => "client",
        }
    }
}

/// Identity of a span within its trace.
///
/// This is the part of a span a child is parented to: the trace it belongs
/// to and its own id. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanContext {
    pub trace_id: Uuid,
    pub span_id: Uuid,
}

impl SpanContext {
    /// Identity for a root span: a fresh trace.
    pub fn new_root() -> Self {
        Self {
            trace_id: Uuid::new_v4(),
            span_id: Uuid::new_v4(),
        }
    }

    /// Identity for a span parented to `parent`: same trace, fresh span id.
    pub fn new_child(parent: &SpanContext) -> Self {
        Self {
            trace_id: parent.trace_id,
            span_id: Uuid::new_v4(),
        }
    }
}

/// One named, timed unit of work in a trace.
///
/// Implementations are shared-mutable behind [`SpanHandle`]: the server-side
/// middleware renames a span the caller may still hold a reference to, so all
/// mutation goes through `&self` with interior synchronization. A span is
/// finished exactly once; tags must only be set while it is open.
pub trait Span: Send + Sync {
    /// The span's trace identity.
    fn context(&self) -> SpanContext;

    /// Overwrite the operation name.
    fn set_operation_name(&self, operation_name: &str);

    /// Set a tag on the span.
    fn set_tag(&self, key: &str, value: serde_json::Value);

    /// Close the span. Called exactly once per lifecycle.
    fn finish(&self);

    /// Mark the span's RPC kind via the standard `span.kind` tag.
    fn set_kind(&self, kind: SpanKind) {
        self.set_tag(tag::SPAN_KIND, serde_json::Value::String(kind.as_str().to_string()));
    }
}

/// Shared handle to a span. Cloning shares the same underlying span.
pub type SpanHandle = Arc<dyn Span>;

/// Standard tag keys set by the middleware.
pub mod tag {
    /// Boolean flag set to `true` when the wrapped endpoint failed.
    pub const ERROR: &str = "error";
    /// Textual description of the endpoint's error.
    pub const MESSAGE: &str = "message";
    /// RPC kind of the span: `server` or `client`.
    pub const SPAN_KIND: &str = "span.kind";
}
