//! The tracer capability required by the middleware.
//!
//! The middleware never implements span creation itself; it only asks a
//! [`Tracer`] for root or child spans. Sampling, export, and transport are
//! the tracer's concern.

use std::sync::Arc;

use crate::span::{Span, SpanContext, SpanHandle};

/// Capability to start spans.
pub trait Tracer: Send + Sync {
    /// Start a new root span, beginning a new trace.
    fn start_span(&self, operation_name: &str) -> SpanHandle;

    /// Start a new span parented to `parent`.
    fn start_child_span(&self, operation_name: &str, parent: &SpanContext) -> SpanHandle;
}

/// Tracer that records nothing. Spans still carry valid identities so
/// parenting keeps working through an uninstrumented deployment.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracer;

impl NoopTracer {
    pub fn new() -> Self {
        Self
    }
}

impl Tracer for NoopTracer {
    fn start_span(&self, _operation_name: &str) -> SpanHandle {
        Arc::new(NoopSpan {
            context: SpanContext::new_root(),
        })
    }

    fn start_child_span(&self, _operation_name: &str, parent: &SpanContext) -> SpanHandle {
        Arc::new(NoopSpan {
            context: SpanContext::new_child(parent),
        })
    }
}

struct NoopSpan {
    context: SpanContext,
}

impl Span for NoopSpan {
    fn context(&self) -> SpanContext {
        self.context
    }

    fn set_operation_name(&self, _operation_name: &str) {}

    fn set_tag(&self, _key: &str, _value: serde_json::Value) {}

    fn finish(&self) {}
}
