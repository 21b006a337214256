//! Execution context passed down the call chain.
//!
//! The context is an immutable carrier of ambient per-call values — here, the
//! current span. Deriving a context never mutates the original: `with_span`
//! pushes a new scope onto an `Arc`-shared parent chain, so every caller keeps
//! seeing exactly the association it was handed.

use std::fmt;
use std::sync::Arc;

use crate::span::{Span, SpanHandle};

/// Immutable, chainable carrier of the ambient current span.
///
/// Cheap to clone (one `Arc` bump). The innermost scope wins: after
/// `ctx.with_span(s)`, the derived context reports `s` as the current span
/// while `ctx` itself is unchanged.
#[derive(Clone, Default)]
pub struct Context {
    scope: Option<Arc<Scope>>,
}

struct Scope {
    parent: Option<Arc<Scope>>,
    span: SpanHandle,
}

impl Context {
    /// An empty context with no span attached.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive a new context carrying `span` as the current span.
    pub fn with_span(&self, span: SpanHandle) -> Context {
        Context {
            scope: Some(Arc::new(Scope {
                parent: self.scope.clone(),
                span,
            })),
        }
    }

    /// The current span, if one has been attached.
    pub fn span(&self) -> Option<&SpanHandle> {
        self.scope.as_deref().map(|scope| &scope.span)
    }

    /// Number of span scopes chained onto this context.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut scope = self.scope.as_deref();
        while let Some(s) = scope {
            depth += 1;
            scope = s.parent.as_deref();
        }
        depth
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("depth", &self.depth())
            .field(
                "span",
                &self.span().map(|s| s.context()),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::RecordingTracer;
    use crate::tracer::Tracer;

    #[test]
    fn test_empty_context_has_no_span() {
        let ctx = Context::new();
        assert!(ctx.span().is_none());
        assert_eq!(ctx.depth(), 0);
    }

    #[test]
    fn test_with_span_does_not_mutate_original() {
        let tracer = RecordingTracer::new();
        let span = tracer.start_span("op");

        let ctx = Context::new();
        let derived = ctx.with_span(span.clone());

        assert!(ctx.span().is_none());
        assert_eq!(
            derived.span().map(|s| s.context()),
            Some(span.context())
        );
    }

    #[test]
    fn test_innermost_span_wins() {
        let tracer = RecordingTracer::new();
        let outer = tracer.start_span("outer");
        let inner = tracer.start_span("inner");

        let ctx = Context::new().with_span(outer.clone()).with_span(inner.clone());

        assert_eq!(ctx.span().map(|s| s.context()), Some(inner.context()));
        assert_eq!(ctx.depth(), 2);
    }

    #[test]
    fn test_clone_shares_current_span() {
        let tracer = RecordingTracer::new();
        let span = tracer.start_span("op");

        let ctx = Context::new().with_span(span.clone());
        let cloned = ctx.clone();

        assert_eq!(cloned.span().map(|s| s.context()), Some(span.context()));
    }
}
