//! Span-lifecycle tracing decorators for endpoints.
//!
//! `trace_server` and `trace_client` wrap an endpoint so every invocation is
//! recorded as a span, without altering the endpoint's observable contract.
//! The server side maps one inbound call boundary to one span: an inbound
//! span already present in the context (extracted from wire headers by some
//! outer layer) is reused and renamed to the logical operation rather than
//! buried under a second span. The client side always starts a new span —
//! each outbound call is a distinct dependency edge in the trace — parented
//! to the ambient span when one exists.

use std::fmt::Display;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::context::Context;
use crate::endpoint::{Endpoint, Middleware};
use crate::span::{tag, Span, SpanHandle, SpanKind};
use crate::tracer::Tracer;

/// Finishes the span when dropped, so closure happens exactly once on every
/// exit path: normal return, error return, panic unwind, and future drop.
struct FinishGuard(Option<SpanHandle>);

impl FinishGuard {
    fn new(span: SpanHandle) -> Self {
        Self(Some(span))
    }
}

impl Drop for FinishGuard {
    fn drop(&mut self) {
        if let Some(span) = self.0.take() {
            span.finish();
        }
    }
}

/// Invoke `next` under `span`: tag the span on error, finish it
/// unconditionally, and pass the result through untouched.
async fn invoke_traced<Req, Rsp, E>(
    next: Endpoint<Req, Rsp, E>,
    ctx: Context,
    req: Req,
    span: SpanHandle,
) -> Result<Rsp, E>
where
    E: Display,
{
    let guard = FinishGuard::new(span.clone());
    let ctx = ctx.with_span(span.clone());
    let result = next(ctx, req).await;
    if let Err(err) = &result {
        span.set_tag(tag::ERROR, serde_json::Value::Bool(true));
        span.set_tag(tag::MESSAGE, serde_json::Value::String(err.to_string()));
    }
    drop(guard);
    result
}

/// Returns a middleware that wraps an endpoint in a server-side span named
/// `operation_name`.
///
/// If the context already carries a span, it is reused and its operation name
/// is overwritten; otherwise a new root span is started. The reused span is
/// shared state: callers must not assume its original name is stable once
/// tracing begins.
pub fn trace_server<Req, Rsp, E>(
    tracer: Arc<dyn Tracer>,
    operation_name: impl Into<String>,
) -> Middleware<Req, Rsp, E>
where
    Req: Send + 'static,
    Rsp: Send + 'static,
    E: Display + Send + 'static,
{
    let operation_name = operation_name.into();
    Box::new(move |next: Endpoint<Req, Rsp, E>| {
        let tracer = tracer.clone();
        let operation_name = operation_name.clone();
        Arc::new(move |ctx: Context, req: Req| -> BoxFuture<'static, Result<Rsp, E>> {
            let tracer = tracer.clone();
            let operation_name = operation_name.clone();
            let next = next.clone();
            Box::pin(async move {
                let span = match ctx.span() {
                    Some(inbound) => {
                        inbound.set_operation_name(&operation_name);
                        inbound.clone()
                    }
                    None => {
                        // No inbound span to adopt; start a new trace.
                        tracing::trace!(operation = %operation_name, "starting root server span");
                        tracer.start_span(&operation_name)
                    }
                };
                span.set_kind(SpanKind::Server);
                invoke_traced(next, ctx, req, span).await
            })
        })
    })
}

/// Returns a middleware that wraps an endpoint in a client-side span named
/// `operation_name`.
///
/// A new span is always started: as a child of the context's span when one is
/// present, as a root span otherwise.
pub fn trace_client<Req, Rsp, E>(
    tracer: Arc<dyn Tracer>,
    operation_name: impl Into<String>,
) -> Middleware<Req, Rsp, E>
where
    Req: Send + 'static,
    Rsp: Send + 'static,
    E: Display + Send + 'static,
{
    let operation_name = operation_name.into();
    Box::new(move |next: Endpoint<Req, Rsp, E>| {
        let tracer = tracer.clone();
        let operation_name = operation_name.clone();
        Arc::new(move |ctx: Context, req: Req| -> BoxFuture<'static, Result<Rsp, E>> {
            let tracer = tracer.clone();
            let operation_name = operation_name.clone();
            let next = next.clone();
            Box::pin(async move {
                let span = match ctx.span() {
                    Some(parent) => tracer.start_child_span(&operation_name, &parent.context()),
                    None => {
                        tracing::trace!(operation = %operation_name, "starting root client span");
                        tracer.start_span(&operation_name)
                    }
                };
                span.set_kind(SpanKind::Client);
                invoke_traced(next, ctx, req, span).await
            })
        })
    })
}
