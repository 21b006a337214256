//! Logging middleware for endpoints.
//!
//! Complements the tracing decorators with structured request logs: outcome
//! and latency per invocation, emitted through the `tracing` macros.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Instant;

use futures::future::BoxFuture;

use crate::endpoint::{Endpoint, Middleware};

/// Returns a middleware that logs each invocation of the wrapped endpoint.
///
/// Successes are logged at `debug`, failures at `warn` with the error's
/// display text. The result passes through unchanged.
pub fn log_endpoint<Req, Rsp, E>(operation_name: impl Into<String>) -> Middleware<Req, Rsp, E>
where
    Req: Send + 'static,
    Rsp: Send + 'static,
    E: Display + Send + 'static,
{
    let operation_name = operation_name.into();
    Box::new(move |next: Endpoint<Req, Rsp, E>| {
        let operation_name = operation_name.clone();
        Arc::new(move |ctx, req: Req| -> BoxFuture<'static, Result<Rsp, E>> {
            let operation_name = operation_name.clone();
            let next = next.clone();
            Box::pin(async move {
                let start = Instant::now();
                let result = next(ctx, req).await;
                let elapsed_ms = start.elapsed().as_millis() as u64;
                match &result {
                    Ok(_) => {
                        tracing::debug!(
                            operation = %operation_name,
                            elapsed_ms,
                            "endpoint completed"
                        );
                    }
                    Err(err) => {
                        tracing::warn!(
                            operation = %operation_name,
                            elapsed_ms,
                            error = %err,
                            "endpoint failed"
                        );
                    }
                }
                result
            })
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::endpoint::endpoint;

    #[tokio::test]
    async fn test_log_middleware_is_pass_through() {
        let ep = endpoint(|_ctx, req: u32| async move { Ok::<_, String>(req + 1) });
        let wrapped = log_endpoint("Op")(ep);
        assert_eq!(wrapped(Context::new(), 1).await, Ok(2));

        let ep = endpoint(|_ctx, _req: u32| async move { Err::<u32, _>("boom".to_string()) });
        let wrapped = log_endpoint("Op")(ep);
        assert_eq!(wrapped(Context::new(), 1).await, Err("boom".to_string()));
    }
}
