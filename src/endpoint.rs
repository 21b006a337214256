//! Endpoint and middleware abstractions.
//!
//! An endpoint is the fundamental unit of request handling: an async function
//! from `(Context, Request)` to `Result<Response, Error>`. A middleware is a
//! transformation from one endpoint to another with the same shape, so
//! decorations compose without the endpoint knowing it is wrapped.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::context::Context;

/// A request-handling endpoint.
///
/// `Arc`-shared so middlewares can capture and re-invoke it from `'static`
/// futures.
pub type Endpoint<Req, Rsp, E> =
    Arc<dyn Fn(Context, Req) -> BoxFuture<'static, Result<Rsp, E>> + Send + Sync>;

/// A transformation from one endpoint to another with an identical contract.
pub type Middleware<Req, Rsp, E> =
    Box<dyn Fn(Endpoint<Req, Rsp, E>) -> Endpoint<Req, Rsp, E> + Send + Sync>;

/// Lift an async closure into an [`Endpoint`].
pub fn endpoint<Req, Rsp, E, F, Fut>(f: F) -> Endpoint<Req, Rsp, E>
where
    F: Fn(Context, Req) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Rsp, E>> + Send + 'static,
{
    Arc::new(move |ctx, req| Box::pin(f(ctx, req)))
}

/// Compose middlewares into one, first middleware outermost.
///
/// `chain(vec![f, g, h])` applied to an endpoint behaves as `f(g(h(endpoint)))`:
/// a request flows f → g → h → endpoint, and the result flows back out in
/// reverse.
pub fn chain<Req, Rsp, E>(middlewares: Vec<Middleware<Req, Rsp, E>>) -> Middleware<Req, Rsp, E>
where
    Req: 'static,
    Rsp: 'static,
    E: 'static,
{
    Box::new(move |next| {
        middlewares
            .iter()
            .rev()
            .fold(next, |wrapped, middleware| middleware(wrapped))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn labelling(
        label: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
    ) -> Middleware<u32, u32, String> {
        Box::new(move |next: Endpoint<u32, u32, String>| {
            let log = log.clone();
            Arc::new(
                move |ctx, req| -> BoxFuture<'static, Result<u32, String>> {
                    let next = next.clone();
                    let log = log.clone();
                    Box::pin(async move {
                        log.lock().unwrap().push(label);
                        next(ctx, req).await
                    })
                },
            )
        })
    }

    #[tokio::test]
    async fn test_endpoint_invocation() {
        let double = endpoint(|_ctx, req: u32| async move { Ok::<_, String>(req * 2) });
        let result = double(Context::new(), 21).await;
        assert_eq!(result, Ok(42));
    }

    #[tokio::test]
    async fn test_chain_applies_first_middleware_outermost() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let composed = chain(vec![
            labelling("f", log.clone()),
            labelling("g", log.clone()),
            labelling("h", log.clone()),
        ]);

        let inner_log = log.clone();
        let ep = endpoint(move |_ctx, req: u32| {
            let inner_log = inner_log.clone();
            async move {
                inner_log.lock().unwrap().push("endpoint");
                Ok::<_, String>(req)
            }
        });

        let wrapped = composed(ep);
        let result = wrapped(Context::new(), 7).await;

        assert_eq!(result, Ok(7));
        assert_eq!(*log.lock().unwrap(), vec!["f", "g", "h", "endpoint"]);
    }

    #[tokio::test]
    async fn test_empty_chain_is_identity() {
        let composed = chain::<u32, u32, String>(vec![]);
        let wrapped = composed(endpoint(|_ctx, req: u32| async move { Ok(req + 1) }));
        assert_eq!(wrapped(Context::new(), 1).await, Ok(2));
    }
}
