// src/server/handler.rs
use hyper::{Body, Request, Response, StatusCode};
use tower::Service;

/// Placeholder application handler: acknowledges every request with
/// 200. The real application plugs in through `ServerBuilder`; the
/// bootstrap itself owns no routing.
#[derive(Clone, Default)]
pub struct AppHandler;

impl AppHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Service<Request<Body>> for AppHandler {
    type Response = Response<Body>;
    type Error = Box<dyn std::error::Error + Send + Sync>;
    type Future = futures::future::BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        tracing::debug!(method = %req.method(), path = %req.uri().path(), "request");

        Box::pin(async move {
            let response = Response::builder()
                .status(StatusCode::OK)
                .body(Body::from("OK"))?;
            Ok(response)
        })
    }
}
