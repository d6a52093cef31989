// ────────────────────────────────
// src/server/builder.rs
// ────────────────────────────────
use crate::server::listener::bind_tcp;
use crate::startup::{Listen, ListenConfig};
use anyhow::Result;
use async_trait::async_trait;
use hyper::{server::conn::Http, Body, Request, Response};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower::Service;

/// Builder pattern so `main.rs` can inject its application handler.
pub struct ServerBuilder<H>
where
    H: Service<Request<Body>, Response = Response<Body>> + Send + Clone + 'static,
    H::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    H::Future: Send + 'static,
{
    handler: Option<H>,
}

impl<H> ServerBuilder<H>
where
    H: Service<Request<Body>, Response = Response<Body>> + Send + Clone + 'static,
    H::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    H::Future: Send + 'static,
{
    pub fn new() -> Self {
        Self { handler: None }
    }

    /// Inject the request handler the server will run.
    pub fn with_handler(mut self, handler: H) -> Self {
        self.handler = Some(handler);
        self
    }
}

impl<H> Default for ServerBuilder<H>
where
    H: Service<Request<Body>, Response = Response<Body>> + Send + Clone + 'static,
    H::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    H::Future: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// A server whose socket is bound: the address it accepted and the
/// accept-loop task driving it.
pub struct ServerHandle {
    addr: SocketAddr,
    task: JoinHandle<Result<()>>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Block on the accept loop for the rest of the process lifetime.
    pub async fn wait(self) -> Result<()> {
        self.task.await?
    }

    pub fn abort(&self) {
        self.task.abort();
    }
}

#[async_trait]
impl<H> Listen for ServerBuilder<H>
where
    H: Service<Request<Body>, Response = Response<Body>> + Send + Clone + 'static,
    H::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    H::Future: Send + 'static,
{
    type Handle = ServerHandle;

    /// Bind the socket, then hand the accept loop to the runtime. The
    /// single await is the bind itself; a failure there is returned to
    /// the caller, never retried.
    async fn listen(self, config: ListenConfig) -> Result<ServerHandle> {
        let handler = self.handler.expect("handler must be set via with_handler()");

        let (listener, addr) = bind_tcp(&config).await?;
        tracing::info!("HTTP server listening on {}", addr);

        let task = tokio::spawn(accept_loop(listener, handler));
        Ok(ServerHandle { addr, task })
    }
}

// One Tokio task per connection, same as the bind-time model: the
// loop only ends if accept itself fails.
async fn accept_loop<H>(listener: TcpListener, handler: H) -> Result<()>
where
    H: Service<Request<Body>, Response = Response<Body>> + Send + Clone + 'static,
    H::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    H::Future: Send + 'static,
{
    loop {
        let (stream, peer) = listener.accept().await?;
        let svc = handler.clone();

        tokio::spawn(async move {
            let http = Http::new();
            if let Err(err) = http.serve_connection(stream, svc).await {
                tracing::warn!(%peer, %err, "connection error");
            }
        });
    }
}
