// src/startup/mod.rs
// Process entry point: one bind attempt, fail-fast, no retry.
use anyhow::Result;
use async_trait::async_trait;
use std::io::Write;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Listen configuration handed to the application object. Built fresh
/// for every startup attempt; the host is always the all-interfaces
/// address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenConfig {
    pub port: u16,
    pub host: IpAddr,
}

impl ListenConfig {
    pub fn all_interfaces(port: u16) -> Self {
        Self {
            port,
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Contract the application object satisfies: a single asynchronous
/// listen that resolves once the socket is bound, or fails with the
/// underlying bind error.
#[async_trait]
pub trait Listen {
    type Handle: Send;

    async fn listen(self, config: ListenConfig) -> Result<Self::Handle>;
}

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("server failed to start: {0}")]
    Bind(anyhow::Error),
}

/// Run one startup attempt and report the outcome on the given sinks.
///
/// On success, writes exactly one confirmation line to `stdout` and
/// returns the running-server handle. On failure, writes exactly one
/// error line to `stderr` and returns the error; whether the process
/// exits is the caller's decision, so this stays testable.
pub async fn start<A, O, E>(
    app: A,
    port: u16,
    stdout: &mut O,
    stderr: &mut E,
) -> Result<A::Handle, StartupError>
where
    A: Listen,
    O: Write,
    E: Write,
{
    match app.listen(ListenConfig::all_interfaces(port)).await {
        Ok(handle) => {
            let _ = writeln!(stdout, "{}", success_message(port));
            Ok(handle)
        }
        Err(err) => {
            let _ = writeln!(stderr, "Error starting server: {}", err);
            Err(StartupError::Bind(err))
        }
    }
}

/// Confirmation line printed once the server is listening.
pub fn success_message(port: u16) -> String {
    format!("HTTP Server Running on port {}!", port)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Clone)]
    struct FakeApp {
        calls: Arc<AtomicU32>,
        seen: Arc<Mutex<Vec<ListenConfig>>>,
        failure: Option<String>,
    }

    impl FakeApp {
        fn succeeding() -> Self {
            Self {
                calls: Arc::new(AtomicU32::new(0)),
                seen: Arc::new(Mutex::new(Vec::new())),
                failure: None,
            }
        }

        fn failing(detail: &str) -> Self {
            Self {
                failure: Some(detail.to_string()),
                ..Self::succeeding()
            }
        }
    }

    #[async_trait]
    impl Listen for FakeApp {
        type Handle = ();

        async fn listen(self, config: ListenConfig) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(config);
            match self.failure {
                Some(detail) => Err(anyhow::anyhow!(detail)),
                None => Ok(()),
            }
        }
    }

    #[tokio::test]
    async fn success_writes_one_confirmation_line() {
        let app = FakeApp::succeeding();
        let mut out = Vec::new();
        let mut err = Vec::new();

        let result = start(app, 3000, &mut out, &mut err).await;

        assert!(result.is_ok());
        let out = String::from_utf8(out).unwrap();
        assert_eq!(out, "HTTP Server Running on port 3000!\n");
        assert!(err.is_empty());
    }

    #[tokio::test]
    async fn failure_writes_one_error_line_with_detail() {
        let app = FakeApp::failing("EADDRINUSE");
        let mut out = Vec::new();
        let mut err = Vec::new();

        let result = start(app, 3000, &mut out, &mut err).await;

        assert!(matches!(result, Err(StartupError::Bind(_))));
        let err = String::from_utf8(err).unwrap();
        assert_eq!(err.lines().count(), 1);
        assert!(err.starts_with("Error starting server:"));
        assert!(err.contains("EADDRINUSE"));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn listen_is_invoked_exactly_once_even_on_failure() {
        let app = FakeApp::failing("EACCES");
        let calls = app.calls.clone();
        let mut out = Vec::new();
        let mut err = Vec::new();

        let _ = start(app, 80, &mut out, &mut err).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn bind_host_is_always_all_interfaces() {
        let app = FakeApp::succeeding();
        let seen = app.seen.clone();
        let mut out = Vec::new();
        let mut err = Vec::new();

        start(app, 4000, &mut out, &mut err).await.unwrap();

        let configs = seen.lock().unwrap();
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].port, 4000);
        assert_eq!(configs[0].host.to_string(), "0.0.0.0");
    }

    proptest! {
        #[test]
        fn success_message_is_deterministic(port: u16) {
            let first = success_message(port);
            prop_assert_eq!(&first, &success_message(port));
            prop_assert!(first.contains(&port.to_string()));
            prop_assert!(first.starts_with("HTTP Server Running on port"));
        }
    }
}
