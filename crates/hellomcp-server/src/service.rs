//! Supervised lifecycle.
//!
//! [`McpService`] adapts a [`Server`] plus its transport to the [`Service`]
//! contract: `run` blocks until cancelled, `shutdown` drains. A
//! [`ServiceGroup`] runs services, turns termination signals into
//! cancellation, and shuts services down in reverse order.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use hellomcp_server::{McpService, Server, ServerConfig, ServiceGroup, Signal};
//!
//! # async fn run() -> Result<(), hellomcp_server::ServiceError> {
//! let server = Arc::new(Server::new(ServerConfig::default()));
//! ServiceGroup::new()
//!     .with_service(McpService::stdio(server))
//!     .with_graceful_shutdown_signals([Signal::Terminate, Signal::Interrupt])
//!     .run()
//!     .await
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use parking_lot::Mutex;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::error::ServerError;
use crate::server::Server;
use crate::transport::{StdioTransport, Transport};

/// Errors from supervised services
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The wrapped server failed
    #[error(transparent)]
    Server(#[from] ServerError),

    /// `run` returned without being cancelled
    #[error("service '{0}' exited unexpectedly")]
    UnexpectedExit(String),

    /// `run` was invoked a second time
    #[error("service '{0}' has already been run")]
    AlreadyRun(String),

    /// A signal handler could not be installed
    #[error("failed to install signal handler: {0}")]
    Signal(#[source] std::io::Error),

    /// A service task panicked
    #[error("service task failed: {0}")]
    Task(String),
}

/// A long-running unit under supervision.
#[async_trait]
pub trait Service: Send + Sync + 'static {
    /// Name used in logs and errors.
    fn name(&self) -> &str;

    /// Run until `cancel` fires. Returning `Ok` without cancellation is an
    /// error from the supervisor's point of view.
    async fn run(&self, cancel: CancellationToken) -> Result<(), ServiceError>;

    /// Stop gracefully. Safe to call more than once.
    async fn shutdown(&self) -> Result<(), ServiceError>;
}

/// Adapts a [`Server`] and its transport to the [`Service`] contract.
pub struct McpService<T> {
    name: String,
    server: Arc<Server>,
    transport: Mutex<Option<T>>,
}

impl McpService<StdioTransport> {
    /// Serve over stdin/stdout, using the server's configured message limit.
    #[must_use]
    pub fn stdio(server: Arc<Server>) -> Self {
        let limit = server.config().max_message_size;
        Self::new(server, StdioTransport::stdio().with_max_message_size(limit))
    }
}

impl<T: Transport> McpService<T> {
    /// Wrap `server`; `transport` is handed to it on `run`.
    #[must_use]
    pub fn new(server: Arc<Server>, transport: T) -> Self {
        Self {
            name: server.info().name.clone(),
            server,
            transport: Mutex::new(Some(transport)),
        }
    }

    /// The wrapped server.
    pub fn server(&self) -> &Arc<Server> {
        &self.server
    }
}

#[async_trait]
impl<T: Transport> Service for McpService<T> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, cancel: CancellationToken) -> Result<(), ServiceError> {
        let transport = self
            .transport
            .lock()
            .take()
            .ok_or_else(|| ServiceError::AlreadyRun(self.name.clone()))?;
        if cancel.is_cancelled() {
            debug!(service = %self.name, "Cancelled before start");
            return Ok(());
        }
        match self.server.start(transport).await {
            Ok(()) => {}
            // The group shut the server down before it got to start.
            Err(ServerError::Stopped) if cancel.is_cancelled() => return Ok(()),
            Err(e) => return Err(e.into()),
        }

        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!(service = %self.name, "Run cancelled");
                Ok(())
            }
            () = self.server.finished() => {
                // Serve loop exited on its own or through a direct stop().
                let stopped_deliberately = self.server.is_stopping();
                self.server.stop().await?;
                if stopped_deliberately || cancel.is_cancelled() {
                    Ok(())
                } else {
                    Err(ServiceError::UnexpectedExit(self.name.clone()))
                }
            }
        }
    }

    async fn shutdown(&self) -> Result<(), ServiceError> {
        self.server.stop().await.map_err(Into::into)
    }
}

impl<T> fmt::Debug for McpService<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("McpService")
            .field("name", &self.name)
            .field("server", &self.server)
            .finish_non_exhaustive()
    }
}

/// Process signals that trigger graceful shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// SIGTERM
    Terminate,
    /// SIGINT / Ctrl+C
    Interrupt,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Terminate => f.write_str("SIGTERM"),
            Self::Interrupt => f.write_str("SIGINT"),
        }
    }
}

/// Runs services and shuts them down together.
pub struct ServiceGroup {
    services: Vec<Arc<dyn Service>>,
    signals: Vec<Signal>,
    cancel: CancellationToken,
}

impl Default for ServiceGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceGroup {
    /// Create an empty group.
    #[must_use]
    pub fn new() -> Self {
        Self {
            services: Vec::new(),
            signals: Vec::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// Add a service. Services shut down in reverse order of addition.
    #[must_use]
    pub fn with_service(mut self, service: impl Service) -> Self {
        self.services.push(Arc::new(service));
        self
    }

    /// Signals that begin graceful shutdown.
    #[must_use]
    pub fn with_graceful_shutdown_signals(mut self, signals: impl IntoIterator<Item = Signal>) -> Self {
        for signal in signals {
            if !self.signals.contains(&signal) {
                self.signals.push(signal);
            }
        }
        self
    }

    /// Token that triggers graceful shutdown when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run every service until a signal arrives, the token is cancelled, or
    /// a service exits on its own. Then shut all services down.
    ///
    /// # Errors
    ///
    /// Returns the first error from installing signal handlers, running, or
    /// shutting down a service.
    pub async fn run(self) -> Result<(), ServiceError> {
        let Self {
            services,
            signals,
            cancel,
        } = self;

        let mut listeners = JoinSet::new();
        for signal in signals {
            let waiter = install(signal).map_err(ServiceError::Signal)?;
            let cancel = cancel.clone();
            listeners.spawn(async move {
                match waiter.await {
                    Ok(()) => {
                        info!(%signal, "Received signal, shutting down");
                        cancel.cancel();
                    }
                    Err(e) => error!(%signal, error = %e, "Signal listener failed"),
                }
            });
        }

        let mut running = JoinSet::new();
        for service in &services {
            let service = Arc::clone(service);
            let cancel = cancel.clone();
            running.spawn(async move {
                let name = service.name().to_string();
                (name, service.run(cancel).await)
            });
        }

        let mut first_error: Option<ServiceError> = None;
        tokio::select! {
            () = cancel.cancelled() => {}
            Some(joined) = running.join_next() => {
                let error = match joined {
                    Ok((_, Err(e))) => Some(e),
                    Ok((name, Ok(()))) if !cancel.is_cancelled() => {
                        Some(ServiceError::UnexpectedExit(name))
                    }
                    Ok(_) => None,
                    Err(e) => Some(ServiceError::Task(e.to_string())),
                };
                if let Some(e) = error {
                    error!(error = %e, "Service failed, shutting down the group");
                    first_error = Some(e);
                }
            }
        }
        cancel.cancel();

        for service in services.iter().rev() {
            debug!(service = service.name(), "Shutting down service");
            if let Err(e) = service.shutdown().await {
                error!(service = service.name(), error = %e, "Service shutdown failed");
                first_error.get_or_insert(e);
            }
        }

        while let Some(joined) = running.join_next().await {
            match joined {
                Ok((_, Err(e))) => {
                    first_error.get_or_insert(e);
                }
                Ok((_, Ok(()))) => {}
                Err(e) => {
                    first_error.get_or_insert(ServiceError::Task(e.to_string()));
                }
            }
        }
        listeners.abort_all();

        match first_error {
            Some(e) => Err(e),
            None => {
                info!("All services stopped");
                Ok(())
            }
        }
    }
}

impl fmt::Debug for ServiceGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.services.iter().map(|s| s.name()).collect();
        f.debug_struct("ServiceGroup")
            .field("services", &names)
            .field("signals", &self.signals)
            .finish_non_exhaustive()
    }
}

type SignalWaiter = BoxFuture<'static, std::io::Result<()>>;

// Registration happens here so that failures surface before any service runs.
fn install(signal: Signal) -> std::io::Result<SignalWaiter> {
    match signal {
        Signal::Interrupt => Ok(tokio::signal::ctrl_c().boxed()),
        Signal::Terminate => terminate(),
    }
}

#[cfg(unix)]
fn terminate() -> std::io::Result<SignalWaiter> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut stream = signal(SignalKind::terminate())?;
    Ok(async move {
        stream.recv().await;
        Ok(())
    }
    .boxed())
}

#[cfg(not(unix))]
fn terminate() -> std::io::Result<SignalWaiter> {
    Ok(std::future::pending().boxed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crate::server::ServerState;
    use crate::transport::LineTransport;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::io::{BufReader, DuplexStream};

    type TestTransport = LineTransport<BufReader<DuplexStream>, DuplexStream>;

    fn service() -> (McpService<TestTransport>, DuplexStream, DuplexStream) {
        let (client_out, server_in) = tokio::io::duplex(1024);
        let (server_out, client_in) = tokio::io::duplex(1024);
        let server = Arc::new(Server::new(ServerConfig::default()));
        let transport = LineTransport::new(BufReader::new(server_in), server_out);
        (McpService::new(server, transport), client_out, client_in)
    }

    #[tokio::test]
    async fn test_run_until_cancelled() {
        let (service, _out, _in) = service();
        let server = Arc::clone(service.server());
        let cancel = CancellationToken::new();

        let canceller = cancel.clone();
        let handle = tokio::spawn(async move {
            tokio::task::yield_now().await;
            canceller.cancel();
        });

        service.run(cancel).await.unwrap();
        handle.await.unwrap();
        service.shutdown().await.unwrap();
        service.shutdown().await.unwrap();
        assert_eq!(server.state().await, ServerState::Stopped);
    }

    #[tokio::test]
    async fn test_peer_close_is_an_error() {
        let (service, out, _in) = service();
        drop(out);
        let err = service.run(CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Server(ref e) if e.is_peer_closed()));
    }

    #[tokio::test]
    async fn test_shutdown_before_run() {
        let (service, _out, _in) = service();
        service.shutdown().await.unwrap();
        // The server is stopped, so a late run cannot start it.
        assert!(service.run(CancellationToken::new()).await.is_err());
    }

    #[tokio::test]
    async fn test_run_twice_rejected() {
        let (service, _out, _in) = service();
        let cancel = CancellationToken::new();
        cancel.cancel();
        service.run(cancel.clone()).await.unwrap();
        assert!(matches!(
            service.run(cancel).await,
            Err(ServiceError::AlreadyRun(_))
        ));
    }

    struct Recorder {
        name: &'static str,
        order: Arc<parking_lot::Mutex<Vec<&'static str>>>,
        shutdowns: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Service for Recorder {
        fn name(&self) -> &str {
            self.name
        }

        async fn run(&self, cancel: CancellationToken) -> Result<(), ServiceError> {
            cancel.cancelled().await;
            Ok(())
        }

        async fn shutdown(&self) -> Result<(), ServiceError> {
            self.order.lock().push(self.name);
            self.shutdowns.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_group_shuts_down_in_reverse_order() {
        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let shutdowns = Arc::new(AtomicUsize::new(0));
        let recorder = |name| Recorder {
            name,
            order: Arc::clone(&order),
            shutdowns: Arc::clone(&shutdowns),
        };

        let group = ServiceGroup::new()
            .with_service(recorder("first"))
            .with_service(recorder("second"));
        let token = group.cancellation_token();
        token.cancel();

        group.run().await.unwrap();
        assert_eq!(*order.lock(), vec!["second", "first"]);
        assert_eq!(shutdowns.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_group_stops_when_a_service_fails() {
        let (service, out, _in) = service();
        let server = Arc::clone(service.server());
        drop(out);

        let err = ServiceGroup::new()
            .with_service(service)
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Server(_)));
        assert_eq!(server.state().await, ServerState::Stopped);
    }

    #[tokio::test]
    async fn test_group_cancelled_before_start_exits_cleanly() {
        let (service, _out, _in) = service();
        let server = Arc::clone(service.server());

        let group = ServiceGroup::new().with_service(service);
        group.cancellation_token().cancel();

        group.run().await.unwrap();
        assert_eq!(server.state().await, ServerState::Stopped);
    }

    #[tokio::test]
    async fn test_run_after_group_shutdown_is_not_an_error_once_cancelled() {
        let (service, _out, _in) = service();
        let cancel = CancellationToken::new();
        service.shutdown().await.unwrap();
        cancel.cancel();
        service.run(cancel).await.unwrap();
    }

    #[test]
    fn test_signals_are_deduplicated() {
        let group = ServiceGroup::new().with_graceful_shutdown_signals([
            Signal::Terminate,
            Signal::Interrupt,
            Signal::Terminate,
        ]);
        let group = group.with_graceful_shutdown_signals([Signal::Interrupt]);
        assert_eq!(group.signals, vec![Signal::Terminate, Signal::Interrupt]);
    }
}
