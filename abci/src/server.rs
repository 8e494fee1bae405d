//! The ABCI server: binds a listener, accepts connections, and coordinates
//! graceful shutdown across however many connections happen to be open.
//!
//! Grounded on `tower-abci`'s `Server::listen` accept loop (`other_examples`)
//! generalized with the close-timeout/self-stop lifecycle `spec.md` §6
//! describes, and on the signal-handling shape used throughout
//! `tendermint-rs`'s own binaries.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{watch, Notify};
use tracing::{error, info, warn};

use crate::application::Resolver;
use crate::connection;
use crate::error::Error;

/// Server-lifecycle knobs. Everything an embedding application configures
/// about *how* the engine runs, as opposed to *what* it does (that's the
/// [`Resolver`]/handler traits).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// How long `stop` waits for in-flight connections to drain before
    /// returning regardless.
    pub close_timeout: Duration,
    /// If set, the server stops itself once its connection count drops
    /// back to zero after having been nonzero. Off by default: a
    /// long-lived daemon should keep listening for the next connection,
    /// not treat a quiet moment as "done".
    pub stop_on_last_disconnect: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".to_owned(),
            port: 26658,
            close_timeout: Duration::from_secs(300),
            stop_on_last_disconnect: false,
        }
    }
}

/// The ABCI socket server. One `Server` owns one listening socket and the
/// connections accepted from it; `listen` runs until `stop` is called (or a
/// SIGINT/SIGTERM arrives, on Unix) and every connection has had a chance
/// to drain.
pub struct Server {
    resolver: Arc<dyn Resolver>,
    config: ServerConfig,
    started: AtomicBool,
    cancel_tx: watch::Sender<bool>,
    cancel_rx: watch::Receiver<bool>,
    active_connections: Arc<AtomicUsize>,
    idle: Arc<Notify>,
}

impl Server {
    pub fn new(resolver: Arc<dyn Resolver>, config: ServerConfig) -> Self {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        Server {
            resolver,
            config,
            started: AtomicBool::new(false),
            cancel_tx,
            cancel_rx,
            active_connections: Arc::new(AtomicUsize::new(0)),
            idle: Arc::new(Notify::new()),
        }
    }

    /// Requests shutdown. Safe to call more than once, from any task,
    /// including from within a spawned connection's own completion
    /// handler (see `stop_on_last_disconnect`).
    pub fn stop(&self) {
        let _ = self.cancel_tx.send(true);
    }

    /// Binds and serves until stopped. Returns `Error::AlreadyStarted` if
    /// called more than once on the same `Server`.
    pub async fn listen(&self) -> Result<(), Error> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(Error::AlreadyStarted);
        }

        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr).await?;
        info!(%addr, "ABCI server listening");

        #[cfg(unix)]
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;

        let mut cancel_rx = self.cancel_rx.clone();
        loop {
            tokio::select! {
                biased;

                changed = cancel_rx.changed() => {
                    if changed.is_err() || *cancel_rx.borrow() {
                        break;
                    }
                }

                _ = tokio::signal::ctrl_c() => {
                    info!("received SIGINT, shutting down");
                    self.stop();
                }

                #[cfg(unix)]
                _ = sigterm.recv() => {
                    info!("received SIGTERM, shutting down");
                    self.stop();
                }

                accepted = listener.accept() => {
                    match accepted {
                        Ok((socket, peer_addr)) => self.spawn_connection(socket, peer_addr.to_string()),
                        Err(e) => warn!(error = %e, "failed to accept a connection"),
                    }
                }
            }
        }

        self.drain().await;
        Ok(())
    }

    fn spawn_connection(&self, socket: TcpStream, peer: String) {
        self.active_connections.fetch_add(1, Ordering::SeqCst);
        info!(%peer, active = self.active_connections.load(Ordering::SeqCst), "accepted connection");

        let resolver = self.resolver.clone();
        let cancel_rx = self.cancel_rx.clone();
        let active_connections = self.active_connections.clone();
        let idle = self.idle.clone();
        let stop_on_last_disconnect = self.config.stop_on_last_disconnect;
        let cancel_tx = self.cancel_tx.clone();

        tokio::spawn(async move {
            if let Err(e) = connection::run(socket, resolver, cancel_rx, peer.clone()).await {
                error!(%peer, error = %e, "connection ended with an error");
            }
            if active_connections.fetch_sub(1, Ordering::SeqCst) == 1 {
                idle.notify_waiters();
                if stop_on_last_disconnect {
                    let _ = cancel_tx.send(true);
                }
            }
        });
    }

    /// Waits for the active connection count to reach zero, up to
    /// `close_timeout`. A best-effort wait, not a hard guarantee: a
    /// connection finishing in the narrow window between the count check
    /// and the wait being armed is caught by the timeout, not missed
    /// forever.
    async fn drain(&self) {
        if self.active_connections.load(Ordering::SeqCst) == 0 {
            return;
        }
        let active_connections = self.active_connections.clone();
        let idle = self.idle.clone();
        let _ = tokio::time::timeout(self.config.close_timeout, async move {
            loop {
                if active_connections.load(Ordering::SeqCst) == 0 {
                    break;
                }
                idle.notified().await;
            }
        })
        .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{Consensus, Info, Mempool, Monolithic, StateSync};
    use async_trait::async_trait;

    struct NullApp;
    #[async_trait]
    impl Info for NullApp {
        async fn info(&self, _req: abci_proto::RequestInfo) -> abci_proto::ResponseInfo {
            Default::default()
        }
        async fn set_option(&self, _req: abci_proto::RequestSetOption) -> abci_proto::ResponseSetOption {
            Default::default()
        }
        async fn query(&self, _req: abci_proto::RequestQuery) -> abci_proto::ResponseQuery {
            Default::default()
        }
    }
    #[async_trait]
    impl Mempool for NullApp {
        async fn check_tx(&self, _req: abci_proto::RequestCheckTx) -> abci_proto::ResponseCheckTx {
            Default::default()
        }
    }
    #[async_trait]
    impl Consensus for NullApp {
        async fn init_chain(&self, _req: abci_proto::RequestInitChain) -> abci_proto::ResponseInitChain {
            Default::default()
        }
        async fn begin_block(&self, _req: abci_proto::RequestBeginBlock) -> abci_proto::ResponseBeginBlock {
            Default::default()
        }
        async fn deliver_tx(&self, _req: abci_proto::RequestDeliverTx) -> abci_proto::ResponseDeliverTx {
            Default::default()
        }
        async fn end_block(&self, _req: abci_proto::RequestEndBlock) -> abci_proto::ResponseEndBlock {
            Default::default()
        }
        async fn commit(&self, _req: abci_proto::RequestCommit) -> abci_proto::ResponseCommit {
            Default::default()
        }
    }
    #[async_trait]
    impl StateSync for NullApp {
        async fn list_snapshots(&self, _req: abci_proto::RequestListSnapshots) -> abci_proto::ResponseListSnapshots {
            Default::default()
        }
        async fn offer_snapshot(&self, _req: abci_proto::RequestOfferSnapshot) -> abci_proto::ResponseOfferSnapshot {
            Default::default()
        }
        async fn load_snapshot_chunk(
            &self,
            _req: abci_proto::RequestLoadSnapshotChunk,
        ) -> abci_proto::ResponseLoadSnapshotChunk {
            Default::default()
        }
        async fn apply_snapshot_chunk(
            &self,
            _req: abci_proto::RequestApplySnapshotChunk,
        ) -> abci_proto::ResponseApplySnapshotChunk {
            Default::default()
        }
    }

    #[tokio::test]
    async fn calling_listen_twice_is_rejected() {
        let resolver: Arc<dyn Resolver> = Arc::new(Monolithic::new(NullApp));
        let config = ServerConfig { port: 0, ..Default::default() };
        let server = Arc::new(Server::new(resolver, config));

        let server_clone = server.clone();
        let handle = tokio::spawn(async move { server_clone.listen().await });
        tokio::task::yield_now().await;

        let err = server.listen().await.unwrap_err();
        assert!(matches!(err, Error::AlreadyStarted));

        server.stop();
        let _ = handle.await;
    }

    #[tokio::test]
    async fn stop_is_idempotent_and_unblocks_listen() {
        let resolver: Arc<dyn Resolver> = Arc::new(Monolithic::new(NullApp));
        let config = ServerConfig { port: 0, ..Default::default() };
        let server = Arc::new(Server::new(resolver, config));

        let server_clone = server.clone();
        let handle = tokio::spawn(async move { server_clone.listen().await });
        tokio::task::yield_now().await;

        server.stop();
        server.stop();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("listen should return once stopped")
            .unwrap()
            .unwrap();
    }
}
