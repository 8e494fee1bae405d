//! ABCI application handler capability abstraction.
//!
//! The fourteen ABCI methods are partitioned into four disjoint capability
//! sets — `Info`, `Mempool`, `Consensus`, `StateSync` — one per connection
//! [`Kind`]. `echo` and `flush` are not part of any capability set: the
//! connection engine answers both itself (see [`crate::connection`]).
//!
//! The reference resolves handler methods by name-string lookup at call
//! time (`getattr(self.handler, name, None)`); here the equivalent is a
//! `match` on the request's oneof tag dispatching into one of four trait
//! objects, one per kind, which is the type-safe form the core spec's
//! design notes recommend over runtime reflection.

use std::sync::Arc;

use abci_proto::{
    RequestApplySnapshotChunk, RequestBeginBlock, RequestCheckTx, RequestCommit,
    RequestDeliverTx, RequestEndBlock, RequestInfo, RequestInitChain, RequestListSnapshots,
    RequestLoadSnapshotChunk, RequestOfferSnapshot, RequestQuery, RequestSetOption,
    ResponseApplySnapshotChunk, ResponseBeginBlock, ResponseCheckTx, ResponseCommit,
    ResponseDeliverTx, ResponseEndBlock, ResponseInfo, ResponseInitChain, ResponseListSnapshots,
    ResponseLoadSnapshotChunk, ResponseOfferSnapshot, ResponseQuery, ResponseSetOption,
};
use async_trait::async_trait;

/// The four ABCI connection kinds. A connection is classified exactly once,
/// on its first non-`echo`/non-`flush` request, and keeps that kind for its
/// lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Info,
    Mempool,
    Consensus,
    StateSync,
}

impl Kind {
    /// Classifies a request by method name. Returns `None` for `echo` and
    /// `flush`, which the engine handles without ever consulting the
    /// application, and are therefore never classifying.
    pub fn classify(name: &str) -> Option<Kind> {
        match name {
            "info" | "set_option" | "query" => Some(Kind::Info),
            "check_tx" => Some(Kind::Mempool),
            "init_chain" | "begin_block" | "deliver_tx" | "end_block" | "commit" => {
                Some(Kind::Consensus)
            }
            "list_snapshots" | "offer_snapshot" | "load_snapshot_chunk" | "apply_snapshot_chunk" => {
                Some(Kind::StateSync)
            }
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Kind::Info => "info",
            Kind::Mempool => "mempool",
            Kind::Consensus => "consensus",
            Kind::StateSync => "state-sync",
        }
    }
}

/// Handlers of the Info connection: `info`, `set_option`, `query`.
#[async_trait]
pub trait Info: Send + Sync {
    async fn info(&self, req: RequestInfo) -> ResponseInfo;
    async fn set_option(&self, req: RequestSetOption) -> ResponseSetOption;
    async fn query(&self, req: RequestQuery) -> ResponseQuery;
}

/// Handlers of the Mempool connection: `check_tx`.
#[async_trait]
pub trait Mempool: Send + Sync {
    async fn check_tx(&self, req: RequestCheckTx) -> ResponseCheckTx;
}

/// Handlers of the Consensus connection: `init_chain`, `begin_block`,
/// `deliver_tx`, `end_block`, `commit`. Invocations on this kind are
/// strictly serialized by the request-ordered task processor — see
/// [`crate::dispatch`].
#[async_trait]
pub trait Consensus: Send + Sync {
    async fn init_chain(&self, req: RequestInitChain) -> ResponseInitChain;
    async fn begin_block(&self, req: RequestBeginBlock) -> ResponseBeginBlock;
    async fn deliver_tx(&self, req: RequestDeliverTx) -> ResponseDeliverTx;
    async fn end_block(&self, req: RequestEndBlock) -> ResponseEndBlock;
    async fn commit(&self, req: RequestCommit) -> ResponseCommit;
}

/// Handlers of the StateSync connection: `list_snapshots`, `offer_snapshot`,
/// `load_snapshot_chunk`, `apply_snapshot_chunk`.
#[async_trait]
pub trait StateSync: Send + Sync {
    async fn list_snapshots(&self, req: RequestListSnapshots) -> ResponseListSnapshots;
    async fn offer_snapshot(&self, req: RequestOfferSnapshot) -> ResponseOfferSnapshot;
    async fn load_snapshot_chunk(&self, req: RequestLoadSnapshotChunk) -> ResponseLoadSnapshotChunk;
    async fn apply_snapshot_chunk(
        &self,
        req: RequestApplySnapshotChunk,
    ) -> ResponseApplySnapshotChunk;
}

/// Resolves a [`Kind`] to the handler instance that should serve it.
///
/// Resolution is async and may perform one-time initialization on first
/// call (e.g. seeding initial application state); the connection engine
/// calls the relevant method at most once per connection and caches the
/// result for the lifetime of the connection.
#[async_trait]
pub trait Resolver: Send + Sync {
    async fn info_handler(&self) -> Arc<dyn Info>;
    async fn mempool_handler(&self) -> Arc<dyn Mempool>;
    async fn consensus_handler(&self) -> Arc<dyn Consensus>;
    async fn state_sync_handler(&self) -> Arc<dyn StateSync>;
}

/// A monolithic application: one object implementing every capability set,
/// resolved to itself regardless of connection kind. This is the simpler of
/// the two shapes the core spec names in §4.2; see [`crate::ext`] for the
/// "extended" shape that routes Mempool/Consensus to separate collaborators.
pub struct Monolithic<A> {
    app: Arc<A>,
}

impl<A> Monolithic<A> {
    pub fn new(app: A) -> Self {
        Monolithic { app: Arc::new(app) }
    }
}

impl<A> Clone for Monolithic<A> {
    fn clone(&self) -> Self {
        Monolithic {
            app: self.app.clone(),
        }
    }
}

#[async_trait]
impl<A> Resolver for Monolithic<A>
where
    A: Info + Mempool + Consensus + StateSync + 'static,
{
    async fn info_handler(&self) -> Arc<dyn Info> {
        self.app.clone() as Arc<dyn Info>
    }

    async fn mempool_handler(&self) -> Arc<dyn Mempool> {
        self.app.clone() as Arc<dyn Mempool>
    }

    async fn consensus_handler(&self) -> Arc<dyn Consensus> {
        self.app.clone() as Arc<dyn Consensus>
    }

    async fn state_sync_handler(&self) -> Arc<dyn StateSync> {
        self.app.clone() as Arc<dyn StateSync>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_every_method_name_from_the_data_model_table() {
        assert_eq!(Kind::classify("info"), Some(Kind::Info));
        assert_eq!(Kind::classify("set_option"), Some(Kind::Info));
        assert_eq!(Kind::classify("query"), Some(Kind::Info));
        assert_eq!(Kind::classify("check_tx"), Some(Kind::Mempool));
        assert_eq!(Kind::classify("init_chain"), Some(Kind::Consensus));
        assert_eq!(Kind::classify("begin_block"), Some(Kind::Consensus));
        assert_eq!(Kind::classify("deliver_tx"), Some(Kind::Consensus));
        assert_eq!(Kind::classify("end_block"), Some(Kind::Consensus));
        assert_eq!(Kind::classify("commit"), Some(Kind::Consensus));
        assert_eq!(Kind::classify("list_snapshots"), Some(Kind::StateSync));
        assert_eq!(Kind::classify("offer_snapshot"), Some(Kind::StateSync));
        assert_eq!(Kind::classify("load_snapshot_chunk"), Some(Kind::StateSync));
        assert_eq!(Kind::classify("apply_snapshot_chunk"), Some(Kind::StateSync));
        assert_eq!(Kind::classify("echo"), None);
        assert_eq!(Kind::classify("flush"), None);
        assert_eq!(Kind::classify("bogus"), None);
    }
}
