//! The extended application collaborator pattern.
//!
//! Rather than one object implementing all four capability sets (see
//! [`crate::application::Monolithic`]), a real application is usually split
//! into three collaborators with distinct responsibilities, matching
//! `original_source/abci/ext/common.py`, `ext/txchecker.py` and
//! `ext/txkeeper.py`:
//!
//! - [`App`] owns shared state (`block_height`, `app_hash`) and options, and
//!   answers the Info kind directly.
//! - [`TxChecker`] answers Mempool's `check_tx` with read-only access to
//!   that state — it must never mutate it.
//! - [`TxKeeper`] supplies per-transaction execution policy; [`TxKeeperDriver`]
//!   wraps it with the generic per-block bookkeeping
//!   (`init_chain`/`begin_block`/`deliver_tx`*/`end_block`/`commit`) every
//!   such application needs, using a [`crate::accumulator::BlockHasher`] to
//!   compute the block's `app_hash`, grounded on `original_source/tend/abci/extend.py`.
//!
//! [`ExtApp`] composes the three collaborators into a single [`Resolver`].

use std::sync::Arc;

use abci_proto::{
    response_apply_snapshot_chunk, response_offer_snapshot, RequestApplySnapshotChunk,
    RequestBeginBlock, RequestCheckTx, RequestCommit, RequestDeliverTx, RequestEndBlock,
    RequestInfo, RequestInitChain, RequestListSnapshots, RequestLoadSnapshotChunk,
    RequestOfferSnapshot, RequestQuery, RequestSetOption, ResponseApplySnapshotChunk,
    ResponseBeginBlock, ResponseCheckTx, ResponseCommit, ResponseDeliverTx, ResponseEndBlock,
    ResponseInfo, ResponseInitChain, ResponseListSnapshots, ResponseLoadSnapshotChunk,
    ResponseOfferSnapshot, ResponseQuery, ResponseSetOption,
};
use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::error;

use crate::accumulator::BlockHasher;
use crate::application::{Consensus, Info, Mempool, Resolver, StateSync};
use crate::error::Error;

/// The part of an application's state that must roll forward monotonically
/// one block at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    pub block_height: u64,
    pub app_hash: Vec<u8>,
}

/// Loads an application's initial state from `init_chain`'s
/// `app_state_bytes`. Applications with no genesis format of their own can
/// rely on the default, which fails loudly rather than silently starting
/// from an empty state whenever the caller actually supplied genesis bytes.
#[async_trait]
pub trait Genesis: Send + Sync {
    async fn load_genesis(&self, app_state_bytes: &[u8]) -> Result<AppState, Error> {
        let _ = app_state_bytes;
        Err(Error::GenesisFailure)
    }
}

/// A `Genesis` implementation for applications that never expect
/// `app_state_bytes` to be set at all.
pub struct NoGenesis;

#[async_trait]
impl Genesis for NoGenesis {}

/// Shared application state, options, and the Info handler over them.
pub struct App<G> {
    name: String,
    state: RwLock<Option<AppState>>,
    options: RwLock<std::collections::HashMap<String, String>>,
    genesis: G,
}

impl<G: Genesis> App<G> {
    pub fn new(name: impl Into<String>, genesis: G) -> Self {
        App {
            name: name.into(),
            state: RwLock::new(None),
            options: RwLock::new(std::collections::HashMap::new()),
            genesis,
        }
    }

    pub async fn app_state(&self) -> Option<AppState> {
        self.state.read().await.clone()
    }

    /// Advances state to `next`. Accepted if `next` moves the block height
    /// forward (monotonic), or restates the current height with an
    /// identical `app_hash` (idempotent recommit); any other relationship —
    /// a height that goes backward or jumps to the same height with a
    /// different hash — is a `StateConflict`. The very first call (no prior
    /// state) is always accepted, seeding the accumulator.
    pub async fn update_app_state(&self, next: AppState) -> Result<(), Error> {
        let mut guard = self.state.write().await;
        if let Some(current) = guard.as_ref() {
            let monotonic = next.block_height > current.block_height;
            let idempotent =
                next.block_height == current.block_height && next.app_hash == current.app_hash;
            if !monotonic && !idempotent {
                return Err(Error::StateConflict { height: next.block_height });
            }
        }
        *guard = Some(next);
        Ok(())
    }
}

#[async_trait]
impl<G: Genesis + 'static> Info for App<G> {
    async fn info(&self, _req: RequestInfo) -> ResponseInfo {
        match self.state.read().await.as_ref() {
            Some(state) => ResponseInfo {
                last_block_height: state.block_height as i64,
                last_block_app_hash: state.app_hash.clone(),
                ..Default::default()
            },
            None => ResponseInfo::default(),
        }
    }

    async fn set_option(&self, req: RequestSetOption) -> ResponseSetOption {
        self.options.write().await.insert(req.key, req.value);
        ResponseSetOption::default()
    }

    async fn query(&self, _req: RequestQuery) -> ResponseQuery {
        ResponseQuery::default()
    }
}

/// Applications that never support state sync can resolve `App` directly
/// for the StateSync kind too: every method reports "nothing available".
#[async_trait]
impl<G: Genesis + 'static> StateSync for App<G> {
    async fn list_snapshots(&self, _req: RequestListSnapshots) -> ResponseListSnapshots {
        ResponseListSnapshots::default()
    }

    async fn offer_snapshot(&self, _req: RequestOfferSnapshot) -> ResponseOfferSnapshot {
        ResponseOfferSnapshot {
            result: response_offer_snapshot::Result::Reject as i32,
        }
    }

    async fn load_snapshot_chunk(&self, _req: RequestLoadSnapshotChunk) -> ResponseLoadSnapshotChunk {
        ResponseLoadSnapshotChunk::default()
    }

    async fn apply_snapshot_chunk(&self, _req: RequestApplySnapshotChunk) -> ResponseApplySnapshotChunk {
        ResponseApplySnapshotChunk {
            result: response_apply_snapshot_chunk::Result::Abort as i32,
            ..Default::default()
        }
    }
}

/// Answers Mempool's `check_tx` with read-only access to an `App`'s state.
/// Implementations must not mutate anything the associated `TxKeeper` also
/// touches: `check_tx` runs concurrently with, and ahead of, block
/// execution, so any shared mutable state it touched would race.
#[async_trait]
pub trait TxChecker: Send + Sync {
    async fn check_tx(&self, req: RequestCheckTx) -> ResponseCheckTx;
}

struct CheckerAdapter<C> {
    checker: Arc<C>,
}

#[async_trait]
impl<C: TxChecker + 'static> Mempool for CheckerAdapter<C> {
    async fn check_tx(&self, req: RequestCheckTx) -> ResponseCheckTx {
        self.checker.check_tx(req).await
    }
}

/// The outcome of executing one transaction within a block.
#[derive(Debug, Clone, Default)]
pub struct TxResult {
    pub code: u32,
    pub data: Vec<u8>,
    pub log: String,
}

impl TxResult {
    pub fn ok(data: Vec<u8>) -> Self {
        TxResult { code: 0, data, log: String::new() }
    }

    pub fn reject(code: u32, log: impl Into<String>) -> Self {
        TxResult { code, data: Vec::new(), log: log.into() }
    }
}

/// Supplies an application's transaction-execution policy. The accumulator
/// bookkeeping that turns a sequence of these results into `app_hash` is
/// provided generically by [`TxKeeperDriver`]; this trait only decides
/// whether one transaction is valid and what it does.
#[async_trait]
pub trait TxKeeper: Send + Sync {
    async fn execute_tx(&self, tx: &[u8]) -> TxResult;
}

/// Drives the Consensus kind for a [`TxKeeper`]: owns the current block's
/// [`BlockHasher`] and the surrounding `App` state, so the embedding
/// application only has to implement `execute_tx`.
pub struct TxKeeperDriver<G: Genesis, K> {
    app: Arc<App<G>>,
    keeper: K,
    block: Mutex<BlockHasher>,
}

impl<G: Genesis, K: TxKeeper> TxKeeperDriver<G, K> {
    pub fn new(app: Arc<App<G>>, keeper: K) -> Self {
        TxKeeperDriver {
            app,
            keeper,
            block: Mutex::new(BlockHasher::new()),
        }
    }
}

#[async_trait]
impl<G, K> Consensus for TxKeeperDriver<G, K>
where
    G: Genesis + 'static,
    K: TxKeeper + 'static,
{
    async fn init_chain(&self, req: RequestInitChain) -> ResponseInitChain {
        if !req.app_state_bytes.is_empty() {
            match self.app.genesis.load_genesis(&req.app_state_bytes).await {
                Ok(state) => {
                    if let Err(e) = self.app.update_app_state(state).await {
                        error!(error = %e, name = %self.app.name, "genesis state rejected");
                    }
                }
                Err(e) => error!(error = %e, name = %self.app.name, "genesis load failed"),
            }
        }
        ResponseInitChain::default()
    }

    async fn begin_block(&self, _req: RequestBeginBlock) -> ResponseBeginBlock {
        *self.block.lock().await = BlockHasher::new();
        ResponseBeginBlock::default()
    }

    async fn deliver_tx(&self, req: RequestDeliverTx) -> ResponseDeliverTx {
        let result = self.keeper.execute_tx(&req.tx).await;
        if result.code != 0 {
            return ResponseDeliverTx {
                code: result.code,
                data: result.data,
                log: result.log,
                ..Default::default()
            };
        }
        let mut block = self.block.lock().await;
        match block.write_tx(&req.tx) {
            Ok(_) => ResponseDeliverTx {
                code: 0,
                data: result.data,
                log: result.log,
                ..Default::default()
            },
            Err(e) => ResponseDeliverTx {
                code: 1,
                log: e.to_string(),
                ..Default::default()
            },
        }
    }

    async fn end_block(&self, _req: RequestEndBlock) -> ResponseEndBlock {
        ResponseEndBlock::default()
    }

    async fn commit(&self, _req: RequestCommit) -> ResponseCommit {
        let previous = self.app.app_state().await;
        let previous_hash = previous.as_ref().map(|s| s.app_hash.clone());
        let next_height = previous.as_ref().map(|s| s.block_height).unwrap_or(0) + 1;
        let app_hash = self.block.lock().await.sum(previous_hash.as_deref()).to_vec();

        if let Err(e) = self
            .app
            .update_app_state(AppState { block_height: next_height, app_hash: app_hash.clone() })
            .await
        {
            error!(error = %e, name = %self.app.name, "state conflict at commit");
        }

        ResponseCommit { data: app_hash, retain_height: 0 }
    }
}

/// Composes an `App`, a `TxChecker` and a `TxKeeper` into a single
/// `Resolver`: Info and StateSync route to the shared `App`, Mempool to
/// the checker, Consensus to a `TxKeeperDriver` wrapping the keeper.
pub struct ExtApp<G: Genesis, C, K: TxKeeper> {
    app: Arc<App<G>>,
    checker: Arc<C>,
    keeper_driver: Arc<TxKeeperDriver<G, K>>,
}

impl<G, C, K> ExtApp<G, C, K>
where
    G: Genesis + 'static,
    C: TxChecker + 'static,
    K: TxKeeper + 'static,
{
    pub fn new(app: App<G>, checker: C, keeper: K) -> Self {
        let app = Arc::new(app);
        let keeper_driver = Arc::new(TxKeeperDriver::new(app.clone(), keeper));
        ExtApp { app, checker: Arc::new(checker), keeper_driver }
    }
}

#[async_trait]
impl<G, C, K> Resolver for ExtApp<G, C, K>
where
    G: Genesis + 'static,
    C: TxChecker + 'static,
    K: TxKeeper + 'static,
{
    async fn info_handler(&self) -> Arc<dyn Info> {
        self.app.clone() as Arc<dyn Info>
    }

    async fn mempool_handler(&self) -> Arc<dyn Mempool> {
        Arc::new(CheckerAdapter { checker: self.checker.clone() }) as Arc<dyn Mempool>
    }

    async fn consensus_handler(&self) -> Arc<dyn Consensus> {
        self.keeper_driver.clone() as Arc<dyn Consensus>
    }

    async fn state_sync_handler(&self) -> Arc<dyn StateSync> {
        self.app.clone() as Arc<dyn StateSync>
    }
}
