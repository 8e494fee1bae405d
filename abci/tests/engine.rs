//! End-to-end tests driving the connection engine over an in-memory duplex
//! pipe, the way a real Tendermint consensus engine would drive it over a
//! socket, without needing an actual one.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use abci_proto::{request, response, Request, Response};
use abci_server::application::{Consensus, Info, Mempool, Monolithic, StateSync};
use abci_server::connection;
use abci_server::ext::{App, ExtApp, NoGenesis, TxChecker, TxKeeper, TxResult};
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use prost::Message as _;
use tokio::io::{duplex, AsyncReadExt, AsyncWriteExt};
use tokio::sync::watch;
use tokio_util::codec::Decoder;

fn frame(value: request::Value) -> Bytes {
    let mut buf = Vec::new();
    Request { value: Some(value) }.encode(&mut buf).unwrap();
    abci_server::codec::encode_frame(&buf)
}

/// Reads and decodes exactly `count` responses from `stream`, waiting as
/// long as `timeout` for all of them to arrive.
async fn read_responses<S: tokio::io::AsyncRead + Unpin>(stream: &mut S, count: usize) -> Vec<Response> {
    let mut held = BytesMut::new();
    let mut out = Vec::new();
    let mut codec = abci_server::codec::Codec;
    let mut chunk = vec![0u8; 4096];
    while out.len() < count {
        while let Some(payload) = codec.decode(&mut held).unwrap() {
            out.push(Response::decode(payload).unwrap());
            if out.len() == count {
                return out;
            }
        }
        let n = tokio::time::timeout(Duration::from_secs(2), stream.read(&mut chunk))
            .await
            .expect("timed out waiting for a response")
            .unwrap();
        assert!(n > 0, "peer closed before sending enough responses");
        held.extend_from_slice(&chunk[..n]);
    }
    out
}

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

fn spawn_connection<A>(app: A) -> (tokio::io::DuplexStream, tokio::task::JoinHandle<()>)
where
    A: Info + Mempool + Consensus + StateSync + 'static,
{
    let (client, server) = duplex(16 * 1024);
    let resolver = Arc::new(Monolithic::new(app));
    let (_tx, rx) = watch::channel(false);
    let handle = tokio::spawn(async move {
        let _ = connection::run(server, resolver, rx, "test-peer".to_owned()).await;
    });
    (client, handle)
}

/// S1: an echo answered with nothing else queued returns immediately, and a
/// flush that follows it still comes back as its own response.
#[tokio::test]
async fn echo_and_flush_both_answer_in_request_order() {
    let (mut client, _handle) = spawn_connection(NullApp);

    client.write_all(&frame(request::Value::Echo(abci_proto::RequestEcho {
        message: "ping".to_owned(),
    }))).await.unwrap();
    client.write_all(&frame(request::Value::Flush(abci_proto::RequestFlush {}))).await.unwrap();

    let responses = read_responses(&mut client, 2).await;
    assert_eq!(
        responses[0].value,
        Some(response::Value::Echo(abci_proto::ResponseEcho { message: "ping".to_owned() }))
    );
    assert_eq!(responses[1].value, Some(response::Value::Flush(abci_proto::ResponseFlush {})));
}

/// S2 / S4: an Info connection runs queries concurrently but still drains
/// responses in the order they were sent, even when the first query is the
/// slowest to complete.
#[tokio::test]
async fn info_connection_preserves_response_order_under_varying_latency() {
    struct SlowFirstInfo;
    #[async_trait]
    impl Info for SlowFirstInfo {
        async fn info(&self, _req: abci_proto::RequestInfo) -> abci_proto::ResponseInfo {
            Default::default()
        }
        async fn set_option(&self, _req: abci_proto::RequestSetOption) -> abci_proto::ResponseSetOption {
            Default::default()
        }
        async fn query(&self, req: abci_proto::RequestQuery) -> abci_proto::ResponseQuery {
            let delay_ms = u64::from(req.height.unsigned_abs() as u32);
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            abci_proto::ResponseQuery { path: req.path, ..Default::default() }
        }
    }
    #[async_trait]
    impl Mempool for SlowFirstInfo {
        async fn check_tx(&self, _req: abci_proto::RequestCheckTx) -> abci_proto::ResponseCheckTx {
            Default::default()
        }
    }
    #[async_trait]
    impl Consensus for SlowFirstInfo {
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
    impl StateSync for SlowFirstInfo {
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

    let (mut client, _handle) = spawn_connection(SlowFirstInfo);

    for (path, delay_ms) in [("slowest", 40i64), ("middle", 15), ("fastest", 0)] {
        client
            .write_all(&frame(request::Value::Query(abci_proto::RequestQuery {
                path: path.to_owned(),
                height: delay_ms,
                ..Default::default()
            })))
            .await
            .unwrap();
    }

    let responses = read_responses(&mut client, 3).await;
    let paths: Vec<String> = responses
        .into_iter()
        .map(|r| match r.value {
            Some(response::Value::Query(q)) => q.path,
            _ => panic!("expected a query response"),
        })
        .collect();
    assert_eq!(paths, vec!["slowest", "middle", "fastest"]);
}

/// S3: a Consensus connection never runs two handler calls concurrently,
/// regardless of how quickly requests are pipelined in.
#[tokio::test]
async fn consensus_connection_serializes_handler_invocations() {
    struct SerialCheckConsensus {
        busy: Arc<AtomicBool>,
        violations: Arc<AtomicUsize>,
    }
    #[async_trait]
    impl Consensus for SerialCheckConsensus {
        async fn init_chain(&self, _req: abci_proto::RequestInitChain) -> abci_proto::ResponseInitChain {
            Default::default()
        }
        async fn begin_block(&self, _req: abci_proto::RequestBeginBlock) -> abci_proto::ResponseBeginBlock {
            Default::default()
        }
        async fn deliver_tx(&self, _req: abci_proto::RequestDeliverTx) -> abci_proto::ResponseDeliverTx {
            if self.busy.swap(true, Ordering::SeqCst) {
                self.violations.fetch_add(1, Ordering::SeqCst);
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.busy.store(false, Ordering::SeqCst);
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
    impl Info for SerialCheckConsensus {
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
    impl Mempool for SerialCheckConsensus {
        async fn check_tx(&self, _req: abci_proto::RequestCheckTx) -> abci_proto::ResponseCheckTx {
            Default::default()
        }
    }
    #[async_trait]
    impl StateSync for SerialCheckConsensus {
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

    let violations = Arc::new(AtomicUsize::new(0));
    let app = SerialCheckConsensus { busy: Arc::new(AtomicBool::new(false)), violations: violations.clone() };
    let (mut client, _handle) = spawn_connection(app);

    for i in 0..5u32 {
        client
            .write_all(&frame(request::Value::DeliverTx(abci_proto::RequestDeliverTx {
                tx: i.to_be_bytes().to_vec(),
            })))
            .await
            .unwrap();
    }

    let _ = read_responses(&mut client, 5).await;
    assert_eq!(violations.load(Ordering::SeqCst), 0);
}

/// S5: a connection's kind is fixed by its first non-echo/non-flush
/// request, and stays fixed even though echo/flush precede it.
#[tokio::test]
async fn connection_classifies_on_first_classifying_request() {
    let (mut client, _handle) = spawn_connection(NullApp);

    client.write_all(&frame(request::Value::Echo(abci_proto::RequestEcho {
        message: "warmup".to_owned(),
    }))).await.unwrap();
    client
        .write_all(&frame(request::Value::CheckTx(abci_proto::RequestCheckTx {
            tx: b"tx".to_vec(),
            r#type: 0,
        })))
        .await
        .unwrap();

    let responses = read_responses(&mut client, 2).await;
    assert!(matches!(responses[0].value, Some(response::Value::Echo(_))));
    assert!(matches!(responses[1].value, Some(response::Value::CheckTx(_))));
}

/// S6: delivering the same transaction bytes twice within one block is
/// rejected by the block-hash accumulator, end to end over the wire.
#[tokio::test]
async fn duplicate_transaction_within_a_block_is_rejected_over_the_wire() {
    struct AcceptAll;
    #[async_trait]
    impl TxChecker for AcceptAll {
        async fn check_tx(&self, _req: abci_proto::RequestCheckTx) -> abci_proto::ResponseCheckTx {
            Default::default()
        }
    }
    #[async_trait]
    impl TxKeeper for AcceptAll {
        async fn execute_tx(&self, tx: &[u8]) -> TxResult {
            TxResult::ok(tx.to_vec())
        }
    }

    let ext_app = ExtApp::new(App::new("dup-test", NoGenesis), AcceptAll, AcceptAll);
    let (client, server) = duplex(16 * 1024);
    let resolver: Arc<dyn abci_server::application::Resolver> = Arc::new(ext_app);
    let (_tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        let _ = connection::run(server, resolver, rx, "dup-peer".to_owned()).await;
    });

    let mut client = client;
    client
        .write_all(&frame(request::Value::BeginBlock(abci_proto::RequestBeginBlock::default())))
        .await
        .unwrap();
    client
        .write_all(&frame(request::Value::DeliverTx(abci_proto::RequestDeliverTx { tx: b"same".to_vec() })))
        .await
        .unwrap();
    client
        .write_all(&frame(request::Value::DeliverTx(abci_proto::RequestDeliverTx { tx: b"same".to_vec() })))
        .await
        .unwrap();

    let responses = read_responses(&mut client, 3).await;
    let first = match &responses[1].value {
        Some(response::Value::DeliverTx(r)) => r.code,
        _ => panic!("expected a deliver_tx response"),
    };
    let second = match &responses[2].value {
        Some(response::Value::DeliverTx(r)) => r.code,
        _ => panic!("expected a deliver_tx response"),
    };
    assert_eq!(first, 0);
    assert_ne!(second, 0);
}
