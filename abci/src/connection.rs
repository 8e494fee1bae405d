//! The per-connection protocol state machine: decode, classify, dispatch to
//! the resolved handler, enqueue, and emit responses in order.
//!
//! One [`run`] call owns exactly one TCP (or, in tests, in-memory duplex)
//! connection end to end. It never talks to any other connection; the
//! [`crate::server`] module is the only thing that knows there may be more
//! than one.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use abci_proto::{request, response, Request, Response};
use bytes::Bytes;
use futures::{FutureExt, SinkExt, StreamExt};
use prost::Message as _;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::watch;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, error, warn};

use crate::application::{Consensus, Info, Kind, Mempool, Resolver, StateSync};
use crate::codec::Codec;
use crate::dispatch::{HandlerFuture, Processor};
use crate::error::Error;

/// The handler resolved for a connection once its kind is known. Cached for
/// the lifetime of the connection so `Resolver::*_handler` is called at
/// most once per connection, per `spec.md` §4.2.
enum Handler {
    Info(Arc<dyn Info>),
    Mempool(Arc<dyn Mempool>),
    Consensus(Arc<dyn Consensus>),
    StateSync(Arc<dyn StateSync>),
}

/// Drives one ABCI connection to completion: reads frames until the peer
/// closes its write half, classifies and dispatches each request, and
/// drains responses onto the wire in the order the protocol requires.
///
/// Returns once the peer has disconnected and every outstanding response
/// has been flushed, or as soon as `cancel` reports a shutdown, or on the
/// first unrecoverable error (a malformed frame, an undecodable request, or
/// a handler invocation the application itself could not complete).
pub async fn run<S>(
    stream: S,
    resolver: Arc<dyn Resolver>,
    mut cancel: watch::Receiver<bool>,
    peer: String,
) -> Result<(), Error>
where
    S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
{
    let (read_half, write_half) = tokio::io::split(stream);
    let mut reader = FramedRead::new(read_half, Codec);
    let mut writer = FramedWrite::new(write_half, Codec);

    let mut kind: Option<Kind> = None;
    let mut handler: Option<Handler> = None;
    let mut processor = Processor::request_ordered();
    let mut reader_done = false;

    loop {
        if reader_done && processor.is_empty() {
            break;
        }

        tokio::select! {
            biased;

            changed = cancel.changed() => {
                if changed.is_err() || *cancel.borrow() {
                    debug!(%peer, "connection cancelled by server shutdown");
                    break;
                }
            }

            frame = reader.next(), if !reader_done => {
                match frame {
                    Some(Ok(payload)) => {
                        dispatch_frame(
                            payload,
                            &resolver,
                            &mut kind,
                            &mut handler,
                            &mut processor,
                            &mut writer,
                            &peer,
                        )
                        .await?;
                    }
                    Some(Err(e)) => {
                        error!(%peer, error = %e, "framing error, aborting connection");
                        return Err(e);
                    }
                    None => {
                        debug!(%peer, "peer closed its write half");
                        reader_done = true;
                    }
                }
            }

            outcome = processor.next_ready(), if !processor.is_empty() => {
                match outcome {
                    Some(Ok(response)) => send(&mut writer, response).await?,
                    Some(Err(e)) => {
                        error!(%peer, error = %e, "application handler failed, aborting connection");
                        return Err(e);
                    }
                    None => {}
                }
            }
        }
    }

    Ok(())
}

/// Decodes one frame's payload into a `Request`, classifies it if needed,
/// and either answers it inline (the echo/flush fast path, when nothing is
/// queued ahead of it) or enqueues the handler work it requires.
#[allow(clippy::too_many_arguments)]
async fn dispatch_frame<W>(
    payload: Bytes,
    resolver: &Arc<dyn Resolver>,
    kind: &mut Option<Kind>,
    handler: &mut Option<Handler>,
    processor: &mut Processor,
    writer: &mut FramedWrite<W, Codec>,
    peer: &str,
) -> Result<(), Error>
where
    W: AsyncWrite + Unpin + Send,
{
    let request = Request::decode(payload).map_err(abci_proto::error::Error::from)?;
    let value = request.value.ok_or(abci_proto::error::Error::UnknownRequestValue)?;

    if let request::Value::Echo(echo) = &value {
        let response = Response {
            value: Some(response::Value::Echo(abci_proto::ResponseEcho {
                message: echo.message.clone(),
            })),
        };
        if processor.is_empty() {
            return send(writer, response).await;
        }
        processor.enqueue(Box::pin(async move { Ok(response) }));
        return Ok(());
    }

    if let request::Value::Flush(_) = &value {
        let response = Response {
            value: Some(response::Value::Flush(abci_proto::ResponseFlush {})),
        };
        if processor.is_empty() {
            return send(writer, response).await;
        }
        processor.enqueue(Box::pin(async move { Ok(response) }));
        return Ok(());
    }

    let name = method_name(&value);
    let this_kind = Kind::classify(name).ok_or_else(|| Error::unknown_method(name))?;

    match kind {
        None => {
            debug!(%peer, kind = this_kind.name(), "connection classified");
            *kind = Some(this_kind);
            *handler = Some(resolve(resolver, this_kind).await);
            if !matches!(this_kind, Kind::Consensus) {
                processor.upgrade_to_response_ordered();
            }
        }
        Some(existing) if *existing != this_kind => {
            warn!(
                %peer,
                expected = existing.name(),
                got = this_kind.name(),
                "request kind does not match this connection's established kind"
            );
            return Err(Error::unknown_method(name));
        }
        Some(_) => {}
    }

    let work = build_work(value, handler.as_ref().expect("handler resolved above"), name)?;
    processor.enqueue(work);
    Ok(())
}

async fn resolve(resolver: &Arc<dyn Resolver>, kind: Kind) -> Handler {
    match kind {
        Kind::Info => Handler::Info(resolver.info_handler().await),
        Kind::Mempool => Handler::Mempool(resolver.mempool_handler().await),
        Kind::Consensus => Handler::Consensus(resolver.consensus_handler().await),
        Kind::StateSync => Handler::StateSync(resolver.state_sync_handler().await),
    }
}

fn method_name(value: &request::Value) -> &'static str {
    match value {
        request::Value::Echo(_) => "echo",
        request::Value::Flush(_) => "flush",
        request::Value::Info(_) => "info",
        request::Value::SetOption(_) => "set_option",
        request::Value::InitChain(_) => "init_chain",
        request::Value::Query(_) => "query",
        request::Value::BeginBlock(_) => "begin_block",
        request::Value::CheckTx(_) => "check_tx",
        request::Value::DeliverTx(_) => "deliver_tx",
        request::Value::EndBlock(_) => "end_block",
        request::Value::Commit(_) => "commit",
        request::Value::ListSnapshots(_) => "list_snapshots",
        request::Value::OfferSnapshot(_) => "offer_snapshot",
        request::Value::LoadSnapshotChunk(_) => "load_snapshot_chunk",
        request::Value::ApplySnapshotChunk(_) => "apply_snapshot_chunk",
    }
}

/// Builds the boxed future that will invoke the resolved handler for a
/// single, already-classified request. The future captures cloned `Arc`
/// handles only, so it is cheap to construct and entirely independent of
/// `payload`/`writer` once built. Each arm is wrapped by [`wrap_handler`],
/// so a panic inside the application's handler surfaces as
/// `Error::HandlerFailure` rather than unwinding through the connection's
/// task (spec.md §4.4/§7: a handler failure logs and aborts the connection,
/// it does not crash the process).
fn build_work(value: request::Value, handler: &Handler, name: &str) -> Result<HandlerFuture, Error> {
    let work: HandlerFuture = match (value, handler) {
        (request::Value::Info(req), Handler::Info(h)) => {
            let h = h.clone();
            wrap_handler("info", async move { response::Value::Info(h.info(req).await) })
        }
        (request::Value::SetOption(req), Handler::Info(h)) => {
            let h = h.clone();
            wrap_handler("set_option", async move {
                response::Value::SetOption(h.set_option(req).await)
            })
        }
        (request::Value::Query(req), Handler::Info(h)) => {
            let h = h.clone();
            wrap_handler("query", async move { response::Value::Query(h.query(req).await) })
        }
        (request::Value::CheckTx(req), Handler::Mempool(h)) => {
            let h = h.clone();
            wrap_handler("check_tx", async move { response::Value::CheckTx(h.check_tx(req).await) })
        }
        (request::Value::InitChain(req), Handler::Consensus(h)) => {
            let h = h.clone();
            wrap_handler("init_chain", async move {
                response::Value::InitChain(h.init_chain(req).await)
            })
        }
        (request::Value::BeginBlock(req), Handler::Consensus(h)) => {
            let h = h.clone();
            wrap_handler("begin_block", async move {
                response::Value::BeginBlock(h.begin_block(req).await)
            })
        }
        (request::Value::DeliverTx(req), Handler::Consensus(h)) => {
            let h = h.clone();
            wrap_handler("deliver_tx", async move {
                response::Value::DeliverTx(h.deliver_tx(req).await)
            })
        }
        (request::Value::EndBlock(req), Handler::Consensus(h)) => {
            let h = h.clone();
            wrap_handler("end_block", async move { response::Value::EndBlock(h.end_block(req).await) })
        }
        (request::Value::Commit(req), Handler::Consensus(h)) => {
            let h = h.clone();
            wrap_handler("commit", async move { response::Value::Commit(h.commit(req).await) })
        }
        (request::Value::ListSnapshots(req), Handler::StateSync(h)) => {
            let h = h.clone();
            wrap_handler("list_snapshots", async move {
                response::Value::ListSnapshots(h.list_snapshots(req).await)
            })
        }
        (request::Value::OfferSnapshot(req), Handler::StateSync(h)) => {
            let h = h.clone();
            wrap_handler("offer_snapshot", async move {
                response::Value::OfferSnapshot(h.offer_snapshot(req).await)
            })
        }
        (request::Value::LoadSnapshotChunk(req), Handler::StateSync(h)) => {
            let h = h.clone();
            wrap_handler("load_snapshot_chunk", async move {
                response::Value::LoadSnapshotChunk(h.load_snapshot_chunk(req).await)
            })
        }
        (request::Value::ApplySnapshotChunk(req), Handler::StateSync(h)) => {
            let h = h.clone();
            wrap_handler("apply_snapshot_chunk", async move {
                response::Value::ApplySnapshotChunk(h.apply_snapshot_chunk(req).await)
            })
        }
        (request::Value::Echo(_), _) | (request::Value::Flush(_), _) => {
            unreachable!("echo/flush are handled by the fast path before build_work is called")
        }
        _ => return Err(Error::unknown_method(name)),
    };
    Ok(work)
}

/// Boxes a handler invocation so that a panic inside `fut` is caught and
/// turned into `Error::HandlerFailure` instead of unwinding into the
/// connection's task. The panic is logged at error level with the method
/// name before conversion, matching the reference's "log critical; abort
/// connection" policy for a failing handler.
fn wrap_handler<F>(method: &'static str, fut: F) -> HandlerFuture
where
    F: Future<Output = response::Value> + Send + 'static,
{
    Box::pin(async move {
        match AssertUnwindSafe(fut).catch_unwind().await {
            Ok(value) => Ok(Response { value: Some(value) }),
            Err(payload) => {
                let detail = panic_detail(&payload);
                error!(method, detail = %detail, "application handler panicked");
                Err(Error::handler_failure(method, detail))
            }
        }
    })
}

fn panic_detail(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "handler panicked with a non-string payload".to_owned()
    }
}

async fn send<W>(writer: &mut FramedWrite<W, Codec>, response: Response) -> Result<(), Error>
where
    W: AsyncWrite + Unpin + Send,
{
    let mut buf = Vec::with_capacity(response.encoded_len());
    response
        .encode(&mut buf)
        .map_err(abci_proto::error::Error::from)?;
    writer.send(Bytes::from(buf)).await?;
    writer.flush().await?;
    Ok(())
}
