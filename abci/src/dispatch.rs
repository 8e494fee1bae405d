//! Ordered task processor: the two scheduling disciplines a connection can
//! run its enqueued handler work under.
//!
//! Both disciplines guarantee that responses are emitted in the order their
//! requests were received. They differ in whether handler *execution* is
//! also serialized:
//!
//! - [`RequestOrdered`] drives at most one handler future to completion at a
//!   time — required for the Consensus kind, where `begin_block` →
//!   `deliver_tx`* → `end_block` → `commit` must be observed by the
//!   application in that exact, non-overlapping order.
//! - [`ResponseOrdered`] lets handler futures make progress concurrently
//!   (via [`futures::stream::FuturesOrdered`]) but drains completions in
//!   enqueue order, so the wire still sees responses in receipt order.
//!
//! The reference implements this with an explicit `current_task` flag and
//! done-callbacks (`original_source/abci/protocol.py`,
//! `RequestOrderedTaskProcessor`/`ResponseOrderedTaskProcessor`). In async
//! Rust a boxed future does nothing until polled, so `RequestOrdered`
//! recovers the same "at most one in flight" guarantee simply by never
//! polling more than the head of its queue — no flag bookkeeping needed.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;

use abci_proto::Response;
use futures::stream::FuturesOrdered;
use futures::StreamExt;

use crate::error::Error;

/// A unit of handler work: resolves the connection's handler (on first use)
/// and invokes the method named by a request, producing its response. Fails
/// with `Error::HandlerFailure` if the handler itself panicked (see
/// `connection::wrap_handler`), in which case the connection aborts rather
/// than emitting a response for this request.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<Response, Error>> + Send>>;

/// Strict request-ordered discipline: used for the Consensus kind.
#[derive(Default)]
pub struct RequestOrdered {
    queue: VecDeque<HandlerFuture>,
}

impl RequestOrdered {
    pub fn enqueue(&mut self, work: HandlerFuture) {
        self.queue.push_back(work);
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Awaits only the head of the queue: until it resolves, no other
    /// queued future is ever polled, so no other handler invocation can
    /// make progress.
    pub async fn next_ready(&mut self) -> Option<Result<Response, Error>> {
        let head = self.queue.front_mut()?;
        let response = head.await;
        self.queue.pop_front();
        Some(response)
    }
}

/// Response-ordered, concurrent-execution discipline: used for Info,
/// Mempool and StateSync.
#[derive(Default)]
pub struct ResponseOrdered {
    queue: FuturesOrdered<HandlerFuture>,
}

impl ResponseOrdered {
    pub fn enqueue(&mut self, work: HandlerFuture) {
        self.queue.push_back(work);
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub async fn next_ready(&mut self) -> Option<Result<Response, Error>> {
        self.queue.next().await
    }
}

/// The discipline selected for a connection once it is classified. Chosen
/// once, at classification time, and never changed for the connection's
/// lifetime.
pub enum Processor {
    RequestOrdered(RequestOrdered),
    ResponseOrdered(ResponseOrdered),
}

impl Processor {
    pub fn request_ordered() -> Self {
        Processor::RequestOrdered(RequestOrdered::default())
    }

    pub fn response_ordered() -> Self {
        Processor::ResponseOrdered(ResponseOrdered::default())
    }

    pub fn enqueue(&mut self, work: HandlerFuture) {
        match self {
            Processor::RequestOrdered(p) => p.enqueue(work),
            Processor::ResponseOrdered(p) => p.enqueue(work),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Processor::RequestOrdered(p) => p.is_empty(),
            Processor::ResponseOrdered(p) => p.is_empty(),
        }
    }

    pub async fn next_ready(&mut self) -> Option<Result<Response, Error>> {
        match self {
            Processor::RequestOrdered(p) => p.next_ready().await,
            Processor::ResponseOrdered(p) => p.next_ready().await,
        }
    }

    /// Switches a still request-ordered processor over to the
    /// response-ordered discipline, carrying over anything already queued
    /// in its original enqueue order. A no-op once the processor is already
    /// response-ordered.
    ///
    /// Used by the connection engine when a connection's first classifying
    /// request turns out to be Info, Mempool or StateSync: until that
    /// point every connection starts request-ordered (the safe default for
    /// the echo/flush-only prefix every connection may receive before
    /// classification).
    pub fn upgrade_to_response_ordered(&mut self) {
        if matches!(self, Processor::ResponseOrdered(_)) {
            return;
        }
        let previous = std::mem::replace(self, Processor::ResponseOrdered(ResponseOrdered::default()));
        if let (Processor::RequestOrdered(mut request_ordered), Processor::ResponseOrdered(response_ordered)) =
            (previous, &mut *self)
        {
            while let Some(work) = request_ordered.queue.pop_front() {
                response_ordered.enqueue(work);
            }
        }
    }
}
