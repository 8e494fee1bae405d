//! `abci-server` is an asynchronous socket server implementing Tendermint's
//! ABCI protocol: it frames, classifies and dispatches consensus-engine
//! requests to application handlers, and serializes their responses back
//! onto the wire in the order the protocol requires.
//!
//! Start here:
//!
//! - [`application`] — the four ABCI capability traits (`Info`, `Mempool`,
//!   `Consensus`, `StateSync`) an application implements, and the
//!   [`application::Resolver`] that routes a connection to its handler.
//! - [`ext`] — a ready-made split of those traits into the `App` /
//!   `TxChecker` / `TxKeeper` collaborator shape most real applications
//!   want instead of one monolithic object.
//! - [`server::Server`] — binds a listener and runs the accept loop.
//!
//! `codec`, `dispatch` and `connection` are the engine internals: the wire
//! framing, the two response-ordering disciplines, and the per-connection
//! state machine that ties them together. Most embedders never need to
//! touch them directly.

#![deny(unused_import_braces)]
#![forbid(unsafe_code)]

pub mod accumulator;
pub mod application;
pub mod codec;
pub mod connection;
pub mod dispatch;
pub mod error;
pub mod ext;
pub mod server;

pub use application::{Kind, Monolithic, Resolver};
pub use error::Error;
pub use server::{Server, ServerConfig};
