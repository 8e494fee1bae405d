//! Error types for the ABCI connection protocol engine.
//!
//! Protocol-level application errors (bad tx content, wrong nonce, unknown
//! query path) are *not* represented here: they travel in a `Response`'s
//! `code`/`log` fields and never abort a connection. The variants below are
//! the engine-fatal conditions from the error table in the core spec.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed or truncated ABCI frame: {0}")]
    Framing(String),

    #[error("failed to encode or decode an ABCI message")]
    Codec(#[from] abci_proto::error::Error),

    #[error("`{name}` is not one of the 14 known ABCI methods, or is unsupported by the connection's handler")]
    UnknownMethod { name: String },

    #[error("application handler for `{method}` failed: {detail}")]
    HandlerFailure { method: String, detail: String },

    #[error("`init_chain` carried non-empty `app_state_bytes` but `load_genesis` was not overridden")]
    GenesisFailure,

    #[error("synchronized block {height} but app_hash mismatched")]
    StateConflict { height: u64 },

    #[error("duplicate transaction hash recorded within a single block")]
    DuplicateTxHash,

    #[error("server is already started")]
    AlreadyStarted,

    #[error("I/O error on an ABCI connection")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn framing(detail: impl Into<String>) -> Self {
        Error::Framing(detail.into())
    }

    pub fn unknown_method(name: impl Into<String>) -> Self {
        Error::UnknownMethod { name: name.into() }
    }

    pub fn handler_failure(method: impl Into<String>, detail: impl Into<String>) -> Self {
        Error::HandlerFailure {
            method: method.into(),
            detail: detail.into(),
        }
    }
}
