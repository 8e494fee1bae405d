//! `abci-proto` gives the developer access to the Tendermint v0.34 ABCI
//! protobuf-defined structs.
//!
//! The `.proto` sources that define these messages are Tendermint's, not
//! this crate's; the closed set of fourteen methods is vendored by hand
//! rather than regenerated so that this workspace does not need a `protoc`
//! toolchain or Tendermint's proto repository checked out to build.

#![deny(warnings, trivial_casts, trivial_numeric_casts, unused_import_braces)]
#![allow(clippy::large_enum_variant)]
#![forbid(unsafe_code)]

mod abci;
pub use abci::*;

pub mod error;
