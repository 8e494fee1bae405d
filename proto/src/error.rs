//! Errors arising from malformed protobuf payloads.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("error decoding a protobuf message")]
    DecodeMessage(#[from] prost::DecodeError),

    #[error("error encoding a protobuf message")]
    EncodeMessage(#[from] prost::EncodeError),

    #[error("request oneof has no value set")]
    UnknownRequestValue,
}
