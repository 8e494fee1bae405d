//! Length-prefixed varint framing codec.
//!
//! A frame is an unsigned varint header `V` followed by exactly
//! `payload_len = V >> 1` bytes of protobuf payload. The `<< 1` / `>> 1`
//! convention is a compatibility constant with Tendermint v0.34's own
//! length-prefix encoding; it has nothing to do with zig-zag encoding.
//!
//! This codec never allocates a new buffer per byte: [`Codec::decode`] scans
//! the varint out of the existing `BytesMut` and splits the payload off in
//! place, so decoding a stream of `n` frames is amortized linear in the
//! total number of bytes received.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::Error;

/// Maximum length in bytes of a valid LEB128 varint encoding a `u64`.
const MAX_VARINT_BYTES: usize = 10;

/// Attempts to read a varint header from the front of `buf`.
///
/// Returns `Ok(None)` if `buf` does not yet contain a complete varint (the
/// caller should wait for more bytes). Returns `Err` if more than
/// [`MAX_VARINT_BYTES`] continuation bytes were seen without the varint
/// terminating — that can never happen for a valid encoding and is treated
/// as a fatal framing error.
fn read_varint_header(buf: &[u8]) -> Result<Option<(u64, usize)>, Error> {
    let mut value: u64 = 0;
    for (i, byte) in buf.iter().take(MAX_VARINT_BYTES).enumerate() {
        value |= u64::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(Some((value, i + 1)));
        }
    }
    if buf.len() >= MAX_VARINT_BYTES {
        return Err(Error::framing("varint header longer than 10 bytes".to_owned()));
    }
    Ok(None)
}

/// Tendermint v0.34 ABCI wire framing: length-prefixed varint over a
/// streaming transport.
#[derive(Debug, Default)]
pub struct Codec;

impl Decoder for Codec {
    type Item = Bytes;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Bytes>, Error> {
        let (header, header_len) = match read_varint_header(&src[..])? {
            Some(parsed) => parsed,
            None => return Ok(None),
        };
        let payload_len = (header >> 1) as usize;
        if src.len() < header_len + payload_len {
            return Ok(None);
        }
        src.advance(header_len);
        Ok(Some(src.split_to(payload_len).freeze()))
    }
}

impl Encoder<Bytes> for Codec {
    type Error = Error;

    fn encode(&mut self, item: Bytes, dst: &mut BytesMut) -> Result<(), Error> {
        let header = (item.len() as u64) << 1;
        dst.reserve(MAX_VARINT_BYTES + item.len());
        let mut remaining = header;
        loop {
            let byte = (remaining & 0x7f) as u8;
            remaining >>= 7;
            if remaining == 0 {
                dst.put_u8(byte);
                break;
            }
            dst.put_u8(byte | 0x80);
        }
        dst.put(item);
        Ok(())
    }
}

/// Encodes a single payload into a standalone frame. Convenience wrapper
/// around [`Codec::encode`] for call sites that are not driving a
/// [`tokio_util::codec::FramedWrite`].
pub fn encode_frame(payload: &[u8]) -> Bytes {
    let mut dst = BytesMut::new();
    Codec
        .encode(Bytes::copy_from_slice(payload), &mut dst)
        .expect("encoding a byte slice into a frame cannot fail");
    dst.freeze()
}
