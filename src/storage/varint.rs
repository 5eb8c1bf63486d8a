//! Unsigned LEB128 varint codec used as the at-rest format for counter values.
//!
//! This is the protobuf varint encoding, taken from `prost::encoding`.

use prost::encoding::{decode_varint, encode_varint, encoded_len_varint};

use crate::contracts::VarintError;

/// Maximum encoded length of a u64.
pub const MAX_VARINT_LEN_U64: usize = 10;

/// Encodes `value` into `buf` and returns the number of bytes written.
pub fn encode_u64(value: u64, buf: &mut [u8; MAX_VARINT_LEN_U64]) -> usize {
    let mut out = &mut buf[..];
    encode_varint(value, &mut out);
    encoded_len_varint(value)
}

/// Encodes `value` into a freshly allocated buffer.
pub fn encode_u64_vec(value: u64) -> Vec<u8> {
    let mut buf = Vec::with_capacity(encoded_len_varint(value));
    encode_varint(value, &mut buf);
    buf
}

/// Decodes a varint from the front of `bytes`.
/// Returns the value and the number of bytes consumed; trailing bytes are ignored.
pub fn decode_u64(bytes: &[u8]) -> Result<(u64, usize), VarintError> {
    let mut rest = bytes;
    let value = decode_varint(&mut rest).map_err(|_| classify_invalid(bytes))?;
    Ok((value, bytes.len() - rest.len()))
}

/// Decodes a varint that must span all of `bytes`.
pub fn decode_u64_exact(bytes: &[u8]) -> Result<u64, VarintError> {
    let (value, consumed) = decode_u64(bytes)?;
    if consumed != bytes.len() {
        return Err(VarintError::TrailingBytes {
            consumed,
            len: bytes.len(),
        });
    }
    Ok(value)
}

/// prost reports every malformed varint alike; split input that simply ran out
/// from input that cannot fit in 64 bits.
fn classify_invalid(bytes: &[u8]) -> VarintError {
    let ran_out = bytes.len() < MAX_VARINT_LEN_U64 && bytes.iter().all(|b| b & 0x80 != 0);
    if ran_out {
        VarintError::Truncated
    } else {
        VarintError::Overflow
    }
}
