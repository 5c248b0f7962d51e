//! Binary payload reader for bridge messages.
//!
//! Bridge payloads follow a LEB128-length-prefixed, little-endian BCS
//! flavor that is consumed from the *back* of the buffer (pop-last
//! semantics). [`BridgeBuf`] reverses the input once at construction and
//! pops from the end of the reversed vector, which is equivalent to
//! reading the original bytes front-to-back.
//!
//! Numeric fields that cross the EVM boundary (`seq_num`, `amount`,
//! limits, prices) are big-endian on the wire; [`BridgeBuf::peel_u64_be`]
//! reads those. Everything else is little-endian.
//!
//! Every decoder either consumes exactly the bytes it needs and returns
//! the value, or fails. Callers must check [`BridgeBuf::is_empty`] after
//! decoding and reject the message as `TrailingBytes` otherwise.

use cosmwasm_std::Uint256;
use thiserror::Error;

/// Maximum byte width of a ULEB128 length prefix.
const ULEB_MAX_BYTES: usize = 5;

#[derive(Error, Debug, PartialEq)]
pub enum CodecError {
    #[error("Read past the end of the payload")]
    OutOfRange,

    #[error("ULEB128 length is wider than {ULEB_MAX_BYTES} bytes")]
    LenOutOfRange,

    #[error("Invalid boolean byte: {got}")]
    NotBool { got: u8 },

    #[error("Payload has {count} trailing bytes")]
    TrailingBytes { count: usize },

    #[error("Invalid payload length: expected {expected} bytes, got {got}")]
    InvalidPayloadLength { expected: usize, got: usize },

    #[error("Invalid address length: {got} bytes")]
    InvalidAddressLength { got: usize },

    #[error("Address list must not be empty")]
    EmptyList,
}

/// Back-popping payload reader.
pub struct BridgeBuf {
    /// Input bytes stored reversed; the next logical byte is the last element.
    data: Vec<u8>,
}

impl BridgeBuf {
    pub fn new(bytes: Vec<u8>) -> Self {
        let mut data = bytes;
        data.reverse();
        Self { data }
    }

    /// Bytes left to consume.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Fail with `TrailingBytes` unless the buffer is fully consumed.
    pub fn assert_empty(&self) -> Result<(), CodecError> {
        if self.data.is_empty() {
            Ok(())
        } else {
            Err(CodecError::TrailingBytes {
                count: self.data.len(),
            })
        }
    }

    /// Consume the reader and return the unread bytes in forward order.
    pub fn into_remainder_bytes(self) -> Vec<u8> {
        let mut rest = self.data;
        rest.reverse();
        rest
    }

    fn pop(&mut self) -> Result<u8, CodecError> {
        self.data.pop().ok_or(CodecError::OutOfRange)
    }

    /// Pop `n` logical-forward bytes.
    pub fn peel_bytes(&mut self, n: usize) -> Result<Vec<u8>, CodecError> {
        if self.data.len() < n {
            return Err(CodecError::OutOfRange);
        }
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            out.push(self.data.pop().expect("length checked"));
        }
        Ok(out)
    }

    pub fn peel_u8(&mut self) -> Result<u8, CodecError> {
        self.pop()
    }

    pub fn peel_u16(&mut self) -> Result<u16, CodecError> {
        let bytes = self.peel_bytes(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub fn peel_u64(&mut self) -> Result<u64, CodecError> {
        let bytes = self.peel_bytes(8)?;
        let arr: [u8; 8] = bytes.try_into().expect("length checked");
        Ok(u64::from_le_bytes(arr))
    }

    pub fn peel_u128(&mut self) -> Result<u128, CodecError> {
        let bytes = self.peel_bytes(16)?;
        let arr: [u8; 16] = bytes.try_into().expect("length checked");
        Ok(u128::from_le_bytes(arr))
    }

    pub fn peel_u256(&mut self) -> Result<Uint256, CodecError> {
        let bytes = self.peel_bytes(32)?;
        let arr: [u8; 32] = bytes.try_into().expect("length checked");
        Ok(Uint256::from_le_bytes(arr))
    }

    /// Big-endian u64, used for the on-wire numeric fields shared with
    /// EVM peers (`seq_num`, `amount`, limits, prices).
    pub fn peel_u64_be(&mut self) -> Result<u64, CodecError> {
        let bytes = self.peel_bytes(8)?;
        let arr: [u8; 8] = bytes.try_into().expect("length checked");
        Ok(u64::from_be_bytes(arr))
    }

    pub fn peel_bool(&mut self) -> Result<bool, CodecError> {
        match self.pop()? {
            0 => Ok(false),
            1 => Ok(true),
            got => Err(CodecError::NotBool { got }),
        }
    }

    /// Decode a ULEB128 length of at most [`ULEB_MAX_BYTES`] bytes.
    pub fn peel_uleb_len(&mut self) -> Result<usize, CodecError> {
        let mut value: u64 = 0;
        let mut shift = 0u32;
        for _ in 0..ULEB_MAX_BYTES {
            let byte = self.pop()?;
            value |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                if value > u64::from(u32::MAX) {
                    return Err(CodecError::LenOutOfRange);
                }
                return Ok(value as usize);
            }
            shift += 7;
        }
        Err(CodecError::LenOutOfRange)
    }

    pub fn peel_vec_u8(&mut self) -> Result<Vec<u8>, CodecError> {
        let len = self.peel_uleb_len()?;
        self.peel_bytes(len)
    }

    pub fn peel_vec_u64(&mut self) -> Result<Vec<u64>, CodecError> {
        let len = self.peel_uleb_len()?;
        let mut out = Vec::with_capacity(len);
        for _ in 0..len {
            out.push(self.peel_u64()?);
        }
        Ok(out)
    }

    pub fn peel_vec_vec_u8(&mut self) -> Result<Vec<Vec<u8>>, CodecError> {
        let len = self.peel_uleb_len()?;
        let mut out = Vec::with_capacity(len);
        for _ in 0..len {
            out.push(self.peel_vec_u8()?);
        }
        Ok(out)
    }
}

/// Append a ULEB128-encoded length.
pub fn push_uleb_len(out: &mut Vec<u8>, mut len: usize) {
    loop {
        let mut byte = (len & 0x7f) as u8;
        len >>= 7;
        if len != 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if len == 0 {
            break;
        }
    }
}

/// Append a length-prefixed byte vector.
pub fn push_vec_u8(out: &mut Vec<u8>, bytes: &[u8]) {
    push_uleb_len(out, bytes.len());
    out.extend_from_slice(bytes);
}
