//! # Wire Encoding
//!
//! Canonical byte encoding used both on the wire and as the preimage of every
//! signed hash. Integers are little-endian; variable-length fields carry a
//! compact-size length prefix:
//!
//! | Value range | Encoding |
//! |-------------|----------|
//! | `< 0xfd` | 1 byte |
//! | `<= 0xffff` | `0xfd` + u16 LE |
//! | `<= 0xffff_ffff` | `0xfe` + u32 LE |
//! | otherwise | `0xff` + u64 LE |
//!
//! Decoding is strict: non-minimal compact sizes, oversize lengths and
//! truncated input are errors, and no length prefix can make the reader
//! allocate more than the bytes actually remaining.

use thiserror::Error;

use crate::entities::{OutPoint, Transaction, TxOut};

/// Upper bound on any decoded length prefix.
pub const MAX_VECTOR_LEN: u64 = 0x0200_0000;

/// Errors produced while decoding wire bytes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Input ended before the field was complete.
    #[error("Truncated input: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    /// Compact size used a wider form than necessary.
    #[error("Non-minimal compact size encoding")]
    NonMinimalCompactSize,

    /// Length prefix exceeds what the input or the protocol allows.
    #[error("Length prefix too large: {0}")]
    LengthTooLarge(u64),

    /// String field is not valid UTF-8.
    #[error("Invalid UTF-8 in string field")]
    InvalidUtf8,

    /// Bytes left over after a complete message.
    #[error("{0} trailing bytes after message")]
    TrailingBytes(usize),
}

/// Append a compact-size integer.
pub fn write_compact_size(out: &mut Vec<u8>, n: u64) {
    if n < 0xfd {
        out.push(n as u8);
    } else if n <= 0xffff {
        out.push(0xfd);
        out.extend_from_slice(&(n as u16).to_le_bytes());
    } else if n <= 0xffff_ffff {
        out.push(0xfe);
        out.extend_from_slice(&(n as u32).to_le_bytes());
    } else {
        out.push(0xff);
        out.extend_from_slice(&n.to_le_bytes());
    }
}

/// Append a length-prefixed byte string.
pub fn write_var_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    write_compact_size(out, bytes.len() as u64);
    out.extend_from_slice(bytes);
}

/// Append a length-prefixed UTF-8 string.
pub fn write_var_string(out: &mut Vec<u8>, s: &str) {
    write_var_bytes(out, s.as_bytes());
}

/// Append a length-prefixed sequence of encodable items.
pub fn write_vec<T: WireEncode>(out: &mut Vec<u8>, items: &[T]) {
    write_compact_size(out, items.len() as u64);
    for item in items {
        item.encode(out);
    }
}

/// Types with a canonical wire encoding.
pub trait WireEncode {
    /// Append the encoding of `self` to `out`.
    fn encode(&self, out: &mut Vec<u8>);

    /// Encode into a fresh buffer.
    fn to_wire_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode(&mut out);
        out
    }
}

/// Types decodable from their canonical wire encoding.
pub trait WireDecode: Sized {
    /// Decode one value, advancing the reader.
    fn decode(reader: &mut WireReader<'_>) -> Result<Self, CodecError>;

    /// Decode a complete message; trailing bytes are an error.
    fn from_wire_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut reader = WireReader::new(bytes);
        let value = Self::decode(&mut reader)?;
        reader.finish()?;
        Ok(value)
    }
}

/// Bounds-checked cursor over an input buffer.
#[derive(Debug)]
pub struct WireReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    /// Create a reader positioned at the start of `bytes`.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    /// Fail if any bytes remain unread.
    pub fn finish(&self) -> Result<(), CodecError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(CodecError::TrailingBytes(n)),
        }
    }

    /// Read exactly `len` bytes.
    pub fn read_exact(&mut self, len: usize) -> Result<&'a [u8], CodecError> {
        if self.remaining() < len {
            return Err(CodecError::Truncated {
                needed: len,
                remaining: self.remaining(),
            });
        }
        let start = self.pos;
        self.pos += len;
        Ok(&self.bytes[start..self.pos])
    }

    /// Read a fixed-size array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_exact(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16_le(&mut self) -> Result<u16, CodecError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32_le(&mut self) -> Result<u32, CodecError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64_le(&mut self) -> Result<u64, CodecError> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    pub fn read_i64_le(&mut self) -> Result<i64, CodecError> {
        Ok(i64::from_le_bytes(self.read_array()?))
    }

    /// Read a minimally-encoded compact size.
    pub fn read_compact_size(&mut self) -> Result<u64, CodecError> {
        let n = match self.read_u8()? {
            0xfd => {
                let v = u64::from(self.read_u16_le()?);
                if v < 0xfd {
                    return Err(CodecError::NonMinimalCompactSize);
                }
                v
            }
            0xfe => {
                let v = u64::from(self.read_u32_le()?);
                if v <= 0xffff {
                    return Err(CodecError::NonMinimalCompactSize);
                }
                v
            }
            0xff => {
                let v = self.read_u64_le()?;
                if v <= 0xffff_ffff {
                    return Err(CodecError::NonMinimalCompactSize);
                }
                v
            }
            b => u64::from(b),
        };
        Ok(n)
    }

    /// Read a length prefix for items of `min_item_size` bytes each.
    ///
    /// The length must not exceed [`MAX_VECTOR_LEN`] and the items must fit
    /// in the remaining input.
    pub fn read_length(&mut self, min_item_size: usize) -> Result<usize, CodecError> {
        let len = self.read_compact_size()?;
        if len > MAX_VECTOR_LEN {
            return Err(CodecError::LengthTooLarge(len));
        }
        let len = len as usize;
        if len.saturating_mul(min_item_size.max(1)) > self.remaining() {
            return Err(CodecError::LengthTooLarge(len as u64));
        }
        Ok(len)
    }

    /// Read a length-prefixed byte string.
    pub fn read_var_bytes(&mut self) -> Result<Vec<u8>, CodecError> {
        let len = self.read_length(1)?;
        Ok(self.read_exact(len)?.to_vec())
    }

    /// Read a length-prefixed UTF-8 string.
    pub fn read_var_string(&mut self) -> Result<String, CodecError> {
        String::from_utf8(self.read_var_bytes()?).map_err(|_| CodecError::InvalidUtf8)
    }

    /// Read a length-prefixed sequence of `T`, each at least `min_item_size` bytes.
    pub fn read_vec<T: WireDecode>(&mut self, min_item_size: usize) -> Result<Vec<T>, CodecError> {
        let len = self.read_length(min_item_size)?;
        let mut items = Vec::with_capacity(len);
        for _ in 0..len {
            items.push(T::decode(self)?);
        }
        Ok(items)
    }
}

// =============================================================================
// PRIMITIVE IMPLS
// =============================================================================

impl WireEncode for u8 {
    fn encode(&self, out: &mut Vec<u8>) {
        out.push(*self);
    }
}

impl WireDecode for u8 {
    fn decode(reader: &mut WireReader<'_>) -> Result<Self, CodecError> {
        reader.read_u8()
    }
}

impl WireEncode for u32 {
    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }
}

impl WireDecode for u32 {
    fn decode(reader: &mut WireReader<'_>) -> Result<Self, CodecError> {
        reader.read_u32_le()
    }
}

impl WireEncode for u64 {
    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }
}

impl WireDecode for u64 {
    fn decode(reader: &mut WireReader<'_>) -> Result<Self, CodecError> {
        reader.read_u64_le()
    }
}

impl WireEncode for i64 {
    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }
}

impl WireDecode for i64 {
    fn decode(reader: &mut WireReader<'_>) -> Result<Self, CodecError> {
        reader.read_i64_le()
    }
}

impl<const N: usize> WireEncode for [u8; N] {
    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self);
    }
}

impl<const N: usize> WireDecode for [u8; N] {
    fn decode(reader: &mut WireReader<'_>) -> Result<Self, CodecError> {
        reader.read_array()
    }
}

// =============================================================================
// ENTITY IMPLS
// =============================================================================

/// Encoded size of an outpoint: 32-byte txid + 4-byte index.
pub const OUTPOINT_SIZE: usize = 36;

impl WireEncode for OutPoint {
    fn encode(&self, out: &mut Vec<u8>) {
        self.txid.encode(out);
        self.n.encode(out);
    }
}

impl WireDecode for OutPoint {
    fn decode(reader: &mut WireReader<'_>) -> Result<Self, CodecError> {
        Ok(OutPoint {
            txid: reader.read_array()?,
            n: reader.read_u32_le()?,
        })
    }
}

impl WireDecode for TxOut {
    fn decode(reader: &mut WireReader<'_>) -> Result<Self, CodecError> {
        Ok(TxOut {
            value: reader.read_u64_le()?,
            script_pubkey: reader.read_var_bytes()?,
        })
    }
}

impl WireDecode for Transaction {
    fn decode(reader: &mut WireReader<'_>) -> Result<Self, CodecError> {
        let version = reader.read_u32_le()?;
        let inputs = reader.read_vec::<OutPoint>(OUTPOINT_SIZE)?;
        // value (8) + empty script prefix (1)
        let vout = reader.read_vec::<TxOut>(9)?;
        Ok(Transaction {
            version,
            inputs,
            vout,
        })
    }
}
