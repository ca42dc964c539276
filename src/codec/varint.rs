//! Unsigned LEB128 varints over [`bytes`] buffers.
//!
//! Seven data bits per byte, least significant group first, MSB set on every
//! byte except the last. A `u64` takes at most [`MAX_VARINT_LEN`] bytes.

use bytes::{Buf, BufMut};

use crate::error::DecodeError;

pub const MAX_VARINT_LEN: usize = 10;

/// Appends `value` as a varint.
#[inline]
pub fn put_u64<B: BufMut + ?Sized>(buf: &mut B, mut value: u64) {
    while value >= 0x80 {
        buf.put_u8((value as u8 & 0x7F) | 0x80);
        value >>= 7;
    }
    buf.put_u8(value as u8);
}

/// Number of bytes [`put_u64`] writes for `value`.
#[inline]
pub fn encoded_len(value: u64) -> usize {
    let bits = 64 - (value | 1).leading_zeros() as usize;
    bits.div_ceil(7)
}

/// Byte reader that reports absolute offsets in errors.
#[derive(Debug)]
pub struct Reader<'a> {
    buf: &'a [u8],
    total: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            total: buf.len(),
        }
    }

    /// Offset of the next unread byte.
    #[inline]
    pub fn offset(&self) -> usize {
        self.total - self.buf.remaining()
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    fn eof(&self, needed: usize) -> DecodeError {
        DecodeError::UnexpectedEof {
            offset: self.offset(),
            needed,
        }
    }

    /// Reads one varint.
    pub fn read_u64(&mut self) -> Result<u64, DecodeError> {
        let start = self.offset();
        let mut result: u64 = 0;
        for i in 0..MAX_VARINT_LEN {
            if !self.buf.has_remaining() {
                return Err(self.eof(1));
            }
            let byte = self.buf.get_u8();
            let low = u64::from(byte & 0x7F);
            let shift = 7 * i as u32;
            // The tenth byte may only carry the single remaining bit.
            if i == MAX_VARINT_LEN - 1 && low > 1 {
                return Err(DecodeError::VarintOverflow { offset: start });
            }
            result |= low << shift;
            if byte & 0x80 == 0 {
                return Ok(result);
            }
        }
        Err(DecodeError::VarintOverflow { offset: start })
    }

    /// Reads a varint that must fit in `usize`.
    pub fn read_len(&mut self) -> Result<usize, DecodeError> {
        let offset = self.offset();
        let value = self.read_u64()?;
        usize::try_from(value).map_err(|_| DecodeError::LengthOverflow { offset, value })
    }

    /// Returns the next byte without consuming it.
    pub fn peek_u8(&self) -> Result<u8, DecodeError> {
        self.buf.chunk().first().copied().ok_or_else(|| self.eof(1))
    }

    pub fn skip(&mut self, n: usize) -> Result<(), DecodeError> {
        if self.buf.remaining() < n {
            return Err(self.eof(n - self.buf.remaining()));
        }
        self.buf.advance(n);
        Ok(())
    }

    /// Reads `len` bytes as a UTF-8 string.
    pub fn read_str(&mut self, len: usize) -> Result<String, DecodeError> {
        let offset = self.offset();
        if self.buf.remaining() < len {
            return Err(self.eof(len - self.buf.remaining()));
        }
        let (head, tail) = self.buf.split_at(len);
        let key = std::str::from_utf8(head)
            .map_err(|_| DecodeError::InvalidUtf8 { offset })?
            .to_owned();
        self.buf = tail;
        Ok(key)
    }

    /// Fails if any bytes are left.
    pub fn finish(&self) -> Result<(), DecodeError> {
        match self.buf.remaining() {
            0 => Ok(()),
            remaining => Err(DecodeError::TrailingBytes { remaining }),
        }
    }
}
