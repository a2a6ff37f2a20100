//! Bounds-checked little-endian reading over byte slices.
//!
//! Every read validates the remaining length first and reports
//! [`Error::TruncatedBuffer`] instead of panicking, so malformed or
//! hostile buffers never index out of range.

use byteorder::{ByteOrder, LittleEndian};

use super::{Error, Quat, Result, Vec3};

/// Maximum number of bytes in a LEB128-encoded u32.
const MAX_VARINT_LEN: usize = 5;

/// Forward-only cursor over a byte slice.
#[derive(Clone, Debug)]
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
    what: &'static str,
}

impl<'a> ByteReader<'a> {
    /// Create a reader at the start of `buf`.
    ///
    /// `what` names the structure being read and appears in truncation errors.
    pub fn new(buf: &'a [u8], what: &'static str) -> Self {
        Self { buf, pos: 0, what }
    }

    /// Create a reader positioned at `pos`.
    pub fn at(buf: &'a [u8], pos: usize, what: &'static str) -> Result<Self> {
        if pos > buf.len() {
            return Err(Error::TruncatedBuffer { what, offset: pos, needed: 0, len: buf.len() });
        }
        Ok(Self { buf, pos, what })
    }

    /// Current position.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Total length of the underlying buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if the underlying buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Bytes left after the current position.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Move to an absolute position.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.buf.len() {
            return Err(self.truncated(pos.saturating_sub(self.pos)));
        }
        self.pos = pos;
        Ok(())
    }

    /// Skip `n` bytes.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.take(n).map(|_| ())
    }

    /// Fail unless `count` elements of `elem_size` bytes are available.
    ///
    /// Used before allocating for an untrusted element count.
    pub fn ensure(&self, count: usize, elem_size: usize) -> Result<()> {
        match count.checked_mul(elem_size) {
            Some(n) if n <= self.remaining() => Ok(()),
            Some(n) => Err(self.truncated(n)),
            None => Err(self.truncated(usize::MAX)),
        }
    }

    fn truncated(&self, needed: usize) -> Error {
        Error::TruncatedBuffer { what: self.what, offset: self.pos, needed, len: self.buf.len() }
    }

    /// Take the next `n` bytes as a slice.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(self.truncated(n));
        }
        let start = self.pos;
        self.pos += n;
        Ok(&self.buf[start..self.pos])
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.take(2)?))
    }

    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    #[inline]
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.take(4)?))
    }

    #[inline]
    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(LittleEndian::read_f32(self.take(4)?))
    }

    /// Read an unsigned LEB128 varint (at most 32 bits).
    pub fn read_varint(&mut self) -> Result<u32> {
        let start = self.pos;
        let mut value: u32 = 0;
        for i in 0..MAX_VARINT_LEN {
            let byte = self.read_u8()?;
            let bits = (byte & 0x7f) as u32;
            if i == MAX_VARINT_LEN - 1 && bits > 0x0f {
                break;
            }
            value |= bits << (7 * i);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(Error::invalid(format!("varint at offset {} overflows 32 bits", start)))
    }

    /// Read a varint-length-prefixed UTF-8 string.
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_varint()? as usize;
        self.read_utf8(len)
    }

    /// Read `len` bytes as UTF-8.
    pub fn read_utf8(&mut self, len: usize) -> Result<String> {
        let at = self.pos;
        let bytes = self.take(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|e| Error::invalid(format!("invalid UTF-8 in {} at offset {}: {}", self.what, at, e)))
    }

    pub fn read_vec3(&mut self) -> Result<Vec3> {
        let b = self.take(12)?;
        Ok(Vec3::new(
            LittleEndian::read_f32(&b[0..4]),
            LittleEndian::read_f32(&b[4..8]),
            LittleEndian::read_f32(&b[8..12]),
        ))
    }

    /// Read `count` packed `Vec3`s after checking the buffer can hold them.
    pub fn read_vec3s(&mut self, count: usize) -> Result<Vec<Vec3>> {
        self.ensure(count, 12)?;
        let flat = self.read_f32_vec(count * 3)?;
        Ok(flat.chunks_exact(3).map(Vec3::from_slice).collect())
    }

    /// Read a quaternion stored as x, y, z, w.
    pub fn read_quat(&mut self) -> Result<Quat> {
        let b = self.take(16)?;
        Ok(Quat::from_xyzw(
            LittleEndian::read_f32(&b[0..4]),
            LittleEndian::read_f32(&b[4..8]),
            LittleEndian::read_f32(&b[8..12]),
            LittleEndian::read_f32(&b[12..16]),
        ))
    }

    /// Read `count` f32 values.
    pub fn read_f32_vec(&mut self, count: usize) -> Result<Vec<f32>> {
        self.ensure(count, 4)?;
        let bytes = self.take(count * 4)?;
        let mut out = vec![0.0f32; count];
        LittleEndian::read_f32_into(bytes, &mut out);
        Ok(out)
    }

    /// Read `count` u16 values.
    pub fn read_u16_vec(&mut self, count: usize) -> Result<Vec<u16>> {
        self.ensure(count, 2)?;
        let bytes = self.take(count * 2)?;
        let mut out = vec![0u16; count];
        LittleEndian::read_u16_into(bytes, &mut out);
        Ok(out)
    }

    /// Read `count` u32 values.
    pub fn read_u32_vec(&mut self, count: usize) -> Result<Vec<u32>> {
        self.ensure(count, 4)?;
        let bytes = self.take(count * 4)?;
        let mut out = vec![0u32; count];
        LittleEndian::read_u32_into(bytes, &mut out);
        Ok(out)
    }
}
