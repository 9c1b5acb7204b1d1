//! Typed little-endian access to record buffers.
//!
//! Record bodies are decoded from and encoded into contiguous byte buffers,
//! with absolute positions so optional-data sections can be addressed by the
//! offsets the header declares. All multi-byte values are little-endian.

use crate::{Error, Result};

/// A read cursor over a record buffer.
#[derive(Debug)]
pub struct ReadCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

macro_rules! get {
    ($name:ident, $ty:ty, $len:expr) => {
        /// Reads one value, advancing the cursor.
        pub fn $name(&mut self) -> Result<$ty> {
            let bytes = self.take($len)?;
            Ok(<$ty>::from_le_bytes(bytes.try_into().unwrap()))
        }
    };
}

macro_rules! put {
    ($name:ident, $ty:ty) => {
        /// Writes one value, advancing the cursor.
        pub fn $name(&mut self, value: $ty) {
            self.put_bytes(&value.to_le_bytes());
        }
    };
}

impl<'a> ReadCursor<'a> {
    /// Creates a cursor at the start of a buffer.
    pub fn new(buf: &'a [u8]) -> ReadCursor<'a> {
        ReadCursor { buf, pos: 0 }
    }

    /// Returns the current position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the number of bytes left.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Moves the cursor to an absolute position.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.buf.len() {
            return Err(Error::TruncatedRecord {
                position: self.pos,
                needed: pos.saturating_sub(self.buf.len()),
                available: 0,
            });
        }
        self.pos = pos;
        Ok(())
    }

    /// Advances the cursor without reading.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        let _ = self.take(n)?;
        Ok(())
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(Error::TruncatedRecord {
                position: self.pos,
                needed: n,
                available: self.remaining(),
            });
        }
        let bytes = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    get!(get_u8, u8, 1);
    get!(get_i8, i8, 1);
    get!(get_u16, u16, 2);
    get!(get_i16, i16, 2);
    get!(get_u32, u32, 4);
    get!(get_i32, i32, 4);
    get!(get_u64, u64, 8);
    get!(get_i64, i64, 8);
    get!(get_f32, f32, 4);
    get!(get_f64, f64, 8);

    /// Reads a fixed-size byte run.
    pub fn get_bytes(&mut self, out: &mut [u8]) -> Result<()> {
        let bytes = self.take(out.len())?;
        out.copy_from_slice(bytes);
        Ok(())
    }

    /// Reads `n` bytes as a slice of the underlying buffer.
    pub fn get_slice(&mut self, n: usize) -> Result<&'a [u8]> {
        self.take(n)
    }
}

/// A write cursor over a growable buffer.
///
/// Writes past the current end grow the buffer; writes inside it overwrite,
/// which is how the record header and catalog pointer get back-patched.
#[derive(Debug, Default)]
pub struct WriteCursor {
    buf: Vec<u8>,
    pos: usize,
}

impl WriteCursor {
    /// Creates an empty cursor.
    pub fn new() -> WriteCursor {
        WriteCursor::default()
    }

    /// Returns the current position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the buffer length.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Moves the cursor to an absolute position inside the buffer.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.buf.len() {
            return Err(Error::TruncatedRecord {
                position: self.pos,
                needed: pos - self.buf.len(),
                available: 0,
            });
        }
        self.pos = pos;
        Ok(())
    }

    /// Writes a byte run, advancing the cursor.
    pub fn put_bytes(&mut self, bytes: &[u8]) {
        let end = self.pos + bytes.len();
        if end > self.buf.len() {
            self.buf.resize(end, 0);
        }
        self.buf[self.pos..end].copy_from_slice(bytes);
        self.pos = end;
    }

    put!(put_u8, u8);
    put!(put_i8, i8);
    put!(put_u16, u16);
    put!(put_i16, i16);
    put!(put_u32, u32);
    put!(put_i32, i32);
    put!(put_u64, u64);
    put!(put_i64, i64);
    put!(put_f32, f32);
    put!(put_f64, f64);

    /// Returns the written bytes.
    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    /// Returns the written bytes as a slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }
}

/// Grows a record buffer to exactly `count` elements.
///
/// Capacity is reused when it suffices; otherwise the buffer is reallocated
/// to exactly `count`. On allocation failure the buffer is reset to zero
/// length and capacity and [Error::OutOfMemory] is returned.
pub(crate) fn grow_exact<T: Default + Clone>(vec: &mut Vec<T>, count: usize) -> Result<()> {
    vec.clear();
    if count > vec.capacity() {
        *vec = Vec::new();
        if let Err(err) = vec.try_reserve_exact(count) {
            *vec = Vec::new();
            return Err(Error::OutOfMemory(err));
        }
    }
    vec.resize(count, T::default());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_scalars() {
        let mut write = WriteCursor::new();
        write.put_u8(0xAB);
        write.put_i16(-2);
        write.put_u32(0xDEAD_BEEF);
        write.put_f32(1.5);
        write.put_f64(-2.25);
        let buf = write.into_inner();

        let mut read = ReadCursor::new(&buf);
        assert_eq!(0xAB, read.get_u8().unwrap());
        assert_eq!(-2, read.get_i16().unwrap());
        assert_eq!(0xDEAD_BEEF, read.get_u32().unwrap());
        assert_eq!(1.5, read.get_f32().unwrap());
        assert_eq!(-2.25, read.get_f64().unwrap());
        assert_eq!(0, read.remaining());
    }

    #[test]
    fn out_of_bounds_read() {
        let buf = [0u8; 3];
        let mut read = ReadCursor::new(&buf);
        assert!(matches!(
            read.get_u32(),
            Err(Error::TruncatedRecord { needed: 4, .. })
        ));
    }

    #[test]
    fn overwrite_in_place() {
        let mut write = WriteCursor::new();
        write.put_u32(0);
        write.put_u32(42);
        write.seek(0).unwrap();
        write.put_u32(7);
        let buf = write.into_inner();
        let mut read = ReadCursor::new(&buf);
        assert_eq!(7, read.get_u32().unwrap());
        assert_eq!(42, read.get_u32().unwrap());
    }

    #[test]
    fn grow_reuses_capacity() {
        let mut vec: Vec<f32> = Vec::with_capacity(16);
        grow_exact(&mut vec, 8).unwrap();
        assert_eq!(8, vec.len());
        assert_eq!(16, vec.capacity());
        grow_exact(&mut vec, 20).unwrap();
        assert_eq!(20, vec.len());
        assert!(vec.capacity() >= 20);
    }
}
