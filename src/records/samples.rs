//! Width-tagged sample containers.
//!
//! Several acoustic records select their sample width at runtime through an
//! encoding flag or color depth. Rather than punning byte buffers, samples
//! live in a tagged container whose variant the decoder picks from the flag.

use crate::cursor::{ReadCursor, WriteCursor, grow_exact};
use crate::Result;

/// The element type of a sample buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum SampleKind {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    F32,
}

impl SampleKind {
    /// The wire size of one sample.
    pub fn size(&self) -> usize {
        match self {
            SampleKind::U8 | SampleKind::I8 => 1,
            SampleKind::U16 | SampleKind::I16 => 2,
            SampleKind::U32 | SampleKind::I32 | SampleKind::F32 => 4,
            SampleKind::U64 => 8,
        }
    }
}

/// A buffer of acoustic samples in one of the format's widths.
#[derive(Clone, Debug, PartialEq)]
#[allow(missing_docs)]
pub enum Samples {
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    U64(Vec<u64>),
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    F32(Vec<f32>),
}

impl Default for Samples {
    fn default() -> Samples {
        Samples::U16(Vec::new())
    }
}

macro_rules! per_variant {
    ($self:expr, $vec:ident => $body:expr) => {
        match $self {
            Samples::U8($vec) => $body,
            Samples::U16($vec) => $body,
            Samples::U32($vec) => $body,
            Samples::U64($vec) => $body,
            Samples::I8($vec) => $body,
            Samples::I16($vec) => $body,
            Samples::I32($vec) => $body,
            Samples::F32($vec) => $body,
        }
    };
}

impl Samples {
    /// The number of samples.
    pub fn len(&self) -> usize {
        per_variant!(self, vec => vec.len())
    }

    /// Returns true if the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The element type of this buffer.
    pub fn kind(&self) -> SampleKind {
        match self {
            Samples::U8(_) => SampleKind::U8,
            Samples::U16(_) => SampleKind::U16,
            Samples::U32(_) => SampleKind::U32,
            Samples::U64(_) => SampleKind::U64,
            Samples::I8(_) => SampleKind::I8,
            Samples::I16(_) => SampleKind::I16,
            Samples::I32(_) => SampleKind::I32,
            Samples::F32(_) => SampleKind::F32,
        }
    }

    /// The wire size of the whole buffer.
    pub fn wire_size(&self) -> usize {
        self.len() * self.kind().size()
    }

    /// Reads `count` samples of the given kind, switching the variant if the
    /// encoding flag changed since the last ping and reusing the allocation
    /// otherwise.
    pub(crate) fn decode(
        &mut self,
        cursor: &mut ReadCursor<'_>,
        kind: SampleKind,
        count: usize,
    ) -> Result<()> {
        if self.kind() != kind {
            *self = match kind {
                SampleKind::U8 => Samples::U8(Vec::new()),
                SampleKind::U16 => Samples::U16(Vec::new()),
                SampleKind::U32 => Samples::U32(Vec::new()),
                SampleKind::U64 => Samples::U64(Vec::new()),
                SampleKind::I8 => Samples::I8(Vec::new()),
                SampleKind::I16 => Samples::I16(Vec::new()),
                SampleKind::I32 => Samples::I32(Vec::new()),
                SampleKind::F32 => Samples::F32(Vec::new()),
            };
        }
        match self {
            Samples::U8(vec) => {
                grow_exact(vec, count)?;
                for sample in vec {
                    *sample = cursor.get_u8()?;
                }
            }
            Samples::U16(vec) => {
                grow_exact(vec, count)?;
                for sample in vec {
                    *sample = cursor.get_u16()?;
                }
            }
            Samples::U32(vec) => {
                grow_exact(vec, count)?;
                for sample in vec {
                    *sample = cursor.get_u32()?;
                }
            }
            Samples::U64(vec) => {
                grow_exact(vec, count)?;
                for sample in vec {
                    *sample = cursor.get_u64()?;
                }
            }
            Samples::I8(vec) => {
                grow_exact(vec, count)?;
                for sample in vec {
                    *sample = cursor.get_i8()?;
                }
            }
            Samples::I16(vec) => {
                grow_exact(vec, count)?;
                for sample in vec {
                    *sample = cursor.get_i16()?;
                }
            }
            Samples::I32(vec) => {
                grow_exact(vec, count)?;
                for sample in vec {
                    *sample = cursor.get_i32()?;
                }
            }
            Samples::F32(vec) => {
                grow_exact(vec, count)?;
                for sample in vec {
                    *sample = cursor.get_f32()?;
                }
            }
        }
        Ok(())
    }

    /// Writes every sample in wire order.
    pub(crate) fn encode(&self, cursor: &mut WriteCursor) {
        match self {
            Samples::U8(vec) => cursor.put_bytes(vec),
            Samples::U16(vec) => {
                for &sample in vec {
                    cursor.put_u16(sample);
                }
            }
            Samples::U32(vec) => {
                for &sample in vec {
                    cursor.put_u32(sample);
                }
            }
            Samples::U64(vec) => {
                for &sample in vec {
                    cursor.put_u64(sample);
                }
            }
            Samples::I8(vec) => {
                for &sample in vec {
                    cursor.put_i8(sample);
                }
            }
            Samples::I16(vec) => {
                for &sample in vec {
                    cursor.put_i16(sample);
                }
            }
            Samples::I32(vec) => {
                for &sample in vec {
                    cursor.put_i32(sample);
                }
            }
            Samples::F32(vec) => {
                for &sample in vec {
                    cursor.put_f32(sample);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_u16() {
        let samples = Samples::U16(vec![1, 2, 65535]);
        let mut write = WriteCursor::new();
        samples.encode(&mut write);
        let buf = write.into_inner();
        assert_eq!(6, buf.len());

        let mut decoded = Samples::default();
        let mut read = ReadCursor::new(&buf);
        decoded.decode(&mut read, SampleKind::U16, 3).unwrap();
        assert_eq!(samples, decoded);
    }

    #[test]
    fn variant_switch_on_flag_change() {
        let buf = [1u8, 0, 0, 0, 2, 0, 0, 0];
        let mut samples = Samples::default();
        let mut read = ReadCursor::new(&buf);
        samples.decode(&mut read, SampleKind::U32, 2).unwrap();
        assert_eq!(Samples::U32(vec![1, 2]), samples);
        assert_eq!(8, samples.wire_size());
    }

    #[test]
    fn short_buffer_is_truncation() {
        let buf = [0u8; 3];
        let mut samples = Samples::default();
        let mut read = ReadCursor::new(&buf);
        assert!(samples.decode(&mut read, SampleKind::U16, 2).is_err());
    }
}
