//! Record framing: sync discovery, header reads, size-directed body reads.
//!
//! The framer turns a byte stream into whole record buffers. It re-acquires
//! alignment after corruption by sliding a 48-byte window one byte at a time
//! until a valid sync pattern, whitelisted record type, and plausible size
//! line up; skipped bytes are counted and logged, never surfaced as errors.

use log::warn;
use std::io::Read;

use crate::header::{self, CHECKSUM_SIZE, Header, PREFIX_SIZE};
use crate::{Error, Result};

/// Reads record frames from a byte stream.
#[derive(Debug, Default)]
pub(crate) struct Framer {
    frame: Vec<u8>,
    saved: Option<Vec<u8>>,
    skipped_bytes: u64,
    pending_skip: u64,
    checksum_mismatches: u64,
}

impl Framer {
    pub fn new() -> Framer {
        Framer::default()
    }

    /// The current frame, valid after a successful [read_frame](Self::read_frame).
    pub fn frame(&self) -> &[u8] {
        &self.frame
    }

    /// Total bytes skipped while re-acquiring sync.
    pub fn skipped_bytes(&self) -> u64 {
        self.skipped_bytes
    }

    /// Records whose checksum did not verify but were kept anyway.
    pub fn checksum_mismatches(&self) -> u64 {
        self.checksum_mismatches
    }

    /// True when a pushed-back frame is waiting.
    pub fn has_saved(&self) -> bool {
        self.saved.is_some()
    }

    /// Stashes the current frame so the next read returns it again.
    ///
    /// The ping assembler uses this when it over-reads into the record that
    /// starts the next ping.
    pub fn save_current(&mut self) {
        self.saved = Some(std::mem::take(&mut self.frame));
    }

    /// Reads the next record frame.
    ///
    /// Returns `Ok(None)` at a clean end of input. The frame buffer is
    /// reused across calls; on success it holds exactly one whole record and
    /// the parsed header is returned alongside.
    pub fn read_frame<R: Read>(&mut self, read: &mut R) -> Result<Option<Header>> {
        if let Some(saved) = self.saved.take() {
            self.frame = saved;
            let header = Header::read_from(&self.frame[..])?;
            return Ok(Some(header));
        }

        let mut prefix = [0u8; PREFIX_SIZE];
        let got = fill(read, &mut prefix)?;
        if got == 0 {
            return Ok(None);
        }
        if got < PREFIX_SIZE {
            // trailing fragment too short to ever frame
            self.skip(got as u64);
            return Ok(None);
        }

        let peeked = loop {
            match header::peek(&prefix) {
                Ok(peeked) => break peeked,
                Err(_) => {
                    prefix.copy_within(1.., 0);
                    let mut byte = [0u8; 1];
                    if fill(read, &mut byte)? == 0 {
                        self.skip(PREFIX_SIZE as u64);
                        return Ok(None);
                    }
                    prefix[PREFIX_SIZE - 1] = byte[0];
                    self.skip(1);
                }
            }
        };
        self.flush_skip_diagnostic();

        let size = peeked.size as usize;
        self.frame.resize(size, 0);
        self.frame[..PREFIX_SIZE].copy_from_slice(&prefix);
        let got = fill(read, &mut self.frame[PREFIX_SIZE..])?;
        if got < size - PREFIX_SIZE {
            return Err(Error::Eof);
        }

        let header = Header::read_from(&self.frame[..])?;
        if header.has_checksum() {
            let declared =
                u32::from_le_bytes(self.frame[size - CHECKSUM_SIZE..].try_into().unwrap());
            let computed = header::checksum(&self.frame[..size - CHECKSUM_SIZE]);
            if declared != computed {
                self.checksum_mismatches += 1;
                warn!(
                    "checksum mismatch on record type {}: computed {computed:#010x}, \
                     recorded {declared:#010x}",
                    header.record_type
                );
            }
        }
        Ok(Some(header))
    }

    fn skip(&mut self, n: u64) {
        self.skipped_bytes += n;
        self.pending_skip += n;
    }

    fn flush_skip_diagnostic(&mut self) {
        if self.pending_skip > 0 {
            warn!(
                "skipped {} bytes of garbage before re-acquiring sync",
                self.pending_skip
            );
            self.pending_skip = 0;
        }
    }
}

/// Reads until the buffer is full or the stream ends, returning bytes read.
fn fill<R: Read>(read: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        let n = read.read(&mut buf[total..])?;
        if n == 0 {
            break;
        }
        total += n;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordType;
    use crate::records::FrameBuilder;
    use crate::Time7k;
    use std::io::Cursor;

    fn tiny_record(record_type: RecordType) -> Vec<u8> {
        let mut builder = FrameBuilder::new(Header::new(record_type, Time7k::default()));
        builder.cursor().put_u32(0xC0FFEE);
        builder.finish().unwrap()
    }

    #[test]
    fn frames_back_to_back_records() {
        let mut bytes = tiny_record(RecordType::Heading);
        bytes.extend(tiny_record(RecordType::Altitude));
        let mut cursor = Cursor::new(bytes);
        let mut framer = Framer::new();

        let header = framer.read_frame(&mut cursor).unwrap().unwrap();
        assert_eq!(RecordType::Heading as u32, header.record_type);
        let header = framer.read_frame(&mut cursor).unwrap().unwrap();
        assert_eq!(RecordType::Altitude as u32, header.record_type);
        assert!(framer.read_frame(&mut cursor).unwrap().is_none());
        assert_eq!(0, framer.skipped_bytes());
    }

    #[test]
    fn skips_garbage_between_records() {
        let mut bytes = tiny_record(RecordType::Heading);
        bytes.extend([0u8; 17]);
        bytes.extend(tiny_record(RecordType::Altitude));
        let mut cursor = Cursor::new(bytes);
        let mut framer = Framer::new();

        framer.read_frame(&mut cursor).unwrap().unwrap();
        let header = framer.read_frame(&mut cursor).unwrap().unwrap();
        assert_eq!(RecordType::Altitude as u32, header.record_type);
        assert_eq!(17, framer.skipped_bytes());
    }

    #[test]
    fn corrupt_sync_skips_whole_record() {
        let mut bytes = tiny_record(RecordType::Heading);
        let second = tiny_record(RecordType::Altitude);
        let second_len = second.len();
        bytes.extend(second);
        // wreck the second record's sync pattern
        let offset = bytes.len() - second_len + 4;
        bytes[offset..offset + 4].copy_from_slice(&[0, 0, 0, 0]);
        bytes.extend(tiny_record(RecordType::Depth));

        let mut cursor = Cursor::new(bytes);
        let mut framer = Framer::new();
        framer.read_frame(&mut cursor).unwrap().unwrap();
        let header = framer.read_frame(&mut cursor).unwrap().unwrap();
        assert_eq!(RecordType::Depth as u32, header.record_type);
        assert_eq!(second_len as u64, framer.skipped_bytes());
    }

    #[test]
    fn save_one_lookahead_returns_same_frame() {
        let bytes = tiny_record(RecordType::Heading);
        let mut cursor = Cursor::new(bytes.clone());
        let mut framer = Framer::new();

        framer.read_frame(&mut cursor).unwrap().unwrap();
        framer.save_current();
        let header = framer.read_frame(&mut cursor).unwrap().unwrap();
        assert_eq!(RecordType::Heading as u32, header.record_type);
        assert_eq!(bytes, framer.frame());
    }

    #[test]
    fn tolerates_checksum_mismatch() {
        let mut bytes = tiny_record(RecordType::Heading);
        let len = bytes.len();
        bytes[len - 1] ^= 0xFF;
        let mut cursor = Cursor::new(bytes);
        let mut framer = Framer::new();
        assert!(framer.read_frame(&mut cursor).unwrap().is_some());
        assert_eq!(1, framer.checksum_mismatches());
    }

    #[test]
    fn truncated_body_is_eof_error() {
        let mut bytes = tiny_record(RecordType::Heading);
        bytes.truncate(bytes.len() - 2);
        let mut cursor = Cursor::new(bytes);
        let mut framer = Framer::new();
        assert!(matches!(framer.read_frame(&mut cursor), Err(Error::Eof)));
    }
}
