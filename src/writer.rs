//! Write 7k telemetry streams.
//!
//! A [Writer] accepts [Store] snapshots and serializes them as records:
//!
//! ```
//! use std::io::Cursor;
//! use s7k::{RecordKind, RecordType, Store, Time7k, Writer};
//!
//! let mut writer = Writer::new(Cursor::new(Vec::new())).unwrap();
//! let mut store = Store::new();
//! store.time = Time7k { year: 2021, day: 100, ..Default::default() };
//! store.kind = RecordKind::Header;
//! store.record_type = RecordType::FileHeader;
//! writer.write(&store).unwrap();
//! writer.close().unwrap();
//! ```
//!
//! A snapshot tagged [RecordKind::Ping] emits every ping-associated record
//! marked present, in the canonical intra-ping order. Comments submitted
//! before any file header are buffered and flushed right after it, because
//! the format requires the file header to come first. Closing the writer
//! emits the accumulated catalog at end of file and rewrites the file header
//! so its optional data points at the catalog.
//!
//! The `Drop` implementation closes the writer and logs any failure instead
//! of panicking; call [close](Writer::close) yourself to see the error.

use byteorder::{LittleEndian, WriteBytesExt};
use log::error;
use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write as _};
use std::path::Path;

use crate::catalog::Catalog;
use crate::header::{self, CHECKSUM_SIZE, Header};
use crate::record::{RecordKind, RecordType};
use crate::records::{FileHeader, FrameBuilder, SystemEventMessage};
use crate::store::Store;
use crate::{Error, Result, Time7k};

/// The most comments the writer will hold while waiting for a file header.
const MAX_PENDING_COMMENTS: usize = 64;

/// Writes 7k records and builds the end-of-file catalog.
#[allow(missing_debug_implementations)]
pub struct Writer<W: std::io::Write + Seek> {
    write: Option<W>,
    closed: bool,
    catalog: Catalog,
    header_written: bool,
    file_header_frame: Vec<u8>,
    file_header_offset: u64,
    pointer_offset: u64,
    pending_comments: Vec<(SystemEventMessage, Time7k, u32, u16)>,
    last_time: Time7k,
}

impl Writer<BufWriter<File>> {
    /// Creates a writer for a path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Writer<BufWriter<File>>> {
        File::create(path)
            .map_err(Error::from)
            .and_then(|file| Writer::new(BufWriter::new(file)))
    }
}

impl<W: std::io::Write + Seek> Writer<W> {
    /// Creates a writer.
    pub fn new(write: W) -> Result<Writer<W>> {
        Ok(Writer {
            write: Some(write),
            closed: false,
            catalog: Catalog::default(),
            header_written: false,
            file_header_frame: Vec::new(),
            file_header_offset: 0,
            pointer_offset: 0,
            pending_comments: Vec::new(),
            last_time: Time7k::default(),
        })
    }

    fn stream(&mut self) -> Result<&mut W> {
        self.write.as_mut().ok_or(Error::ClosedWriter)
    }

    /// Writes one logical record from a store snapshot.
    ///
    /// - [RecordKind::Ping]: every ping record marked present is emitted in
    ///   canonical intra-ping order.
    /// - [RecordKind::Comment] before the first file header: the comment is
    ///   buffered until the header exists.
    /// - anything else: the single record named by `store.record_type`.
    pub fn write(&mut self, store: &Store) -> Result<()> {
        if self.closed {
            return Err(Error::ClosedWriter);
        }
        match store.kind {
            RecordKind::Comment if !self.header_written => {
                if self.pending_comments.len() >= MAX_PENDING_COMMENTS {
                    return Err(Error::CommentBufferFull(self.pending_comments.len()));
                }
                self.pending_comments.push((
                    store.system_event_message.clone(),
                    store.time,
                    store.device_id,
                    store.system_enumerator,
                ));
                Ok(())
            }
            RecordKind::Header => {
                let frame = store.encode_record(RecordType::FileHeader)?;
                if self.header_written {
                    self.emit(frame)
                } else {
                    self.emit_file_header(frame)?;
                    self.flush_pending_comments()
                }
            }
            RecordKind::Ping => {
                self.ensure_file_header(store)?;
                for record_type in store.present_ping_records() {
                    let frame = store.encode_record(record_type)?;
                    self.emit(frame)?;
                }
                Ok(())
            }
            _ => {
                self.ensure_file_header(store)?;
                let frame = store.encode_record(store.record_type)?;
                self.emit(frame)?;
                Ok(())
            }
        }
    }

    /// Closes the writer: emits the catalog, patches the file header's
    /// catalog pointer, and seeks back to end of file.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Err(Error::ClosedWriter);
        }
        if !self.header_written {
            // stamp the synthesized header with the oldest buffered comment
            // so the catalog entry carries a believable time
            let time = self
                .pending_comments
                .first()
                .map(|(_, time, _, _)| *time)
                .unwrap_or(self.last_time);
            let frame = synthesized_file_header(time)?;
            self.emit_file_header(frame)?;
            self.flush_pending_comments()?;
        }

        let catalog_offset = self.stream()?.stream_position()?;
        let mut builder = FrameBuilder::new(Header::new(RecordType::FileCatalog, self.last_time));
        self.catalog.encode(&mut builder)?;
        let catalog_frame = builder.finish()?;
        let catalog_size = catalog_frame.len() as u32;
        self.stream()?.write_all(&catalog_frame)?;

        // rewrite the file header with the catalog pointer and a fresh
        // checksum
        let pointer = self.pointer_offset as usize;
        let mut frame = self.file_header_frame.clone();
        (&mut frame[pointer..pointer + 4]).write_u32::<LittleEndian>(catalog_size)?;
        (&mut frame[pointer + 4..pointer + 12]).write_u64::<LittleEndian>(catalog_offset)?;
        let sum = header::checksum(&frame[..frame.len() - CHECKSUM_SIZE]);
        let len = frame.len();
        (&mut frame[len - CHECKSUM_SIZE..]).write_u32::<LittleEndian>(sum)?;
        let file_header_offset = self.file_header_offset;
        let stream = self.stream()?;
        stream.seek(SeekFrom::Start(file_header_offset))?;
        stream.write_all(&frame)?;
        stream.seek(SeekFrom::End(0))?;
        stream.flush()?;
        self.closed = true;
        Ok(())
    }

    /// Closes the writer if needed and returns the inner stream.
    pub fn into_inner(mut self) -> Result<W> {
        if !self.closed {
            self.close()?;
        }
        self.write.take().ok_or(Error::ClosedWriter)
    }

    /// The catalog accumulated so far.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn ensure_file_header(&mut self, store: &Store) -> Result<()> {
        if self.header_written {
            return Ok(());
        }
        let frame = if store.file_header != FileHeader::default() {
            let mut header = Header::new(RecordType::FileHeader, store.time);
            header.device_id = store.device_id;
            header.system_enumerator = store.system_enumerator;
            let mut builder = FrameBuilder::new(header);
            store.file_header.encode(&mut builder)?;
            builder.finish()?
        } else {
            synthesized_file_header(store.time)?
        };
        self.emit_file_header(frame)?;
        self.flush_pending_comments()
    }

    fn emit_file_header(&mut self, frame: Vec<u8>) -> Result<()> {
        let header = Header::read_from(&frame[..])?;
        if header.optional_data_offset == 0 {
            // the encoder always reserves the pointer section; treat its
            // absence as a framing bug
            return Err(Error::SizeMismatch {
                record_type: RecordType::FileHeader,
                expected: frame.len(),
                actual: 0,
            });
        }
        self.pointer_offset = u64::from(header.optional_data_offset);
        self.file_header_offset = self.stream()?.stream_position()?;
        self.file_header_frame = frame.clone();
        self.catalog.push(&header, self.file_header_offset);
        self.last_time = header.time;
        self.stream()?.write_all(&frame)?;
        self.header_written = true;
        Ok(())
    }

    fn flush_pending_comments(&mut self) -> Result<()> {
        let pending = std::mem::take(&mut self.pending_comments);
        for (comment, time, device_id, system_enumerator) in pending {
            let mut header = Header::new(RecordType::SystemEventMessage, time);
            header.device_id = device_id;
            header.system_enumerator = system_enumerator;
            let mut builder = FrameBuilder::new(header);
            comment.encode(&mut builder)?;
            self.emit(builder.finish()?)?;
        }
        Ok(())
    }

    fn emit(&mut self, frame: Vec<u8>) -> Result<()> {
        let header = Header::read_from(&frame[..])?;
        let offset = self.stream()?.stream_position()?;
        self.catalog.push(&header, offset);
        self.last_time = header.time;
        self.stream()?.write_all(&frame)?;
        Ok(())
    }
}

impl<W: std::io::Write + Seek> Drop for Writer<W> {
    fn drop(&mut self) {
        if !self.closed && self.write.is_some() {
            if let Err(err) = self.close() {
                error!("failed to close the writer: {err}");
            }
        }
    }
}

/// Builds a default file header for callers that never supplied one.
fn synthesized_file_header(time: Time7k) -> Result<Vec<u8>> {
    let file_header = FileHeader {
        version: 1,
        recording_name: "s7k".to_string(),
        recording_version: env!("CARGO_PKG_VERSION").to_string(),
        ..Default::default()
    };
    let mut builder = FrameBuilder::new(Header::new(RecordType::FileHeader, time));
    file_header.encode(&mut builder)?;
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn store_with_time() -> Store {
        let mut store = Store::new();
        store.time = Time7k {
            year: 2021,
            day: 150,
            hours: 10,
            minutes: 30,
            seconds: 12.,
        };
        store
    }

    #[test]
    fn close_is_idempotent_error() {
        let mut writer = Writer::new(Cursor::new(Vec::new())).unwrap();
        writer.close().unwrap();
        assert!(matches!(writer.close(), Err(Error::ClosedWriter)));
    }

    #[test]
    fn write_after_close_fails() {
        let mut writer = Writer::new(Cursor::new(Vec::new())).unwrap();
        writer.close().unwrap();
        let store = store_with_time();
        assert!(matches!(writer.write(&store), Err(Error::ClosedWriter)));
    }

    #[test]
    fn synthesizes_file_header_for_headerless_streams() {
        let mut writer = Writer::new(Cursor::new(Vec::new())).unwrap();
        let mut store = store_with_time();
        store.kind = RecordKind::Heading;
        store.record_type = RecordType::Heading;
        store.heading.heading = 1.5;
        writer.write(&store).unwrap();
        // file header first, then the heading record
        assert_eq!(2, writer.catalog().entries.len());
        assert_eq!(
            RecordType::FileHeader as u16,
            writer.catalog().entries[0].record_type
        );
        assert_eq!(
            RecordType::Heading as u16,
            writer.catalog().entries[1].record_type
        );
    }

    #[test]
    fn ping_snapshot_emits_present_records_in_order() {
        let mut writer = Writer::new(Cursor::new(Vec::new())).unwrap();
        let mut store = store_with_time();
        store.kind = RecordKind::Ping;
        store.ping_flags.set(RecordType::Bathymetry);
        store.ping_flags.set(RecordType::RawDetection);
        store.ping_flags.set(RecordType::SonarSettings);
        writer.write(&store).unwrap();
        let types: Vec<u16> = writer
            .catalog()
            .entries
            .iter()
            .map(|e| e.record_type)
            .collect();
        assert_eq!(
            vec![
                RecordType::FileHeader as u16,
                RecordType::SonarSettings as u16,
                RecordType::RawDetection as u16,
                RecordType::Bathymetry as u16,
            ],
            types
        );
    }

    #[test]
    fn comment_buffer_is_bounded() {
        let mut writer = Writer::new(Cursor::new(Vec::new())).unwrap();
        let mut store = store_with_time();
        store.kind = RecordKind::Comment;
        store.record_type = RecordType::SystemEventMessage;
        for _ in 0..MAX_PENDING_COMMENTS {
            writer.write(&store).unwrap();
        }
        assert!(matches!(
            writer.write(&store),
            Err(Error::CommentBufferFull(_))
        ));
    }
}
