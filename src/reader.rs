//! Read 7k telemetry streams.
//!
//! A [Reader] frames records off a seekable byte stream, decodes them into
//! its [Store], and groups ping-associated records into whole pings:
//!
//! ```no_run
//! use s7k::{Event, Reader};
//!
//! let mut reader = Reader::from_path("survey.s7k").unwrap();
//! while let Some(event) = reader.read_next().unwrap() {
//!     match event {
//!         Event::Ping => {
//!             let store = reader.store();
//!             println!(
//!                 "ping {} with {} detections",
//!                 store.raw_detection.ping_number,
//!                 store.raw_detection.beams.len(),
//!             );
//!         }
//!         Event::Aux(kind) => println!("{kind:?}"),
//!     }
//! }
//! ```
//!
//! When the file closes with a catalog, the reader loads it at open and
//! iterates records in canonical order; otherwise records arrive in file
//! order. Corruption between records is skipped silently (see
//! [skipped_bytes](Reader::skipped_bytes)); a truncated final ping is still
//! emitted if its detections were read.

use log::{debug, warn};
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use crate::catalog::Catalog;
use crate::channels::Feeds;
use crate::error::ErrorClass;
use crate::framer::Framer;
use crate::header::Header;
use crate::ping::{PingAssembler, PingStep, peek_ping_number};
use crate::record::{RecordKind, RecordType};
use crate::store::Store;
use crate::{Error, Result, Time7k};

/// One logical read result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// The store holds a fully-assembled ping.
    Ping,
    /// The store holds one non-ping record of the given kind.
    Aux(RecordKind),
}

/// Reads 7k records and assembles pings.
#[allow(missing_debug_implementations)]
pub struct Reader<R: Read + Seek> {
    read: R,
    framer: Framer,
    assembler: PingAssembler,
    store: Store,
    feeds: Feeds,
    catalog: Option<Catalog>,
    catalog_index: usize,
    detection_time: Option<Time7k>,
    eof: bool,
}

impl Reader<BufReader<File>> {
    /// Opens a reader on a file path.
    ///
    /// The file is wrapped in a `BufReader`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Reader<BufReader<File>>> {
        File::open(path)
            .map_err(Error::from)
            .and_then(|file| Reader::new(BufReader::new(file)))
    }
}

impl<R: Read + Seek> Reader<R> {
    /// Creates a reader, probing for an end-of-file catalog.
    ///
    /// If the stream opens with a file header whose optional data points at
    /// a catalog, the catalog is loaded, filtered, and sorted, and all
    /// subsequent reads follow its canonical order.
    pub fn new(mut read: R) -> Result<Reader<R>> {
        let catalog = load_catalog(&mut read).unwrap_or_else(|err| {
            warn!("unreadable catalog, falling back to sequential reads: {err}");
            None
        });
        read.seek(SeekFrom::Start(0))?;
        Ok(Reader {
            read,
            framer: Framer::new(),
            assembler: PingAssembler::new(),
            store: Store::new(),
            feeds: Feeds::default(),
            catalog,
            catalog_index: 0,
            detection_time: None,
            eof: false,
        })
    }

    /// Returns the store, the target of every decode.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Returns the asynchronous feeds extracted so far.
    pub fn feeds(&self) -> &Feeds {
        &self.feeds
    }

    /// Returns the driving catalog, if the file had one.
    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_ref()
    }

    /// Total bytes skipped while re-acquiring sync.
    pub fn skipped_bytes(&self) -> u64 {
        self.framer.skipped_bytes()
    }

    /// Records kept despite a checksum mismatch.
    pub fn checksum_mismatches(&self) -> u64 {
        self.framer.checksum_mismatches()
    }

    /// Returns the inner stream.
    pub fn into_inner(self) -> R {
        self.read
    }

    /// Reads the next logical record.
    ///
    /// Returns `Ok(None)` at a clean end of input. [Event::Ping] means the
    /// store holds a whole ping; [Event::Aux] names the single record that
    /// was deposited. Decode errors are surfaced per record and reading can
    /// continue afterwards.
    pub fn read_next(&mut self) -> Result<Option<Event>> {
        if self.eof {
            return Ok(None);
        }
        loop {
            let header = match self.next_frame() {
                Ok(Some(header)) => header,
                Ok(None) => {
                    self.eof = true;
                    if self.assembler.finish(self.store.ping_flags.complete()) {
                        self.emit_ping();
                        return Ok(Some(Event::Ping));
                    }
                    return Ok(None);
                }
                Err(err) => return self.downgrade_or_fail(err),
            };
            let Some(record_type) = header.record_type() else {
                return Err(Error::UnknownRecordType(header.record_type));
            };
            if record_type.is_ping_record() {
                let ping_number = peek_ping_number(record_type, self.framer.frame());
                let complete = self.store.ping_flags.complete();
                let step = self.assembler.step_ping(ping_number, complete);
                match step {
                    PingStep::Start | PingStep::Restart | PingStep::Accumulate => {
                        if step == PingStep::Restart {
                            debug!(
                                "dropping incomplete ping ahead of ping {}",
                                ping_number.unwrap_or_default()
                            );
                        }
                        if step != PingStep::Accumulate {
                            self.begin_accumulation();
                        }
                        if let Err(err) = self.decode_ping_record(&header) {
                            return self.downgrade_or_fail(err);
                        }
                    }
                    PingStep::Flush => {
                        self.framer.save_current();
                        self.emit_ping();
                        return Ok(Some(Event::Ping));
                    }
                }
            } else {
                let force = record_type == RecordType::FileCatalog || self.catalog.is_none();
                if force && self.assembler.force_completion(self.store.ping_flags.complete()) {
                    self.framer.save_current();
                    self.emit_ping();
                    return Ok(Some(Event::Ping));
                }
                let decoded = self.store.decode_record(&header, self.framer.frame())?;
                self.feeds.ingest(&self.store, decoded);
                return Ok(Some(Event::Aux(decoded.kind())));
            }
        }
    }

    fn next_frame(&mut self) -> Result<Option<Header>> {
        if self.framer.has_saved() {
            return self.framer.read_frame(&mut self.read);
        }
        if let Some(catalog) = &self.catalog {
            let Some(entry) = catalog.entries.get(self.catalog_index) else {
                return Ok(None);
            };
            let offset = entry.offset;
            self.catalog_index += 1;
            self.read.seek(SeekFrom::Start(offset))?;
        }
        self.framer.read_frame(&mut self.read)
    }

    fn begin_accumulation(&mut self) {
        self.store.ping_flags.clear();
        self.detection_time = None;
    }

    fn decode_ping_record(&mut self, header: &Header) -> Result<()> {
        match self.store.decode_record(header, self.framer.frame()) {
            Ok(record_type) => {
                if matches!(
                    record_type,
                    RecordType::RawDetection | RecordType::SegmentedRawDetection
                ) {
                    self.detection_time = Some(header.time);
                }
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// A read failure with a complete ping buffered becomes that ping.
    fn downgrade_or_fail(&mut self, err: Error) -> Result<Option<Event>> {
        let downgradable = matches!(
            err.class(),
            ErrorClass::Io | ErrorClass::BadFrame | ErrorClass::Eof
        );
        if downgradable && self.assembler.accumulating() && self.store.ping_flags.complete() {
            warn!("treating read failure as end of ping: {err}");
            self.eof = true;
            self.assembler.finish(true);
            self.emit_ping();
            return Ok(Some(Event::Ping));
        }
        if err.is_eof() {
            self.eof = true;
            return Ok(None);
        }
        Err(err)
    }

    fn emit_ping(&mut self) {
        self.store.kind = RecordKind::Ping;
        self.store.record_type = if self.store.ping_flags.raw_detection {
            RecordType::RawDetection
        } else {
            RecordType::SegmentedRawDetection
        };
        if let Some(time) = self.detection_time {
            self.store.time = time;
            self.store.timestamp = time.as_epoch_seconds();
        }
    }
}

/// Probes a stream for a file header with a catalog pointer and loads the
/// catalog it names.
fn load_catalog<R: Read + Seek>(read: &mut R) -> Result<Option<Catalog>> {
    read.seek(SeekFrom::Start(0))?;
    let mut framer = Framer::new();
    let Some(header) = framer.read_frame(read)? else {
        return Ok(None);
    };
    if header.record_type() != Some(RecordType::FileHeader) {
        return Ok(None);
    }
    let mut file_header = crate::records::FileHeader::default();
    file_header.decode(&header, framer.frame())?;
    if !file_header.optional_data || file_header.catalog_offset == 0 {
        return Ok(None);
    }
    read.seek(SeekFrom::Start(file_header.catalog_offset))?;
    let Some(catalog_header) = framer.read_frame(read)? else {
        return Ok(None);
    };
    if catalog_header.record_type() != Some(RecordType::FileCatalog) {
        return Ok(None);
    }
    let expected = Catalog::normalize_size(file_header.catalog_size);
    if expected != catalog_header.size {
        debug!(
            "catalog size disagrees with the file header: record says {}, header says {}",
            catalog_header.size, expected
        );
    }
    let mut catalog = Catalog::default();
    catalog.decode(&catalog_header, framer.frame())?;
    catalog.sanitize();
    debug!("loaded catalog with {} entries", catalog.entries.len());
    Ok(Some(catalog))
}
