//! Native library for reading and writing the 7k multibeam sonar telemetry
//! format.
//!
//! A 7k stream interleaves dozens of record types: ping-associated acoustic
//! records, vehicle navigation and attitude, sound velocity profiles,
//! configuration, comments, and file-level metadata. Each record is framed
//! as a 64-byte header, a typed payload, an optional second payload, and a
//! trailing checksum.
//!
//! # Reading
//!
//! Use a [Reader] to pull logical records off a file. Ping-associated
//! records are grouped: one [Event::Ping] stands for every record of that
//! ping, deposited together in the reader's [Store]:
//!
//! ```no_run
//! use s7k::{Event, Reader};
//!
//! let mut reader = Reader::from_path("survey.s7k").unwrap();
//! while let Some(event) = reader.read_next().unwrap() {
//!     if let Event::Ping = event {
//!         let bathymetry = &reader.store().raw_detection;
//!         println!("ping {}", bathymetry.ping_number);
//!     }
//! }
//! ```
//!
//! # Writing
//!
//! A [Writer] accepts [Store] snapshots. When the writer closes it appends a
//! catalog of everything it wrote and patches the file header to point at
//! it, which is what lets readers iterate the file in canonical order:
//!
//! ```
//! use std::io::Cursor;
//! use s7k::{RecordKind, RecordType, Store, Time7k, Writer};
//!
//! let mut writer = Writer::new(Cursor::new(Vec::new())).unwrap();
//! let mut store = Store::new();
//! store.time = Time7k { year: 2021, day: 100, ..Default::default() };
//! store.kind = RecordKind::Comment;
//! store.record_type = RecordType::SystemEventMessage;
//! store.system_event_message.message = "line start".to_string();
//! writer.write(&store).unwrap();
//! writer.close().unwrap();
//! ```
//!
//! The `Drop` implementation closes the writer and logs failures instead of
//! panicking; close explicitly if you need the error.

#![deny(
    missing_docs,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications
)]

pub mod records;

mod catalog;
mod channels;
mod cursor;
mod error;
mod framer;
mod header;
mod info;
mod ping;
mod reader;
mod record;
mod store;
mod time;
mod writer;

pub use catalog::{Catalog, CatalogEntry};
pub use channels::{AttitudeFeedSample, Feed, Feeds, NavSample, ScalarSample};
pub use cursor::{ReadCursor, WriteCursor};
pub use error::{Error, ErrorClass};
pub use header::{Header, MAX_RECORD_SIZE, SYNC_PATTERN};
pub use info::{FormatInfo, MAX_BEAMS, MAX_PIXELS, SourcePreference, format_info};
pub use reader::{Event, Reader};
pub use record::{PING_RECORD_ORDER, RecordKind, RecordType};
pub use records::Samples;
pub use store::{PingFlags, Store};
pub use time::Time7k;
pub use writer::Writer;

/// Crate-specific result type.
pub type Result<T> = std::result::Result<T, Error>;
