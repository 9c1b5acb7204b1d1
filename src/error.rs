//! Crate-specific errors.

use crate::record::RecordType;
use std::collections::TryReserveError;
use thiserror::Error;

/// Crate-specific errors.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The sync pattern at offset 4 of the record header was wrong.
    #[error("invalid sync pattern: {found:#010x}")]
    InvalidSync {
        /// The value found where the sync pattern should be.
        found: u32,
    },

    /// The record type is not in the format's whitelist.
    #[error("unknown record type: {0}")]
    UnknownRecordType(u32),

    /// The declared record size cannot hold a header and checksum, or is
    /// implausibly large.
    #[error("unreasonable size {size} for record type {record_type}")]
    InvalidRecordSize {
        /// The record type from the header prefix.
        record_type: u32,
        /// The declared total record size.
        size: u32,
    },

    /// A read or write ran past the end of a record buffer.
    #[error("record truncated: {needed} bytes needed at position {position}, {available} left")]
    TruncatedRecord {
        /// The cursor position where the access started.
        position: usize,
        /// The number of bytes the access needed.
        needed: usize,
        /// The number of bytes left in the buffer.
        available: usize,
    },

    /// Decoding a record body did not end at the position the header declares.
    #[error("{record_type:?} decode ended at {actual}, header declares {expected}")]
    SizeMismatch {
        /// The record being decoded.
        record_type: RecordType,
        /// The pre-checksum position the header declares.
        expected: usize,
        /// The position the decoder actually ended at.
        actual: usize,
    },

    /// A raw-detection beam descriptor exceeds the beam limit.
    ///
    /// The record is structurally valid but semantically impossible.
    #[error("beam descriptor {beam} exceeds the {max}-beam limit")]
    BeamDescriptor {
        /// The offending beam descriptor.
        beam: u16,
        /// The maximum number of beams the sonar family supports.
        max: u16,
    },

    /// A record selects a sample width the format does not define.
    #[error("{record_type:?} selects an undefined {width}-byte sample width")]
    SampleWidth {
        /// The record carrying the width selector.
        record_type: RecordType,
        /// The selected bytes-per-sample.
        width: u8,
    },

    /// Wrapper around `std::io::Error`.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Growing a variable-length record buffer failed.
    ///
    /// The affected buffer has been reset to zero length and capacity.
    #[error("out of memory growing a record buffer: {0}")]
    OutOfMemory(#[from] TryReserveError),

    /// Clean end of the input stream.
    #[error("end of stream")]
    Eof,

    /// The writer is closed.
    #[error("the writer is closed")]
    ClosedWriter,

    /// Too many comments were buffered before the first data record.
    #[error("comment buffer full: {0} comments pending before the file header")]
    CommentBufferFull(usize),
}

/// The failure classes of the format.
///
/// Each [Error] variant belongs to exactly one class; callers that only care
/// about the coarse taxonomy can match on [Error::class].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    /// Sync, whitelist, or size problems discovered while framing or decoding.
    BadFrame,
    /// Structurally valid but semantically impossible records.
    Unintelligible,
    /// Underlying reader or writer failure.
    Io,
    /// Buffer growth failed.
    OutOfMemory,
    /// Clean end of input.
    Eof,
}

impl Error {
    /// Returns the failure class of this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use s7k::{Error, ErrorClass};
    /// assert_eq!(ErrorClass::BadFrame, Error::UnknownRecordType(42).class());
    /// ```
    pub fn class(&self) -> ErrorClass {
        match self {
            Error::InvalidSync { .. }
            | Error::UnknownRecordType(_)
            | Error::InvalidRecordSize { .. }
            | Error::TruncatedRecord { .. }
            | Error::SizeMismatch { .. } => ErrorClass::BadFrame,
            Error::BeamDescriptor { .. } | Error::SampleWidth { .. } => ErrorClass::Unintelligible,
            Error::Io(_) | Error::ClosedWriter | Error::CommentBufferFull(_) => ErrorClass::Io,
            Error::OutOfMemory(_) => ErrorClass::OutOfMemory,
            Error::Eof => ErrorClass::Eof,
        }
    }

    /// Returns true if this error is a clean end of input.
    pub fn is_eof(&self) -> bool {
        matches!(self, Error::Eof)
    }
}
