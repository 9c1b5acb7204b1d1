//! The end-of-file record index.
//!
//! A well-formed file closes with a catalog record (7300) listing every
//! record written before it, and the file header's optional data points at
//! it. Readers use the catalog to iterate records in a canonical order
//! instead of raw byte order: the file header first, then comments, source
//! version, and configuration, then everything else chronologically with
//! each ping's records grouped in a fixed order.

use log::warn;
use std::cmp::Ordering;

use crate::cursor::grow_exact;
use crate::header::{CHECKSUM_SIZE, HEADER_SIZE, Header};
use crate::record::RecordType;
use crate::records::{FrameBuilder, body_cursor, finish_decode};
use crate::{Result, Time7k};

/// The wire size of one catalog entry.
pub const ENTRY_SIZE: usize = 48;

/// The wire size of the catalog's table header.
const TABLE_HEADER_SIZE: usize = 14;

/// Everything in a catalog record that is not entries: record header, table
/// header, and checksum.
const RECORD_OVERHEAD: u32 = (HEADER_SIZE + TABLE_HEADER_SIZE + CHECKSUM_SIZE) as u32;

/// Years outside this range mark a catalog entry as garbage.
const YEAR_RANGE: std::ops::RangeInclusive<u16> = 1970..=2030;

/// One catalog entry, describing one record in the file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CatalogEntry {
    /// Total size of the record, bytes.
    pub size: u32,
    /// Absolute file offset of the record.
    pub offset: u64,
    /// The record type.
    pub record_type: u16,
    /// The producing device.
    pub device_id: u16,
    /// The subsystem enumerator.
    pub system_enumerator: u16,
    /// Time of the record.
    pub time: Time7k,
    /// One for ping-associated records, zero otherwise.
    pub record_count: u32,
    /// Position in the canonical order, assigned after sorting.
    pub sequence: u32,
}

impl CatalogEntry {
    /// The typed record type, if the entry names a whitelisted one.
    pub fn record_type(&self) -> Option<RecordType> {
        RecordType::from_u32(u32::from(self.record_type))
    }

    /// True when the entry describes a ping-associated record.
    pub fn is_ping_record(&self) -> bool {
        self.record_type()
            .is_some_and(|record_type| record_type.is_ping_record())
    }

    /// The entry's time as epoch seconds.
    pub fn timestamp(&self) -> f64 {
        self.time.as_epoch_seconds()
    }

    fn sort_class(&self) -> u8 {
        match self.record_type() {
            Some(RecordType::FileHeader) => 0,
            Some(RecordType::SystemEventMessage) => 1,
            Some(RecordType::SonarSourceVersion) => 2,
            Some(RecordType::Configuration) => 3,
            _ => 4,
        }
    }
}

/// Compares two entries in the canonical read order.
pub(crate) fn canonical_cmp(a: &CatalogEntry, b: &CatalogEntry) -> Ordering {
    let class = a.sort_class().cmp(&b.sort_class());
    if class != Ordering::Equal {
        return class;
    }
    let time = a.timestamp().total_cmp(&b.timestamp());
    if time != Ordering::Equal {
        return time;
    }
    if a.is_ping_record() && b.is_ping_record() {
        // same ping; the fixed intra-ping order decides
        let rank_a = a.record_type().map(|t| t.ping_rank()).unwrap_or(usize::MAX);
        let rank_b = b.record_type().map(|t| t.ping_rank()).unwrap_or(usize::MAX);
        rank_a.cmp(&rank_b)
    } else {
        Ordering::Equal
    }
}

/// An in-memory file catalog.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    /// Catalog format version.
    pub version: u16,
    /// The entries, in wire order until [sanitize](Catalog::sanitize) runs.
    pub entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Records one written record, for the write-side catalog.
    pub(crate) fn push(&mut self, header: &Header, offset: u64) {
        let is_ping = header
            .record_type()
            .is_some_and(|record_type| record_type.is_ping_record());
        self.entries.push(CatalogEntry {
            size: header.size,
            offset,
            record_type: header.record_type as u16,
            device_id: header.device_id as u16,
            system_enumerator: header.system_enumerator,
            time: header.time,
            record_count: u32::from(is_ping),
            sequence: self.entries.len() as u32,
        });
    }

    /// Drops garbage entries and sorts the rest into canonical order.
    ///
    /// Entries with a year outside 1970-2030 are silently unreliable and are
    /// removed before sorting; the drop is diagnosed but not an error.
    pub(crate) fn sanitize(&mut self) {
        let before = self.entries.len();
        self.entries
            .retain(|entry| YEAR_RANGE.contains(&entry.time.year));
        let dropped = before - self.entries.len();
        if dropped > 0 {
            warn!("dropped {dropped} catalog entries with unreasonable timestamps");
        }
        self.entries.sort_by(canonical_cmp);
        for (sequence, entry) in self.entries.iter_mut().enumerate() {
            entry.sequence = sequence as u32;
        }
    }

    /// The total size of this catalog as a serialized record.
    pub fn record_size(&self) -> u32 {
        RECORD_OVERHEAD + (self.entries.len() * ENTRY_SIZE) as u32
    }

    /// Interprets a file header's catalog-size field.
    ///
    /// Some producers record the bare entry list (48 bytes per entry) rather
    /// than the whole record; an exact multiple of the entry size marks that
    /// convention and the record overhead is added back.
    pub fn normalize_size(catalog_size: u32) -> u32 {
        if catalog_size % ENTRY_SIZE as u32 == 0 {
            catalog_size + RECORD_OVERHEAD
        } else {
            catalog_size
        }
    }

    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        let _entry_size = cursor.get_u32()?;
        self.version = cursor.get_u16()?;
        let n = cursor.get_u32()?;
        cursor.skip(4)?; // reserved
        grow_exact(&mut self.entries, n as usize)?;
        for (sequence, entry) in self.entries.iter_mut().enumerate() {
            entry.size = cursor.get_u32()?;
            entry.offset = cursor.get_u64()?;
            entry.record_type = cursor.get_u16()?;
            entry.device_id = cursor.get_u16()?;
            entry.system_enumerator = cursor.get_u16()?;
            let time = cursor.get_slice(10)?;
            entry.time = Time7k::read_from(time)?;
            entry.record_count = cursor.get_u32()?;
            cursor.skip(16)?; // reserved
            entry.sequence = sequence as u32;
        }
        finish_decode(&cursor, header, RecordType::FileCatalog)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        cursor.put_u32(ENTRY_SIZE as u32);
        cursor.put_u16(self.version);
        cursor.put_u32(self.entries.len() as u32);
        cursor.put_bytes(&[0; 4]);
        for entry in &self.entries {
            cursor.put_u32(entry.size);
            cursor.put_u64(entry.offset);
            cursor.put_u16(entry.record_type);
            cursor.put_u16(entry.device_id);
            cursor.put_u16(entry.system_enumerator);
            let mut time = Vec::with_capacity(10);
            entry.time.write_to(&mut time)?;
            cursor.put_bytes(&time);
            cursor.put_u32(entry.record_count);
            cursor.put_bytes(&[0; 16]);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::test_support::{build_frame, frame_header};

    fn entry(record_type: RecordType, year: u16, seconds: f32) -> CatalogEntry {
        CatalogEntry {
            size: 100,
            record_type: record_type as u16,
            time: Time7k {
                year,
                day: 100,
                seconds,
                ..Default::default()
            },
            record_count: u32::from(record_type.is_ping_record()),
            ..Default::default()
        }
    }

    #[test]
    fn roundtrip() {
        let mut catalog = Catalog {
            version: 1,
            entries: vec![
                entry(RecordType::FileHeader, 2021, 0.),
                entry(RecordType::SonarSettings, 2021, 1.),
            ],
        };
        // sequence numbers are derived, not wire data
        catalog.entries[1].sequence = 1;
        let catalog = catalog;
        let frame = build_frame(RecordType::FileCatalog, |b| catalog.encode(b));
        assert_eq!(catalog.record_size() as usize, frame.len());
        let header = frame_header(&frame);
        let mut decoded = Catalog::default();
        decoded.decode(&header, &frame).unwrap();
        assert_eq!(catalog, decoded);
    }

    #[test]
    fn canonical_order_promotes_file_header_and_comments() {
        let mut catalog = Catalog {
            version: 1,
            entries: vec![
                entry(RecordType::Position, 2021, 5.),
                entry(RecordType::SystemEventMessage, 2021, 30.),
                entry(RecordType::Configuration, 2021, 2.),
                entry(RecordType::SystemEventMessage, 2021, 10.),
                entry(RecordType::FileHeader, 2021, 50.),
                entry(RecordType::SonarSourceVersion, 2021, 3.),
            ],
        };
        catalog.sanitize();
        let order: Vec<u16> = catalog.entries.iter().map(|e| e.record_type).collect();
        assert_eq!(
            vec![
                RecordType::FileHeader as u16,
                RecordType::SystemEventMessage as u16,
                RecordType::SystemEventMessage as u16,
                RecordType::SonarSourceVersion as u16,
                RecordType::Configuration as u16,
                RecordType::Position as u16,
            ],
            order
        );
        // the two comments stay chronological between themselves
        assert_eq!(10., catalog.entries[1].time.seconds);
        assert_eq!(30., catalog.entries[2].time.seconds);
        let sequences: Vec<u32> = catalog.entries.iter().map(|e| e.sequence).collect();
        assert_eq!(vec![0, 1, 2, 3, 4, 5], sequences);
    }

    #[test]
    fn same_ping_records_group_in_intra_ping_order() {
        let mut catalog = Catalog {
            version: 1,
            entries: vec![
                entry(RecordType::Bathymetry, 2021, 1.),
                entry(RecordType::SonarSettings, 2021, 2.),
                entry(RecordType::RawDetection, 2021, 1.),
                entry(RecordType::SonarSettings, 2021, 1.),
            ],
        };
        catalog.sanitize();
        let order: Vec<u16> = catalog.entries.iter().map(|e| e.record_type).collect();
        assert_eq!(
            vec![
                RecordType::SonarSettings as u16, // ping at t=1
                RecordType::RawDetection as u16,
                RecordType::Bathymetry as u16,
                RecordType::SonarSettings as u16, // ping at t=2
            ],
            order
        );
    }

    #[test]
    fn unreasonable_years_are_dropped() {
        let mut catalog = Catalog {
            version: 1,
            entries: vec![
                entry(RecordType::SonarSettings, 2021, 1.),
                entry(RecordType::SonarSettings, 2215, 2.),
                entry(RecordType::SonarSettings, 1969, 3.),
            ],
        };
        catalog.sanitize();
        assert_eq!(1, catalog.entries.len());
        assert_eq!(2021, catalog.entries[0].time.year);
    }

    #[test]
    fn bare_list_sizes_are_normalized() {
        // three entries recorded as a bare list
        assert_eq!(3 * 48 + 82, Catalog::normalize_size(3 * 48));
        // a full record size passes through
        assert_eq!(82 + 48, Catalog::normalize_size(82 + 48));
        // an empty catalog recorded as zero
        assert_eq!(82, Catalog::normalize_size(0));
    }
}
