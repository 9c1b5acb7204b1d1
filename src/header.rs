//! The fixed 64-byte record header.
//!
//! Every record in a 7k stream opens with the same header: protocol fields,
//! the sync pattern, the total record size, a pointer to the optional-data
//! section, a timestamp, and the record type. The payload always starts at
//! byte 64 and the record always closes with a 4-byte checksum.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

use crate::record::RecordType;
use crate::{Error, Result, Time7k};

/// The sync pattern found at offset 4 of every record.
pub const SYNC_PATTERN: u32 = 0x0000_FFFF;

/// The wire size of the record header, in bytes.
pub const HEADER_SIZE: usize = 64;

/// The number of header bytes needed to classify a record.
pub const PREFIX_SIZE: usize = 48;

/// The value of the header's offset field.
///
/// The type-specific payload starts at `HEADER_OFFSET + 4`, i.e. byte 64,
/// skipping the size field that follows the header proper.
pub const HEADER_OFFSET: u16 = 60;

/// The size of the trailing checksum, in bytes.
pub const CHECKSUM_SIZE: usize = 4;

/// The smallest legal record: a header and a checksum.
pub const MIN_RECORD_SIZE: u32 = (HEADER_SIZE + CHECKSUM_SIZE) as u32;

/// Upper bound on a record's declared size, used to reject garbage framing.
pub const MAX_RECORD_SIZE: u32 = 1 << 24;

/// Header flag bit marking the trailing checksum as valid.
pub const FLAG_CHECKSUM_VALID: u16 = 0x0001;

/// A record header.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Header {
    /// Protocol version of the producing system.
    pub protocol_version: u16,
    /// Offset from the sync pattern to the payload size field, always 60.
    pub offset: u16,
    /// Total record size in bytes, including this header and the checksum.
    pub size: u32,
    /// Absolute offset of the optional-data section within the record, zero
    /// when the record has none.
    pub optional_data_offset: u32,
    /// Identifier of the optional-data section.
    pub optional_data_id: u32,
    /// Time of the record's event.
    pub time: Time7k,
    /// Version of the record-type-specific layout.
    pub record_version: u16,
    /// The record type.
    pub record_type: u32,
    /// Identifier of the producing device.
    pub device_id: u32,
    #[allow(missing_docs)]
    pub reserved: u16,
    /// Subsystem enumerator, distinguishing heads of a multi-head sonar.
    pub system_enumerator: u16,
    #[allow(missing_docs)]
    pub reserved2: u32,
    /// Record flags; bit 0 marks the checksum as valid.
    pub flags: u16,
    #[allow(missing_docs)]
    pub reserved3: u16,
    #[allow(missing_docs)]
    pub reserved4: u32,
    /// Total fragments when the record is fragmented, zero otherwise.
    pub total_fragments: u32,
    /// Fragment number when the record is fragmented.
    pub fragment_number: u32,
}

/// The classification fields of a record, parsed from its first 48 bytes.
///
/// The sync scanner uses this to accept or reject a candidate frame without
/// consuming a full header.
#[derive(Clone, Copy, Debug)]
pub struct Prefix {
    /// The record type.
    pub record_type: RecordType,
    /// The producing device.
    pub device_id: u32,
    /// The subsystem enumerator.
    pub system_enumerator: u16,
    /// The total record size.
    pub size: u32,
}

impl Header {
    /// Creates a header for a record of the given type and time.
    ///
    /// The size field is zero; the frame serializer fills it in.
    ///
    /// # Examples
    ///
    /// ```
    /// use s7k::{Header, RecordType, Time7k};
    /// let header = Header::new(RecordType::SonarSettings, Time7k::default());
    /// assert_eq!(7000, header.record_type);
    /// ```
    pub fn new(record_type: RecordType, time: Time7k) -> Header {
        Header {
            protocol_version: 5,
            offset: HEADER_OFFSET,
            time,
            record_type: record_type as u32,
            flags: FLAG_CHECKSUM_VALID,
            ..Default::default()
        }
    }

    /// Reads a header.
    ///
    /// Reads exactly 64 bytes and applies the protocol-version-2 fix-up: v2
    /// producers stored the system enumerator in the reserved field.
    pub fn read_from<R: Read>(mut read: R) -> Result<Header> {
        let protocol_version = read.read_u16::<LittleEndian>()?;
        let offset = read.read_u16::<LittleEndian>()?;
        let sync = read.read_u32::<LittleEndian>()?;
        if sync != SYNC_PATTERN {
            return Err(Error::InvalidSync { found: sync });
        }
        let mut header = Header {
            protocol_version,
            offset,
            size: read.read_u32::<LittleEndian>()?,
            optional_data_offset: read.read_u32::<LittleEndian>()?,
            optional_data_id: read.read_u32::<LittleEndian>()?,
            time: Time7k::read_from(&mut read)?,
            record_version: read.read_u16::<LittleEndian>()?,
            record_type: read.read_u32::<LittleEndian>()?,
            device_id: read.read_u32::<LittleEndian>()?,
            reserved: read.read_u16::<LittleEndian>()?,
            system_enumerator: read.read_u16::<LittleEndian>()?,
            reserved2: read.read_u32::<LittleEndian>()?,
            flags: read.read_u16::<LittleEndian>()?,
            reserved3: read.read_u16::<LittleEndian>()?,
            reserved4: read.read_u32::<LittleEndian>()?,
            total_fragments: read.read_u32::<LittleEndian>()?,
            fragment_number: read.read_u32::<LittleEndian>()?,
        };
        if header.protocol_version == 2 {
            header.system_enumerator = header.reserved;
        }
        Ok(header)
    }

    /// Writes a header, exactly 64 bytes.
    pub fn write_to<W: Write>(&self, mut write: W) -> Result<()> {
        write.write_u16::<LittleEndian>(self.protocol_version)?;
        write.write_u16::<LittleEndian>(self.offset)?;
        write.write_u32::<LittleEndian>(SYNC_PATTERN)?;
        write.write_u32::<LittleEndian>(self.size)?;
        write.write_u32::<LittleEndian>(self.optional_data_offset)?;
        write.write_u32::<LittleEndian>(self.optional_data_id)?;
        self.time.write_to(&mut write)?;
        write.write_u16::<LittleEndian>(self.record_version)?;
        write.write_u32::<LittleEndian>(self.record_type)?;
        write.write_u32::<LittleEndian>(self.device_id)?;
        write.write_u16::<LittleEndian>(self.reserved)?;
        write.write_u16::<LittleEndian>(self.system_enumerator)?;
        write.write_u32::<LittleEndian>(self.reserved2)?;
        write.write_u16::<LittleEndian>(self.flags)?;
        write.write_u16::<LittleEndian>(self.reserved3)?;
        write.write_u32::<LittleEndian>(self.reserved4)?;
        write.write_u32::<LittleEndian>(self.total_fragments)?;
        write.write_u32::<LittleEndian>(self.fragment_number)?;
        Ok(())
    }

    /// Returns the typed record type, if it is in the whitelist.
    pub fn record_type(&self) -> Option<RecordType> {
        RecordType::from_u32(self.record_type)
    }

    /// Returns true if this record declares a valid trailing checksum.
    pub fn has_checksum(&self) -> bool {
        self.flags & FLAG_CHECKSUM_VALID != 0
    }
}

/// Validates the sync pattern and record type of a 48-byte header prefix.
///
/// This is the sync scanner's accept test; it also sanity-checks the declared
/// size so garbage that happens to contain the sync pattern is rejected.
pub fn peek(prefix: &[u8; PREFIX_SIZE]) -> Result<Prefix> {
    let sync = u32::from_le_bytes(prefix[4..8].try_into().unwrap());
    if sync != SYNC_PATTERN {
        return Err(Error::InvalidSync { found: sync });
    }
    let size = u32::from_le_bytes(prefix[8..12].try_into().unwrap());
    let raw_type = u32::from_le_bytes(prefix[32..36].try_into().unwrap());
    let record_type =
        RecordType::from_u32(raw_type).ok_or(Error::UnknownRecordType(raw_type))?;
    if !(MIN_RECORD_SIZE..=MAX_RECORD_SIZE).contains(&size) {
        return Err(Error::InvalidRecordSize {
            record_type: raw_type,
            size,
        });
    }
    let protocol_version = u16::from_le_bytes(prefix[0..2].try_into().unwrap());
    let device_id = u32::from_le_bytes(prefix[36..40].try_into().unwrap());
    let reserved = u16::from_le_bytes(prefix[40..42].try_into().unwrap());
    let mut system_enumerator = u16::from_le_bytes(prefix[42..44].try_into().unwrap());
    if protocol_version == 2 {
        system_enumerator = reserved;
    }
    Ok(Prefix {
        record_type,
        device_id,
        system_enumerator,
        size,
    })
}

/// Computes the record checksum: the sum of all bytes as u8, modulo 2^32.
pub fn checksum(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(0u32, |sum, &byte| sum.wrapping_add(u32::from(byte)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn example() -> Header {
        let mut header = Header::new(
            RecordType::RawDetection,
            Time7k {
                year: 2021,
                day: 200,
                hours: 3,
                minutes: 14,
                seconds: 15.9,
            },
        );
        header.size = 1234;
        header.device_id = 7125;
        header.system_enumerator = 1;
        header
    }

    #[test]
    fn roundtrip() {
        let header = example();
        let mut cursor = Cursor::new(Vec::new());
        header.write_to(&mut cursor).unwrap();
        assert_eq!(HEADER_SIZE, cursor.get_ref().len());
        cursor.set_position(0);
        assert_eq!(header, Header::read_from(cursor).unwrap());
    }

    #[test]
    fn rejects_bad_sync() {
        let header = example();
        let mut cursor = Cursor::new(Vec::new());
        header.write_to(&mut cursor).unwrap();
        cursor.get_mut()[5] = 0;
        cursor.set_position(0);
        assert!(matches!(
            Header::read_from(cursor),
            Err(Error::InvalidSync { .. })
        ));
    }

    #[test]
    fn v2_enumerator_fixup() {
        let mut header = example();
        header.protocol_version = 2;
        header.reserved = 3;
        header.system_enumerator = 0;
        let mut cursor = Cursor::new(Vec::new());
        header.write_to(&mut cursor).unwrap();
        cursor.set_position(0);
        let read = Header::read_from(cursor).unwrap();
        assert_eq!(3, read.system_enumerator);
    }

    #[test]
    fn peek_classifies() {
        let header = example();
        let mut cursor = Cursor::new(Vec::new());
        header.write_to(&mut cursor).unwrap();
        let prefix: [u8; PREFIX_SIZE] = cursor.get_ref()[..PREFIX_SIZE].try_into().unwrap();
        let peeked = peek(&prefix).unwrap();
        assert_eq!(RecordType::RawDetection, peeked.record_type);
        assert_eq!(7125, peeked.device_id);
        assert_eq!(1, peeked.system_enumerator);
        assert_eq!(1234, peeked.size);
    }

    #[test]
    fn peek_rejects_unknown_type() {
        let mut header = example();
        header.record_type = 9999;
        let mut cursor = Cursor::new(Vec::new());
        header.write_to(&mut cursor).unwrap();
        let prefix: [u8; PREFIX_SIZE] = cursor.get_ref()[..PREFIX_SIZE].try_into().unwrap();
        assert!(matches!(
            peek(&prefix),
            Err(Error::UnknownRecordType(9999))
        ));
    }

    #[test]
    fn peek_rejects_unreasonable_size() {
        let mut header = example();
        header.size = 12;
        let mut cursor = Cursor::new(Vec::new());
        header.write_to(&mut cursor).unwrap();
        let prefix: [u8; PREFIX_SIZE] = cursor.get_ref()[..PREFIX_SIZE].try_into().unwrap();
        assert!(matches!(
            peek(&prefix),
            Err(Error::InvalidRecordSize { size: 12, .. })
        ));
    }

    #[test]
    fn checksum_sums_bytes() {
        assert_eq!(0, checksum(&[]));
        assert_eq!(6, checksum(&[1, 2, 3]));
        assert_eq!(510, checksum(&[255, 255]));
    }
}
