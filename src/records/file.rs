//! The file-level header record.

use super::{FrameBuilder, body_cursor, finish_decode, get_str, put_str};
use crate::cursor::grow_exact;
use crate::header::Header;
use crate::record::RecordType;
use crate::Result;
use uuid::Uuid;

/// One subsystem listed by the file header.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DeviceEntry {
    /// Device identifier.
    pub device_id: u32,
    /// Subsystem enumerator.
    pub system_enumerator: u16,
}

/// The first record of a well-formed file (7200).
///
/// Lists the recording session's subsystems and, in its optional-data
/// section, points at the end-of-file catalog. A zero catalog offset means
/// the file has no catalog and must be read sequentially.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FileHeader {
    /// File identifier.
    pub file_id: Uuid,
    /// Version of the file format.
    pub version: u16,
    #[allow(missing_docs)]
    pub reserved: u16,
    /// Recording session identifier.
    pub session_id: Uuid,
    /// Size of the record data section.
    pub record_data_size: u32,
    /// Number of subsystems.
    pub number_devices: u32,
    /// Name of the recording program.
    pub recording_name: String,
    /// Version of the recording program.
    pub recording_version: String,
    /// Operator-defined name.
    pub user_defined_name: String,
    /// Operator notes.
    pub notes: String,
    /// The subsystems.
    pub devices: Vec<DeviceEntry>,
    /// Whether the catalog pointer section was present.
    pub optional_data: bool,
    /// Size of the file catalog record, bytes.
    pub catalog_size: u32,
    /// File offset of the catalog record, bytes.
    pub catalog_offset: u64,
}

impl FileHeader {
    /// The optional-data identifier of the catalog pointer section.
    pub const CATALOG_POINTER_ID: u32 = RecordType::FileCatalog as u32;

    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        let mut uuid = [0u8; 16];
        cursor.get_bytes(&mut uuid)?;
        self.file_id = Uuid::from_bytes(uuid);
        self.version = cursor.get_u16()?;
        self.reserved = cursor.get_u16()?;
        cursor.get_bytes(&mut uuid)?;
        self.session_id = Uuid::from_bytes(uuid);
        self.record_data_size = cursor.get_u32()?;
        self.number_devices = cursor.get_u32()?;
        self.recording_name = get_str(&mut cursor, 64)?;
        self.recording_version = get_str(&mut cursor, 16)?;
        self.user_defined_name = get_str(&mut cursor, 64)?;
        self.notes = get_str(&mut cursor, 128)?;
        grow_exact(&mut self.devices, self.number_devices as usize)?;
        for device in &mut self.devices {
            device.device_id = cursor.get_u32()?;
            device.system_enumerator = cursor.get_u16()?;
        }
        if header.optional_data_offset != 0 {
            cursor.seek(header.optional_data_offset as usize)?;
            self.optional_data = true;
            self.catalog_size = cursor.get_u32()?;
            self.catalog_offset = cursor.get_u64()?;
        } else {
            self.optional_data = false;
            self.catalog_size = 0;
            self.catalog_offset = 0;
        }
        finish_decode(&cursor, header, RecordType::FileHeader)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        cursor.put_bytes(self.file_id.as_bytes());
        cursor.put_u16(self.version);
        cursor.put_u16(self.reserved);
        cursor.put_bytes(self.session_id.as_bytes());
        cursor.put_u32(self.record_data_size);
        cursor.put_u32(self.number_devices);
        put_str(cursor, &self.recording_name, 64);
        put_str(cursor, &self.recording_version, 16);
        put_str(cursor, &self.user_defined_name, 64);
        put_str(cursor, &self.notes, 128);
        for device in &self.devices {
            cursor.put_u32(device.device_id);
            cursor.put_u16(device.system_enumerator);
        }
        // The catalog pointer is always emitted so the writer can patch it
        // in place when the file closes.
        builder.begin_optional(Self::CATALOG_POINTER_ID);
        let cursor = builder.cursor();
        cursor.put_u32(self.catalog_size);
        cursor.put_u64(self.catalog_offset);
        Ok(())
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::test_support::{build_frame, frame_header};

    #[test]
    fn roundtrip_with_devices() {
        let file_header = FileHeader {
            file_id: Uuid::from_bytes([1; 16]),
            version: 1,
            session_id: Uuid::from_bytes([2; 16]),
            number_devices: 2,
            recording_name: "hydrographic recorder".to_string(),
            recording_version: "4.2".to_string(),
            user_defined_name: "line 7".to_string(),
            notes: "calm seas".to_string(),
            devices: vec![
                DeviceEntry {
                    device_id: 7125,
                    system_enumerator: 0,
                },
                DeviceEntry {
                    device_id: 7125,
                    system_enumerator: 1,
                },
            ],
            optional_data: true,
            catalog_size: 0,
            catalog_offset: 0,
            ..Default::default()
        };
        let frame = build_frame(RecordType::FileHeader, |b| file_header.encode(b));
        let header = frame_header(&frame);
        // fixed prefix plus two device entries
        assert_eq!(380 + 12, header.optional_data_offset);
        let mut decoded = FileHeader::default();
        decoded.decode(&header, &frame).unwrap();
        assert_eq!(file_header, decoded);
    }

    #[test]
    fn catalog_pointer_closes_out_the_record() {
        let file_header = FileHeader::default();
        let frame = build_frame(RecordType::FileHeader, |b| file_header.encode(b));
        let header = frame_header(&frame);
        // 4-byte size + 8-byte offset + trailing checksum close out the record
        let pointer = header.optional_data_offset as usize;
        assert_eq!(pointer + 4 + 8 + 4, header.size as usize);
    }
}
