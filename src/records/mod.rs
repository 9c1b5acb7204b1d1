//! Per-record-type payload codecs.
//!
//! Every record type gets a struct owned by the [Store](crate::Store), with a
//! `decode` that parses a framed record buffer into it (reusing array
//! capacity across pings) and an `encode` that serializes it into a
//! [FrameBuilder]. Shared conventions:
//!
//! - the type-specific payload starts at byte 64 of the record;
//! - optional-data sections live at the absolute offset the header declares,
//!   and each record with one carries an `optional_data` flag;
//! - after decoding, the cursor must sit exactly at the pre-checksum
//!   position, or the record is rejected as a bad frame.

mod aux;
mod detection;
mod file;
mod samples;
mod snippet;
mod sonar;
mod system;
mod wcolumn;

pub use aux::{
    Altitude, Attitude, AttitudeSample, Ctd, CtdSample, CustomAttitude, Depth, Geodesy, Heading,
    MotionOverGround, Navigation, PanTilt, Position, ReferencePoint, RollPitchHeave, SensorOffset,
    SoundVelocityProfile, SurveyLine, Tide,
};
pub use detection::{RawDetection, RawDetectionBeam, RxDetection, SegmentedRawDetection, TxSegment};
pub use file::{DeviceEntry, FileHeader};
pub use samples::{SampleKind, Samples};
pub use snippet::{
    CalibratedBeam, CalibratedSideScan, ProcessedSideScan, Snippet, SnippetBackscatteringStrength,
    SnippetWindow,
};
pub use sonar::{
    AdaptiveGate, Bathymetry, BeamGeometry, DetectionDataSetup, DetectionSetupBeam, Image,
    MatchFilter, PingMotion, RemoteControlSonarSettings, SideScan, SonarSettings, Tvg,
    VerticalDepth,
};
pub use system::{
    AbsorptionLoss, CalibrationStatus, Configuration, ConfigurationDevice,
    InstallationParameters, OpaqueRecord, SonarSourceVersion, SoundVelocity, SpreadingLoss,
    SystemEventMessage, TimeMessage,
};
pub use wcolumn::{
    Beamformed, CompressedBeamformedMagnitude, CompressedWaterColumn, CompressedWaterColumnBeam,
    VernierProcessingDataFiltered, VernierProcessingDataRaw, WaterColumn, WaterColumnBeam,
};

use crate::cursor::{ReadCursor, WriteCursor};
use crate::header::{self, CHECKSUM_SIZE, HEADER_SIZE, Header};
use crate::record::RecordType;
use crate::{Error, Result};

/// Positions a cursor at the start of a record's type-specific payload.
pub(crate) fn body_cursor(frame: &[u8]) -> Result<ReadCursor<'_>> {
    let mut cursor = ReadCursor::new(frame);
    cursor.seek(HEADER_SIZE)?;
    Ok(cursor)
}

/// Checks that a decoder consumed the record exactly.
///
/// The cursor must sit at the pre-checksum position the header declares.
pub(crate) fn finish_decode(
    cursor: &ReadCursor<'_>,
    header: &Header,
    record_type: RecordType,
) -> Result<()> {
    let expected = header.size as usize - CHECKSUM_SIZE;
    if cursor.position() != expected {
        return Err(Error::SizeMismatch {
            record_type,
            expected,
            actual: cursor.position(),
        });
    }
    Ok(())
}

/// Serializes one record: header, payload, optional data, checksum.
///
/// The builder reserves space for the header, lets the record codec write the
/// payload, then [finish](FrameBuilder::finish) patches the size field and
/// appends the checksum.
#[derive(Debug)]
pub(crate) struct FrameBuilder {
    header: Header,
    cursor: WriteCursor,
}

impl FrameBuilder {
    pub fn new(header: Header) -> FrameBuilder {
        let mut cursor = WriteCursor::new();
        cursor.put_bytes(&[0; HEADER_SIZE]);
        FrameBuilder { header, cursor }
    }

    pub fn cursor(&mut self) -> &mut WriteCursor {
        &mut self.cursor
    }

    pub fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    /// Marks the current position as the start of the optional-data section.
    pub fn begin_optional(&mut self, id: u32) {
        self.header.optional_data_offset = self.cursor.position() as u32;
        self.header.optional_data_id = id;
    }

    /// Patches the header and appends the checksum, returning the frame.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        self.header.offset = header::HEADER_OFFSET;
        self.header.size = (self.cursor.len() + CHECKSUM_SIZE) as u32;
        self.header.flags |= header::FLAG_CHECKSUM_VALID;
        let end = self.cursor.len();
        self.cursor.seek(0)?;
        let mut head = [0u8; HEADER_SIZE];
        self.header.write_to(&mut head[..])?;
        self.cursor.put_bytes(&head);
        self.cursor.seek(end)?;
        let sum = header::checksum(self.cursor.as_slice());
        self.cursor.put_u32(sum);
        Ok(self.cursor.into_inner())
    }
}

/// Reads a NUL-padded fixed-size string field.
pub(crate) fn get_str(cursor: &mut ReadCursor<'_>, len: usize) -> Result<String> {
    let bytes = cursor.get_slice(len)?;
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(len);
    Ok(String::from_utf8_lossy(&bytes[..end]).into_owned())
}

/// Writes a string into a NUL-padded fixed-size field, truncating if needed.
pub(crate) fn put_str(cursor: &mut WriteCursor, s: &str, len: usize) {
    let mut field = vec![0u8; len];
    let bytes = s.as_bytes();
    let n = bytes.len().min(len);
    field[..n].copy_from_slice(&bytes[..n]);
    cursor.put_bytes(&field);
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::Time7k;

    #[test]
    fn frame_builder_patches_size_and_checksum() {
        let mut builder = FrameBuilder::new(Header::new(
            RecordType::SystemEventMessage,
            Time7k::default(),
        ));
        builder.cursor().put_u32(0xAABBCCDD);
        let frame = builder.finish().unwrap();
        assert_eq!(HEADER_SIZE + 4 + CHECKSUM_SIZE, frame.len());

        let header = Header::read_from(&frame[..]).unwrap();
        assert_eq!(frame.len() as u32, header.size);
        assert!(header.has_checksum());

        let declared = u32::from_le_bytes(frame[frame.len() - 4..].try_into().unwrap());
        assert_eq!(header::checksum(&frame[..frame.len() - 4]), declared);
    }

    #[test]
    fn optional_offset_recorded() {
        let mut builder =
            FrameBuilder::new(Header::new(RecordType::RawDetection, Time7k::default()));
        builder.cursor().put_u64(1);
        builder.begin_optional(7027);
        builder.cursor().put_f32(2.);
        let frame = builder.finish().unwrap();
        let header = Header::read_from(&frame[..]).unwrap();
        assert_eq!(72, header.optional_data_offset);
        assert_eq!(7027, header.optional_data_id);
    }

    #[test]
    fn str_field_roundtrip() {
        let mut write = WriteCursor::new();
        put_str(&mut write, "SONAR", 16);
        let buf = write.into_inner();
        assert_eq!(16, buf.len());
        let mut read = ReadCursor::new(&buf);
        assert_eq!("SONAR", get_str(&mut read, 16).unwrap());
    }
}
