//! The per-stream record store.
//!
//! A [Store] holds exactly one instance of every record kind. It is created
//! when a stream opens, reused across every read or write on that stream so
//! variable-length buffers keep their allocations between pings, and dropped
//! at close. Decoding a record mutates the store's instance of that record
//! and updates the `kind`, `record_type`, and timestamp tags; a completed
//! ping is simply the store with its ping flags set.

use crate::catalog::Catalog;
use crate::header::Header;
use crate::record::{PING_RECORD_ORDER, RecordKind, RecordType};
use crate::records::*;
use crate::{Result, Time7k};

/// Which ping-associated records have been seen for the current ping.
///
/// Cleared when a ping is flushed. A ping is complete if and only if one of
/// the two detection records is present.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[allow(missing_docs)]
pub struct PingFlags {
    pub sonar_settings: bool,
    pub remote_control_sonar_settings: bool,
    pub match_filter: bool,
    pub beam_geometry: bool,
    pub bathymetry: bool,
    pub side_scan: bool,
    pub water_column: bool,
    pub vertical_depth: bool,
    pub tvg: bool,
    pub image: bool,
    pub ping_motion: bool,
    pub adaptive_gate: bool,
    pub detection_setup: bool,
    pub beamformed: bool,
    pub vernier_raw: bool,
    pub raw_detection: bool,
    pub snippet: bool,
    pub vernier_filtered: bool,
    pub compressed_beamformed_magnitude: bool,
    pub compressed_water_column: bool,
    pub segmented_raw_detection: bool,
    pub calibrated_beam: bool,
    pub calibrated_side_scan: bool,
    pub snippet_backscatter: bool,
    pub processed_side_scan: bool,
}

impl PingFlags {
    /// Clears every flag, ready for the next ping.
    pub fn clear(&mut self) {
        *self = PingFlags::default();
    }

    /// True when the accumulated ping can be emitted.
    pub fn complete(&self) -> bool {
        self.raw_detection || self.segmented_raw_detection
    }

    /// Marks one record type as seen.
    pub fn set(&mut self, record_type: RecordType) {
        if let Some(flag) = self.flag_mut(record_type) {
            *flag = true;
        }
    }

    /// Whether one record type has been seen.
    pub fn get(&self, record_type: RecordType) -> bool {
        use RecordType::*;
        match record_type {
            SonarSettings => self.sonar_settings,
            RemoteControlSonarSettings => self.remote_control_sonar_settings,
            MatchFilter => self.match_filter,
            BeamGeometry => self.beam_geometry,
            Bathymetry => self.bathymetry,
            SideScan => self.side_scan,
            WaterColumn => self.water_column,
            VerticalDepth => self.vertical_depth,
            Tvg => self.tvg,
            Image => self.image,
            PingMotion => self.ping_motion,
            AdaptiveGate => self.adaptive_gate,
            DetectionDataSetup => self.detection_setup,
            Beamformed => self.beamformed,
            VernierProcessingDataRaw => self.vernier_raw,
            RawDetection => self.raw_detection,
            Snippet => self.snippet,
            VernierProcessingDataFiltered => self.vernier_filtered,
            CompressedBeamformedMagnitude => self.compressed_beamformed_magnitude,
            CompressedWaterColumn => self.compressed_water_column,
            SegmentedRawDetection => self.segmented_raw_detection,
            CalibratedBeam => self.calibrated_beam,
            CalibratedSideScan => self.calibrated_side_scan,
            SnippetBackscatteringStrength => self.snippet_backscatter,
            ProcessedSideScan => self.processed_side_scan,
            _ => false,
        }
    }

    fn flag_mut(&mut self, record_type: RecordType) -> Option<&mut bool> {
        use RecordType::*;
        Some(match record_type {
            SonarSettings => &mut self.sonar_settings,
            RemoteControlSonarSettings => &mut self.remote_control_sonar_settings,
            MatchFilter => &mut self.match_filter,
            BeamGeometry => &mut self.beam_geometry,
            Bathymetry => &mut self.bathymetry,
            SideScan => &mut self.side_scan,
            WaterColumn => &mut self.water_column,
            VerticalDepth => &mut self.vertical_depth,
            Tvg => &mut self.tvg,
            Image => &mut self.image,
            PingMotion => &mut self.ping_motion,
            AdaptiveGate => &mut self.adaptive_gate,
            DetectionDataSetup => &mut self.detection_setup,
            Beamformed => &mut self.beamformed,
            VernierProcessingDataRaw => &mut self.vernier_raw,
            RawDetection => &mut self.raw_detection,
            Snippet => &mut self.snippet,
            VernierProcessingDataFiltered => &mut self.vernier_filtered,
            CompressedBeamformedMagnitude => &mut self.compressed_beamformed_magnitude,
            CompressedWaterColumn => &mut self.compressed_water_column,
            SegmentedRawDetection => &mut self.segmented_raw_detection,
            CalibratedBeam => &mut self.calibrated_beam,
            CalibratedSideScan => &mut self.calibrated_side_scan,
            SnippetBackscatteringStrength => &mut self.snippet_backscatter,
            ProcessedSideScan => &mut self.processed_side_scan,
            _ => return None,
        })
    }
}

/// The in-memory aggregate of the latest instance of every record kind.
#[derive(Clone, Debug, Default)]
#[allow(missing_docs)]
pub struct Store {
    /// Semantic category of the last deposit, the caller's handle.
    pub kind: RecordKind,
    /// Concrete type of the last deposited record.
    pub record_type: RecordType,
    /// Broken-down time of the last deposited record.
    pub time: Time7k,
    /// The same time as epoch seconds.
    pub timestamp: f64,
    /// Device that produced the last record.
    pub device_id: u32,
    /// Subsystem enumerator of the last record.
    pub system_enumerator: u16,
    /// Which ping records are present for the current ping.
    pub ping_flags: PingFlags,

    pub reference_point: ReferencePoint,
    pub uncalibrated_sensor_offset: SensorOffset,
    pub calibrated_sensor_offset: SensorOffset,
    pub position: Position,
    pub custom_attitude: CustomAttitude,
    pub tide: Tide,
    pub altitude: Altitude,
    pub motion_over_ground: MotionOverGround,
    pub depth: Depth,
    pub sound_velocity_profile: SoundVelocityProfile,
    pub ctd: Ctd,
    pub geodesy: Geodesy,
    pub roll_pitch_heave: RollPitchHeave,
    pub heading: Heading,
    pub survey_line: SurveyLine,
    pub navigation: Navigation,
    pub attitude: Attitude,
    pub pan_tilt: PanTilt,
    pub processed_side_scan: ProcessedSideScan,
    pub sonar_settings: SonarSettings,
    pub configuration: Configuration,
    pub match_filter: MatchFilter,
    pub beam_geometry: BeamGeometry,
    pub bathymetry: Bathymetry,
    pub side_scan: SideScan,
    pub water_column: WaterColumn,
    pub vertical_depth: VerticalDepth,
    pub tvg: Tvg,
    pub image: Image,
    pub ping_motion: PingMotion,
    pub adaptive_gate: AdaptiveGate,
    pub detection_setup: DetectionDataSetup,
    pub beamformed: Beamformed,
    pub vernier_raw: VernierProcessingDataRaw,
    pub sonar_source_version: SonarSourceVersion,
    pub raw_detection: RawDetection,
    pub snippet: Snippet,
    pub vernier_filtered: VernierProcessingDataFiltered,
    pub installation_parameters: InstallationParameters,
    pub compressed_beamformed_magnitude: CompressedBeamformedMagnitude,
    pub compressed_water_column: CompressedWaterColumn,
    pub segmented_raw_detection: SegmentedRawDetection,
    pub calibrated_beam: CalibratedBeam,
    pub system_event_message: SystemEventMessage,
    pub rdr_recording_status: OpaqueRecord,
    pub subscriptions: OpaqueRecord,
    pub calibration_status: CalibrationStatus,
    pub calibrated_side_scan: CalibratedSideScan,
    pub snippet_backscatter: SnippetBackscatteringStrength,
    pub file_header: FileHeader,
    /// The latest catalog record decoded from the stream.
    pub file_catalog: Catalog,
    pub time_message: TimeMessage,
    pub remote_control: OpaqueRecord,
    pub remote_control_acknowledge: OpaqueRecord,
    pub remote_control_not_acknowledge: OpaqueRecord,
    pub remote_control_sonar_settings: RemoteControlSonarSettings,
    pub sound_velocity: SoundVelocity,
    pub absorption_loss: AbsorptionLoss,
    pub spreading_loss: SpreadingLoss,
}

impl Store {
    /// Creates an empty store.
    pub fn new() -> Store {
        Store::default()
    }

    /// Decodes a framed record into this store.
    ///
    /// Mutates the record's instance, updates the tag fields, and sets the
    /// ping flag for ping-associated types. Returns the decoded type.
    pub fn decode_record(&mut self, header: &Header, frame: &[u8]) -> Result<RecordType> {
        use RecordType::*;
        let record_type = header
            .record_type()
            .ok_or(crate::Error::UnknownRecordType(header.record_type))?;
        match record_type {
            ReferencePoint => self.reference_point.decode(header, frame)?,
            UncalibratedSensorOffset => {
                self.uncalibrated_sensor_offset
                    .decode(header, frame, record_type)?
            }
            CalibratedSensorOffset => {
                self.calibrated_sensor_offset
                    .decode(header, frame, record_type)?
            }
            Position => self.position.decode(header, frame)?,
            CustomAttitude => self.custom_attitude.decode(header, frame)?,
            Tide => self.tide.decode(header, frame)?,
            Altitude => self.altitude.decode(header, frame)?,
            MotionOverGround => self.motion_over_ground.decode(header, frame)?,
            Depth => self.depth.decode(header, frame)?,
            SoundVelocityProfile => self.sound_velocity_profile.decode(header, frame)?,
            Ctd => self.ctd.decode(header, frame)?,
            Geodesy => self.geodesy.decode(header, frame)?,
            RollPitchHeave => self.roll_pitch_heave.decode(header, frame)?,
            Heading => self.heading.decode(header, frame)?,
            SurveyLine => self.survey_line.decode(header, frame)?,
            Navigation => self.navigation.decode(header, frame)?,
            Attitude => self.attitude.decode(header, frame)?,
            PanTilt => self.pan_tilt.decode(header, frame)?,
            ProcessedSideScan => self.processed_side_scan.decode(header, frame)?,
            SonarSettings => self.sonar_settings.decode(header, frame)?,
            Configuration => self.configuration.decode(header, frame)?,
            MatchFilter => self.match_filter.decode(header, frame)?,
            BeamGeometry => self.beam_geometry.decode(header, frame)?,
            Bathymetry => self.bathymetry.decode(header, frame)?,
            SideScan => self.side_scan.decode(header, frame)?,
            WaterColumn => self.water_column.decode(header, frame)?,
            VerticalDepth => self.vertical_depth.decode(header, frame)?,
            Tvg => self.tvg.decode(header, frame)?,
            Image => self.image.decode(header, frame)?,
            PingMotion => self.ping_motion.decode(header, frame)?,
            AdaptiveGate => self.adaptive_gate.decode(header, frame)?,
            DetectionDataSetup => self.detection_setup.decode(header, frame)?,
            Beamformed => self.beamformed.decode(header, frame)?,
            VernierProcessingDataRaw => self.vernier_raw.decode(header, frame)?,
            SonarSourceVersion => self.sonar_source_version.decode(header, frame)?,
            RawDetection => self.raw_detection.decode(header, frame)?,
            Snippet => self.snippet.decode(header, frame)?,
            VernierProcessingDataFiltered => self.vernier_filtered.decode(header, frame)?,
            InstallationParameters => self.installation_parameters.decode(header, frame)?,
            CompressedBeamformedMagnitude => {
                self.compressed_beamformed_magnitude.decode(header, frame)?
            }
            CompressedWaterColumn => self.compressed_water_column.decode(header, frame)?,
            SegmentedRawDetection => self.segmented_raw_detection.decode(header, frame)?,
            CalibratedBeam => self.calibrated_beam.decode(header, frame)?,
            SystemEventMessage => self.system_event_message.decode(header, frame)?,
            RdrRecordingStatus => {
                self.rdr_recording_status.decode(header, frame, record_type)?
            }
            Subscriptions => self.subscriptions.decode(header, frame, record_type)?,
            CalibrationStatus => self.calibration_status.decode(header, frame)?,
            CalibratedSideScan => self.calibrated_side_scan.decode(header, frame)?,
            SnippetBackscatteringStrength => self.snippet_backscatter.decode(header, frame)?,
            FileHeader => self.file_header.decode(header, frame)?,
            FileCatalog => self.file_catalog.decode(header, frame)?,
            TimeMessage => self.time_message.decode(header, frame)?,
            RemoteControl => self.remote_control.decode(header, frame, record_type)?,
            RemoteControlAcknowledge => {
                self.remote_control_acknowledge
                    .decode(header, frame, record_type)?
            }
            RemoteControlNotAcknowledge => {
                self.remote_control_not_acknowledge
                    .decode(header, frame, record_type)?
            }
            RemoteControlSonarSettings => {
                self.remote_control_sonar_settings.decode(header, frame)?
            }
            SoundVelocity => self.sound_velocity.decode(header, frame)?,
            AbsorptionLoss => self.absorption_loss.decode(header, frame)?,
            SpreadingLoss => self.spreading_loss.decode(header, frame)?,
        }
        self.record_type = record_type;
        self.kind = record_type.kind();
        self.time = header.time;
        self.timestamp = header.time.as_epoch_seconds();
        self.device_id = header.device_id;
        self.system_enumerator = header.system_enumerator;
        if record_type.is_ping_record() {
            self.ping_flags.set(record_type);
        }
        Ok(record_type)
    }

    /// Serializes one record from this store into a complete frame.
    pub fn encode_record(&self, record_type: RecordType) -> Result<Vec<u8>> {
        use RecordType::*;
        let mut header = Header::new(record_type, self.time);
        header.device_id = self.device_id;
        header.system_enumerator = self.system_enumerator;
        let mut builder = FrameBuilder::new(header);
        match record_type {
            ReferencePoint => self.reference_point.encode(&mut builder)?,
            UncalibratedSensorOffset => self.uncalibrated_sensor_offset.encode(&mut builder)?,
            CalibratedSensorOffset => self.calibrated_sensor_offset.encode(&mut builder)?,
            Position => self.position.encode(&mut builder)?,
            CustomAttitude => self.custom_attitude.encode(&mut builder)?,
            Tide => self.tide.encode(&mut builder)?,
            Altitude => self.altitude.encode(&mut builder)?,
            MotionOverGround => self.motion_over_ground.encode(&mut builder)?,
            Depth => self.depth.encode(&mut builder)?,
            SoundVelocityProfile => self.sound_velocity_profile.encode(&mut builder)?,
            Ctd => self.ctd.encode(&mut builder)?,
            Geodesy => self.geodesy.encode(&mut builder)?,
            RollPitchHeave => self.roll_pitch_heave.encode(&mut builder)?,
            Heading => self.heading.encode(&mut builder)?,
            SurveyLine => self.survey_line.encode(&mut builder)?,
            Navigation => self.navigation.encode(&mut builder)?,
            Attitude => self.attitude.encode(&mut builder)?,
            PanTilt => self.pan_tilt.encode(&mut builder)?,
            ProcessedSideScan => self.processed_side_scan.encode(&mut builder)?,
            SonarSettings => self.sonar_settings.encode(&mut builder)?,
            Configuration => self.configuration.encode(&mut builder)?,
            MatchFilter => self.match_filter.encode(&mut builder)?,
            BeamGeometry => self.beam_geometry.encode(&mut builder)?,
            Bathymetry => self.bathymetry.encode(&mut builder)?,
            SideScan => self.side_scan.encode(&mut builder)?,
            WaterColumn => self.water_column.encode(&mut builder)?,
            VerticalDepth => self.vertical_depth.encode(&mut builder)?,
            Tvg => self.tvg.encode(&mut builder)?,
            Image => self.image.encode(&mut builder)?,
            PingMotion => self.ping_motion.encode(&mut builder)?,
            AdaptiveGate => self.adaptive_gate.encode(&mut builder)?,
            DetectionDataSetup => self.detection_setup.encode(&mut builder)?,
            Beamformed => self.beamformed.encode(&mut builder)?,
            VernierProcessingDataRaw => self.vernier_raw.encode(&mut builder)?,
            SonarSourceVersion => self.sonar_source_version.encode(&mut builder)?,
            RawDetection => self.raw_detection.encode(&mut builder)?,
            Snippet => self.snippet.encode(&mut builder)?,
            VernierProcessingDataFiltered => self.vernier_filtered.encode(&mut builder)?,
            InstallationParameters => self.installation_parameters.encode(&mut builder)?,
            CompressedBeamformedMagnitude => {
                self.compressed_beamformed_magnitude.encode(&mut builder)?
            }
            CompressedWaterColumn => self.compressed_water_column.encode(&mut builder)?,
            SegmentedRawDetection => self.segmented_raw_detection.encode(&mut builder)?,
            CalibratedBeam => self.calibrated_beam.encode(&mut builder)?,
            SystemEventMessage => self.system_event_message.encode(&mut builder)?,
            RdrRecordingStatus => self.rdr_recording_status.encode(&mut builder)?,
            Subscriptions => self.subscriptions.encode(&mut builder)?,
            CalibrationStatus => self.calibration_status.encode(&mut builder)?,
            CalibratedSideScan => self.calibrated_side_scan.encode(&mut builder)?,
            SnippetBackscatteringStrength => self.snippet_backscatter.encode(&mut builder)?,
            FileHeader => self.file_header.encode(&mut builder)?,
            FileCatalog => self.file_catalog.encode(&mut builder)?,
            TimeMessage => self.time_message.encode(&mut builder)?,
            RemoteControl => self.remote_control.encode(&mut builder)?,
            RemoteControlAcknowledge => self.remote_control_acknowledge.encode(&mut builder)?,
            RemoteControlNotAcknowledge => {
                self.remote_control_not_acknowledge.encode(&mut builder)?
            }
            RemoteControlSonarSettings => {
                self.remote_control_sonar_settings.encode(&mut builder)?
            }
            SoundVelocity => self.sound_velocity.encode(&mut builder)?,
            AbsorptionLoss => self.absorption_loss.encode(&mut builder)?,
            SpreadingLoss => self.spreading_loss.encode(&mut builder)?,
        }
        builder.finish()
    }

    /// The ping-associated record types currently marked present, in
    /// canonical intra-ping order.
    pub fn present_ping_records(&self) -> Vec<RecordType> {
        PING_RECORD_ORDER
            .iter()
            .copied()
            .filter(|&record_type| self.ping_flags.get(record_type))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_updates_tags_and_flags() {
        let mut store = Store::new();
        store.sonar_settings.ping_number = 7;
        let source = Store {
            sonar_settings: SonarSettings {
                sonar_id: 7125,
                ping_number: 42,
                frequency: 400_000.,
                ..Default::default()
            },
            ..Default::default()
        };
        let frame = source.encode_record(RecordType::SonarSettings).unwrap();
        let header = Header::read_from(&frame[..]).unwrap();
        let record_type = store.decode_record(&header, &frame).unwrap();
        assert_eq!(RecordType::SonarSettings, record_type);
        assert_eq!(RecordKind::Ping, store.kind);
        assert_eq!(42, store.sonar_settings.ping_number);
        assert!(store.ping_flags.sonar_settings);
        assert!(!store.ping_flags.complete());
    }

    #[test]
    fn completion_requires_a_detection_record() {
        let mut flags = PingFlags::default();
        flags.set(RecordType::SonarSettings);
        flags.set(RecordType::BeamGeometry);
        assert!(!flags.complete());
        flags.set(RecordType::RawDetection);
        assert!(flags.complete());
        flags.clear();
        assert!(!flags.complete());
        flags.set(RecordType::SegmentedRawDetection);
        assert!(flags.complete());
    }

    #[test]
    fn present_ping_records_follow_canonical_order() {
        let mut store = Store::new();
        store.ping_flags.set(RecordType::Bathymetry);
        store.ping_flags.set(RecordType::RawDetection);
        store.ping_flags.set(RecordType::SonarSettings);
        assert_eq!(
            vec![
                RecordType::SonarSettings,
                RecordType::RawDetection,
                RecordType::Bathymetry,
            ],
            store.present_ping_records()
        );
    }
}
