//! The record-type registry.
//!
//! The format defines a closed set of record types. The reader only ingests
//! types in this whitelist; everything else is treated as framing noise and
//! skipped by the sync scanner.

use num_traits::{FromPrimitive, ToPrimitive};

/// A record type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
#[allow(missing_docs)]
pub enum RecordType {
    ReferencePoint = 1000,
    UncalibratedSensorOffset = 1001,
    CalibratedSensorOffset = 1002,
    Position = 1003,
    CustomAttitude = 1004,
    Tide = 1005,
    Altitude = 1006,
    MotionOverGround = 1007,
    Depth = 1008,
    SoundVelocityProfile = 1009,
    Ctd = 1010,
    Geodesy = 1011,
    RollPitchHeave = 1012,
    Heading = 1013,
    SurveyLine = 1014,
    Navigation = 1015,
    Attitude = 1016,
    PanTilt = 1017,
    ProcessedSideScan = 3199,
    SonarSettings = 7000,
    Configuration = 7001,
    MatchFilter = 7002,
    BeamGeometry = 7004,
    Bathymetry = 7006,
    SideScan = 7007,
    WaterColumn = 7008,
    VerticalDepth = 7009,
    Tvg = 7010,
    Image = 7011,
    PingMotion = 7012,
    AdaptiveGate = 7014,
    DetectionDataSetup = 7017,
    Beamformed = 7018,
    VernierProcessingDataRaw = 7019,
    SonarSourceVersion = 7022,
    RawDetection = 7027,
    Snippet = 7028,
    VernierProcessingDataFiltered = 7029,
    InstallationParameters = 7030,
    CompressedBeamformedMagnitude = 7041,
    CompressedWaterColumn = 7042,
    SegmentedRawDetection = 7047,
    CalibratedBeam = 7048,
    #[default]
    SystemEventMessage = 7051,
    RdrRecordingStatus = 7052,
    Subscriptions = 7053,
    CalibrationStatus = 7055,
    CalibratedSideScan = 7057,
    SnippetBackscatteringStrength = 7058,
    FileHeader = 7200,
    FileCatalog = 7300,
    TimeMessage = 7400,
    RemoteControl = 7500,
    RemoteControlAcknowledge = 7501,
    RemoteControlNotAcknowledge = 7502,
    RemoteControlSonarSettings = 7503,
    SoundVelocity = 7610,
    AbsorptionLoss = 7611,
    SpreadingLoss = 7612,
}

/// The semantic category of a record, the caller's handle on the store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum RecordKind {
    /// A fully-assembled ping.
    Ping,
    /// The file-level header record.
    Header,
    /// The end-of-file index record.
    Catalog,
    /// Operator comment.
    #[default]
    Comment,
    Nav,
    Attitude,
    Heading,
    Depth,
    Altitude,
    Tide,
    Motion,
    SoundVelocity,
    Ctd,
    SurveyLine,
    Parameter,
    Configuration,
    Version,
    Installation,
    Event,
    Status,
    RemoteControl,
    Environment,
}

/// The ping-associated record types, in canonical intra-ping emission order.
///
/// When two catalog entries share a ping's timestamp, and when a ping is
/// written out, records appear in exactly this order.
pub const PING_RECORD_ORDER: [RecordType; 25] = [
    RecordType::SonarSettings,
    RecordType::RemoteControlSonarSettings,
    RecordType::MatchFilter,
    RecordType::BeamGeometry,
    RecordType::RawDetection,
    RecordType::SegmentedRawDetection,
    RecordType::SideScan,
    RecordType::CalibratedSideScan,
    RecordType::Snippet,
    RecordType::SnippetBackscatteringStrength,
    RecordType::Beamformed,
    RecordType::CompressedBeamformedMagnitude,
    RecordType::CalibratedBeam,
    RecordType::CompressedWaterColumn,
    RecordType::ProcessedSideScan,
    RecordType::Bathymetry,
    RecordType::WaterColumn,
    RecordType::VerticalDepth,
    RecordType::Tvg,
    RecordType::Image,
    RecordType::PingMotion,
    RecordType::AdaptiveGate,
    RecordType::DetectionDataSetup,
    RecordType::VernierProcessingDataRaw,
    RecordType::VernierProcessingDataFiltered,
];

impl RecordType {
    /// Returns the record type for a wire value, or `None` if the value is
    /// not in the whitelist.
    ///
    /// # Examples
    ///
    /// ```
    /// use s7k::RecordType;
    /// assert_eq!(Some(RecordType::RawDetection), RecordType::from_u32(7027));
    /// assert_eq!(None, RecordType::from_u32(7026));
    /// ```
    pub fn from_u32(n: u32) -> Option<RecordType> {
        use RecordType::*;
        Some(match n {
            1000 => ReferencePoint,
            1001 => UncalibratedSensorOffset,
            1002 => CalibratedSensorOffset,
            1003 => Position,
            1004 => CustomAttitude,
            1005 => Tide,
            1006 => Altitude,
            1007 => MotionOverGround,
            1008 => Depth,
            1009 => SoundVelocityProfile,
            1010 => Ctd,
            1011 => Geodesy,
            1012 => RollPitchHeave,
            1013 => Heading,
            1014 => SurveyLine,
            1015 => Navigation,
            1016 => Attitude,
            1017 => PanTilt,
            3199 => ProcessedSideScan,
            7000 => SonarSettings,
            7001 => Configuration,
            7002 => MatchFilter,
            7004 => BeamGeometry,
            7006 => Bathymetry,
            7007 => SideScan,
            7008 => WaterColumn,
            7009 => VerticalDepth,
            7010 => Tvg,
            7011 => Image,
            7012 => PingMotion,
            7014 => AdaptiveGate,
            7017 => DetectionDataSetup,
            7018 => Beamformed,
            7019 => VernierProcessingDataRaw,
            7022 => SonarSourceVersion,
            7027 => RawDetection,
            7028 => Snippet,
            7029 => VernierProcessingDataFiltered,
            7030 => InstallationParameters,
            7041 => CompressedBeamformedMagnitude,
            7042 => CompressedWaterColumn,
            7047 => SegmentedRawDetection,
            7048 => CalibratedBeam,
            7051 => SystemEventMessage,
            7052 => RdrRecordingStatus,
            7053 => Subscriptions,
            7055 => CalibrationStatus,
            7057 => CalibratedSideScan,
            7058 => SnippetBackscatteringStrength,
            7200 => FileHeader,
            7300 => FileCatalog,
            7400 => TimeMessage,
            7500 => RemoteControl,
            7501 => RemoteControlAcknowledge,
            7502 => RemoteControlNotAcknowledge,
            7503 => RemoteControlSonarSettings,
            7610 => SoundVelocity,
            7611 => AbsorptionLoss,
            7612 => SpreadingLoss,
            _ => return None,
        })
    }

    /// Returns true for the record types that belong to a ping.
    ///
    /// # Examples
    ///
    /// ```
    /// use s7k::RecordType;
    /// assert!(RecordType::RawDetection.is_ping_record());
    /// assert!(!RecordType::Position.is_ping_record());
    /// ```
    pub fn is_ping_record(&self) -> bool {
        PING_RECORD_ORDER.contains(self)
    }

    /// Returns the canonical position of a ping record within its ping.
    ///
    /// Non-ping records sort after every ping record.
    pub(crate) fn ping_rank(&self) -> usize {
        PING_RECORD_ORDER
            .iter()
            .position(|t| t == self)
            .unwrap_or(PING_RECORD_ORDER.len())
    }

    /// Returns the semantic category of this record type.
    pub fn kind(&self) -> RecordKind {
        use RecordType::*;
        match self {
            FileHeader => RecordKind::Header,
            FileCatalog => RecordKind::Catalog,
            SystemEventMessage => RecordKind::Comment,
            Position | Navigation => RecordKind::Nav,
            CustomAttitude | RollPitchHeave | Attitude => RecordKind::Attitude,
            Heading => RecordKind::Heading,
            Depth => RecordKind::Depth,
            Altitude => RecordKind::Altitude,
            Tide => RecordKind::Tide,
            MotionOverGround => RecordKind::Motion,
            SoundVelocityProfile => RecordKind::SoundVelocity,
            Ctd => RecordKind::Ctd,
            SurveyLine => RecordKind::SurveyLine,
            ReferencePoint | UncalibratedSensorOffset | CalibratedSensorOffset | Geodesy
            | PanTilt => RecordKind::Parameter,
            Configuration => RecordKind::Configuration,
            SonarSourceVersion => RecordKind::Version,
            InstallationParameters => RecordKind::Installation,
            TimeMessage => RecordKind::Event,
            RdrRecordingStatus | Subscriptions | CalibrationStatus => RecordKind::Status,
            RemoteControl | RemoteControlAcknowledge | RemoteControlNotAcknowledge => {
                RecordKind::RemoteControl
            }
            SoundVelocity | AbsorptionLoss | SpreadingLoss => RecordKind::Environment,
            t => {
                debug_assert!(t.is_ping_record());
                RecordKind::Ping
            }
        }
    }
}

impl FromPrimitive for RecordType {
    fn from_i64(n: i64) -> Option<RecordType> {
        u32::try_from(n).ok().and_then(RecordType::from_u32)
    }

    fn from_u64(n: u64) -> Option<RecordType> {
        u32::try_from(n).ok().and_then(RecordType::from_u32)
    }
}

impl ToPrimitive for RecordType {
    fn to_i64(&self) -> Option<i64> {
        Some(*self as i64)
    }

    fn to_u64(&self) -> Option<u64> {
        Some(*self as u64)
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}({})", self, *self as u32)
    }
}
