//! System, configuration, and event records.

use super::{FrameBuilder, body_cursor, finish_decode, get_str, put_str};
use crate::cursor::grow_exact;
use crate::header::{CHECKSUM_SIZE, Header};
use crate::record::RecordType;
use crate::{Result, Time7k};

/// One device block of a configuration record.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigurationDevice {
    /// Device identifier.
    pub device_id: u32,
    /// Human-readable device description.
    pub description: String,
    /// Device serial number.
    pub serial_number: u64,
    /// Device-specific configuration, typically XML.
    pub info: Vec<u8>,
}

/// Sonar hardware configuration (7001).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Configuration {
    #[allow(missing_docs)]
    pub sonar_id: u64,
    /// Number of device blocks.
    pub n_devices: u32,
    /// The device blocks.
    pub devices: Vec<ConfigurationDevice>,
}

impl Configuration {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.sonar_id = cursor.get_u64()?;
        self.n_devices = cursor.get_u32()?;
        grow_exact(&mut self.devices, self.n_devices as usize)?;
        for device in &mut self.devices {
            device.device_id = cursor.get_u32()?;
            device.description = get_str(&mut cursor, 64)?;
            device.serial_number = cursor.get_u64()?;
            let info_length = cursor.get_u32()? as usize;
            grow_exact(&mut device.info, info_length)?;
            let bytes = cursor.get_slice(info_length)?;
            device.info.copy_from_slice(bytes);
        }
        finish_decode(&cursor, header, RecordType::Configuration)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        cursor.put_u64(self.sonar_id);
        cursor.put_u32(self.n_devices);
        for device in &self.devices {
            cursor.put_u32(device.device_id);
            put_str(cursor, &device.description, 64);
            cursor.put_u64(device.serial_number);
            cursor.put_u32(device.info.len() as u32);
            cursor.put_bytes(&device.info);
        }
        Ok(())
    }
}

/// Version of the producing sonar source (7022).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SonarSourceVersion {
    /// Version string.
    pub version: String,
}

impl SonarSourceVersion {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.version = get_str(&mut cursor, 32)?;
        finish_decode(&cursor, header, RecordType::SonarSourceVersion)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        put_str(builder.cursor(), &self.version, 32);
        Ok(())
    }
}

/// Installation offsets and lever arms (7030).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InstallationParameters {
    /// Operating frequency, Hz.
    pub frequency: f32,
    /// Firmware version string.
    pub firmware_version: String,
    /// Software version string.
    pub software_version: String,
    /// Protocol version string.
    pub protocol_version: String,
    /// Transmit array offset, meters.
    pub transmit_x: f32,
    #[allow(missing_docs)]
    pub transmit_y: f32,
    #[allow(missing_docs)]
    pub transmit_z: f32,
    /// Transmit array mounting angles, radians.
    pub transmit_roll: f32,
    #[allow(missing_docs)]
    pub transmit_pitch: f32,
    #[allow(missing_docs)]
    pub transmit_heading: f32,
    /// Receive array offset, meters.
    pub receive_x: f32,
    #[allow(missing_docs)]
    pub receive_y: f32,
    #[allow(missing_docs)]
    pub receive_z: f32,
    /// Receive array mounting angles, radians.
    pub receive_roll: f32,
    #[allow(missing_docs)]
    pub receive_pitch: f32,
    #[allow(missing_docs)]
    pub receive_heading: f32,
    /// Motion sensor offset, meters.
    pub motion_x: f32,
    #[allow(missing_docs)]
    pub motion_y: f32,
    #[allow(missing_docs)]
    pub motion_z: f32,
    /// Motion sensor mounting angles, radians.
    pub motion_roll: f32,
    #[allow(missing_docs)]
    pub motion_pitch: f32,
    #[allow(missing_docs)]
    pub motion_heading: f32,
    /// Motion sensor latency, milliseconds.
    pub motion_time_delay: u16,
    /// Position sensor offset, meters.
    pub position_x: f32,
    #[allow(missing_docs)]
    pub position_y: f32,
    #[allow(missing_docs)]
    pub position_z: f32,
    /// Position sensor latency, milliseconds.
    pub position_time_delay: u16,
    /// Vertical distance to the water line, meters.
    pub water_line_z: f32,
}

impl InstallationParameters {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.frequency = cursor.get_f32()?;
        self.firmware_version = get_str(&mut cursor, 128)?;
        self.software_version = get_str(&mut cursor, 128)?;
        self.protocol_version = get_str(&mut cursor, 32)?;
        self.transmit_x = cursor.get_f32()?;
        self.transmit_y = cursor.get_f32()?;
        self.transmit_z = cursor.get_f32()?;
        self.transmit_roll = cursor.get_f32()?;
        self.transmit_pitch = cursor.get_f32()?;
        self.transmit_heading = cursor.get_f32()?;
        self.receive_x = cursor.get_f32()?;
        self.receive_y = cursor.get_f32()?;
        self.receive_z = cursor.get_f32()?;
        self.receive_roll = cursor.get_f32()?;
        self.receive_pitch = cursor.get_f32()?;
        self.receive_heading = cursor.get_f32()?;
        self.motion_x = cursor.get_f32()?;
        self.motion_y = cursor.get_f32()?;
        self.motion_z = cursor.get_f32()?;
        self.motion_roll = cursor.get_f32()?;
        self.motion_pitch = cursor.get_f32()?;
        self.motion_heading = cursor.get_f32()?;
        self.motion_time_delay = cursor.get_u16()?;
        self.position_x = cursor.get_f32()?;
        self.position_y = cursor.get_f32()?;
        self.position_z = cursor.get_f32()?;
        self.position_time_delay = cursor.get_u16()?;
        self.water_line_z = cursor.get_f32()?;
        finish_decode(&cursor, header, RecordType::InstallationParameters)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        cursor.put_f32(self.frequency);
        put_str(cursor, &self.firmware_version, 128);
        put_str(cursor, &self.software_version, 128);
        put_str(cursor, &self.protocol_version, 32);
        cursor.put_f32(self.transmit_x);
        cursor.put_f32(self.transmit_y);
        cursor.put_f32(self.transmit_z);
        cursor.put_f32(self.transmit_roll);
        cursor.put_f32(self.transmit_pitch);
        cursor.put_f32(self.transmit_heading);
        cursor.put_f32(self.receive_x);
        cursor.put_f32(self.receive_y);
        cursor.put_f32(self.receive_z);
        cursor.put_f32(self.receive_roll);
        cursor.put_f32(self.receive_pitch);
        cursor.put_f32(self.receive_heading);
        cursor.put_f32(self.motion_x);
        cursor.put_f32(self.motion_y);
        cursor.put_f32(self.motion_z);
        cursor.put_f32(self.motion_roll);
        cursor.put_f32(self.motion_pitch);
        cursor.put_f32(self.motion_heading);
        cursor.put_u16(self.motion_time_delay);
        cursor.put_f32(self.position_x);
        cursor.put_f32(self.position_y);
        cursor.put_f32(self.position_z);
        cursor.put_u16(self.position_time_delay);
        cursor.put_f32(self.water_line_z);
        Ok(())
    }
}

/// Operator comment or system event text (7051).
///
/// This is the format's comment channel.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SystemEventMessage {
    #[allow(missing_docs)]
    pub sonar_id: u64,
    /// Event severity or class.
    pub event_id: u16,
    /// Event identifier within its class.
    pub event_identifier: u16,
    /// The message text.
    pub message: String,
}

impl SystemEventMessage {
    /// Creates a comment with the given text.
    ///
    /// # Examples
    ///
    /// ```
    /// use s7k::records::SystemEventMessage;
    /// let comment = SystemEventMessage::new("survey line 12 start");
    /// assert_eq!("survey line 12 start", comment.message);
    /// ```
    pub fn new(message: impl Into<String>) -> SystemEventMessage {
        SystemEventMessage {
            message: message.into(),
            ..Default::default()
        }
    }

    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.sonar_id = cursor.get_u64()?;
        self.event_id = cursor.get_u16()?;
        let message_length = cursor.get_u16()? as usize;
        self.event_identifier = cursor.get_u16()?;
        let bytes = cursor.get_slice(message_length)?;
        self.message = String::from_utf8_lossy(bytes).into_owned();
        finish_decode(&cursor, header, RecordType::SystemEventMessage)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        cursor.put_u64(self.sonar_id);
        cursor.put_u16(self.event_id);
        cursor.put_u16(self.message.len() as u16);
        cursor.put_u16(self.event_identifier);
        cursor.put_bytes(self.message.as_bytes());
        Ok(())
    }
}

/// Calibration progress report (7055).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CalibrationStatus {
    #[allow(missing_docs)]
    pub sonar_id: u64,
    /// Calibration state.
    pub status: u16,
    /// Completion, percent.
    pub percent_complete: u16,
    /// When the calibration ran.
    pub calibration_time: Time7k,
    /// Free-form status text.
    pub status_message: String,
}

impl CalibrationStatus {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.sonar_id = cursor.get_u64()?;
        self.status = cursor.get_u16()?;
        self.percent_complete = cursor.get_u16()?;
        let time_bytes = cursor.get_slice(10)?;
        self.calibration_time = Time7k::read_from(time_bytes)?;
        let message_length = cursor.get_u16()? as usize;
        let bytes = cursor.get_slice(message_length)?;
        self.status_message = String::from_utf8_lossy(bytes).into_owned();
        finish_decode(&cursor, header, RecordType::CalibrationStatus)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        cursor.put_u64(self.sonar_id);
        cursor.put_u16(self.status);
        cursor.put_u16(self.percent_complete);
        let mut time = Vec::with_capacity(10);
        self.calibration_time.write_to(&mut time)?;
        cursor.put_bytes(&time);
        cursor.put_u16(self.status_message.len() as u16);
        cursor.put_bytes(self.status_message.as_bytes());
        Ok(())
    }
}

/// Timing discipline report (7400).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimeMessage {
    /// Leap second offset in force.
    pub leap_second: u8,
    /// Timing pulse discipline flag.
    pub pulse_flag: u8,
    /// Port the timing source arrives on.
    pub port_id: u16,
    #[allow(missing_docs)]
    pub reserved: u32,
    #[allow(missing_docs)]
    pub reserved2: u64,
}

impl TimeMessage {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.leap_second = cursor.get_u8()?;
        self.pulse_flag = cursor.get_u8()?;
        self.port_id = cursor.get_u16()?;
        self.reserved = cursor.get_u32()?;
        self.reserved2 = cursor.get_u64()?;
        finish_decode(&cursor, header, RecordType::TimeMessage)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        cursor.put_u8(self.leap_second);
        cursor.put_u8(self.pulse_flag);
        cursor.put_u16(self.port_id);
        cursor.put_u32(self.reserved);
        cursor.put_u64(self.reserved2);
        Ok(())
    }
}

/// A record kept as an undecoded payload.
///
/// Recording status, subscriptions, and the remote-control records have no
/// reliable public layout; their payloads are carried as raw bytes and
/// round-tripped verbatim.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OpaqueRecord {
    /// The payload bytes, header and checksum excluded.
    pub data: Vec<u8>,
}

impl OpaqueRecord {
    pub(crate) fn decode(
        &mut self,
        header: &Header,
        frame: &[u8],
        record_type: RecordType,
    ) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        let remaining = (header.size as usize - CHECKSUM_SIZE).saturating_sub(cursor.position());
        grow_exact(&mut self.data, remaining)?;
        let bytes = cursor.get_slice(remaining)?;
        self.data.copy_from_slice(bytes);
        finish_decode(&cursor, header, record_type)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        builder.cursor().put_bytes(&self.data);
        Ok(())
    }
}

/// Sound velocity at the transducer (7610).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SoundVelocity {
    /// Sound velocity, meters per second.
    pub sound_velocity: f32,
}

impl SoundVelocity {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.sound_velocity = cursor.get_f32()?;
        finish_decode(&cursor, header, RecordType::SoundVelocity)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        builder.cursor().put_f32(self.sound_velocity);
        Ok(())
    }
}

/// Absorption loss in force (7611).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AbsorptionLoss {
    /// Absorption, dB per kilometer.
    pub absorption: f32,
}

impl AbsorptionLoss {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.absorption = cursor.get_f32()?;
        finish_decode(&cursor, header, RecordType::AbsorptionLoss)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        builder.cursor().put_f32(self.absorption);
        Ok(())
    }
}

/// Spreading loss in force (7612).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpreadingLoss {
    /// Spreading loss, dB.
    pub spreading: f32,
}

impl SpreadingLoss {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.spreading = cursor.get_f32()?;
        finish_decode(&cursor, header, RecordType::SpreadingLoss)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        builder.cursor().put_f32(self.spreading);
        Ok(())
    }
}
