//! Asynchronous auxiliary records: navigation, attitude, tides, profiles.
//!
//! These records arrive on their own clocks, independent of the ping cycle.
//! The reader deposits them in the store and mirrors the navigation-bearing
//! ones into the priority-ordered feeds.

use super::{FrameBuilder, body_cursor, finish_decode, get_str, put_str};
use crate::cursor::grow_exact;
use crate::header::Header;
use crate::record::RecordType;
use crate::Result;

/// Reference point of the vehicle frame (1000).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReferencePoint {
    /// Offset from the vehicle reference point, meters, positive forward.
    pub offset_x: f32,
    /// Offset, meters, positive starboard.
    pub offset_y: f32,
    /// Offset, meters, positive down.
    pub offset_z: f32,
    /// Vertical distance from the reference point to the water line.
    pub water_z: f32,
}

impl ReferencePoint {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.offset_x = cursor.get_f32()?;
        self.offset_y = cursor.get_f32()?;
        self.offset_z = cursor.get_f32()?;
        self.water_z = cursor.get_f32()?;
        finish_decode(&cursor, header, RecordType::ReferencePoint)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        cursor.put_f32(self.offset_x);
        cursor.put_f32(self.offset_y);
        cursor.put_f32(self.offset_z);
        cursor.put_f32(self.water_z);
        Ok(())
    }
}

/// Sensor mounting offsets (1001 uncalibrated, 1002 calibrated).
///
/// Both record types share one layout; the store keeps one instance of each.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SensorOffset {
    /// Offset, meters, positive forward.
    pub offset_x: f32,
    /// Offset, meters, positive starboard.
    pub offset_y: f32,
    /// Offset, meters, positive down.
    pub offset_z: f32,
    /// Mounting roll, radians.
    pub roll: f32,
    /// Mounting pitch, radians.
    pub pitch: f32,
    /// Mounting yaw, radians.
    pub yaw: f32,
}

impl SensorOffset {
    pub(crate) fn decode(
        &mut self,
        header: &Header,
        frame: &[u8],
        record_type: RecordType,
    ) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.offset_x = cursor.get_f32()?;
        self.offset_y = cursor.get_f32()?;
        self.offset_z = cursor.get_f32()?;
        self.roll = cursor.get_f32()?;
        self.pitch = cursor.get_f32()?;
        self.yaw = cursor.get_f32()?;
        finish_decode(&cursor, header, record_type)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        cursor.put_f32(self.offset_x);
        cursor.put_f32(self.offset_y);
        cursor.put_f32(self.offset_z);
        cursor.put_f32(self.roll);
        cursor.put_f32(self.pitch);
        cursor.put_f32(self.yaw);
        Ok(())
    }
}

/// Position fix (1003).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Position {
    /// Geodetic datum identifier.
    pub datum_id: u32,
    /// Sensor latency, seconds.
    pub latency: f32,
    /// Latitude in radians, or northing in meters when gridded.
    pub latitude_northing: f64,
    /// Longitude in radians, or easting in meters when gridded.
    pub longitude_easting: f64,
    /// Height above the datum, meters.
    pub height: f64,
    /// Zero for geodetic coordinates, one for grid coordinates.
    pub position_type: u8,
    /// UTM zone when gridded.
    pub utm_zone: u8,
    /// Quality indicator.
    pub quality_flag: u8,
    /// Positioning method.
    pub positioning_method: u8,
}

impl Position {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.datum_id = cursor.get_u32()?;
        self.latency = cursor.get_f32()?;
        self.latitude_northing = cursor.get_f64()?;
        self.longitude_easting = cursor.get_f64()?;
        self.height = cursor.get_f64()?;
        self.position_type = cursor.get_u8()?;
        self.utm_zone = cursor.get_u8()?;
        self.quality_flag = cursor.get_u8()?;
        self.positioning_method = cursor.get_u8()?;
        finish_decode(&cursor, header, RecordType::Position)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        cursor.put_u32(self.datum_id);
        cursor.put_f32(self.latency);
        cursor.put_f64(self.latitude_northing);
        cursor.put_f64(self.longitude_easting);
        cursor.put_f64(self.height);
        cursor.put_u8(self.position_type);
        cursor.put_u8(self.utm_zone);
        cursor.put_u8(self.quality_flag);
        cursor.put_u8(self.positioning_method);
        Ok(())
    }
}

/// Field-mask bits of the custom attitude record.
mod custom_attitude_fields {
    pub const PITCH: u8 = 1 << 0;
    pub const ROLL: u8 = 1 << 1;
    pub const HEADING: u8 = 1 << 2;
    pub const HEAVE: u8 = 1 << 3;
    pub const PITCH_RATE: u8 = 1 << 4;
    pub const ROLL_RATE: u8 = 1 << 5;
    pub const HEADING_RATE: u8 = 1 << 6;
    pub const HEAVE_RATE: u8 = 1 << 7;
}

/// Custom attitude time series (1004).
///
/// The field mask selects which channels are present; each set bit
/// contributes one parallel array of `n` samples.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CustomAttitude {
    /// Bitmask of present channels.
    pub fieldmask: u8,
    #[allow(missing_docs)]
    pub reserved: u8,
    /// Samples per channel.
    pub n: u16,
    /// Sample frequency, Hz.
    pub frequency: f32,
    /// Pitch, radians.
    pub pitch: Vec<f32>,
    /// Roll, radians.
    pub roll: Vec<f32>,
    /// Heading, radians.
    pub heading: Vec<f32>,
    /// Heave, meters.
    pub heave: Vec<f32>,
    /// Pitch rate, radians per second.
    pub pitch_rate: Vec<f32>,
    /// Roll rate, radians per second.
    pub roll_rate: Vec<f32>,
    /// Heading rate, radians per second.
    pub heading_rate: Vec<f32>,
    /// Heave rate, meters per second.
    pub heave_rate: Vec<f32>,
}

impl CustomAttitude {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        use custom_attitude_fields::*;
        let mut cursor = body_cursor(frame)?;
        self.fieldmask = cursor.get_u8()?;
        self.reserved = cursor.get_u8()?;
        self.n = cursor.get_u16()?;
        self.frequency = cursor.get_f32()?;
        let n = usize::from(self.n);
        let channels: [(u8, &mut Vec<f32>); 8] = [
            (PITCH, &mut self.pitch),
            (ROLL, &mut self.roll),
            (HEADING, &mut self.heading),
            (HEAVE, &mut self.heave),
            (PITCH_RATE, &mut self.pitch_rate),
            (ROLL_RATE, &mut self.roll_rate),
            (HEADING_RATE, &mut self.heading_rate),
            (HEAVE_RATE, &mut self.heave_rate),
        ];
        for (bit, channel) in channels {
            if self.fieldmask & bit != 0 {
                grow_exact(channel, n)?;
                for sample in channel.iter_mut() {
                    *sample = cursor.get_f32()?;
                }
            } else {
                channel.clear();
            }
        }
        finish_decode(&cursor, header, RecordType::CustomAttitude)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        use custom_attitude_fields::*;
        let cursor = builder.cursor();
        cursor.put_u8(self.fieldmask);
        cursor.put_u8(self.reserved);
        cursor.put_u16(self.n);
        cursor.put_f32(self.frequency);
        let channels: [(u8, &Vec<f32>); 8] = [
            (PITCH, &self.pitch),
            (ROLL, &self.roll),
            (HEADING, &self.heading),
            (HEAVE, &self.heave),
            (PITCH_RATE, &self.pitch_rate),
            (ROLL_RATE, &self.roll_rate),
            (HEADING_RATE, &self.heading_rate),
            (HEAVE_RATE, &self.heave_rate),
        ];
        for (bit, channel) in channels {
            if self.fieldmask & bit != 0 {
                for &sample in channel {
                    cursor.put_f32(sample);
                }
            }
        }
        Ok(())
    }
}

/// Tide observation (1005).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tide {
    /// Tide height, meters.
    pub tide: f32,
    /// Data source.
    pub source: u16,
    #[allow(missing_docs)]
    pub flags: u8,
    /// Gauge identifier.
    pub gauge: u16,
    /// Geodetic datum identifier.
    pub datum_id: u32,
    /// Sensor latency, seconds.
    pub latency: f32,
    #[allow(missing_docs)]
    pub latitude_northing: f64,
    #[allow(missing_docs)]
    pub longitude_easting: f64,
    #[allow(missing_docs)]
    pub height: f64,
    #[allow(missing_docs)]
    pub position_type: u8,
    #[allow(missing_docs)]
    pub utm_zone: u8,
}

impl Tide {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.tide = cursor.get_f32()?;
        self.source = cursor.get_u16()?;
        self.flags = cursor.get_u8()?;
        self.gauge = cursor.get_u16()?;
        self.datum_id = cursor.get_u32()?;
        self.latency = cursor.get_f32()?;
        self.latitude_northing = cursor.get_f64()?;
        self.longitude_easting = cursor.get_f64()?;
        self.height = cursor.get_f64()?;
        self.position_type = cursor.get_u8()?;
        self.utm_zone = cursor.get_u8()?;
        finish_decode(&cursor, header, RecordType::Tide)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        cursor.put_f32(self.tide);
        cursor.put_u16(self.source);
        cursor.put_u8(self.flags);
        cursor.put_u16(self.gauge);
        cursor.put_u32(self.datum_id);
        cursor.put_f32(self.latency);
        cursor.put_f64(self.latitude_northing);
        cursor.put_f64(self.longitude_easting);
        cursor.put_f64(self.height);
        cursor.put_u8(self.position_type);
        cursor.put_u8(self.utm_zone);
        Ok(())
    }
}

/// Altitude above the bottom (1006).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Altitude {
    /// Distance to the bottom, meters.
    pub altitude: f32,
}

impl Altitude {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.altitude = cursor.get_f32()?;
        finish_decode(&cursor, header, RecordType::Altitude)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        builder.cursor().put_f32(self.altitude);
        Ok(())
    }
}

/// Motion over ground time series (1007).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MotionOverGround {
    /// Bit 0: velocity channels present, bit 1: acceleration channels present.
    pub flags: u8,
    #[allow(missing_docs)]
    pub reserved: u8,
    /// Samples per channel.
    pub n: u16,
    /// Sample frequency, Hz.
    pub frequency: f32,
    /// Velocity x, meters per second.
    pub velocity_x: Vec<f32>,
    #[allow(missing_docs)]
    pub velocity_y: Vec<f32>,
    #[allow(missing_docs)]
    pub velocity_z: Vec<f32>,
    /// Acceleration x, meters per second squared.
    pub acceleration_x: Vec<f32>,
    #[allow(missing_docs)]
    pub acceleration_y: Vec<f32>,
    #[allow(missing_docs)]
    pub acceleration_z: Vec<f32>,
}

impl MotionOverGround {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.flags = cursor.get_u8()?;
        self.reserved = cursor.get_u8()?;
        self.n = cursor.get_u16()?;
        self.frequency = cursor.get_f32()?;
        let n = usize::from(self.n);
        let velocity = self.flags & 0x01 != 0;
        let acceleration = self.flags & 0x02 != 0;
        for channel in [
            &mut self.velocity_x,
            &mut self.velocity_y,
            &mut self.velocity_z,
        ] {
            if velocity {
                grow_exact(channel, n)?;
                for sample in channel.iter_mut() {
                    *sample = cursor.get_f32()?;
                }
            } else {
                channel.clear();
            }
        }
        for channel in [
            &mut self.acceleration_x,
            &mut self.acceleration_y,
            &mut self.acceleration_z,
        ] {
            if acceleration {
                grow_exact(channel, n)?;
                for sample in channel.iter_mut() {
                    *sample = cursor.get_f32()?;
                }
            } else {
                channel.clear();
            }
        }
        finish_decode(&cursor, header, RecordType::MotionOverGround)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        cursor.put_u8(self.flags);
        cursor.put_u8(self.reserved);
        cursor.put_u16(self.n);
        cursor.put_f32(self.frequency);
        if self.flags & 0x01 != 0 {
            for channel in [&self.velocity_x, &self.velocity_y, &self.velocity_z] {
                for &sample in channel {
                    cursor.put_f32(sample);
                }
            }
        }
        if self.flags & 0x02 != 0 {
            for channel in [
                &self.acceleration_x,
                &self.acceleration_y,
                &self.acceleration_z,
            ] {
                for &sample in channel {
                    cursor.put_f32(sample);
                }
            }
        }
        Ok(())
    }
}

/// Vehicle depth (1008).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Depth {
    /// What the depth is relative to.
    pub depth_descriptor: u8,
    /// Whether corrections have been applied.
    pub correction_flag: u8,
    #[allow(missing_docs)]
    pub reserved: u16,
    /// Depth, meters, positive down.
    pub depth: f32,
}

impl Depth {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.depth_descriptor = cursor.get_u8()?;
        self.correction_flag = cursor.get_u8()?;
        self.reserved = cursor.get_u16()?;
        self.depth = cursor.get_f32()?;
        finish_decode(&cursor, header, RecordType::Depth)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        cursor.put_u8(self.depth_descriptor);
        cursor.put_u8(self.correction_flag);
        cursor.put_u16(self.reserved);
        cursor.put_f32(self.depth);
        Ok(())
    }
}

/// Sound velocity profile (1009).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SoundVelocityProfile {
    /// Whether the position fields are valid.
    pub position_flag: u8,
    #[allow(missing_docs)]
    pub reserved: u8,
    #[allow(missing_docs)]
    pub reserved2: u16,
    /// Latitude of the cast, radians.
    pub latitude: f64,
    /// Longitude of the cast, radians.
    pub longitude: f64,
    /// Number of profile points.
    pub n: u32,
    /// Depth of each point, meters.
    pub depths: Vec<f32>,
    /// Sound velocity at each point, meters per second.
    pub sound_velocities: Vec<f32>,
}

impl SoundVelocityProfile {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.position_flag = cursor.get_u8()?;
        self.reserved = cursor.get_u8()?;
        self.reserved2 = cursor.get_u16()?;
        self.latitude = cursor.get_f64()?;
        self.longitude = cursor.get_f64()?;
        self.n = cursor.get_u32()?;
        let n = self.n as usize;
        grow_exact(&mut self.depths, n)?;
        grow_exact(&mut self.sound_velocities, n)?;
        for i in 0..n {
            self.depths[i] = cursor.get_f32()?;
            self.sound_velocities[i] = cursor.get_f32()?;
        }
        finish_decode(&cursor, header, RecordType::SoundVelocityProfile)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        cursor.put_u8(self.position_flag);
        cursor.put_u8(self.reserved);
        cursor.put_u16(self.reserved2);
        cursor.put_f64(self.latitude);
        cursor.put_f64(self.longitude);
        cursor.put_u32(self.n);
        for (&depth, &velocity) in self.depths.iter().zip(&self.sound_velocities) {
            cursor.put_f32(depth);
            cursor.put_f32(velocity);
        }
        Ok(())
    }
}

/// One CTD profile point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CtdSample {
    /// Conductivity or salinity, per the record's flag.
    pub conductivity_salinity: f32,
    /// Water temperature, degrees Celsius.
    pub temperature: f32,
    /// Pressure or depth, per the record's flag.
    pub pressure_depth: f32,
    /// Sound velocity, meters per second.
    pub sound_velocity: f32,
    /// Absorption, dB per kilometer.
    pub absorption: f32,
}

/// Conductivity-temperature-depth cast (1010).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Ctd {
    /// Sample frequency, Hz.
    pub frequency: f32,
    /// How the sound velocity column was obtained.
    pub velocity_source_flag: u8,
    /// Algorithm used to compute sound velocity.
    pub velocity_algorithm: u8,
    /// Zero for conductivity, one for salinity.
    pub conductivity_flag: u8,
    /// Zero for pressure, one for depth.
    pub pressure_flag: u8,
    /// Whether the position fields are valid.
    pub position_flag: u8,
    /// Per-column validity bits.
    pub validity: u8,
    #[allow(missing_docs)]
    pub reserved: u16,
    #[allow(missing_docs)]
    pub latitude: f64,
    #[allow(missing_docs)]
    pub longitude: f64,
    /// Sample rate of the cast.
    pub sample_rate: f32,
    /// Number of profile points.
    pub n: u32,
    /// The profile points.
    pub samples: Vec<CtdSample>,
}

impl Ctd {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.frequency = cursor.get_f32()?;
        self.velocity_source_flag = cursor.get_u8()?;
        self.velocity_algorithm = cursor.get_u8()?;
        self.conductivity_flag = cursor.get_u8()?;
        self.pressure_flag = cursor.get_u8()?;
        self.position_flag = cursor.get_u8()?;
        self.validity = cursor.get_u8()?;
        self.reserved = cursor.get_u16()?;
        self.latitude = cursor.get_f64()?;
        self.longitude = cursor.get_f64()?;
        self.sample_rate = cursor.get_f32()?;
        self.n = cursor.get_u32()?;
        grow_exact(&mut self.samples, self.n as usize)?;
        for sample in &mut self.samples {
            sample.conductivity_salinity = cursor.get_f32()?;
            sample.temperature = cursor.get_f32()?;
            sample.pressure_depth = cursor.get_f32()?;
            sample.sound_velocity = cursor.get_f32()?;
            sample.absorption = cursor.get_f32()?;
        }
        finish_decode(&cursor, header, RecordType::Ctd)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        cursor.put_f32(self.frequency);
        cursor.put_u8(self.velocity_source_flag);
        cursor.put_u8(self.velocity_algorithm);
        cursor.put_u8(self.conductivity_flag);
        cursor.put_u8(self.pressure_flag);
        cursor.put_u8(self.position_flag);
        cursor.put_u8(self.validity);
        cursor.put_u16(self.reserved);
        cursor.put_f64(self.latitude);
        cursor.put_f64(self.longitude);
        cursor.put_f32(self.sample_rate);
        cursor.put_u32(self.n);
        for sample in &self.samples {
            cursor.put_f32(sample.conductivity_salinity);
            cursor.put_f32(sample.temperature);
            cursor.put_f32(sample.pressure_depth);
            cursor.put_f32(sample.sound_velocity);
            cursor.put_f32(sample.absorption);
        }
        Ok(())
    }
}

/// Geodetic model in force (1011).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geodesy {
    /// Spheroid name.
    pub spheroid: String,
    /// Semi-major axis, meters.
    pub semi_major_axis: f64,
    /// Inverse flattening.
    pub flattening: f64,
    /// Datum name.
    pub datum_name: String,
    /// Datum transformation method.
    pub calculation_method: u32,
    /// Number of datum transformation parameters.
    pub number_parameters: u32,
    /// Datum shift, meters.
    pub dx: f64,
    #[allow(missing_docs)]
    pub dy: f64,
    #[allow(missing_docs)]
    pub dz: f64,
    /// Datum rotation, radians.
    pub rx: f64,
    #[allow(missing_docs)]
    pub ry: f64,
    #[allow(missing_docs)]
    pub rz: f64,
    /// Datum scale, parts per million.
    pub scale: f64,
    /// Grid name.
    pub grid_name: String,
    /// Grid distance units.
    pub distance_units: u8,
    /// Grid angular units.
    pub angular_units: u8,
    /// Latitude of origin, radians.
    pub latitude_origin: f64,
    /// Central meridian, radians.
    pub central_meridian: f64,
    /// False easting, meters.
    pub false_easting: f64,
    /// False northing, meters.
    pub false_northing: f64,
    /// Scale factor at the central meridian.
    pub central_scale_factor: f64,
    /// Custom projection identifier.
    pub custom_identifier: i32,
}

impl Geodesy {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.spheroid = get_str(&mut cursor, 32)?;
        self.semi_major_axis = cursor.get_f64()?;
        self.flattening = cursor.get_f64()?;
        cursor.skip(16)?; // reserved
        self.datum_name = get_str(&mut cursor, 32)?;
        self.calculation_method = cursor.get_u32()?;
        self.number_parameters = cursor.get_u32()?;
        self.dx = cursor.get_f64()?;
        self.dy = cursor.get_f64()?;
        self.dz = cursor.get_f64()?;
        self.rx = cursor.get_f64()?;
        self.ry = cursor.get_f64()?;
        self.rz = cursor.get_f64()?;
        self.scale = cursor.get_f64()?;
        cursor.skip(36)?; // reserved
        self.grid_name = get_str(&mut cursor, 32)?;
        self.distance_units = cursor.get_u8()?;
        self.angular_units = cursor.get_u8()?;
        self.latitude_origin = cursor.get_f64()?;
        self.central_meridian = cursor.get_f64()?;
        self.false_easting = cursor.get_f64()?;
        self.false_northing = cursor.get_f64()?;
        self.central_scale_factor = cursor.get_f64()?;
        self.custom_identifier = cursor.get_i32()?;
        cursor.skip(50)?; // reserved
        finish_decode(&cursor, header, RecordType::Geodesy)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        put_str(cursor, &self.spheroid, 32);
        cursor.put_f64(self.semi_major_axis);
        cursor.put_f64(self.flattening);
        cursor.put_bytes(&[0; 16]);
        put_str(cursor, &self.datum_name, 32);
        cursor.put_u32(self.calculation_method);
        cursor.put_u32(self.number_parameters);
        cursor.put_f64(self.dx);
        cursor.put_f64(self.dy);
        cursor.put_f64(self.dz);
        cursor.put_f64(self.rx);
        cursor.put_f64(self.ry);
        cursor.put_f64(self.rz);
        cursor.put_f64(self.scale);
        cursor.put_bytes(&[0; 36]);
        put_str(cursor, &self.grid_name, 32);
        cursor.put_u8(self.distance_units);
        cursor.put_u8(self.angular_units);
        cursor.put_f64(self.latitude_origin);
        cursor.put_f64(self.central_meridian);
        cursor.put_f64(self.false_easting);
        cursor.put_f64(self.false_northing);
        cursor.put_f64(self.central_scale_factor);
        cursor.put_i32(self.custom_identifier);
        cursor.put_bytes(&[0; 50]);
        Ok(())
    }
}

/// Roll, pitch, heave snapshot (1012).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RollPitchHeave {
    /// Roll, radians.
    pub roll: f32,
    /// Pitch, radians.
    pub pitch: f32,
    /// Heave, meters.
    pub heave: f32,
}

impl RollPitchHeave {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.roll = cursor.get_f32()?;
        self.pitch = cursor.get_f32()?;
        self.heave = cursor.get_f32()?;
        finish_decode(&cursor, header, RecordType::RollPitchHeave)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        cursor.put_f32(self.roll);
        cursor.put_f32(self.pitch);
        cursor.put_f32(self.heave);
        Ok(())
    }
}

/// Heading snapshot (1013).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Heading {
    /// Heading, radians.
    pub heading: f32,
}

impl Heading {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.heading = cursor.get_f32()?;
        finish_decode(&cursor, header, RecordType::Heading)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        builder.cursor().put_f32(self.heading);
        Ok(())
    }
}

/// Planned survey line (1014).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SurveyLine {
    /// Number of waypoints.
    pub n: u16,
    /// Waypoint interpretation.
    pub line_type: u16,
    /// Turn radius between waypoints, meters.
    pub turn_radius: f32,
    /// Line name.
    pub name: String,
    /// Waypoint latitudes, radians.
    pub latitudes: Vec<f64>,
    /// Waypoint longitudes, radians.
    pub longitudes: Vec<f64>,
}

impl SurveyLine {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.n = cursor.get_u16()?;
        self.line_type = cursor.get_u16()?;
        self.turn_radius = cursor.get_f32()?;
        self.name = get_str(&mut cursor, 64)?;
        let n = usize::from(self.n);
        grow_exact(&mut self.latitudes, n)?;
        grow_exact(&mut self.longitudes, n)?;
        for i in 0..n {
            self.latitudes[i] = cursor.get_f64()?;
            self.longitudes[i] = cursor.get_f64()?;
        }
        finish_decode(&cursor, header, RecordType::SurveyLine)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        cursor.put_u16(self.n);
        cursor.put_u16(self.line_type);
        cursor.put_f32(self.turn_radius);
        put_str(cursor, &self.name, 64);
        for (&latitude, &longitude) in self.latitudes.iter().zip(&self.longitudes) {
            cursor.put_f64(latitude);
            cursor.put_f64(longitude);
        }
        Ok(())
    }
}

/// Combined navigation solution (1015).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Navigation {
    /// Vertical reference.
    pub vertical_reference: u8,
    /// Latitude, radians.
    pub latitude: f64,
    /// Longitude, radians.
    pub longitude: f64,
    /// Horizontal position accuracy, meters.
    pub position_accuracy: f32,
    /// Height of the vessel reference point, meters.
    pub height: f32,
    /// Height accuracy, meters.
    pub height_accuracy: f32,
    /// Speed over ground, meters per second.
    pub speed: f32,
    /// Course over ground, radians.
    pub course: f32,
    /// Heading, radians.
    pub heading: f32,
}

impl Navigation {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.vertical_reference = cursor.get_u8()?;
        self.latitude = cursor.get_f64()?;
        self.longitude = cursor.get_f64()?;
        self.position_accuracy = cursor.get_f32()?;
        self.height = cursor.get_f32()?;
        self.height_accuracy = cursor.get_f32()?;
        self.speed = cursor.get_f32()?;
        self.course = cursor.get_f32()?;
        self.heading = cursor.get_f32()?;
        finish_decode(&cursor, header, RecordType::Navigation)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        cursor.put_u8(self.vertical_reference);
        cursor.put_f64(self.latitude);
        cursor.put_f64(self.longitude);
        cursor.put_f32(self.position_accuracy);
        cursor.put_f32(self.height);
        cursor.put_f32(self.height_accuracy);
        cursor.put_f32(self.speed);
        cursor.put_f32(self.course);
        cursor.put_f32(self.heading);
        Ok(())
    }
}

/// One attitude sample.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AttitudeSample {
    /// Milliseconds since the record timestamp.
    pub delta_time: u16,
    /// Roll, radians.
    pub roll: f32,
    /// Pitch, radians.
    pub pitch: f32,
    /// Heave, meters.
    pub heave: f32,
    /// Heading, radians.
    pub heading: f32,
}

/// Attitude time series (1016).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attitude {
    /// Number of samples.
    pub n: u8,
    /// The samples.
    pub samples: Vec<AttitudeSample>,
}

impl Attitude {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.n = cursor.get_u8()?;
        grow_exact(&mut self.samples, usize::from(self.n))?;
        for sample in &mut self.samples {
            sample.delta_time = cursor.get_u16()?;
            sample.roll = cursor.get_f32()?;
            sample.pitch = cursor.get_f32()?;
            sample.heave = cursor.get_f32()?;
            sample.heading = cursor.get_f32()?;
        }
        finish_decode(&cursor, header, RecordType::Attitude)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        cursor.put_u8(self.n);
        for sample in &self.samples {
            cursor.put_u16(sample.delta_time);
            cursor.put_f32(sample.roll);
            cursor.put_f32(sample.pitch);
            cursor.put_f32(sample.heave);
            cursor.put_f32(sample.heading);
        }
        Ok(())
    }
}

/// Pan and tilt of a steerable head (1017).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PanTilt {
    /// Pan angle, radians.
    pub pan: f32,
    /// Tilt angle, radians.
    pub tilt: f32,
}

impl PanTilt {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.pan = cursor.get_f32()?;
        self.tilt = cursor.get_f32()?;
        finish_decode(&cursor, header, RecordType::PanTilt)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        cursor.put_f32(self.pan);
        cursor.put_f32(self.tilt);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::test_support::{build_frame, frame_header};

    #[test]
    fn position_roundtrip() {
        let position = Position {
            datum_id: 1,
            latency: 0.05,
            latitude_northing: 0.7,
            longitude_easting: -2.1,
            height: 12.5,
            position_type: 0,
            utm_zone: 0,
            quality_flag: 1,
            positioning_method: 4,
        };
        let frame = build_frame(RecordType::Position, |b| position.encode(b));
        let header = frame_header(&frame);
        let mut decoded = Position::default();
        decoded.decode(&header, &frame).unwrap();
        assert_eq!(position, decoded);
    }

    #[test]
    fn custom_attitude_reads_masked_channels_only() {
        use super::custom_attitude_fields::{HEAVE, PITCH, ROLL};
        let attitude = CustomAttitude {
            fieldmask: PITCH | ROLL | HEAVE,
            n: 3,
            frequency: 100.,
            pitch: vec![0.1, 0.2, 0.3],
            roll: vec![-0.1, -0.2, -0.3],
            heave: vec![1., 2., 3.],
            ..Default::default()
        };
        let frame = build_frame(RecordType::CustomAttitude, |b| attitude.encode(b));
        let header = frame_header(&frame);
        let mut decoded = CustomAttitude::default();
        decoded.decode(&header, &frame).unwrap();
        assert_eq!(attitude, decoded);
        assert!(decoded.heading.is_empty());
        assert!(decoded.heave_rate.is_empty());
    }

    #[test]
    fn svp_roundtrip() {
        let svp = SoundVelocityProfile {
            position_flag: 1,
            latitude: 0.5,
            longitude: 1.5,
            n: 2,
            depths: vec![0., 100.],
            sound_velocities: vec![1500., 1488.5],
            ..Default::default()
        };
        let frame = build_frame(RecordType::SoundVelocityProfile, |b| svp.encode(b));
        let header = frame_header(&frame);
        let mut decoded = SoundVelocityProfile::default();
        decoded.decode(&header, &frame).unwrap();
        assert_eq!(svp, decoded);
    }

    #[test]
    fn attitude_series_roundtrip() {
        let attitude = Attitude {
            n: 2,
            samples: vec![
                AttitudeSample {
                    delta_time: 0,
                    roll: 0.01,
                    pitch: -0.02,
                    heave: 0.1,
                    heading: 1.57,
                },
                AttitudeSample {
                    delta_time: 100,
                    roll: 0.02,
                    pitch: -0.01,
                    heave: 0.05,
                    heading: 1.58,
                },
            ],
        };
        let frame = build_frame(RecordType::Attitude, |b| attitude.encode(b));
        let header = frame_header(&frame);
        let mut decoded = Attitude::default();
        decoded.decode(&header, &frame).unwrap();
        assert_eq!(attitude, decoded);
    }

    #[test]
    fn geodesy_roundtrip() {
        let geodesy = Geodesy {
            spheroid: "WGS84".to_string(),
            semi_major_axis: 6_378_137.,
            flattening: 298.257_223_563,
            datum_name: "WGS84".to_string(),
            grid_name: "UTM".to_string(),
            latitude_origin: 0.,
            central_meridian: -1.23,
            ..Default::default()
        };
        let frame = build_frame(RecordType::Geodesy, |b| geodesy.encode(b));
        let header = frame_header(&frame);
        let mut decoded = Geodesy::default();
        decoded.decode(&header, &frame).unwrap();
        assert_eq!(geodesy, decoded);
    }
}
