//! Ping-cycle sonar records: settings, geometry, bathymetry, imagery.

use super::{FrameBuilder, Samples, body_cursor, finish_decode};
use crate::cursor::{ReadCursor, grow_exact};
use crate::header::Header;
use crate::record::RecordType;
use crate::records::samples::SampleKind;
use crate::{Error, Result};

/// Maps a byte-per-sample selector to an unsigned sample kind.
pub(crate) fn unsigned_kind(width: u8, record_type: RecordType) -> Result<SampleKind> {
    match width {
        1 => Ok(SampleKind::U8),
        2 => Ok(SampleKind::U16),
        4 => Ok(SampleKind::U32),
        _ => Err(Error::SampleWidth { record_type, width }),
    }
}

/// Sonar settings in force for one ping (7000).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SonarSettings {
    /// Sonar serial number.
    pub sonar_id: u64,
    /// Sequential ping number.
    pub ping_number: u32,
    /// Flag for multi-ping mode, zero when off.
    pub multi_ping: u16,
    /// Transmit frequency, Hz.
    pub frequency: f32,
    /// Sample rate, Hz.
    pub sample_rate: f32,
    /// Receiver bandwidth, Hz.
    pub receiver_bandwidth: f32,
    /// Transmit pulse width, seconds.
    pub tx_pulse_width: f32,
    /// Pulse type identifier.
    pub tx_pulse_type: u32,
    /// Pulse envelope identifier.
    pub tx_pulse_envelope: u32,
    /// Envelope parameter.
    pub tx_pulse_envelope_parameter: f32,
    /// Pulse mode.
    pub tx_pulse_mode: u32,
    /// Maximum ping rate, pings per second.
    pub max_ping_rate: f32,
    /// Seconds since the last ping.
    pub ping_period: f32,
    /// Range selection, meters.
    pub range_selection: f32,
    /// Power selection, dB re 1 micropascal.
    pub power_selection: f32,
    /// Gain selection, dB.
    pub gain_selection: f32,
    #[allow(missing_docs)]
    pub control_flags: u32,
    /// Projector identifier.
    pub projector_id: u32,
    /// Projector steering angle, vertical, radians.
    pub projector_steering_vertical: f32,
    /// Projector steering angle, horizontal, radians.
    pub projector_steering_horizontal: f32,
    /// Projector -3 dB beamwidth, vertical, radians.
    pub projector_beamwidth_vertical: f32,
    /// Projector -3 dB beamwidth, horizontal, radians.
    pub projector_beamwidth_horizontal: f32,
    /// Projector focal point, meters.
    pub projector_focal_point: f32,
    /// Projector shading window.
    pub projector_weighting_window: u32,
    /// Projector shading parameter.
    pub projector_weighting_parameter: f32,
    #[allow(missing_docs)]
    pub transmit_flags: u32,
    /// Hydrophone identifier.
    pub hydrophone_id: u32,
    /// Receive shading window.
    pub receive_weighting_window: u32,
    /// Receive shading parameter.
    pub receive_weighting_parameter: f32,
    #[allow(missing_docs)]
    pub receive_flags: u32,
    /// Receive beamwidth, radians.
    pub receive_beamwidth: f32,
    /// Bottom detection minimum range, meters.
    pub range_minimum: f32,
    /// Bottom detection maximum range, meters.
    pub range_maximum: f32,
    /// Bottom detection minimum depth, meters.
    pub depth_minimum: f32,
    /// Bottom detection maximum depth, meters.
    pub depth_maximum: f32,
    /// Absorption, dB per kilometer.
    pub absorption: f32,
    /// Sound velocity at the transducer, meters per second.
    pub sound_velocity: f32,
    /// Spreading loss, dB.
    pub spreading: f32,
    #[allow(missing_docs)]
    pub reserved: u16,
}

impl SonarSettings {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.sonar_id = cursor.get_u64()?;
        self.ping_number = cursor.get_u32()?;
        self.multi_ping = cursor.get_u16()?;
        self.frequency = cursor.get_f32()?;
        self.sample_rate = cursor.get_f32()?;
        self.receiver_bandwidth = cursor.get_f32()?;
        self.tx_pulse_width = cursor.get_f32()?;
        self.tx_pulse_type = cursor.get_u32()?;
        self.tx_pulse_envelope = cursor.get_u32()?;
        self.tx_pulse_envelope_parameter = cursor.get_f32()?;
        self.tx_pulse_mode = cursor.get_u32()?;
        self.max_ping_rate = cursor.get_f32()?;
        self.ping_period = cursor.get_f32()?;
        self.range_selection = cursor.get_f32()?;
        self.power_selection = cursor.get_f32()?;
        self.gain_selection = cursor.get_f32()?;
        self.control_flags = cursor.get_u32()?;
        self.projector_id = cursor.get_u32()?;
        self.projector_steering_vertical = cursor.get_f32()?;
        self.projector_steering_horizontal = cursor.get_f32()?;
        self.projector_beamwidth_vertical = cursor.get_f32()?;
        self.projector_beamwidth_horizontal = cursor.get_f32()?;
        self.projector_focal_point = cursor.get_f32()?;
        self.projector_weighting_window = cursor.get_u32()?;
        self.projector_weighting_parameter = cursor.get_f32()?;
        self.transmit_flags = cursor.get_u32()?;
        self.hydrophone_id = cursor.get_u32()?;
        self.receive_weighting_window = cursor.get_u32()?;
        self.receive_weighting_parameter = cursor.get_f32()?;
        self.receive_flags = cursor.get_u32()?;
        self.receive_beamwidth = cursor.get_f32()?;
        self.range_minimum = cursor.get_f32()?;
        self.range_maximum = cursor.get_f32()?;
        self.depth_minimum = cursor.get_f32()?;
        self.depth_maximum = cursor.get_f32()?;
        self.absorption = cursor.get_f32()?;
        self.sound_velocity = cursor.get_f32()?;
        self.spreading = cursor.get_f32()?;
        self.reserved = cursor.get_u16()?;
        finish_decode(&cursor, header, RecordType::SonarSettings)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        cursor.put_u64(self.sonar_id);
        cursor.put_u32(self.ping_number);
        cursor.put_u16(self.multi_ping);
        cursor.put_f32(self.frequency);
        cursor.put_f32(self.sample_rate);
        cursor.put_f32(self.receiver_bandwidth);
        cursor.put_f32(self.tx_pulse_width);
        cursor.put_u32(self.tx_pulse_type);
        cursor.put_u32(self.tx_pulse_envelope);
        cursor.put_f32(self.tx_pulse_envelope_parameter);
        cursor.put_u32(self.tx_pulse_mode);
        cursor.put_f32(self.max_ping_rate);
        cursor.put_f32(self.ping_period);
        cursor.put_f32(self.range_selection);
        cursor.put_f32(self.power_selection);
        cursor.put_f32(self.gain_selection);
        cursor.put_u32(self.control_flags);
        cursor.put_u32(self.projector_id);
        cursor.put_f32(self.projector_steering_vertical);
        cursor.put_f32(self.projector_steering_horizontal);
        cursor.put_f32(self.projector_beamwidth_vertical);
        cursor.put_f32(self.projector_beamwidth_horizontal);
        cursor.put_f32(self.projector_focal_point);
        cursor.put_u32(self.projector_weighting_window);
        cursor.put_f32(self.projector_weighting_parameter);
        cursor.put_u32(self.transmit_flags);
        cursor.put_u32(self.hydrophone_id);
        cursor.put_u32(self.receive_weighting_window);
        cursor.put_f32(self.receive_weighting_parameter);
        cursor.put_u32(self.receive_flags);
        cursor.put_f32(self.receive_beamwidth);
        cursor.put_f32(self.range_minimum);
        cursor.put_f32(self.range_maximum);
        cursor.put_f32(self.depth_minimum);
        cursor.put_f32(self.depth_maximum);
        cursor.put_f32(self.absorption);
        cursor.put_f32(self.sound_velocity);
        cursor.put_f32(self.spreading);
        cursor.put_u16(self.reserved);
        Ok(())
    }
}

/// Operator-commanded settings echo (7503).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RemoteControlSonarSettings {
    #[allow(missing_docs)]
    pub sonar_id: u64,
    #[allow(missing_docs)]
    pub ping_number: u32,
    #[allow(missing_docs)]
    pub multi_ping: u16,
    /// Transmit frequency, Hz.
    pub frequency: f32,
    /// Sample rate, Hz.
    pub sample_rate: f32,
    /// Receiver bandwidth, Hz.
    pub receiver_bandwidth: f32,
    /// Transmit pulse width, seconds.
    pub tx_pulse_width: f32,
    /// Pulse type identifier.
    pub tx_pulse_type: u32,
    /// Maximum ping rate, pings per second.
    pub max_ping_rate: f32,
    /// Range selection, meters.
    pub range_selection: f32,
    /// Power selection, dB re 1 micropascal.
    pub power_selection: f32,
    /// Gain selection, dB.
    pub gain_selection: f32,
    #[allow(missing_docs)]
    pub control_flags: u32,
    #[allow(missing_docs)]
    pub reserved: u32,
}

impl RemoteControlSonarSettings {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.sonar_id = cursor.get_u64()?;
        self.ping_number = cursor.get_u32()?;
        self.multi_ping = cursor.get_u16()?;
        self.frequency = cursor.get_f32()?;
        self.sample_rate = cursor.get_f32()?;
        self.receiver_bandwidth = cursor.get_f32()?;
        self.tx_pulse_width = cursor.get_f32()?;
        self.tx_pulse_type = cursor.get_u32()?;
        self.max_ping_rate = cursor.get_f32()?;
        self.range_selection = cursor.get_f32()?;
        self.power_selection = cursor.get_f32()?;
        self.gain_selection = cursor.get_f32()?;
        self.control_flags = cursor.get_u32()?;
        self.reserved = cursor.get_u32()?;
        finish_decode(&cursor, header, RecordType::RemoteControlSonarSettings)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        cursor.put_u64(self.sonar_id);
        cursor.put_u32(self.ping_number);
        cursor.put_u16(self.multi_ping);
        cursor.put_f32(self.frequency);
        cursor.put_f32(self.sample_rate);
        cursor.put_f32(self.receiver_bandwidth);
        cursor.put_f32(self.tx_pulse_width);
        cursor.put_u32(self.tx_pulse_type);
        cursor.put_f32(self.max_ping_rate);
        cursor.put_f32(self.range_selection);
        cursor.put_f32(self.power_selection);
        cursor.put_f32(self.gain_selection);
        cursor.put_u32(self.control_flags);
        cursor.put_u32(self.reserved);
        Ok(())
    }
}

/// Match filter applied to the received signal (7002).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MatchFilter {
    #[allow(missing_docs)]
    pub sonar_id: u64,
    #[allow(missing_docs)]
    pub ping_number: u32,
    /// Zero when the filter is off.
    pub operation: u32,
    /// Chirp start frequency, Hz.
    pub start_frequency: f32,
    /// Chirp end frequency, Hz.
    pub end_frequency: f32,
    /// Window identifier.
    pub window_type: u32,
    /// Window shading value.
    pub shading: f32,
    /// Effective pulse width after filtering, seconds.
    pub pulse_width: f32,
}

impl MatchFilter {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.sonar_id = cursor.get_u64()?;
        self.ping_number = cursor.get_u32()?;
        self.operation = cursor.get_u32()?;
        self.start_frequency = cursor.get_f32()?;
        self.end_frequency = cursor.get_f32()?;
        self.window_type = cursor.get_u32()?;
        self.shading = cursor.get_f32()?;
        self.pulse_width = cursor.get_f32()?;
        cursor.skip(52)?; // reserved
        finish_decode(&cursor, header, RecordType::MatchFilter)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        cursor.put_u64(self.sonar_id);
        cursor.put_u32(self.ping_number);
        cursor.put_u32(self.operation);
        cursor.put_f32(self.start_frequency);
        cursor.put_f32(self.end_frequency);
        cursor.put_u32(self.window_type);
        cursor.put_f32(self.shading);
        cursor.put_f32(self.pulse_width);
        cursor.put_bytes(&[0; 52]);
        Ok(())
    }
}

/// Receive beam pointing angles and widths (7004).
///
/// Beam geometry carries no ping number; the assembler attributes it to the
/// ping being accumulated.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BeamGeometry {
    #[allow(missing_docs)]
    pub sonar_id: u64,
    /// Number of receive beams.
    pub n_beams: u32,
    /// Beam vertical direction angles, radians.
    pub angle_vertical: Vec<f32>,
    /// Beam horizontal direction angles, radians.
    pub angle_horizontal: Vec<f32>,
    /// Beamwidth along the vertical axis, radians.
    pub beamwidth_vertical: Vec<f32>,
    /// Beamwidth along the horizontal axis, radians.
    pub beamwidth_horizontal: Vec<f32>,
}

impl BeamGeometry {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.sonar_id = cursor.get_u64()?;
        self.n_beams = cursor.get_u32()?;
        let n = self.n_beams as usize;
        for channel in [
            &mut self.angle_vertical,
            &mut self.angle_horizontal,
            &mut self.beamwidth_vertical,
            &mut self.beamwidth_horizontal,
        ] {
            grow_exact(channel, n)?;
            for value in channel.iter_mut() {
                *value = cursor.get_f32()?;
            }
        }
        finish_decode(&cursor, header, RecordType::BeamGeometry)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        cursor.put_u64(self.sonar_id);
        cursor.put_u32(self.n_beams);
        for channel in [
            &self.angle_vertical,
            &self.angle_horizontal,
            &self.beamwidth_vertical,
            &self.beamwidth_horizontal,
        ] {
            for &value in channel {
                cursor.put_f32(value);
            }
        }
        Ok(())
    }
}

/// Per-beam bathymetry solution (7006).
///
/// The depth-gate arrays only exist at record version 5 and later; decoding
/// an earlier version leaves them empty.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bathymetry {
    #[allow(missing_docs)]
    pub sonar_id: u64,
    #[allow(missing_docs)]
    pub ping_number: u32,
    #[allow(missing_docs)]
    pub multi_ping: u16,
    /// Number of beams.
    pub n_beams: u32,
    /// Non-zero when layer compensation was applied.
    pub layer_compensation: u8,
    /// How sound velocity was obtained.
    pub sound_velocity_flag: u8,
    /// Sound velocity at the transducer, meters per second.
    pub sound_velocity: f32,
    /// Two-way travel range per beam, seconds.
    pub ranges: Vec<f32>,
    /// Detection quality per beam.
    pub quality: Vec<u8>,
    /// Bottom intensity per beam, dB.
    pub intensity: Vec<f32>,
    /// Minimum depth gate per beam, version 5 and later.
    pub min_depth_gate: Vec<f32>,
    /// Maximum depth gate per beam, version 5 and later.
    pub max_depth_gate: Vec<f32>,
    /// Whether the georeferenced optional section was present.
    pub optional_data: bool,
    /// Center frequency, Hz.
    pub frequency: f32,
    /// Latitude of the vehicle, radians.
    pub latitude: f64,
    /// Longitude of the vehicle, radians.
    pub longitude: f64,
    /// Heading, radians.
    pub heading: f32,
    /// Source of the height data.
    pub height_source: u8,
    /// Tide, meters.
    pub tide: f32,
    /// Roll at ping time, radians.
    pub roll: f32,
    /// Pitch at ping time, radians.
    pub pitch: f32,
    /// Heave at ping time, meters.
    pub heave: f32,
    /// Vehicle depth, meters.
    pub vehicle_depth: f32,
    /// Computed depth per beam, meters.
    pub depths: Vec<f32>,
    /// Alongtrack distance per beam, meters.
    pub alongtrack: Vec<f32>,
    /// Acrosstrack distance per beam, meters.
    pub acrosstrack: Vec<f32>,
    /// Beam pointing angle per beam, radians.
    pub pointing_angles: Vec<f32>,
    /// Beam azimuth angle per beam, radians.
    pub azimuth_angles: Vec<f32>,
}

impl Bathymetry {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.sonar_id = cursor.get_u64()?;
        self.ping_number = cursor.get_u32()?;
        self.multi_ping = cursor.get_u16()?;
        self.n_beams = cursor.get_u32()?;
        self.layer_compensation = cursor.get_u8()?;
        self.sound_velocity_flag = cursor.get_u8()?;
        self.sound_velocity = cursor.get_f32()?;
        let n = self.n_beams as usize;
        grow_exact(&mut self.ranges, n)?;
        for value in &mut self.ranges {
            *value = cursor.get_f32()?;
        }
        grow_exact(&mut self.quality, n)?;
        for value in &mut self.quality {
            *value = cursor.get_u8()?;
        }
        grow_exact(&mut self.intensity, n)?;
        for value in &mut self.intensity {
            *value = cursor.get_f32()?;
        }
        if header.record_version >= 5 {
            for channel in [&mut self.min_depth_gate, &mut self.max_depth_gate] {
                grow_exact(channel, n)?;
                for value in channel.iter_mut() {
                    *value = cursor.get_f32()?;
                }
            }
        } else {
            self.min_depth_gate.clear();
            self.max_depth_gate.clear();
        }
        self.decode_optional(header, &mut cursor, n)?;
        finish_decode(&cursor, header, RecordType::Bathymetry)
    }

    fn decode_optional(
        &mut self,
        header: &Header,
        cursor: &mut ReadCursor<'_>,
        n: usize,
    ) -> Result<()> {
        if header.optional_data_offset == 0 {
            self.optional_data = false;
            self.frequency = 0.;
            self.latitude = 0.;
            self.longitude = 0.;
            self.heading = 0.;
            self.height_source = 0;
            self.tide = 0.;
            self.roll = 0.;
            self.pitch = 0.;
            self.heave = 0.;
            self.vehicle_depth = 0.;
            for channel in [
                &mut self.depths,
                &mut self.alongtrack,
                &mut self.acrosstrack,
                &mut self.pointing_angles,
                &mut self.azimuth_angles,
            ] {
                channel.clear();
            }
            return Ok(());
        }
        cursor.seek(header.optional_data_offset as usize)?;
        self.optional_data = true;
        self.frequency = cursor.get_f32()?;
        self.latitude = cursor.get_f64()?;
        self.longitude = cursor.get_f64()?;
        self.heading = cursor.get_f32()?;
        self.height_source = cursor.get_u8()?;
        self.tide = cursor.get_f32()?;
        self.roll = cursor.get_f32()?;
        self.pitch = cursor.get_f32()?;
        self.heave = cursor.get_f32()?;
        self.vehicle_depth = cursor.get_f32()?;
        for channel in [
            &mut self.depths,
            &mut self.alongtrack,
            &mut self.acrosstrack,
            &mut self.pointing_angles,
            &mut self.azimuth_angles,
        ] {
            grow_exact(channel, n)?;
            for value in channel.iter_mut() {
                *value = cursor.get_f32()?;
            }
        }
        Ok(())
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        builder.header_mut().record_version = 5;
        let cursor = builder.cursor();
        cursor.put_u64(self.sonar_id);
        cursor.put_u32(self.ping_number);
        cursor.put_u16(self.multi_ping);
        cursor.put_u32(self.n_beams);
        cursor.put_u8(self.layer_compensation);
        cursor.put_u8(self.sound_velocity_flag);
        cursor.put_f32(self.sound_velocity);
        for &value in &self.ranges {
            cursor.put_f32(value);
        }
        cursor.put_bytes(&self.quality);
        for &value in &self.intensity {
            cursor.put_f32(value);
        }
        let n = self.n_beams as usize;
        for channel in [&self.min_depth_gate, &self.max_depth_gate] {
            for i in 0..n {
                cursor.put_f32(channel.get(i).copied().unwrap_or_default());
            }
        }
        if self.optional_data {
            builder.begin_optional(RecordType::Bathymetry as u32);
            let cursor = builder.cursor();
            cursor.put_f32(self.frequency);
            cursor.put_f64(self.latitude);
            cursor.put_f64(self.longitude);
            cursor.put_f32(self.heading);
            cursor.put_u8(self.height_source);
            cursor.put_f32(self.tide);
            cursor.put_f32(self.roll);
            cursor.put_f32(self.pitch);
            cursor.put_f32(self.heave);
            cursor.put_f32(self.vehicle_depth);
            for channel in [
                &self.depths,
                &self.alongtrack,
                &self.acrosstrack,
                &self.pointing_angles,
                &self.azimuth_angles,
            ] {
                for &value in channel {
                    cursor.put_f32(value);
                }
            }
        }
        Ok(())
    }
}

/// Raw side-scan imagery (7007).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SideScan {
    #[allow(missing_docs)]
    pub sonar_id: u64,
    #[allow(missing_docs)]
    pub ping_number: u32,
    #[allow(missing_docs)]
    pub multi_ping: u16,
    /// Beam center position, radians.
    pub beam_position: f32,
    #[allow(missing_docs)]
    pub control_flags: u32,
    /// Samples per side.
    pub n_samples: u32,
    /// Sample number of the nadir return.
    pub nadir_depth: u32,
    /// Number of beams forming each side.
    pub n_beams: u16,
    /// Beam this record belongs to.
    pub current_beam: u16,
    /// Bytes per sample: 1, 2, or 4.
    pub sample_size: u8,
    /// Interpretation of the samples.
    pub data_type: u8,
    /// Port-side samples.
    pub port: Samples,
    /// Starboard-side samples.
    pub starboard: Samples,
    /// Whether the georeferenced optional section was present.
    pub optional_data: bool,
    /// Center frequency, Hz.
    pub frequency: f32,
    #[allow(missing_docs)]
    pub latitude: f64,
    #[allow(missing_docs)]
    pub longitude: f64,
    /// Heading, radians.
    pub heading: f32,
    /// Altitude above the bottom, meters.
    pub altitude: f32,
    /// Vehicle depth, meters.
    pub depth: f32,
}

impl SideScan {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.sonar_id = cursor.get_u64()?;
        self.ping_number = cursor.get_u32()?;
        self.multi_ping = cursor.get_u16()?;
        self.beam_position = cursor.get_f32()?;
        self.control_flags = cursor.get_u32()?;
        self.n_samples = cursor.get_u32()?;
        self.nadir_depth = cursor.get_u32()?;
        cursor.skip(28)?; // reserved
        self.n_beams = cursor.get_u16()?;
        self.current_beam = cursor.get_u16()?;
        self.sample_size = cursor.get_u8()?;
        self.data_type = cursor.get_u8()?;
        let kind = unsigned_kind(self.sample_size, RecordType::SideScan)?;
        let n = self.n_samples as usize;
        self.port.decode(&mut cursor, kind, n)?;
        self.starboard.decode(&mut cursor, kind, n)?;
        if header.optional_data_offset != 0 {
            cursor.seek(header.optional_data_offset as usize)?;
            self.optional_data = true;
            self.frequency = cursor.get_f32()?;
            self.latitude = cursor.get_f64()?;
            self.longitude = cursor.get_f64()?;
            self.heading = cursor.get_f32()?;
            self.altitude = cursor.get_f32()?;
            self.depth = cursor.get_f32()?;
        } else {
            self.optional_data = false;
            self.frequency = 0.;
            self.latitude = 0.;
            self.longitude = 0.;
            self.heading = 0.;
            self.altitude = 0.;
            self.depth = 0.;
        }
        finish_decode(&cursor, header, RecordType::SideScan)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        cursor.put_u64(self.sonar_id);
        cursor.put_u32(self.ping_number);
        cursor.put_u16(self.multi_ping);
        cursor.put_f32(self.beam_position);
        cursor.put_u32(self.control_flags);
        cursor.put_u32(self.n_samples);
        cursor.put_u32(self.nadir_depth);
        cursor.put_bytes(&[0; 28]);
        cursor.put_u16(self.n_beams);
        cursor.put_u16(self.current_beam);
        cursor.put_u8(self.sample_size);
        cursor.put_u8(self.data_type);
        self.port.encode(cursor);
        self.starboard.encode(cursor);
        if self.optional_data {
            builder.begin_optional(RecordType::SideScan as u32);
            let cursor = builder.cursor();
            cursor.put_f32(self.frequency);
            cursor.put_f64(self.latitude);
            cursor.put_f64(self.longitude);
            cursor.put_f32(self.heading);
            cursor.put_f32(self.altitude);
            cursor.put_f32(self.depth);
        }
        Ok(())
    }
}

/// Single vertical depth beneath the sonar (7009).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VerticalDepth {
    #[allow(missing_docs)]
    pub sonar_id: u64,
    #[allow(missing_docs)]
    pub ping_number: u32,
    #[allow(missing_docs)]
    pub multi_ping: u16,
    /// Center frequency, Hz.
    pub frequency: f32,
    #[allow(missing_docs)]
    pub latitude: f64,
    #[allow(missing_docs)]
    pub longitude: f64,
    /// Heading, radians.
    pub heading: f32,
    /// Alongtrack distance of the sounding, meters.
    pub alongtrack: f32,
    /// Acrosstrack distance of the sounding, meters.
    pub acrosstrack: f32,
    /// Depth, meters.
    pub vertical_depth: f32,
}

impl VerticalDepth {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.sonar_id = cursor.get_u64()?;
        self.ping_number = cursor.get_u32()?;
        self.multi_ping = cursor.get_u16()?;
        self.frequency = cursor.get_f32()?;
        self.latitude = cursor.get_f64()?;
        self.longitude = cursor.get_f64()?;
        self.heading = cursor.get_f32()?;
        self.alongtrack = cursor.get_f32()?;
        self.acrosstrack = cursor.get_f32()?;
        self.vertical_depth = cursor.get_f32()?;
        finish_decode(&cursor, header, RecordType::VerticalDepth)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        cursor.put_u64(self.sonar_id);
        cursor.put_u32(self.ping_number);
        cursor.put_u16(self.multi_ping);
        cursor.put_f32(self.frequency);
        cursor.put_f64(self.latitude);
        cursor.put_f64(self.longitude);
        cursor.put_f32(self.heading);
        cursor.put_f32(self.alongtrack);
        cursor.put_f32(self.acrosstrack);
        cursor.put_f32(self.vertical_depth);
        Ok(())
    }
}

/// Time-varying gain curve applied to one ping (7010).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tvg {
    #[allow(missing_docs)]
    pub sonar_id: u64,
    #[allow(missing_docs)]
    pub ping_number: u32,
    #[allow(missing_docs)]
    pub multi_ping: u16,
    /// Number of gain samples.
    pub n: u32,
    /// Gain per sample, dB.
    pub gains: Vec<f32>,
}

impl Tvg {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.sonar_id = cursor.get_u64()?;
        self.ping_number = cursor.get_u32()?;
        self.multi_ping = cursor.get_u16()?;
        self.n = cursor.get_u32()?;
        cursor.skip(32)?; // reserved
        grow_exact(&mut self.gains, self.n as usize)?;
        for gain in &mut self.gains {
            *gain = cursor.get_f32()?;
        }
        finish_decode(&cursor, header, RecordType::Tvg)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        cursor.put_u64(self.sonar_id);
        cursor.put_u32(self.ping_number);
        cursor.put_u16(self.multi_ping);
        cursor.put_u32(self.n);
        cursor.put_bytes(&[0; 32]);
        for &gain in &self.gains {
            cursor.put_f32(gain);
        }
        Ok(())
    }
}

/// Processed down-looking image of one ping (7011).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Image {
    #[allow(missing_docs)]
    pub sonar_id: u64,
    #[allow(missing_docs)]
    pub ping_number: u32,
    #[allow(missing_docs)]
    pub multi_ping: u16,
    /// Image width, pixels.
    pub width: u32,
    /// Image height, pixels.
    pub height: u32,
    /// Bytes per pixel: 1, 2, or 4.
    pub color_depth: u16,
    #[allow(missing_docs)]
    pub reserved: u16,
    /// Compression algorithm, zero for none.
    pub compression: u16,
    /// The pixels, row-major.
    pub pixels: Samples,
}

impl Image {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.sonar_id = cursor.get_u64()?;
        self.ping_number = cursor.get_u32()?;
        self.multi_ping = cursor.get_u16()?;
        self.width = cursor.get_u32()?;
        self.height = cursor.get_u32()?;
        self.color_depth = cursor.get_u16()?;
        self.reserved = cursor.get_u16()?;
        self.compression = cursor.get_u16()?;
        let kind = unsigned_kind(
            u8::try_from(self.color_depth).unwrap_or(0),
            RecordType::Image,
        )?;
        let n = self.width as usize * self.height as usize;
        self.pixels.decode(&mut cursor, kind, n)?;
        finish_decode(&cursor, header, RecordType::Image)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        cursor.put_u64(self.sonar_id);
        cursor.put_u32(self.ping_number);
        cursor.put_u16(self.multi_ping);
        cursor.put_u32(self.width);
        cursor.put_u32(self.height);
        cursor.put_u16(self.color_depth);
        cursor.put_u16(self.reserved);
        cursor.put_u16(self.compression);
        self.pixels.encode(cursor);
        Ok(())
    }
}

/// Flag bits of the ping-motion record.
mod ping_motion_fields {
    pub const PITCH: u16 = 1 << 0;
    pub const ROLL: u16 = 1 << 1;
    pub const HEADING: u16 = 1 << 2;
    pub const HEAVE: u16 = 1 << 3;
}

/// Vehicle motion during one ping's receive window (7012).
///
/// Pitch is a single value at transmit; roll, heading, and heave are sampled
/// across the receive window when their flag bits are set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PingMotion {
    #[allow(missing_docs)]
    pub sonar_id: u64,
    #[allow(missing_docs)]
    pub ping_number: u32,
    #[allow(missing_docs)]
    pub multi_ping: u16,
    /// Samples per present channel.
    pub n: u32,
    /// Bitmask of present channels.
    pub flags: u16,
    #[allow(missing_docs)]
    pub error_flags: u32,
    /// Motion sample rate, Hz.
    pub sampling_rate: f32,
    /// Pitch at transmit, radians.
    pub pitch: f32,
    /// Roll samples, radians.
    pub roll: Vec<f32>,
    /// Heading samples, radians.
    pub heading: Vec<f32>,
    /// Heave samples, meters.
    pub heave: Vec<f32>,
}

impl PingMotion {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        use ping_motion_fields::*;
        let mut cursor = body_cursor(frame)?;
        self.sonar_id = cursor.get_u64()?;
        self.ping_number = cursor.get_u32()?;
        self.multi_ping = cursor.get_u16()?;
        self.n = cursor.get_u32()?;
        self.flags = cursor.get_u16()?;
        self.error_flags = cursor.get_u32()?;
        self.sampling_rate = cursor.get_f32()?;
        self.pitch = if self.flags & PITCH != 0 {
            cursor.get_f32()?
        } else {
            0.
        };
        let n = self.n as usize;
        let channels: [(u16, &mut Vec<f32>); 3] = [
            (ROLL, &mut self.roll),
            (HEADING, &mut self.heading),
            (HEAVE, &mut self.heave),
        ];
        for (bit, channel) in channels {
            if self.flags & bit != 0 {
                grow_exact(channel, n)?;
                for sample in channel.iter_mut() {
                    *sample = cursor.get_f32()?;
                }
            } else {
                channel.clear();
            }
        }
        finish_decode(&cursor, header, RecordType::PingMotion)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        use ping_motion_fields::*;
        let cursor = builder.cursor();
        cursor.put_u64(self.sonar_id);
        cursor.put_u32(self.ping_number);
        cursor.put_u16(self.multi_ping);
        cursor.put_u32(self.n);
        cursor.put_u16(self.flags);
        cursor.put_u32(self.error_flags);
        cursor.put_f32(self.sampling_rate);
        if self.flags & PITCH != 0 {
            cursor.put_f32(self.pitch);
        }
        let channels: [(u16, &Vec<f32>); 3] = [
            (ROLL, &self.roll),
            (HEADING, &self.heading),
            (HEAVE, &self.heave),
        ];
        for (bit, channel) in channels {
            if self.flags & bit != 0 {
                for &sample in channel {
                    cursor.put_f32(sample);
                }
            }
        }
        Ok(())
    }
}

/// Adaptive depth-gate window per steering angle (7014).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AdaptiveGate {
    #[allow(missing_docs)]
    pub sonar_id: u64,
    #[allow(missing_docs)]
    pub ping_number: u32,
    #[allow(missing_docs)]
    pub multi_ping: u16,
    /// Number of gate descriptors.
    pub n_gates: u32,
    /// Shallowest gate, meters.
    pub gate_depth_min: f32,
    /// Deepest gate, meters.
    pub gate_depth_max: f32,
    /// Steering angle per gate, radians.
    pub angles: Vec<f32>,
    /// Lower gate limit per angle, meters.
    pub min_limits: Vec<f32>,
    /// Upper gate limit per angle, meters.
    pub max_limits: Vec<f32>,
}

impl AdaptiveGate {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.sonar_id = cursor.get_u64()?;
        self.ping_number = cursor.get_u32()?;
        self.multi_ping = cursor.get_u16()?;
        self.n_gates = cursor.get_u32()?;
        self.gate_depth_min = cursor.get_f32()?;
        self.gate_depth_max = cursor.get_f32()?;
        let n = self.n_gates as usize;
        grow_exact(&mut self.angles, n)?;
        grow_exact(&mut self.min_limits, n)?;
        grow_exact(&mut self.max_limits, n)?;
        for i in 0..n {
            self.angles[i] = cursor.get_f32()?;
            self.min_limits[i] = cursor.get_f32()?;
            self.max_limits[i] = cursor.get_f32()?;
        }
        finish_decode(&cursor, header, RecordType::AdaptiveGate)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        cursor.put_u64(self.sonar_id);
        cursor.put_u32(self.ping_number);
        cursor.put_u16(self.multi_ping);
        cursor.put_u32(self.n_gates);
        cursor.put_f32(self.gate_depth_min);
        cursor.put_f32(self.gate_depth_max);
        for i in 0..self.n_gates as usize {
            cursor.put_f32(self.angles.get(i).copied().unwrap_or_default());
            cursor.put_f32(self.min_limits.get(i).copied().unwrap_or_default());
            cursor.put_f32(self.max_limits.get(i).copied().unwrap_or_default());
        }
        Ok(())
    }
}

/// One beam's bottom-detection setup.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DetectionSetupBeam {
    /// Beam number this entry describes.
    pub beam_descriptor: u16,
    /// Detection point, samples.
    pub detection_point: f32,
    #[allow(missing_docs)]
    pub flags: u32,
    /// Automatic gate, first sample.
    pub auto_limits_min_sample: u32,
    /// Automatic gate, last sample.
    pub auto_limits_max_sample: u32,
    /// User gate, first sample.
    pub user_limits_min_sample: u32,
    /// User gate, last sample.
    pub user_limits_max_sample: u32,
    /// Detection quality.
    pub quality: u32,
    /// Detection uncertainty.
    pub uncertainty: f32,
}

/// The documented wire size of one [DetectionSetupBeam].
const DETECTION_SETUP_BEAM_SIZE: u32 = 34;

/// Bottom-detection configuration and per-beam gates (7017).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetectionDataSetup {
    #[allow(missing_docs)]
    pub sonar_id: u64,
    #[allow(missing_docs)]
    pub ping_number: u32,
    #[allow(missing_docs)]
    pub multi_ping: u16,
    /// Number of beam entries.
    pub n_beams: u32,
    /// Bytes per beam entry on the wire.
    pub data_field_size: u32,
    /// Detection algorithm identifier.
    pub detection_algorithm: u8,
    #[allow(missing_docs)]
    pub flags: u32,
    /// Minimum depth, meters.
    pub minimum_depth: f32,
    /// Maximum depth, meters.
    pub maximum_depth: f32,
    /// Minimum range, meters.
    pub minimum_range: f32,
    /// Maximum range, meters.
    pub maximum_range: f32,
    /// Minimum nadir search, ratio of depth.
    pub minimum_nadir_search: f32,
    /// Maximum nadir search, ratio of depth.
    pub maximum_nadir_search: f32,
    /// Automatic filter window, samples.
    pub automatic_filter_window: u8,
    /// Roll applied to the gates, radians.
    pub applied_roll: f32,
    /// Depth gate tilt, radians.
    pub depth_gate_tilt: f32,
    /// Nadir depth used for the gates, meters.
    pub nadir_depth: f32,
    /// The per-beam entries.
    pub beams: Vec<DetectionSetupBeam>,
}

impl DetectionDataSetup {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.sonar_id = cursor.get_u64()?;
        self.ping_number = cursor.get_u32()?;
        self.multi_ping = cursor.get_u16()?;
        self.n_beams = cursor.get_u32()?;
        self.data_field_size = cursor.get_u32()?;
        self.detection_algorithm = cursor.get_u8()?;
        self.flags = cursor.get_u32()?;
        self.minimum_depth = cursor.get_f32()?;
        self.maximum_depth = cursor.get_f32()?;
        self.minimum_range = cursor.get_f32()?;
        self.maximum_range = cursor.get_f32()?;
        self.minimum_nadir_search = cursor.get_f32()?;
        self.maximum_nadir_search = cursor.get_f32()?;
        self.automatic_filter_window = cursor.get_u8()?;
        self.applied_roll = cursor.get_f32()?;
        self.depth_gate_tilt = cursor.get_f32()?;
        self.nadir_depth = cursor.get_f32()?;
        cursor.skip(52)?; // reserved
        grow_exact(&mut self.beams, self.n_beams as usize)?;
        let extra = self
            .data_field_size
            .saturating_sub(DETECTION_SETUP_BEAM_SIZE) as usize;
        for beam in &mut self.beams {
            beam.beam_descriptor = cursor.get_u16()?;
            beam.detection_point = cursor.get_f32()?;
            beam.flags = cursor.get_u32()?;
            beam.auto_limits_min_sample = cursor.get_u32()?;
            beam.auto_limits_max_sample = cursor.get_u32()?;
            beam.user_limits_min_sample = cursor.get_u32()?;
            beam.user_limits_max_sample = cursor.get_u32()?;
            beam.quality = cursor.get_u32()?;
            beam.uncertainty = cursor.get_f32()?;
            cursor.skip(extra)?;
        }
        finish_decode(&cursor, header, RecordType::DetectionDataSetup)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        cursor.put_u64(self.sonar_id);
        cursor.put_u32(self.ping_number);
        cursor.put_u16(self.multi_ping);
        cursor.put_u32(self.n_beams);
        // Unknown per-beam extensions are clamped away on write.
        cursor.put_u32(DETECTION_SETUP_BEAM_SIZE);
        cursor.put_u8(self.detection_algorithm);
        cursor.put_u32(self.flags);
        cursor.put_f32(self.minimum_depth);
        cursor.put_f32(self.maximum_depth);
        cursor.put_f32(self.minimum_range);
        cursor.put_f32(self.maximum_range);
        cursor.put_f32(self.minimum_nadir_search);
        cursor.put_f32(self.maximum_nadir_search);
        cursor.put_u8(self.automatic_filter_window);
        cursor.put_f32(self.applied_roll);
        cursor.put_f32(self.depth_gate_tilt);
        cursor.put_f32(self.nadir_depth);
        cursor.put_bytes(&[0; 52]);
        for beam in &self.beams {
            cursor.put_u16(beam.beam_descriptor);
            cursor.put_f32(beam.detection_point);
            cursor.put_u32(beam.flags);
            cursor.put_u32(beam.auto_limits_min_sample);
            cursor.put_u32(beam.auto_limits_max_sample);
            cursor.put_u32(beam.user_limits_min_sample);
            cursor.put_u32(beam.user_limits_max_sample);
            cursor.put_u32(beam.quality);
            cursor.put_f32(beam.uncertainty);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::test_support::{build_frame, frame_header};

    #[test]
    fn sonar_settings_roundtrip() {
        let settings = SonarSettings {
            sonar_id: 7125,
            ping_number: 42,
            frequency: 400_000.,
            sample_rate: 34_483.,
            receiver_bandwidth: 30_000.,
            tx_pulse_width: 100e-6,
            range_selection: 75.,
            sound_velocity: 1500.,
            ..Default::default()
        };
        let frame = build_frame(RecordType::SonarSettings, |b| settings.encode(b));
        let header = frame_header(&frame);
        let mut decoded = SonarSettings::default();
        decoded.decode(&header, &frame).unwrap();
        assert_eq!(settings, decoded);
    }

    #[test]
    fn bathymetry_version_5_roundtrip() {
        let bathymetry = Bathymetry {
            sonar_id: 7125,
            ping_number: 42,
            n_beams: 3,
            sound_velocity: 1500.,
            ranges: vec![0.1, 0.2, 0.3],
            quality: vec![3, 3, 2],
            intensity: vec![80., 81., 79.],
            min_depth_gate: vec![1., 1., 1.],
            max_depth_gate: vec![100., 100., 100.],
            optional_data: true,
            frequency: 400_000.,
            latitude: 0.8,
            longitude: -2.2,
            heading: 1.,
            tide: 0.2,
            depths: vec![50., 51., 52.],
            alongtrack: vec![0., 0., 0.],
            acrosstrack: vec![-10., 0., 10.],
            pointing_angles: vec![-0.5, 0., 0.5],
            azimuth_angles: vec![0., 0., 0.],
            ..Default::default()
        };
        let frame = build_frame(RecordType::Bathymetry, |b| bathymetry.encode(b));
        let header = frame_header(&frame);
        assert_eq!(5, header.record_version);
        assert_ne!(0, header.optional_data_offset);
        let mut decoded = Bathymetry::default();
        decoded.decode(&header, &frame).unwrap();
        assert_eq!(bathymetry, decoded);
    }

    #[test]
    fn bathymetry_without_optional_zero_fills() {
        let bathymetry = Bathymetry {
            sonar_id: 7125,
            ping_number: 43,
            n_beams: 2,
            ranges: vec![0.1, 0.2],
            quality: vec![1, 2],
            intensity: vec![10., 20.],
            min_depth_gate: vec![0., 0.],
            max_depth_gate: vec![0., 0.],
            ..Default::default()
        };
        let frame = build_frame(RecordType::Bathymetry, |b| bathymetry.encode(b));
        let header = frame_header(&frame);
        assert_eq!(0, header.optional_data_offset);
        let mut decoded = Bathymetry {
            latitude: 99.,
            depths: vec![1., 2., 3.],
            ..Default::default()
        };
        decoded.decode(&header, &frame).unwrap();
        assert!(!decoded.optional_data);
        assert_eq!(0., decoded.latitude);
        assert!(decoded.depths.is_empty());
    }

    #[test]
    fn side_scan_16_bit_roundtrip() {
        let side_scan = SideScan {
            sonar_id: 7125,
            ping_number: 42,
            n_samples: 4,
            sample_size: 2,
            port: Samples::U16(vec![1, 2, 3, 4]),
            starboard: Samples::U16(vec![5, 6, 7, 8]),
            ..Default::default()
        };
        let frame = build_frame(RecordType::SideScan, |b| side_scan.encode(b));
        let header = frame_header(&frame);
        let mut decoded = SideScan::default();
        decoded.decode(&header, &frame).unwrap();
        assert_eq!(side_scan, decoded);
    }

    #[test]
    fn side_scan_rejects_undefined_width() {
        let side_scan = SideScan {
            n_samples: 0,
            sample_size: 3,
            port: Samples::U8(Vec::new()),
            starboard: Samples::U8(Vec::new()),
            ..Default::default()
        };
        let frame = build_frame(RecordType::SideScan, |b| side_scan.encode(b));
        let header = frame_header(&frame);
        let mut decoded = SideScan::default();
        assert!(matches!(
            decoded.decode(&header, &frame),
            Err(Error::SampleWidth { width: 3, .. })
        ));
    }

    #[test]
    fn ping_motion_flag_gated_channels() {
        use super::ping_motion_fields::{HEAVE, PITCH, ROLL};
        let motion = PingMotion {
            sonar_id: 7125,
            ping_number: 42,
            n: 2,
            flags: PITCH | ROLL | HEAVE,
            sampling_rate: 50.,
            pitch: 0.02,
            roll: vec![0.01, 0.015],
            heave: vec![0.1, 0.12],
            ..Default::default()
        };
        let frame = build_frame(RecordType::PingMotion, |b| motion.encode(b));
        let header = frame_header(&frame);
        let mut decoded = PingMotion::default();
        decoded.decode(&header, &frame).unwrap();
        assert_eq!(motion, decoded);
        assert!(decoded.heading.is_empty());
    }

    #[test]
    fn detection_setup_clamps_field_size_on_write() {
        let setup = DetectionDataSetup {
            sonar_id: 7125,
            ping_number: 42,
            n_beams: 1,
            data_field_size: 40, // decoded from a newer producer
            beams: vec![DetectionSetupBeam {
                beam_descriptor: 0,
                detection_point: 100.5,
                quality: 3,
                ..Default::default()
            }],
            ..Default::default()
        };
        let frame = build_frame(RecordType::DetectionDataSetup, |b| setup.encode(b));
        let header = frame_header(&frame);
        let mut decoded = DetectionDataSetup::default();
        decoded.decode(&header, &frame).unwrap();
        assert_eq!(DETECTION_SETUP_BEAM_SIZE, decoded.data_field_size);
        assert_eq!(setup.beams, decoded.beams);
    }

    #[test]
    fn beam_geometry_roundtrip() {
        let geometry = BeamGeometry {
            sonar_id: 7125,
            n_beams: 2,
            angle_vertical: vec![0., 0.],
            angle_horizontal: vec![-0.7, 0.7],
            beamwidth_vertical: vec![0.017, 0.017],
            beamwidth_horizontal: vec![0.017, 0.017],
        };
        let frame = build_frame(RecordType::BeamGeometry, |b| geometry.encode(b));
        let header = frame_header(&frame);
        let mut decoded = BeamGeometry::default();
        decoded.decode(&header, &frame).unwrap();
        assert_eq!(geometry, decoded);
    }
}
