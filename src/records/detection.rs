//! Bottom-detection records, the heart of each ping.
//!
//! A ping is only considered complete once one of these two records has been
//! seen; everything else in the ping hangs off their detections.

use super::{FrameBuilder, body_cursor, finish_decode};
use crate::cursor::{ReadCursor, grow_exact};
use crate::header::Header;
use crate::info::MAX_BEAMS;
use crate::record::RecordType;
use crate::{Error, Result};

/// One raw bottom detection.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RawDetectionBeam {
    /// Beam the detection was made on.
    pub beam_descriptor: u16,
    /// Detection point, fractional samples.
    pub detection_point: f32,
    /// Receive steering angle, radians.
    pub rx_angle: f32,
    /// Detection method and validity bits.
    pub flags: u32,
    /// Detection quality.
    pub quality: u32,
    /// Detection uncertainty, present at field size 22 and up.
    pub uncertainty: f32,
    /// Signal strength, present at field size 26 and up.
    pub signal_strength: f32,
    /// Gate lower limit, present at field size 30 and up.
    pub limit_min: f32,
    /// Gate upper limit, present at field size 34 and up.
    pub limit_max: f32,
}

/// The documented per-beam field sizes, smallest first.
const RAW_DETECTION_SIZES: [u32; 5] = [18, 22, 26, 30, 34];

/// Clamps a wire field size to the largest documented layout it covers.
fn documented_size(data_field_size: u32) -> u32 {
    RAW_DETECTION_SIZES
        .iter()
        .rev()
        .copied()
        .find(|&size| data_field_size >= size)
        .unwrap_or(RAW_DETECTION_SIZES[0])
}

/// Raw bottom detections for one ping (7027).
///
/// The per-beam layout has grown over firmware revisions; `data_field_size`
/// says how many bytes each entry occupies, and the tail fields only exist
/// when it is large enough. Unknown growth beyond the documented 34 bytes is
/// skipped on read and clamped away on write.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawDetection {
    #[allow(missing_docs)]
    pub sonar_id: u64,
    #[allow(missing_docs)]
    pub ping_number: u32,
    #[allow(missing_docs)]
    pub multi_ping: u16,
    /// Number of detections.
    pub n_beams: u32,
    /// Bytes per detection entry on the wire.
    pub data_field_size: u32,
    /// Detection algorithm identifier.
    pub detection_algorithm: u8,
    #[allow(missing_docs)]
    pub flags: u32,
    /// Sample rate, Hz.
    pub sampling_rate: f32,
    /// Transmit steering angle, radians.
    pub tx_angle: f32,
    /// Roll applied to the detections, radians.
    pub applied_roll: f32,
    /// The detections.
    pub beams: Vec<RawDetectionBeam>,
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

impl RawDetection {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.sonar_id = cursor.get_u64()?;
        self.ping_number = cursor.get_u32()?;
        self.multi_ping = cursor.get_u16()?;
        self.n_beams = cursor.get_u32()?;
        self.data_field_size = cursor.get_u32()?;
        self.detection_algorithm = cursor.get_u8()?;
        self.flags = cursor.get_u32()?;
        self.sampling_rate = cursor.get_f32()?;
        self.tx_angle = cursor.get_f32()?;
        self.applied_roll = cursor.get_f32()?;
        cursor.skip(60)?; // reserved
        let documented = documented_size(self.data_field_size);
        let extra = self.data_field_size.saturating_sub(documented) as usize;
        grow_exact(&mut self.beams, self.n_beams as usize)?;
        for beam in &mut self.beams {
            beam.beam_descriptor = cursor.get_u16()?;
            if beam.beam_descriptor >= MAX_BEAMS {
                return Err(Error::BeamDescriptor {
                    beam: beam.beam_descriptor,
                    max: MAX_BEAMS,
                });
            }
            beam.detection_point = cursor.get_f32()?;
            beam.rx_angle = cursor.get_f32()?;
            beam.flags = cursor.get_u32()?;
            beam.quality = cursor.get_u32()?;
            beam.uncertainty = if documented >= 22 { cursor.get_f32()? } else { 0. };
            beam.signal_strength = if documented >= 26 { cursor.get_f32()? } else { 0. };
            beam.limit_min = if documented >= 30 { cursor.get_f32()? } else { 0. };
            beam.limit_max = if documented >= 34 { cursor.get_f32()? } else { 0. };
            cursor.skip(extra)?;
        }
        self.decode_optional(header, &mut cursor)?;
        finish_decode(&cursor, header, RecordType::RawDetection)
    }

    fn decode_optional(&mut self, header: &Header, cursor: &mut ReadCursor<'_>) -> Result<()> {
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
        let n = self.n_beams as usize;
        for channel in [
            &mut self.depths,
            &mut self.alongtrack,
            &mut self.acrosstrack,
            &mut self.pointing_angles,
            &mut self.azimuth_angles,
        ] {
            grow_exact(channel, n)?;
        }
        for i in 0..n {
            self.depths[i] = cursor.get_f32()?;
            self.alongtrack[i] = cursor.get_f32()?;
            self.acrosstrack[i] = cursor.get_f32()?;
            self.pointing_angles[i] = cursor.get_f32()?;
            self.azimuth_angles[i] = cursor.get_f32()?;
        }
        Ok(())
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let documented = documented_size(self.data_field_size);
        let cursor = builder.cursor();
        cursor.put_u64(self.sonar_id);
        cursor.put_u32(self.ping_number);
        cursor.put_u16(self.multi_ping);
        cursor.put_u32(self.n_beams);
        cursor.put_u32(documented);
        cursor.put_u8(self.detection_algorithm);
        cursor.put_u32(self.flags);
        cursor.put_f32(self.sampling_rate);
        cursor.put_f32(self.tx_angle);
        cursor.put_f32(self.applied_roll);
        cursor.put_bytes(&[0; 60]);
        for beam in &self.beams {
            cursor.put_u16(beam.beam_descriptor);
            cursor.put_f32(beam.detection_point);
            cursor.put_f32(beam.rx_angle);
            cursor.put_u32(beam.flags);
            cursor.put_u32(beam.quality);
            if documented >= 22 {
                cursor.put_f32(beam.uncertainty);
            }
            if documented >= 26 {
                cursor.put_f32(beam.signal_strength);
            }
            if documented >= 30 {
                cursor.put_f32(beam.limit_min);
            }
            if documented >= 34 {
                cursor.put_f32(beam.limit_max);
            }
        }
        if self.optional_data {
            builder.begin_optional(RecordType::RawDetection as u32);
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
            for i in 0..self.n_beams as usize {
                cursor.put_f32(self.depths.get(i).copied().unwrap_or_default());
                cursor.put_f32(self.alongtrack.get(i).copied().unwrap_or_default());
                cursor.put_f32(self.acrosstrack.get(i).copied().unwrap_or_default());
                cursor.put_f32(self.pointing_angles.get(i).copied().unwrap_or_default());
                cursor.put_f32(self.azimuth_angles.get(i).copied().unwrap_or_default());
            }
        }
        Ok(())
    }
}

/// One transmit segment descriptor.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TxSegment {
    /// Segment number.
    pub segment_number: u16,
    /// Transmit steering, alongtrack, radians.
    pub tx_angle_along: f32,
    /// Transmit steering, acrosstrack, radians.
    pub tx_angle_across: f32,
    /// Transmit delay, seconds.
    pub tx_delay: f32,
    /// Center frequency, Hz.
    pub frequency: f32,
    /// Pulse type identifier.
    pub pulse_type: u32,
    /// Pulse bandwidth, Hz.
    pub pulse_bandwidth: f32,
    /// Pulse width, seconds.
    pub tx_pulse_width: f32,
    /// Pulse envelope identifier.
    pub tx_pulse_envelope: u32,
    /// Transmit power, dB re 1 micropascal.
    pub tx_power: f32,
}

/// The documented wire size of one [TxSegment].
const TX_SEGMENT_SIZE: u16 = 38;

/// One receive detection descriptor.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RxDetection {
    /// Beam the detection was made on.
    pub beam_number: u16,
    /// Transmit segment the detection used.
    pub used_segment: u8,
    /// Detection point, fractional samples.
    pub detection_point: f32,
    /// Receive steering angle, acrosstrack, radians.
    pub rx_angle_cross: f32,
    /// Detection method and validity bits.
    pub flags: u32,
    /// Detection quality.
    pub quality: u32,
    /// Detection uncertainty.
    pub uncertainty: f32,
    /// Signal strength, dB.
    pub signal_strength: f32,
    /// Signal-to-noise ratio, dB.
    pub sn_ratio: f32,
}

/// The documented wire size of one [RxDetection].
const RX_DETECTION_SIZE: u16 = 31;

/// Segmented raw detections for multi-segment transmissions (7047).
///
/// Two parallel tables: transmit segment descriptors and receive detections,
/// each with a declared per-entry size so newer producers can append fields
/// without breaking old readers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SegmentedRawDetection {
    #[allow(missing_docs)]
    pub sonar_id: u64,
    #[allow(missing_docs)]
    pub ping_number: u32,
    #[allow(missing_docs)]
    pub multi_ping: u16,
    /// Number of transmit segments.
    pub n_segments: u16,
    /// Bytes per segment descriptor on the wire.
    pub segment_field_size: u16,
    /// Number of receive detections.
    pub n_rx: u32,
    /// Bytes per receive descriptor on the wire.
    pub rx_field_size: u16,
    /// Detection algorithm identifier.
    pub detection_algorithm: u8,
    #[allow(missing_docs)]
    pub flags: u32,
    /// Sample rate, Hz.
    pub sampling_rate: f32,
    /// The transmit segments.
    pub segments: Vec<TxSegment>,
    /// The receive detections.
    pub rx: Vec<RxDetection>,
}

impl SegmentedRawDetection {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.sonar_id = cursor.get_u64()?;
        self.ping_number = cursor.get_u32()?;
        self.multi_ping = cursor.get_u16()?;
        self.n_segments = cursor.get_u16()?;
        self.segment_field_size = cursor.get_u16()?;
        self.n_rx = cursor.get_u32()?;
        self.rx_field_size = cursor.get_u16()?;
        self.detection_algorithm = cursor.get_u8()?;
        self.flags = cursor.get_u32()?;
        self.sampling_rate = cursor.get_f32()?;
        let segment_extra = self.segment_field_size.saturating_sub(TX_SEGMENT_SIZE) as usize;
        grow_exact(&mut self.segments, usize::from(self.n_segments))?;
        for segment in &mut self.segments {
            segment.segment_number = cursor.get_u16()?;
            segment.tx_angle_along = cursor.get_f32()?;
            segment.tx_angle_across = cursor.get_f32()?;
            segment.tx_delay = cursor.get_f32()?;
            segment.frequency = cursor.get_f32()?;
            segment.pulse_type = cursor.get_u32()?;
            segment.pulse_bandwidth = cursor.get_f32()?;
            segment.tx_pulse_width = cursor.get_f32()?;
            segment.tx_pulse_envelope = cursor.get_u32()?;
            segment.tx_power = cursor.get_f32()?;
            cursor.skip(segment_extra)?;
        }
        let rx_extra = self.rx_field_size.saturating_sub(RX_DETECTION_SIZE) as usize;
        grow_exact(&mut self.rx, self.n_rx as usize)?;
        for rx in &mut self.rx {
            rx.beam_number = cursor.get_u16()?;
            rx.used_segment = cursor.get_u8()?;
            rx.detection_point = cursor.get_f32()?;
            rx.rx_angle_cross = cursor.get_f32()?;
            rx.flags = cursor.get_u32()?;
            rx.quality = cursor.get_u32()?;
            rx.uncertainty = cursor.get_f32()?;
            rx.signal_strength = cursor.get_f32()?;
            rx.sn_ratio = cursor.get_f32()?;
            cursor.skip(rx_extra)?;
        }
        finish_decode(&cursor, header, RecordType::SegmentedRawDetection)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        cursor.put_u64(self.sonar_id);
        cursor.put_u32(self.ping_number);
        cursor.put_u16(self.multi_ping);
        cursor.put_u16(self.n_segments);
        cursor.put_u16(TX_SEGMENT_SIZE);
        cursor.put_u32(self.n_rx);
        cursor.put_u16(RX_DETECTION_SIZE);
        cursor.put_u8(self.detection_algorithm);
        cursor.put_u32(self.flags);
        cursor.put_f32(self.sampling_rate);
        for segment in &self.segments {
            cursor.put_u16(segment.segment_number);
            cursor.put_f32(segment.tx_angle_along);
            cursor.put_f32(segment.tx_angle_across);
            cursor.put_f32(segment.tx_delay);
            cursor.put_f32(segment.frequency);
            cursor.put_u32(segment.pulse_type);
            cursor.put_f32(segment.pulse_bandwidth);
            cursor.put_f32(segment.tx_pulse_width);
            cursor.put_u32(segment.tx_pulse_envelope);
            cursor.put_f32(segment.tx_power);
        }
        for rx in &self.rx {
            cursor.put_u16(rx.beam_number);
            cursor.put_u8(rx.used_segment);
            cursor.put_f32(rx.detection_point);
            cursor.put_f32(rx.rx_angle_cross);
            cursor.put_u32(rx.flags);
            cursor.put_u32(rx.quality);
            cursor.put_f32(rx.uncertainty);
            cursor.put_f32(rx.signal_strength);
            cursor.put_f32(rx.sn_ratio);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::test_support::{build_frame, frame_header};

    fn example_beams(n: u16) -> Vec<RawDetectionBeam> {
        (0..n)
            .map(|i| RawDetectionBeam {
                beam_descriptor: i,
                detection_point: 100. + f32::from(i),
                rx_angle: f32::from(i) * 0.01 - 1.,
                flags: 1,
                quality: 3,
                uncertainty: 0.1,
                signal_strength: 40.,
                limit_min: 10.,
                limit_max: 200.,
            })
            .collect()
    }

    #[test]
    fn raw_detection_full_roundtrip() {
        let detection = RawDetection {
            sonar_id: 7125,
            ping_number: 42,
            n_beams: 4,
            data_field_size: 34,
            detection_algorithm: 2,
            sampling_rate: 34_483.,
            tx_angle: 0.,
            beams: example_beams(4),
            optional_data: true,
            frequency: 400_000.,
            latitude: 0.83,
            longitude: -2.15,
            heading: 1.2,
            height_source: 1,
            tide: 0.1,
            roll: 0.01,
            pitch: -0.02,
            heave: 0.05,
            vehicle_depth: 3.,
            depths: vec![50., 51., 52., 53.],
            alongtrack: vec![0.; 4],
            acrosstrack: vec![-15., -5., 5., 15.],
            pointing_angles: vec![-0.4, -0.1, 0.1, 0.4],
            azimuth_angles: vec![0.; 4],
            ..Default::default()
        };
        let frame = build_frame(RecordType::RawDetection, |b| detection.encode(b));
        let header = frame_header(&frame);
        let mut decoded = RawDetection::default();
        decoded.decode(&header, &frame).unwrap();
        assert_eq!(detection, decoded);
    }

    #[test]
    fn raw_detection_short_field_size_drops_tail_fields() {
        let mut detection = RawDetection {
            sonar_id: 7125,
            ping_number: 42,
            n_beams: 2,
            data_field_size: 22,
            beams: example_beams(2),
            ..Default::default()
        };
        let frame = build_frame(RecordType::RawDetection, |b| detection.encode(b));
        let header = frame_header(&frame);
        let mut decoded = RawDetection::default();
        decoded.decode(&header, &frame).unwrap();
        // the tail fields past the uncertainty never hit the wire
        for beam in &mut detection.beams {
            beam.signal_strength = 0.;
            beam.limit_min = 0.;
            beam.limit_max = 0.;
        }
        assert_eq!(detection, decoded);
    }

    #[test]
    fn raw_detection_rejects_out_of_range_beam() {
        let mut beams = example_beams(2);
        beams[1].beam_descriptor = MAX_BEAMS + 1;
        let detection = RawDetection {
            n_beams: 2,
            data_field_size: 34,
            beams,
            ..Default::default()
        };
        let frame = build_frame(RecordType::RawDetection, |b| detection.encode(b));
        let header = frame_header(&frame);
        let mut decoded = RawDetection::default();
        let err = decoded.decode(&header, &frame).unwrap_err();
        assert!(matches!(err, Error::BeamDescriptor { .. }));
        assert_eq!(crate::ErrorClass::Unintelligible, err.class());
    }

    #[test]
    fn segmented_roundtrip() {
        let detection = SegmentedRawDetection {
            sonar_id: 7125,
            ping_number: 99,
            n_segments: 2,
            segment_field_size: TX_SEGMENT_SIZE,
            n_rx: 3,
            rx_field_size: RX_DETECTION_SIZE,
            detection_algorithm: 1,
            sampling_rate: 34_483.,
            segments: vec![
                TxSegment {
                    segment_number: 0,
                    frequency: 200_000.,
                    tx_power: 200.,
                    ..Default::default()
                },
                TxSegment {
                    segment_number: 1,
                    frequency: 400_000.,
                    tx_power: 205.,
                    ..Default::default()
                },
            ],
            rx: vec![
                RxDetection {
                    beam_number: 0,
                    used_segment: 0,
                    detection_point: 120.5,
                    ..Default::default()
                },
                RxDetection {
                    beam_number: 1,
                    used_segment: 1,
                    detection_point: 130.25,
                    ..Default::default()
                },
                RxDetection {
                    beam_number: 2,
                    used_segment: 1,
                    detection_point: 140.,
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let frame = build_frame(RecordType::SegmentedRawDetection, |b| detection.encode(b));
        let header = frame_header(&frame);
        let mut decoded = SegmentedRawDetection::default();
        decoded.decode(&header, &frame).unwrap();
        assert_eq!(detection, decoded);
    }
}
