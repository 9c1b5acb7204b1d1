//! Water-column and beamformed acoustic records.
//!
//! These are the bulkiest records in a stream. Sample widths are selected at
//! runtime: the water-column record packs three width nibbles into its
//! sample-type word, and the compressed water column derives its width from a
//! flag word.

use super::{FrameBuilder, Samples, body_cursor, finish_decode};
use crate::cursor::grow_exact;
use crate::header::{CHECKSUM_SIZE, Header};
use crate::record::RecordType;
use crate::records::samples::SampleKind;
use crate::{Error, Result};

/// One water-column beam descriptor.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WaterColumnBeam {
    /// Beam number.
    pub beam_number: u16,
    /// First sample recorded for this beam.
    pub begin_sample: u32,
    /// Last sample recorded for this beam.
    pub end_sample: u32,
}

impl WaterColumnBeam {
    /// The number of samples this beam contributes.
    pub fn sample_count(&self) -> usize {
        (self.end_sample.saturating_sub(self.begin_sample) + 1) as usize
    }
}

/// Water-column data for one ping (7008).
///
/// The sample-type word packs three nibbles: bits 0-3 select the amplitude
/// width (1 = 8 bit, 2 = 16 bit, 3 = 32 bit, 0 = absent), bits 4-7 the phase
/// width, and bits 8-11 the I/Q pair width (1 = 16-bit pairs, 2 = 32-bit
/// pairs). Channels are stored planar: all amplitudes, then all phases, then
/// all interleaved I/Q pairs, in beam-major sample order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WaterColumn {
    #[allow(missing_docs)]
    pub sonar_id: u64,
    #[allow(missing_docs)]
    pub ping_number: u32,
    #[allow(missing_docs)]
    pub multi_ping: u16,
    /// Number of beams.
    pub n_beams: u16,
    /// Samples per beam before subsetting.
    pub samples_per_beam: u32,
    /// Non-zero when only a subset of beams was recorded.
    pub subset_flag: u8,
    /// Zero for beam-major data, one for sample-major.
    pub row_column_flag: u8,
    /// Packed width nibbles.
    pub sample_type: u32,
    /// The beam descriptors.
    pub beams: Vec<WaterColumnBeam>,
    /// Amplitude samples, when the amplitude nibble is non-zero.
    pub amplitude: Samples,
    /// Phase samples, when the phase nibble is non-zero.
    pub phase: Samples,
    /// Interleaved I/Q samples, two per acoustic sample.
    pub iandq: Samples,
}

fn amplitude_kind(nibble: u32, record_type: RecordType) -> Result<Option<SampleKind>> {
    match nibble {
        0 => Ok(None),
        1 => Ok(Some(SampleKind::U8)),
        2 => Ok(Some(SampleKind::U16)),
        3 => Ok(Some(SampleKind::U32)),
        n => Err(Error::SampleWidth {
            record_type,
            width: n as u8,
        }),
    }
}

fn phase_kind(nibble: u32, record_type: RecordType) -> Result<Option<SampleKind>> {
    match nibble {
        0 => Ok(None),
        1 => Ok(Some(SampleKind::I8)),
        2 => Ok(Some(SampleKind::I16)),
        3 => Ok(Some(SampleKind::I32)),
        n => Err(Error::SampleWidth {
            record_type,
            width: n as u8,
        }),
    }
}

fn iandq_kind(nibble: u32, record_type: RecordType) -> Result<Option<SampleKind>> {
    match nibble {
        0 => Ok(None),
        1 => Ok(Some(SampleKind::I16)),
        2 => Ok(Some(SampleKind::I32)),
        n => Err(Error::SampleWidth {
            record_type,
            width: n as u8,
        }),
    }
}

impl WaterColumn {
    /// The amplitude width nibble.
    pub fn amplitude_nibble(&self) -> u32 {
        self.sample_type & 0xF
    }

    /// The phase width nibble.
    pub fn phase_nibble(&self) -> u32 {
        (self.sample_type >> 4) & 0xF
    }

    /// The I/Q width nibble.
    pub fn iandq_nibble(&self) -> u32 {
        (self.sample_type >> 8) & 0xF
    }

    /// Bytes per acoustic sample implied by the three nibbles.
    pub fn bytes_per_sample(&self) -> usize {
        let mut bytes = 0;
        for (kind, pair) in [
            (amplitude_kind(self.amplitude_nibble(), RecordType::WaterColumn), 1),
            (phase_kind(self.phase_nibble(), RecordType::WaterColumn), 1),
            (iandq_kind(self.iandq_nibble(), RecordType::WaterColumn), 2),
        ] {
            if let Ok(Some(kind)) = kind {
                bytes += kind.size() * pair;
            }
        }
        bytes
    }

    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.sonar_id = cursor.get_u64()?;
        self.ping_number = cursor.get_u32()?;
        self.multi_ping = cursor.get_u16()?;
        self.n_beams = cursor.get_u16()?;
        self.samples_per_beam = cursor.get_u32()?;
        self.subset_flag = cursor.get_u8()?;
        self.row_column_flag = cursor.get_u8()?;
        cursor.skip(2)?; // reserved
        self.sample_type = cursor.get_u32()?;
        grow_exact(&mut self.beams, usize::from(self.n_beams))?;
        for beam in &mut self.beams {
            beam.beam_number = cursor.get_u16()?;
            beam.begin_sample = cursor.get_u32()?;
            beam.end_sample = cursor.get_u32()?;
        }
        let total: usize = self.beams.iter().map(WaterColumnBeam::sample_count).sum();
        match amplitude_kind(self.amplitude_nibble(), RecordType::WaterColumn)? {
            Some(kind) => self.amplitude.decode(&mut cursor, kind, total)?,
            None => self.amplitude = Samples::default(),
        }
        match phase_kind(self.phase_nibble(), RecordType::WaterColumn)? {
            Some(kind) => self.phase.decode(&mut cursor, kind, total)?,
            None => self.phase = Samples::I16(Vec::new()),
        }
        match iandq_kind(self.iandq_nibble(), RecordType::WaterColumn)? {
            Some(kind) => self.iandq.decode(&mut cursor, kind, 2 * total)?,
            None => self.iandq = Samples::I16(Vec::new()),
        }
        finish_decode(&cursor, header, RecordType::WaterColumn)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        cursor.put_u64(self.sonar_id);
        cursor.put_u32(self.ping_number);
        cursor.put_u16(self.multi_ping);
        cursor.put_u16(self.n_beams);
        cursor.put_u32(self.samples_per_beam);
        cursor.put_u8(self.subset_flag);
        cursor.put_u8(self.row_column_flag);
        cursor.put_bytes(&[0; 2]);
        cursor.put_u32(self.sample_type);
        for beam in &self.beams {
            cursor.put_u16(beam.beam_number);
            cursor.put_u32(beam.begin_sample);
            cursor.put_u32(beam.end_sample);
        }
        if self.amplitude_nibble() != 0 {
            self.amplitude.encode(cursor);
        }
        if self.phase_nibble() != 0 {
            self.phase.encode(cursor);
        }
        if self.iandq_nibble() != 0 {
            self.iandq.encode(cursor);
        }
        Ok(())
    }
}

/// Beamformed amplitude and phase for one ping (7018).
///
/// Channels are planar: all amplitudes, then all phases, both in beam-major
/// sample order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Beamformed {
    #[allow(missing_docs)]
    pub sonar_id: u64,
    #[allow(missing_docs)]
    pub ping_number: u32,
    #[allow(missing_docs)]
    pub multi_ping: u16,
    /// Number of beams.
    pub n_beams: u16,
    /// Samples per beam.
    pub n_samples: u32,
    /// Amplitude per sample.
    pub amplitude: Vec<i16>,
    /// Phase per sample, radians scaled to i16.
    pub phase: Vec<i16>,
}

impl Beamformed {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.sonar_id = cursor.get_u64()?;
        self.ping_number = cursor.get_u32()?;
        self.multi_ping = cursor.get_u16()?;
        self.n_beams = cursor.get_u16()?;
        self.n_samples = cursor.get_u32()?;
        cursor.skip(32)?; // reserved
        let total = usize::from(self.n_beams) * self.n_samples as usize;
        for channel in [&mut self.amplitude, &mut self.phase] {
            grow_exact(channel, total)?;
            for sample in channel.iter_mut() {
                *sample = cursor.get_i16()?;
            }
        }
        finish_decode(&cursor, header, RecordType::Beamformed)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        cursor.put_u64(self.sonar_id);
        cursor.put_u32(self.ping_number);
        cursor.put_u16(self.multi_ping);
        cursor.put_u16(self.n_beams);
        cursor.put_u32(self.n_samples);
        cursor.put_bytes(&[0; 32]);
        for channel in [&self.amplitude, &self.phase] {
            for &sample in channel {
                cursor.put_i16(sample);
            }
        }
        Ok(())
    }
}

/// Raw vernier element data (7019).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VernierProcessingDataRaw {
    #[allow(missing_docs)]
    pub sonar_id: u64,
    #[allow(missing_docs)]
    pub ping_number: u32,
    #[allow(missing_docs)]
    pub multi_ping: u16,
    /// Reference array number.
    pub reference_array: u8,
    /// First vernier pair array.
    pub pair1_array: u8,
    /// Second vernier pair array.
    pub pair2_array: u8,
    /// Decimation factor applied before recording.
    pub decimator: u8,
    /// Beam the elements belong to.
    pub beam_number: u16,
    /// Samples per element.
    pub n_samples: u32,
    /// Samples after decimation.
    pub decimated_samples: u32,
    /// First recorded sample.
    pub first_sample: u32,
    /// Smoothing window type.
    pub smoothing_type: u32,
    /// Smoothing window length.
    pub smoothing_length: u32,
    /// Interleaved I/Q samples, two per acoustic sample, all three arrays
    /// concatenated.
    pub iandq: Vec<i16>,
}

impl VernierProcessingDataRaw {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.sonar_id = cursor.get_u64()?;
        self.ping_number = cursor.get_u32()?;
        self.multi_ping = cursor.get_u16()?;
        self.reference_array = cursor.get_u8()?;
        self.pair1_array = cursor.get_u8()?;
        self.pair2_array = cursor.get_u8()?;
        self.decimator = cursor.get_u8()?;
        self.beam_number = cursor.get_u16()?;
        self.n_samples = cursor.get_u32()?;
        self.decimated_samples = cursor.get_u32()?;
        self.first_sample = cursor.get_u32()?;
        cursor.skip(8)?; // reserved
        self.smoothing_type = cursor.get_u32()?;
        self.smoothing_length = cursor.get_u32()?;
        cursor.skip(8)?; // reserved
        let total = 3 * 2 * self.decimated_samples as usize;
        grow_exact(&mut self.iandq, total)?;
        for sample in &mut self.iandq {
            *sample = cursor.get_i16()?;
        }
        finish_decode(&cursor, header, RecordType::VernierProcessingDataRaw)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        cursor.put_u64(self.sonar_id);
        cursor.put_u32(self.ping_number);
        cursor.put_u16(self.multi_ping);
        cursor.put_u8(self.reference_array);
        cursor.put_u8(self.pair1_array);
        cursor.put_u8(self.pair2_array);
        cursor.put_u8(self.decimator);
        cursor.put_u16(self.beam_number);
        cursor.put_u32(self.n_samples);
        cursor.put_u32(self.decimated_samples);
        cursor.put_u32(self.first_sample);
        cursor.put_bytes(&[0; 8]);
        cursor.put_u32(self.smoothing_type);
        cursor.put_u32(self.smoothing_length);
        cursor.put_bytes(&[0; 8]);
        for &sample in &self.iandq {
            cursor.put_i16(sample);
        }
        Ok(())
    }
}

/// Filtered vernier angle estimates (7029).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VernierProcessingDataFiltered {
    #[allow(missing_docs)]
    pub sonar_id: u64,
    #[allow(missing_docs)]
    pub ping_number: u32,
    #[allow(missing_docs)]
    pub multi_ping: u16,
    /// Number of angle estimates.
    pub n: u16,
    /// Elevation angle per estimate, radians.
    pub angles: Vec<f32>,
    /// Estimate quality, zero to one.
    pub qualities: Vec<f32>,
}

impl VernierProcessingDataFiltered {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.sonar_id = cursor.get_u64()?;
        self.ping_number = cursor.get_u32()?;
        self.multi_ping = cursor.get_u16()?;
        self.n = cursor.get_u16()?;
        cursor.skip(2)?; // reserved
        let n = usize::from(self.n);
        grow_exact(&mut self.angles, n)?;
        grow_exact(&mut self.qualities, n)?;
        for i in 0..n {
            self.angles[i] = cursor.get_f32()?;
            self.qualities[i] = cursor.get_f32()?;
        }
        finish_decode(&cursor, header, RecordType::VernierProcessingDataFiltered)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        cursor.put_u64(self.sonar_id);
        cursor.put_u32(self.ping_number);
        cursor.put_u16(self.multi_ping);
        cursor.put_u16(self.n);
        cursor.put_bytes(&[0; 2]);
        for (&angle, &quality) in self.angles.iter().zip(&self.qualities) {
            cursor.put_f32(angle);
            cursor.put_f32(quality);
        }
        Ok(())
    }
}

/// Compressed beamformed magnitude (7041).
///
/// The payload layout is not reliably documented; the record is framed but
/// its samples are carried as raw bytes and round-tripped verbatim.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompressedBeamformedMagnitude {
    #[allow(missing_docs)]
    pub sonar_id: u64,
    #[allow(missing_docs)]
    pub ping_number: u32,
    #[allow(missing_docs)]
    pub multi_ping: u16,
    /// Number of beams.
    pub n_beams: u16,
    /// The undecoded payload.
    pub data: Vec<u8>,
}

impl CompressedBeamformedMagnitude {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.sonar_id = cursor.get_u64()?;
        self.ping_number = cursor.get_u32()?;
        self.multi_ping = cursor.get_u16()?;
        self.n_beams = cursor.get_u16()?;
        let remaining = (header.size as usize - CHECKSUM_SIZE).saturating_sub(cursor.position());
        grow_exact(&mut self.data, remaining)?;
        let bytes = cursor.get_slice(remaining)?;
        self.data.copy_from_slice(bytes);
        finish_decode(&cursor, header, RecordType::CompressedBeamformedMagnitude)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        cursor.put_u64(self.sonar_id);
        cursor.put_u32(self.ping_number);
        cursor.put_u16(self.multi_ping);
        cursor.put_u16(self.n_beams);
        cursor.put_bytes(&self.data);
        Ok(())
    }
}

/// Flag bits of the compressed water-column record.
mod cwc_flags {
    pub const MAGNITUDE_ONLY: u32 = 1 << 0;
    pub const EIGHT_BIT: u32 = 1 << 1;
    pub const THIRTY_TWO_BIT: u32 = 1 << 12;
    pub const COMPRESSION_FACTOR: u32 = 1 << 13;
    pub const SEGMENT_NUMBERS: u32 = 1 << 14;
    pub const FIRST_SAMPLE_RXDELAY: u32 = 1 << 15;
}

/// One compressed water-column beam.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompressedWaterColumnBeam {
    /// Beam number.
    pub beam_number: u16,
    /// Transmit segment, present only when the record's segment-number flag
    /// is set.
    pub segment_number: u8,
    /// Samples recorded for this beam.
    pub n_samples: u32,
    /// The samples; magnitude, or interleaved magnitude and phase pairs when
    /// the record carries phase.
    pub samples: Samples,
}

/// Compressed water-column data for one ping (7042).
///
/// The flag word drives the wire layout: bit 0 drops phase, bit 1 compresses
/// to 8-bit magnitudes, bits 4-7 hold the downsampling divisor, bits 8-11
/// the downsampling kind, bit 12 selects 32-bit samples, bit 13 gates the
/// compression-factor field, bit 14 adds a per-beam segment number, and bit
/// 15 marks the first sample of each beam as a receive delay.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompressedWaterColumn {
    #[allow(missing_docs)]
    pub sonar_id: u64,
    #[allow(missing_docs)]
    pub ping_number: u32,
    #[allow(missing_docs)]
    pub multi_ping: u16,
    /// Number of beams.
    pub n_beams: u16,
    /// Samples per beam before compression.
    pub samples: u32,
    /// Samples per beam after compression.
    pub compressed_samples: u32,
    /// The layout-driving flag word.
    pub flags: u32,
    /// First recorded sample.
    pub first_sample: u32,
    /// Sample rate after downsampling, Hz.
    pub sample_rate: f32,
    /// Compression factor, present only when bit 13 is set.
    pub compression_factor: f32,
    /// The beams.
    pub beams: Vec<CompressedWaterColumnBeam>,
}

impl CompressedWaterColumn {
    /// True when the record carries magnitude only, no phase.
    pub fn magnitude_only(&self) -> bool {
        self.flags & cwc_flags::MAGNITUDE_ONLY != 0
    }

    /// The downsampling divisor from flag bits 4-7.
    pub fn downsampling_divisor(&self) -> u32 {
        (self.flags >> 4) & 0xF
    }

    /// The downsampling kind from flag bits 8-11.
    pub fn downsampling_kind(&self) -> u32 {
        (self.flags >> 8) & 0xF
    }

    /// True when each beam's first sample holds the receive delay.
    pub fn first_sample_is_rxdelay(&self) -> bool {
        self.flags & cwc_flags::FIRST_SAMPLE_RXDELAY != 0
    }

    fn sample_kind(&self) -> SampleKind {
        if self.flags & cwc_flags::EIGHT_BIT != 0 {
            SampleKind::U8
        } else if self.flags & cwc_flags::THIRTY_TWO_BIT != 0 {
            SampleKind::U32
        } else {
            SampleKind::U16
        }
    }

    /// Values per acoustic sample: one for magnitude, two with phase.
    fn values_per_sample(&self) -> usize {
        if self.magnitude_only() { 1 } else { 2 }
    }

    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.sonar_id = cursor.get_u64()?;
        self.ping_number = cursor.get_u32()?;
        self.multi_ping = cursor.get_u16()?;
        self.n_beams = cursor.get_u16()?;
        self.samples = cursor.get_u32()?;
        self.compressed_samples = cursor.get_u32()?;
        self.flags = cursor.get_u32()?;
        self.first_sample = cursor.get_u32()?;
        self.sample_rate = cursor.get_f32()?;
        self.compression_factor = if self.flags & cwc_flags::COMPRESSION_FACTOR != 0 {
            cursor.get_f32()?
        } else {
            0.
        };
        cursor.skip(4)?; // reserved
        let kind = self.sample_kind();
        let values = self.values_per_sample();
        let segmented = self.flags & cwc_flags::SEGMENT_NUMBERS != 0;
        grow_exact(&mut self.beams, usize::from(self.n_beams))?;
        for beam in &mut self.beams {
            beam.beam_number = cursor.get_u16()?;
            beam.segment_number = if segmented { cursor.get_u8()? } else { 0 };
            beam.n_samples = cursor.get_u32()?;
            beam.samples
                .decode(&mut cursor, kind, beam.n_samples as usize * values)?;
        }
        finish_decode(&cursor, header, RecordType::CompressedWaterColumn)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        cursor.put_u64(self.sonar_id);
        cursor.put_u32(self.ping_number);
        cursor.put_u16(self.multi_ping);
        cursor.put_u16(self.n_beams);
        cursor.put_u32(self.samples);
        cursor.put_u32(self.compressed_samples);
        cursor.put_u32(self.flags);
        cursor.put_u32(self.first_sample);
        cursor.put_f32(self.sample_rate);
        if self.flags & cwc_flags::COMPRESSION_FACTOR != 0 {
            cursor.put_f32(self.compression_factor);
        }
        cursor.put_bytes(&[0; 4]);
        let segmented = self.flags & cwc_flags::SEGMENT_NUMBERS != 0;
        for beam in &self.beams {
            cursor.put_u16(beam.beam_number);
            if segmented {
                cursor.put_u8(beam.segment_number);
            }
            cursor.put_u32(beam.n_samples);
            beam.samples.encode(cursor);
        }
        Ok(())
    }
}
