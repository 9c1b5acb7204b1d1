//! Snippet and calibrated backscatter records.

use super::{FrameBuilder, Samples, body_cursor, finish_decode};
use crate::cursor::grow_exact;
use crate::header::Header;
use crate::record::RecordType;
use crate::records::samples::SampleKind;
use crate::{Error, Result};

/// One snippet extraction window.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SnippetWindow {
    /// Beam the snippet was cut from.
    pub beam_number: u16,
    /// First sample of the snippet.
    pub snippet_start: u32,
    /// Sample of the bottom detection.
    pub detection_sample: u32,
    /// Last sample of the snippet.
    pub snippet_end: u32,
}

impl SnippetWindow {
    /// The number of samples in this window.
    pub fn sample_count(&self) -> usize {
        (self.snippet_end.saturating_sub(self.snippet_start) + 1) as usize
    }
}

/// Amplitude snippets around each bottom detection (7028).
///
/// Flag bit 0 selects 32-bit intensities; samples are stored beam-major,
/// window after window.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snippet {
    #[allow(missing_docs)]
    pub sonar_id: u64,
    #[allow(missing_docs)]
    pub ping_number: u32,
    #[allow(missing_docs)]
    pub multi_ping: u16,
    /// Number of snippet windows.
    pub n_beams: u16,
    /// Non-zero when the sonar flagged this ping's snippets.
    pub error_flag: u8,
    #[allow(missing_docs)]
    pub control_flags: u8,
    /// Bit 0 selects 32-bit intensities.
    pub flags: u32,
    /// The extraction windows.
    pub windows: Vec<SnippetWindow>,
    /// The intensity samples, beam-major.
    pub intensities: Samples,
}

impl Snippet {
    fn sample_kind(&self) -> SampleKind {
        if self.flags & 0x01 != 0 {
            SampleKind::U32
        } else {
            SampleKind::U16
        }
    }

    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.sonar_id = cursor.get_u64()?;
        self.ping_number = cursor.get_u32()?;
        self.multi_ping = cursor.get_u16()?;
        self.n_beams = cursor.get_u16()?;
        self.error_flag = cursor.get_u8()?;
        self.control_flags = cursor.get_u8()?;
        self.flags = cursor.get_u32()?;
        cursor.skip(24)?; // reserved
        grow_exact(&mut self.windows, usize::from(self.n_beams))?;
        for window in &mut self.windows {
            window.beam_number = cursor.get_u16()?;
            window.snippet_start = cursor.get_u32()?;
            window.detection_sample = cursor.get_u32()?;
            window.snippet_end = cursor.get_u32()?;
        }
        let total: usize = self.windows.iter().map(SnippetWindow::sample_count).sum();
        self.intensities
            .decode(&mut cursor, self.sample_kind(), total)?;
        finish_decode(&cursor, header, RecordType::Snippet)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        cursor.put_u64(self.sonar_id);
        cursor.put_u32(self.ping_number);
        cursor.put_u16(self.multi_ping);
        cursor.put_u16(self.n_beams);
        cursor.put_u8(self.error_flag);
        cursor.put_u8(self.control_flags);
        cursor.put_u32(self.flags);
        cursor.put_bytes(&[0; 24]);
        for window in &self.windows {
            cursor.put_u16(window.beam_number);
            cursor.put_u32(window.snippet_start);
            cursor.put_u32(window.detection_sample);
            cursor.put_u32(window.snippet_end);
        }
        self.intensities.encode(cursor);
        Ok(())
    }
}

/// Calibrated beam amplitudes (7048).
///
/// A dense beams-by-samples grid of calibrated magnitudes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CalibratedBeam {
    #[allow(missing_docs)]
    pub sonar_id: u64,
    #[allow(missing_docs)]
    pub ping_number: u32,
    #[allow(missing_docs)]
    pub multi_ping: u16,
    /// First beam of the grid.
    pub first_beam: u16,
    /// Number of beams in the grid.
    pub n_beams: u16,
    /// Samples per beam.
    pub total_samples: u32,
    #[allow(missing_docs)]
    pub error_flags: u32,
    /// Calibrated magnitudes, dB, beam-major.
    pub samples: Vec<f32>,
}

impl CalibratedBeam {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.sonar_id = cursor.get_u64()?;
        self.ping_number = cursor.get_u32()?;
        self.multi_ping = cursor.get_u16()?;
        self.first_beam = cursor.get_u16()?;
        self.n_beams = cursor.get_u16()?;
        self.total_samples = cursor.get_u32()?;
        self.error_flags = cursor.get_u32()?;
        cursor.skip(8)?; // reserved
        let total = usize::from(self.n_beams) * self.total_samples as usize;
        grow_exact(&mut self.samples, total)?;
        for sample in &mut self.samples {
            *sample = cursor.get_f32()?;
        }
        finish_decode(&cursor, header, RecordType::CalibratedBeam)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        cursor.put_u64(self.sonar_id);
        cursor.put_u32(self.ping_number);
        cursor.put_u16(self.multi_ping);
        cursor.put_u16(self.first_beam);
        cursor.put_u16(self.n_beams);
        cursor.put_u32(self.total_samples);
        cursor.put_u32(self.error_flags);
        cursor.put_bytes(&[0; 8]);
        for &sample in &self.samples {
            cursor.put_f32(sample);
        }
        Ok(())
    }
}

/// Maps the calibrated side-scan width selector to a sample kind.
fn calibrated_kind(width: u8) -> Result<SampleKind> {
    match width {
        2 => Ok(SampleKind::U16),
        4 => Ok(SampleKind::F32),
        _ => Err(Error::SampleWidth {
            record_type: RecordType::CalibratedSideScan,
            width,
        }),
    }
}

/// Calibrated side-scan imagery (7057).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CalibratedSideScan {
    #[allow(missing_docs)]
    pub sonar_id: u64,
    #[allow(missing_docs)]
    pub ping_number: u32,
    #[allow(missing_docs)]
    pub multi_ping: u16,
    /// Beam center position, radians.
    pub beam_position: f32,
    /// Samples per side.
    pub n_samples: u32,
    /// Number of beams forming each side.
    pub n_beams: u16,
    /// Beam this record belongs to.
    pub current_beam: u16,
    /// Bytes per sample: 2 for counts, 4 for calibrated floats.
    pub bytes_per_sample: u8,
    /// Interpretation of the samples.
    pub data_type: u8,
    /// Non-zero when the sonar flagged this record.
    pub error_flag: u8,
    /// Port-side samples.
    pub port: Samples,
    /// Starboard-side samples.
    pub starboard: Samples,
}

impl CalibratedSideScan {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.sonar_id = cursor.get_u64()?;
        self.ping_number = cursor.get_u32()?;
        self.multi_ping = cursor.get_u16()?;
        self.beam_position = cursor.get_f32()?;
        cursor.skip(4)?; // reserved
        self.n_samples = cursor.get_u32()?;
        cursor.skip(4)?; // reserved
        self.n_beams = cursor.get_u16()?;
        self.current_beam = cursor.get_u16()?;
        self.bytes_per_sample = cursor.get_u8()?;
        self.data_type = cursor.get_u8()?;
        self.error_flag = cursor.get_u8()?;
        let kind = calibrated_kind(self.bytes_per_sample)?;
        let n = self.n_samples as usize;
        self.port.decode(&mut cursor, kind, n)?;
        self.starboard.decode(&mut cursor, kind, n)?;
        finish_decode(&cursor, header, RecordType::CalibratedSideScan)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        cursor.put_u64(self.sonar_id);
        cursor.put_u32(self.ping_number);
        cursor.put_u16(self.multi_ping);
        cursor.put_f32(self.beam_position);
        cursor.put_bytes(&[0; 4]);
        cursor.put_u32(self.n_samples);
        cursor.put_bytes(&[0; 4]);
        cursor.put_u16(self.n_beams);
        cursor.put_u16(self.current_beam);
        cursor.put_u8(self.bytes_per_sample);
        cursor.put_u8(self.data_type);
        cursor.put_u8(self.error_flag);
        self.port.encode(cursor);
        self.starboard.encode(cursor);
        Ok(())
    }
}

/// Control-flag bit marking per-sample footprint areas as present.
const BS_FOOTPRINTS: u32 = 1 << 6;

/// Calibrated backscattering strength snippets (7058).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SnippetBackscatteringStrength {
    #[allow(missing_docs)]
    pub sonar_id: u64,
    #[allow(missing_docs)]
    pub ping_number: u32,
    #[allow(missing_docs)]
    pub multi_ping: u16,
    /// Number of snippet windows.
    pub n_beams: u16,
    /// Non-zero when the sonar flagged this ping's snippets.
    pub error_flag: u8,
    /// Bit 6 marks footprint areas as present.
    pub control_flags: u32,
    /// Absorption applied to the calibration, dB per kilometer.
    pub absorption: f32,
    /// The extraction windows.
    pub windows: Vec<SnippetWindow>,
    /// Backscattering strength per sample, dB, beam-major.
    pub bs: Vec<f32>,
    /// Footprint area per sample, square meters, when bit 6 is set.
    pub footprints: Vec<f32>,
}

impl SnippetBackscatteringStrength {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.sonar_id = cursor.get_u64()?;
        self.ping_number = cursor.get_u32()?;
        self.multi_ping = cursor.get_u16()?;
        self.n_beams = cursor.get_u16()?;
        self.error_flag = cursor.get_u8()?;
        self.control_flags = cursor.get_u32()?;
        self.absorption = cursor.get_f32()?;
        cursor.skip(24)?; // reserved
        grow_exact(&mut self.windows, usize::from(self.n_beams))?;
        for window in &mut self.windows {
            window.beam_number = cursor.get_u16()?;
            window.snippet_start = cursor.get_u32()?;
            window.detection_sample = cursor.get_u32()?;
            window.snippet_end = cursor.get_u32()?;
        }
        let total: usize = self.windows.iter().map(SnippetWindow::sample_count).sum();
        grow_exact(&mut self.bs, total)?;
        for sample in &mut self.bs {
            *sample = cursor.get_f32()?;
        }
        if self.control_flags & BS_FOOTPRINTS != 0 {
            grow_exact(&mut self.footprints, total)?;
            for sample in &mut self.footprints {
                *sample = cursor.get_f32()?;
            }
        } else {
            self.footprints.clear();
        }
        finish_decode(&cursor, header, RecordType::SnippetBackscatteringStrength)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        cursor.put_u64(self.sonar_id);
        cursor.put_u32(self.ping_number);
        cursor.put_u16(self.multi_ping);
        cursor.put_u16(self.n_beams);
        cursor.put_u8(self.error_flag);
        cursor.put_u32(self.control_flags);
        cursor.put_f32(self.absorption);
        cursor.put_bytes(&[0; 24]);
        for window in &self.windows {
            cursor.put_u16(window.beam_number);
            cursor.put_u32(window.snippet_start);
            cursor.put_u32(window.detection_sample);
            cursor.put_u32(window.snippet_end);
        }
        for &sample in &self.bs {
            cursor.put_f32(sample);
        }
        if self.control_flags & BS_FOOTPRINTS != 0 {
            for &sample in &self.footprints {
                cursor.put_f32(sample);
            }
        }
        Ok(())
    }
}

/// Post-processed side-scan of one ping (3199).
///
/// Produced by downstream processing rather than the sonar; regenerated
/// side-scan with its geometry already resolved.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProcessedSideScan {
    #[allow(missing_docs)]
    pub sonar_id: u64,
    #[allow(missing_docs)]
    pub ping_number: u32,
    #[allow(missing_docs)]
    pub multi_ping: u16,
    /// What the side-scan was generated from.
    pub ss_source: u32,
    /// Interpretation of the side-scan values.
    pub ss_type: u32,
    /// Number of pixels across the swath.
    pub n_pixels: u32,
    /// Acrosstrack size of one pixel, meters.
    pub pixel_size: f32,
    /// Total swath width, meters.
    pub swath_width: f32,
    /// Altitude used for the geometry, meters.
    pub altitude: f32,
    /// Side-scan value per pixel.
    pub sidescan: Vec<f32>,
    /// Alongtrack distance per pixel, meters.
    pub alongtrack: Vec<f32>,
}

impl ProcessedSideScan {
    pub(crate) fn decode(&mut self, header: &Header, frame: &[u8]) -> Result<()> {
        let mut cursor = body_cursor(frame)?;
        self.sonar_id = cursor.get_u64()?;
        self.ping_number = cursor.get_u32()?;
        self.multi_ping = cursor.get_u16()?;
        self.ss_source = cursor.get_u32()?;
        self.ss_type = cursor.get_u32()?;
        self.n_pixels = cursor.get_u32()?;
        self.pixel_size = cursor.get_f32()?;
        self.swath_width = cursor.get_f32()?;
        self.altitude = cursor.get_f32()?;
        let n = self.n_pixels as usize;
        grow_exact(&mut self.sidescan, n)?;
        for pixel in &mut self.sidescan {
            *pixel = cursor.get_f32()?;
        }
        grow_exact(&mut self.alongtrack, n)?;
        for pixel in &mut self.alongtrack {
            *pixel = cursor.get_f32()?;
        }
        finish_decode(&cursor, header, RecordType::ProcessedSideScan)
    }

    pub(crate) fn encode(&self, builder: &mut FrameBuilder) -> Result<()> {
        let cursor = builder.cursor();
        cursor.put_u64(self.sonar_id);
        cursor.put_u32(self.ping_number);
        cursor.put_u16(self.multi_ping);
        cursor.put_u32(self.ss_source);
        cursor.put_u32(self.ss_type);
        cursor.put_u32(self.n_pixels);
        cursor.put_f32(self.pixel_size);
        cursor.put_f32(self.swath_width);
        cursor.put_f32(self.altitude);
        for &pixel in &self.sidescan {
            cursor.put_f32(pixel);
        }
        for &pixel in &self.alongtrack {
            cursor.put_f32(pixel);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::test_support::{build_frame, frame_header};

    #[test]
    fn snippet_16_bit_roundtrip() {
        let snippet = Snippet {
            sonar_id: 7125,
            ping_number: 42,
            n_beams: 2,
            windows: vec![
                SnippetWindow {
                    beam_number: 0,
                    snippet_start: 10,
                    detection_sample: 12,
                    snippet_end: 13,
                },
                SnippetWindow {
                    beam_number: 1,
                    snippet_start: 20,
                    detection_sample: 21,
                    snippet_end: 21,
                },
            ],
            intensities: Samples::U16(vec![5, 6, 7, 8, 9, 10]),
            ..Default::default()
        };
        let frame = build_frame(RecordType::Snippet, |b| snippet.encode(b));
        let header = frame_header(&frame);
        let mut decoded = Snippet::default();
        decoded.decode(&header, &frame).unwrap();
        assert_eq!(snippet, decoded);
    }

    #[test]
    fn snippet_32_bit_flag() {
        let snippet = Snippet {
            n_beams: 1,
            flags: 0x01,
            windows: vec![SnippetWindow {
                beam_number: 0,
                snippet_start: 0,
                detection_sample: 1,
                snippet_end: 1,
            }],
            intensities: Samples::U32(vec![70_000, 80_000]),
            ..Default::default()
        };
        let frame = build_frame(RecordType::Snippet, |b| snippet.encode(b));
        let header = frame_header(&frame);
        let mut decoded = Snippet::default();
        decoded.decode(&header, &frame).unwrap();
        assert_eq!(snippet, decoded);
    }

    #[test]
    fn backscatter_with_footprints() {
        let bs = SnippetBackscatteringStrength {
            sonar_id: 7125,
            ping_number: 42,
            n_beams: 1,
            control_flags: BS_FOOTPRINTS,
            absorption: 70.,
            windows: vec![SnippetWindow {
                beam_number: 3,
                snippet_start: 5,
                detection_sample: 6,
                snippet_end: 7,
            }],
            bs: vec![-20., -21., -19.5],
            footprints: vec![0.4, 0.41, 0.42],
            ..Default::default()
        };
        let frame = build_frame(RecordType::SnippetBackscatteringStrength, |b| bs.encode(b));
        let header = frame_header(&frame);
        let mut decoded = SnippetBackscatteringStrength::default();
        decoded.decode(&header, &frame).unwrap();
        assert_eq!(bs, decoded);
    }

    #[test]
    fn calibrated_side_scan_float_samples() {
        let side_scan = CalibratedSideScan {
            sonar_id: 7125,
            ping_number: 42,
            n_samples: 2,
            bytes_per_sample: 4,
            port: Samples::F32(vec![-30.5, -31.]),
            starboard: Samples::F32(vec![-29., -28.5]),
            ..Default::default()
        };
        let frame = build_frame(RecordType::CalibratedSideScan, |b| side_scan.encode(b));
        let header = frame_header(&frame);
        let mut decoded = CalibratedSideScan::default();
        decoded.decode(&header, &frame).unwrap();
        assert_eq!(side_scan, decoded);
    }

    #[test]
    fn processed_side_scan_roundtrip() {
        let processed = ProcessedSideScan {
            sonar_id: 7125,
            ping_number: 42,
            ss_source: 7028,
            n_pixels: 3,
            pixel_size: 0.25,
            swath_width: 150.,
            altitude: 40.,
            sidescan: vec![1., 2., 3.],
            alongtrack: vec![0., 0.1, 0.2],
            ..Default::default()
        };
        let frame = build_frame(RecordType::ProcessedSideScan, |b| processed.encode(b));
        let header = frame_header(&frame);
        let mut decoded = ProcessedSideScan::default();
        decoded.decode(&header, &frame).unwrap();
        assert_eq!(processed, decoded);
    }
}
