//! Constants describing the sonar family behind this format.

/// The most beams any record of this family may carry.
pub const MAX_BEAMS: u16 = 512;

/// The most side-scan pixels any record of this family may carry.
pub const MAX_PIXELS: u16 = 4096;

/// Where a category of ancillary data is taken from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourcePreference {
    /// Prefer the values embedded in ping records, fall back to the
    /// dedicated asynchronous records.
    PingEmbedded,
    /// Only the dedicated asynchronous records supply this category.
    AsyncRecord,
}

/// Static facts about the format, for capability queries.
#[derive(Clone, Copy, Debug)]
pub struct FormatInfo {
    /// The sonar family name.
    pub family: &'static str,
    /// Maximum beams per ping.
    pub max_beams: u16,
    /// Maximum side-scan pixels per ping.
    pub max_pixels: u16,
    /// Default acrosstrack beam width, degrees.
    pub beamwidth_xtrack: f64,
    /// Default alongtrack beam width, degrees.
    pub beamwidth_ltrack: f64,
    /// Where navigation comes from.
    pub nav_source: SourcePreference,
    /// Where heading comes from.
    pub heading_source: SourcePreference,
    /// Where attitude comes from.
    pub attitude_source: SourcePreference,
    /// Where vehicle depth comes from.
    pub depth_source: SourcePreference,
    /// Where sound velocity comes from.
    pub sound_velocity_source: SourcePreference,
}

/// Returns the format's static description.
///
/// # Examples
///
/// ```
/// let info = s7k::format_info();
/// assert_eq!(512, info.max_beams);
/// assert_eq!(1.0, info.beamwidth_xtrack);
/// ```
pub fn format_info() -> FormatInfo {
    FormatInfo {
        family: "Teledyne Reson SeaBat 7k series",
        max_beams: MAX_BEAMS,
        max_pixels: MAX_PIXELS,
        beamwidth_xtrack: 1.0,
        beamwidth_ltrack: 1.0,
        nav_source: SourcePreference::PingEmbedded,
        heading_source: SourcePreference::PingEmbedded,
        attitude_source: SourcePreference::PingEmbedded,
        depth_source: SourcePreference::AsyncRecord,
        sound_velocity_source: SourcePreference::AsyncRecord,
    }
}
