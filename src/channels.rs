//! Priority-ordered feeds of asynchronous ancillary data.
//!
//! While reading, navigation, heading, attitude, depth, and altitude samples
//! are mirrored out of their records into per-category feeds. Several record
//! types can supply the same category; each category keeps samples from the
//! best source seen so far, flushing lesser data when a better source shows
//! up and ignoring samples from sources worse than the current one.

use crate::record::RecordType;
use crate::store::Store;

/// One navigation fix.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NavSample {
    /// Epoch seconds.
    pub time: f64,
    /// Longitude, radians.
    pub longitude: f64,
    /// Latitude, radians.
    pub latitude: f64,
    /// Speed over ground, meters per second.
    pub speed: f64,
}

/// One attitude sample.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AttitudeFeedSample {
    /// Epoch seconds.
    pub time: f64,
    /// Roll, radians.
    pub roll: f64,
    /// Pitch, radians.
    pub pitch: f64,
    /// Heave, meters.
    pub heave: f64,
}

/// One scalar sample: heading, depth, or altitude.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScalarSample {
    /// Epoch seconds.
    pub time: f64,
    /// The value.
    pub value: f64,
}

/// A feed that only keeps samples from its best source.
#[derive(Clone, Debug, Default)]
pub struct Feed<T> {
    priority: u8,
    samples: Vec<T>,
}

impl<T> Feed<T> {
    /// The buffered samples, oldest first.
    pub fn samples(&self) -> &[T] {
        &self.samples
    }

    /// The priority of the source currently feeding this buffer.
    pub fn priority(&self) -> u8 {
        self.priority
    }

    fn push(&mut self, priority: u8, sample: T) {
        if priority < self.priority {
            return;
        }
        if priority > self.priority {
            self.samples.clear();
            self.priority = priority;
        }
        self.samples.push(sample);
    }
}

/// The asynchronous feeds of one reader.
#[derive(Clone, Debug, Default)]
pub struct Feeds {
    /// Navigation fixes.
    pub nav: Feed<NavSample>,
    /// Heading samples.
    pub heading: Feed<ScalarSample>,
    /// Attitude samples.
    pub attitude: Feed<AttitudeFeedSample>,
    /// Vehicle depth samples.
    pub depth: Feed<ScalarSample>,
    /// Altitude samples.
    pub altitude: Feed<ScalarSample>,
}

// Source priorities per category. Dedicated fused records beat raw sensor
// records, which beat values salvaged from other categories.
const NAV_NAVIGATION: u8 = 2;
const NAV_POSITION: u8 = 1;
const HEADING_DEDICATED: u8 = 3;
const HEADING_NAVIGATION: u8 = 2;
const HEADING_ATTITUDE: u8 = 1;
const ATTITUDE_SERIES: u8 = 3;
const ATTITUDE_CUSTOM: u8 = 2;
const ATTITUDE_SNAPSHOT: u8 = 1;

impl Feeds {
    /// Mirrors a just-decoded record into the feeds it supplies.
    pub(crate) fn ingest(&mut self, store: &Store, record_type: RecordType) {
        let time = store.timestamp;
        match record_type {
            RecordType::Navigation => {
                let nav = &store.navigation;
                self.nav.push(
                    NAV_NAVIGATION,
                    NavSample {
                        time,
                        longitude: nav.longitude,
                        latitude: nav.latitude,
                        speed: f64::from(nav.speed),
                    },
                );
                self.heading.push(
                    HEADING_NAVIGATION,
                    ScalarSample {
                        time,
                        value: f64::from(nav.heading),
                    },
                );
            }
            RecordType::Position => {
                let position = &store.position;
                self.nav.push(
                    NAV_POSITION,
                    NavSample {
                        time,
                        longitude: position.longitude_easting,
                        latitude: position.latitude_northing,
                        speed: 0.,
                    },
                );
            }
            RecordType::Heading => {
                self.heading.push(
                    HEADING_DEDICATED,
                    ScalarSample {
                        time,
                        value: f64::from(store.heading.heading),
                    },
                );
            }
            RecordType::Attitude => {
                for sample in &store.attitude.samples {
                    let sample_time = time + f64::from(sample.delta_time) / 1000.;
                    self.attitude.push(
                        ATTITUDE_SERIES,
                        AttitudeFeedSample {
                            time: sample_time,
                            roll: f64::from(sample.roll),
                            pitch: f64::from(sample.pitch),
                            heave: f64::from(sample.heave),
                        },
                    );
                    self.heading.push(
                        HEADING_ATTITUDE,
                        ScalarSample {
                            time: sample_time,
                            value: f64::from(sample.heading),
                        },
                    );
                }
            }
            RecordType::CustomAttitude => {
                let attitude = &store.custom_attitude;
                let period = if attitude.frequency > 0. {
                    1. / f64::from(attitude.frequency)
                } else {
                    0.
                };
                for i in 0..usize::from(attitude.n) {
                    let sample_time = time + period * i as f64;
                    self.attitude.push(
                        ATTITUDE_CUSTOM,
                        AttitudeFeedSample {
                            time: sample_time,
                            roll: attitude.roll.get(i).copied().unwrap_or_default().into(),
                            pitch: attitude.pitch.get(i).copied().unwrap_or_default().into(),
                            heave: attitude.heave.get(i).copied().unwrap_or_default().into(),
                        },
                    );
                }
            }
            RecordType::RollPitchHeave => {
                let rph = &store.roll_pitch_heave;
                self.attitude.push(
                    ATTITUDE_SNAPSHOT,
                    AttitudeFeedSample {
                        time,
                        roll: f64::from(rph.roll),
                        pitch: f64::from(rph.pitch),
                        heave: f64::from(rph.heave),
                    },
                );
            }
            RecordType::Depth => {
                self.depth.push(
                    1,
                    ScalarSample {
                        time,
                        value: f64::from(store.depth.depth),
                    },
                );
            }
            RecordType::Altitude => {
                self.altitude.push(
                    1,
                    ScalarSample {
                        time,
                        value: f64::from(store.altitude.altitude),
                    },
                );
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn better_nav_source_replaces_worse() {
        let mut store = Store::new();
        let mut feeds = Feeds::default();

        store.position.latitude_northing = 0.5;
        store.timestamp = 100.;
        feeds.ingest(&store, RecordType::Position);
        feeds.ingest(&store, RecordType::Position);
        assert_eq!(2, feeds.nav.samples().len());

        store.navigation.latitude = 0.6;
        store.timestamp = 101.;
        feeds.ingest(&store, RecordType::Navigation);
        assert_eq!(1, feeds.nav.samples().len());
        assert_eq!(0.6, feeds.nav.samples()[0].latitude);

        // position fixes are ignored once navigation is flowing
        store.timestamp = 102.;
        feeds.ingest(&store, RecordType::Position);
        assert_eq!(1, feeds.nav.samples().len());
    }

    #[test]
    fn attitude_series_expands_samples() {
        use crate::records::AttitudeSample;
        let mut store = Store::new();
        store.timestamp = 50.;
        store.attitude.samples = vec![
            AttitudeSample {
                delta_time: 0,
                roll: 0.1,
                ..Default::default()
            },
            AttitudeSample {
                delta_time: 500,
                roll: 0.2,
                ..Default::default()
            },
        ];
        let mut feeds = Feeds::default();
        feeds.ingest(&store, RecordType::Attitude);
        let samples = feeds.attitude.samples();
        assert_eq!(2, samples.len());
        assert_eq!(50., samples[0].time);
        assert_eq!(50.5, samples[1].time);
    }

    #[test]
    fn dedicated_heading_beats_attitude_heading() {
        let mut store = Store::new();
        let mut feeds = Feeds::default();
        store.timestamp = 10.;
        store.attitude.samples = vec![Default::default()];
        feeds.ingest(&store, RecordType::Attitude);
        assert_eq!(1, feeds.heading.samples().len());

        store.heading.heading = 1.5;
        feeds.ingest(&store, RecordType::Heading);
        assert_eq!(1, feeds.heading.samples().len());
        assert_eq!(1.5, feeds.heading.samples()[0].value);
    }
}
