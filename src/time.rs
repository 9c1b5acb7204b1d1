//! Record timestamps.
//!
//! Every record header carries a broken-down timestamp: year, day of year,
//! hours, minutes, and seconds with fractional microseconds. Catalog sorting
//! and the asynchronous feeds need a scalar form, so [Time7k] converts to and
//! from seconds since the Unix epoch.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use chrono::{Datelike, NaiveDate, Timelike};
use std::io::{Read, Write};

use crate::Result;

/// The wire size of a timestamp, in bytes.
pub const TIME_SIZE: usize = 10;

/// A broken-down record timestamp.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Time7k {
    /// Four-digit year.
    pub year: u16,
    /// Day of year, January 1 is day 1.
    pub day: u16,
    /// Hour of day, 0-23.
    pub hours: u8,
    /// Minute of hour, 0-59.
    pub minutes: u8,
    /// Seconds of minute, with fractional microseconds.
    pub seconds: f32,
}

impl Time7k {
    /// Creates a timestamp from seconds since the Unix epoch.
    ///
    /// Out-of-range input (before 1970) yields the zero timestamp.
    ///
    /// # Examples
    ///
    /// ```
    /// use s7k::Time7k;
    /// let time = Time7k::from_epoch_seconds(1_000_000_000.5);
    /// assert_eq!(2001, time.year);
    /// ```
    pub fn from_epoch_seconds(seconds: f64) -> Time7k {
        let whole = seconds.floor();
        let Some(datetime) = chrono::DateTime::from_timestamp(whole as i64, 0) else {
            return Time7k::default();
        };
        if datetime.year() < 1970 {
            return Time7k::default();
        }
        Time7k {
            year: datetime.year() as u16,
            day: datetime.ordinal() as u16,
            hours: datetime.hour() as u8,
            minutes: datetime.minute() as u8,
            seconds: datetime.second() as f32 + (seconds - whole) as f32,
        }
    }

    /// Converts this timestamp to seconds since the Unix epoch.
    ///
    /// Returns zero for timestamps that don't name a real calendar day, e.g.
    /// the all-zeros timestamp of a synthesized record.
    ///
    /// # Examples
    ///
    /// ```
    /// use s7k::Time7k;
    /// let time = Time7k { year: 1970, day: 1, ..Default::default() };
    /// assert_eq!(0., time.as_epoch_seconds());
    /// ```
    pub fn as_epoch_seconds(&self) -> f64 {
        if self.year == 0 {
            return 0.;
        }
        let Some(date) = NaiveDate::from_yo_opt(i32::from(self.year), u32::from(self.day.max(1)))
        else {
            return 0.;
        };
        let days = date
            .signed_duration_since(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap())
            .num_days();
        days as f64 * 86_400.
            + f64::from(self.hours) * 3_600.
            + f64::from(self.minutes) * 60.
            + f64::from(self.seconds)
    }

    /// Reads a timestamp.
    pub(crate) fn read_from<R: Read>(mut read: R) -> Result<Time7k> {
        Ok(Time7k {
            year: read.read_u16::<LittleEndian>()?,
            day: read.read_u16::<LittleEndian>()?,
            seconds: read.read_f32::<LittleEndian>()?,
            hours: read.read_u8()?,
            minutes: read.read_u8()?,
        })
    }

    /// Writes a timestamp.
    pub(crate) fn write_to<W: Write>(&self, mut write: W) -> Result<()> {
        write.write_u16::<LittleEndian>(self.year)?;
        write.write_u16::<LittleEndian>(self.day)?;
        write.write_f32::<LittleEndian>(self.seconds)?;
        write.write_u8(self.hours)?;
        write.write_u8(self.minutes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn roundtrip() {
        let time = Time7k {
            year: 2019,
            day: 123,
            hours: 11,
            minutes: 58,
            seconds: 41.25,
        };
        let mut cursor = Cursor::new(Vec::new());
        time.write_to(&mut cursor).unwrap();
        assert_eq!(TIME_SIZE, cursor.get_ref().len());
        cursor.set_position(0);
        assert_eq!(time, Time7k::read_from(cursor).unwrap());
    }

    #[test]
    fn epoch_conversion() {
        let time = Time7k {
            year: 2020,
            day: 60, // February 29, leap year
            hours: 12,
            minutes: 30,
            seconds: 15.5,
        };
        let epoch = time.as_epoch_seconds();
        let back = Time7k::from_epoch_seconds(epoch);
        assert_eq!(time.year, back.year);
        assert_eq!(time.day, back.day);
        assert_eq!(time.hours, back.hours);
        assert_eq!(time.minutes, back.minutes);
        assert!((time.seconds - back.seconds).abs() < 1e-3);
    }

    #[test]
    fn ordering_follows_time() {
        let early = Time7k {
            year: 2019,
            day: 100,
            ..Default::default()
        };
        let late = Time7k {
            year: 2019,
            day: 100,
            seconds: 1.,
            ..Default::default()
        };
        assert!(early.as_epoch_seconds() < late.as_epoch_seconds());
    }
}
