//! Decoded time and date

use std::convert::TryFrom;
use std::fmt;

#[cfg(feature = "chrono")]
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;

use crate::bcd::{bcd_to_bin16, bcd_to_bin8, bin_to_bcd8};
use crate::calendar::{day_of_week, month_and_day_from_day_of_year};
use crate::framing::FrameDecoder;

/// Calendar time and date, in BCD
///
/// Every field is packed BCD, in the same layout used by RTC
/// chips such as the M41Txx or DS1307. Print a field with
/// `{:02x}` to obtain its decimal digits.
///
/// A `TimeDate` is produced from a locked [`FrameDecoder`]:
///
/// ```
/// use std::convert::TryFrom;
/// use irigb::{FrameDecoder, TimeDate};
///
/// let decoder = FrameDecoder::new();
/// assert!(TimeDate::try_from(&decoder).is_err());
///
/// let (td, ok) = decoder.assemble();
/// assert!(!ok);
/// assert_eq!(TimeDate::UNSET, td);
/// assert!(!td.is_set());
/// ```
///
/// The year is two digits only and is assumed to fall between
/// 2000 and 2099.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimeDate {
    /// Seconds, 0 to 59
    pub second: u8,

    /// Minutes, 0 to 59
    pub minute: u8,

    /// Hours, 0 to 23
    pub hour: u8,

    /// Day of week, 1 (Monday) to 7 (Sunday)
    pub day_of_week: u8,

    /// Day of month, 1 to 31
    pub day_of_month: u8,

    /// Month, 1 to 12
    pub month: u8,

    /// Two-digit year, 0 to 99
    pub year: u8,
}

/// Time and date requested before a frame was locked
#[derive(Error, Clone, Debug, PartialEq, Eq, Hash)]
#[error("IRIG-B frame not locked")]
pub struct NotLockedErr {}

/// A `TimeDate` which is not a valid calendar timestamp
#[derive(Error, Clone, Debug, PartialEq, Eq, Hash)]
#[error("decoded time and date is not a valid calendar timestamp")]
pub struct InvalidDateErr {}

impl TimeDate {
    /// Sentinel for "no time available"
    ///
    /// Every field is `0xff`.
    pub const UNSET: TimeDate = TimeDate {
        second: 0xff,
        minute: 0xff,
        hour: 0xff,
        day_of_week: 0xff,
        day_of_month: 0xff,
        month: 0xff,
        year: 0xff,
    };

    /// True unless this is the [`UNSET`](TimeDate::UNSET) sentinel
    pub fn is_set(&self) -> bool {
        *self != Self::UNSET
    }

    /// Full four-digit year, in binary
    pub fn full_year(&self) -> u16 {
        2000 + bcd_to_bin8(self.year) as u16
    }

    /// Convert to a naïve date and time
    ///
    /// The year is interpreted as 2000–2099. Fails if any field
    /// is out of range, including the `UNSET` sentinel.
    ///
    /// Requires `chrono`.
    #[cfg(feature = "chrono")]
    pub fn to_naive_datetime(&self) -> Result<NaiveDateTime, InvalidDateErr> {
        let fields = [
            self.second,
            self.minute,
            self.hour,
            self.day_of_month,
            self.month,
            self.year,
        ];
        if fields.iter().any(|&bcd| !is_bcd8(bcd)) {
            return Err(InvalidDateErr {});
        }

        NaiveDate::from_ymd_opt(
            self.full_year() as i32,
            bcd_to_bin8(self.month) as u32,
            bcd_to_bin8(self.day_of_month) as u32,
        )
        .and_then(|date| {
            date.and_hms_opt(
                bcd_to_bin8(self.hour) as u32,
                bcd_to_bin8(self.minute) as u32,
                bcd_to_bin8(self.second) as u32,
            )
        })
        .ok_or(InvalidDateErr {})
    }

    /// Convert to a UTC timestamp
    ///
    /// IRIG-B is normally referenced to UTC, but it may carry
    /// local time instead. Be sure you know which one your
    /// time source sends.
    ///
    /// Requires `chrono`.
    #[cfg(feature = "chrono")]
    pub fn to_utc(&self) -> Result<DateTime<Utc>, InvalidDateErr> {
        Ok(Utc.from_utc_datetime(&self.to_naive_datetime()?))
    }
}

impl TryFrom<&FrameDecoder> for TimeDate {
    type Error = NotLockedErr;

    /// Assemble the time and date from a locked decoder
    ///
    /// The seconds, minutes, hours, and year are copied as-is.
    /// The day of week, month, and day of month are derived from
    /// the day of year. If the day of year does not fall within
    /// the year, the month and day of month are zero.
    fn try_from(decoder: &FrameDecoder) -> Result<Self, Self::Error> {
        if !decoder.is_locked() {
            return Err(NotLockedErr {});
        }

        let day_of_year = bcd_to_bin16(decoder.scratch_day_of_year());
        let year = bcd_to_bin8(decoder.scratch_year());
        let (month, day_of_month) =
            month_and_day_from_day_of_year(day_of_year, year).unwrap_or((0, 0));

        Ok(Self {
            second: decoder.scratch_second(),
            minute: decoder.scratch_minute(),
            hour: decoder.scratch_hour(),
            day_of_week: bin_to_bcd8(day_of_week(day_of_year, year)),
            day_of_month: bin_to_bcd8(day_of_month),
            month: bin_to_bcd8(month),
            year: decoder.scratch_year(),
        })
    }
}

impl Default for TimeDate {
    fn default() -> Self {
        Self::UNSET
    }
}

impl fmt::Display for TimeDate {
    /// `YYYY-MM-DD HH:MM:SS (weekday N)`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "20{:02x}-{:02x}-{:02x} {:02x}:{:02x}:{:02x} (weekday {:x})",
            self.year,
            self.month,
            self.day_of_month,
            self.hour,
            self.minute,
            self.second,
            self.day_of_week
        )
    }
}

// True if both nibbles of `bcd` are decimal digits
fn is_bcd8(bcd: u8) -> bool {
    bcd >> 4 < 10 && bcd & 0x0f < 10
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::framing::SyncState;
    use crate::pulse::PulseClass;
    use crate::timecode::{encode_frame, frame_pulses};

    fn locked_decoder(second: u8, minute: u8, hour: u8, day_of_year: u16, year: u8) -> FrameDecoder {
        let frame = encode_frame(second, minute, hour, day_of_year, year);
        let mut decoder = FrameDecoder::new();
        for d in [8u8, 2].into_iter().chain(frame_pulses(&frame)) {
            decoder.feed(PulseClass::classify(d as u32));
        }
        assert_eq!(SyncState::Locked, decoder.state());
        decoder
    }

    #[test]
    fn test_unset() {
        let decoder = FrameDecoder::new();
        assert_eq!(Err(NotLockedErr {}), TimeDate::try_from(&decoder));

        let (td, ok) = decoder.assemble();
        assert!(!ok);
        for field in [
            td.second,
            td.minute,
            td.hour,
            td.day_of_week,
            td.day_of_month,
            td.month,
            td.year,
        ] {
            assert_eq!(0xff, field);
        }
        assert_eq!(TimeDate::default(), td);
        assert_eq!("20ff-ff-ff ff:ff:ff (weekday ff)", &format!("{}", td));
    }

    #[test]
    fn test_assemble() {
        let decoder = locked_decoder(30, 15, 9, 45, 24);
        let td = TimeDate::try_from(&decoder).expect("locked");
        assert!(td.is_set());
        assert_eq!(
            TimeDate {
                second: 0x30,
                minute: 0x15,
                hour: 0x09,
                day_of_week: 0x04,
                day_of_month: 0x14,
                month: 0x02,
                year: 0x24,
            },
            td
        );
        assert_eq!(2024, td.full_year());
        assert_eq!("2024-02-14 09:15:30 (weekday 4)", &format!("{}", td));
    }

    #[test]
    fn test_assemble_end_of_year() {
        let td = locked_decoder(59, 59, 23, 366, 24).assemble().0;
        assert_eq!(0x12, td.month);
        assert_eq!(0x31, td.day_of_month);

        // day 366 of a common year does not exist
        let td = locked_decoder(0, 0, 0, 366, 23).assemble().0;
        assert_eq!(0x00, td.month);
        assert_eq!(0x00, td.day_of_month);
        assert!(td.is_set());
    }

    #[cfg(feature = "chrono")]
    #[test]
    fn test_chrono() {
        use chrono::{Datelike, Timelike};

        let td = locked_decoder(30, 15, 9, 45, 24).assemble().0;
        let ts = td.to_utc().expect("valid date");
        assert_eq!(2024, ts.year());
        assert_eq!(2, ts.month());
        assert_eq!(14, ts.day());
        assert_eq!(45, ts.ordinal());
        assert_eq!(9, ts.hour());
        assert_eq!(15, ts.minute());
        assert_eq!(30, ts.second());

        assert_eq!(Err(InvalidDateErr {}), TimeDate::UNSET.to_naive_datetime());

        let td = locked_decoder(0, 0, 0, 366, 23).assemble().0;
        assert_eq!(Err(InvalidDateErr {}), td.to_naive_datetime());

        let mut td = locked_decoder(0, 0, 0, 1, 25).assemble().0;
        td.hour = 0x24;
        assert_eq!(Err(InvalidDateErr {}), td.to_utc());
    }
}
