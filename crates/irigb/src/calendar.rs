//! Calendar arithmetic for two-digit years
//!
//! IRIG-B sends the day of the year and a two-digit year. These
//! helpers recover the month, day of month, and day of week.
//! Years are assumed to fall between 2000 and 2099, inclusive.
//! Every multiple of four is a leap year in that window.

/// Days per month in a common year
const DAYS_PER_MONTH: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// True if the two-digit `year` is a leap year
#[inline]
pub fn is_leap(year: u8) -> bool {
    year % 4 == 0
}

/// Number of days in the one-based `month` of `year`
///
/// Returns zero if `month` is not in `1..=12`.
pub fn days_of_month(month: u8, year: u8) -> u8 {
    match month {
        2 if is_leap(year) => 29,
        1..=12 => DAYS_PER_MONTH[month as usize - 1],
        _ => 0,
    }
}

/// Number of days in `year`
pub fn days_of_year(year: u8) -> u16 {
    if is_leap(year) {
        366
    } else {
        365
    }
}

/// Day of the week
///
/// Returns the weekday of the one-based `day_of_year` in
/// the two-digit `year`, from `1` (Monday) to `7` (Sunday).
///
/// The count of days before `year` is taken as
/// `365 * year + year / 4 + 1`, or zero for the year 2000,
/// and the weekday is `(day_of_year - 1 + count + 5) % 7 + 1`.
/// The count runs one day long in years which are a multiple
/// of four, other than 2000, so those years report one weekday
/// later than the civil calendar.
pub fn day_of_week(day_of_year: u16, year: u8) -> u8 {
    let accumulated = if year > 0 {
        365 * year as i32 + year as i32 / 4 + 1
    } else {
        0
    };

    ((day_of_year as i32 - 1 + accumulated + 5).rem_euclid(7) + 1) as u8
}

/// Month and day of month from day of year
///
/// Converts a one-based `day_of_year` in the two-digit `year`
/// to a `(month, day_of_month)` pair, both one-based. Returns
/// `None` if `day_of_year` is past the end of `year`.
///
/// ```
/// use irigb::month_and_day_from_day_of_year;
///
/// assert_eq!(Some((2, 14)), month_and_day_from_day_of_year(45, 24));
/// assert_eq!(Some((12, 31)), month_and_day_from_day_of_year(366, 24));
/// assert_eq!(None, month_and_day_from_day_of_year(366, 23));
/// ```
pub fn month_and_day_from_day_of_year(day_of_year: u16, year: u8) -> Option<(u8, u8)> {
    let mut remaining = day_of_year;
    for month in 1..=12u8 {
        let dom = days_of_month(month, year) as u16;
        if remaining <= dom {
            return Some((month, remaining as u8));
        }
        remaining -= dom;
    }

    None
}

/// Day of year from month and day of month
///
/// Inverse of [`month_and_day_from_day_of_year()`]. Returns
/// `None` if `month` is not in `1..=12` or `day_of_month` is
/// not a day of that month.
pub fn day_of_year_from_month_and_day(month: u8, day_of_month: u8, year: u8) -> Option<u16> {
    if day_of_month == 0 || day_of_month > days_of_month(month, year) {
        return None;
    }

    let before: u16 = (1..month).map(|m| days_of_month(m, year) as u16).sum();
    Some(before + day_of_month as u16)
}
