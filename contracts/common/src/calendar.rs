//! UTC civil dates for ledger timestamps.
//!
//! Day/civil conversion uses the proleptic Gregorian calendar with the
//! era-based algorithm, so no tables or floating point are needed on-chain.

use crate::CommonError;
use soroban_sdk::{contracttype, Env, String};

const SECONDS_PER_DAY: u64 = 86_400;
const MIN_YEAR: u32 = 1;
const MAX_YEAR: u32 = 9_999;

/// A calendar date without a time of day.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CivilDate {
    pub year: u32,
    pub month: u32,
    pub day: u32,
}

pub fn is_leap_year(year: u32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Days since 1970-01-01 for a valid civil date.
fn days_from_civil(year: u32, month: u32, day: u32) -> i64 {
    let y = year as i64 - if month <= 2 { 1 } else { 0 };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let m = month as i64;
    let doy = (153 * (if m > 2 { m - 3 } else { m + 9 }) + 2) / 5 + day as i64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    let year = yoe + era * 400 + if month <= 2 { 1 } else { 0 };
    (year, month, day)
}

impl CivilDate {
    /// Builds a date, rejecting days that do not exist.
    pub fn new(year: u32, month: u32, day: u32) -> Result<Self, CommonError> {
        let date = CivilDate { year, month, day };
        if date.is_valid() {
            Ok(date)
        } else {
            Err(CommonError::InvalidDate)
        }
    }

    pub fn is_valid(&self) -> bool {
        (MIN_YEAR..=MAX_YEAR).contains(&self.year)
            && (1..=12).contains(&self.month)
            && self.day >= 1
            && self.day <= days_in_month(self.year, self.month)
    }

    /// The UTC date containing the given UNIX timestamp.
    pub fn from_timestamp(seconds: u64) -> Self {
        let (year, month, day) = civil_from_days((seconds / SECONDS_PER_DAY) as i64);
        CivilDate {
            year: year.clamp(MIN_YEAR as i64, MAX_YEAR as i64) as u32,
            month,
            day,
        }
    }

    /// The current ledger date.
    pub fn today(env: &Env) -> Self {
        Self::from_timestamp(env.ledger().timestamp())
    }

    /// Days since the UNIX epoch.
    pub fn day_number(&self) -> i64 {
        days_from_civil(self.year, self.month, self.day)
    }

    /// Integer that orders dates chronologically (`YYYYMMDD`).
    pub fn sort_key(&self) -> u32 {
        self.year * 10_000 + self.month * 100 + self.day
    }

    pub fn is_on_or_after(&self, other: &CivilDate) -> bool {
        self.sort_key() >= other.sort_key()
    }

    pub fn first_of_month(&self) -> CivilDate {
        CivilDate {
            year: self.year,
            month: self.month,
            day: 1,
        }
    }

    /// Same day `months` months earlier, clamped to the end of shorter months
    /// (2024-03-31 minus one month is 2024-02-29).
    pub fn months_before(&self, months: u32) -> CivilDate {
        let total = (self.year as i64) * 12 + (self.month as i64 - 1) - months as i64;
        let total = total.max((MIN_YEAR as i64) * 12);
        let year = (total / 12) as u32;
        let month = (total % 12) as u32 + 1;
        let day = self.day.min(days_in_month(year, month));
        CivilDate { year, month, day }
    }

    /// Completed years between `self` (a birth date) and `today`.
    ///
    /// The year difference drops by one while this year's birthday is still
    /// ahead. Birth dates in the future yield zero.
    pub fn age_on(&self, today: &CivilDate) -> u32 {
        if today.sort_key() < self.sort_key() {
            return 0;
        }
        let mut age = today.year - self.year;
        if (today.month, today.day) < (self.month, self.day) {
            age -= 1;
        }
        age
    }

    /// `year * 100 + month`, ordered the same way as [`Self::month_label`].
    pub fn month_key(&self) -> u32 {
        self.year * 100 + self.month
    }

    /// `YYYY-MM`.
    pub fn month_label(&self, env: &Env) -> String {
        month_label_from_key(env, self.month_key())
    }
}

/// Renders a `year * 100 + month` key as `YYYY-MM`.
pub fn month_label_from_key(env: &Env, key: u32) -> String {
    let year = key / 100;
    let month = key % 100;
    let buf = [
        b'0' + ((year / 1_000) % 10) as u8,
        b'0' + ((year / 100) % 10) as u8,
        b'0' + ((year / 10) % 10) as u8,
        b'0' + (year % 10) as u8,
        b'-',
        b'0' + ((month / 10) % 10) as u8,
        b'0' + (month % 10) as u8,
    ];
    String::from_bytes(env, &buf)
}
