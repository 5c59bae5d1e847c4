use chrono::{DateTime, Datelike, Duration, Local, Month, NaiveDate, NaiveDateTime, TimeZone};
use num_traits::FromPrimitive;
use serde::Deserialize;
use std::cmp::Ordering;
use std::convert::TryFrom;
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use crate::error::{Error, ErrorKind, Result};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Time zone in which timestamps are folded onto calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub enum CalendarTz {
    Local,
    Iana(chrono_tz::Tz),
}

impl Default for CalendarTz {
    fn default() -> Self {
        CalendarTz::Local
    }
}

impl FromStr for CalendarTz {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lowercase = s.to_lowercase();

        if matches!(lowercase.as_str(), "localtime" | "local") {
            Ok(CalendarTz::Local)
        } else if let Ok(tz) = s.parse::<chrono_tz::Tz>() {
            Ok(CalendarTz::Iana(tz))
        } else {
            Err(Error::new(
                ErrorKind::TimezoneError,
                &format!("Timezone '{}' not recognized", s),
            ))
        }
    }
}

impl TryFrom<String> for CalendarTz {
    type Error = Error;
    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl CalendarTz {
    pub fn date_of<Tz: TimeZone>(&self, datetime: &DateTime<Tz>) -> NaiveDate {
        match self {
            CalendarTz::Local => datetime.with_timezone(&Local).date_naive(),
            CalendarTz::Iana(tz) => datetime.with_timezone(tz).date_naive(),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.date_of(&Local::now())
    }
}

/// Extracts the calendar date from an ISO 8601 string.
///
/// Accepts a plain date (`2024-05-01`), a datetime with offset
/// (`2024-05-01T22:30:00+02:00`), which is first converted into `tz`, or a
/// floating datetime without offset, which is taken as is.
pub fn calendar_date(s: &str, tz: &CalendarTz) -> Result<NaiveDate> {
    let s = s.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return Ok(date);
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(s) {
        return Ok(tz.date_of(&datetime));
    }

    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .map(|datetime| datetime.date())
        .map_err(|_| Error::new(ErrorKind::DateParse, &format!("'{}' is not an ISO date", s)))
}

pub fn date_string(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn days_of_month(month: &Month, year: i32) -> u32 {
    let idx = MonthIndex::new(*month, year);
    idx.next()
        .first_day()
        .signed_duration_since(idx.first_day())
        .num_days() as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthIndex {
    pub index: Month,
    pub year: i32,
}

impl MonthIndex {
    pub fn new(index: Month, year: i32) -> Self {
        MonthIndex { index, year }
    }

    pub fn from_ym(year: i32, month: u32) -> Option<Self> {
        Month::from_u32(month).map(|index| MonthIndex { index, year })
    }

    /// Earliest month whose grid, padding days included, chrono can represent.
    pub fn min() -> Self {
        MonthIndex::new(Month::January, NaiveDate::MIN.year() + 1)
    }

    /// Latest month whose grid, padding days included, chrono can represent.
    pub fn max() -> Self {
        MonthIndex::new(Month::December, NaiveDate::MAX.year() - 1)
    }

    pub fn is_supported(&self) -> bool {
        MonthIndex::min() <= *self && *self <= MonthIndex::max()
    }

    fn ordinal(&self) -> i64 {
        self.year as i64 * 12 + self.index.number_from_month() as i64 - 1
    }

    fn from_ordinal(ordinal: i64) -> Self {
        MonthIndex {
            index: Month::from_i64(ordinal.rem_euclid(12) + 1).unwrap_or(Month::January),
            year: ordinal.div_euclid(12) as i32,
        }
    }

    pub fn next(&self) -> Self {
        *self + 1
    }

    pub fn prev(&self) -> Self {
        *self - 1
    }

    pub fn number(&self) -> u32 {
        self.index.number_from_month()
    }

    /// First day of the month, saturating at the ends of chrono's date range.
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.number(), 1).unwrap_or(if self.year < 0 {
            NaiveDate::MIN
        } else {
            NaiveDate::MAX
        })
    }

    pub fn last_day(&self) -> NaiveDate {
        self.next().first_day() - Duration::days(1)
    }

    pub fn num_days(&self) -> u32 {
        days_of_month(&self.index, self.year)
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.number()
    }

    /// Signed number of months from `self` to `other`.
    pub fn months_until(&self, other: &MonthIndex) -> i64 {
        other.ordinal() - self.ordinal()
    }

    /// Stable identifier used as scroll anchor, e.g. `month-2024-05`.
    pub fn anchor(&self) -> String {
        format!("month-{:04}-{:02}", self.year, self.number())
    }
}

impl<T: Datelike> From<T> for MonthIndex {
    fn from(m: T) -> Self {
        MonthIndex::new(Month::from_u32(m.month()).unwrap_or(Month::January), m.year())
    }
}

impl Add<u32> for MonthIndex {
    type Output = MonthIndex;
    fn add(self, rhs: u32) -> Self::Output {
        MonthIndex::from_ordinal(self.ordinal() + rhs as i64)
    }
}

impl Sub<u32> for MonthIndex {
    type Output = MonthIndex;
    fn sub(self, rhs: u32) -> Self::Output {
        MonthIndex::from_ordinal(self.ordinal() - rhs as i64)
    }
}

impl PartialOrd for MonthIndex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MonthIndex {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordinal().cmp(&other.ordinal())
    }
}

impl fmt::Display for MonthIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.index.name(), self.year)
    }
}
