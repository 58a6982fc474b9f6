//! Day-precise time management, with a focus on edge cases
//!
//! Dates are calendar days (`YYYY-MM-DD`), not seconds since an epoch.
//! The interface covers exactly what windowed aggregation needs: validated
//! construction, successor/predecessor, signed day jumps, and a bijection
//! with the integers for constant-time bucket indexing.
//!
//! Parsing accepts the ISO form the backend emits, including full datetime
//! strings (`2024-03-08T00:00:00.000Z`) of which only the date part is kept.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A date with day-precision
///
/// Supports years in the range 1000..=9999.
///
/// All methods execute in constant time except `jump_day`, which is
/// linear in the number of month boundaries crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date {
    year: u16,
    month: Month,
    day: u8,
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.year,
            self.month as usize + 1,
            self.day
        )
    }
}

/// Twelve months in the year, zero-indexed internally, 1..=12 on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, PartialOrd, Ord, Hash)]
pub enum Month {
    Jan = 0,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    /// Month directly succeeding the current one with wrapping
    pub fn next(self) -> Self {
        Self::from_isize((self as isize + 1) % 12).unwrap()
    }

    /// Month directly preceding the current one with wrapping
    pub fn prev(self) -> Self {
        Self::from_isize((self as isize + 11) % 12).unwrap()
    }

    /// Number of days in this month of the given year
    pub fn count(self, year: u16) -> u8 {
        use Month::*;
        match self {
            Jan | Mar | May | Jul | Aug | Oct | Dec => 31,
            Apr | Jun | Sep | Nov => 30,
            Feb => {
                if is_leap(year) {
                    29
                } else {
                    28
                }
            }
        }
    }
}

/// Ways in which a date taken from the wire can be wrong
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DateError {
    /// year is outside of 1000..=9999
    UnsupportedYear(usize),
    /// month is outside of 1..=12
    InvalidMonth(usize),
    /// Feb 29 of a non-leap year
    NotBissextile(usize),
    /// Feb 30 or Feb 31 or 31st day of a 30-day month
    MonthTooShort(Month, usize),
    /// day outside of 1..=31
    InvalidDay(usize),
    /// not of the shape YYYY-MM-DD
    Unparseable(String),
}

impl Date {
    /// Validate year-month-day into date
    pub fn from(year: usize, month: Month, day: usize) -> Result<Self, DateError> {
        if !(1000..=9999).contains(&year) {
            Err(DateError::UnsupportedYear(year))
        } else if day == 0 || day > 31 {
            Err(DateError::InvalidDay(day))
        } else if day <= month.count(year as u16) as usize {
            Ok(Self {
                year: year as u16,
                month,
                day: day as u8,
            })
        } else if day >= 30 {
            Err(DateError::MonthTooShort(month, day))
        } else {
            Err(DateError::NotBissextile(year))
        }
    }

    /// Validate a numeric year-month-day (month 1..=12) into a date
    pub fn from_ymd(year: usize, month: usize, day: usize) -> Result<Self, DateError> {
        let month = if (1..=12).contains(&month) {
            Month::from_usize(month - 1).unwrap()
        } else {
            return Err(DateError::InvalidMonth(month));
        };
        Self::from(year, month, day)
    }

    /// Current date according to the local system clock
    ///
    /// This is the only clock read in the crate; aggregation takes the
    /// reference date as an explicit parameter.
    pub fn today() -> Self {
        use chrono::Datelike;
        let now = chrono::Local::now().date_naive();
        Self::from_ymd(now.year() as usize, now.month() as usize, now.day() as usize)
            .expect("system clock outside of supported year range")
    }

    /// Day-granularity chart label (`MM-DD`)
    pub fn label(&self) -> String {
        format!("{:02}-{:02}", self.month as usize + 1, self.day)
    }

    /// Biject the dates with integers
    ///
    /// This indexing is guaranteed consistent in the sense that
    /// for any date `d`,
    ///
    ///     assert_eq!(d.index() + 1, d.next().index());
    pub fn index(self) -> usize {
        let leaps = {
            let years = if self.month <= Month::Feb {
                self.year as usize - 1
            } else {
                self.year as usize
            };
            // count leap years before current
            (years / 4) - (years / 100) + (years / 400)
        };
        let mut n = self.year as usize * 365 + self.day as usize;
        // partially elapsed current year
        n += [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334][self.month as usize];
        n += leaps; // each leap year adds one day
        n
    }

    pub fn next(self) -> Self {
        if self.month.count(self.year) == self.day {
            if self.month == Month::Dec {
                Self {
                    year: self.year + 1,
                    month: Month::Jan,
                    day: 1,
                }
            } else {
                Self {
                    month: self.month.next(),
                    day: 1,
                    ..self
                }
            }
        } else {
            Self {
                day: self.day + 1,
                ..self
            }
        }
    }

    pub fn prev(self) -> Self {
        if self.day == 1 {
            if self.month == Month::Jan {
                Self {
                    year: self.year - 1,
                    month: Month::Dec,
                    day: 31,
                }
            } else {
                let month = self.month.prev();
                Self {
                    month,
                    day: month.count(self.year),
                    ..self
                }
            }
        } else {
            Self {
                day: self.day - 1,
                ..self
            }
        }
    }

    /// `count` days before/after current date
    pub fn jump_day(self, count: isize) -> Self {
        let mut d = self;
        let mut count = count;
        while count > 0 {
            let step = ((d.month.count(d.year) - d.day) as isize).min(count);
            if step == 0 {
                d = d.next();
                count -= 1;
            } else {
                d.day += step as u8;
                count -= step;
            }
        }
        while count < 0 {
            let step = ((d.day - 1) as isize).min(-count);
            if step == 0 {
                d = d.prev();
                count += 1;
            } else {
                d.day -= step as u8;
                count += step;
            }
        }
        d
    }
}

impl FromStr for Date {
    type Err = DateError;

    /// Parse `YYYY-MM-DD`, tolerating a trailing datetime suffix
    fn from_str(s: &str) -> Result<Self, DateError> {
        let malformed = || DateError::Unparseable(s.to_string());
        let core = s.trim();
        // `2024-03-08T12:00:00Z` and friends: keep the date part
        let core = if core.len() > 10 {
            core.get(..10).ok_or_else(malformed)?
        } else {
            core
        };
        let bytes = core.as_bytes();
        if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
            return Err(malformed());
        }
        let year = core[..4].parse::<usize>().map_err(|_| malformed())?;
        let month = core[5..7].parse::<usize>().map_err(|_| malformed())?;
        let day = core[8..10].parse::<usize>().map_err(|_| malformed())?;
        Self::from_ymd(year, month, day)
    }
}

impl Serialize for Date {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Date {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

fn is_leap(year: u16) -> bool {
    if year % 400 == 0 {
        true
    } else if year % 100 == 0 {
        false
    } else {
        year % 4 == 0
    }
}

impl fmt::Display for DateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use DateError::*;
        match self {
            UnsupportedYear(y) => write!(f, "{} is outside of the supported range for years", y),
            InvalidMonth(m) => write!(f, "{} is not in the range 1 ..= 12", m),
            NotBissextile(y) => write!(f, "{} is not bissextile, Feb 29 does not exist", y),
            MonthTooShort(m, d) => {
                write!(f, "{:?} is a short month, it does not have a {}th day", m, d)
            }
            InvalidDay(d) => write!(f, "{} is not a valid day", d),
            Unparseable(s) => write!(f, "'{}' is not of the shape YYYY-MM-DD", s),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Month::*, *};

    #[test]
    fn bissextile_check() {
        macro_rules! yes {
            ( $y:expr ) => {
                assert!(is_leap($y));
            };
        }
        macro_rules! no {
            ( $y:expr ) => {
                assert!(!is_leap($y));
            };
        }
        yes!(2004);
        no!(2100);
        yes!(2000);
        no!(2001);
        no!(2010);
        yes!(2012);
    }

    macro_rules! ok {
        ( $y:tt - $m:tt - $d:tt ) => {
            assert_eq!(
                Date::from($y, $m, $d),
                Ok(Date {
                    year: $y,
                    month: $m,
                    day: $d
                })
            );
        };
    }
    macro_rules! short {
        ( $y:tt - $m:tt - $d:tt ) => {
            assert_eq!(Date::from($y, $m, $d), Err(DateError::MonthTooShort($m, $d)));
        };
    }
    macro_rules! nbiss {
        ( $y:tt - $m:tt - $d:tt ) => {
            assert_eq!(Date::from($y, $m, $d), Err(DateError::NotBissextile($y)));
        };
    }
    macro_rules! invalid {
        ( $y:tt - $m:tt - $d:tt ) => {
            assert_eq!(Date::from($y, $m, $d), Err(DateError::InvalidDay($d)));
        };
    }

    #[test]
    fn long_months() {
        ok!(2020-Jan-31);
        ok!(2020-Mar-31);
        short!(2020-Apr-31);
        ok!(2020-May-31);
        short!(2020-Jun-31);
        ok!(2020-Jul-31);
        ok!(2020-Aug-31);
        short!(2020-Sep-31);
        ok!(2020-Oct-31);
        short!(2020-Nov-31);
        ok!(2020-Dec-31);
    }

    #[test]
    fn normal_days() {
        invalid!(2020-Dec-45);
        invalid!(2020-Jan-32);
        invalid!(2020-Jan-0);
        ok!(2020-Mar-20);
        ok!(2020-Apr-10);
    }

    #[test]
    fn february() {
        short!(2020-Feb-31);
        short!(2020-Feb-30);
        ok!(2020-Feb-29);
        ok!(2020-Feb-28);
        short!(2021-Feb-31);
        short!(2021-Feb-30);
        nbiss!(2021-Feb-29);
        ok!(2021-Feb-28);
    }

    macro_rules! dt {
        ( $y:tt - $m:tt - $d:tt ) => {
            Date::from($y, $m, $d).unwrap()
        };
    }

    #[test]
    fn index_consistent() {
        let mut d = Date::from(2000, Jan, 1).unwrap();
        let end = Date::from(2100, Dec, 31).unwrap();
        while d < end {
            let ds = d.next();
            let n = d.index() + 1;
            let ns = ds.index();
            if n != ns {
                panic!("date {}, successor {}, expected {} == {}", d, ds, n, ns);
            }
            d = ds;
        }
    }

    macro_rules! jday {
        ( $d1:expr, $d2:expr ) => {{
            assert_eq!($d1.jump_day(1), $d2);
            assert_eq!($d2.jump_day(-1), $d1);
        }};
    }

    #[test]
    fn jump_day() {
        jday!(dt!(2020-Jan-1), dt!(2020-Jan-2));
        jday!(dt!(2020-Jan-15), dt!(2020-Jan-16));
        jday!(dt!(2020-Jan-30), dt!(2020-Jan-31));
        jday!(dt!(2020-Jan-31), dt!(2020-Feb-1));
        jday!(dt!(2020-Feb-28), dt!(2020-Feb-29));
        jday!(dt!(2021-Feb-28), dt!(2021-Mar-1));
        jday!(dt!(2020-Apr-30), dt!(2020-May-1));
        jday!(dt!(2020-Dec-30), dt!(2020-Dec-31));
        jday!(dt!(2020-Dec-31), dt!(2021-Jan-1));
    }

    #[test]
    fn jump_day_windows() {
        // the two windows the dashboard actually uses
        assert_eq!(dt!(2024-Mar-10).jump_day(-29), dt!(2024-Feb-10));
        assert_eq!(dt!(2024-Mar-10).jump_day(-59), dt!(2024-Jan-11));
        assert_eq!(dt!(2021-Mar-1).jump_day(-29), dt!(2021-Jan-31));
        // jump_day agrees with the index bijection
        for (d, count) in [
            (dt!(2020-Feb-29), -60),
            (dt!(2020-Jan-1), 366),
            (dt!(2023-Dec-31), -365),
        ] {
            assert_eq!(
                d.jump_day(count).index() as isize,
                d.index() as isize + count
            );
        }
    }

    #[test]
    fn iso_display() {
        assert_eq!(format!("{}", dt!(2024-Mar-8)), "2024-03-08");
        assert_eq!(format!("{}", dt!(2024-Dec-31)), "2024-12-31");
        assert_eq!(dt!(2024-Mar-8).label(), "03-08");
        assert_eq!(dt!(2024-Nov-20).label(), "11-20");
    }

    #[test]
    fn iso_parse() {
        assert_eq!("2024-03-08".parse::<Date>(), Ok(dt!(2024-Mar-8)));
        assert_eq!("2024-02-29".parse::<Date>(), Ok(dt!(2024-Feb-29)));
        assert_eq!(
            "2024-03-08T00:00:00.000Z".parse::<Date>(),
            Ok(dt!(2024-Mar-8))
        );
        assert_eq!(
            "2023-02-29".parse::<Date>(),
            Err(DateError::NotBissextile(2023))
        );
        assert_eq!(
            "2024-13-01".parse::<Date>(),
            Err(DateError::InvalidMonth(13))
        );
        assert!("yesterday".parse::<Date>().is_err());
        assert!("2024-3-8".parse::<Date>().is_err());
        assert!("".parse::<Date>().is_err());
    }

    #[test]
    fn serde_roundtrip() {
        let d = dt!(2024-Mar-8);
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, "\"2024-03-08\"");
        assert_eq!(serde_json::from_str::<Date>(&json).unwrap(), d);
    }
}
