//! Fixed-point monetary values
//!
//! Amounts are stored as integer minor units (cents) so that summing
//! thousands of records stays exact. The backend speaks JSON numbers with
//! two-decimal currency semantics; both numbers and decimal strings are
//! accepted on the way in, and a two-decimal number is emitted on the way
//! out.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops;
use std::str::FromStr;

/// A monetary value in integer minor units
///
/// Negative values are valid: balances may dip below zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount(pub i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Construct from a count of minor units
    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Convert a JSON number to cents, rounding to the nearest cent
    ///
    /// Returns `None` for NaN, infinities, and values outside the
    /// representable range.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let cents = (value * 100.0).round();
        if cents.abs() > i64::MAX as f64 / 2.0 {
            return None;
        }
        Some(Self(cents as i64))
    }

    pub fn cents(self) -> i64 {
        self.0
    }

    /// Two-decimal major-unit value, for JSON output
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

/// Failure to read a decimal string as a monetary value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAmountError(String);

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a monetary value (expected e.g. 123.45)", self.0)
    }
}

impl FromStr for Amount {
    type Err = ParseAmountError;

    /// Parse `123`, `123.4`, `123.45`, optionally signed
    fn from_str(s: &str) -> Result<Self, ParseAmountError> {
        let err = || ParseAmountError(s.to_string());
        let trimmed = s.trim();
        let (sign, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (-1, rest),
            None => (1, trimmed),
        };
        let (int_part, frac_part) = match digits.split_once('.') {
            Some((i, f)) => (i, f),
            None => (digits, ""),
        };
        if int_part.is_empty() || frac_part.len() > 2 {
            return Err(err());
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(err());
        }
        let units = int_part.parse::<i64>().map_err(|_| err())?;
        let mut cents = frac_part.parse::<i64>().unwrap_or(0);
        if frac_part.len() == 1 {
            cents *= 10;
        }
        units
            .checked_mul(100)
            .and_then(|u| u.checked_add(cents))
            .map(|total| Self(sign * total))
            .ok_or_else(err)
    }
}

impl ops::Add for Amount {
    type Output = Amount;
    fn add(self, other: Amount) -> Amount {
        Amount(self.0 + other.0)
    }
}

impl ops::Sub for Amount {
    type Output = Amount;
    fn sub(self, other: Amount) -> Amount {
        Amount(self.0 - other.0)
    }
}

impl ops::AddAssign for Amount {
    fn add_assign(&mut self, other: Amount) {
        self.0 += other.0;
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount::ZERO, |acc, a| acc + a)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.to_f64())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Num(f64),
            Text(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Num(v) => {
                Amount::from_f64(v).ok_or_else(|| de::Error::custom("amount out of range"))
            }
            Raw::Text(s) => s.parse().map_err(de::Error::custom),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    macro_rules! amt {
        ( $s:expr => $cents:expr ) => {
            assert_eq!($s.parse::<Amount>(), Ok(Amount($cents)));
        };
        ( bad $s:expr ) => {
            assert!($s.parse::<Amount>().is_err());
        };
    }

    #[test]
    fn parse() {
        amt!("0" => 0);
        amt!("12" => 1200);
        amt!("12.3" => 1230);
        amt!("12.34" => 1234);
        amt!("0.05" => 5);
        amt!("-300.00" => -30000);
        amt!(" 42.00 " => 4200);
        amt!(bad "");
        amt!(bad ".5");
        amt!(bad "12.345");
        amt!(bad "12,34");
        amt!(bad "abc");
        amt!(bad "1.2.3");
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Amount(1234)), "12.34");
        assert_eq!(format!("{}", Amount(500)), "5.00");
        assert_eq!(format!("{}", Amount(0)), "0.00");
        assert_eq!(format!("{}", Amount(-30000)), "-300.00");
        assert_eq!(format!("{}", Amount(-50)), "-0.50");
        assert_eq!(format!("{}", Amount(7)), "0.07");
    }

    #[test]
    fn rounding() {
        assert_eq!(Amount::from_f64(12.34), Some(Amount(1234)));
        assert_eq!(Amount::from_f64(12.345), Some(Amount(1235)));
        assert_eq!(Amount::from_f64(0.1 + 0.2), Some(Amount(30)));
        assert_eq!(Amount::from_f64(f64::NAN), None);
        assert_eq!(Amount::from_f64(f64::INFINITY), None);
    }

    #[test]
    fn arithmetic() {
        assert_eq!(Amount(1200) - Amount(1500), Amount(-300));
        assert_eq!(Amount(1) + Amount(2), Amount(3));
        let total: Amount = [Amount(100), Amount(250), Amount(5)].into_iter().sum();
        assert_eq!(total, Amount(355));
    }

    #[test]
    fn serde_forms() {
        assert_eq!(serde_json::from_str::<Amount>("12.34").unwrap(), Amount(1234));
        assert_eq!(serde_json::from_str::<Amount>("100").unwrap(), Amount(10000));
        assert_eq!(
            serde_json::from_str::<Amount>("\"12.34\"").unwrap(),
            Amount(1234)
        );
        assert!(serde_json::from_str::<Amount>("\"12.345\"").is_err());
        assert_eq!(serde_json::to_string(&Amount(1234)).unwrap(), "12.34");
        assert_eq!(serde_json::to_string(&Amount(-30000)).unwrap(), "-300.0");
    }
}
