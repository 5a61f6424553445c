//! Money type for representing currency amounts
//!
//! Amounts are stored in minor units (pesewas, cents) as i64 so sums over the
//! ledger are exact. Ratios and statistics convert to f64 at the edge.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Currency symbols accepted (and stripped) when parsing user input
const KNOWN_SYMBOLS: [&str; 4] = ["₵", "$", "€", "£"];

/// A monetary amount stored as minor units (hundredths of the currency unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from minor units
    ///
    /// # Examples
    /// ```
    /// use expense_tracker::models::Money;
    /// let amount = Money::from_cents(1050); // 10.50
    /// assert_eq!(amount.to_string(), "10.50");
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money amount from whole units
    pub const fn from_major(units: i64) -> Self {
        Self(units * 100)
    }

    /// Round a floating point amount in major units to the nearest minor unit
    pub fn from_major_f64(value: f64) -> Self {
        Self((value * 100.0).round() as i64)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in minor units
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Whole units, truncated toward zero
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Minor unit part (0-99)
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// The amount in major units as a float, for statistics and ratios
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// `self / denominator`, or `None` when the denominator is zero
    pub fn ratio(&self, denominator: Money) -> Option<f64> {
        if denominator.is_zero() {
            None
        } else {
            Some(self.0 as f64 / denominator.0 as f64)
        }
    }

    /// Parse a money amount from user input
    ///
    /// Accepts "10.50", "-10.50", "₵10.50", "$10", "10.5" and thousands
    /// separators ("1,250.00"). More than two decimal places is rejected, as
    /// is anything too large to hold in minor units.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let raw = s;
        let s = s.trim();

        let (negative, s) = match s.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, s),
        };

        let s = KNOWN_SYMBOLS
            .iter()
            .find_map(|sym| s.strip_prefix(sym))
            .unwrap_or(s)
            .trim();

        let s = s.replace(',', "");
        if s.is_empty() {
            return Err(MoneyParseError::InvalidFormat(raw.to_string()));
        }

        let invalid = || MoneyParseError::InvalidFormat(raw.to_string());

        let cents = match s.split_once('.') {
            Some((whole, frac)) => {
                if frac.contains('.') || frac.len() > 2 {
                    return Err(invalid());
                }
                let whole: i64 = if whole.is_empty() {
                    0
                } else {
                    whole.parse().map_err(|_| invalid())?
                };
                let frac_value: i64 = match frac.len() {
                    0 => 0,
                    1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
                    _ => frac.parse().map_err(|_| invalid())?,
                };
                if whole < 0 || frac_value < 0 {
                    return Err(invalid());
                }
                whole
                    .checked_mul(100)
                    .and_then(|c| c.checked_add(frac_value))
                    .ok_or_else(invalid)?
            }
            None => {
                let whole: i64 = s.parse().map_err(|_| invalid())?;
                if whole < 0 {
                    return Err(invalid());
                }
                whole.checked_mul(100).ok_or_else(invalid)?
            }
        };

        Ok(Self(if negative { -cents } else { cents }))
    }

    /// Format with a currency symbol, e.g. "₵12.50"
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        if self.is_negative() {
            format!("-{}{}.{:02}", symbol, self.major().abs(), self.minor_part())
        } else {
            format!("{}{}.{:02}", symbol, self.major(), self.minor_part())
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = if self.is_negative() {
            format!("-{}.{:02}", self.major().abs(), self.minor_part())
        } else {
            format!("{}.{:02}", self.major(), self.minor_part())
        };
        f.pad(&text)
    }
}

// Arithmetic saturates at the i64 bounds; ledger files are user editable.
impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parts() {
        let m = Money::from_cents(1050);
        assert_eq!(m.major(), 10);
        assert_eq!(m.minor_part(), 50);
        assert_eq!(Money::from_major(7).cents(), 700);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1050).to_string(), "10.50");
        assert_eq!(Money::from_cents(0).to_string(), "0.00");
        assert_eq!(Money::from_cents(-1050).to_string(), "-10.50");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(format!("{:>8}", Money::from_cents(5)), "    0.05");
    }

    #[test]
    fn test_format_with_symbol() {
        assert_eq!(Money::from_cents(1250).format_with_symbol("₵"), "₵12.50");
        assert_eq!(Money::from_cents(-1250).format_with_symbol("₵"), "-₵12.50");
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("₵10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("$10").unwrap().cents(), 1000);
        assert_eq!(Money::parse("-10.50").unwrap().cents(), -1050);
        assert_eq!(Money::parse("10.5").unwrap().cents(), 1050);
        assert_eq!(Money::parse(".75").unwrap().cents(), 75);
        assert_eq!(Money::parse("1,250.00").unwrap().cents(), 125000);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Money::parse("").is_err());
        assert!(Money::parse("abc").is_err());
        assert!(Money::parse("1.2.3").is_err());
        assert!(Money::parse("1.005").is_err());
        assert!(Money::parse("--5").is_err());
    }

    #[test]
    fn test_parse_rejects_amounts_too_large_for_minor_units() {
        assert!(matches!(
            Money::parse("100000000000000000"),
            Err(MoneyParseError::InvalidFormat(_))
        ));
        assert!(Money::parse("92233720368547758.07").is_ok());
        assert!(Money::parse("92233720368547758.08").is_err());
        assert!(Money::parse("-100000000000000000.50").is_err());
    }

    #[test]
    fn test_arithmetic_saturates() {
        let max = Money::from_cents(i64::MAX);
        assert_eq!(max + Money::from_cents(1), max);
        assert_eq!(Money::from_cents(i64::MIN) - Money::from_cents(1), Money::from_cents(i64::MIN));
        let total: Money = [max, max, Money::from_cents(5)].iter().sum();
        assert_eq!(total, max);
    }

    #[test]
    fn test_ratio() {
        let spent = Money::from_major(40);
        assert_eq!(spent.ratio(Money::from_major(100)), Some(0.4));
        assert_eq!(spent.ratio(Money::zero()), None);
    }

    #[test]
    fn test_from_major_f64_rounds() {
        assert_eq!(Money::from_major_f64(3.333).cents(), 333);
        assert_eq!(Money::from_major_f64(1.236).cents(), 124);
    }

    #[test]
    fn test_sum() {
        let amounts = [Money::from_cents(100), Money::from_cents(250)];
        let total: Money = amounts.iter().sum();
        assert_eq!(total.cents(), 350);
    }

    #[test]
    fn test_serialization_is_minor_units() {
        let json = serde_json::to_string(&Money::from_cents(1050)).unwrap();
        assert_eq!(json, "1050");
    }
}
