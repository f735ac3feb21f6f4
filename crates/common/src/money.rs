//! Integer money in the smallest currency unit.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a text amount cannot be read as money.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not a valid amount: {0:?}")]
pub struct ParseMoneyError(pub String);

/// Money amount represented as a count of the smallest currency unit.
///
/// Prices in the catalog are whole units (no fractional part); display
/// groups thousands, e.g. `12000` renders as `"12,000"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money {
    units: i64,
}

impl Money {
    /// Creates a money amount from a unit count.
    pub fn from_units(units: i64) -> Self {
        Self { units }
    }

    /// Returns zero money.
    pub fn zero() -> Self {
        Self { units: 0 }
    }

    /// Returns the amount as a unit count.
    pub fn units(&self) -> i64 {
        self.units
    }

    /// Multiplies by a quantity.
    pub fn multiply(&self, quantity: u32) -> Money {
        Money {
            units: self.units * quantity as i64,
        }
    }

    /// Parses a user-supplied amount, stripping grouping separators.
    ///
    /// `"12,000"` parses to 12000. Anything that is not a non-negative
    /// integer after stripping is rejected.
    pub fn parse(input: &str) -> Result<Self, ParseMoneyError> {
        let cleaned: String = input
            .trim()
            .chars()
            .filter(|c| *c != ',' && *c != '_' && !c.is_whitespace())
            .collect();

        let units: i64 = cleaned
            .parse()
            .map_err(|_| ParseMoneyError(input.to_string()))?;
        if units < 0 {
            return Err(ParseMoneyError(input.to_string()));
        }
        Ok(Self { units })
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let digits = self.units.abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        if self.units < 0 {
            write!(f, "-{grouped}")
        } else {
            write!(f, "{grouped}")
        }
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Money {
            units: self.units + rhs.units,
        }
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.units += rhs.units;
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), std::ops::Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_strips_grouping_separators() {
        assert_eq!(Money::parse("12,000").unwrap(), Money::from_units(12_000));
        assert_eq!(
            Money::parse("1,250,000").unwrap(),
            Money::from_units(1_250_000)
        );
        assert_eq!(Money::parse(" 500 ").unwrap(), Money::from_units(500));
        assert_eq!(Money::parse("0").unwrap(), Money::zero());
    }

    #[test]
    fn parse_rejects_non_numeric() {
        assert!(Money::parse("abc").is_err());
        assert!(Money::parse("12.5").is_err());
        assert!(Money::parse("").is_err());
        assert!(Money::parse(",").is_err());
    }

    #[test]
    fn parse_rejects_negative() {
        assert!(Money::parse("-100").is_err());
    }

    #[test]
    fn display_groups_thousands() {
        assert_eq!(Money::from_units(0).to_string(), "0");
        assert_eq!(Money::from_units(950).to_string(), "950");
        assert_eq!(Money::from_units(12_000).to_string(), "12,000");
        assert_eq!(Money::from_units(1_250_000).to_string(), "1,250,000");
    }

    #[test]
    fn multiply_and_sum() {
        let price = Money::from_units(3_000);
        assert_eq!(price.multiply(4), Money::from_units(12_000));

        let total: Money = [Money::from_units(100), Money::from_units(250)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::from_units(350));
    }

    #[test]
    fn serialization_round_trip() {
        let m = Money::from_units(42_500);
        let json = serde_json::to_string(&m).unwrap();
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, back);
    }
}
