use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;

/// Largest major-unit amount accepted from the wire (ten trillion).
const MAX_MAJOR_UNITS: f64 = 10_000_000_000_000.0;

/// Currency amount held as integer minor units (cents).
///
/// Budget arithmetic runs on integers so that `allocated + remaining == budget` holds exactly.
/// On the wire amounts travel as major units in a JSON number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    pub const fn from_major(units: u64) -> Self {
        Self(units.saturating_mul(100))
    }

    /// Converts a major-unit amount, rounding to the nearest cent.
    ///
    /// Returns `None` for negative, non-finite, or implausibly large values.
    pub fn try_from_major(value: f64) -> Option<Self> {
        if !value.is_finite() || value < 0.0 || value > MAX_MAJOR_UNITS {
            return None;
        }
        Some(Self((value * 100.0).round() as u64))
    }

    pub const fn cents(self) -> u64 {
        self.0
    }

    pub fn as_major(self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    pub const fn saturating_sub(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0))
    }

    /// True when `self` covers at least `percent`% of `other`.
    pub fn covers_percent_of(self, other: Money, percent: u64) -> bool {
        u128::from(self.0) * 100 >= u128::from(other.0) * u128::from(percent)
    }

    /// Mean of `total` over `count` items, rounded half up to the cent.
    pub fn average(total: Money, count: usize) -> Money {
        if count == 0 {
            return Money::ZERO;
        }
        let count = count as u64;
        Money((total.0 + count / 2) / count)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Money::saturating_add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_major())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = f64::deserialize(deserializer)?;
        Money::try_from_major(raw).ok_or_else(|| {
            serde::de::Error::custom(format!("{raw} is not a non-negative currency amount"))
        })
    }
}
