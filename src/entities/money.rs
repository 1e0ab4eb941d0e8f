use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Currency amount held in minor units (pence, cents).
///
/// Amounts cross the JSON boundary as decimal numbers of major units, so `350` minor
/// units is written as `3.5`. All arithmetic stays in integers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    pub fn minor(&self) -> i64 {
        self.0
    }

    /// Converts a major-unit decimal, rounding half away from zero to the nearest minor unit.
    pub fn from_major(major: f64) -> Option<Self> {
        if !major.is_finite() {
            return None;
        }

        Some(Self((major * 100.0).round() as i64))
    }

    pub fn to_major(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }
}

/// Integer division rounding half up. Both operands must be non-negative.
pub fn div_round_half_up(numerator: i128, denominator: i128) -> i128 {
    (2 * numerator + denominator) / (2 * denominator)
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_major())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let major = f64::deserialize(deserializer)?;

        Money::from_major(major)
            .ok_or_else(|| de::Error::custom("amount must be a finite number"))
    }
}
