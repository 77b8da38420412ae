//! Fixed-point money and multiplier values.
//!
//! Both are stored in hundredths so that every amount the game shows is exactly what it
//! computes with. Rounding happens in two places only, when a multiplier is derived from the
//! round progress and when a bet is scaled by a multiplier.

use core::fmt;
use core::str::FromStr;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::*;

/// An amount of currency in hundredths (cents).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Self = Self(0);

    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    pub const fn from_units(units: u64) -> Self {
        Self(units.saturating_mul(100))
    }

    pub const fn cents(self) -> u64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn checked_sub(self, rhs: Self) -> Option<Self> {
        match self.0.checked_sub(rhs.0) {
            Some(cents) => Some(Self(cents)),
            None => None,
        }
    }

    pub const fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }

    pub const fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }

    /// `self × multiplier`, rounded half up to the nearest cent.
    pub fn scaled(self, multiplier: Multiplier) -> Self {
        let cents = (u128::from(self.0) * u128::from(multiplier.0) + 50) / 100;
        Self(u64::try_from(cents).unwrap_or(u64::MAX))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for Money {
    type Err = ParseError;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        parse_hundredths(s).map(Self).ok_or(ParseError::InvalidAmount)
    }
}

/// A payout factor in hundredths, `100` being ×1.00.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Multiplier(u32);

impl Multiplier {
    pub const ONE: Self = Self(100);

    pub const fn from_hundredths(hundredths: u32) -> Self {
        Self(hundredths)
    }

    pub const fn hundredths(self) -> u32 {
        self.0
    }

    /// `base × (1 + revealed / safe_cells)` evaluated in double precision, then rounded to two
    /// decimals from the exact value of that double, halves up.
    ///
    /// Decimal ties usually land a hair below the half in binary: medium after three cells is
    /// 1.7249999999999998..., so it pays ×1.72.
    pub const fn for_progress(base: Self, revealed: CellCount, safe_cells: CellCount) -> Self {
        if safe_cells == 0 {
            return base;
        }
        let base = base.0 as f64 / 100.0;
        let product = base * (1.0 + revealed as f64 / safe_cells as f64);
        Self(round_to_hundredths(product) as u32)
    }
}

/// Hundredths of a non-negative finite double, rounding its exact binary value half up.
const fn round_to_hundredths(x: f64) -> u64 {
    let bits = x.to_bits();
    let exponent = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1 << 52) - 1);
    let (mantissa, exponent) = if exponent == 0 {
        (fraction, 1)
    } else {
        (fraction | (1 << 52), exponent)
    };
    // x = mantissa × 2^-shift
    let shift = 1075 - exponent;
    if shift <= 0 {
        return u64::MAX;
    }
    if shift >= 120 {
        return 0;
    }
    let scaled = mantissa as u128 * 100;
    ((scaled + (1 << (shift - 1))) >> shift) as u64
}

impl Default for Multiplier {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

fn parse_hundredths(s: &str) -> Option<u64> {
    let s = s.trim();
    let (whole, fraction) = match s.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (s, ""),
    };
    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if fraction.len() > 2 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let whole: u64 = whole.parse().ok()?;
    let fraction = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<u64>().ok()? * 10,
        _ => fraction.parse::<u64>().ok()?,
    };
    whole.checked_mul(100)?.checked_add(fraction)
}

// Both types appear as plain decimal numbers in serialized snapshots and config files.

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0 as f64 / 100.0)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        deserializer.deserialize_any(HundredthsVisitor).map(Self)
    }
}

impl Serialize for Multiplier {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.serialize_f64(f64::from(self.0) / 100.0)
    }
}

impl<'de> Deserialize<'de> for Multiplier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let hundredths = deserializer.deserialize_any(HundredthsVisitor)?;
        u32::try_from(hundredths)
            .map(Self)
            .map_err(|_| de::Error::custom("multiplier out of range"))
    }
}

struct HundredthsVisitor;

impl Visitor<'_> for HundredthsVisitor {
    type Value = u64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative decimal number")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> core::result::Result<u64, E> {
        v.checked_mul(100)
            .ok_or_else(|| E::custom("amount out of range"))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> core::result::Result<u64, E> {
        let v = u64::try_from(v).map_err(|_| E::custom("amount must not be negative"))?;
        self.visit_u64(v)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> core::result::Result<u64, E> {
        if !v.is_finite() || v < 0.0 {
            return Err(E::custom("amount must be a finite, non-negative number"));
        }
        let hundredths = v * 100.0 + 0.5;
        if hundredths >= u64::MAX as f64 {
            return Err(E::custom("amount out of range"));
        }
        Ok(hundredths as u64)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> core::result::Result<u64, E> {
        parse_hundredths(v).ok_or_else(|| E::custom(ParseError::InvalidAmount))
    }
}
