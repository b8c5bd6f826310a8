//! Fixed-point units for hours and costs
//!
//! Money is i64 cents and hourly rates are i64 cents per hour. Hours are
//! counted in hundredths of an hour so that half-hour and quarter-hour
//! steps stay exact. Multiplying the two gives a *scaled cost* (cents × 100),
//! which is the unit every budget comparison is made in.
//!
//! CRITICAL: no allocation or validation decision goes through floating point.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, AddAssign, Sub};

/// Hundredths of an hour in one hour
pub const HOURS_SCALE: i64 = 100;

/// A non-fractional-drift quantity of hours, stored as hundredths of an hour
///
/// Serializes to JSON as a decimal number of hours (`5.5`), so editor
/// payloads stay human readable.
///
/// # Example
/// ```
/// use sow_pricing_core::Hours;
///
/// let h = Hours::whole(5) + Hours::from_hundredths(50);
/// assert_eq!(h.hundredths(), 550);
/// assert_eq!(h.to_string(), "5.5");
/// assert!(h.is_multiple_of(Hours::from_hundredths(50)));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hours(i64);

impl Hours {
    /// Zero hours
    pub const ZERO: Hours = Hours(0);

    /// Build from hundredths of an hour (`150` = 1.5h)
    pub const fn from_hundredths(hundredths: i64) -> Self {
        Self(hundredths)
    }

    /// Largest representable value
    pub const MAX: Hours = Hours(i64::MAX);

    /// Build from a whole number of hours
    pub const fn whole(hours: i64) -> Self {
        Self(hours.saturating_mul(HOURS_SCALE))
    }

    /// Build from a step count and a step size
    pub const fn from_steps(steps: i64, step: Hours) -> Self {
        Self(steps.saturating_mul(step.0))
    }

    /// Convert from floating point hours, rounding to the nearest hundredth
    ///
    /// Returns `None` for NaN, infinities, and values whose hundredths do
    /// not fit in an i64.
    pub fn from_f64(hours: f64) -> Option<Self> {
        let scaled = (hours * HOURS_SCALE as f64).round();
        // i64::MAX as f64 rounds up to 2^63, which is already out of range
        if !scaled.is_finite() || scaled.abs() >= i64::MAX as f64 {
            return None;
        }
        Some(Self(scaled as i64))
    }

    /// Raw hundredths of an hour
    pub const fn hundredths(self) -> i64 {
        self.0
    }

    /// Lossy conversion for display and serialization only
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / HOURS_SCALE as f64
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// True if this value is an exact multiple of `step` (`step` must be positive)
    pub const fn is_multiple_of(self, step: Hours) -> bool {
        step.0 > 0 && self.0 % step.0 == 0
    }

    /// Number of whole `step`s in this value (truncating)
    pub const fn steps(self, step: Hours) -> i64 {
        self.0 / step.0
    }

    /// Round up to the next whole hour
    pub fn ceil_whole(self) -> Self {
        let whole = div_ceil(self.0 as i128, HOURS_SCALE as i128) as i64;
        Self(whole.saturating_mul(HOURS_SCALE))
    }
}

impl Add for Hours {
    type Output = Hours;

    fn add(self, rhs: Hours) -> Hours {
        Hours(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Hours {
    fn add_assign(&mut self, rhs: Hours) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Hours {
    type Output = Hours;

    fn sub(self, rhs: Hours) -> Hours {
        Hours(self.0.saturating_sub(rhs.0))
    }
}

impl std::iter::Sum for Hours {
    fn sum<I: Iterator<Item = Hours>>(iter: I) -> Hours {
        iter.fold(Hours::ZERO, |acc, h| acc + h)
    }
}

impl fmt::Display for Hours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let whole = abs / HOURS_SCALE as u64;
        let frac = abs % HOURS_SCALE as u64;
        if frac == 0 {
            write!(f, "{}{}", sign, whole)
        } else if frac % 10 == 0 {
            write!(f, "{}{}.{}", sign, whole, frac / 10)
        } else {
            write!(f, "{}{}.{:02}", sign, whole, frac)
        }
    }
}

impl Serialize for Hours {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Hours {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = f64::deserialize(deserializer)?;
        Hours::from_f64(raw)
            .ok_or_else(|| serde::de::Error::custom(format!("hours out of range: {}", raw)))
    }
}

/// Exact cost of `hours` at `rate_cents` per hour, in scaled cents (cents × 100)
pub fn scaled_cost(hours: Hours, rate_cents: i64) -> i128 {
    hours.0 as i128 * rate_cents as i128
}

/// A budget in cents expressed in scaled cents
pub fn scaled_budget(budget_cents: i64) -> i128 {
    budget_cents as i128 * HOURS_SCALE as i128
}

/// Convert scaled cents back to cents, rounding half away from zero and
/// clamping to the i64 range
pub fn scaled_to_cents(scaled: i128) -> i64 {
    clamp_to_i64(div_round_half_up(scaled, HOURS_SCALE as i128))
}

/// Narrow an i128 to i64, saturating at the bounds
pub fn clamp_to_i64(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}

/// Integer division rounding half away from zero (`den` must be positive)
pub fn div_round_half_up(num: i128, den: i128) -> i128 {
    debug_assert!(den > 0, "denominator must be positive");
    if num >= 0 {
        (2 * num + den) / (2 * den)
    } else {
        -((2 * -num + den) / (2 * den))
    }
}

/// Integer division rounding towards positive infinity (`den` must be positive)
pub fn div_ceil(num: i128, den: i128) -> i128 {
    debug_assert!(den > 0, "denominator must be positive");
    if num >= 0 {
        (num + den - 1) / den
    } else {
        num / den
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hours_display() {
        assert_eq!(Hours::whole(65).to_string(), "65");
        assert_eq!(Hours::from_hundredths(1115).to_string(), "11.15");
        assert_eq!(Hours::from_hundredths(350).to_string(), "3.5");
        assert_eq!(Hours::from_hundredths(5).to_string(), "0.05");
        assert_eq!(Hours::from_hundredths(-250).to_string(), "-2.5");
    }

    #[test]
    fn test_hours_multiple_of_granularity() {
        let half = Hours::from_hundredths(50);
        assert!(Hours::from_hundredths(350).is_multiple_of(half));
        assert!(!Hours::from_hundredths(325).is_multiple_of(half));
        assert!(Hours::ZERO.is_multiple_of(half));
        assert!(!Hours::whole(1).is_multiple_of(Hours::ZERO));
    }

    #[test]
    fn test_hours_json_is_decimal() {
        let json = serde_json::to_string(&Hours::from_hundredths(550)).unwrap();
        assert_eq!(json, "5.5");
        let back: Hours = serde_json::from_str("0.25").unwrap();
        assert_eq!(back, Hours::from_hundredths(25));
        let whole: Hours = serde_json::from_str("8").unwrap();
        assert_eq!(whole, Hours::whole(8));
    }

    #[test]
    fn test_out_of_range_hours_rejected() {
        assert!(serde_json::from_str::<Hours>("1e17").is_err());
        assert!(serde_json::from_str::<Hours>("-1e17").is_err());
        assert!(Hours::from_f64(f64::NAN).is_none());
        assert_eq!(Hours::from_f64(1e16), Some(Hours::from_hundredths(1_000_000_000_000_000_000)));
    }

    #[test]
    fn test_arithmetic_saturates() {
        let big = Hours::from_hundredths(i64::MAX / 2 + 1);
        assert_eq!(big + big, Hours::MAX);
        assert_eq!([big, big, big].into_iter().sum::<Hours>(), Hours::MAX);
        let floor = Hours::from_hundredths(i64::MIN);
        assert_eq!(floor - Hours::whole(1), floor);
        assert_eq!(Hours::MAX.ceil_whole(), Hours::MAX);
        assert_eq!(scaled_to_cents(i128::MAX), i64::MAX);
        assert_eq!(clamp_to_i64(-(1i128 << 70)), i64::MIN);
    }

    #[test]
    fn test_ceil_whole() {
        assert_eq!(Hours::from_hundredths(401).ceil_whole(), Hours::whole(5));
        assert_eq!(Hours::whole(4).ceil_whole(), Hours::whole(4));
        assert_eq!(Hours::ZERO.ceil_whole(), Hours::ZERO);
    }

    #[test]
    fn test_rounding_helpers() {
        assert_eq!(div_round_half_up(5, 2), 3);
        assert_eq!(div_round_half_up(4, 3), 1);
        assert_eq!(div_round_half_up(-5, 2), -3);
        assert_eq!(div_ceil(1, 100), 1);
        assert_eq!(div_ceil(0, 100), 0);
        assert_eq!(div_ceil(200, 100), 2);
    }

    #[test]
    fn test_scaled_cost_is_exact() {
        // 0.5h at $180.00/h = $90.00
        let scaled = scaled_cost(Hours::from_hundredths(50), 18_000);
        assert_eq!(scaled, 900_000);
        assert_eq!(scaled_to_cents(scaled), 9_000);
        assert_eq!(scaled_budget(10_000), 1_000_000);
    }
}
