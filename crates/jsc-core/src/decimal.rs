//! # Exact Decimal Arithmetic for `multipleOf`
//!
//! Floating remainder gives false negatives on decimal steps
//! (`0.3 % 0.1 != 0` in binary floating point). JSON numbers are decimal
//! text, so `multipleOf` values are parsed from that text into a scaled
//! integer and divisibility is decided exactly.
//!
//! Values whose scaled mantissa does not fit an `i128` fall back to an
//! epsilon-tolerant ratio test.

use std::fmt;

use serde_json::Number;

const RATIO_EPSILON: f64 = 1e-9;

/// A decimal number `mantissa * 10^-scale`, normalized so that
/// `mantissa` carries no trailing zeros while `scale > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decimal {
    mantissa: i128,
    scale: u32,
}

impl Decimal {
    /// Build from raw parts, normalizing trailing zeros.
    pub fn new(mantissa: i128, scale: u32) -> Self {
        let mut d = Self { mantissa, scale };
        while d.scale > 0 && d.mantissa % 10 == 0 {
            d.mantissa /= 10;
            d.scale -= 1;
        }
        d
    }

    /// Parse a JSON number from its textual form.
    ///
    /// Returns `None` for text that is not a finite decimal or whose
    /// scaled mantissa overflows.
    pub fn from_number(n: &Number) -> Option<Self> {
        Self::parse(&n.to_string())
    }

    /// Parse decimal text such as `-12.50`, `1e-7` or `2.5E+3`.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let (body, exponent) = match text.find(['e', 'E']) {
            Some(i) => (&text[..i], text[i + 1..].parse::<i64>().ok()?),
            None => (text, 0),
        };
        let (negative, body) = match body.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, body.strip_prefix('+').unwrap_or(body)),
        };
        let (int_part, frac_part) = match body.split_once('.') {
            Some((i, f)) => (i, f),
            None => (body, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return None;
        }
        if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
            return None;
        }

        let mut mantissa: i128 = 0;
        for b in int_part.bytes().chain(frac_part.bytes()) {
            mantissa = mantissa.checked_mul(10)?.checked_add(i128::from(b - b'0'))?;
        }
        if negative {
            mantissa = -mantissa;
        }

        let scale = frac_part.len() as i64 - exponent;
        if scale >= 0 {
            Some(Self::new(mantissa, u32::try_from(scale).ok()?))
        } else {
            let factor = pow10(u32::try_from(-scale).ok()?)?;
            Some(Self::new(mantissa.checked_mul(factor)?, 0))
        }
    }

    /// Nearest `f64`.
    pub fn to_f64(self) -> f64 {
        self.mantissa as f64 / 10f64.powi(self.scale as i32)
    }

    /// True for zero.
    pub fn is_zero(self) -> bool {
        self.mantissa == 0
    }

    /// True when `self / step` is an integer.
    ///
    /// A zero `step` divides nothing.
    pub fn is_integer_multiple_of(self, step: Decimal) -> bool {
        if step.is_zero() {
            return false;
        }
        match self.aligned(step) {
            Some((a, b)) => a % b == 0,
            None => {
                let ratio = self.to_f64() / step.to_f64();
                (ratio - ratio.round()).abs() <= RATIO_EPSILON * ratio.abs().max(1.0)
            }
        }
    }

    /// Least common multiple of two positive steps, when representable.
    pub fn lcm(self, other: Decimal) -> Option<Decimal> {
        let scale = self.scale.max(other.scale);
        let (a, b) = self.aligned(other)?;
        let (a, b) = (a.abs(), b.abs());
        if a == 0 || b == 0 {
            return None;
        }
        let l = (a / gcd(a, b)).checked_mul(b)?;
        Some(Self::new(l, scale))
    }

    /// Both values rescaled to their common scale.
    fn aligned(self, other: Decimal) -> Option<(i128, i128)> {
        let scale = self.scale.max(other.scale);
        let a = self.mantissa.checked_mul(pow10(scale - self.scale)?)?;
        let b = other.mantissa.checked_mul(pow10(scale - other.scale)?)?;
        Some((a, b))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale == 0 {
            return write!(f, "{}", self.mantissa);
        }
        let digits = self.mantissa.unsigned_abs().to_string();
        let scale = self.scale as usize;
        let sign = if self.mantissa < 0 { "-" } else { "" };
        if digits.len() > scale {
            let (i, frac) = digits.split_at(digits.len() - scale);
            write!(f, "{sign}{i}.{frac}")
        } else {
            write!(f, "{sign}0.{}{digits}", "0".repeat(scale - digits.len()))
        }
    }
}

fn pow10(exp: u32) -> Option<i128> {
    10i128.checked_pow(exp)
}

fn gcd(mut a: i128, mut b: i128) -> i128 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::parse(s).unwrap()
    }

    #[test]
    fn test_parse_normalizes_trailing_zeros() {
        assert_eq!(d("10.50"), d("10.5"));
        assert_eq!(d("1e2"), d("100"));
        assert_eq!(d("2.5E+3"), d("2500"));
        assert_eq!(d("1e-7").to_string(), "0.0000001");
        assert_eq!(d("-0.25").to_string(), "-0.25");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Decimal::parse("").is_none());
        assert!(Decimal::parse("abc").is_none());
        assert!(Decimal::parse("1.2.3").is_none());
        assert!(Decimal::parse("1e").is_none());
    }

    #[test]
    fn test_decimal_steps_are_exact() {
        // 0.3 % 0.1 is not zero in binary floating point.
        assert!(d("0.3").is_integer_multiple_of(d("0.1")));
        assert!(d("10").is_integer_multiple_of(d("5")));
        assert!(!d("5").is_integer_multiple_of(d("10")));
        assert!(d("0.75").is_integer_multiple_of(d("0.25")));
        assert!(!d("0.75").is_integer_multiple_of(d("0.5")));
    }

    #[test]
    fn test_zero_step_divides_nothing() {
        assert!(!d("3").is_integer_multiple_of(d("0")));
    }

    #[test]
    fn test_lcm() {
        assert_eq!(d("4").lcm(d("6")), Some(d("12")));
        assert_eq!(d("0.5").lcm(d("0.2")), Some(d("1")));
        assert_eq!(d("0").lcm(d("3")), None);
    }

    #[test]
    fn test_from_json_number() {
        let n: Number = serde_json::from_str("0.01").unwrap();
        assert_eq!(Decimal::from_number(&n), Some(d("0.01")));
    }
}
