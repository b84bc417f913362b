//! Exact rational values for frame rates, time bases, and aspect ratios.
//!
//! [`Rational`] mirrors FFmpeg's `AVRational` but widens both parts to `i64`,
//! so the product of two ratios built from `AVRational` parts always fits.
//! A zero denominator is the "undefined" value: it is what a degenerate input
//! (a zero time base, a `0/0` ratio) turns into, and it survives arithmetic
//! instead of panicking. Arithmetic that would overflow `i64` also yields the
//! undefined value.

use std::{
    cmp::Ordering,
    fmt::{Display, Formatter, Result as FmtResult},
    ops::Mul,
};

/// A numerator/denominator pair.
///
/// Equality is structural: `2/4` and `1/2` are different values. Use
/// [`reduced`](Rational::reduced) or [`value_cmp`](Rational::value_cmp) to
/// compare by magnitude.
///
/// # Example
///
/// ```
/// use mediascope::Rational;
///
/// let frame = Rational::new(720, 480);
/// let sample = Rational::new(8, 9);
/// assert_eq!((frame * sample).reduced(), Rational::new(4, 3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    numerator: i64,
    denominator: i64,
}

impl Rational {
    /// The undefined value (`0/0`).
    pub const UNDEFINED: Self = Self {
        numerator: 0,
        denominator: 0,
    };

    /// Square pixels / unity.
    pub const ONE: Self = Self {
        numerator: 1,
        denominator: 1,
    };

    /// Create a rational, moving any negative sign onto the numerator.
    ///
    /// A zero denominator yields a value for which
    /// [`is_undefined`](Rational::is_undefined) is `true`, as does a sign
    /// flip that does not fit (`i64::MIN` in either part with a negative
    /// denominator).
    pub fn new(numerator: i64, denominator: i64) -> Self {
        if denominator >= 0 {
            return Self {
                numerator,
                denominator,
            };
        }
        match (numerator.checked_neg(), denominator.checked_neg()) {
            (Some(numerator), Some(denominator)) => Self {
                numerator,
                denominator,
            },
            _ => Self::UNDEFINED,
        }
    }

    /// The numerator, carrying the sign.
    pub fn numerator(self) -> i64 {
        self.numerator
    }

    /// The denominator; never negative.
    pub fn denominator(self) -> i64 {
        self.denominator
    }

    /// `true` when the denominator is zero.
    pub fn is_undefined(self) -> bool {
        self.denominator == 0
    }

    /// `true` when both parts are non-zero.
    pub fn is_nonzero(self) -> bool {
        self.numerator != 0 && self.denominator != 0
    }

    /// Swap numerator and denominator.
    ///
    /// Inverting a zero numerator produces the undefined value.
    pub fn invert(self) -> Self {
        Self::new(self.denominator, self.numerator)
    }

    /// The same value in lowest terms. Undefined values are returned as-is.
    pub fn reduced(self) -> Self {
        if self.is_undefined() {
            return self;
        }
        let divisor = gcd(self.numerator.unsigned_abs(), self.denominator.unsigned_abs());
        if divisor <= 1 {
            return self;
        }
        let divisor = divisor as i64;
        Self {
            numerator: self.numerator / divisor,
            denominator: self.denominator / divisor,
        }
    }

    /// Compare by magnitude. Returns `None` if either side is undefined.
    pub fn value_cmp(self, other: Self) -> Option<Ordering> {
        if self.is_undefined() || other.is_undefined() {
            return None;
        }
        // Denominators are positive, so cross multiplication keeps the order.
        let left = i128::from(self.numerator) * i128::from(other.denominator);
        let right = i128::from(other.numerator) * i128::from(self.denominator);
        Some(left.cmp(&right))
    }

    /// Floating-point value, `NaN` when undefined.
    pub fn to_f64(self) -> f64 {
        if self.is_undefined() {
            return f64::NAN;
        }
        self.numerator as f64 / self.denominator as f64
    }
}

impl Mul for Rational {
    type Output = Self;

    /// Multiply numerators and denominators. The product is not reduced, and
    /// is undefined if either part overflows.
    fn mul(self, other: Self) -> Self {
        match (
            self.numerator.checked_mul(other.numerator),
            self.denominator.checked_mul(other.denominator),
        ) {
            (Some(numerator), Some(denominator)) => Self::new(numerator, denominator),
            _ => Self::UNDEFINED,
        }
    }
}

impl Display for Rational {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl From<ffmpeg_next::Rational> for Rational {
    fn from(value: ffmpeg_next::Rational) -> Self {
        Self::new(i64::from(value.numerator()), i64::from(value.denominator()))
    }
}

impl From<(i64, i64)> for Rational {
    fn from((numerator, denominator): (i64, i64)) -> Self {
        Self::new(numerator, denominator)
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let remainder = a % b;
        a = b;
        b = remainder;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_moves_to_numerator() {
        let value = Rational::new(3, -4);
        assert_eq!(value.numerator(), -3);
        assert_eq!(value.denominator(), 4);
    }

    #[test]
    fn multiplication_is_not_reduced() {
        let product = Rational::new(16, 9) * Rational::new(2, 2);
        assert_eq!(product, Rational::new(32, 18));
        assert_eq!(product.reduced(), Rational::new(16, 9));
    }

    #[test]
    fn zero_denominator_is_undefined() {
        assert!(Rational::new(25, 0).is_undefined());
        assert!(Rational::UNDEFINED.is_undefined());
        assert!(Rational::UNDEFINED.to_f64().is_nan());
        assert!((Rational::UNDEFINED * Rational::ONE).is_undefined());
    }

    #[test]
    fn invert_of_zero_numerator_is_undefined() {
        assert!(Rational::new(0, 1).invert().is_undefined());
        assert_eq!(Rational::new(1, 25).invert(), Rational::new(25, 1));
    }

    #[test]
    fn value_comparison() {
        assert_eq!(
            Rational::new(1, 2).value_cmp(Rational::new(2, 4)),
            Some(Ordering::Equal)
        );
        assert_eq!(
            Rational::new(30000, 1001).value_cmp(Rational::new(30, 1)),
            Some(Ordering::Less)
        );
        assert_eq!(Rational::UNDEFINED.value_cmp(Rational::ONE), None);
    }

    #[test]
    fn reduce_keeps_sign() {
        assert_eq!(Rational::new(-30, 60).reduced(), Rational::new(-1, 2));
    }

    #[test]
    fn unrepresentable_sign_flip_is_undefined() {
        assert!(Rational::new(i64::MIN, -1).is_undefined());
        assert!(Rational::new(1, i64::MIN).is_undefined());
        assert_eq!(Rational::new(i64::MAX, -1), Rational::new(-i64::MAX, 1));
    }

    #[test]
    fn overflowing_product_is_undefined() {
        assert!((Rational::new(i64::MAX, 1) * Rational::new(2, 1)).is_undefined());
        assert!((Rational::new(1, i64::MAX) * Rational::new(1, 2)).is_undefined());

        let widest = Rational::new(i64::from(i32::MAX), 1);
        assert_eq!(
            widest * widest,
            Rational::new(i64::from(i32::MAX) * i64::from(i32::MAX), 1)
        );
    }

    #[test]
    fn invert_of_most_negative_numerator_is_undefined() {
        assert!(Rational::new(i64::MIN, 3).invert().is_undefined());
    }

    #[test]
    fn display() {
        assert_eq!(Rational::new(30000, 1001).to_string(), "30000/1001");
    }
}
