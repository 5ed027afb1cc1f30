//! 16.16 and 32.32 signed fixed-point numerics.
//!
//! All geometry interior to `raster2d` is carried in [`Fixed16`]; client-facing
//! doubles are converted at the API boundary (`raster2d-core`). Multiplication
//! and division promote through [`Fixed32`] (32 integer bits, 32 fractional
//! bits) so that intermediate products never overflow a 64-bit accumulator.

#![no_std]

use core::cmp::Ordering;
use core::ops::{Add, Neg, Sub};

/// Number of fractional bits carried by [`Fixed16`].
pub const FRAC_BITS: u32 = 16;
const FRAC_ONE: i64 = 1 << FRAC_BITS;

/// A 16.16 signed fixed-point number backed by `i32`.
///
/// Addition and subtraction are plain machine-integer operations.
/// Multiplication and division promote to [`Fixed32`] to avoid overflow.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fixed16(i32);

impl Fixed16 {
    pub const ZERO: Fixed16 = Fixed16(0);
    pub const ONE: Fixed16 = Fixed16(FRAC_ONE as i32);
    pub const EPSILON: Fixed16 = Fixed16(1);

    /// Construct from the raw 16.16 representation.
    #[inline]
    pub const fn from_raw(raw: i32) -> Self {
        Fixed16(raw)
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Convert from an integer with no fractional part.
    #[inline]
    pub const fn from_i32(v: i32) -> Self {
        Fixed16(v << FRAC_BITS)
    }

    /// Convert from a double, rounding to nearest (ties away from zero).
    #[inline]
    pub fn from_f64(v: f64) -> Self {
        let scaled = v * (FRAC_ONE as f64);
        let rounded = if scaled >= 0.0 {
            (scaled + 0.5).floor()
        } else {
            (scaled - 0.5).ceil()
        };
        Fixed16(rounded as i32)
    }

    /// Convert to a double exactly (16.16 fits losslessly in an `f64`).
    #[inline]
    pub fn to_f64(self) -> f64 {
        (self.0 as f64) / (FRAC_ONE as f64)
    }

    /// Truncate toward negative infinity.
    #[inline]
    pub fn floor_to_i32(self) -> i32 {
        self.0 >> FRAC_BITS
    }

    /// Truncate toward negative infinity, returning the fractional part
    /// (always in `[0, 1)`) alongside the integer part.
    #[inline]
    pub fn floor_frac(self) -> (i32, Fixed16) {
        let i = self.floor_to_i32();
        (i, Fixed16(self.0 - (i << FRAC_BITS)))
    }

    #[inline]
    pub fn ceil_to_i32(self) -> i32 {
        let (i, frac) = self.floor_frac();
        if frac.0 == 0 {
            i
        } else {
            i + 1
        }
    }

    #[inline]
    pub fn round_to_i32(self) -> i32 {
        Fixed16(self.0 + (FRAC_ONE as i32) / 2).floor_to_i32()
    }

    #[inline]
    pub fn abs(self) -> Fixed16 {
        Fixed16(self.0.abs())
    }

    #[inline]
    pub fn min(self, other: Fixed16) -> Fixed16 {
        if self.0 <= other.0 {
            self
        } else {
            other
        }
    }

    #[inline]
    pub fn max(self, other: Fixed16) -> Fixed16 {
        if self.0 >= other.0 {
            self
        } else {
            other
        }
    }

    /// Multiply two 16.16 values, promoting to [`Fixed32`] internally so the
    /// product cannot overflow, then truncating back to 16.16.
    #[inline]
    pub fn mul(self, other: Fixed16) -> Fixed16 {
        Fixed32::from_fixed16(self).mul16(other).to_fixed16()
    }

    /// Divide two 16.16 values via [`Fixed32`] promotion.
    #[inline]
    pub fn div(self, other: Fixed16) -> Fixed16 {
        Fixed32::from_fixed16(self).div16(other).to_fixed16()
    }
}

impl Add for Fixed16 {
    type Output = Fixed16;
    #[inline]
    fn add(self, rhs: Fixed16) -> Fixed16 {
        Fixed16(self.0.wrapping_add(rhs.0))
    }
}

impl Sub for Fixed16 {
    type Output = Fixed16;
    #[inline]
    fn sub(self, rhs: Fixed16) -> Fixed16 {
        Fixed16(self.0.wrapping_sub(rhs.0))
    }
}

impl Neg for Fixed16 {
    type Output = Fixed16;
    #[inline]
    fn neg(self) -> Fixed16 {
        Fixed16(-self.0)
    }
}

impl core::fmt::Debug for Fixed16 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Fixed16({})", self.to_f64())
    }
}

/// A 32.32 signed fixed-point number backed by `i64`, used only as an
/// intermediate for multiplication and division of [`Fixed16`] values.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Fixed32(i64);

const FIXED32_FRAC_BITS: u32 = 32;

impl Fixed32 {
    #[inline]
    fn from_fixed16(v: Fixed16) -> Self {
        Fixed32((v.0 as i64) << (FIXED32_FRAC_BITS - FRAC_BITS))
    }

    #[inline]
    fn mul16(self, other: Fixed16) -> Fixed32 {
        // self carries FIXED32_FRAC_BITS fractional bits, other carries FRAC_BITS;
        // the product carries FIXED32_FRAC_BITS + FRAC_BITS, shift back down to
        // FIXED32_FRAC_BITS.
        let product = (self.0 as i128) * (other.0 as i128);
        Fixed32((product >> FRAC_BITS) as i64)
    }

    #[inline]
    fn div16(self, other: Fixed16) -> Fixed32 {
        let numerator = (self.0 as i128) << FRAC_BITS;
        Fixed32((numerator / (other.0 as i128)) as i64)
    }

    #[inline]
    fn to_fixed16(self) -> Fixed16 {
        Fixed16((self.0 >> (FIXED32_FRAC_BITS - FRAC_BITS)) as i32)
    }
}

/// A point in `Fixed16` device/user space (the coordinate system is
/// determined by whatever has already been applied to it by the CTM).
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Debug)]
pub struct Point {
    pub x: Fixed16,
    pub y: Fixed16,
}

impl Point {
    #[inline]
    pub const fn new(x: Fixed16, y: Fixed16) -> Self {
        Point { x, y }
    }

    #[inline]
    pub fn from_f64(x: f64, y: f64) -> Self {
        Point {
            x: Fixed16::from_f64(x),
            y: Fixed16::from_f64(y),
        }
    }
}

impl Sub for Point {
    type Output = Slope;
    #[inline]
    fn sub(self, rhs: Point) -> Slope {
        Slope {
            dx: self.x - rhs.x,
            dy: self.y - rhs.y,
        }
    }
}

/// A direction vector, not normalized. Two slopes are ordered only by the
/// sign of their 2D cross product (see [`Slope::cmp_cw`]).
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Debug)]
pub struct Slope {
    pub dx: Fixed16,
    pub dy: Fixed16,
}

impl Slope {
    #[inline]
    pub const fn new(dx: Fixed16, dy: Fixed16) -> Self {
        Slope { dx, dy }
    }

    /// `self.dx * other.dy - self.dy * other.dx`, computed through
    /// [`Fixed32`] so the cross product of two `Fixed16` slopes cannot
    /// overflow before the sign is extracted.
    #[inline]
    pub fn cross(self, other: Slope) -> i64 {
        let a = Fixed32::from_fixed16(self.dx).mul16(other.dy);
        let b = Fixed32::from_fixed16(self.dy).mul16(other.dx);
        a.0 - b.0
    }

    /// Clockwise ordering of two slopes by cross-product sign (downward-Y
    /// user space, as used throughout the pen and AEL code).
    #[inline]
    pub fn cmp_cw(self, other: Slope) -> Ordering {
        match self.cross(other) {
            c if c > 0 => Ordering::Less,
            c if c < 0 => Ordering::Greater,
            _ => Ordering::Equal,
        }
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.dx == Fixed16::ZERO && self.dy == Fixed16::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_through_f64() {
        for v in [0.0, 1.0, -1.0, 0.5, -0.5, 123.456, -999.125] {
            let f = Fixed16::from_f64(v);
            assert!((f.to_f64() - v).abs() < 1.0 / 65536.0);
        }
    }

    #[test]
    fn floor_truncates_toward_negative_infinity() {
        assert_eq!(Fixed16::from_f64(1.5).floor_to_i32(), 1);
        assert_eq!(Fixed16::from_f64(-1.5).floor_to_i32(), -2);
        assert_eq!(Fixed16::from_f64(-0.25).floor_to_i32(), -1);
    }

    #[test]
    fn mul_div_are_inverse() {
        let a = Fixed16::from_f64(3.5);
        let b = Fixed16::from_f64(2.0);
        let product = a.mul(b);
        assert!((product.to_f64() - 7.0).abs() < 1e-4);
        let back = product.div(b);
        assert!((back.to_f64() - 3.5).abs() < 1e-4);
    }

    #[test]
    fn cross_product_sign_orders_slopes_clockwise() {
        let right = Slope::new(Fixed16::from_f64(1.0), Fixed16::ZERO);
        let down = Slope::new(Fixed16::ZERO, Fixed16::from_f64(1.0));
        assert_eq!(right.cmp_cw(down), Ordering::Less);
        assert_eq!(down.cmp_cw(right), Ordering::Greater);
        assert_eq!(right.cmp_cw(right), Ordering::Equal);
    }

    #[test]
    fn addition_is_exact_machine_integer_op() {
        let a = Fixed16::from_raw(10);
        let b = Fixed16::from_raw(20);
        assert_eq!((a + b).raw(), 30);
        assert_eq!((b - a).raw(), 10);
    }
}
