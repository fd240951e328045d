//! fixed-point numerical types

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

// shared between Fixed and F2Dot14
macro_rules! fixed_impl {
    ($name:ident, $bits:literal, $fract_bits:literal, $ty:ty) => {
        #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
        #[cfg_attr(feature = "bytemuck", derive(bytemuck_derive::AnyBitPattern))]
        #[repr(transparent)]
        #[doc = concat!(stringify!($bits), "-bit signed fixed point number with ", stringify!($fract_bits), " bits of fraction." )]
        pub struct $name($ty);

        impl $name {
            /// Minimum value.
            pub const MIN: Self = Self(<$ty>::MIN);

            /// Maximum value.
            pub const MAX: Self = Self(<$ty>::MAX);

            /// This type's smallest representable value
            pub const EPSILON: Self = Self(1);

            /// Representation of 0.0.
            pub const ZERO: Self = Self(0);

            /// Representation of 1.0.
            pub const ONE: Self = Self(1 << $fract_bits);

            const INT_MASK: $ty = !0 << $fract_bits;
            const ROUND: $ty = 1 << ($fract_bits - 1);
            const FRACT_BITS: usize = $fract_bits;

            /// Creates a new fixed point value from the underlying bit representation.
            #[inline(always)]
            pub const fn from_bits(bits: $ty) -> Self {
                Self(bits)
            }

            /// Returns the underlying bit representation of the value.
            #[inline(always)]
            pub const fn to_bits(self) -> $ty {
                self.0
            }

            /// Returns the nearest integer value.
            #[inline(always)]
            pub fn round(self) -> Self {
                Self(self.0.wrapping_add(Self::ROUND) & Self::INT_MASK)
            }

            /// Returns the absolute value of the number.
            #[inline(always)]
            pub fn abs(self) -> Self {
                Self(self.0.wrapping_abs())
            }

            /// Returns the largest integer less than or equal to the number.
            #[inline(always)]
            pub fn floor(self) -> Self {
                Self(self.0 & Self::INT_MASK)
            }

            /// Returns the fractional part of the number.
            #[inline(always)]
            pub fn fract(self) -> Self {
                Self(self.0 - self.floor().0)
            }

            /// Wrapping addition.
            #[inline(always)]
            pub fn wrapping_add(self, other: Self) -> Self {
                Self(self.0.wrapping_add(other.0))
            }

            /// Wrapping substitution.
            #[inline(always)]
            pub fn wrapping_sub(self, other: Self) -> Self {
                Self(self.0.wrapping_sub(other.0))
            }

            /// Returns the value as an `f64`.
            ///
            /// This is lossless for both fixed types.
            #[inline(always)]
            pub fn to_f64(self) -> f64 {
                self.0 as f64 / (1i64 << Self::FRACT_BITS) as f64
            }

            /// Creates a fixed point value from an `f64`, rounding to the
            /// nearest representable value.
            #[inline(always)]
            pub fn from_f64(x: f64) -> Self {
                Self((x * (1i64 << Self::FRACT_BITS) as f64).round() as $ty)
            }
        }

        impl Add for $name {
            type Output = Self;
            #[inline(always)]
            fn add(self, other: Self) -> Self {
                Self(self.0.wrapping_add(other.0))
            }
        }

        impl AddAssign for $name {
            #[inline(always)]
            fn add_assign(&mut self, other: Self) {
                *self = *self + other;
            }
        }

        impl Sub for $name {
            type Output = Self;
            #[inline(always)]
            fn sub(self, other: Self) -> Self {
                Self(self.0.wrapping_sub(other.0))
            }
        }

        impl SubAssign for $name {
            #[inline(always)]
            fn sub_assign(&mut self, other: Self) {
                *self = *self - other;
            }
        }

        impl Neg for $name {
            type Output = Self;
            #[inline(always)]
            fn neg(self) -> Self {
                Self(self.0.wrapping_neg())
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.to_f64())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.to_f64())
            }
        }

        crate::raw::newtype_scalar!($name, [u8; { $bits / 8 }]);
    };
}

fixed_impl!(Fixed, 32, 16, i32);
fixed_impl!(F2Dot14, 16, 14, i16);

impl Fixed {
    /// Creates a 16.16 value from an integer, saturating at the representable range.
    #[inline(always)]
    pub const fn from_i32(i: i32) -> Self {
        let bits = (i as i64) * 0x10000;
        if bits > i32::MAX as i64 {
            Self(i32::MAX)
        } else if bits < i32::MIN as i64 {
            Self(i32::MIN)
        } else {
            Self(bits as i32)
        }
    }

    /// Returns the integer part of the value, rounded toward negative infinity.
    #[inline(always)]
    pub const fn to_i32(self) -> i32 {
        self.0 >> 16
    }

    /// Returns the value rounded to the nearest integer.
    #[inline(always)]
    pub fn round_to_i32(self) -> i32 {
        self.round().to_i32()
    }
}

impl Mul for Fixed {
    type Output = Self;

    #[inline(always)]
    fn mul(self, other: Self) -> Self {
        let ab = self.0 as i64 * other.0 as i64;
        Self(((ab + 0x8000 - i64::from(ab < 0)) >> 16) as i32)
    }
}

impl Div for Fixed {
    type Output = Self;

    /// Rounded division; division by zero saturates.
    #[inline(always)]
    fn div(self, other: Self) -> Self {
        let mut sign = 1;
        let mut a = self.0 as i64;
        let mut b = other.0 as i64;
        if a < 0 {
            a = -a;
            sign = -1;
        }
        if b < 0 {
            b = -b;
            sign = -sign;
        }
        let q = if b == 0 {
            i32::MAX as i64
        } else {
            (((a << 16) + (b >> 1)) / b).min(i32::MAX as i64)
        };
        Self((q * sign) as i32)
    }
}

impl F2Dot14 {
    /// Returns the value as an `f32`.
    #[inline(always)]
    pub fn to_f32(self) -> f32 {
        self.0 as f32 / 16384.0
    }

    /// Converts this value to a 16.16 fixed point value.
    #[inline(always)]
    pub fn to_fixed(self) -> Fixed {
        Fixed(self.0 as i32 * 4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f2dot14_values() {
        // from the table in the OpenType data types section
        assert_eq!(F2Dot14::from_bits(0x7fff).to_f64(), 1.999938964843750);
        assert_eq!(F2Dot14::from_bits(0x7000).to_f64(), 1.75);
        assert_eq!(F2Dot14::from_bits(0x0001).to_f64(), 0.00006103515625);
        assert_eq!(F2Dot14::from_bits(0x0000).to_f64(), 0.0);
        assert_eq!(F2Dot14::from_bits(-1).to_f64(), -0.00006103515625);
        assert_eq!(F2Dot14::from_bits(-0x8000).to_f64(), -2.0);
        assert_eq!(F2Dot14::from_bits(0x4000).to_f32(), 1.0);
    }

    #[test]
    fn fixed_int_conversions() {
        assert_eq!(Fixed::from_i32(-3).to_i32(), -3);
        assert_eq!(Fixed::from_i32(40000).to_i32(), 32767);
        const SATURATED: Fixed = Fixed::from_i32(-40000);
        assert_eq!(SATURATED.to_bits(), i32::MIN);
        assert_eq!(Fixed::from_f64(2.5).round_to_i32(), 3);
        assert_eq!(Fixed::from_f64(-2.25).floor().to_f64(), -3.0);
    }

    #[test]
    fn fixed_mul_div() {
        let a = Fixed::from_f64(1.5);
        let b = Fixed::from_i32(4);
        assert_eq!(a * b, Fixed::from_i32(6));
        assert_eq!(b / a, Fixed::from_bits(174763));
        assert_eq!(-b / Fixed::from_i32(2), Fixed::from_i32(-2));
        assert_eq!(b / Fixed::ZERO, Fixed::MAX);
    }

    #[test]
    fn f2dot14_to_fixed() {
        assert_eq!(F2Dot14::from_bits(0x2000).to_fixed(), Fixed::from_f64(0.5));
    }
}
