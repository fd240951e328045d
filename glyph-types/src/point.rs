use std::ops::{Add, Mul, Sub};

/// Two dimensional point with a generic coordinate type.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Point<T> {
    /// X coordinate.
    pub x: T,
    /// Y coordinate.
    pub y: T,
}

impl<T> Point<T> {
    /// Creates a new point with the given x and y coordinates.
    #[inline(always)]
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    /// Maps `Point<T>` to `Point<U>` by applying a function to each coordinate.
    #[inline(always)]
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Point<U> {
        Point {
            x: f(self.x),
            y: f(self.y),
        }
    }

    /// The point halfway between `self` and `other`.
    #[inline(always)]
    pub fn midpoint(self, other: Self) -> Self
    where
        T: Add<Output = T> + Sub<Output = T> + Mul<f64, Output = T> + Copy,
    {
        self + (other - self) * 0.5
    }
}

impl<T: Add<Output = T>> Add for Point<T> {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl<T: Sub<Output = T>> Sub for Point<T> {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl<T: Mul<U, Output = T>, U: Copy> Mul<U> for Point<T> {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: U) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs)
    }
}
