use std::ops::Sub;

/// Minimum and maximum extents of a rectangular region, in a y-up
/// coordinate system.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox<T> {
    /// The left side of the region.
    pub x_min: T,
    /// The bottom of the region.
    pub y_min: T,
    /// The right side of the region.
    pub x_max: T,
    /// The top of the region.
    pub y_max: T,
}

impl<T> BoundingBox<T>
where
    T: Sub<Output = T> + Copy,
{
    /// Horizontal extent of the box.
    pub fn width(&self) -> T {
        self.x_max - self.x_min
    }

    /// Vertical extent of the box.
    pub fn height(&self) -> T {
        self.y_max - self.y_min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extents() {
        let bbox = BoundingBox {
            x_min: -10,
            y_min: -200,
            x_max: 490,
            y_max: 700,
        };
        assert_eq!(bbox.width(), 500);
        assert_eq!(bbox.height(), 900);
    }
}
