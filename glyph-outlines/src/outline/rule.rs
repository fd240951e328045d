//! The primitives of a relative outline.

use std::fmt::{self, Write};

/// A single outline segment, relative to the current pen position.
///
/// Curve points are chained: each control point and the end point of a
/// curve are offsets from the point before it in the same segment.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum GlyphRule {
    /// Begin a new contour, offset from the current point.
    MoveTo { dx: f64, dy: f64 },
    /// Straight line to an offset from the current point.
    LineTo { dx: f64, dy: f64 },
    /// Quadratic curve. The end point is relative to the control point.
    QuadTo { cdx: f64, cdy: f64, dx: f64, dy: f64 },
    /// Cubic curve. The second control point is relative to the first and
    /// the end point is relative to the second.
    CubicTo {
        c1dx: f64,
        c1dy: f64,
        c2dx: f64,
        c2dy: f64,
        dx: f64,
        dy: f64,
    },
}

impl GlyphRule {
    /// Offset from the start of the segment to its end point.
    pub fn end_offset(&self) -> (f64, f64) {
        match *self {
            Self::MoveTo { dx, dy } | Self::LineTo { dx, dy } => (dx, dy),
            Self::QuadTo { cdx, cdy, dx, dy } => (cdx + dx, cdy + dy),
            Self::CubicTo {
                c1dx,
                c1dy,
                c2dx,
                c2dy,
                dx,
                dy,
            } => (c1dx + c2dx + dx, c1dy + c2dy + dy),
        }
    }

    /// Returns true for the quadratic and cubic variants.
    pub fn is_curve(&self) -> bool {
        matches!(self, Self::QuadTo { .. } | Self::CubicTo { .. })
    }

    /// Converts a quadratic curve to the equivalent cubic curve.
    ///
    /// With the control point `c` and end point `e` taken relative to the
    /// segment start, the cubic control points are `2c/3` and `(2c + e)/3`.
    /// Other rules are returned unchanged.
    pub fn to_cubic(&self) -> Self {
        match *self {
            Self::QuadTo { cdx, cdy, dx, dy } => {
                let (ex, ey) = (cdx + dx, cdy + dy);
                let (c1x, c1y) = (2.0 * cdx / 3.0, 2.0 * cdy / 3.0);
                let (c2x, c2y) = ((2.0 * cdx + ex) / 3.0, (2.0 * cdy + ey) / 3.0);
                Self::CubicTo {
                    c1dx: c1x,
                    c1dy: c1y,
                    c2dx: c2x - c1x,
                    c2dy: c2y - c1y,
                    dx: ex - c2x,
                    dy: ey - c2y,
                }
            }
            rule => rule,
        }
    }

    /// Appends the compact form of this rule.
    ///
    /// Curve coordinates after the first are cumulative from the segment
    /// start rather than chained.
    pub(crate) fn write_compact(&self, out: &mut String) -> fmt::Result {
        match *self {
            Self::MoveTo { dx, dy } => write!(out, "m{} {}", Num(dx), Num(dy)),
            Self::LineTo { dx, dy } => write!(out, "l{} {}", Num(dx), Num(dy)),
            Self::QuadTo { cdx, cdy, dx, dy } => write!(
                out,
                "q{} {} {} {}",
                Num(cdx),
                Num(cdy),
                Num(cdx + dx),
                Num(cdy + dy)
            ),
            Self::CubicTo {
                c1dx,
                c1dy,
                c2dx,
                c2dy,
                dx,
                dy,
            } => write!(
                out,
                "c{} {} {} {} {} {}",
                Num(c1dx),
                Num(c1dy),
                Num(c1dx + c2dx),
                Num(c1dy + c2dy),
                Num(c1dx + c2dx + dx),
                Num(c1dy + c2dy + dy)
            ),
        }
    }
}

/// Formats an outline coordinate.
///
/// Integral values have no fractional part, anything else uses the shortest
/// representation that round trips and negative zero is printed as `0`.
#[derive(Copy, Clone, Debug)]
pub struct Num(pub f64);

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0.0 {
            f.write_char('0')
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compact(rule: GlyphRule) -> String {
        let mut out = String::new();
        rule.write_compact(&mut out).unwrap();
        out
    }

    #[test]
    fn number_formatting() {
        assert_eq!(Num(12.0).to_string(), "12");
        assert_eq!(Num(-0.0).to_string(), "0");
        assert_eq!(Num(-2.25).to_string(), "-2.25");
        assert_eq!(Num(0.1).to_string(), "0.1");
        assert_eq!(Num(1.0 / 3.0).to_string(), "0.3333333333333333");
    }

    #[test]
    fn compact_forms() {
        assert_eq!(compact(GlyphRule::MoveTo { dx: 10.0, dy: -5.0 }), "m10 -5");
        assert_eq!(compact(GlyphRule::LineTo { dx: 0.5, dy: 0.0 }), "l0.5 0");
        assert_eq!(
            compact(GlyphRule::QuadTo {
                cdx: 0.0,
                cdy: 400.0,
                dx: 400.0,
                dy: 0.0
            }),
            "q0 400 400 400"
        );
        assert_eq!(
            compact(GlyphRule::CubicTo {
                c1dx: 10.0,
                c1dy: 20.0,
                c2dx: 30.0,
                c2dy: 40.0,
                dx: 50.0,
                dy: -60.0
            }),
            "c10 20 40 60 90 0"
        );
    }

    #[test]
    fn end_offsets() {
        let quad = GlyphRule::QuadTo {
            cdx: 0.0,
            cdy: 400.0,
            dx: 400.0,
            dy: -400.0,
        };
        assert_eq!(quad.end_offset(), (400.0, 0.0));
        assert!(quad.is_curve());
        assert!(!GlyphRule::LineTo { dx: 1.0, dy: 1.0 }.is_curve());
    }

    #[test]
    fn quad_to_cubic() {
        let quad = GlyphRule::QuadTo {
            cdx: 30.0,
            cdy: 60.0,
            dx: 60.0,
            dy: -60.0,
        };
        // c = (30, 60), e = (90, 0): c1 = (20, 40), c2 = (50, 40)
        assert_eq!(
            quad.to_cubic(),
            GlyphRule::CubicTo {
                c1dx: 20.0,
                c1dy: 40.0,
                c2dx: 30.0,
                c2dy: 0.0,
                dx: 40.0,
                dy: -40.0,
            }
        );
        assert_eq!(quad.to_cubic().end_offset(), quad.end_offset());
        let line = GlyphRule::LineTo { dx: 3.0, dy: 4.0 };
        assert_eq!(line.to_cubic(), line);
    }
}
