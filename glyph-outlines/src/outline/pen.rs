//! Types for collecting the output when drawing a glyph outline.

use std::fmt::{self, Write};

use super::rule::Num;

/// Interface for accepting a sequence of path commands in absolute
/// coordinates.
pub trait OutlinePen {
    /// Emit a command to begin a new subpath at (x, y).
    fn move_to(&mut self, x: f64, y: f64);

    /// Emit a line segment from the current point to (x, y).
    fn line_to(&mut self, x: f64, y: f64);

    /// Emit a quadratic bezier segment from the current point with a control
    /// point at (cx0, cy0) and ending at (x, y).
    fn quad_to(&mut self, cx0: f64, cy0: f64, x: f64, y: f64);

    /// Emit a cubic bezier segment from the current point with control
    /// points at (cx0, cy0) and (cx1, cy1) and ending at (x, y).
    fn curve_to(&mut self, cx0: f64, cy0: f64, cx1: f64, cy1: f64, x: f64, y: f64);

    /// Emit a command to close the current subpath.
    fn close(&mut self);
}

/// Single element of a path.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug)]
pub enum PathElement {
    /// Begin a new subpath at (x, y).
    MoveTo { x: f64, y: f64 },
    /// Draw a line from the current point to (x, y).
    LineTo { x: f64, y: f64 },
    /// Draw a quadratic bezier from the current point with a control point at
    /// (cx0, cy0) and ending at (x, y).
    QuadTo { cx0: f64, cy0: f64, x: f64, y: f64 },
    /// Draw a cubic bezier from the current point with control points at
    /// (cx0, cy0) and (cx1, cy1) and ending at (x, y).
    CurveTo {
        cx0: f64,
        cy0: f64,
        cx1: f64,
        cy1: f64,
        x: f64,
        y: f64,
    },
    /// Close the current subpath.
    Close,
}

impl OutlinePen for Vec<PathElement> {
    fn move_to(&mut self, x: f64, y: f64) {
        self.push(PathElement::MoveTo { x, y })
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.push(PathElement::LineTo { x, y })
    }

    fn quad_to(&mut self, cx0: f64, cy0: f64, x: f64, y: f64) {
        self.push(PathElement::QuadTo { cx0, cy0, x, y })
    }

    fn curve_to(&mut self, cx0: f64, cy0: f64, cx1: f64, cy1: f64, x: f64, y: f64) {
        self.push(PathElement::CurveTo {
            cx0,
            cy0,
            cx1,
            cy1,
            x,
            y,
        })
    }

    fn close(&mut self) {
        self.push(PathElement::Close)
    }
}

/// Pen that drops all drawing output into the ether.
pub struct NullPen;

impl OutlinePen for NullPen {
    fn move_to(&mut self, _x: f64, _y: f64) {}
    fn line_to(&mut self, _x: f64, _y: f64) {}
    fn quad_to(&mut self, _cx0: f64, _cy0: f64, _x: f64, _y: f64) {}
    fn curve_to(&mut self, _cx0: f64, _cy0: f64, _cx1: f64, _cy1: f64, _x: f64, _y: f64) {}
    fn close(&mut self) {}
}

/// Pen that generates SVG style path data.
///
/// Commands are separated by a single space, coordinates within a point by
/// a comma.
#[derive(Clone, Default, Debug)]
pub struct SvgPen(String);

impl SvgPen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the content of the internal string.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    fn maybe_push_space(&mut self) {
        if !self.0.is_empty() {
            self.0.push(' ');
        }
    }
}

impl std::ops::Deref for SvgPen {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.as_str()
    }
}

impl OutlinePen for SvgPen {
    fn move_to(&mut self, x: f64, y: f64) {
        self.maybe_push_space();
        let _ = write!(self.0, "M{},{}", Num(x), Num(y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.maybe_push_space();
        let _ = write!(self.0, "L{},{}", Num(x), Num(y));
    }

    fn quad_to(&mut self, cx0: f64, cy0: f64, x: f64, y: f64) {
        self.maybe_push_space();
        let _ = write!(
            self.0,
            "Q{},{} {},{}",
            Num(cx0),
            Num(cy0),
            Num(x),
            Num(y)
        );
    }

    fn curve_to(&mut self, cx0: f64, cy0: f64, cx1: f64, cy1: f64, x: f64, y: f64) {
        self.maybe_push_space();
        let _ = write!(
            self.0,
            "C{},{} {},{} {},{}",
            Num(cx0),
            Num(cy0),
            Num(cx1),
            Num(cy1),
            Num(x),
            Num(y)
        );
    }

    fn close(&mut self) {
        self.maybe_push_space();
        self.0.push('Z');
    }
}

impl AsRef<str> for SvgPen {
    fn as_ref(&self) -> &str {
        self.0.as_ref()
    }
}

impl From<SvgPen> for String {
    fn from(value: SvgPen) -> Self {
        value.0
    }
}

impl fmt::Display for SvgPen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
