//! The unified outline model.
//!
//! Both TrueType and CFF glyphs decode to an [`Outline`]: a list of
//! [`GlyphRule`]s, each relative to the pen position left by the one before
//! it. Applying every rule in order from (0, 0) visits each point of the
//! glyph.
//!
//! Absolute path commands are converted to rules by [`OutlineBuilder`],
//! which implements [`OutlinePen`], and an outline can be replayed to any
//! pen with [`Outline::draw`].

pub mod cff;
pub mod glyf;

mod bounds;
mod path;
mod pen;
mod rule;

pub use bounds::{compute_bounds, CURVE_SAMPLES};
pub use path::{to_absolute_svg, to_compact_string};
pub use pen::{NullPen, OutlinePen, PathElement, SvgPen};
pub use rule::{GlyphRule, Num};

use raw::types::BoundingBox;

/// A glyph outline as a sequence of relative rules.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct Outline {
    rules: Vec<GlyphRule>,
}

impl Outline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rules(rules: Vec<GlyphRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[GlyphRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn push(&mut self, rule: GlyphRule) {
        self.rules.push(rule);
    }

    /// Appends the rules of another outline.
    ///
    /// The other outline continues from wherever this one left the pen.
    pub fn extend(&mut self, other: &Outline) {
        self.rules.extend_from_slice(&other.rules);
    }

    /// Sampled bounding box with integer extents.
    pub fn bounds(&self) -> BoundingBox<i32> {
        compute_bounds(&self.rules)
    }

    /// Relative path string: `m`, `l`, `q` and `c` commands with negative
    /// numbers joined to the preceding value.
    pub fn to_compact_string(&self) -> String {
        to_compact_string(&self.rules)
    }

    /// Absolute SVG path data starting at (x, y).
    pub fn to_absolute_svg(&self, x: f64, y: f64) -> String {
        to_absolute_svg(&self.rules, x, y)
    }

    /// Returns a copy with every quadratic curve raised to a cubic.
    pub fn to_cubics(&self) -> Self {
        Self::from_rules(self.rules.iter().map(GlyphRule::to_cubic).collect())
    }

    /// Sends the outline to a pen in absolute coordinates.
    pub fn draw(&self, pen: &mut impl OutlinePen) {
        path::draw(&self.rules, pen)
    }
}

/// Pen that converts absolute path commands into relative rules.
///
/// Close commands are dropped: a contour ends where the next move begins.
#[derive(Clone, Default, Debug)]
pub struct OutlineBuilder {
    outline: Outline,
    x: f64,
    y: f64,
}

impl OutlineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The absolute position of the pen.
    pub fn current_point(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn finish(self) -> Outline {
        self.outline
    }

    fn delta_to(&mut self, x: f64, y: f64) -> (f64, f64) {
        let delta = (x - self.x, y - self.y);
        self.x = x;
        self.y = y;
        delta
    }
}

impl OutlinePen for OutlineBuilder {
    fn move_to(&mut self, x: f64, y: f64) {
        let (dx, dy) = self.delta_to(x, y);
        self.outline.push(GlyphRule::MoveTo { dx, dy });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let (dx, dy) = self.delta_to(x, y);
        self.outline.push(GlyphRule::LineTo { dx, dy });
    }

    fn quad_to(&mut self, cx0: f64, cy0: f64, x: f64, y: f64) {
        let (cdx, cdy) = self.delta_to(cx0, cy0);
        let (dx, dy) = self.delta_to(x, y);
        self.outline.push(GlyphRule::QuadTo { cdx, cdy, dx, dy });
    }

    fn curve_to(&mut self, cx0: f64, cy0: f64, cx1: f64, cy1: f64, x: f64, y: f64) {
        let (c1dx, c1dy) = self.delta_to(cx0, cy0);
        let (c2dx, c2dy) = self.delta_to(cx1, cy1);
        let (dx, dy) = self.delta_to(x, y);
        self.outline.push(GlyphRule::CubicTo {
            c1dx,
            c1dy,
            c2dx,
            c2dy,
            dx,
            dy,
        });
    }

    fn close(&mut self) {}
}
