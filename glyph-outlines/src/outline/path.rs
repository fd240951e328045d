//! Conversions from relative rules to path data.

use std::fmt::Write;

use super::{
    pen::OutlinePen,
    rule::{GlyphRule, Num},
};

/// Builds the compact relative string for a sequence of rules.
pub fn to_compact_string(rules: &[GlyphRule]) -> String {
    let mut out = String::new();
    for rule in rules {
        // Writing to a String cannot fail
        let _ = rule.write_compact(&mut out);
    }
    out.replace(" -", "-")
}

/// Builds an absolute SVG path string, starting from the point (x, y).
///
/// Each command is followed by a single space.
pub fn to_absolute_svg(rules: &[GlyphRule], x: f64, y: f64) -> String {
    let mut out = String::new();
    let mut svg = AbsoluteSvg(&mut out);
    replay(rules, x, y, &mut svg);
    out
}

/// Replays rules as absolute coordinates to a pen.
///
/// Each contour is closed before the next one begins and after the last.
pub fn draw(rules: &[GlyphRule], pen: &mut impl OutlinePen) {
    replay(rules, 0.0, 0.0, &mut ClosingPen { pen, is_open: false });
}

fn replay(rules: &[GlyphRule], mut x: f64, mut y: f64, pen: &mut impl RulePen) {
    for rule in rules {
        match *rule {
            GlyphRule::MoveTo { dx, dy } => {
                x += dx;
                y += dy;
                pen.move_to(x, y);
            }
            GlyphRule::LineTo { dx, dy } => {
                x += dx;
                y += dy;
                pen.line_to(x, y);
            }
            GlyphRule::QuadTo { cdx, cdy, dx, dy } => {
                let (cx, cy) = (x + cdx, y + cdy);
                x = cx + dx;
                y = cy + dy;
                pen.quad_to(cx, cy, x, y);
            }
            GlyphRule::CubicTo {
                c1dx,
                c1dy,
                c2dx,
                c2dy,
                dx,
                dy,
            } => {
                let (c1x, c1y) = (x + c1dx, y + c1dy);
                let (c2x, c2y) = (c1x + c2dx, c1y + c2dy);
                x = c2x + dx;
                y = c2y + dy;
                pen.curve_to(c1x, c1y, c2x, c2y, x, y);
            }
        }
    }
    pen.finish();
}

/// Like [`OutlinePen`] but without close commands, which rules don't carry.
trait RulePen {
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn quad_to(&mut self, cx: f64, cy: f64, x: f64, y: f64);
    fn curve_to(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64);
    fn finish(&mut self) {}
}

struct AbsoluteSvg<'a>(&'a mut String);

impl RulePen for AbsoluteSvg<'_> {
    fn move_to(&mut self, x: f64, y: f64) {
        let _ = write!(self.0, "M {} {} ", Num(x), Num(y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let _ = write!(self.0, "L {} {} ", Num(x), Num(y));
    }

    fn quad_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) {
        let _ = write!(self.0, "Q {} {} {} {} ", Num(cx), Num(cy), Num(x), Num(y));
    }

    fn curve_to(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64) {
        let _ = write!(
            self.0,
            "C {} {} {} {} {} {} ",
            Num(c1x),
            Num(c1y),
            Num(c2x),
            Num(c2y),
            Num(x),
            Num(y)
        );
    }
}

struct ClosingPen<'a, P> {
    pen: &'a mut P,
    is_open: bool,
}

impl<P: OutlinePen> RulePen for ClosingPen<'_, P> {
    fn move_to(&mut self, x: f64, y: f64) {
        self.finish();
        self.pen.move_to(x, y);
        self.is_open = true;
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.pen.line_to(x, y);
    }

    fn quad_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) {
        self.pen.quad_to(cx, cy, x, y);
    }

    fn curve_to(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64) {
        self.pen.curve_to(c1x, c1y, c2x, c2y, x, y);
    }

    fn finish(&mut self) {
        if self.is_open {
            self.pen.close();
            self.is_open = false;
        }
    }
}
