//! Bounding box computation for relative outlines.

use raw::types::BoundingBox;

use super::rule::GlyphRule;

/// Number of samples taken along each curve.
pub const CURVE_SAMPLES: u32 = 40;

/// Computes the bounding box of a sequence of rules starting at (0, 0).
///
/// Curves are sampled at `t = k / 40` for `k` in `1..=40` and the exact end
/// point is always included, so the result may slightly underestimate the
/// extent of a curve but never misses an on-curve point. Minimums are
/// rounded down and maximums up. An empty sequence yields a zero box.
pub fn compute_bounds(rules: &[GlyphRule]) -> BoundingBox<i32> {
    let mut acc = Accumulator::default();
    let (mut x, mut y) = (0.0, 0.0);
    for rule in rules {
        match *rule {
            GlyphRule::MoveTo { .. } | GlyphRule::LineTo { .. } => {}
            GlyphRule::QuadTo { cdx, cdy, .. } => {
                let (ex, ey) = rule.end_offset();
                for t in sample_params() {
                    let mt = 1.0 - t;
                    acc.add(
                        x + 2.0 * mt * t * cdx + t * t * ex,
                        y + 2.0 * mt * t * cdy + t * t * ey,
                    );
                }
            }
            GlyphRule::CubicTo {
                c1dx,
                c1dy,
                c2dx,
                c2dy,
                ..
            } => {
                let (c2x, c2y) = (c1dx + c2dx, c1dy + c2dy);
                let (ex, ey) = rule.end_offset();
                for t in sample_params() {
                    let mt = 1.0 - t;
                    let (a, b, c) = (3.0 * mt * mt * t, 3.0 * mt * t * t, t * t * t);
                    acc.add(
                        x + a * c1dx + b * c2x + c * ex,
                        y + a * c1dy + b * c2y + c * ey,
                    );
                }
            }
        }
        let (dx, dy) = rule.end_offset();
        x += dx;
        y += dy;
        acc.add(x, y);
    }
    acc.finish()
}

fn sample_params() -> impl Iterator<Item = f64> {
    (1..=CURVE_SAMPLES).map(|k| k as f64 / CURVE_SAMPLES as f64)
}

#[derive(Default)]
struct Accumulator {
    bounds: Option<[f64; 4]>,
}

impl Accumulator {
    fn add(&mut self, x: f64, y: f64) {
        let bounds = self.bounds.get_or_insert([x, y, x, y]);
        bounds[0] = bounds[0].min(x);
        bounds[1] = bounds[1].min(y);
        bounds[2] = bounds[2].max(x);
        bounds[3] = bounds[3].max(y);
    }

    fn finish(self) -> BoundingBox<i32> {
        match self.bounds {
            Some([x_min, y_min, x_max, y_max]) => BoundingBox {
                x_min: x_min.floor() as i32,
                y_min: y_min.floor() as i32,
                x_max: x_max.ceil() as i32,
                y_max: y_max.ceil() as i32,
            },
            None => BoundingBox::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::ParamCurveExtrema;

    fn bbox(x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> BoundingBox<i32> {
        BoundingBox {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    #[test]
    fn empty_outline_has_zero_box() {
        assert_eq!(compute_bounds(&[]), BoundingBox::default());
    }

    #[test]
    fn lines() {
        let rules = [
            GlyphRule::MoveTo { dx: 100.0, dy: 0.0 },
            GlyphRule::LineTo { dx: 500.0, dy: 0.0 },
            GlyphRule::LineTo { dx: 0.0, dy: 700.0 },
            GlyphRule::LineTo {
                dx: -500.0,
                dy: 0.0,
            },
        ];
        assert_eq!(compute_bounds(&rules), bbox(100, 0, 600, 700));
    }

    #[test]
    fn fractional_extents_round_outward() {
        let rules = [
            GlyphRule::MoveTo { dx: -0.5, dy: 0.25 },
            GlyphRule::LineTo { dx: 10.0, dy: 10.0 },
        ];
        assert_eq!(compute_bounds(&rules), bbox(-1, 0, 10, 11));
    }

    #[test]
    fn bulging_cubic_exceeds_end_points() {
        let rules = [
            GlyphRule::MoveTo { dx: 0.0, dy: 0.0 },
            GlyphRule::CubicTo {
                c1dx: 0.0,
                c1dy: 400.0,
                c2dx: 400.0,
                c2dy: 0.0,
                dx: 0.0,
                dy: -400.0,
            },
        ];
        let bounds = compute_bounds(&rules);
        // End points alone only give a flat box
        assert_eq!((bounds.x_min, bounds.x_max), (0, 400));
        assert_eq!(bounds.y_min, 0);
        assert_eq!(bounds.y_max, 300);
        let exact = kurbo::CubicBez::new((0.0, 0.0), (0.0, 400.0), (400.0, 400.0), (400.0, 0.0))
            .bounding_box();
        assert!((bounds.y_max as f64 - exact.y1).abs() < 1.0);
    }

    #[test]
    fn quad_bounds_match_exact_extrema() {
        let rules = [
            GlyphRule::MoveTo { dx: 10.0, dy: 20.0 },
            GlyphRule::QuadTo {
                cdx: 100.0,
                cdy: 300.0,
                dx: 100.0,
                dy: -300.0,
            },
        ];
        let bounds = compute_bounds(&rules);
        let exact =
            kurbo::QuadBez::new((10.0, 20.0), (110.0, 320.0), (210.0, 20.0)).bounding_box();
        assert_eq!(bounds.x_min as f64, exact.x0);
        assert_eq!(bounds.x_max as f64, exact.x1);
        assert_eq!(bounds.y_min as f64, exact.y0);
        // The apex is sampled exactly at t = 0.5
        assert_eq!(bounds.y_max as f64, exact.y1);
    }
}
