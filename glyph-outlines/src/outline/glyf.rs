//! Loading outlines from the `glyf` table.
//!
//! Simple glyphs are decoded to points and on-curve flags. Composite glyphs
//! are flattened by loading each component recursively, transforming its
//! points and appending them with contour end indices shifted past the
//! points already loaded. The merged points are then turned into segments,
//! with implied on-curve points inserted between consecutive off-curve
//! points.

use std::fmt;

use raw::{
    tables::{
        glyf::{Anchor, Glyf, Glyph, Transform},
        loca::Loca,
    },
    types::{GlyphId, Point},
    ReadError, TableProvider,
};

use super::{Outline, OutlineBuilder, OutlinePen};

/// Default limit on the nesting of composite glyphs.
pub const COMPOSITE_RECURSION_LIMIT: usize = 64;

/// Errors that occur when assembling a TrueType outline.
#[derive(Clone, Debug, PartialEq)]
pub enum GlyfError {
    /// Reading the glyph or its `loca` entry failed.
    Read { glyph_id: GlyphId, error: ReadError },
    /// Composite glyphs were nested too deeply, or referenced themselves.
    RecursionLimitExceeded { glyph_id: GlyphId, limit: usize },
    /// A composite component is placed by matching points.
    PointMatchingUnsupported(GlyphId),
    /// Contour end points were not in increasing order.
    ContourOrder(GlyphId),
}

impl fmt::Display for GlyfError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Read { glyph_id, error } => write!(f, "{error} (in glyph {glyph_id})"),
            Self::RecursionLimitExceeded { glyph_id, limit } => write!(
                f,
                "Recursion limit ({limit}) exceeded when loading composite component {glyph_id}"
            ),
            Self::PointMatchingUnsupported(glyph_id) => write!(
                f,
                "Composite glyph {glyph_id} places a component by point matching, which is not supported"
            ),
            Self::ContourOrder(glyph_id) => {
                write!(f, "Contour end points in glyph {glyph_id} are out of order")
            }
        }
    }
}

impl std::error::Error for GlyfError {}

fn read_error(glyph_id: GlyphId) -> impl Fn(ReadError) -> GlyfError {
    move |error| GlyfError::Read { glyph_id, error }
}

/// The points of a glyph with all components merged.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct GlyphPoints {
    pub points: Vec<Point<f64>>,
    pub on_curve: Vec<bool>,
    /// Index of the last point of each contour.
    pub contour_ends: Vec<usize>,
}

impl GlyphPoints {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterates over the contours as (points, on-curve flags) pairs.
    pub fn contours(&self) -> impl Iterator<Item = (&[Point<f64>], &[bool])> + '_ {
        let mut start = 0;
        self.contour_ends.iter().filter_map(move |&end| {
            let range = start..end + 1;
            start = end + 1;
            Some((self.points.get(range.clone())?, self.on_curve.get(range)?))
        })
    }

    /// Sends the contours to a pen.
    pub fn draw(&self, pen: &mut impl OutlinePen) {
        for (points, on_curve) in self.contours() {
            contour_to_path(points, on_curve, pen);
        }
    }
}

/// Outline loader for a font with `glyf` and `loca` tables.
#[derive(Clone)]
pub struct Outlines<'a> {
    loca: Loca<'a>,
    glyf: Glyf<'a>,
    depth_limit: usize,
}

impl<'a> Outlines<'a> {
    pub fn new(font: &impl TableProvider<'a>) -> Result<Self, ReadError> {
        Ok(Self {
            loca: font.loca(None)?,
            glyf: font.glyf()?,
            depth_limit: COMPOSITE_RECURSION_LIMIT,
        })
    }

    /// Sets the maximum nesting of composite glyphs.
    pub fn with_depth_limit(self, depth_limit: usize) -> Self {
        Self {
            depth_limit,
            ..self
        }
    }

    /// Number of glyphs described by `loca`.
    pub fn glyph_count(&self) -> usize {
        self.loca.len()
    }

    /// Returns the raw glyph record, or `None` for a glyph without an
    /// outline.
    pub fn glyph(&self, glyph_id: GlyphId) -> Result<Option<Glyph<'a>>, GlyfError> {
        self.loca
            .get_glyf(glyph_id, &self.glyf)
            .map_err(read_error(glyph_id))
    }

    /// Returns true if the glyph is a single contour whose header bounding
    /// box is smaller than `threshold` in both directions.
    pub fn is_tiny(&self, glyph_id: GlyphId, threshold: u16) -> Result<bool, GlyfError> {
        let Some(glyph) = self.glyph(glyph_id)? else {
            return Ok(false);
        };
        let width = glyph.x_max() as i32 - glyph.x_min() as i32;
        let height = glyph.y_max() as i32 - glyph.y_min() as i32;
        Ok(glyph.number_of_contours() == 1
            && width < threshold as i32
            && height < threshold as i32)
    }

    /// Loads the points of a glyph, flattening composites.
    pub fn points(&self, glyph_id: GlyphId) -> Result<GlyphPoints, GlyfError> {
        let mut points = GlyphPoints::default();
        self.load(glyph_id, 0, &mut points)?;
        Ok(points)
    }

    /// Loads the glyph as relative rules.
    pub fn outline(&self, glyph_id: GlyphId) -> Result<Outline, GlyfError> {
        let points = self.points(glyph_id)?;
        let mut builder = OutlineBuilder::new();
        points.draw(&mut builder);
        log::debug!(
            "loaded glyf outline for {glyph_id}: {} points in {} contours",
            points.points.len(),
            points.contour_ends.len()
        );
        Ok(builder.finish())
    }

    fn load(
        &self,
        glyph_id: GlyphId,
        depth: usize,
        out: &mut GlyphPoints,
    ) -> Result<(), GlyfError> {
        if depth > self.depth_limit {
            return Err(GlyfError::RecursionLimitExceeded {
                glyph_id,
                limit: self.depth_limit,
            });
        }
        match self.glyph(glyph_id)? {
            None => Ok(()),
            Some(Glyph::Simple(simple)) => {
                let base = out.points.len();
                let mut last_end = None;
                for end in simple.end_pts_of_contours() {
                    let end = end.get() as usize;
                    if last_end.is_some_and(|last| end <= last) {
                        return Err(GlyfError::ContourOrder(glyph_id));
                    }
                    last_end = Some(end);
                    out.contour_ends.push(base + end);
                }
                for point in simple.points().map_err(read_error(glyph_id))? {
                    out.points
                        .push(Point::new(point.x as f64, point.y as f64));
                    out.on_curve.push(point.on_curve);
                }
                Ok(())
            }
            Some(Glyph::Composite(composite)) => {
                for component in composite.components() {
                    let component = component.map_err(read_error(glyph_id))?;
                    let Anchor::Offset { x: dx, y: dy } = component.anchor else {
                        return Err(GlyfError::PointMatchingUnsupported(glyph_id));
                    };
                    let start = out.points.len();
                    self.load(component.glyph, depth + 1, out)?;
                    let transform = component.transform;
                    let have_xform = transform != Transform::default();
                    let (xx, yx, xy, yy) = (
                        transform.xx.to_f64(),
                        transform.yx.to_f64(),
                        transform.xy.to_f64(),
                        transform.yy.to_f64(),
                    );
                    for point in &mut out.points[start..] {
                        if have_xform {
                            *point = Point::new(
                                point.x * xx + point.y * xy,
                                point.x * yx + point.y * yy,
                            );
                        }
                        point.x += dx as f64;
                        point.y += dy as f64;
                    }
                }
                Ok(())
            }
        }
    }
}

/// Converts a single contour to path commands.
///
/// When the contour begins with an off-curve point, it starts at the last
/// point if that is on-curve and at the midpoint of the last and first
/// points otherwise. A contour that ends on an off-curve point closes with a
/// curve back to the start.
pub fn contour_to_path(points: &[Point<f64>], on_curve: &[bool], pen: &mut impl OutlinePen) {
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return;
    };
    let first_on = on_curve.first().copied().unwrap_or(true);
    let last_on = on_curve.last().copied().unwrap_or(true);
    let (start, rest) = if first_on {
        (first, 1..points.len())
    } else if last_on {
        (last, 0..points.len() - 1)
    } else {
        (last.midpoint(first), 0..points.len())
    };
    pen.move_to(start.x, start.y);
    let mut pending: Option<Point<f64>> = None;
    for (point, is_on) in points[rest.clone()].iter().zip(&on_curve[rest]) {
        match (is_on, pending) {
            (true, Some(control)) => {
                pen.quad_to(control.x, control.y, point.x, point.y);
                pending = None;
            }
            (true, None) => pen.line_to(point.x, point.y),
            (false, Some(control)) => {
                let mid = control.midpoint(*point);
                pen.quad_to(control.x, control.y, mid.x, mid.y);
                pending = Some(*point);
            }
            (false, None) => pending = Some(*point),
        }
    }
    if let Some(control) = pending {
        pen.quad_to(control.x, control.y, start.x, start.y);
    }
    pen.close();
}
