//! TrueType glyph encoders and a small TrueType font.

use crate::{
    cmap::{self, Segment4},
    sfnt::{self, FontBuilder, TRUETYPE_VERSION},
    BeBuffer,
};
use glyph_types::{F2Dot14, Tag};

pub const ON_CURVE: u8 = 0x01;
pub const X_SHORT: u8 = 0x02;
pub const Y_SHORT: u8 = 0x04;
pub const REPEAT: u8 = 0x08;
pub const X_SAME_OR_POSITIVE: u8 = 0x10;
pub const Y_SAME_OR_POSITIVE: u8 = 0x20;

/// A point in a simple glyph contour: `(x, y, on_curve)`.
pub type ContourPoint = (i16, i16, bool);

/// Encodes a simple glyph, using the short and repeat forms where possible.
pub fn simple_glyph(contours: &[&[ContourPoint]]) -> Vec<u8> {
    let points: Vec<ContourPoint> = contours.iter().flat_map(|c| c.iter().copied()).collect();
    let (x_min, y_min, x_max, y_max) = points.iter().fold(
        (i16::MAX, i16::MAX, i16::MIN, i16::MIN),
        |(x0, y0, x1, y1), (x, y, _)| (x0.min(*x), y0.min(*y), x1.max(*x), y1.max(*y)),
    );
    let mut buf = BeBuffer::new()
        .push(contours.len() as i16)
        .extend([x_min, y_min, x_max, y_max]);
    let mut end = 0u16;
    for contour in contours {
        end += contour.len() as u16;
        buf = buf.push(end - 1);
    }
    buf = buf.push(0u16); // instructionLength
    let mut flags = Vec::with_capacity(points.len());
    let mut x_bytes = BeBuffer::new();
    let mut y_bytes = BeBuffer::new();
    let (mut last_x, mut last_y) = (0i16, 0i16);
    for (x, y, on_curve) in &points {
        let mut flag = if *on_curve { ON_CURVE } else { 0 };
        let (dx, dy) = (x - last_x, y - last_y);
        (last_x, last_y) = (*x, *y);
        x_bytes = encode_delta(x_bytes, dx, X_SHORT, X_SAME_OR_POSITIVE, &mut flag);
        y_bytes = encode_delta(y_bytes, dy, Y_SHORT, Y_SAME_OR_POSITIVE, &mut flag);
        flags.push(flag);
    }
    let mut i = 0;
    while i < flags.len() {
        let flag = flags[i];
        let run = flags[i + 1..].iter().take_while(|f| **f == flag).count();
        if run > 0 {
            buf = buf.push(flag | REPEAT).push(run as u8);
        } else {
            buf = buf.push(flag);
        }
        i += run + 1;
    }
    let mut bytes = buf.into_vec();
    bytes.extend_from_slice(&x_bytes);
    bytes.extend_from_slice(&y_bytes);
    pad2(bytes)
}

fn encode_delta(buf: BeBuffer, delta: i16, short: u8, same_or_pos: u8, flag: &mut u8) -> BeBuffer {
    if delta == 0 {
        *flag |= same_or_pos;
        buf
    } else if delta.unsigned_abs() <= 255 {
        *flag |= short;
        if delta > 0 {
            *flag |= same_or_pos;
        }
        buf.push(delta.unsigned_abs() as u8)
    } else {
        buf.push(delta)
    }
}

fn pad2(mut bytes: Vec<u8>) -> Vec<u8> {
    if bytes.len() % 2 != 0 {
        bytes.push(0);
    }
    bytes
}

pub const ARG_1_AND_2_ARE_WORDS: u16 = 0x0001;
pub const ARGS_ARE_XY_VALUES: u16 = 0x0002;
pub const WE_HAVE_A_SCALE: u16 = 0x0008;
pub const MORE_COMPONENTS: u16 = 0x0020;
pub const WE_HAVE_AN_X_AND_Y_SCALE: u16 = 0x0040;
pub const WE_HAVE_A_TWO_BY_TWO: u16 = 0x0080;

/// How a component is transformed.
#[derive(Copy, Clone, Debug)]
pub enum ComponentScale {
    None,
    Uniform(f32),
    XY(f32, f32),
    TwoByTwo([f32; 4]),
}

/// A composite glyph component.
#[derive(Copy, Clone, Debug)]
pub struct ComponentDesc {
    pub glyph: u16,
    /// `(dx, dy)` offsets, or point numbers when `point_matching` is set.
    pub args: (i16, i16),
    pub point_matching: bool,
    pub scale: ComponentScale,
}

impl ComponentDesc {
    pub fn offset(glyph: u16, dx: i16, dy: i16) -> Self {
        Self {
            glyph,
            args: (dx, dy),
            point_matching: false,
            scale: ComponentScale::None,
        }
    }

    pub fn scaled(self, scale: ComponentScale) -> Self {
        Self { scale, ..self }
    }
}

/// Encodes a composite glyph with the given header bounding box.
pub fn composite_glyph(bbox: [i16; 4], components: &[ComponentDesc]) -> Vec<u8> {
    let mut buf = BeBuffer::new().push(-1i16).extend(bbox);
    for (i, component) in components.iter().enumerate() {
        let (a, b) = component.args;
        let words = i8::try_from(a).is_err() || i8::try_from(b).is_err();
        let mut flags = 0;
        if words {
            flags |= ARG_1_AND_2_ARE_WORDS;
        }
        if !component.point_matching {
            flags |= ARGS_ARE_XY_VALUES;
        }
        if i + 1 < components.len() {
            flags |= MORE_COMPONENTS;
        }
        flags |= match component.scale {
            ComponentScale::None => 0,
            ComponentScale::Uniform(_) => WE_HAVE_A_SCALE,
            ComponentScale::XY(..) => WE_HAVE_AN_X_AND_Y_SCALE,
            ComponentScale::TwoByTwo(_) => WE_HAVE_A_TWO_BY_TWO,
        };
        buf = buf.push(flags).push(component.glyph);
        buf = if words {
            buf.push(a).push(b)
        } else {
            buf.push(a as i8).push(b as i8)
        };
        let scales = match component.scale {
            ComponentScale::None => vec![],
            ComponentScale::Uniform(s) => vec![s],
            ComponentScale::XY(x, y) => vec![x, y],
            ComponentScale::TwoByTwo(m) => m.to_vec(),
        };
        buf = buf.extend(scales.iter().map(|s| f2dot14(*s)));
    }
    pad2(buf.into_vec())
}

fn f2dot14(value: f32) -> F2Dot14 {
    F2Dot14::from_bits((value * 16384.0).round() as i16)
}

/// Builds `glyf` and `loca` tables from encoded glyphs.
pub fn glyf_and_loca(glyphs: &[Vec<u8>], long_loca: bool) -> (Vec<u8>, Vec<u8>) {
    let mut glyf = vec![];
    let mut loca = BeBuffer::new();
    let push_offset = |loca: BeBuffer, offset: usize| {
        if long_loca {
            loca.push(offset as u32)
        } else {
            loca.push((offset / 2) as u16)
        }
    };
    for glyph in glyphs {
        loca = push_offset(loca, glyf.len());
        glyf.extend_from_slice(glyph);
    }
    loca = push_offset(loca, glyf.len());
    (glyf, loca.into_vec())
}

/// Glyph ids in [`simple_font`].
pub mod gids {
    pub const NOTDEF: u16 = 0;
    pub const SQUARE: u16 = 1;
    pub const ARCH: u16 = 2;
    pub const COMPOSITE: u16 = 3;
    pub const DOT: u16 = 4;
    pub const SPACE: u16 = 5;
    pub const POINT_MATCHED: u16 = 6;
    pub const SELF_REFERENCE: u16 = 7;
}

/// Units per em of [`simple_font`].
pub const UNITS_PER_EM: u16 = 1000;

pub const SQUARE_POINTS: &[ContourPoint] = &[
    (100, 0, true),
    (600, 0, true),
    (600, 700, true),
    (100, 700, true),
];

pub const ARCH_POINTS: &[ContourPoint] = &[
    (0, 0, true),
    (0, 400, false),
    (400, 400, false),
    (400, 0, true),
];

/// A TrueType font with the following character map:
///
/// | char | gid | glyph |
/// |------|-----|-------|
/// | `' '` | 5 | empty |
/// | `'.'` | 4 | 50 unit square (filtered as tiny) |
/// | `'A'` | 1 | square, 100..600 x 0..700 |
/// | `'B'` | 2 | quadratic arch |
/// | `'C'` | 3 | composite of 1 and 2, the latter scaled by 0.5 at (700, 0) |
/// | `'E'` | 6 | composite using point matching |
/// | `'F'` | 7 | composite referencing itself |
/// | `'a'` | 1 | mapped through the glyph id array |
/// | `'b'` | - | glyph id array entry of zero |
/// | `'c'` | 2 | mapped through the glyph id array |
/// | U+1F600 | 2 | format 12 only |
pub fn simple_font(long_loca: bool) -> Vec<u8> {
    use gids::*;
    let glyphs = vec![
        vec![],
        simple_glyph(&[SQUARE_POINTS]),
        simple_glyph(&[ARCH_POINTS]),
        composite_glyph(
            [100, 0, 900, 700],
            &[
                ComponentDesc::offset(SQUARE, 0, 0),
                ComponentDesc::offset(ARCH, 700, 0).scaled(ComponentScale::Uniform(0.5)),
            ],
        ),
        simple_glyph(&[&[(0, 0, true), (50, 0, true), (50, 50, true), (0, 50, true)]]),
        vec![],
        composite_glyph(
            [0, 0, 400, 400],
            &[
                ComponentDesc::offset(ARCH, 0, 0),
                ComponentDesc {
                    point_matching: true,
                    ..ComponentDesc::offset(SQUARE, 3, 0)
                },
            ],
        ),
        composite_glyph([0, 0, 0, 0], &[ComponentDesc::offset(SELF_REFERENCE, 0, 0)]),
    ];
    let (glyf, loca) = glyf_and_loca(&glyphs, long_loca);
    let cmap4 = cmap::format4(&[
        Segment4::delta(0x20, 0x20, SPACE as i16 - 0x20),
        Segment4::delta(0x2E, 0x2E, DOT as i16 - 0x2E),
        Segment4::delta(0x41, 0x43, -0x40),
        Segment4::delta(0x45, 0x46, POINT_MATCHED as i16 - 0x45),
        Segment4::mapped(0x61, 0x63, vec![SQUARE, 0, ARCH]),
    ]);
    let cmap12 = cmap::format12(&[(0x20, 0x20, 5), (0x41, 0x43, 1), (0x1F600, 0x1F600, 2)]);
    let mut builder = FontBuilder::new(TRUETYPE_VERSION);
    builder
        .add_table(Tag::new(b"head"), sfnt::head(UNITS_PER_EM, long_loca))
        .add_table(Tag::new(b"hhea"), sfnt::hhea(4))
        .add_table(Tag::new(b"maxp"), sfnt::maxp(glyphs.len() as u16, true))
        // gid 7 has no trailing bearing and falls back to the last long metric
        .add_table(
            Tag::new(b"hmtx"),
            sfnt::hmtx(&[(500, 0), (700, 100), (500, 0), (1200, 100)], &[0, 0, 0]),
        )
        .add_table(
            Tag::new(b"cmap"),
            cmap::cmap(&[(3, 1, cmap4), (3, 10, cmap12)]),
        )
        .add_table(Tag::new(b"loca"), loca)
        .add_table(Tag::new(b"glyf"), glyf);
    builder.build()
}
