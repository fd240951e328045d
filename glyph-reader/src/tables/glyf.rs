//! The [glyf (Glyph Data)](https://docs.microsoft.com/en-us/typography/opentype/spec/glyf) table

use types::{BigEndian, F2Dot14, GlyphId, Point, Tag};

use crate::{Cursor, FontData, FontRead, ReadError};

/// 'glyf'
pub const TAG: Tag = Tag::new(b"glyf");

/// The [glyf (Glyph Data)](https://docs.microsoft.com/en-us/typography/opentype/spec/glyf) table
///
/// The table itself is just a blob; individual glyphs are located with
/// [`Loca`](super::loca::Loca).
#[derive(Copy, Clone)]
pub struct Glyf<'a> {
    data: FontData<'a>,
}

impl<'a> Glyf<'a> {
    pub fn offset_data(&self) -> FontData<'a> {
        self.data
    }
}

impl<'a> FontRead<'a> for Glyf<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        Ok(Self { data })
    }
}

macro_rules! flags_type {
    ($(#[$attr:meta])* $name:ident, $raw:ty) => {
        $(#[$attr])*
        #[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $name($raw);

        impl $name {
            /// Returns an empty set of flags.
            pub const fn empty() -> Self {
                Self(0)
            }

            /// Create flags from raw bits, discarding any unknown ones.
            pub const fn from_bits_truncate(bits: $raw) -> Self {
                Self(bits & Self::all_bits())
            }

            /// The raw value of the flags.
            pub const fn bits(self) -> $raw {
                self.0
            }

            /// Returns `true` if all flags in `other` are also set in `self`.
            pub const fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }
        }

        impl std::ops::BitOr for $name {
            type Output = Self;
            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({:#x})", stringify!($name), self.0)
            }
        }

        impl types::Scalar for $name {
            type Raw = <$raw as types::Scalar>::Raw;
            fn to_raw(self) -> Self::Raw {
                types::Scalar::to_raw(self.0)
            }
            fn from_raw(raw: Self::Raw) -> Self {
                Self::from_bits_truncate(<$raw as types::Scalar>::from_raw(raw))
            }
        }

        impl types::FixedSize for $name {
            const RAW_BYTE_LEN: usize = <$raw as types::FixedSize>::RAW_BYTE_LEN;
        }
    };
}

flags_type!(
    /// Flags used in [SimpleGlyph]
    SimpleGlyphFlags,
    u8
);

impl SimpleGlyphFlags {
    /// Bit 0: If set, the point is on the curve; otherwise, it is off the curve.
    pub const ON_CURVE_POINT: Self = Self(0x01);
    /// Bit 1: If set, the corresponding x-coordinate is 1 byte long.
    pub const X_SHORT_VECTOR: Self = Self(0x02);
    /// Bit 2: If set, the corresponding y-coordinate is 1 byte long.
    pub const Y_SHORT_VECTOR: Self = Self(0x04);
    /// Bit 3: If set, the next byte specifies the number of additional
    /// times this flag byte is to be repeated.
    pub const REPEAT_FLAG: Self = Self(0x08);
    /// Bit 4: sign of a short x delta, or "same as previous" for a long one.
    pub const X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR: Self = Self(0x10);
    /// Bit 5: sign of a short y delta, or "same as previous" for a long one.
    pub const Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR: Self = Self(0x20);
    /// Bit 6: contours may overlap.
    pub const OVERLAP_SIMPLE: Self = Self(0x40);

    const fn all_bits() -> u8 {
        0x7F
    }
}

flags_type!(
    /// Flags used in [CompositeGlyph]
    CompositeGlyphFlags,
    u16
);

impl CompositeGlyphFlags {
    /// Bit 0: If this is set, the arguments are 16-bit; otherwise, they are bytes.
    pub const ARG_1_AND_2_ARE_WORDS: Self = Self(0x0001);
    /// Bit 1: If this is set, the arguments are signed xy values; otherwise,
    /// they are unsigned point numbers.
    pub const ARGS_ARE_XY_VALUES: Self = Self(0x0002);
    /// Bit 2: round the xy values to the grid.
    pub const ROUND_XY_TO_GRID: Self = Self(0x0004);
    /// Bit 3: This indicates that there is a simple scale for the component.
    pub const WE_HAVE_A_SCALE: Self = Self(0x0008);
    /// Bit 5: Indicates at least one more glyph after this one.
    pub const MORE_COMPONENTS: Self = Self(0x0020);
    /// Bit 6: The x direction will use a different scale from the y direction.
    pub const WE_HAVE_AN_X_AND_Y_SCALE: Self = Self(0x0040);
    /// Bit 7: There is a 2 by 2 transformation.
    pub const WE_HAVE_A_TWO_BY_TWO: Self = Self(0x0080);
    /// Bit 8: Following the last component are instructions for the composite character.
    pub const WE_HAVE_INSTRUCTIONS: Self = Self(0x0100);
    /// Bit 9: use this component's metrics for the composite glyph.
    pub const USE_MY_METRICS: Self = Self(0x0200);
    /// Bit 10: the components of the compound glyph overlap.
    pub const OVERLAP_COMPOUND: Self = Self(0x0400);
    /// Bit 11: the composite is designed to have the component offset scaled.
    pub const SCALED_COMPONENT_OFFSET: Self = Self(0x0800);
    /// Bit 12: the composite is designed not to have the component offset scaled.
    pub const UNSCALED_COMPONENT_OFFSET: Self = Self(0x1000);

    const fn all_bits() -> u16 {
        0x1FFF
    }
}

/// A glyph in the `glyf` table, either simple or composite.
#[derive(Clone, Copy)]
pub enum Glyph<'a> {
    Simple(SimpleGlyph<'a>),
    Composite(CompositeGlyph<'a>),
}

macro_rules! header_getter {
    ($field:ident, $offset:expr) => {
        pub fn $field(&self) -> i16 {
            self.header_data().read_at($offset).unwrap_or_default()
        }
    };
}

impl<'a> Glyph<'a> {
    const HEADER_LEN: usize = 10;

    fn header_data(&self) -> FontData<'a> {
        match self {
            Self::Simple(glyph) => glyph.data,
            Self::Composite(glyph) => glyph.data,
        }
    }

    header_getter!(number_of_contours, 0);
    header_getter!(x_min, 2);
    header_getter!(y_min, 4);
    header_getter!(x_max, 6);
    header_getter!(y_max, 8);
}

impl<'a> FontRead<'a> for Glyph<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let number_of_contours: i16 = data.read_at(0)?;
        if data.len() < Self::HEADER_LEN {
            return Err(ReadError::OutOfBounds { offset: data.len() });
        }
        if number_of_contours >= 0 {
            SimpleGlyph::read(data).map(Self::Simple)
        } else {
            Ok(Self::Composite(CompositeGlyph { data }))
        }
    }
}

/// A glyph made of contours of points.
#[derive(Clone, Copy)]
pub struct SimpleGlyph<'a> {
    data: FontData<'a>,
    end_pts_of_contours: &'a [BigEndian<u16>],
    instructions: &'a [u8],
    glyph_data: &'a [u8],
}

impl<'a> SimpleGlyph<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let number_of_contours: i16 = cursor.read()?;
        cursor.advance_by(8);
        let end_pts_of_contours = cursor.read_array(number_of_contours as usize)?;
        let instruction_length: u16 = cursor.read()?;
        let instructions = cursor.read_array(instruction_length as usize)?;
        let glyph_data = cursor.remaining().map(|d| d.as_bytes()).unwrap_or_default();
        Ok(Self {
            data,
            end_pts_of_contours,
            instructions,
            glyph_data,
        })
    }

    pub fn number_of_contours(&self) -> i16 {
        self.end_pts_of_contours.len() as i16
    }

    /// The index of the last point in each contour.
    pub fn end_pts_of_contours(&self) -> &'a [BigEndian<u16>] {
        self.end_pts_of_contours
    }

    /// TrueType hinting instructions. These are never executed.
    pub fn instructions(&self) -> &'a [u8] {
        self.instructions
    }

    /// Returns the total number of points.
    pub fn num_points(&self) -> usize {
        self.end_pts_of_contours
            .last()
            .map(|last| last.get() as usize + 1)
            .unwrap_or(0)
    }

    /// Reads points and flags into the provided buffers.
    ///
    /// Drops all flag bits except on-curve. The lengths of the buffers must be
    /// equal to the value returned by [num_points](Self::num_points).
    pub fn read_points_fast(
        &self,
        points: &mut [Point<i32>],
        flags: &mut [u8],
    ) -> Result<(), ReadError> {
        let n_points = self.num_points();
        if points.len() != n_points || flags.len() != n_points {
            return Err(ReadError::InvalidArrayLen);
        }
        let mut cursor = FontData::new(self.glyph_data).cursor();
        let mut i = 0;
        while i < n_points {
            let flag = cursor.read::<SimpleGlyphFlags>()?;
            if flag.contains(SimpleGlyphFlags::REPEAT_FLAG) {
                let count = cursor.read::<u8>()? as usize + 1;
                if count > n_points - i {
                    return Err(ReadError::MalformedData("repeat count too large in glyf"));
                }
                flags[i..i + count].fill(flag.bits());
                i += count;
            } else {
                flags[i] = flag.bits();
                i += 1;
            }
        }
        let mut x = 0i32;
        for (&bits, point) in flags.iter().zip(points.iter_mut()) {
            let flag = SimpleGlyphFlags::from_bits_truncate(bits);
            x = x.wrapping_add(read_delta(
                &mut cursor,
                flag,
                SimpleGlyphFlags::X_SHORT_VECTOR,
                SimpleGlyphFlags::X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR,
            )?);
            point.x = x;
        }
        let mut y = 0i32;
        for (bits, point) in flags.iter_mut().zip(points.iter_mut()) {
            let flag = SimpleGlyphFlags::from_bits_truncate(*bits);
            y = y.wrapping_add(read_delta(
                &mut cursor,
                flag,
                SimpleGlyphFlags::Y_SHORT_VECTOR,
                SimpleGlyphFlags::Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR,
            )?);
            point.y = y;
            // Only keep the on-curve bit
            *bits &= SimpleGlyphFlags::ON_CURVE_POINT.bits();
        }
        Ok(())
    }

    /// Decodes all points in the glyph.
    pub fn points(&self) -> Result<Vec<CurvePoint>, ReadError> {
        let n_points = self.num_points();
        let mut points = vec![Point::default(); n_points];
        let mut flags = vec![0u8; n_points];
        self.read_points_fast(&mut points, &mut flags)?;
        Ok(points
            .iter()
            .zip(&flags)
            .map(|(point, flag)| CurvePoint::new(point.x, point.y, *flag != 0))
            .collect())
    }
}

fn read_delta(
    cursor: &mut Cursor,
    flag: SimpleGlyphFlags,
    short: SimpleGlyphFlags,
    same_or_positive: SimpleGlyphFlags,
) -> Result<i32, ReadError> {
    Ok(if flag.contains(short) {
        let delta = cursor.read::<u8>()? as i32;
        if flag.contains(same_or_positive) {
            delta
        } else {
            -delta
        }
    } else if flag.contains(same_or_positive) {
        0
    } else {
        cursor.read::<i16>()? as i32
    })
}

/// Point with an associated on-curve flag in a simple glyph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurvePoint {
    /// X coordinate.
    pub x: i32,
    /// Y coordinate.
    pub y: i32,
    /// True if this is an on-curve point.
    pub on_curve: bool,
}

impl CurvePoint {
    /// Construct a new `CurvePoint`
    pub fn new(x: i32, y: i32, on_curve: bool) -> Self {
        Self { x, y, on_curve }
    }

    /// Convenience method to construct an on-curve point
    pub fn on_curve(x: i32, y: i32) -> Self {
        Self::new(x, y, true)
    }

    /// Convenience method to construct an off-curve point
    pub fn off_curve(x: i32, y: i32) -> Self {
        Self::new(x, y, false)
    }
}

/// A glyph built from transformed references to other glyphs.
#[derive(Clone, Copy)]
pub struct CompositeGlyph<'a> {
    data: FontData<'a>,
}

/// Transform for a composite component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transform {
    /// X scale factor.
    pub xx: F2Dot14,
    /// YX skew factor.
    pub yx: F2Dot14,
    /// XY skew factor.
    pub xy: F2Dot14,
    /// Y scale factor.
    pub yy: F2Dot14,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            xx: F2Dot14::ONE,
            yx: F2Dot14::ZERO,
            xy: F2Dot14::ZERO,
            yy: F2Dot14::ONE,
        }
    }
}

/// A reference to another glyph. Part of [CompositeGlyph].
#[derive(Clone, Debug)]
pub struct Component {
    /// Component flags.
    pub flags: CompositeGlyphFlags,
    /// Glyph identifier.
    pub glyph: GlyphId,
    /// Anchor for component placement.
    pub anchor: Anchor,
    /// Component transformation matrix.
    pub transform: Transform,
}

/// Anchor position for a composite component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Offset { x: i16, y: i16 },
    Point { base: u16, component: u16 },
}

impl<'a> CompositeGlyph<'a> {
    pub fn number_of_contours(&self) -> i16 {
        -1
    }

    /// Returns an iterator over the components of the composite glyph.
    ///
    /// Truncated component data yields a single error, after which the
    /// iterator is exhausted.
    pub fn components(&self) -> impl Iterator<Item = Result<Component, ReadError>> + 'a + Clone {
        ComponentIter::new(self.data)
    }

    /// Returns the TrueType interpreter instructions that follow the
    /// components, if any.
    pub fn instructions(&self) -> Option<&'a [u8]> {
        ComponentIter::new(self.data).instructions()
    }
}

#[derive(Clone)]
struct ComponentIter<'a> {
    cur_flags: CompositeGlyphFlags,
    done: bool,
    cursor: Cursor<'a>,
}

impl<'a> ComponentIter<'a> {
    fn new(data: FontData<'a>) -> Self {
        let mut cursor = data.cursor();
        cursor.advance_by(Glyph::HEADER_LEN);
        Self {
            cur_flags: CompositeGlyphFlags::empty(),
            done: false,
            cursor,
        }
    }

    fn instructions(&mut self) -> Option<&'a [u8]> {
        for component in self.by_ref() {
            component.ok()?;
        }
        if self
            .cur_flags
            .contains(CompositeGlyphFlags::WE_HAVE_INSTRUCTIONS)
        {
            let len = self.cursor.read::<u16>().ok()? as usize;
            self.cursor.read_array(len).ok()
        } else {
            None
        }
    }

    fn read_component(&mut self) -> Result<Component, ReadError> {
        let flags: CompositeGlyphFlags = self.cursor.read()?;
        self.cur_flags = flags;
        let glyph = self.cursor.read::<GlyphId>()?;
        let args_are_words = flags.contains(CompositeGlyphFlags::ARG_1_AND_2_ARE_WORDS);
        let args_are_xy_values = flags.contains(CompositeGlyphFlags::ARGS_ARE_XY_VALUES);
        let anchor = match (args_are_xy_values, args_are_words) {
            (true, true) => Anchor::Offset {
                x: self.cursor.read()?,
                y: self.cursor.read()?,
            },
            (true, false) => Anchor::Offset {
                x: self.cursor.read::<i8>()? as _,
                y: self.cursor.read::<i8>()? as _,
            },
            (false, true) => Anchor::Point {
                base: self.cursor.read()?,
                component: self.cursor.read()?,
            },
            (false, false) => Anchor::Point {
                base: self.cursor.read::<u8>()? as _,
                component: self.cursor.read::<u8>()? as _,
            },
        };
        let mut transform = Transform::default();
        if flags.contains(CompositeGlyphFlags::WE_HAVE_A_SCALE) {
            transform.xx = self.cursor.read()?;
            transform.yy = transform.xx;
        } else if flags.contains(CompositeGlyphFlags::WE_HAVE_AN_X_AND_Y_SCALE) {
            transform.xx = self.cursor.read()?;
            transform.yy = self.cursor.read()?;
        } else if flags.contains(CompositeGlyphFlags::WE_HAVE_A_TWO_BY_TWO) {
            transform.xx = self.cursor.read()?;
            transform.yx = self.cursor.read()?;
            transform.xy = self.cursor.read()?;
            transform.yy = self.cursor.read()?;
        }
        Ok(Component {
            flags,
            glyph,
            anchor,
            transform,
        })
    }
}

impl Iterator for ComponentIter<'_> {
    type Item = Result<Component, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let component = self.read_component();
        self.done = component.is_err()
            || !self
                .cur_flags
                .contains(CompositeGlyphFlags::MORE_COMPONENTS);
        Some(component)
    }
}
