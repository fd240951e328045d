//! Encoders for CFF structures and two small CFF fonts.

use crate::{
    cmap::{self, Segment4},
    sfnt::{self, FontBuilder, CFF_VERSION},
    BeBuffer,
};
use glyph_types::Tag;

/// Builds an INDEX using the smallest offset size that fits.
pub fn index(objects: &[Vec<u8>]) -> Vec<u8> {
    index_with_off_size(objects, None)
}

/// Builds an INDEX, optionally forcing the offset size.
pub fn index_with_off_size(objects: &[Vec<u8>], off_size: Option<u8>) -> Vec<u8> {
    let mut buf = BeBuffer::new().push(objects.len() as u16);
    if objects.is_empty() {
        return buf.into_vec();
    }
    let last_offset = 1 + objects.iter().map(Vec::len).sum::<usize>();
    let off_size = off_size.unwrap_or(match last_offset {
        0..=0xFF => 1,
        0x100..=0xFFFF => 2,
        0x10000..=0xFFFFFF => 3,
        _ => 4,
    });
    buf = buf.push(off_size);
    let mut offset = 1usize;
    for len in std::iter::once(0).chain(objects.iter().map(Vec::len)) {
        offset += len;
        let bytes = (offset as u32).to_be_bytes();
        buf = buf.extend_bytes(&bytes[4 - off_size as usize..]);
    }
    for object in objects {
        buf = buf.extend_bytes(object);
    }
    buf.into_vec()
}

/// A DICT item.
#[derive(Copy, Clone, Debug)]
pub enum DictItem {
    /// An integer in its shortest encoding.
    Int(i32),
    /// An integer always using the five byte encoding, for offsets that are
    /// patched after layout.
    Long(i32),
    /// A real number, written as packed BCD.
    Real(&'static str),
    Op(u8),
    /// An operator preceded by the escape byte.
    Escape(u8),
}

pub mod dict_ops {
    pub const CHARSET: u8 = 15;
    pub const CHARSTRINGS: u8 = 17;
    pub const PRIVATE: u8 = 18;
    pub const SUBRS: u8 = 19;
    pub const DEFAULT_WIDTH_X: u8 = 20;
    pub const NOMINAL_WIDTH_X: u8 = 21;
    pub const BLUE_VALUES: u8 = 6;
    // escaped
    pub const ROS: u8 = 30;
    pub const CID_COUNT: u8 = 34;
    pub const FD_ARRAY: u8 = 36;
    pub const FD_SELECT: u8 = 37;
    pub const BLUE_SCALE: u8 = 9;
}

pub fn dict(items: &[DictItem]) -> Vec<u8> {
    let mut out = vec![];
    for item in items {
        match *item {
            DictItem::Int(value) => out.extend(encode_int(value, true)),
            DictItem::Long(value) => {
                out.push(29);
                out.extend(value.to_be_bytes());
            }
            DictItem::Real(text) => out.extend(encode_real(text)),
            DictItem::Op(op) => out.push(op),
            DictItem::Escape(op) => out.extend([12, op]),
        }
    }
    out
}

fn encode_int(value: i32, is_dict: bool) -> Vec<u8> {
    match value {
        -107..=107 => vec![(value + 139) as u8],
        108..=1131 => {
            let v = value - 108;
            vec![(v / 256 + 247) as u8, (v % 256) as u8]
        }
        -1131..=-108 => {
            let v = -value - 108;
            vec![(v / 256 + 251) as u8, (v % 256) as u8]
        }
        -32768..=32767 => {
            let [hi, lo] = (value as i16).to_be_bytes();
            vec![28, hi, lo]
        }
        _ if is_dict => {
            let mut out = vec![29];
            out.extend(value.to_be_bytes());
            out
        }
        _ => panic!("charstring integers must fit in 16 bits"),
    }
}

fn encode_real(text: &str) -> Vec<u8> {
    let mut nibbles = vec![];
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        nibbles.push(match ch {
            '0'..='9' => ch as u8 - b'0',
            '.' => 0xa,
            'E' if chars.peek() == Some(&'-') => {
                chars.next();
                0xc
            }
            'E' => 0xb,
            '-' => 0xe,
            _ => panic!("unsupported character {ch} in real"),
        });
    }
    nibbles.push(0xf);
    if nibbles.len() % 2 != 0 {
        nibbles.push(0xf);
    }
    let mut out = vec![30];
    out.extend(nibbles.chunks(2).map(|pair| (pair[0] << 4) | pair[1]));
    out
}

/// A charstring item.
#[derive(Copy, Clone, Debug)]
pub enum Cs {
    /// An integer operand.
    N(i32),
    /// A 16.16 operand, written with the 255 prefix.
    F(f64),
    Op(u8),
    Escape(u8),
    /// A raw byte, such as hint mask data.
    Byte(u8),
}

pub mod cs_ops {
    pub const HSTEM: u8 = 1;
    pub const VSTEM: u8 = 3;
    pub const VMOVETO: u8 = 4;
    pub const RLINETO: u8 = 5;
    pub const HLINETO: u8 = 6;
    pub const VLINETO: u8 = 7;
    pub const RRCURVETO: u8 = 8;
    pub const CALLSUBR: u8 = 10;
    pub const RETURN: u8 = 11;
    pub const ENDCHAR: u8 = 14;
    pub const HSTEMHM: u8 = 18;
    pub const HINTMASK: u8 = 19;
    pub const CNTRMASK: u8 = 20;
    pub const RMOVETO: u8 = 21;
    pub const HMOVETO: u8 = 22;
    pub const VSTEMHM: u8 = 23;
    pub const RCURVELINE: u8 = 24;
    pub const RLINECURVE: u8 = 25;
    pub const VVCURVETO: u8 = 26;
    pub const HHCURVETO: u8 = 27;
    pub const CALLGSUBR: u8 = 29;
    pub const VHCURVETO: u8 = 30;
    pub const HVCURVETO: u8 = 31;
    // escaped
    pub const AND: u8 = 3;
    pub const OR: u8 = 4;
    pub const NOT: u8 = 5;
    pub const ABS: u8 = 9;
    pub const ADD: u8 = 10;
    pub const SUB: u8 = 11;
    pub const DIV: u8 = 12;
    pub const NEG: u8 = 14;
    pub const EQ: u8 = 15;
    pub const DROP: u8 = 18;
    pub const PUT: u8 = 20;
    pub const GET: u8 = 21;
    pub const IFELSE: u8 = 22;
    pub const RANDOM: u8 = 23;
    pub const MUL: u8 = 24;
    pub const SQRT: u8 = 26;
    pub const DUP: u8 = 27;
    pub const EXCH: u8 = 28;
    pub const INDEX: u8 = 29;
    pub const ROLL: u8 = 30;
    pub const HFLEX: u8 = 34;
    pub const FLEX: u8 = 35;
    pub const HFLEX1: u8 = 36;
    pub const FLEX1: u8 = 37;
}

pub fn charstring(items: &[Cs]) -> Vec<u8> {
    let mut out = vec![];
    for item in items {
        match *item {
            Cs::N(value) => out.extend(encode_int(value, false)),
            Cs::F(value) => {
                out.push(255);
                out.extend(((value * 65536.0).round() as i32).to_be_bytes());
            }
            Cs::Op(op) => out.push(op),
            Cs::Escape(op) => out.extend([12, op]),
            Cs::Byte(byte) => out.push(byte),
        }
    }
    out
}

/// Name of the font in [`cff_font`].
pub const FONT_NAME: &str = "TestCFF";
pub const DEFAULT_WIDTH: i32 = 500;
pub const NOMINAL_WIDTH: i32 = 600;

/// Glyph ids in [`cff_font`].
pub mod gids {
    pub const NOTDEF: u16 = 0;
    /// 100..600 x 0..700 with an explicit width delta of 100.
    pub const SQUARE: u16 = 1;
    /// Cubic arch drawn by a global subroutine.
    pub const ARCH: u16 = 2;
    /// Hinted line drawn by a local subroutine.
    pub const HINTED: u16 = 3;
    /// Flex curve pair.
    pub const FLEX: u16 = 4;
}

fn cff_glyphs() -> Vec<Vec<u8>> {
    use cs_ops::*;
    use Cs::*;
    vec![
        charstring(&[Op(ENDCHAR)]),
        charstring(&[
            N(100),
            N(100),
            N(0),
            Op(RMOVETO),
            N(500),
            N(700),
            N(-500),
            Op(HLINETO),
            Op(ENDCHAR),
        ]),
        charstring(&[N(0), N(0), Op(RMOVETO), N(-107), Op(CALLGSUBR), Op(ENDCHAR)]),
        charstring(&[
            N(20),
            N(30),
            Op(HSTEM),
            N(40),
            N(50),
            N(60),
            N(70),
            Op(VSTEM),
            Op(HINTMASK),
            Byte(0xE0),
            N(10),
            N(10),
            Op(RMOVETO),
            N(-107),
            Op(CALLSUBR),
            Op(ENDCHAR),
        ]),
        charstring(&[
            N(0),
            N(0),
            Op(RMOVETO),
            N(100),
            N(50),
            N(100),
            N(0),
            N(100),
            N(-50),
            N(100),
            N(-50),
            N(100),
            N(0),
            N(100),
            N(50),
            N(50),
            Escape(FLEX),
            Op(ENDCHAR),
        ]),
    ]
}

fn cff_table() -> Vec<u8> {
    use cs_ops::*;
    use dict_ops::*;
    use DictItem::*;
    let header = [1u8, 0, 4, 4];
    let name_index = index(&[FONT_NAME.as_bytes().to_vec()]);
    let top_dict = |charstrings: i32, private_size: i32, private_offset: i32| {
        dict(&[
            Long(charstrings),
            Op(CHARSTRINGS),
            Long(private_size),
            Long(private_offset),
            Op(PRIVATE),
        ])
    };
    let top_dict_len = index(&[top_dict(0, 0, 0)]).len();
    let string_index = index(&[]);
    let gsubrs = index(&[charstring(&[
        Cs::N(0),
        Cs::N(400),
        Cs::N(400),
        Cs::N(0),
        Cs::N(0),
        Cs::N(-400),
        Cs::Op(RRCURVETO),
        Cs::Op(RETURN),
    ])]);
    let charstrings = index(&cff_glyphs());
    let private_dict = |subrs: i32| {
        dict(&[
            Int(-20),
            Int(0),
            Int(700),
            Int(20),
            Op(BLUE_VALUES),
            Real("0.0375"),
            Escape(BLUE_SCALE),
            Int(DEFAULT_WIDTH),
            Op(DEFAULT_WIDTH_X),
            Int(NOMINAL_WIDTH),
            Op(NOMINAL_WIDTH_X),
            Long(subrs),
            Op(SUBRS),
        ])
    };
    let private_len = private_dict(0).len();
    let local_subrs = index(&[charstring(&[
        Cs::N(200),
        Cs::N(300),
        Cs::Op(RLINETO),
        Cs::Op(RETURN),
    ])]);
    let charstrings_offset =
        header.len() + name_index.len() + top_dict_len + string_index.len() + gsubrs.len();
    let private_offset = charstrings_offset + charstrings.len();
    let top_dict_index = index(&[top_dict(
        charstrings_offset as i32,
        private_len as i32,
        private_offset as i32,
    )]);
    let mut table = header.to_vec();
    for part in [
        name_index,
        top_dict_index,
        string_index,
        gsubrs,
        charstrings,
        private_dict(private_len as i32),
        local_subrs,
    ] {
        table.extend(part);
    }
    table
}

/// An OpenType font with a name keyed CFF table.
///
/// Maps `'A'` to [`gids::SQUARE`], `'B'` to [`gids::ARCH`], `'C'` to
/// [`gids::HINTED`] and `'D'` to [`gids::FLEX`].
pub fn cff_font() -> Vec<u8> {
    let glyph_count = cff_glyphs().len() as u16;
    let cmap4 = cmap::format4(&[Segment4::delta(0x41, 0x44, -0x40)]);
    let mut builder = FontBuilder::new(CFF_VERSION);
    builder
        .add_table(Tag::new(b"CFF "), cff_table())
        .add_table(Tag::new(b"head"), sfnt::head(1000, false))
        .add_table(Tag::new(b"hhea"), sfnt::hhea(1))
        .add_table(Tag::new(b"maxp"), sfnt::maxp(glyph_count, false))
        .add_table(Tag::new(b"hmtx"), sfnt::hmtx(&[(500, 0)], &[0; 4]))
        .add_table(Tag::new(b"cmap"), cmap::cmap(&[(0, 3, cmap4)]));
    builder.build()
}

/// Font dict widths in [`cid_cff_font`], as (defaultWidthX, nominalWidthX).
pub const CID_WIDTHS: [(i32, i32); 2] = [(400, 300), (900, 1000)];

/// Builds a CID keyed CFF table with two font dicts.
///
/// Glyph 1 uses font dict 0 and has a width delta of 50; glyph 2 uses font
/// dict 1, which has local subroutines, and no explicit width.
fn cid_cff_table() -> Vec<u8> {
    use cs_ops::*;
    use dict_ops::*;
    use DictItem::*;
    let header = [1u8, 0, 4, 4];
    let name_index = index(&[b"TestCID".to_vec()]);
    let top_dict = |charstrings: i32, fd_array: i32, fd_select: i32| {
        dict(&[
            Int(391),
            Int(392),
            Int(0),
            Escape(ROS),
            Int(3),
            Escape(CID_COUNT),
            Long(charstrings),
            Op(CHARSTRINGS),
            Long(fd_array),
            Escape(FD_ARRAY),
            Long(fd_select),
            Escape(FD_SELECT),
        ])
    };
    let top_dict_len = index(&[top_dict(0, 0, 0)]).len();
    let string_index = index(&[b"Adobe".to_vec(), b"Identity".to_vec()]);
    let gsubrs = index(&[]);
    let glyphs = vec![
        charstring(&[Cs::Op(ENDCHAR)]),
        charstring(&[
            Cs::N(50),
            Cs::N(0),
            Cs::N(0),
            Cs::Op(RMOVETO),
            Cs::N(100),
            Cs::N(100),
            Cs::Op(RLINETO),
            Cs::Op(ENDCHAR),
        ]),
        charstring(&[
            Cs::N(0),
            Cs::N(0),
            Cs::Op(RMOVETO),
            Cs::N(-107),
            Cs::Op(CALLSUBR),
            Cs::Op(ENDCHAR),
        ]),
    ];
    let charstrings = index(&glyphs);
    let fd_select = BeBuffer::new()
        .push(3u8)
        .push(2u16)
        .push(0u16)
        .push(0u8)
        .push(2u16)
        .push(1u8)
        .push(3u16)
        .into_vec();
    let font_dict = |private_size: i32, private_offset: i32| {
        dict(&[
            Long(private_size),
            Long(private_offset),
            Op(PRIVATE),
        ])
    };
    let fd_array_len = index(&[font_dict(0, 0), font_dict(0, 0)]).len();
    let private0 = dict(&[
        Int(CID_WIDTHS[0].0),
        Op(DEFAULT_WIDTH_X),
        Int(CID_WIDTHS[0].1),
        Op(NOMINAL_WIDTH_X),
    ]);
    let private1 = |subrs: i32| {
        dict(&[
            Int(CID_WIDTHS[1].0),
            Op(DEFAULT_WIDTH_X),
            Int(CID_WIDTHS[1].1),
            Op(NOMINAL_WIDTH_X),
            Long(subrs),
            Op(SUBRS),
        ])
    };
    let private1_len = private1(0).len();
    let local_subrs = index(&[charstring(&[
        Cs::N(100),
        Cs::N(0),
        Cs::Op(RLINETO),
        Cs::Op(RETURN),
    ])]);
    let charstrings_offset =
        header.len() + name_index.len() + top_dict_len + string_index.len() + gsubrs.len();
    let fd_select_offset = charstrings_offset + charstrings.len();
    let fd_array_offset = fd_select_offset + fd_select.len();
    let private0_offset = fd_array_offset + fd_array_len;
    let private1_offset = private0_offset + private0.len();
    let top_dict_index = index(&[top_dict(
        charstrings_offset as i32,
        fd_array_offset as i32,
        fd_select_offset as i32,
    )]);
    let fd_array = index(&[
        font_dict(private0.len() as i32, private0_offset as i32),
        font_dict(private1_len as i32, private1_offset as i32),
    ]);
    let mut table = header.to_vec();
    for part in [
        name_index,
        top_dict_index,
        string_index,
        gsubrs,
        charstrings,
        fd_select,
        fd_array,
        private0,
        private1(private1_len as i32),
        local_subrs,
    ] {
        table.extend(part);
    }
    table
}

/// An OpenType font with a CID keyed CFF table mapping `'A'` and `'B'` to
/// glyphs 1 and 2.
pub fn cid_cff_font() -> Vec<u8> {
    let cmap4 = cmap::format4(&[Segment4::delta(0x41, 0x42, -0x40)]);
    let mut builder = FontBuilder::new(CFF_VERSION);
    builder
        .add_table(Tag::new(b"CFF "), cid_cff_table())
        .add_table(Tag::new(b"head"), sfnt::head(1000, false))
        .add_table(Tag::new(b"hhea"), sfnt::hhea(1))
        .add_table(Tag::new(b"maxp"), sfnt::maxp(3, false))
        .add_table(Tag::new(b"hmtx"), sfnt::hmtx(&[(500, 0)], &[0; 2]))
        .add_table(Tag::new(b"cmap"), cmap::cmap(&[(3, 1, cmap4)]));
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_encodings() {
        assert_eq!(encode_int(0, true), [139]);
        assert_eq!(encode_int(1000, true), [0xfa, 0x7c]);
        assert_eq!(encode_int(-1000, true), [0xfe, 0x7c]);
        assert_eq!(encode_int(10000, true), [28, 0x27, 0x10]);
        assert_eq!(encode_int(100000, true), [29, 0, 1, 0x86, 0xa0]);
    }

    #[test]
    fn real_encoding() {
        assert_eq!(encode_real("-2.25"), [30, 0xe2, 0xa2, 0x5f]);
        assert_eq!(encode_real("1E-3"), [30, 0x1c, 0x3f]);
    }

    #[test]
    fn index_layout() {
        let data = index(&[vec![1, 2], vec![3]]);
        assert_eq!(data, [0, 2, 1, 1, 3, 4, 1, 2, 3]);
        assert_eq!(index(&[]), [0, 0]);
    }
}
