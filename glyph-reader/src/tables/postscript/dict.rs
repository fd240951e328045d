//! Parsing for PostScript DICTs.

use std::ops::Range;

use super::{number::parse_operand, Error, Number, StringId};
use crate::{Cursor, FontData, ReadError};

/// Maximum number of operands preceding a DICT operator.
///
/// See "Appendix B CFF DICT Implementation Limits" at <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf#page=44>
const MAX_OPERANDS: usize = 48;

/// PostScript DICT operator.
///
/// See "Table 9 Top DICT Operator Entries" and "Table 23 Private DICT
/// Operators" at <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf>
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Operator {
    Version,
    Notice,
    FullName,
    FamilyName,
    Weight,
    FontBbox,
    CharstringsOffset,
    PrivateDictRange,
    Copyright,
    IsFixedPitch,
    ItalicAngle,
    UnderlinePosition,
    UnderlineThickness,
    PaintType,
    CharstringType,
    FontMatrix,
    StrokeWidth,
    FdArrayOffset,
    FdSelectOffset,
    BlueValues,
    OtherBlues,
    FamilyBlues,
    FamilyOtherBlues,
    SubrsOffset,
    BlueScale,
    BlueShift,
    BlueFuzz,
    LanguageGroup,
    ExpansionFactor,
    Encoding,
    Charset,
    UniqueId,
    Xuid,
    SyntheticBase,
    PostScript,
    BaseFontName,
    BaseFontBlend,
    Ros,
    CidFontVersion,
    CidFontRevision,
    CidFontType,
    CidCount,
    UidBase,
    FontName,
    StdHw,
    StdVw,
    DefaultWidthX,
    NominalWidthX,
    StemSnapH,
    StemSnapV,
    ForceBold,
    InitialRandomSeed,
}

impl Operator {
    fn from_opcode(opcode: u8) -> Option<Self> {
        use Operator::*;
        Some(match opcode {
            0 => Version,
            1 => Notice,
            2 => FullName,
            3 => FamilyName,
            4 => Weight,
            5 => FontBbox,
            6 => BlueValues,
            7 => OtherBlues,
            8 => FamilyBlues,
            9 => FamilyOtherBlues,
            10 => StdHw,
            11 => StdVw,
            13 => UniqueId,
            14 => Xuid,
            15 => Charset,
            16 => Encoding,
            17 => CharstringsOffset,
            18 => PrivateDictRange,
            19 => SubrsOffset,
            20 => DefaultWidthX,
            21 => NominalWidthX,
            _ => return None,
        })
    }

    fn from_extended_opcode(opcode: u8) -> Option<Self> {
        use Operator::*;
        Some(match opcode {
            0 => Copyright,
            1 => IsFixedPitch,
            2 => ItalicAngle,
            3 => UnderlinePosition,
            4 => UnderlineThickness,
            5 => PaintType,
            6 => CharstringType,
            7 => FontMatrix,
            8 => StrokeWidth,
            9 => BlueScale,
            10 => BlueShift,
            11 => BlueFuzz,
            12 => StemSnapH,
            13 => StemSnapV,
            14 => ForceBold,
            17 => LanguageGroup,
            18 => ExpansionFactor,
            19 => InitialRandomSeed,
            20 => SyntheticBase,
            21 => PostScript,
            22 => BaseFontName,
            23 => BaseFontBlend,
            30 => Ros,
            31 => CidFontVersion,
            32 => CidFontRevision,
            33 => CidFontType,
            34 => CidCount,
            35 => UidBase,
            36 => FdArrayOffset,
            37 => FdSelectOffset,
            38 => FontName,
            _ => return None,
        })
    }
}

/// Either a PostScript DICT operator or a (numeric) operand.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Token {
    Operator(Operator),
    Operand(Number),
}

/// Given a byte slice containing DICT data, returns an iterator yielding
/// raw operands and operators.
pub fn tokens(dict_data: &[u8]) -> impl Iterator<Item = Result<Token, Error>> + '_ + Clone {
    let mut cursor = FontData::new(dict_data).cursor();
    std::iter::from_fn(move || {
        if cursor.remaining_bytes() == 0 {
            None
        } else {
            Some(parse_token(&mut cursor))
        }
    })
}

fn parse_token(cursor: &mut Cursor) -> Result<Token, Error> {
    // Escape opcode for accessing extensions.
    const ESCAPE: u8 = 12;
    let b0 = cursor.read::<u8>()?;
    Ok(match b0 {
        ESCAPE => {
            let b1 = cursor.read::<u8>()?;
            Token::Operator(Operator::from_extended_opcode(b1).ok_or(Error::InvalidDictOperator(b1))?)
        }
        0..=21 => Token::Operator(Operator::from_opcode(b0).ok_or(Error::InvalidDictOperator(b0))?),
        _ => Token::Operand(parse_operand(cursor, b0)?),
    })
}

/// Maximum number of values in a delta encoded array.
///
/// Blue zones are limited to 7 pairs.
pub const MAX_DELTA_VALUES: usize = 14;

/// Operand for the delta encoded operators: `BlueValues`, `OtherBlues`,
/// `FamilyBlues`, `FamilyOtherBlues`, `StemSnapH` and `StemSnapV`.
///
/// Values are stored after applying the prefix sum so each entry is
/// absolute.
#[derive(Copy, Clone, PartialEq, Default, Debug)]
pub struct DeltaValues {
    values: [f64; MAX_DELTA_VALUES],
    len: u8,
}

impl DeltaValues {
    fn from_deltas(deltas: impl Iterator<Item = f64>) -> Self {
        let mut result = Self::default();
        let mut sum = 0.0;
        for (delta, target) in deltas.zip(&mut result.values) {
            sum += delta;
            *target = sum;
            result.len += 1;
        }
        result
    }

    pub fn values(&self) -> &[f64] {
        &self.values[..self.len as usize]
    }
}

/// PostScript DICT operator with its associated operands.
#[derive(Clone, PartialEq, Debug)]
pub enum Entry {
    Version(StringId),
    Notice(StringId),
    FullName(StringId),
    FamilyName(StringId),
    Weight(StringId),
    FontBbox([f64; 4]),
    CharstringsOffset(usize),
    PrivateDictRange(Range<usize>),
    Copyright(StringId),
    IsFixedPitch(bool),
    ItalicAngle(f64),
    UnderlinePosition(f64),
    UnderlineThickness(f64),
    PaintType(i32),
    CharstringType(i32),
    FontMatrix([f64; 6]),
    StrokeWidth(f64),
    FdArrayOffset(usize),
    FdSelectOffset(usize),
    BlueValues(DeltaValues),
    OtherBlues(DeltaValues),
    FamilyBlues(DeltaValues),
    FamilyOtherBlues(DeltaValues),
    SubrsOffset(usize),
    BlueScale(f64),
    BlueShift(f64),
    BlueFuzz(f64),
    LanguageGroup(i32),
    ExpansionFactor(f64),
    Encoding(usize),
    Charset(usize),
    UniqueId(i32),
    Xuid,
    SyntheticBase(i32),
    PostScript(StringId),
    BaseFontName(StringId),
    BaseFontBlend,
    Ros(Ros),
    CidFontVersion(f64),
    CidFontRevision(f64),
    CidFontType(i32),
    CidCount(u32),
    UidBase(i32),
    FontName(StringId),
    StdHw(f64),
    StdVw(f64),
    DefaultWidthX(f64),
    NominalWidthX(f64),
    StemSnapH(DeltaValues),
    StemSnapV(DeltaValues),
    ForceBold(bool),
    InitialRandomSeed(i32),
}

/// Operands collected while scanning toward the next operator.
struct Operands {
    values: [Number; MAX_OPERANDS],
    len: usize,
}

impl Operands {
    fn new() -> Self {
        Self {
            values: [Number::Integer(0); MAX_OPERANDS],
            len: 0,
        }
    }

    fn push(&mut self, number: Number) {
        if let Some(slot) = self.values.get_mut(self.len) {
            *slot = number;
            self.len += 1;
        } else {
            log::trace!("DICT operand buffer is full; dropping {number}");
        }
    }

    fn get(&self, index: usize) -> Result<Number, Error> {
        self.values[..self.len]
            .get(index)
            .copied()
            .ok_or(Error::StackUnderflow)
    }

    /// The operand immediately preceding the operator.
    fn last(&self) -> Result<Number, Error> {
        self.len
            .checked_sub(1)
            .map(|i| self.values[i])
            .ok_or(Error::StackUnderflow)
    }

    fn int(&self) -> Result<i32, Error> {
        self.last().map(Number::to_i32)
    }

    fn offset(&self) -> Result<usize, Error> {
        usize::try_from(self.int()?)
            .map_err(|_| ReadError::MalformedData("negative offset in DICT").into())
    }

    fn real(&self) -> Result<f64, Error> {
        self.last().map(Number::to_f64)
    }

    fn sid(&self) -> Result<StringId, Error> {
        Ok(StringId::new(self.int()? as u16))
    }

    fn array<const N: usize>(&self) -> Result<[f64; N], Error> {
        let mut result = [0.0; N];
        for (i, value) in result.iter_mut().enumerate() {
            *value = self.get(i)?.to_f64();
        }
        Ok(result)
    }

    fn deltas(&self) -> DeltaValues {
        DeltaValues::from_deltas(self.values[..self.len].iter().map(|n| n.to_f64()))
    }

    fn clear(&mut self) {
        self.len = 0;
    }
}

/// Given a byte slice containing DICT data, returns an iterator yielding
/// each operator with its associated operands.
///
/// Operands are accumulated until an operator is seen, at which point the
/// entry is produced and the operand buffer is cleared. Delta encoded
/// arrays are returned with absolute values.
pub fn entries(dict_data: &[u8]) -> impl Iterator<Item = Result<Entry, Error>> + '_ {
    let mut operands = Operands::new();
    let mut cursor = FontData::new(dict_data).cursor();
    std::iter::from_fn(move || loop {
        if cursor.remaining_bytes() == 0 {
            return None;
        }
        match parse_token(&mut cursor) {
            Ok(Token::Operand(number)) => operands.push(number),
            Ok(Token::Operator(op)) => {
                let entry = parse_entry(op, &operands);
                operands.clear();
                return Some(entry);
            }
            Err(e) => {
                // Nothing sensible can follow a malformed token
                cursor.advance_by(usize::MAX);
                return Some(Err(e));
            }
        }
    })
}

fn parse_entry(op: Operator, operands: &Operands) -> Result<Entry, Error> {
    use Operator::*;
    Ok(match op {
        Version => Entry::Version(operands.sid()?),
        Notice => Entry::Notice(operands.sid()?),
        FullName => Entry::FullName(operands.sid()?),
        FamilyName => Entry::FamilyName(operands.sid()?),
        Weight => Entry::Weight(operands.sid()?),
        FontBbox => Entry::FontBbox(operands.array()?),
        CharstringsOffset => Entry::CharstringsOffset(operands.offset()?),
        PrivateDictRange => {
            let len = operands.get(0)?.to_i32();
            let start = operands.get(1)?.to_i32();
            let (len, start) = usize::try_from(len)
                .ok()
                .zip(usize::try_from(start).ok())
                .ok_or(ReadError::MalformedData("negative Private DICT range"))?;
            let end = start
                .checked_add(len)
                .ok_or(ReadError::OutOfBounds { offset: start })?;
            Entry::PrivateDictRange(start..end)
        }
        Copyright => Entry::Copyright(operands.sid()?),
        IsFixedPitch => Entry::IsFixedPitch(operands.int()? != 0),
        ItalicAngle => Entry::ItalicAngle(operands.real()?),
        UnderlinePosition => Entry::UnderlinePosition(operands.real()?),
        UnderlineThickness => Entry::UnderlineThickness(operands.real()?),
        PaintType => Entry::PaintType(operands.int()?),
        CharstringType => Entry::CharstringType(operands.int()?),
        FontMatrix => Entry::FontMatrix(operands.array()?),
        StrokeWidth => Entry::StrokeWidth(operands.real()?),
        FdArrayOffset => Entry::FdArrayOffset(operands.offset()?),
        FdSelectOffset => Entry::FdSelectOffset(operands.offset()?),
        BlueValues => Entry::BlueValues(operands.deltas()),
        OtherBlues => Entry::OtherBlues(operands.deltas()),
        FamilyBlues => Entry::FamilyBlues(operands.deltas()),
        FamilyOtherBlues => Entry::FamilyOtherBlues(operands.deltas()),
        SubrsOffset => Entry::SubrsOffset(operands.offset()?),
        BlueScale => Entry::BlueScale(operands.real()?),
        BlueShift => Entry::BlueShift(operands.real()?),
        BlueFuzz => Entry::BlueFuzz(operands.real()?),
        LanguageGroup => Entry::LanguageGroup(operands.int()?),
        ExpansionFactor => Entry::ExpansionFactor(operands.real()?),
        Encoding => Entry::Encoding(operands.offset()?),
        Charset => Entry::Charset(operands.offset()?),
        UniqueId => Entry::UniqueId(operands.int()?),
        Xuid => Entry::Xuid,
        SyntheticBase => Entry::SyntheticBase(operands.int()?),
        PostScript => Entry::PostScript(operands.sid()?),
        BaseFontName => Entry::BaseFontName(operands.sid()?),
        BaseFontBlend => Entry::BaseFontBlend,
        Ros => Entry::Ros(self::Ros {
            registry: StringId::new(operands.get(0)?.to_i32() as u16),
            ordering: StringId::new(operands.get(1)?.to_i32() as u16),
            supplement: operands.get(2)?.to_i32(),
        }),
        CidFontVersion => Entry::CidFontVersion(operands.real()?),
        CidFontRevision => Entry::CidFontRevision(operands.real()?),
        CidFontType => Entry::CidFontType(operands.int()?),
        CidCount => Entry::CidCount(operands.int()? as u32),
        UidBase => Entry::UidBase(operands.int()?),
        FontName => Entry::FontName(operands.sid()?),
        StdHw => Entry::StdHw(operands.real()?),
        StdVw => Entry::StdVw(operands.real()?),
        DefaultWidthX => Entry::DefaultWidthX(operands.real()?),
        NominalWidthX => Entry::NominalWidthX(operands.real()?),
        StemSnapH => Entry::StemSnapH(operands.deltas()),
        StemSnapV => Entry::StemSnapV(operands.deltas()),
        ForceBold => Entry::ForceBold(operands.int()? != 0),
        InitialRandomSeed => Entry::InitialRandomSeed(operands.int()?),
    })
}

/// Registry, ordering and supplement of a CID-keyed font.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Ros {
    pub registry: StringId,
    pub ordering: StringId,
    pub supplement: i32,
}

/// The Top DICT of a CFF font.
#[derive(Clone, PartialEq, Debug)]
pub struct TopDict {
    pub version: Option<StringId>,
    pub notice: Option<StringId>,
    pub copyright: Option<StringId>,
    pub full_name: Option<StringId>,
    pub family_name: Option<StringId>,
    pub weight: Option<StringId>,
    pub is_fixed_pitch: bool,
    pub italic_angle: f64,
    pub underline_position: f64,
    pub underline_thickness: f64,
    pub paint_type: i32,
    pub charstring_type: i32,
    pub font_matrix: [f64; 6],
    pub unique_id: Option<i32>,
    pub font_bbox: [f64; 4],
    pub stroke_width: f64,
    pub charset: usize,
    pub encoding: usize,
    pub charstrings_offset: Option<usize>,
    pub private_dict_range: Option<Range<usize>>,
    pub synthetic_base: Option<i32>,
    pub post_script: Option<StringId>,
    pub base_font_name: Option<StringId>,
    pub ros: Option<Ros>,
    pub cid_font_version: f64,
    pub cid_font_revision: f64,
    pub cid_font_type: i32,
    pub cid_count: u32,
    pub uid_base: Option<i32>,
    pub fd_array_offset: Option<usize>,
    pub fd_select_offset: Option<usize>,
    pub font_name: Option<StringId>,
}

impl Default for TopDict {
    fn default() -> Self {
        Self {
            version: None,
            notice: None,
            copyright: None,
            full_name: None,
            family_name: None,
            weight: None,
            is_fixed_pitch: false,
            italic_angle: 0.0,
            underline_position: -100.0,
            underline_thickness: 50.0,
            paint_type: 0,
            charstring_type: 2,
            font_matrix: [0.001, 0.0, 0.0, 0.001, 0.0, 0.0],
            unique_id: None,
            font_bbox: [0.0; 4],
            stroke_width: 0.0,
            charset: 0,
            encoding: 0,
            charstrings_offset: None,
            private_dict_range: None,
            synthetic_base: None,
            post_script: None,
            base_font_name: None,
            ros: None,
            cid_font_version: 0.0,
            cid_font_revision: 0.0,
            cid_font_type: 0,
            cid_count: 8720,
            uid_base: None,
            fd_array_offset: None,
            fd_select_offset: None,
            font_name: None,
        }
    }
}

impl TopDict {
    pub fn new(dict_data: &[u8]) -> Result<Self, Error> {
        let mut dict = Self::default();
        for entry in entries(dict_data) {
            use Entry::*;
            match entry? {
                Version(sid) => dict.version = Some(sid),
                Notice(sid) => dict.notice = Some(sid),
                Copyright(sid) => dict.copyright = Some(sid),
                FullName(sid) => dict.full_name = Some(sid),
                FamilyName(sid) => dict.family_name = Some(sid),
                Weight(sid) => dict.weight = Some(sid),
                IsFixedPitch(value) => dict.is_fixed_pitch = value,
                ItalicAngle(value) => dict.italic_angle = value,
                UnderlinePosition(value) => dict.underline_position = value,
                UnderlineThickness(value) => dict.underline_thickness = value,
                PaintType(value) => dict.paint_type = value,
                CharstringType(value) => dict.charstring_type = value,
                FontMatrix(matrix) => dict.font_matrix = matrix,
                UniqueId(value) => dict.unique_id = Some(value),
                FontBbox(bbox) => dict.font_bbox = bbox,
                StrokeWidth(value) => dict.stroke_width = value,
                Charset(offset) => dict.charset = offset,
                Encoding(offset) => dict.encoding = offset,
                CharstringsOffset(offset) => dict.charstrings_offset = Some(offset),
                PrivateDictRange(range) => dict.private_dict_range = Some(range),
                SyntheticBase(value) => dict.synthetic_base = Some(value),
                PostScript(sid) => dict.post_script = Some(sid),
                BaseFontName(sid) => dict.base_font_name = Some(sid),
                Ros(ros) => dict.ros = Some(ros),
                CidFontVersion(value) => dict.cid_font_version = value,
                CidFontRevision(value) => dict.cid_font_revision = value,
                CidFontType(value) => dict.cid_font_type = value,
                CidCount(value) => dict.cid_count = value,
                UidBase(value) => dict.uid_base = Some(value),
                FdArrayOffset(offset) => dict.fd_array_offset = Some(offset),
                FdSelectOffset(offset) => dict.fd_select_offset = Some(offset),
                FontName(sid) => dict.font_name = Some(sid),
                other => log::debug!("ignoring {other:?} in Top DICT"),
            }
        }
        Ok(dict)
    }

    /// True if the font is CID-keyed.
    pub fn is_cid(&self) -> bool {
        self.ros.is_some()
    }
}

/// A Private DICT.
#[derive(Clone, PartialEq, Debug)]
pub struct PrivateDict {
    pub blue_values: DeltaValues,
    pub other_blues: DeltaValues,
    pub family_blues: DeltaValues,
    pub family_other_blues: DeltaValues,
    pub blue_scale: f64,
    pub blue_shift: f64,
    pub blue_fuzz: f64,
    pub std_hw: Option<f64>,
    pub std_vw: Option<f64>,
    pub stem_snap_h: DeltaValues,
    pub stem_snap_v: DeltaValues,
    pub force_bold: bool,
    pub language_group: i32,
    pub expansion_factor: f64,
    pub initial_random_seed: i32,
    /// Offset of the local subroutines, relative to the start of the
    /// containing table.
    pub subrs_offset: Option<usize>,
    pub default_width_x: f64,
    pub nominal_width_x: f64,
}

impl Default for PrivateDict {
    fn default() -> Self {
        Self {
            blue_values: DeltaValues::default(),
            other_blues: DeltaValues::default(),
            family_blues: DeltaValues::default(),
            family_other_blues: DeltaValues::default(),
            blue_scale: 0.039625,
            blue_shift: 7.0,
            blue_fuzz: 1.0,
            std_hw: None,
            std_vw: None,
            stem_snap_h: DeltaValues::default(),
            stem_snap_v: DeltaValues::default(),
            force_bold: false,
            language_group: 0,
            expansion_factor: 0.06,
            initial_random_seed: 0,
            subrs_offset: None,
            default_width_x: 0.0,
            nominal_width_x: 0.0,
        }
    }
}

impl PrivateDict {
    /// Parses the Private DICT occupying `range` in the table data.
    pub fn new(table_data: FontData, range: Range<usize>) -> Result<Self, Error> {
        let dict_data = table_data
            .slice(range.clone())
            .ok_or(ReadError::OutOfBounds {
                offset: range.start,
            })?;
        let mut dict = Self::default();
        for entry in entries(dict_data.as_bytes()) {
            use Entry::*;
            match entry? {
                BlueValues(values) => dict.blue_values = values,
                OtherBlues(values) => dict.other_blues = values,
                FamilyBlues(values) => dict.family_blues = values,
                FamilyOtherBlues(values) => dict.family_other_blues = values,
                BlueScale(value) => dict.blue_scale = value,
                BlueShift(value) => dict.blue_shift = value,
                BlueFuzz(value) => dict.blue_fuzz = value,
                StdHw(value) => dict.std_hw = Some(value),
                StdVw(value) => dict.std_vw = Some(value),
                StemSnapH(values) => dict.stem_snap_h = values,
                StemSnapV(values) => dict.stem_snap_v = values,
                ForceBold(value) => dict.force_bold = value,
                LanguageGroup(value) => dict.language_group = value,
                ExpansionFactor(value) => dict.expansion_factor = value,
                InitialRandomSeed(value) => dict.initial_random_seed = value,
                // Subrs offset is relative to the private DICT
                SubrsOffset(offset) => {
                    dict.subrs_offset = Some(
                        range
                            .start
                            .checked_add(offset)
                            .ok_or(ReadError::OutOfBounds { offset })?,
                    )
                }
                DefaultWidthX(value) => dict.default_width_x = value,
                NominalWidthX(value) => dict.nominal_width_x = value,
                other => log::debug!("ignoring {other:?} in Private DICT"),
            }
        }
        Ok(dict)
    }
}

/// Entries that we parse from a Font DICT in the FDArray of a CID-keyed
/// font.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct FontDict {
    pub font_name: Option<StringId>,
    pub font_matrix: Option<[f64; 6]>,
    pub private_dict_range: Range<usize>,
}

impl FontDict {
    pub fn new(dict_data: &[u8]) -> Result<Self, Error> {
        let mut font_name = None;
        let mut font_matrix = None;
        let mut range = None;
        for entry in entries(dict_data) {
            match entry? {
                Entry::FontName(sid) => font_name = Some(sid),
                Entry::FontMatrix(matrix) => font_matrix = Some(matrix),
                Entry::PrivateDictRange(r) => range = Some(r),
                _ => {}
            }
        }
        Ok(Self {
            font_name,
            font_matrix,
            private_dict_range: range.ok_or(Error::MissingPrivateDict)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyph_test_data::cff::{dict, dict_ops, DictItem::*};

    #[test]
    fn token_stream() {
        let data = dict(&[Int(391), Op(dict_ops::CHARSET), Real("-2.25"), Escape(7)]);
        let tokens: Vec<_> = tokens(&data).map(Result::unwrap).collect();
        assert_eq!(
            tokens,
            [
                Token::Operand(Number::Integer(391)),
                Token::Operator(Operator::Charset),
                Token::Operand(Number::Real(-2.25)),
                Token::Operator(Operator::FontMatrix),
            ]
        );
    }

    #[test]
    fn invalid_operator() {
        let data = dict(&[Int(50), Escape(12), Int(1), Escape(39), Int(2), Op(15)]);
        let mut iter = entries(&data);
        assert!(matches!(iter.next(), Some(Ok(Entry::StemSnapH(_)))));
        assert_eq!(iter.next(), Some(Err(Error::InvalidDictOperator(39))));
        // decoding stops after a fatal error
        assert_eq!(iter.next(), None);
        // reserved operand prefix
        assert_eq!(entries(&[22]).next(), Some(Err(Error::InvalidNumber)));
    }

    #[test]
    fn delta_arrays_are_summed() {
        let data = dict(&[
            Int(-20),
            Int(20),
            Int(680),
            Int(20),
            Op(dict_ops::BLUE_VALUES),
            Int(50),
            Int(30),
            Escape(12),
        ]);
        let entries: Vec<_> = entries(&data).map(Result::unwrap).collect();
        let Entry::BlueValues(blues) = &entries[0] else {
            panic!("expected blue values");
        };
        assert_eq!(blues.values(), [-20.0, 0.0, 680.0, 700.0]);
        let Entry::StemSnapH(snaps) = &entries[1] else {
            panic!("expected stem snaps");
        };
        assert_eq!(snaps.values(), [50.0, 80.0]);
    }

    #[test]
    fn top_dict_defaults() {
        let top = TopDict::new(&[]).unwrap();
        assert_eq!(top, TopDict::default());
        assert_eq!(top.charstring_type, 2);
        assert_eq!(top.underline_position, -100.0);
        assert_eq!(top.underline_thickness, 50.0);
        assert_eq!(top.font_matrix, [0.001, 0.0, 0.0, 0.001, 0.0, 0.0]);
        assert_eq!(top.cid_count, 8720);
        assert!(!top.is_cid());
    }

    #[test]
    fn top_dict_entries() {
        let data = dict(&[
            Int(391),
            Op(0),
            Int(1),
            Escape(1),
            Real("-12.5"),
            Escape(2),
            Int(-10),
            Int(-250),
            Int(1100),
            Int(900),
            Op(5),
            Long(1234),
            Op(dict_ops::CHARSTRINGS),
            Int(40),
            Long(5000),
            Op(dict_ops::PRIVATE),
            Int(391),
            Int(392),
            Int(0),
            Escape(dict_ops::ROS),
        ]);
        let top = TopDict::new(&data).unwrap();
        assert_eq!(top.version, Some(StringId::new(391)));
        assert!(top.is_fixed_pitch);
        assert_eq!(top.italic_angle, -12.5);
        assert_eq!(top.font_bbox, [-10.0, -250.0, 1100.0, 900.0]);
        assert_eq!(top.charstrings_offset, Some(1234));
        assert_eq!(top.private_dict_range, Some(5000..5040));
        assert_eq!(
            top.ros,
            Some(Ros {
                registry: StringId::new(391),
                ordering: StringId::new(392),
                supplement: 0,
            })
        );
        assert!(top.is_cid());
    }

    #[test]
    fn private_dict_subrs_are_relative() {
        let dict_data = dict(&[
            Real("0.0375"),
            Escape(dict_ops::BLUE_SCALE),
            Int(500),
            Op(dict_ops::DEFAULT_WIDTH_X),
            Int(-20),
            Op(dict_ops::NOMINAL_WIDTH_X),
            Int(12),
            Op(dict_ops::SUBRS),
        ]);
        let mut table = vec![0u8; 100];
        table.extend_from_slice(&dict_data);
        let range = 100..100 + dict_data.len();
        let private = PrivateDict::new(FontData::new(&table), range).unwrap();
        assert_eq!(private.blue_scale, 0.0375);
        assert_eq!(private.default_width_x, 500.0);
        assert_eq!(private.nominal_width_x, -20.0);
        assert_eq!(private.subrs_offset, Some(112));
        // untouched defaults
        assert_eq!(private.blue_shift, 7.0);
        assert_eq!(private.blue_fuzz, 1.0);
        assert_eq!(private.expansion_factor, 0.06);
    }

    #[test]
    fn private_dict_out_of_bounds() {
        let table = [0u8; 10];
        assert!(PrivateDict::new(FontData::new(&table), 5..20).is_err());
    }

    #[test]
    fn font_dict_requires_private() {
        assert_eq!(FontDict::new(&[]), Err(Error::MissingPrivateDict));
        let data = dict(&[Int(10), Int(200), Op(dict_ops::PRIVATE)]);
        assert_eq!(FontDict::new(&data).unwrap().private_dict_range, 200..210);
    }
}
