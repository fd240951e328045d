//! cmap test data for scenarios not readily produced by hand

use crate::BeBuffer;

/// A format 4 segment.
///
/// When `glyph_ids` is present, the segment is mapped through the glyph id
/// array and `id_delta` is applied to each nonzero entry.
#[derive(Clone, Debug)]
pub struct Segment4 {
    pub start: u16,
    pub end: u16,
    pub id_delta: i16,
    pub glyph_ids: Option<Vec<u16>>,
}

impl Segment4 {
    pub fn delta(start: u16, end: u16, id_delta: i16) -> Self {
        Self {
            start,
            end,
            id_delta,
            glyph_ids: None,
        }
    }

    pub fn mapped(start: u16, end: u16, glyph_ids: Vec<u16>) -> Self {
        assert_eq!(glyph_ids.len(), (end - start + 1) as usize);
        Self {
            start,
            end,
            id_delta: 0,
            glyph_ids: Some(glyph_ids),
        }
    }
}

/// Builds a format 4 subtable. The terminating 0xFFFF segment is appended.
pub fn format4(segments: &[Segment4]) -> Vec<u8> {
    let mut segments = segments.to_vec();
    segments.push(Segment4::delta(0xFFFF, 0xFFFF, 1));
    let seg_count = segments.len() as u16;
    let mut buf = BeBuffer::new()
        .push(4u16) // format
        .push_with_tag(0u16, "length")
        .push(0u16) // language
        .push(seg_count * 2)
        .extend([0u16; 3]); // searchRange, entrySelector, rangeShift
    buf = buf.extend(segments.iter().map(|seg| seg.end));
    buf = buf.push(0u16); // reservedPad
    buf = buf.extend(segments.iter().map(|seg| seg.start));
    buf = buf.extend(segments.iter().map(|seg| seg.id_delta));
    // idRangeOffset values are relative to their own position
    let mut glyph_array = vec![];
    for (i, seg) in segments.iter().enumerate() {
        let range_offset = match &seg.glyph_ids {
            Some(ids) => {
                let to_array_start = 2 * (segments.len() - i);
                let offset = to_array_start + 2 * glyph_array.len();
                glyph_array.extend_from_slice(ids);
                offset as u16
            }
            None => 0,
        };
        buf = buf.push(range_offset);
    }
    buf = buf.extend(glyph_array);
    let len = buf.len() as u16;
    buf.write_at("length", len);
    buf.into_vec()
}

/// Builds a format 12 subtable from (start, end, start glyph) groups.
pub fn format12(groups: &[(u32, u32, u32)]) -> Vec<u8> {
    let mut buf = BeBuffer::new()
        .push(12u16)
        .push(0u16) // reserved
        .push((16 + 12 * groups.len()) as u32)
        .push(0u32) // language
        .push(groups.len() as u32);
    for (start, end, gid) in groups {
        buf = buf.push(*start).push(*end).push(*gid);
    }
    buf.into_vec()
}

/// Builds a cmap table from (platform id, encoding id, subtable) triples.
pub fn cmap(subtables: &[(u16, u16, Vec<u8>)]) -> Vec<u8> {
    let mut buf = BeBuffer::new()
        .push(0u16)
        .push(subtables.len() as u16);
    let mut offset = 4 + 8 * subtables.len();
    for (platform_id, encoding_id, data) in subtables {
        buf = buf
            .push(*platform_id)
            .push(*encoding_id)
            .push(offset as u32);
        offset += data.len();
    }
    for (_, _, data) in subtables {
        buf = buf.extend_bytes(data);
    }
    buf.into_vec()
}
