use criterion::{criterion_group, criterion_main, Criterion};
use glyph_reader::{
    tables::postscript::{charstring::CommandSink, Font},
    types::{Fixed, GlyphId},
    FontRef,
};

#[derive(Default)]
struct CountingSink(usize);

impl CommandSink for CountingSink {
    fn move_to(&mut self, _: Fixed, _: Fixed) {
        self.0 += 1;
    }

    fn line_to(&mut self, _: Fixed, _: Fixed) {
        self.0 += 1;
    }

    fn curve_to(&mut self, _: Fixed, _: Fixed, _: Fixed, _: Fixed, _: Fixed, _: Fixed) {
        self.0 += 1;
    }

    fn close(&mut self) {
        self.0 += 1;
    }
}

pub fn evaluate_all_glyphs(c: &mut Criterion) {
    for (name, data) in [
        ("name_keyed", glyph_test_data::cff::cff_font()),
        ("cid_keyed", glyph_test_data::cff::cid_cff_font()),
    ] {
        let font = FontRef::new(&data).unwrap();
        let cff = Font::new(&font).unwrap();
        c.bench_function(name, |b| {
            b.iter(|| {
                let mut sink = CountingSink::default();
                for gid in 0..cff.glyph_count() {
                    let subfont = cff.subfont(GlyphId::new(gid as u16)).unwrap();
                    subfont.evaluate(&mut sink).unwrap();
                }
                sink.0
            })
        });
    }
}

criterion_group!(benches, evaluate_all_glyphs);
criterion_main!(benches);
