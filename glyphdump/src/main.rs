//! Print decoded glyph outlines for the characters of a string.

use std::{io::Write, path::PathBuf};

use glyph_outlines::{FetchError, FetchSettings, FontSession, Glyph};

#[derive(clap::Parser, Debug)]
#[command(about, version)]
struct Args {
    /// Path to a TrueType or OpenType font file
    font: PathBuf,
    /// Characters to decode
    text: String,
    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: Format,
    /// Outline hash (hex) of a placeholder glyph to report as missing
    #[arg(long, value_parser = parse_hex)]
    filler_hash: Option<u64>,
    /// Keep single contour TrueType glyphs smaller than 120 units
    #[arg(long)]
    no_tiny_glyph_filter: bool,
}

#[derive(clap::ValueEnum, Copy, Clone, Default, Debug, PartialEq)]
enum Format {
    /// One JSON object per line.
    Json,
    /// The compact relative outline.
    Compact,
    /// Absolute SVG path data.
    Svg,
    /// Glyph index, advance and bounds.
    #[default]
    Summary,
}

#[derive(Debug)]
struct Error(String);

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<FetchError> for Error {
    fn from(err: FetchError) -> Self {
        Error(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error(err.to_string())
    }
}

fn main() {
    env_logger::init();
    use clap::Parser as _;
    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("glyphdump: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Error> {
    let data = std::fs::read(&args.font)
        .map_err(|e| Error(format!("failed to read {}: {e}", args.font.display())))?;
    let name = args
        .font
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut session = FontSession::new(&data, &name, settings(args))?;
    log::info!(
        "opened {name}: {} outlines, {} units per em",
        session.flavor(),
        session.units_per_em()
    );
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for ch in args.text.chars() {
        match session.fetch(ch) {
            Ok(Some(glyph)) => writeln!(out, "{}", render(&glyph, args.format))?,
            Ok(None) => log::warn!("{ch:?} is not supported by {name}"),
            Err(e) => log::error!("{ch:?} could not be decoded: {e}"),
        }
    }
    Ok(())
}

fn settings(args: &Args) -> FetchSettings {
    let settings = FetchSettings::default().with_filler_hash(args.filler_hash);
    if args.no_tiny_glyph_filter {
        settings.with_tiny_glyph_threshold(None)
    } else {
        settings
    }
}

fn render(glyph: &Glyph, format: Format) -> String {
    match format {
        Format::Json => glyph.to_json().to_string(),
        Format::Compact => glyph.outline.to_compact_string(),
        Format::Svg => glyph.outline.to_absolute_svg(0.0, 0.0),
        Format::Summary => format!(
            "{:?} {} width={} lsb={} rsb={} bounds=[{}, {}, {}, {}] hash={:016x}",
            glyph.character,
            glyph.glyph_id,
            glyph.metrics.width,
            glyph.metrics.lsb,
            glyph.metrics.rsb,
            glyph.bounds.x_min,
            glyph.bounds.y_min,
            glyph.bounds.x_max,
            glyph.bounds.y_max,
            glyph.hash
        ),
    }
}

fn parse_hex(s: &str) -> Result<u64, String> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u64::from_str_radix(digits, 16).map_err(|e| format!("invalid hash {s:?}: {e}"))
}
