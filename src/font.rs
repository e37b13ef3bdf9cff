use crate::PagerError;
use image::GrayImage;
use log::warn;
use owned_ttf_parser::{AsFaceRef, Face, GlyphId, OutlineBuilder, OwnedFace};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Transform};

/// A rasterized character, positioned relative to the pen. The pen sits on the baseline, so
/// `y_offset` is usually negative.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub x_offset: i32,
    pub y_offset: i32,
    /// How far the pen moves after drawing this glyph
    pub advance: i32,
    /// Ink on a white background
    pub bitmap: GrayImage,
}

/// Provides metrics and bitmaps for characters. Implementations must always hand out a
/// glyph, substituting their own fallback for characters they can't map.
pub trait GlyphSource {
    /// Distance between two baselines, without any extra spacing
    fn line_height(&self) -> i32;

    fn glyph(&self, ch: char) -> &Glyph;

    fn advance_width(&self, ch: char) -> i32 {
        self.glyph(ch).advance
    }

    /// Width of a run of text; newlines are not taken into account
    fn width_of(&self, text: &str) -> i32 {
        text.chars().map(|ch| self.advance_width(ch)).sum()
    }
}

/// A parsed font object. Fonts can be TTF or OTF fonts.
pub struct Font {
    pub face: OwnedFace,
}

impl Font {
    /// Load a font from raw bytes, parsing the font and returning an error if the font
    /// could not be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font, PagerError> {
        let face = OwnedFace::from_vec(bytes, 0)?;

        Ok(Font { face })
    }

    /// Load a font from a file on disk
    pub fn load_file<P: AsRef<std::path::Path>>(path: P) -> Result<Font, PagerError> {
        Self::load(std::fs::read(path)?)
    }

    /// Obtain the full name of the font, if it has one
    pub fn name(&self) -> Option<String> {
        self.face
            .as_face_ref()
            .names()
            .into_iter()
            .find(|name| name.name_id == owned_ttf_parser::name_id::FULL_NAME && name.is_unicode())
            .and_then(|name| name.to_string())
    }

    pub fn glyph_id(&self, ch: char) -> Option<GlyphId> {
        self.face.as_face_ref().glyph_index(ch)
    }

    pub fn replacement_glyph_id(&self) -> Option<GlyphId> {
        self.glyph_id('\u{FFFD}').or_else(|| self.glyph_id('?'))
    }
}

/// Feeds glyph outlines into a [PathBuilder], flipping them so y grows downwards and
/// moving them so the bounding box starts at the origin
struct PathSink {
    builder: PathBuilder,
    scale: f32,
    left: f32,
    top: f32,
}

impl PathSink {
    fn map(&self, x: f32, y: f32) -> (f32, f32) {
        (x * self.scale - self.left, self.top - y * self.scale)
    }
}

impl OutlineBuilder for PathSink {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x, y) = self.map(x, y);
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x2, y2) = self.map(x2, y2);
        let (x, y) = self.map(x, y);
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

fn rasterize(face: &Face, gid: GlyphId, scale: f32) -> Glyph {
    let advance = (face.glyph_hor_advance(gid).unwrap_or_default() as f32 * scale).round() as i32;

    // whitespace and other outline-less glyphs only move the pen
    let Some(bbox) = face.glyph_bounding_box(gid) else {
        return Glyph {
            x_offset: 0,
            y_offset: 0,
            advance,
            bitmap: GrayImage::new(0, 0),
        };
    };

    let left = (bbox.x_min as f32 * scale).floor();
    let right = (bbox.x_max as f32 * scale).ceil();
    let top = (bbox.y_max as f32 * scale).ceil();
    let bottom = (bbox.y_min as f32 * scale).floor();
    let width = (right - left).max(0.) as u32;
    let height = (top - bottom).max(0.) as u32;

    let mut bitmap = GrayImage::from_pixel(width, height, image::Luma([255]));
    let x_offset = left as i32;
    let y_offset = -(top as i32);

    let mut sink = PathSink {
        builder: PathBuilder::new(),
        scale,
        left,
        top,
    };
    if face.outline_glyph(gid, &mut sink).is_none() {
        return Glyph {
            x_offset,
            y_offset,
            advance,
            bitmap,
        };
    }

    if let (Some(path), Some(mut pixmap)) = (sink.builder.finish(), Pixmap::new(width, height)) {
        let mut paint = Paint::default();
        paint.set_color_rgba8(0, 0, 0, 255);
        paint.anti_alias = true;
        pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);

        for (pixel, coverage) in bitmap.pixels_mut().zip(pixmap.pixels()) {
            pixel.0[0] = 255 - coverage.alpha();
        }
    }

    Glyph {
        x_offset,
        y_offset,
        advance,
        bitmap,
    }
}

/// A [GlyphSource] backed by a TrueType / OpenType font rendered at a fixed pixel size.
///
/// The first 256 code points are rasterized up front; anything else has to be loaded with
/// [RasterFont::preload] before it is laid out, otherwise it is drawn with the font's
/// replacement glyph.
pub struct RasterFont {
    font: Font,
    size: u32,
    glyphs: HashMap<char, Glyph>,
    fallback: Glyph,
    reported: RefCell<HashSet<char>>,
}

impl RasterFont {
    /// Rasterize `font` so that one em is `size` pixels
    pub fn new(font: Font, size: u32) -> Result<RasterFont, PagerError> {
        if size == 0 {
            return Err(PagerError::InvalidFontSize);
        }

        let face = font.face.as_face_ref();
        let scale = size as f32 / face.units_per_em() as f32;
        let fallback_id = font
            .replacement_glyph_id()
            .ok_or(PagerError::MissingFallbackGlyph)?;
        let fallback = rasterize(face, fallback_id, scale);

        let mut raster = RasterFont {
            font,
            size,
            glyphs: HashMap::new(),
            fallback,
            reported: RefCell::new(HashSet::new()),
        };
        raster.preload((0u8..=255).map(char::from));
        Ok(raster)
    }

    /// Rasterize every character of `chars` that isn't loaded yet
    pub fn preload<I: IntoIterator<Item = char>>(&mut self, chars: I) {
        let face = self.font.face.as_face_ref();
        let scale = self.size as f32 / face.units_per_em() as f32;
        for ch in chars {
            if self.glyphs.contains_key(&ch) {
                continue;
            }
            if let Some(gid) = face.glyph_index(ch).filter(|gid| gid.0 > 0) {
                self.glyphs.insert(ch, rasterize(face, gid, scale));
            }
        }
    }
}

impl GlyphSource for RasterFont {
    fn line_height(&self) -> i32 {
        self.size as i32
    }

    fn glyph(&self, ch: char) -> &Glyph {
        match self.glyphs.get(&ch) {
            Some(glyph) => glyph,
            None => {
                if !ch.is_control() && self.reported.borrow_mut().insert(ch) {
                    warn!("no glyph for {ch:?}, using the replacement glyph");
                }
                &self.fallback
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MONO: &[u8] = include_bytes!("../assets/DejaVuSansMono.ttf");

    fn mono(size: u32) -> RasterFont {
        let font = Font::load(MONO.to_vec()).expect("can load font");
        RasterFont::new(font, size).expect("can rasterize font")
    }

    fn ink(glyph: &Glyph) -> usize {
        glyph.bitmap.pixels().filter(|pixel| pixel.0[0] < 128).count()
    }

    #[test]
    fn garbage_is_not_a_font() {
        assert!(matches!(
            Font::load(b"definitely not a font".to_vec()),
            Err(PagerError::FaceParsing(_))
        ));
    }

    #[test]
    fn missing_font_file() {
        assert!(matches!(
            Font::load_file("/nonexistent/font.ttf"),
            Err(PagerError::Io(_))
        ));
    }

    struct Fixed(Glyph);

    impl GlyphSource for Fixed {
        fn line_height(&self) -> i32 {
            12
        }

        fn glyph(&self, _ch: char) -> &Glyph {
            &self.0
        }
    }

    #[test]
    fn width_sums_advances() {
        let source = Fixed(Glyph {
            x_offset: 0,
            y_offset: -8,
            advance: 7,
            bitmap: GrayImage::new(5, 8),
        });
        assert_eq!(source.width_of("abc"), 21);
        assert_eq!(source.width_of(""), 0);
        assert_eq!(source.advance_width('x'), 7);
    }

    #[test]
    fn font_has_a_name() {
        let font = Font::load(MONO.to_vec()).expect("can load font");
        let name = font.name().expect("font has a full name");
        assert!(name.starts_with("DejaVu Sans Mono"), "unexpected name {name:?}");
        assert!(font.replacement_glyph_id().is_some());
    }

    #[test]
    fn zero_size_is_rejected() {
        let font = Font::load(MONO.to_vec()).expect("can load font");
        assert!(matches!(
            RasterFont::new(font, 0),
            Err(PagerError::InvalidFontSize)
        ));
    }

    #[test]
    fn line_height_is_the_font_size() {
        assert_eq!(mono(20).line_height(), 20);
        assert_eq!(mono(11).line_height(), 11);
    }

    #[test]
    fn glyphs_hang_from_the_baseline() {
        let font = mono(20);
        let glyph = font.glyph('A');

        assert!(glyph.advance > 0);
        assert!(glyph.x_offset >= 0 && glyph.x_offset < glyph.advance);
        // 'A' sits on the baseline, so its bitmap ends right where the pen is
        assert!(glyph.y_offset < 0);
        assert_eq!(glyph.y_offset + glyph.bitmap.height() as i32, 0);
        assert!(glyph.bitmap.width() > 0 && glyph.bitmap.height() as i32 <= 20);
        assert!(ink(glyph) > 0);

        // descenders reach below the baseline
        let g = font.glyph('g');
        assert!(g.y_offset + g.bitmap.height() as i32 > 0);
    }

    #[test]
    fn whitespace_only_advances() {
        let font = mono(20);
        let space = font.glyph(' ');
        assert_eq!(space.advance, font.glyph('A').advance);
        assert_eq!(space.bitmap.dimensions(), (0, 0));
    }

    #[test]
    fn monospaced_advances() {
        let font = mono(20);
        let advance = font.advance_width('i');
        assert_eq!(font.advance_width('W'), advance);
        assert_eq!(font.width_of("iWi"), 3 * advance);
    }

    #[test]
    fn unmapped_characters_use_the_replacement_glyph() {
        let font = mono(20);
        // DejaVu Sans Mono has no Hebrew
        let alef = font.glyph('\u{05D0}');
        assert!(std::ptr::eq(alef, &font.fallback));
        assert!(ink(alef) > 0);

        font.glyph('\u{05D0}');
        font.glyph('\u{05D1}');
        assert_eq!(font.reported.borrow().len(), 2);
    }

    #[test]
    fn control_characters_are_not_reported() {
        let font = mono(12);
        font.glyph('\u{0}');
        font.glyph('\u{7}');
        assert!(font.reported.borrow().is_empty());
    }

    #[test]
    fn preload_adds_characters_beyond_latin1() {
        let mut font = mono(20);
        assert!(font.glyphs.contains_key(&'\u{e9}'));
        assert!(std::ptr::eq(font.glyph('\u{3A9}'), &font.fallback));

        font.preload("ΩΩ€".chars());
        let omega = font.glyph('\u{3A9}');
        assert!(!std::ptr::eq(omega, &font.fallback));
        assert!(ink(omega) > 0);
        assert!(font.glyphs.contains_key(&'€'));

        // characters the font lacks stay on the fallback
        font.preload(['\u{05D0}']);
        assert!(!font.glyphs.contains_key(&'\u{05D0}'));
    }
}
