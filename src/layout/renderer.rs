use super::Area;
use crate::canvas::Canvas;
use crate::font::GlyphSource;
use crate::stream::{TextStream, Token};
use crate::PagerError;

/// Tab stops are this many spaces apart
const TAB_WIDTH: i32 = 8;

/// Settings for laying out a single page
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Extra pixels between two lines of text
    pub vspace: u32,
    /// Where on the canvas text goes
    pub area: Area,
}

/// Why a [Renderer] stopped laying out text. None of these are errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PageEnd {
    /// The area is full
    Overflow,
    /// A page break marker was read
    PageBreak,
    /// There is no more text
    SourceEof,
}

/// Lays out words from a [TextStream] onto one page of a [Canvas], wrapping greedily at
/// word boundaries.
///
/// A renderer is good for exactly one page: create a fresh one for each page, passing it
/// the same stream so that it picks up where the last page stopped.
///
/// Words are never split. A word that is wider than the whole area is drawn on a line of
/// its own and runs off the right hand side.
pub struct Renderer<'f, G: GlyphSource + ?Sized> {
    font: &'f G,
    vspace: i32,
    origin: (i32, i32),
    width: i32,
    height: i32,
    // pen position relative to the area; y is the baseline
    x: i32,
    y: i32,
    end: Option<PageEnd>,
    break_count: usize,
}

impl<'f, G: GlyphSource + ?Sized> Renderer<'f, G> {
    pub fn new(font: &'f G, config: &LayoutConfig) -> Renderer<'f, G> {
        Renderer {
            font,
            vspace: i32::try_from(config.vspace).unwrap_or(i32::MAX),
            origin: (config.area.x, config.area.y),
            width: config.area.width,
            height: config.area.height,
            x: 0,
            y: 0,
            end: None,
            break_count: 0,
        }
    }

    /// Consume words from `stream` until the page is full, a page break is read, or the
    /// stream runs out. A word that doesn't fit on the page any more is pushed back onto
    /// the stream so that it starts the next page.
    pub fn render<C: Canvas + ?Sized>(
        &mut self,
        canvas: &mut C,
        stream: &mut TextStream,
    ) -> Result<PageEnd, PagerError> {
        while self.end.is_none() {
            let Some(word) = stream.read_word() else {
                self.end = Some(PageEnd::SourceEof);
                break;
            };

            match Token::classify(&word) {
                Token::Newline => {
                    // blank lines at the top of a page are swallowed
                    if (self.x, self.y) != (0, 0) {
                        self.line_break();
                        if self.y >= self.height {
                            self.end = Some(PageEnd::Overflow);
                        }
                    }
                }
                Token::Tab => {
                    let stop = self.font.advance_width(' ') * TAB_WIDTH;
                    if stop > 0 {
                        self.x = (self.x / stop + 1) * stop;
                    }
                }
                Token::Space => self.print(canvas, " "),
                Token::PageBreak => {
                    self.break_count = 1;
                    self.end = Some(PageEnd::PageBreak);
                }
                Token::Word(text) => {
                    if self.x + self.font.width_of(text) >= self.width {
                        self.line_break();
                        if self.y >= self.height {
                            self.end = Some(PageEnd::Overflow);
                            stream.unread(text)?;
                            continue;
                        }
                    }
                    self.print(canvas, text);
                }
            }
        }

        Ok(self.end.unwrap_or(PageEnd::SourceEof))
    }

    fn line_break(&mut self) {
        self.x = 0;
        self.y = self
            .y
            .saturating_add(self.font.line_height())
            .saturating_add(self.vspace);
    }

    fn print<C: Canvas + ?Sized>(&mut self, canvas: &mut C, text: &str) {
        for ch in text.chars() {
            let glyph = self.font.glyph(ch);
            canvas.draw(
                &glyph.bitmap,
                self.origin.0 + self.x + glyph.x_offset,
                self.origin.1 + self.y + glyph.y_offset,
            );
            self.x += glyph.advance;
        }
    }

    /// Pen position relative to the top-left of the area, `y` being the baseline
    pub fn cursor(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// 1 if the page ended because of a page break marker, 0 otherwise
    pub fn break_count(&self) -> usize {
        self.break_count
    }

    pub fn is_done(&self) -> bool {
        self.end.is_some()
    }
}
