use crate::canvas::{Canvas, NullCanvas};
use crate::font::GlyphSource;
use crate::layout::{Area, LayoutConfig, PageEnd, Renderer};
use crate::stream::TextStream;
use crate::PagerError;
use log::debug;

/// Settings for the inverted status line drawn at the bottom of every page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLine {
    /// Shown in front of the page number
    pub title: Option<String>,
    /// Number of pages the document has. Worked out with a dry run of the layout if not set.
    pub total_pages: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationConfig {
    pub layout: LayoutConfig,
    pub status: Option<StatusLine>,
}

/// Describes a page that has just been laid out
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PageInfo {
    /// 1-based page number, counting across the whole document
    pub page: usize,
    /// 1-based chapter number; page breaks start new chapters
    pub chapter: usize,
    /// Why layout of this page stopped
    pub end: PageEnd,
    /// Number of source lines consumed by the end of this page
    pub line: usize,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub pages: usize,
    /// Chapter of the last page
    pub chapters: usize,
    /// Source lines consumed
    pub lines: usize,
}

/// Build the text of the status line, e.g. `"Title - Page  3/12 - 25%"`
pub fn status_text(title: Option<&str>, page: usize, total: usize) -> String {
    let percent = (100 * page).checked_div(total).unwrap_or(100);
    let status = format!("Page {page:>2}/{total} - {percent:>2}%");
    match title {
        Some(title) if !title.is_empty() => format!("{title} - {status}"),
        _ => status,
    }
}

/// Splits a whole document into pages, one [Renderer] per page, all of them reading from
/// the same [TextStream]
pub struct Paginator<'f, G: GlyphSource + ?Sized> {
    font: &'f G,
    config: PaginationConfig,
}

impl<'f, G: GlyphSource + ?Sized> Paginator<'f, G> {
    pub fn new(font: &'f G, config: PaginationConfig) -> Result<Paginator<'f, G>, PagerError> {
        if config.layout.area.is_empty() {
            return Err(PagerError::EmptyCanvas);
        }
        // lines have to move down the page, or it never fills up
        let line_height = font.line_height();
        if line_height <= 0 {
            return Err(PagerError::InvalidLineHeight(line_height));
        }
        Ok(Paginator { font, config })
    }

    /// Lay out `stream` page by page until it runs dry. After each page has been drawn
    /// (including its status line), `on_page` is called so the canvas can be saved; the
    /// canvas is cleared afterwards, ready for the next page.
    pub fn paginate<C, F>(
        &self,
        stream: &mut TextStream,
        canvas: &mut C,
        mut on_page: F,
    ) -> Result<Summary, PagerError>
    where
        C: Canvas + ?Sized,
        F: FnMut(&PageInfo, &mut C) -> Result<(), PagerError>,
    {
        let total = match &self.config.status {
            Some(StatusLine {
                total_pages: Some(total),
                ..
            }) => Some(*total),
            Some(_) => {
                let counted = self.count_pages(stream.clone(), canvas.width(), canvas.height())?;
                Some(counted.pages)
            }
            None => None,
        };

        let mut summary = Summary::default();
        let mut chapter = 1;

        while !stream.eof() {
            let start = stream.position();

            let mut renderer = Renderer::new(self.font, &self.config.layout);
            let end = renderer.render(canvas, stream)?;

            if stream.position() == start {
                let word = stream.clone().read_word().unwrap_or_default();
                return Err(PagerError::AreaTooSmall { word });
            }

            summary.pages += 1;
            let info = PageInfo {
                page: summary.pages,
                chapter,
                end,
                line: stream.line(),
            };
            debug!(
                "page {} (chapter {}) ended by {:?} at line {}",
                info.page, info.chapter, info.end, info.line
            );

            if let (Some(status), Some(total)) = (&self.config.status, total) {
                self.stamp_status(canvas, status.title.as_deref(), info.page, total)?;
            }

            on_page(&info, canvas)?;
            canvas.clear();

            summary.chapters = chapter;
            summary.lines = info.line;
            chapter += renderer.break_count();
        }

        Ok(summary)
    }

    /// Lay out `stream` without drawing anything, to find out how many pages it takes on a
    /// canvas of the given size
    pub fn count_pages(
        &self,
        mut stream: TextStream,
        width: u32,
        height: u32,
    ) -> Result<Summary, PagerError> {
        let counter = Paginator {
            font: self.font,
            config: PaginationConfig {
                layout: self.config.layout,
                status: None,
            },
        };
        counter.paginate(&mut stream, &mut NullCanvas { width, height }, |_, _| Ok(()))
    }

    /// Draw the status line centered in the bottom line of the canvas, then invert that line
    fn stamp_status<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        title: Option<&str>,
        page: usize,
        total: usize,
    ) -> Result<(), PagerError> {
        let text = status_text(title, page, total);
        let line_height = self.font.line_height();
        let width = canvas.width() as i32;
        let height = canvas.height() as i32;

        let config = LayoutConfig {
            vspace: self.config.layout.vspace,
            area: Area {
                x: width / 2 - self.font.width_of(&text) / 2,
                y: height - line_height + self.font.glyph('M').bitmap.height() as i32 + 2,
                width,
                height,
            },
        };
        let mut status = TextStream::new(text);
        Renderer::new(self.font, &config).render(canvas, &mut status)?;

        canvas.invert(0, height - line_height, width as u32, line_height.max(0) as u32);
        Ok(())
    }
}
