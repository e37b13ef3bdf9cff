use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{debug, info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use txt_pages::layout::{Area, CanvasSize, LayoutConfig};
use txt_pages::{
    Bitmap, Canvas, Font, GlyphSource, ImageFormat, PaginationConfig, Paginator, RasterFont,
    StatusLine, TextStream,
};

/// Convert plain text files into a series of page images.
#[derive(Debug, Parser)]
#[command(name = "txt-pages", version, about, long_about = None)]
struct Cli {
    /// Text file to convert
    text_file: PathBuf,

    /// TrueType font used to render the text
    #[arg(short, long, default_value = "VeraMono.ttf")]
    font: PathBuf,

    /// Font size in pixels
    #[arg(short, long, default_value_t = 10)]
    size: u32,

    /// Directory the page images are written to
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Image format of the pages: jpg, pgm, or png
    #[arg(short = 't', long = "type", default_value_t = ImageFormat::Jpeg)]
    format: ImageFormat,

    /// Add an inverted status line with the page number to the bottom of every page
    #[arg(short = 'l', long)]
    status_line: bool,

    /// Limit text to the area WIDTHxHEIGHT+X+Y of the canvas
    #[arg(short, long)]
    area: Option<Area>,

    /// Title shown in the status line
    #[arg(short = 'n', long)]
    title: Option<String>,

    /// Size of every page, WIDTHxHEIGHT
    #[arg(short, long, default_value_t = CanvasSize::default())]
    canvas: CanvasSize,

    /// Extra pixels between lines
    #[arg(short, long, default_value_t = 0)]
    vspace: u32,

    /// Page count shown in the status line, instead of counting the pages up front
    #[arg(long)]
    total_pages: Option<usize>,

    /// Print information about the text instead of writing pages
    #[arg(short, long)]
    info: bool,

    /// Log every page as it is laid out
    #[arg(long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        if self.quiet {
            LevelFilter::Error
        } else if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    fn run(self) -> Result<()> {
        let text = std::fs::read_to_string(&self.text_file)
            .with_context(|| format!("failed to read {}", self.text_file.display()))?;

        let font = Font::load_file(&self.font)
            .with_context(|| format!("failed to load font {}", self.font.display()))?;
        if let Some(name) = font.name() {
            debug!("using {name} at {}px", self.size);
        }
        let mut font = RasterFont::new(font, self.size).context("failed to rasterize font")?;
        font.preload(text.chars());

        let area = self
            .area
            .unwrap_or_else(|| Area::default_for(self.canvas, font.line_height()));
        let config = PaginationConfig {
            layout: LayoutConfig {
                vspace: self.vspace,
                area,
            },
            status: self.status_line.then(|| StatusLine {
                title: self.title.clone(),
                total_pages: self.total_pages,
            }),
        };
        let paginator = Paginator::new(&font, config)
            .with_context(|| format!("can't lay out text in {area}"))?;

        if self.info {
            let summary = paginator.count_pages(
                TextStream::new(text.as_str()),
                self.canvas.width,
                self.canvas.height,
            )?;
            println!("pages:      {}", summary.pages);
            println!("chapters:   {}", summary.chapters);
            println!("lines:      {}", summary.lines);
            println!("characters: {}", text.chars().count());
            return Ok(());
        }

        let Some(output) = self.output else {
            bail!("no --output directory given");
        };
        std::fs::create_dir_all(&output)
            .with_context(|| format!("failed to create {}", output.display()))?;

        let mut canvas = Bitmap::new(self.canvas.width, self.canvas.height)?;
        let mut stream = TextStream::new(text);
        let summary = paginator.paginate(&mut stream, &mut canvas, |page, canvas| {
            let path = output.join(format!(
                "{:02}_{:04}.{}",
                page.chapter,
                page.page,
                self.format.extension()
            ));
            info!("Writing: {}", path.display());
            canvas.save(&path, self.format)
        })?;

        info!(
            "wrote {} pages in {} chapters to {}",
            summary.pages,
            summary.chapters,
            output.display()
        );
        Ok(())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    TermLogger::init(
        cli.log_level(),
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    cli.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_spacing_cannot_be_negative() {
        assert!(Cli::try_parse_from(["txt-pages", "--vspace=-3", "book.txt"]).is_err());

        let cli = Cli::try_parse_from(["txt-pages", "--vspace=3", "book.txt"]).expect("parses");
        assert_eq!(cli.vspace, 3);
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["txt-pages", "book.txt"]).expect("parses");
        assert_eq!(cli.canvas, CanvasSize::default());
        assert_eq!(cli.format, ImageFormat::Jpeg);
        assert_eq!(cli.size, 10);
        assert_eq!(cli.log_level(), LevelFilter::Info);
    }
}
