use crate::PagerError;
use derive_more::Display;
use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::{GrayImage, ImageEncoder, Luma};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::str::FromStr;

const PAPER: Luma<u8> = Luma([255]);

/// File formats a page can be written as
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq, Default)]
pub enum ImageFormat {
    #[default]
    #[display("jpg")]
    Jpeg,
    /// Binary portable graymap
    #[display("pgm")]
    Pgm,
    #[display("png")]
    Png,
}

impl ImageFormat {
    /// The file extension used for pages written in this format
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Pgm => "pgm",
            ImageFormat::Png => "png",
        }
    }
}

impl FromStr for ImageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
            "pgm" => Ok(ImageFormat::Pgm),
            "png" => Ok(ImageFormat::Png),
            other => Err(format!("unsupported image type {other:?}, expected jpg, pgm, or png")),
        }
    }
}

/// A mutable greyscale surface that glyphs get composited onto
pub trait Canvas {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Composite `image` with its top-left corner at `(x, y)`. Anything falling outside the
    /// canvas is clipped.
    fn draw(&mut self, image: &GrayImage, x: i32, y: i32);

    /// Invert every pixel in the given rectangle, clipped to the canvas
    fn invert(&mut self, x: i32, y: i32, width: u32, height: u32);

    /// Reset the canvas to blank paper
    fn clear(&mut self);

    fn save(&self, path: &Path, format: ImageFormat) -> Result<(), PagerError>;
}

/// Clip the span `[start, start + len)` to `[0, limit)`
fn clip(start: i32, len: u32, limit: u32) -> std::ops::Range<u32> {
    let lo = start.clamp(0, limit as i32) as u32;
    let hi = (start as i64 + len as i64).clamp(0, limit as i64) as u32;
    lo..hi.max(lo)
}

/// A [Canvas] backed by an in-memory greyscale image, black ink on white paper
#[derive(Debug, Clone)]
pub struct Bitmap {
    pub image: GrayImage,
}

impl Bitmap {
    pub fn new(width: u32, height: u32) -> Result<Bitmap, PagerError> {
        if width == 0 || height == 0 {
            return Err(PagerError::EmptyCanvas);
        }
        Ok(Bitmap {
            image: GrayImage::from_pixel(width, height, PAPER),
        })
    }
}

impl Canvas for Bitmap {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn draw(&mut self, image: &GrayImage, x: i32, y: i32) {
        let columns = clip(x, image.width(), self.width());
        let rows = clip(y, image.height(), self.height());
        for cy in rows {
            for cx in columns.clone() {
                let src = image.get_pixel(
                    (cx as i64 - x as i64) as u32,
                    (cy as i64 - y as i64) as u32,
                );
                let dst = self.image.get_pixel_mut(cx, cy);
                // darken: ink only ever adds to what's there
                dst.0[0] = dst.0[0].min(src.0[0]);
            }
        }
    }

    fn invert(&mut self, x: i32, y: i32, width: u32, height: u32) {
        let columns = clip(x, width, self.width());
        let rows = clip(y, height, self.height());
        for cy in rows {
            for cx in columns.clone() {
                let pixel = self.image.get_pixel_mut(cx, cy);
                pixel.0[0] = 255 - pixel.0[0];
            }
        }
    }

    fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = PAPER;
        }
    }

    fn save(&self, path: &Path, format: ImageFormat) -> Result<(), PagerError> {
        match format {
            ImageFormat::Jpeg => self.image.save_with_format(path, image::ImageFormat::Jpeg)?,
            ImageFormat::Png => self.image.save_with_format(path, image::ImageFormat::Png)?,
            ImageFormat::Pgm => {
                let out = BufWriter::new(File::create(path)?);
                PnmEncoder::new(out)
                    .with_subtype(PnmSubtype::Graymap(SampleEncoding::Binary))
                    .write_image(
                        self.image.as_raw(),
                        self.width(),
                        self.height(),
                        image::ColorType::L8,
                    )?;
            }
        }
        Ok(())
    }
}

/// A [Canvas] that discards everything drawn on it, for measuring layouts without paying
/// for compositing
#[derive(Debug, Copy, Clone)]
pub struct NullCanvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas for NullCanvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn draw(&mut self, _image: &GrayImage, _x: i32, _y: i32) {}

    fn invert(&mut self, _x: i32, _y: i32, _width: u32, _height: u32) {}

    fn clear(&mut self) {}

    fn save(&self, _path: &Path, _format: ImageFormat) -> Result<(), PagerError> {
        Ok(())
    }
}
