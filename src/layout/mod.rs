//! Text layout: placing the words of a [TextStream](crate::TextStream) onto a page.
//!
//! Layout works in whole pixels, with the origin at the top-left of the canvas and y
//! growing downwards. The pen position tracked by a [Renderer] is the start of the
//! baseline, so a text area whose `y` is one line height down puts the first line of text
//! at the very top of the canvas.
//!
//! # Example
//!
//! ```no_run
//! use txt_pages::layout::{LayoutConfig, Renderer};
//! use txt_pages::{Bitmap, Font, RasterFont, TextStream};
//!
//! let font = Font::load_file("VeraMono.ttf").expect("can load font");
//! let font = RasterFont::new(font, 12).expect("can rasterize font");
//! let mut canvas = Bitmap::new(480, 272).expect("can create canvas");
//! let mut stream = TextStream::new("Hello, world!");
//!
//! let config = LayoutConfig {
//!     vspace: 2,
//!     area: "460x240+10+16".parse().expect("valid area"),
//! };
//! Renderer::new(&font, &config)
//!     .render(&mut canvas, &mut stream)
//!     .expect("can lay out text");
//! ```

mod area;
mod renderer;

pub use area::*;
pub use renderer::*;
