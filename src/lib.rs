//! Lay out plain text documents onto a series of fixed-size greyscale pages.
//!
//! A document is read as a [TextStream] of words and whitespace, which a [Paginator] feeds
//! through one [Renderer](layout::Renderer) per page. Each renderer wraps words greedily
//! inside a text area, aligns tabs to stops eight spaces apart, and stops when the page is
//! full or when it reads the [PAGE_BREAK] marker, which also starts a new chapter.

mod canvas;
pub use canvas::*;

mod error;
pub use error::*;

mod font;
pub use font::*;

/// Placing words on a single page
pub mod layout;

mod paginate;
pub use paginate::*;

mod stream;
pub use stream::*;
