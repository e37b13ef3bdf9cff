use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum PagerError {
    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsing(#[from] owned_ttf_parser::FaceParsingError),

    #[error(transparent)]
    /// [image] failed to encode or decode an image
    Image(#[from] image::ImageError),

    #[error("can only unread the most recently read word ({expected:?}), got {found:?}")]
    /// [TextStream::unread](crate::TextStream::unread) was called with something other than
    /// the result of the last [TextStream::read_word](crate::TextStream::read_word)
    UnreadMismatch {
        expected: Option<String>,
        found: String,
    },

    #[error("font has neither a replacement character nor a question mark glyph")]
    /// The font can't provide a fallback glyph for unmapped characters
    MissingFallbackGlyph,

    #[error("invalid geometry {0:?}")]
    /// A `WxH` or `WxH+X+Y` geometry string could not be parsed
    InvalidGeometry(String),

    #[error("canvas and text area must have a non-zero size")]
    /// A canvas or text area was requested with a zero width or height
    EmptyCanvas,

    #[error("font size must be at least one pixel")]
    /// A font was requested at a size of zero pixels
    InvalidFontSize,

    #[error("line height must be positive, got {0}")]
    /// The glyph source reported a line height that would never move down the page
    InvalidLineHeight(i32),

    #[error("text area is too small to fit the word {word:?} on an empty page")]
    /// A page finished without consuming any text, so pagination would never finish
    AreaTooSmall { word: String },
}
