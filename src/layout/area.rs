use crate::PagerError;
use derive_more::{Display, From};
use std::str::FromStr;

/// The rectangle of a canvas that text gets laid out in. Like the rest of the layout code,
/// coordinates are in pixels with the origin at the top-left and y growing downwards.
///
/// Written and parsed in X11 geometry style, `WxH+X+Y`.
#[derive(Debug, Display, From, Copy, Clone, PartialEq, Eq)]
#[display("{width}x{height}+{x}+{y}")]
pub struct Area {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Area {
    /// The area used when none is given: a 4 pixel margin on the left, and one line of
    /// text worth of space above and below (the bottom line is where the status line goes).
    /// Since layout positions the baseline, `y` being one line down puts the first line of
    /// text flush with the top of the canvas.
    pub fn default_for(canvas: CanvasSize, line_height: i32) -> Area {
        Area {
            x: 4,
            y: line_height,
            width: canvas.width as i32 - 4,
            height: canvas.height as i32 - line_height * 2,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

fn parse_dimensions(s: &str) -> Option<(i32, i32)> {
    let (w, h) = s.split_once('x')?;
    Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
}

impl FromStr for Area {
    type Err = PagerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PagerError::InvalidGeometry(s.to_string());

        let mut parts = s.split('+');
        let (width, height) = parts.next().and_then(parse_dimensions).ok_or_else(invalid)?;
        let mut offset = || -> Result<i32, PagerError> {
            parts
                .next()
                .and_then(|v| v.trim().parse().ok())
                .ok_or_else(invalid)
        };
        let x = offset()?;
        let y = offset()?;
        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Area {
            x,
            y,
            width,
            height,
        })
    }
}

/// Size of the canvas every page is drawn on, written `WxH`
#[derive(Debug, Display, From, Copy, Clone, PartialEq, Eq)]
#[display("{width}x{height}")]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasSize {
    fn default() -> Self {
        CanvasSize {
            width: 480,
            height: 272,
        }
    }
}

impl FromStr for CanvasSize {
    type Err = PagerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match parse_dimensions(s) {
            Some((width, height)) if width > 0 && height > 0 => Ok(CanvasSize {
                width: width as u32,
                height: height as u32,
            }),
            _ => Err(PagerError::InvalidGeometry(s.to_string())),
        }
    }
}
