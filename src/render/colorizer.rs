use std::fmt;

use image::Rgb;

use crate::error::{RenderError, Result};

/// Upper half block: foreground paints the top, background the bottom.
pub const UPPER_HALF_BLOCK: char = '\u{2580}';

/// Default luminance ramp, darkest glyph first.
pub const DEFAULT_RAMP: &str = "@%#*+=-:.";

pub const SGR_RESET: &str = "\x1b[0m";

/// Source colors picked by the sampler for one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellSample {
    Single(Rgb<u8>),
    Stacked { top: Rgb<u8>, bottom: Rgb<u8> },
}

impl CellSample {
    /// The color standing for the whole cell: the top one when stacked.
    pub fn primary(&self) -> Rgb<u8> {
        match *self {
            CellSample::Single(color) => color,
            CellSample::Stacked { top, .. } => top,
        }
    }
}

/// One rendered terminal cell. Displays as truecolor SGR codes followed
/// by the glyph; colors left as `None` keep the terminal default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub foreground: Option<Rgb<u8>>,
    pub background: Option<Rgb<u8>>,
    pub glyph: char,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(Rgb([r, g, b])) = self.foreground {
            write!(f, "\x1b[38;2;{};{};{}m", r, g, b)?;
        }
        if let Some(Rgb([r, g, b])) = self.background {
            write!(f, "\x1b[48;2;{};{};{}m", r, g, b)?;
        }
        write!(f, "{}", self.glyph)
    }
}

/// Strategy turning sampled colors into a [`Cell`].
pub trait Colorizer {
    /// Source rows packed into one terminal row.
    fn rows_per_cell(&self) -> u32 {
        1
    }

    fn colorize(&self, sample: CellSample) -> Cell;
}

/// Two stacked colors per cell using the upper half block glyph.
#[derive(Debug, Clone, Copy, Default)]
pub struct HalfBlock;

impl Colorizer for HalfBlock {
    fn rows_per_cell(&self) -> u32 {
        2
    }

    fn colorize(&self, sample: CellSample) -> Cell {
        let (top, bottom) = match sample {
            CellSample::Stacked { top, bottom } => (top, bottom),
            CellSample::Single(color) => (color, color),
        };
        Cell {
            foreground: Some(top),
            background: Some(bottom),
            glyph: UPPER_HALF_BLOCK,
        }
    }
}

/// A space on a colored background.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatBlock;

impl Colorizer for FlatBlock {
    fn colorize(&self, sample: CellSample) -> Cell {
        Cell {
            foreground: None,
            background: Some(sample.primary()),
            glyph: ' ',
        }
    }
}

/// Uncolored glyphs picked from a dark-to-light ramp by luminance.
#[derive(Debug, Clone)]
pub struct LuminanceAscii {
    ramp: Vec<char>,
}

impl LuminanceAscii {
    pub fn new(ramp: &str) -> Result<Self> {
        let ramp: Vec<char> = ramp.chars().collect();
        if ramp.len() < 2 {
            return Err(RenderError::InvalidRamp(ramp.into_iter().collect()));
        }
        Ok(LuminanceAscii { ramp })
    }

    /// `floor(L / 255 * (len - 1))` for `L = 0.2126 R + 0.7152 G + 0.0722 B`,
    /// evaluated in fixed point so pure white lands on the last glyph.
    pub fn glyph_for(&self, color: Rgb<u8>) -> char {
        let steps = (self.ramp.len() - 1) as u64;
        let index = luminance_fixed(color) * steps / LUMINANCE_FIXED_MAX;
        self.ramp[index as usize]
    }
}

impl Default for LuminanceAscii {
    fn default() -> Self {
        LuminanceAscii {
            ramp: DEFAULT_RAMP.chars().collect(),
        }
    }
}

impl Colorizer for LuminanceAscii {
    fn colorize(&self, sample: CellSample) -> Cell {
        Cell {
            foreground: None,
            background: None,
            glyph: self.glyph_for(sample.primary()),
        }
    }
}

const LUMINANCE_FIXED_MAX: u64 = 255 * 10_000;

/// Rec. 709 luminance scaled by 10 000.
fn luminance_fixed(Rgb([r, g, b]): Rgb<u8>) -> u64 {
    2126 * u64::from(r) + 7152 * u64::from(g) + 722 * u64::from(b)
}
