pub mod colorizer;
pub mod compositor;
pub mod geometry;
pub mod sampler;

pub use colorizer::{Cell, CellSample, Colorizer, FlatBlock, HalfBlock, LuminanceAscii};
pub use compositor::{render, render_to_string};
pub use geometry::{FitBranch, FittedGrid, fit};
pub use sampler::Sampler;

use std::io::Write;

use serde::Deserialize;

use crate::error::{RenderError, Result};
use crate::source::SourceImage;
use crate::terminal::TerminalExtent;

/// How a cell's colors and glyph are derived. Fixed for a whole render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RenderMode {
    /// Two stacked colors per cell with the upper half block glyph
    #[default]
    HalfBlock,
    /// One background color per cell
    FlatBlock,
    /// Uncolored glyphs chosen by luminance
    #[serde(rename = "ascii", alias = "luminance-ascii")]
    #[value(name = "ascii", alias = "luminance-ascii")]
    LuminanceAscii,
}

impl RenderMode {
    /// Source rows packed into one terminal row.
    pub fn rows_per_cell(self) -> u32 {
        match self {
            RenderMode::HalfBlock => 2,
            RenderMode::FlatBlock | RenderMode::LuminanceAscii => 1,
        }
    }

    /// Build the strategy for this mode. `ramp` only matters for ASCII.
    pub fn colorizer(self, ramp: &str) -> Result<Box<dyn Colorizer>> {
        Ok(match self {
            RenderMode::HalfBlock => Box::new(HalfBlock),
            RenderMode::FlatBlock => Box::new(FlatBlock),
            RenderMode::LuminanceAscii => Box::new(LuminanceAscii::new(ramp)?),
        })
    }
}

/// Settings for one render, resolved from flags and config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub mode: RenderMode,
    pub ramp: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            mode: RenderMode::default(),
            ramp: colorizer::DEFAULT_RAMP.to_string(),
        }
    }
}

/// Fit `image` into `extent` and stream it to `out`.
pub fn render_image<W: Write + ?Sized>(
    image: &SourceImage,
    extent: TerminalExtent,
    options: &RenderOptions,
    out: &mut W,
) -> Result<FittedGrid> {
    let colorizer = options.mode.colorizer(&options.ramp)?;
    let grid = fit(image.width(), image.height(), extent, options.mode)?;

    compositor::render(image, &grid, colorizer.as_ref(), out).map_err(RenderError::Output)?;

    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_mode_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            mode: RenderMode,
        }

        let parse = |s: &str| toml::from_str::<Wrapper>(&format!("mode = \"{s}\"")).map(|w| w.mode);
        assert_eq!(parse("half-block").unwrap(), RenderMode::HalfBlock);
        assert_eq!(parse("flat-block").unwrap(), RenderMode::FlatBlock);
        assert_eq!(parse("ascii").unwrap(), RenderMode::LuminanceAscii);
        assert_eq!(parse("luminance-ascii").unwrap(), RenderMode::LuminanceAscii);
        assert!(parse("sixel").is_err());
    }

    #[test]
    fn test_colorizer_matches_mode() {
        for mode in [RenderMode::HalfBlock, RenderMode::FlatBlock, RenderMode::LuminanceAscii] {
            let colorizer = mode.colorizer(colorizer::DEFAULT_RAMP).unwrap();
            assert_eq!(colorizer.rows_per_cell(), mode.rows_per_cell());
        }
        assert!(RenderMode::LuminanceAscii.colorizer("x").is_err());
        // The ramp is irrelevant outside ASCII mode.
        assert!(RenderMode::FlatBlock.colorizer("x").is_ok());
    }

    #[test]
    fn test_render_image_quad_scenario() {
        let mut pixels = RgbImage::new(2, 2);
        pixels.put_pixel(0, 0, Rgb([255, 0, 0]));
        pixels.put_pixel(1, 0, Rgb([0, 255, 0]));
        pixels.put_pixel(0, 1, Rgb([0, 0, 255]));
        pixels.put_pixel(1, 1, Rgb([255, 255, 0]));
        let image = SourceImage::from_rgb(pixels);

        let extent = TerminalExtent::new(1, 2).reserve(1);
        let mut out = Vec::new();
        let grid = render_image(&image, extent, &RenderOptions::default(), &mut out).unwrap();

        assert_eq!((grid.cells_wide, grid.cells_tall), (1, 1));
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\x1b[38;2;255;0;0m\x1b[48;2;0;0;255m\u{2580}\x1b[0m\n"
        );
    }

    #[test]
    fn test_write_failure_is_output_error() {
        struct FullDisk;

        impl Write for FullDisk {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("No space left on device"))
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let image = SourceImage::from_rgb(RgbImage::new(4, 4));
        let result = render_image(
            &image,
            TerminalExtent::new(4, 4),
            &RenderOptions::default(),
            &mut FullDisk,
        );
        match result {
            Err(err @ RenderError::Output(_)) => {
                assert_eq!(err.to_string(), "failed to write output: No space left on device")
            }
            other => panic!("expected output error, got {other:?}"),
        }
    }

    #[test]
    fn test_render_image_rejects_degenerate_extent() {
        let image = SourceImage::from_rgb(RgbImage::new(4, 4));
        let extent = TerminalExtent::new(80, 1).reserve(1);
        let result = render_image(&image, extent, &RenderOptions::default(), &mut Vec::new());
        assert!(matches!(result, Err(RenderError::Geometry { .. })));
    }
}
