use std::fmt::Write as _;
use std::io::{self, Write};

use super::colorizer::{CellSample, Colorizer, SGR_RESET};
use super::geometry::FittedGrid;
use super::sampler::Sampler;
use crate::source::SourceImage;

/// Emit `image` as `grid` cells to `out`, one terminal row at a time.
///
/// Rows are written top to bottom, cells left to right, and every row
/// ends with an SGR reset before the newline so colors never bleed into
/// the next line. Returns the number of skipped (out-of-bounds) cells.
pub fn render<W: Write + ?Sized>(
    image: &SourceImage,
    grid: &FittedGrid,
    colorizer: &dyn Colorizer,
    out: &mut W,
) -> io::Result<u64> {
    let sampler = Sampler::new(image, grid);
    let stacked = colorizer.rows_per_cell() > 1;
    let mut skipped = 0u64;
    let mut line = String::new();

    for cell_y in 0..grid.cells_tall {
        line.clear();
        for cell_x in 0..grid.cells_wide {
            let sample = if stacked {
                sampler
                    .sample_stacked(cell_x, cell_y)
                    .map(|(top, bottom)| CellSample::Stacked { top, bottom })
            } else {
                sampler.sample_single(cell_x, cell_y).map(CellSample::Single)
            };

            match sample {
                Some(sample) => {
                    // Writing into a String cannot fail.
                    let _ = write!(line, "{}", colorizer.colorize(sample));
                }
                None => skipped += 1,
            }
        }
        line.push_str(SGR_RESET);
        line.push('\n');
        out.write_all(line.as_bytes())?;
    }

    if skipped > 0 {
        log::trace!("Skipped {} out-of-bounds cells", skipped);
    }
    Ok(skipped)
}

/// Render the whole frame into a `String`.
pub fn render_to_string(image: &SourceImage, grid: &FittedGrid, colorizer: &dyn Colorizer) -> String {
    let mut buffer = Vec::new();
    // Vec<u8> as a writer is infallible.
    let _ = render(image, grid, colorizer, &mut buffer);
    String::from_utf8_lossy(&buffer).into_owned()
}
