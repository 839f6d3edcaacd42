use super::RenderMode;
use crate::error::{RenderError, Result};
use crate::terminal::TerminalExtent;

/// Which dimension of the terminal bounds the fitted grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitBranch {
    /// The grid spans every column; rows follow from the aspect ratio.
    Width,
    /// The grid spans every row; columns follow from the aspect ratio.
    Height,
}

/// Output geometry chosen for one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FittedGrid {
    pub cells_wide: u32,
    pub cells_tall: u32,
    pub branch: FitBranch,
}

/// Fit an `image_width` x `image_height` image into `extent` so that it
/// fills the terminal without overflowing it.
///
/// A character cell is roughly twice as tall as it is wide. Half-block
/// mode packs two source rows into each cell, which makes every half
/// close to square; the vertical pixel budget per terminal row is then
/// doubled, so the grid grows twice as wide relative to its row count as
/// a flat grid of the same image.
pub fn fit(
    image_width: u32,
    image_height: u32,
    extent: TerminalExtent,
    mode: RenderMode,
) -> Result<FittedGrid> {
    if image_width == 0 || image_height == 0 || extent.columns == 0 || extent.rows == 0 {
        return Err(RenderError::Geometry {
            image_width,
            image_height,
            columns: extent.columns,
            rows: extent.rows,
        });
    }

    let columns = f64::from(extent.columns);
    let rows = f64::from(extent.rows);
    let rows_per_cell = f64::from(mode.rows_per_cell());
    let pixel_aspect = f64::from(image_width) / f64::from(image_height);

    // Both sides as height over width, the terminal's in pixel rows.
    let terminal_aspect = rows * rows_per_cell / columns;
    let image_aspect = pixel_aspect.recip();

    let grid = if terminal_aspect <= image_aspect {
        let cells_wide = (rows * rows_per_cell * pixel_aspect).round();
        FittedGrid {
            cells_wide: clamp_cells(cells_wide, extent.columns),
            cells_tall: u32::from(extent.rows),
            branch: FitBranch::Height,
        }
    } else {
        let cells_tall = (columns / (rows_per_cell * pixel_aspect)).round();
        FittedGrid {
            cells_wide: u32::from(extent.columns),
            cells_tall: clamp_cells(cells_tall, extent.rows),
            branch: FitBranch::Width,
        }
    };

    log::debug!(
        "Fitted {}x{} image into {}x{} cells ({:?}-fit, terminal {}x{}, {:?})",
        image_width,
        image_height,
        grid.cells_wide,
        grid.cells_tall,
        grid.branch,
        extent.columns,
        extent.rows,
        mode
    );

    Ok(grid)
}

fn clamp_cells(value: f64, bound: u16) -> u32 {
    // Extreme aspect ratios can round to zero; keep at least one cell.
    (value as u32).clamp(1, u32::from(bound))
}
