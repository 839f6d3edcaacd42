use image::Rgb;

use super::geometry::FittedGrid;
use crate::source::SourceImage;

/// Nearest-neighbour mapping from grid cells to source pixels.
#[derive(Debug, Clone, Copy)]
pub struct Sampler<'a> {
    image: &'a SourceImage,
    scale_x: f64,
    scale_y: f64,
}

impl<'a> Sampler<'a> {
    pub fn new(image: &'a SourceImage, grid: &FittedGrid) -> Self {
        Sampler {
            image,
            scale_x: f64::from(image.width()) / f64::from(grid.cells_wide),
            scale_y: f64::from(image.height()) / f64::from(grid.cells_tall),
        }
    }

    /// Source pixel under the top-left of cell `(cell_x, cell_y)`.
    ///
    /// The result may lie outside the image when the grid overshoots it.
    pub fn source_coords(&self, cell_x: u32, cell_y: u32) -> (u32, u32) {
        let x = (f64::from(cell_x) * self.scale_x).floor() as u32;
        let y = (f64::from(cell_y) * self.scale_y).floor() as u32;
        (x, y)
    }

    /// Row of the lower half of a cell whose top half samples `top_row`.
    pub fn lower_row(&self, top_row: u32) -> u32 {
        top_row.saturating_add((self.scale_y / 2.0).floor() as u32)
    }

    /// One color per cell. `None` means the cell is skipped.
    pub fn sample_single(&self, cell_x: u32, cell_y: u32) -> Option<Rgb<u8>> {
        let (x, y) = self.source_coords(cell_x, cell_y);
        self.image.pixel(x, y)
    }

    /// Top and bottom colors for a half-block cell. `None` if either
    /// source row falls outside the image.
    pub fn sample_stacked(&self, cell_x: u32, cell_y: u32) -> Option<(Rgb<u8>, Rgb<u8>)> {
        let (x, y) = self.source_coords(cell_x, cell_y);
        let top = self.image.pixel(x, y)?;
        let bottom = self.image.pixel(x, self.lower_row(y))?;
        Some((top, bottom))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::geometry::FitBranch;
    use image::RgbImage;

    fn grid(cells_wide: u32, cells_tall: u32) -> FittedGrid {
        FittedGrid {
            cells_wide,
            cells_tall,
            branch: FitBranch::Width,
        }
    }

    fn quad() -> SourceImage {
        let mut pixels = RgbImage::new(2, 2);
        pixels.put_pixel(0, 0, Rgb([255, 0, 0]));
        pixels.put_pixel(1, 0, Rgb([0, 255, 0]));
        pixels.put_pixel(0, 1, Rgb([0, 0, 255]));
        pixels.put_pixel(1, 1, Rgb([255, 255, 0]));
        SourceImage::from_rgb(pixels)
    }

    #[test]
    fn test_single_cell_half_block_picks_both_rows() {
        let image = quad();
        let sampler = Sampler::new(&image, &grid(1, 1));

        assert_eq!((sampler.scale_x, sampler.scale_y), (2.0, 2.0));
        assert_eq!(
            sampler.sample_stacked(0, 0),
            Some((Rgb([255, 0, 0]), Rgb([0, 0, 255])))
        );
    }

    #[test]
    fn test_nearest_neighbour_coordinates() {
        let image = SourceImage::from_rgb(RgbImage::new(100, 50));
        let sampler = Sampler::new(&image, &grid(40, 20));

        assert_eq!(sampler.source_coords(0, 0), (0, 0));
        assert_eq!(sampler.source_coords(1, 1), (2, 2));
        assert_eq!(sampler.source_coords(3, 3), (7, 7));
        assert_eq!(sampler.source_coords(39, 19), (97, 47));
        assert_eq!(sampler.lower_row(7), 8);
    }

    #[test]
    fn test_upscaling_reuses_top_row_for_bottom() {
        let image = quad();
        let sampler = Sampler::new(&image, &grid(4, 4));

        assert_eq!(sampler.lower_row(1), 1);
        assert_eq!(
            sampler.sample_stacked(3, 3),
            Some((Rgb([255, 255, 0]), Rgb([255, 255, 0])))
        );
    }

    #[test]
    fn test_out_of_bounds_cells_are_skipped() {
        let image = quad();
        let sampler = Sampler::new(&image, &grid(2, 2));

        assert_eq!(sampler.sample_single(2, 0), None);
        assert_eq!(sampler.sample_single(0, 5), None);
        assert_eq!(sampler.sample_stacked(7, 7), None);
    }

    #[test]
    fn test_bottom_row_past_edge_is_skipped() {
        // 3 source rows over 1 cell row: lower half sits at row 1. With a
        // bounded view of only the top row, the lower half is outside.
        let pixels = RgbImage::from_pixel(1, 3, Rgb([9, 9, 9]));
        let view = SourceImage::with_bounds(
            pixels,
            crate::source::Bounds {
                x: 0,
                y: 0,
                width: 1,
                height: 1,
            },
        )
        .unwrap();
        let sampler = Sampler {
            image: &view,
            scale_x: 1.0,
            scale_y: 3.0,
        };

        assert_eq!(sampler.sample_single(0, 0), Some(Rgb([9, 9, 9])));
        assert_eq!(sampler.sample_stacked(0, 0), None);
    }

    #[test]
    fn test_sampling_is_deterministic() {
        let image = SourceImage::from_rgb(RgbImage::from_fn(37, 53, |x, y| {
            Rgb([x as u8, y as u8, (x * y) as u8])
        }));
        let sampler = Sampler::new(&image, &grid(11, 7));

        for cy in 0..7 {
            for cx in 0..11 {
                assert_eq!(sampler.source_coords(cx, cy), sampler.source_coords(cx, cy));
                assert_eq!(sampler.sample_stacked(cx, cy), sampler.sample_stacked(cx, cy));
            }
        }
    }
}
