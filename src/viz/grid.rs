//! Tiling of image batches into a single grid for inspection.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use burn::prelude::*;

use crate::error::Result;

/// Pixels of padding between tiles.
const TILE_PADDING: usize = 2;

/// A rendered grid of images, pixel values in `[0, 1]` interleaved by channel.
#[derive(Debug, Clone)]
pub struct ImageGrid {
    width: usize,
    height: usize,
    channels: usize,
    pixels: Vec<f32>,
}

impl ImageGrid {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn get(&self, x: usize, y: usize, channel: usize) -> f32 {
        self.pixels[(y * self.width + x) * self.channels + channel]
    }

    /// Write as binary PPM: greyscale P5 for one channel, RGB P6 for three.
    pub fn write_ppm(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        let magic = if self.channels == 1 { "P5" } else { "P6" };
        write!(writer, "{}\n{} {}\n255\n", magic, self.width, self.height)?;

        let bytes: Vec<u8> = self
            .pixels
            .iter()
            .map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
            .collect();
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }
}

/// Tile a batch `[N, C, H, W]` into a grid with `cols` images per row.
///
/// Three or more channels render as RGB from the first three; anything else
/// renders the first channel as greyscale. Values are clamped to `[0, 1]` and
/// the gap between tiles is filled with black.
pub fn make_grid<B: Backend>(tensor: &Tensor<B, 4>, cols: usize) -> ImageGrid {
    let [n, c, h, w] = tensor.dims();
    let cols = cols.max(1).min(n.max(1));
    let rows = n.div_ceil(cols);
    let out_channels = if c >= 3 { 3 } else { 1 };

    let grid_w = cols * w + (cols + 1) * TILE_PADDING;
    let grid_h = rows * h + (rows + 1) * TILE_PADDING;
    let mut pixels = vec![0.0f32; grid_w * grid_h * out_channels];

    let data: Vec<f32> = tensor.to_data().to_vec().unwrap();
    let plane = h * w;
    let image_stride = c * plane;

    for i in 0..n {
        let tile_x = TILE_PADDING + (i % cols) * (w + TILE_PADDING);
        let tile_y = TILE_PADDING + (i / cols) * (h + TILE_PADDING);
        for y in 0..h {
            for x in 0..w {
                for ch in 0..out_channels {
                    let value = data[i * image_stride + ch * plane + y * w + x];
                    let out =
                        ((tile_y + y) * grid_w + tile_x + x) * out_channels + ch;
                    pixels[out] = value.clamp(0.0, 1.0);
                }
            }
        }
    }

    ImageGrid {
        width: grid_w,
        height: grid_h,
        channels: out_channels,
        pixels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_grid_dimensions() {
        let device = Default::default();
        let tensor =
            Tensor::<TestBackend, 4>::from_data(TensorData::new(vec![0.5f32; 5 * 4 * 4], [5, 1, 4, 4]), &device);

        let grid = make_grid(&tensor, 2);
        // 2 columns x 3 rows of 4x4 tiles plus padding
        assert_eq!(grid.width(), 2 * 4 + 3 * TILE_PADDING);
        assert_eq!(grid.height(), 3 * 4 + 4 * TILE_PADDING);
        assert_eq!(grid.channels(), 1);

        // Padding stays black, tile interior carries the value
        assert_eq!(grid.get(0, 0, 0), 0.0);
        assert_eq!(grid.get(TILE_PADDING, TILE_PADDING, 0), 0.5);
    }

    #[test]
    fn test_grid_rgb_and_clamp() {
        let device = Default::default();
        let mut values = vec![0.0f32; 3 * 2 * 2];
        values[0] = 2.0; // red channel, clamped to 1
        values[4] = -1.0; // green channel, clamped to 0
        let tensor =
            Tensor::<TestBackend, 4>::from_data(TensorData::new(values, [1, 3, 2, 2]), &device);

        let grid = make_grid(&tensor, 4);
        assert_eq!(grid.channels(), 3);
        assert_eq!(grid.get(TILE_PADDING, TILE_PADDING, 0), 1.0);
        assert_eq!(grid.get(TILE_PADDING, TILE_PADDING, 1), 0.0);
    }

    #[test]
    fn test_write_ppm() {
        let device = Default::default();
        let tensor =
            Tensor::<TestBackend, 4>::from_data(TensorData::new(vec![1.0f32; 4], [1, 1, 2, 2]), &device);
        let grid = make_grid(&tensor, 1);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.ppm");
        grid.write_ppm(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"P5\n"));
        let expected = grid.width() * grid.height();
        assert!(bytes.len() > expected);
    }
}
