//! Per-epoch image board combining inputs, predictions and ground truth.

use std::path::Path;

use burn::prelude::*;

use crate::data::MultiViewBatch;
use crate::error::Result;
use crate::model::{MultiViewModel, Prediction};
use crate::viz::grid::{make_grid, ImageGrid};

/// Images per row in each grid.
const GRID_COLS: usize = 8;

/// Six aligned grids rendered from one batch, first view only. Depth grids
/// are inverted so near surfaces render bright.
#[derive(Debug, Clone)]
pub struct ImageBoard {
    pub rgb: ImageGrid,
    pub depth: ImageGrid,
    pub depth_masked: ImageGrid,
    pub depth_gt: ImageGrid,
    pub mask: ImageGrid,
    pub mask_gt: ImageGrid,
}

impl ImageBoard {
    /// Write all six grids as PPM files into `dir`.
    pub fn save(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;
        self.rgb.write_ppm(&dir.join("rgb.ppm"))?;
        self.depth.write_ppm(&dir.join("depth.ppm"))?;
        self.depth_masked.write_ppm(&dir.join("depth_masked.ppm"))?;
        self.depth_gt.write_ppm(&dir.join("depth_gt.ppm"))?;
        self.mask.write_ppm(&dir.join("mask.ppm"))?;
        self.mask_gt.write_ppm(&dir.join("mask_gt.ppm"))?;
        Ok(())
    }
}

/// Run inference on `batch` and tile the results into an [`ImageBoard`].
pub fn render_board<B: Backend, M: MultiViewModel<B>>(
    model: &M,
    batch: &MultiViewBatch<B>,
    views: usize,
) -> Result<ImageBoard> {
    let (coordinates, mask_logits) = model.forward(batch.images.clone());
    let prediction = Prediction::split(coordinates, mask_logits, views)?;

    let depth = first_view(&prediction.depth);
    let depth_masked = first_view(&prediction.masked_depth());
    let depth_gt = first_view(&batch.depth_gt);
    let mask = first_view(&prediction.mask().float());
    let mask_gt = first_view(&batch.mask_gt);

    Ok(ImageBoard {
        rgb: make_grid(&batch.images, GRID_COLS),
        depth: make_grid(&invert(depth), GRID_COLS),
        depth_masked: make_grid(&invert(depth_masked), GRID_COLS),
        depth_gt: make_grid(&invert(depth_gt), GRID_COLS),
        mask: make_grid(&mask, GRID_COLS),
        mask_gt: make_grid(&mask_gt, GRID_COLS),
    })
}

fn first_view<B: Backend>(tensor: &Tensor<B, 4>) -> Tensor<B, 4> {
    tensor.clone().narrow(1, 0, 1)
}

fn invert<B: Backend>(tensor: Tensor<B, 4>) -> Tensor<B, 4> {
    tensor.neg().add_scalar(1.0)
}
