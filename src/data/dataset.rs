//! In-memory dataset and batch iteration.

use burn::prelude::*;

use crate::error::{MvDepthError, Result};

use super::batch::MultiViewBatch;

/// Number of channels in the input images.
pub const IMAGE_CHANNELS: usize = 3;

/// One CPU-side training example.
///
/// Buffers are row-major: images as `[channel][row][col]`, depth and mask
/// as `[view][row][col]`. Mask values are 0.0 or 1.0.
#[derive(Debug, Clone)]
pub struct MultiViewSample {
    /// RGB input image, `3 * H * W` values.
    pub image: Vec<f32>,
    /// Ground-truth depth maps, `V * H * W` values.
    pub depth: Vec<f32>,
    /// Ground-truth masks, `V * H * W` values.
    pub mask: Vec<f32>,
}

/// A dataset of multi-view samples with a fixed geometry.
#[derive(Debug, Clone)]
pub struct MultiViewDataset {
    height: usize,
    width: usize,
    views: usize,
    samples: Vec<MultiViewSample>,
}

impl MultiViewDataset {
    /// Create an empty dataset for the given output geometry.
    pub fn new(height: usize, width: usize, views: usize) -> Self {
        Self {
            height,
            width,
            views,
            samples: Vec::new(),
        }
    }

    /// Output height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Output width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of views per sample.
    pub fn views(&self) -> usize {
        self.views
    }

    /// Add a sample, validating its buffer sizes against the geometry.
    pub fn push(&mut self, sample: MultiViewSample) -> Result<()> {
        let pixels = self.height * self.width;
        let image_len = IMAGE_CHANNELS * pixels;
        let view_len = self.views * pixels;

        if sample.image.len() != image_len {
            return Err(MvDepthError::SampleSizeMismatch {
                field: "image",
                expected: image_len,
                got: sample.image.len(),
            });
        }
        if sample.depth.len() != view_len {
            return Err(MvDepthError::SampleSizeMismatch {
                field: "depth",
                expected: view_len,
                got: sample.depth.len(),
            });
        }
        if sample.mask.len() != view_len {
            return Err(MvDepthError::SampleSizeMismatch {
                field: "mask",
                expected: view_len,
                got: sample.mask.len(),
            });
        }

        self.samples.push(sample);
        Ok(())
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Get a sample by index.
    pub fn get(&self, idx: usize) -> Option<&MultiViewSample> {
        self.samples.get(idx)
    }

    /// Iterate over samples.
    pub fn iter(&self) -> impl Iterator<Item = &MultiViewSample> {
        self.samples.iter()
    }

    /// Start an epoch over this dataset.
    ///
    /// With `shuffle_seed = Some(seed)` the sample order is permuted
    /// reproducibly; with `None` samples are visited in insertion order.
    pub fn batches(&self, batch_size: usize, shuffle_seed: Option<u64>) -> BatchIter<'_> {
        let mut order: Vec<usize> = (0..self.samples.len()).collect();

        if let Some(seed) = shuffle_seed {
            let mut state = seed;
            // LCG-driven Fisher-Yates, reproducible across platforms
            let mut rng = move || {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
                state >> 33
            };
            for i in (1..order.len()).rev() {
                let j = (rng() % (i as u64 + 1)) as usize;
                order.swap(i, j);
            }
        }

        BatchIter {
            dataset: self,
            order,
            position: 0,
            batch_size: batch_size.max(1),
        }
    }
}

/// Iterator over one epoch of a dataset, producing device batches.
pub struct BatchIter<'a> {
    dataset: &'a MultiViewDataset,
    order: Vec<usize>,
    position: usize,
    batch_size: usize,
}

impl<'a> BatchIter<'a> {
    /// Assemble the next batch, or `None` when the epoch is exhausted.
    ///
    /// The final batch of an epoch may be smaller than the configured size.
    pub fn next_batch<B: Backend>(&mut self, device: &B::Device) -> Option<MultiViewBatch<B>> {
        if self.position >= self.order.len() {
            return None;
        }

        let end = (self.position + self.batch_size).min(self.order.len());
        let indices = &self.order[self.position..end];
        self.position = end;

        let n = indices.len();
        let h = self.dataset.height();
        let w = self.dataset.width();
        let v = self.dataset.views();
        let pixels = h * w;

        let mut image_data = Vec::with_capacity(n * IMAGE_CHANNELS * pixels);
        let mut depth_data = Vec::with_capacity(n * v * pixels);
        let mut mask_data = Vec::with_capacity(n * v * pixels);

        for &idx in indices {
            let sample = &self.dataset.samples[idx];
            image_data.extend_from_slice(&sample.image);
            depth_data.extend_from_slice(&sample.depth);
            mask_data.extend_from_slice(&sample.mask);
        }

        let images = Tensor::from_data(
            TensorData::new(image_data, [n, IMAGE_CHANNELS, h, w]),
            device,
        );
        let depth_gt = Tensor::from_data(TensorData::new(depth_data, [n, v, h, w]), device);
        let mask_gt = Tensor::from_data(TensorData::new(mask_data, [n, v, h, w]), device);

        Some(MultiViewBatch::new(images, depth_gt, mask_gt))
    }
}
