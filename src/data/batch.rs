//! Batched training data.

use burn::prelude::*;

/// A batch of multi-view training data on a backend device.
#[derive(Debug, Clone)]
pub struct MultiViewBatch<B: Backend> {
    /// Input images: [batch, channels, H, W].
    pub images: Tensor<B, 4>,
    /// Ground-truth depth per view: [batch, V, H, W].
    pub depth_gt: Tensor<B, 4>,
    /// Ground-truth binary mask per view: [batch, V, H, W], values in {0, 1}.
    pub mask_gt: Tensor<B, 4>,
}

impl<B: Backend> MultiViewBatch<B> {
    /// Create a new batch from tensors.
    pub fn new(images: Tensor<B, 4>, depth_gt: Tensor<B, 4>, mask_gt: Tensor<B, 4>) -> Self {
        Self {
            images,
            depth_gt,
            mask_gt,
        }
    }

    /// Number of examples in this batch.
    pub fn batch_size(&self) -> usize {
        self.images.dims()[0]
    }

    /// Get the device of this batch.
    pub fn device(&self) -> B::Device {
        self.images.device()
    }
}
