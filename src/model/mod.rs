//! Model interface and prediction decomposition.
//!
//! The trainer drives any network implementing [`MultiViewModel`]; the
//! bundled [`MultiViewDecoder`] is a small reference implementation used by
//! tests and demos.

mod decoder;

pub use decoder::MultiViewDecoder;

use burn::prelude::*;

use crate::error::{MvDepthError, Result};

/// A network predicting per-view coordinate maps and mask logits from a
/// batched input image.
pub trait MultiViewModel<B: Backend> {
    /// Run the network.
    ///
    /// Input shape: [batch, channels, H, W]
    /// Output shapes: coordinates [batch, 3V, H, W], mask logits [batch, V, H, W]
    fn forward(&self, images: Tensor<B, 4>) -> (Tensor<B, 4>, Tensor<B, 4>);
}

/// A network prediction decomposed by fixed channel offsets.
///
/// The coordinate tensor packs, per view, X/Y position maps followed by depth
/// maps: channels `[0, 2V)` are XY, channels `[2V, 3V)` are depth.
#[derive(Debug, Clone)]
pub struct Prediction<B: Backend> {
    /// Predicted XY coordinate maps: [batch, 2V, H, W].
    pub xy: Tensor<B, 4>,
    /// Predicted depth maps: [batch, V, H, W].
    pub depth: Tensor<B, 4>,
    /// Raw mask logits: [batch, V, H, W].
    pub mask_logits: Tensor<B, 4>,
}

impl<B: Backend> Prediction<B> {
    /// Slice a raw network output into its XY / depth / mask parts.
    ///
    /// Fails with [`MvDepthError::ShapeMismatch`] when the channel counts do
    /// not match `3 * views` and `views`.
    pub fn split(
        coordinates: Tensor<B, 4>,
        mask_logits: Tensor<B, 4>,
        views: usize,
    ) -> Result<Self> {
        let coord_dims = coordinates.dims();
        if coord_dims[1] != 3 * views {
            return Err(MvDepthError::ShapeMismatch {
                expected: vec![coord_dims[0], 3 * views, coord_dims[2], coord_dims[3]],
                got: coord_dims.to_vec(),
            });
        }

        let logit_dims = mask_logits.dims();
        if logit_dims[1] != views {
            return Err(MvDepthError::ShapeMismatch {
                expected: vec![logit_dims[0], views, logit_dims[2], logit_dims[3]],
                got: logit_dims.to_vec(),
            });
        }

        let xy = coordinates.clone().narrow(1, 0, 2 * views);
        let depth = coordinates.narrow(1, 2 * views, views);

        Ok(Self {
            xy,
            depth,
            mask_logits,
        })
    }

    /// Binary mask obtained by thresholding the logits at zero.
    pub fn mask(&self) -> Tensor<B, 4, Bool> {
        self.mask_logits.clone().greater_elem(0.0)
    }

    /// Predicted depth with pixels outside the predicted mask zeroed.
    pub fn masked_depth(&self) -> Tensor<B, 4> {
        self.depth.clone().mask_fill(self.mask().bool_not(), 0.0)
    }
}
