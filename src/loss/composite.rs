//! Composite loss for the stage-one objective.

use burn::prelude::*;

use crate::config::CompositeLossConfig;
use crate::model::Prediction;

use super::coordinate::{l1_loss, masked_l1_loss};
use super::mask::bce_with_logits_loss;

/// The loss terms of one forward pass.
///
/// `total` carries the autodiff graph; the component tensors are kept so the
/// trainer can report them separately.
#[derive(Debug, Clone)]
pub struct LossBreakdown<B: Backend> {
    /// Coordinate/depth regression term.
    pub xyz: Tensor<B, 1>,
    /// Mask classification term.
    pub mask: Tensor<B, 1>,
    /// `mask + lambda_depth * xyz`.
    pub total: Tensor<B, 1>,
}

/// Composite loss calculator.
///
/// Combines the coordinate regression term (XY maps against the coordinate
/// grid, plus depth restricted to the predicted mask) with the mask
/// classification term, weighted by `lambda_depth`.
pub struct CompositeLoss {
    config: CompositeLossConfig,
}

impl CompositeLoss {
    /// Create a new composite loss calculator.
    pub fn new(config: CompositeLossConfig) -> Self {
        Self { config }
    }

    /// Compute all loss terms for one prediction.
    ///
    /// Shapes: `xy_targets` [batch, 2V, H, W], `depth_gt` and `mask_gt`
    /// [batch, V, H, W].
    pub fn forward<B: Backend>(
        &self,
        prediction: &Prediction<B>,
        xy_targets: Tensor<B, 4>,
        depth_gt: Tensor<B, 4>,
        mask_gt: Tensor<B, 4>,
    ) -> LossBreakdown<B> {
        let xyz = l1_loss(prediction.xy.clone(), xy_targets)
            + masked_l1_loss(prediction.depth.clone(), depth_gt, prediction.mask());
        let mask = bce_with_logits_loss(prediction.mask_logits.clone(), mask_gt);

        let total = mask.clone() + xyz.clone() * self.config.lambda_depth;

        LossBreakdown { xyz, mask, total }
    }

    /// Get the configuration.
    pub fn config(&self) -> &CompositeLossConfig {
        &self.config
    }
}
