//! Coordinate and depth regression losses.

use burn::prelude::*;

/// Mean absolute error between two maps.
///
/// Input shapes: [batch, C, H, W]
/// Output: scalar loss
pub fn l1_loss<B: Backend>(pred: Tensor<B, 4>, target: Tensor<B, 4>) -> Tensor<B, 1> {
    (pred - target).abs().mean()
}

/// Mean absolute error restricted to masked elements.
///
/// L = sum(|pred - target| * mask) / max(count(mask), 1)
///
/// Equivalent to selecting the masked elements and averaging; an empty mask
/// yields zero instead of a division by zero.
///
/// Input shapes: pred/target [batch, V, H, W], mask [batch, V, H, W] boolean
/// Output: scalar loss
pub fn masked_l1_loss<B: Backend>(
    pred: Tensor<B, 4>,
    target: Tensor<B, 4>,
    mask: Tensor<B, 4, Bool>,
) -> Tensor<B, 1> {
    let mask = mask.float();
    let selected = (pred - target).abs() * mask.clone();
    let count = mask.sum().clamp_min(1.0);

    selected.sum() / count
}
