//! Loss functions for multi-view depth/mask training.
//!
//! - Coordinate loss: L1 between predicted and target XY position maps, plus
//!   L1 on depth restricted to the predicted mask
//! - Mask loss: sigmoid binary cross-entropy on the mask logits
//! - Composite: `mask + lambda_depth * coordinate`

mod composite;
mod coordinate;
mod mask;

pub use composite::{CompositeLoss, LossBreakdown};
pub use coordinate::{l1_loss, masked_l1_loss};
pub use mask::bce_with_logits_loss;
