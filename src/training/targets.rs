//! Ground-truth target construction.

use burn::prelude::*;

/// Build the per-pixel coordinate ground-truth grid.
///
/// Channels `[0, V)` hold the row index at every pixel and channels `[V, 2V)`
/// the column index, so each view regresses the same fixed position maps. The
/// grid is replicated across the batch dimension.
///
/// Output shape: [batch, 2V, H, W]
pub fn coordinate_targets<B: Backend>(
    batch_size: usize,
    views: usize,
    height: usize,
    width: usize,
    device: &B::Device,
) -> Tensor<B, 4> {
    let mut data = Vec::with_capacity(2 * views * height * width);

    for _ in 0..views {
        for row in 0..height {
            for _ in 0..width {
                data.push(row as f32);
            }
        }
    }
    for _ in 0..views {
        for _ in 0..height {
            for col in 0..width {
                data.push(col as f32);
            }
        }
    }

    let grid: Tensor<B, 3> =
        Tensor::from_data(TensorData::new(data, [2 * views, height, width]), device);

    grid.unsqueeze::<4>().repeat_dim(0, batch_size)
}
