//! Mask classification loss.

use burn::prelude::*;

/// Sigmoid binary cross-entropy computed from raw logits.
///
/// Uses the numerically stable form
/// `max(x, 0) - x * t + ln(1 + exp(-|x|))`, averaged over all elements, so
/// large-magnitude logits never overflow the exponential.
///
/// Input shapes: logits [batch, V, H, W], targets [batch, V, H, W] in {0, 1}
/// Output: scalar loss
pub fn bce_with_logits_loss<B: Backend>(
    logits: Tensor<B, 4>,
    targets: Tensor<B, 4>,
) -> Tensor<B, 1> {
    let relu_term = logits.clone().clamp_min(0.0);
    let linear_term = logits.clone() * targets;
    let log_term = (-logits.abs()).exp().log1p();

    (relu_term - linear_term + log_term).mean()
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn scalar(t: Tensor<TestBackend, 1>) -> f32 {
        t.to_data().to_vec().unwrap()[0]
    }

    fn reference_bce(logits: &[f32], targets: &[f32]) -> f32 {
        let sum: f32 = logits
            .iter()
            .zip(targets)
            .map(|(&x, &t)| {
                let p = 1.0 / (1.0 + (-x).exp());
                -(t * p.ln() + (1.0 - t) * (1.0 - p).ln())
            })
            .sum();
        sum / logits.len() as f32
    }

    #[test]
    fn test_matches_naive_formula() {
        let device = Default::default();
        let logits = vec![0.5f32, -1.2, 2.0, 0.0];
        let targets = vec![1.0f32, 0.0, 1.0, 0.0];

        let l = bce_with_logits_loss(
            Tensor::<TestBackend, 4>::from_data(
                TensorData::new(logits.clone(), [1, 1, 2, 2]),
                &device,
            ),
            Tensor::<TestBackend, 4>::from_data(
                TensorData::new(targets.clone(), [1, 1, 2, 2]),
                &device,
            ),
        );

        assert!((scalar(l) - reference_bce(&logits, &targets)).abs() < 1e-5);
    }

    #[test]
    fn test_stable_for_large_logits() {
        let device = Default::default();
        let logits = Tensor::<TestBackend, 4>::from_data(
            TensorData::new(vec![80.0f32, -80.0], [1, 1, 1, 2]),
            &device,
        );
        let targets = Tensor::<TestBackend, 4>::from_data(
            TensorData::new(vec![1.0f32, 0.0], [1, 1, 1, 2]),
            &device,
        );

        // Confident correct predictions: loss near zero, not NaN/inf
        let val = scalar(bce_with_logits_loss(logits, targets));
        assert!(val.is_finite());
        assert!(val < 1e-3);
    }

    #[test]
    fn test_confident_wrong_prediction_is_penalized() {
        let device = Default::default();
        let logits = Tensor::<TestBackend, 4>::from_data(
            TensorData::new(vec![10.0f32], [1, 1, 1, 1]),
            &device,
        );
        let targets = Tensor::<TestBackend, 4>::zeros([1, 1, 1, 1], &device);

        assert!(scalar(bce_with_logits_loss(logits, targets)) > 5.0);
    }
}
