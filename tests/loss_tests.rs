//! Integration tests for the composite loss.

use burn::backend::{Autodiff, NdArray};
use burn::prelude::*;

use mvdepth::loss::{bce_with_logits_loss, l1_loss, masked_l1_loss, CompositeLoss};
use mvdepth::model::Prediction;
use mvdepth::CompositeLossConfig;

type TestBackend = Autodiff<NdArray>;

fn scalar(t: &Tensor<TestBackend, 1>) -> f32 {
    t.clone().to_data().to_vec::<f32>().unwrap()[0]
}

#[test]
fn test_composite_loss_weighting() {
    let device = burn::backend::ndarray::NdArrayDevice::Cpu;
    let views = 1;
    let (n, h, w) = (1, 2, 2);

    let coordinates = Tensor::<TestBackend, 4>::ones([n, 3 * views, h, w], &device);
    let mask_logits = Tensor::<TestBackend, 4>::ones([n, views, h, w], &device) * 4.0;
    let prediction = Prediction::split(coordinates, mask_logits, views).unwrap();

    let xy_targets = Tensor::<TestBackend, 4>::zeros([n, 2 * views, h, w], &device);
    let depth_gt = Tensor::<TestBackend, 4>::zeros([n, views, h, w], &device);
    let mask_gt = Tensor::<TestBackend, 4>::ones([n, views, h, w], &device);

    for lambda in [0.0f32, 0.5, 1.0, 2.0] {
        let loss = CompositeLoss::new(CompositeLossConfig::new().with_lambda_depth(lambda));
        let breakdown = loss.forward(
            &prediction,
            xy_targets.clone(),
            depth_gt.clone(),
            mask_gt.clone(),
        );

        let expected = scalar(&breakdown.mask) + lambda * scalar(&breakdown.xyz);
        assert!((scalar(&breakdown.total) - expected).abs() < 1e-5);
    }
}

#[test]
fn test_composite_loss_known_values() {
    let device = burn::backend::ndarray::NdArrayDevice::Cpu;
    let views = 1;

    // XY prediction off by exactly 1 everywhere, depth exact, mask confident
    let coordinates = Tensor::<TestBackend, 4>::from_data(
        TensorData::new(vec![1.0f32, 1.0, 1.0, 1.0, 0.0, 0.0], [1, 3, 1, 2]),
        &device,
    );
    let mask_logits = Tensor::<TestBackend, 4>::from_data(
        TensorData::new(vec![10.0f32, 10.0], [1, 1, 1, 2]),
        &device,
    );
    let prediction = Prediction::split(coordinates, mask_logits, views).unwrap();

    let loss = CompositeLoss::new(CompositeLossConfig::new());
    let breakdown = loss.forward(
        &prediction,
        Tensor::zeros([1, 2, 1, 2], &device),
        Tensor::zeros([1, 1, 1, 2], &device),
        Tensor::ones([1, 1, 1, 2], &device),
    );

    // l1(xy) = 1, masked depth error = 0
    assert!((scalar(&breakdown.xyz) - 1.0).abs() < 1e-5);
    // Confident correct mask: near-zero BCE
    assert!(scalar(&breakdown.mask) < 1e-3);
}

#[test]
fn test_bce_matches_naive_formula_in_stable_range() {
    let device = burn::backend::ndarray::NdArrayDevice::Cpu;
    let logits = Tensor::<TestBackend, 4>::from_data(
        TensorData::new(vec![-2.0f32, -0.5, 0.0, 1.5], [1, 1, 2, 2]),
        &device,
    );
    let targets = Tensor::<TestBackend, 4>::from_data(
        TensorData::new(vec![0.0f32, 1.0, 1.0, 0.0], [1, 1, 2, 2]),
        &device,
    );

    let stable = scalar(&bce_with_logits_loss(logits.clone(), targets.clone()));

    let logit_values: Vec<f32> = logits.to_data().to_vec().unwrap();
    let target_values: Vec<f32> = targets.to_data().to_vec().unwrap();
    let naive: f32 = logit_values
        .iter()
        .zip(&target_values)
        .map(|(&x, &t)| {
            let p = 1.0 / (1.0 + (-x).exp());
            -(t * p.ln() + (1.0 - t) * (1.0 - p).ln())
        })
        .sum::<f32>()
        / 4.0;

    assert!((stable - naive).abs() < 1e-5);
}

#[test]
fn test_masked_l1_ignores_unmasked_pixels() {
    let device = burn::backend::ndarray::NdArrayDevice::Cpu;
    let pred = Tensor::<TestBackend, 4>::from_data(
        TensorData::new(vec![5.0f32, 1.0, 2.0, 7.0], [1, 1, 2, 2]),
        &device,
    );
    let target = Tensor::<TestBackend, 4>::zeros([1, 1, 2, 2], &device);
    let mask = Tensor::<TestBackend, 4>::from_data(
        TensorData::new(vec![0.0f32, 1.0, 1.0, 0.0], [1, 1, 2, 2]),
        &device,
    )
    .greater_elem(0.5);

    // Only the two masked values (1 and 2) contribute
    let loss = scalar(&masked_l1_loss(pred, target, mask));
    assert!((loss - 1.5).abs() < 1e-5);
}

#[test]
fn test_gradients_flow_through_total_loss() {
    let device = burn::backend::ndarray::NdArrayDevice::Cpu;
    let views = 1;

    let coordinates = Tensor::<TestBackend, 4>::ones([1, 3, 2, 2], &device).require_grad();
    let mask_logits = Tensor::<TestBackend, 4>::zeros([1, 1, 2, 2], &device).require_grad();
    let prediction =
        Prediction::split(coordinates.clone(), mask_logits.clone(), views).unwrap();

    let loss = CompositeLoss::new(CompositeLossConfig::new());
    let breakdown = loss.forward(
        &prediction,
        Tensor::zeros([1, 2, 2, 2], &device),
        Tensor::zeros([1, 1, 2, 2], &device),
        Tensor::ones([1, 1, 2, 2], &device),
    );

    let grads = breakdown.total.backward();
    assert!(coordinates.grad(&grads).is_some());
    assert!(mask_logits.grad(&grads).is_some());
}

#[test]
fn test_l1_loss_symmetry() {
    let device = burn::backend::ndarray::NdArrayDevice::Cpu;
    let a = Tensor::<TestBackend, 4>::from_data(
        TensorData::new(vec![1.0f32, 2.0, 3.0, 4.0], [1, 1, 2, 2]),
        &device,
    );
    let b = Tensor::<TestBackend, 4>::from_data(
        TensorData::new(vec![4.0f32, 3.0, 2.0, 1.0], [1, 1, 2, 2]),
        &device,
    );

    let ab = scalar(&l1_loss(a.clone(), b.clone()));
    let ba = scalar(&l1_loss(b, a));
    assert!((ab - ba).abs() < 1e-6);
    assert!((ab - 2.0).abs() < 1e-5);
}
