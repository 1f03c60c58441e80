//! Bundled convolutional multi-view decoder.

use burn::module::Module;
use burn::nn::conv::{Conv2d, Conv2dConfig};
use burn::nn::{PaddingConfig2d, Relu};
use burn::prelude::*;

use crate::config::MultiViewDecoderConfig;

use super::MultiViewModel;

/// Small convolutional network mapping an input image to per-view coordinate
/// maps and mask logits at the same spatial resolution.
///
/// Architecture: a stack of 3x3 same-padded convolutions with ReLU, followed
/// by two 1x1 heads (coordinates and mask logits).
#[derive(Module, Debug)]
pub struct MultiViewDecoder<B: Backend> {
    /// Hidden convolutional layers.
    hidden: Vec<Conv2d<B>>,
    /// Coordinate head: [hidden -> 3V].
    coord_head: Conv2d<B>,
    /// Mask logit head: [hidden -> V].
    mask_head: Conv2d<B>,
    /// Activation function.
    activation: Relu,
}

impl<B: Backend> MultiViewDecoder<B> {
    /// Create a new decoder from configuration.
    pub fn new(config: &MultiViewDecoderConfig, device: &B::Device) -> Self {
        let mut hidden = Vec::with_capacity(config.num_layers.max(1));
        let mut in_channels = config.input_channels;

        for _ in 0..config.num_layers.max(1) {
            hidden.push(
                Conv2dConfig::new([in_channels, config.hidden_channels], [3, 3])
                    .with_padding(PaddingConfig2d::Same)
                    .init(device),
            );
            in_channels = config.hidden_channels;
        }

        let coord_head =
            Conv2dConfig::new([in_channels, config.coordinate_channels()], [1, 1]).init(device);
        let mask_head = Conv2dConfig::new([in_channels, config.num_views], [1, 1]).init(device);

        Self {
            hidden,
            coord_head,
            mask_head,
            activation: Relu::new(),
        }
    }
}

impl<B: Backend> MultiViewModel<B> for MultiViewDecoder<B> {
    fn forward(&self, images: Tensor<B, 4>) -> (Tensor<B, 4>, Tensor<B, 4>) {
        let mut x = images;
        for layer in &self.hidden {
            x = layer.forward(x);
            x = self.activation.forward(x);
        }

        let coordinates = self.coord_head.forward(x.clone());
        let mask_logits = self.mask_head.forward(x);

        (coordinates, mask_logits)
    }
}
