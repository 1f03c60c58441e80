//! Reference network configuration.

use burn::config::Config;

/// Configuration for the bundled convolutional multi-view decoder.
///
/// The trainer itself accepts any [`crate::model::MultiViewModel`]; this
/// config only describes the small reference network used by tests and demos.
#[derive(Config, Debug)]
pub struct MultiViewDecoderConfig {
    /// Number of predicted viewpoints per input image.
    pub num_views: usize,

    /// Number of input image channels.
    #[config(default = 3)]
    pub input_channels: usize,

    /// Number of channels in the hidden convolutional layers.
    #[config(default = 16)]
    pub hidden_channels: usize,

    /// Number of hidden convolutional layers.
    #[config(default = 2)]
    pub num_layers: usize,
}

impl MultiViewDecoderConfig {
    /// Number of coordinate output channels (`3 * V`: XY plus depth per view).
    pub fn coordinate_channels(&self) -> usize {
        self.num_views * 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoder_config() {
        let config = MultiViewDecoderConfig::new(8);
        assert_eq!(config.num_views, 8);
        assert_eq!(config.coordinate_channels(), 24);
        assert_eq!(config.hidden_channels, 16);
    }
}
