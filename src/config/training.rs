//! Training configuration types.

use burn::config::Config;

/// Configuration for the composite stage-one loss.
#[derive(Config, Debug)]
pub struct CompositeLossConfig {
    /// Weight applied to the coordinate/depth regression term before it is
    /// added to the mask classification term.
    #[config(default = 1.0)]
    pub lambda_depth: f32,
}

impl Default for CompositeLossConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for the multi-view trainer.
///
/// Immutable for the duration of a training run.
#[derive(Config, Debug)]
pub struct TrainingConfig {
    /// First epoch index (inclusive).
    #[config(default = 0)]
    pub start_epoch: usize,

    /// Last epoch index (exclusive).
    pub end_epoch: usize,

    /// Output height of the predicted maps, in pixels.
    #[config(default = 64)]
    pub out_height: usize,

    /// Output width of the predicted maps, in pixels.
    #[config(default = 64)]
    pub out_width: usize,

    /// Number of predicted viewpoints per input image.
    #[config(default = 8)]
    pub num_views: usize,

    /// Loss composition weights.
    pub loss: CompositeLossConfig,

    /// Training batch size.
    #[config(default = 16)]
    pub batch_size: usize,

    /// Initial learning rate.
    #[config(default = 1e-4)]
    pub learning_rate: f64,

    /// Final learning rate reached at the end of the schedule.
    #[config(default = 1e-5)]
    pub final_learning_rate: f64,

    /// Seed for the epoch shuffle of the training split.
    #[config(default = 42)]
    pub shuffle_seed: u64,
}

impl TrainingConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.end_epoch <= self.start_epoch {
            return Err(format!(
                "end_epoch ({}) must be greater than start_epoch ({})",
                self.end_epoch, self.start_epoch
            ));
        }
        if self.out_height == 0 || self.out_width == 0 {
            return Err("output dimensions must be positive".to_string());
        }
        if self.num_views == 0 {
            return Err("num_views must be positive".to_string());
        }
        if self.batch_size == 0 {
            return Err("batch_size must be positive".to_string());
        }
        if self.learning_rate <= 0.0 || self.final_learning_rate <= 0.0 {
            return Err("learning rates must be positive".to_string());
        }

        Ok(())
    }

    /// Number of epochs this configuration will run.
    pub fn num_epochs(&self) -> usize {
        self.end_epoch - self.start_epoch
    }

    /// Number of coordinate channels produced by the network (`3 * V`).
    pub fn coordinate_channels(&self) -> usize {
        self.num_views * 3
    }
}
