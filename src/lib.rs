//! # mvdepth
//!
//! Supervised training of multi-view depth and mask prediction with Burn.
//!
//! Given an RGB input image, a model predicts per-view coordinate maps, depth
//! maps and mask logits. This crate provides the training loop, the composite
//! loss that supervises them, synthetic data generation via a depth camera
//! simulator, checkpointing and image-board visualization.
//!
//! ## Features
//!
//! - **Composite loss**: BCE mask supervision plus weighted L1 coordinate and
//!   masked depth regression
//! - **Training loop**: per-batch optimizer and scheduler stepping, gradient-free
//!   validation pass, per-epoch history
//! - **Synthetic data**: sphere-traced depth renders from analytic SDFs
//! - **Checkpointing**: binary model records with JSON metadata and CSV history
//! - **Visualization**: tiled image boards of inputs, predictions and targets
//!
//! ## Quick Start
//!
//! ```ignore
//! use mvdepth::prelude::*;
//! use burn::backend::{Autodiff, NdArray};
//! use burn::lr_scheduler::linear::LinearLrSchedulerConfig;
//! use burn::optim::AdamConfig;
//!
//! type MyBackend = Autodiff<NdArray>;
//!
//! let device = Default::default();
//! let config = TrainingConfig::new(10, CompositeLossConfig::new());
//! let trainer = MultiViewTrainer::<MyBackend>::new(config.clone(), device)?;
//!
//! let model = MultiViewDecoder::new(&MultiViewDecoderConfig::new(config.num_views), &device);
//! let optimizer = AdamConfig::new().init();
//! let scheduler = LinearLrSchedulerConfig::new(
//!     config.learning_rate,
//!     config.final_learning_rate,
//!     1000,
//! )
//! .init();
//!
//! let (model, history) = trainer.fit(model, optimizer, scheduler, &train, &val, None)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod data;
pub mod error;
pub mod loss;
pub mod model;
pub mod training;
pub mod viz;

// Re-export key types for convenience
pub use config::{CompositeLossConfig, MultiViewDecoderConfig, TrainingConfig};
pub use error::{MvDepthError, Result};
pub use loss::CompositeLoss;
pub use model::{MultiViewDecoder, MultiViewModel, Prediction};
pub use training::{MultiViewTrainer, TrainingHistory};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::{CompositeLossConfig, MultiViewDecoderConfig, TrainingConfig};
    pub use crate::data::{
        generate_orbit_poses, generate_sphere_poses, DepthCameraSimulator, DepthImage,
        MultiViewBatch, MultiViewDataset, MultiViewSample, Point3, Pose,
    };
    pub use crate::error::{MvDepthError, Result};
    pub use crate::loss::{bce_with_logits_loss, l1_loss, masked_l1_loss, CompositeLoss, LossBreakdown};
    pub use crate::model::{MultiViewDecoder, MultiViewModel, Prediction};
    pub use crate::training::{
        checkpoint_exists, coordinate_targets, find_latest_checkpoint, load_checkpoint,
        save_checkpoint, CheckpointMetadata, EpochLosses, EpochRecord, MultiViewTrainer,
        RunningLoss, TrainingHistory,
    };
    pub use crate::viz::{make_grid, render_board, ImageBoard, ImageGrid};
}
