//! Training loop, metrics and checkpointing.

mod checkpoint;
mod metrics;
mod targets;
mod trainer;

pub use checkpoint::{
    checkpoint_exists, find_latest_checkpoint, load_checkpoint, save_checkpoint,
    CheckpointMetadata,
};
pub use metrics::{EpochLosses, EpochRecord, RunningLoss, TrainingHistory};
pub use targets::coordinate_targets;
pub use trainer::{EpochCallback, MultiViewTrainer};
