//! Configuration types for mvdepth.
//!
//! Burn-style configuration structs for the training loop and the bundled
//! reference decoder.

mod network;
mod training;

pub use network::MultiViewDecoderConfig;
pub use training::{CompositeLossConfig, TrainingConfig};
