//! Error types for mvdepth.

use thiserror::Error;

/// Errors that can occur while assembling data or driving the training loop.
///
/// Failures inside the tensor framework itself (device mismatches, kernel
/// shape errors) are not translated here; they abort the run.
#[derive(Error, Debug)]
pub enum MvDepthError {
    /// Invalid configuration.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration error.
        message: String,
    },

    /// Tensor shape mismatch.
    #[error("tensor shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape.
        expected: Vec<usize>,
        /// Actual shape.
        got: Vec<usize>,
    },

    /// A dataset split contains no samples.
    #[error("empty dataset: the {split} split has no samples")]
    EmptyDataset {
        /// Name of the offending split.
        split: String,
    },

    /// A sample buffer does not match the dataset geometry.
    #[error("sample {field} has {got} values but the dataset geometry requires {expected}")]
    SampleSizeMismatch {
        /// Which buffer is wrong.
        field: &'static str,
        /// Required number of values.
        expected: usize,
        /// Provided number of values.
        got: usize,
    },

    /// I/O error from checkpoint or image export.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or corrupted data.
    #[error("invalid data: {0}")]
    InvalidData(String),
}

/// Result type for mvdepth operations.
pub type Result<T> = std::result::Result<T, MvDepthError>;
