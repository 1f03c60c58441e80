//! Checkpoint persistence for training runs.
//!
//! A checkpoint directory holds the model record (`model.bin`), a small JSON
//! metadata file and the loss history as CSV, enough to resume a run or pick
//! the best model afterwards.

use std::fs;
use std::path::{Path, PathBuf};

use burn::module::Module;
use burn::prelude::*;
use burn::record::{BinFileRecorder, FullPrecisionSettings};

use crate::error::{MvDepthError, Result};
use crate::training::metrics::TrainingHistory;

const METADATA_FILE: &str = "metadata.json";
const HISTORY_FILE: &str = "history.csv";
const MODEL_FILE: &str = "model";
const FORMAT_VERSION: u32 = 1;

/// Sidecar metadata written next to the model record.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckpointMetadata {
    /// Last completed epoch.
    pub epoch: usize,
    /// Best validation total loss seen up to this checkpoint.
    pub best_val_loss: f64,
    /// Format version of the checkpoint layout.
    pub version: u32,
}

impl CheckpointMetadata {
    pub fn new(epoch: usize, best_val_loss: f64) -> Self {
        Self {
            epoch,
            best_val_loss,
            version: FORMAT_VERSION,
        }
    }

    pub fn to_json(&self) -> String {
        format!(
            "{{\n  \"epoch\": {},\n  \"best_val_loss\": {},\n  \"version\": {}\n}}\n",
            self.epoch, self.best_val_loss, self.version,
        )
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let mut epoch = None;
        let mut best_val_loss = None;
        let mut version = None;

        for line in json.lines() {
            let line = line.trim().trim_end_matches(',');
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim().trim_matches('"');
            let value = value.trim();
            match key {
                "epoch" => epoch = value.parse::<usize>().ok(),
                "best_val_loss" => best_val_loss = value.parse::<f64>().ok(),
                "version" => version = value.parse::<u32>().ok(),
                _ => {}
            }
        }

        match (epoch, best_val_loss, version) {
            (Some(epoch), Some(best_val_loss), Some(version)) => Ok(Self {
                epoch,
                best_val_loss,
                version,
            }),
            _ => Err(MvDepthError::InvalidData(
                "checkpoint metadata is missing required fields".to_string(),
            )),
        }
    }
}

/// Write a checkpoint directory containing model, metadata and history.
pub fn save_checkpoint<B: Backend, M: Module<B>>(
    dir: &Path,
    model: &M,
    history: &TrainingHistory,
    metadata: &CheckpointMetadata,
) -> Result<()> {
    fs::create_dir_all(dir)?;

    fs::write(dir.join(METADATA_FILE), metadata.to_json())?;
    fs::write(dir.join(HISTORY_FILE), history.to_csv())?;

    let recorder = BinFileRecorder::<FullPrecisionSettings>::new();
    model
        .clone()
        .save_file(dir.join(MODEL_FILE), &recorder)
        .map_err(|e| MvDepthError::InvalidData(format!("failed to save model record: {e}")))?;

    log::info!(
        "saved checkpoint at {:?} (epoch {}, best val loss {:.6})",
        dir,
        metadata.epoch,
        metadata.best_val_loss,
    );
    Ok(())
}

/// Load model weights and metadata from a checkpoint directory.
///
/// The passed-in model provides the architecture; its weights are replaced by
/// the recorded ones.
pub fn load_checkpoint<B: Backend, M: Module<B>>(
    dir: &Path,
    model: M,
    device: &B::Device,
) -> Result<(M, CheckpointMetadata)> {
    let metadata = CheckpointMetadata::from_json(&fs::read_to_string(dir.join(METADATA_FILE))?)?;
    if metadata.version != FORMAT_VERSION {
        log::warn!(
            "checkpoint {:?} has format version {}, expected {}",
            dir,
            metadata.version,
            FORMAT_VERSION,
        );
    }

    let recorder = BinFileRecorder::<FullPrecisionSettings>::new();
    let model = model
        .load_file(dir.join(MODEL_FILE), &recorder, device)
        .map_err(|e| MvDepthError::InvalidData(format!("failed to load model record: {e}")))?;

    Ok((model, metadata))
}

/// Whether `dir` looks like a complete checkpoint.
pub fn checkpoint_exists(dir: &Path) -> bool {
    dir.join(METADATA_FILE).is_file() && dir.join(format!("{MODEL_FILE}.bin")).is_file()
}

/// Scan `base_dir` for `checkpoint_N` directories and return the one with the
/// highest epoch number.
pub fn find_latest_checkpoint(base_dir: &Path) -> Option<PathBuf> {
    let entries = fs::read_dir(base_dir).ok()?;
    let mut best: Option<(usize, PathBuf)> = None;

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() || !checkpoint_exists(&path) {
            continue;
        }
        let name = path.file_name()?.to_str()?.to_string();
        let Some(suffix) = name.strip_prefix("checkpoint_") else {
            continue;
        };
        let Ok(epoch) = suffix.parse::<usize>() else {
            continue;
        };
        if best.as_ref().map(|(e, _)| epoch > *e).unwrap_or(true) {
            best = Some((epoch, path));
        }
    }

    best.map(|(_, path)| path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_round_trip() {
        let metadata = CheckpointMetadata::new(7, 0.125);
        let parsed = CheckpointMetadata::from_json(&metadata.to_json()).unwrap();
        assert_eq!(parsed, metadata);
    }

    #[test]
    fn test_metadata_rejects_incomplete_json() {
        let result = CheckpointMetadata::from_json("{\n  \"epoch\": 3\n}\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_find_latest_checkpoint() {
        let dir = tempfile::tempdir().unwrap();

        for epoch in [1usize, 5, 3] {
            let path = dir.path().join(format!("checkpoint_{epoch}"));
            fs::create_dir_all(&path).unwrap();
            fs::write(
                path.join(METADATA_FILE),
                CheckpointMetadata::new(epoch, 1.0).to_json(),
            )
            .unwrap();
            fs::write(path.join(format!("{MODEL_FILE}.bin")), b"x").unwrap();
        }
        // Not a checkpoint, should be skipped
        fs::create_dir_all(dir.path().join("checkpoint_9")).unwrap();

        let latest = find_latest_checkpoint(dir.path()).unwrap();
        assert!(latest.ends_with("checkpoint_5"));
    }

    #[test]
    fn test_find_latest_checkpoint_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_latest_checkpoint(dir.path()).is_none());
    }
}
