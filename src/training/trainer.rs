//! Supervised training loop for multi-view depth and mask prediction.

use burn::lr_scheduler::LrScheduler;
use burn::module::AutodiffModule;
use burn::optim::{GradientsParams, Optimizer};
use burn::prelude::*;
use burn::tensor::backend::AutodiffBackend;

use crate::config::TrainingConfig;
use crate::data::{MultiViewBatch, MultiViewDataset};
use crate::error::{MvDepthError, Result};
use crate::loss::CompositeLoss;
use crate::model::{MultiViewModel, Prediction};
use crate::training::metrics::{EpochLosses, EpochRecord, RunningLoss, TrainingHistory};
use crate::training::targets::coordinate_targets;
use crate::viz::{render_board, ImageBoard};

/// Hook invoked after every epoch, typically used for checkpointing and
/// writing image boards. Receives the current model, the history so far, a
/// board rendered from the first validation batch, and the epoch index.
pub type EpochCallback<'a, M> = &'a mut dyn FnMut(&M, &TrainingHistory, &ImageBoard, usize);

/// Drives optimization of a [`MultiViewModel`] over a train/validation split.
pub struct MultiViewTrainer<B: AutodiffBackend> {
    config: TrainingConfig,
    device: B::Device,
    loss: CompositeLoss,
}

impl<B: AutodiffBackend> MultiViewTrainer<B> {
    pub fn new(config: TrainingConfig, device: B::Device) -> Result<Self> {
        config
            .validate()
            .map_err(|message| MvDepthError::InvalidConfig { message })?;
        let loss = CompositeLoss::new(config.loss.clone());
        Ok(Self {
            config,
            device,
            loss,
        })
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Run the full training loop and return the trained model together with
    /// the per-epoch loss history.
    ///
    /// The learning rate scheduler is stepped once per training batch. The
    /// validation pass runs on the inner backend so no gradients are tracked
    /// and no parameters are updated.
    pub fn fit<M, O, S>(
        &self,
        mut model: M,
        mut optimizer: O,
        mut scheduler: S,
        train_data: &MultiViewDataset,
        val_data: &MultiViewDataset,
        mut on_after_epoch: Option<EpochCallback<'_, M>>,
    ) -> Result<(M, TrainingHistory)>
    where
        M: MultiViewModel<B> + AutodiffModule<B>,
        M::InnerModule: MultiViewModel<B::InnerBackend>,
        O: Optimizer<M, B>,
        S: LrScheduler<B>,
    {
        if train_data.is_empty() {
            return Err(MvDepthError::EmptyDataset {
                split: "training".to_string(),
            });
        }
        if val_data.is_empty() {
            return Err(MvDepthError::EmptyDataset {
                split: "validation".to_string(),
            });
        }

        log::info!(
            "training epochs {}..{}: {} train / {} val examples, batch size {}",
            self.config.start_epoch,
            self.config.end_epoch,
            train_data.len(),
            val_data.len(),
            self.config.batch_size,
        );

        let mut history = TrainingHistory::new();

        for epoch in self.config.start_epoch..self.config.end_epoch {
            let (updated, train_losses) =
                self.train_epoch(model, &mut optimizer, &mut scheduler, train_data, epoch)?;
            model = updated;

            let val_losses = self.val_epoch(&model, val_data)?;

            let record = EpochRecord {
                epoch,
                train: train_losses,
                val: val_losses,
            };
            record.log();
            history.push(record);

            if let Some(callback) = on_after_epoch.as_mut() {
                let board = self.render_epoch_board(&model, val_data)?;
                callback(&model, &history, &board, epoch);
            }
        }

        log::info!("training done: {} epochs recorded", history.len());
        Ok((model, history))
    }

    fn train_epoch<M, O, S>(
        &self,
        mut model: M,
        optimizer: &mut O,
        scheduler: &mut S,
        data: &MultiViewDataset,
        epoch: usize,
    ) -> Result<(M, EpochLosses)>
    where
        M: MultiViewModel<B> + AutodiffModule<B>,
        O: Optimizer<M, B>,
        S: LrScheduler<B>,
    {
        let views = self.config.num_views;
        let mut running = RunningLoss::new();

        // Re-seed per epoch so batch order varies but runs stay reproducible.
        let seed = self.config.shuffle_seed.wrapping_add(epoch as u64);
        let mut batches = data.batches(self.config.batch_size, Some(seed));

        while let Some(batch) = batches.next_batch::<B>(&self.device) {
            let n = batch.batch_size();
            let [_, _, h, w] = batch.depth_gt.dims();
            let xy_targets = coordinate_targets::<B>(n, views, h, w, &self.device);

            let (coordinates, mask_logits) = model.forward(batch.images.clone());
            let prediction = Prediction::split(coordinates, mask_logits, views)?;
            let losses = self.loss.forward(
                &prediction,
                xy_targets,
                batch.depth_gt.clone(),
                batch.mask_gt.clone(),
            );

            let xyz = scalar_value(&losses.xyz);
            let mask = scalar_value(&losses.mask);
            let total = scalar_value(&losses.total);

            let grads = losses.total.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            let lr = scheduler.step();
            model = optimizer.step(lr, model, grads);

            running.add(xyz, mask, total, n);
        }

        Ok((model, running.average(data.len())))
    }

    fn val_epoch<M>(&self, model: &M, data: &MultiViewDataset) -> Result<EpochLosses>
    where
        M: AutodiffModule<B>,
        M::InnerModule: MultiViewModel<B::InnerBackend>,
    {
        let inner = model.valid();
        let views = self.config.num_views;
        let mut running = RunningLoss::new();

        let mut batches = data.batches(self.config.batch_size, None);
        while let Some(batch) = batches.next_batch::<B::InnerBackend>(&self.device) {
            let n = batch.batch_size();
            let [_, _, h, w] = batch.depth_gt.dims();
            let xy_targets = coordinate_targets::<B::InnerBackend>(n, views, h, w, &self.device);

            let (coordinates, mask_logits) = inner.forward(batch.images.clone());
            let prediction = Prediction::split(coordinates, mask_logits, views)?;
            let losses = self
                .loss
                .forward(&prediction, xy_targets, batch.depth_gt, batch.mask_gt);

            running.add(
                scalar_value(&losses.xyz),
                scalar_value(&losses.mask),
                scalar_value(&losses.total),
                n,
            );
        }

        Ok(running.average(data.len()))
    }

    fn render_epoch_board<M>(&self, model: &M, val_data: &MultiViewDataset) -> Result<ImageBoard>
    where
        M: AutodiffModule<B>,
        M::InnerModule: MultiViewModel<B::InnerBackend>,
    {
        let inner = model.valid();
        let mut batches = val_data.batches(self.config.batch_size, None);
        let batch: MultiViewBatch<B::InnerBackend> = batches
            .next_batch(&self.device)
            .ok_or_else(|| MvDepthError::EmptyDataset {
                split: "validation".to_string(),
            })?;
        render_board(&inner, &batch, self.config.num_views)
    }
}

fn scalar_value<B: Backend>(tensor: &Tensor<B, 1>) -> f64 {
    tensor.clone().to_data().to_vec::<f32>().unwrap()[0] as f64
}
