//! Loss bookkeeping across batches and epochs.

/// Averaged loss components for one pass over a dataset split.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EpochLosses {
    /// Coordinate regression term (XY grid + masked depth).
    pub xyz: f64,
    /// Mask classification term.
    pub mask: f64,
    /// Weighted total.
    pub total: f64,
}

/// Accumulates batch losses weighted by batch size.
///
/// The final average divides by the dataset length rather than the number of
/// batches, so a short trailing batch does not skew the epoch figure.
#[derive(Debug, Clone, Default)]
pub struct RunningLoss {
    xyz: f64,
    mask: f64,
    total: f64,
    examples: usize,
}

impl RunningLoss {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one batch worth of losses.
    pub fn add(&mut self, xyz: f64, mask: f64, total: f64, batch_size: usize) {
        let weight = batch_size as f64;
        self.xyz += xyz * weight;
        self.mask += mask * weight;
        self.total += total * weight;
        self.examples += batch_size;
    }

    /// Number of examples accumulated so far.
    pub fn examples(&self) -> usize {
        self.examples
    }

    /// Per-example average over the full dataset.
    pub fn average(&self, dataset_len: usize) -> EpochLosses {
        let divisor = dataset_len.max(1) as f64;
        EpochLosses {
            xyz: self.xyz / divisor,
            mask: self.mask / divisor,
            total: self.total / divisor,
        }
    }
}

/// One row of the training history.
#[derive(Debug, Clone, Copy)]
pub struct EpochRecord {
    pub epoch: usize,
    pub train: EpochLosses,
    pub val: EpochLosses,
}

impl EpochRecord {
    /// Emit the epoch summary to the log.
    pub fn log(&self) {
        log::info!(
            "epoch {}: train total={:.6} xyz={:.6} mask={:.6} | val total={:.6} xyz={:.6} mask={:.6}",
            self.epoch,
            self.train.total,
            self.train.xyz,
            self.train.mask,
            self.val.total,
            self.val.xyz,
            self.val.mask,
        );
    }
}

/// Per-epoch loss history for a training run.
#[derive(Debug, Clone, Default)]
pub struct TrainingHistory {
    records: Vec<EpochRecord>,
}

impl TrainingHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: EpochRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[EpochRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&EpochRecord> {
        self.records.last()
    }

    /// Lowest validation total seen so far.
    pub fn best_val_loss(&self) -> Option<f64> {
        self.records
            .iter()
            .map(|r| r.val.total)
            .fold(None, |best, v| match best {
                Some(b) if b <= v => Some(b),
                _ => Some(v),
            })
    }

    /// Serialize as CSV, one row per epoch.
    pub fn to_csv(&self) -> String {
        let mut out = String::from(
            "epoch,train_loss_xyz,train_loss_mask,train_loss,val_loss_xyz,val_loss_mask,val_loss\n",
        );
        for r in &self.records {
            out.push_str(&format!(
                "{},{},{},{},{},{},{}\n",
                r.epoch, r.train.xyz, r.train.mask, r.train.total, r.val.xyz, r.val.mask, r.val.total,
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_loss_weighted_average() {
        let mut running = RunningLoss::new();
        // 4 examples at total 2.0, then a short batch of 2 at 5.0
        running.add(1.0, 1.0, 2.0, 4);
        running.add(2.0, 3.0, 5.0, 2);
        assert_eq!(running.examples(), 6);

        let avg = running.average(6);
        assert!((avg.total - (2.0 * 4.0 + 5.0 * 2.0) / 6.0).abs() < 1e-12);
        assert!((avg.xyz - (1.0 * 4.0 + 2.0 * 2.0) / 6.0).abs() < 1e-12);
        assert!((avg.mask - (1.0 * 4.0 + 3.0 * 2.0) / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_running_loss() {
        let avg = RunningLoss::new().average(0);
        assert_eq!(avg.total, 0.0);
    }

    #[test]
    fn test_history_csv() {
        let mut history = TrainingHistory::new();
        history.push(EpochRecord {
            epoch: 0,
            train: EpochLosses { xyz: 1.0, mask: 2.0, total: 3.0 },
            val: EpochLosses { xyz: 0.5, mask: 0.25, total: 0.75 },
        });

        let csv = history.to_csv();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "epoch,train_loss_xyz,train_loss_mask,train_loss,val_loss_xyz,val_loss_mask,val_loss"
        );
        assert_eq!(lines.next().unwrap(), "0,1,2,3,0.5,0.25,0.75");
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_best_val_loss() {
        let mut history = TrainingHistory::new();
        assert!(history.best_val_loss().is_none());

        for (epoch, total) in [(0, 3.0), (1, 1.5), (2, 2.0)] {
            history.push(EpochRecord {
                epoch,
                train: EpochLosses::default(),
                val: EpochLosses { xyz: 0.0, mask: 0.0, total },
            });
        }
        assert_eq!(history.best_val_loss(), Some(1.5));
        assert_eq!(history.last().unwrap().epoch, 2);
    }
}
