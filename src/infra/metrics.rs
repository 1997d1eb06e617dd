// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Appends one CSV row per training epoch.
//
// Output file: checkpoints/metrics.csv
//
//   epoch,train_loss,train_acc,val_loss,val_acc,lr
//   1,1.945910,0.210000,1.901200,0.250000,0.0001
//   2,1.802300,0.330000,1.774100,0.350000,0.0001
//
// How to read it:
//   - train_loss is what the LR scheduler watches; a flat
//     stretch longer than the patience shows up as a drop in lr
//   - val_loss rising while train_loss falls → overfitting
//   - val columns are NaN when the held-out split is empty

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};
use serde::{Deserialize, Serialize};

const CSV_HEADER: &str = "epoch,train_loss,train_acc,val_loss,val_acc,lr";

/// One row of metrics for a single training epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Mean of per-batch training losses
    pub train_loss: f64,

    /// Mean of per-batch training accuracies, in [0, 1]
    pub train_acc: f64,

    pub val_loss: f64,
    pub val_acc:  f64,

    /// Learning rate the optimiser used during this epoch
    pub lr: f64,
}

impl EpochMetrics {
    pub fn new(
        epoch:      usize,
        train_loss: f64,
        train_acc:  f64,
        val_loss:   f64,
        val_acc:    f64,
        lr:         f64,
    ) -> Self {
        Self { epoch, train_loss, train_acc, val_loss, val_acc, lr }
    }

    /// Returns true if this epoch beat `best_val_acc`
    pub fn is_improvement(&self, best_val_acc: f64) -> bool {
        self.val_acc > best_val_acc
    }

    fn to_csv_row(&self) -> String {
        format!(
            "{},{:.6},{:.6},{:.6},{:.6},{:e}",
            self.epoch,
            self.train_loss,
            self.train_acc,
            self.val_loss,
            self.val_acc,
            self.lr,
        )
    }
}

/// Logs epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Starts a fresh metrics.csv in `dir`, replacing any previous run's.
    pub fn new(dir: impl Into<String>) -> Result<Self> {
        let dir = PathBuf::from(dir.into());
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create '{}'", dir.display()))?;

        let csv_path = dir.join("metrics.csv");
        let mut f = fs::File::create(&csv_path)
            .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
        writeln!(f, "{CSV_HEADER}")?;
        tracing::debug!("Created metrics CSV: '{}'", csv_path.display());

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        writeln!(f, "{}", m.to_csv_row())?;

        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, val_acc={:.4}",
            m.epoch,
            m.train_loss,
            m.val_acc,
        );

        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_improvement() {
        let m = EpochMetrics::new(2, 1.2, 0.6, 1.3, 0.55, 1e-4);
        assert!(m.is_improvement(0.5));
        assert!(!m.is_improvement(0.55));
    }

    #[test]
    fn test_rows_are_appended_under_header() {
        let dir    = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::new(dir.path().to_string_lossy().to_string()).unwrap();

        logger.log(&EpochMetrics::new(1, 1.5, 0.25, 1.4, 0.5, 1e-4)).unwrap();
        logger.log(&EpochMetrics::new(2, 1.0, 0.5, f64::NAN, f64::NAN, 7.5e-5)).unwrap();

        let csv = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[1], "1,1.500000,0.250000,1.400000,0.500000,1e-4");
        assert_eq!(lines[2], "2,1.000000,0.500000,NaN,NaN,7.5e-5");
    }

    #[test]
    fn test_new_run_replaces_old_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_string_lossy().to_string();

        let first = MetricsLogger::new(path.clone()).unwrap();
        first.log(&EpochMetrics::new(1, 1.0, 0.0, 1.0, 0.0, 1e-3)).unwrap();

        let second = MetricsLogger::new(path).unwrap();
        let csv = fs::read_to_string(second.csv_path()).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }
}
