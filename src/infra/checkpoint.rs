// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores everything a trained classifier needs,
// using Burn's CompactRecorder for the weights and serde_json
// for the rest.
//
// File layout:
//   checkpoints/
//     model_epoch_1.mpk.gz   ← weights after epoch 1
//     ...
//     latest_epoch.json      ← number of the last saved epoch
//     train_config.json      ← hyperparameters and split seed
//     label_dict.json        ← class index → intent name
//     test_result.json       ← written by the `test` command
//
// The config and label dictionary are written before the first
// epoch: without them the weights cannot be rebuilt into a
// model of the right shape.
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::{fs, path::PathBuf};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};

use crate::application::train_use_case::TrainConfig;
use crate::domain::label_dict::LabelDict;
use crate::ml::evaluator::TestReport;
use crate::ml::model::IntentClassifierModel;

const LATEST_EPOCH_FILE: &str = "latest_epoch.json";
const CONFIG_FILE:       &str = "train_config.json";
const LABELS_FILE:       &str = "label_dict.json";
const TEST_RESULT_FILE:  &str = "test_result.json";

pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Creates the directory if it doesn't already exist.
    pub fn new(dir: impl Into<String>) -> Self {
        let dir = PathBuf::from(dir.into());
        if let Err(e) = fs::create_dir_all(&dir) {
            tracing::warn!("Cannot create checkpoint directory '{}': {}", dir.display(), e);
        }
        Self { dir }
    }

    /// Save model weights for `epoch` and point latest_epoch.json at them.
    pub fn save_model<B: Backend>(
        &self,
        model: &IntentClassifierModel<B>,
        epoch: usize,
    ) -> Result<()> {
        // Recorder adds the .mpk.gz extension
        let path = self.dir.join(format!("model_epoch_{epoch}"));

        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| {
                format!("Failed to save checkpoint to '{}'", path.display())
            })?;

        self.write_json(LATEST_EPOCH_FILE, &epoch)?;
        tracing::debug!("Saved checkpoint: epoch {}", epoch);
        Ok(())
    }

    /// Load the weights of the latest saved epoch into `model`.
    /// The model must have been built with the saved architecture.
    pub fn load_model<B: Backend>(
        &self,
        model:  IntentClassifierModel<B>,
        device: &B::Device,
    ) -> Result<IntentClassifierModel<B>> {
        let epoch = self.latest_epoch()?;
        let path  = self.dir.join(format!("model_epoch_{epoch}"));

        tracing::info!("Loading checkpoint from epoch {}", epoch);

        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| {
                format!("Cannot load checkpoint '{}'. Have you trained the model first?",
                    path.display())
            })?;

        Ok(model.load_record(record))
    }

    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        self.write_json(CONFIG_FILE, cfg)
    }

    pub fn load_config(&self) -> Result<TrainConfig> {
        self.read_json(CONFIG_FILE)
    }

    pub fn save_labels(&self, labels: &LabelDict) -> Result<()> {
        self.write_json(LABELS_FILE, labels)
    }

    pub fn load_labels(&self) -> Result<LabelDict> {
        self.read_json(LABELS_FILE)
    }

    pub fn save_test_report(&self, report: &TestReport) -> Result<()> {
        self.write_json(TEST_RESULT_FILE, report)
    }

    /// Returns an error if training hasn't been run yet.
    pub fn latest_epoch(&self) -> Result<usize> {
        self.read_json(LATEST_EPOCH_FILE)
    }

    fn write_json<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<()> {
        let path = self.dir.join(name);
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write '{}'", path.display()))?;
        tracing::debug!("Wrote '{}'", path.display());
        Ok(())
    }

    fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let path = self.dir.join(name);
        let json = fs::read_to_string(&path)
            .with_context(|| {
                format!(
                    "Cannot read '{}'. Make sure you have run 'train' first.",
                    path.display()
                )
            })?;
        serde_json::from_str(&json)
            .with_context(|| format!("'{}' is not valid", path.display()))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use crate::ml::model::IntentClassifierConfig;

    type TestBackend = NdArray;

    fn manager() -> (tempfile::TempDir, CheckpointManager) {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path().to_string_lossy().to_string());
        (dir, ckpt)
    }

    #[test]
    fn test_missing_files_mention_training() {
        let (_dir, ckpt) = manager();
        let err = ckpt.load_config().unwrap_err();
        assert!(format!("{err:#}").contains("run 'train' first"));
        assert!(ckpt.latest_epoch().is_err());
    }

    #[test]
    fn test_config_and_labels_persist() {
        let (_dir, ckpt) = manager();
        let cfg = TrainConfig { epochs: 7, seed: 99, ..TrainConfig::default() };
        let labels = LabelDict::from_labels(["dust", "weather"]);

        ckpt.save_config(&cfg).unwrap();
        ckpt.save_labels(&labels).unwrap();

        let loaded = ckpt.load_config().unwrap();
        assert_eq!(loaded.epochs, 7);
        assert_eq!(loaded.seed, 99);
        assert_eq!(ckpt.load_labels().unwrap(), labels);
    }

    #[test]
    fn test_weights_round_trip_latest_epoch() {
        let (_dir, ckpt) = manager();
        let device = Default::default();
        let config = IntentClassifierConfig::new(10, 2, 4, 8, 2, 1, 16, 0.0);

        let first:  IntentClassifierModel<TestBackend> = config.init(&device);
        let second: IntentClassifierModel<TestBackend> = config.init(&device);
        ckpt.save_model(&first, 1).unwrap();
        ckpt.save_model(&second, 2).unwrap();
        assert_eq!(ckpt.latest_epoch().unwrap(), 2);

        let fresh: IntentClassifierModel<TestBackend> = config.init(&device);
        let loaded = ckpt.load_model(fresh, &device).unwrap();

        let expected = second.classifier.weight.val();
        let actual   = loaded.classifier.weight.val();
        // CompactRecorder stores half precision
        let diff: f32 = (expected - actual).abs().max().into_scalar().elem();
        assert!(diff < 1e-2);
    }
}
