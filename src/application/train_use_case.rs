// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Validate hyperparameters
//   Step 2: Load the intent corpus          (Layer 4 - data)
//   Step 3: Build the label dictionary      (Layer 3 - domain)
//   Step 4: Seeded train/test split         (Layer 4 - data)
//   Step 5: Build tokenizer                 (Layer 6 - infra)
//   Step 6: Encode samples                  (Layer 4 - data)
//   Step 7: Save config + labels            (Layer 6 - infra)
//   Step 8: Run training loop               (Layer 5 - ml)

use anyhow::{bail, Result};
use burn::tensor::backend::AutodiffBackend;
use serde::{Deserialize, Serialize};

use crate::data::{
    dataset::IntentDataset,
    encoder::SequenceEncoder,
    loader::CorpusLoader,
    splitter::split_train_test,
};
use crate::domain::{label_dict::LabelDict, traits::UtteranceSource, utterance::Utterance};
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::{EpochMetrics, MetricsLogger},
    tokenizer_store::TokenizerStore,
};
use crate::ml::model::IntentClassifierConfig;
use crate::ml::trainer::{run_training, train_loop};

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run. Saved next to the
// checkpoints so `test` and `predict` rebuild the same model and
// re-derive the same held-out split.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_dir:              String,
    pub checkpoint_dir:        String,
    pub max_seq_len:           usize,
    pub batch_size:            usize,
    pub epochs:                usize,
    pub model_lr:              f64,
    pub weight_decay:          f64,
    pub lr_scheduler_factor:   f64,
    pub lr_scheduler_patience: usize,
    pub lr_scheduler_min_lr:   f64,
    pub lr_scheduler_warm_up:  usize,
    pub train_fraction:        f64,
    pub seed:                  u64,
    pub d_model:               usize,
    pub num_heads:             usize,
    pub num_layers:            usize,
    pub d_ff:                  usize,
    pub dropout:               f64,
    pub vocab_size:            usize,
    pub num_workers:           usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_dir:              "data/intents".to_string(),
            checkpoint_dir:        "checkpoints".to_string(),
            max_seq_len:           32,
            batch_size:            512,
            epochs:                300,
            model_lr:              1e-4,
            weight_decay:          1e-4,
            lr_scheduler_factor:   0.75,
            lr_scheduler_patience: 10,
            lr_scheduler_min_lr:   1e-12,
            lr_scheduler_warm_up:  100,
            train_fraction:        0.8,
            seed:                  42,
            d_model:               128,
            num_heads:             4,
            num_layers:            2,
            d_ff:                  512,
            dropout:               0.1,
            vocab_size:            10000,
            num_workers:           1,
        }
    }
}

impl TrainConfig {
    /// Reject settings that would only fail deep inside Burn.
    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            bail!("epochs must be at least 1");
        }
        if self.batch_size == 0 {
            bail!("batch_size must be at least 1");
        }
        if self.max_seq_len == 0 {
            bail!("max_seq_len must be at least 1");
        }
        if self.num_heads == 0 || self.d_model % self.num_heads != 0 {
            bail!("d_model ({}) must be divisible by num_heads ({})", self.d_model, self.num_heads);
        }
        if !(self.train_fraction > 0.0 && self.train_fraction <= 1.0) {
            bail!("train_fraction must be in (0, 1], got {}", self.train_fraction);
        }
        if !(0.0..1.0).contains(&self.dropout) {
            bail!("dropout must be in [0, 1), got {}", self.dropout);
        }
        Ok(())
    }

    pub fn model_config(&self, num_labels: usize) -> IntentClassifierConfig {
        IntentClassifierConfig::new(
            self.vocab_size, num_labels, self.max_seq_len, self.d_model,
            self.num_heads, self.num_layers, self.d_ff, self.dropout,
        )
    }
}

/// A corpus split the same way every time for a given config.
pub struct SplitCorpus {
    pub labels: LabelDict,
    pub train:  Vec<Utterance>,
    pub test:   Vec<Utterance>,
}

/// Load the corpus under `cfg.data_dir` and split it with `cfg.seed`.
pub fn load_split_corpus(cfg: &TrainConfig) -> Result<SplitCorpus> {
    tracing::info!("Loading intent corpus from '{}'", cfg.data_dir);
    let utterances = CorpusLoader::new(&cfg.data_dir).load_all()?;
    if utterances.is_empty() {
        bail!("No utterances found in '{}'", cfg.data_dir);
    }

    let labels = LabelDict::from_utterances(&utterances);
    tracing::info!("Found {} intents: {:?}", labels.len(), labels.labels());

    let (train, test) = split_train_test(utterances, cfg.train_fraction, cfg.seed);
    tracing::info!("Split: {} train, {} test", train.len(), test.len());

    Ok(SplitCorpus { labels, train, test })
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

struct PreparedRun {
    labels:   LabelDict,
    train:    IntentDataset,
    test:     IntentDataset,
    ckpt:     CheckpointManager,
    metrics:  MetricsLogger,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Train on the default GPU backend.
    pub fn execute(&self) -> Result<Vec<EpochMetrics>> {
        let run = self.prepare()?;
        run_training(&self.config, run.labels.len(), run.train, run.test, &run.ckpt, &run.metrics)
    }

    /// Train on any autodiff backend.
    pub fn execute_on<B: AutodiffBackend>(&self, device: B::Device) -> Result<Vec<EpochMetrics>> {
        let run = self.prepare()?;
        train_loop::<B>(&self.config, run.labels.len(), run.train, run.test, &run.ckpt, &run.metrics, device)
    }

    fn prepare(&self) -> Result<PreparedRun> {
        let cfg = &self.config;
        cfg.validate()?;

        let corpus = load_split_corpus(cfg)?;

        // Vocabulary comes from this run's training split only, so a
        // tokenizer left over from an earlier run is always replaced
        let train_texts: Vec<String> = corpus.train.iter().map(|u| u.text.clone()).collect();
        let tokenizer = TokenizerStore::new(&cfg.checkpoint_dir)
            .build(&train_texts, cfg.vocab_size)?;
        let encoder = SequenceEncoder::new(tokenizer, cfg.max_seq_len)?;

        let train = IntentDataset::new(encoder.samples(&corpus.train, &corpus.labels)?);
        let test  = IntentDataset::new(encoder.samples(&corpus.test, &corpus.labels)?);

        let ckpt = CheckpointManager::new(&cfg.checkpoint_dir);
        ckpt.save_config(cfg)?;
        ckpt.save_labels(&corpus.labels)?;

        let metrics = MetricsLogger::new(&cfg.checkpoint_dir)?;
        tracing::info!("Epoch metrics → '{}'", metrics.csv_path().display());

        Ok(PreparedRun { labels: corpus.labels, train, test, ckpt, metrics })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(TrainConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let bad = [
            TrainConfig { epochs: 0, ..TrainConfig::default() },
            TrainConfig { batch_size: 0, ..TrainConfig::default() },
            TrainConfig { d_model: 130, num_heads: 4, ..TrainConfig::default() },
            TrainConfig { train_fraction: 0.0, ..TrainConfig::default() },
            TrainConfig { dropout: 1.0, ..TrainConfig::default() },
        ];
        for cfg in bad {
            assert!(cfg.validate().is_err(), "accepted {cfg:?}");
        }
    }

    #[test]
    fn test_model_config_carries_architecture() {
        let cfg = TrainConfig::default();
        let model_cfg = cfg.model_config(7);
        assert_eq!(model_cfg.num_labels, 7);
        assert_eq!(model_cfg.d_model, cfg.d_model);
        assert_eq!(model_cfg.max_seq_len, cfg.max_seq_len);
    }

    #[test]
    fn test_empty_corpus_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = TrainConfig {
            data_dir: dir.path().to_string_lossy().to_string(),
            ..TrainConfig::default()
        };
        assert!(load_split_corpus(&cfg).is_err());
    }
}
