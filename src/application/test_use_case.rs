// ============================================================
// Layer 2 — Test Use Case
// ============================================================
// Measures the latest checkpoint on the held-out split.
//
// The split is not stored on disk: the corpus is reloaded and
// split again with the seed and fraction from train_config.json,
// which yields the exact utterances training never saw. If the
// corpus has changed since training (different intents), the
// run is refused instead of silently mislabelling classes.

use anyhow::{bail, Result};
use burn::prelude::Backend;

use crate::application::train_use_case::{load_split_corpus, TrainConfig};
use crate::data::{dataset::IntentDataset, encoder::SequenceEncoder};
use crate::domain::label_dict::LabelDict;
use crate::infra::{checkpoint::CheckpointManager, tokenizer_store::TokenizerStore};
use crate::ml::evaluator::{run_test, test_checkpoint, TestReport};

pub struct TestUseCase {
    checkpoint_dir: String,
    data_dir:       Option<String>,
}

struct PreparedTest {
    cfg:     TrainConfig,
    labels:  LabelDict,
    dataset: IntentDataset,
    ckpt:    CheckpointManager,
}

impl TestUseCase {
    /// `data_dir` overrides the corpus location saved at training time.
    pub fn new(checkpoint_dir: impl Into<String>, data_dir: Option<String>) -> Self {
        Self { checkpoint_dir: checkpoint_dir.into(), data_dir }
    }

    /// Test on the default GPU backend.
    pub fn execute(&self) -> Result<TestReport> {
        let run    = self.prepare()?;
        let report = run_test(&run.cfg, run.labels.len(), run.dataset, &run.ckpt)?;
        run.ckpt.save_test_report(&report)?;
        Ok(report)
    }

    /// Test on any backend.
    pub fn execute_on<B: Backend>(&self, device: B::Device) -> Result<TestReport> {
        let run    = self.prepare()?;
        let report = test_checkpoint::<B>(&run.cfg, run.labels.len(), run.dataset, &run.ckpt, device)?;
        run.ckpt.save_test_report(&report)?;
        Ok(report)
    }

    fn prepare(&self) -> Result<PreparedTest> {
        let ckpt    = CheckpointManager::new(&self.checkpoint_dir);
        let mut cfg = ckpt.load_config()?;
        if let Some(dir) = &self.data_dir {
            cfg.data_dir = dir.clone();
        }
        let labels = ckpt.load_labels()?;

        let corpus = load_split_corpus(&cfg)?;
        if corpus.labels != labels {
            bail!(
                "Corpus intents {:?} differ from the trained intents {:?} — retrain first",
                corpus.labels.labels(),
                labels.labels()
            );
        }
        if corpus.test.is_empty() {
            bail!("Held-out split is empty (train_fraction = {})", cfg.train_fraction);
        }

        let tokenizer = TokenizerStore::new(&self.checkpoint_dir).load()?;
        let encoder   = SequenceEncoder::new(tokenizer, cfg.max_seq_len)?;
        let dataset   = IntentDataset::new(encoder.samples(&corpus.test, &labels)?);
        tracing::info!("Testing on {} held-out utterances", dataset.sample_count());

        Ok(PreparedTest { cfg, labels, dataset, ckpt })
    }
}
