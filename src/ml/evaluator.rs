// ============================================================
// Layer 5 — Evaluator
// ============================================================
// Runs a model without gradients over a data loader and reports
// the average loss and the accuracy.
//
// Used twice:
//   - per epoch by the trainer, on the held-out split
//   - by the `test` command, on a freshly loaded checkpoint
//
// Accuracy here is correct / total over every sample, so a
// short final batch weighs exactly as much as its size.

use anyhow::{bail, Result};
use burn::{
    data::dataloader::{DataLoader, DataLoaderBuilder},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::application::train_use_case::TrainConfig;
use crate::data::batcher::{IntentBatch, IntentBatcher};
use crate::data::dataset::IntentDataset;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::loss::{ClassificationLoss, SoftmaxLoss};
use crate::ml::model::IntentClassifierModel;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvalSummary {
    /// Mean of per-batch losses
    pub loss:     f64,
    pub accuracy: f64,
    pub samples:  usize,
}

/// Result of the `test` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestReport {
    pub test_accuracy: f64,
}

/// Number of rows whose argmax matches the label.
/// logits: [batch, num_labels], labels: [batch]
pub fn count_correct<B: Backend>(logits: Tensor<B, 2>, labels: Tensor<B, 1, Int>) -> usize {
    // argmax(1) returns [batch, 1] — flatten to [batch] before comparing
    let predicted = logits.argmax(1).flatten::<1>(0, 1);
    let correct: i64 = predicted.equal(labels).int().sum().into_scalar().elem();
    correct as usize
}

pub fn evaluate<B: Backend>(
    model:  &IntentClassifierModel<B>,
    loader: &dyn DataLoader<IntentBatch<B>>,
    loss:   &SoftmaxLoss,
) -> Result<EvalSummary> {
    let mut loss_sum = 0.0f64;
    let mut batches  = 0usize;
    let mut correct  = 0usize;
    let mut total    = 0usize;

    for batch in loader.iter() {
        let feats  = model.forward(batch.input_ids, batch.attention_mask);
        let logits = model.clf_logits(feats.clone());

        let batch_loss: f64 = loss
            .compute_loss(logits.clone(), feats, batch.labels.clone())
            .into_scalar()
            .elem();

        loss_sum += batch_loss;
        batches  += 1;
        total    += batch.labels.dims()[0];
        correct  += count_correct(logits, batch.labels);
    }

    if total == 0 {
        bail!("Cannot evaluate on an empty dataset");
    }

    Ok(EvalSummary {
        loss:     loss_sum / batches as f64,
        accuracy: correct as f64 / total as f64,
        samples:  total,
    })
}

/// Evaluate the latest checkpoint on the default GPU backend.
pub fn run_test(
    cfg:          &TrainConfig,
    num_labels:   usize,
    test_dataset: IntentDataset,
    ckpt_manager: &CheckpointManager,
) -> Result<TestReport> {
    let device = burn::backend::wgpu::WgpuDevice::default();
    test_checkpoint::<burn::backend::Wgpu>(cfg, num_labels, test_dataset, ckpt_manager, device)
}

/// Rebuild the model from `cfg`, load the latest weights and
/// measure accuracy on `test_dataset`.
pub fn test_checkpoint<B: Backend>(
    cfg:          &TrainConfig,
    num_labels:   usize,
    test_dataset: IntentDataset,
    ckpt_manager: &CheckpointManager,
    device:       B::Device,
) -> Result<TestReport> {
    let mut model_cfg = cfg.model_config(num_labels);
    model_cfg.dropout = 0.0;
    let model: IntentClassifierModel<B> = model_cfg.init(&device);
    let model = ckpt_manager.load_model(model, &device)?;

    let loader = DataLoaderBuilder::new(IntentBatcher::<B>::new(device))
        .batch_size(cfg.batch_size)
        .num_workers(cfg.num_workers)
        .build(test_dataset);

    let summary = evaluate(&model, loader.as_ref(), &SoftmaxLoss::new())?;
    tracing::info!(
        "Tested {} samples: loss={:.4}, accuracy={:.4}",
        summary.samples, summary.loss, summary.accuracy
    );

    Ok(TestReport { test_accuracy: summary.accuracy })
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    use crate::data::dataset::IntentSample;
    use crate::ml::model::IntentClassifierConfig;

    type TestBackend = NdArray;

    #[test]
    fn test_count_correct() {
        let device = Default::default();
        let logits = Tensor::<TestBackend, 1>::from_floats(
            [0.9, 0.1, 0.2, 0.8, 0.7, 0.3], &device,
        ).reshape([3, 2]);
        let labels = Tensor::<TestBackend, 1, Int>::from_ints([0, 1, 1], &device);
        assert_eq!(count_correct(logits, labels), 2);
    }

    #[test]
    fn test_evaluate_reports_sample_weighted_accuracy() {
        let device = Default::default();
        let model: IntentClassifierModel<TestBackend> =
            IntentClassifierConfig::new(10, 2, 4, 8, 2, 1, 16, 0.0).init(&device);

        let samples: Vec<IntentSample> = (0..5)
            .map(|i| IntentSample {
                input_ids:      vec![2 + i as u32, 3, 0, 0],
                attention_mask: vec![1, 1, 0, 0],
                label:          i % 2,
            })
            .collect();

        let loader = DataLoaderBuilder::new(IntentBatcher::<TestBackend>::new(device))
            .batch_size(2)
            .build(IntentDataset::new(samples));

        let summary = evaluate(&model, loader.as_ref(), &SoftmaxLoss::new()).unwrap();
        assert_eq!(summary.samples, 5);
        assert!((0.0..=1.0).contains(&summary.accuracy));
        assert!(summary.loss.is_finite());
        // Accuracy is a multiple of 1/5 because every sample counts once
        let scaled = summary.accuracy * 5.0;
        assert!((scaled - scaled.round()).abs() < 1e-9);
    }

    #[test]
    fn test_evaluate_empty_is_error() {
        let device = Default::default();
        let model: IntentClassifierModel<TestBackend> =
            IntentClassifierConfig::new(10, 2, 4, 8, 2, 1, 16, 0.0).init(&device);
        let loader = DataLoaderBuilder::new(IntentBatcher::<TestBackend>::new(device))
            .batch_size(2)
            .build(IntentDataset::new(Vec::new()));

        assert!(evaluate(&model, loader.as_ref(), &SoftmaxLoss::new()).is_err());
    }
}
