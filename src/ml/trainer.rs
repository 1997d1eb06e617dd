// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Epoch-based training with Burn's DataLoader and Adam.
//
// Per epoch:
//   1. train_epoch: forward → clf_logits → loss → backward/step,
//      averaging loss and accuracy over batches
//   2. scheduler step on the training loss (only after warm-up)
//   3. validation on the held-out split with model.valid()
//   4. metrics row + checkpoint
//
// Backends:
//   - Training uses Autodiff<B> for gradients
//   - model.valid() returns the model on B::InnerBackend,
//     which also switches dropout off
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::{bail, Result};
use burn::{
    data::dataloader::{DataLoader, DataLoaderBuilder},
    module::AutodiffModule,
    optim::{decay::WeightDecayConfig, AdamConfig, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
    LearningRate,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::{IntentBatch, IntentBatcher}, dataset::IntentDataset};
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::evaluator::{count_correct, evaluate};
use crate::ml::loss::{ClassificationLoss, SoftmaxLoss};
use crate::ml::model::IntentClassifierModel;
use crate::ml::scheduler::ReduceLrOnPlateau;

type MyBackend = burn::backend::Autodiff<burn::backend::Wgpu>;

/// Loss and accuracy of one training epoch.
/// Both are unweighted means of the per-batch values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochSummary {
    pub loss:     f64,
    pub accuracy: f64,
}

pub fn run_training(
    cfg:           &TrainConfig,
    num_labels:    usize,
    train_dataset: IntentDataset,
    val_dataset:   IntentDataset,
    ckpt_manager:  &CheckpointManager,
    metrics:       &MetricsLogger,
) -> Result<Vec<EpochMetrics>> {
    let device = burn::backend::wgpu::WgpuDevice::default();
    tracing::info!("Using WGPU device: {:?}", device);
    train_loop::<MyBackend>(cfg, num_labels, train_dataset, val_dataset, ckpt_manager, metrics, device)
}

pub fn train_loop<B: AutodiffBackend>(
    cfg:           &TrainConfig,
    num_labels:    usize,
    train_dataset: IntentDataset,
    val_dataset:   IntentDataset,
    ckpt_manager:  &CheckpointManager,
    metrics:       &MetricsLogger,
    device:        B::Device,
) -> Result<Vec<EpochMetrics>> {
    if train_dataset.sample_count() == 0 {
        bail!("Training split is empty — add more utterances or raise train_fraction");
    }
    let has_validation = val_dataset.sample_count() > 0;
    if !has_validation {
        tracing::warn!("Held-out split is empty — validation metrics will be NaN");
    }

    // ── Build model ───────────────────────────────────────────────────────────
    let mut model: IntentClassifierModel<B> = cfg.model_config(num_labels).init(&device);
    tracing::info!(
        "Model ready: {} layers, d_model={}, {} intents",
        cfg.num_layers, cfg.d_model, num_labels
    );

    // ── Adam with weight decay + plateau policy ───────────────────────────────
    let mut optim = AdamConfig::new()
        .with_epsilon(1e-8)
        .with_weight_decay(Some(WeightDecayConfig::new(cfg.weight_decay as f32)))
        .init::<B, IntentClassifierModel<B>>();
    let mut scheduler = ReduceLrOnPlateau::new(
        cfg.model_lr,
        cfg.lr_scheduler_factor,
        cfg.lr_scheduler_patience,
        cfg.lr_scheduler_min_lr,
    )?;
    let loss_fn = SoftmaxLoss::new();

    // ── Data loaders ──────────────────────────────────────────────────────────
    let train_loader = DataLoaderBuilder::new(IntentBatcher::<B>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(cfg.num_workers)
        .build(train_dataset);

    let val_loader = DataLoaderBuilder::new(IntentBatcher::<B::InnerBackend>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .num_workers(cfg.num_workers)
        .build(val_dataset);

    // ── Epoch loop ────────────────────────────────────────────────────────────
    let mut history      = Vec::with_capacity(cfg.epochs);
    let mut best_val_acc = f64::NEG_INFINITY;
    for epoch in 1..=cfg.epochs {
        let lr = scheduler.lr();

        let (trained, train) = train_epoch(model, &mut optim, train_loader.as_ref(), &loss_fn, lr)?;
        model = trained;

        if epoch > cfg.lr_scheduler_warm_up {
            scheduler.step(train.loss);
            tracing::debug!(
                "Scheduler: best={:.6}, bad_epochs={}",
                scheduler.best(),
                scheduler.num_bad_epochs()
            );
        }

        let (val_loss, val_acc) = if has_validation {
            let summary = evaluate(&model.valid(), val_loader.as_ref(), &loss_fn)?;
            (summary.loss, summary.accuracy)
        } else {
            (f64::NAN, f64::NAN)
        };

        let row = EpochMetrics::new(epoch, train.loss, train.accuracy, val_loss, val_acc, lr);

        println!(
            "Epoch {:>3}/{} | lr={:.2e} | train_loss={:.4} | train_acc={:.1}% | val_loss={:.4} | val_acc={:.1}%",
            epoch, cfg.epochs, lr, row.train_loss, row.train_acc * 100.0,
            row.val_loss, row.val_acc * 100.0,
        );

        if row.is_improvement(best_val_acc) {
            best_val_acc = row.val_acc;
            tracing::info!("New best validation accuracy {:.4} at epoch {}", best_val_acc, epoch);
        }

        metrics.log(&row)?;
        ckpt_manager.save_model(&model, epoch)?;
        tracing::debug!("Checkpoint saved for epoch {}", epoch);
        history.push(row);
    }

    tracing::info!("Training complete!");
    Ok(history)
}

/// One pass over the training loader. Returns the updated model.
pub fn train_epoch<B, O>(
    mut model: IntentClassifierModel<B>,
    optim:     &mut O,
    loader:    &dyn DataLoader<IntentBatch<B>>,
    loss_fn:   &SoftmaxLoss,
    lr:        LearningRate,
) -> Result<(IntentClassifierModel<B>, EpochSummary)>
where
    B: AutodiffBackend,
    O: Optimizer<IntentClassifierModel<B>, B>,
{
    let mut losses     = Vec::new();
    let mut accuracies = Vec::new();

    for batch in loader.iter() {
        let batch_size = batch.labels.dims()[0];

        let feats  = model.forward(batch.input_ids, batch.attention_mask);
        let logits = model.clf_logits(feats.clone());
        let loss   = loss_fn.compute_loss(logits.clone(), feats, batch.labels.clone());

        let loss_val: f64 = loss.clone().into_scalar().elem();
        let correct = count_correct(logits, batch.labels);

        model = loss_fn.step(loss, model, optim, lr);

        losses.push(loss_val);
        accuracies.push(correct as f64 / batch_size.max(1) as f64);
    }

    if losses.is_empty() {
        bail!("Training loader produced no batches");
    }

    let summary = EpochSummary {
        loss:     mean(&losses),
        accuracy: mean(&accuracies),
    };
    Ok((model, summary))
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
