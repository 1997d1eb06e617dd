// ============================================================
// Layer 5 — Inferencer
// ============================================================
// Loads everything a training run left behind and classifies
// one utterance at a time.
//
//   train_config.json  → architecture + max_seq_len
//   label_dict.json    → class index → intent name
//   tokenizer.json     → same vocabulary as training
//   model_epoch_N      → weights of the latest epoch
use anyhow::{anyhow, Result};
use burn::prelude::*;

use crate::data::encoder::SequenceEncoder;
use crate::domain::{label_dict::LabelDict, traits::IntentPredictor, utterance::Prediction};
use crate::infra::{checkpoint::CheckpointManager, tokenizer_store::TokenizerStore};
use crate::ml::model::IntentClassifierModel;

type InferBackend = burn::backend::Wgpu;

pub struct Inferencer<B: Backend = InferBackend> {
    model:   IntentClassifierModel<B>,
    encoder: SequenceEncoder,
    labels:  LabelDict,
    device:  B::Device,
}

impl Inferencer<InferBackend> {
    pub fn from_checkpoint_dir(checkpoint_dir: &str) -> Result<Self> {
        Self::load(checkpoint_dir, burn::backend::wgpu::WgpuDevice::default())
    }
}

impl<B: Backend> Inferencer<B> {
    pub fn load(checkpoint_dir: &str, device: B::Device) -> Result<Self> {
        let ckpt   = CheckpointManager::new(checkpoint_dir);
        let cfg    = ckpt.load_config()?;
        let labels = ckpt.load_labels()?;
        if labels.is_empty() {
            return Err(anyhow!("Label dictionary in '{checkpoint_dir}' is empty"));
        }

        let tokenizer = TokenizerStore::new(checkpoint_dir).load()?;
        let encoder   = SequenceEncoder::new(tokenizer, cfg.max_seq_len)?;

        let mut model_cfg = cfg.model_config(labels.len());
        model_cfg.dropout = 0.0;
        let model: IntentClassifierModel<B> = model_cfg.init(&device);
        let model = ckpt.load_model(model, &device)?;
        tracing::info!("Model loaded from checkpoint ({} intents)", labels.len());

        Ok(Self::from_parts(model, encoder, labels, device))
    }

    fn from_parts(
        model:   IntentClassifierModel<B>,
        encoder: SequenceEncoder,
        labels:  LabelDict,
        device:  B::Device,
    ) -> Self {
        Self { model, encoder, labels, device }
    }
}

impl<B: Backend> IntentPredictor for Inferencer<B> {
    fn predict(&self, text: &str) -> Result<Prediction> {
        let (ids, mask) = self.encoder.encode(text)?;
        let seq_len = ids.len();

        let ids: Vec<i32>  = ids.iter().map(|&x| x as i32).collect();
        let mask: Vec<i32> = mask.iter().map(|&x| x as i32).collect();

        // Batch of one: [1, seq_len]
        let input_ids = Tensor::<B, 1, Int>::from_ints(ids.as_slice(), &self.device)
            .reshape([1, seq_len]);
        let attention_mask = Tensor::<B, 1, Int>::from_ints(mask.as_slice(), &self.device)
            .reshape([1, seq_len]);

        let logits = self.model.predict_logits(input_ids, attention_mask); // [1, num_labels]
        let probs: Vec<f32> = burn::tensor::activation::softmax(logits, 1)
            .into_data()
            .convert::<f32>()
            .to_vec()
            .map_err(|e| anyhow!("Cannot read class probabilities: {e:?}"))?;

        let (index, confidence) = most_probable(&probs)
            .ok_or_else(|| anyhow!("Model produced no finite class probability for '{text}'"))?;

        let label = self
            .labels
            .label_of(index)
            .ok_or_else(|| anyhow!("Predicted class {index} has no label"))?
            .to_string();

        tracing::debug!("'{}' → {} ({:.4})", text, label, confidence);
        Ok(Prediction { label, confidence })
    }
}

/// Index and value of the largest finite probability.
fn most_probable(probs: &[f32]) -> Option<(usize, f32)> {
    probs
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, p)| p.is_finite())
        .fold(None, |best, (i, p)| match best {
            Some((_, best_p)) if best_p >= p => best,
            _ => Some((i, p)),
        })
}
