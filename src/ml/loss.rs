// ============================================================
// Layer 5 — Classification Loss
// ============================================================
// The loss interface takes both the logits and the pooled
// features. Softmax cross-entropy only needs the logits, but
// feature-space losses (centre loss, cosine margins) need the
// features too and plug in behind the same trait.
//
// `step` owns the backward pass and the optimiser update so the
// trainer never touches gradients directly.
//
// Reference: Burn Book §5 (Custom Training Loop)

use burn::{
    module::AutodiffModule,
    nn::loss::CrossEntropyLossConfig,
    optim::{GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
    LearningRate,
};

pub trait ClassificationLoss<B: Backend> {
    /// logits: [batch, num_labels], feats: [batch, d_model], labels: [batch]
    /// → scalar loss, shape [1]
    fn compute_loss(
        &self,
        logits: Tensor<B, 2>,
        feats:  Tensor<B, 2>,
        labels: Tensor<B, 1, Int>,
    ) -> Tensor<B, 1>;
}

/// Mean cross-entropy over the softmax of the logits.
#[derive(Debug, Clone, Default)]
pub struct SoftmaxLoss;

impl SoftmaxLoss {
    pub fn new() -> Self {
        Self
    }

    /// Backward pass + one optimiser update. Returns the updated model.
    pub fn step<B, M, O>(
        &self,
        loss:  Tensor<B, 1>,
        model: M,
        optim: &mut O,
        lr:    LearningRate,
    ) -> M
    where
        B: AutodiffBackend,
        M: AutodiffModule<B>,
        O: Optimizer<M, B>,
    {
        let grads = loss.backward();
        let grads = GradientsParams::from_grads(grads, &model);
        optim.step(lr, model, grads)
    }
}

impl<B: Backend> ClassificationLoss<B> for SoftmaxLoss {
    fn compute_loss(
        &self,
        logits: Tensor<B, 2>,
        _feats: Tensor<B, 2>,
        labels: Tensor<B, 1, Int>,
    ) -> Tensor<B, 1> {
        CrossEntropyLossConfig::new()
            .init(&logits.device())
            .forward(logits, labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_uniform_logits_give_ln_num_classes() {
        let device = Default::default();
        let logits = Tensor::<TestBackend, 2>::zeros([2, 4], &device);
        let feats  = Tensor::<TestBackend, 2>::zeros([2, 8], &device);
        let labels = Tensor::<TestBackend, 1, Int>::from_ints([0, 3], &device);

        let loss: f32 = SoftmaxLoss::new()
            .compute_loss(logits, feats, labels)
            .into_scalar()
            .elem();
        assert!((loss - 4f32.ln()).abs() < 1e-5);
    }

    #[test]
    fn test_confident_correct_logits_give_small_loss() {
        let device = Default::default();
        let logits = Tensor::<TestBackend, 1>::from_floats([10.0, -10.0, -10.0, 10.0], &device)
            .reshape([2, 2]);
        let feats  = Tensor::<TestBackend, 2>::zeros([2, 1], &device);
        let labels = Tensor::<TestBackend, 1, Int>::from_ints([0, 1], &device);

        let loss: f32 = SoftmaxLoss::new()
            .compute_loss(logits, feats, labels)
            .into_scalar()
            .elem();
        assert!(loss < 1e-3);
    }
}
