// ============================================================
// Layer 5 — Reduce-on-Plateau Learning Rate Policy
// ============================================================
// Watches a loss that should go down. When it stops improving
// for more than `patience` consecutive steps, the learning rate
// is multiplied by `factor` (never going below `min_lr`).
//
//   improvement:  metric < best * (1 - threshold)
//   plateau:      num_bad_epochs > patience
//   reduction:    lr = max(lr * factor, min_lr)
//
// A reduction smaller than `eps` is ignored, so once the rate
// has hit `min_lr` it stays there quietly.
//
// Burn's built-in schedulers are step-driven and never see a
// metric, so this policy lives here and the trainer passes the
// resulting rate to `optim.step` explicitly.

use anyhow::{bail, Result};
use burn::LearningRate;

const DEFAULT_THRESHOLD: f64 = 1e-4;
const DEFAULT_EPS:       f64 = 1e-8;

#[derive(Debug, Clone)]
pub struct ReduceLrOnPlateau {
    lr:             LearningRate,
    factor:         f64,
    patience:       usize,
    min_lr:         LearningRate,
    threshold:      f64,
    eps:            f64,
    best:           f64,
    num_bad_epochs: usize,
}

impl ReduceLrOnPlateau {
    pub fn new(
        initial_lr: LearningRate,
        factor:     f64,
        patience:   usize,
        min_lr:     LearningRate,
    ) -> Result<Self> {
        if !(factor > 0.0 && factor < 1.0) {
            bail!("lr scheduler factor must be in (0, 1), got {factor}");
        }
        if !(initial_lr > 0.0) {
            bail!("learning rate must be positive, got {initial_lr}");
        }
        if !(min_lr >= 0.0) {
            bail!("min_lr must be non-negative, got {min_lr}");
        }
        Ok(Self {
            lr: initial_lr,
            factor,
            patience,
            min_lr,
            threshold:      DEFAULT_THRESHOLD,
            eps:            DEFAULT_EPS,
            best:           f64::INFINITY,
            num_bad_epochs: 0,
        })
    }

    /// The rate the optimiser should use for the next update
    pub fn lr(&self) -> LearningRate {
        self.lr
    }

    pub fn best(&self) -> f64 {
        self.best
    }

    pub fn num_bad_epochs(&self) -> usize {
        self.num_bad_epochs
    }

    /// Feed one observation of the monitored loss.
    /// Returns the learning rate to use from now on.
    pub fn step(&mut self, metric: f64) -> LearningRate {
        // NaN compares false, so it counts as no improvement
        if metric < self.best * (1.0 - self.threshold) {
            self.best           = metric;
            self.num_bad_epochs = 0;
        } else {
            self.num_bad_epochs += 1;
        }

        if self.num_bad_epochs > self.patience {
            let new_lr = (self.lr * self.factor).max(self.min_lr);
            if self.lr - new_lr > self.eps {
                tracing::info!(
                    "Loss plateaued for {} epochs: reducing learning rate {:.4e} → {:.4e}",
                    self.num_bad_epochs,
                    self.lr,
                    new_lr,
                );
                self.lr = new_lr;
            }
            self.num_bad_epochs = 0;
        }

        self.lr
    }
}
