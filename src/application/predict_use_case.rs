// ============================================================
// Layer 2 — Predict Use Case
// ============================================================
// Thin wrapper so the CLI talks to an IntentPredictor and never
// to Burn types directly.

use anyhow::Result;

use crate::domain::{traits::IntentPredictor, utterance::Prediction};
use crate::ml::inferencer::Inferencer;

pub struct PredictUseCase {
    predictor: Box<dyn IntentPredictor>,
}

impl PredictUseCase {
    pub fn new(checkpoint_dir: &str) -> Result<Self> {
        let inferencer = Inferencer::from_checkpoint_dir(checkpoint_dir)?;
        Ok(Self::with_predictor(Box::new(inferencer)))
    }

    pub fn with_predictor(predictor: Box<dyn IntentPredictor>) -> Self {
        Self { predictor }
    }

    pub fn predict(&self, text: &str) -> Result<Prediction> {
        self.predictor.predict(text)
    }
}
