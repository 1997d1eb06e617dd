// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer programs against these traits so the
// corpus format and the prediction engine can be swapped
// without touching the use cases.

use anyhow::Result;
use crate::domain::utterance::{Prediction, Utterance};

// ─── UtteranceSource ──────────────────────────────────────────────────────────
/// Any component that can produce a labelled corpus.
///
/// Implementations:
///   - CorpusLoader → one file per intent in a directory
pub trait UtteranceSource {
    /// Load every labelled utterance available from this source.
    fn load_all(&self) -> Result<Vec<Utterance>>;
}

// ─── IntentPredictor ──────────────────────────────────────────────────────────
/// Any component that maps a sentence to an intent.
///
/// Implementations:
///   - Inferencer → the trained transformer classifier
pub trait IntentPredictor {
    fn predict(&self, text: &str) -> Result<Prediction>;
}
