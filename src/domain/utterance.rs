// ============================================================
// Layer 3 — Utterance Domain Type
// ============================================================
// One user utterance and the intent it expresses, e.g.
//
//   text:  "what's the weather like in busan tomorrow"
//   label: "weather"
//
// The label is kept as a string here. Class indices only exist
// once a LabelDict has been built over the whole corpus.

use serde::{Deserialize, Serialize};

/// A labelled utterance loaded from the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    /// The raw sentence as written by the user
    pub text: String,

    /// The intent name this sentence belongs to
    pub label: String,
}

impl Utterance {
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text:  text.into(),
            label: label.into(),
        }
    }
}

/// The classifier's answer for a single utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted intent name
    pub label: String,

    /// Softmax probability of the predicted class, in [0, 1]
    pub confidence: f32,
}
