use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

/// One tokenised and padded utterance with its class index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentSample {
    pub input_ids:      Vec<u32>,
    pub attention_mask: Vec<u32>,
    pub label:          usize,
}

pub struct IntentDataset {
    samples: Vec<IntentSample>,
}

impl IntentDataset {
    pub fn new(samples: Vec<IntentSample>) -> Self { Self { samples } }

    pub fn sample_count(&self) -> usize { self.samples.len() }
}

impl Dataset<IntentSample> for IntentDataset {
    fn get(&self, index: usize) -> Option<IntentSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
