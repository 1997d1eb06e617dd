// ============================================================
// Layer 4 — Sequence Encoder
// ============================================================
// Converts one utterance into the fixed-length integer form the
// model consumes. Training, testing and prediction all go
// through this one function so the three can never disagree on
// truncation or padding.
//
//   "is it raining in seoul"
//       → input_ids      [17, 4, 230, 9, 88, 0, 0, ...]
//       → attention_mask [ 1, 1,   1, 1,  1, 0, 0, ...]

use anyhow::{anyhow, Result};
use tokenizers::Tokenizer;

use crate::data::dataset::IntentSample;
use crate::domain::{label_dict::LabelDict, utterance::Utterance};
use crate::infra::tokenizer_store::{PAD_ID, UNK_ID};

pub struct SequenceEncoder {
    tokenizer:   Tokenizer,
    max_seq_len: usize,
}

impl SequenceEncoder {
    pub fn new(tokenizer: Tokenizer, max_seq_len: usize) -> Result<Self> {
        if max_seq_len == 0 {
            return Err(anyhow!("max_seq_len must be at least 1"));
        }
        Ok(Self { tokenizer, max_seq_len })
    }

    /// Tokenise, truncate and pad `text`.
    /// Returns (input_ids, attention_mask), both `max_seq_len` long.
    pub fn encode(&self, text: &str) -> Result<(Vec<u32>, Vec<u32>)> {
        let enc = self
            .tokenizer
            .encode(text, false)
            .map_err(|e| anyhow!("Tokenisation error: {e}"))?;

        let mut input_ids: Vec<u32> = enc.get_ids().to_vec();
        input_ids.truncate(self.max_seq_len);

        // Every row needs at least one attended position for mean pooling
        if input_ids.is_empty() {
            input_ids.push(UNK_ID);
        }

        let real_len           = input_ids.len();
        let mut attention_mask = vec![1u32; real_len];
        input_ids.resize(self.max_seq_len, PAD_ID);
        attention_mask.resize(self.max_seq_len, 0);

        Ok((input_ids, attention_mask))
    }

    /// Encode a labelled utterance into a training sample.
    pub fn sample(&self, utterance: &Utterance, labels: &LabelDict) -> Result<IntentSample> {
        let label = labels.index_of(&utterance.label).ok_or_else(|| {
            anyhow!(
                "Intent '{}' is not in the label dictionary {:?}",
                utterance.label,
                labels.labels()
            )
        })?;
        let (input_ids, attention_mask) = self.encode(&utterance.text)?;
        Ok(IntentSample { input_ids, attention_mask, label })
    }

    pub fn samples(&self, utterances: &[Utterance], labels: &LabelDict) -> Result<Vec<IntentSample>> {
        utterances.iter().map(|u| self.sample(u, labels)).collect()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::tokenizer_store::TokenizerStore;

    fn encoder(max_seq_len: usize) -> (tempfile::TempDir, SequenceEncoder) {
        let dir   = tempfile::tempdir().unwrap();
        let store = TokenizerStore::new(dir.path().to_string_lossy().to_string());
        let texts = vec![
            "is it raining in seoul".to_string(),
            "book a table in seoul".to_string(),
        ];
        let tokenizer = store.build(&texts, 100).unwrap();
        (dir, SequenceEncoder::new(tokenizer, max_seq_len).unwrap())
    }

    #[test]
    fn test_pads_to_max_len() {
        let (_dir, enc) = encoder(8);
        let (ids, mask) = enc.encode("is it raining").unwrap();
        assert_eq!(ids.len(), 8);
        assert_eq!(mask, vec![1, 1, 1, 0, 0, 0, 0, 0]);
        assert!(ids[..3].iter().all(|&id| id > UNK_ID));
        assert!(ids[3..].iter().all(|&id| id == PAD_ID));
    }

    #[test]
    fn test_truncates_long_input() {
        let (_dir, enc) = encoder(3);
        let (ids, mask) = enc.encode("is it raining in seoul").unwrap();
        assert_eq!(ids.len(), 3);
        assert_eq!(mask, vec![1, 1, 1]);
    }

    #[test]
    fn test_unknown_words_map_to_unk() {
        let (_dir, enc) = encoder(4);
        let (ids, _) = enc.encode("zebra").unwrap();
        assert_eq!(ids[0], UNK_ID);
    }

    #[test]
    fn test_empty_text_keeps_one_position() {
        let (_dir, enc) = encoder(4);
        let (ids, mask) = enc.encode("").unwrap();
        assert_eq!(ids, vec![UNK_ID, PAD_ID, PAD_ID, PAD_ID]);
        assert_eq!(mask, vec![1, 0, 0, 0]);
    }

    #[test]
    fn test_sample_rejects_unknown_label() {
        let (_dir, enc) = encoder(4);
        let labels = LabelDict::from_labels(["weather"]);
        let err = enc.sample(&Utterance::new("book a table", "restaurant"), &labels);
        assert!(err.is_err());

        let ok = enc.sample(&Utterance::new("is it raining", "weather"), &labels).unwrap();
        assert_eq!(ok.label, 0);
    }

    #[test]
    fn test_zero_length_rejected() {
        let tokenizer = {
            let (_dir, enc) = encoder(1);
            enc.tokenizer
        };
        assert!(SequenceEncoder::new(tokenizer, 0).is_err());
    }
}
