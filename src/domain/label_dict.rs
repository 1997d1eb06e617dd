// ============================================================
// Layer 3 — Label Dictionary
// ============================================================
// Maps intent names to class indices and back.
//
// The classifier only ever sees integers: the head produces one
// logit per class and the loss compares against a class index.
// The dictionary is what turns "weather" into 3 for training
// and the argmax 3 back into "weather" at inference time.
//
// Ordering is alphabetical so the same corpus always produces
// the same mapping, regardless of the order files were read.

use std::collections::BTreeSet;
use serde::{Deserialize, Serialize};

use crate::domain::utterance::Utterance;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelDict {
    labels: Vec<String>,
}

impl LabelDict {
    /// Build the dictionary from every distinct label in `utterances`.
    pub fn from_utterances(utterances: &[Utterance]) -> Self {
        Self::from_labels(utterances.iter().map(|u| u.label.clone()))
    }

    /// Build the dictionary from an arbitrary list of labels.
    /// Duplicates are collapsed and the result is sorted.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let unique: BTreeSet<String> = labels.into_iter().map(Into::into).collect();
        Self { labels: unique.into_iter().collect() }
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.binary_search_by(|l| l.as_str().cmp(label)).ok()
    }

    pub fn label_of(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels in class-index order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_sorted_and_unique() {
        let dict = LabelDict::from_labels(["weather", "dust", "weather", "restaurant"]);
        assert_eq!(dict.labels(), &["dust", "restaurant", "weather"]);
        assert_eq!(dict.len(), 3);
    }

    #[test]
    fn test_index_round_trip() {
        let dict = LabelDict::from_labels(["travel", "dust", "weather"]);
        let idx  = dict.index_of("weather").unwrap();
        assert_eq!(idx, 2);
        assert_eq!(dict.label_of(idx), Some("weather"));
    }

    #[test]
    fn test_unknown_label_and_index() {
        let dict = LabelDict::from_labels(["dust"]);
        assert_eq!(dict.index_of("weather"), None);
        assert_eq!(dict.label_of(5), None);
    }

    #[test]
    fn test_from_utterances() {
        let corpus = vec![
            Utterance::new("is it raining", "weather"),
            Utterance::new("fine dust today?", "dust"),
        ];
        let dict = LabelDict::from_utterances(&corpus);
        assert_eq!(dict.index_of("dust"), Some(0));
        assert_eq!(dict.index_of("weather"), Some(1));
    }

    #[test]
    fn test_serialises_as_plain_list() {
        let dict = LabelDict::from_labels(["b", "a"]);
        let json = serde_json::to_string(&dict).unwrap();
        assert_eq!(json, r#"["a","b"]"#);
        let back: LabelDict = serde_json::from_str(&json).unwrap();
        assert_eq!(back, dict);
    }
}
