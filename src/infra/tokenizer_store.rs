// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Builds, saves and reloads the word-level tokenizer.
//
// The vocabulary is the most frequent words of the training
// corpus. It is written as a HuggingFace tokenizer JSON and
// loaded back through Tokenizer::from_file, which sidesteps the
// trainer / ModelWrapper type mismatch in tokenizers 0.15.
//
// Special tokens:
//   [PAD] = 0   padding, masked out everywhere
//   [UNK] = 1   any word outside the vocabulary

use anyhow::{anyhow, Context, Result};
use std::{collections::HashMap, path::PathBuf};
use tokenizers::Tokenizer;

pub const PAD_ID: u32 = 0;
pub const UNK_ID: u32 = 1;

/// Ids below this are reserved for special tokens
const FIRST_WORD_ID: usize = 2;

const TOKENIZER_FILE: &str = "tokenizer.json";

pub struct TokenizerStore {
    dir: PathBuf,
}

impl TokenizerStore {
    pub fn new(dir: impl Into<String>) -> Self {
        Self { dir: PathBuf::from(dir.into()) }
    }

    pub fn load(&self) -> Result<Tokenizer> {
        let path = self.dir.join(TOKENIZER_FILE);
        Tokenizer::from_file(&path)
            .map_err(|e| anyhow!(
                "Cannot load tokenizer from '{}': {}", path.display(), e
            ))
    }

    /// Build a tokenizer from `texts`, replacing any saved one.
    /// Every id of the result is below `vocab_size`.
    pub fn build(&self, texts: &[String], vocab_size: usize) -> Result<Tokenizer> {
        tracing::info!("Building new tokenizer (vocab_size={})", vocab_size);
        if vocab_size <= FIRST_WORD_ID {
            return Err(anyhow!("vocab_size must leave room for words, got {vocab_size}"));
        }
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        let words = rank_words(texts, vocab_size - FIRST_WORD_ID);

        let mut vocab = serde_json::json!({
            "[PAD]": PAD_ID,
            "[UNK]": UNK_ID,
        });
        for (offset, word) in words.iter().enumerate() {
            vocab[word] = serde_json::json!(FIRST_WORD_ID + offset);
        }

        let tokenizer_json = serde_json::json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": [
                {"id": PAD_ID, "content": "[PAD]", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": UNK_ID, "content": "[UNK]", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true}
            ],
            "normalizer": {
                "type": "BertNormalizer",
                "clean_text": true,
                "handle_chinese_chars": true,
                "strip_accents": null,
                "lowercase": true
            },
            "pre_tokenizer": {
                "type": "Whitespace"
            },
            "post_processor": null,
            "decoder": null,
            "model": {
                "type": "WordLevel",
                "vocab": vocab,
                "unk_token": "[UNK]"
            }
        });

        let tok_path = self.dir.join(TOKENIZER_FILE);
        std::fs::write(
            &tok_path,
            serde_json::to_string_pretty(&tokenizer_json)?
        ).with_context(|| "Cannot write tokenizer JSON")?;

        tracing::info!(
            "Tokenizer built with {} words, saved to '{}'",
            words.len(),
            tok_path.display()
        );

        Tokenizer::from_file(&tok_path)
            .map_err(|e| anyhow!("Cannot reload tokenizer: {e}"))
    }
}

/// Lowercased words split the way the Whitespace pre-tokenizer
/// splits them, most frequent first, ties broken alphabetically.
fn rank_words(texts: &[String], limit: usize) -> Vec<String> {
    let mut freq: HashMap<String, usize> = HashMap::new();
    for text in texts {
        let lower = text.to_lowercase();
        for word in split_like_pre_tokenizer(&lower) {
            *freq.entry(word.to_string()).or_insert(0) += 1;
        }
    }

    let mut words: Vec<(String, usize)> = freq.into_iter().collect();
    words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    words.truncate(limit);
    words.into_iter().map(|(w, _)| w).collect()
}

/// Runs of word characters, and runs of punctuation, as separate pieces.
fn split_like_pre_tokenizer(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start: Option<(usize, bool)> = None;

    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some((s, _)) = start.take() {
                pieces.push(&text[s..i]);
            }
            continue;
        }
        let is_word = c.is_alphanumeric() || c == '_';
        match start {
            Some((s, kind)) if kind != is_word => {
                pieces.push(&text[s..i]);
                start = Some((i, is_word));
            }
            None => start = Some((i, is_word)),
            _ => {}
        }
    }
    if let Some((s, _)) = start {
        pieces.push(&text[s..]);
    }
    pieces
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_like_pre_tokenizer() {
        assert_eq!(
            split_like_pre_tokenizer("what's the weather?!  ok"),
            vec!["what", "'", "s", "the", "weather", "?!", "ok"]
        );
    }

    #[test]
    fn test_rank_words_by_frequency() {
        let texts = vec!["b a a".to_string(), "c a b".to_string()];
        assert_eq!(rank_words(&texts, 10), vec!["a", "b", "c"]);
        assert_eq!(rank_words(&texts, 1), vec!["a"]);
    }

    #[test]
    fn test_build_then_reload() {
        let dir   = tempfile::tempdir().unwrap();
        let store = TokenizerStore::new(dir.path().to_string_lossy().to_string());
        let texts = vec!["Is it raining in Seoul".to_string()];

        let built = store.build(&texts, 50).unwrap();
        let ids   = built.encode("is it raining", false).unwrap().get_ids().to_vec();
        assert_eq!(ids.len(), 3);
        assert!(ids.iter().all(|&id| id >= FIRST_WORD_ID as u32 && id < 50));

        let reloaded = store.load().unwrap();
        let again    = reloaded.encode("is it raining", false).unwrap().get_ids().to_vec();
        assert_eq!(ids, again);
    }

    #[test]
    fn test_rebuild_replaces_saved_tokenizer() {
        let dir   = tempfile::tempdir().unwrap();
        let store = TokenizerStore::new(dir.path().to_string_lossy().to_string());
        let texts = vec!["one two three four five six".to_string()];
        store.build(&texts, 64).unwrap();

        store.build(&["snow".to_string()], 3).unwrap();
        let ids = store.load().unwrap()
            .encode("one two three snow", false).unwrap()
            .get_ids().to_vec();
        assert_eq!(ids, vec![UNK_ID, UNK_ID, UNK_ID, FIRST_WORD_ID as u32]);
    }

    #[test]
    fn test_vocab_size_caps_ids() {
        let dir   = tempfile::tempdir().unwrap();
        let store = TokenizerStore::new(dir.path().to_string_lossy().to_string());
        let texts = vec!["one two three four five six".to_string()];

        let tok = store.build(&texts, 4).unwrap();
        let ids = tok.encode("one two three four five six", false).unwrap().get_ids().to_vec();
        assert!(ids.iter().all(|&id| id < 4));
        assert!(ids.contains(&UNK_ID));
    }

    #[test]
    fn test_too_small_vocab_rejected() {
        let dir   = tempfile::tempdir().unwrap();
        let store = TokenizerStore::new(dir.path().to_string_lossy().to_string());
        assert!(store.build(&[], 2).is_err());
    }
}
