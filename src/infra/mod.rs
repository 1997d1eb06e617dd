// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting persistence used by several other layers:
//
//   checkpoint.rs      — model weights (Burn CompactRecorder),
//                        train config, label dictionary and
//                        test results as JSON
//
//   tokenizer_store.rs — builds a word-level tokenizer from the
//                        training corpus or reloads the saved
//                        one, so training and inference share a
//                        vocabulary
//
//   metrics.rs         — per-epoch metrics appended to a CSV

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Tokenizer training, saving, and loading
pub mod tokenizer_store;

/// Training metrics CSV logger
pub mod metrics;
