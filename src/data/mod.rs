// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from intent files on disk to tensor batches.
//
//   data/<intent>.txt
//       │
//       ▼
//   CorpusLoader      → one Utterance per line, label = file stem
//       │
//       ▼
//   Preprocessor      → normalises whitespace and control chars
//       │
//       ▼
//   split_train_test  → seeded shuffle, train / held-out split
//       │
//       ▼
//   SequenceEncoder   → token ids + attention mask, padded
//       │
//       ▼
//   IntentDataset     → implements Burn's Dataset trait
//       │
//       ▼
//   IntentBatcher     → stacks samples into tensor batches
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Loads a labelled corpus from a directory of intent files
pub mod loader;

/// Cleans and normalises raw utterances
pub mod preprocessor;

/// Turns an utterance into fixed-length token ids
pub mod encoder;

/// Implements Burn's Dataset trait for intent samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Seeded shuffle and train/test split
pub mod splitter;
