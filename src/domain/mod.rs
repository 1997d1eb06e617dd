// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs and traits that define what the intent
// classifier works with: labelled utterances, the label
// dictionary, and the predictions it hands back.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O or network calls
//   - Only plain Rust structs, enums, and traits
//
// Everything here is testable without a GPU.

// A labelled training example
pub mod utterance;

// Ordered intent label <-> class index mapping
pub mod label_dict;

// Core abstractions (traits) that other layers implement
pub mod traits;
