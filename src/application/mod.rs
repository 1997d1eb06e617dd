// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Each use case wires the data, ml and infra layers together
// for one user-facing goal. No tensor code and no printing
// here; printing belongs to the CLI layer.

// Epoch-based training
pub mod train_use_case;

// Accuracy of the latest checkpoint on the held-out split
pub mod test_use_case;

// Single-utterance intent prediction
pub mod predict_use_case;
