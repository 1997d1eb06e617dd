// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All Burn model, loss and optimisation code lives here.
//
//   model.rs      — transformer feature extractor + clf_logits head
//   loss.rs       — softmax loss and the backward/step hook
//   scheduler.rs  — reduce-on-plateau learning rate policy
//   trainer.rs    — epoch loop, averaging, checkpoint per epoch
//   evaluator.rs  — no-grad evaluation and test accuracy
//   inferencer.rs — single-utterance prediction
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)

/// Transformer encoder intent classifier
pub mod model;

/// Softmax cross-entropy loss
pub mod loss;

/// Plateau-driven learning rate reduction
pub mod scheduler;

/// Training loop with validation and checkpointing
pub mod trainer;

/// Evaluation over a data loader
pub mod evaluator;

/// Inference engine — loads checkpoint and predicts intents
pub mod inferencer;
