// ============================================================
// Layer 4 — Train/Test Splitter
// ============================================================
// Shuffles the corpus with a seeded RNG and splits it in two:
//   - Training set: updates the weights
//   - Test set:     per-epoch validation and the `test` command
//
// The seed is stored in train_config.json, so `test` re-derives
// exactly the held-out set the training run never saw.
//
// Corpus files are grouped by intent; without a shuffle the test
// set would only contain the last few intents.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Shuffle `samples` with `seed` and split into (train, test).
///
/// `train_fraction` is the share kept for training, e.g. 0.8.
pub fn split_train_test<T>(mut samples: Vec<T>, train_fraction: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);
    samples.shuffle(&mut rng);

    let total    = samples.len();
    let split_at = ((total as f64) * train_fraction.clamp(0.0, 1.0)).round() as usize;
    let split_at = split_at.min(total);

    let test = samples.split_off(split_at);

    tracing::debug!(
        "Dataset split: {} training, {} test ({}% / {}%)",
        samples.len(),
        test.len(),
        (samples.len() * 100) / total.max(1),
        (test.len()    * 100) / total.max(1),
    );

    (samples, test)
}
