// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands — `train`, `test`, `predict` —
// and all their configurable flags.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use crate::application::train_use_case::TrainConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the intent classifier on a directory of intent files
    Train(TrainArgs),

    /// Report accuracy of the latest checkpoint on the held-out split
    Test(TestArgs),

    /// Classify a single utterance
    Predict(PredictArgs),
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Directory with one file per intent (<intent>.txt or <intent>.csv)
    #[arg(long, default_value = "data/intents")]
    pub data_dir: String,

    /// Directory to save checkpoints, tokenizer, config and metrics
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Maximum number of tokens per utterance
    #[arg(long, default_value_t = 32)]
    pub max_seq_len: usize,

    #[arg(long, default_value_t = 512)]
    pub batch_size: usize,

    #[arg(long, default_value_t = 300)]
    pub epochs: usize,

    /// Initial Adam learning rate
    #[arg(long, default_value_t = 1e-4)]
    pub model_lr: f64,

    /// L2 penalty applied by Adam
    #[arg(long, default_value_t = 1e-4)]
    pub weight_decay: f64,

    /// Multiplier applied to the learning rate on a plateau
    #[arg(long, default_value_t = 0.75)]
    pub lr_scheduler_factor: f64,

    /// Epochs without improvement tolerated before reducing the rate
    #[arg(long, default_value_t = 10)]
    pub lr_scheduler_patience: usize,

    /// Floor for the learning rate
    #[arg(long, default_value_t = 1e-12)]
    pub lr_scheduler_min_lr: f64,

    /// Epochs during which the scheduler is not stepped
    #[arg(long, default_value_t = 100)]
    pub lr_scheduler_warm_up: usize,

    /// Share of the corpus used for training; the rest is held out
    #[arg(long, default_value_t = 0.8)]
    pub train_fraction: f64,

    /// Seed for the train/test split and batch shuffling
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Hidden dimension of the encoder
    #[arg(long, default_value_t = 128)]
    pub d_model: usize,

    /// d_model must be divisible by num_heads
    #[arg(long, default_value_t = 4)]
    pub num_heads: usize,

    #[arg(long, default_value_t = 2)]
    pub num_layers: usize,

    /// Inner dimension of the feed-forward network
    #[arg(long, default_value_t = 512)]
    pub d_ff: usize,

    #[arg(long, default_value_t = 0.1)]
    pub dropout: f64,

    /// Upper bound on tokenizer vocabulary, special tokens included
    #[arg(long, default_value_t = 10000)]
    pub vocab_size: usize,

    /// Data loader worker threads
    #[arg(long, default_value_t = 1)]
    pub num_workers: usize,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_dir:              a.data_dir,
            checkpoint_dir:        a.checkpoint_dir,
            max_seq_len:           a.max_seq_len,
            batch_size:            a.batch_size,
            epochs:                a.epochs,
            model_lr:              a.model_lr,
            weight_decay:          a.weight_decay,
            lr_scheduler_factor:   a.lr_scheduler_factor,
            lr_scheduler_patience: a.lr_scheduler_patience,
            lr_scheduler_min_lr:   a.lr_scheduler_min_lr,
            lr_scheduler_warm_up:  a.lr_scheduler_warm_up,
            train_fraction:        a.train_fraction,
            seed:                  a.seed,
            d_model:               a.d_model,
            num_heads:             a.num_heads,
            num_layers:            a.num_layers,
            d_ff:                  a.d_ff,
            dropout:               a.dropout,
            vocab_size:            a.vocab_size,
            num_workers:           a.num_workers,
        }
    }
}

/// All arguments for the `test` command
#[derive(Args, Debug)]
pub struct TestArgs {
    /// Directory where checkpoints were saved during training
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Corpus directory; defaults to the one recorded at training time
    #[arg(long)]
    pub data_dir: Option<String>,
}

/// All arguments for the `predict` command
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// The utterance to classify
    #[arg(long)]
    pub text: String,

    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,
}
