// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses command line arguments with clap and routes each
// subcommand to its use case. This is the only layer that
// prints results for the user.
//
//   1. `train`   — epoch loop, checkpoint per epoch
//   2. `test`    — accuracy on the held-out split
//   3. `predict` — one utterance in, one intent out

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, PredictArgs, TestArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "intent-classifier",
    version,
    about = "Train a transformer intent classifier, test it, and classify utterances."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)   => run_train(args),
            Commands::Test(args)    => run_test(args),
            Commands::Predict(args) => run_predict(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on intents in: {}", args.data_dir);

    let checkpoint_dir = args.checkpoint_dir.clone();
    let history = TrainUseCase::new(args.into()).execute()?;

    if let Some(last) = history.last() {
        println!(
            "Training complete after {} epochs (train_acc={:.1}%). Checkpoints in '{}'.",
            last.epoch, last.train_acc * 100.0, checkpoint_dir
        );
    }
    Ok(())
}

fn run_test(args: TestArgs) -> Result<()> {
    use crate::application::test_use_case::TestUseCase;

    let report = TestUseCase::new(args.checkpoint_dir, args.data_dir).execute()?;
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    use crate::application::predict_use_case::PredictUseCase;

    let use_case   = PredictUseCase::new(&args.checkpoint_dir)?;
    let prediction = use_case.predict(&args.text)?;
    println!("{} ({:.1}%)", prediction.label, prediction.confidence * 100.0);
    Ok(())
}
