// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses arguments with
// clap and hands off to Layer 2; the only printing happens here.
//
// Two commands are supported:
//   1. `train`   — run the iteration schedule over rotating files
//   2. `preview` — show clean/corrupted pairs from one manifest
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, PreviewArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "code-corrector",
    version,
    about = "Train a seq2seq model to repair corrupted lines of Java source."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the matching use case; the CLI only routes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)   => run_train(args),
            Commands::Preview(args) => run_preview(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!(
        "Starting training on manifests in: {}",
        args.data_directory.display()
    );

    let summary = TrainUseCase::new(args.into()).execute()?;

    println!(
        "Training complete: {} steps ({} tokens), {} evaluations, {} training files read.",
        summary.train_steps, summary.train_tokens, summary.eval_runs, summary.train_rotations
    );
    Ok(())
}

fn run_preview(args: PreviewArgs) -> Result<()> {
    use crate::application::preview_use_case::PreviewUseCase;

    let (origin, pairs) = PreviewUseCase::new(args.into()).execute()?;

    println!("Source: {}\n", origin.display());
    for pair in pairs {
        println!("clean:     {}", pair.clean);
        println!("corrupted: {}\n", pair.corrupted);
    }
    Ok(())
}
