// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `train` and `preview`, and all
// their flags. clap's derive macros generate --help, error
// messages for missing args, and the string → number parsing.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::application::preview_use_case::PreviewConfig;
use crate::application::train_use_case::TrainConfig;
use crate::data::codec::CharCodec;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stream corrupted/clean line pairs from rotating .java files into the model
    Train(TrainArgs),

    /// Print a few clean/corrupted pairs from one manifest
    Preview(PreviewArgs),
}

/// Reserved character ids, shared by both subcommands
#[derive(Args, Debug, Clone, Copy)]
pub struct CodecArgs {
    /// Code of the padding character
    #[arg(long, default_value_t = 128)]
    pub pad_id: u32,

    /// Code of the start-of-sequence character
    #[arg(long, default_value_t = 2)]
    pub sos_id: u32,

    /// Code of the end-of-sequence character
    #[arg(long, default_value_t = 3)]
    pub eos_id: u32,
}

impl From<CodecArgs> for CharCodec {
    fn from(a: CodecArgs) -> Self {
        CharCodec::new(a.pad_id, a.sos_id, a.eos_id)
    }
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Directory holding the manifests and <project>.java files
    #[arg(long)]
    pub data_directory: PathBuf,

    /// Output directory for checkpoints and metrics (created if absent)
    #[arg(long)]
    pub output_directory: PathBuf,

    /// Manifest of training projects, relative to the data directory
    #[arg(long, default_value = "trainJava.csv")]
    pub train_manifest: String,

    /// Manifest of evaluation projects, relative to the data directory
    #[arg(long, default_value = "testJava.csv")]
    pub eval_manifest: String,

    /// Lines this long or longer (after trimming) are skipped
    #[arg(long, default_value_t = 200)]
    pub max_sequence_length: usize,

    #[command(flatten)]
    pub codec: CodecArgs,

    /// Examples per batch
    #[arg(long, default_value_t = 128)]
    pub batch_size: usize,

    /// Number of layers of the network (passed to the model)
    #[arg(long, default_value_t = 2)]
    pub num_layers: usize,

    /// Number of units in each layer (passed to the model)
    #[arg(long, default_value_t = 256)]
    pub num_units: usize,

    /// Number of training iterations
    #[arg(long, default_value_t = 12_000)]
    pub num_iterations: usize,

    /// Save, restore and evaluate every this many iterations
    #[arg(long, default_value_t = 1_000)]
    pub eval_steps: usize,

    /// Clip gradients to this norm (passed to the model)
    #[arg(long, default_value_t = 5.0)]
    pub max_gradient_norm: f64,

    /// Learning rate for the optimizer (passed to the model)
    #[arg(long, default_value_t = 0.001)]
    pub learning_rate: f64,

    /// Lines held by the windowed shuffle
    #[arg(long, default_value_t = 10_000)]
    pub shuffle_buffer_size: usize,

    /// Threads corrupting and encoding lines
    #[arg(long, default_value_t = 4)]
    pub num_workers: usize,

    /// Seed for file choice, shuffling and corruption; random if omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Give up after this many files in a row fail to fill a batch;
    /// keeps rotating forever if omitted
    #[arg(long)]
    pub max_rotations: Option<usize>,
}

/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_directory:      a.data_directory,
            output_directory:    a.output_directory,
            train_manifest:      a.train_manifest,
            eval_manifest:       a.eval_manifest,
            max_sequence_length: a.max_sequence_length,
            pad_id:              a.codec.pad_id,
            sos_id:              a.codec.sos_id,
            eos_id:              a.codec.eos_id,
            batch_size:          a.batch_size,
            num_layers:          a.num_layers,
            num_units:           a.num_units,
            num_iterations:      a.num_iterations,
            eval_steps:          a.eval_steps,
            max_gradient_norm:   a.max_gradient_norm,
            learning_rate:       a.learning_rate,
            shuffle_buffer_size: a.shuffle_buffer_size,
            num_workers:         a.num_workers,
            seed:                a.seed,
            max_rotations:       a.max_rotations,
        }
    }
}

#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Directory holding the manifest and <project>.java files
    #[arg(long)]
    pub data_directory: PathBuf,

    /// Manifest to draw a project from
    #[arg(long, default_value = "trainJava.csv")]
    pub manifest: String,

    /// How many lines to show
    #[arg(long, default_value_t = 10)]
    pub count: usize,

    #[arg(long, default_value_t = 200)]
    pub max_sequence_length: usize,

    #[command(flatten)]
    pub codec: CodecArgs,

    #[arg(long)]
    pub seed: Option<u64>,
}

impl From<PreviewArgs> for PreviewConfig {
    fn from(a: PreviewArgs) -> Self {
        PreviewConfig {
            data_directory:      a.data_directory,
            manifest:            a.manifest,
            count:               a.count,
            max_sequence_length: a.max_sequence_length,
            codec:               a.codec.into(),
            seed:                a.seed,
        }
    }
}
