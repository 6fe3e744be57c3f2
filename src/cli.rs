use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config;

#[derive(Debug, Parser)]
#[command(name = "vietgender", author, version, about = "Predict gender from Vietnamese names", long_about = None)]
pub struct Cli {
    /// Debug-level logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify every name in a CSV table and write results plus statistics
    Batch(BatchArgs),
    /// Classify a single name, a list file, or names typed interactively
    Predict(PredictArgs),
    /// Fit the preprocessor on a labelled corpus and export the encoded matrix
    Prepare(PrepareArgs),
}

/// Model artifact locations shared by the classifying commands.
#[derive(Debug, Clone, Args)]
pub struct ModelArgs {
    /// Trained classifier (ONNX)
    #[arg(short, long, default_value_os_t = config::default_model_path())]
    pub model: PathBuf,

    /// Preprocessor artifact (JSON)
    #[arg(short, long, default_value_os_t = config::default_preprocessor_path())]
    pub preprocessor: PathBuf,
}

#[derive(Debug, Args)]
pub struct BatchArgs {
    /// Input CSV table
    #[arg(short, long)]
    pub input: PathBuf,

    /// Result CSV table
    #[arg(short, long)]
    pub output: PathBuf,

    /// Name column; inferred from the header when omitted
    #[arg(short, long)]
    pub column: Option<String>,

    /// Encoding tried first when reading the input
    #[arg(short, long, default_value = config::DEFAULT_ENCODING)]
    pub encoding: String,

    #[command(flatten)]
    pub model: ModelArgs,

    /// Skip the statistics report
    #[arg(long)]
    pub no_report: bool,
}

#[derive(Debug, Args)]
pub struct PredictArgs {
    /// Name to classify
    #[arg(short, long, conflicts_with = "file")]
    pub name: Option<String>,

    /// Text file with one name per line
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Prompt for names until quit (default when no name or file is given)
    #[arg(short, long)]
    pub interactive: bool,

    #[command(flatten)]
    pub model: ModelArgs,
}

#[derive(Debug, Args)]
pub struct PrepareArgs {
    /// Header-less `name,gender` corpus
    #[arg(short, long)]
    pub corpus: PathBuf,

    /// Directory receiving preprocessor.json and corpus_encoded.csv
    #[arg(short, long, default_value_os_t = config::models_dir())]
    pub output_dir: PathBuf,

    /// Fixed sequence length
    #[arg(long, default_value_t = config::DEFAULT_MAX_LENGTH)]
    pub max_length: usize,
}
