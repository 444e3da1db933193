use clap::{Args, Parser, Subcommand};
use plmdca::core::models::shape::Biomolecule;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "plmdca-rs contributors",
    version,
    about = "plmDCA CLI - Frobenius-norm and APC-corrected direct coupling scores from pseudo-likelihood Potts model parameters.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used to score site pairs.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score all site pairs of an alignment from a fitted parameter array.
    Score(ScoreArgs),
    /// Show the alignment dimensions and the expected parameter array size.
    Shape(ShapeArgs),
}

/// Arguments for the `score` subcommand.
#[derive(Args, Debug)]
pub struct ScoreArgs {
    // --- Core Arguments ---
    /// Path to the multiple sequence alignment in FASTA format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub msa: PathBuf,

    /// Path to the fitted fields and couplings (.bin/.f32/.raw for little-endian
    /// f32, anything else is read as whitespace-separated text).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub parameters: PathBuf,

    /// Path for the score table. Scores are written to stdout when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Biomolecule type of the alignment, 'protein' or 'rna'.
    #[arg(short, long, value_name = "TYPE")]
    pub biomolecule: Option<Biomolecule>,

    // --- Model Overrides ---
    /// Override the sequence identity threshold used for reweighting.
    #[arg(long = "seqid", value_name = "FLOAT")]
    pub sequence_identity: Option<f64>,

    /// Override the field regularization strength.
    #[arg(long, value_name = "FLOAT")]
    pub lambda_h: Option<f64>,

    /// Override the coupling regularization strength.
    #[arg(long, value_name = "FLOAT")]
    pub lambda_j: Option<f64>,

    /// Override the maximum number of backend iterations.
    #[arg(long, value_name = "INT")]
    pub max_iterations: Option<usize>,

    // --- Output Overrides ---
    /// Report raw Frobenius-norm scores without average product correction.
    #[arg(long)]
    pub no_apc: bool,

    /// Keep only the N highest scoring pairs.
    #[arg(short = 'n', long, value_name = "N")]
    pub top: Option<usize>,

    /// Number sites from 1 in the score table.
    #[arg(long)]
    pub one_based: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S regularization.lambda-h=0.5
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `shape` subcommand.
#[derive(Args, Debug)]
pub struct ShapeArgs {
    /// Path to the multiple sequence alignment in FASTA format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub msa: PathBuf,

    /// Biomolecule type of the alignment, 'protein' or 'rna'.
    #[arg(short, long, value_name = "TYPE", default_value = "protein")]
    pub biomolecule: Biomolecule,
}
