use crate::cli::ScoreArgs;
use crate::config::PartialScoreConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use plmdca::{
    core::io::{
        fasta::FastaFile,
        score_table::{self, ScoreTableOptions},
        traits::AlignmentFile,
    },
    core::models::score::PairScore,
    engine::{fitter::PrecomputedFitter, progress::ProgressReporter},
    workflows,
};
use std::path::Path;
use tracing::{info, warn};

pub fn run(args: ScoreArgs, threads: Option<usize>, show_progress: bool) -> Result<()> {
    info!("Loading alignment from {:?}", &args.msa);
    let alignment = FastaFile::read_from_path(&args.msa).map_err(|e| CliError::FileParsing {
        path: args.msa.clone(),
        source: e.into(),
    })?;
    info!(
        "Alignment has {} sequences of length {}.",
        alignment.num_sequences(),
        alignment.sequence_length()
    );

    let partial_config = match &args.config {
        Some(path) => PartialScoreConfig::from_file(path)?,
        None => PartialScoreConfig::default(),
    };
    info!("Merging configuration from file and CLI arguments...");
    let settings = partial_config.merge_with_cli(&args, alignment.summary(), threads)?;

    let fitter = PrecomputedFitter::new(args.parameters.clone());
    let total_phases = if settings.apc { 4 } else { 3 };
    let progress_handler = if show_progress {
        CliProgressHandler::new(total_phases)
    } else {
        CliProgressHandler::hidden(total_phases)
    };
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let scores = if settings.apc {
        info!("Invoking the APC-corrected scoring workflow...");
        workflows::score::compute_sorted_fn_apc(&settings.analysis, &fitter, &reporter)?
    } else {
        info!("Invoking the raw Frobenius-norm scoring workflow...");
        workflows::score::compute_sorted_fn(&settings.analysis, &fitter, &reporter)?
    };
    info!("Workflow finished with {} scored pairs.", scores.len());

    if scores.is_empty() {
        warn!("Workflow completed but produced no pair scores.");
    }

    match &args.output {
        Some(path) => {
            write_table(&scores, path, &settings.table)?;
            eprintln!(
                "✓ {} pair scores written to: {}",
                settings.table.limit.unwrap_or(scores.len()).min(scores.len()),
                path.display()
            );
        }
        None => {
            let stdout = std::io::stdout();
            score_table::write_scores(&scores, stdout.lock(), &settings.table).map_err(|e| {
                CliError::Other(anyhow::anyhow!("Failed to write scores to stdout: {}", e))
            })?;
        }
    }

    Ok(())
}

fn write_table(scores: &[PairScore], path: &Path, options: &ScoreTableOptions) -> Result<()> {
    info!("Writing score table to {:?}", path);
    score_table::write_scores_to_path(scores, path, options).map_err(|e| CliError::Output {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use plmdca::core::indexing::PairIndexer;
    use plmdca::core::models::shape::{AlignmentShape, Biomolecule};
    use std::fs;

    fn score_args(argv: &[&str]) -> ScoreArgs {
        let mut full = vec!["plmdca", "score"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Commands::Score(args) => args,
            _ => panic!("Expected 'score' subcommand"),
        }
    }

    #[test]
    fn scores_precomputed_binary_parameters_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let msa = dir.path().join("toy.fa");
        fs::write(&msa, ">a\nACGU\n>b\nAGGU\n>c\nAC-U\n").unwrap();

        let shape = AlignmentShape::for_biomolecule(Biomolecule::Rna, 4).unwrap();
        let indexer = PairIndexer::new(shape);
        let mut values = vec![0.0f32; shape.parameter_count()];
        for (rank, pair) in indexer.pairs().enumerate() {
            for a in 0..shape.num_non_gap_states() {
                let k = indexer.flat_index(pair.i, pair.j, a, a).unwrap();
                values[k] = (rank + 1) as f32;
            }
        }
        let params = dir.path().join("params.bin");
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        fs::write(&params, bytes).unwrap();

        let out = dir.path().join("scores.tsv");
        let args = score_args(&[
            "--msa",
            msa.to_str().unwrap(),
            "--parameters",
            params.to_str().unwrap(),
            "--biomolecule",
            "rna",
            "--no-apc",
            "--one-based",
            "--top",
            "2",
            "-o",
            out.to_str().unwrap(),
        ]);
        run(args, None, false).unwrap();

        let table = fs::read_to_string(&out).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "site_i\tsite_j\tscore");
        assert!(lines[1].starts_with("3\t4\t"));
        assert!(lines[2].starts_with("2\t4\t"));
    }

    #[test]
    fn truncated_parameter_file_fails_with_core_error() {
        let dir = tempfile::tempdir().unwrap();
        let msa = dir.path().join("toy.fa");
        fs::write(&msa, ">a\nACGU\n>b\nAGGU\n").unwrap();
        let params = dir.path().join("params.txt");
        fs::write(&params, "0.0 1.0 2.0\n").unwrap();

        let args = score_args(&[
            "--msa",
            msa.to_str().unwrap(),
            "--parameters",
            params.to_str().unwrap(),
            "-b",
            "rna",
        ]);
        assert!(matches!(run(args, None, false), Err(CliError::Core(_))));
    }

    #[test]
    fn malformed_alignment_is_a_file_parsing_error() {
        let dir = tempfile::tempdir().unwrap();
        let msa = dir.path().join("ragged.fa");
        fs::write(&msa, ">a\nACGU\n>b\nAG\n").unwrap();

        let args = score_args(&[
            "--msa",
            msa.to_str().unwrap(),
            "--parameters",
            "unused.bin",
            "-b",
            "rna",
        ]);
        assert!(matches!(
            run(args, None, false),
            Err(CliError::FileParsing { .. })
        ));
    }
}
