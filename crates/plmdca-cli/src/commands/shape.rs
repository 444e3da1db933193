use crate::cli::ShapeArgs;
use crate::error::{CliError, Result};
use plmdca::core::io::{fasta::FastaFile, traits::AlignmentFile};
use plmdca::core::models::shape::{AlignmentShape, Biomolecule};
use plmdca::engine::error::EngineError;
use std::io::Write;
use tracing::info;

pub fn run(args: ShapeArgs) -> Result<()> {
    let alignment = FastaFile::read_from_path(&args.msa).map_err(|e| CliError::FileParsing {
        path: args.msa.clone(),
        source: e.into(),
    })?;
    let shape = AlignmentShape::for_biomolecule(args.biomolecule, alignment.sequence_length())
        .map_err(EngineError::from)?;
    info!(
        "Computed parameter layout for {} sites with {} states.",
        shape.num_sites(),
        shape.num_states()
    );

    let stdout = std::io::stdout();
    write_report(&mut stdout.lock(), args.biomolecule, alignment.num_sequences(), shape)?;
    Ok(())
}

fn write_report(
    out: &mut impl Write,
    biomolecule: Biomolecule,
    num_sequences: usize,
    shape: AlignmentShape,
) -> std::io::Result<()> {
    writeln!(out, "biomolecule\t{}", biomolecule)?;
    writeln!(out, "sequences\t{}", num_sequences)?;
    writeln!(out, "sequence_length\t{}", shape.num_sites())?;
    writeln!(out, "states\t{}", shape.num_states())?;
    writeln!(out, "site_pairs\t{}", shape.num_pairs())?;
    writeln!(out, "parameters\t{}", shape.parameter_count())?;
    writeln!(out, "non_gap_couplings\t{}", shape.non_gap_coupling_count())
}
