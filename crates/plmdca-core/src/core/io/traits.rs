use crate::core::models::alignment::Alignment;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Defines the interface for reading multiple sequence alignment formats.
///
/// Implementors only parse from a buffered reader; opening files is shared.
pub trait AlignmentFile {
    /// The error type for parsing and I/O failures.
    type Error: Error + From<io::Error>;

    /// Reads an alignment from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is malformed, empty, or the sequences are not
    /// all of the same length.
    fn read_from(reader: &mut impl BufRead) -> Result<Alignment, Self::Error>;

    /// Reads an alignment from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Alignment, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }
}
