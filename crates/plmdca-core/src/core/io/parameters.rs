use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParameterFileError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Binary parameter data has {0} bytes, which is not a multiple of 4")]
    TruncatedBinary(usize),
    #[error("Invalid parameter value '{value}' at position {position}")]
    InvalidValue { position: usize, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterFormat {
    /// Consecutive little-endian IEEE-754 `f32` values.
    Binary,
    /// Whitespace-separated decimal values.
    Text,
}

impl ParameterFormat {
    /// `.bin`, `.f32` and `.raw` files are binary; everything else is read as text.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("bin" | "f32" | "raw") => ParameterFormat::Binary,
            _ => ParameterFormat::Text,
        }
    }
}

/// A fitted fields-and-couplings array stored on disk.
pub struct ParameterFile;

impl ParameterFile {
    pub fn read_from(
        reader: &mut impl Read,
        format: ParameterFormat,
    ) -> Result<Vec<f32>, ParameterFileError> {
        match format {
            ParameterFormat::Binary => {
                let mut bytes = Vec::new();
                reader.read_to_end(&mut bytes)?;
                if bytes.len() % 4 != 0 {
                    return Err(ParameterFileError::TruncatedBinary(bytes.len()));
                }
                Ok(bytes
                    .chunks_exact(4)
                    .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
                    .collect())
            }
            ParameterFormat::Text => {
                let mut content = String::new();
                reader.read_to_string(&mut content)?;
                content
                    .split_whitespace()
                    .enumerate()
                    .map(|(idx, token)| {
                        token
                            .parse::<f32>()
                            .map_err(|_| ParameterFileError::InvalidValue {
                                position: idx + 1,
                                value: token.to_string(),
                            })
                    })
                    .collect()
            }
        }
    }

    pub fn read_from_path<P: AsRef<Path>>(
        path: P,
        format: ParameterFormat,
    ) -> Result<Vec<f32>, ParameterFileError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::PathBuf;

    #[test]
    fn detects_format_from_extension() {
        assert_eq!(
            ParameterFormat::from_path(&PathBuf::from("params.BIN")),
            ParameterFormat::Binary
        );
        assert_eq!(
            ParameterFormat::from_path(&PathBuf::from("out/params.f32")),
            ParameterFormat::Binary
        );
        assert_eq!(
            ParameterFormat::from_path(&PathBuf::from("params.txt")),
            ParameterFormat::Text
        );
        assert_eq!(
            ParameterFormat::from_path(&PathBuf::from("params")),
            ParameterFormat::Text
        );
    }

    #[test]
    fn reads_little_endian_binary() {
        let bytes: Vec<u8> = [1.5f32, -2.0, 0.25]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        let values = ParameterFile::read_from(&mut Cursor::new(bytes), ParameterFormat::Binary)
            .unwrap();
        assert_eq!(values, vec![1.5, -2.0, 0.25]);
    }

    #[test]
    fn rejects_truncated_binary() {
        let result =
            ParameterFile::read_from(&mut Cursor::new(vec![0u8; 7]), ParameterFormat::Binary);
        assert!(matches!(result, Err(ParameterFileError::TruncatedBinary(7))));
    }

    #[test]
    fn reads_whitespace_separated_text() {
        let values = ParameterFile::read_from(
            &mut Cursor::new("0.5 1e-3\n-4\t2.0\n"),
            ParameterFormat::Text,
        )
        .unwrap();
        assert_eq!(values, vec![0.5, 1e-3, -4.0, 2.0]);
    }

    #[test]
    fn reports_position_of_invalid_text_value() {
        let result = ParameterFile::read_from(&mut Cursor::new("1.0 2.0 abc"), ParameterFormat::Text);
        assert!(matches!(
            result,
            Err(ParameterFileError::InvalidValue { position: 3, ref value }) if value == "abc"
        ));
    }
}
