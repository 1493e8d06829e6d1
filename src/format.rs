// Flat-file output for fetched sequences.

pub mod fasta;
pub mod genbank;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{BenchlingError, Result};
use crate::models::Sequence;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    GenBank,
    Fasta,
}

impl Format {
    pub fn render(self, seq: &Sequence) -> String {
        match self {
            Format::GenBank => genbank::to_genbank(seq),
            Format::Fasta => fasta::to_fasta(seq),
        }
    }

    /// Usual file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Format::GenBank => "gb",
            Format::Fasta => "fasta",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Format::GenBank => "genbank",
            Format::Fasta => "fasta",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Format {
    type Err = BenchlingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "genbank" | "gb" | "gbk" => Ok(Format::GenBank),
            "fasta" | "fa" => Ok(Format::Fasta),
            other => Err(BenchlingError::InvalidInput(format!(
                "unknown format '{}', expected genbank or fasta",
                other
            ))),
        }
    }
}

/// Render `seq` and write it to `path`.
pub fn write_file(seq: &Sequence, format: Format, path: &Path) -> Result<()> {
    std::fs::write(path, format.render(seq))?;
    Ok(())
}
