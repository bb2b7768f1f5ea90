use crate::cli::Cli;
use crate::filter::LengthRange;
use std::path::PathBuf;
use thiserror::Error;

/// Settings for a single run, fixed once parsed from the command line.
#[derive(Clone, Debug)]
pub struct Options {
    pub input_directory: PathBuf,
    pub range: LengthRange,
    pub barcodes: Vec<String>,
    pub threads: usize,
    pub report: Option<PathBuf>,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum UsageError {
    #[error("minimum length {min} is greater than maximum length {max}")]
    InvertedRange { min: usize, max: usize },

    #[error("no barcodes given: pass a comma-separated list such as `-b 01,02`")]
    NoBarcodes,

    #[error("the number of threads must be at least 1")]
    NoThreads,
}

impl TryFrom<Cli> for Options {
    type Error = UsageError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let (min, max) = (cli.min_len, cli.max_len.0);
        if min > max {
            return Err(UsageError::InvertedRange { min, max });
        }

        let barcodes = parse_barcodes(&cli.barcodes);
        if barcodes.is_empty() {
            return Err(UsageError::NoBarcodes);
        }

        if cli.threads == 0 {
            return Err(UsageError::NoThreads);
        }

        Ok(Options {
            input_directory: cli.input_directory,
            range: LengthRange::new(min, max),
            barcodes,
            threads: cli.threads,
            report: cli.report,
        })
    }
}

/// Splits a comma-separated barcode list. Surrounding whitespace and empty entries are
/// dropped, and a barcode listed twice is only kept the first time, since both entries
/// would write the same output file.
pub fn parse_barcodes(list: &str) -> Vec<String> {
    let mut barcodes: Vec<String> = Vec::new();

    for bc in list.split(',').map(str::trim) {
        if bc.is_empty() {
            continue;
        }
        if barcodes.iter().any(|b| b == bc) {
            warn!("Barcode {bc} is listed more than once, filtering it once");
            continue;
        }
        barcodes.push(bc.to_string());
    }

    barcodes
}
