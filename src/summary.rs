use crate::barcode::BarcodeOutcome;
use crate::filter::{LengthRange, ReadCounts};
use std::fmt;
use std::path::PathBuf;

/// The outcome of filtering one input file.
#[derive(Debug)]
pub struct FileSummary {
    pub file: PathBuf,
    pub range: LengthRange,
    /// reads seen and kept, up to the error if there was one
    pub counts: ReadCounts,
    pub error: Option<String>,
}

impl fmt::Display for FileSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self
            .file
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        write!(
            f,
            "File {} contained {} reads, {} within length range {}",
            name, self.counts.total, self.counts.kept, self.range
        )?;
        if let Some(e) = &self.error {
            write!(f, ", then stopped: {}", e)?;
        }
        Ok(())
    }
}

/// Every file filtered for a single barcode.
#[derive(Debug)]
pub struct BarcodeSummary {
    pub barcode: String,
    /// `None` if there was nothing to filter, so no output file was made
    pub output: Option<PathBuf>,
    pub files: Vec<FileSummary>,
}

impl BarcodeSummary {
    pub fn new(barcode: &str) -> Self {
        Self {
            barcode: barcode.to_string(),
            output: None,
            files: Vec::new(),
        }
    }

    /// Counts summed over every file, including reads filtered before a file failed.
    pub fn counts(&self) -> ReadCounts {
        let mut counts = ReadCounts::default();
        self.files.iter().for_each(|f| counts.add(f.counts));
        counts
    }

    pub fn failed_files(&self) -> usize {
        self.files.iter().filter(|f| f.error.is_some()).count()
    }
}

/// Logs totals for the whole run.
pub fn log_run_summary(outcomes: &[BarcodeOutcome], elapsed: f64) {
    let mut counts = ReadCounts::default();
    let mut failed_barcodes = 0;
    let mut failed_files = 0;

    for outcome in outcomes {
        match &outcome.result {
            Ok(summary) => {
                counts.add(summary.counts());
                failed_files += summary.failed_files();
            }
            Err(_) => failed_barcodes += 1,
        }
    }

    info!(
        "Stats: {} barcodes, {} reads, {} kept, {:.1}s runtime",
        outcomes.len(),
        counts.total,
        counts.kept,
        elapsed
    );

    if failed_barcodes + failed_files > 0 {
        warn!(
            "{failed_barcodes} barcodes and {failed_files} files could not be fully filtered, \
            see the errors above"
        );
    }
}
