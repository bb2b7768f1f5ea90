use crate::filter::{filter_reads, LengthRange, ReadCounts};
use crate::io::create_output_file;
use crate::options::Options;
use crate::reader::open_fastq;
use crate::summary::{BarcodeSummary, FileSummary};

use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory under the input root holding one `barcode<BC>` directory per barcode.
pub const INPUT_DIR: &str = "DemultiplexedGuppy";
/// Directory under the input root receiving one `BC<BC>.fastq` file per barcode.
pub const OUTPUT_DIR: &str = "Demultiplexed";

/// Input and output locations for a single barcode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BarcodeJob {
    pub barcode: String,
    pub input_dir: PathBuf,
    pub output_file: PathBuf,
}

impl BarcodeJob {
    pub fn new(root: &Path, barcode: &str) -> Self {
        Self {
            barcode: barcode.to_string(),
            input_dir: root.join(INPUT_DIR).join(format!("barcode{barcode}")),
            output_file: root.join(OUTPUT_DIR).join(format!("BC{barcode}.fastq")),
        }
    }
}

/// The result of filtering one barcode. An error here means the barcode as a whole
/// could not be processed; errors in single files are kept in the summary instead.
#[derive(Debug)]
pub struct BarcodeOutcome {
    pub barcode: String,
    pub result: Result<BarcodeSummary>,
}

#[derive(Error, Debug)]
pub enum BarcodeError {
    #[error("input directory for barcode {barcode} not found: {}", dir.display())]
    MissingInput { barcode: String, dir: PathBuf },
}

/// Lists the `.fastq` files directly inside `dir`, sorted by name.
pub fn list_fastq_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Unable to read directory {}", dir.display()))?;

    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }

        let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        if name.ends_with(".fastq") {
            files.push(path);
        } else if name.ends_with(".fastq.gz") {
            warn!("Skipping {}: compressed input is not supported", path.display());
        }
    }

    files.sort();
    Ok(files)
}

/// Filters every `.fastq` file for one barcode into its output file. Files are filtered in
/// name order and their kept reads are appended to the same output.
///
/// # Errors
///
/// Returns an error if the input directory is missing or cannot be listed, or if the output
/// file cannot be created or flushed. Failures in individual input files are logged, recorded
/// in the returned summary, and do not stop the remaining files.
pub fn filter_barcode(job: &BarcodeJob, range: &LengthRange) -> Result<BarcodeSummary> {
    info!("Filtering reads in {}", job.input_dir.display());

    if !job.input_dir.is_dir() {
        bail!(BarcodeError::MissingInput {
            barcode: job.barcode.clone(),
            dir: job.input_dir.clone(),
        });
    }

    let mut summary = BarcodeSummary::new(&job.barcode);

    let files = list_fastq_files(&job.input_dir)?;
    if files.is_empty() {
        warn!("No .fastq files found in {}", job.input_dir.display());
        return Ok(summary);
    }
    if files.len() > 1 {
        info!(
            "Found {} .fastq files for barcode {}, combining them into one output",
            files.len(),
            job.barcode
        );
    }

    let mut writer = create_output_file(&job.output_file)?;
    summary.output = Some(job.output_file.clone());

    for file in files {
        let (counts, err) = filter_file(&file, &mut writer, range);
        if let Some(e) = &err {
            error!("Failed to filter {}", file.display());
            error!("  because: {e:#}");
        }

        let file_summary = FileSummary {
            file,
            range: *range,
            counts,
            error: err.map(|e| format!("{e:#}")),
        };
        println!("[barcode {}] {}", job.barcode, file_summary);
        summary.files.push(file_summary);
    }

    writer
        .flush()
        .with_context(|| format!("Unable to write {}", job.output_file.display()))?;

    Ok(summary)
}

/// Filters one file into `writer`. The counts cover every read handled before any error.
fn filter_file(
    path: &Path,
    writer: &mut impl Write,
    range: &LengthRange,
) -> (ReadCounts, Option<anyhow::Error>) {
    let records = match open_fastq(path) {
        Ok(records) => records,
        Err(e) => return (ReadCounts::default(), Some(e)),
    };

    let (counts, err) = filter_reads(records, writer, range);
    (counts, err.map(anyhow::Error::from))
}

/// Filters every barcode in `opts`, returning one outcome per barcode in list order.
///
/// With a single thread the barcodes are processed one after another; otherwise they are
/// spread over a thread pool. A barcode that fails does not affect the others.
pub fn filter_all(opts: &Options) -> Result<Vec<BarcodeOutcome>> {
    let jobs: Vec<BarcodeJob> = opts
        .barcodes
        .iter()
        .map(|bc| BarcodeJob::new(&opts.input_directory, bc))
        .collect();

    let run = |job: &BarcodeJob| {
        let result = filter_barcode(job, &opts.range);
        if let Err(e) = &result {
            error!("Skipping barcode {}: {e:#}", job.barcode);
        }
        BarcodeOutcome {
            barcode: job.barcode.clone(),
            result,
        }
    };

    if opts.threads == 1 {
        return Ok(jobs.iter().map(run).collect());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(opts.threads)
        .build()
        .context("Unable to start the thread pool")?;

    Ok(pool.install(|| jobs.par_iter().map(run).collect()))
}
