use crate::barcode::BarcodeOutcome;
use crate::options::Options;
use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Run-wide information, written as a JSON comment on the first line of the report.
#[derive(Serialize, Debug)]
pub struct RunMetadata {
    pub read_filter_version: String,
    pub run_date: String,
    pub input_directory: String,
    pub min_length: usize,
    /// absent when there is no upper bound
    pub max_length: Option<usize>,
    pub barcodes: usize,
    pub elapsed: f64,
}

impl RunMetadata {
    pub fn new(opts: &Options, elapsed: f64) -> Self {
        RunMetadata {
            read_filter_version: crate::cli::VERSION.to_string(),
            run_date: format!("{:?}", chrono::offset::Local::now()),
            input_directory: opts.input_directory.display().to_string(),
            min_length: opts.range.min,
            max_length: (!opts.range.is_unbounded()).then_some(opts.range.max),
            barcodes: opts.barcodes.len(),
            elapsed,
        }
    }
}

#[derive(Serialize, Debug, PartialEq)]
struct ReportRow {
    barcode: String,
    file: String,
    total_reads: Option<usize>,
    kept_reads: Option<usize>,
    status: &'static str,
    error: String,
}

/// One row per input file. A barcode that failed outright, or had no input files, gets a
/// single row with an empty `file` column.
fn report_rows(outcomes: &[BarcodeOutcome]) -> Vec<ReportRow> {
    let mut rows = Vec::new();

    for outcome in outcomes {
        let summary = match &outcome.result {
            Ok(summary) => summary,
            Err(e) => {
                rows.push(ReportRow {
                    barcode: outcome.barcode.clone(),
                    file: String::new(),
                    total_reads: None,
                    kept_reads: None,
                    status: "error",
                    error: format!("{e:#}"),
                });
                continue;
            }
        };

        if summary.files.is_empty() {
            rows.push(ReportRow {
                barcode: outcome.barcode.clone(),
                file: String::new(),
                total_reads: None,
                kept_reads: None,
                status: "no_files",
                error: String::new(),
            });
        }

        for file in &summary.files {
            // a failed file still reports the reads handled before it stopped
            let (status, error) = match &file.error {
                Some(e) => ("error", e.clone()),
                None => ("ok", String::new()),
            };
            rows.push(ReportRow {
                barcode: summary.barcode.clone(),
                file: file.file.display().to_string(),
                total_reads: Some(file.counts.total),
                kept_reads: Some(file.counts.kept),
                status,
                error,
            });
        }
    }

    rows
}

/// Writes the run report to `path`. The report is first written to a temporary file in the
/// same directory, then moved into place.
pub fn write_report(
    path: &Path,
    metadata: &RunMetadata,
    outcomes: &[BarcodeOutcome],
) -> Result<()> {
    info!("Writing report to {}...", path.display());

    // get the directory of the output file
    let mut dir = std::path::absolute(path)?;
    dir.pop();

    let mut temp_file = NamedTempFile::new_in(&dir)
        .with_context(|| format!("Unable to create a temporary file in {}", dir.display()))?;
    writeln!(temp_file, "#{}", serde_json::to_string(metadata)?)?;

    let mut wtr = WriterBuilder::new().delimiter(b'\t').from_writer(temp_file);
    for row in report_rows(outcomes) {
        wtr.serialize(row)?;
    }

    let temp_file = wtr.into_inner().map_err(|e| e.into_error())?;
    temp_file
        .persist(path)
        .with_context(|| format!("Unable to write report {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::barcode::BarcodeError;
    use crate::filter::{LengthRange, ReadCounts};
    use crate::summary::{BarcodeSummary, FileSummary};
    use assert_fs::prelude::*;
    use std::path::PathBuf;

    fn outcomes() -> Vec<BarcodeOutcome> {
        let range = LengthRange::new(100, 200);
        let mut ok = BarcodeSummary::new("01");
        ok.files.push(FileSummary {
            file: PathBuf::from("in/a.fastq"),
            range,
            counts: ReadCounts { total: 10, kept: 7 },
            error: None,
        });
        ok.files.push(FileSummary {
            file: PathBuf::from("in/b.fastq"),
            range,
            counts: ReadCounts { total: 1, kept: 1 },
            error: Some("incomplete record starting at line 5: found 3 of 4 lines".to_string()),
        });

        vec![
            BarcodeOutcome {
                barcode: "01".to_string(),
                result: Ok(ok),
            },
            BarcodeOutcome {
                barcode: "02".to_string(),
                result: Err(BarcodeError::MissingInput {
                    barcode: "02".to_string(),
                    dir: PathBuf::from("in/barcode02"),
                }
                .into()),
            },
            BarcodeOutcome {
                barcode: "03".to_string(),
                result: Ok(BarcodeSummary::new("03")),
            },
        ]
    }

    #[test]
    fn rows_per_file_and_failed_barcode() {
        let rows = report_rows(&outcomes());
        assert_eq!(rows.len(), 4);

        assert_eq!(rows[0].total_reads, Some(10));
        assert_eq!(rows[0].kept_reads, Some(7));
        assert_eq!(rows[0].status, "ok");

        assert_eq!(rows[1].status, "error");
        assert_eq!(rows[1].total_reads, Some(1));
        assert_eq!(rows[1].kept_reads, Some(1));
        assert!(rows[1].error.starts_with("incomplete record"));

        assert_eq!(rows[2].total_reads, None);

        assert_eq!(rows[2].barcode, "02");
        assert_eq!(rows[2].status, "error");
        assert!(rows[2].error.contains("not found"));

        assert_eq!(rows[3].barcode, "03");
        assert_eq!(rows[3].status, "no_files");
    }

    #[test]
    fn report_file_layout() {
        let temp = assert_fs::TempDir::new().unwrap();
        let out = temp.child("report.tsv");

        let metadata = RunMetadata {
            read_filter_version: "test".to_string(),
            run_date: "today".to_string(),
            input_directory: "in".to_string(),
            min_length: 100,
            max_length: None,
            barcodes: 3,
            elapsed: 0.5,
        };
        write_report(out.path(), &metadata, &outcomes()).unwrap();

        let text = std::fs::read_to_string(out.path()).unwrap();
        let mut lines = text.lines();

        let header: serde_json::Value =
            serde_json::from_str(lines.next().unwrap().strip_prefix('#').unwrap()).unwrap();
        assert_eq!(header["min_length"], 100);
        assert!(header["max_length"].is_null());
        assert_eq!(header["barcodes"], 3);

        assert_eq!(
            lines.next().unwrap(),
            "barcode\tfile\ttotal_reads\tkept_reads\tstatus\terror"
        );
        assert_eq!(lines.next().unwrap(), "01\tin/a.fastq\t10\t7\tok\t");
        assert!(lines.next().unwrap().starts_with("01\tin/b.fastq\t1\t1\terror\t"));
        assert_eq!(lines.count(), 2);
        temp.close().unwrap();
    }
}
