use crate::reader::fastq::FastqRecord;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Creates (or truncates) the output file at `path`, making any missing parent directories.
pub fn create_output_file(path: &Path) -> Result<BufWriter<File>> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        if !dir.is_dir() {
            info!("Making directory {}", dir.display());
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Unable to create directory {}", dir.display()))?;
        }
    }

    let file = File::create(path).with_context(|| format!("Unable to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

/// Writes a record as four lines: id, sequence, a bare `+`, quality.
///
/// The `+` line takes the record's own terminator, as does the quality line if it had
/// none (the last line of a file without a trailing newline).
pub fn write_record(writer: &mut impl Write, record: &FastqRecord) -> std::io::Result<()> {
    let eol = record.terminator();

    writer.write_all(&record.id)?;
    writer.write_all(&record.seq)?;
    if !record.seq.ends_with(b"\n") {
        writer.write_all(eol)?;
    }
    writer.write_all(b"+")?;
    writer.write_all(eol)?;
    writer.write_all(&record.qual)?;
    if !record.qual.ends_with(b"\n") {
        writer.write_all(eol)?;
    }
    Ok(())
}
