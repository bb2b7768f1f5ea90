pub mod bytes;
pub mod fastq;

use anyhow::{Context, Result};
use bytes::GenericBufReader;
use fastq::FastqRecords;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Opens a FASTQ file for record-by-record reading.
pub fn open_fastq(path: &Path) -> Result<FastqRecords<GenericBufReader>> {
    let file = File::open(path).with_context(|| format!("Unable to open {}", path.display()))?;
    let reader: GenericBufReader = BufReader::new(Box::new(file) as Box<dyn Read + Send>);
    Ok(FastqRecords::new(reader))
}
