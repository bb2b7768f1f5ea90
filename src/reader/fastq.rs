use super::bytes::{self, LineReader};
use std::io::BufRead;
use thiserror::Error;

/// A single FASTQ read. Every line is held verbatim, terminator included. The separator
/// line is not kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastqRecord {
    pub id: Vec<u8>,
    pub seq: Vec<u8>,
    pub qual: Vec<u8>,
}

impl FastqRecord {
    /// Length of the sequence with its line terminator stripped.
    pub fn len(&self) -> usize {
        bytes::split_terminator(&self.seq).0.len()
    }

    /// The line terminator this record uses, taken from the sequence line.
    /// Falls back to `\n` when the sequence line has none.
    pub fn terminator(&self) -> &[u8] {
        match bytes::split_terminator(&self.seq).1 {
            b"" => b"\n",
            t => t,
        }
    }
}

#[derive(Error, Debug)]
pub enum FastqError {
    #[error("incomplete record starting at line {line}: found {found} of 4 lines")]
    IncompleteRecord { line: u64, found: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Lines collected for the group currently being read.
#[derive(Default)]
struct PendingRecord {
    id: Option<Vec<u8>>,
    seq: Option<Vec<u8>>,
    qual: Option<Vec<u8>>,
    /// 1-based line number of the first line in the group
    start: u64,
    found: usize,
    has_content: bool,
}

impl PendingRecord {
    fn starting_at(start: u64) -> Self {
        Self {
            start,
            ..Self::default()
        }
    }

    fn observe(&mut self, line: &[u8]) {
        self.found += 1;
        self.has_content |= !bytes::is_blank(line);
    }

    fn flush(&mut self) -> Result<FastqRecord, FastqError> {
        let pending = std::mem::take(self);
        match (pending.id, pending.seq, pending.qual) {
            (Some(id), Some(seq), Some(qual)) => Ok(FastqRecord { id, seq, qual }),
            _ => Err(FastqError::IncompleteRecord {
                line: pending.start,
                found: pending.found,
            }),
        }
    }

    /// The error for a group cut short by the end of the file, if any. Blank lines count
    /// as trailing whitespace.
    fn leftover(&self) -> Option<FastqError> {
        (self.found > 0 && self.has_content).then_some(FastqError::IncompleteRecord {
            line: self.start,
            found: self.found,
        })
    }
}

/// Iterates over the records of a FASTQ stream. Records are delimited by line position
/// alone: every fourth line starts a new record, whatever its content.
pub struct FastqRecords<R: BufRead> {
    lines: LineReader<R>,
    pending: PendingRecord,
    done: bool,
}

impl<R: BufRead> FastqRecords<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: LineReader::new(reader),
            pending: PendingRecord::default(),
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for FastqRecords<R> {
    type Item = Result<FastqRecord, FastqError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let index = self.lines.lines_read();
            let line = match self.lines.next_line() {
                Ok(Some(line)) => line,
                Ok(None) => {
                    self.done = true;
                    return self.pending.leftover().map(Err);
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
            };

            if index % 4 == 0 {
                // anything left over from the previous group is dropped here
                self.pending = PendingRecord::starting_at(index + 1);
            }
            self.pending.observe(&line);

            match index % 4 {
                0 => self.pending.id = Some(line),
                1 => self.pending.seq = Some(line),
                2 => {}
                _ => {
                    self.pending.qual = Some(line);
                    if !self.pending.has_content {
                        // four blank lines, e.g. padding at the end of the file
                        self.pending = PendingRecord::default();
                        continue;
                    }
                    return Some(self.pending.flush());
                }
            }
        }
    }
}
