use crate::io::write_record;
use crate::reader::fastq::{FastqError, FastqRecord};
use std::fmt;
use std::io::Write;

/// Inclusive bounds on sequence length. An upper bound of `usize::MAX` is unbounded.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LengthRange {
    pub min: usize,
    pub max: usize,
}

impl LengthRange {
    pub const UNBOUNDED: usize = usize::MAX;

    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, len: usize) -> bool {
        (self.min <= len) && (len <= self.max)
    }

    pub fn is_unbounded(&self) -> bool {
        self.max == Self::UNBOUNDED
    }
}

impl fmt::Display for LengthRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unbounded() {
            write!(f, "[{}, inf]", self.min)
        } else {
            write!(f, "[{}, {}]", self.min, self.max)
        }
    }
}

/// Record counts for one filter pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ReadCounts {
    pub total: usize,
    pub kept: usize,
}

impl ReadCounts {
    pub fn add(&mut self, other: ReadCounts) {
        self.total += other.total;
        self.kept += other.kept;
    }
}

pub fn filter(read: &FastqRecord, range: &LengthRange) -> bool {
    range.contains(read.len())
}

/// Writes every record whose length lies within `range` to `writer`, returning how many
/// records were seen and kept.
///
/// Stops at the first malformed group or I/O failure and hands back that error next to the
/// counts so far. Records accepted before that point have already been written.
pub fn filter_reads<I, W>(
    records: I,
    writer: &mut W,
    range: &LengthRange,
) -> (ReadCounts, Option<FastqError>)
where
    I: IntoIterator<Item = Result<FastqRecord, FastqError>>,
    W: Write,
{
    let mut counts = ReadCounts::default();

    for rec in records {
        let rec = match rec {
            Ok(rec) => rec,
            Err(e) => return (counts, Some(e)),
        };
        counts.total += 1;

        if counts.total % 50000 == 0 {
            debug!("Processed: {}", counts.total);
        }

        if filter(&rec, range) {
            if let Err(e) = write_record(writer, &rec) {
                return (counts, Some(e.into()));
            }
            counts.kept += 1;
        }
    }

    (counts, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::fastq::FastqRecords;

    fn fastq_with_lengths(lengths: &[usize]) -> String {
        lengths
            .iter()
            .enumerate()
            .map(|(i, n)| {
                format!("@read{i}\n{}\n+read{i}\n{}\n", "A".repeat(*n), "I".repeat(*n))
            })
            .collect()
    }

    fn run(input: &str, range: LengthRange) -> (Result<ReadCounts, FastqError>, String) {
        let mut out = Vec::new();
        let (counts, err) = filter_reads(FastqRecords::new(input.as_bytes()), &mut out, &range);
        let res = match err {
            Some(e) => Err(e),
            None => Ok(counts),
        };
        (res, String::from_utf8(out).unwrap())
    }

    #[test]
    fn keeps_only_reads_in_range() {
        let input = fastq_with_lengths(&[50, 150]);
        let (counts, out) = run(&input, LengthRange::new(100, 200));

        assert_eq!(counts.unwrap(), ReadCounts { total: 2, kept: 1 });
        assert_eq!(out, format!("@read1\n{}\n+\n{}\n", "A".repeat(150), "I".repeat(150)));
    }

    #[test]
    fn bounds_are_inclusive() {
        let input = fastq_with_lengths(&[9, 10, 20, 21]);
        let (counts, out) = run(&input, LengthRange::new(10, 20));

        assert_eq!(counts.unwrap(), ReadCounts { total: 4, kept: 2 });
        assert!(out.contains("@read1\n"));
        assert!(out.contains("@read2\n"));
        assert!(!out.contains("@read0\n"));
        assert!(!out.contains("@read3\n"));
    }

    #[test]
    fn every_kept_read_is_in_range() {
        let lengths: Vec<usize> = (0..60).map(|i| (i * 37) % 101).collect();
        let input = fastq_with_lengths(&lengths);
        let range = LengthRange::new(25, 75);
        let (counts, out) = run(&input, range);

        let expected = lengths.iter().filter(|n| range.contains(**n)).count();
        assert_eq!(counts.unwrap().kept, expected);

        let kept: Vec<FastqRecord> =
            FastqRecords::new(out.as_bytes()).map(|r| r.unwrap()).collect();
        assert_eq!(kept.len(), expected);
        assert!(kept.iter().all(|r| range.contains(r.len())));
    }

    #[test]
    fn unbounded_range_only_rewrites_separators() {
        let input = "@a desc\nACGT\n+a desc\nIIII\n@b\nA\n+\nI\n";
        let (counts, out) = run(input, LengthRange::new(0, LengthRange::UNBOUNDED));

        assert_eq!(counts.unwrap(), ReadCounts { total: 2, kept: 2 });
        assert_eq!(out, "@a desc\nACGT\n+\nIIII\n@b\nA\n+\nI\n");
    }

    #[test]
    fn filtering_twice_changes_nothing() {
        let input = fastq_with_lengths(&[3, 40, 80, 120, 7]);
        let range = LengthRange::new(5, 100);
        let (_, once) = run(&input, range);
        let (_, twice) = run(&once, range);
        assert_eq!(once, twice);
    }

    #[test]
    fn length_ignores_the_line_terminator() {
        let input = "@a\r\nACGTA\r\n+\r\nIIIII\r\n";
        let (counts, out) = run(input, LengthRange::new(5, 5));

        assert_eq!(counts.unwrap().kept, 1);
        assert_eq!(out, "@a\r\nACGTA\r\n+\r\nIIIII\r\n");
    }

    #[test]
    fn truncated_tail_keeps_earlier_output() {
        // seven lines: one full record followed by three stray lines
        let input = "@a\nACGT\n+\nIIII\n@b\nACGT\n+\n";
        let (res, out) = run(input, LengthRange::new(0, 10));

        assert!(matches!(res, Err(FastqError::IncompleteRecord { line: 5, found: 3 })));
        assert_eq!(out, "@a\nACGT\n+\nIIII\n");
    }

    #[test]
    fn truncated_tail_still_counts_earlier_reads() {
        let input = "@a\nACGT\n+\nIIII\n@b\nACGTACGT\n+\nIIIIIIII\n@c\nACGT\n+\n";
        let mut out = Vec::new();
        let (counts, err) =
            filter_reads(FastqRecords::new(input.as_bytes()), &mut out, &LengthRange::new(0, 5));

        assert_eq!(counts, ReadCounts { total: 2, kept: 1 });
        assert!(matches!(err, Some(FastqError::IncompleteRecord { line: 9, found: 3 })));
    }

    #[test]
    fn trailing_blank_lines_are_not_reads() {
        for blanks in [4, 5] {
            let input = format!("@a\nACGT\n+\nIIII\n{}", "\n".repeat(blanks));
            let (counts, out) = run(&input, LengthRange::new(0, 10));

            assert_eq!(counts.unwrap(), ReadCounts { total: 1, kept: 1 });
            assert_eq!(out, "@a\nACGT\n+\nIIII\n");
        }
    }

    #[test]
    fn range_display() {
        assert_eq!(LengthRange::new(100, 200).to_string(), "[100, 200]");
        assert_eq!(LengthRange::new(0, LengthRange::UNBOUNDED).to_string(), "[0, inf]");
    }
}
