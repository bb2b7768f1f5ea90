use std::io::{BufRead, BufReader, Read};

pub type GenericBufReader = BufReader<Box<dyn Read + Send>>;

/// Reads raw lines from a buffered source, keeping each line's terminator.
pub struct LineReader<R: BufRead> {
    reader: R,
    lines: u64,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, lines: 0 }
    }

    /// Number of lines handed out so far.
    pub fn lines_read(&self) -> u64 {
        self.lines
    }

    /// Returns the next line, including its `\n` if present, or `None` at end of file.
    pub fn next_line(&mut self) -> std::io::Result<Option<Vec<u8>>> {
        let mut buf = Vec::new();
        match self.reader.read_until(b'\n', &mut buf)? {
            0 => Ok(None),
            _ => {
                self.lines += 1;
                Ok(Some(buf))
            }
        }
    }
}

/// Splits a raw line into its content and its terminator (`\n`, `\r\n` or nothing).
pub fn split_terminator(line: &[u8]) -> (&[u8], &[u8]) {
    let content_len = match line {
        [.., b'\r', b'\n'] => line.len() - 2,
        [.., b'\n'] => line.len() - 1,
        _ => line.len(),
    };
    line.split_at(content_len)
}

/// True if the line holds nothing but whitespace.
pub fn is_blank(line: &[u8]) -> bool {
    line.iter().all(|b| b.is_ascii_whitespace())
}
