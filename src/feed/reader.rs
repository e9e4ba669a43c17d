//! Line framing for text feeds.

use std::io::BufRead;

use crate::error::{DecodeError, Error};

/// Remove line terminators and a single leading marker character
///
/// The sample PITCH files prefix every record with an `S` that is not part of
/// the message schema; field offsets are relative to what follows it.
pub fn strip_marker(line: &str, marker: Option<char>) -> &str {
    let line = line.trim_end_matches(['\r', '\n']);
    match marker {
        Some(m) => line.strip_prefix(m).unwrap_or(line),
        None => line,
    }
}

/// Iterator over the records of a line-oriented feed
///
/// Yields `(line_number, record)` pairs with 1-based line numbers. Blank lines
/// are skipped but still counted, so line numbers match the input file.
///
/// A line that is not valid UTF-8 yields [`Error::Decode`] for that line and
/// iteration continues with the next one; [`Error::Io`] is reserved for
/// failures of the underlying reader.
#[derive(Debug)]
pub struct FeedReader<R> {
    reader: R,
    marker: Option<char>,
    line_no: u64,
    buf: Vec<u8>,
}

impl<R: BufRead> FeedReader<R> {
    /// Wrap a buffered reader
    pub fn new(reader: R, marker: Option<char>) -> Self {
        Self {
            reader,
            marker,
            line_no: 0,
            buf: Vec::with_capacity(128),
        }
    }

    /// Number of lines consumed so far
    pub fn line_number(&self) -> u64 {
        self.line_no
    }
}

impl<R: BufRead> Iterator for FeedReader<R> {
    type Item = Result<(u64, String), Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line_no += 1;
                    let line = match std::str::from_utf8(&self.buf) {
                        Ok(line) => line,
                        Err(_) => {
                            return Some(Err(Error::Decode {
                                line: self.line_no,
                                source: DecodeError::InvalidText { field: "record" },
                            }))
                        }
                    };
                    let record = strip_marker(line, self.marker);
                    if record.trim().is_empty() {
                        continue;
                    }
                    return Some(Ok((self.line_no, record.to_string())));
                }
                Err(e) => return Some(Err(Error::Io(e))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_marker() {
        assert_eq!(strip_marker("S28800011A\n", Some('S')), "28800011A");
        assert_eq!(strip_marker("28800011A\r\n", Some('S')), "28800011A");
        // only one marker is removed
        assert_eq!(strip_marker("SS123", Some('S')), "S123");
        assert_eq!(strip_marker("S123", None), "S123");
    }

    #[test]
    fn test_reader_line_numbers() {
        let input = "S111\n\nS222\r\nS333";
        let records: Vec<_> = FeedReader::new(input.as_bytes(), Some('S'))
            .map(|r| r.unwrap())
            .collect();

        assert_eq!(
            records,
            vec![
                (1, "111".to_string()),
                (3, "222".to_string()),
                (4, "333".to_string()),
            ]
        );
    }

    #[test]
    fn test_reader_empty_input() {
        let mut reader = FeedReader::new("".as_bytes(), Some('S'));
        assert!(reader.next().is_none());
        assert_eq!(reader.line_number(), 0);
    }

    #[test]
    fn test_reader_invalid_utf8_is_per_line() {
        let input: &[u8] = b"S111\nS2\xff\xfe2\nS333\n";
        let mut reader = FeedReader::new(input, Some('S'));

        assert_eq!(reader.next().unwrap().unwrap(), (1, "111".to_string()));
        match reader.next() {
            Some(Err(Error::Decode { line, source })) => {
                assert_eq!(line, 2);
                assert_eq!(source, DecodeError::InvalidText { field: "record" });
            }
            other => panic!("expected decode error, got {:?}", other),
        }
        // the bad line is counted and reading resumes after it
        assert_eq!(reader.next().unwrap().unwrap(), (3, "333".to_string()));
        assert!(reader.next().is_none());
    }
}
