//! Input-trace reader (C12).
//!
//! Line 1 is a decimal access count; each following line is a virtual
//! address in hex, with or without a `0x`/`0X` prefix (mirroring the `%hx`
//! scanf conversion the original trace files were written against).
//!
//! Reading is streamed one address at a time rather than collected
//! up-front: a malformed line partway through a trace must stop further
//! reading without discarding the translation events already emitted for
//! addresses read before it (§7).

use crate::error::CliError;
use mmu_core::VirtAddr;
use std::io::BufRead;

pub struct TraceReader<R> {
    lines: std::io::Lines<R>,
    remaining: usize,
    next_line_no: usize,
}

impl<R: BufRead> TraceReader<R> {
    /// Reads the declared access count off the first line and prepares to
    /// stream the addresses that follow.
    pub fn open(reader: R) -> Result<Self, CliError> {
        let mut lines = reader.lines();
        let count_line = lines
            .next()
            .ok_or_else(|| CliError::TraceParse {
                line: 1,
                reason: "expected an access count on the first line".to_string(),
            })?
            .map_err(|source| CliError::Io {
                path: "<trace>".to_string(),
                source,
            })?;
        let remaining: usize = count_line.trim().parse().map_err(|_| CliError::TraceParse {
            line: 1,
            reason: format!("'{}' is not a valid access count", count_line.trim()),
        })?;

        Ok(Self {
            lines,
            remaining,
            next_line_no: 2,
        })
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<VirtAddr, CliError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let line_no = self.next_line_no;
        self.next_line_no += 1;

        let line = match self.lines.next() {
            Some(Ok(line)) => line,
            Some(Err(source)) => {
                return Some(Err(CliError::Io {
                    path: "<trace>".to_string(),
                    source,
                }));
            }
            None => {
                return Some(Err(CliError::TraceParse {
                    line: line_no,
                    reason: format!("trace ended with {} access(es) still declared", self.remaining),
                }));
            }
        };

        self.remaining -= 1;
        let text = line.trim().trim_start_matches("0x").trim_start_matches("0X");
        match u16::from_str_radix(text, 16) {
            Ok(raw) => Some(Ok(VirtAddr::new(raw))),
            Err(_) => Some(Err(CliError::TraceParse {
                line: line_no,
                reason: format!("'{}' is not a valid hex address", line.trim()),
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_count_and_addresses() {
        let input = Cursor::new(b"2\n0x104\n208\n".to_vec());
        let reader = TraceReader::open(input).unwrap();
        let addrs: Result<Vec<_>, _> = reader.collect();
        let addrs = addrs.unwrap();
        assert_eq!(addrs.len(), 2);
        assert_eq!(addrs[0].as_u16(), 0x104);
        assert_eq!(addrs[1].as_u16(), 0x208);
    }

    #[test]
    fn rejects_non_numeric_count() {
        let input = Cursor::new(b"not-a-number\n".to_vec());
        assert!(TraceReader::open(input).is_err());
    }

    #[test]
    fn stops_with_error_on_truncated_trace_but_keeps_prior_addresses() {
        let input = Cursor::new(b"3\n0x001\n0x002\n".to_vec());
        let reader = TraceReader::open(input).unwrap();
        let items: Vec<_> = reader.collect();
        assert_eq!(items.len(), 3);
        assert!(items[0].is_ok());
        assert!(items[1].is_ok());
        assert!(items[2].is_err());
    }

    #[test]
    fn rejects_malformed_address() {
        let input = Cursor::new(b"1\nnot-hex\n".to_vec());
        let reader = TraceReader::open(input).unwrap();
        let items: Vec<_> = reader.collect();
        assert_eq!(items.len(), 1);
        assert!(items[0].is_err());
    }
}
